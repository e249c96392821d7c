//! Platform-specific crontab spool location.

use std::path::PathBuf;

/// The execution platform. Resolved once at startup and passed down;
/// nothing below this queries the environment again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    /// Android under Termux, which keeps the spool under its own prefix.
    Termux,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn detect() -> Self {
        if cfg!(all(target_os = "android", target_arch = "aarch64")) {
            Platform::Termux
        } else {
            Platform::Linux
        }
    }

    fn spool_dir(self) -> &'static str {
        match self {
            Platform::Linux => "/var/spool/cron",
            Platform::Termux => "/data/data/com.termux/files/usr/var/spool/cron",
        }
    }
}

/// Path of the current user's crontab file: the platform spool directory
/// suffixed with the username. Stable across repeated calls.
pub fn crontab_location(platform: Platform) -> PathBuf {
    PathBuf::from(platform.spool_dir()).join(whoami::username())
}
