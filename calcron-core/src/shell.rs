//! Blocking shell execution.
//!
//! Every destructive crontab write goes through [`CommandRunner`], so tests
//! can observe or fake the mutation step without touching a real spool file.

use std::process::Command;

use crate::error::{CalcronError, CalcronResult};

/// Runs one shell command to completion and captures its combined output.
///
/// Implementations must block until the command finishes, return the
/// combined stdout/stderr on success, and fail with the captured output
/// when the command exits nonzero. There is no retry and no timeout; a hung
/// command hangs the run.
pub trait CommandRunner {
    fn run(&self, command: &str) -> CalcronResult<String>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &str) -> CalcronResult<String> {
        (**self).run(command)
    }
}

/// The real runner: `bash -c <command>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Shell;

impl CommandRunner for Shell {
    fn run(&self, command: &str) -> CalcronResult<String> {
        let output = Command::new("bash").arg("-c").arg(command).output()?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(CalcronError::CommandFailed {
                status: output.status.code().unwrap_or(-1),
                output: combined,
            });
        }

        Ok(combined)
    }
}

/// Wrap `s` in single quotes for interpolation into a bash command.
///
/// Single quotes inside `s` are closed, backslash-escaped and reopened, so
/// the result always reaches the command as one word with no expansion
/// applied, whatever `s` contains.
pub fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
