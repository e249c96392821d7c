//! Crontab mutation: backup, clear below the marker, append entries.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{CalcronError, CalcronResult};
use crate::schedule::JobEntry;
use crate::shell::{sh_quote, CommandRunner};

/// The user's crontab, addressed by its spool file.
///
/// The table is split by a marker line: everything above the marker belongs
/// to the user and is never touched; the marker and everything below it
/// belong to this tool and are replaced wholesale on every reconciliation.
/// Destructive writes go through the [`CommandRunner`]; a nonzero exit
/// aborts the run with the captured output. There is no locking: a
/// concurrent edit of the table during a run is an undetected race.
pub struct JobTable<R> {
    location: PathBuf,
    runner: R,
}

impl<R: CommandRunner> JobTable<R> {
    pub fn new(location: PathBuf, runner: R) -> Self {
        JobTable { location, runner }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Snapshot the table to `backup_path` (overwriting any prior backup),
    /// then rewrite it as the user-owned prefix followed by a fresh marker
    /// line, dropping every managed entry.
    ///
    /// A table without the marker is the valid first-run state: the whole
    /// table is the user prefix and the marker is appended after it.
    pub fn clear_managed(&self, backup_path: &Path, marker: &str) -> CalcronResult<()> {
        let current = self.read()?;

        // Snapshot before the first destructive step, never after.
        fs::write(backup_path, &current)?;

        let mut rewritten = user_prefix(&current, marker);
        rewritten.push_str(marker);
        rewritten.push('\n');

        self.install(&rewritten)
    }

    /// Append one managed entry line to the table, below the marker. Lines
    /// above the marker are not touched.
    pub fn append_entry(&self, entry: &JobEntry) -> CalcronResult<()> {
        let script = format!(
            "printf '%s\\n' {} >> {}",
            sh_quote(&entry.to_string()),
            sh_quote(&self.location.to_string_lossy()),
        );

        self.runner.run(&script).map_err(table_mutation)?;
        Ok(())
    }

    fn read(&self) -> CalcronResult<String> {
        match fs::read_to_string(&self.location) {
            Ok(contents) => Ok(contents),
            // Missing table: nothing scheduled yet, same as an empty one.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the whole table with `contents`, staged through a temp file
    /// so the shell only ever sees a complete document.
    fn install(&self, contents: &str) -> CalcronResult<()> {
        let mut staged = NamedTempFile::new()?;
        staged.write_all(contents.as_bytes())?;
        staged.flush()?;

        let script = format!(
            "cat {} > {}",
            sh_quote(&staged.path().to_string_lossy()),
            sh_quote(&self.location.to_string_lossy()),
        );

        self.runner.run(&script).map_err(table_mutation)?;
        Ok(())
    }
}

fn table_mutation(err: CalcronError) -> CalcronError {
    CalcronError::TableMutation(err.to_string())
}

/// Lines of `table` above the first line containing `marker`, preserved
/// verbatim. The match is a literal substring search, never a pattern: a
/// marker full of `.`, `*`, `+` or `[` still only matches its exact text.
fn user_prefix(table: &str, marker: &str) -> String {
    let mut prefix = String::new();
    for line in table.lines() {
        if line.contains(marker) {
            break;
        }
        prefix.push_str(line);
        prefix.push('\n');
    }
    prefix
}
