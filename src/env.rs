use crate::command::ExitCode;
use crate::index::CommandIndex;
use std::env as stdenv;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Child, ExitStatus};

/// Prompt printed before every line.
pub const PROMPT: &str = "dwimsh> ";
/// Directory scanned for command names at startup.
pub const BIN_DIR: &str = "/usr/bin";
/// Longest line, in bytes, the shell reads in one go.
pub const MAX_LINE: usize = 80;

/// Fixed shell settings. There are no flags or config files; every value is
/// a compile-time constant collected here so the loop can be built against
/// other values in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    pub bin_dir: PathBuf,
    pub max_line: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: PROMPT.to_string(),
            bin_dir: PathBuf::from(BIN_DIR),
            max_line: MAX_LINE,
        }
    }
}

/// Process-wide session state handed to every command.
///
/// The environment contains:
/// - `index`: names offered as suggestions when a command cannot be started.
/// - `search_path`: the PATH captured at startup, used to resolve programs.
/// - `out`: where the shell writes its own messages.
/// - `jobs`: background children that have not been reaped yet.
/// - `last_status`: exit code of the last foreground command.
/// - `should_exit`: set by the `exit` builtin.
pub struct Environment {
    pub index: CommandIndex,
    pub search_path: Option<OsString>,
    pub out: Box<dyn Write>,
    pub jobs: Vec<Child>,
    pub last_status: ExitCode,
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current process state into a new `Environment`.
    ///
    /// Scans `config.bin_dir` for the command index and copies PATH from
    /// `std::env`. An unreadable directory leaves the index empty.
    pub fn new(config: &ShellConfig, out: Box<dyn Write>) -> Self {
        Self::with_index(CommandIndex::build(&config.bin_dir), out)
    }

    /// Like [`Environment::new`] but with a ready-made index.
    pub fn with_index(index: CommandIndex, out: Box<dyn Write>) -> Self {
        Self {
            index,
            search_path: stdenv::var_os("PATH"),
            out,
            jobs: Vec::new(),
            last_status: 0,
            should_exit: false,
        }
    }

    /// Reap background children that have already terminated.
    ///
    /// Never blocks; children still running stay in `jobs`.
    pub fn reap_jobs(&mut self) {
        self.jobs.retain_mut(|child| keep_job(child.id(), child.try_wait()));
    }
}

/// Whether a background job stays tracked after polling it. A job that
/// cannot be polled is kept so it is tried again on the next iteration.
fn keep_job(id: u32, polled: io::Result<Option<ExitStatus>>) -> bool {
    match polled {
        Ok(Some(status)) => {
            log::debug!("reaped background job {} ({})", id, status);
            false
        }
        Ok(None) => true,
        Err(e) => {
            log::warn!("cannot poll background job {}: {}", id, e);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_default_config_uses_build_constants() {
        let config = ShellConfig::default();
        assert_eq!(config.prompt, "dwimsh> ");
        assert_eq!(config.bin_dir, PathBuf::from("/usr/bin"));
        assert_eq!(config.max_line, 80);
    }

    #[test]
    fn test_env_reads_path_from_process_env() {
        let env = Environment::with_index(CommandIndex::default(), Box::new(io::sink()));
        assert!(env.search_path.is_some());
        assert_eq!(env.last_status, 0);
        assert!(!env.should_exit);
    }

    #[test]
    fn test_env_missing_bin_dir_yields_empty_index() {
        let config = ShellConfig {
            bin_dir: PathBuf::from("/definitely/not/a/dir"),
            ..ShellConfig::default()
        };
        let env = Environment::new(&config, Box::new(io::sink()));
        assert!(env.index.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_reap_jobs_drops_finished_children() {
        let mut env = Environment::with_index(CommandIndex::default(), Box::new(io::sink()));
        env.jobs.push(Command::new("true").spawn().unwrap());
        env.jobs.push(Command::new("sleep").arg("5").spawn().unwrap());

        let mut finished = false;
        for _ in 0..50 {
            env.reap_jobs();
            if env.jobs.len() == 1 {
                finished = true;
                break;
            }
            thread::sleep(Duration::from_millis(20));
        }
        assert!(finished, "`true` should have been reaped");

        for mut child in env.jobs.drain(..) {
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    #[test]
    fn test_job_that_cannot_be_polled_is_kept() {
        assert!(keep_job(42, Err(io::Error::other("poll failed"))));
        assert!(keep_job(42, Ok(None)));
    }
}
