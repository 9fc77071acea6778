use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::interpreter::Factory;
use crate::parser::ParsedCommand;
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Command that is not a builtin: a program run as a child process.
pub struct ExternalCommand {
    path: PathBuf,
    args: Vec<OsString>,
    background: bool,
}

impl ExternalCommand {
    pub fn new(path: PathBuf, args: Vec<OsString>, background: bool) -> Self {
        Self {
            path,
            args,
            background,
        }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        env: &Environment,
        program: &str,
        command: &ParsedCommand,
    ) -> Option<Box<dyn ExecutableCommand>> {
        let search_paths = env.search_path.as_deref().unwrap_or_default();
        let path = find_command_path(search_paths, Path::new(program))?;
        log::debug!("resolved {} to {}", program, path.display());
        Some(Box::new(ExternalCommand::new(
            path.into_owned(),
            command.args().iter().map(OsString::from).collect(),
            command.background(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    /// Spawns the program with inherited stdio. A foreground child is waited
    /// for; a background one is parked in `env.jobs`.
    ///
    /// Fails only when the program cannot be started.
    fn execute(self: Box<Self>, env: &mut Environment) -> Result<()> {
        let mut child = Command::new(&self.path)
            .args(&self.args)
            .spawn()
            .with_context(|| format!("cannot execute {}", self.path.display()))?;
        log::debug!("spawned {} as pid {}", self.path.display(), child.id());

        if self.background {
            env.jobs.push(child);
            env.last_status = 0;
            return Ok(());
        }

        env.last_status = match child.wait() {
            Ok(status) => exit_code(status),
            Err(e) => {
                log::warn!("cannot wait for pid {}: {}", child.id(), e);
                1
            }
        };
        Ok(())
    }
}

fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(x) => x,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it is a file.
/// - `./foo` (or any relative path on non-Unix platforms): returns it if it is a file.
/// - Relative with multiple components (e.g., `bin/sh`): returns it if it is a file.
/// - Single path component: search each directory in `search_paths` (PATH)
///   and return the first file found.
/// - Empty path: returns `None`.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| is_executable(candidate))
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if is_executable(path) { Some(path) } else { None }
}

/// Regular file with at least one execute bit set.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match path.metadata() {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
