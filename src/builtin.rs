use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::interpreter::Factory;
use crate::parser::ParsedCommand;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::io::Write;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "exit".
    fn name() -> &'static str;

    /// When set, arguments are dropped before parsing, `--help` included.
    const IGNORES_ARGS: bool = false;

    /// Executes the command against the session.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, env: &mut Environment) -> Result<()> {
        env.last_status = match <T as BuiltinCommand>::execute(*self, env) {
            Ok(code) => code,
            Err(e) => {
                writeln!(env.out, "{}", e)?;
                1
            }
        };
        Ok(())
    }
}

struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, env: &mut Environment) -> Result<()> {
        env.out.write_all(self.output.as_bytes())?;
        env.out.write_all(b"\n")?;
        env.last_status = if self.is_error { 1 } else { 0 };
        Ok(())
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        program: &str,
        command: &ParsedCommand,
    ) -> Option<Box<dyn ExecutableCommand>> {
        if program != T::name() {
            return None;
        }
        let args: Vec<&str> = if T::IGNORES_ARGS {
            Vec::new()
        } else {
            command.args().iter().map(String::as_str).collect()
        };
        Some(match T::from_args(&[program], &args) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

#[derive(FromArgs)]
/// Leave the shell.
pub struct Exit {}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    const IGNORES_ARGS: bool = true;

    fn execute(self, env: &mut Environment) -> Result<ExitCode> {
        log::debug!("exit requested");
        env.should_exit = true;
        Ok(0)
    }
}
