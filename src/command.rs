use crate::env::Environment;
use crate::parser::ParsedCommand;
use anyhow::Result;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Why the shell is terminating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// The `exit` builtin was entered.
    Exit,
    /// Standard input reached end-of-file.
    EndOfInput,
    /// The interrupt signal (Ctrl-C) was received.
    Interrupted,
}

/// What the dispatch loop should do after handling one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Print the next prompt.
    Continue,
    /// Run the shutdown sequence and leave the loop.
    Shutdown(Shutdown),
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
/// An `Err` from an external command means the program could not be started;
/// the interpreter then falls back to suggesting a similar command.
pub trait ExecutableCommand {
    /// Executes the command, recording its status in `env.last_status`.
    fn execute(self: Box<Self>, env: &mut Environment) -> Result<()>;
}

/// Factory that tries to create a command from a parsed line.
///
/// Returns `None` when the factory doesn't recognize the program name.
/// Implementations can use the environment to resolve executables (e.g., using PATH).
pub trait CommandFactory {
    /// Attempt to create a command instance for `command`, running `program`
    /// in place of `command.program()`.
    fn try_create(
        &self,
        env: &Environment,
        program: &str,
        command: &ParsedCommand,
    ) -> Option<Box<dyn ExecutableCommand>>;
}
