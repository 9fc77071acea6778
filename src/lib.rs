//! A small "do what I mean" interactive shell.
//!
//! The shell reads one line at a time, splits it into arguments and runs the
//! named program as a child process, either waiting for it or leaving it in the
//! background when the line carries a `&`. When a program cannot be started the
//! shell looks for the closest executable name in a [`index::CommandIndex`] and
//! offers to run that instead.
//!
//! The main entry point is [`Interpreter`], which owns the session state and runs
//! the read-dispatch loop. The public modules expose the pieces it is built from
//! so they can be driven directly, e.g. from tests with scripted input.

mod builtin;
pub mod command;
pub mod env;
mod external;
pub mod index;
pub mod input;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod parser;
pub mod presentation;
pub mod signal;
pub mod suggest;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;
