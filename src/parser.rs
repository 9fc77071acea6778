use crate::lexer::{self, Tokens};

/// A command ready to dispatch: a non-empty argument vector plus the
/// background flag.
///
/// `argv[0]` is the program name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    argv: Vec<String>,
    background: bool,
}

impl ParsedCommand {
    /// Returns `None` when there are no arguments; such a line is a no-op.
    pub fn from_tokens(tokens: Tokens) -> Option<Self> {
        if tokens.argv.is_empty() {
            return None;
        }
        Some(Self {
            argv: tokens.argv,
            background: tokens.background,
        })
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn background(&self) -> bool {
        self.background
    }
}

/// Tokenize `line` and build a command from it.
pub fn parse(line: &str) -> Option<ParsedCommand> {
    ParsedCommand::from_tokens(lexer::split_into_tokens(line))
}
