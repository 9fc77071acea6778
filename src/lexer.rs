//! A module implementing lexical analysis (tokenization) of one input line.
//!
//! Spaces and tabs separate arguments, a newline ends the line and a `&`
//! anywhere in an argument marks the command for background execution. The
//! `&` also cuts the argument it appears in: everything from the `&` up to the
//! next separator is dropped, so `ab&cd` yields `ab` and a lone `&` yields
//! nothing at all.

/// Result of splitting one line.
///
/// `argv` holds the arguments in order; its length is the end-of-arguments
/// marker, so an empty `argv` means the line had nothing to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    pub argv: Vec<String>,
    pub background: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Start,
    ReadingWord,
    // Inside an argument after its `&`; characters are dropped until a separator.
    SkippingTail,
}

struct LexingFSM<'a> {
    input: std::str::Chars<'a>,
    state: LexingState,
    buffer: String,
    tokens: Tokens,
}

impl<'a> LexingFSM<'a> {
    /// Creates a new instance of the lexical analysis Finite State Machine.
    fn new(line: &'a str) -> Self {
        LexingFSM {
            input: line.chars(),
            state: LexingState::Start,
            buffer: String::new(),
            tokens: Tokens::default(),
        }
    }

    /// Consumes the line up to its first newline (or its end) and returns
    /// the collected arguments.
    fn make_tokens(mut self) -> Tokens {
        while let Some(ch) = self.input.next() {
            if ch == '\n' {
                break;
            }
            match self.state {
                LexingState::Start => self.handle_start(ch),
                LexingState::ReadingWord => self.handle_word(ch),
                LexingState::SkippingTail => self.handle_tail(ch),
            }
        }
        self.finish_word();
        self.tokens
    }

    fn handle_start(&mut self, ch: char) {
        match ch {
            ' ' | '\t' => {}
            '&' => self.mark_background(),
            c => {
                self.buffer.push(c);
                self.state = LexingState::ReadingWord;
            }
        }
    }

    fn handle_word(&mut self, ch: char) {
        match ch {
            ' ' | '\t' => self.finish_word(),
            '&' => self.mark_background(),
            c => self.buffer.push(c),
        }
    }

    fn handle_tail(&mut self, ch: char) {
        match ch {
            ' ' | '\t' => self.finish_word(),
            '&' => self.tokens.background = true,
            _ => {}
        }
    }

    fn mark_background(&mut self) {
        self.tokens.background = true;
        self.state = LexingState::SkippingTail;
    }

    /// Push the pending argument, if any, and go back to skipping separators.
    /// An argument cut down to nothing by its `&` is not pushed.
    fn finish_word(&mut self) {
        if !self.buffer.is_empty() {
            self.tokens.argv.push(std::mem::take(&mut self.buffer));
        }
        self.state = LexingState::Start;
    }
}

/// The main entry point function to perform lexical analysis.
///
/// Never fails: any line, including an empty one, yields a (possibly empty)
/// argument list.
pub fn split_into_tokens(line: &str) -> Tokens {
    let tokens = LexingFSM::new(line).make_tokens();
    log::debug!("tokens = {:?}", tokens);
    tokens
}
