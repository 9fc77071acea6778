//! Where the dispatch loop gets its lines from.

use crate::env::MAX_LINE;
use crate::signal::Interrupt;
use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, ErrorKind, Write};

/// Outcome of one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// End of input (Ctrl-D or a closed stream).
    Eof,
    /// Ctrl-C while the line was being edited or read.
    Interrupted,
}

/// A source of input lines, each preceded by a prompt.
///
/// Implementations retry reads interrupted by a signal other than Ctrl-C;
/// any other IO error is returned and ends the shell.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input>;

    /// Read a reply to a question. Unlike commands, replies are not kept
    /// in any history.
    fn read_answer(&mut self, prompt: &str) -> Result<Input> {
        self.read_line(prompt)
    }
}

/// Interactive line editing backed by [`rustyline`].
///
/// Accepted command lines go to the editor's in-memory history.
pub struct EditorInput {
    editor: DefaultEditor,
}

impl EditorInput {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("cannot initialize line editor")?;
        Ok(Self { editor })
    }

    fn read(&mut self, prompt: &str, remember: bool) -> Result<Input> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if remember && !line.trim().is_empty() {
                        self.editor.add_history_entry(line.as_str())?;
                    }
                    return Ok(Input::Line(line));
                }
                Err(ReadlineError::Interrupted) => return Ok(Input::Interrupted),
                Err(ReadlineError::Eof) => return Ok(Input::Eof),
                Err(ReadlineError::Io(e)) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl LineSource for EditorInput {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        self.read(prompt, true)
    }

    fn read_answer(&mut self, prompt: &str) -> Result<Input> {
        self.read(prompt, false)
    }
}

/// Plain buffered reading: writes the prompt to `out` and reads up to the
/// next newline from `reader`.
///
/// At most `limit` bytes of a line are kept; the rest of it is consumed and
/// dropped. A read interrupted by a signal is retried unless the
/// [`Interrupt`] flag is raised, in which case it yields
/// [`Input::Interrupted`].
///
/// Used when standard input is not a terminal, and by tests.
pub struct StreamInput<R, W> {
    reader: R,
    out: W,
    limit: usize,
    interrupt: Interrupt,
}

impl<R: BufRead, W: Write> StreamInput<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self {
            reader,
            out,
            limit: MAX_LINE,
            interrupt: Interrupt::new(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }
}

impl<R: BufRead, W: Write> LineSource for StreamInput<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        self.out.write_all(prompt.as_bytes())?;
        self.out.flush()?;

        let mut line = Vec::new();
        let mut read_any = false;
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == ErrorKind::Interrupted => {
                    if self.interrupt.is_raised() {
                        return Ok(Input::Interrupted);
                    }
                    continue;
                }
                Err(e) => return Err(e).context("cannot read standard input"),
            };
            if available.is_empty() {
                break;
            }
            read_any = true;

            let (used, complete) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            };
            let room = self.limit.saturating_sub(line.len());
            line.extend_from_slice(&available[..used.min(room)]);
            self.reader.consume(used);
            if complete {
                break;
            }
        }

        if !read_any {
            return Ok(Input::Eof);
        }
        Ok(Input::Line(String::from_utf8_lossy(&line).into_owned()))
    }
}

/// Cut `line` to at most `max` bytes, backing off to a char boundary.
pub fn truncate_line(line: &mut String, max: usize) {
    if line.len() <= max {
        return;
    }
    let mut end = max;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    log::debug!("line truncated from {} to {} bytes", line.len(), end);
    line.truncate(end);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_adapters::MemWriter;
    use std::io::{self, Cursor, Read};

    #[test]
    fn test_stream_input_reads_lines_then_eof() {
        let out = MemWriter::new();
        let mut input = StreamInput::new(Cursor::new("ls -l\ndate"), out.clone());

        assert_eq!(input.read_line("> ").unwrap(), Input::Line("ls -l\n".to_string()));
        assert_eq!(input.read_line("> ").unwrap(), Input::Line("date".to_string()));
        assert_eq!(input.read_line("> ").unwrap(), Input::Eof);
        assert_eq!(out.contents(), "> > > ");
    }

    struct Flaky {
        interrupts_left: usize,
        inner: Cursor<&'static str>,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.interrupts_left > 0 {
                self.interrupts_left -= 1;
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let reader = io::BufReader::new(Flaky {
            interrupts_left: 2,
            inner: Cursor::new("exit\n"),
        });
        let mut input = StreamInput::new(reader, io::sink());
        assert_eq!(input.read_line("").unwrap(), Input::Line("exit\n".to_string()));
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device gone"))
        }
    }

    #[test]
    fn test_other_read_errors_are_returned() {
        let mut input = StreamInput::new(io::BufReader::new(Broken), io::sink());
        assert!(input.read_line("").is_err());
    }

    struct CtrlCDuringRead {
        irq: Interrupt,
    }

    impl Read for CtrlCDuringRead {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            self.irq.raise();
            Err(io::Error::from(ErrorKind::Interrupted))
        }
    }

    #[test]
    fn test_interrupted_read_with_flag_raised_gives_up() {
        let irq = Interrupt::new();
        let reader = io::BufReader::new(CtrlCDuringRead { irq: irq.clone() });
        let mut input = StreamInput::new(reader, io::sink()).with_interrupt(irq);
        assert_eq!(input.read_line("").unwrap(), Input::Interrupted);
    }

    #[test]
    fn test_long_line_is_bounded_and_rest_dropped() {
        let flood = "a".repeat(10_000);
        let script = format!("{}\nexit\n", flood);
        let mut input = StreamInput::new(Cursor::new(script), io::sink()).with_limit(80);

        assert_eq!(input.read_line("").unwrap(), Input::Line("a".repeat(80)));
        assert_eq!(input.read_line("").unwrap(), Input::Line("exit\n".to_string()));
        assert_eq!(input.read_line("").unwrap(), Input::Eof);
    }

    #[test]
    fn test_unterminated_flood_stays_bounded() {
        let reader = io::BufReader::new(io::repeat(b'x').take(1 << 20));
        let mut input = StreamInput::new(reader, io::sink()).with_limit(16);
        assert_eq!(input.read_line("").unwrap(), Input::Line("x".repeat(16)));
        assert_eq!(input.read_line("").unwrap(), Input::Eof);
    }

    #[test]
    fn test_truncate_line_respects_limit_and_char_boundaries() {
        let mut ascii = "a".repeat(100);
        truncate_line(&mut ascii, 80);
        assert_eq!(ascii.len(), 80);

        let mut short = "ls\n".to_string();
        truncate_line(&mut short, 80);
        assert_eq!(short, "ls\n");

        // 'ñ' is two bytes; byte 3 falls inside it.
        let mut wide = "abñd".to_string();
        truncate_line(&mut wide, 3);
        assert_eq!(wide, "ab");
    }
}
