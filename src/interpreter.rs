use crate::command::{CommandFactory, Flow, Shutdown};
use crate::env::{Environment, ShellConfig};
use crate::input::{EditorInput, Input, LineSource, StreamInput, truncate_line};
use crate::parser::{self, ParsedCommand};
use crate::presentation::{Banner, Presentation, Quiet};
use crate::signal::Interrupt;
use crate::suggest;
use anyhow::Result;
use std::io::{self, IsTerminal, Write};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate: BuiltinCommand and ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// Answers accepted by the "did you mean" question.
const AFFIRMATIVE: [char; 4] = ['y', 'Y', 's', 'S'];

enum Answer {
    Yes,
    No,
    Interrupted,
}

/// The interactive shell: prompts, reads a line, runs it, repeats.
///
/// The interpreter owns the session [`Environment`], the [`LineSource`] lines
/// come from, and an ordered list of [`CommandFactory`] objects queried to
/// create commands by name (the `exit` builtin, then external programs).
///
/// Example
/// ```
/// use dwimsh::Interpreter;
/// use dwimsh::command::Shutdown;
/// use dwimsh::env::{Environment, ShellConfig};
/// use dwimsh::index::CommandIndex;
/// use dwimsh::input::StreamInput;
/// use std::io::{self, Cursor};
///
/// let env = Environment::with_index(CommandIndex::default(), Box::new(io::sink()));
/// let input = StreamInput::new(Cursor::new("\nexit\n"), io::sink());
/// let mut sh = Interpreter::new(ShellConfig::default(), env, Box::new(input));
/// assert_eq!(sh.repl().unwrap(), Shutdown::Exit);
/// ```
pub struct Interpreter {
    config: ShellConfig,
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
    input: Box<dyn LineSource>,
    presentation: Box<dyn Presentation>,
    interrupt: Interrupt,
}

impl Interpreter {
    /// Create an interpreter with the default commands, no banners and an
    /// interrupt flag nobody raises until [`Interrupt::install`] is called.
    pub fn new(config: ShellConfig, env: Environment, input: Box<dyn LineSource>) -> Self {
        use crate::builtin::Exit;
        use crate::external::ExternalCommand;
        Self {
            config,
            env,
            commands: vec![
                Box::new(Factory::<Exit>::default()),
                Box::new(Factory::<ExternalCommand>::default()),
            ],
            input,
            presentation: Box::new(Quiet),
            interrupt: Interrupt::new(),
        }
    }

    /// The shell as started from a terminal: index built from the binary
    /// directory, banners on stdout, and line editing when stdin is a tty.
    pub fn interactive() -> Result<Self> {
        let config = ShellConfig::default();
        let env = Environment::new(&config, Box::new(io::stdout()));
        let interrupt = Interrupt::new();
        let input: Box<dyn LineSource> = if io::stdin().is_terminal() {
            Box::new(EditorInput::new()?)
        } else {
            Box::new(
                StreamInput::new(io::stdin().lock(), io::stdout())
                    .with_interrupt(interrupt.clone()),
            )
        };
        Ok(Self::new(config, env, input)
            .with_presentation(Box::new(Banner))
            .with_interrupt(interrupt))
    }

    pub fn with_presentation(mut self, presentation: Box<dyn Presentation>) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Rescan the binary directory for suggestion candidates.
    pub fn reload_index(&mut self) {
        self.env.index.rebuild(&self.config.bin_dir);
    }

    /// Run until `exit`, end of input or an interrupt, then show the
    /// shutdown presentation.
    ///
    /// Returns `Err` only for a read error other than an interrupted read.
    pub fn repl(&mut self) -> Result<Shutdown> {
        self.presentation.startup(&mut self.env.out)?;
        let reason = loop {
            if let Flow::Shutdown(reason) = self.step()? {
                break reason;
            }
        };
        self.shutdown(reason)?;
        Ok(reason)
    }

    /// One prompt-read-dispatch iteration.
    pub fn step(&mut self) -> Result<Flow> {
        self.env.reap_jobs();
        if self.interrupt.is_raised() {
            return Ok(Flow::Shutdown(Shutdown::Interrupted));
        }

        let mut line = match self.input.read_line(&self.config.prompt)? {
            Input::Line(line) => line,
            Input::Eof => return Ok(Flow::Shutdown(Shutdown::EndOfInput)),
            Input::Interrupted => return Ok(Flow::Shutdown(Shutdown::Interrupted)),
        };
        if self.interrupt.is_raised() {
            return Ok(Flow::Shutdown(Shutdown::Interrupted));
        }

        truncate_line(&mut line, self.config.max_line);
        self.run_line(&line)
    }

    /// Parse and run one line. Blank lines do nothing.
    pub fn run_line(&mut self, line: &str) -> Result<Flow> {
        let Some(command) = parser::parse(line) else {
            return Ok(Flow::Continue);
        };
        let flow = self.dispatch(&command)?;
        if self.interrupt.is_raised() {
            return Ok(Flow::Shutdown(Shutdown::Interrupted));
        }
        Ok(flow)
    }

    fn dispatch(&mut self, command: &ParsedCommand) -> Result<Flow> {
        if self.launch(command.program(), command) {
            return Ok(self.after_command());
        }
        self.recover(command)
    }

    /// Create and execute `program` with the arguments of `command`.
    ///
    /// Returns `false` when no factory knows the name or it could not be started.
    fn launch(&mut self, program: &str, command: &ParsedCommand) -> bool {
        let created = self
            .commands
            .iter()
            .find_map(|factory| factory.try_create(&self.env, program, command));
        let Some(cmd) = created else {
            log::debug!("{}: not found", program);
            return false;
        };
        match cmd.execute(&mut self.env) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("{:#}", e);
                false
            }
        }
    }

    fn after_command(&self) -> Flow {
        if self.env.should_exit {
            Flow::Shutdown(Shutdown::Exit)
        } else {
            Flow::Continue
        }
    }

    /// The program could not be started: offer the closest indexed name and
    /// run it with the same arguments if the user agrees.
    fn recover(&mut self, command: &ParsedCommand) -> Result<Flow> {
        if let Some(suggestion) = suggest::closest(command.program(), &self.env.index) {
            writeln!(self.env.out, "Quisiste decir \"{}\"? [s/n]", suggestion)?;
            self.env.out.flush()?;
            match self.confirm()? {
                Answer::Yes if self.launch(&suggestion, command) => {
                    return Ok(self.after_command());
                }
                Answer::Interrupted => return Ok(Flow::Shutdown(Shutdown::Interrupted)),
                Answer::Yes | Answer::No => {}
            }
        }
        writeln!(self.env.out, "Comando no encontrado")?;
        self.env.out.flush()?;
        self.env.last_status = 1;
        Ok(Flow::Continue)
    }

    /// Read the first non-blank character of the answer. Blank lines are
    /// skipped; end of input counts as no.
    fn confirm(&mut self) -> Result<Answer> {
        loop {
            let line = match self.input.read_answer("")? {
                Input::Line(line) => line,
                Input::Eof => return Ok(Answer::No),
                Input::Interrupted => return Ok(Answer::Interrupted),
            };
            if let Some(c) = line.chars().find(|c| !c.is_whitespace()) {
                return Ok(if AFFIRMATIVE.contains(&c) {
                    Answer::Yes
                } else {
                    Answer::No
                });
            }
        }
    }

    fn shutdown(&mut self, reason: Shutdown) -> Result<()> {
        log::info!("shutting down: {:?}", reason);
        if reason == Shutdown::Interrupted {
            writeln!(self.env.out)?;
        }
        self.presentation.shutdown(&mut self.env.out)?;
        Ok(())
    }
}
