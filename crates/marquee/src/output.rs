use std::io::{self, IsTerminal, Write};

use marquee_style::{OutputFormatter, strip_tags};

use crate::error::Result;

/// How much a message needs the user's attention; messages above the
/// output's level are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    VeryVerbose,
    Debug,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputType {
    /// Markup rendered by the formatter.
    #[default]
    Normal,
    /// Written untouched.
    Raw,
    /// Rendered, then any remaining tags stripped.
    Plain,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub kind: OutputType,
    pub verbosity: Verbosity,
}

impl WriteOptions {
    pub fn raw() -> Self {
        Self {
            kind: OutputType::Raw,
            ..Self::default()
        }
    }

    pub fn plain() -> Self {
        Self {
            kind: OutputType::Plain,
            ..Self::default()
        }
    }

    pub fn at(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            ..Self::default()
        }
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

/// A message sink. Implementors provide storage for a formatter and a
/// verbosity plus `do_write`; rendering and filtering are shared.
pub trait Output {
    fn formatter(&self) -> &OutputFormatter;

    fn formatter_mut(&mut self) -> &mut OutputFormatter;

    fn verbosity(&self) -> Verbosity;

    fn set_verbosity(&mut self, verbosity: Verbosity);

    /// Write an already rendered message.
    fn do_write(&mut self, message: &str, newline: bool) -> Result<()>;

    fn set_formatter(&mut self, formatter: OutputFormatter) {
        *self.formatter_mut() = formatter;
    }

    fn is_decorated(&self) -> bool {
        self.formatter().is_decorated()
    }

    fn set_decorated(&mut self, decorated: bool) {
        self.formatter_mut().set_decorated(decorated);
    }

    fn is_quiet(&self) -> bool {
        self.verbosity() == Verbosity::Quiet
    }

    fn is_verbose(&self) -> bool {
        self.verbosity() >= Verbosity::Verbose
    }

    fn is_very_verbose(&self) -> bool {
        self.verbosity() >= Verbosity::VeryVerbose
    }

    fn is_debug(&self) -> bool {
        self.verbosity() >= Verbosity::Debug
    }

    fn write(&mut self, message: &str) -> Result<()> {
        self.write_with(message, false, WriteOptions::default())
    }

    fn writeln(&mut self, message: &str) -> Result<()> {
        self.write_with(message, true, WriteOptions::default())
    }

    fn write_with(&mut self, message: &str, newline: bool, options: WriteOptions) -> Result<()> {
        if options.verbosity > self.verbosity() {
            return Ok(());
        }
        let rendered = match options.kind {
            OutputType::Normal => self.formatter().format(message),
            OutputType::Raw => message.to_string(),
            OutputType::Plain => strip_tags(&self.formatter().format(message)),
        };
        self.do_write(&rendered, newline)
    }
}

/// Output to any `io::Write`, flushed after every message.
#[derive(Debug)]
pub struct StreamOutput<W> {
    stream: W,
    verbosity: Verbosity,
    formatter: OutputFormatter,
}

impl<W: Write> StreamOutput<W> {
    pub fn new(stream: W, verbosity: Verbosity, decorated: bool) -> Self {
        Self::with_formatter(stream, verbosity, OutputFormatter::new(decorated))
    }

    pub fn with_formatter(stream: W, verbosity: Verbosity, formatter: OutputFormatter) -> Self {
        Self {
            stream,
            verbosity,
            formatter,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.stream
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.stream
    }

    pub fn into_inner(self) -> W {
        self.stream
    }
}

impl StreamOutput<io::Stdout> {
    /// Standard output, decorated when it is a terminal.
    pub fn stdout() -> Self {
        let stream = io::stdout();
        let decorated = stream.is_terminal();
        Self::new(stream, Verbosity::Normal, decorated)
    }
}

impl StreamOutput<io::Stderr> {
    /// Standard error, decorated when it is a terminal.
    pub fn stderr() -> Self {
        let stream = io::stderr();
        let decorated = stream.is_terminal();
        Self::new(stream, Verbosity::Normal, decorated)
    }
}

impl<W: Write> Output for StreamOutput<W> {
    fn formatter(&self) -> &OutputFormatter {
        &self.formatter
    }

    fn formatter_mut(&mut self) -> &mut OutputFormatter {
        &mut self.formatter
    }

    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    fn do_write(&mut self, message: &str, newline: bool) -> Result<()> {
        self.stream.write_all(message.as_bytes())?;
        if newline {
            self.stream.write_all(b"\n")?;
        }
        self.stream.flush()?;
        Ok(())
    }
}

/// Standard output paired with a separate error stream.
///
/// Decoration, verbosity and formatter changes apply to both streams.
#[derive(Debug)]
pub struct ConsoleOutput<O = io::Stdout, E = io::Stderr> {
    stdout: StreamOutput<O>,
    stderr: StreamOutput<E>,
}

impl ConsoleOutput {
    /// Process stdout/stderr. With `decorated` unset, decoration is enabled
    /// only when both are terminals.
    pub fn new(verbosity: Verbosity, decorated: Option<bool>) -> Self {
        let decorated =
            decorated.unwrap_or_else(|| io::stdout().is_terminal() && io::stderr().is_terminal());
        Self::from_streams(io::stdout(), io::stderr(), verbosity, decorated)
    }
}

impl<O: Write, E: Write> ConsoleOutput<O, E> {
    pub fn from_streams(stdout: O, stderr: E, verbosity: Verbosity, decorated: bool) -> Self {
        Self {
            stdout: StreamOutput::new(stdout, verbosity, decorated),
            stderr: StreamOutput::new(stderr, verbosity, decorated),
        }
    }

    pub fn error_output(&mut self) -> &mut StreamOutput<E> {
        &mut self.stderr
    }

    pub fn into_streams(self) -> (O, E) {
        (self.stdout.into_inner(), self.stderr.into_inner())
    }
}

impl<O: Write, E: Write> Output for ConsoleOutput<O, E> {
    fn formatter(&self) -> &OutputFormatter {
        self.stdout.formatter()
    }

    fn formatter_mut(&mut self) -> &mut OutputFormatter {
        self.stdout.formatter_mut()
    }

    fn verbosity(&self) -> Verbosity {
        self.stdout.verbosity()
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.stdout.set_verbosity(verbosity);
        self.stderr.set_verbosity(verbosity);
    }

    fn set_formatter(&mut self, formatter: OutputFormatter) {
        self.stderr.set_formatter(formatter.clone());
        self.stdout.set_formatter(formatter);
    }

    fn set_decorated(&mut self, decorated: bool) {
        self.stdout.set_decorated(decorated);
        self.stderr.set_decorated(decorated);
    }

    fn do_write(&mut self, message: &str, newline: bool) -> Result<()> {
        self.stdout.do_write(message, newline)
    }
}

/// Collects rendered output in memory.
#[derive(Debug, Default)]
pub struct BufferedOutput {
    buffer: String,
    verbosity: Verbosity,
    formatter: OutputFormatter,
}

impl BufferedOutput {
    pub fn new(verbosity: Verbosity, decorated: bool) -> Self {
        Self {
            buffer: String::new(),
            verbosity,
            formatter: OutputFormatter::new(decorated),
        }
    }

    /// Take everything written so far, leaving the buffer empty.
    pub fn fetch(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    pub fn contents(&self) -> &str {
        &self.buffer
    }
}

impl Output for BufferedOutput {
    fn formatter(&self) -> &OutputFormatter {
        &self.formatter
    }

    fn formatter_mut(&mut self) -> &mut OutputFormatter {
        &mut self.formatter
    }

    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    fn do_write(&mut self, message: &str, newline: bool) -> Result<()> {
        self.buffer.push_str(message);
        if newline {
            self.buffer.push('\n');
        }
        Ok(())
    }
}

/// Discards everything. Always quiet and never decorated.
#[derive(Debug, Default)]
pub struct NullOutput {
    formatter: OutputFormatter,
}

impl NullOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Output for NullOutput {
    fn formatter(&self) -> &OutputFormatter {
        &self.formatter
    }

    fn formatter_mut(&mut self) -> &mut OutputFormatter {
        &mut self.formatter
    }

    fn verbosity(&self) -> Verbosity {
        Verbosity::Quiet
    }

    fn set_verbosity(&mut self, _verbosity: Verbosity) {}

    fn set_formatter(&mut self, _formatter: OutputFormatter) {}

    fn is_decorated(&self) -> bool {
        false
    }

    fn set_decorated(&mut self, _decorated: bool) {}

    fn do_write(&mut self, _message: &str, _newline: bool) -> Result<()> {
        Ok(())
    }

    fn write_with(&mut self, _message: &str, _newline: bool, _options: WriteOptions) -> Result<()> {
        Ok(())
    }
}
