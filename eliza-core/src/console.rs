//! The line-oriented seam between a conversation and its user.

use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Write};

/// Read and write one line of text at a time
pub trait Console {
    /// Next input line without its line ending; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>>;

    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Console over any buffered reader and writer
pub struct IoConsole<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> IoConsole<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> Console for IoConsole<R, W> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }
}

/// The process's stdin and stdout
pub type StdConsole = IoConsole<io::StdinLock<'static>, io::Stdout>;

impl StdConsole {
    pub fn stdio() -> Self {
        IoConsole::new(io::stdin().lock(), io::stdout())
    }
}

/// Serves queued lines first, echoing each as it is consumed, then defers
/// to an optional fallback console. Without a fallback, writes are kept in
/// memory and input ends when the queue is empty.
pub struct ScriptedConsole {
    queued: VecDeque<String>,
    echo: bool,
    fallback: Option<Box<dyn Console>>,
    written: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queued: lines.into_iter().map(Into::into).collect(),
            echo: false,
            fallback: None,
            written: Vec::new(),
        }
    }

    /// Write each queued line back out as it is read
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Continue with `console` once the queue runs dry
    pub fn with_fallback(mut self, console: impl Console + 'static) -> Self {
        self.fallback = Some(Box::new(console));
        self
    }

    /// Lines written while no fallback was attached
    pub fn written(&self) -> &[String] {
        &self.written
    }

    pub fn remaining(&self) -> usize {
        self.queued.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.queued.pop_front() {
            if self.echo {
                self.write_line(&line)?;
            }
            return Ok(Some(line));
        }
        match &mut self.fallback {
            Some(console) => console.read_line(),
            None => Ok(None),
        }
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match &mut self.fallback {
            Some(console) => console.write_line(line),
            None => {
                self.written.push(line.to_string());
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptLine {
    pub direction: Direction,
    pub text: String,
}

/// Every line a session read and wrote, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    lines: Vec<TranscriptLine>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_input(&mut self, text: impl Into<String>) {
        self.push(Direction::Input, text.into());
    }

    pub fn record_output(&mut self, text: impl Into<String>) {
        self.push(Direction::Output, text.into());
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    /// Just the replies
    pub fn outputs(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| l.direction == Direction::Output)
            .map(|l| l.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn push(&mut self, direction: Direction, text: String) {
        self.lines.push(TranscriptLine { direction, text });
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            let marker = match line.direction {
                Direction::Input => '<',
                Direction::Output => '>',
            };
            writeln!(f, "{marker} {}", line.text)?;
        }
        Ok(())
    }
}
