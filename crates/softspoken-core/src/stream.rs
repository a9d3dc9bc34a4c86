//! Output streams.
//!
//! The writer talks to an [`OutputStream`]: plain text plus the two cursor
//! operations needed to redraw a line in place. [`Console`] targets the
//! process's stdout or stderr; [`MemoryStream`] records everything in memory
//! and emulates a simple line screen for tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossterm::cursor::MoveToColumn;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{Command, QueueableCommand};

use crate::primitives::render_screen;

/// Destination for formatted output.
pub trait OutputStream: Send {
    fn write_str(&mut self, text: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// Whether the cursor can be moved within the current line. Without it,
    /// spinners do not animate.
    fn supports_cursor(&self) -> bool;

    /// Move to a zero-based column on the current line.
    fn move_to_column(&mut self, column: usize) -> io::Result<()>;

    /// Erase from the cursor to the end of the current line.
    fn clear_line_right(&mut self) -> io::Result<()>;

    /// Width of the attached terminal, if any.
    fn columns(&self) -> Option<usize>;

    fn is_terminal(&self) -> bool;
}

// ============================================================================
// Console
// ============================================================================

/// Which standard stream a [`Console`] writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Stdout,
    Stderr,
}

/// A standard output stream. Terminal capabilities are detected once, at
/// construction.
#[derive(Debug, Clone)]
pub struct Console {
    target: Target,
    terminal: bool,
}

impl Console {
    pub fn stdout() -> Self {
        Self::new(Target::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(Target::Stderr)
    }

    fn new(target: Target) -> Self {
        let terminal = match target {
            Target::Stdout => atty::is(atty::Stream::Stdout),
            Target::Stderr => atty::is(atty::Stream::Stderr),
        };
        Self { target, terminal }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    fn with_handle(&self, f: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> io::Result<()> {
        match self.target {
            Target::Stdout => f(&mut io::stdout().lock()),
            Target::Stderr => f(&mut io::stderr().lock()),
        }
    }
}

impl OutputStream for Console {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.with_handle(|out| out.write_all(text.as_bytes()))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_handle(|out| out.flush())
    }

    fn supports_cursor(&self) -> bool {
        self.terminal
    }

    fn move_to_column(&mut self, column: usize) -> io::Result<()> {
        self.with_handle(|out| {
            out.queue(MoveToColumn(to_u16(column)))?;
            Ok(())
        })
    }

    fn clear_line_right(&mut self) -> io::Result<()> {
        self.with_handle(|out| {
            out.queue(Clear(ClearType::UntilNewLine))?;
            Ok(())
        })
    }

    fn columns(&self) -> Option<usize> {
        if !self.terminal {
            return None;
        }
        let size = match self.target {
            Target::Stdout => terminal_size::terminal_size_of(io::stdout()),
            Target::Stderr => terminal_size::terminal_size_of(io::stderr()),
        };
        size.map(|(w, _)| w.0 as usize)
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }
}

/// Cursor columns beyond what crossterm can address are clamped.
fn to_u16(column: usize) -> u16 {
    u16::try_from(column).unwrap_or(u16::MAX)
}

// ============================================================================
// MemoryStream
// ============================================================================

/// Everything written to a [`MemoryStream`].
#[derive(Debug, Default)]
struct Transcript {
    raw: String,
    flushes: usize,
    /// Rightmost column a cursor move has targeted.
    widest_move: usize,
}

/// In-memory stream that records raw output and shows it through a `vt100`
/// terminal emulator.
///
/// Clones share the same buffer, so a test can hand one clone to a writer and
/// inspect the other. Screen columns are display columns: wide characters
/// take two.
///
/// # Example
///
/// ```
/// use softspoken_core::stream::{MemoryStream, OutputStream};
///
/// let mut stream = MemoryStream::new();
/// stream.write_str("hello world").unwrap();
/// stream.move_to_column(5).unwrap();
/// stream.clear_line_right().unwrap();
/// stream.write_str("!\n").unwrap();
/// assert_eq!(stream.contents(), "hello!\n");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStream {
    transcript: Arc<Mutex<Transcript>>,
    cursor: bool,
    columns: Option<usize>,
}

impl MemoryStream {
    /// A cursor-capable stream with no detected width.
    pub fn new() -> Self {
        Self {
            transcript: Arc::default(),
            cursor: true,
            columns: None,
        }
    }

    /// Behave like a pipe: no cursor movement.
    pub fn without_cursor(mut self) -> Self {
        self.cursor = false;
        self
    }

    /// Report this terminal width.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }

    fn transcript(&self) -> MutexGuard<'_, Transcript> {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// What a terminal would show, escape codes interpreted.
    pub fn contents(&self) -> String {
        self.lines().join("\n")
    }

    /// Screen lines, up to the one holding the cursor. A trailing newline
    /// yields a final empty line.
    pub fn lines(&self) -> Vec<String> {
        let transcript = self.transcript();
        render_screen(&transcript.raw, transcript.widest_move)
    }

    /// Everything written, escape codes and cursor commands included.
    pub fn raw(&self) -> String {
        self.transcript().raw.clone()
    }

    pub fn flush_count(&self) -> usize {
        self.transcript().flushes
    }
}

impl Default for MemoryStream {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputStream for MemoryStream {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.transcript().raw.push_str(text);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.transcript().flushes += 1;
        Ok(())
    }

    fn supports_cursor(&self) -> bool {
        self.cursor
    }

    fn move_to_column(&mut self, column: usize) -> io::Result<()> {
        let mut transcript = self.transcript();
        MoveToColumn(to_u16(column))
            .write_ansi(&mut transcript.raw)
            .map_err(io::Error::other)?;
        transcript.widest_move = transcript.widest_move.max(column + 1);
        Ok(())
    }

    fn clear_line_right(&mut self) -> io::Result<()> {
        Clear(ClearType::UntilNewLine)
            .write_ansi(&mut self.transcript().raw)
            .map_err(io::Error::other)
    }

    fn columns(&self) -> Option<usize> {
        self.columns
    }

    fn is_terminal(&self) -> bool {
        self.cursor
    }
}
