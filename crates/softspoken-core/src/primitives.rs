//! Stateless text primitives: wrapping, indentation, padding.
//!
//! Every width in this module is a *visible* width: ANSI escape sequences
//! count as zero columns and are never split across lines.

use std::borrow::Cow;
use std::fmt;

use textwrap::{Options, WordSeparator, WordSplitter};

pub use crate::color::terminal_width;

/// Default indentation unit (four spaces).
pub const DEFAULT_INDENTATION: &str = "    ";

/// Horizontal room available for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputWidth {
    /// Wrap at this many columns.
    Fixed(usize),
    /// Never wrap.
    Unbounded,
}

impl OutputWidth {
    /// Concrete column count, if any.
    pub fn columns(self) -> Option<usize> {
        match self {
            Self::Fixed(columns) => Some(columns),
            Self::Unbounded => None,
        }
    }

    /// Columns left after removing `used` columns of margin. Never below 1.
    pub fn shrink(self, used: usize) -> Self {
        match self {
            Self::Fixed(columns) => Self::Fixed(columns.saturating_sub(used).max(1)),
            Self::Unbounded => Self::Unbounded,
        }
    }
}

impl fmt::Display for OutputWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(columns) => write!(f, "{columns} columns"),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}

impl From<usize> for OutputWidth {
    fn from(columns: usize) -> Self {
        Self::Fixed(columns)
    }
}

/// `text` as a terminal would show it: escape sequences interpreted by a
/// `vt100` emulator, styles dropped.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    if !text.contains('\x1b') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(render_screen(text, 0).join("\n"))
}

/// Screen lines after printing `raw` on a terminal wide enough for every
/// line, from the top down to the line holding the cursor. `min_columns`
/// widens the screen for cursor moves past the text.
pub(crate) fn render_screen(raw: &str, min_columns: usize) -> Vec<String> {
    // Two columns per char covers wide glyphs; escape bytes only add slack.
    let widest = raw
        .split('\n')
        .map(|line| line.chars().count() * 2)
        .max()
        .unwrap_or(0);
    let rows = u16::try_from(raw.matches('\n').count() + 1).unwrap_or(u16::MAX);
    let cols = u16::try_from(widest.max(min_columns) + 1).unwrap_or(u16::MAX);

    // Terminals translate a bare line feed into carriage return + line feed.
    let mut parser = vt100::Parser::new(rows, cols, 0);
    parser.process(raw.replace('\n', "\r\n").as_bytes());
    let screen = parser.screen();
    let (cursor_row, _) = screen.cursor_position();

    (0..=cursor_row)
        .map(|row| {
            let mut line = String::new();
            let mut blanks = 0;
            for col in 0..cols {
                let Some(cell) = screen.cell(row, col) else {
                    break;
                };
                if cell.is_wide_continuation() {
                    continue;
                }
                if cell.has_contents() {
                    line.push_str(&fill(blanks, ' '));
                    line.push_str(&cell.contents());
                    blanks = 0;
                } else {
                    blanks += 1;
                }
            }
            line
        })
        .collect()
}

/// Number of terminal columns `text` occupies, ignoring escape codes.
pub fn visible_width(text: &str) -> usize {
    textwrap::core::display_width(text)
}

/// Hard-wrap `text` to `width` visible columns.
///
/// Words are kept whole where possible and broken when longer than a line.
/// Explicit line breaks are preserved. Returns the text unchanged for
/// [`OutputWidth::Unbounded`].
///
/// # Example
///
/// ```
/// use softspoken_core::primitives::{wrap, OutputWidth};
///
/// assert_eq!(wrap("one two three", OutputWidth::Fixed(7)), "one two\nthree");
/// assert_eq!(wrap("abcdefgh", OutputWidth::Fixed(3)), "abc\ndef\ngh");
/// assert_eq!(wrap("one two three", OutputWidth::Unbounded), "one two three");
/// ```
pub fn wrap(text: &str, width: OutputWidth) -> String {
    wrap_lines(text, width).join("\n")
}

/// Like [`wrap`], returning the produced lines.
pub fn wrap_lines(text: &str, width: OutputWidth) -> Vec<String> {
    let Some(columns) = width.columns() else {
        return text.split('\n').map(str::to_string).collect();
    };

    let options = Options::new(columns.max(1))
        .break_words(true)
        .word_separator(WordSeparator::AsciiSpace)
        .word_splitter(WordSplitter::NoHyphenation);

    text.split('\n')
        .flat_map(|line| {
            textwrap::wrap(line, &options)
                .into_iter()
                .map(Cow::into_owned)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Indent and wrap `text`.
///
/// The text is split on its own line breaks first; each line is wrapped to
/// `width - |left| - |right|` columns (at least one), then every produced line
/// gets `left` prepended and `right` appended. `left = None` uses
/// [`DEFAULT_INDENTATION`]; `right = None` reuses `left`. With
/// [`OutputWidth::Unbounded`] lines are padded but not wrapped.
///
/// # Example
///
/// ```
/// use softspoken_core::primitives::{indent, OutputWidth};
///
/// assert_eq!(
///     indent("aaa bbb", Some("> "), Some(""), OutputWidth::Fixed(5)),
///     "> aaa\n> bbb"
/// );
/// assert_eq!(indent("x", Some("  "), None, OutputWidth::Unbounded), "  x  ");
/// assert_eq!(indent("x", None, Some(""), OutputWidth::Unbounded), "    x");
/// ```
pub fn indent(text: &str, left: Option<&str>, right: Option<&str>, width: OutputWidth) -> String {
    let left = left.unwrap_or(DEFAULT_INDENTATION);
    let right = right.unwrap_or(left);
    let inner = width.shrink(visible_width(left) + visible_width(right));

    wrap_lines(text, inner)
        .iter()
        .map(|line| format!("{left}{line}{right}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Right-pad `text` with `fill_char` to at least `target + 1` visible columns.
///
/// The extra column acts as a built-in separator when padded strings are
/// placed next to each other.
///
/// # Example
///
/// ```
/// use softspoken_core::primitives::pad;
///
/// assert_eq!(pad("bb", 2, ' '), "bb ");
/// assert_eq!(pad("a", 2, '.'), "a..");
/// assert_eq!(pad("longer", 2, ' '), "longer");
/// ```
pub fn pad(text: &str, target: usize, fill_char: char) -> String {
    let missing = (target + 1).saturating_sub(visible_width(text));
    let mut padded = String::with_capacity(text.len() + missing);
    padded.push_str(text);
    padded.push_str(&fill(missing, fill_char));
    padded
}

/// Exactly `length` copies of `ch`.
pub fn fill(length: usize, ch: char) -> String {
    std::iter::repeat(ch).take(length).collect()
}

/// The literal left margin for an indentation level.
pub fn left_indent(unit: &str, level: usize) -> String {
    unit.repeat(level)
}
