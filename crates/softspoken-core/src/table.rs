//! Table layout: column sizing and grid rendering.
//!
//! Compact tables have no borders: columns are separated by a two-space gap.
//! Expanded tables draw the glyphs of their [`TableGlyphs`] set, which by
//! default is a light horizontal rule between rows.
//!
//! ## Example Output
//!
//! ```text
//! NAME   SIZE
//! ────────────
//! alpha  12 KB
//! ────────────
//! beta   3 MB
//! ```
//!
//! With [`TableGlyphs::Boxed`]:
//!
//! ```text
//! ╔═════╤═════╗
//! ║NAME │SIZE ║
//! ╟─────┼─────╢
//! ║alpha│12 KB║
//! ╚═════╧═════╝
//! ```
//!
//! When the natural widths do not fit the available room, columns shrink
//! proportionally and over-long cells wrap inside their column.

use std::cmp::Reverse;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::MAX_TABLE_WIDTH;
use crate::errors::SoftSpokenError;
use crate::primitives::{fill, visible_width, wrap_lines, OutputWidth};
use crate::theme::{Painter, Role};

/// Gap between adjacent columns, reserved per column when sizing.
pub const COLUMN_SEPARATOR: &str = "  ";

// ============================================================================
// Glyphs
// ============================================================================

/// Border pieces of a table. Empty strings draw nothing, and a border line
/// whose fill piece is empty is skipped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableChars {
    pub top: &'static str,
    pub top_mid: &'static str,
    pub top_left: &'static str,
    pub top_right: &'static str,
    pub bottom: &'static str,
    pub bottom_mid: &'static str,
    pub bottom_left: &'static str,
    pub bottom_right: &'static str,
    pub left: &'static str,
    pub left_mid: &'static str,
    pub mid: &'static str,
    pub mid_mid: &'static str,
    pub right: &'static str,
    pub right_mid: &'static str,
    /// Between two cells of a row.
    pub middle: &'static str,
}

/// No borders; used for every compact table.
pub const PLAIN_CHARS: TableChars = TableChars {
    top: "",
    top_mid: "",
    top_left: "",
    top_right: "",
    bottom: "",
    bottom_mid: "",
    bottom_left: "",
    bottom_right: "",
    left: "",
    left_mid: "",
    mid: "",
    mid_mid: "",
    right: "",
    right_mid: "",
    middle: COLUMN_SEPARATOR,
};

pub const RULE_CHARS: TableChars = TableChars {
    mid: "─",
    mid_mid: "──",
    ..PLAIN_CHARS
};

pub const BOXED_CHARS: TableChars = TableChars {
    top: "═",
    top_mid: "╤",
    top_left: "╔",
    top_right: "╗",
    bottom: "═",
    bottom_mid: "╧",
    bottom_left: "╚",
    bottom_right: "╝",
    left: "║",
    left_mid: "╟",
    mid: "─",
    mid_mid: "┼",
    right: "║",
    right_mid: "╢",
    middle: "│",
};

/// Glyph set drawn by expanded tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableGlyphs {
    /// No rules at all, same as a compact table.
    Plain,
    /// A light rule between rows.
    #[default]
    Rules,
    /// Double-line frame with single-line inner rules.
    Boxed,
}

impl TableGlyphs {
    pub fn chars(self) -> &'static TableChars {
        match self {
            Self::Plain => &PLAIN_CHARS,
            Self::Rules => &RULE_CHARS,
            Self::Boxed => &BOXED_CHARS,
        }
    }
}

impl FromStr for TableGlyphs {
    type Err = SoftSpokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "rules" => Ok(Self::Rules),
            "boxed" => Ok(Self::Boxed),
            other => Err(SoftSpokenError::InvalidConfiguration {
                message: format!("unknown table glyph set `{other}`"),
                hint: "Valid options: plain, rules, boxed".to_string(),
            }),
        }
    }
}

impl fmt::Display for TableGlyphs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Rules => write!(f, "rules"),
            Self::Boxed => write!(f, "boxed"),
        }
    }
}

// ============================================================================
// Table
// ============================================================================

/// A header row plus body rows, all stringified up front.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    expanded: bool,
    glyphs: TableGlyphs,
}

impl Table {
    pub fn new<H: Display>(headers: impl IntoIterator<Item = H>) -> Self {
        Self {
            headers: headers.into_iter().map(|h| h.to_string().trim().to_string()).collect(),
            rows: Vec::new(),
            expanded: false,
            glyphs: TableGlyphs::default(),
        }
    }

    /// Append a row. Cells are stringified and trimmed.
    pub fn add_row<C: Display>(&mut self, cells: impl IntoIterator<Item = C>) -> &mut Self {
        self.rows
            .push(cells.into_iter().map(|c| c.to_string().trim().to_string()).collect());
        self
    }

    /// Draw rules between rows.
    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Glyphs used when the table is expanded.
    pub fn glyphs(mut self, glyphs: TableGlyphs) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Number of columns: the longest of the header and every row.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    /// Widest visible line per column, header included.
    pub fn natural_widths(&self) -> Vec<usize> {
        let mut widths = vec![0; self.column_count()];
        for row in std::iter::once(&self.headers).chain(&self.rows) {
            for (i, cell) in row.iter().enumerate() {
                let widest = cell.split('\n').map(visible_width).max().unwrap_or(0);
                widths[i] = widths[i].max(widest);
            }
        }
        widths
    }

    /// Render to lines, each prefixed with `left`.
    ///
    /// `width` is the full output width; the left margin and column gaps are
    /// subtracted before sizing columns.
    pub fn render(&self, painter: &Painter, left: &str, width: OutputWidth) -> Vec<String> {
        let columns = self.column_count();
        if columns == 0 {
            return Vec::new();
        }

        let available = available_width(width, visible_width(left), columns);
        let widths = layout_columns(&self.natural_widths(), available);
        tracing::trace!(?widths, available, "table layout");

        let chars = if self.expanded {
            self.glyphs.chars()
        } else {
            &PLAIN_CHARS
        };

        let header = (!self.headers.is_empty())
            .then(|| render_row(&self.headers, &widths, chars, painter, Role::TableHeader, left));
        let body = self
            .rows
            .iter()
            .map(|row| render_row(row, &widths, chars, painter, Role::Log, left));

        let mut lines = Vec::new();
        let top = [chars.top_left, chars.top, chars.top_mid, chars.top_right];
        lines.extend(border(&widths, top, painter, left));
        for (i, block) in header.into_iter().chain(body).enumerate() {
            if i > 0 {
                let mid = [chars.left_mid, chars.mid, chars.mid_mid, chars.right_mid];
                lines.extend(border(&widths, mid, painter, left));
            }
            lines.extend(block);
        }
        let bottom = [chars.bottom_left, chars.bottom, chars.bottom_mid, chars.bottom_right];
        lines.extend(border(&widths, bottom, painter, left));
        lines
    }
}

/// Room left for cell content after the margin and one separator per column.
///
/// Unbounded output is treated as [`MAX_TABLE_WIDTH`] columns.
pub fn available_width(width: OutputWidth, left_margin: usize, columns: usize) -> usize {
    width
        .columns()
        .unwrap_or(MAX_TABLE_WIDTH)
        .min(MAX_TABLE_WIDTH)
        .saturating_sub(left_margin)
        .saturating_sub(columns * visible_width(COLUMN_SEPARATOR))
}

/// Fit `natural` column widths into `available` columns.
///
/// Widths that already fit are returned unchanged. Otherwise each column gets
/// its proportional share, rounded down, and the leftover columns go to the
/// largest remainders, so the total never exceeds `available`. A non-empty
/// column that rounded to zero is given one column taken from the widest
/// column, as long as that column can spare it.
///
/// # Example
///
/// ```
/// use softspoken_core::table::layout_columns;
///
/// assert_eq!(layout_columns(&[5, 10], 40), vec![5, 10]);
/// assert_eq!(layout_columns(&[30, 10], 20), vec![15, 5]);
/// assert_eq!(layout_columns(&[100, 1], 10), vec![9, 1]);
/// ```
pub fn layout_columns(natural: &[usize], available: usize) -> Vec<usize> {
    let total: usize = natural.iter().sum();
    if total <= available {
        return natural.to_vec();
    }

    let mut widths: Vec<usize> = natural.iter().map(|n| n * available / total).collect();
    let mut leftover = available - widths.iter().sum::<usize>();

    let mut by_remainder: Vec<usize> = (0..natural.len()).collect();
    by_remainder.sort_by_key(|&i| (Reverse(natural[i] * available % total), i));
    for i in by_remainder {
        if leftover == 0 {
            break;
        }
        if widths[i] < natural[i] {
            widths[i] += 1;
            leftover -= 1;
        }
    }

    for i in 0..widths.len() {
        if natural[i] == 0 || widths[i] > 0 {
            continue;
        }
        let donor = (0..widths.len())
            .filter(|&j| widths[j] > 1)
            .max_by_key(|&j| (widths[j], Reverse(j)));
        let Some(donor) = donor else { break };
        widths[donor] -= 1;
        widths[i] = 1;
    }

    widths
}

fn render_row(
    cells: &[String],
    widths: &[usize],
    chars: &TableChars,
    painter: &Painter,
    role: Role,
    left: &str,
) -> Vec<String> {
    let wrapped: Vec<Vec<String>> = widths
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            wrap_lines(cell, OutputWidth::Fixed(w.max(1)))
        })
        .collect();
    let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);
    let middle = paint_glyph(painter, chars.middle);

    (0..height)
        .map(|n| {
            let line = wrapped
                .iter()
                .zip(widths)
                .map(|(lines, &w)| {
                    let text = lines.get(n).map(String::as_str).unwrap_or("");
                    let gap = fill(w.saturating_sub(visible_width(text)), ' ');
                    format!("{}{gap}", painter.paint(role, text))
                })
                .collect::<Vec<_>>()
                .join(&middle);
            let line = format!(
                "{}{line}{}",
                paint_glyph(painter, chars.left),
                paint_glyph(painter, chars.right)
            );
            format!("{left}{}", line.trim_end())
        })
        .collect()
}

/// A horizontal border from `[start, fill, junction, end]`, or `None` when
/// the set has no fill glyph for it.
fn border(widths: &[usize], pieces: [&str; 4], painter: &Painter, left: &str) -> Option<String> {
    let [start, fill_glyph, junction, end] = pieces;
    if fill_glyph.is_empty() {
        return None;
    }
    let inner = widths
        .iter()
        .map(|&w| fill_glyph.repeat(w))
        .collect::<Vec<_>>()
        .join(junction);
    Some(format!(
        "{left}{}",
        painter.paint(Role::Debug, &format!("{start}{inner}{end}"))
    ))
}

/// Border glyphs take the debug style; blank separators stay unstyled.
fn paint_glyph(painter: &Painter, glyph: &str) -> String {
    if glyph.trim().is_empty() {
        glyph.to_string()
    } else {
        painter.paint(Role::Debug, glyph)
    }
}
