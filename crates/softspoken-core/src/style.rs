//! Named text styles.
//!
//! Themes refer to styles by name (`"bold"`, `"yellow"`, `"bgRed"`, ...). This
//! module parses those names once, up front, and composes them into an
//! `owo_colors::Style` when text is painted.
//!
//! ## Supported names
//!
//! | Kind | Names |
//! |------|-------|
//! | Modifiers | `reset`, `bold`, `dim`, `italic`, `underline`, `inverse`, `hidden`, `strikethrough` |
//! | Foreground | `black`, `red`, `green`, `yellow`, `blue`, `magenta`, `cyan`, `white`, `gray`/`grey`, `<color>Bright` |
//! | Background | `bgBlack` … `bgWhite`, `bgGray`/`bgGrey`, `bg<Color>Bright` |

use std::fmt;
use std::str::FromStr;

use owo_colors::{OwoColorize, Style};

use crate::errors::{Result, SoftSpokenError};

/// One of the sixteen ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnsiColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl AnsiColor {
    /// Parse a lower-camel color name (`red`, `redBright`, `gray`).
    fn from_name(name: &str) -> Option<Self> {
        let (base, bright) = match name.strip_suffix("Bright") {
            Some(base) => (base, true),
            None => (name, false),
        };
        let color = match (base, bright) {
            ("gray" | "grey", false) => Self::BrightBlack,
            ("black", false) => Self::Black,
            ("red", false) => Self::Red,
            ("green", false) => Self::Green,
            ("yellow", false) => Self::Yellow,
            ("blue", false) => Self::Blue,
            ("magenta", false) => Self::Magenta,
            ("cyan", false) => Self::Cyan,
            ("white", false) => Self::White,
            ("black", true) => Self::BrightBlack,
            ("red", true) => Self::BrightRed,
            ("green", true) => Self::BrightGreen,
            ("yellow", true) => Self::BrightYellow,
            ("blue", true) => Self::BrightBlue,
            ("magenta", true) => Self::BrightMagenta,
            ("cyan", true) => Self::BrightCyan,
            ("white", true) => Self::BrightWhite,
            _ => return None,
        };
        Some(color)
    }

    fn foreground(self, style: Style) -> Style {
        match self {
            Self::Black => style.black(),
            Self::Red => style.red(),
            Self::Green => style.green(),
            Self::Yellow => style.yellow(),
            Self::Blue => style.blue(),
            Self::Magenta => style.magenta(),
            Self::Cyan => style.cyan(),
            Self::White => style.white(),
            Self::BrightBlack => style.bright_black(),
            Self::BrightRed => style.bright_red(),
            Self::BrightGreen => style.bright_green(),
            Self::BrightYellow => style.bright_yellow(),
            Self::BrightBlue => style.bright_blue(),
            Self::BrightMagenta => style.bright_magenta(),
            Self::BrightCyan => style.bright_cyan(),
            Self::BrightWhite => style.bright_white(),
        }
    }

    fn background(self, style: Style) -> Style {
        match self {
            Self::Black => style.on_black(),
            Self::Red => style.on_red(),
            Self::Green => style.on_green(),
            Self::Yellow => style.on_yellow(),
            Self::Blue => style.on_blue(),
            Self::Magenta => style.on_magenta(),
            Self::Cyan => style.on_cyan(),
            Self::White => style.on_white(),
            Self::BrightBlack => style.on_bright_black(),
            Self::BrightRed => style.on_bright_red(),
            Self::BrightGreen => style.on_bright_green(),
            Self::BrightYellow => style.on_bright_yellow(),
            Self::BrightBlue => style.on_bright_blue(),
            Self::BrightMagenta => style.on_bright_magenta(),
            Self::BrightCyan => style.on_bright_cyan(),
            Self::BrightWhite => style.on_bright_white(),
        }
    }
}

/// A single parsed style name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StyleName {
    /// Leaves text untouched.
    Reset,
    Bold,
    Dim,
    Italic,
    Underline,
    Inverse,
    Hidden,
    Strikethrough,
    /// Foreground color.
    Fg(AnsiColor),
    /// Background color.
    Bg(AnsiColor),
}

impl StyleName {
    /// Compose this style onto an existing one.
    fn apply_to(&self, style: Style) -> Style {
        match self {
            Self::Reset => style,
            Self::Bold => style.bold(),
            Self::Dim => style.dimmed(),
            Self::Italic => style.italic(),
            Self::Underline => style.underline(),
            Self::Inverse => style.reversed(),
            Self::Hidden => style.hidden(),
            Self::Strikethrough => style.strikethrough(),
            Self::Fg(color) => color.foreground(style),
            Self::Bg(color) => color.background(style),
        }
    }
}

impl FromStr for StyleName {
    type Err = SoftSpokenError;

    fn from_str(s: &str) -> Result<Self> {
        let name = match s {
            "reset" => Self::Reset,
            "bold" => Self::Bold,
            "dim" => Self::Dim,
            "italic" => Self::Italic,
            "underline" => Self::Underline,
            "inverse" => Self::Inverse,
            "hidden" => Self::Hidden,
            "strikethrough" => Self::Strikethrough,
            _ => {
                let parsed = match s.strip_prefix("bg") {
                    Some(rest) => lower_first(rest)
                        .as_deref()
                        .and_then(AnsiColor::from_name)
                        .map(Self::Bg),
                    None => AnsiColor::from_name(s).map(Self::Fg),
                };
                parsed.ok_or_else(|| SoftSpokenError::UnknownStyle(s.to_string()))?
            }
        };
        Ok(name)
    }
}

/// `"RedBright"` -> `"redBright"`; `None` for an empty remainder.
fn lower_first(s: &str) -> Option<String> {
    let mut chars = s.chars();
    let first = chars.next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    Some(first.to_ascii_lowercase().to_string() + chars.as_str())
}

/// An ordered, validated list of style names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSet {
    names: Vec<StyleName>,
}

impl StyleSet {
    /// Parse every name, failing on the first unknown one.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let names = names
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<StyleName>>>()?;
        Ok(Self { names })
    }

    /// The parsed names in application order.
    pub fn names(&self) -> &[StyleName] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True when painting would not change the text.
    pub fn is_plain(&self) -> bool {
        self.names.iter().all(|name| *name == StyleName::Reset)
    }

    /// Wrap `text` in the escape codes of every style, in order.
    pub fn apply(&self, text: &str) -> String {
        if self.is_plain() || text.is_empty() {
            return text.to_string();
        }
        let style = self
            .names
            .iter()
            .fold(Style::new(), |style, name| name.apply_to(style));
        text.style(style).to_string()
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reset => write!(f, "reset"),
            Self::Bold => write!(f, "bold"),
            Self::Dim => write!(f, "dim"),
            Self::Italic => write!(f, "italic"),
            Self::Underline => write!(f, "underline"),
            Self::Inverse => write!(f, "inverse"),
            Self::Hidden => write!(f, "hidden"),
            Self::Strikethrough => write!(f, "strikethrough"),
            Self::Fg(color) => write!(f, "{color:?}"),
            Self::Bg(color) => write!(f, "bg{color:?}"),
        }
    }
}

/// Apply a list of style names to text.
///
/// An empty list leaves the text unchanged. Unknown names are a configuration
/// error and fail immediately.
///
/// # Example
///
/// ```
/// use softspoken_core::style::apply_style;
///
/// assert_eq!(apply_style("plain", &["reset"]).unwrap(), "plain");
/// assert!(apply_style("bold", &["bold"]).unwrap().contains("\u{1b}["));
/// assert!(apply_style("nope", &["sparkly"]).is_err());
/// ```
pub fn apply_style<S: AsRef<str>>(text: &str, names: &[S]) -> Result<String> {
    Ok(StyleSet::parse(names)?.apply(text))
}
