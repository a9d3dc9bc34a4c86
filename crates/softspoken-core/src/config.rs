//! Writer configuration.
//!
//! [`WriterConfig`] is plain data: it can be built in code or deserialized
//! from JSON with camelCase keys. Everything except the output stream lives
//! here.
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "indentationUnit": "  ",
//!   "defaultIndentationLevel": 1,
//!   "outputWidth": 100,
//!   "spinnerFrameIntervalMs": 200,
//!   "spinnerDriver": "dot",
//!   "tableGlyphs": "boxed",
//!   "theme": { "notice": "yellow", "error": ["white", "bgRed"] },
//!   "color": "auto"
//! }
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::ColorMode;
use crate::errors::{Result, SoftSpokenError};
use crate::primitives::{OutputWidth, DEFAULT_INDENTATION};
use crate::table::TableGlyphs;
use crate::theme::{Theme, ThemeOverrides};

/// Width used when the terminal cannot be queried.
pub const DEFAULT_WIDTH: usize = 200;

/// Tables never grow beyond this many columns, even on unbounded output.
pub const MAX_TABLE_WIDTH: usize = 800;

/// Default delay between spinner frames.
pub const DEFAULT_SPINNER_INTERVAL_MS: u64 = 200;

// ============================================================================
// Wrapping
// ============================================================================

/// How output width is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "WrappingRepr", into = "WrappingRepr")]
pub enum Wrapping {
    /// Ask the terminal, falling back to [`DEFAULT_WIDTH`].
    #[default]
    Terminal,
    /// A fixed number of columns (never zero).
    Columns(usize),
    /// Do not wrap.
    Unbounded,
}

impl Wrapping {
    /// A fixed width. Zero columns is rejected.
    pub fn columns(columns: usize) -> Result<Self> {
        if columns == 0 {
            return Err(SoftSpokenError::InvalidWidth(
                "output width must be at least 1 column".to_string(),
            ));
        }
        Ok(Self::Columns(columns))
    }

    /// Turn the setting into a concrete width. `probe` is the detected
    /// terminal width, if any.
    pub fn resolve(self, probe: Option<usize>) -> OutputWidth {
        match self {
            Self::Terminal => OutputWidth::Fixed(probe.filter(|w| *w > 0).unwrap_or(DEFAULT_WIDTH)),
            Self::Columns(columns) => OutputWidth::Fixed(columns),
            Self::Unbounded => OutputWidth::Unbounded,
        }
    }
}

impl FromStr for Wrapping {
    type Err = SoftSpokenError;

    /// Accepts "terminal", "unbounded" or a positive column count.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "terminal" | "true" => Ok(Self::Terminal),
            "unbounded" | "false" => Ok(Self::Unbounded),
            other => match other.parse::<usize>() {
                Ok(columns) => Self::columns(columns),
                Err(_) => Err(SoftSpokenError::InvalidWidth(format!(
                    "`{s}` is not a width (expected terminal, unbounded or a column count)"
                ))),
            },
        }
    }
}

impl fmt::Display for Wrapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal => write!(f, "terminal"),
            Self::Columns(columns) => write!(f, "{columns}"),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Wire shape of [`Wrapping`]: `true`, `false`, a number or a keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum WrappingRepr {
    Flag(bool),
    Columns(u64),
    Keyword(String),
}

impl TryFrom<WrappingRepr> for Wrapping {
    type Error = SoftSpokenError;

    fn try_from(repr: WrappingRepr) -> Result<Self> {
        match repr {
            WrappingRepr::Flag(true) => Ok(Self::Terminal),
            WrappingRepr::Flag(false) => Ok(Self::Unbounded),
            WrappingRepr::Columns(columns) => {
                let columns = usize::try_from(columns).map_err(|_| {
                    SoftSpokenError::InvalidWidth(format!("{columns} columns is out of range"))
                })?;
                Self::columns(columns)
            }
            WrappingRepr::Keyword(keyword) => keyword.parse(),
        }
    }
}

impl From<Wrapping> for WrappingRepr {
    fn from(wrapping: Wrapping) -> Self {
        match wrapping {
            Wrapping::Terminal => Self::Keyword("terminal".to_string()),
            Wrapping::Columns(columns) => Self::Columns(columns as u64),
            Wrapping::Unbounded => Self::Keyword("unbounded".to_string()),
        }
    }
}

// ============================================================================
// SpinnerDriverKind
// ============================================================================

/// Which animation a spinner draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpinnerDriverKind {
    /// A growing run of periods.
    Dot,
    /// A rotating quarter-block glyph.
    #[default]
    Sprite,
}

impl FromStr for SpinnerDriverKind {
    type Err = SoftSpokenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dot" => Ok(Self::Dot),
            "sprite" => Ok(Self::Sprite),
            other => Err(SoftSpokenError::InvalidConfiguration {
                message: format!("unknown spinner driver `{other}`"),
                hint: "Valid options: dot, sprite".to_string(),
            }),
        }
    }
}

impl fmt::Display for SpinnerDriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dot => write!(f, "dot"),
            Self::Sprite => write!(f, "sprite"),
        }
    }
}

// ============================================================================
// WriterConfig
// ============================================================================

/// Everything a [`Writer`](crate::writer::Writer) needs apart from its stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriterConfig {
    /// String repeated once per indentation level.
    #[serde(default = "default_indentation_unit")]
    pub indentation_unit: String,

    /// Starting level, and the floor for `outdent`.
    #[serde(default = "default_indentation_level")]
    pub default_indentation_level: usize,

    /// Initial wrapping behavior.
    #[serde(default)]
    pub output_width: Wrapping,

    /// Delay between spinner frames. `0` disables the background ticker.
    #[serde(default = "default_spinner_interval_ms")]
    pub spinner_frame_interval_ms: u64,

    #[serde(default)]
    pub spinner_driver: SpinnerDriverKind,

    /// Glyphs drawn by expanded tables.
    #[serde(default)]
    pub table_glyphs: TableGlyphs,

    /// Partial role overrides applied on top of the default theme.
    #[serde(default)]
    pub theme: ThemeOverrides,

    #[serde(default)]
    pub color: ColorMode,
}

fn default_indentation_unit() -> String {
    DEFAULT_INDENTATION.to_string()
}

fn default_indentation_level() -> usize {
    1
}

fn default_spinner_interval_ms() -> u64 {
    DEFAULT_SPINNER_INTERVAL_MS
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indentation_unit: default_indentation_unit(),
            default_indentation_level: default_indentation_level(),
            output_width: Wrapping::default(),
            spinner_frame_interval_ms: default_spinner_interval_ms(),
            spinner_driver: SpinnerDriverKind::default(),
            table_glyphs: TableGlyphs::default(),
            theme: ThemeOverrides::new(),
            color: ColorMode::default(),
        }
    }
}

impl WriterConfig {
    /// Parse and validate a JSON configuration. Warnings are logged.
    ///
    /// # Errors
    ///
    /// Returns [`SoftSpokenError::InvalidConfiguration`] when the JSON does not
    /// match the expected shape, or any error from [`WriterConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SoftSpokenError::InvalidConfiguration {
                message: format!("failed to parse writer config: {e}"),
                hint: "Check key names (camelCase) and value types".to_string(),
            })?;

        for warning in config.validate()? {
            tracing::warn!("Config warning: {}", warning);
        }
        Ok(config)
    }

    /// Validate the configuration, returning non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Fails on an indentation unit containing a line break, and on any theme
    /// entry that does not normalize.
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        if self.indentation_unit.contains(['\n', '\r']) {
            return Err(SoftSpokenError::InvalidConfiguration {
                message: "indentationUnit contains a line break".to_string(),
                hint: "Use spaces or tabs only".to_string(),
            });
        }

        if self.indentation_unit.is_empty() && self.default_indentation_level > 0 {
            warnings.push("indentationUnit is empty; indent() will have no effect".to_string());
        }

        if self.spinner_frame_interval_ms > 0 && self.spinner_frame_interval_ms < 16 {
            warnings.push(format!(
                "spinnerFrameIntervalMs={} redraws faster than most terminals refresh",
                self.spinner_frame_interval_ms
            ));
        }

        self.build_theme()?;
        Ok(warnings)
    }

    /// Normalize the theme overrides into a [`Theme`].
    pub fn build_theme(&self) -> Result<Theme> {
        Theme::with_overrides(&self.theme)
    }

    /// The spinner tick period, or `None` when ticking is manual.
    pub fn spinner_interval(&self) -> Option<Duration> {
        match self.spinner_frame_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}
