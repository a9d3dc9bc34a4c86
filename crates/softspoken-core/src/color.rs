//! Color mode selection and terminal width probing.
//!
//! `auto` honors `NO_COLOR` (https://no-color.org/) and only styles streams
//! attached to a terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SoftSpokenError;

/// Color output mode for a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Always emit style escape codes, even when the stream is not a TTY.
    Always,
    /// Never emit style escape codes.
    Never,
    /// Decide from `NO_COLOR` and whether the stream is a terminal.
    #[default]
    Auto,
}

impl ColorMode {
    /// Check if styles should be applied for a stream.
    ///
    /// `is_terminal` is only consulted in [`ColorMode::Auto`].
    pub fn is_enabled(&self, is_terminal: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => Self::should_auto_colorize(is_terminal),
        }
    }

    /// `NO_COLOR` set to anything wins; otherwise style only terminals.
    fn should_auto_colorize(is_terminal: bool) -> bool {
        if std::env::var_os("NO_COLOR").is_some() {
            return false;
        }
        is_terminal
    }
}

impl FromStr for ColorMode {
    type Err = SoftSpokenError;

    /// Accepts: "always", "never", "auto" (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            "auto" => Ok(Self::Auto),
            other => Err(SoftSpokenError::InvalidConfiguration {
                message: format!("unknown color mode `{other}`"),
                hint: "Valid options: always, never, auto".to_string(),
            }),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::Never => write!(f, "never"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Get the current terminal width.
///
/// Returns `None` when no terminal is attached (pipes, CI logs); callers fall
/// back to a configured default.
pub fn terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(w, _)| w.0 as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_from_str() {
        assert_eq!("always".parse::<ColorMode>().ok(), Some(ColorMode::Always));
        assert_eq!("ALWAYS".parse::<ColorMode>().ok(), Some(ColorMode::Always));
        assert_eq!("never".parse::<ColorMode>().ok(), Some(ColorMode::Never));
        assert_eq!("auto".parse::<ColorMode>().ok(), Some(ColorMode::Auto));
        assert!("invalid".parse::<ColorMode>().is_err());
    }

    #[test]
    fn test_color_mode_always() {
        assert!(ColorMode::Always.is_enabled(false));
    }

    #[test]
    fn test_color_mode_never() {
        assert!(!ColorMode::Never.is_enabled(true));
    }

    #[test]
    fn test_auto_disabled_off_terminal() {
        assert!(!ColorMode::Auto.is_enabled(false));
    }

    #[test]
    fn test_color_mode_display_round_trips() {
        for mode in [ColorMode::Always, ColorMode::Never, ColorMode::Auto] {
            assert_eq!(mode.to_string().parse::<ColorMode>().ok(), Some(mode));
        }
    }
}
