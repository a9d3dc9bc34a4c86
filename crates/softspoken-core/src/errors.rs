//! Error types for softspoken-core.

use thiserror::Error;

/// Errors raised while configuring or writing formatted output.
///
/// Configuration variants are programmer errors and are raised eagerly, at the
/// point where the offending value is supplied. `Io` wraps failures of the
/// underlying output stream; nothing is retried.
#[derive(Error, Debug)]
pub enum SoftSpokenError {
    /// A style name that does not map to any known text style.
    #[error("Unknown style `{0}`.")]
    UnknownStyle(String),

    /// A theme entry that cannot be normalized into a list of style names.
    #[error("Invalid theme: {0}")]
    InvalidTheme(String),

    /// An output width that cannot be used for layout (e.g. zero columns).
    #[error("Invalid output width: {0}")]
    InvalidWidth(String),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {message}. {hint}")]
    InvalidConfiguration {
        /// Description of the invalid configuration.
        message: String,
        /// Actionable hint on how to fix it.
        hint: String,
    },

    /// A value passed to `debug_value` could not be inspected.
    #[error("Failed to inspect value: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The output stream rejected a write.
    #[error("Output stream error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SoftSpokenError>;
