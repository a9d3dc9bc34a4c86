//! # softspoken-core
//!
//! **SoftSpoken** – text layout and live-redraw engine for terminal status
//! output.
//!
//! Command-line tools use it to print colorized, indented, word-wrapped log
//! lines, key/value blocks, lists and tables, plus animated spinners that
//! share the stream with ordinary output.
//!
//! ## Main Types
//!
//! - [`Writer`] – the entry point for every output operation
//! - [`Spinner`] – handle to a running spinner; dropping it stops it
//! - [`WriterConfig`] – indentation, width, theme, color and spinner settings
//! - [`SoftSpokenError`] – domain-specific error type
//!
//! ## Modules
//!
//! - [`primitives`] – wrapping, indentation and padding of styled text
//! - [`style`] / [`theme`] – named styles and the role → style theme
//! - [`table`] – column sizing and table rendering
//! - [`spinner`] – spinner animation state machines
//! - [`stream`] – the output stream abstraction (console, in-memory)
//! - [`writer`] – the orchestrating writer
//!
//! ## Example
//!
//! ```no_run
//! use softspoken_core::{Writer, WriterConfig};
//!
//! # fn main() -> softspoken_core::Result<()> {
//! let out = Writer::new(WriterConfig::default())?;
//! out.caption("Build")?;
//! out.properties([("target", "x86_64"), ("profile", "release")])?;
//!
//! let mut spinner = out.spinner("Compiling")?;
//! // ... do work ...
//! spinner.stop()?;
//! out.success("Done")?;
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod config;
pub mod errors;
pub mod format;
pub mod primitives;
pub mod spinner;
pub mod stream;
pub mod style;
pub mod table;
pub mod theme;
pub mod writer;

pub use color::ColorMode;
pub use config::{SpinnerDriverKind, Wrapping, WriterConfig};
pub use errors::{Result, SoftSpokenError};
pub use primitives::OutputWidth;
pub use stream::{Console, MemoryStream, OutputStream};
pub use table::{Table, TableGlyphs};
pub use theme::{Role, Theme};
pub use writer::{PropertyEntry, Spinner, SpinnerId, Writer};
