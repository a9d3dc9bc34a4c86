//! Shared test utilities for softspoken-core integration tests.

use softspoken_core::{ColorMode, MemoryStream, Wrapping, Writer, WriterConfig};

/// A colorless config with manual spinner ticks and a fixed width.
pub fn plain_config(unit: &str, width: usize) -> WriterConfig {
    WriterConfig {
        indentation_unit: unit.to_string(),
        output_width: Wrapping::Columns(width),
        spinner_frame_interval_ms: 0,
        color: ColorMode::Never,
        ..Default::default()
    }
}

/// A writer on a fresh in-memory stream, plus a handle to inspect it.
///
/// # Panics
///
/// Panics if the config does not validate.
pub fn memory_writer(config: WriterConfig) -> (Writer, MemoryStream) {
    let stream = MemoryStream::new();
    let writer = Writer::with_stream(config, stream.clone()).expect("valid writer config");
    (writer, stream)
}
