//! Shared test utilities for softspoken-cli integration tests.

use assert_cmd::Command;

/// Get a Command for the softspoken binary, with colors off and a fixed
/// width so output is stable on any terminal.
///
/// # Panics
///
/// Panics if the softspoken binary cannot be found. This should not happen
/// in a properly configured test environment.
#[allow(deprecated)]
pub fn softspoken_cmd() -> Command {
    let mut cmd = Command::cargo_bin("softspoken").expect("softspoken binary should exist");
    cmd.env_remove("SOFTSPOKEN_CONFIG")
        .env_remove("SOFTSPOKEN_THEME")
        .env_remove("SOFTSPOKEN_TABLE_GLYPHS")
        .args(["--color", "never", "--width", "60"]);
    cmd
}
