//! # softspoken CLI
//!
//! Command-line front end for `softspoken-core`: prints log lines, property
//! blocks, lists, tables and spinners from the shell.
//! Run `softspoken --help` for usage information.

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
