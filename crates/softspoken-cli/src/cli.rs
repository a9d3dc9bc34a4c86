//! CLI definition and command dispatch for softspoken.
//!
//! ## Configuration Precedence
//!
//! Writer settings are resolved with the following precedence (highest to
//! lowest):
//! 1. CLI flags (e.g., `--width`, `--color`)
//! 2. Environment variables (`SOFTSPOKEN_WIDTH`, `SOFTSPOKEN_COLOR`, ...)
//! 3. Config file (JSON, from `--config`/`SOFTSPOKEN_CONFIG`)
//! 4. Built-in defaults

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;

use softspoken_core::theme::ThemeOverrides;
use softspoken_core::{ColorMode, SpinnerDriverKind, TableGlyphs, Wrapping, Writer, WriterConfig};

// ============================================================================
// CLI Definition
// ============================================================================

/// Version string including git commit hash
const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// SoftSpoken – formatted, indented terminal output with spinners
#[derive(Parser, Debug)]
#[command(name = "softspoken")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logging on stderr)
    #[arg(short, long, global = true, env = "SOFTSPOKEN_VERBOSE")]
    pub verbose: bool,

    /// Path to a JSON writer configuration
    #[arg(long, global = true, env = "SOFTSPOKEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output width: terminal, unbounded, or a column count
    #[arg(long, global = true, env = "SOFTSPOKEN_WIDTH")]
    pub width: Option<Wrapping>,

    /// Spaces per indentation level
    #[arg(long, global = true, env = "SOFTSPOKEN_INDENT")]
    pub indent: Option<usize>,

    /// Spinner animation: dot or sprite
    #[arg(long, global = true, env = "SOFTSPOKEN_DRIVER")]
    pub driver: Option<SpinnerDriverKind>,

    /// Milliseconds between spinner frames (0 disables animation)
    #[arg(long, global = true, env = "SOFTSPOKEN_INTERVAL")]
    pub interval: Option<u64>,

    /// Expanded table glyphs: plain, rules, or boxed (default: rules)
    #[arg(long, global = true, env = "SOFTSPOKEN_TABLE_GLYPHS")]
    pub table_glyphs: Option<TableGlyphs>,

    /// Color output mode: always, never, or auto (default: auto)
    #[arg(long, global = true, env = "SOFTSPOKEN_COLOR")]
    pub color: Option<ColorMode>,

    /// Theme overrides as JSON, e.g. '{"notice": "yellow"}'
    #[arg(long, global = true, env = "SOFTSPOKEN_THEME")]
    pub theme: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show every kind of output
    Demo,

    /// Print a message
    #[command(after_help = r#"EXAMPLES:
    softspoken log Deploying to staging
    softspoken log --as error Upload failed
    softspoken log --as caption Summary"#)]
    Log {
        /// How the message is styled
        #[arg(long = "as", value_enum, default_value = "log")]
        kind: MessageKind,

        /// Message words
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Print aligned KEY=VALUE properties
    #[command(after_help = r#"EXAMPLES:
    softspoken props region=eu-west-1 replicas=3"#)]
    Props {
        /// Pairs in KEY=VALUE form
        #[arg(required = true)]
        pairs: Vec<String>,
    },

    /// Print a term and its meaning
    Define { term: String, meaning: String },

    /// Print a numbered list
    List {
        #[arg(required = true)]
        items: Vec<String>,

        /// Bullet template; `{n}` is replaced by the position
        #[arg(long)]
        bullet: Option<String>,
    },

    /// Print a table from comma-separated rows
    #[command(after_help = r#"EXAMPLES:
    softspoken table --header NAME,SIZE alpha,12KB beta,3MB
    softspoken table --expanded --header K,V a,1 b,2"#)]
    Table {
        /// Column headers
        #[arg(long, value_delimiter = ',', required = true)]
        header: Vec<String>,

        /// Rows, cells separated by commas
        rows: Vec<String>,

        /// Draw rules between rows
        #[arg(long)]
        expanded: bool,
    },

    /// Pretty-print a JSON value
    Inspect { json: String },

    /// Show a spinner for a while
    Spin {
        message: String,

        /// How long to spin
        #[arg(long, default_value_t = 1000)]
        millis: u64,

        /// Text printed instead of the elapsed time
        #[arg(long)]
        done: Option<String>,
    },
}

/// Message styles accepted by `log --as`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageKind {
    Log,
    Success,
    Caption,
    Notice,
    Error,
    Debug,
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse arguments, run the command and map failures to an exit code.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    // - Always show warnings (config issues, ticker failures)
    // - Show debug info only when --verbose is set
    // Logs go to stderr so they never mix with formatted stdout.
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = format!("softspoken_core={},softspoken={}", log_level, log_level);

    tracing_subscriber::fmt()
        .with_env_filter(&filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render_error(&e, cli.color.unwrap_or_default()));
            ExitCode::FAILURE
        }
    }
}

/// `[error] message` plus one `Cause:` line per source.
fn render_error(error: &anyhow::Error, color: ColorMode) -> String {
    let marker = if color.is_enabled(atty::is(atty::Stream::Stderr)) {
        "[error]".red().bold().to_string()
    } else {
        "[error]".to_string()
    };

    let mut output = format!("{marker} {error}");
    for cause in error.chain().skip(1) {
        output.push('\n');
        output.push_str(&format!("      Cause: {cause}"));
    }
    output
}

fn writer_config(cli: &Cli) -> anyhow::Result<WriterConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            WriterConfig::from_json(&json)
                .with_context(|| format!("Invalid config at {}", path.display()))?
        }
        None => WriterConfig::default(),
    };

    if let Some(width) = cli.width {
        config.output_width = width;
    }
    if let Some(spaces) = cli.indent {
        config.indentation_unit = " ".repeat(spaces);
    }
    if let Some(driver) = cli.driver {
        config.spinner_driver = driver;
    }
    if let Some(interval) = cli.interval {
        config.spinner_frame_interval_ms = interval;
    }
    if let Some(glyphs) = cli.table_glyphs {
        config.table_glyphs = glyphs;
    }
    if let Some(color) = cli.color {
        config.color = color;
    }
    if let Some(theme) = &cli.theme {
        let overrides: ThemeOverrides =
            serde_json::from_str(theme).context("--theme must be a JSON object of role: style")?;
        config.theme.extend(overrides);
    }

    tracing::debug!(?config, "resolved writer config");
    Ok(config)
}

fn execute(cli: &Cli) -> anyhow::Result<()> {
    let out = Writer::new(writer_config(cli)?).context("Failed to set up output")?;

    match &cli.command {
        Command::Demo => demo(&out)?,
        Command::Log { kind, message } => {
            let message = message.join(" ");
            match kind {
                MessageKind::Log => out.log(message)?,
                MessageKind::Success => out.success(message)?,
                MessageKind::Caption => out.caption(message)?,
                MessageKind::Notice => out.notice(message)?,
                MessageKind::Error => out.error(message)?,
                MessageKind::Debug => out.debug(message)?,
            }
        }
        Command::Props { pairs } => {
            let pairs = pairs
                .iter()
                .map(|pair| {
                    pair.split_once('=')
                        .ok_or_else(|| anyhow!("expected KEY=VALUE, got `{pair}`"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            out.properties(pairs)?;
        }
        Command::Define { term, meaning } => out.definition(term, meaning)?,
        Command::List { items, bullet } => out.list(items, bullet.as_deref())?,
        Command::Table {
            header,
            rows,
            expanded,
        } => {
            let rows = rows.iter().map(|row| row.split(','));
            out.table(header, rows, *expanded)?;
        }
        Command::Inspect { json } => {
            let value: serde_json::Value =
                serde_json::from_str(json).context("Input is not valid JSON")?;
            out.debug_value(&value)?;
        }
        Command::Spin {
            message,
            millis,
            done,
        } => {
            let mut spinner = out.spinner(message)?;
            thread::sleep(Duration::from_millis(*millis));
            match done {
                Some(text) => spinner.stop_with(text)?,
                None => spinner.stop()?,
            }
        }
    }

    Ok(())
}

fn demo(out: &Writer) -> anyhow::Result<()> {
    out.caption("Output")?;
    out.log("Plain log lines wrap at the output width and keep their indentation, however long they get.")?;
    out.success("Success")?;
    out.notice("Notice")?;
    out.error("Error")?;
    out.debug("Debug")?;

    out.caption("Properties")?;
    let width = out.output_width().to_string();
    out.properties([("name", "softspoken"), ("width", width.as_str())])?;
    out.definition("Definition", "A term followed by its meaning, one level deeper.")?;

    out.caption("List")?;
    out.indent();
    out.list(["fetch", "build", "test"], None)?;
    out.outdent();

    out.caption("Table")?;
    out.table(
        ["CRATE", "ROLE"],
        [
            ["softspoken-core", "layout and redraw engine"],
            ["softspoken-cli", "command-line front end"],
        ],
        true,
    )?;

    out.caption("Inspect")?;
    out.debug_value(&serde_json::json!({
        "spinner": { "driver": "sprite", "frames": ["▖", "▘", "▝", "▗"] }
    }))?;

    out.caption("Spinners")?;
    let mut first = out.spinner("Working")?;
    thread::sleep(Duration::from_millis(600));
    first.stop()?;

    let _second = out.spinner("Downloading")?;
    let _third = out.spinner("Unpacking")?;
    thread::sleep(Duration::from_millis(400));
    out.destroy_all_spinners()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "softspoken",
            "--width",
            "60",
            "--indent",
            "2",
            "--driver",
            "dot",
            "--table-glyphs",
            "boxed",
            "--color",
            "never",
            "--theme",
            r#"{"notice": "green"}"#,
            "demo",
        ]);
        let config = writer_config(&cli).unwrap();
        assert_eq!(config.output_width, Wrapping::Columns(60));
        assert_eq!(config.indentation_unit, "  ");
        assert_eq!(config.spinner_driver, SpinnerDriverKind::Dot);
        assert_eq!(config.table_glyphs, TableGlyphs::Boxed);
        assert_eq!(config.color, ColorMode::Never);
        assert_eq!(config.theme.len(), 1);
    }

    #[test]
    fn test_render_error_chain() {
        let err = anyhow!("inner").context("outer");
        assert_eq!(
            render_error(&err, ColorMode::Never),
            "[error] outer\n      Cause: inner"
        );
    }
}
