//! The writer: indented, themed, wrapped output with live spinners.
//!
//! A [`Writer`] is a cheap handle to shared state. Every operation locks that
//! state for the whole of its write, so output from spinner tickers and from
//! the application never interleaves mid-line.
//!
//! ## The last line
//!
//! A running spinner leaves its line unfinished so it can redraw it. While
//! that is the case the writer "needs clearing": the next unrelated write
//! first erases the line and takes it over. On its next tick the spinner
//! redraws only what was erased: the last line of its message, or its own
//! animation line. Message lines above it are still on screen.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{SpinnerDriverKind, Wrapping, WriterConfig};
use crate::errors::{Result, SoftSpokenError};
use crate::format::{format_elapsed, inspect, INSPECT_DEPTH};
use crate::primitives::{fill, left_indent, pad, visible_width, wrap_lines, OutputWidth};
use crate::spinner::{FrameOp, Phase, SpinnerFrames, SpinnerGeometry};
use crate::stream::{Console, OutputStream};
use crate::table::{Table, TableGlyphs};
use crate::theme::{Painter, Role};

/// Bullet template used by [`Writer::list`] when none is given.
pub const DEFAULT_BULLET: &str = "{n}.";

/// Identifies a spinner within its writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpinnerId(u64);

impl Display for SpinnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spinner-{}", self.0)
    }
}

/// One entry of [`Writer::properties`]: a key, a value and an optional role
/// for the value.
pub trait PropertyEntry {
    fn into_parts(self) -> (String, String, Option<Role>);
}

impl<K: Display, V: Display> PropertyEntry for (K, V) {
    fn into_parts(self) -> (String, String, Option<Role>) {
        (self.0.to_string(), self.1.to_string(), None)
    }
}

impl<K: Display, V: Display> PropertyEntry for (K, V, Role) {
    fn into_parts(self) -> (String, String, Option<Role>) {
        (self.0.to_string(), self.1.to_string(), Some(self.2))
    }
}

impl<K: Display, V: Display> PropertyEntry for (K, V, Option<Role>) {
    fn into_parts(self) -> (String, String, Option<Role>) {
        (self.0.to_string(), self.1.to_string(), self.2)
    }
}

struct SpinnerEntry {
    message: String,
    indent: String,
    started: Instant,
    frames: SpinnerFrames,
}

struct WriterState {
    stream: Box<dyn OutputStream>,
    painter: Painter,
    unit: String,
    default_level: usize,
    level: usize,
    width: OutputWidth,
    cursor: bool,
    needs_clearing: bool,
    driver: SpinnerDriverKind,
    glyphs: TableGlyphs,
    spinners: BTreeMap<SpinnerId, SpinnerEntry>,
    owner: Option<SpinnerId>,
    next_id: u64,
}

impl WriterState {
    fn left(&self) -> String {
        left_indent(&self.unit, self.level)
    }

    fn unit_width(&self) -> usize {
        visible_width(&self.unit)
    }

    /// Erase an unfinished spinner line before writing something else.
    fn prepare(&mut self) -> Result<()> {
        if self.needs_clearing {
            if self.cursor {
                self.stream.move_to_column(0)?;
                self.stream.clear_line_right()?;
            }
            self.needs_clearing = false;
            if let Some(owner) = self.owner.take() {
                debug!("{owner} released the last line");
            }
        }
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.stream.write_str(text)?;
        self.stream.flush()?;
        Ok(())
    }

    /// Wrap `text` at `level`, keep one unit free on the right, style every
    /// line and end with a newline.
    fn emit_at(&mut self, level: usize, role: Role, text: &str) -> Result<()> {
        self.prepare()?;
        let left = left_indent(&self.unit, level);
        let width = self.width.shrink(visible_width(&left) + self.unit_width());

        let mut out = String::new();
        for line in wrap_lines(text, width) {
            if !line.is_empty() {
                out.push_str(&left);
                out.push_str(&self.painter.paint(role, &line));
            }
            out.push('\n');
        }
        self.write(&out)
    }

    fn emit(&mut self, role: Role, text: &str) -> Result<()> {
        self.emit_at(self.level, role, text)
    }

    /// `label` padded to `label_width + 1` columns, then `value` wrapped in
    /// the remaining room with continuation lines aligned under it.
    fn aligned(
        &mut self,
        label: &str,
        label_role: Role,
        label_width: usize,
        value: &str,
        value_role: Role,
    ) -> Result<()> {
        self.prepare()?;
        let left = self.left();
        let column = visible_width(&pad(label, label_width.max(visible_width(label)), ' '));
        let width = self
            .width
            .shrink(visible_width(&left) + column + self.unit_width());

        let mut out = String::new();
        for (i, line) in wrap_lines(value, width).iter().enumerate() {
            out.push_str(&left);
            if i == 0 {
                out.push_str(&self.painter.paint(label_role, label));
                if !line.is_empty() {
                    out.push_str(&fill(column - visible_width(label), ' '));
                }
            } else {
                out.push_str(&fill(column, ' '));
            }
            out.push_str(&self.painter.paint(value_role, line));
            out.push('\n');
        }
        self.write(&out)
    }

    /// Replay frame operations. Cursor moves are dropped on streams without
    /// cursor control.
    fn apply(&mut self, ops: Vec<FrameOp>) -> Result<()> {
        for op in ops {
            match op {
                FrameOp::MoveTo(column) if self.cursor => self.stream.move_to_column(column)?,
                FrameOp::ClearRight if self.cursor => self.stream.clear_line_right()?,
                FrameOp::MoveTo(_) | FrameOp::ClearRight => {}
                FrameOp::Newline => self.stream.write_str("\n")?,
                FrameOp::Text(text) => self.stream.write_str(&text)?,
            }
        }
        self.stream.flush()?;
        Ok(())
    }

    /// Wrap a spinner message the way it is drawn.
    fn message_lines(&self, message: &str, indent: &str) -> Vec<String> {
        let width = self.width.shrink(visible_width(indent) + self.unit_width());
        wrap_lines(message, width)
    }

    /// Draw spinner message lines without a trailing newline and return the
    /// geometry of the last one.
    fn draw_lines(&mut self, lines: &[String], indent: &str) -> Result<SpinnerGeometry> {
        let mut out = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(indent);
            out.push_str(&self.painter.paint(Role::SpinnerSpinning, line));
        }
        self.write(&out)?;

        let last = lines.last().map(|l| visible_width(l)).unwrap_or(0);
        Ok(SpinnerGeometry {
            column: visible_width(indent) + last,
            indent: indent.to_string(),
            unit_width: self.unit_width(),
            width: self.width,
        })
    }

    fn draw_message(&mut self, message: &str, indent: &str) -> Result<SpinnerGeometry> {
        let lines = self.message_lines(message, indent);
        self.draw_lines(&lines, indent)
    }

    /// Redraw the one line of a spinner that another write erased. The cursor
    /// is at the start of an empty line.
    fn resume(&mut self, entry: &mut SpinnerEntry) -> Result<()> {
        match entry.frames.phase() {
            Phase::Inline => {
                let mut lines = self.message_lines(&entry.message, &entry.indent);
                let last = lines.split_off(lines.len().saturating_sub(1));
                let geometry = self.draw_lines(&last, &entry.indent)?;
                entry.frames.restart(geometry);
            }
            Phase::OwnLine => {
                let ops = entry.frames.resume_own_line(self.width);
                self.apply(ops)?;
            }
            Phase::Stopped => {}
        }
        Ok(())
    }
}

/// Formatted, indented output to a single stream.
///
/// # Example
///
/// ```
/// use softspoken_core::config::{Wrapping, WriterConfig};
/// use softspoken_core::stream::MemoryStream;
/// use softspoken_core::writer::Writer;
/// use softspoken_core::ColorMode;
///
/// let stream = MemoryStream::new();
/// let config = WriterConfig {
///     output_width: Wrapping::Columns(40),
///     color: ColorMode::Never,
///     ..Default::default()
/// };
/// let writer = Writer::with_stream(config, stream.clone()).unwrap();
/// writer.success("Deployed").unwrap();
/// writer.properties([("region", "eu-west-1"), ("id", "42")]).unwrap();
///
/// assert_eq!(
///     stream.contents(),
///     "    Deployed\n    region eu-west-1\n    id     42\n"
/// );
/// ```
#[derive(Clone)]
pub struct Writer {
    shared: Arc<Mutex<WriterState>>,
    interval: Option<Duration>,
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Writer")
            .field("level", &state.level)
            .field("width", &state.width)
            .field("needs_clearing", &state.needs_clearing)
            .field("spinners", &state.spinners.len())
            .finish()
    }
}

impl Writer {
    /// A writer on standard output.
    pub fn new(config: WriterConfig) -> Result<Self> {
        Self::with_stream(config, Console::stdout())
    }

    /// A writer on any stream.
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate (bad theme, unknown style,
    /// zero width, multi-line indentation unit).
    pub fn with_stream(config: WriterConfig, stream: impl OutputStream + 'static) -> Result<Self> {
        for warning in config.validate()? {
            warn!("Config warning: {}", warning);
        }
        if let Wrapping::Columns(0) = config.output_width {
            return Err(SoftSpokenError::InvalidWidth(
                "output width must be at least 1 column".to_string(),
            ));
        }

        let painter = Painter::new(
            config.build_theme()?,
            config.color.is_enabled(stream.is_terminal()),
        );
        let cursor = stream.supports_cursor();
        let width = config.output_width.resolve(stream.columns());
        debug!(
            cursor,
            colors = painter.colors_enabled(),
            ?width,
            "writer ready"
        );
        if !cursor {
            debug!("stream has no cursor control; spinners will not animate");
        }

        let state = WriterState {
            stream: Box::new(stream),
            painter,
            unit: config.indentation_unit.clone(),
            default_level: config.default_indentation_level,
            level: config.default_indentation_level,
            width,
            cursor,
            needs_clearing: false,
            driver: config.spinner_driver,
            glyphs: config.table_glyphs,
            spinners: BTreeMap::new(),
            owner: None,
            next_id: 0,
        };

        Ok(Self {
            shared: Arc::new(Mutex::new(state)),
            interval: config.spinner_interval(),
        })
    }

    fn state(&self) -> MutexGuard<'_, WriterState> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn log(&self, data: impl Display) -> Result<()> {
        self.state().emit(Role::Log, &data.to_string())
    }

    pub fn success(&self, data: impl Display) -> Result<()> {
        self.state().emit(Role::Success, &data.to_string())
    }

    /// A section heading, preceded by a blank line.
    pub fn caption(&self, data: impl Display) -> Result<()> {
        let mut state = self.state();
        state.prepare()?;
        state.write("\n")?;
        state.emit(Role::Caption, &data.to_string())
    }

    pub fn notice(&self, data: impl Display) -> Result<()> {
        self.state().emit(Role::Notice, &data.to_string())
    }

    pub fn error(&self, data: impl Display) -> Result<()> {
        self.state().emit(Role::Error, &data.to_string())
    }

    pub fn debug(&self, data: impl Display) -> Result<()> {
        self.state().emit(Role::Debug, &data.to_string())
    }

    /// Print a structured value, three levels deep.
    pub fn debug_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.state().emit(Role::Debug, &inspect(&value, INSPECT_DEPTH))
    }

    pub fn indent(&self) {
        let mut state = self.state();
        state.level += 1;
    }

    /// One level back, never below the configured default.
    pub fn outdent(&self) {
        let mut state = self.state();
        state.level = state.level.saturating_sub(1).max(state.default_level);
    }

    /// Change how the output width is determined.
    pub fn set_wrapping(&self, wrapping: Wrapping) -> Result<()> {
        if let Wrapping::Columns(0) = wrapping {
            return Err(SoftSpokenError::InvalidWidth(
                "output width must be at least 1 column".to_string(),
            ));
        }
        let mut state = self.state();
        state.width = wrapping.resolve(state.stream.columns());
        debug!(width = ?state.width, "output width changed");
        Ok(())
    }

    /// `key` on its own line, `value` one level deeper.
    pub fn definition(&self, key: impl Display, value: impl Display) -> Result<()> {
        let mut state = self.state();
        let level = state.level;
        state.emit_at(level, Role::DefinitionKey, &key.to_string())?;
        state.emit_at(level + 1, Role::DefinitionValue, &value.to_string())
    }

    /// One `key value` line, the key padded to `key_width`. `style` replaces
    /// the value's role.
    pub fn property(
        &self,
        key: impl Display,
        value: impl Display,
        key_width: usize,
        style: Option<Role>,
    ) -> Result<()> {
        self.state().aligned(
            &key.to_string(),
            Role::PropertyKey,
            key_width,
            &value.to_string(),
            style.unwrap_or(Role::PropertyValue),
        )
    }

    /// Aligned `key value` lines, in iteration order.
    ///
    /// Entries are `(key, value)` pairs, or `(key, value, role)` triples
    /// whose role (plain or `Option`) replaces the value style for that line.
    pub fn properties<I, E>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = E>,
        E: PropertyEntry,
    {
        self.write_properties(entries, Role::PropertyValue)
    }

    /// Like [`Writer::properties`], with values styled as `role` unless an
    /// entry names its own.
    pub fn properties_as<I, E>(&self, entries: I, role: Role) -> Result<()>
    where
        I: IntoIterator<Item = E>,
        E: PropertyEntry,
    {
        self.write_properties(entries, role)
    }

    fn write_properties<I, E>(&self, entries: I, role: Role) -> Result<()>
    where
        I: IntoIterator<Item = E>,
        E: PropertyEntry,
    {
        let entries: Vec<(String, String, Option<Role>)> =
            entries.into_iter().map(PropertyEntry::into_parts).collect();
        let key_width = entries
            .iter()
            .map(|(k, _, _)| visible_width(k))
            .max()
            .unwrap_or(0);

        let mut state = self.state();
        for (key, value, style) in &entries {
            state.aligned(key, Role::PropertyKey, key_width, value, style.unwrap_or(role))?;
        }
        Ok(())
    }

    /// A numbered (or bulleted) list. `{n}` in the template is replaced by
    /// the 1-based position; the default is `"{n}."`.
    pub fn list<I, T>(&self, items: I, bullet: Option<&str>) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let template = bullet.unwrap_or(DEFAULT_BULLET);
        let items: Vec<(String, String)> = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| (template.replace("{n}", &(i + 1).to_string()), item.to_string()))
            .collect();
        let bullet_width = items.iter().map(|(b, _)| visible_width(b)).max().unwrap_or(0);

        let mut state = self.state();
        for (bullet, value) in &items {
            state.aligned(bullet, Role::ListItemBullet, bullet_width, value, Role::ListItemValue)?;
        }
        Ok(())
    }

    /// A single list entry with an explicit bullet.
    pub fn list_item(&self, value: impl Display, bullet: &str) -> Result<()> {
        self.state().aligned(
            bullet,
            Role::ListItemBullet,
            visible_width(bullet),
            &value.to_string(),
            Role::ListItemValue,
        )
    }

    /// Render a table at the current indentation.
    pub fn table<H, R, C>(
        &self,
        headers: impl IntoIterator<Item = H>,
        rows: impl IntoIterator<Item = R>,
        expanded: bool,
    ) -> Result<()>
    where
        H: Display,
        R: IntoIterator<Item = C>,
        C: Display,
    {
        let glyphs = self.state().glyphs;
        let mut table = Table::new(headers).expanded(expanded).glyphs(glyphs);
        for row in rows {
            table.add_row(row);
        }
        self.print_table(&table)
    }

    /// Render a prepared [`Table`] with its own glyph set.
    pub fn print_table(&self, table: &Table) -> Result<()> {
        let mut state = self.state();
        state.prepare()?;
        let left = state.left();
        let mut out = String::new();
        for line in table.render(&state.painter, &left, state.width) {
            out.push_str(&line);
            out.push('\n');
        }
        state.write(&out)
    }

    /// An empty line.
    pub fn line_break(&self) -> Result<()> {
        let mut state = self.state();
        state.prepare()?;
        state.write("\n")
    }

    pub fn indentation_level(&self) -> usize {
        self.state().level
    }

    pub fn output_width(&self) -> OutputWidth {
        self.state().width
    }

    /// Whether the last line is an unfinished spinner line.
    pub fn needs_clearing(&self) -> bool {
        self.state().needs_clearing
    }

    /// Number of running spinners.
    pub fn active_spinners(&self) -> usize {
        self.state().spinners.len()
    }

    pub fn colors_enabled(&self) -> bool {
        self.state().painter.colors_enabled()
    }

    /// Start a spinner after `message`.
    ///
    /// With a non-zero frame interval and a cursor-capable stream, a
    /// background thread advances the animation; otherwise frames advance
    /// only through [`Spinner::tick`]. Streams without cursor control print
    /// nothing until the spinner stops.
    pub fn spinner(&self, message: impl Display) -> Result<Spinner> {
        self.start_spinner(message.to_string(), thread::Builder::new())
    }

    /// Register and draw a spinner. The ticker thread, if any, is spawned
    /// before anything is drawn or registered, so a failed spawn leaves no
    /// trace; the thread cannot tick until the state lock is released.
    fn start_spinner(&self, message: String, ticker: thread::Builder) -> Result<Spinner> {
        let mut guard = self.state();
        let state = &mut *guard;

        let id = SpinnerId(state.next_id);
        state.next_id += 1;

        let ticker = match self.interval {
            Some(interval) if state.cursor => Some(self.spawn_ticker(ticker, id, interval)?),
            _ => None,
        };

        state.prepare()?;
        let indent = state.left();
        let frames = if state.cursor {
            let geometry = state.draw_message(&message, &indent)?;
            state.needs_clearing = true;
            state.owner = Some(id);
            SpinnerFrames::new(state.driver, geometry)
        } else {
            SpinnerFrames::new(
                state.driver,
                SpinnerGeometry {
                    column: 0,
                    indent: indent.clone(),
                    unit_width: state.unit_width(),
                    width: state.width,
                },
            )
        };

        let started = Instant::now();
        state.spinners.insert(
            id,
            SpinnerEntry {
                message,
                indent,
                started,
                frames,
            },
        );
        debug!("{id} started");

        Ok(Spinner {
            writer: self.clone(),
            id,
            started,
            ticker,
        })
    }

    fn spawn_ticker(
        &self,
        builder: thread::Builder,
        id: SpinnerId,
        interval: Duration,
    ) -> Result<Sender<()>> {
        let (tx, rx) = mpsc::channel::<()>();
        let writer = self.clone();
        builder
            .name(format!("softspoken-{id}"))
            .spawn(move || loop {
                match rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => match writer.tick_spinner(id) {
                        Ok(true) => continue,
                        Ok(false) => break,
                        Err(e) => {
                            warn!("{id} stopped ticking: {e}");
                            break;
                        }
                    },
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;
        Ok(tx)
    }

    /// Advance one frame. Returns `false` once the spinner is no longer
    /// registered.
    fn tick_spinner(&self, id: SpinnerId) -> Result<bool> {
        let mut guard = self.state();
        let state = &mut *guard;
        if !state.spinners.contains_key(&id) {
            return Ok(false);
        }
        if !state.cursor {
            return Ok(true);
        }

        match state.owner {
            Some(owner) if owner != id => return Ok(true),
            Some(_) => {}
            None => {
                state.prepare()?;
                let Some(mut entry) = state.spinners.remove(&id) else {
                    return Ok(false);
                };
                let resumed = state.resume(&mut entry);
                state.spinners.insert(id, entry);
                resumed?;
                state.needs_clearing = true;
                state.owner = Some(id);
                debug!("{id} claimed the last line");
            }
        }

        let ops = match state.spinners.get_mut(&id) {
            Some(entry) => entry.frames.advance(&state.painter),
            None => return Ok(false),
        };
        state.apply(ops)?;
        Ok(true)
    }

    /// Unregister and print the done line. Returns `false` if the spinner was
    /// already stopped.
    fn stop_spinner(&self, id: SpinnerId, done: Option<String>) -> Result<bool> {
        let mut guard = self.state();
        let state = &mut *guard;
        let Some(mut entry) = state.spinners.remove(&id) else {
            return Ok(false);
        };

        let elapsed = entry.started.elapsed();
        let done = done.unwrap_or_else(|| format!("({})", format_elapsed(elapsed)));

        let ops = if !state.cursor {
            let geometry = state.draw_message(&entry.message, &entry.indent)?;
            SpinnerFrames::new(state.driver, geometry).finish(&done, &state.painter)
        } else {
            if state.owner == Some(id) && state.needs_clearing {
                state.needs_clearing = false;
                state.owner = None;
            } else {
                state.prepare()?;
                state.resume(&mut entry)?;
            }
            entry.frames.finish(&done, &state.painter)
        };
        state.apply(ops)?;

        debug!("{id} stopped after {}", format_elapsed(elapsed));
        Ok(true)
    }

    /// Stop every running spinner, oldest first. Each prints its done line.
    pub fn destroy_all_spinners(&self) -> Result<()> {
        let ids: Vec<SpinnerId> = self.state().spinners.keys().copied().collect();
        for id in ids {
            self.stop_spinner(id, None)?;
        }
        Ok(())
    }
}

/// Handle to a running spinner. Dropping it stops the spinner.
#[derive(Debug)]
pub struct Spinner {
    writer: Writer,
    id: SpinnerId,
    started: Instant,
    ticker: Option<Sender<()>>,
}

impl Spinner {
    pub fn id(&self) -> SpinnerId {
        self.id
    }

    /// Advance the animation by one frame.
    pub fn tick(&self) -> Result<()> {
        self.writer.tick_spinner(self.id).map(|_| ())
    }

    /// Stop and print the elapsed time. Further calls do nothing.
    pub fn stop(&mut self) -> Result<()> {
        self.halt_ticker();
        self.writer.stop_spinner(self.id, None).map(|_| ())
    }

    /// Stop and print `text` instead of the elapsed time.
    pub fn stop_with(&mut self, text: impl Display) -> Result<()> {
        self.halt_ticker();
        self.writer
            .stop_spinner(self.id, Some(text.to_string()))
            .map(|_| ())
    }

    pub fn is_active(&self) -> bool {
        self.writer.state().spinners.contains_key(&self.id)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn halt_ticker(&mut self) {
        if let Some(tx) = self.ticker.take() {
            // The thread may already have exited.
            let _ = tx.send(());
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("{} failed to stop cleanly: {e}", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorMode;
    use crate::stream::MemoryStream;
    use serde_json::json;

    fn config(width: usize) -> WriterConfig {
        WriterConfig {
            indentation_unit: "  ".to_string(),
            output_width: Wrapping::Columns(width),
            spinner_frame_interval_ms: 0,
            color: ColorMode::Never,
            ..Default::default()
        }
    }

    fn writer(width: usize) -> (Writer, MemoryStream) {
        let stream = MemoryStream::new();
        let writer = Writer::with_stream(config(width), stream.clone()).unwrap();
        (writer, stream)
    }

    #[test]
    fn test_log_at_level_two() {
        let (writer, stream) = writer(80);
        writer.indent();
        writer.log("hello").unwrap();
        assert_eq!(stream.raw(), "    hello\n");
    }

    #[test]
    fn test_log_wraps_with_right_margin() {
        let (writer, stream) = writer(12);
        // 12 - 2 left - 2 right = 8 columns of text.
        writer.log("aaaa bbbb cccc").unwrap();
        assert_eq!(stream.contents(), "  aaaa\n  bbbb\n  cccc\n");
    }

    #[test]
    fn test_outdent_floor() {
        let (writer, _) = writer(80);
        assert_eq!(writer.indentation_level(), 1);
        writer.outdent();
        writer.outdent();
        assert_eq!(writer.indentation_level(), 1);
        writer.indent();
        writer.indent();
        writer.outdent();
        assert_eq!(writer.indentation_level(), 2);
    }

    #[test]
    fn test_caption_adds_blank_line() {
        let (writer, stream) = writer(80);
        writer.log("before").unwrap();
        writer.caption("Section").unwrap();
        assert_eq!(stream.contents(), "  before\n\n  Section\n");
    }

    #[test]
    fn test_properties_align_values() {
        let (writer, stream) = writer(80);
        writer.properties([("a", "1"), ("bb", "2")]).unwrap();
        assert_eq!(stream.contents(), "  a  1\n  bb 2\n");
    }

    #[test]
    fn test_property_continuation_lines() {
        let (writer, stream) = writer(14);
        // value room: 14 - 2 - 4 - 2 = 6.
        writer.property("key", "one two three", 0, None).unwrap();
        assert_eq!(stream.contents(), "  key one\n      two\n      three\n");
    }

    #[test]
    fn test_definition() {
        let (writer, stream) = writer(80);
        writer.definition("term", "meaning").unwrap();
        assert_eq!(stream.contents(), "  term\n    meaning\n");
    }

    #[test]
    fn test_list_numbering_and_alignment() {
        let (writer, stream) = writer(80);
        let items: Vec<String> = (1..=10).map(|i| format!("item {i}")).collect();
        writer.list(&items, None).unwrap();
        let lines = stream.lines();
        assert_eq!(lines[0], "  1.  item 1");
        assert_eq!(lines[9], "  10. item 10");
    }

    #[test]
    fn test_list_item_custom_bullet() {
        let (writer, stream) = writer(80);
        writer.list_item("first", "-").unwrap();
        writer.list(["x", "y"], Some("*")).unwrap();
        assert_eq!(stream.contents(), "  - first\n  * x\n  * y\n");
    }

    #[test]
    fn test_table() {
        let (writer, stream) = writer(80);
        writer
            .table(["NAME", "AGE"], [vec!["ann", "31"], vec!["bob", "4"]], false)
            .unwrap();
        assert_eq!(stream.contents(), "  NAME  AGE\n  ann   31\n  bob   4\n");
    }

    #[test]
    fn test_debug_value() {
        let (writer, stream) = writer(80);
        writer.debug_value(&json!({"a": [1, 2]})).unwrap();
        assert_eq!(stream.contents(), "  { a: [ 1, 2 ] }\n");
    }

    #[test]
    fn test_line_break() {
        let (writer, stream) = writer(80);
        writer.line_break().unwrap();
        assert_eq!(stream.raw(), "\n");
    }

    #[test]
    fn test_set_wrapping() {
        let stream = MemoryStream::new().with_columns(50);
        let writer = Writer::with_stream(config(80), stream).unwrap();
        writer.set_wrapping(Wrapping::Terminal).unwrap();
        assert_eq!(writer.output_width(), OutputWidth::Fixed(50));
        writer.set_wrapping(Wrapping::Unbounded).unwrap();
        assert_eq!(writer.output_width(), OutputWidth::Unbounded);
        assert!(matches!(
            writer.set_wrapping(Wrapping::Columns(0)),
            Err(SoftSpokenError::InvalidWidth(_))
        ));
        assert_eq!(writer.output_width(), OutputWidth::Unbounded);
    }

    #[test]
    fn test_terminal_width_fallback() {
        let config = WriterConfig {
            output_width: Wrapping::Terminal,
            ..config(1)
        };
        let writer = Writer::with_stream(config, MemoryStream::new()).unwrap();
        assert_eq!(writer.output_width(), OutputWidth::Fixed(200));
    }

    #[test]
    fn test_rejects_bad_theme() {
        let mut config = config(80);
        config.theme.insert(Role::Notice, Some("sparkly".into()));
        assert!(matches!(
            Writer::with_stream(config, MemoryStream::new()),
            Err(SoftSpokenError::UnknownStyle(_))
        ));
    }

    #[test]
    fn test_spinner_animates_in_place() {
        let (writer, stream) = writer(40);
        let mut spinner = writer.spinner("Working").unwrap();
        assert!(writer.needs_clearing());
        spinner.tick().unwrap();
        assert_eq!(stream.contents(), "  Working ▖");
        spinner.tick().unwrap();
        assert_eq!(stream.contents(), "  Working ▘");

        spinner.stop_with("done").unwrap();
        assert_eq!(stream.contents(), "  Working done\n");
        assert!(!writer.needs_clearing());
        assert!(!spinner.is_active());
    }

    #[test]
    fn test_spinner_after_wide_message() {
        let (writer, stream) = writer(40);
        let spinner = writer.spinner("日本").unwrap();
        spinner.tick().unwrap();
        spinner.tick().unwrap();
        assert_eq!(stream.contents(), "  日本 ▘");
    }

    #[test]
    fn test_log_takes_over_spinner_line() {
        let (writer, stream) = writer(40);
        let mut spinner = writer.spinner("Working").unwrap();
        spinner.tick().unwrap();
        writer.log("note").unwrap();
        assert_eq!(stream.contents(), "  note\n");

        spinner.tick().unwrap();
        assert_eq!(stream.contents(), "  note\n  Working ▖");
        spinner.stop_with("done").unwrap();
        assert_eq!(stream.contents(), "  note\n  Working done\n");
    }

    #[test]
    fn test_interrupted_multi_line_spinner_redraws_last_line_only() {
        let (writer, stream) = writer(16);
        let mut spinner = writer.spinner("first line\nsecond").unwrap();
        spinner.tick().unwrap();
        writer.log("note").unwrap();
        assert_eq!(stream.lines(), vec!["  first line", "  note", ""]);

        spinner.tick().unwrap();
        assert_eq!(stream.lines(), vec!["  first line", "  note", "  second ▖"]);
        spinner.stop_with("done").unwrap();
        assert_eq!(stream.lines(), vec!["  first line", "  note", "  second done", ""]);
    }

    #[test]
    fn test_interrupted_own_line_spinner_keeps_message() {
        let (writer, stream) = writer(12);
        // "  abcdefgh" leaves no room, so the animation gets its own line.
        let mut spinner = writer.spinner("abcdefgh").unwrap();
        spinner.tick().unwrap();
        writer.log("note").unwrap();
        spinner.tick().unwrap();
        assert_eq!(stream.lines(), vec!["  abcdefgh", "  note", "  ▘"]);

        spinner.stop_with("ok").unwrap();
        assert_eq!(stream.contents(), "  abcdefgh\n  note\n  ok\n");
    }

    #[test]
    fn test_stop_after_interruption_without_tick() {
        let (writer, stream) = writer(16);
        let mut spinner = writer.spinner("first line\nsecond").unwrap();
        writer.log("note").unwrap();
        spinner.stop_with("done").unwrap();
        assert_eq!(stream.contents(), "  first line\n  note\n  second done\n");
        assert!(!writer.needs_clearing());
    }

    #[cfg(all(target_os = "linux", target_pointer_width = "64"))]
    #[test]
    fn test_failed_ticker_spawn_leaves_no_spinner() {
        let stream = MemoryStream::new();
        let config = WriterConfig {
            spinner_frame_interval_ms: 50,
            ..config(40)
        };
        let writer = Writer::with_stream(config, stream.clone()).unwrap();
        // No system can map a stack this large.
        let builder = thread::Builder::new().stack_size(1 << 60);
        let result = writer.start_spinner("Working".to_string(), builder);

        assert!(matches!(result, Err(SoftSpokenError::Io(_))));
        assert_eq!(writer.active_spinners(), 0);
        assert!(!writer.needs_clearing());
        assert_eq!(stream.raw(), "");

        writer.log("after").unwrap();
        assert_eq!(stream.contents(), "  after\n");
    }

    #[test]
    fn test_property_entries_with_roles() {
        let stream = MemoryStream::new();
        let config = WriterConfig {
            color: ColorMode::Always,
            ..config(80)
        };
        let writer = Writer::with_stream(config, stream.clone()).unwrap();
        writer
            .properties([
                ("ok", "fine", None),
                ("bad", "broken", Some(Role::Error)),
            ])
            .unwrap();
        assert_eq!(stream.contents(), "  ok  fine\n  bad broken\n");

        let raw = stream.raw();
        let mut lines = raw.lines();
        let plain_line = lines.next().unwrap();
        let error_line = lines.next().unwrap();
        // propertyValue is reset (no code); error is red.
        assert!(plain_line.ends_with("fine"));
        assert!(!plain_line.contains("\u{1b}[31m"));
        assert!(error_line.contains("\u{1b}[31m"));
    }

    #[test]
    fn test_properties_as_keeps_entry_roles() {
        let (writer, stream) = writer(80);
        writer
            .properties_as([("a", "1", Role::Success), ("bb", "2", Role::Notice)], Role::Debug)
            .unwrap();
        writer.properties_as([("c", "3")], Role::Debug).unwrap();
        assert_eq!(stream.contents(), "  a  1\n  bb 2\n  c 3\n");
    }

    #[test]
    fn test_table_uses_configured_glyphs() {
        let config = WriterConfig {
            table_glyphs: TableGlyphs::Boxed,
            ..config(80)
        };
        let stream = MemoryStream::new();
        let writer = Writer::with_stream(config, stream.clone()).unwrap();
        writer.table(["K", "V"], [["a", "1"]], true).unwrap();
        writer.table(["K", "V"], [["a", "1"]], false).unwrap();
        assert_eq!(
            stream.lines(),
            vec!["  ╔═╤═╗", "  ║K│V║", "  ╟─┼─╢", "  ║a│1║", "  ╚═╧═╝", "  K  V", "  a  1", ""]
        );
    }

    #[test]
    fn test_double_stop_is_silent() {
        let (writer, stream) = writer(40);
        let mut spinner = writer.spinner("Once").unwrap();
        spinner.stop_with("ok").unwrap();
        let after_first = stream.raw();
        spinner.stop().unwrap();
        spinner.stop_with("again").unwrap();
        drop(spinner);
        assert_eq!(stream.raw(), after_first);
        assert_eq!(writer.active_spinners(), 0);
    }

    #[test]
    fn test_drop_stops_spinner() {
        let (writer, stream) = writer(40);
        {
            let _spinner = writer.spinner("Scoped").unwrap();
            assert_eq!(writer.active_spinners(), 1);
        }
        assert_eq!(writer.active_spinners(), 0);
        assert!(stream.contents().starts_with("  Scoped ("));
    }

    #[test]
    fn test_destroy_all_spinners() {
        let (writer, stream) = writer(40);
        let spinners: Vec<Spinner> = ["a", "b", "c"]
            .iter()
            .map(|m| writer.spinner(m).unwrap())
            .collect();
        assert_eq!(writer.active_spinners(), 3);

        writer.destroy_all_spinners().unwrap();
        assert_eq!(writer.active_spinners(), 0);
        let done: Vec<String> = stream
            .lines()
            .into_iter()
            .filter(|l| l.ends_with(')'))
            .collect();
        assert_eq!(done.len(), 3);
        assert!(done[0].starts_with("  a ("));
        assert!(done[2].starts_with("  c ("));

        let before = stream.raw();
        drop(spinners);
        assert_eq!(stream.raw(), before);
    }

    #[test]
    fn test_spinner_without_cursor() {
        let stream = MemoryStream::new().without_cursor();
        let writer = Writer::with_stream(config(40), stream.clone()).unwrap();
        let mut spinner = writer.spinner("Working").unwrap();
        spinner.tick().unwrap();
        assert_eq!(stream.raw(), "");
        assert!(!writer.needs_clearing());

        spinner.stop_with("done").unwrap();
        assert_eq!(stream.raw(), "  Working done\n");
    }

    #[test]
    fn test_dot_driver() {
        let config = WriterConfig {
            spinner_driver: SpinnerDriverKind::Dot,
            ..config(40)
        };
        let stream = MemoryStream::new();
        let writer = Writer::with_stream(config, stream.clone()).unwrap();
        let mut spinner = writer.spinner("Loading").unwrap();
        for _ in 0..3 {
            spinner.tick().unwrap();
        }
        assert_eq!(stream.contents(), "  Loading...");
        spinner.stop_with("ok").unwrap();
        assert_eq!(stream.contents(), "  Loading ok\n");
    }
}
