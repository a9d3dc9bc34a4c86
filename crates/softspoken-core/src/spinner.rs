//! Spinner animation state machines.
//!
//! A spinner never touches the stream itself. Each call returns the
//! [`FrameOp`]s for one frame and the writer replays them, so overflow and
//! completion behavior can be checked without a terminal.
//!
//! ```text
//!   Inline ──(no room left on the message line)──> OwnLine
//!     │                                               │
//!     └──────────────── finish() ──> Stopped <────────┘
//! ```

use crate::config::SpinnerDriverKind;
use crate::primitives::{visible_width, wrap_lines, OutputWidth};
use crate::theme::{Painter, Role};

/// Glyphs cycled by the sprite driver.
pub const SPRITE_FRAMES: [char; 4] = ['▖', '▘', '▝', '▗'];

const DOT: &str = ".";

/// One cursor or text operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOp {
    /// Move the cursor to this zero-based column on the current line.
    MoveTo(usize),
    /// Erase from the cursor to the end of the line.
    ClearRight,
    Newline,
    Text(String),
}

/// Where the animation is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// After the message, on the message's last line.
    Inline,
    /// On a separate, indented line below the message.
    OwnLine,
    Stopped,
}

/// Layout of the line a spinner animates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinnerGeometry {
    /// Column right after the message's last line (indentation included).
    pub column: usize,
    /// Left indentation used when the animation moves to its own line.
    pub indent: String,
    /// Width of one indentation unit, kept free as a right margin.
    pub unit_width: usize,
    pub width: OutputWidth,
}

impl SpinnerGeometry {
    /// Free columns after the message.
    fn room(&self) -> usize {
        match self.width {
            OutputWidth::Fixed(w) => w.saturating_sub(self.column + self.unit_width),
            OutputWidth::Unbounded => usize::MAX,
        }
    }

    /// Free columns on an indented line of its own. Never below 1.
    fn own_line_room(&self) -> usize {
        match self.width {
            OutputWidth::Fixed(w) => w
                .saturating_sub(visible_width(&self.indent) + self.unit_width)
                .max(1),
            OutputWidth::Unbounded => usize::MAX,
        }
    }

    fn indent_width(&self) -> usize {
        visible_width(&self.indent)
    }
}

/// Frame generator for one spinner.
#[derive(Debug, Clone)]
pub struct SpinnerFrames {
    kind: SpinnerDriverKind,
    phase: Phase,
    /// Sprite: frames drawn so far. Dot: dots on the current run.
    step: usize,
    geometry: SpinnerGeometry,
}

impl SpinnerFrames {
    pub fn new(kind: SpinnerDriverKind, geometry: SpinnerGeometry) -> Self {
        Self {
            kind,
            phase: Phase::Inline,
            step: 0,
            geometry,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn kind(&self) -> SpinnerDriverKind {
        self.kind
    }

    /// Start over after the message has been redrawn on a fresh line.
    pub fn restart(&mut self, geometry: SpinnerGeometry) {
        if self.phase != Phase::Stopped {
            self.phase = Phase::Inline;
            self.step = 0;
            self.geometry = geometry;
        }
    }

    /// Continue on a fresh line of its own after the previous one was erased.
    /// Expects the cursor at the start of an empty line. Does nothing unless
    /// the animation already had its own line.
    pub fn resume_own_line(&mut self, width: OutputWidth) -> Vec<FrameOp> {
        if self.phase != Phase::OwnLine {
            return Vec::new();
        }
        self.geometry.width = width;
        self.step = 0;
        vec![FrameOp::Text(self.geometry.indent.clone())]
    }

    /// Operations for the next animation frame. Empty once stopped.
    pub fn advance(&mut self, painter: &Painter) -> Vec<FrameOp> {
        match (self.phase, self.kind) {
            (Phase::Stopped, _) => Vec::new(),
            (_, SpinnerDriverKind::Sprite) => self.advance_sprite(painter),
            (_, SpinnerDriverKind::Dot) => self.advance_dot(painter),
        }
    }

    fn advance_sprite(&mut self, painter: &Painter) -> Vec<FrameOp> {
        let mut ops = Vec::new();
        if self.phase == Phase::Inline && self.geometry.room() < 2 {
            self.break_line(&mut ops);
        }

        let glyph = SPRITE_FRAMES[self.step % SPRITE_FRAMES.len()].to_string();
        let glyph = painter.paint(Role::SpinnerSpinning, &glyph);
        self.step += 1;

        ops.push(FrameOp::MoveTo(self.anchor()));
        ops.push(FrameOp::ClearRight);
        ops.push(FrameOp::Text(match self.phase {
            Phase::Inline => format!(" {glyph}"),
            _ => glyph,
        }));
        ops
    }

    fn advance_dot(&mut self, painter: &Painter) -> Vec<FrameOp> {
        let mut ops = Vec::new();
        self.step += 1;

        let overflow = match self.phase {
            Phase::Inline => self.geometry.room() < 2 || self.step > self.geometry.room(),
            _ => self.step > self.geometry.own_line_room(),
        };
        if overflow {
            match self.phase {
                Phase::Inline => self.break_line(&mut ops),
                _ => {
                    ops.push(FrameOp::MoveTo(self.anchor()));
                    ops.push(FrameOp::ClearRight);
                }
            }
            self.step = 1;
        }

        ops.push(FrameOp::Text(painter.paint(Role::SpinnerSpinning, DOT)));
        ops
    }

    /// Erase the animation and print `done` (plain text, styled here) inline
    /// when it fits, otherwise wrapped on indented lines below. Always ends
    /// with a newline. Empty if already stopped.
    pub fn finish(&mut self, done: &str, painter: &Painter) -> Vec<FrameOp> {
        if self.phase == Phase::Stopped {
            return Vec::new();
        }

        let mut ops = vec![FrameOp::MoveTo(self.anchor()), FrameOp::ClearRight];
        let done_width = visible_width(done);

        match self.phase {
            Phase::Inline if done_width < self.geometry.room() => {
                ops.push(FrameOp::Text(format!(
                    " {}",
                    painter.paint(Role::SpinnerDone, done)
                )));
            }
            Phase::Inline => {
                for line in wrap_lines(done, OutputWidth::Fixed(self.geometry.own_line_room())) {
                    ops.push(FrameOp::Newline);
                    ops.push(FrameOp::Text(format!(
                        "{}{}",
                        self.geometry.indent,
                        painter.paint(Role::SpinnerDone, &line)
                    )));
                }
            }
            _ => {
                let lines = wrap_lines(done, OutputWidth::Fixed(self.geometry.own_line_room()));
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        ops.push(FrameOp::Newline);
                        ops.push(FrameOp::Text(self.geometry.indent.clone()));
                    }
                    ops.push(FrameOp::Text(painter.paint(Role::SpinnerDone, line)));
                }
            }
        }

        ops.push(FrameOp::Newline);
        self.phase = Phase::Stopped;
        ops
    }

    fn break_line(&mut self, ops: &mut Vec<FrameOp>) {
        ops.push(FrameOp::Newline);
        ops.push(FrameOp::Text(self.geometry.indent.clone()));
        self.phase = Phase::OwnLine;
    }

    fn anchor(&self) -> usize {
        match self.phase {
            Phase::Inline => self.geometry.column,
            _ => self.geometry.indent_width(),
        }
    }
}
