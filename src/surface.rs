//! The drawing surface the animation strokes onto.
//!
//! [`DrawingSurface`] is the small subset of a 2D canvas API the animation
//! needs. [`RecordingSurface`] implements it by logging every call, which is
//! how the animation is tested without a display.

use crate::config::Color;

/// How connected line segments are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Rounded corners.
    #[default]
    Round,
    /// Corners cut off square.
    Bevel,
    /// Sharp, extended corners.
    Miter,
}

/// Line-drawing primitives of a 2D canvas.
pub trait DrawingSurface {
    /// Erase the `width × height` area.
    fn clear(&mut self, width: f64, height: f64);
    /// Color used by subsequent [`stroke`](Self::stroke) calls.
    fn set_stroke_color(&mut self, color: &Color);
    /// Width used by subsequent strokes.
    fn set_line_width(&mut self, width: f64);
    /// Join style used by subsequent strokes.
    fn set_line_join(&mut self, join: LineJoin);
    /// Discard the current path and start a new one.
    fn begin_path(&mut self);
    /// Start a new sub-path at `(x, y)`.
    fn move_to(&mut self, x: f64, y: f64);
    /// Extend the current sub-path with a straight line to `(x, y)`.
    fn line_to(&mut self, x: f64, y: f64);
    /// Draw the current path with the current stroke settings.
    fn stroke(&mut self);
}

/// One recorded call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f64, height: f64 },
    StrokeColor(Color),
    LineWidth(f64),
    LineJoin(LineJoin),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
}

/// A surface that remembers every call made on it.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far, in order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of `stroke` calls so far.
    pub fn strokes(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Stroke))
            .count()
    }

    /// Forget all recorded calls.
    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl DrawingSurface for RecordingSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn set_stroke_color(&mut self, color: &Color) {
        self.commands.push(DrawCommand::StrokeColor(color.clone()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.commands.push(DrawCommand::LineJoin(join));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
}
