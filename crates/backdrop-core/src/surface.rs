//! Drawing command stream and the surface it is replayed onto.
//!
//! Effects never paint directly. Each frame they emit a list of
//! [`DrawCommand`]s mirroring the primitives of a 2D canvas context, and a
//! host replays the list onto whatever [`Surface`] it owns.

use crate::color::Rgba;

/// A single 2D drawing primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Clear a rectangle to transparent.
    ClearRect { x: f64, y: f64, w: f64, h: f64 },
    /// Discard the current path and start a new one.
    BeginPath,
    /// Start a new subpath at the given point.
    MoveTo { x: f64, y: f64 },
    /// Add a straight segment from the current point.
    LineTo { x: f64, y: f64 },
    /// Add a full circle to the current path.
    Arc { x: f64, y: f64, radius: f64 },
    /// Close the current subpath back to its starting point.
    ClosePath,
    /// Stroke the current path.
    Stroke { color: Rgba, width: f64 },
    /// Fill the current path.
    Fill { color: Rgba },
    /// Fill an axis-aligned rectangle without touching the current path.
    FillRect { x: f64, y: f64, w: f64, h: f64, color: Rgba },
    /// Glow applied to subsequent strokes and fills; a blur of 0 turns it off.
    Shadow { blur: f64, color: Rgba },
}

/// A 2D drawing surface.
pub trait Surface {
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64);
    fn close_path(&mut self);
    fn stroke(&mut self, color: Rgba, width: f64);
    fn fill(&mut self, color: Rgba);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba);
    fn set_shadow(&mut self, blur: f64, color: Rgba);
}

impl DrawCommand {
    /// Apply this command to a surface.
    pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S) {
        match *self {
            DrawCommand::ClearRect { x, y, w, h } => surface.clear_rect(x, y, w, h),
            DrawCommand::BeginPath => surface.begin_path(),
            DrawCommand::MoveTo { x, y } => surface.move_to(x, y),
            DrawCommand::LineTo { x, y } => surface.line_to(x, y),
            DrawCommand::Arc { x, y, radius } => surface.arc(x, y, radius),
            DrawCommand::ClosePath => surface.close_path(),
            DrawCommand::Stroke { color, width } => surface.stroke(color, width),
            DrawCommand::Fill { color } => surface.fill(color),
            DrawCommand::FillRect { x, y, w, h, color } => surface.fill_rect(x, y, w, h, color),
            DrawCommand::Shadow { blur, color } => surface.set_shadow(blur, color),
        }
    }
}

/// Replay a frame's commands onto a surface, in order.
pub fn replay<S: Surface + ?Sized>(commands: &[DrawCommand], surface: &mut S) {
    for command in commands {
        command.apply(surface);
    }
}
