//! Outline sinks.

/// Receives the segments of a glyph outline in drawing order.
///
/// Coordinates are in font units. Every contour starts with `move_to`;
/// `close` is only called for contours that were started.
pub trait Pen {
    fn move_to(&mut self, x: f32, y: f32);

    fn line_to(&mut self, x: f32, y: f32);

    /// Quadratic segment through control point `(cx0, cy0)` to `(x, y)`.
    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32);

    /// Cubic segment through control points `(cx0, cy0)` and `(cx1, cy1)`
    /// to `(x, y)`.
    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32);

    fn close(&mut self);
}

/// One recorded [`Pen`] call.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum PenCommand {
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    QuadTo { cx0: f32, cy0: f32, x: f32, y: f32 },
    CurveTo { cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32 },
    Close,
}

impl Pen for Vec<PenCommand> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.push(PenCommand::MoveTo { x, y })
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(PenCommand::LineTo { x, y })
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.push(PenCommand::QuadTo { cx0, cy0, x, y })
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let command = PenCommand::CurveTo { cx0, cy0, cx1, cy1, x, y };
        self.push(command)
    }

    fn close(&mut self) {
        self.push(PenCommand::Close)
    }
}
