//! Glyph outlines from PostScript charstrings.

use kurbo::{BezPath, Point};

use crate::raw::{
    tables::{
        cff::Cff,
        postscript::{
            charstring::{self, PenSink},
            Index,
        },
    },
    types::Pen,
};
use crate::{
    error::{Error, Result},
    GlyphId,
};

/// A glyph outline in font units.
pub type Outline = BezPath;

/// A pen that accumulates commands into a [`BezPath`].
#[derive(Clone, Debug, Default)]
pub struct BezPathPen {
    path: BezPath,
}

fn as_kurbo_point(x: f32, y: f32) -> Point {
    Point::new(x as f64, y as f64)
}

impl BezPathPen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> BezPath {
        self.path
    }
}

impl Pen for BezPathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(as_kurbo_point(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(as_kurbo_point(x, y));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path
            .quad_to(as_kurbo_point(cx0, cy0), as_kurbo_point(x, y));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            as_kurbo_point(cx0, cy0),
            as_kurbo_point(cx1, cy1),
            as_kurbo_point(x, y),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

/// Outline source for the glyphs of a `CFF ` table.
///
/// Charstrings are evaluated unscaled and without hinting.
#[derive(Clone)]
pub struct CffOutlines<'a> {
    cff: &'a Cff<'a>,
    charstrings: Index<'a>,
    global_subrs: Index<'a>,
}

impl<'a> CffOutlines<'a> {
    pub fn new(cff: &'a Cff<'a>) -> Result<Self> {
        Ok(Self {
            cff,
            charstrings: cff.charstrings()?,
            global_subrs: cff.global_subrs(),
        })
    }

    /// The number of glyphs with a charstring.
    pub fn num_glyphs(&self) -> u32 {
        self.charstrings.count()
    }

    /// Evaluate the charstring for `glyph_id`, sending the path commands to
    /// `pen`.
    pub fn draw(&self, glyph_id: GlyphId, pen: &mut impl Pen) -> Result<()> {
        if glyph_id.to_u32() >= self.num_glyphs() {
            return Err(Error::GlyphNotFound(glyph_id));
        }
        let charstring_data = self.charstrings.get(glyph_id.to_u16() as usize)?;
        let private_dict = self
            .cff
            .private_dict(self.cff.subfont_index(glyph_id))?;
        let subrs = self.cff.subrs(&private_dict)?;
        charstring::evaluate(
            charstring_data,
            self.global_subrs.clone(),
            subrs,
            &mut PenSink::new(pen),
        )?;
        Ok(())
    }

    /// The outline of `glyph_id` as a path.
    pub fn outline(&self, glyph_id: GlyphId) -> Result<Outline> {
        let mut pen = BezPathPen::new();
        self.draw(glyph_id, &mut pen)?;
        log::trace!("drew {glyph_id}: {} path elements", pen.path.elements().len());
        Ok(pen.into_inner())
    }
}

impl std::fmt::Debug for CffOutlines<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CffOutlines")
            .field("num_glyphs", &self.num_glyphs())
            .field("num_global_subrs", &self.global_subrs.count())
            .finish()
    }
}
