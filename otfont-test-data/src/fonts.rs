//! Complete synthetic fonts.
//!
//! `cff_font` is PostScript flavored with a GSUB table; `glyf_font` is
//! TrueType flavored with no layout tables. Both have three glyphs.

use otfont_types::{Fixed, Tag, CFF_SFNT_VERSION, TT_SFNT_VERSION};

use crate::{be_buffer, bebuffer::BeBuffer, cff, layout, sfnt::SfntBuilder};

pub const HEAD: Tag = Tag::new(b"head");
pub const MAXP: Tag = Tag::new(b"maxp");
pub const POST: Tag = Tag::new(b"post");
pub const LOCA: Tag = Tag::new(b"loca");
pub const GLYF: Tag = Tag::new(b"glyf");
pub const CFF: Tag = Tag::new(b"CFF ");
pub const GSUB: Tag = Tag::new(b"GSUB");
pub const GPOS: Tag = Tag::new(b"GPOS");
pub const GDEF: Tag = Tag::new(b"GDEF");
pub const BASE: Tag = Tag::new(b"BASE");
pub const JSTF: Tag = Tag::new(b"JSTF");

/// A head table with 1000 units per em and the given loca format.
pub fn head(index_to_loc_format: i16) -> Vec<u8> {
    BeBuffer::new()
        .push(Fixed::ONE) // version
        .push(Fixed::ONE) // fontRevision
        .extend([0u32, 0x5F0F3CF5]) // checksumAdjustment, magicNumber
        .extend([0u16, 1000]) // flags, unitsPerEm
        .extend([0u64; 2]) // created, modified
        .extend([0i16, -10, 500, 700]) // bounding box
        .extend([0u16, 8]) // macStyle, lowestRecPPEM
        .extend([2i16, index_to_loc_format, 0])
        .into_vec()
}

/// A version 0.5 maxp table, as used by CFF fonts.
pub fn maxp_0_5(num_glyphs: u16) -> Vec<u8> {
    be_buffer! { 0x00005000u32, (num_glyphs) }.into_vec()
}

/// A version 1.0 maxp table, as used by TrueType fonts.
pub fn maxp_1_0(num_glyphs: u16) -> Vec<u8> {
    BeBuffer::new()
        .push(0x00010000u32)
        .push(num_glyphs)
        .extend([0u16; 13])
        .into_vec()
}

/// A version 3.0 post table, which carries no glyph names.
pub fn post_3_0() -> Vec<u8> {
    post_header(0x00030000).into_vec()
}

/// A version 2.0 post table naming glyphs `.notdef`, `A` and `bar`.
pub fn post_2_0() -> Vec<u8> {
    post_header(0x00020000)
        .push(3u16) // numGlyphs
        .extend([0u16, 36, 258])
        .push(3u8)
        .extend(*b"bar")
        .into_vec()
}

fn post_header(version: u32) -> BeBuffer {
    be_buffer! {
        (version),
        0u32,           // italicAngle
        -75i16, 50i16,  // underlinePosition, underlineThickness
        0u32,           // isFixedPitch
        [0u32, 0, 0, 0] // memory usage
    }
}

/// Glyph data for a TrueType font: an empty `.notdef`, a simple glyph with
/// two contours and a composite.
pub fn glyf() -> Vec<u8> {
    be_buffer! {
        // glyph 1
        2i16, [0i16, -10, 500, 700], [0u8, 0],
        // glyph 2
        -1i16, [10i16, 10, 20, 20]
    }
    .into_vec()
}

/// Short loca offsets for [`glyf`].
pub fn loca() -> Vec<u8> {
    be_buffer! { [0u16, 0, 6, 11] }.into_vec()
}

/// A PostScript flavored font: head, maxp 0.5, post 3.0, CFF and GSUB.
pub fn cff_font() -> Vec<u8> {
    cff_font_with_gsub(layout::simple_gsub())
}

/// Like [`cff_font`], but the GSUB table has an unsupported major version.
pub fn cff_font_with_bad_gsub() -> Vec<u8> {
    let mut gsub = layout::simple_gsub();
    gsub[1] = 2;
    cff_font_with_gsub(gsub)
}

fn cff_font_with_gsub(gsub: Vec<u8>) -> Vec<u8> {
    SfntBuilder::new(CFF_SFNT_VERSION)
        .add_table(HEAD, head(0))
        .add_table(MAXP, maxp_0_5(3))
        .add_table(POST, post_3_0())
        .add_table(CFF, cff::simple_cff())
        .add_table(GSUB, gsub)
        .build()
}

/// A PostScript flavored font with all three of GSUB, GPOS and GDEF.
pub fn cff_font_with_layout() -> Vec<u8> {
    SfntBuilder::new(CFF_SFNT_VERSION)
        .add_table(HEAD, head(0))
        .add_table(MAXP, maxp_0_5(3))
        .add_table(POST, post_3_0())
        .add_table(CFF, cff::simple_cff())
        .add_table(GDEF, layout::simple_gdef())
        .add_table(GSUB, layout::simple_gsub())
        .add_table(GPOS, layout::simple_gpos())
        .build()
}

/// [`glyf_font`] plus a single layout table.
///
/// BASE and JSTF have no decoder, so they get placeholder bytes holding
/// only a version 1.0 header.
pub fn glyf_font_with_layout_table(tag: Tag) -> Vec<u8> {
    let data = match tag {
        GDEF => layout::simple_gdef(),
        GSUB => layout::simple_gsub(),
        GPOS => layout::simple_gpos(),
        _ => vec![0, 1, 0, 0],
    };
    glyf_font_builder().add_table(tag, data).build()
}

/// A TrueType flavored font: head, maxp 1.0, post 2.0, loca and glyf.
pub fn glyf_font() -> Vec<u8> {
    glyf_font_builder().build()
}

fn glyf_font_builder() -> SfntBuilder {
    SfntBuilder::new(TT_SFNT_VERSION)
        .add_table(HEAD, head(0))
        .add_table(MAXP, maxp_1_0(3))
        .add_table(POST, post_2_0())
        .add_table(LOCA, loca())
        .add_table(GLYF, glyf())
}

/// A font that carries both outline formats under the TrueType version,
/// so its flavor disagrees with the presence of a CFF table.
pub fn mixed_outline_font() -> Vec<u8> {
    SfntBuilder::new(TT_SFNT_VERSION)
        .add_table(HEAD, head(0))
        .add_table(MAXP, maxp_1_0(3))
        .add_table(POST, post_2_0())
        .add_table(LOCA, loca())
        .add_table(GLYF, glyf())
        .add_table(CFF, cff::simple_cff())
        .build()
}
