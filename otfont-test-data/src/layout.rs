//! GSUB, GPOS and GDEF test data

use otfont_types::Tag;

use crate::be_buffer;

/// A version 1.0 GSUB table with one script (`latn`, default language
/// system only), one feature (`liga`) and one ligature lookup.
pub fn simple_gsub() -> Vec<u8> {
    let latn = Tag::new(b"latn");
    let liga = Tag::new(b"liga");
    be_buffer! {
        // header
        1u16, 0u16,     // version 1.0
        10u16,          // scriptListOffset
        30u16,          // featureListOffset
        44u16,          // lookupListOffset

        // ScriptList, offset 10
        1u16, latn, 8u16,
        // Script, offset 18
        4u16,           // defaultLangSysOffset
        0u16,           // langSysCount
        // LangSys, offset 22
        0u16,           // lookupOrderOffset
        0xFFFFu16,      // requiredFeatureIndex
        1u16, 0u16,     // featureIndices

        // FeatureList, offset 30
        1u16, liga, 8u16,
        // Feature, offset 38
        0u16,           // featureParamsOffset
        1u16, 0u16,     // lookupListIndices

        // LookupList, offset 44
        1u16, 4u16,
        // Lookup, offset 48
        4u16,           // lookupType: ligature
        0u16,           // lookupFlag
        1u16, 8u16,     // subtableOffsets
        // LigatureSubstFormat1, offset 56
        1u16, 6u16, 0u16,
        // Coverage format 1, no glyphs
        1u16, 0u16
    }
    .into_vec()
}

/// A version 1.1 GPOS table (null FeatureVariations offset) with a single
/// `kern` feature pointing at a pair adjustment lookup.
pub fn simple_gpos() -> Vec<u8> {
    let dflt = Tag::new(b"DFLT");
    let kern = Tag::new(b"kern");
    be_buffer! {
        // header
        1u16, 1u16,     // version 1.1
        14u16,          // scriptListOffset
        34u16,          // featureListOffset
        48u16,          // lookupListOffset
        0u32,           // featureVariationsOffset

        // ScriptList, offset 14
        1u16, dflt, 8u16,
        // Script, offset 22
        4u16, 0u16,
        // LangSys, offset 26
        0u16, 0xFFFFu16, 1u16, 0u16,

        // FeatureList, offset 34
        1u16, kern, 8u16,
        // Feature, offset 42
        0u16, 1u16, 0u16,

        // LookupList, offset 48
        1u16, 4u16,
        // Lookup, offset 52
        2u16,           // lookupType: pair adjustment
        0u16, 1u16, 8u16,
        // PairPosFormat1, offset 60
        1u16,           // format
        10u16,          // coverageOffset
        0u16, 0u16,     // valueFormat1, valueFormat2
        0u16,           // pairSetCount
        // Coverage format 1, no glyphs
        1u16, 0u16
    }
    .into_vec()
}

/// A version 1.2 GDEF table with a glyph class definition:
/// glyph 1 is a base, 2 a ligature and 5 a mark.
pub fn simple_gdef() -> Vec<u8> {
    be_buffer! {
        1u16, 2u16,     // version 1.2
        14u16,          // glyphClassDefOffset
        0u16,           // attachListOffset
        0u16,           // ligCaretListOffset
        0u16,           // markAttachClassDefOffset
        0u16,           // markGlyphSetsDefOffset

        // ClassDef format 2, offset 14
        2u16, 3u16,
        [1u16, 1, 1],
        [2u16, 2, 2],
        [5u16, 5, 3]
    }
    .into_vec()
}
