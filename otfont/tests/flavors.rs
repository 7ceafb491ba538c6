//! Flavor gating and lazy table access through the font container.

use std::{sync::Arc, thread};

use kurbo::{PathEl, Point};
use otfont::{
    raw::{
        tables::{cff::Cff, gdef::Gdef, glyf::Glyf, gpos::Gpos, gsub::Gsub},
        SlotState, TableRegistry, TopLevelTable,
    },
    Error, FontFlavor, GlyphId, OpenTypeFont, LAYOUT_TABLE_TAGS,
};
use otfont_test_data::fonts;
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn postscript_font() {
    init_logging();
    let data = fonts::cff_font();
    let font = OpenTypeFont::load(&data).unwrap();
    assert_eq!(font.flavor(), Some(FontFlavor::PostScript));
    assert!(font.is_postscript());
    assert!(font.has_layout_tables());
    assert!(font.cff().unwrap().is_some());
    assert_eq!(
        font.glyf().err(),
        Some(Error::UnsupportedFlavor {
            tag: Glyf::TAG,
            required: FontFlavor::OutlineGlyf,
            actual: FontFlavor::PostScript,
        })
    );
    assert_eq!(font.check_flavor_consistency(), Ok(()));
}

#[test]
fn truetype_font() {
    init_logging();
    let data = fonts::glyf_font();
    let font = OpenTypeFont::load(&data).unwrap();
    assert_eq!(font.flavor(), Some(FontFlavor::OutlineGlyf));
    assert!(!font.is_postscript());
    assert!(!font.has_layout_tables());
    assert!(font.glyf().unwrap().is_some());
    assert_eq!(font.loca().unwrap().map(|loca| loca.len()), Some(3));
    assert_eq!(
        font.cff().err(),
        Some(Error::UnsupportedFlavor {
            tag: Cff::TAG,
            required: FontFlavor::PostScript,
            actual: FontFlavor::OutlineGlyf,
        })
    );
    // layout accessors are not gated; the tables are just absent
    assert_eq!(font.gsub().map(|gsub| gsub.is_none()), Ok(true));
    assert_eq!(font.gpos().map(|gpos| gpos.is_none()), Ok(true));
}

#[test]
fn flavor_agrees_with_cff_presence() {
    for data in [fonts::cff_font(), fonts::glyf_font()] {
        let font = OpenTypeFont::load(&data).unwrap();
        assert_eq!(
            font.flavor() == Some(FontFlavor::PostScript),
            font.is_postscript()
        );
    }
}

#[test]
fn mismatched_flavor_is_reported() {
    init_logging();
    let data = fonts::mixed_outline_font();
    let font = OpenTypeFont::load(&data).unwrap();
    assert_eq!(font.flavor(), Some(FontFlavor::OutlineGlyf));
    assert!(font.is_postscript());
    assert_eq!(
        font.check_flavor_consistency(),
        Err(Error::FlavorMismatch {
            flavor: FontFlavor::OutlineGlyf,
            has_cff: true,
        })
    );
    // the stored flavor still decides which outline table is reachable
    assert!(font.glyf().unwrap().is_some());
    assert!(matches!(font.cff(), Err(Error::UnsupportedFlavor { .. })));
}

#[test]
fn flavor_is_required_before_outline_access() {
    let data = fonts::glyf_font();
    let font = OpenTypeFont::new(Arc::new(TableRegistry::new(&data).unwrap()));
    assert_eq!(font.glyf().err(), Some(Error::FlavorNotSet));
    assert_eq!(font.outline_path("A").err(), Some(Error::FlavorNotSet));
    assert!(font.set_version(1.0));
    assert!(font.glyf().unwrap().is_some());
    assert!(!font.set_version(0.5));
    assert_eq!(font.flavor(), Some(FontFlavor::OutlineGlyf));
}

#[test]
fn tables_are_parsed_once() {
    let data = fonts::cff_font();
    let font = OpenTypeFont::load(&data).unwrap();
    let registry = font.registry();
    assert_eq!(registry.slot_state(Gsub::TAG), SlotState::Raw);
    let first = font.gsub().unwrap().unwrap();
    let second = font.gsub().unwrap().unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(registry.parse_attempts(Gsub::TAG), 1);
    assert_eq!(registry.slot_state(Gsub::TAG), SlotState::Materialized);
    // untouched tables stay raw
    assert_eq!(registry.slot_state(Cff::TAG), SlotState::Raw);
}

#[test]
fn gdef_and_gpos_are_parsed_once() {
    let data = fonts::cff_font_with_layout();
    let font = OpenTypeFont::load(&data).unwrap();
    let registry = font.registry();

    let gdef = font.gdef().unwrap().unwrap();
    assert!(std::ptr::eq(gdef, font.gdef().unwrap().unwrap()));
    assert_eq!(registry.parse_attempts(Gdef::TAG), 1);
    assert_eq!(registry.slot_state(Gdef::TAG), SlotState::Materialized);

    let gpos = font.gpos().unwrap().unwrap();
    assert!(std::ptr::eq(gpos, font.gpos().unwrap().unwrap()));
    assert_eq!(registry.parse_attempts(Gpos::TAG), 1);
    assert_eq!(registry.slot_state(Gpos::TAG), SlotState::Materialized);

    assert_eq!(registry.slot_state(Gsub::TAG), SlotState::Raw);
}

#[test]
fn any_one_layout_table_is_enough() {
    for tag in LAYOUT_TABLE_TAGS {
        let data = fonts::glyf_font_with_layout_table(tag);
        let font = OpenTypeFont::load(&data).unwrap();
        assert!(font.has_layout_tables(), "{tag}");
        // checking presence parses nothing
        assert_eq!(font.registry().slot_state(tag), SlotState::Raw, "{tag}");
    }
    // layout tables are readable on TrueType fonts too
    let data = fonts::glyf_font_with_layout_table(Gpos::TAG);
    let font = OpenTypeFont::load(&data).unwrap();
    assert!(font.gpos().unwrap().is_some());
    assert_eq!(font.gdef().map(|gdef| gdef.is_none()), Ok(true));
}

#[test]
fn containers_share_a_registry() {
    let data = fonts::cff_font();
    let registry = Arc::new(TableRegistry::new(&data).unwrap());
    let a = OpenTypeFont::new(registry.clone());
    let b = OpenTypeFont::new(registry.clone());
    a.set_version(0.5);
    b.set_version(0.5);
    let from_a = a.cff().unwrap().unwrap();
    let from_b = b.cff().unwrap().unwrap();
    assert!(std::ptr::eq(from_a, from_b));
    assert_eq!(registry.parse_attempts(Cff::TAG), 1);
}

#[test]
fn concurrent_first_access() {
    let data = fonts::cff_font();
    let font = OpenTypeFont::load(&data).unwrap();
    let addresses: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let gsub = font.gsub().unwrap().unwrap();
                    gsub as *const Gsub as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(font.registry().parse_attempts(Gsub::TAG), 1);
}

#[test]
fn parse_failures_are_cached() {
    init_logging();
    let data = fonts::cff_font_with_bad_gsub();
    let font = OpenTypeFont::load(&data).unwrap();
    let first = font.gsub().unwrap_err();
    let second = font.gsub().unwrap_err();
    assert_eq!(first, second);
    match &first {
        Error::Table(err) => assert_eq!(err.tag(), Gsub::TAG),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(font.registry().parse_attempts(Gsub::TAG), 1);
    assert_eq!(font.registry().slot_state(Gsub::TAG), SlotState::Failed);
    // other tables are unaffected
    assert!(font.cff().unwrap().is_some());
    assert!(font.has_layout_tables());
}

#[test]
fn outline_by_name() {
    let data = fonts::cff_font();
    let font = OpenTypeFont::load(&data).unwrap();
    let path = font.outline_path("A").unwrap().unwrap();
    assert_eq!(
        path.elements(),
        [
            PathEl::MoveTo(Point::new(10.0, 20.0)),
            PathEl::LineTo(Point::new(110.0, 20.0)),
            PathEl::LineTo(Point::new(60.0, 100.0)),
            PathEl::ClosePath,
        ]
    );
    assert_eq!(font.outline_path("no-such-glyph"), Ok(None));
    // synthetic names resolve too
    let square = font.outline_path("gid2").unwrap().unwrap();
    assert_eq!(square.elements().len(), 5);
    assert_eq!(
        font.glyph_names().name(GlyphId::new(2)).as_deref(),
        Some("hello")
    );
}

#[test]
fn truetype_outline_by_name_is_unsupported() {
    let data = fonts::glyf_font();
    let font = OpenTypeFont::load(&data).unwrap();
    let unsupported = Error::UnsupportedFlavor {
        tag: Cff::TAG,
        required: FontFlavor::PostScript,
        actual: FontFlavor::OutlineGlyf,
    };
    assert_eq!(font.outline_path("A").err(), Some(unsupported.clone()));
    // the flavor is checked before the name is resolved
    assert_eq!(font.outline_path("does-not-exist").err(), Some(unsupported));
}
