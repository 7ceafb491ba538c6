//! The flavored font container.

use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use crate::raw::{
    tables::{
        cff::Cff, gdef::Gdef, glyf::Glyf, gpos::Gpos, gsub::Gsub, head::Head, loca::Loca,
        maxp::Maxp, post::Post,
    },
    ParsedTable, TableRegistry, TopLevelTable,
};
use crate::{
    error::{Error, Result},
    glyph_name::GlyphNames,
    outline::{CffOutlines, Outline},
    Tag,
};

/// Tags of the tables that make a font "have layout".
pub const LAYOUT_TABLE_TAGS: [Tag; 5] = [
    Tag::new(b"BASE"),
    Tag::new(b"GDEF"),
    Tag::new(b"GPOS"),
    Tag::new(b"GSUB"),
    Tag::new(b"JSTF"),
];

/// The outline technology used by a font.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontFlavor {
    /// Cubic outlines stored as charstrings in the `CFF ` table.
    PostScript,
    /// Quadratic outlines stored in the `glyf` table.
    OutlineGlyf,
}

impl FontFlavor {
    /// The version marker of fonts with TrueType outlines.
    pub const TRUETYPE_MARKER: f32 = 1.0;

    /// Determine the flavor from an sfnt version marker.
    ///
    /// Only the TrueType marker selects `glyf` outlines; every other value,
    /// including NaN, is PostScript.
    pub fn from_version_marker(marker: f32) -> Self {
        if marker == Self::TRUETYPE_MARKER {
            FontFlavor::OutlineGlyf
        } else {
            FontFlavor::PostScript
        }
    }
}

impl fmt::Display for FontFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFlavor::PostScript => f.write_str("PostScript"),
            FontFlavor::OutlineGlyf => f.write_str("TrueType"),
        }
    }
}

/// A single font, bound to a shared table registry.
///
/// The flavor is written once through [`set_version`](Self::set_version)
/// (or by [`load`](Self::load)) and gates the outline accessors: a
/// PostScript font refuses [`glyf`](Self::glyf) and a TrueType font refuses
/// [`cff`](Self::cff), whatever tables are actually present. Every other
/// accessor works for both flavors.
///
/// Tables are parsed by the registry on first access and borrowed from it
/// afterwards; the container holds no parsed state of its own except the
/// glyph name map.
#[derive(Debug)]
pub struct OpenTypeFont<'a> {
    registry: Arc<TableRegistry<'a>>,
    flavor: OnceLock<FontFlavor>,
    glyph_names: OnceLock<GlyphNames>,
}

impl<'a> OpenTypeFont<'a> {
    /// Create a container without a flavor.
    pub fn new(registry: Arc<TableRegistry<'a>>) -> Self {
        Self {
            registry,
            flavor: OnceLock::new(),
            glyph_names: OnceLock::new(),
        }
    }

    /// Parse the table directory of `data` and set the flavor from its sfnt
    /// version.
    pub fn load(data: &'a [u8]) -> Result<Self> {
        let registry = TableRegistry::new(data)?;
        let marker = registry.directory().version_marker();
        let font = Self::new(Arc::new(registry));
        font.set_version(marker);
        if let Err(e) = font.check_flavor_consistency() {
            log::warn!("{e}");
        }
        Ok(font)
    }

    /// The registry holding this font's tables.
    pub fn registry(&self) -> &Arc<TableRegistry<'a>> {
        &self.registry
    }

    /// Set the flavor from an sfnt version marker.
    ///
    /// The first call wins. Later calls leave the flavor unchanged and
    /// return `false`.
    pub fn set_version(&self, marker: f32) -> bool {
        let flavor = FontFlavor::from_version_marker(marker);
        match self.flavor.set(flavor) {
            Ok(()) => {
                log::debug!("font flavor set to {flavor} (version marker {marker})");
                true
            }
            Err(_) => {
                log::warn!(
                    "ignoring version marker {marker}; flavor is already {}",
                    self.flavor.get().copied().unwrap_or(flavor)
                );
                false
            }
        }
    }

    /// The flavor, if it has been set.
    pub fn flavor(&self) -> Option<FontFlavor> {
        self.flavor.get().copied()
    }

    /// Returns `true` if the font contains a `CFF ` table.
    ///
    /// This looks at the tables rather than the stored flavor, and so works
    /// before the flavor is set.
    pub fn is_postscript(&self) -> bool {
        self.registry.has_tag(Cff::TAG)
    }

    /// Returns `true` if any of the [layout tables](LAYOUT_TABLE_TAGS) is
    /// present. Nothing is parsed.
    pub fn has_layout_tables(&self) -> bool {
        LAYOUT_TABLE_TAGS
            .iter()
            .any(|tag| self.registry.has_tag(*tag))
    }

    /// Report a disagreement between the stored flavor and the presence of
    /// a `CFF ` table.
    pub fn check_flavor_consistency(&self) -> Result<()> {
        let flavor = self.flavor().ok_or(Error::FlavorNotSet)?;
        let has_cff = self.is_postscript();
        if (flavor == FontFlavor::PostScript) != has_cff {
            return Err(Error::FlavorMismatch { flavor, has_cff });
        }
        Ok(())
    }

    /// The `CFF ` table; PostScript fonts only.
    pub fn cff(&self) -> Result<Option<&Cff<'a>>> {
        self.require_flavor::<Cff>(FontFlavor::PostScript)?;
        self.table()
    }

    /// The `glyf` table; TrueType fonts only.
    pub fn glyf(&self) -> Result<Option<&Glyf<'a>>> {
        self.require_flavor::<Glyf>(FontFlavor::OutlineGlyf)?;
        self.table()
    }

    /// The glyph definition table.
    pub fn gdef(&self) -> Result<Option<&Gdef<'a>>> {
        self.table()
    }

    /// The glyph substitution table.
    pub fn gsub(&self) -> Result<Option<&Gsub<'a>>> {
        self.table()
    }

    /// The glyph positioning table.
    pub fn gpos(&self) -> Result<Option<&Gpos<'a>>> {
        self.table()
    }

    /// The font header table.
    pub fn head(&self) -> Result<Option<&Head>> {
        self.table()
    }

    /// The maximum profile table, which holds the glyph count.
    pub fn maxp(&self) -> Result<Option<&Maxp>> {
        self.table()
    }

    /// The PostScript table, a source of glyph names.
    pub fn post(&self) -> Result<Option<&Post<'a>>> {
        self.table()
    }

    /// The `loca` table, read with the offset format given in `head`.
    pub fn loca(&self) -> Result<Option<&Loca<'a>>> {
        self.table()
    }

    /// The glyph name resolver, built on first use.
    pub fn glyph_names(&self) -> &GlyphNames {
        self.glyph_names
            .get_or_init(|| GlyphNames::new(&self.registry))
    }

    /// A CFF outline source over the `CFF ` table.
    ///
    /// Fails like [`cff`](Self::cff) on TrueType fonts; an absent table is
    /// reported as [`ReadError::TableIsMissing`](crate::raw::ReadError).
    pub fn cff_outlines(&self) -> Result<CffOutlines<'_>> {
        let cff = self
            .cff()?
            .ok_or(crate::raw::ReadError::TableIsMissing(Cff::TAG))?;
        CffOutlines::new(cff)
    }

    /// The outline of the glyph with the given name.
    ///
    /// Outlines always come from the CFF outline source, so a TrueType font
    /// fails with [`Error::UnsupportedFlavor`] whatever the name. On a
    /// PostScript font, returns `Ok(None)` if no glyph has that name.
    pub fn outline_path(&self, glyph_name: &str) -> Result<Option<Outline>> {
        self.require_flavor::<Cff>(FontFlavor::PostScript)?;
        let Some(glyph_id) = self.glyph_names().glyph_id(glyph_name) else {
            log::debug!("no glyph named '{glyph_name}'");
            return Ok(None);
        };
        self.cff_outlines()?.outline(glyph_id).map(Some)
    }

    fn require_flavor<T: TopLevelTable>(&self, required: FontFlavor) -> Result<()> {
        let actual = self.flavor().ok_or(Error::FlavorNotSet)?;
        if actual != required {
            return Err(Error::UnsupportedFlavor {
                tag: T::TAG,
                required,
                actual,
            });
        }
        Ok(())
    }

    fn table<T: ParsedTable<'a>>(&self) -> Result<Option<&T>> {
        Ok(self.registry.get::<T>()?)
    }
}
