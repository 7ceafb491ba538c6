//! Support for mapping between glyph names and identifiers.

use std::collections::HashMap;

use crate::raw::{
    tables::{cff::Cff, maxp::Maxp, post::Post},
    TableRegistry,
};
use crate::GlyphId;

/// Specifies the chosen source for glyph names.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GlyphNameSource {
    /// Glyph names are sourced from the `post` table.
    Post,
    /// Glyph names are sourced from the charset of the `CFF ` table.
    Cff,
    /// Glyph names are synthesized in the format `gidDDD` where `DDD` is
    /// the glyph identifier in decimal.
    Synthesized,
}

/// Bidirectional mapping between glyph names and identifiers.
///
/// Names are taken from the `post` table when it has them, then from the
/// charset of a name-keyed `CFF ` table. Glyphs without a name from either
/// are called `gidDDD`, and `gidDDD` or `gDDD` resolve to glyph `DDD` when
/// no real glyph has that name.
#[derive(Clone, Debug)]
pub struct GlyphNames {
    source: GlyphNameSource,
    names: Vec<Option<String>>,
    ids: HashMap<String, GlyphId>,
    num_glyphs: u32,
}

impl GlyphNames {
    /// Build the name map from the tables in `registry`.
    ///
    /// Tables that fail to parse are skipped.
    pub fn new(registry: &TableRegistry) -> Self {
        let maxp_glyphs = match registry.get::<Maxp>() {
            Ok(maxp) => maxp.map(|maxp| maxp.num_glyphs() as u32),
            Err(e) => {
                log::warn!("glyph names: {e}");
                None
            }
        };
        let (source, names) = post_names(registry)
            .map(|names| (GlyphNameSource::Post, names))
            .or_else(|| cff_names(registry).map(|names| (GlyphNameSource::Cff, names)))
            .unwrap_or((GlyphNameSource::Synthesized, Vec::new()));
        let num_glyphs = maxp_glyphs.unwrap_or(names.len() as u32);
        let mut ids = HashMap::with_capacity(names.len());
        for (gid, name) in names.iter().enumerate().take(num_glyphs as usize) {
            if let Some(name) = name.as_ref().filter(|name| !name.is_empty()) {
                ids.entry(name.clone())
                    .or_insert(GlyphId::new(gid as u16));
            }
        }
        log::debug!(
            "glyph names from {source:?}: {} named of {num_glyphs}",
            ids.len()
        );
        Self {
            source,
            names,
            ids,
            num_glyphs,
        }
    }

    /// Returns the chosen source for glyph names.
    pub fn source(&self) -> GlyphNameSource {
        self.source
    }

    pub fn num_glyphs(&self) -> u32 {
        self.num_glyphs
    }

    /// Returns the identifier of the glyph with the given name.
    pub fn glyph_id(&self, name: &str) -> Option<GlyphId> {
        if let Some(gid) = self.ids.get(name) {
            return Some(*gid);
        }
        let digits = name
            .strip_prefix("gid")
            .or_else(|| name.strip_prefix('g'))?;
        // reject signs and leading zeros so each glyph has one synthetic name
        if digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
            || (digits.len() > 1 && digits.starts_with('0'))
        {
            return None;
        }
        let gid: u16 = digits.parse().ok()?;
        ((gid as u32) < self.num_glyphs).then_some(GlyphId::new(gid))
    }

    /// Returns the name of the given glyph.
    pub fn name(&self, glyph_id: GlyphId) -> Option<String> {
        if glyph_id.to_u32() >= self.num_glyphs {
            return None;
        }
        match self.names.get(glyph_id.to_u32() as usize) {
            Some(Some(name)) if !name.is_empty() => Some(name.clone()),
            _ => Some(format!("gid{}", glyph_id.to_u16())),
        }
    }
}

fn post_names(registry: &TableRegistry) -> Option<Vec<Option<String>>> {
    let post = match registry.get::<Post>() {
        Ok(post) => post?,
        Err(e) => {
            log::warn!("glyph names: {e}");
            return None;
        }
    };
    if post.num_names() == 0 {
        return None;
    }
    Some(
        (0..post.num_names())
            .map(|gid| {
                post.glyph_name(GlyphId::new(gid as u16))
                    .map(str::to_owned)
            })
            .collect(),
    )
}

fn cff_names(registry: &TableRegistry) -> Option<Vec<Option<String>>> {
    let cff = match registry.get::<Cff>() {
        Ok(cff) => cff?,
        Err(e) => {
            log::warn!("glyph names: {e}");
            return None;
        }
    };
    let charset = match cff.charset() {
        Ok(charset) => charset?,
        Err(e) => {
            log::warn!("glyph names: invalid CFF charset: {e}");
            return None;
        }
    };
    let mut names = vec![None; cff.num_glyphs() as usize];
    for (gid, sid) in charset.iter() {
        if let Some(slot) = names.get_mut(gid.to_u32() as usize) {
            *slot = cff.string(sid).map(|name| name.chars().collect::<String>());
        }
    }
    Some(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{types::TT_SFNT_VERSION, TopLevelTable};
    use otfont_test_data::{fonts, sfnt::SfntBuilder};
    use pretty_assertions::assert_eq;

    fn names_for(data: &[u8]) -> GlyphNames {
        GlyphNames::new(&TableRegistry::new(data).unwrap())
    }

    #[test]
    fn names_from_post() {
        let data = fonts::glyf_font();
        let names = names_for(&data);
        assert_eq!(names.source(), GlyphNameSource::Post);
        assert_eq!(names.num_glyphs(), 3);
        assert_eq!(names.glyph_id("A"), Some(GlyphId::new(1)));
        assert_eq!(names.glyph_id("bar"), Some(GlyphId::new(2)));
        assert_eq!(names.name(GlyphId::new(0)).as_deref(), Some(".notdef"));
        assert_eq!(names.name(GlyphId::new(3)), None);
    }

    #[test]
    fn names_from_cff_charset() {
        let data = fonts::cff_font();
        let names = names_for(&data);
        assert_eq!(names.source(), GlyphNameSource::Cff);
        assert_eq!(names.glyph_id(".notdef"), Some(GlyphId::new(0)));
        assert_eq!(names.glyph_id("A"), Some(GlyphId::new(1)));
        assert_eq!(names.glyph_id("hello"), Some(GlyphId::new(2)));
        assert_eq!(names.glyph_id("B"), None);
        assert_eq!(names.name(GlyphId::new(2)).as_deref(), Some("hello"));
    }

    #[test]
    fn synthesized_names() {
        let data = SfntBuilder::new(TT_SFNT_VERSION)
            .add_table(Maxp::TAG, fonts::maxp_0_5(12))
            .add_table(Post::TAG, fonts::post_3_0())
            .build();
        let names = names_for(&data);
        assert_eq!(names.source(), GlyphNameSource::Synthesized);
        assert_eq!(names.name(GlyphId::new(7)).as_deref(), Some("gid7"));
        assert_eq!(names.glyph_id("gid7"), Some(GlyphId::new(7)));
        assert_eq!(names.glyph_id("g11"), Some(GlyphId::new(11)));
        assert_eq!(names.glyph_id("gid12"), None);
        assert_eq!(names.glyph_id("g07"), None);
        assert_eq!(names.glyph_id("g+1"), None);
        assert_eq!(names.glyph_id("gid"), None);
    }

    #[test]
    fn real_names_take_priority() {
        let data = fonts::glyf_font();
        let names = names_for(&data);
        // synthetic lookups still work alongside real names
        assert_eq!(names.glyph_id("gid2"), Some(GlyphId::new(2)));
        assert_eq!(names.glyph_id("g3"), None);
    }
}
