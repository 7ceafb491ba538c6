//! the [post (PostScript)](https://docs.microsoft.com/en-us/typography/opentype/spec/post) table

use types::{Fixed, GlyphId, Tag};

use crate::{FontData, FontRead, ReadError, ScalarArray, TopLevelTable};

pub const VERSION_1_0: u32 = 0x00010000;
pub const VERSION_2_0: u32 = 0x00020000;
pub const VERSION_2_5: u32 = 0x00025000;
pub const VERSION_3_0: u32 = 0x00030000;

const HEADER_LEN: usize = 32;

/// The [post](https://docs.microsoft.com/en-us/typography/opentype/spec/post)
/// (PostScript) table.
#[derive(Clone, Debug)]
pub struct Post<'a> {
    version: u32,
    italic_angle: Fixed,
    underline_position: i16,
    underline_thickness: i16,
    is_fixed_pitch: u32,
    glyph_name_index: ScalarArray<'a, u16>,
    // Pascal strings from a version 2.0 table; non-ASCII entries are `None`
    strings: Vec<Option<&'a str>>,
}

impl<'a> Post<'a> {
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn italic_angle(&self) -> Fixed {
        self.italic_angle
    }

    pub fn underline_position(&self) -> i16 {
        self.underline_position
    }

    pub fn underline_thickness(&self) -> i16 {
        self.underline_thickness
    }

    pub fn is_fixed_pitch(&self) -> bool {
        self.is_fixed_pitch != 0
    }

    /// The number of glyph names covered by this table
    pub fn num_names(&self) -> usize {
        match self.version {
            VERSION_1_0 => DEFAULT_GLYPH_NAMES.len(),
            VERSION_2_0 => self.glyph_name_index.len(),
            _ => 0,
        }
    }

    /// Returns the name of the given glyph, if the table has one.
    pub fn glyph_name(&self, glyph_id: GlyphId) -> Option<&'a str> {
        let glyph_id = glyph_id.to_u16() as usize;
        match self.version {
            VERSION_1_0 => DEFAULT_GLYPH_NAMES.get(glyph_id).copied(),
            VERSION_2_0 => {
                let idx = self.glyph_name_index.get(glyph_id)? as usize;
                if idx < DEFAULT_GLYPH_NAMES.len() {
                    return DEFAULT_GLYPH_NAMES.get(idx).copied();
                }
                self.strings
                    .get(idx - DEFAULT_GLYPH_NAMES.len())
                    .copied()
                    .flatten()
            }
            _ => None,
        }
    }

    /// Iterates over all glyph ids and their names.
    pub fn glyph_names(&self) -> impl Iterator<Item = (GlyphId, &'a str)> + '_ {
        (0..self.num_names().min(u16::MAX as usize + 1)).filter_map(|gid| {
            let gid = GlyphId::new(gid as u16);
            self.glyph_name(gid).map(|name| (gid, name))
        })
    }
}

impl TopLevelTable for Post<'_> {
    const TAG: Tag = Tag::new(b"post");
}

impl<'a> FontRead<'a> for Post<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: u32 = cursor.read()?;
        let italic_angle = cursor.read()?;
        let underline_position = cursor.read()?;
        let underline_thickness = cursor.read()?;
        let is_fixed_pitch = cursor.read()?;
        if data.len() < HEADER_LEN {
            return Err(ReadError::OutOfBounds);
        }
        let mut post = Self {
            version,
            italic_angle,
            underline_position,
            underline_thickness,
            is_fixed_pitch,
            glyph_name_index: ScalarArray::empty(),
            strings: Vec::new(),
        };
        match version {
            VERSION_1_0 | VERSION_3_0 => {}
            // deprecated; there are no names to read
            VERSION_2_5 => {}
            VERSION_2_0 => {
                let num_glyphs: u16 = data.read_at(HEADER_LEN)?;
                let index_start = HEADER_LEN + 2;
                let index_end = index_start + num_glyphs as usize * 2;
                post.glyph_name_index = data.read_array(index_start..index_end)?;
                post.strings = read_pascal_strings(
                    data.split_off(index_end).unwrap_or_default(),
                )?;
            }
            other => return Err(ReadError::InvalidFormat(other as i64)),
        }
        Ok(post)
    }
}

fn read_pascal_strings(data: FontData<'_>) -> Result<Vec<Option<&str>>, ReadError> {
    let mut cursor = data.cursor();
    let mut strings = Vec::new();
    while cursor.remaining_bytes() != 0 {
        let len: u8 = cursor.read()?;
        let bytes = cursor.read_bytes(len as usize)?;
        strings.push(
            bytes
                .is_ascii()
                .then(|| std::str::from_utf8(bytes).ok())
                .flatten(),
        );
    }
    Ok(strings)
}

/// The 258 glyph names defined for Macintosh TrueType fonts
#[rustfmt::skip]
pub static DEFAULT_GLYPH_NAMES: [&str; 258] = [
    ".notdef", ".null", "nonmarkingreturn", "space", "exclam", "quotedbl", "numbersign", "dollar",
    "percent", "ampersand", "quotesingle", "parenleft", "parenright", "asterisk", "plus", "comma",
    "hyphen", "period", "slash", "zero", "one", "two", "three", "four", "five", "six", "seven",
    "eight", "nine", "colon", "semicolon", "less", "equal", "greater", "question", "at", "A", "B",
    "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U",
    "V", "W", "X", "Y", "Z", "bracketleft", "backslash", "bracketright", "asciicircum",
    "underscore", "grave", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n",
    "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "braceleft", "bar", "braceright",
    "asciitilde", "Adieresis", "Aring", "Ccedilla", "Eacute", "Ntilde", "Odieresis", "Udieresis",
    "aacute", "agrave", "acircumflex", "adieresis", "atilde", "aring", "ccedilla", "eacute",
    "egrave", "ecircumflex", "edieresis", "iacute", "igrave", "icircumflex", "idieresis", "ntilde",
    "oacute", "ograve", "ocircumflex", "odieresis", "otilde", "uacute", "ugrave", "ucircumflex",
    "udieresis", "dagger", "degree", "cent", "sterling", "section", "bullet", "paragraph",
    "germandbls", "registered", "copyright", "trademark", "acute", "dieresis", "notequal", "AE",
    "Oslash", "infinity", "plusminus", "lessequal", "greaterequal", "yen", "mu", "partialdiff",
    "summation", "product", "pi", "integral", "ordfeminine", "ordmasculine", "Omega", "ae",
    "oslash", "questiondown", "exclamdown", "logicalnot", "radical", "florin", "approxequal",
    "Delta", "guillemotleft", "guillemotright", "ellipsis", "nonbreakingspace", "Agrave", "Atilde",
    "Otilde", "OE", "oe", "endash", "emdash", "quotedblleft", "quotedblright", "quoteleft",
    "quoteright", "divide", "lozenge", "ydieresis", "Ydieresis", "fraction", "currency",
    "guilsinglleft", "guilsinglright", "fi", "fl", "daggerdbl", "periodcentered", "quotesinglbase",
    "quotedblbase", "perthousand", "Acircumflex", "Ecircumflex", "Aacute", "Edieresis", "Egrave",
    "Iacute", "Icircumflex", "Idieresis", "Igrave", "Oacute", "Ocircumflex", "apple", "Ograve",
    "Uacute", "Ucircumflex", "Ugrave", "dotlessi", "circumflex", "tilde", "macron", "breve",
    "dotaccent", "ring", "cedilla", "hungarumlaut", "ogonek", "caron", "Lslash", "lslash",
    "Scaron", "scaron", "Zcaron", "zcaron", "brokenbar", "Eth", "eth", "Yacute", "yacute", "Thorn",
    "thorn", "minus", "multiply", "onesuperior", "twosuperior", "threesuperior", "onehalf",
    "onequarter", "threequarters", "franc", "Gbreve", "gbreve", "Idotaccent", "Scedilla",
    "scedilla", "Cacute", "cacute", "Ccaron", "ccaron", "dcroat",
];

#[cfg(test)]
mod tests {
    use super::*;
    use otfont_test_data::bebuffer::BeBuffer;

    fn header(version: u32) -> BeBuffer {
        BeBuffer::new()
            .push(version)
            .push(Fixed::from_i32(-12))
            .extend([-75i16, 50])
            .extend([0u32; 5])
    }

    #[test]
    fn version_2_names() {
        let buf = header(VERSION_2_0)
            .push(5u16)
            .extend([0u16, 3, 258, 36, 259])
            .push(5u8)
            .extend(*b"hello")
            .push(2u8)
            .extend(*b"hi");
        let post = Post::read(FontData::new(&buf)).unwrap();
        assert_eq!(post.version(), VERSION_2_0);
        assert_eq!(post.underline_position(), -75);
        assert_eq!(post.italic_angle(), Fixed::from_i32(-12));
        assert_eq!(post.num_names(), 5);
        assert_eq!(post.glyph_name(GlyphId::new(0)), Some(".notdef"));
        assert_eq!(post.glyph_name(GlyphId::new(1)), Some("space"));
        assert_eq!(post.glyph_name(GlyphId::new(2)), Some("hello"));
        assert_eq!(post.glyph_name(GlyphId::new(3)), Some("A"));
        assert_eq!(post.glyph_name(GlyphId::new(4)), Some("hi"));
        assert_eq!(post.glyph_name(GlyphId::new(5)), None);
        assert_eq!(post.glyph_names().count(), 5);
    }

    #[test]
    fn non_ascii_names_are_skipped() {
        let buf = header(VERSION_2_0)
            .push(1u16)
            .push(258u16)
            .push(2u8)
            .extend([0xC3u8, 0xA9]);
        let post = Post::read(FontData::new(&buf)).unwrap();
        assert_eq!(post.glyph_name(GlyphId::new(0)), None);
    }

    #[test]
    fn version_1_and_3() {
        let v1 = header(VERSION_1_0);
        let post = Post::read(FontData::new(&v1)).unwrap();
        assert_eq!(post.num_names(), 258);
        assert_eq!(post.glyph_name(GlyphId::new(36)), Some("A"));
        let v3 = header(VERSION_3_0);
        let post = Post::read(FontData::new(&v3)).unwrap();
        assert_eq!(post.num_names(), 0);
        assert_eq!(post.glyph_name(GlyphId::new(36)), None);
    }

    #[test]
    fn truncated_string_data() {
        let buf = header(VERSION_2_0)
            .push(1u16)
            .push(258u16)
            .push(10u8)
            .extend(*b"abc");
        assert_eq!(
            Post::read(FontData::new(&buf)).err(),
            Some(ReadError::OutOfBounds)
        );
    }
}
