//! CFF test data

/// `.notdef`: endchar
pub const NOTDEF_CHARSTRING: &[u8] = &[14];

/// "A": 10 20 rmoveto 100 0 rlineto -50 80 rlineto endchar
pub const TRIANGLE_CHARSTRING: &[u8] = &[149, 159, 21, 239, 139, 5, 89, 219, 5, 14];

/// "hello": 5 5 rmoveto -107 callsubr endchar
pub const SUBR_CHARSTRING: &[u8] = &[144, 144, 21, 32, 10, 14];

/// Local subroutine 0: 50 0 0 50 -50 0 rlineto return
pub const SQUARE_SUBR: &[u8] = &[189, 139, 139, 189, 89, 139, 5, 11];

// the Top DICT is fixed size because every operand uses the 5 byte form
const TOP_DICT_LEN: usize = 23;
const PRIVATE_DICT_LEN: usize = 6;

/// A name-keyed CFF table for a font named "Fixture" with three glyphs:
/// `.notdef`, `A` (standard string 34) and `hello` (custom string 391).
///
/// Layout, in order: header, Name INDEX, Top DICT INDEX, String INDEX,
/// empty Global Subr INDEX, format 0 charset, CharStrings INDEX, Private
/// DICT and the local Subrs INDEX it points to.
pub fn simple_cff() -> Vec<u8> {
    let header = [1u8, 0, 4, 1];
    let names = index(&[b"Fixture"]);
    let strings = index(&[b"hello"]);
    let global_subrs = index(&[]);
    // format 0, SIDs for glyphs 1 and 2
    let charset = [0u8, 0, 34, 0x01, 0x87];
    let charstrings = index(&[NOTDEF_CHARSTRING, TRIANGLE_CHARSTRING, SUBR_CHARSTRING]);
    let subrs = index(&[SQUARE_SUBR]);

    let top_dict_index_len = 2 + 1 + 2 + TOP_DICT_LEN;
    let charset_offset = header.len()
        + names.len()
        + top_dict_index_len
        + strings.len()
        + global_subrs.len();
    let charstrings_offset = charset_offset + charset.len();
    let private_offset = charstrings_offset + charstrings.len();

    let mut top_dict = Vec::new();
    top_dict.extend(int_operand(charset_offset as i32));
    top_dict.push(15); // charset
    top_dict.extend(int_operand(charstrings_offset as i32));
    top_dict.push(17); // CharStrings
    top_dict.extend(int_operand(PRIVATE_DICT_LEN as i32));
    top_dict.extend(int_operand(private_offset as i32));
    top_dict.push(18); // Private
    assert_eq!(top_dict.len(), TOP_DICT_LEN);
    let top_dicts = index(&[&top_dict]);

    // Subrs directly follow the Private DICT; the offset is relative to it
    let mut private_dict = Vec::new();
    private_dict.extend(int_operand(PRIVATE_DICT_LEN as i32));
    private_dict.push(19);
    assert_eq!(private_dict.len(), PRIVATE_DICT_LEN);

    let parts: [&[u8]; 9] = [
        &header,
        &names,
        &top_dicts,
        &strings,
        &global_subrs,
        &charset,
        &charstrings,
        &private_dict,
        &subrs,
    ];
    parts.concat()
}

/// An INDEX with one byte offsets.
pub fn index(objects: &[&[u8]]) -> Vec<u8> {
    let mut buf = (objects.len() as u16).to_be_bytes().to_vec();
    if objects.is_empty() {
        return buf;
    }
    buf.push(1);
    let mut offset = 1usize;
    buf.push(offset as u8);
    for object in objects {
        offset += object.len();
        buf.push(offset as u8);
    }
    for object in objects {
        buf.extend_from_slice(object);
    }
    buf
}

/// A DICT integer operand in the 5 byte encoding.
pub fn int_operand(value: i32) -> [u8; 5] {
    let [a, b, c, d] = value.to_be_bytes();
    [29, a, b, c, d]
}
