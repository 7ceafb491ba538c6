//! Lazily parsed, tag indexed access to the tables of a font.
//!
//! The registry owns one slot per table directory record. A slot starts out
//! holding only the raw bytes of its table; the first typed request parses
//! those bytes and caches the outcome, success or failure, for the lifetime
//! of the registry. Concurrent first requests are coalesced so each table is
//! parsed at most once.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use types::Tag;

use crate::{
    table_directory::{TableDirectory, TableRecord},
    table_provider::TopLevelTable,
    tables::{
        cff::Cff, gdef::Gdef, glyf::Glyf, gpos::Gpos, gsub::Gsub, head::Head, loca::Loca,
        maxp::Maxp, post::Post,
    },
    FontData, FontRead, ReadError,
};

/// The materialization state of a single table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// The font has no table with this tag.
    Absent,
    /// The table exists but has not been parsed.
    Raw,
    /// The table has been parsed successfully.
    Materialized,
    /// Parsing was attempted and failed; the failure is cached.
    Failed,
}

/// A failure to materialize a specific table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableError {
    tag: Tag,
    source: ReadError,
}

impl TableError {
    pub fn new(tag: Tag, source: ReadError) -> Self {
        Self { tag, source }
    }

    /// The tag of the table that failed to parse.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The underlying parse error.
    pub fn read_error(&self) -> &ReadError {
        &self.source
    }
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to parse '{}' table: {}", self.tag, self.source)
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// A materialized table.
///
/// Tables without a dedicated decoder are kept as their raw bytes.
#[derive(Clone, Debug)]
pub enum Table<'a> {
    Head(Head),
    Maxp(Maxp),
    Post(Post<'a>),
    Loca(Loca<'a>),
    Glyf(Glyf<'a>),
    Cff(Cff<'a>),
    Gdef(Gdef<'a>),
    Gsub(Gsub<'a>),
    Gpos(Gpos<'a>),
    Unparsed(FontData<'a>),
}

impl Table<'_> {
    /// Returns `true` if this table was decoded into a typed structure.
    pub fn is_parsed(&self) -> bool {
        !matches!(self, Table::Unparsed(_))
    }
}

/// A table type that can be retrieved from a [`TableRegistry`].
pub trait ParsedTable<'a>: TopLevelTable + Sized {
    /// Returns the typed table if `table` holds this variant.
    fn from_table<'r>(table: &'r Table<'a>) -> Option<&'r Self>;
}

macro_rules! parsed_table {
    ($lt:lifetime, $variant:ident, $ty:ty) => {
        impl<$lt> ParsedTable<$lt> for $ty {
            fn from_table<'r>(table: &'r Table<$lt>) -> Option<&'r Self> {
                match table {
                    Table::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

parsed_table!('a, Head, Head);
parsed_table!('a, Maxp, Maxp);
parsed_table!('a, Post, Post<'a>);
parsed_table!('a, Loca, Loca<'a>);
parsed_table!('a, Glyf, Glyf<'a>);
parsed_table!('a, Cff, Cff<'a>);
parsed_table!('a, Gdef, Gdef<'a>);
parsed_table!('a, Gsub, Gsub<'a>);
parsed_table!('a, Gpos, Gpos<'a>);

struct TableSlot<'a> {
    record: TableRecord,
    data: FontData<'a>,
    parsed: OnceLock<Result<Table<'a>, TableError>>,
    attempts: AtomicU32,
}

impl<'a> TableSlot<'a> {
    fn new(record: TableRecord, data: FontData<'a>) -> Self {
        Self {
            record,
            data,
            parsed: OnceLock::new(),
            attempts: AtomicU32::new(0),
        }
    }

    fn state(&self) -> SlotState {
        match self.parsed.get() {
            None => SlotState::Raw,
            Some(Ok(_)) => SlotState::Materialized,
            Some(Err(_)) => SlotState::Failed,
        }
    }
}

/// Tag indexed storage for the tables of a single font.
///
/// All access goes through `&self`, and the registry can be shared between
/// threads. Each table is parsed at most once no matter how many threads
/// request it.
pub struct TableRegistry<'a> {
    data: FontData<'a>,
    directory: TableDirectory<'a>,
    slots: BTreeMap<Tag, TableSlot<'a>>,
}

impl<'a> TableRegistry<'a> {
    /// Parse the table directory of `data` and create a slot for each table.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let directory = TableDirectory::read(data)?;
        Ok(Self::from_directory(data, directory))
    }

    /// Create a registry from an already parsed directory.
    ///
    /// When a tag appears more than once the first record wins.
    pub fn from_directory(data: FontData<'a>, directory: TableDirectory<'a>) -> Self {
        let mut slots = BTreeMap::new();
        for record in directory.table_records() {
            let tag = record.tag();
            if slots.contains_key(&tag) {
                log::warn!("ignoring duplicate table record for '{tag}'");
                continue;
            }
            let table_data = record
                .byte_range()
                .and_then(|range| data.slice(range))
                .unwrap_or_default();
            slots.insert(tag, TableSlot::new(*record, table_data));
        }
        log::debug!(
            "registered {} tables, sfnt version 0x{:08X}",
            slots.len(),
            directory.sfnt_version()
        );
        Self {
            data,
            directory,
            slots,
        }
    }

    /// The complete font data.
    pub fn font_data(&self) -> FontData<'a> {
        self.data
    }

    pub fn directory(&self) -> &TableDirectory<'a> {
        &self.directory
    }

    /// The unparsed bytes of the table with this tag.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        self.slots.get(&tag).map(|slot| slot.data)
    }

    /// Returns `true` if the font contains a table with this tag.
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.slots.contains_key(&tag)
    }

    /// The tags of all tables in the font, in ascending order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + use<'_, 'a> {
        self.slots.keys().copied()
    }

    /// The directory record for the table with this tag.
    pub fn table_record(&self, tag: Tag) -> Option<&TableRecord> {
        self.slots.get(&tag).map(|slot| &slot.record)
    }

    pub fn slot_state(&self, tag: Tag) -> SlotState {
        self.slots
            .get(&tag)
            .map(TableSlot::state)
            .unwrap_or(SlotState::Absent)
    }

    /// The number of times parsing has run for the table with this tag.
    ///
    /// This is at most one.
    pub fn parse_attempts(&self, tag: Tag) -> u32 {
        self.slots
            .get(&tag)
            .map(|slot| slot.attempts.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    /// Return the materialized table for `tag`, parsing it on first use.
    ///
    /// Returns `Ok(None)` if the font has no such table. A failed parse is
    /// cached and the same error is returned on every later request.
    pub fn materialize(&self, tag: Tag) -> Result<Option<&Table<'a>>, TableError> {
        let Some(slot) = self.slots.get(&tag) else {
            return Ok(None);
        };
        if let Some(cached) = slot.parsed.get() {
            log::trace!("'{tag}' already materialized");
            return cached.as_ref().map(Some).map_err(Clone::clone);
        }
        slot.parsed
            .get_or_init(|| {
                slot.attempts.fetch_add(1, Ordering::AcqRel);
                log::debug!("materializing '{tag}' ({} bytes)", slot.data.len());
                let result = self
                    .parse_table(tag, slot.data)
                    .map_err(|source| TableError::new(tag, source));
                if let Err(e) = &result {
                    log::warn!("{e}");
                }
                result
            })
            .as_ref()
            .map(Some)
            .map_err(Clone::clone)
    }

    /// Return the typed table `T`, parsing it on first use.
    ///
    /// Returns `Ok(None)` if the table is absent.
    pub fn get<T: ParsedTable<'a>>(&self) -> Result<Option<&T>, TableError> {
        match self.materialize(T::TAG)? {
            None => Ok(None),
            Some(table) => T::from_table(table)
                .map(Some)
                .ok_or_else(|| TableError::new(T::TAG, ReadError::ValidationError)),
        }
    }

    /// Like [`get`](Self::get), but an absent table is an error.
    pub fn expect<T: ParsedTable<'a>>(&self) -> Result<&T, TableError> {
        self.get::<T>()?
            .ok_or_else(|| TableError::new(T::TAG, ReadError::TableIsMissing(T::TAG)))
    }

    fn parse_table(&self, tag: Tag, data: FontData<'a>) -> Result<Table<'a>, ReadError> {
        let table = match tag {
            t if t == Head::TAG => Table::Head(Head::read(data)?),
            t if t == Maxp::TAG => Table::Maxp(Maxp::read(data)?),
            t if t == Post::TAG => Table::Post(Post::read(data)?),
            t if t == Loca::TAG => Table::Loca(Loca::read(data, self.loca_is_long()?)?),
            t if t == Glyf::TAG => Table::Glyf(Glyf::read(data)?),
            t if t == Cff::TAG => Table::Cff(Cff::read(data)?),
            t if t == Gdef::TAG => Table::Gdef(Gdef::read(data)?),
            t if t == Gsub::TAG => Table::Gsub(Gsub::read(data)?),
            t if t == Gpos::TAG => Table::Gpos(Gpos::read(data)?),
            _ => Table::Unparsed(data),
        };
        Ok(table)
    }

    // the loca format lives in head
    fn loca_is_long(&self) -> Result<bool, ReadError> {
        match self.get::<Head>() {
            Ok(Some(head)) => Ok(head.index_to_loc_format() == 1),
            Ok(None) => Err(ReadError::TableIsMissing(Head::TAG)),
            Err(e) => Err(e.source),
        }
    }
}

impl std::fmt::Debug for TableRegistry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().map(|(tag, slot)| (tag, slot.state())))
            .finish()
    }
}
