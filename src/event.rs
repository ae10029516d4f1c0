//! The typed events a dump decomposes into.

mod hash;
mod list;
mod set;
mod sorted_set;

pub use self::hash::{HashData, HashEntry, HashHead};
pub use self::list::{ListData, ListEntry, ListHead};
pub use self::set::{SetData, SetEntry, SetHead};
pub use self::sorted_set::{SortedSetData, SortedSetEntry, SortedSetHead, SortedSetValue};

use crate::DataKey;

/// One parse result, in the exact order dictated by the byte stream.
///
/// Every key produces either a single [`StringData`], a single module
/// event, or the sequence `*Head`, zero or more `*Entry`, `*Data` — all
/// carrying the same [`DataKey`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub enum Event {
    Aux(Aux),
    DatabaseSize(DatabaseSize),
    String(StringData),
    ListHead(ListHead),
    ListEntry(ListEntry),
    ListData(ListData),
    SetHead(SetHead),
    SetEntry(SetEntry),
    SetData(SetData),
    SortedSetHead(SortedSetHead),
    SortedSetEntry(SortedSetEntry),
    SortedSetData(SortedSetData),
    HashHead(HashHead),
    HashEntry(HashEntry),
    HashData(HashData),
    BloomFilter(BloomFilter),
    CuckooFilter(CuckooFilter),
}

/// An out-of-band metadata key/value pair from the top of the dump.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Aux {
    pub key: String,
    pub value: String,
}

/// A hint of the upcoming entry count of the selected database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DatabaseSize {
    /// Size of the main dictionary.
    pub size: u64,
    /// Size of the expiry dictionary.
    pub expire: u64,
}

/// A scalar string record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StringData {
    pub key: DataKey,
    pub value: String,
}

/// A recognised bloom filter module value whose payload bytes were
/// consumed but whose contents are discarded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BloomFilter {
    pub key: DataKey,
}

/// A recognised cuckoo filter module value whose payload bytes were
/// consumed but whose contents are discarded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CuckooFilter {
    pub key: DataKey,
}

/// A set member: a string, or an integer when the set arrived as an intset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Value {
    String(String),
    Integer(i64),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
        }
    }
}
