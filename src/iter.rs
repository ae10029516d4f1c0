//! Collection iterators.
//!
//! Each iterator adapts one on-disk collection layout into the uniform
//! head / entry / data event protocol. The parser drives exactly one of
//! them at a time through [`Iter::next_step`].

mod int_set;
mod quick_list;
mod seq;
mod zip_list;
mod zip_map;

pub(crate) use self::int_set::IntSetIter;
pub(crate) use self::quick_list::QuickListIter;
pub(crate) use self::seq::SeqIter;
pub(crate) use self::zip_list::{read_zip_list_entry, ZipListIter};
pub(crate) use self::zip_map::ZipMapIter;

use crate::codec::{read_binary_double, read_float, read_string};
use crate::event::{
    Event, HashData, HashEntry, HashHead, ListData, ListEntry, ListHead, SetData, SetEntry,
    SetHead, SortedSetData, SortedSetEntry, SortedSetHead, SortedSetValue,
};
use crate::reader::ByteReader;
use crate::{DataKey, RdbError, RdbResult, Value};
use std::collections::HashMap;

/// Outcome of advancing an iterator by one step.
pub(crate) enum Step {
    /// An event to hand to the consumer.
    Event(Event),
    /// Bytes were consumed but no event is due; advance again.
    Continue,
    /// The iterator is exhausted; the parser returns to opcode dispatch.
    End,
}

/// Outcome of advancing a ziplist without event mapping, used by the
/// quicklist iterator to drive its per-node ziplists.
pub(crate) enum RawStep {
    Head(u64),
    Entry { index: u64, value: MemberValue },
    End,
}

/// A collection member as it comes off the wire, before it is collapsed
/// to the public type of its collection shape.
#[derive(Clone, Debug)]
pub(crate) enum MemberValue {
    Str(String),
    Int(i64),
    Scored { member: String, score: f64 },
    Pair { field: String, value: String },
}

impl MemberValue {
    pub(crate) fn into_string(self) -> RdbResult<String> {
        match self {
            Self::Str(s) => Ok(s),
            Self::Int(i) => Ok(i.to_string()),
            Self::Scored { .. } | Self::Pair { .. } => {
                Err(RdbError::Impl("compound member where a string is expected"))
            }
        }
    }

    fn into_value(self) -> RdbResult<Value> {
        match self {
            Self::Str(s) => Ok(Value::String(s)),
            Self::Int(i) => Ok(Value::Integer(i)),
            Self::Scored { .. } | Self::Pair { .. } => {
                Err(RdbError::Impl("compound member where a scalar is expected"))
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn into_f64(self) -> RdbResult<f64> {
        match self {
            Self::Int(i) => Ok(i as f64),
            Self::Str(s) => Ok(s.parse()?),
            Self::Scored { .. } | Self::Pair { .. } => {
                Err(RdbError::Impl("compound member where a score is expected"))
            }
        }
    }
}

/// Reads one collection member in the representation the enclosing
/// encoding uses.
#[derive(Clone, Copy, Debug)]
pub(crate) enum ValueReader {
    /// One string (plain lists and sets).
    Str,
    /// One string plus a score; `typeZSet2` stores the score as a binary
    /// double, older sorted sets as a variable-length ASCII float.
    SortedSet { binary_score: bool },
    /// Two strings (hash field and value).
    Hash,
    /// One ziplist entry.
    ZipListEntry,
    /// Two ziplist entries collapsing to member + score.
    ZipListScored,
    /// Two ziplist entries collapsing to a field pair.
    ZipListPair,
}

impl ValueReader {
    pub(crate) fn read_value(self, rdr: &mut dyn ByteReader) -> RdbResult<MemberValue> {
        match self {
            Self::Str => Ok(MemberValue::Str(read_string(rdr)?)),
            Self::SortedSet { binary_score } => {
                let member = read_string(rdr)?;
                let score = if binary_score {
                    read_binary_double(rdr)?
                } else {
                    read_float(rdr)?
                };
                Ok(MemberValue::Scored { member, score })
            }
            Self::Hash => {
                let field = read_string(rdr)?;
                let value = read_string(rdr)?;
                Ok(MemberValue::Pair { field, value })
            }
            Self::ZipListEntry => read_zip_list_entry(rdr),
            Self::ZipListScored => {
                let member = read_zip_list_entry(rdr)?.into_string()?;
                let score = read_zip_list_entry(rdr)?.into_f64()?;
                Ok(MemberValue::Scored { member, score })
            }
            Self::ZipListPair => {
                let field = read_zip_list_entry(rdr)?.into_string()?;
                let value = read_zip_list_entry(rdr)?.into_string()?;
                Ok(MemberValue::Pair { field, value })
            }
        }
    }
}

/// The target shape of a collection; maps the generic head / entry /
/// data records onto the shape's public event types.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Shape {
    List,
    Set,
    SortedSet,
    Hash,
}

impl Shape {
    pub(crate) fn head_event(self, key: &DataKey, length: u64) -> Event {
        let key = key.clone();
        match self {
            Self::List => Event::ListHead(ListHead { key, length }),
            Self::Set => Event::SetHead(SetHead { key, length }),
            Self::SortedSet => Event::SortedSetHead(SortedSetHead { key, length }),
            Self::Hash => Event::HashHead(HashHead { key, length }),
        }
    }

    pub(crate) fn entry_event(
        self,
        key: &DataKey,
        index: u64,
        length: u64,
        value: MemberValue,
    ) -> RdbResult<Event> {
        let key = key.clone();
        Ok(match self {
            Self::List => Event::ListEntry(ListEntry {
                key,
                index,
                length,
                value: value.into_string()?,
            }),
            Self::Set => Event::SetEntry(SetEntry {
                key,
                index,
                length,
                value: value.into_value()?,
            }),
            Self::SortedSet => {
                let MemberValue::Scored { member, score } = value else {
                    return Err(RdbError::Impl("sorted set entry without a score"));
                };
                Event::SortedSetEntry(SortedSetEntry {
                    key,
                    index,
                    length,
                    member,
                    score,
                })
            }
            Self::Hash => {
                let MemberValue::Pair { field, value } = value else {
                    return Err(RdbError::Impl("hash entry without a field pair"));
                };
                Event::HashEntry(HashEntry {
                    key,
                    index,
                    length,
                    field,
                    value,
                })
            }
        })
    }

    pub(crate) fn data_event(self, key: &DataKey, values: Vec<MemberValue>) -> RdbResult<Event> {
        let key = key.clone();
        Ok(match self {
            Self::List => Event::ListData(ListData {
                key,
                values: values
                    .into_iter()
                    .map(MemberValue::into_string)
                    .collect::<RdbResult<_>>()?,
            }),
            Self::Set => Event::SetData(SetData {
                key,
                values: values
                    .into_iter()
                    .map(MemberValue::into_value)
                    .collect::<RdbResult<_>>()?,
            }),
            Self::SortedSet => {
                let mut collected = Vec::with_capacity(values.len());
                for value in values {
                    let MemberValue::Scored { member, score } = value else {
                        return Err(RdbError::Impl("sorted set member without a score"));
                    };
                    collected.push(SortedSetValue { member, score });
                }
                Event::SortedSetData(SortedSetData {
                    key,
                    values: collected,
                })
            }
            Self::Hash => {
                let mut collected = HashMap::with_capacity(values.len());
                for value in values {
                    let MemberValue::Pair { field, value } = value else {
                        return Err(RdbError::Impl("hash member without a field pair"));
                    };
                    collected.insert(field, value);
                }
                Event::HashData(HashData {
                    key,
                    values: collected,
                })
            }
        })
    }
}

/// The one active collection iterator.
pub(crate) enum Iter {
    Seq(SeqIter),
    ZipList(ZipListIter),
    ZipMap(ZipMapIter),
    IntSet(IntSetIter),
    QuickList(QuickListIter),
}

impl Iter {
    pub(crate) fn next_step(&mut self, rdr: &mut dyn ByteReader) -> RdbResult<Step> {
        match self {
            Self::Seq(iter) => iter.next_step(rdr),
            Self::ZipList(iter) => iter.next_step(rdr),
            Self::ZipMap(iter) => iter.next_step(rdr),
            Self::IntSet(iter) => iter.next_step(rdr),
            Self::QuickList(iter) => iter.next_step(rdr),
        }
    }
}
