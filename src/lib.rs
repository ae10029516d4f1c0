//! A streaming parser for redis RDB dump files.
//!
//! The parser turns a byte stream into a sequence of typed [`Event`]s:
//! auxiliary metadata, database selections, resize hints, and key/value
//! records covering strings, lists, sets, sorted sets, and hashes. Large
//! collections are emitted incrementally (a `*Head` event, one `*Entry`
//! event per element, and a terminal `*Data` event carrying the whole
//! collection), so consumers that only need a running view never have to
//! hold the complete value.
//!
//! ```rust,no_run
//! use rdbstream::{Event, Parser, RdbResult};
//!
//! fn main() -> RdbResult<()> {
//!     let file = std::fs::File::open("dump.rdb")?;
//!     for event in Parser::new(file) {
//!         match event? {
//!             Event::String(data) => println!("{} = {}", data.key.key, data.value),
//!             _ => {}
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! An optional key filter skips values without materialising them:
//!
//! ```rust,no_run
//! use rdbstream::Parser;
//!
//! # let file = std::fs::File::open("dump.rdb").unwrap();
//! let parser = Parser::new(file).with_key_filter(|key| key.database > 0);
//! ```

#![deny(missing_debug_implementations)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

mod codec;
mod data_key;
mod event;
mod iter;
mod module;
mod parser;
mod rdb_error;
mod reader;

pub use crate::data_key::DataKey;
pub use crate::event::{
    Aux, BloomFilter, CuckooFilter, DatabaseSize, Event, HashData, HashEntry, HashHead, ListData,
    ListEntry, ListHead, SetData, SetEntry, SetHead, SortedSetData, SortedSetEntry, SortedSetHead,
    SortedSetValue, StringData, Value,
};
pub use crate::parser::Parser;
pub use crate::rdb_error::{RdbError, RdbResult};
