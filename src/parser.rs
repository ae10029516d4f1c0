use crate::codec::{
    read_length, read_milliseconds_time, read_seconds_time, read_string, read_u8,
    skip_binary_double, skip_float, skip_string,
};
use crate::event::{Aux, BloomFilter, CuckooFilter, DatabaseSize, Event, StringData};
use crate::iter::{
    IntSetIter, Iter, QuickListIter, SeqIter, Shape, Step, ValueReader, ZipListIter, ZipMapIter,
};
use crate::module::{
    module_type_name, read_bloom_filter, read_cuckoo_filter, BLOOM_FILTER_MODULE,
    CUCKOO_FILTER_MODULE,
};
use crate::reader::{BufferReader, ByteReader};
use crate::{DataKey, RdbError, RdbResult};
use std::io::Read;
use time::OffsetDateTime;

const MAGIC_STRING: &[u8] = b"REDIS";
const MIN_VERSION: u32 = 1;
const MAX_VERSION: u32 = 9;

const OP_CODE_MODULE_AUX: u8 = 247;
const OP_CODE_IDLE: u8 = 248;
const OP_CODE_FREQ: u8 = 249;
const OP_CODE_AUX: u8 = 250;
const OP_CODE_RESIZE_DB: u8 = 251;
const OP_CODE_EXPIRE_TIME_MS: u8 = 252;
const OP_CODE_EXPIRE_TIME: u8 = 253;
const OP_CODE_SELECT_DB: u8 = 254;
const OP_CODE_EOF: u8 = 255;

const TYPE_STRING: u8 = 0;
const TYPE_LIST: u8 = 1;
const TYPE_SET: u8 = 2;
const TYPE_ZSET: u8 = 3;
const TYPE_HASH: u8 = 4;
const TYPE_ZSET_2: u8 = 5;
const TYPE_MODULE_2: u8 = 7;
const TYPE_HASH_ZIP_MAP: u8 = 9;
const TYPE_LIST_ZIP_LIST: u8 = 10;
const TYPE_SET_INT_SET: u8 = 11;
const TYPE_ZSET_ZIP_LIST: u8 = 12;
const TYPE_HASH_ZIP_LIST: u8 = 13;
const TYPE_LIST_QUICK_LIST: u8 = 14;

// A key whose value is about to be read.
struct Pending {
    data_type: u8,
    key: String,
}

/// A streaming dump parser.
///
/// Call [`next_event`](Self::next_event) repeatedly, or use the parser as
/// an [`Iterator`]; each call produces at most one [`Event`] in the exact
/// order dictated by the byte stream. The first call validates the magic
/// string and version.
pub struct Parser<R> {
    reader: BufferReader<R>,
    initialized: bool,
    done: bool,
    database: i64,
    idle: u64,
    freq: u8,
    expiry: Option<OffsetDateTime>,
    pending: Option<Pending>,
    iterator: Option<Iter>,
    key_filter: Option<Box<dyn Fn(&DataKey) -> bool>>,
}

impl<R> std::fmt::Debug for Parser<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("initialized", &self.initialized)
            .field("done", &self.done)
            .field("database", &self.database)
            .field("expiry", &self.expiry)
            .field("filtered", &self.key_filter.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: Read> Parser<R> {
    /// Creates a parser over `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufferReader::new(reader),
            initialized: false,
            done: false,
            database: -1,
            idle: 0,
            freq: 0,
            expiry: None,
            pending: None,
            iterator: None,
            key_filter: None,
        }
    }

    /// Installs a key filter.
    ///
    /// When the predicate returns false for a key, the value's bytes are
    /// skipped without being materialised and no event mentions the key.
    #[must_use]
    pub fn with_key_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&DataKey) -> bool + 'static,
    {
        self.key_filter = Some(Box::new(filter));
        self
    }

    /// Produces the next event, or `None` once the end-of-stream opcode
    /// has been read.
    ///
    /// Any error is fatal: the cursor may sit in the middle of a record,
    /// so the result of further calls is undefined.
    pub fn next_event(&mut self) -> RdbResult<Option<Event>> {
        if self.done {
            return Ok(None);
        }

        if !self.initialized {
            self.verify_magic_string()?;
            self.verify_version()?;
            self.initialized = true;
        }

        // An expiry only ever applies to the value read within the same
        // call that consumed the expiry opcode.
        self.expiry = None;

        loop {
            if let Some(iterator) = self.iterator.as_mut() {
                match iterator.next_step(&mut self.reader)? {
                    Step::Event(event) => return Ok(Some(event)),
                    Step::Continue => {}
                    Step::End => {
                        self.iterator = None;
                    }
                }
                continue;
            }

            if let Some(pending) = self.pending.take() {
                if let Some(event) = self.read_value(pending)? {
                    return Ok(Some(event));
                }
                continue;
            }

            let op_code = read_u8(&mut self.reader)?;

            match op_code {
                OP_CODE_MODULE_AUX => {
                    // The payload layout is unspecified; nothing to consume.
                    trace!("module aux opcode ignored");
                }
                OP_CODE_IDLE => {
                    self.idle = read_length(&mut self.reader)?;
                    trace!("idle {}", self.idle);
                }
                OP_CODE_FREQ => {
                    self.freq = read_u8(&mut self.reader)?;
                    trace!("freq {}", self.freq);
                }
                OP_CODE_AUX => {
                    let key = read_string(&mut self.reader)?;
                    let value = read_string(&mut self.reader)?;
                    return Ok(Some(Event::Aux(Aux { key, value })));
                }
                OP_CODE_RESIZE_DB => {
                    let size = read_length(&mut self.reader)?;
                    let expire = read_length(&mut self.reader)?;
                    return Ok(Some(Event::DatabaseSize(DatabaseSize { size, expire })));
                }
                OP_CODE_EXPIRE_TIME_MS => {
                    self.expiry = Some(read_milliseconds_time(&mut self.reader)?);
                }
                OP_CODE_EXPIRE_TIME => {
                    self.expiry = Some(read_seconds_time(&mut self.reader)?);
                }
                OP_CODE_SELECT_DB => {
                    #[allow(clippy::cast_possible_wrap)]
                    {
                        self.database = read_length(&mut self.reader)? as i64;
                    }
                    debug!("selected database {}", self.database);
                }
                OP_CODE_EOF => {
                    debug!("end of stream");
                    self.done = true;
                    return Ok(None);
                }
                data_type => {
                    let key = read_string(&mut self.reader)?;
                    self.pending = Some(Pending { data_type, key });
                }
            }
        }
    }

    fn verify_magic_string(&mut self) -> RdbResult<()> {
        if self.reader.read_bytes(MAGIC_STRING.len())? != MAGIC_STRING {
            return Err(RdbError::InvalidMagicString);
        }

        Ok(())
    }

    fn verify_version(&mut self) -> RdbResult<()> {
        let digits = String::from_utf8(self.reader.read_bytes(4)?.to_vec())?;
        let version: u32 = digits
            .parse()
            .map_err(|source| RdbError::VersionParse { source })?;

        if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
            return Err(RdbError::UnsupportedVersion { version });
        }

        debug!("dump version {version}");
        Ok(())
    }

    // Begins reading the value belonging to `pending`; returns an event
    // for self-contained values, installs an iterator otherwise.
    fn read_value(&mut self, pending: Pending) -> RdbResult<Option<Event>> {
        let Pending { data_type, key } = pending;
        let data_key = DataKey {
            database: self.database,
            key,
            expiry: self.expiry.take(),
        };

        let rejected = self
            .key_filter
            .as_ref()
            .map_or(false, |filter| !filter(&data_key));

        if rejected {
            trace!("skipping filtered key {:?}", data_key.key);
            self.skip_value(data_type)?;
            self.expiry = None;
            return Ok(None);
        }

        match data_type {
            TYPE_STRING => {
                let value = read_string(&mut self.reader)?;
                return Ok(Some(Event::String(StringData {
                    key: data_key,
                    value,
                })));
            }
            TYPE_LIST => {
                self.iterator = Some(Iter::Seq(SeqIter::new(
                    data_key,
                    Shape::List,
                    ValueReader::Str,
                )));
            }
            TYPE_SET => {
                self.iterator = Some(Iter::Seq(SeqIter::new(
                    data_key,
                    Shape::Set,
                    ValueReader::Str,
                )));
            }
            TYPE_ZSET | TYPE_ZSET_2 => {
                self.iterator = Some(Iter::Seq(SeqIter::new(
                    data_key,
                    Shape::SortedSet,
                    ValueReader::SortedSet {
                        binary_score: data_type == TYPE_ZSET_2,
                    },
                )));
            }
            TYPE_HASH => {
                self.iterator = Some(Iter::Seq(SeqIter::new(
                    data_key,
                    Shape::Hash,
                    ValueReader::Hash,
                )));
            }
            TYPE_HASH_ZIP_MAP => {
                self.iterator = Some(Iter::ZipMap(ZipMapIter::new(data_key)));
            }
            TYPE_LIST_ZIP_LIST => {
                self.iterator = Some(Iter::ZipList(ZipListIter::new(
                    data_key,
                    Shape::List,
                    ValueReader::ZipListEntry,
                    1,
                )));
            }
            TYPE_SET_INT_SET => {
                self.iterator = Some(Iter::IntSet(IntSetIter::new(data_key)));
            }
            TYPE_ZSET_ZIP_LIST => {
                self.iterator = Some(Iter::ZipList(ZipListIter::new(
                    data_key,
                    Shape::SortedSet,
                    ValueReader::ZipListScored,
                    2,
                )));
            }
            TYPE_HASH_ZIP_LIST => {
                self.iterator = Some(Iter::ZipList(ZipListIter::new(
                    data_key,
                    Shape::Hash,
                    ValueReader::ZipListPair,
                    2,
                )));
            }
            TYPE_LIST_QUICK_LIST => {
                self.iterator = Some(Iter::QuickList(QuickListIter::new(data_key)));
            }
            TYPE_MODULE_2 => {
                return self.read_module(data_key).map(Some);
            }
            data_type => {
                return Err(RdbError::UnsupportedDataType { data_type });
            }
        }

        Ok(None)
    }

    fn read_module(&mut self, data_key: DataKey) -> RdbResult<Event> {
        let id = read_length(&mut self.reader)?;
        let name = module_type_name(id);
        debug!("module value of type {name:?}");

        match name.as_str() {
            BLOOM_FILTER_MODULE => {
                read_bloom_filter(&mut self.reader)?;
                Ok(Event::BloomFilter(BloomFilter { key: data_key }))
            }
            CUCKOO_FILTER_MODULE => {
                read_cuckoo_filter(&mut self.reader)?;
                Ok(Event::CuckooFilter(CuckooFilter { key: data_key }))
            }
            _ => Err(RdbError::UnsupportedDataType {
                data_type: TYPE_MODULE_2,
            }),
        }
    }

    // Consumes exactly the bytes the value would have occupied, without
    // materialising entries.
    fn skip_value(&mut self, data_type: u8) -> RdbResult<()> {
        let rdr = &mut self.reader;

        match data_type {
            TYPE_STRING | TYPE_HASH_ZIP_MAP | TYPE_LIST_ZIP_LIST | TYPE_SET_INT_SET
            | TYPE_ZSET_ZIP_LIST | TYPE_HASH_ZIP_LIST => skip_string(rdr),
            TYPE_LIST | TYPE_SET | TYPE_LIST_QUICK_LIST => {
                let length = read_length(rdr)?;
                for _ in 0..length {
                    skip_string(rdr)?;
                }
                Ok(())
            }
            TYPE_ZSET => {
                let length = read_length(rdr)?;
                for _ in 0..length {
                    skip_string(rdr)?;
                    skip_float(rdr)?;
                }
                Ok(())
            }
            TYPE_ZSET_2 => {
                let length = read_length(rdr)?;
                for _ in 0..length {
                    skip_string(rdr)?;
                    skip_binary_double(rdr)?;
                }
                Ok(())
            }
            TYPE_HASH => {
                let length = read_length(rdr)?;
                for _ in 0..length {
                    skip_string(rdr)?;
                    skip_string(rdr)?;
                }
                Ok(())
            }
            data_type => Err(RdbError::UnsupportedDataType { data_type }),
        }
    }
}

impl<R: Read> Iterator for Parser<R> {
    type Item = RdbResult<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}
