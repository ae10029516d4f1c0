// advisable because not all test modules use all functions of this module:
#![allow(dead_code)]

use rdbstream::{Event, Parser, RdbError, RdbResult};

// Returns a logger that prints out all info, warn and error messages.
pub fn init_logger() {
    let _ = flexi_logger::Logger::try_with_env_or_str("info").map(flexi_logger::Logger::start);
}

pub const TYPE_STRING: u8 = 0;
pub const TYPE_LIST: u8 = 1;
pub const TYPE_SET: u8 = 2;
pub const TYPE_ZSET: u8 = 3;
pub const TYPE_HASH: u8 = 4;
pub const TYPE_ZSET_2: u8 = 5;
pub const TYPE_MODULE_2: u8 = 7;
pub const TYPE_HASH_ZIP_MAP: u8 = 9;
pub const TYPE_LIST_ZIP_LIST: u8 = 10;
pub const TYPE_SET_INT_SET: u8 = 11;
pub const TYPE_ZSET_ZIP_LIST: u8 = 12;
pub const TYPE_HASH_ZIP_LIST: u8 = 13;
pub const TYPE_LIST_QUICK_LIST: u8 = 14;

pub const OP_CODE_MODULE_AUX: u8 = 247;
pub const OP_CODE_IDLE: u8 = 248;
pub const OP_CODE_FREQ: u8 = 249;
pub const OP_CODE_AUX: u8 = 250;
pub const OP_CODE_RESIZE_DB: u8 = 251;
pub const OP_CODE_EXPIRE_TIME_MS: u8 = 252;
pub const OP_CODE_EXPIRE_TIME: u8 = 253;
pub const OP_CODE_SELECT_DB: u8 = 254;
pub const OP_CODE_EOF: u8 = 255;

/// Collects the full event stream, panicking on any error.
pub fn parse(bytes: Vec<u8>) -> Vec<Event> {
    Parser::new(std::io::Cursor::new(bytes))
        .collect::<RdbResult<Vec<_>>>()
        .unwrap()
}

pub fn parse_with_filter<F>(bytes: Vec<u8>, filter: F) -> Vec<Event>
where
    F: Fn(&rdbstream::DataKey) -> bool + 'static,
{
    Parser::new(std::io::Cursor::new(bytes))
        .with_key_filter(filter)
        .collect::<RdbResult<Vec<_>>>()
        .unwrap()
}

/// Drives the parser until it fails and returns the error.
pub fn parse_err(bytes: Vec<u8>) -> RdbError {
    let mut parser = Parser::new(std::io::Cursor::new(bytes));

    loop {
        match parser.next_event() {
            Ok(Some(_)) => {}
            Ok(None) => panic!("expected the parser to fail"),
            Err(e) => return e,
        }
    }
}

// ---------------------------------------------------------------------
// Encoding helpers. These mirror what the dump writer in the server
// produces, covering exactly the shapes the tests need.
// ---------------------------------------------------------------------

/// Length in the length-with-encoding scheme.
pub fn length(n: u64) -> Vec<u8> {
    if n < 64 {
        vec![n as u8]
    } else if n < 16384 {
        vec![0x40 | (n >> 8) as u8, (n & 0xFF) as u8]
    } else if n <= u32::MAX as u64 {
        let mut out = vec![0x80];
        out.extend_from_slice(&(n as u32).to_be_bytes());
        out
    } else {
        let mut out = vec![0x81];
        out.extend_from_slice(&n.to_be_bytes());
        out
    }
}

/// A raw length-prefixed string.
pub fn string(s: &str) -> Vec<u8> {
    let mut out = length(s.len() as u64);
    out.extend_from_slice(s.as_bytes());
    out
}

/// An int16-encoded string.
pub fn int16_string(v: i16) -> Vec<u8> {
    let mut out = vec![0xC1];
    out.extend_from_slice(&v.to_le_bytes());
    out
}

/// An LZF-encoded string. The "compression" is a plain literal-run
/// encoding, which every LZF decoder accepts.
pub fn lzf_string(raw: &[u8]) -> Vec<u8> {
    let mut compressed = Vec::new();

    for chunk in raw.chunks(32) {
        compressed.push((chunk.len() - 1) as u8);
        compressed.extend_from_slice(chunk);
    }

    let mut out = vec![0xC3];
    out.extend(length(compressed.len() as u64));
    out.extend(length(raw.len() as u64));
    out.extend(compressed);
    out
}

/// One ziplist entry, in the encodings the entry dispatcher understands.
pub enum ZlEntry {
    Str(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I24(i32),
    Small(u8),
}

impl ZlEntry {
    pub fn str(s: &str) -> Self {
        Self::Str(s.to_string())
    }

    fn encode(&self, out: &mut Vec<u8>) {
        // prev-length back-pointer; the parser discards it.
        out.push(0);

        match self {
            Self::Str(s) => {
                assert!(s.len() < 64, "fixture strings use the 6-bit header");
                out.push(s.len() as u8);
                out.extend_from_slice(s.as_bytes());
            }
            Self::I8(v) => {
                out.push(254);
                out.push(*v as u8);
            }
            Self::I16(v) => {
                out.push(0xC0);
                out.extend_from_slice(&v.to_le_bytes());
            }
            Self::I32(v) => {
                out.push(0xD0);
                out.extend_from_slice(&v.to_le_bytes());
            }
            Self::I64(v) => {
                out.push(0xE0);
                out.extend_from_slice(&v.to_le_bytes());
            }
            Self::I24(v) => {
                out.push(0xF0);
                out.extend_from_slice(&v.to_le_bytes()[0..3]);
            }
            Self::Small(v) => {
                assert!(*v <= 12);
                out.push(241 + v);
            }
        }
    }
}

/// A ziplist payload (header, entries, terminator), not yet wrapped in a
/// string.
pub fn ziplist_payload(entries: &[ZlEntry]) -> Vec<u8> {
    ziplist_payload_with_end(entries, 0xFF)
}

pub fn ziplist_payload_with_end(entries: &[ZlEntry], end: u8) -> Vec<u8> {
    let mut body = Vec::new();

    for entry in entries {
        entry.encode(&mut body);
    }

    let mut out = Vec::new();
    out.extend_from_slice(&((11 + body.len()) as u32).to_le_bytes()); // zlbytes
    out.extend_from_slice(&10_u32.to_le_bytes()); // tail offset
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend(body);
    out.push(end);
    out
}

/// Wraps a sub-format payload in a raw string.
pub fn wrap(payload: &[u8]) -> Vec<u8> {
    let mut out = length(payload.len() as u64);
    out.extend_from_slice(payload);
    out
}

pub fn intset_payload(width: u32, values: &[i64]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&(values.len() as u32).to_le_bytes());

    for v in values {
        match width {
            2 => out.extend_from_slice(&(*v as i16).to_le_bytes()),
            4 => out.extend_from_slice(&(*v as i32).to_le_bytes()),
            _ => out.extend_from_slice(&v.to_le_bytes()),
        }
    }

    out
}

pub fn zipmap_payload(pairs: &[(&str, &str)]) -> Vec<u8> {
    let mut out = vec![pairs.len() as u8];

    for (field, value) in pairs {
        out.push(field.len() as u8);
        out.extend_from_slice(field.as_bytes());
        out.push(value.len() as u8);
        out.push(0); // free byte
        out.extend_from_slice(value.as_bytes());
    }

    out.push(0xFF);
    out
}

/// Packs a nine-character module type name plus version into the 64-bit
/// module id.
pub fn module_id(name: &str, version: u64) -> u64 {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
    assert_eq!(name.len(), 9);

    let mut id = 0_u64;
    for (i, b) in name.bytes().enumerate() {
        let pos = CHARSET.iter().position(|c| *c == b).unwrap() as u64;
        id |= pos << (64 - 6 * (i + 1));
    }

    id | version
}

pub fn module_unsigned(v: u64) -> Vec<u8> {
    let mut out = length(2);
    out.extend(length(v));
    out
}

pub fn module_double(v: f64) -> Vec<u8> {
    let mut out = length(4);
    out.extend_from_slice(&v.to_bits().to_le_bytes());
    out
}

pub fn module_string(s: &str) -> Vec<u8> {
    let mut out = length(5);
    out.extend(string(s));
    out
}

pub fn module_eof() -> Vec<u8> {
    length(0)
}

// ---------------------------------------------------------------------
// Dump builder: assembles complete dump byte streams.
// ---------------------------------------------------------------------

pub struct Dump {
    buf: Vec<u8>,
}

impl Dump {
    pub fn new() -> Self {
        Self::with_version("0009")
    }

    pub fn with_version(version: &str) -> Self {
        let mut buf = b"REDIS".to_vec();
        buf.extend_from_slice(version.as_bytes());
        Self { buf }
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn aux(self, key: &str, value: &str) -> Self {
        let mut out = vec![OP_CODE_AUX];
        out.extend(string(key));
        out.extend(string(value));
        self.raw(&out)
    }

    pub fn select_db(self, db: u64) -> Self {
        let mut out = vec![OP_CODE_SELECT_DB];
        out.extend(length(db));
        self.raw(&out)
    }

    pub fn resize_db(self, size: u64, expire: u64) -> Self {
        let mut out = vec![OP_CODE_RESIZE_DB];
        out.extend(length(size));
        out.extend(length(expire));
        self.raw(&out)
    }

    pub fn idle(self, value: u64) -> Self {
        let mut out = vec![OP_CODE_IDLE];
        out.extend(length(value));
        self.raw(&out)
    }

    pub fn freq(self, value: u8) -> Self {
        self.raw(&[OP_CODE_FREQ, value])
    }

    pub fn expiry_ms(self, ms: u64) -> Self {
        let mut out = vec![OP_CODE_EXPIRE_TIME_MS];
        out.extend_from_slice(&ms.to_le_bytes());
        self.raw(&out)
    }

    pub fn expiry_s(self, s: u32) -> Self {
        let mut out = vec![OP_CODE_EXPIRE_TIME];
        out.extend_from_slice(&s.to_le_bytes());
        self.raw(&out)
    }

    /// A complete record: type tag, key, pre-encoded value payload.
    pub fn record(self, data_type: u8, key: &str, payload: &[u8]) -> Self {
        let mut out = vec![data_type];
        out.extend(string(key));
        out.extend_from_slice(payload);
        self.raw(&out)
    }

    pub fn string(self, key: &str, value: &str) -> Self {
        self.record(TYPE_STRING, key, &string(value))
    }

    pub fn list(self, key: &str, values: &[&str]) -> Self {
        let mut payload = length(values.len() as u64);
        for v in values {
            payload.extend(string(v));
        }
        self.record(TYPE_LIST, key, &payload)
    }

    pub fn set(self, key: &str, values: &[&str]) -> Self {
        let mut payload = length(values.len() as u64);
        for v in values {
            payload.extend(string(v));
        }
        self.record(TYPE_SET, key, &payload)
    }

    /// A sorted set with ASCII scores (`typeZSet`).
    pub fn sorted_set(self, key: &str, members: &[(&str, &str)]) -> Self {
        let mut payload = length(members.len() as u64);
        for (member, score) in members {
            payload.extend(string(member));
            payload.push(score.len() as u8);
            payload.extend_from_slice(score.as_bytes());
        }
        self.record(TYPE_ZSET, key, &payload)
    }

    /// A sorted set with binary double scores (`typeZSet2`).
    pub fn sorted_set2(self, key: &str, members: &[(&str, f64)]) -> Self {
        let mut payload = length(members.len() as u64);
        for (member, score) in members {
            payload.extend(string(member));
            payload.extend_from_slice(&score.to_le_bytes());
        }
        self.record(TYPE_ZSET_2, key, &payload)
    }

    pub fn hash(self, key: &str, pairs: &[(&str, &str)]) -> Self {
        let mut payload = length(pairs.len() as u64);
        for (field, value) in pairs {
            payload.extend(string(field));
            payload.extend(string(value));
        }
        self.record(TYPE_HASH, key, &payload)
    }

    pub fn zipmap_hash(self, key: &str, pairs: &[(&str, &str)]) -> Self {
        self.record(TYPE_HASH_ZIP_MAP, key, &wrap(&zipmap_payload(pairs)))
    }

    pub fn ziplist_list(self, key: &str, entries: &[ZlEntry]) -> Self {
        self.record(TYPE_LIST_ZIP_LIST, key, &wrap(&ziplist_payload(entries)))
    }

    pub fn ziplist_zset(self, key: &str, entries: &[ZlEntry]) -> Self {
        self.record(TYPE_ZSET_ZIP_LIST, key, &wrap(&ziplist_payload(entries)))
    }

    pub fn ziplist_hash(self, key: &str, entries: &[ZlEntry]) -> Self {
        self.record(TYPE_HASH_ZIP_LIST, key, &wrap(&ziplist_payload(entries)))
    }

    pub fn intset(self, key: &str, width: u32, values: &[i64]) -> Self {
        self.record(TYPE_SET_INT_SET, key, &wrap(&intset_payload(width, values)))
    }

    pub fn quicklist(self, key: &str, nodes: &[Vec<ZlEntry>]) -> Self {
        let mut payload = length(nodes.len() as u64);
        for node in nodes {
            payload.extend(wrap(&ziplist_payload(node)));
        }
        self.record(TYPE_LIST_QUICK_LIST, key, &payload)
    }

    /// A module record with an arbitrary pre-encoded payload.
    pub fn module(self, key: &str, id: u64, payload: &[u8]) -> Self {
        let mut out = length(id);
        out.extend_from_slice(payload);
        self.record(TYPE_MODULE_2, key, &out)
    }

    pub fn bloom_filter(self, key: &str) -> Self {
        let mut payload = Vec::new();
        payload.extend(module_unsigned(100)); // size
        payload.extend(module_unsigned(1)); // filter count
        payload.extend(module_unsigned(0)); // options
        payload.extend(module_unsigned(2)); // growth
        payload.extend(module_unsigned(7)); // entries
        payload.extend(module_double(0.01)); // error rate
        payload.extend(module_unsigned(10)); // hash functions
        payload.extend(module_double(14.0)); // bits per entry
        payload.extend(module_unsigned(1432)); // bits
        payload.extend(module_unsigned(0)); // n2
        payload.extend(module_string("binary filter data"));
        payload.extend(module_unsigned(100)); // size
        payload.extend(module_eof());
        self.module(key, module_id("MBbloom--", 2), &payload)
    }

    pub fn cuckoo_filter(self, key: &str) -> Self {
        let mut payload = Vec::new();
        payload.extend(module_unsigned(1)); // filter count
        payload.extend(module_unsigned(64)); // buckets
        payload.extend(module_unsigned(3)); // items
        payload.extend(module_unsigned(0)); // deletes
        payload.extend(module_unsigned(2)); // bucket size
        payload.extend(module_unsigned(20)); // max iterations
        payload.extend(module_unsigned(1)); // expansion
        payload.extend(module_unsigned(64)); // filter buckets
        payload.extend(module_string("bucket data"));
        payload.extend(module_eof());
        self.module(key, module_id("MBbloomCF", 1), &payload)
    }

    pub fn eof(mut self) -> Vec<u8> {
        self.buf.push(OP_CODE_EOF);
        // Versions >= 5 carry a trailing checksum; the parser never reads
        // it, but real dumps have one.
        self.buf.extend_from_slice(&[0; 8]);
        self.buf
    }
}
