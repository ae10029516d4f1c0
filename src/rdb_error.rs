use thiserror::Error;

/// A list specifying categories of parse failures.
///
/// Every error is fatal to the parser as a whole: the byte cursor may be in
/// the middle of a record, so the result of further `next_event()` calls is
/// undefined.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RdbError {
    /// The dump did not start with the magic string "REDIS".
    #[error("invalid magic string")]
    InvalidMagicString,

    /// The dump version is outside the supported range.
    #[error("unsupported version {version}")]
    UnsupportedVersion { version: u32 },

    /// The top bits of a length byte carried an unrecognised pattern.
    #[error("invalid length encoding {encoding}")]
    LengthEncoding { encoding: u8 },

    /// A special string encoding tag was none of int8/int16/int32/LZF.
    #[error("invalid string encoding {encoding}")]
    StringEncoding { encoding: u64 },

    /// An intset declared a value width other than 2, 4 or 8 bytes.
    #[error("invalid intset encoding {encoding}")]
    IntSetEncoding { encoding: u32 },

    /// A ziplist entry started with an unrecognised header byte.
    #[error("invalid ziplist entry header {header}")]
    ZipListHeader { header: u8 },

    /// A ziplist carrying pairs declared an entry count that does not
    /// divide evenly.
    #[error("invalid ziplist length {length}, expected to be divisible by {value_length}")]
    ZipListLength { length: u64, value_length: u64 },

    /// The ziplist terminator byte was not `0xFF`.
    #[error("invalid ziplist end {value}")]
    ZipListEnd { value: u8 },

    /// A zipmap ended in the middle of an entry.
    #[error("unexpected end of zipmap after key {key:?}")]
    UnexpectedZipMapEnd { key: String },

    /// The value carried a type tag this parser does not handle.
    #[error("unsupported data type {data_type}")]
    UnsupportedDataType { data_type: u8 },

    /// A module payload carried an unexpected opcode.
    #[error("illegal module opcode {actual}, expected {expected}")]
    ModuleOpcode { expected: u64, actual: u64 },

    /// The input ended before a requested number of bytes could be read.
    #[error("input ended before {wanted} bytes could be read")]
    ShortRead { wanted: usize },

    /// LZF decompression failed.
    #[error("failed to decompress LZF: {0:?}")]
    LzfDecompress(lzf::LzfError),

    /// An ASCII float could not be parsed.
    #[error("failed to parse float")]
    FloatParse {
        #[from]
        source: std::num::ParseFloatError,
    },

    /// The four version digits could not be parsed.
    #[error("failed to parse version")]
    VersionParse { source: std::num::ParseIntError },

    /// A decoded string was not valid UTF-8.
    #[error("string is not valid UTF-8")]
    Utf8 {
        #[from]
        source: std::string::FromUtf8Error,
    },

    /// An expiry timestamp was outside the representable range.
    #[error("expiry timestamp out of range")]
    Timestamp {
        #[from]
        source: time::error::ComponentRange,
    },

    /// Error occured while reading from the input stream.
    #[error(transparent)]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Implementation error.
    #[error("implementation error: {}", _0)]
    Impl(&'static str),
}

/// Abbreviation of `Result<T, RdbError>`.
pub type RdbResult<T> = std::result::Result<T, RdbError>;
