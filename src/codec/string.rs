use crate::codec::{read_i16, read_i32, read_i8, read_length, read_length_with_encoding};
use crate::reader::ByteReader;
use crate::{RdbError, RdbResult};

const ENC_INT8: u64 = 0;
const ENC_INT16: u64 = 1;
const ENC_INT32: u64 = 2;
const ENC_LZF: u64 = 3;

/// Reads one string payload in any of the format's encodings.
///
/// Raw strings are returned as read; the integer encodings are formatted as
/// base-10 text; LZF payloads are decompressed to exactly their declared
/// size.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn read_string_encoding(rdr: &mut dyn ByteReader) -> RdbResult<Vec<u8>> {
    let (length, encoded) = read_length_with_encoding(rdr)?;

    if !encoded {
        return Ok(rdr.read_bytes(length as usize)?.to_vec());
    }

    match length {
        ENC_INT8 => Ok(read_i8(rdr)?.to_string().into_bytes()),
        ENC_INT16 => Ok(read_i16(rdr)?.to_string().into_bytes()),
        ENC_INT32 => Ok(read_i32(rdr)?.to_string().into_bytes()),
        ENC_LZF => read_lzf(rdr),
        encoding => Err(RdbError::StringEncoding { encoding }),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn read_lzf(rdr: &mut dyn ByteReader) -> RdbResult<Vec<u8>> {
    let compressed_len = read_length(rdr)?;
    let decompressed_len = read_length(rdr)?;
    trace!("LZF payload: {compressed_len} compressed, {decompressed_len} decompressed");

    let compressed = rdr.read_bytes(compressed_len as usize)?;

    lzf::decompress(compressed, decompressed_len as usize).map_err(RdbError::LzfDecompress)
}

pub(crate) fn read_string(rdr: &mut dyn ByteReader) -> RdbResult<String> {
    Ok(String::from_utf8(read_string_encoding(rdr)?)?)
}

pub(crate) fn read_string_by_length(rdr: &mut dyn ByteReader, n: usize) -> RdbResult<String> {
    Ok(String::from_utf8(rdr.read_bytes(n)?.to_vec())?)
}

/// Advances past one string payload without materialising it.
///
/// LZF payloads are skipped by their compressed size; nothing is
/// decompressed.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn skip_string(rdr: &mut dyn ByteReader) -> RdbResult<()> {
    let (length, encoded) = read_length_with_encoding(rdr)?;

    if !encoded {
        return rdr.skip_bytes(length as usize);
    }

    match length {
        ENC_INT8 => rdr.skip_bytes(1),
        ENC_INT16 => rdr.skip_bytes(2),
        ENC_INT32 => rdr.skip_bytes(4),
        ENC_LZF => {
            let compressed_len = read_length(rdr)?;
            let _ = read_length(rdr)?;
            rdr.skip_bytes(compressed_len as usize)
        }
        encoding => Err(RdbError::StringEncoding { encoding }),
    }
}
