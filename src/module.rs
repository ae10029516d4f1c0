//! Module-extension payloads.
//!
//! Module values carry a packed 64-bit type id followed by an
//! opcode-tagged stream of primitives. Only the bloom and cuckoo filter
//! types are recognised; their payloads are consumed so the cursor ends
//! up past the value, but the contents are discarded.

use crate::codec::{read_length, read_string_encoding, read_u64};
use crate::reader::ByteReader;
use crate::{RdbError, RdbResult};

pub(crate) const BLOOM_FILTER_MODULE: &str = "MBbloom--";
pub(crate) const CUCKOO_FILTER_MODULE: &str = "MBbloomCF";

const MODULE_OPCODE_EOF: u64 = 0;
const MODULE_OPCODE_UINT: u64 = 2;
const MODULE_OPCODE_DOUBLE: u64 = 4;
const MODULE_OPCODE_STRING: u64 = 5;

// The 6-bit character set module type names are packed with.
const MODULE_NAME_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Decodes the nine-character module type name from a packed id.
///
/// The high 54 bits hold nine 6-bit characters; the low 10 bits are the
/// module's encoding version and do not take part in the name.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn module_type_name(id: u64) -> String {
    let mut name = String::with_capacity(9);

    for i in 0..9 {
        let index = (id >> (64 - 6 * (i + 1))) & 0x3F;
        name.push(char::from(MODULE_NAME_CHARSET[index as usize]));
    }

    name
}

/// Consumes a bloom filter payload.
pub(crate) fn read_bloom_filter(rdr: &mut dyn ByteReader) -> RdbResult<()> {
    let size = read_unsigned(rdr)?;
    let num_filters = read_unsigned(rdr)?;
    let options = read_unsigned(rdr)?;
    let growth = read_unsigned(rdr)?;
    debug!("bloom filter: size={size} filters={num_filters} options={options} growth={growth}");

    for _ in 0..num_filters {
        let _entries = read_unsigned(rdr)?;
        let _error = read_double(rdr)?;
        let _hashes = read_unsigned(rdr)?;
        let _bpe = read_double(rdr)?;
        let _bits = read_unsigned(rdr)?;
        let _n2 = read_unsigned(rdr)?;
        let _buffer = read_string_buffer(rdr)?;
        let _size = read_unsigned(rdr)?;
    }

    check_opcode(rdr, MODULE_OPCODE_EOF)
}

/// Consumes a cuckoo filter payload.
pub(crate) fn read_cuckoo_filter(rdr: &mut dyn ByteReader) -> RdbResult<()> {
    let num_filters = read_unsigned(rdr)?;
    let _num_buckets = read_unsigned(rdr)?;
    let _num_items = read_unsigned(rdr)?;
    let _num_deletes = read_unsigned(rdr)?;
    let _bucket_size = read_unsigned(rdr)?;
    let _max_iterations = read_unsigned(rdr)?;
    let _expansion = read_unsigned(rdr)?;
    debug!("cuckoo filter: filters={num_filters}");

    for _ in 0..num_filters {
        let _num_buckets = read_unsigned(rdr)?;
        let _buffer = read_string_buffer(rdr)?;
    }

    check_opcode(rdr, MODULE_OPCODE_EOF)
}

fn check_opcode(rdr: &mut dyn ByteReader, expected: u64) -> RdbResult<()> {
    let actual = read_length(rdr)?;

    if actual != expected {
        return Err(RdbError::ModuleOpcode { expected, actual });
    }

    Ok(())
}

fn read_unsigned(rdr: &mut dyn ByteReader) -> RdbResult<u64> {
    check_opcode(rdr, MODULE_OPCODE_UINT)?;
    read_length(rdr)
}

fn read_double(rdr: &mut dyn ByteReader) -> RdbResult<f64> {
    check_opcode(rdr, MODULE_OPCODE_DOUBLE)?;
    Ok(f64::from_bits(read_u64(rdr)?))
}

fn read_string_buffer(rdr: &mut dyn ByteReader) -> RdbResult<Vec<u8>> {
    check_opcode(rdr, MODULE_OPCODE_STRING)?;
    read_string_encoding(rdr)
}

#[cfg(test)]
mod tests {
    use super::module_type_name;

    // Packs a nine-character name the way modules register themselves.
    #[allow(clippy::cast_possible_truncation)]
    fn module_id(name: &str, version: u64) -> u64 {
        let charset = super::MODULE_NAME_CHARSET;
        let mut id = 0_u64;

        for (i, b) in name.bytes().enumerate() {
            let pos = charset.iter().position(|c| *c == b).unwrap() as u64;
            id |= pos << (64 - 6 * (i + 1));
        }

        id | version
    }

    #[test]
    fn decodes_packed_names() {
        assert_eq!(module_type_name(module_id("MBbloom--", 2)), "MBbloom--");
        assert_eq!(module_type_name(module_id("MBbloomCF", 1)), "MBbloomCF");
    }

    #[test]
    fn version_bits_do_not_leak_into_the_name() {
        assert_eq!(
            module_type_name(module_id("MBbloom--", 0)),
            module_type_name(module_id("MBbloom--", 1023))
        );
    }
}
