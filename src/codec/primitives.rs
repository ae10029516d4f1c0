use crate::reader::ByteReader;
use crate::RdbResult;
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use time::OffsetDateTime;

pub(crate) fn read_u8(rdr: &mut dyn ByteReader) -> RdbResult<u8> {
    Ok(rdr.read_bytes(1)?[0])
}

pub(crate) fn read_u16(rdr: &mut dyn ByteReader) -> RdbResult<u16> {
    let mut buf = rdr.read_bytes(2)?;
    Ok(buf.read_u16::<LittleEndian>()?)
}

pub(crate) fn read_u32(rdr: &mut dyn ByteReader) -> RdbResult<u32> {
    let mut buf = rdr.read_bytes(4)?;
    Ok(buf.read_u32::<LittleEndian>()?)
}

pub(crate) fn read_u64(rdr: &mut dyn ByteReader) -> RdbResult<u64> {
    let mut buf = rdr.read_bytes(8)?;
    Ok(buf.read_u64::<LittleEndian>()?)
}

pub(crate) fn read_u32_be(rdr: &mut dyn ByteReader) -> RdbResult<u32> {
    let mut buf = rdr.read_bytes(4)?;
    Ok(buf.read_u32::<BigEndian>()?)
}

pub(crate) fn read_u64_be(rdr: &mut dyn ByteReader) -> RdbResult<u64> {
    let mut buf = rdr.read_bytes(8)?;
    Ok(buf.read_u64::<BigEndian>()?)
}

#[allow(clippy::cast_possible_wrap)]
pub(crate) fn read_i8(rdr: &mut dyn ByteReader) -> RdbResult<i8> {
    Ok(read_u8(rdr)? as i8)
}

#[allow(clippy::cast_possible_wrap)]
pub(crate) fn read_i16(rdr: &mut dyn ByteReader) -> RdbResult<i16> {
    Ok(read_u16(rdr)? as i16)
}

#[allow(clippy::cast_possible_wrap)]
pub(crate) fn read_i32(rdr: &mut dyn ByteReader) -> RdbResult<i32> {
    Ok(read_u32(rdr)? as i32)
}

#[allow(clippy::cast_possible_wrap)]
pub(crate) fn read_i64(rdr: &mut dyn ByteReader) -> RdbResult<i64> {
    Ok(read_u64(rdr)? as i64)
}

/// Three bytes little-endian, sign-extended from bit 23.
pub(crate) fn read_i24(rdr: &mut dyn ByteReader) -> RdbResult<i32> {
    let buf = rdr.read_bytes(3)?;
    let raw = i32::from(buf[2]) << 24 | i32::from(buf[1]) << 16 | i32::from(buf[0]) << 8;
    Ok(raw >> 8)
}

/// 8 bytes little-endian IEEE-754.
pub(crate) fn read_f64(rdr: &mut dyn ByteReader) -> RdbResult<f64> {
    Ok(f64::from_bits(read_u64(rdr)?))
}

pub(crate) fn read_binary_double(rdr: &mut dyn ByteReader) -> RdbResult<f64> {
    read_f64(rdr)
}

pub(crate) fn skip_binary_double(rdr: &mut dyn ByteReader) -> RdbResult<()> {
    rdr.skip_bytes(8)
}

/// Variable-length float: a length byte, where 253/254/255 denote the three
/// non-finite values, followed by that many ASCII characters otherwise.
pub(crate) fn read_float(rdr: &mut dyn ByteReader) -> RdbResult<f64> {
    let length = read_u8(rdr)?;

    match length {
        253 => Ok(f64::NAN),
        254 => Ok(f64::INFINITY),
        255 => Ok(f64::NEG_INFINITY),
        length => {
            let s = crate::codec::read_string_by_length(rdr, usize::from(length))?;
            Ok(s.parse()?)
        }
    }
}

pub(crate) fn skip_float(rdr: &mut dyn ByteReader) -> RdbResult<()> {
    let length = read_u8(rdr)?;

    if length < 253 {
        rdr.skip_bytes(usize::from(length))?;
    }

    Ok(())
}

/// 8 bytes little-endian unsigned, UNIX milliseconds, normalised to UTC.
pub(crate) fn read_milliseconds_time(rdr: &mut dyn ByteReader) -> RdbResult<OffsetDateTime> {
    let value = read_u64(rdr)?;
    Ok(OffsetDateTime::from_unix_timestamp_nanos(
        i128::from(value) * 1_000_000,
    )?)
}

/// 4 bytes little-endian unsigned, UNIX seconds, normalised to UTC.
pub(crate) fn read_seconds_time(rdr: &mut dyn ByteReader) -> RdbResult<OffsetDateTime> {
    let value = read_u32(rdr)?;
    Ok(OffsetDateTime::from_unix_timestamp(i64::from(value))?)
}
