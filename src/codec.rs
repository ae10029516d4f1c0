//! Decoding primitives shared by the parser and the packed sub-formats.

mod length;
mod primitives;
mod string;

pub(crate) use self::length::{read_length, read_length_with_encoding};
pub(crate) use self::primitives::{
    read_binary_double, read_float, read_i16, read_i24, read_i32, read_i64, read_i8,
    read_milliseconds_time, read_seconds_time, read_u16, read_u32, read_u32_be, read_u64,
    read_u64_be, read_u8, skip_binary_double, skip_float,
};
pub(crate) use self::string::{
    read_string, read_string_by_length, read_string_encoding, skip_string,
};
