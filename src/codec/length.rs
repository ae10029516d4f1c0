use crate::codec::{read_u32_be, read_u64_be, read_u8};
use crate::reader::ByteReader;
use crate::{RdbError, RdbResult};

const LEN_6_BIT: u8 = 0;
const LEN_14_BIT: u8 = 1;
const LEN_ENCODED: u8 = 3;
const LEN_32_BIT: u8 = 0x80;
const LEN_64_BIT: u8 = 0x81;

/// Reads the format's length-with-encoding scheme.
///
/// The top two bits of the first byte select the representation; the `11`
/// pattern flags the six low bits as an encoding tag rather than a length,
/// which is reported through the second tuple element.
pub(crate) fn read_length_with_encoding(rdr: &mut dyn ByteReader) -> RdbResult<(u64, bool)> {
    let first = read_u8(rdr)?;
    let data = u64::from(first & 0x3F);

    match (first & 0xC0) >> 6 {
        LEN_6_BIT => Ok((data, false)),
        LEN_14_BIT => {
            let next = read_u8(rdr)?;
            Ok(((data << 8) | u64::from(next), false))
        }
        LEN_ENCODED => Ok((data, true)),
        _ => match first {
            LEN_32_BIT => Ok((u64::from(read_u32_be(rdr)?), false)),
            LEN_64_BIT => Ok((read_u64_be(rdr)?, false)),
            _ => Err(RdbError::LengthEncoding { encoding: first }),
        },
    }
}

pub(crate) fn read_length(rdr: &mut dyn ByteReader) -> RdbResult<u64> {
    let (length, _) = read_length_with_encoding(rdr)?;
    Ok(length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::SliceReader;

    #[test]
    fn six_bit_immediate() {
        let mut rdr = SliceReader::new(vec![0x00, 0x3F]);
        assert_eq!(read_length_with_encoding(&mut rdr).unwrap(), (0, false));
        assert_eq!(read_length_with_encoding(&mut rdr).unwrap(), (63, false));
    }

    #[test]
    fn fourteen_bit() {
        let mut rdr = SliceReader::new(vec![0x41, 0x02]);
        assert_eq!(read_length_with_encoding(&mut rdr).unwrap(), (258, false));
    }

    #[test]
    fn thirty_two_bit() {
        let mut rdr = SliceReader::new(vec![0x80, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(read_length_with_encoding(&mut rdr).unwrap(), (65536, false));
    }

    #[test]
    fn sixty_four_bit() {
        let mut rdr = SliceReader::new(vec![0x81, 0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(
            read_length_with_encoding(&mut rdr).unwrap(),
            (1 << 32, false)
        );
    }

    #[test]
    fn encoded_flag() {
        let mut rdr = SliceReader::new(vec![0xC3]);
        assert_eq!(read_length_with_encoding(&mut rdr).unwrap(), (3, true));
    }

    #[test]
    fn unrecognised_pattern() {
        let mut rdr = SliceReader::new(vec![0x82]);
        assert!(matches!(
            read_length_with_encoding(&mut rdr),
            Err(RdbError::LengthEncoding { encoding: 0x82 })
        ));
    }
}
