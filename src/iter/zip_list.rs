use crate::codec::{
    read_i16, read_i24, read_i32, read_i64, read_i8, read_string_by_length, read_string_encoding,
    read_u16, read_u32, read_u32_be, read_u8,
};
use crate::iter::{MemberValue, RawStep, Shape, Step, ValueReader};
use crate::reader::{ByteReader, SliceReader};
use crate::{DataKey, RdbError, RdbResult};

const ZIP_LIST_END: u8 = 0xFF;
const PREV_LENGTH_EXTENDED: u8 = 0xFE;

/// Iterator over a ziplist: a packed entry sequence that arrives wrapped
/// in a single string payload.
///
/// `value_length` is the number of ziplist slots one logical member
/// occupies (2 for sorted sets and hashes, which store pairs).
pub(crate) struct ZipListIter {
    key: DataKey,
    shape: Shape,
    value_reader: ValueReader,
    value_length: u64,
    buf: Option<SliceReader>,
    index: u64,
    length: u64,
    done: bool,
    data_emitted: bool,
    values: Vec<MemberValue>,
}

impl ZipListIter {
    pub(crate) fn new(
        key: DataKey,
        shape: Shape,
        value_reader: ValueReader,
        value_length: u64,
    ) -> Self {
        Self {
            key,
            shape,
            value_reader,
            value_length,
            buf: None,
            index: 0,
            length: 0,
            done: false,
            data_emitted: false,
            values: Vec::new(),
        }
    }

    pub(crate) fn next_step(&mut self, rdr: &mut dyn ByteReader) -> RdbResult<Step> {
        match self.next_raw(rdr)? {
            RawStep::Head(length) => Ok(Step::Event(self.shape.head_event(&self.key, length))),
            RawStep::Entry { index, value } => {
                let event =
                    self.shape
                        .entry_event(&self.key, index, self.length, value.clone())?;
                self.values.push(value);
                Ok(Step::Event(event))
            }
            RawStep::End => {
                if self.data_emitted {
                    return Ok(Step::End);
                }

                self.data_emitted = true;
                let values = std::mem::take(&mut self.values);
                Ok(Step::Event(self.shape.data_event(&self.key, values)?))
            }
        }
    }

    /// Advances the ziplist without mapping entries to events; the
    /// quicklist iterator drives its per-node ziplists through this.
    pub(crate) fn next_raw(&mut self, rdr: &mut dyn ByteReader) -> RdbResult<RawStep> {
        if self.done {
            return Ok(RawStep::End);
        }

        match self.buf.as_mut() {
            None => {
                let payload = read_string_encoding(rdr)?;
                let mut sr = SliceReader::new(payload);

                let zl_bytes = read_u32(&mut sr)?;
                let tail_offset = read_u32(&mut sr)?;
                let count = u64::from(read_u16(&mut sr)?);
                trace!("ziplist: zlbytes={zl_bytes} tail={tail_offset} count={count}");

                if count % self.value_length != 0 {
                    return Err(RdbError::ZipListLength {
                        length: count,
                        value_length: self.value_length,
                    });
                }

                self.length = count / self.value_length;
                self.buf = Some(sr);

                Ok(RawStep::Head(self.length))
            }
            Some(sr) => {
                if self.index == self.length {
                    let end = read_u8(sr)?;

                    if end != ZIP_LIST_END {
                        return Err(RdbError::ZipListEnd { value: end });
                    }

                    self.done = true;
                    self.buf = None;
                    return Ok(RawStep::End);
                }

                let value = self.value_reader.read_value(sr)?;
                let index = self.index;
                self.index += 1;

                Ok(RawStep::Entry { index, value })
            }
        }
    }
}

/// Reads one ziplist entry: the prev-length back-pointer (discarded),
/// then a header byte selecting a raw string or one of the packed
/// integer representations.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn read_zip_list_entry(rdr: &mut dyn ByteReader) -> RdbResult<MemberValue> {
    let prev_length = read_u8(rdr)?;

    if prev_length == PREV_LENGTH_EXTENDED {
        let _ = read_u32(rdr)?;
    }

    let header = read_u8(rdr)?;

    match header >> 6 {
        0 => {
            let s = read_string_by_length(rdr, usize::from(header & 0x3F))?;
            return Ok(MemberValue::Str(s));
        }
        1 => {
            let next = read_u8(rdr)?;
            let length = usize::from(header & 0x3F) << 8 | usize::from(next);
            return Ok(MemberValue::Str(read_string_by_length(rdr, length)?));
        }
        2 => {
            let length = read_u32_be(rdr)?;
            return Ok(MemberValue::Str(read_string_by_length(
                rdr,
                length as usize,
            )?));
        }
        _ => {}
    }

    match header >> 4 {
        12 => return Ok(MemberValue::Int(i64::from(read_i16(rdr)?))),
        13 => return Ok(MemberValue::Int(i64::from(read_i32(rdr)?))),
        14 => return Ok(MemberValue::Int(read_i64(rdr)?)),
        _ => {}
    }

    match header {
        240 => Ok(MemberValue::Int(i64::from(read_i24(rdr)?))),
        254 => Ok(MemberValue::Int(i64::from(read_i8(rdr)?))),
        241..=253 => Ok(MemberValue::Int(i64::from(header - 241))),
        header => Err(RdbError::ZipListHeader { header }),
    }
}
