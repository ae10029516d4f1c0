use crate::codec::{read_i16, read_i32, read_i64, read_string_encoding, read_u32};
use crate::iter::{MemberValue, Shape, Step};
use crate::reader::{ByteReader, SliceReader};
use crate::{DataKey, RdbError, RdbResult};

/// Iterator over an intset: a fixed-width integer array used for sets
/// whose members are all integers.
pub(crate) struct IntSetIter {
    key: DataKey,
    buf: Option<SliceReader>,
    encoding: u32,
    index: u64,
    length: u64,
    done: bool,
    values: Vec<MemberValue>,
}

impl IntSetIter {
    pub(crate) fn new(key: DataKey) -> Self {
        Self {
            key,
            buf: None,
            encoding: 0,
            index: 0,
            length: 0,
            done: false,
            values: Vec::new(),
        }
    }

    pub(crate) fn next_step(&mut self, rdr: &mut dyn ByteReader) -> RdbResult<Step> {
        if self.done {
            return Ok(Step::End);
        }

        match self.buf.as_mut() {
            None => {
                let payload = read_string_encoding(rdr)?;
                let mut sr = SliceReader::new(payload);

                self.encoding = read_u32(&mut sr)?;
                if !matches!(self.encoding, 2 | 4 | 8) {
                    return Err(RdbError::IntSetEncoding {
                        encoding: self.encoding,
                    });
                }

                self.length = u64::from(read_u32(&mut sr)?);
                self.buf = Some(sr);
                trace!(
                    "intset of length {} with {}-byte values",
                    self.length,
                    self.encoding
                );

                Ok(Step::Event(Shape::Set.head_event(&self.key, self.length)))
            }
            Some(sr) => {
                if self.index == self.length {
                    self.done = true;
                    self.buf = None;
                    let values = std::mem::take(&mut self.values);
                    return Ok(Step::Event(Shape::Set.data_event(&self.key, values)?));
                }

                let value = match self.encoding {
                    2 => i64::from(read_i16(sr)?),
                    4 => i64::from(read_i32(sr)?),
                    _ => read_i64(sr)?,
                };
                let member = MemberValue::Int(value);

                let event = Shape::Set.entry_event(
                    &self.key,
                    self.index,
                    self.length,
                    member.clone(),
                )?;

                self.values.push(member);
                self.index += 1;

                Ok(Step::Event(event))
            }
        }
    }
}
