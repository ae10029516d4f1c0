use crate::codec::{read_string_by_length, read_string_encoding, read_u32, read_u8};
use crate::iter::{MemberValue, Shape, Step};
use crate::reader::{ByteReader, SliceReader};
use crate::{DataKey, RdbError, RdbResult};

const ZIP_MAP_END: u8 = 0xFF;
const LENGTH_EXTENDED: u8 = 0xFE;

// A slot length is either the end marker, a four-byte extension, or the
// byte itself.
enum SlotLength {
    Length(usize),
    End,
}

/// Iterator over a zipmap, the pre-ziplist packed hash encoding.
///
/// The declared length is a single saturating byte, so iteration is driven
/// by the terminator rather than by the head count.
pub(crate) struct ZipMapIter {
    key: DataKey,
    buf: Option<SliceReader>,
    index: u64,
    length: u64,
    done: bool,
    values: Vec<MemberValue>,
}

impl ZipMapIter {
    pub(crate) fn new(key: DataKey) -> Self {
        Self {
            key,
            buf: None,
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

                self.length = u64::from(read_u8(&mut sr)?);
                self.buf = Some(sr);
                trace!("zipmap of declared length {}", self.length);

                Ok(Step::Event(
                    Shape::Hash.head_event(&self.key, self.length),
                ))
            }
            Some(sr) => {
                let field_length = match read_slot_length(sr)? {
                    SlotLength::End => {
                        self.done = true;
                        self.buf = None;
                        let values = std::mem::take(&mut self.values);
                        return Ok(Step::Event(Shape::Hash.data_event(&self.key, values)?));
                    }
                    SlotLength::Length(n) => n,
                };

                let field = read_string_by_length(sr, field_length)?;

                let value_length = match read_slot_length(sr)? {
                    SlotLength::End => {
                        return Err(RdbError::UnexpectedZipMapEnd { key: field });
                    }
                    SlotLength::Length(n) => n,
                };

                // One free byte of padding sits between the value length
                // and the value.
                let _ = read_u8(sr)?;

                let value = read_string_by_length(sr, value_length)?;
                let member = MemberValue::Pair { field, value };

                let event = Shape::Hash.entry_event(
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

#[allow(clippy::cast_possible_truncation)]
fn read_slot_length(rdr: &mut dyn ByteReader) -> RdbResult<SlotLength> {
    let first = read_u8(rdr)?;

    if first < LENGTH_EXTENDED {
        return Ok(SlotLength::Length(usize::from(first)));
    }

    if first == LENGTH_EXTENDED {
        return Ok(SlotLength::Length(read_u32(rdr)? as usize));
    }

    debug_assert_eq!(first, ZIP_MAP_END);
    Ok(SlotLength::End)
}
