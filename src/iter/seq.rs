use crate::codec::read_length;
use crate::iter::{Shape, Step, ValueReader};
use crate::reader::ByteReader;
use crate::{DataKey, RdbResult};

/// Iterator over the straightforward length-prefixed collection body used
/// by non-packed lists, sets, sorted sets and hashes.
pub(crate) struct SeqIter {
    key: DataKey,
    shape: Shape,
    value_reader: ValueReader,
    index: u64,
    length: u64,
    initialized: bool,
    done: bool,
    values: Vec<crate::iter::MemberValue>,
}

impl SeqIter {
    pub(crate) fn new(key: DataKey, shape: Shape, value_reader: ValueReader) -> Self {
        Self {
            key,
            shape,
            value_reader,
            index: 0,
            length: 0,
            initialized: false,
            done: false,
            values: Vec::new(),
        }
    }

    pub(crate) fn next_step(&mut self, rdr: &mut dyn ByteReader) -> RdbResult<Step> {
        if self.done {
            return Ok(Step::End);
        }

        if !self.initialized {
            self.length = read_length(rdr)?;
            self.initialized = true;
            trace!("seq {:?} of length {}", self.shape, self.length);
            return Ok(Step::Event(self.shape.head_event(&self.key, self.length)));
        }

        if self.index == self.length {
            self.done = true;
            let values = std::mem::take(&mut self.values);
            return Ok(Step::Event(self.shape.data_event(&self.key, values)?));
        }

        let value = self.value_reader.read_value(rdr)?;
        let event = self
            .shape
            .entry_event(&self.key, self.index, self.length, value.clone())?;

        self.values.push(value);
        self.index += 1;

        Ok(Step::Event(event))
    }
}
