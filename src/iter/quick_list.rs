use crate::codec::read_length;
use crate::iter::{MemberValue, RawStep, Shape, Step, ValueReader, ZipListIter};
use crate::reader::ByteReader;
use crate::{DataKey, RdbResult};

/// Iterator over a quicklist: a length-prefixed sequence of nodes, each
/// an independently wrapped ziplist.
///
/// The declared top-level length is the node count, not the element
/// count, and is reported as such in the head event; entry indices still
/// run contiguously across node boundaries.
pub(crate) struct QuickListIter {
    key: DataKey,
    node_count: u64,
    node_index: u64,
    entry_index: u64,
    initialized: bool,
    done: bool,
    values: Vec<MemberValue>,
    inner: Option<ZipListIter>,
}

impl QuickListIter {
    pub(crate) fn new(key: DataKey) -> Self {
        Self {
            key,
            node_count: 0,
            node_index: 0,
            entry_index: 0,
            initialized: false,
            done: false,
            values: Vec::new(),
            inner: None,
        }
    }

    pub(crate) fn next_step(&mut self, rdr: &mut dyn ByteReader) -> RdbResult<Step> {
        if self.done {
            return Ok(Step::End);
        }

        if !self.initialized {
            self.node_count = read_length(rdr)?;
            self.initialized = true;
            trace!("quicklist of {} nodes", self.node_count);
            return Ok(Step::Event(
                Shape::List.head_event(&self.key, self.node_count),
            ));
        }

        if self.node_index == self.node_count {
            self.done = true;
            let values = std::mem::take(&mut self.values);
            return Ok(Step::Event(Shape::List.data_event(&self.key, values)?));
        }

        let inner = self.inner.get_or_insert_with(|| {
            ZipListIter::new(self.key.clone(), Shape::List, ValueReader::ZipListEntry, 1)
        });

        match inner.next_raw(rdr)? {
            RawStep::Head(_) => Ok(Step::Continue),
            RawStep::Entry { value, .. } => {
                let event = Shape::List.entry_event(
                    &self.key,
                    self.entry_index,
                    self.node_count,
                    value.clone(),
                )?;

                self.values.push(value);
                self.entry_index += 1;

                Ok(Step::Event(event))
            }
            RawStep::End => {
                self.inner = None;
                self.node_index += 1;
                Ok(Step::Continue)
            }
        }
    }
}
