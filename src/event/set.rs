use crate::{DataKey, Value};

/// Returned when a set is read the first time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SetHead {
    pub key: DataKey,
    pub length: u64,
}

/// Returned when a new set member is read.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SetEntry {
    pub key: DataKey,
    pub index: u64,
    pub length: u64,
    pub value: Value,
}

/// Returned once all members of a set are read.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SetData {
    pub key: DataKey,
    pub values: Vec<Value>,
}
