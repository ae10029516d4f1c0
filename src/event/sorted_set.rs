use crate::DataKey;

/// A sorted set member together with its score.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SortedSetValue {
    pub member: String,
    pub score: f64,
}

/// Returned when a sorted set is read the first time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SortedSetHead {
    pub key: DataKey,
    pub length: u64,
}

/// Returned when a new sorted set member is read.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SortedSetEntry {
    pub key: DataKey,
    pub index: u64,
    pub length: u64,
    pub member: String,
    pub score: f64,
}

/// Returned once all members of a sorted set are read.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SortedSetData {
    pub key: DataKey,
    pub values: Vec<SortedSetValue>,
}
