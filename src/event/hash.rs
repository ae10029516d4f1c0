use crate::DataKey;
use std::collections::HashMap;

/// Returned when a hash is read the first time.
///
/// For zipmap-backed hashes the declared length is a single saturating
/// byte, so it may undercount large maps.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HashHead {
    pub key: DataKey,
    pub length: u64,
}

/// Returned when a new hash field is read.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HashEntry {
    pub key: DataKey,
    pub index: u64,
    pub length: u64,
    pub field: String,
    pub value: String,
}

/// Returned once all fields of a hash are read.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HashData {
    pub key: DataKey,
    pub values: HashMap<String, String>,
}
