use crate::DataKey;

/// Returned when a list is read the first time.
///
/// The length is the declared top-level length, which for quicklists is
/// the number of nodes rather than the number of elements.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListHead {
    pub key: DataKey,
    pub length: u64,
}

/// Returned when a new list element is read.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListEntry {
    pub key: DataKey,
    pub index: u64,
    pub length: u64,
    pub value: String,
}

/// Returned once all elements of a list are read.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListData {
    pub key: DataKey,
    pub values: Vec<String>,
}
