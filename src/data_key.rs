use time::OffsetDateTime;

/// Identifies a key/value record in the dump.
///
/// Every data event carries one of these: the logical database the record
/// belongs to, the key itself, and the expiry attached to the record, if
/// any.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DataKey {
    /// The logical database selected when the record was read.
    pub database: i64,
    /// The record's key.
    pub key: String,
    /// Expiry attached to the record, normalised to UTC.
    pub expiry: Option<OffsetDateTime>,
}

impl DataKey {
    /// Returns true if the key carries an expiry that lies in the past.
    ///
    /// This is a pure convenience for consumers; the parser itself never
    /// consults the clock.
    pub fn expired(&self) -> bool {
        self.expiry
            .map_or(false, |expiry| expiry < OffsetDateTime::now_utc())
    }
}
