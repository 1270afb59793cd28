use crate::{Record, statics};
use indexmap::IndexSet;

/// Union of all field names across `records`, in first-seen order
/// (records in sequence, then each record's own field order).
pub fn derive_headers(records: &[Record]) -> Vec<String> {
    let mut headers: IndexSet<&str> = IndexSet::new();
    for record in records {
        headers.extend(record.keys());
    }
    headers.into_iter().map(str::to_string).collect()
}

/// Field names shown in the detail view: the record's own order, without `id`.
pub fn detail_field_keys(record: &Record) -> Vec<&str> {
    record
        .keys()
        .filter(|key| *key != statics::FIELD_ID)
        .collect()
}
