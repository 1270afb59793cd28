use crate::{UserValue, statics};
use indexmap::IndexMap;

/// One user record: an ordered map from field name to value.
/// Records in the same collection need not share a field set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record(IndexMap<String, UserValue>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: IndexMap<String, UserValue>) -> Self {
        Self(fields)
    }

    /// Parse a single JSON/JSON5 object into a record.
    pub fn from_json5(text: &str) -> anyhow::Result<Self> {
        match UserValue::parse_json5(text)? {
            UserValue::Object(map) => Ok(Self(map)),
            other => anyhow::bail!("expected an object, found {}", other.type_name()),
        }
    }

    pub fn fields(&self) -> &IndexMap<String, UserValue> {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&UserValue> {
        self.0.get(field)
    }

    /// Set a field. An existing field keeps its position; a new one is appended.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<UserValue>) -> Option<UserValue> {
        self.0.insert(field.into(), value.into())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn id(&self) -> Option<&UserValue> {
        self.get(statics::FIELD_ID)
    }

    /// String form of the identifier, used for lookups and routes.
    /// A missing or null identifier has no string form.
    pub fn id_key(&self) -> Option<String> {
        self.id()
            .filter(|id| !id.is_null())
            .map(UserValue::to_plain_string)
    }

    pub fn has_truthy_id(&self) -> bool {
        self.id().is_some_and(UserValue::is_truthy)
    }

    /// Shallow merge: this record's fields overlaid with `patch`, patch wins.
    pub fn merged(&self, patch: &Record) -> Record {
        let mut out = self.0.clone();
        for (field, value) in &patch.0 {
            out.insert(field.clone(), value.clone());
        }
        Record(out)
    }
}

impl FromIterator<(String, UserValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, UserValue)>>(iter: I) -> Self {
        Record(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::Record;
    use crate::UserValue;

    #[test]
    fn id_key_stringifies_numbers_and_skips_null() {
        let r = Record::from_json5(r#"{ "id": 7 }"#).unwrap();
        assert_eq!(r.id_key().as_deref(), Some("7"));

        let r = Record::from_json5(r#"{ "id": "abc" }"#).unwrap();
        assert_eq!(r.id_key().as_deref(), Some("abc"));

        let r = Record::from_json5(r#"{ "id": null }"#).unwrap();
        assert_eq!(r.id_key(), None);

        assert_eq!(Record::new().id_key(), None);
    }

    #[test]
    fn merged_keeps_order_and_appends_new_fields() {
        let base = Record::from_json5(r#"{ "id": 2, "email": "b@x.com", "age": 3 }"#).unwrap();
        let patch = Record::from_json5(r#"{ "id": 2, "age": 4, "name": "Bee" }"#).unwrap();

        let merged = base.merged(&patch);
        let keys: Vec<&str> = merged.keys().collect();
        assert_eq!(keys, vec!["id", "email", "age", "name"]);
        assert_eq!(merged.get("age").map(UserValue::to_plain_string).as_deref(), Some("4"));
        assert_eq!(merged.get("email").and_then(UserValue::as_str), Some("b@x.com"));
    }

    #[test]
    fn from_json5_rejects_non_objects() {
        assert!(Record::from_json5("[1, 2]").is_err());
    }
}
