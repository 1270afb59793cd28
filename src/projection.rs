//! Pure, record-scoped presentation rules shared by the table and detail views.

use crate::{Record, UserValue, statics};

fn first_truthy<'a>(record: &'a Record, fields: &[&str]) -> Option<&'a UserValue> {
    fields
        .iter()
        .find_map(|field| record.get(field).filter(|v| v.is_truthy()))
}

/// Human name for a record, falling back through common name fields, then first/last name,
/// then the identifier.
pub fn display_name(record: Option<&Record>) -> String {
    let Some(record) = record else {
        return statics::EN_UNKNOWN_USER.to_string();
    };

    for field in statics::FIELD_NAME_PRIORITY {
        let Some(value) = record.get(field).filter(|v| v.is_truthy()) else {
            continue;
        };
        // A first name is only a display name together with its last name.
        if statics::FIELD_FIRST_NAME.contains(&field) {
            break;
        }
        return value.to_plain_string();
    }

    let first = first_truthy(record, &statics::FIELD_FIRST_NAME);
    let last = first_truthy(record, &statics::FIELD_LAST_NAME);
    if first.is_some() || last.is_some() {
        let first = first.map(UserValue::to_plain_string).unwrap_or_default();
        let last = last.map(UserValue::to_plain_string).unwrap_or_default();
        return format!("{first} {last}").trim().to_string();
    }

    let id = record
        .id()
        .filter(|v| v.is_truthy())
        .map(UserValue::to_plain_string)
        .unwrap_or_else(|| statics::EN_UNKNOWN.to_string());
    format!("{}{id}", statics::EN_USER_PREFIX)
}

/// `firstName` -> `First Name`, `created_at` -> `Created at`.
pub fn format_field_name(field: &str) -> String {
    let mut spaced = String::with_capacity(field.len() + 4);
    for ch in field.chars() {
        match ch {
            c if c.is_ascii_uppercase() => {
                spaced.push(' ');
                spaced.push(c);
            }
            '_' => spaced.push(' '),
            c => spaced.push(c),
        }
    }

    let mut chars = spaced.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    capitalized.trim().to_string()
}

/// Detail-view rendering of a field value.
pub fn format_field_value(value: Option<&UserValue>) -> String {
    match value {
        None | Some(UserValue::Null) => statics::EN_NOT_SPECIFIED.to_string(),
        Some(UserValue::Bool(true)) => statics::EN_YES.to_string(),
        Some(UserValue::Bool(false)) => statics::EN_NO.to_string(),
        Some(v @ (UserValue::Array(_) | UserValue::Object(_))) => v
            .to_json_pretty()
            .unwrap_or_else(|_| statics::EN_COMPLEX_OBJECT.to_string()),
        Some(UserValue::String(s)) if s.chars().count() > statics::FIELD_VALUE_MAX_CHARS => {
            let mut out: String = s.chars().take(statics::FIELD_VALUE_MAX_CHARS).collect();
            out.push_str(statics::ELLIPSIS);
            out
        }
        Some(v) => v.to_plain_string(),
    }
}

/// Table-cell rendering of a field value. Never truncates the text itself.
pub fn format_table_value(value: Option<&UserValue>) -> String {
    match value {
        None | Some(UserValue::Null) => statics::EN_TABLE_MISSING.to_string(),
        Some(v @ (UserValue::Array(_) | UserValue::Object(_))) => v
            .to_json_compact()
            .unwrap_or_else(|_| statics::EN_COMPLEX_OBJECT.to_string()),
        Some(v) => v.to_plain_string(),
    }
}

/// Rendering hint only: long cells get ellipsis styling.
pub fn should_truncate(value: Option<&UserValue>) -> bool {
    format_table_value(value).chars().count() > statics::TABLE_VALUE_TRUNCATE_CHARS
}

pub fn is_editable_field(field: &str) -> bool {
    !statics::NON_EDITABLE_FIELDS.contains(&field)
}

/// Initial text of an input box for `value`.
pub fn editing_text(value: Option<&UserValue>) -> String {
    match value {
        None | Some(UserValue::Null) => String::new(),
        Some(v) => v.to_plain_string(),
    }
}
