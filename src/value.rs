use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Decimal exponent up to which numbers are printed without exponent notation.
const PLAIN_EXPONENT_MAX: i32 = 21;
/// Decimal exponent below which small numbers switch to exponent notation.
const PLAIN_EXPONENT_MIN: i32 = -6;

/// A JSON number that remembers whether it was parsed as a signed, unsigned or float value.
#[derive(Debug, Clone, PartialEq)]
pub enum UserNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl UserNumber {
    pub fn as_f64(&self) -> f64 {
        match self {
            UserNumber::I64(v) => *v as f64,
            UserNumber::U64(v) => *v as f64,
            UserNumber::F64(v) => *v,
        }
    }

    /// Numeric equality across representations, so `2`, `2u64` and `2.0` compare equal.
    pub fn same_number(&self, other: &UserNumber) -> bool {
        match (self, other) {
            (UserNumber::I64(a), UserNumber::I64(b)) => a == b,
            (UserNumber::U64(a), UserNumber::U64(b)) => a == b,
            (UserNumber::I64(a), UserNumber::U64(b)) | (UserNumber::U64(b), UserNumber::I64(a)) => {
                u64::try_from(*a).is_ok_and(|a| a == *b)
            }
            _ => self.as_f64() == other.as_f64(),
        }
    }

    pub fn is_zero_or_nan(&self) -> bool {
        let v = self.as_f64();
        v == 0.0 || v.is_nan()
    }

    /// Plain text rendering. Floats use the shortest digits that round-trip, laid out the
    /// way JavaScript prints numbers (`1e+21`, `0.000001`, `1e-7`).
    pub fn to_plain_string(&self) -> String {
        match self {
            UserNumber::I64(v) => v.to_string(),
            UserNumber::U64(v) => v.to_string(),
            UserNumber::F64(v) => {
                if v.is_nan() {
                    "NaN".to_string()
                } else if v.is_infinite() {
                    if v.is_sign_negative() {
                        "-Infinity".to_string()
                    } else {
                        "Infinity".to_string()
                    }
                } else {
                    shortest_decimal(*v)
                }
            }
        }
    }
}

/// Lay out the shortest round-trip digits of a finite `v`.
fn shortest_decimal(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let mut buf = ryu::Buffer::new();
    let text = buf.format_finite(v.abs());
    let (mantissa, exp) = match text.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (text, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    // `point` is where the decimal point sits relative to the start of `digits`.
    let mut digits = format!("{int_part}{frac_part}");
    let mut point = int_part.len() as i32 + exp;
    let leading = digits.len() - digits.trim_start_matches('0').len();
    digits.replace_range(..leading, "");
    point -= leading as i32;
    digits.truncate(digits.trim_end_matches('0').len());

    let k = digits.len() as i32;
    let body = if k <= point && point <= PLAIN_EXPONENT_MAX {
        format!("{digits}{}", "0".repeat((point - k) as usize))
    } else if 0 < point && point <= PLAIN_EXPONENT_MAX {
        let (whole, frac) = digits.split_at(point as usize);
        format!("{whole}.{frac}")
    } else if PLAIN_EXPONENT_MIN < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat(-point as usize))
    } else {
        let e = point - 1;
        let sign = if e < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{sign}{}", e.abs())
        } else {
            format!("{first}.{rest}e{sign}{}", e.abs())
        }
    };
    if v < 0.0 { format!("-{body}") } else { body }
}

impl Serialize for UserNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UserNumber::I64(v) => serializer.serialize_i64(*v),
            UserNumber::U64(v) => serializer.serialize_u64(*v),
            UserNumber::F64(v) if !v.is_finite() => serializer.serialize_unit(),
            UserNumber::F64(v) => {
                // Integral values go out as integers carrying the shortest digits.
                let text = shortest_decimal(*v);
                if let Ok(i) = text.parse::<i64>() {
                    serializer.serialize_i64(i)
                } else if let Ok(u) = text.parse::<u64>() {
                    serializer.serialize_u64(u)
                } else {
                    serializer.serialize_f64(*v)
                }
            }
        }
    }
}

/// A schema-less JSON value as delivered by the user endpoint.
/// Objects keep their insertion order, which drives column and field ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum UserValue {
    Null,
    Bool(bool),
    Number(UserNumber),
    String(String),
    Array(Vec<UserValue>),
    Object(IndexMap<String, UserValue>),
}

impl UserValue {
    pub fn as_object(&self) -> Option<&IndexMap<String, UserValue>> {
        match self {
            UserValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            UserValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, UserValue::Null)
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, UserValue::Array(_) | UserValue::Object(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            UserValue::Null => "null",
            UserValue::Bool(_) => "bool",
            UserValue::Number(_) => "number",
            UserValue::String(_) => "string",
            UserValue::Array(_) => "array",
            UserValue::Object(_) => "object",
        }
    }

    /// Truthiness as the endpoint's consumers understood it: null, false, zero, NaN and the
    /// empty string are falsy; every array and object is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            UserValue::Null => false,
            UserValue::Bool(v) => *v,
            UserValue::Number(n) => !n.is_zero_or_nan(),
            UserValue::String(s) => !s.is_empty(),
            UserValue::Array(_) | UserValue::Object(_) => true,
        }
    }

    /// Identifier equality: numbers compare numerically, everything else structurally.
    pub fn same_identifier(&self, other: &UserValue) -> bool {
        match (self, other) {
            (UserValue::Number(a), UserValue::Number(b)) => a.same_number(b),
            _ => self == other,
        }
    }

    pub fn parse_json5(text: &str) -> anyhow::Result<UserValue> {
        Ok(json5::from_str::<UserValue>(text)?)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_json_compact(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Plain text used in cells and input boxes. Structured values render as compact JSON.
    pub fn to_plain_string(&self) -> String {
        match self {
            UserValue::Null => "null".to_string(),
            UserValue::Bool(v) => v.to_string(),
            UserValue::Number(n) => n.to_plain_string(),
            UserValue::String(s) => s.clone(),
            UserValue::Array(_) | UserValue::Object(_) => {
                self.to_json_compact().unwrap_or_default()
            }
        }
    }
}

impl From<&str> for UserValue {
    fn from(s: &str) -> Self {
        UserValue::String(s.to_string())
    }
}

impl From<String> for UserValue {
    fn from(s: String) -> Self {
        UserValue::String(s)
    }
}

impl From<i64> for UserValue {
    fn from(v: i64) -> Self {
        UserValue::Number(UserNumber::I64(v))
    }
}

impl From<bool> for UserValue {
    fn from(v: bool) -> Self {
        UserValue::Bool(v)
    }
}

impl Serialize for UserValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UserValue::Null => serializer.serialize_unit(),
            UserValue::Bool(v) => serializer.serialize_bool(*v),
            UserValue::Number(n) => n.serialize(serializer),
            UserValue::String(s) => serializer.serialize_str(s),
            UserValue::Array(values) => values.serialize(serializer),
            UserValue::Object(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for UserValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = UserValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(UserValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(UserValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(UserValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(UserValue::Number(UserNumber::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(UserValue::Number(UserNumber::U64(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(UserValue::Number(UserNumber::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(UserValue::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(UserValue::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<UserValue>()? {
                    values.push(value);
                }
                Ok(UserValue::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, UserValue>()? {
                    values.insert(key, value);
                }
                Ok(UserValue::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{UserNumber, UserValue};

    #[test]
    fn parse_keeps_integer_and_float_distinction() {
        let v = UserValue::parse_json5(r#"{ "a": 42, "b": 1.25, "c": -3 }"#).unwrap();
        let obj = v.as_object().unwrap();

        assert!(matches!(
            obj.get("a"),
            Some(UserValue::Number(UserNumber::I64(42) | UserNumber::U64(42)))
        ));
        assert!(matches!(obj.get("b"), Some(UserValue::Number(UserNumber::F64(_)))));
        assert!(matches!(obj.get("c"), Some(UserValue::Number(UserNumber::I64(-3)))));
    }

    #[test]
    fn parse_preserves_key_order() {
        let v = UserValue::parse_json5(r#"{ "z": 1, "a": 2, "m": 3 }"#).unwrap();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn pretty_json_uses_two_space_indent() {
        let v = UserValue::parse_json5(r#"{ "street": "Main", "no": [1, 2] }"#).unwrap();
        assert_eq!(
            v.to_json_pretty().unwrap(),
            "{\n  \"street\": \"Main\",\n  \"no\": [\n    1,\n    2\n  ]\n}"
        );
    }

    #[test]
    fn compact_json_has_no_whitespace() {
        let v = UserValue::parse_json5(r#"{ "a": [1, true, null], "b": "x" }"#).unwrap();
        assert_eq!(v.to_json_compact().unwrap(), r#"{"a":[1,true,null],"b":"x"}"#);
    }

    #[test]
    fn integral_floats_render_without_fraction() {
        let v = UserValue::Number(UserNumber::F64(3.0));
        assert_eq!(v.to_plain_string(), "3");
        assert_eq!(v.to_json_compact().unwrap(), "3");

        let v = UserValue::Number(UserNumber::F64(2.5));
        assert_eq!(v.to_plain_string(), "2.5");
    }

    #[test]
    fn floats_print_shortest_round_trip_digits() {
        let plain = |v: f64| UserNumber::F64(v).to_plain_string();
        assert_eq!(plain(1.2345678901234568e18), "1234567890123456800");
        assert_eq!(plain(1e21), "1e+21");
        assert_eq!(plain(1.5e300), "1.5e+300");
        assert_eq!(plain(0.000001), "0.000001");
        assert_eq!(plain(1e-7), "1e-7");
        assert_eq!(plain(-0.1), "-0.1");
        assert_eq!(plain(123.456), "123.456");
        assert_eq!(plain(-0.0), "0");

        let v = UserValue::Array(vec![UserValue::Number(UserNumber::F64(1.2345678901234568e18))]);
        assert_eq!(v.to_json_compact().unwrap(), "[1234567890123456800]");
    }

    #[test]
    fn non_finite_floats_serialize_as_null() {
        let v = UserValue::Array(vec![UserValue::Number(UserNumber::F64(f64::NAN))]);
        assert_eq!(v.to_json_compact().unwrap(), "[null]");
        assert_eq!(
            UserValue::Number(UserNumber::F64(f64::NEG_INFINITY)).to_plain_string(),
            "-Infinity"
        );
    }

    #[test]
    fn truthiness_matches_loose_rules() {
        assert!(!UserValue::Null.is_truthy());
        assert!(!UserValue::from("").is_truthy());
        assert!(!UserValue::from(0).is_truthy());
        assert!(!UserValue::Number(UserNumber::F64(f64::NAN)).is_truthy());
        assert!(!UserValue::from(false).is_truthy());
        assert!(UserValue::from("0").is_truthy());
        assert!(UserValue::Array(Vec::new()).is_truthy());
        assert!(UserValue::Object(Default::default()).is_truthy());
    }

    #[test]
    fn identifiers_compare_numerically() {
        let a = UserValue::Number(UserNumber::I64(2));
        let b = UserValue::Number(UserNumber::U64(2));
        let c = UserValue::Number(UserNumber::F64(2.0));
        assert!(a.same_identifier(&b));
        assert!(b.same_identifier(&c));
        assert!(!a.same_identifier(&UserValue::from("2")));
    }
}
