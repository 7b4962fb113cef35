//! Field decoding helpers shared by the document models.

use chrono::{DateTime, Datelike, SecondsFormat, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};
use serde_json::{Number, Value};

/// Timestamps travel as ISO-8601 strings with millisecond precision.
///
/// Decoding also accepts epoch milliseconds. Years outside `0..=9999` are
/// rejected so every stored timestamp keeps its four-digit text form.
pub mod iso_millis {
    use super::*;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    /// The text form stored alongside each document.
    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Fixed-width key that orders timestamps chronologically as text.
    pub fn sort_key(value: &DateTime<Utc>) -> String {
        let offset = i128::from(value.timestamp_millis()) - i128::from(i64::MIN);
        format!("{:020}", offset)
    }

    fn parse<E: de::Error>(value: Value) -> Result<DateTime<Utc>, E> {
        let parsed = match &value {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Value::Number(n) => n
                .as_i64()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            _ => None,
        };
        parsed
            .filter(|dt| (0..=9999).contains(&dt.year()))
            .ok_or_else(|| E::custom(format!("Cast to date failed for value {}", value)))
    }

    /// An optional timestamp: absent and `null` both decode to `None`.
    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_str(&format(dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<Value>::deserialize(deserializer)? {
                None | Some(Value::Null) => Ok(None),
                Some(value) => parse(value).map(Some),
            }
        }
    }
}

/// Decode an optional number leniently, the way HTML forms submit them.
///
/// Numbers pass through untouched, numeric strings are parsed, and
/// `null` or blank strings mean "absent".
pub fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Number>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n)),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => serde_json::from_str::<Number>(s.trim())
            .map(Some)
            .map_err(|_| de::Error::custom(format!("Cast to Number failed for value \"{}\"", s))),
        Some(other) => Err(de::Error::custom(format!(
            "Cast to Number failed for value {}",
            other
        ))),
    }
}

/// A non-negative whole count, decoded like [`lenient_number`]; absent is 0.
pub fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let Some(n) = lenient_number(deserializer)? else {
        return Ok(0);
    };
    n.as_u64()
        .or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        })
        .ok_or_else(|| de::Error::custom(format!("Cast to Number failed for value {}", n)))
}

/// Decode optional text, accepting numbers and booleans in their string form.
pub fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "Cast to string failed for value {}",
            other
        ))),
    }
}

/// `null` falls back to the type's default, the same as an absent field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Collects the names of required fields that are missing from a payload.
#[derive(Debug, Default)]
pub struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    pub fn new() -> Self {
        Self::default()
    }

    /// A required text field: absent, empty and whitespace-only all count as missing.
    pub fn text(&mut self, field: &'static str, value: &Option<String>) {
        if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
            self.missing.push(field);
        }
    }

    pub fn number(&mut self, field: &'static str, value: &Option<Number>) {
        if value.is_none() {
            self.missing.push(field);
        }
    }

    /// Finish, producing the validation message for `kind` if anything was missing.
    pub fn finish(self, kind: &str) -> Result<(), String> {
        if self.missing.is_empty() {
            return Ok(());
        }
        let fields: Vec<String> = self
            .missing
            .iter()
            .map(|f| format!("{} is required", f))
            .collect();
        Err(format!("{} validation failed: {}", kind, fields.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_number")]
        number: Option<Number>,
        #[serde(default, deserialize_with = "lenient_count")]
        count: u64,
        #[serde(default, deserialize_with = "lenient_text")]
        text: Option<String>,
        #[serde(default, with = "iso_millis::option")]
        at: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "null_as_default")]
        flag: bool,
    }

    fn sample(json: &str) -> Result<Sample, serde_json::Error> {
        serde_json::from_str::<Sample>(json)
    }

    #[test]
    fn test_lenient_number_accepts_forms() {
        let number = |json| sample(json).unwrap().number;
        assert_eq!(number(r#"{"number": 10}"#), Some(Number::from(10)));
        assert_eq!(number(r#"{"number": "12.5"}"#).unwrap().as_f64(), Some(12.5));
        assert_eq!(number(r#"{"number": ""}"#), None);
        assert_eq!(number(r#"{"number": null}"#), None);
        assert_eq!(number(r#"{}"#), None);
    }

    #[test]
    fn test_lenient_number_rejects_text() {
        let err = sample(r#"{"number": "ten"}"#).unwrap_err();
        assert!(err.to_string().contains("Cast to Number failed"));
        assert!(sample(r#"{"number": true}"#).is_err());
    }

    #[test]
    fn test_lenient_count_accepts_forms() {
        let count = |json| sample(json).unwrap().count;
        assert_eq!(count(r#"{"count": 3}"#), 3);
        assert_eq!(count(r#"{"count": "3"}"#), 3);
        assert_eq!(count(r#"{"count": 4.0}"#), 4);
        assert_eq!(count(r#"{"count": " "}"#), 0);
        assert_eq!(count(r#"{"count": null}"#), 0);
        assert_eq!(count(r#"{}"#), 0);

        assert!(sample(r#"{"count": -1}"#).is_err());
        assert!(sample(r#"{"count": "2.5"}"#).is_err());
        assert!(sample(r#"{"count": "many"}"#).is_err());
    }

    #[test]
    fn test_lenient_text_stringifies_scalars() {
        let text = |json| sample(json).unwrap().text;
        assert_eq!(text(r#"{"text": "Asha"}"#).as_deref(), Some("Asha"));
        assert_eq!(text(r#"{"text": 9000000001}"#).as_deref(), Some("9000000001"));
        assert_eq!(text(r#"{"text": 2.5}"#).as_deref(), Some("2.5"));
        assert_eq!(text(r#"{"text": false}"#).as_deref(), Some("false"));
        assert_eq!(text(r#"{"text": null}"#), None);

        let err = sample(r#"{"text": ["a"]}"#).unwrap_err();
        assert!(err.to_string().contains("Cast to string failed"));
        assert!(sample(r#"{"text": {"a": 1}}"#).is_err());
    }

    #[test]
    fn test_null_falls_back_to_default() {
        assert!(!sample(r#"{"flag": null}"#).unwrap().flag);
        assert!(sample(r#"{"flag": true}"#).unwrap().flag);
    }

    #[test]
    fn test_optional_timestamp_forms() {
        let at = |json| sample(json).unwrap().at;
        assert_eq!(at(r#"{}"#), None);
        assert_eq!(at(r#"{"at": null}"#), None);
        assert_eq!(
            at(r#"{"at": 1700000000123}"#),
            Utc.timestamp_millis_opt(1_700_000_000_123).single()
        );
        assert_eq!(
            at(r#"{"at": "2023-11-14T22:13:20.123Z"}"#),
            Utc.timestamp_millis_opt(1_700_000_000_123).single()
        );

        let err = sample(r#"{"at": "yesterday"}"#).unwrap_err();
        assert!(err.to_string().contains("Cast to date failed"));
        assert!(sample(r#"{"at": true}"#).is_err());
    }

    #[test]
    fn test_timestamp_outside_four_digit_years_is_rejected() {
        // 10000-01-01T00:00:00Z and one millisecond before 0000-01-01T00:00:00Z
        assert!(sample(r#"{"at": 253402300800000}"#).is_err());
        assert!(sample(r#"{"at": -62167219200001}"#).is_err());
        assert!(sample(r#"{"at": 253402300799999}"#).is_ok());
        assert!(sample(r#"{"at": -62167219200000}"#).is_ok());
    }

    #[test]
    fn test_sort_key_orders_chronologically() {
        let keys: Vec<String> = [-62_167_219_200_000_i64, -1, 0, 1_700_000_000_123, 253_402_300_799_999]
            .iter()
            .map(|ms| iso_millis::sort_key(&Utc.timestamp_millis_opt(*ms).unwrap()))
            .collect();

        assert!(keys.iter().all(|k| k.len() == 20));
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(sorted, keys);
    }

    #[test]
    fn test_required_reports_every_missing_field() {
        let mut required = Required::new();
        let name = None;
        let blank = Some("   ".to_string());
        required.text("name", &name);
        required.text("phone", &blank);
        required.number("retailPrice", &None);

        let msg = required.finish("Contact").unwrap_err();
        assert_eq!(
            msg,
            "Contact validation failed: name is required, phone is required, retailPrice is required"
        );
    }

    #[test]
    fn test_iso_millis_format() {
        let dt = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(iso_millis::format(&dt), "2023-11-14T22:13:20.123Z");
    }
}
