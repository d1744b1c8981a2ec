//! Two-stage decoding of JSON embedded in free-form model output.
//!
//! Stage 1 decodes the trimmed response as-is. Stage 2 decodes the slice from
//! the first `{` to the last `}`, which tolerates prose or code fences around
//! the object. Anything else is a typed error.

use std::fmt;

use serde::de::{self, DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonRecoveryError {
    #[error("response contains no JSON object")]
    NoObject,

    #[error("response JSON could not be decoded: {0}")]
    Invalid(#[source] serde_json::Error),
}

pub fn parse_lenient<T: DeserializeOwned>(raw: &str) -> Result<T, JsonRecoveryError> {
    let raw = raw.trim();
    match serde_json::from_str(raw) {
        Ok(value) => Ok(value),
        Err(strict_err) => {
            let slice = object_slice(raw).ok_or(if raw.contains('{') {
                JsonRecoveryError::Invalid(strict_err)
            } else {
                JsonRecoveryError::NoObject
            })?;
            serde_json::from_str(slice).map_err(JsonRecoveryError::Invalid)
        }
    }
}

/// Treats an explicit JSON `null` the same as an absent field.
///
/// Paired with `#[serde(default)]` on LLM-facing structs, this is the one place
/// where "lists are never null" is enforced.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Text field that also accepts a bare number, boolean, or `null`.
///
/// Models often answer `"start": 2019` where a string was asked for; the value
/// is kept as its JSON text instead of failing the whole object.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string, number, boolean, or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D2: Deserializer<'de>>(self, deserializer: D2) -> Result<String, D2::Error> {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

/// The substring spanning the first `{` through the last `}`, if ordered.
fn object_slice(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        key: String,
    }

    #[test]
    fn test_direct_json() {
        let p: Payload = parse_lenient("  {\"key\": \"value\"}\n").unwrap();
        assert_eq!(p.key, "value");
    }

    #[test]
    fn test_fenced_json_recovers() {
        let p: Payload = parse_lenient("```json\n{\"key\": \"value\"}\n```").unwrap();
        assert_eq!(p.key, "value");
    }

    #[test]
    fn test_prose_wrapped_json_recovers() {
        let raw = "Here is the result you asked for: {\"key\": \"v\"} Hope this helps!";
        let p: Payload = parse_lenient(raw).unwrap();
        assert_eq!(p.key, "v");
    }

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Dated {
        #[serde(deserialize_with = "string_or_number")]
        start: String,
        #[serde(deserialize_with = "string_or_number")]
        end: String,
    }

    #[test]
    fn test_string_or_number_accepts_scalars() {
        let d: Dated = parse_lenient(r#"{"start": 2019, "end": "present"}"#).unwrap();
        assert_eq!(d.start, "2019");
        assert_eq!(d.end, "present");

        let d: Dated = parse_lenient(r#"{"start": 2019.5, "end": null}"#).unwrap();
        assert_eq!(d.start, "2019.5");
        assert_eq!(d.end, "");

        let d: Dated = parse_lenient(r#"{"end": true}"#).unwrap();
        assert_eq!(d.start, "");
        assert_eq!(d.end, "true");
    }

    #[test]
    fn test_string_or_number_rejects_containers() {
        assert!(parse_lenient::<Dated>(r#"{"start": [2019]}"#).is_err());
    }

    #[test]
    fn test_no_braces_is_no_object() {
        let err = parse_lenient::<Payload>("I cannot help with that.").unwrap_err();
        assert!(matches!(err, JsonRecoveryError::NoObject));
    }

    #[test]
    fn test_broken_object_is_invalid() {
        let err = parse_lenient::<Payload>("Sure: {\"key\": }").unwrap_err();
        assert!(matches!(err, JsonRecoveryError::Invalid(_)));
    }

    #[test]
    fn test_reversed_braces_is_invalid() {
        let err = parse_lenient::<Payload>("} oops {").unwrap_err();
        assert!(matches!(err, JsonRecoveryError::Invalid(_)));
    }
}
