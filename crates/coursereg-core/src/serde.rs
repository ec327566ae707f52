//! Lenient deserializers for query-string parameters.
//!
//! Browser forms send `?department_id=` when a filter is cleared; these
//! helpers treat empty strings as absent instead of failing the request.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(s.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Filters {
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        department_id: Option<Uuid>,
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        search: Option<String>,
    }

    #[test]
    fn test_empty_values_are_none() {
        let f: Filters = serde_json::from_str(r#"{"department_id":"","search":"  "}"#).unwrap();
        assert!(f.department_id.is_none());
        assert!(f.search.is_none());
    }

    #[test]
    fn test_values_are_parsed() {
        let f: Filters = serde_json::from_str(
            r#"{"department_id":"12345678-1234-1234-1234-123456789abc","search":" CNTT "}"#,
        )
        .unwrap();
        assert_eq!(
            f.department_id,
            Some(Uuid::from_u128(0x12345678_1234_1234_1234_123456789abc))
        );
        assert_eq!(f.search.as_deref(), Some("CNTT"));
    }

    #[test]
    fn test_missing_fields_default() {
        let f: Filters = serde_json::from_str("{}").unwrap();
        assert!(f.department_id.is_none());
        assert!(f.search.is_none());
    }

    #[test]
    fn test_invalid_uuid_is_error() {
        assert!(serde_json::from_str::<Filters>(r#"{"department_id":"nope"}"#).is_err());
    }
}
