//! Pagination utilities for list endpoints.
//!
//! List endpoints accept either `limit` + `offset` or `limit` + `page`
//! (page wins when both are present) and answer with a `meta` block:
//!
//! ```json
//! { "data": [...], "meta": { "total": 42, "limit": 10, "page": 2, "has_more": true } }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Query strings arrive as text; empty values mean "not provided".
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 200;

/// Metadata about a paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of matching items
    pub total: i64,
    /// Limit that was applied
    pub limit: i64,
    /// Items skipped (offset-based requests)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Current page (page-based requests)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether more items follow this page
    pub has_more: bool,
}

impl PaginationMeta {
    /// Builds the metadata for a page of results out of `total` matches.
    #[must_use]
    pub fn new(total: i64, params: &PaginationParams) -> Self {
        let limit = params.limit();
        let offset = params.offset();
        let page = params.page();

        Self {
            total,
            limit,
            offset: if page.is_some() { None } else { Some(offset) },
            page,
            has_more: offset + limit < total,
        }
    }
}

/// Query parameters for pagination.
///
/// - `limit` is clamped to `[1, 200]`, default 20
/// - `offset` is clamped to a minimum of 0
/// - `page` is 1-indexed and takes precedence over `offset`
#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        match self.page {
            Some(page) => (page.max(1) - 1) * self.limit(),
            None => self.offset.unwrap_or(0).max(0),
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, offset: Option<i64>, page: Option<i64>) -> PaginationParams {
        PaginationParams {
            limit,
            offset,
            page,
        }
    }

    #[test]
    fn test_defaults() {
        let p = PaginationParams::default();
        assert_eq!(p.limit(), DEFAULT_LIMIT);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), None);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(params(Some(0), None, None).limit(), 1);
        assert_eq!(params(Some(-4), None, None).limit(), 1);
        assert_eq!(params(Some(500), None, None).limit(), MAX_LIMIT);
        assert_eq!(params(Some(35), None, None).limit(), 35);
    }

    #[test]
    fn test_page_takes_precedence_over_offset() {
        let p = params(Some(10), Some(7), Some(3));
        assert_eq!(p.offset(), 20);
        assert_eq!(p.page(), Some(3));
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let p = params(Some(10), None, Some(0));
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), Some(1));
    }

    #[test]
    fn test_negative_offset() {
        assert_eq!(params(None, Some(-5), None).offset(), 0);
    }

    #[test]
    fn test_meta_offset_based() {
        let meta = PaginationMeta::new(45, &params(Some(20), Some(20), None));
        assert_eq!(meta.offset, Some(20));
        assert_eq!(meta.page, None);
        assert!(meta.has_more);

        let last = PaginationMeta::new(45, &params(Some(20), Some(40), None));
        assert!(!last.has_more);
    }

    #[test]
    fn test_meta_page_based_omits_offset() {
        let meta = PaginationMeta::new(5, &params(Some(10), None, Some(1)));
        assert_eq!(meta.offset, None);
        assert_eq!(meta.page, Some(1));
        assert!(!meta.has_more);

        let json = serde_json::to_string(&meta).unwrap();
        assert!(!json.contains("offset"));
    }

    #[test]
    fn test_deserialize_empty_strings() {
        let p: PaginationParams =
            serde_json::from_str(r#"{"limit":"","offset":"","page":""}"#).unwrap();
        assert_eq!(p.limit(), DEFAULT_LIMIT);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_deserialize_values() {
        let p: PaginationParams = serde_json::from_str(r#"{"limit":"5","page":"4"}"#).unwrap();
        assert_eq!(p.limit(), 5);
        assert_eq!(p.offset(), 15);
    }
}
