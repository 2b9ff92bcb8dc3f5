//! Request DTOs
//!
//! Query strings accepted by the local HTTP service.

use serde::Deserialize;

use crate::filter::{FilterState, SortDirection, SortKey, StatusFilter};

/// Longest query the search endpoint accepts.
pub const MAX_QUERY_LEN: usize = 200;

/// Largest page the list endpoint serves.
pub const MAX_PAGE_SIZE: usize = 100;

/// Query string of `GET /search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

impl SearchQuery {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.q.chars().count() > MAX_QUERY_LEN {
            return Some(format!(
                "Query exceeds maximum length of {MAX_QUERY_LEN} characters"
            ));
        }
        None
    }
}

/// Query string of `GET /lists/:resource`.
///
/// `sort` names a field; a leading `-` sorts descending.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<StatusFilter>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl ListQuery {
    /// Builds the filter this query describes.
    pub fn to_filter(&self) -> Result<FilterState, String> {
        let mut filter = FilterState::new();

        if let Some(page_size) = self.page_size {
            if page_size == 0 || page_size > MAX_PAGE_SIZE {
                return Err(format!("page_size must be between 1 and {MAX_PAGE_SIZE}"));
            }
            filter = filter.with_page_size(page_size);
        }
        if let Some(search) = &self.search {
            filter = filter.with_search(search.clone());
        }
        if let Some(status) = self.status {
            filter = filter.with_status(status);
        }
        if let Some(sort) = self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let key = match sort.strip_prefix('-') {
                Some(field) => SortKey {
                    field: field.to_string(),
                    direction: SortDirection::Desc,
                },
                None => SortKey::asc(sort),
            };
            if key.field.is_empty() {
                return Err("sort must name a field".to_string());
            }
            filter = filter.with_sort(key);
        }
        if let Some(page) = self.page {
            filter = filter.with_page(page);
        }

        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_deserialize() {
        let query: SearchQuery = serde_json::from_str(r#"{"q": "maria"}"#).unwrap();
        assert_eq!(query.q, "maria");
        assert!(query.validate().is_none());

        let empty: SearchQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.q, "");
    }

    #[test]
    fn test_search_query_too_long() {
        let query = SearchQuery {
            q: "a".repeat(MAX_QUERY_LEN + 1),
        };
        assert!(query.validate().is_some());
    }

    #[test]
    fn test_list_query_to_filter() {
        let query: ListQuery = serde_json::from_str(
            r#"{"search": "ana", "status": "active", "sort": "-nome", "page": 2, "page_size": 5}"#,
        )
        .unwrap();

        let filter = query.to_filter().unwrap();
        assert_eq!(filter.search_term, "ana");
        assert_eq!(filter.status_filter, StatusFilter::Active);
        assert_eq!(filter.sort_key, Some(SortKey::desc("nome")));
        assert_eq!(filter.page, 2);
        assert_eq!(filter.page_size, 5);
    }

    #[test]
    fn test_list_query_rejects_bad_values() {
        let zero = ListQuery {
            page_size: Some(0),
            ..ListQuery::default()
        };
        assert!(zero.to_filter().is_err());

        let dash = ListQuery {
            sort: Some("-".into()),
            ..ListQuery::default()
        };
        assert!(dash.to_filter().is_err());
    }
}
