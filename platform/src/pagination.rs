//! Cursor-based pagination for platform list endpoints.

use serde::Deserialize;

/// Default page size when no limit is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum page size the platform accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Upper bound on pages walked for one listing, guarding against a platform
/// that keeps returning `has_more` with a repeating cursor.
pub const MAX_PAGES: usize = 10_000;

/// One page of a list response.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    /// Opaque cursor for the next page.
    #[serde(default)]
    pub next_page: Option<String>,
}

impl<T> Page<T> {
    /// Cursor for the following page, or `None` when this is the last page.
    pub fn next_cursor(&self) -> Option<&str> {
        if !self.has_more {
            return None;
        }
        self.next_page.as_deref().filter(|c| !c.is_empty())
    }
}

/// Query parameters of a list request.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub page: Option<String>,
}

impl ListParams {
    /// Resolve effective page size, clamped to [1, MAX_PAGE_SIZE].
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.effective_limit().to_string())];
        if let Some(page) = &self.page {
            pairs.push(("page", page.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_limit_defaults() {
        assert_eq!(ListParams::default().effective_limit(), 100);
    }

    #[test]
    fn effective_limit_clamps() {
        let p = ListParams {
            limit: Some(5000),
            page: None,
        };
        assert_eq!(p.effective_limit(), 1000);
        let p = ListParams {
            limit: Some(0),
            page: None,
        };
        assert_eq!(p.effective_limit(), 1);
    }

    #[test]
    fn query_includes_cursor() {
        let p = ListParams {
            limit: Some(10),
            page: Some("abc".into()),
        };
        assert_eq!(
            p.query_pairs(),
            vec![("limit", "10".to_string()), ("page", "abc".to_string())]
        );
    }

    #[test]
    fn next_cursor_requires_has_more() {
        let last: Page<u32> = serde_json::from_str(r#"{"data":[1],"has_more":false,"next_page":"x"}"#).unwrap();
        assert!(last.next_cursor().is_none());
        let more: Page<u32> = serde_json::from_str(r#"{"data":[1],"has_more":true,"next_page":"x"}"#).unwrap();
        assert_eq!(more.next_cursor(), Some("x"));
        let empty: Page<u32> = serde_json::from_str(r#"{"data":[],"has_more":true,"next_page":""}"#).unwrap();
        assert!(empty.next_cursor().is_none());
    }
}
