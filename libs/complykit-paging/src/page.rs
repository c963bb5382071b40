//! Page shaping: limits, wire format, and the limit+1 slice.

use crate::cursor::{Cursor, SortDir};

/// Limit clamping policy for list endpoints.
#[derive(Clone, Copy, Debug)]
pub struct LimitCfg {
    pub default: u64,
    pub max: u64,
}

impl Default for LimitCfg {
    fn default() -> Self {
        Self {
            default: 25,
            max: 100,
        }
    }
}

impl LimitCfg {
    /// Effective limit for a caller-requested value. Absent or zero falls
    /// back to the default; anything above `max` is clamped to `max`.
    #[must_use]
    pub fn clamp(&self, requested: Option<u64>) -> u64 {
        match requested {
            None | Some(0) => self.default,
            Some(n) => n.min(self.max),
        }
    }
}

/// Pagination envelope of a page.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PageInfo {
    #[serde(rename = "nextCursor")]
    pub next_cursor: Option<String>,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// Uniform list-endpoint response shape.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    /// An empty page with no continuation.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            pagination: PageInfo {
                next_cursor: None,
                has_more: false,
            },
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Turn `limit + 1` fetched rows into a page.
///
/// `rows` must already be ordered by the query's sort; the extra sentinel
/// row (if present) proves there is a next page and is excluded from the
/// output. `key_fn` extracts the sort-key values of a row for the
/// continuation cursor.
pub fn slice_page<T>(
    mut rows: Vec<T>,
    limit: u64,
    dir: SortDir,
    order_tokens: &str,
    key_fn: impl Fn(&T) -> Vec<String>,
) -> Page<T> {
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let has_more = rows.len() > limit;
    rows.truncate(limit);

    let next_cursor = if has_more {
        rows.last()
            .map(|row| Cursor::new(key_fn(row), dir, order_tokens))
            .and_then(|cursor| cursor.encode().ok())
    } else {
        None
    };

    Page {
        data: rows,
        pagination: PageInfo {
            next_cursor,
            has_more,
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn clamp_applies_default_and_max() {
        let cfg = LimitCfg::default();
        assert_eq!(cfg.clamp(None), 25);
        assert_eq!(cfg.clamp(Some(0)), 25);
        assert_eq!(cfg.clamp(Some(40)), 40);
        assert_eq!(cfg.clamp(Some(100_000)), 100);
    }

    #[test]
    fn slice_without_sentinel_has_no_next_page() {
        let rows = vec![1, 2, 3];
        let page = slice_page(rows, 5, SortDir::Asc, "+id", |n| vec![n.to_string()]);

        assert_eq!(page.data, vec![1, 2, 3]);
        assert!(!page.pagination.has_more);
        assert!(page.pagination.next_cursor.is_none());
    }

    #[test]
    fn sentinel_row_sets_has_more_and_cursor_from_last_kept_row() {
        let rows = vec![1, 2, 3, 4]; // limit 3, one sentinel
        let page = slice_page(rows, 3, SortDir::Asc, "+id", |n| vec![n.to_string()]);

        assert_eq!(page.data, vec![1, 2, 3]);
        assert!(page.pagination.has_more);

        let cursor = Cursor::decode(page.pagination.next_cursor.as_deref().unwrap()).unwrap();
        assert_eq!(cursor.k, vec!["3".to_owned()]);
        assert_eq!(cursor.s, "+id");
    }

    #[test]
    fn wire_shape_uses_camel_case_names() {
        let page = slice_page(vec![1, 2], 1, SortDir::Asc, "+id", |n| vec![n.to_string()]);
        let json = serde_json::to_value(&page).unwrap();

        assert!(json["pagination"]["nextCursor"].is_string());
        assert_eq!(json["pagination"]["hasMore"], true);
        assert_eq!(json["data"], serde_json::json!([1]));
    }
}
