//! Cursor-based pagination primitives.
//!
//! List endpoints return `{ data, pagination: { nextCursor, hasMore } }`.
//! The cursor is an opaque base64url token encoding the sort-key values of
//! the last row of the previous page - never a row offset - so fetching
//! page N costs the same as page 1 and concurrent inserts/deletes cannot
//! skip or duplicate rows.

pub mod cursor;
pub mod page;

pub use cursor::{Cursor, PageError, SortDir};
pub use page::{slice_page, LimitCfg, Page, PageInfo};
