//! Transport-agnostic pagination rules: sort-expression parsing, page window
//! normalization and the per-request [`PaginationContext`].

pub mod config;
pub mod context;
pub mod sort;
pub mod window;

pub use config::PaginateConfig;
pub use context::{PageLinks, PaginationContext, RawParams};
pub use sort::{parse_sort_query, SortField, SortOrder, SortSpec};
pub use window::{parse_query_int, resolve_window, PageWindow, MAX_LIMIT};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("query key `{0}` is used by more than one pagination parameter")]
    DuplicateQueryKey(String),
}
