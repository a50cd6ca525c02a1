//! # paginate
//!
//! Axum integration for query-string pagination.
//!
//! A middleware reads `page`, `limit`, `offset` and `sort` (keys are
//! configurable), normalizes them with [`paginate_core`] and attaches one
//! [`PaginationContext`] to the request. Handlers read it back with the
//! [`Pagination`] extractor.
//!
//! ```rust,ignore
//! use axum::{middleware::from_fn_with_state, routing::get, Router};
//! use paginate::{paginate, Pagination, Paginator, PaginateConfig};
//!
//! let paginator = Paginator::new(
//!     PaginateConfig::default().with_allowed_sorts(["id", "name", "date"]),
//! )
//! .with_skip(|req| req.uri().path() == "/health");
//!
//! let app: Router = Router::new()
//!     .route("/users", get(|Pagination(p): Pagination| async move { p.start().to_string() }))
//!     .layer(from_fn_with_state(paginator, paginate));
//! ```

pub mod extract;
pub mod middleware;
pub mod problem;
pub mod scope;

pub use extract::{Pagination, PaginationRejection};
pub use middleware::{paginate, Paginator, SkipFn};
pub use problem::{Problem, ProblemResponse, APPLICATION_PROBLEM_JSON};

pub use paginate_core::{
    PageLinks, PageWindow, PaginateConfig, PaginationContext, SortField, SortOrder, SortSpec,
    MAX_LIMIT,
};
