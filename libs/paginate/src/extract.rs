use std::convert::Infallible;
use std::ops::Deref;
use std::sync::Arc;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use paginate_core::PaginationContext;

use crate::problem::{Problem, ProblemResponse};
use crate::scope;

#[derive(thiserror::Error, Debug, Clone)]
pub enum PaginationRejection {
    /// The pagination middleware did not run for this request, or skipped it.
    #[error("no pagination context attached to request {path}")]
    Missing { path: String },
}

impl PaginationRejection {
    pub fn to_problem(&self) -> ProblemResponse {
        match self {
            PaginationRejection::Missing { path } => Problem::new(
                StatusCode::BAD_REQUEST,
                "Pagination Missing",
                "Pagination parameters were not resolved for this request",
            )
            .with_code("PAGINATION_MISSING")
            .with_instance(path.clone())
            .into(),
        }
    }
}

impl IntoResponse for PaginationRejection {
    fn into_response(self) -> Response {
        self.to_problem().into_response()
    }
}

/// Axum extractor for the context stored by the pagination middleware.
///
/// Usage in handlers:
///   async fn list_users(Pagination(page): Pagination) { /* page.start(), page.sort() */ }
///
/// Rejects with a 400 Problem when nothing was attached. Use
/// `Option<Pagination>` to handle that case in the handler instead.
#[derive(Debug, Clone)]
pub struct Pagination(pub Arc<PaginationContext>);

impl Pagination {
    #[inline]
    pub fn into_inner(self) -> Arc<PaginationContext> {
        self.0
    }
}

impl Deref for Pagination {
    type Target = PaginationContext;
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<PaginationContext> for Pagination {
    #[inline]
    fn as_ref(&self) -> &PaginationContext {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = PaginationRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match scope::retrieve_shared(&parts.extensions) {
            Some(ctx) => Ok(Pagination(ctx)),
            None => {
                tracing::debug!(path = %parts.uri.path(), "pagination context missing");
                Err(PaginationRejection::Missing {
                    path: parts.uri.path().to_string(),
                })
            }
        }
    }
}

impl<S> OptionalFromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(scope::retrieve_shared(&parts.extensions).map(Pagination))
    }
}
