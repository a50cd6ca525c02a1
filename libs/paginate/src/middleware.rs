use std::fmt;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use paginate_core::{PaginateConfig, PaginationContext, RawParams};

use crate::scope;

/// Decides, per request, whether pagination resolution is bypassed.
pub type SkipFn = Arc<dyn Fn(&Request<Body>) -> bool + Send + Sync>;

/// Shared middleware settings: a normalized config plus an optional skip hook.
///
/// Install with `axum::middleware::from_fn_with_state(paginator, paginate)`.
#[derive(Clone)]
pub struct Paginator {
    cfg: Arc<PaginateConfig>,
    skip: Option<SkipFn>,
}

impl fmt::Debug for Paginator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("cfg", &self.cfg)
            .field("skip", &self.skip.is_some())
            .finish()
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PaginateConfig::default())
    }
}

impl Paginator {
    pub fn new(cfg: PaginateConfig) -> Self {
        Self {
            cfg: Arc::new(cfg.normalized()),
            skip: None,
        }
    }

    pub fn with_skip<F>(mut self, f: F) -> Self
    where
        F: Fn(&Request<Body>) -> bool + Send + Sync + 'static,
    {
        self.skip = Some(Arc::new(f));
        self
    }

    pub fn config(&self) -> &PaginateConfig {
        &self.cfg
    }

    fn should_skip(&self, req: &Request<Body>) -> bool {
        self.skip.as_ref().is_some_and(|f| f(req))
    }

    /// Resolve the context from a request's query string.
    /// A malformed query string is treated as empty. When a key repeats, its
    /// first occurrence is used.
    pub fn resolve<B>(&self, req: &Request<B>) -> PaginationContext {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
            .unwrap_or_else(|e| {
                tracing::debug!(error = %e, "unparseable query string, using defaults");
                Query(Vec::new())
            });

        let cfg = &*self.cfg;
        let raw = RawParams {
            page: first_value(&pairs, &cfg.page_key),
            limit: first_value(&pairs, &cfg.limit_key),
            offset: first_value(&pairs, &cfg.offset_key),
            sort: first_value(&pairs, &cfg.sort_key),
        };
        PaginationContext::resolve(&raw, cfg)
    }
}

fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Middleware that resolves pagination parameters and stores them on the request.
pub async fn paginate(
    State(paginator): State<Paginator>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if paginator.should_skip(&req) {
        tracing::trace!(path = %req.uri().path(), "pagination skipped");
        return next.run(req).await;
    }

    let ctx = paginator.resolve(&req);
    tracing::debug!(
        page = ctx.page(),
        limit = ctx.limit(),
        offset = ctx.offset(),
        sort = %ctx.sort(),
        "pagination resolved"
    );
    scope::attach(req.extensions_mut(), ctx);

    next.run(req).await
}
