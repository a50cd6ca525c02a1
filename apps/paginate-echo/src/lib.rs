//! Demo service that resolves pagination parameters and echoes them back.

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, Uri},
    middleware::from_fn_with_state,
    response::Json,
    routing::get,
    Router,
};
use paginate::{paginate, Pagination, PaginateConfig, Paginator, SortSpec};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

/// Requests carrying this header bypass pagination resolution.
pub const SKIP_HEADER: &str = "x-skip-pagination";

#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
    pub start: u64,
    pub sort: SortSpec,
    pub next_page_url: String,
    pub prev_page_url: String,
}

fn skip_pagination(req: &Request<Body>) -> bool {
    req.uri().path() == "/health" || req.headers().contains_key(SKIP_HEADER)
}

/// `http://{host}{path}`; falls back to `localhost` without a Host header.
fn base_url(headers: &HeaderMap, uri: &Uri) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{}{}", host, uri.path())
}

async fn echo_items(
    Pagination(page): Pagination,
    headers: HeaderMap,
    uri: Uri,
) -> Json<EchoResponse> {
    let base = base_url(&headers, &uri);
    Json(EchoResponse {
        page: page.page(),
        limit: page.limit(),
        offset: page.offset(),
        start: page.start(),
        sort: page.sort().clone(),
        next_page_url: page.next_page_url(&base),
        prev_page_url: page.previous_page_url(&base),
    })
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub fn build_router(cfg: PaginateConfig) -> Router {
    let paginator = Paginator::new(cfg).with_skip(skip_pagination);
    tracing::debug!(?paginator, "pagination middleware configured");

    Router::new()
        .route("/items", get(echo_items))
        .route("/health", get(health))
        .layer(from_fn_with_state(paginator, paginate))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_uses_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "api.example.com".parse().unwrap());
        let uri: Uri = "/items?page=2".parse().unwrap();
        assert_eq!(base_url(&headers, &uri), "http://api.example.com/items");
        assert_eq!(base_url(&HeaderMap::new(), &uri), "http://localhost/items");
    }

    #[test]
    fn health_and_skip_header_bypass_pagination() {
        let req = |uri: &str| Request::builder().uri(uri).body(Body::empty()).unwrap();
        assert!(skip_pagination(&req("/health")));
        assert!(!skip_pagination(&req("/items")));

        let skipped = Request::builder()
            .uri("/items")
            .header(SKIP_HEADER, "1")
            .body(Body::empty())
            .unwrap();
        assert!(skip_pagination(&skipped));
    }
}
