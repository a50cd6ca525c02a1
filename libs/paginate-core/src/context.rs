use serde::{Deserialize, Serialize};

use crate::{
    parse_sort_query, resolve_window, PageWindow, PaginateConfig, SortField, SortOrder, SortSpec,
};

/// Resolved pagination intent for a single request.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationContext {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
    pub sort: SortSpec,
}

/// Navigation links relative to some base URL.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    pub next: String,
    pub prev: Option<String>,
}

/// Raw query values as read from the request, before any normalization.
#[derive(Clone, Debug, Default)]
pub struct RawParams<'a> {
    pub page: Option<&'a str>,
    pub limit: Option<&'a str>,
    pub offset: Option<&'a str>,
    pub sort: Option<&'a str>,
}

impl PaginationContext {
    pub fn new(window: PageWindow, sort: SortSpec) -> Self {
        Self {
            page: window.page,
            limit: window.limit,
            offset: window.offset,
            sort,
        }
    }

    /// Full resolution: lenient integer parsing, window normalization and
    /// sort parsing against the allow-list.
    pub fn resolve(raw: &RawParams<'_>, cfg: &PaginateConfig) -> Self {
        let window = resolve_window(
            crate::parse_query_int(raw.page),
            crate::parse_query_int(raw.limit),
            crate::parse_query_int(raw.offset),
            cfg,
        );
        let sort = parse_sort_query(
            raw.sort.unwrap_or_default(),
            &cfg.allowed_sorts,
            &cfg.default_sort,
        );
        Self::new(window, sort)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            page: self.page,
            limit: self.limit,
            offset: self.offset,
        }
    }

    /// Recomputed on every call from the current page, limit and offset.
    pub fn start(&self) -> u64 {
        self.window().start()
    }

    pub fn next_page_url(&self, base_url: &str) -> String {
        format!(
            "{}?page={}&limit={}",
            base_url,
            self.page.saturating_add(1),
            self.limit
        )
    }

    /// Empty string on the first page.
    pub fn previous_page_url(&self, base_url: &str) -> String {
        if self.page <= 1 {
            return String::new();
        }
        format!("{}?page={}&limit={}", base_url, self.page - 1, self.limit)
    }

    pub fn links(&self, base_url: &str) -> PageLinks {
        let prev = self.previous_page_url(base_url);
        PageLinks {
            next: self.next_page_url(base_url),
            prev: (!prev.is_empty()).then_some(prev),
        }
    }

    /// Append a sort key programmatically.
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort.push(SortField::new(field, order));
        self
    }
}
