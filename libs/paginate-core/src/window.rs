use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::PaginateConfig;

/// Hard ceiling on the page size, whatever the request or config asks for.
pub const MAX_LIMIT: u64 = 100;

/// Normalized `(page, limit, offset)` triple.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
}

impl PageWindow {
    /// Zero-based index of the first item. A positive offset always wins
    /// over the page-derived position.
    pub fn start(&self) -> u64 {
        if self.offset > 0 {
            self.offset
        } else {
            self.page.saturating_sub(1).saturating_mul(self.limit)
        }
    }
}

/// Resolve raw query integers against the configured fallbacks.
///
/// - page: absent uses `default_page`, anything below 1 becomes 1
/// - limit: absent or below 1 uses `default_limit`, then capped at [`MAX_LIMIT`]
/// - offset: absent or negative becomes 0
///
/// Non-positive configured defaults fall back to [`DEFAULT_PAGE`] and
/// [`DEFAULT_LIMIT`], matching [`PaginateConfig::normalized`].
pub fn resolve_window(
    raw_page: Option<i64>,
    raw_limit: Option<i64>,
    raw_offset: Option<i64>,
    cfg: &PaginateConfig,
) -> PageWindow {
    let default_page = if cfg.default_page < 1 {
        DEFAULT_PAGE
    } else {
        cfg.default_page
    };
    let default_limit = if cfg.default_limit < 1 {
        DEFAULT_LIMIT
    } else {
        cfg.default_limit
    };

    let page = raw_page.unwrap_or(default_page).max(1);

    let limit = match raw_limit {
        Some(l) if l >= 1 => l,
        _ => default_limit,
    };
    let limit = (limit as u64).min(MAX_LIMIT);

    let offset = raw_offset.unwrap_or(0).max(0);

    PageWindow {
        page: page as u64,
        limit,
        offset: offset as u64,
    }
}

/// Lenient integer parse for a raw query value; garbage counts as absent.
pub fn parse_query_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_saturates() {
        let w = PageWindow {
            page: u64::MAX,
            limit: MAX_LIMIT,
            offset: 0,
        };
        assert_eq!(w.start(), u64::MAX);
    }

    #[test]
    fn test_parse_query_int() {
        assert_eq!(parse_query_int(Some("42")), Some(42));
        assert_eq!(parse_query_int(Some("-3")), Some(-3));
        assert_eq!(parse_query_int(Some("abc")), None);
        assert_eq!(parse_query_int(Some("")), None);
        assert_eq!(parse_query_int(None), None);
    }

    #[test]
    fn test_unnormalized_defaults_fall_back() {
        let cfg = PaginateConfig::default().with_defaults(-3, -5);
        let w = resolve_window(None, None, None, &cfg);
        assert_eq!(w.page, 1);
        assert_eq!(w.limit, 10);

        let zeroed = PaginateConfig::default().with_defaults(0, 0);
        let w = resolve_window(Some(4), Some(0), None, &zeroed);
        assert_eq!((w.page, w.limit), (4, 10));
    }
}
