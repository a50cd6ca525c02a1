use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::Error;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_SORT: &str = "id";

/// Query keys, fallbacks and the sort allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginateConfig {
    pub page_key: String,
    pub limit_key: String,
    pub offset_key: String,
    pub sort_key: String,
    pub default_page: i64,
    pub default_limit: i64,
    pub default_sort: String,
    /// Field names clients may sort by. Empty accepts no client-supplied field.
    pub allowed_sorts: BTreeSet<String>,
}

impl Default for PaginateConfig {
    fn default() -> Self {
        Self {
            page_key: "page".to_string(),
            limit_key: "limit".to_string(),
            offset_key: "offset".to_string(),
            sort_key: "sort".to_string(),
            default_page: DEFAULT_PAGE,
            default_limit: DEFAULT_LIMIT,
            default_sort: DEFAULT_SORT.to_string(),
            allowed_sorts: BTreeSet::new(),
        }
    }
}

impl PaginateConfig {
    pub fn with_allowed_sorts<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_sorts = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_sort(mut self, field: impl Into<String>) -> Self {
        self.default_sort = field.into();
        self
    }

    pub fn with_defaults(mut self, page: i64, limit: i64) -> Self {
        self.default_page = page;
        self.default_limit = limit;
        self
    }

    /// Replace unusable values with the built-in defaults.
    ///
    /// Non-positive default page/limit and empty keys or default sort are
    /// reset. The limit ceiling is applied later, at resolution time.
    pub fn normalized(mut self) -> Self {
        let base = Self::default();
        if self.default_page < 1 {
            self.default_page = base.default_page;
        }
        if self.default_limit < 1 {
            self.default_limit = base.default_limit;
        }
        for (key, fallback) in [
            (&mut self.page_key, base.page_key),
            (&mut self.limit_key, base.limit_key),
            (&mut self.offset_key, base.offset_key),
            (&mut self.sort_key, base.sort_key),
            (&mut self.default_sort, base.default_sort),
        ] {
            if key.is_empty() {
                *key = fallback;
            }
        }
        self
    }

    /// Reject configurations where two parameters share a query key.
    pub fn validate(&self) -> Result<(), Error> {
        let keys = [
            &self.page_key,
            &self.limit_key,
            &self.offset_key,
            &self.sort_key,
        ];
        for (i, a) in keys.iter().enumerate() {
            if keys[i + 1..].contains(a) {
                return Err(Error::DuplicateQueryKey((*a).clone()));
            }
        }
        Ok(())
    }
}
