use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sort instruction: a field name and its direction.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortField {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Desc)
    }

    /// Query form: `field` for ascending, `-field` for descending.
    pub fn to_query_token(&self) -> String {
        match self.order {
            SortOrder::Asc => self.field.clone(),
            SortOrder::Desc => format!("-{}", self.field),
        }
    }
}

/// Ordered sort keys; earlier entries take precedence.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec(pub Vec<SortField>);

impl SortSpec {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Single ascending key, used whenever the client sort is absent or rejected.
    pub fn fallback(default_sort: &str) -> Self {
        Self(vec![SortField::asc(default_sort)])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SortField> {
        self.0.iter()
    }

    pub fn push(&mut self, field: SortField) {
        self.0.push(field);
    }

    /// Render back to the comma-separated expression accepted by [`parse_sort_query`].
    pub fn to_query(&self) -> String {
        self.0
            .iter()
            .map(SortField::to_query_token)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn into_inner(self) -> Vec<SortField> {
        self.0
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(none)");
        }
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", key.field, key.order)?;
        }
        Ok(())
    }
}

impl From<Vec<SortField>> for SortSpec {
    fn from(fields: Vec<SortField>) -> Self {
        Self(fields)
    }
}

impl<'a> IntoIterator for &'a SortSpec {
    type Item = &'a SortField;
    type IntoIter = std::slice::Iter<'a, SortField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parse a raw sort expression such as `name,-date`.
///
/// Tokens are split on `,`; a single leading `-` selects descending order.
/// Nothing is trimmed. Tokens whose field is not in `allowed` are dropped
/// without error, and surviving tokens keep their input order. When the input
/// is empty or nothing survives, the result is `[default_sort asc]`.
///
/// Repeated fields are kept as-is.
pub fn parse_sort_query(raw: &str, allowed: &BTreeSet<String>, default_sort: &str) -> SortSpec {
    if raw.is_empty() {
        return SortSpec::fallback(default_sort);
    }

    let keys: Vec<SortField> = raw
        .split(',')
        .map(|token| match token.strip_prefix('-') {
            Some(field) => (field, SortOrder::Desc),
            None => (token, SortOrder::Asc),
        })
        .filter(|(field, _)| allowed.contains(*field))
        .map(|(field, order)| SortField::new(field, order))
        .collect();

    if keys.is_empty() {
        return SortSpec::fallback(default_sort);
    }

    SortSpec(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow(fields: &[&str]) -> BTreeSet<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_to_query_token() {
        assert_eq!(SortField::asc("name").to_query_token(), "name");
        assert_eq!(SortField::desc("date").to_query_token(), "-date");
    }

    #[test]
    fn test_sort_spec_display() {
        assert_eq!(SortSpec::empty().to_string(), "(none)");
        let spec = SortSpec(vec![SortField::asc("name"), SortField::desc("date")]);
        assert_eq!(spec.to_string(), "name asc, date desc");
    }

    #[test]
    fn test_only_one_dash_is_stripped() {
        let allowed = allow(&["-id", "id"]);
        let spec = parse_sort_query("--id", &allowed, "id");
        assert_eq!(spec, SortSpec(vec![SortField::desc("-id")]));
    }

    #[test]
    fn test_tokens_are_not_trimmed() {
        let allowed = allow(&["id", "name"]);
        let spec = parse_sort_query("id, name", &allowed, "id");
        assert_eq!(spec, SortSpec(vec![SortField::asc("id")]));
    }

    #[test]
    fn test_order_serializes_lowercase() {
        let json = serde_json::to_value(SortField::desc("date")).unwrap();
        assert_eq!(json, serde_json::json!({"field": "date", "order": "desc"}));
    }
}
