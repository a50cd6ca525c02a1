use paginate_core::{PaginateConfig, PaginationContext, RawParams};

#[test]
fn deserializes_partial_config_with_defaults() {
    let cfg: PaginateConfig = serde_json::from_value(serde_json::json!({
        "page_key": "site",
        "limit_key": "size",
        "allowed_sorts": ["name", "id", "name"]
    }))
    .unwrap();

    assert_eq!(cfg.page_key, "site");
    assert_eq!(cfg.limit_key, "size");
    assert_eq!(cfg.offset_key, "offset");
    assert_eq!(cfg.sort_key, "sort");
    assert_eq!(cfg.default_page, 1);
    assert_eq!(cfg.default_limit, 10);
    assert_eq!(cfg.default_sort, "id");
    assert_eq!(cfg.allowed_sorts.len(), 2);
}

#[test]
fn rejects_unknown_fields() {
    let res: Result<PaginateConfig, _> =
        serde_json::from_value(serde_json::json!({ "max_limit": 500 }));
    assert!(res.is_err());
}

#[test]
fn negative_configured_defaults_resolve_to_builtins() {
    let cfg = PaginateConfig::default().with_defaults(-1, -1).normalized();
    let ctx = PaginationContext::resolve(&RawParams::default(), &cfg);
    assert_eq!(ctx.page(), 1);
    assert_eq!(ctx.limit(), 10);
    assert_eq!(ctx.offset(), 0);
    assert_eq!(ctx.start(), 0);
}

#[test]
fn edge_values_from_query() {
    let cfg = PaginateConfig::default().normalized();
    for (page, limit, expected) in [
        (Some("-1"), None, (1, 10)),
        (Some("0"), None, (1, 10)),
        (None, Some("-10"), (1, 10)),
        (None, Some("0"), (1, 10)),
        (None, Some("1000"), (1, 100)),
    ] {
        let raw = RawParams {
            page,
            limit,
            ..Default::default()
        };
        let ctx = PaginationContext::resolve(&raw, &cfg);
        assert_eq!((ctx.page(), ctx.limit()), expected, "{page:?} {limit:?}");
    }
}
