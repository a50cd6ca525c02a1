//! Per-request storage for the resolved [`PaginationContext`].
//!
//! The context lives in the request's `http::Extensions` under a private
//! newtype, so only this module can put it there or read it back.

use std::sync::Arc;

use http::Extensions;
use paginate_core::PaginationContext;

#[derive(Clone)]
struct Slot(Arc<PaginationContext>);

/// Store `ctx` for this request, replacing any earlier value.
pub fn attach(ext: &mut Extensions, ctx: PaginationContext) {
    ext.insert(Slot(Arc::new(ctx)));
}

/// `None` when resolution never ran for this request.
pub fn retrieve(ext: &Extensions) -> Option<&PaginationContext> {
    ext.get::<Slot>().map(|slot| slot.0.as_ref())
}

pub(crate) fn retrieve_shared(ext: &Extensions) -> Option<Arc<PaginationContext>> {
    ext.get::<Slot>().map(|slot| slot.0.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use paginate_core::{PageWindow, SortSpec};

    fn ctx(page: u64) -> PaginationContext {
        PaginationContext::new(
            PageWindow {
                page,
                limit: 10,
                offset: 0,
            },
            SortSpec::fallback("id"),
        )
    }

    #[test]
    fn retrieve_without_attach_is_none() {
        let ext = Extensions::new();
        assert!(retrieve(&ext).is_none());
    }

    #[test]
    fn attach_overwrites_previous_value() {
        let mut ext = Extensions::new();
        attach(&mut ext, ctx(1));
        attach(&mut ext, ctx(4));
        assert_eq!(retrieve(&ext).map(|c| c.page()), Some(4));
    }

    #[test]
    fn plain_context_in_extensions_is_not_visible() {
        let mut ext = Extensions::new();
        ext.insert(ctx(7));
        assert!(retrieve(&ext).is_none());
    }
}
