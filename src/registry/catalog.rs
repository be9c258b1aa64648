//! Process-wide catalog of statically linked analyzer entry points.
//!
//! Rust offers no safe ambient reflection over dynamic libraries, so plugin
//! crates linked into the host register their entry points here explicitly
//! (typically from a `#[ctor]`-free init function the host calls at
//! startup). Plugin manifests discovered on disk then refer to these
//! entries by symbol name.
//!
//! The catalog also holds the optional [`Frontend`] provider: the compiler
//! front-end is an external collaborator and is installed the same way.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use futures::future::BoxFuture;
use once_cell::sync::Lazy;

use crate::context::{AnalysisContext, ContextKind, Frontend};
use crate::diagnostics::Message;

/// The callable shape every analyzer is normalized to.
pub type AnalyzerFn =
    Arc<dyn Fn(&AnalysisContext) -> anyhow::Result<Vec<Message>> + Send + Sync>;

/// One registered entry point.
#[derive(Clone)]
pub struct CatalogEntry {
    pub symbol: String,
    pub kind: ContextKind,
    pub callable: AnalyzerFn,
}

static ENTRIES: Lazy<RwLock<HashMap<String, CatalogEntry>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

static FRONTEND: Lazy<RwLock<Option<Arc<dyn Frontend>>>> = Lazy::new(|| RwLock::new(None));

/// Register a synchronous analyzer entry point.
///
/// Re-registering a symbol overwrites the previous entry.
pub fn register<F>(symbol: &str, kind: ContextKind, callable: F)
where
    F: Fn(&AnalysisContext) -> anyhow::Result<Vec<Message>> + Send + Sync + 'static,
{
    let entry = CatalogEntry {
        symbol: symbol.to_string(),
        kind,
        callable: Arc::new(callable),
    };
    ENTRIES
        .write()
        .expect("catalog lock poisoned")
        .insert(symbol.to_string(), entry);
}

/// Register an asynchronous analyzer entry point.
///
/// The future-returning shape is normalized to the synchronous callable at
/// registration time; the engine only ever sees the sync shape.
pub fn register_async<F>(symbol: &str, kind: ContextKind, callable: F)
where
    F: for<'a> Fn(&'a AnalysisContext) -> BoxFuture<'a, anyhow::Result<Vec<Message>>>
        + Send
        + Sync
        + 'static,
{
    register(symbol, kind, move |ctx| {
        futures::executor::block_on(callable(ctx))
    });
}

/// Look up an entry point by symbol.
pub fn resolve(symbol: &str) -> Option<CatalogEntry> {
    ENTRIES
        .read()
        .expect("catalog lock poisoned")
        .get(symbol)
        .cloned()
}

/// Number of registered entry points.
pub fn len() -> usize {
    ENTRIES.read().expect("catalog lock poisoned").len()
}

/// Whether the catalog has no entry points.
pub fn is_empty() -> bool {
    len() == 0
}

/// Install the compiler front-end the host should use.
pub fn set_frontend(frontend: Arc<dyn Frontend>) {
    *FRONTEND.write().expect("catalog lock poisoned") = Some(frontend);
}

/// The installed front-end, if any.
pub fn frontend() -> Option<Arc<dyn Frontend>> {
    FRONTEND.read().expect("catalog lock poisoned").clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        register("catalog_test_entry", ContextKind::Cli, |_ctx| Ok(Vec::new()));
        let entry = resolve("catalog_test_entry").expect("entry should resolve");
        assert_eq!(entry.kind, ContextKind::Cli);
        assert!(resolve("catalog_test_missing").is_none());
    }

    #[test]
    fn test_async_entry_is_normalized() {
        register_async("catalog_test_async", ContextKind::Editor, |_ctx| {
            Box::pin(async { Ok(Vec::new()) })
        });
        let entry = resolve("catalog_test_async").expect("entry should resolve");
        let ctx = AnalysisContext::partial("a.src", None, Default::default());
        let messages = (entry.callable)(&ctx).expect("async entry should succeed");
        assert!(messages.is_empty());
    }
}
