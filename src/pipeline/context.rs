//! Per-page inputs handed to the transformer.
//!
//! Every field is optional. A pass that needs one checks it right before
//! use and skips only the behaviour that depends on it.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::mdast::Node;

/// `(target_url, current_page_id) -> url`
pub type RelativeUrlFn = dyn Fn(&str, &str) -> String + Send + Sync;
/// Parses raw YAML into a JSON value.
pub type ParseYamlFn = dyn Fn(&str) -> Result<Value> + Send + Sync;
/// Renders an embedded component (or whole tree) to static markup.
pub type RenderMarkupFn = dyn Fn(&Node) -> String + Send + Sync;
/// Reads a value from the shared store.
pub type StoreGetFn = dyn Fn(&str) -> Option<Value> + Send + Sync;
/// Writes a value into the shared store.
pub type StoreSetFn = dyn Fn(&str, Value) + Send + Sync;

/// Registry of all known pages, keyed by page identifier.
pub type PageRegistry = FxHashMap<String, Value>;

/// Getter/setter pair for the pipeline's shared store.
#[derive(Clone)]
pub struct Store {
    pub get: Arc<StoreGetFn>,
    pub set: Arc<StoreSetFn>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Store { .. }")
    }
}

/// Page identity and collaborators for one transformer.
#[derive(Clone, Default)]
pub struct PageContext {
    /// Identifier of the current page.
    pub id: Option<String>,
    /// Relative path to the current content file.
    pub self_path: Option<PathBuf>,
    /// True in docs context only.
    pub is_docs: bool,
    /// Identifiers of every ancestor page, outermost first.
    pub parents: Vec<String>,
    pub pages: Option<Arc<PageRegistry>>,
    pub store: Option<Store>,
    /// Nested site structure.
    pub nav: Option<Arc<Value>>,
    pub relative_url: Option<Arc<RelativeUrlFn>>,
    pub parse_yaml: Option<Arc<ParseYamlFn>>,
    pub render_markup: Option<Arc<RenderMarkupFn>>,
    /// Value set globally for the whole site.
    pub global_prop: Option<Value>,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_self_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.self_path = Some(path.into());
        self
    }

    pub fn with_docs(mut self, is_docs: bool) -> Self {
        self.is_docs = is_docs;
        self
    }

    pub fn with_parents(mut self, parents: Vec<String>) -> Self {
        self.parents = parents;
        self
    }

    pub fn with_pages(mut self, pages: PageRegistry) -> Self {
        self.pages = Some(Arc::new(pages));
        self
    }

    pub fn with_store<G, S>(mut self, get: G, set: S) -> Self
    where
        G: Fn(&str) -> Option<Value> + Send + Sync + 'static,
        S: Fn(&str, Value) + Send + Sync + 'static,
    {
        self.store = Some(Store {
            get: Arc::new(get),
            set: Arc::new(set),
        });
        self
    }

    pub fn with_nav(mut self, nav: Value) -> Self {
        self.nav = Some(Arc::new(nav));
        self
    }

    pub fn with_relative_url<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.relative_url = Some(Arc::new(f));
        self
    }

    pub fn with_parse_yaml<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        self.parse_yaml = Some(Arc::new(f));
        self
    }

    pub fn with_render_markup<F>(mut self, f: F) -> Self
    where
        F: Fn(&Node) -> String + Send + Sync + 'static,
    {
        self.render_markup = Some(Arc::new(f));
        self
    }

    pub fn with_global_prop(mut self, value: Value) -> Self {
        self.global_prop = Some(value);
        self
    }

    /// Current page id, treating an empty string as unknown.
    pub fn page_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Relativize `url` for the current page, if both the function and the
    /// page id are available.
    pub fn relativize(&self, url: &str) -> Option<String> {
        let f = self.relative_url.as_ref()?;
        let id = self.page_id()?;
        Some(f(url, id))
    }
}

impl fmt::Debug for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageContext")
            .field("id", &self.id)
            .field("self_path", &self.self_path)
            .field("is_docs", &self.is_docs)
            .field("parents", &self.parents)
            .field("pages", &self.pages.as_ref().map(|p| p.len()))
            .field("store", &self.store.is_some())
            .field("nav", &self.nav.is_some())
            .field("relative_url", &self.relative_url.is_some())
            .field("parse_yaml", &self.parse_yaml.is_some())
            .field("render_markup", &self.render_markup.is_some())
            .field("global_prop", &self.global_prop)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_inert() {
        let ctx = PageContext::default();
        assert!(ctx.page_id().is_none());
        assert!(ctx.relativize("/a").is_none());
        assert!(ctx.parents.is_empty());
        assert!(!ctx.is_docs);
    }

    #[test]
    fn test_relativize_requires_function_and_id() {
        let only_fn = PageContext::new().with_relative_url(|u, id| format!("{u}@{id}"));
        assert!(only_fn.relativize("/a").is_none());

        let only_id = PageContext::new().with_id("home");
        assert!(only_id.relativize("/a").is_none());

        let both = only_fn.with_id("home");
        assert_eq!(both.relativize("/a").as_deref(), Some("/a@home"));
    }

    #[test]
    fn test_empty_id_is_unknown() {
        let ctx = PageContext::new()
            .with_id("")
            .with_relative_url(|u, _| u.to_string());
        assert!(ctx.relativize("/a").is_none());
    }

    #[test]
    fn test_store_roundtrip() {
        use parking_lot::Mutex;

        let cell = Arc::new(Mutex::new(None::<Value>));
        let (get_cell, set_cell) = (cell.clone(), cell.clone());
        let ctx = PageContext::new().with_store(
            move |_| get_cell.lock().clone(),
            move |_, v| *set_cell.lock() = Some(v),
        );

        let store = ctx.store.as_ref().unwrap();
        (store.set)("k", json!(1));
        assert_eq!((store.get)("k"), Some(json!(1)));
    }

    #[test]
    fn test_debug_hides_closures() {
        let ctx = PageContext::new().with_id("a").with_parse_yaml(|_| Ok(Value::Null));
        let out = format!("{ctx:?}");
        assert!(out.contains("parse_yaml: true"));
        assert!(out.contains("relative_url: false"));
    }
}
