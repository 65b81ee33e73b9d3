//! Process-wide tag registry.
//!
//! Module tags are collected once, at startup, into an immutable
//! [`TagRegistry`]. Every render context then attaches the registry's tags
//! (see [`crate::binder`]). The registry is `Send + Sync` and never changes
//! after it is built, so concurrent renders can share it freely.
//!
//! ```rust
//! use tagmark::registry::TagRegistry;
//! use tagmark::context::handler;
//!
//! let mut builder = TagRegistry::builder();
//! builder.register("gallery", handler(|b| b.expand()));
//! builder.register("gallery:count", handler(|_| Ok("3".to_string())));
//! let registry = builder.build();
//!
//! assert_eq!(registry.selectors(), vec!["gallery", "gallery:count"]);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::OnceCell;

use crate::context::TagHandler;

static INSTALLED: OnceCell<TagRegistry> = OnceCell::new();

/// Immutable selector to handler table.
#[derive(Clone, Default)]
pub struct TagRegistry {
    tags: BTreeMap<String, TagHandler>,
}

impl TagRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, selector: &str) -> Option<&TagHandler> {
        self.tags.get(selector)
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.tags.contains_key(selector)
    }

    /// Selectors in sorted order.
    pub fn selectors(&self) -> Vec<&str> {
        self.tags.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagHandler)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("tags", &self.selectors())
            .finish()
    }
}

/// Collects registrations before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
    tags: BTreeMap<String, TagHandler>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler. A later registration for the same selector wins.
    pub fn register(&mut self, selector: impl Into<String>, handler: TagHandler) {
        let selector = selector.into();
        if self.tags.insert(selector.clone(), handler).is_some() {
            tracing::debug!(%selector, "Tag registration overwritten");
        }
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.tags.contains_key(selector)
    }

    pub fn build(self) -> TagRegistry {
        TagRegistry { tags: self.tags }
    }
}

/// Builds the process-wide registry on first call.
///
/// Later calls return the registry built by the first one without running
/// `build` again.
pub fn install<F>(build: F) -> &'static TagRegistry
where
    F: FnOnce() -> TagRegistry,
{
    INSTALLED.get_or_init(build)
}

/// Fallible form of [`install`]. A failed build leaves nothing installed.
pub fn try_install<F, E>(build: F) -> Result<&'static TagRegistry, E>
where
    F: FnOnce() -> Result<TagRegistry, E>,
{
    INSTALLED.get_or_try_init(build)
}

/// The process-wide registry, if installed.
pub fn installed() -> Option<&'static TagRegistry> {
    INSTALLED.get()
}
