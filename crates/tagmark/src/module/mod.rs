//! Tag modules.
//!
//! A module contributes a family of tags named after it: `<ion:gallery>` for
//! its index and `<ion:gallery:photos>` for each of its methods. Modules come
//! from two places:
//!
//! - compiled in, as a [`TagModule`] registered in a [`ModuleCatalog`]
//! - declared on disk, as a `tags.yaml` file in the module's folder (see
//!   [`DeclarativeModule`])
//!
//! [`ModuleLoader`] resolves the site's [`InstalledModules`] against both
//! sources and registers the result into a
//! [`RegistryBuilder`](crate::registry::RegistryBuilder).

mod declarative;
mod loader;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::context::{handler, TagHandler};

pub use declarative::DeclarativeModule;
pub use loader::ModuleLoader;

/// A named family of tags.
pub trait TagModule: Send + Sync {
    /// Module name; tags are registered under its lower-cased form.
    fn name(&self) -> &str;

    /// Method tags as `(method, handler)` pairs.
    fn tags(&self) -> Vec<(String, TagHandler)>;

    /// Handler for the bare `<ion:module>` tag. Renders the body by default.
    fn index(&self) -> TagHandler {
        handler(|b| b.expand())
    }
}

/// Compiled-in modules keyed by lower-cased name.
#[derive(Clone, Default)]
pub struct ModuleCatalog {
    modules: HashMap<String, Arc<dyn TagModule>>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module, replacing any module with the same name.
    pub fn register<M: TagModule + 'static>(&mut self, module: M) {
        self.modules
            .insert(module.name().to_lowercase(), Arc::new(module));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<M: TagModule + 'static>(mut self, module: M) -> Self {
        self.register(module);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn TagModule>> {
        self.modules.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl fmt::Debug for ModuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ModuleCatalog")
            .field("modules", &names)
            .finish()
    }
}

/// The modules a site has installed, keyed by lower-cased folder name.
///
/// The key is the tag namespace: a module in folder `Gallery` provides
/// `<ion:gallery>` and `<ion:gallery:*>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledModules {
    folders: BTreeMap<String, String>,
}

impl InstalledModules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module by folder.
    pub fn insert(&mut self, folder: &str) {
        self.folders.insert(folder.to_lowercase(), folder.to_string());
    }

    /// Folder of an installed module, looked up by its tag namespace.
    pub fn folder(&self, key: &str) -> Option<&str> {
        self.folders.get(&key.to_lowercase()).map(String::as_str)
    }

    /// `(namespace, folder)` pairs in namespace order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.folders.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for InstalledModules {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut modules = Self::new();
        for folder in iter {
            modules.insert(folder);
        }
        modules
    }
}
