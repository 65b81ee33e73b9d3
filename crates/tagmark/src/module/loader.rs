//! Resolves installed modules into registry entries.

use std::path::{Path, PathBuf};

use super::{DeclarativeModule, InstalledModules, ModuleCatalog, TagModule};
use crate::error::LoadError;
use crate::registry::{RegistryBuilder, TagRegistry};

/// File holding a module's declared tags, inside the module folder.
pub const MODULE_TAGS_FILE: &str = "tags.yaml";

/// Loads the tags of installed modules.
///
/// For each module the loader tries, in order:
///
/// 1. a compiled module of the same name in the [`ModuleCatalog`]
/// 2. `<modules_dir>/<Folder>/tags.yaml`
///
/// A module found in neither place is skipped with a warning.
#[derive(Debug, Clone, Default)]
pub struct ModuleLoader {
    installed: InstalledModules,
    catalog: ModuleCatalog,
    modules_dir: Option<PathBuf>,
}

impl ModuleLoader {
    pub fn new(installed: InstalledModules) -> Self {
        Self {
            installed,
            ..Self::default()
        }
    }

    pub fn with_catalog(mut self, catalog: ModuleCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_modules_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.modules_dir = Some(dir.into());
        self
    }

    pub fn installed(&self) -> &InstalledModules {
        &self.installed
    }

    /// Registers the tags of one installed module.
    ///
    /// Returns `Ok(false)` when the module is not installed or has no tag
    /// definitions. Loading the same module twice registers the same
    /// handlers again.
    pub fn load(&self, name: &str, builder: &mut RegistryBuilder) -> Result<bool, LoadError> {
        let Some(folder) = self.installed.folder(name) else {
            tracing::debug!(module = name, "Module is not installed");
            return Ok(false);
        };
        let namespace = folder.to_lowercase();

        if let Some(module) = self.catalog.get(&namespace) {
            register(&namespace, module.as_ref(), builder);
            tracing::info!(module = %namespace, source = "compiled", "Module tags loaded");
            return Ok(true);
        }

        if let Some(path) = self.tags_file(folder) {
            let module = DeclarativeModule::from_file(namespace.clone(), &path)?;
            register(&namespace, &module, builder);
            tracing::info!(
                module = %namespace,
                path = %path.display(),
                "Module tags loaded"
            );
            return Ok(true);
        }

        tracing::warn!(module = folder, "Cannot find tag definitions for module {}", folder);
        Ok(false)
    }

    /// Registers every installed module, skipping the ones that fail.
    ///
    /// Returns the number of modules loaded. Fails only when a modules
    /// directory was given and does not exist.
    pub fn load_all(&self, builder: &mut RegistryBuilder) -> Result<usize, LoadError> {
        if let Some(dir) = &self.modules_dir {
            if !dir.is_dir() {
                return Err(LoadError::DirectoryNotFound { path: dir.clone() });
            }
        }

        let mut loaded = 0;
        for (namespace, _) in self.installed.iter() {
            match self.load(namespace, builder) {
                Ok(true) => loaded += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!(module = namespace, error = %e, "Module skipped"),
            }
        }
        Ok(loaded)
    }

    /// Builds a registry holding the tags of every installed module.
    pub fn build_registry(&self) -> Result<TagRegistry, LoadError> {
        let mut builder = TagRegistry::builder();
        self.load_all(&mut builder)?;
        Ok(builder.build())
    }

    fn tags_file(&self, folder: &str) -> Option<PathBuf> {
        let dir: &Path = self.modules_dir.as_deref()?;
        let path = dir.join(folder).join(MODULE_TAGS_FILE);
        path.is_file().then_some(path)
    }
}

fn register(namespace: &str, module: &dyn TagModule, builder: &mut RegistryBuilder) {
    builder.register(namespace, module.index());
    for (method, handler) in module.tags() {
        builder.register(format!("{}:{}", namespace, method), handler);
    }
}
