//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tagmark::services::{MemoryTheme, MemoryTranslations, SiteConfig};
use tagmark::{Context, Scope, Services, TagRegistry};

pub const SITE: &str = r#"
base_url: http://example.com/
theme: pagoda
languages:
  current: en
  default: en
  online: [en, fr]
settings:
  site_title: Demo Site
"#;

pub fn memory_services() -> Services {
    let site = Arc::new(SiteConfig::from_yaml(SITE).unwrap());
    let translations = MemoryTranslations::new().with_line("en", "hello", "Hello");
    Services::new(site, Arc::new(MemoryTheme::new("pagoda")))
        .with_translations(Arc::new(translations))
}

pub fn context() -> Context {
    Context::bound(memory_services(), &TagRegistry::default())
}

pub fn render(template: &str) -> String {
    context().render(template).unwrap()
}

pub fn render_page(template: &str, page: Value) -> String {
    context()
        .render_with_locals(template, &Scope::new().with("page", page))
        .unwrap()
}

/// Writes `content` at `root/rel`, creating parent directories.
pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
