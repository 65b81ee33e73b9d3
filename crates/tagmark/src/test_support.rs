//! Fixtures shared by the unit tests.

use std::sync::Arc;

use serde_json::Value;

use crate::context::Context;
use crate::registry::TagRegistry;
use crate::services::{MemoryTheme, MemoryTranslations, Services, SiteConfig, WidgetRegistry};
use crate::value::Scope;

pub const SITE: &str = r#"
base_url: http://example.com/
theme: pagoda
languages:
  current: en
  default: en
  online: [en, fr]
settings:
  site_title: Demo Site
  google_analytics: UA-0000
  meta_keywords: cms, demo
  meta_description: A demo site
config:
  charset: UTF-8
menus:
  - name: main
"#;

fn theme() -> MemoryTheme {
    MemoryTheme::new("pagoda")
        .with_view("header", "<h1><ion:site_title/></h1>")
        .with_view("page_title", r#"<title><ion:field from="page" name="title"/></title>"#)
        .with_view("loop", r#"<ion:partial view="loop"/>"#)
}

fn translations() -> MemoryTranslations {
    MemoryTranslations::new()
        .with_line("en", "hello", "Hello")
        .with_line("en", "visit", "Visit www.example.com")
        .with_line("en", "blank", "")
        .with_line("en", "tuesday", "Mardi")
        .with_file("en", "forms", [("required", "Required")])
        .with_file("en", "pagoda", [("theme_term", "From theme")])
        .with_file("en", "markup", [("evil", "</script><b>A & B</b>")])
}

fn widgets() -> WidgetRegistry {
    WidgetRegistry::new().with("echo", |args: &[String]| Ok(format!("echo({})", args.join(","))))
}

/// Services over the given site file with the fixture theme, translations
/// and widgets.
pub fn services_with_site(yaml: &str) -> Services {
    let site = Arc::new(SiteConfig::from_yaml(yaml).expect("fixture site parses"));
    Services::new(site, Arc::new(theme()))
        .with_translations(Arc::new(translations()))
        .with_widgets(Arc::new(widgets()))
}

pub fn services() -> Services {
    services_with_site(SITE)
}

/// A bound context without module tags.
pub fn context() -> Context {
    Context::bound(services(), &TagRegistry::default())
}

pub fn render(template: &str) -> String {
    context().render(template).expect("template renders")
}

/// Renders with `page` set as a local.
pub fn render_page(template: &str, page: Value) -> String {
    let locals = Scope::new().with("page", page);
    context()
        .render_with_locals(template, &locals)
        .expect("template renders")
}
