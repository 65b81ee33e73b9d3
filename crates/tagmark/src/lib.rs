//! # Tagmark - Template Tag Dispatcher
//!
//! `tagmark` renders CMS page templates written with namespaced tags such as
//! `<ion:field from="page" name="title"/>` or
//! `<ion:if condition="page:online == 1">...</ion:if>`. Every tag is dispatched
//! to a handler that sees the tag's attributes, its body, a local scope, the
//! render-wide globals and the site's services (settings, theme, views,
//! widgets, translations).
//!
//! ## Core Concepts
//!
//! - [`Context`]: one render pass with its tag table and globals
//! - [`Binding`]: a handler's view of one tag invocation
//! - [`Services`]: the collaborators a site provides
//! - [`TagRegistry`]: module tags, built once per process
//! - [`ModuleLoader`]: turns installed modules into registry entries
//! - [`Condition`]: the `if` tag's `left op right` expressions
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use tagmark::{Context, Scope, Services, TagRegistry};
//! use tagmark::services::{MemoryTheme, SiteConfig};
//!
//! let site = SiteConfig::from_yaml(r#"
//! base_url: https://example.com/
//! theme: pagoda
//! settings:
//!   site_title: My Site
//! "#).unwrap();
//! let theme = MemoryTheme::new("pagoda");
//! let services = Services::new(Arc::new(site), Arc::new(theme));
//!
//! let mut ctx = Context::bound(services, &TagRegistry::default());
//! let page = Scope::new().with("page", json!({"title": "Home", "online": 1}));
//!
//! let out = ctx.render_with_locals(
//!     r#"<ion:site_title/>: <ion:if condition="page:online == 1"><ion:field from="page" name="title"/></ion:if>"#,
//!     &page,
//! ).unwrap();
//! assert_eq!(out, "My Site: Home");
//! ```
//!
//! ## Custom Tags
//!
//! ```rust
//! use std::sync::Arc;
//! use tagmark::{handler, Context, Services, TagRegistry};
//! use tagmark::services::{MemoryTheme, SiteConfig};
//!
//! let mut builder = TagRegistry::builder();
//! builder.register("gallery:count", handler(|b| {
//!     Ok(b.attr("of").unwrap_or("0").to_string())
//! }));
//! let registry = builder.build();
//!
//! let site = Arc::new(SiteConfig::from_yaml("theme: demo").unwrap());
//! let services = Services::new(site, Arc::new(MemoryTheme::new("demo")));
//! let mut ctx = Context::bound(services, &registry);
//! assert_eq!(ctx.render(r#"<ion:gallery:count of="4"/>"#).unwrap(), "4");
//! ```

pub mod binder;
pub mod condition;
pub mod context;
mod error;
pub mod field;
pub mod format;
pub mod module;
pub mod options;
pub mod pages;
pub mod registry;
pub mod services;
pub mod tags;
pub mod value;

#[cfg(test)]
mod test_support;

// Error types
pub use error::{LoadError, RenderError, TagError, TagResult};

// Render context
pub use context::{handler, Binding, Context, TagHandler};
pub use options::{TagOptions, UnknownTagBehavior, DEFAULT_ERROR_TEMPLATE, DEFAULT_MAX_DEPTH};
pub use value::{Globals, Scope};

// Registry and modules
pub use module::{DeclarativeModule, InstalledModules, ModuleCatalog, ModuleLoader, TagModule};
pub use registry::{RegistryBuilder, TagRegistry};

// Conditions, fields and pages
pub use condition::{Condition, ConditionError, Op};
pub use field::{resolve_field, FieldLookup, FieldOrder, FieldTier, DEFAULT_EXTEND_PREFIX};
pub use pages::{current_page, home_page, page_by_url};

pub use services::Services;

// Re-export parser types used in handler signatures
pub use tagmark_parser::{Attributes, Node, TagNode, TagParser};
