//! Prepares a context for rendering site templates.
//!
//! Binding happens in three steps, in this order:
//!
//! 1. module tags from the [`TagRegistry`]
//! 2. the built-in tags, which replace module tags of the same name
//! 3. the seeded globals: `vars`, `site_title`, `google_analytics`, `theme`,
//!    `theme_url`, `current_lang` and `menus`

use serde_json::{Map, Value};

use crate::context::Context;
use crate::registry::TagRegistry;
use crate::services::Services;
use crate::tags::builtin_tags;

/// Attaches every registry tag to the context.
pub fn bind_plugin_tags(ctx: &mut Context, registry: &TagRegistry) {
    for (selector, handler) in registry.iter() {
        ctx.define_tag(selector, handler.clone());
    }
}

/// Attaches the built-in tags.
pub fn bind_builtin_tags(ctx: &mut Context) {
    for (selector, handler) in builtin_tags() {
        ctx.define_tag(selector, handler);
    }
}

/// Seeds the globals every site template can rely on.
pub fn seed_globals(ctx: &mut Context) {
    let seeded = {
        let services = ctx.services();
        let setting = |key: &str| services.settings.setting(key).unwrap_or(Value::Null);
        let theme_url = format!(
            "{}{}",
            services.config.base_url(),
            services.theme.theme_path()
        );
        [
            ("vars", Value::Object(Map::new())),
            ("site_title", setting("site_title")),
            ("google_analytics", setting("google_analytics")),
            ("theme", Value::String(services.theme.theme())),
            ("theme_url", Value::String(theme_url)),
            (
                "current_lang",
                Value::String(services.settings.current_language()),
            ),
            ("menus", setting("menus")),
        ]
    };

    let globals = ctx.globals_mut();
    for (name, value) in seeded {
        globals.set(name, value);
    }
}

impl Context {
    /// A context with module tags, built-in tags and seeded globals.
    pub fn bound(services: Services, registry: &TagRegistry) -> Self {
        let mut ctx = Context::new(services);
        bind_plugin_tags(&mut ctx, registry);
        bind_builtin_tags(&mut ctx);
        seed_globals(&mut ctx);
        tracing::debug!(tags = ctx.selectors().len(), "Context bound");
        ctx
    }
}
