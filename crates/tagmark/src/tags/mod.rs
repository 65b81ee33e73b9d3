//! Built-in tag handlers.
//!
//! | Tag | Attributes | Renders |
//! |-----|------------|---------|
//! | `field` | `from`, `name`, `format`, `core` | a record field, extended value first |
//! | `set` / `get` | `var`, `value` | writes / reads a global |
//! | `if` / `else` | `condition` | body when the condition holds / when the `if` failed |
//! | `partial` | `view` or `path`, `php` | a theme view as nested markup |
//! | `widget` | `name`, positional attributes | widget output |
//! | `translation` | `item` or `term` | the translated term, or `#term` |
//! | `jslang` | `object`, `files`, `framework` | a script with language terms |
//! | `config` / `setting` | `item` | a configuration item / site setting |
//! | `base_url` | `lang`, `force_lang` | the site URL, with language code when asked |
//! | `name` | `use_global` | the page name |
//! | `site_title`, `meta_keywords`, `meta_description` | | page value, else site setting |
//! | `time` | | a cache-busting token |
//! | `debug` | `name` | a dump of a local value |
//! | `php` | body | the body as a MiniJinja template (`raw-tag` feature only) |

pub mod conditional;
pub mod field;
pub mod misc;
pub mod partial;
pub mod settings;
pub mod translation;
pub mod vars;

use crate::context::{handler, TagHandler};

/// The built-in selector table.
pub fn builtin_tags() -> Vec<(&'static str, TagHandler)> {
    #[allow(unused_mut)]
    let mut tags: Vec<(&'static str, TagHandler)> = vec![
        ("field", handler(field::field)),
        ("set", handler(vars::set)),
        ("get", handler(vars::get)),
        ("if", handler(conditional::if_tag)),
        ("else", handler(conditional::else_tag)),
        ("partial", handler(partial::partial)),
        ("widget", handler(partial::widget)),
        ("translation", handler(translation::translation)),
        ("jslang", handler(translation::jslang)),
        ("config", handler(settings::config)),
        ("setting", handler(settings::setting)),
        ("base_url", handler(settings::base_url)),
        ("name", handler(settings::name)),
        ("site_title", handler(settings::site_title)),
        ("meta_keywords", handler(settings::meta_keywords)),
        ("meta_description", handler(settings::meta_description)),
        ("time", handler(misc::time)),
        ("debug", handler(misc::debug)),
    ];

    #[cfg(feature = "raw-tag")]
    tags.push(("php", handler(misc::raw)));

    tags
}
