//! Site settings, configuration items and page metadata.

use crate::context::Binding;
use crate::error::TagResult;
use crate::format::enclose;
use crate::value::{is_empty, to_text};

/// `<ion:config item="charset" />`
pub fn config(b: &mut Binding<'_>) -> TagResult {
    Ok(b.attr("item")
        .and_then(|item| b.services().config.item(item))
        .map(|v| to_text(&v))
        .unwrap_or_default())
}

/// `<ion:setting item="site_title" />`
pub fn setting(b: &mut Binding<'_>) -> TagResult {
    Ok(setting_text(b, b.attr("item").unwrap_or_default()).unwrap_or_default())
}

/// `<ion:base_url lang="true" />`
///
/// The base URL, followed by the current language code when more than one
/// language is online and either `lang="true"` is set and the current
/// language is not the default, or `force_lang` is present.
pub fn base_url(b: &mut Binding<'_>) -> TagResult {
    let services = b.services();
    let base = services.config.base_url();
    let force_lang = b.has_attr("force_lang");
    let wants_lang = force_lang || b.attr("lang") == Some("true");

    if wants_lang && services.settings.online_languages().len() > 1 {
        let current = services.settings.current_language();
        if force_lang || current != services.settings.default_language() {
            return Ok(format!("{}{}/", base, current));
        }
    }
    Ok(base)
}

/// `<ion:name />` renders the current page name; `use_global` reads the
/// global `page` instead of the local one.
pub fn name(b: &mut Binding<'_>) -> TagResult {
    let page = if b.has_attr("use_global") {
        b.globals().record("page")
    } else {
        b.locals().record("page")
    };
    Ok(page
        .and_then(|p| p.get("name"))
        .map(to_text)
        .unwrap_or_default())
}

/// `<ion:site_title />`: the page's own title override, else the site setting.
pub fn site_title(b: &mut Binding<'_>) -> TagResult {
    let title = page_or_setting(b, "site_title");
    Ok(enclose(b, &title))
}

pub fn meta_keywords(b: &mut Binding<'_>) -> TagResult {
    Ok(page_or_setting(b, "meta_keywords"))
}

pub fn meta_description(b: &mut Binding<'_>) -> TagResult {
    Ok(page_or_setting(b, "meta_description"))
}

fn setting_text(b: &Binding<'_>, key: &str) -> Option<String> {
    b.services()
        .settings
        .setting(key)
        .filter(|v| !is_empty(v))
        .map(|v| to_text(&v))
}

fn page_or_setting(b: &Binding<'_>, key: &str) -> String {
    b.locals()
        .record("page")
        .and_then(|page| page.get(key))
        .filter(|v| !is_empty(v))
        .map(to_text)
        .or_else(|| setting_text(b, key))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use crate::services::SettingsStore;
    use crate::test_support::{context, render, render_page, services_with_site};
    use crate::Context;
    use serde_json::json;

    #[test]
    fn config_and_setting() {
        assert_eq!(render(r#"<ion:config item="charset"/>"#), "UTF-8");
        assert_eq!(render(r#"<ion:setting item="site_title"/>"#), "Demo Site");
        assert_eq!(render(r#"[<ion:setting item="nope"/><ion:config item="nope"/><ion:setting/>]"#), "[]");
    }

    mod base_url {
        use super::*;

        #[test]
        fn plain() {
            assert_eq!(render("<ion:base_url/>"), "http://example.com/");
        }

        #[test]
        fn lang_on_default_language_is_bare() {
            assert_eq!(render(r#"<ion:base_url lang="true"/>"#), "http://example.com/");
        }

        #[test]
        fn lang_on_other_language_adds_code() {
            let mut ctx = context();
            ctx.services().settings.set_current_language("fr");
            assert_eq!(
                ctx.render(r#"<ion:base_url lang="true"/>"#).unwrap(),
                "http://example.com/fr/"
            );
        }

        #[test]
        fn force_lang_always_adds_code() {
            assert_eq!(render("<ion:base_url force_lang/>"), "http://example.com/en/");
        }

        #[test]
        fn single_language_never_adds_code() {
            let services = services_with_site(
                "base_url: http://solo.org/\nlanguages: {current: de, default: en, online: [de]}\n",
            );
            let mut ctx = Context::bound(services, &Default::default());
            assert_eq!(
                ctx.render(r#"<ion:base_url lang="true"/><ion:base_url force_lang/>"#).unwrap(),
                "http://solo.org/http://solo.org/"
            );
        }
    }

    #[test]
    fn name_local_and_global() {
        let mut ctx = context();
        ctx.globals_mut().set("page", json!({"name": "global-home"}));
        let locals = crate::Scope::new().with("page", json!({"name": "local-page"}));
        assert_eq!(
            ctx.render_with_locals("<ion:name/>|<ion:name use_global/>", &locals).unwrap(),
            "local-page|global-home"
        );
    }

    #[test]
    fn site_title_prefers_page() {
        assert_eq!(render("<ion:site_title/>"), "Demo Site");
        assert_eq!(
            render_page(r#"<ion:site_title tag="span"/>"#, json!({"site_title": "Page title"})),
            "<span>Page title</span>"
        );
    }

    #[test]
    fn meta_fallbacks() {
        assert_eq!(render("<ion:meta_keywords/>"), "cms, demo");
        assert_eq!(
            render_page("<ion:meta_keywords/>", json!({"meta_keywords": "local"})),
            "local"
        );
        assert_eq!(
            render_page("<ion:meta_description/>", json!({"meta_description": ""})),
            "A demo site"
        );
    }
}
