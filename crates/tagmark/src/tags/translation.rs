//! Translated terms and client-side language tables.

use serde_json::{Map, Value};

use crate::context::Binding;
use crate::error::TagResult;
use crate::format::auto_link;

/// `<ion:translation term="hello" />`
///
/// Renders the term from the active language table with its URLs and
/// e-mail addresses linked. An untranslated term renders as `#term`.
pub fn translation(b: &mut Binding<'_>) -> TagResult {
    let Some(term) = b.attr("item").or_else(|| b.attr("term")) else {
        return Ok(String::new());
    };

    match b.services().translate(term).filter(|text| !text.is_empty()) {
        Some(text) => Ok(auto_link(&text)),
        None => Ok(format!("#{}", term)),
    }
}

/// `<ion:jslang object="Lang" files="site,forms" framework="jQuery" />`
///
/// Emits a script defining a JavaScript object with the merged terms of the
/// listed language files, plus `get` / `set` accessors for the framework. The
/// theme's own file is always included.
pub fn jslang(b: &mut Binding<'_>) -> TagResult {
    let services = b.services();
    let object = b.attr_non_empty("object").unwrap_or("Lang");
    let framework = b.attr_non_empty("framework").unwrap_or("jQuery");
    let theme = services.theme.theme();

    let mut files: Vec<String> = match b.attr_non_empty("files") {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    };
    if !files.contains(&theme) {
        files.push(theme);
    }

    let lang = services.settings.current_language();
    let mut terms = Map::new();
    if !lang.is_empty() {
        for file in &files {
            terms.extend(services.translations.load_file(&lang, file));
        }
    }

    let mut js = format!("var {} = {};", object, script_json(&Value::Object(terms)));
    js.push_str(&accessors(framework, object));
    Ok(format!("<script type=\"text/javascript\">{}</script>", js))
}

/// Serializes `value` for inline use in a `<script>` element.
///
/// `<`, `>` and `&` only occur inside JSON strings, where their `\u` escapes
/// decode to the same characters.
fn script_json(value: &Value) -> String {
    value
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

fn accessors(framework: &str, object: &str) -> String {
    match framework {
        "jQuery" => format!(
            "{0}.get = function (key) {{ return this[key]; }};{0}.set = function (key, value) {{ this[key] = value; }};",
            object
        ),
        "mootools" => format!(
            "Object.append({}, {{get: function (key) {{ return this[key]; }}, set: function (key, value) {{ this[key] = value; }}}});",
            object
        ),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::render;

    #[test]
    fn known_term_is_autolinked() {
        assert_eq!(
            render(r#"<ion:translation term="visit"/>"#),
            "Visit <a href=\"http://www.example.com\" target=\"_blank\">www.example.com</a>"
        );
    }

    #[test]
    fn item_takes_precedence() {
        assert_eq!(render(r#"<ion:translation item="hello" term="visit"/>"#), "Hello");
    }

    #[test]
    fn missing_term_is_marked() {
        assert_eq!(render(r#"<ion:translation term="hello_world"/>"#), "#hello_world");
    }

    #[test]
    fn empty_translation_is_marked() {
        assert_eq!(render(r#"<ion:translation term="blank"/>"#), "#blank");
    }

    #[test]
    fn no_attribute_renders_nothing() {
        assert_eq!(render(r#"[<ion:translation/>]"#), "[]");
    }

    #[test]
    fn jslang_jquery() {
        let out = render(r#"<ion:jslang files="forms"/>"#);
        assert!(out.starts_with("<script type=\"text/javascript\">var Lang = {"));
        assert!(out.contains("\"required\":\"Required\""));
        assert!(out.contains("\"theme_term\":\"From theme\""));
        assert!(out.contains("Lang.get = function"));
        assert!(out.ends_with("</script>"));
    }

    #[test]
    fn jslang_object_and_mootools() {
        let out = render(r#"<ion:jslang object="T" framework="mootools"/>"#);
        assert!(out.contains("var T = {\"theme_term\":\"From theme\"};"));
        assert!(out.contains("Object.append(T, {get:"));
    }

    #[test]
    fn jslang_escapes_markup_in_terms() {
        let out = render(r#"<ion:jslang files="markup"/>"#);
        assert_eq!(out.matches("</script>").count(), 1);
        assert!(out.contains(
            r#""evil":"\u003c/script\u003e\u003cb\u003eA \u0026 B\u003c/b\u003e""#
        ));
    }

    #[test]
    fn jslang_unknown_framework_has_no_accessors() {
        let out = render(r#"<ion:jslang framework="none"/>"#);
        assert!(!out.contains(".get"));
        assert!(!out.contains("Object.append"));
    }
}
