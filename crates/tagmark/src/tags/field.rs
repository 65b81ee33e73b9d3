//! `<ion:field from="page" name="title" />`

use crate::context::Binding;
use crate::error::TagResult;
use crate::field::{resolve_field, FieldOrder};
use crate::format::{enclose, format_date};
use crate::value::to_text;

/// Renders one field of a local record.
///
/// The extended value wins over the core one unless `core="true"`. With a
/// `format` attribute the value is formatted as a date. Missing records and
/// fields render nothing.
pub fn field(b: &mut Binding<'_>) -> TagResult {
    let order = match b.attr("core") {
        Some("true" | "1") => FieldOrder::CoreOnly,
        _ => FieldOrder::ExtendedFirst,
    };

    let value = {
        let (Some(from), Some(name)) = (b.attr("from"), b.attr_non_empty("name")) else {
            return Ok(String::new());
        };
        let Some(record) = b.locals().record(from) else {
            return Ok(String::new());
        };
        let prefix = &b.options().extend_field_prefix;
        match resolve_field(record, name, prefix, order) {
            Some(hit) => to_text(hit.value),
            None => return Ok(String::new()),
        }
    };

    let value = if b.attr_non_empty("format").is_some() {
        format_date(b, &value)?
    } else {
        value
    };
    Ok(enclose(b, &value))
}

#[cfg(test)]
mod tests {
    use crate::test_support::render_page;
    use serde_json::json;

    fn page() -> serde_json::Value {
        json!({
            "title": "Core title",
            "ion_title": "Extended title",
            "subtitle": "Core only",
            "ion_empty": "",
            "empty": "",
            "ion_date": "2024-03-05 14:07:09",
            "created": "not a date",
            "views": 12,
        })
    }

    #[test]
    fn extended_value_wins() {
        assert_eq!(
            render_page(r#"<ion:field from="page" name="title"/>"#, page()),
            "Extended title"
        );
    }

    #[test]
    fn core_fallback() {
        assert_eq!(
            render_page(r#"<ion:field from="page" name="subtitle"/>"#, page()),
            "Core only"
        );
    }

    #[test]
    fn force_core() {
        assert_eq!(
            render_page(r#"<ion:field from="page" name="title" core="true"/>"#, page()),
            "Core title"
        );
    }

    #[test]
    fn missing_data_is_empty() {
        assert_eq!(render_page(r#"<ion:field from="page" name="empty"/>"#, page()), "");
        assert_eq!(render_page(r#"<ion:field from="page" name="nope"/>"#, page()), "");
        assert_eq!(render_page(r#"<ion:field from="article" name="title"/>"#, page()), "");
        assert_eq!(render_page(r#"<ion:field from="page"/>"#, page()), "");
    }

    #[test]
    fn numbers_are_stringified() {
        assert_eq!(render_page(r#"<ion:field from="page" name="views"/>"#, page()), "12");
    }

    #[test]
    fn enclosed() {
        assert_eq!(
            render_page(r#"<ion:field from="page" name="subtitle" tag="h2" class="sub"/>"#, page()),
            "<h2 class=\"sub\">Core only</h2>"
        );
    }

    #[test]
    fn date_format() {
        assert_eq!(
            render_page(r#"<ion:field from="page" name="date" format="d/m/Y"/>"#, page()),
            "05/03/2024"
        );
    }

    #[test]
    fn translated_date_name() {
        // 2024-03-05 is a Tuesday; the fixture table translates it
        assert_eq!(
            render_page(r#"<ion:field from="page" name="date" format="l"/>"#, page()),
            "Mardi"
        );
    }

    #[test]
    fn unparseable_date_renders_body() {
        assert_eq!(
            render_page(
                r#"<ion:field from="page" name="created" format="Y">unknown date</ion:field>"#,
                page()
            ),
            "unknown date"
        );
    }
}
