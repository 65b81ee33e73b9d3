use crate::context::Binding;
use crate::field::{resolve_field, FieldOrder};
use crate::format::show_tag_error;
use crate::value::{is_empty_text, to_text};

/// Resolves an attribute that may reference a record field.
///
/// `class="page:css_class"` reads field `css_class` of the local `page`
/// record (core field first, then the extended one). A value without a colon
/// is returned as written. Returns `None` when the attribute is missing or
/// empty, or when the referenced field has no value.
pub fn get_attribute(binding: &Binding<'_>, attr: &str) -> Option<String> {
    let raw = binding.attr_non_empty(attr)?;
    let Some((scope, field)) = raw.split_once(':') else {
        return Some(raw.to_string());
    };

    let record = binding.locals().record(scope)?;
    let prefix = &binding.options().extend_field_prefix;
    resolve_field(record, field, prefix, FieldOrder::CoreFirst).map(|hit| to_text(hit.value))
}

/// Post-processes a tag value and wraps it in an HTML element.
///
/// Attributes read:
///
/// - `helper="group:func"`: one helper function
/// - `function="a,b"`: filters applied in order
/// - `tag`, `id`, `class`: the wrapping element, resolved with [`get_attribute`]
///
/// An empty result renders nothing, wrapper included.
pub fn enclose(binding: &Binding<'_>, value: &str) -> String {
    let filters = &binding.services().filters;
    let mut value = value.to_string();

    if let Some((group, func)) = binding
        .attr("helper")
        .and_then(|h| h.split_once(':'))
        .filter(|(g, f)| !g.is_empty() && !f.is_empty())
    {
        match filters.helper(group, func) {
            Some(helper) => value = helper(&value),
            None => {
                tracing::warn!(tag = %binding.name(), group, func, "Unknown helper function");
                let message = format!(
                    "Error when calling <b>{}->{}</b>. This helper function doesn't exist",
                    group, func
                );
                return show_tag_error(&binding.options().error_template, binding.name(), &[message]);
            }
        }
    }

    if let Some(functions) = binding.attr_non_empty("function") {
        value = filters.apply_pipeline(&value, functions);
    }

    if is_empty_text(&value) {
        return String::new();
    }

    match get_attribute(binding, "tag") {
        Some(html_tag) => {
            let id = get_attribute(binding, "id")
                .map(|id| format!(" id=\"{}\"", id))
                .unwrap_or_default();
            let class = get_attribute(binding, "class")
                .map(|class| format!(" class=\"{}\"", class))
                .unwrap_or_default();
            format!("<{0}{1}{2}>{3}</{0}>", html_tag, id, class, value)
        }
        None => value,
    }
}
