//! Views and widgets.

use crate::context::Binding;
use crate::error::{TagError, TagResult};
use crate::format::show_tag_error;

/// `<ion:partial view="blocks/header" />`
///
/// Loads a theme view and renders it as nested markup with the current
/// locals. With `php="true"` the view is rendered by the application view
/// loader instead, against the globals. Fails the render when neither `view`
/// nor `path` is given, or when the view cannot be loaded.
pub fn partial(b: &mut Binding<'_>) -> TagResult {
    let view = b
        .attr_non_empty("view")
        .or_else(|| b.attr_non_empty("path"))
        .map(str::to_string)
        .ok_or_else(|| TagError::MissingAttribute {
            tag: b.name().to_string(),
            attribute: "path",
        })?;

    if b.attr("php") == Some("true") {
        let data = b.globals().to_value();
        return b.services().views.render_view(&view, &data);
    }

    let source = b.services().theme.load_view(&view)?;
    b.parse_as_nested(&source)
}

/// `<ion:widget name="rss" url="..." limit="5" />`
///
/// Runs a widget with every other attribute value as a positional argument,
/// in template order. A widget failure renders an inline error block.
pub fn widget(b: &mut Binding<'_>) -> TagResult {
    let name = b.attr("name").unwrap_or_default().to_string();
    let args: Vec<String> = b
        .attrs()
        .iter()
        .filter(|(key, _)| *key != "name")
        .map(|(_, value)| value.to_string())
        .collect();

    match b.services().widgets.run(&name, &args) {
        Ok(output) => Ok(output),
        Err(err) => {
            tracing::warn!(widget = %name, error = %err, "Widget failed");
            Ok(show_tag_error(
                &b.options().error_template,
                b.name(),
                &[err.to_string()],
            ))
        }
    }
}
