//! Render-wide variables: `set` and `get`.

use serde_json::Value;

use crate::context::Binding;
use crate::error::TagResult;
use crate::value::to_text;

/// `<ion:set var="x" value="v" />` stores `v` in the globals and renders it.
///
/// Without `value` the variable is still declared, as null.
pub fn set(b: &mut Binding<'_>) -> TagResult {
    let value = b
        .attr_non_empty("value")
        .map(|v| Value::String(v.to_string()))
        .unwrap_or(Value::Null);

    if let Some(var) = b.attr_non_empty("var").map(str::to_string) {
        b.globals_mut().set(var, value.clone());
    }
    Ok(to_text(&value))
}

/// `<ion:get var="x" />` renders a global as stored, or nothing when unset.
///
/// `"0"` is a stored value like any other, so it reads back as `"0"`.
pub fn get(b: &mut Binding<'_>) -> TagResult {
    Ok(b.attr_non_empty("var")
        .and_then(|var| b.globals().get(var))
        .map(to_text)
        .unwrap_or_default())
}
