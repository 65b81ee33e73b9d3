//! Scopes and loose value semantics.
//!
//! Tag handlers see two kinds of data:
//!
//! - [`Scope`]: local values, valid only inside the enclosing tag's body
//!   (the current `page`, `article`, ...)
//! - [`Globals`]: render-wide values (site settings, theme, language), mutable
//!   by the `set` tag
//!
//! Page data arrives as JSON, so both are maps of [`serde_json::Value`]. Output
//! follows the CMS's loose rules: [`to_text`] turns any value into rendered
//! text and [`is_empty`] decides whether a value counts as "present".

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Returns true for values the CMS treats as absent.
///
/// Null, `false`, `""`, `"0"`, `0`, and empty arrays/objects are empty.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty() || s == "0",
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// [`is_empty`] for rendered text: `""` and `"0"`.
pub fn is_empty_text(text: &str) -> bool {
    text.is_empty() || text == "0"
}

/// Renders a value as template text.
///
/// Strings are emitted as-is, `true` is `"1"`, `false` and null are empty,
/// arrays and objects become compact JSON.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Local values visible to a tag and its body.
///
/// Each tag invocation gets its own copy; writes never leak to siblings or
/// to the enclosing tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    values: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the named value only when it is an object (a data record).
    pub fn record(&self, name: &str) -> Option<&Map<String, Value>> {
        self.values.get(name).and_then(Value::as_object)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Render-wide values.
///
/// Created once per render pass and seeded before any tag runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Globals {
    values: Map<String, Value>,
}

impl Globals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the value as text, or `None` when it is absent or empty.
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.values
            .get(name)
            .filter(|v| !is_empty(v))
            .map(to_text)
    }

    /// Returns the named value only when it is an object (a data record).
    pub fn record(&self, name: &str) -> Option<&Map<String, Value>> {
        self.values.get(name).and_then(Value::as_object)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the globals as a JSON object, for template engines.
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
