//! Two-tier field resolution for data records.
//!
//! Records carry two kinds of fields in the same map: core fields (`title`)
//! and extended fields, user-defined data stored under a prefixed key
//! (`ion_title`). [`resolve_field`] looks a name up in both tiers in a chosen
//! order and reports which tier answered, so callers never build prefixed keys
//! themselves.

use serde_json::{Map, Value};

use crate::value::is_empty;

/// Default prefix marking extended fields.
pub const DEFAULT_EXTEND_PREFIX: &str = "ion_";

/// Which tier a value was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTier {
    /// Built-in field stored under its plain name.
    Core,
    /// User-defined field stored under the prefixed name.
    Extended,
}

/// Lookup order across the two tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrder {
    /// Prefer the extended value, fall back to the core value.
    ExtendedFirst,
    /// Prefer the core value, fall back to the extended value.
    CoreFirst,
    /// Core value only.
    CoreOnly,
}

/// A successful field lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLookup<'a> {
    pub value: &'a Value,
    pub tier: FieldTier,
}

/// Resolves `name` in `record` across core and extended tiers.
///
/// Only non-empty values count as found.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tagmark::field::{resolve_field, FieldOrder, FieldTier};
///
/// let page = json!({"title": "Home", "ion_title": "Welcome"});
/// let record = page.as_object().unwrap();
///
/// let hit = resolve_field(record, "title", "ion_", FieldOrder::ExtendedFirst).unwrap();
/// assert_eq!(hit.value, &json!("Welcome"));
/// assert_eq!(hit.tier, FieldTier::Extended);
///
/// let hit = resolve_field(record, "title", "ion_", FieldOrder::CoreOnly).unwrap();
/// assert_eq!(hit.value, &json!("Home"));
/// ```
pub fn resolve_field<'a>(
    record: &'a Map<String, Value>,
    name: &str,
    prefix: &str,
    order: FieldOrder,
) -> Option<FieldLookup<'a>> {
    let core = || {
        record
            .get(name)
            .filter(|v| !is_empty(v))
            .map(|value| FieldLookup {
                value,
                tier: FieldTier::Core,
            })
    };
    let extended = || {
        record
            .get(&format!("{}{}", prefix, name))
            .filter(|v| !is_empty(v))
            .map(|value| FieldLookup {
                value,
                tier: FieldTier::Extended,
            })
    };

    match order {
        FieldOrder::ExtendedFirst => extended().or_else(core),
        FieldOrder::CoreFirst => core().or_else(extended),
        FieldOrder::CoreOnly => core(),
    }
}
