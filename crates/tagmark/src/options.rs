//! Render options.

use crate::field::DEFAULT_EXTEND_PREFIX;

/// Default template for inline tag error blocks.
///
/// Rendered with MiniJinja; `tag` is the tag name and `messages` the list of
/// message lines.
pub const DEFAULT_ERROR_TEMPLATE: &str = r#"<div class="tag-error"><strong>{{ tag }}</strong>{% for message in messages %}<p>{{ message }}</p>{% endfor %}</div>"#;

/// Default nesting limit for body and partial expansion.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// How to render a namespaced tag that has no handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UnknownTagBehavior {
    /// Emit the tag markup as written, with its body expanded.
    #[default]
    Passthrough,
    /// Drop the tag markup, keep the expanded body.
    Strip,
    /// Emit a marker in place of the tag markup, then the expanded body.
    Indicate(String),
}

/// Options shared by every render pass of a site.
///
/// # Example
///
/// ```rust
/// use tagmark::{TagOptions, UnknownTagBehavior};
///
/// let options = TagOptions::new()
///     .prefix("cms")
///     .unknown_tags(UnknownTagBehavior::Strip)
///     .max_depth(8);
/// assert_eq!(options.prefix, "cms");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOptions {
    /// Namespace written before the colon in tag markup (`ion` in `<ion:field/>`).
    pub prefix: String,
    /// Key prefix marking extended fields in data records.
    pub extend_field_prefix: String,
    pub unknown_tags: UnknownTagBehavior,
    pub max_depth: usize,
    /// MiniJinja source for inline tag errors.
    pub error_template: String,
}

impl Default for TagOptions {
    fn default() -> Self {
        Self {
            prefix: "ion".to_string(),
            extend_field_prefix: DEFAULT_EXTEND_PREFIX.to_string(),
            unknown_tags: UnknownTagBehavior::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            error_template: DEFAULT_ERROR_TEMPLATE.to_string(),
        }
    }
}

impl TagOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn extend_field_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.extend_field_prefix = prefix.into();
        self
    }

    pub fn unknown_tags(mut self, behavior: UnknownTagBehavior) -> Self {
        self.unknown_tags = behavior;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn error_template(mut self, template: impl Into<String>) -> Self {
        self.error_template = template.into();
        self
    }
}
