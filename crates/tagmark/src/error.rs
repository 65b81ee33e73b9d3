//! Error types for tag rendering and loading.
//!
//! Most tag failures never become errors: missing data renders as an empty
//! string, malformed input renders a visible inline message. The types here
//! cover the rest:
//!
//! - [`TagError`]: fatal failures inside a handler (a missing required
//!   attribute, an unloadable view). These halt the render.
//! - [`LoadError`]: failures reading module definitions or site configuration.
//! - [`RenderError`]: the public error returned by rendering entry points.

use std::fmt;
use std::path::PathBuf;

/// Fatal failure raised by a tag handler.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// A tag was used without an attribute it cannot work without.
    #[error("TagManager : Please use the attribute \"{attribute}\" when using the tag \"{tag}\"")]
    MissingAttribute {
        tag: String,
        attribute: &'static str,
    },

    /// A view could not be loaded or rendered.
    #[error("cannot load view \"{path}\": {message}")]
    View { path: String, message: String },

    /// Nested expansion went deeper than the configured limit.
    #[error("tag nesting exceeded {0} levels (recursive partial?)")]
    RecursionLimit(usize),

    /// The raw template tag failed to render its body.
    #[error("raw template error: {0}")]
    Raw(String),
}

/// Result type returned by tag handlers.
pub type TagResult = Result<String, TagError>;

/// Failure loading module definitions or configuration from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },
}

/// Error type for rendering operations.
///
/// This error type provides a stable API that doesn't expose the underlying
/// template engine or parser types.
#[derive(Debug)]
pub enum RenderError {
    /// A tag handler failed fatally.
    TagError(TagError),

    /// Configuration or module definitions could not be loaded.
    LoadError(LoadError),

    /// MiniJinja template failure (views, error blocks).
    TemplateError(String),

    /// Data serialization error.
    SerializationError(String),

    /// I/O error (e.g., reading a template from disk).
    IoError(std::io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::TagError(err) => write!(f, "tag error: {}", err),
            RenderError::LoadError(err) => write!(f, "load error: {}", err),
            RenderError::TemplateError(msg) => write!(f, "template error: {}", msg),
            RenderError::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            RenderError::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::TagError(err) => Some(err),
            RenderError::LoadError(err) => Some(err),
            RenderError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TagError> for RenderError {
    fn from(err: TagError) -> Self {
        RenderError::TagError(err)
    }
}

impl From<LoadError> for RenderError {
    fn from(err: LoadError) -> Self {
        RenderError::LoadError(err)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::IoError(err)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for RenderError {
    fn from(err: serde_yaml::Error) -> Self {
        RenderError::SerializationError(err.to_string())
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        RenderError::TemplateError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attribute_display() {
        let err = TagError::MissingAttribute {
            tag: "partial".into(),
            attribute: "path",
        };
        let msg = err.to_string();
        assert!(msg.contains("\"path\""));
        assert!(msg.contains("\"partial\""));
    }

    #[test]
    fn test_render_error_wraps_tag_error() {
        let err: RenderError = TagError::RecursionLimit(32).into();
        assert!(matches!(err, RenderError::TagError(TagError::RecursionLimit(32))));
        assert!(err.to_string().starts_with("tag error:"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let render_err: RenderError = io_err.into();
        assert!(matches!(render_err, RenderError::IoError(_)));
    }

    #[test]
    fn test_from_minijinja_error() {
        let mj_err = minijinja::Error::new(
            minijinja::ErrorKind::TemplateNotFound,
            "template 'foo' not found",
        );
        let render_err: RenderError = mj_err.into();
        assert!(matches!(render_err, RenderError::TemplateError(_)));
    }
}
