use std::collections::HashMap;
use std::sync::Arc;

use super::WidgetExecutor;

/// Why a widget produced no output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error("widget \"{0}\" is not installed")]
    NotFound(String),

    #[error("widget \"{name}\" failed: {message}")]
    Failed { name: String, message: String },
}

type WidgetFn = Arc<dyn Fn(&[String]) -> Result<String, String> + Send + Sync>;

/// Widgets registered as closures.
///
/// ```rust
/// use tagmark::services::{WidgetExecutor, WidgetRegistry};
///
/// let widgets = WidgetRegistry::new()
///     .with("hello", |args: &[String]| Ok(format!("Hello {}", args.join(" "))));
/// assert_eq!(widgets.run("hello", &["a".into(), "b".into()]).unwrap(), "Hello a b");
/// ```
#[derive(Clone, Default)]
pub struct WidgetRegistry {
    widgets: HashMap<String, WidgetFn>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F>(mut self, name: impl Into<String>, widget: F) -> Self
    where
        F: Fn(&[String]) -> Result<String, String> + Send + Sync + 'static,
    {
        self.widgets.insert(name.into(), Arc::new(widget));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.widgets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl WidgetExecutor for WidgetRegistry {
    fn run(&self, name: &str, args: &[String]) -> Result<String, WidgetError> {
        let widget = self
            .widgets
            .get(name)
            .ok_or_else(|| WidgetError::NotFound(name.to_string()))?;
        widget(args).map_err(|message| WidgetError::Failed {
            name: name.to_string(),
            message,
        })
    }
}

impl std::fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("widgets", &self.names())
            .finish()
    }
}
