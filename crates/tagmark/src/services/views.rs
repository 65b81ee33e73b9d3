//! Application views rendered with MiniJinja.

use std::path::PathBuf;

use minijinja::{Environment, ErrorKind};
use serde_json::Value;

use super::ViewLoader;
use crate::error::TagError;

/// Views loaded from a directory and rendered as MiniJinja templates.
///
/// A view path without extension also matches `<path>.html`.
pub struct JinjaViews {
    env: Environment<'static>,
    dir: PathBuf,
}

impl JinjaViews {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(&dir));
        Self { env, dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn render(&self, name: &str, data: &Value) -> Result<String, minijinja::Error> {
        let template = match self.env.get_template(name) {
            Err(e) if e.kind() == ErrorKind::TemplateNotFound && !name.contains('.') => {
                self.env.get_template(&format!("{}.html", name))?
            }
            other => other?,
        };
        template.render(data)
    }
}

impl ViewLoader for JinjaViews {
    fn render_view(&self, path: &str, data: &Value) -> Result<String, TagError> {
        self.render(path, data).map_err(|e| TagError::View {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for JinjaViews {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaViews").field("dir", &self.dir).finish()
    }
}

/// View loader for sites without application views. Every load fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoViews;

impl ViewLoader for NoViews {
    fn render_view(&self, path: &str, _data: &Value) -> Result<String, TagError> {
        Err(TagError::View {
            path: path.to_string(),
            message: "no view directory configured".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_view_against_data() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.html"), "Hello {{ site_title }}").unwrap();

        let views = JinjaViews::new(dir.path());
        let out = views
            .render_view("hello", &json!({"site_title": "Demo"}))
            .unwrap();
        assert_eq!(out, "Hello Demo");
        let out = views.render_view("hello.html", &json!({})).unwrap();
        assert_eq!(out, "Hello ");
    }

    #[test]
    fn missing_view_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let views = JinjaViews::new(dir.path());
        assert!(matches!(
            views.render_view("nope", &json!({})),
            Err(TagError::View { .. })
        ));
    }

    #[test]
    fn no_views_always_fails() {
        assert!(NoViews.render_view("x", &json!({})).is_err());
    }
}
