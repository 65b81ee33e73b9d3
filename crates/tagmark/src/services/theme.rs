//! Theme view resolution.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::ThemeResolver;
use crate::error::TagError;

const VIEW_EXTENSION: &str = "html";

/// A theme folder on disk.
///
/// Views live at `<themes_dir>/<theme>/views/<path>.html`; the extension may be
/// omitted in the view path.
#[derive(Debug, Clone)]
pub struct FsTheme {
    themes_dir: PathBuf,
    theme: String,
    url_path: String,
}

impl FsTheme {
    pub fn new(themes_dir: impl Into<PathBuf>, theme: impl Into<String>) -> Self {
        let theme = theme.into();
        Self {
            url_path: format!("themes/{}/", theme),
            themes_dir: themes_dir.into(),
            theme,
        }
    }

    /// Overrides the theme path used to build URLs (default `themes/<theme>/`).
    pub fn with_url_path(mut self, url_path: impl Into<String>) -> Self {
        let mut url_path = url_path.into();
        if !url_path.ends_with('/') {
            url_path.push('/');
        }
        self.url_path = url_path;
        self
    }

    /// Root folder of the theme.
    pub fn dir(&self) -> PathBuf {
        self.themes_dir.join(&self.theme)
    }

    fn view_file(&self, path: &str) -> PathBuf {
        let relative = Path::new(path.trim_start_matches('/'));
        let file = self.dir().join("views").join(relative);
        if file.extension().is_some() {
            file
        } else {
            file.with_extension(VIEW_EXTENSION)
        }
    }
}

impl ThemeResolver for FsTheme {
    fn theme(&self) -> String {
        self.theme.clone()
    }

    fn theme_path(&self) -> String {
        self.url_path.clone()
    }

    fn load_view(&self, path: &str) -> Result<String, TagError> {
        let file = self.view_file(path);
        std::fs::read_to_string(&file).map_err(|e| TagError::View {
            path: path.to_string(),
            message: format!("{}: {}", file.display(), e),
        })
    }
}

/// A theme held in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryTheme {
    theme: String,
    views: HashMap<String, String>,
}

impl MemoryTheme {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            views: HashMap::new(),
        }
    }

    pub fn with_view(mut self, path: impl Into<String>, source: impl Into<String>) -> Self {
        self.views.insert(path.into(), source.into());
        self
    }
}

impl ThemeResolver for MemoryTheme {
    fn theme(&self) -> String {
        self.theme.clone()
    }

    fn theme_path(&self) -> String {
        format!("themes/{}/", self.theme)
    }

    fn load_view(&self, path: &str) -> Result<String, TagError> {
        self.views.get(path).cloned().ok_or_else(|| TagError::View {
            path: path.to_string(),
            message: "view not found".to_string(),
        })
    }
}
