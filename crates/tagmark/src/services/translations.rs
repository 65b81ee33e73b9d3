//! Language tables.
//!
//! A language file is a flat YAML map of term to text, stored as
//! `language/<lang>/<file>_lang.yaml` under the application directory and,
//! optionally, under the theme directory. When both exist the theme's terms
//! win.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::{Map, Value};

use super::Translations;
use crate::value::to_text;

/// Language files read from disk, cached per language.
#[derive(Debug)]
pub struct FsTranslations {
    app_dir: PathBuf,
    theme_dir: Option<PathBuf>,
    files: Vec<String>,
    tables: RwLock<HashMap<String, Map<String, Value>>>,
}

impl FsTranslations {
    /// Reads language files under `app_dir`. The active table is the
    /// `default` file until [`with_files`](Self::with_files) says otherwise.
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
            theme_dir: None,
            files: vec!["default".to_string()],
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_theme_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.theme_dir = Some(dir.into());
        self
    }

    /// Files merged, in order, into each language's active table.
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    fn file_paths(&self, lang: &str, file: &str) -> Vec<PathBuf> {
        let relative = Path::new("language")
            .join(lang)
            .join(format!("{}_lang.yaml", file));
        std::iter::once(&self.app_dir)
            .chain(self.theme_dir.as_ref())
            .map(|dir| dir.join(&relative))
            .collect()
    }

    /// Reads one term from the cached table of `lang`, building the table on
    /// first use. Only the matched value is cloned.
    fn cached_line(&self, lang: &str, key: &str) -> Option<String> {
        if let Ok(tables) = self.tables.read() {
            if let Some(table) = tables.get(lang) {
                return table.get(key).map(to_text);
            }
        }

        let mut table = Map::new();
        for file in &self.files {
            table.extend(self.load_file(lang, file));
        }
        let line = table.get(key).map(to_text);
        if let Ok(mut tables) = self.tables.write() {
            tables.entry(lang.to_string()).or_insert(table);
        }
        line
    }

    #[cfg(test)]
    fn is_cached(&self, lang: &str) -> bool {
        self.tables
            .read()
            .map(|tables| tables.contains_key(lang))
            .unwrap_or(false)
    }
}

impl Translations for FsTranslations {
    fn line(&self, lang: &str, key: &str) -> Option<String> {
        self.cached_line(lang, key)
    }

    fn load_file(&self, lang: &str, file: &str) -> Map<String, Value> {
        let mut merged = Map::new();
        for path in self.file_paths(lang, file) {
            if !path.is_file() {
                continue;
            }
            let parsed = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|s| serde_yaml::from_str::<Map<String, Value>>(&s).map_err(|e| e.to_string()));
            match parsed {
                Ok(table) => merged.extend(table),
                Err(message) => {
                    tracing::warn!(path = %path.display(), %message, "Skipping unreadable language file");
                }
            }
        }
        merged
    }
}

/// Language tables held in memory.
#[derive(Debug, Default)]
pub struct MemoryTranslations {
    /// lang -> file -> table
    files: HashMap<String, HashMap<String, Map<String, Value>>>,
    active: HashMap<String, Map<String, Value>>,
}

impl MemoryTranslations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a term to the active table of `lang`.
    pub fn with_line(mut self, lang: &str, key: &str, text: &str) -> Self {
        self.active
            .entry(lang.to_string())
            .or_default()
            .insert(key.to_string(), Value::String(text.to_string()));
        self
    }

    /// Registers a named language file.
    pub fn with_file<I, K, V>(mut self, lang: &str, file: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self
            .files
            .entry(lang.to_string())
            .or_default()
            .entry(file.to_string())
            .or_default();
        for (k, v) in entries {
            table.insert(k.into(), Value::String(v.into()));
        }
        self
    }
}

impl Translations for MemoryTranslations {
    fn line(&self, lang: &str, key: &str) -> Option<String> {
        self.active.get(lang)?.get(key).map(to_text)
    }

    fn load_file(&self, lang: &str, file: &str) -> Map<String, Value> {
        self.files
            .get(lang)
            .and_then(|files| files.get(file))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, lang: &str, file: &str, body: &str) {
        let folder = dir.join("language").join(lang);
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join(format!("{}_lang.yaml", file)), body).unwrap();
    }

    #[test]
    fn merges_app_then_theme() {
        let app = tempfile::tempdir().unwrap();
        let theme = tempfile::tempdir().unwrap();
        write(app.path(), "en", "pagoda", "a: app\nb: app\n");
        write(theme.path(), "en", "pagoda", "b: theme\n");

        let tr = FsTranslations::new(app.path()).with_theme_dir(theme.path());
        let table = tr.load_file("en", "pagoda");
        assert_eq!(table.get("a"), Some(&json!("app")));
        assert_eq!(table.get("b"), Some(&json!("theme")));
    }

    #[test]
    fn active_table_uses_configured_files() {
        let app = tempfile::tempdir().unwrap();
        write(app.path(), "fr", "default", "hello: Bonjour\n");
        write(app.path(), "fr", "date", "monday: lundi\n");

        let tr = FsTranslations::new(app.path()).with_files(["default", "date"]);
        assert_eq!(tr.line("fr", "hello"), Some("Bonjour".to_string()));
        assert_eq!(tr.line("fr", "monday"), Some("lundi".to_string()));
        assert_eq!(tr.line("fr", "missing"), None);
        assert_eq!(tr.line("de", "hello"), None);
    }

    #[test]
    fn lines_are_served_from_cache() {
        let app = tempfile::tempdir().unwrap();
        write(app.path(), "en", "default", "hello: Hello\n");

        let tr = FsTranslations::new(app.path());
        assert!(!tr.is_cached("en"));
        assert_eq!(tr.line("en", "hello"), Some("Hello".to_string()));
        assert!(tr.is_cached("en"));

        std::fs::remove_dir_all(app.path().join("language")).unwrap();
        assert_eq!(tr.line("en", "hello"), Some("Hello".to_string()));
        assert_eq!(tr.line("en", "missing"), None);
    }

    #[test]
    fn bad_yaml_is_skipped() {
        let app = tempfile::tempdir().unwrap();
        write(app.path(), "en", "default", "a: [unclosed\n");
        let tr = FsTranslations::new(app.path());
        assert!(tr.load_file("en", "default").is_empty());
    }

    #[test]
    fn memory_tables() {
        let tr = MemoryTranslations::new()
            .with_line("en", "hello", "Hello")
            .with_file("en", "js", [("ok", "OK")]);
        assert_eq!(tr.line("en", "hello"), Some("Hello".to_string()));
        assert_eq!(tr.load_file("en", "js").get("ok"), Some(&json!("OK")));
        assert!(tr.load_file("en", "nope").is_empty());
    }
}
