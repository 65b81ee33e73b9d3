//! Modules declared as markup fragments in YAML.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};

use super::TagModule;
use crate::context::{handler, TagHandler};
use crate::error::LoadError;

/// Key of the fragment used for the bare module tag.
const INDEX_KEY: &str = "index";

/// A module defined by a `tags.yaml` file.
///
/// ```yaml
/// index: <div class="gallery"><ion:field from="tag" name="body"/></div>
/// photos: <ul><li><ion:field from="attr" name="album"/></li></ul>
/// ```
///
/// Each fragment is rendered as nested markup with two locals:
///
/// - `attr`: the invoking tag's attributes
/// - `tag`: `name` (the selector) and `body` (the expanded body)
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarativeModule {
    name: String,
    fragments: BTreeMap<String, String>,
}

impl DeclarativeModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fragments: BTreeMap::new(),
        }
    }

    pub fn with_fragment(mut self, method: impl Into<String>, source: impl Into<String>) -> Self {
        self.fragments.insert(method.into(), source.into());
        self
    }

    pub fn from_yaml(name: impl Into<String>, yaml: &str) -> Result<Self, serde_yaml::Error> {
        let fragments: Option<BTreeMap<String, String>> = serde_yaml::from_str(yaml)?;
        Ok(Self {
            name: name.into(),
            fragments: fragments.unwrap_or_default(),
        })
    }

    pub fn from_file(name: impl Into<String>, path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml(name, &content).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Declared method names, `index` excluded.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.fragments
            .keys()
            .map(String::as_str)
            .filter(|m| *m != INDEX_KEY)
    }
}

impl TagModule for DeclarativeModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> Vec<(String, TagHandler)> {
        self.fragments
            .iter()
            .filter(|(method, _)| method.as_str() != INDEX_KEY)
            .map(|(method, source)| (method.clone(), fragment_handler(source.clone())))
            .collect()
    }

    fn index(&self) -> TagHandler {
        match self.fragments.get(INDEX_KEY) {
            Some(source) => fragment_handler(source.clone()),
            None => handler(|b| b.expand()),
        }
    }
}

fn fragment_handler(source: String) -> TagHandler {
    handler(move |b| {
        let attrs: Map<String, Value> = b
            .attrs()
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        let body = b.expand()?;

        let mut tag = Map::new();
        tag.insert("name".to_string(), Value::String(b.name().to_string()));
        tag.insert("body".to_string(), Value::String(body));

        b.locals_mut().set("attr", Value::Object(attrs));
        b.locals_mut().set("tag", Value::Object(tag));
        b.parse_as_nested(&source)
    })
}
