//! YAML-backed site configuration.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ConfigStore, SettingsStore};
use crate::error::LoadError;
use crate::module::InstalledModules;

/// Language setup of a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Languages {
    /// Language active when the site is loaded.
    pub current: String,
    pub default: String,
    /// Published languages.
    pub online: Vec<String>,
}

impl Default for Languages {
    fn default() -> Self {
        Self {
            current: "en".to_string(),
            default: "en".to_string(),
            online: vec!["en".to_string()],
        }
    }
}

/// The site file as written on disk.
///
/// ```yaml
/// base_url: https://example.com/
/// theme: default
/// languages:
///   current: en
///   default: en
///   online: [en, fr]
/// settings:
///   site_title: My Site
///   google_analytics: UA-1234
/// config:
///   charset: UTF-8
/// modules:
///   Gallery: Gallery
/// menus:
///   - { id: 1, name: main }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub base_url: String,
    pub theme: String,
    pub languages: Languages,
    pub settings: Map<String, Value>,
    pub config: Map<String, Value>,
    /// Installed modules: display name to folder. Module tags are named
    /// after the lower-cased folder.
    pub modules: BTreeMap<String, String>,
    pub menus: Value,
}

/// Site configuration with a switchable current language.
///
/// Implements both [`SettingsStore`] and [`ConfigStore`].
#[derive(Debug)]
pub struct SiteConfig {
    site: SiteSettings,
    current_lang: RwLock<String>,
}

impl SiteConfig {
    pub fn new(site: SiteSettings) -> Self {
        let current_lang = RwLock::new(site.languages.current.clone());
        Self { site, current_lang }
    }

    /// Parses a site file from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let site: SiteSettings = serde_yaml::from_str(yaml)?;
        Ok(Self::new(site))
    }

    /// Loads a site file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn site(&self) -> &SiteSettings {
        &self.site
    }

    pub fn theme(&self) -> &str {
        &self.site.theme
    }

    /// The configured module list.
    pub fn installed_modules(&self) -> InstalledModules {
        self.site
            .modules
            .values()
            .map(String::as_str)
            .collect()
    }
}

impl SettingsStore for SiteConfig {
    fn setting(&self, key: &str) -> Option<Value> {
        if key == "menus" {
            return match &self.site.menus {
                Value::Null => self.site.settings.get(key).cloned(),
                menus => Some(menus.clone()),
            };
        }
        self.site.settings.get(key).cloned()
    }

    fn current_language(&self) -> String {
        match self.current_lang.read() {
            Ok(lang) => lang.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_current_language(&self, code: &str) {
        let mut lang = match self.current_lang.write() {
            Ok(lang) => lang,
            Err(poisoned) => poisoned.into_inner(),
        };
        *lang = code.to_string();
    }

    fn default_language(&self) -> String {
        self.site.languages.default.clone()
    }

    fn online_languages(&self) -> Vec<String> {
        self.site.languages.online.clone()
    }
}

impl ConfigStore for SiteConfig {
    fn item(&self, key: &str) -> Option<Value> {
        if key == "base_url" && !self.site.base_url.is_empty() {
            return Some(Value::String(self.site.base_url.clone()));
        }
        self.site.config.get(key).cloned()
    }
}
