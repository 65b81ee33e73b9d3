//! Collaborators the tag handlers read from.
//!
//! Handlers never reach for process state directly. Everything outside the
//! render context (site settings, the active theme, translations, widgets)
//! sits behind one of the traits below and is handed to the context in a
//! [`Services`] bundle.
//!
//! | Trait | Provided implementation |
//! |-------|-------------------------|
//! | [`SettingsStore`] | [`SiteConfig`] |
//! | [`ConfigStore`] | [`SiteConfig`] |
//! | [`ThemeResolver`] | [`FsTheme`], [`MemoryTheme`] |
//! | [`ViewLoader`] | [`JinjaViews`], [`NoViews`] |
//! | [`WidgetExecutor`] | [`WidgetRegistry`] |
//! | [`Translations`] | [`FsTranslations`], [`MemoryTranslations`] |

mod site;
mod theme;
mod translations;
mod views;
mod widgets;

pub use site::{Languages, SiteConfig, SiteSettings};
pub use theme::{FsTheme, MemoryTheme};
pub use translations::{FsTranslations, MemoryTranslations};
pub use views::{JinjaViews, NoViews};
pub use widgets::{WidgetError, WidgetRegistry};

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::TagError;
use crate::format::FilterRegistry;
use crate::options::TagOptions;
use crate::value::{is_empty, to_text};

/// Site settings and language state.
pub trait SettingsStore: Send + Sync {
    /// Looks up a stored site setting.
    fn setting(&self, key: &str) -> Option<Value>;

    fn current_language(&self) -> String;

    fn set_current_language(&self, code: &str);

    fn default_language(&self) -> String;

    /// Codes of the languages currently published.
    fn online_languages(&self) -> Vec<String>;
}

/// Application configuration items.
pub trait ConfigStore: Send + Sync {
    fn item(&self, key: &str) -> Option<Value>;

    /// Site base URL, `/` when unset.
    fn base_url(&self) -> String {
        self.item("base_url")
            .filter(|v| !is_empty(v))
            .map(|v| to_text(&v))
            .unwrap_or_else(|| "/".to_string())
    }
}

/// The active front-end theme.
pub trait ThemeResolver: Send + Sync {
    /// Theme identifier (its folder name).
    fn theme(&self) -> String;

    /// Theme path relative to the base URL, with a trailing slash.
    fn theme_path(&self) -> String;

    /// Loads the markup of a theme view by relative path.
    fn load_view(&self, path: &str) -> Result<String, TagError>;
}

/// Application views rendered outside the tag markup (`partial php="true"`).
pub trait ViewLoader: Send + Sync {
    fn render_view(&self, path: &str, data: &Value) -> Result<String, TagError>;
}

/// Runs named widgets.
pub trait WidgetExecutor: Send + Sync {
    fn run(&self, name: &str, args: &[String]) -> Result<String, WidgetError>;
}

/// Language tables.
pub trait Translations: Send + Sync {
    /// Looks up a term in the active table of `lang`.
    fn line(&self, lang: &str, key: &str) -> Option<String>;

    /// Loads the named language file for `lang`. Missing files yield an empty table.
    fn load_file(&self, lang: &str, file: &str) -> Map<String, Value>;
}

/// Everything a render context needs from the outside world.
#[derive(Clone)]
pub struct Services {
    pub settings: Arc<dyn SettingsStore>,
    pub config: Arc<dyn ConfigStore>,
    pub theme: Arc<dyn ThemeResolver>,
    pub views: Arc<dyn ViewLoader>,
    pub widgets: Arc<dyn WidgetExecutor>,
    pub translations: Arc<dyn Translations>,
    pub filters: Arc<FilterRegistry>,
    pub options: TagOptions,
}

impl Services {
    /// Bundles a site with its theme.
    ///
    /// Views, widgets and translations start empty; filters start with the
    /// built-in set.
    pub fn new(site: Arc<SiteConfig>, theme: Arc<dyn ThemeResolver>) -> Self {
        Self {
            settings: site.clone(),
            config: site,
            theme,
            views: Arc::new(NoViews),
            widgets: Arc::new(WidgetRegistry::new()),
            translations: Arc::new(MemoryTranslations::new()),
            filters: Arc::new(FilterRegistry::with_builtins()),
            options: TagOptions::default(),
        }
    }

    pub fn with_settings(mut self, settings: Arc<dyn SettingsStore>) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_config(mut self, config: Arc<dyn ConfigStore>) -> Self {
        self.config = config;
        self
    }

    pub fn with_views(mut self, views: Arc<dyn ViewLoader>) -> Self {
        self.views = views;
        self
    }

    pub fn with_widgets(mut self, widgets: Arc<dyn WidgetExecutor>) -> Self {
        self.widgets = widgets;
        self
    }

    pub fn with_translations(mut self, translations: Arc<dyn Translations>) -> Self {
        self.translations = translations;
        self
    }

    pub fn with_filters(mut self, filters: FilterRegistry) -> Self {
        self.filters = Arc::new(filters);
        self
    }

    pub fn with_options(mut self, options: TagOptions) -> Self {
        self.options = options;
        self
    }

    /// Translates a term in the current language.
    pub fn translate(&self, key: &str) -> Option<String> {
        let lang = self.settings.current_language();
        self.translations.line(&lang, key)
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("theme", &self.theme.theme())
            .field("language", &self.settings.current_language())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
