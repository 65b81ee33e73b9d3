//! `tagmark` command line: render a template against a site, or list the
//! tags a site provides.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use console::style;
use serde_json::Value;

use tagmark::registry;
use tagmark::services::{FsTheme, FsTranslations, JinjaViews, SettingsStore, SiteConfig};
use tagmark::{Context, ModuleLoader, Scope, Services, TagRegistry};

#[derive(Parser, Debug)]
#[command(name = "tagmark", version, about = "Render CMS templates written with ion tags")]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a template file and print the result
    Render {
        /// Template file
        template: PathBuf,

        #[command(flatten)]
        site: SiteArgs,

        /// Application views rendered by `php="true"` partials
        #[arg(long)]
        views: Option<PathBuf>,

        /// Application directory holding `language/<lang>/` tables
        #[arg(long)]
        app: Option<PathBuf>,

        /// JSON file bound as the `page` record
        #[arg(long)]
        page: Option<PathBuf>,

        /// JSON file bound as the `pages` global (the site's page records)
        #[arg(long)]
        pages: Option<PathBuf>,

        /// Language to render in
        #[arg(long)]
        lang: Option<String>,
    },

    /// List every tag available to the site's templates
    Tags {
        #[command(flatten)]
        site: SiteArgs,
    },
}

#[derive(clap::Args, Debug)]
struct SiteArgs {
    /// Site configuration file
    #[arg(long)]
    site: PathBuf,

    /// Themes directory (defaults to `themes/` next to the site file)
    #[arg(long)]
    themes: Option<PathBuf>,

    /// Modules directory holding `<Folder>/tags.yaml` definitions
    #[arg(long)]
    modules: Option<PathBuf>,
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Command::Render {
            template,
            site,
            views,
            app,
            page,
            pages,
            lang,
        } => {
            let loaded = LoadedSite::load(&site)?;
            if let Some(lang) = lang {
                loaded.config.set_current_language(&lang);
            }
            let services = loaded.services(app, views);
            let registry = install_registry(&loaded, site.modules.as_deref())?;

            let source = std::fs::read_to_string(&template)
                .with_context(|| format!("Failed to read template {}", template.display()))?;

            let mut ctx = Context::bound(services, registry);
            if let Some(pages) = pages {
                let pages = read_json(&pages)?;
                ctx.globals_mut().set(tagmark::pages::PAGES_GLOBAL, pages);
            }
            let mut locals = Scope::new();
            if let Some(page) = page {
                let page = read_json(&page)?;
                ctx.globals_mut().set("page", page.clone());
                locals.set("page", page);
            }

            let out = ctx
                .render_with_locals(&source, &locals)
                .with_context(|| format!("Failed to render {}", template.display()))?;
            print!("{}", out);
        }
        Command::Tags { site } => {
            let loaded = LoadedSite::load(&site)?;
            let registry = install_registry(&loaded, site.modules.as_deref())?;
            let ctx = Context::bound(loaded.services(None, None), registry);
            let prefix = ctx.options().prefix.clone();

            for selector in ctx.selectors() {
                let source = if registry.contains(selector) {
                    style("module").cyan()
                } else {
                    style("builtin").dim()
                };
                println!("{}:{}  {}", prefix, style(selector).bold(), source);
            }
        }
    }
    Ok(())
}

struct LoadedSite {
    config: Arc<SiteConfig>,
    theme: FsTheme,
    root: PathBuf,
}

impl LoadedSite {
    fn load(args: &SiteArgs) -> Result<Self> {
        let config = SiteConfig::from_file(&args.site)
            .with_context(|| format!("Failed to load site {}", args.site.display()))?;
        let root = args
            .site
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let themes = args.themes.clone().unwrap_or_else(|| root.join("themes"));
        let theme = FsTheme::new(themes, config.theme());
        Ok(Self {
            config: Arc::new(config),
            theme,
            root,
        })
    }

    fn services(&self, app: Option<PathBuf>, views: Option<PathBuf>) -> Services {
        let translations = FsTranslations::new(app.unwrap_or_else(|| self.root.clone()))
            .with_theme_dir(self.theme.dir());
        let mut services = Services::new(self.config.clone(), Arc::new(self.theme.clone()))
            .with_translations(Arc::new(translations));
        if let Some(views) = views {
            services = services.with_views(Arc::new(JinjaViews::new(views)));
        }
        services
    }
}

fn install_registry(site: &LoadedSite, modules: Option<&Path>) -> Result<&'static TagRegistry> {
    let mut loader = ModuleLoader::new(site.config.installed_modules());
    if let Some(dir) = modules {
        loader = loader.with_modules_dir(dir);
    }
    registry::try_install(|| loader.build_registry()).context("Failed to load module tags")
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
