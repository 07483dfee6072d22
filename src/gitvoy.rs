use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};

use crate::config::{GitvoyConfig, CONFIG_FILE};
use crate::contexts::{HeadContext, PostEntryContext, PostListContext};
use crate::loader::{ConfigLoader, ConfigOrigin};
use crate::post::{load_posts, POSTS_DIR};
use crate::render::{render_head, render_post_list};
use crate::theme::{
    built_in, built_in_themes, resolve_theme, theme_css, theme_name, ThemeResolver, DEFAULT_THEME,
};

#[derive(Clone, Parser)]
#[clap(version, about)]
/// Theme resolver and stylesheet generator for gitvoy blogs
pub struct Args {
    /// Site root containing gitvoy.config.json
    #[clap(short, long, parse(from_os_str), default_value = ".")]
    pub dir: PathBuf,
    /// Explicit config file, overriding <DIR>/gitvoy.config.json
    #[clap(short, long, parse(from_os_str))]
    pub config: Option<PathBuf>,
    /// Log debug output
    #[clap(short, long)]
    pub verbose: bool,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Clone, Subcommand)]
pub enum Command {
    /// Print the resolved site config
    Config,
    /// Print the resolved theme
    Theme,
    /// Print the theme as CSS custom properties
    Css {
        /// Write to this file instead of stdout
        #[clap(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
    },
    /// Print the <head> fragment with meta tags and theme styles
    Head,
    /// List the built-in themes
    Themes,
    /// Write a starter gitvoy.config.json
    Init {
        #[clap(short, long, default_value = "minimal")]
        theme: String,
        #[clap(long)]
        title: Option<String>,
        /// Overwrite an existing config
        #[clap(short, long)]
        force: bool,
    },
    /// Check post front-matter and list posts, newest first
    Posts {
        /// Include drafts
        #[clap(long)]
        drafts: bool,
    },
}

pub struct Gitvoy {
    dir: PathBuf,
    resolver: ThemeResolver,
}

impl Gitvoy {
    pub fn new(args: &Args) -> Gitvoy {
        let loader = match &args.config {
            Some(path) => ConfigLoader::new(path),
            None => ConfigLoader::in_dir(&args.dir),
        };
        Gitvoy {
            dir: args.dir.clone(),
            resolver: ThemeResolver::new(loader),
        }
    }

    /// Run `command`, returning what should go to stdout.
    pub fn run(&self, command: &Command) -> Result<String> {
        match command {
            Command::Config => self.config_json(),
            Command::Theme => self.theme_json(),
            Command::Css { output: None } => Ok(self.css()),
            Command::Css { output: Some(path) } => {
                self.write_css(path)?;
                Ok(String::new())
            }
            Command::Head => self.head(),
            Command::Themes => Ok(self.themes()),
            Command::Init { theme, title, force } => {
                let path = self.init(theme, title.as_deref(), *force)?;
                Ok(format!("Wrote {}\n", path.display()))
            }
            Command::Posts { drafts } => self.posts(*drafts),
        }
    }

    fn config_json(&self) -> Result<String> {
        let loaded = self.resolver.get_config();
        match loaded.origin {
            ConfigOrigin::Loaded => info!("using {}", self.resolver.loader().path().display()),
            ConfigOrigin::Default => info!("no usable {}, showing defaults", CONFIG_FILE),
        }
        let json = serde_json::to_string_pretty(&*loaded.config)?;
        Ok(json + "\n")
    }

    fn theme_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(&self.resolver.get_theme_config())?;
        Ok(json + "\n")
    }

    fn css(&self) -> String {
        self.resolver.generate_theme_css() + "\n"
    }

    fn write_css(&self, path: &Path) -> Result<()> {
        fs::write(path, self.css())
            .with_context(|| format!("could not write {}", path.display()))?;
        info!("wrote theme CSS to {}", path.display());
        Ok(())
    }

    fn head(&self) -> Result<String> {
        let config = self.resolver.get_config();
        let css = theme_css(resolve_theme(&config));
        Ok(render_head(&HeadContext::new(&config, css))?)
    }

    fn themes(&self) -> String {
        let config = self.resolver.get_config();
        let active = if config.custom_theme.is_some() {
            None
        } else {
            let name = theme_name(&config.theme);
            Some(if built_in(name).is_some() { name } else { DEFAULT_THEME })
        };

        let mut out = String::new();
        for (name, _) in built_in_themes() {
            let marker = if active == Some(name) { "*" } else { " " };
            out.push_str(&format!("{marker} {name}\n"));
        }
        if active.is_none() {
            out.push_str("* (customTheme)\n");
        }
        out
    }

    fn init(&self, theme: &str, title: Option<&str>, force: bool) -> Result<PathBuf> {
        if built_in(theme_name(theme)).is_none() {
            let names: Vec<_> = built_in_themes().map(|(name, _)| name).collect();
            bail!("unknown theme `{}` (built-in themes: {})", theme, names.join(", "));
        }

        let path = self.resolver.loader().path().to_path_buf();
        if path.exists() && !force {
            bail!("{} already exists, use --force to overwrite", path.display());
        }

        let mut config = GitvoyConfig {
            theme: theme.to_string(),
            ..GitvoyConfig::default()
        };
        if let Some(title) = title {
            config.site.title = title.to_string();
        }

        let json = serde_json::to_string_pretty(&config)?;
        fs::write(&path, json + "\n")
            .with_context(|| format!("could not write {}", path.display()))?;
        debug!("initialised {} with theme {}", path.display(), theme);
        Ok(path)
    }

    fn posts(&self, include_drafts: bool) -> Result<String> {
        let posts_dir = self.dir.join(POSTS_DIR);
        let posts = load_posts(&posts_dir, include_drafts)?;

        let context = PostListContext {
            site_title: self.resolver.get_config().site.title.clone(),
            count: posts.len(),
            posts: posts.iter().map(PostEntryContext::from).collect(),
        };
        Ok(render_post_list(&context)?)
    }
}
