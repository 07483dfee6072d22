//! Theme resolution and CSS custom property generation.
//!
//! Resolution is a three-step derivation: config file → [`ThemeConfig`] →
//! `:root { ... }` text. Only the first step touches the disk, and only the
//! first step is cached (by [`ConfigLoader`]).

use std::fmt::Write;
use std::sync::LazyLock;

use crate::config::{GitvoyConfig, ThemeConfig, COLOR_SLOTS, FONT_SLOTS};
use crate::loader::{ConfigLoader, LoadedConfig};

/// Namespace prefix of packaged theme identifiers, e.g. `@gitvoy/theme-serif`.
pub const THEME_PREFIX: &str = "@gitvoy/theme-";

/// Theme used when the configured one is not built in.
pub const DEFAULT_THEME: &str = "minimal";

static BUILT_IN_THEMES: LazyLock<Vec<(&'static str, ThemeConfig)>> = LazyLock::new(|| {
    vec![
        ("minimal", preset(
            ["#0070f3", "#6b7280", "#f59e0b", "#ffffff", "#1f2937", "#f3f4f6", "#6b7280", "#e5e7eb"],
            ["system-ui, -apple-system, sans-serif", "Georgia, serif", "Menlo, monospace"],
            "0.5rem",
        )),
        ("minimal-dark", preset(
            ["#3b82f6", "#9ca3af", "#f59e0b", "#0f172a", "#f1f5f9", "#1e293b", "#94a3b8", "#334155"],
            ["system-ui, -apple-system, sans-serif", "Georgia, serif", "Menlo, monospace"],
            "0.5rem",
        )),
        ("serif", preset(
            ["#8b5cf6", "#64748b", "#ec4899", "#faf5ff", "#1e1b4b", "#f3e8ff", "#6b21a8", "#e9d5ff"],
            ["system-ui, sans-serif", "Merriweather, Georgia, serif", "Fira Code, monospace"],
            "0.25rem",
        )),
        ("brutalist", preset(
            ["#000000", "#525252", "#ef4444", "#ffffff", "#000000", "#fafafa", "#525252", "#000000"],
            ["Arial, Helvetica, sans-serif", "Times New Roman, serif", "Courier, monospace"],
            "0",
        )),
    ]
});

/// Colors and fonts are given in [`COLOR_SLOTS`] and [`FONT_SLOTS`] order.
fn preset(colors: [&str; 8], fonts: [&str; 3], radius: &str) -> ThemeConfig {
    ThemeConfig {
        colors: Some(COLOR_SLOTS.into_iter().zip(colors).collect()),
        fonts: Some(FONT_SLOTS.into_iter().zip(fonts).collect()),
        radius: Some(radius.to_string()),
    }
}

pub fn built_in_themes() -> impl Iterator<Item = (&'static str, &'static ThemeConfig)> {
    BUILT_IN_THEMES.iter().map(|(name, theme)| (*name, theme))
}

pub fn built_in(name: &str) -> Option<&'static ThemeConfig> {
    built_in_themes().find(|(n, _)| *n == name).map(|(_, theme)| theme)
}

/// Bare theme name with any leading `@gitvoy/theme-` removed.
pub fn theme_name(identifier: &str) -> &str {
    identifier.strip_prefix(THEME_PREFIX).unwrap_or(identifier)
}

/// The effective theme of `config`.
///
/// A `customTheme` wins outright and is returned as written, even when
/// partial. Otherwise the named built-in is used, falling back to
/// [`DEFAULT_THEME`].
pub fn resolve_theme(config: &GitvoyConfig) -> &ThemeConfig {
    if let Some(custom) = &config.custom_theme {
        return custom;
    }

    built_in(theme_name(&config.theme)).unwrap_or_else(default_theme)
}

/// The [`DEFAULT_THEME`] preset, first in the registry.
fn default_theme() -> &'static ThemeConfig {
    &BUILT_IN_THEMES[0].1
}

/// CSS custom property declarations for every defined slot, in emit order:
/// colors, then fonts (each in the order they were written), then radius.
pub fn declarations(theme: &ThemeConfig) -> Vec<(String, &str)> {
    let mut decls = Vec::new();

    if let Some(colors) = &theme.colors {
        for (slot, value) in colors.iter() {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                decls.push((format!("--color-{slot}"), value));
            }
        }
    }

    if let Some(fonts) = &theme.fonts {
        for (slot, value) in fonts.iter() {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                decls.push((format!("--font-{slot}"), value));
            }
        }
    }

    if let Some(radius) = theme.radius.as_deref().filter(|v| !v.is_empty()) {
        decls.push(("--radius".to_string(), radius));
    }

    decls
}

pub fn theme_css(theme: &ThemeConfig) -> String {
    let mut css = String::from(":root {\n");
    for (name, value) in declarations(theme) {
        writeln!(css, "  {name}: {value};").ok();
    }
    css.push('}');
    css
}

/// Config-backed entry point: owns the loader so the config is read once.
pub struct ThemeResolver {
    loader: ConfigLoader,
}

impl ThemeResolver {
    pub fn new(loader: ConfigLoader) -> ThemeResolver {
        ThemeResolver { loader }
    }

    pub fn loader(&self) -> &ConfigLoader {
        &self.loader
    }

    pub fn get_config(&self) -> LoadedConfig {
        self.loader.get_config()
    }

    pub fn get_theme_config(&self) -> ThemeConfig {
        resolve_theme(&self.get_config()).clone()
    }

    pub fn generate_theme_css(&self) -> String {
        theme_css(resolve_theme(&self.get_config()))
    }
}
