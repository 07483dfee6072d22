use indexmap::IndexMap;
use serde::{Serialize, Deserialize};

/// Config file name, resolved against the site root.
pub const CONFIG_FILE: &str = "gitvoy.config.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitvoyConfig {
    pub version: u32,
    pub theme: String,
    pub site: Site,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_theme: Option<ThemeConfig>,
}

impl Default for GitvoyConfig {
    fn default() -> GitvoyConfig {
        GitvoyConfig {
            version: 1,
            theme: "minimal".to_string(),
            site: Site {
                title: "My Blog".to_string(),
                description: Some("Welcome to my blog".to_string()),
                author: None,
                social: None,
            },
            custom_theme: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social: Option<Social>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Social {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

/// Color slots every built-in theme defines, in registry order.
pub const COLOR_SLOTS: [&str; 8] = [
    "primary",
    "secondary",
    "accent",
    "background",
    "foreground",
    "muted",
    "mutedForeground",
    "border",
];

pub const FONT_SLOTS: [&str; 3] = ["sans", "serif", "mono"];

/// A theme as written in the config file. Every field is optional and
/// nothing is defaulted here; missing slots are simply not emitted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<ThemeSlots>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fonts: Option<ThemeSlots>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<String>,
}

/// Named slot values (`colors` or `fonts`) in the order they were written.
///
/// Slot names are not checked against [`COLOR_SLOTS`] or [`FONT_SLOTS`]:
/// extra names are kept and emitted like the known ones. A `null` value
/// is kept as an undefined slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeSlots(IndexMap<String, Option<String>>);

impl ThemeSlots {
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.0.get(slot).and_then(|v| v.as_deref())
    }

    pub fn insert(&mut self, slot: impl Into<String>, value: impl Into<String>) {
        self.0.insert(slot.into(), Some(value.into()));
    }

    /// Slots with their values, undefined ones included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(slot, value)| (slot.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>, V: Into<String>> FromIterator<(S, V)> for ThemeSlots {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> ThemeSlots {
        let mut slots = ThemeSlots::default();
        for (slot, value) in iter {
            slots.insert(slot, value);
        }
        slots
    }
}
