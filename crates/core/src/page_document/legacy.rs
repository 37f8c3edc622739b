//! Legacy page document shape: flat, untyped, no version marker.
//!
//! Each section holds free-form `content` and `config` maps. Only a handful
//! of their keys are understood; the rest is carried along untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;
use super::v2::{keywords, DEFAULT_FONT_FAMILY};

/// Content keys the upgrader knows how to render.
pub const KNOWN_CONTENT_KEYS: &[&str] = &["title", "subtitle", "ctaLabel", "benefits"];

/// Config keys the upgrader maps onto section styles.
pub const KNOWN_CONFIG_KEYS: &[&str] = &["backgroundColor", "textAlign"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyDocument {
    #[serde(deserialize_with = "lenient::seq")]
    pub sections: Vec<LegacySection>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub theme: LegacyTheme,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "keywords")]
    pub keywords: Vec<String>,
}

impl LegacyDocument {
    /// Parse a Legacy document from arbitrary JSON. Never fails.
    pub fn from_value(value: &Value) -> Self {
        lenient::from_value_or_default(value.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacySection {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Free-form section type (`hero`, `benefits`, ...).
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub section_type: String,
    #[serde(deserialize_with = "lenient::map")]
    pub content: Map<String, Value>,
    #[serde(deserialize_with = "lenient::map")]
    pub config: Map<String, Value>,
    /// Any other top-level section keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LegacySection {
    /// A scalar content field as trimmed text. Blank values count as absent.
    pub fn content_text(&self, key: &str) -> Option<String> {
        self.content
            .get(key)
            .and_then(lenient::value_to_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Content entries the upgrader cannot render: keys outside
    /// [`KNOWN_CONTENT_KEYS`], plus known keys holding an unusable shape
    /// (an object `title`, a non-array `benefits`, ...).
    pub fn unknown_content(&self) -> Map<String, Value> {
        self.content
            .iter()
            .filter(|(key, value)| match key.as_str() {
                "benefits" => !(value.is_array() || value.is_null()),
                known if KNOWN_CONTENT_KEYS.contains(&known) => {
                    value.is_object() || value.is_array()
                }
                _ => true,
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Config entries outside [`KNOWN_CONFIG_KEYS`].
    pub fn unknown_config(&self) -> Map<String, Value> {
        filter_unknown(&self.config, KNOWN_CONFIG_KEYS)
    }
}

fn filter_unknown(map: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    map.iter()
        .filter(|(key, _)| !known.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyTheme {
    #[serde(deserialize_with = "lenient::string")]
    pub primary_color: String,
    #[serde(deserialize_with = "lenient::string")]
    pub secondary_color: String,
    #[serde(deserialize_with = "lenient::string")]
    pub background_color: String,
    #[serde(deserialize_with = "lenient::string")]
    pub text_color: String,
    #[serde(deserialize_with = "lenient::string")]
    pub font_family: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub heading_font: Option<String>,
}

impl Default for LegacyTheme {
    fn default() -> Self {
        Self {
            primary_color: "#3b82f6".to_string(),
            secondary_color: "#64748b".to_string(),
            background_color: "#ffffff".to_string(),
            text_color: "#111827".to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            heading_font: None,
        }
    }
}
