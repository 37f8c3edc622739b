//! V2 page document shape: hierarchical blocks with flat styles.
//!
//! Sections contain rows, rows contain columns, columns contain elements.
//! Elements keep structural configuration in `props` and user-facing
//! text/media in `content`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kinds::{ElementType, SectionKind};
use super::lenient;
use super::styles::StyleMap;
use crate::types::Timestamp;

/// Version tag written on every V2 document.
pub const V2_VERSION: u32 = 2;

/// Default column width.
pub const FULL_WIDTH: &str = "full";

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A V2 page document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct V2Document {
    #[serde(deserialize_with = "version_tag")]
    pub version: u32,
    #[serde(deserialize_with = "lenient::seq")]
    pub sections: Vec<V2Section>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub theme: V2Theme,
    #[serde(deserialize_with = "lenient::or_default")]
    pub seo: SeoMeta,

    /// Set when the document was synthesized from a Legacy document.
    #[serde(skip_serializing_if = "std::ops::Not::not", deserialize_with = "lenient::or_default")]
    pub converted_from_legacy: bool,
    /// Human-readable, non-blocking warnings attached during conversion.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "lenient::seq")]
    pub conversion_warnings: Vec<String>,
    /// When the legacy conversion happened.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub converted_at: Option<Timestamp>,

    /// Keys this crate does not model, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for V2Document {
    fn default() -> Self {
        Self {
            version: V2_VERSION,
            sections: Vec::new(),
            theme: V2Theme::default(),
            seo: SeoMeta::default(),
            converted_from_legacy: false,
            conversion_warnings: Vec::new(),
            converted_at: None,
            extra: Map::new(),
        }
    }
}

impl V2Document {
    /// Parse a V2 document from arbitrary JSON. Never fails: malformed parts
    /// degrade to defaults.
    pub fn from_value(value: &Value) -> Self {
        lenient::from_value_or_default(value.clone())
    }

    /// Total number of elements, counting nested children.
    pub fn element_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.rows)
            .flat_map(|r| &r.columns)
            .map(|c| count_elements(&c.elements))
            .sum()
    }
}

fn count_elements(elements: &[V2Element]) -> usize {
    elements
        .iter()
        .map(|el| 1 + el.children.as_deref().map_or(0, count_elements))
        .sum()
}

/// The version field always normalizes to [`V2_VERSION`].
fn version_tag<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let _ = Value::deserialize(deserializer)?;
    Ok(V2_VERSION)
}

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct V2Section {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "lenient::or_default")]
    pub kind: SectionKind,
    #[serde(deserialize_with = "lenient::string")]
    pub display_name: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub rows: Vec<V2Row>,
    #[serde(deserialize_with = "lenient::map")]
    pub styles: StyleMap,
    #[serde(deserialize_with = "lenient::map")]
    pub settings: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct V2Row {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub columns: Vec<V2Column>,
    #[serde(deserialize_with = "lenient::map")]
    pub styles: StyleMap,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct V2Column {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Size fraction such as `"1/2"` or `"full"`.
    #[serde(deserialize_with = "lenient::string")]
    pub width: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub elements: Vec<V2Element>,
    #[serde(deserialize_with = "lenient::map")]
    pub styles: StyleMap,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for V2Column {
    fn default() -> Self {
        Self {
            id: String::new(),
            width: FULL_WIDTH.to_string(),
            elements: Vec::new(),
            styles: StyleMap::new(),
            extra: Map::new(),
        }
    }
}

/// A content element with side-by-side `props` and `content` maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct V2Element {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "lenient::or_default")]
    pub element_type: ElementType,
    /// Structural configuration (heading level, variant, ...).
    #[serde(deserialize_with = "lenient::map")]
    pub props: Map<String, Value>,
    /// User-facing fields: text, label, href, src, alt, placeholder, extras.
    #[serde(deserialize_with = "lenient::map")]
    pub content: Map<String, Value>,
    #[serde(deserialize_with = "lenient::map")]
    pub styles: StyleMap,
    /// Nested elements owned by structural types such as `container`.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_seq")]
    pub children: Option<Vec<V2Element>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl V2Element {
    /// Read a string field from `content`.
    pub fn content_str(&self, key: &str) -> Option<&str> {
        self.content.get(key).and_then(Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Flat V2 theme: named colors, two font families, spacing and radius scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct V2Theme {
    #[serde(deserialize_with = "lenient::or_default")]
    pub colors: ThemeColors,
    #[serde(deserialize_with = "lenient::or_default")]
    pub typography: ThemeTypography,
    #[serde(deserialize_with = "lenient::string_map")]
    pub spacing: BTreeMap<String, String>,
    #[serde(deserialize_with = "lenient::string_map")]
    pub border_radius: BTreeMap<String, String>,
}

impl Default for V2Theme {
    fn default() -> Self {
        Self {
            colors: ThemeColors::default(),
            typography: ThemeTypography::default(),
            spacing: default_spacing_scale(),
            border_radius: default_radius_scale(),
        }
    }
}

/// The six named theme colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    #[serde(deserialize_with = "lenient::string")]
    pub primary: String,
    #[serde(deserialize_with = "lenient::string")]
    pub secondary: String,
    #[serde(deserialize_with = "lenient::string")]
    pub accent: String,
    #[serde(deserialize_with = "lenient::string")]
    pub background: String,
    #[serde(deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(deserialize_with = "lenient::string")]
    pub muted: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: "#3b82f6".to_string(),
            secondary: "#64748b".to_string(),
            accent: "#f59e0b".to_string(),
            background: "#ffffff".to_string(),
            text: "#111827".to_string(),
            muted: "#6b7280".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeTypography {
    #[serde(deserialize_with = "lenient::string")]
    pub heading_font: String,
    #[serde(deserialize_with = "lenient::string")]
    pub body_font: String,
}

/// Font stack used when a theme names no font.
pub const DEFAULT_FONT_FAMILY: &str = "Inter, system-ui, sans-serif";

impl Default for ThemeTypography {
    fn default() -> Self {
        Self {
            heading_font: DEFAULT_FONT_FAMILY.to_string(),
            body_font: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

pub fn default_spacing_scale() -> BTreeMap<String, String> {
    [
        ("xs", "0.25rem"),
        ("sm", "0.5rem"),
        ("md", "1rem"),
        ("lg", "1.5rem"),
        ("xl", "2rem"),
        ("2xl", "3rem"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn default_radius_scale() -> BTreeMap<String, String> {
    [
        ("none", "0"),
        ("sm", "0.25rem"),
        ("md", "0.5rem"),
        ("lg", "1rem"),
        ("full", "9999px"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

// ---------------------------------------------------------------------------
// SEO
// ---------------------------------------------------------------------------

/// Search metadata. Shared by V2 (`seo`) and V3 (`meta`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeoMeta {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "keywords")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub og_image: Option<String>,
}

/// Keywords arrive either as an array or as one comma-separated string.
pub(crate) fn keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_keywords(&value))
}

pub(crate) fn parse_keywords(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(items) => items.iter().filter_map(lenient::value_to_string).collect(),
        _ => Vec::new(),
    }
}
