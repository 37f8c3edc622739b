//! V3 page document shape: components with responsive and state-aware
//! styling, themed through design tokens.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kinds::{ElementType, SectionKind};
use super::lenient;
use super::styles::{deserialize_responsive, Breakpoint, ResponsiveStyles, StateStyles};
use super::v2::{SeoMeta, DEFAULT_FONT_FAMILY, FULL_WIDTH};
use crate::types::Timestamp;

/// Version tag written on every V3 document.
pub const V3_VERSION: &str = "3.0";

/// Monospace font stack for code-like content.
pub const DEFAULT_MONO_FONT: &str = "ui-monospace, SFMono-Regular, Menlo, monospace";

/// Page metadata. Same fields as the V2 `seo` block.
pub type PageMeta = SeoMeta;

/// Numbered color ramp (`50` lightest ... `900` darkest).
pub type ColorRamp = BTreeMap<u16, String>;

/// Ramp step read and written for single-entry color ramps.
pub const BASE_RAMP_STEP: u16 = 500;

/// Neutral step used for page backgrounds.
pub const LIGHTEST_NEUTRAL_STEP: u16 = 50;

/// Neutral step used for body text.
pub const DARKEST_NEUTRAL_STEP: u16 = 900;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A V3 page document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct V3Document {
    #[serde(deserialize_with = "version_tag")]
    pub version: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub sections: Vec<V3Section>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub design_tokens: DesignTokens,
    #[serde(deserialize_with = "lenient::or_default")]
    pub meta: PageMeta,

    #[serde(skip_serializing_if = "std::ops::Not::not", deserialize_with = "lenient::or_default")]
    pub converted_from_legacy: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "lenient::seq")]
    pub conversion_warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub converted_at: Option<Timestamp>,

    /// Keys this crate does not model, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for V3Document {
    fn default() -> Self {
        Self {
            version: V3_VERSION.to_string(),
            sections: Vec::new(),
            design_tokens: DesignTokens::default(),
            meta: PageMeta::default(),
            converted_from_legacy: false,
            conversion_warnings: Vec::new(),
            converted_at: None,
            extra: Map::new(),
        }
    }
}

impl V3Document {
    /// Parse a V3 document from arbitrary JSON. Never fails: malformed parts
    /// degrade to defaults.
    pub fn from_value(value: &Value) -> Self {
        lenient::from_value_or_default(value.clone())
    }
}

/// Keep 3.x tags as written, normalize anything else to [`V3_VERSION`].
fn version_tag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match lenient::value_to_string(&value) {
        Some(tag) if tag == "3" || tag.starts_with("3.") => tag,
        _ => V3_VERSION.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct V3Section {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "lenient::or_default")]
    pub kind: SectionKind,
    #[serde(deserialize_with = "lenient::string")]
    pub display_name: String,
    /// Optional HTML tag hint for the renderer (`header`, `section`, ...).
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub semantic_tag: Option<String>,
    #[serde(deserialize_with = "lenient::seq")]
    pub rows: Vec<V3Row>,
    #[serde(deserialize_with = "deserialize_responsive")]
    pub styles: ResponsiveStyles,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub state_styles: Option<StateStyles>,
    #[serde(deserialize_with = "lenient::map")]
    pub settings: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct V3Row {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub columns: Vec<V3Column>,
    #[serde(deserialize_with = "deserialize_responsive")]
    pub styles: ResponsiveStyles,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct V3Column {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub width: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub elements: Vec<V3Element>,
    #[serde(deserialize_with = "deserialize_responsive")]
    pub styles: ResponsiveStyles,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for V3Column {
    fn default() -> Self {
        Self {
            id: String::new(),
            width: FULL_WIDTH.to_string(),
            elements: Vec::new(),
            styles: ResponsiveStyles::default(),
            extra: Map::new(),
        }
    }
}

/// A component with a single merged `props` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct V3Element {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "lenient::or_default")]
    pub element_type: ElementType,
    #[serde(deserialize_with = "lenient::map")]
    pub props: Map<String, Value>,
    #[serde(deserialize_with = "deserialize_responsive")]
    pub styles: ResponsiveStyles,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub state_styles: Option<StateStyles>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_seq")]
    pub children: Option<Vec<V3Element>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl V3Element {
    /// Read a string prop.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Design tokens
// ---------------------------------------------------------------------------

/// Tiered design tokens: color ramps, semantic colors, typography scale,
/// spacing, radii and breakpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignTokens {
    #[serde(deserialize_with = "lenient::or_default")]
    pub colors: ColorTokens,
    #[serde(deserialize_with = "lenient::or_default")]
    pub typography: TypographyTokens,
    #[serde(deserialize_with = "lenient::string_map")]
    pub spacing: BTreeMap<String, String>,
    #[serde(deserialize_with = "lenient::string_map")]
    pub border_radius: BTreeMap<String, String>,
    #[serde(deserialize_with = "lenient::string_map")]
    pub breakpoints: BTreeMap<String, String>,
}

impl Default for DesignTokens {
    fn default() -> Self {
        super::theme_tokens::theme_to_tokens(&super::v2::V2Theme::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorTokens {
    #[serde(deserialize_with = "ramp")]
    pub primary: ColorRamp,
    #[serde(deserialize_with = "ramp")]
    pub secondary: ColorRamp,
    #[serde(deserialize_with = "ramp")]
    pub accent: ColorRamp,
    #[serde(deserialize_with = "ramp")]
    pub neutral: ColorRamp,
    #[serde(deserialize_with = "lenient::or_default")]
    pub semantic: SemanticColors,
}

/// Fixed semantic color set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticColors {
    #[serde(deserialize_with = "lenient::string")]
    pub success: String,
    #[serde(deserialize_with = "lenient::string")]
    pub warning: String,
    #[serde(deserialize_with = "lenient::string")]
    pub error: String,
    #[serde(deserialize_with = "lenient::string")]
    pub info: String,
}

impl Default for SemanticColors {
    fn default() -> Self {
        Self {
            success: "#16a34a".to_string(),
            warning: "#d97706".to_string(),
            error: "#dc2626".to_string(),
            info: "#2563eb".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypographyTokens {
    #[serde(deserialize_with = "lenient::or_default")]
    pub font_families: FontFamilies,
    #[serde(deserialize_with = "lenient::string_map")]
    pub font_sizes: BTreeMap<String, String>,
    #[serde(deserialize_with = "lenient::string_map")]
    pub font_weights: BTreeMap<String, String>,
    #[serde(deserialize_with = "lenient::string_map")]
    pub line_heights: BTreeMap<String, String>,
}

impl Default for TypographyTokens {
    fn default() -> Self {
        Self {
            font_families: FontFamilies::default(),
            font_sizes: scale(&[
                ("xs", "0.75rem"),
                ("sm", "0.875rem"),
                ("base", "1rem"),
                ("lg", "1.125rem"),
                ("xl", "1.25rem"),
                ("2xl", "1.5rem"),
                ("3xl", "1.875rem"),
                ("4xl", "2.25rem"),
            ]),
            font_weights: scale(&[
                ("normal", "400"),
                ("medium", "500"),
                ("semibold", "600"),
                ("bold", "700"),
            ]),
            line_heights: scale(&[("tight", "1.25"), ("normal", "1.5"), ("relaxed", "1.75")]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontFamilies {
    #[serde(deserialize_with = "lenient::string")]
    pub heading: String,
    #[serde(deserialize_with = "lenient::string")]
    pub body: String,
    #[serde(deserialize_with = "lenient::string")]
    pub mono: String,
}

impl Default for FontFamilies {
    fn default() -> Self {
        Self {
            heading: DEFAULT_FONT_FAMILY.to_string(),
            body: DEFAULT_FONT_FAMILY.to_string(),
            mono: DEFAULT_MONO_FONT.to_string(),
        }
    }
}

/// The three named breakpoints with their default widths.
pub fn default_breakpoints() -> BTreeMap<String, String> {
    Breakpoint::ALL
        .iter()
        .map(|bp| (bp.as_str().to_string(), bp.default_width().to_string()))
        .collect()
}

fn scale(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Color ramps keep only numeric step keys with string values.
fn ramp<'de, D>(deserializer: D) -> Result<ColorRamp, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(obj) = value else {
        return Ok(ColorRamp::new());
    };
    Ok(obj
        .iter()
        .filter_map(|(step, color)| {
            let step = step.trim().parse::<u16>().ok()?;
            let color = color.as_str()?;
            Some((step, color.to_string()))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_tokens_include_fixed_breakpoints() {
        let tokens = DesignTokens::default();
        assert_eq!(tokens.breakpoints.get("mobile").unwrap(), "768px");
        assert_eq!(tokens.breakpoints.get("tablet").unwrap(), "1024px");
        assert_eq!(tokens.breakpoints.get("desktop").unwrap(), "1280px");
    }

    #[test]
    fn ramp_keys_serialize_as_strings() {
        let tokens = DesignTokens::default();
        let value = serde_json::to_value(&tokens).unwrap();
        assert!(value["colors"]["primary"]["500"].is_string());
    }

    #[test]
    fn ramp_ignores_non_numeric_steps() {
        let doc = V3Document::from_value(&json!({
            "designTokens": { "colors": { "primary": {
                "500": "#0066ff", "base": "#000000", "700": 12
            } } }
        }));
        let primary = &doc.design_tokens.colors.primary;
        assert_eq!(primary.len(), 1);
        assert_eq!(primary.get(&500).unwrap(), "#0066ff");
    }

    #[test]
    fn version_tag_is_normalized() {
        assert_eq!(V3Document::from_value(&json!({ "version": 3 })).version, "3");
        assert_eq!(V3Document::from_value(&json!({ "version": "3.2" })).version, "3.2");
        assert_eq!(V3Document::from_value(&json!({ "version": 2 })).version, V3_VERSION);
        assert_eq!(V3Document::from_value(&json!({})).version, V3_VERSION);
    }

    #[test]
    fn element_state_styles_parse() {
        let doc = V3Document::from_value(&json!({
            "sections": [{ "id": "s1", "rows": [{ "id": "r1", "columns": [{ "id": "c1",
                "elements": [{
                    "id": "b1",
                    "type": "button",
                    "props": { "label": "Go" },
                    "styles": { "desktop": { "padding": "1rem" } },
                    "stateStyles": { "hover": { "opacity": 0.9 } }
                }]
            }] }] }]
        }));
        let el = &doc.sections[0].rows[0].columns[0].elements[0];
        assert_eq!(el.prop_str("label"), Some("Go"));
        assert!(el.state_styles.as_ref().unwrap().hover.is_some());
        assert_eq!(el.styles.desktop.as_ref().unwrap()["padding"], "1rem");
    }

    #[test]
    fn empty_document_serializes_meta_and_tokens() {
        let value = serde_json::to_value(V3Document::default()).unwrap();
        assert_eq!(value["version"], V3_VERSION);
        assert!(value["designTokens"].is_object());
        assert!(value["meta"].is_object());
    }
}
