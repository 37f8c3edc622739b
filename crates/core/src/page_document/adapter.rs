//! Document adapter facade.
//!
//! The single entry point callers use to read persisted page documents of
//! unknown generation and to move documents between generations. Every
//! conversion here is total: unrecognized input resolves to an empty
//! canonical document rather than an error.

use serde_json::Value;

use super::detection::{classify, DocumentVersion};
use super::legacy::LegacyDocument;
use super::legacy_upgrade::upgrade_legacy;
use super::structure::{carry_extra, section_to_v2, section_to_v3};
use super::theme_tokens::{theme_to_tokens, tokens_to_theme};
use super::v2::{V2Document, V2_VERSION};
use super::v3::{V3Document, V3_VERSION};
use crate::error::CoreError;

pub use super::downgrade::downgrade_to_legacy;

const V3_ONLY_DOCUMENT_KEYS: &[&str] = &["designTokens", "meta"];
const V2_ONLY_DOCUMENT_KEYS: &[&str] = &["theme", "seo"];

/// Maximum accepted size of a serialized document (5 MB).
pub const MAX_DOCUMENT_JSON_SIZE: usize = 5_000_000;

// ---------------------------------------------------------------------------
// Normalization entry points
// ---------------------------------------------------------------------------

/// Read any persisted document as V2.
///
/// V3 input is converted with a warning; prefer [`convert_v3_to_v2`] when the
/// caller already knows it holds a V3 document.
pub fn ensure_v2(doc: &Value) -> V2Document {
    if !doc.is_object() {
        return empty_v2_document();
    }
    match classify(doc) {
        DocumentVersion::V2 => V2Document::from_value(doc),
        DocumentVersion::Legacy => upgrade_legacy(&LegacyDocument::from_value(doc)),
        DocumentVersion::V3 => {
            tracing::warn!("ensure_v2 received a V3 document; downgrading to V2");
            convert_v3_to_v2(&V3Document::from_value(doc))
        }
    }
}

/// Read any persisted document as V3. The recommended read path.
pub fn ensure_v3(doc: &Value) -> V3Document {
    if !doc.is_object() {
        return empty_v3_document();
    }
    match classify(doc) {
        DocumentVersion::V3 => V3Document::from_value(doc),
        DocumentVersion::V2 => convert_v2_to_v3(&V2Document::from_value(doc)),
        DocumentVersion::Legacy => {
            convert_v2_to_v3(&upgrade_legacy(&LegacyDocument::from_value(doc)))
        }
    }
}

/// Normalize any persisted document to the requested generation.
pub fn normalize(doc: &Value, target: DocumentVersion) -> PageDocument {
    match target {
        DocumentVersion::Legacy => {
            if doc.is_object() && classify(doc) == DocumentVersion::Legacy {
                PageDocument::Legacy(LegacyDocument::from_value(doc))
            } else if doc.is_object() {
                PageDocument::Legacy(downgrade_to_legacy(&ensure_v2(doc)))
            } else {
                PageDocument::Legacy(empty_legacy_document())
            }
        }
        DocumentVersion::V2 => PageDocument::V2(ensure_v2(doc)),
        DocumentVersion::V3 => PageDocument::V3(ensure_v3(doc)),
    }
}

// ---------------------------------------------------------------------------
// V2 <-> V3
// ---------------------------------------------------------------------------

pub fn convert_v2_to_v3(doc: &V2Document) -> V3Document {
    tracing::debug!(sections = doc.sections.len(), "Converting page document V2 -> V3");
    V3Document {
        version: V3_VERSION.to_string(),
        sections: doc.sections.iter().map(section_to_v3).collect(),
        design_tokens: theme_to_tokens(&doc.theme),
        meta: doc.seo.clone(),
        converted_from_legacy: doc.converted_from_legacy,
        conversion_warnings: doc.conversion_warnings.clone(),
        converted_at: doc.converted_at,
        extra: carry_extra(&doc.extra, V3_ONLY_DOCUMENT_KEYS, "document"),
    }
}

pub fn convert_v3_to_v2(doc: &V3Document) -> V2Document {
    tracing::debug!(sections = doc.sections.len(), "Converting page document V3 -> V2");
    V2Document {
        version: V2_VERSION,
        sections: doc.sections.iter().map(section_to_v2).collect(),
        theme: tokens_to_theme(&doc.design_tokens),
        seo: doc.meta.clone(),
        converted_from_legacy: doc.converted_from_legacy,
        conversion_warnings: doc.conversion_warnings.clone(),
        converted_at: doc.converted_at,
        extra: carry_extra(&doc.extra, V2_ONLY_DOCUMENT_KEYS, "document"),
    }
}

// ---------------------------------------------------------------------------
// Empty documents
// ---------------------------------------------------------------------------

pub fn empty_legacy_document() -> LegacyDocument {
    LegacyDocument::default()
}

pub fn empty_v2_document() -> V2Document {
    V2Document::default()
}

pub fn empty_v3_document() -> V3Document {
    V3Document::default()
}

// ---------------------------------------------------------------------------
// Tagged union
// ---------------------------------------------------------------------------

/// A page document of any generation.
#[derive(Debug, Clone, PartialEq)]
pub enum PageDocument {
    Legacy(LegacyDocument),
    V2(V2Document),
    V3(V3Document),
}

impl PageDocument {
    /// Classify and parse. Never fails.
    pub fn from_value(doc: &Value) -> Self {
        match classify(doc) {
            DocumentVersion::Legacy => Self::Legacy(LegacyDocument::from_value(doc)),
            DocumentVersion::V2 => Self::V2(V2Document::from_value(doc)),
            DocumentVersion::V3 => Self::V3(V3Document::from_value(doc)),
        }
    }

    pub fn version(&self) -> DocumentVersion {
        match self {
            Self::Legacy(_) => DocumentVersion::Legacy,
            Self::V2(_) => DocumentVersion::V2,
            Self::V3(_) => DocumentVersion::V3,
        }
    }

    pub fn to_value(&self) -> Result<Value, CoreError> {
        let value = match self {
            Self::Legacy(doc) => serde_json::to_value(doc),
            Self::V2(doc) => serde_json::to_value(doc),
            Self::V3(doc) => serde_json::to_value(doc),
        };
        value.map_err(|e| CoreError::Internal(format!("Failed to serialize page document: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Raw JSON edge
// ---------------------------------------------------------------------------

/// Validate that raw document JSON does not exceed `max_bytes`.
pub fn validate_document_json_size(json: &str, max_bytes: usize) -> Result<(), CoreError> {
    if json.len() > max_bytes {
        return Err(CoreError::Validation(format!(
            "Document JSON exceeds maximum size of {} bytes (got {} bytes)",
            max_bytes,
            json.len()
        )));
    }
    Ok(())
}

/// Parse raw document JSON, enforcing [`MAX_DOCUMENT_JSON_SIZE`].
pub fn parse_document_json(json: &str) -> Result<Value, CoreError> {
    parse_document_json_with_limit(json, MAX_DOCUMENT_JSON_SIZE)
}

/// Parse raw document JSON, enforcing a caller-chosen size limit.
pub fn parse_document_json_with_limit(json: &str, max_bytes: usize) -> Result<Value, CoreError> {
    validate_document_json_size(json, max_bytes)?;
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_document::kinds::ElementType;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn v2_page() -> Value {
        json!({
            "version": 2,
            "sections": [{
                "id": "hero",
                "type": "hero",
                "styles": { "backgroundColor": "#000" },
                "rows": [{ "id": "r1", "columns": [{ "id": "c1", "elements": [
                    { "id": "h", "type": "heading", "props": { "level": 1 }, "content": { "text": "Welcome" } }
                ] }] }]
            }],
            "seo": { "title": "Test Page" }
        })
    }

    // -- ensure_v3 ------------------------------------------------------------

    #[test]
    fn ensure_v3_converts_v2() {
        let v3 = ensure_v3(&v2_page());
        assert_eq!(v3.version, V3_VERSION);
        assert_eq!(v3.meta.title, "Test Page");
        let heading = &v3.sections[0].rows[0].columns[0].elements[0];
        assert_eq!(heading.prop_str("text"), Some("Welcome"));
    }

    #[test]
    fn ensure_v3_passes_v3_through() {
        let v3 = convert_v2_to_v3(&V2Document::from_value(&v2_page()));
        let value = serde_json::to_value(&v3).unwrap();
        assert_eq!(ensure_v3(&value), v3);
    }

    #[test]
    fn ensure_v3_upgrades_legacy() {
        let v3 = ensure_v3(&json!({ "sections": [{ "id": "s", "type": "hero", "content": { "title": "Hi" } }] }));
        assert!(v3.converted_from_legacy);
        assert!(!v3.conversion_warnings.is_empty());
        let heading = &v3.sections[0].rows[0].columns[0].elements[0];
        assert_eq!(heading.element_type, ElementType::Heading);
        assert_eq!(heading.prop_str("text"), Some("Hi"));
    }

    #[test]
    fn non_object_input_yields_empty_documents() {
        for value in [json!(null), json!("x"), json!([1])] {
            assert_eq!(ensure_v3(&value), empty_v3_document());
            assert_eq!(ensure_v2(&value), empty_v2_document());
        }
    }

    // -- ensure_v2 ------------------------------------------------------------

    #[test]
    fn ensure_v2_returns_v2_as_parsed() {
        let v2 = ensure_v2(&v2_page());
        assert_eq!(v2, V2Document::from_value(&v2_page()));
        assert!(!v2.converted_from_legacy);
    }

    #[test]
    fn ensure_v2_converts_v3_instead_of_discarding() {
        let v3 = serde_json::to_value(ensure_v3(&v2_page())).unwrap();
        let v2 = ensure_v2(&v3);
        assert_eq!(v2.sections[0].id, "hero");
        assert_eq!(v2.sections[0].styles["backgroundColor"], "#000");
    }

    #[test]
    fn ensure_v2_keeps_unknown_types_and_keys() {
        let mut page = v2_page();
        page["sections"][0]["rows"][0]["columns"][0]["elements"][0] =
            json!({ "id": "t", "type": "testimonial", "visible": false });
        page["layoutMode"] = json!("boxed");

        let value = serde_json::to_value(ensure_v2(&page)).unwrap();
        let element = &value["sections"][0]["rows"][0]["columns"][0]["elements"][0];
        assert_eq!(element["type"], "testimonial");
        assert_eq!(element["visible"], false);
        assert_eq!(value["layoutMode"], "boxed");
    }

    // -- conversions ----------------------------------------------------------

    #[test]
    fn document_extra_keys_cross_generations() {
        let mut page = v2_page();
        page["pageSettings"] = json!({ "width": 1200 });
        page["meta"] = json!("clashes with the V3 meta field");

        let v3 = convert_v2_to_v3(&V2Document::from_value(&page));
        assert_eq!(v3.extra["pageSettings"]["width"], 1200);
        assert!(!v3.extra.contains_key("meta"));
        assert_eq!(v3.meta.title, "Test Page");

        let back = convert_v3_to_v2(&v3);
        assert_eq!(back.extra["pageSettings"]["width"], 1200);
    }

    #[test]
    fn legacy_marker_fields_carry_across_generations() {
        let upgraded = ensure_v2(&json!({ "sections": [] }));
        let v3 = convert_v2_to_v3(&upgraded);
        assert!(v3.converted_from_legacy);
        assert_eq!(v3.conversion_warnings, upgraded.conversion_warnings);
        assert_eq!(v3.converted_at, upgraded.converted_at);
        assert_eq!(convert_v3_to_v2(&v3).converted_at, upgraded.converted_at);
    }

    #[test]
    fn theme_and_tokens_round_trip() {
        let v2 = V2Document::from_value(&json!({
            "theme": { "colors": { "primary": "#123456", "muted": "#999999" } }
        }));
        let back = convert_v3_to_v2(&convert_v2_to_v3(&v2));
        assert_eq!(back.theme, v2.theme);
    }

    #[test]
    fn normalize_to_each_target() {
        assert_matches!(normalize(&v2_page(), DocumentVersion::V3), PageDocument::V3(_));
        assert_matches!(normalize(&v2_page(), DocumentVersion::V2), PageDocument::V2(_));
        assert_matches!(
            normalize(&v2_page(), DocumentVersion::Legacy),
            PageDocument::Legacy(doc) if doc.sections[0].content["title"] == "Welcome"
        );
        assert_matches!(
            normalize(&json!(null), DocumentVersion::Legacy),
            PageDocument::Legacy(doc) if doc.sections.is_empty()
        );
    }

    // -- PageDocument ---------------------------------------------------------

    #[test]
    fn page_document_classifies_input() {
        assert_matches!(PageDocument::from_value(&v2_page()), PageDocument::V2(_));
        assert_matches!(PageDocument::from_value(&json!({ "meta": {} })), PageDocument::V3(_));
        assert_matches!(PageDocument::from_value(&json!({})), PageDocument::Legacy(_));
    }

    #[test]
    fn page_document_to_value_matches_version() {
        let doc = PageDocument::from_value(&v2_page());
        assert_eq!(doc.version(), DocumentVersion::V2);
        let value = doc.to_value().unwrap();
        assert_eq!(classify(&value), DocumentVersion::V2);
        assert_eq!(value["version"], 2);
    }

    // -- raw JSON -------------------------------------------------------------

    #[test]
    fn parse_rejects_malformed_json() {
        assert_matches!(parse_document_json("{not json"), Err(CoreError::MalformedJson(_)));
    }

    #[test]
    fn parse_rejects_oversized_json() {
        let json = format!("{{\"title\":\"{}\"}}", "a".repeat(64));
        assert_matches!(
            parse_document_json_with_limit(&json, 16),
            Err(CoreError::Validation(msg)) if msg.contains("16 bytes")
        );
        assert!(parse_document_json_with_limit(&json, 1_000).is_ok());
    }

    #[test]
    fn parse_accepts_any_json_value() {
        assert_eq!(parse_document_json("null").unwrap(), Value::Null);
    }
}
