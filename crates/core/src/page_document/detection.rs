//! Structural version detection for persisted page documents.
//!
//! None of the generations is required to carry a reliable version tag (the
//! Legacy shape has none at all), so classification sniffs structure. All
//! checks live here, evaluated in a fixed priority order:
//!
//! 1. V3: 3.x version tag, a `designTokens` or `meta` field, or a first
//!    section whose styles are keyed by breakpoint name.
//! 2. V2: version tag 2, a first section with a `rows` array, or a theme
//!    exposing both `colors` and `typography`.
//! 3. [`FALLBACK_VERSION`].
//!
//! V3 signals are checked first so a V3 document that also satisfies a loose
//! V2 heuristic still classifies as V3.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::styles::is_breakpoint_keyed;

/// Page document generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentVersion {
    Legacy,
    V2,
    V3,
}

impl DocumentVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::V2 => "v2",
            Self::V3 => "v3",
        }
    }

    /// Parse a version name. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Some(Self::Legacy),
            "v2" | "2" => Some(Self::V2),
            "v3" | "3" => Some(Self::V3),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification applied when no V3 or V2 signal matches, including
/// `null`, non-object input and empty objects.
pub const FALLBACK_VERSION: DocumentVersion = DocumentVersion::Legacy;

/// The structural signal that decided a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSignal {
    /// Explicit `version` field.
    VersionTag,
    /// Top-level `designTokens` field.
    DesignTokens,
    /// Top-level `meta` field.
    MetaField,
    /// First section styles keyed by breakpoint name.
    ResponsiveSectionStyles,
    /// First section exposes a `rows` array.
    SectionRows,
    /// Theme exposes both `colors` and `typography`.
    ThemeShape,
    /// Nothing matched; [`FALLBACK_VERSION`] applied.
    Fallback,
}

/// Result of [`detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub version: DocumentVersion,
    pub signal: DetectionSignal,
}

/// Classify a document and report which signal decided.
pub fn detect(doc: &Value) -> Detection {
    let detection = if let Some(signal) = v3_signal(doc) {
        Detection {
            version: DocumentVersion::V3,
            signal,
        }
    } else if let Some(signal) = v2_signal(doc) {
        Detection {
            version: DocumentVersion::V2,
            signal,
        }
    } else {
        Detection {
            version: FALLBACK_VERSION,
            signal: DetectionSignal::Fallback,
        }
    };
    tracing::debug!(
        version = %detection.version,
        signal = ?detection.signal,
        "Classified page document",
    );
    detection
}

/// Classify a document. Total: never fails, never returns "unknown".
pub fn classify(doc: &Value) -> DocumentVersion {
    detect(doc).version
}

pub fn is_v3(doc: &Value) -> bool {
    v3_signal(doc).is_some()
}

pub fn is_v2(doc: &Value) -> bool {
    !is_v3(doc) && v2_signal(doc).is_some()
}

pub fn is_legacy(doc: &Value) -> bool {
    classify(doc) == DocumentVersion::Legacy
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

fn v3_signal(doc: &Value) -> Option<DetectionSignal> {
    let obj = doc.as_object()?;
    if obj.get("version").is_some_and(|tag| tag_matches(tag, 3)) {
        return Some(DetectionSignal::VersionTag);
    }
    if obj.contains_key("designTokens") {
        return Some(DetectionSignal::DesignTokens);
    }
    if obj.contains_key("meta") {
        return Some(DetectionSignal::MetaField);
    }
    if first_section(doc)
        .and_then(|section| section.get("styles"))
        .is_some_and(is_breakpoint_keyed)
    {
        return Some(DetectionSignal::ResponsiveSectionStyles);
    }
    None
}

fn v2_signal(doc: &Value) -> Option<DetectionSignal> {
    let obj = doc.as_object()?;
    if obj.get("version").is_some_and(|tag| tag_matches(tag, 2)) {
        return Some(DetectionSignal::VersionTag);
    }
    if first_section(doc)
        .and_then(|section| section.get("rows"))
        .is_some_and(Value::is_array)
    {
        return Some(DetectionSignal::SectionRows);
    }
    if let Some(theme) = obj.get("theme").and_then(Value::as_object) {
        if theme.contains_key("colors") && theme.contains_key("typography") {
            return Some(DetectionSignal::ThemeShape);
        }
    }
    None
}

fn first_section(doc: &Value) -> Option<&Value> {
    doc.get("sections")?.as_array()?.first()
}

/// Whether a version tag names `major` (`3`, `3.1`, `"3"`, `"3.0"`, `"v3"`).
fn tag_matches(tag: &Value, major: u64) -> bool {
    match tag {
        Value::Number(n) => {
            if let Some(int) = n.as_u64() {
                int == major
            } else {
                n.as_f64().is_some_and(|f| f.trunc() == major as f64 && f >= 0.0)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            let s = s.strip_prefix(['v', 'V']).unwrap_or(s);
            let major = major.to_string();
            s == major || s.strip_prefix(major.as_str()).is_some_and(|rest| rest.starts_with('.'))
        }
        _ => false,
    }
}
