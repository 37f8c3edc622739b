//! Legacy -> V2 upgrade.
//!
//! Every legacy section becomes one section with a single row and a single
//! full-width column. Elements are synthesized from the known content fields
//! in a fixed order:
//!
//! 1. `title`    -> heading (level 1 in hero sections, 2 elsewhere)
//! 2. `subtitle` -> text
//! 3. `ctaLabel` -> button
//! 4. `benefits` -> one text line per entry (`✓ title: description`)
//!
//! Fields the upgrader cannot render, including benefit entries with neither
//! a title nor a description, are serialized into one hidden metadata
//! element per section. A section without visible output gets a placeholder
//! text element, and a document without sections gets a placeholder section.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::ids::IdGenerator;
use super::kinds::{ElementType, SectionKind};
use super::legacy::{LegacyDocument, LegacySection, LegacyTheme, KNOWN_CONFIG_KEYS};
use super::lenient::value_to_string;
use super::styles::StyleMap;
use super::v2::{
    SeoMeta, ThemeColors, ThemeTypography, V2Column, V2Document, V2Element, V2Row, V2Section,
    V2Theme, FULL_WIDTH, V2_VERSION,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Warnings attached to every upgraded document, shown by editors as a
/// non-blocking banner.
pub const LEGACY_UPGRADE_WARNINGS: &[&str] = &[
    "This page was converted from the legacy page format. Review its layout before publishing.",
    "Benefit lists were converted to plain text lines; icons on titled benefits were not kept.",
    "Legacy fields without a visual equivalent were kept as hidden metadata and are not rendered.",
];

/// Text of the placeholder element emitted for sections without content.
pub const EMPTY_CONTENT_TEXT: &str = "This section has no content yet.";

/// Prefix of every rendered benefit line.
pub const BENEFIT_MARKER: &str = "✓";

/// Link target of buttons synthesized from `ctaLabel`.
pub const DEFAULT_CTA_HREF: &str = "#";

/// Prop flagging the hidden element that carries unrendered legacy fields.
pub const LEGACY_METADATA_PROP: &str = "legacyMetadata";

/// Content key holding the serialized unrendered legacy fields.
pub const LEGACY_FIELDS_KEY: &str = "legacyFields";

/// Metadata bucket holding benefit entries that produced no text line.
pub const UNRENDERED_BENEFITS_BUCKET: &str = "benefits";

/// Prop flagging synthesized placeholder elements.
pub const PLACEHOLDER_PROP: &str = "isPlaceholder";

/// Section setting recording a legacy `type` that matched no section kind.
pub const LEGACY_TYPE_SETTING: &str = "legacyType";

// ---------------------------------------------------------------------------
// Public functions
// ---------------------------------------------------------------------------

/// Upgrade a Legacy document to V2 with a fresh identifier scope.
pub fn upgrade_legacy(legacy: &LegacyDocument) -> V2Document {
    upgrade_legacy_with(legacy, &mut IdGenerator::new())
}

/// Upgrade a Legacy document to V2, minting ids from `ids`.
pub fn upgrade_legacy_with(legacy: &LegacyDocument, ids: &mut IdGenerator) -> V2Document {
    let mut seen_ids = HashSet::new();
    let mut sections: Vec<V2Section> = legacy
        .sections
        .iter()
        .map(|section| upgrade_section(section, ids, &mut seen_ids))
        .collect();

    if sections.is_empty() {
        sections.push(placeholder_section(ids));
    }

    tracing::debug!(
        sections = sections.len(),
        ids_minted = ids.issued(),
        "Upgraded legacy page document",
    );

    V2Document {
        version: V2_VERSION,
        sections,
        theme: legacy_theme_to_v2(&legacy.theme),
        seo: SeoMeta {
            title: legacy.title.clone(),
            description: legacy.description.clone(),
            keywords: legacy.keywords.clone(),
            og_image: None,
        },
        converted_from_legacy: true,
        conversion_warnings: LEGACY_UPGRADE_WARNINGS
            .iter()
            .map(|w| w.to_string())
            .collect(),
        converted_at: Some(chrono::Utc::now()),
        extra: Map::new(),
    }
}

/// Map the flat legacy theme onto the V2 theme. Blank values keep defaults.
pub fn legacy_theme_to_v2(theme: &LegacyTheme) -> V2Theme {
    let colors = ThemeColors::default();
    let fonts = ThemeTypography::default();
    let body_font = or_default(&theme.font_family, fonts.body_font);
    let heading_font = theme
        .heading_font
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| body_font.clone());

    V2Theme {
        colors: ThemeColors {
            primary: or_default(&theme.primary_color, colors.primary),
            secondary: or_default(&theme.secondary_color, colors.secondary),
            background: or_default(&theme.background_color, colors.background),
            text: or_default(&theme.text_color, colors.text),
            ..colors
        },
        typography: ThemeTypography {
            heading_font,
            body_font,
        },
        ..V2Theme::default()
    }
}

/// Render one `benefits` entry as a single text line.
pub fn benefit_line(entry: &Value) -> Option<String> {
    match entry {
        Value::Object(obj) => {
            let title = obj.get("title").and_then(non_blank);
            let description = obj.get("description").and_then(non_blank);
            match (title, description) {
                (Some(title), Some(description)) => {
                    Some(format!("{BENEFIT_MARKER} {title}: {description}"))
                }
                (Some(text), None) | (None, Some(text)) => Some(format!("{BENEFIT_MARKER} {text}")),
                (None, None) => None,
            }
        }
        other => non_blank(other).map(|text| format!("{BENEFIT_MARKER} {text}")),
    }
}

/// Whether an element is the hidden carrier of unrendered legacy fields.
pub fn is_legacy_metadata(element: &V2Element) -> bool {
    element.props.get(LEGACY_METADATA_PROP) == Some(&Value::Bool(true))
}

/// Whether an element is a synthesized empty-section placeholder.
pub fn is_placeholder(element: &V2Element) -> bool {
    element.props.get(PLACEHOLDER_PROP) == Some(&Value::Bool(true))
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn upgrade_section(
    section: &LegacySection,
    ids: &mut IdGenerator,
    seen_ids: &mut HashSet<String>,
) -> V2Section {
    let id = section_id(section, ids, seen_ids);

    let legacy_type = section.section_type.trim();
    let mut settings = Map::new();
    let kind = match SectionKind::from_str(&legacy_type.to_ascii_lowercase()) {
        Some(kind) => kind,
        None => {
            if !legacy_type.is_empty() {
                settings.insert(
                    LEGACY_TYPE_SETTING.to_string(),
                    Value::String(legacy_type.to_string()),
                );
            }
            SectionKind::Custom
        }
    };

    let display_name = kind.display_name().to_string();
    let mut elements = visible_elements(section, &kind, ids);
    if elements.is_empty() {
        elements.push(placeholder_element(ids));
    }
    if let Some(metadata) = metadata_element(section, ids) {
        elements.push(metadata);
    }

    let styles: StyleMap = section
        .config
        .iter()
        .filter(|(key, _)| KNOWN_CONFIG_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    V2Section {
        id,
        kind,
        display_name,
        rows: vec![V2Row {
            id: ids.next_id("row"),
            columns: vec![V2Column {
                id: ids.next_id("col"),
                width: FULL_WIDTH.to_string(),
                elements,
                styles: StyleMap::new(),
                extra: Map::new(),
            }],
            styles: StyleMap::new(),
            extra: Map::new(),
        }],
        styles,
        settings,
        extra: Map::new(),
    }
}

/// Keep the legacy id unless it is blank or already used in this document.
fn section_id(
    section: &LegacySection,
    ids: &mut IdGenerator,
    seen_ids: &mut HashSet<String>,
) -> String {
    let legacy_id = section.id.trim();
    if !legacy_id.is_empty() && seen_ids.insert(legacy_id.to_string()) {
        return legacy_id.to_string();
    }
    let fresh = ids.next_id("section");
    if !legacy_id.is_empty() {
        tracing::warn!(
            legacy_id,
            replacement = %fresh,
            "Duplicate legacy section id replaced",
        );
    }
    seen_ids.insert(fresh.clone());
    fresh
}

fn visible_elements(
    section: &LegacySection,
    kind: &SectionKind,
    ids: &mut IdGenerator,
) -> Vec<V2Element> {
    let mut elements = Vec::new();

    if let Some(title) = section.content_text("title") {
        let level = if *kind == SectionKind::Hero { 1 } else { 2 };
        elements.push(element(
            ids,
            ElementType::Heading,
            props([("level", Value::from(level))]),
            props([("text", Value::String(title))]),
        ));
    }

    if let Some(subtitle) = section.content_text("subtitle") {
        elements.push(element(
            ids,
            ElementType::Text,
            Map::new(),
            props([("text", Value::String(subtitle))]),
        ));
    }

    if let Some(label) = section.content_text("ctaLabel") {
        elements.push(element(
            ids,
            ElementType::Button,
            props([("variant", Value::from("primary"))]),
            props([
                ("label", Value::String(label)),
                ("href", Value::from(DEFAULT_CTA_HREF)),
            ]),
        ));
    }

    if let Some(Value::Array(benefits)) = section.content.get("benefits") {
        for line in benefits.iter().filter_map(benefit_line) {
            elements.push(element(
                ids,
                ElementType::Text,
                Map::new(),
                props([("text", Value::String(line))]),
            ));
        }
    }

    elements
}

/// Serialize every unrendered field of a section into a hidden element.
fn metadata_element(section: &LegacySection, ids: &mut IdGenerator) -> Option<V2Element> {
    let mut dump = Map::new();
    for (bucket, fields) in [
        ("content", section.unknown_content()),
        ("config", section.unknown_config()),
        ("section", section.extra.clone()),
    ] {
        if !fields.is_empty() {
            dump.insert(bucket.to_string(), Value::Object(fields));
        }
    }
    let unrendered = unrendered_benefits(section);
    if !unrendered.is_empty() {
        dump.insert(UNRENDERED_BENEFITS_BUCKET.to_string(), Value::Array(unrendered));
    }
    if dump.is_empty() {
        return None;
    }

    let serialized = serde_json::to_string(&Value::Object(dump)).unwrap_or_default();
    Some(element(
        ids,
        ElementType::Custom,
        props([
            ("hidden", Value::Bool(true)),
            (LEGACY_METADATA_PROP, Value::Bool(true)),
        ]),
        props([(LEGACY_FIELDS_KEY, Value::String(serialized))]),
    ))
}

/// Non-null `benefits` entries that [`benefit_line`] cannot render.
fn unrendered_benefits(section: &LegacySection) -> Vec<Value> {
    match section.content.get("benefits") {
        Some(Value::Array(benefits)) => benefits
            .iter()
            .filter(|entry| !entry.is_null() && benefit_line(entry).is_none())
            .cloned()
            .collect(),
        _ => Vec::new(),
    }
}

fn placeholder_element(ids: &mut IdGenerator) -> V2Element {
    element(
        ids,
        ElementType::Text,
        props([(PLACEHOLDER_PROP, Value::Bool(true))]),
        props([("text", Value::from(EMPTY_CONTENT_TEXT))]),
    )
}

fn placeholder_section(ids: &mut IdGenerator) -> V2Section {
    let kind = SectionKind::Content;
    V2Section {
        id: ids.next_id("section"),
        display_name: kind.display_name().to_string(),
        kind,
        rows: vec![V2Row {
            id: ids.next_id("row"),
            columns: vec![V2Column {
                id: ids.next_id("col"),
                elements: vec![placeholder_element(ids)],
                ..V2Column::default()
            }],
            styles: StyleMap::new(),
            extra: Map::new(),
        }],
        styles: StyleMap::new(),
        settings: Map::new(),
        extra: Map::new(),
    }
}

fn element(
    ids: &mut IdGenerator,
    element_type: ElementType,
    props: Map<String, Value>,
    content: Map<String, Value>,
) -> V2Element {
    V2Element {
        id: ids.next_id("el"),
        element_type,
        props,
        content,
        styles: StyleMap::new(),
        children: None,
        extra: Map::new(),
    }
}

fn props<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn non_blank(value: &Value) -> Option<String> {
    value_to_string(value)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn or_default(value: &str, default: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default
    } else {
        trimmed.to_string()
    }
}
