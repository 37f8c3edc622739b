//! V2 -> Legacy reduction.
//!
//! Always lossy. Only the first column of the first row of each section is
//! read, which is where the upgrader puts everything it synthesizes. Within
//! that column the first heading, the first plain text and the first button
//! repopulate `title`, `subtitle` and `ctaLabel`; check-mark text lines become
//! `benefits` again. A hidden legacy metadata element is replayed so fields
//! preserved by the upgrade come back out; benefit entries it kept follow the
//! parsed lines.

use serde_json::{Map, Value};

use super::kinds::ElementType;
use super::legacy::{LegacyDocument, LegacySection, LegacyTheme, KNOWN_CONFIG_KEYS};
use super::legacy_upgrade::{
    is_legacy_metadata, is_placeholder, BENEFIT_MARKER, LEGACY_FIELDS_KEY, LEGACY_TYPE_SETTING,
    UNRENDERED_BENEFITS_BUCKET,
};
use super::v2::{V2Document, V2Element, V2Section, V2Theme};

/// Section keys that belong to the legacy section shape itself and are never
/// overwritten by replayed metadata.
const RESERVED_SECTION_KEYS: &[&str] = &["id", "type", "content", "config"];

pub fn downgrade_to_legacy(doc: &V2Document) -> LegacyDocument {
    let sections: Vec<LegacySection> = doc.sections.iter().map(downgrade_section).collect();

    tracing::debug!(sections = sections.len(), "Downgraded page document to legacy");

    LegacyDocument {
        sections,
        theme: theme_to_legacy(&doc.theme),
        title: doc.seo.title.clone(),
        description: doc.seo.description.clone(),
        keywords: doc.seo.keywords.clone(),
    }
}

/// Flatten a V2 theme onto the legacy theme. Accent and muted are dropped.
pub fn theme_to_legacy(theme: &V2Theme) -> LegacyTheme {
    let fonts = &theme.typography;
    LegacyTheme {
        primary_color: theme.colors.primary.clone(),
        secondary_color: theme.colors.secondary.clone(),
        background_color: theme.colors.background.clone(),
        text_color: theme.colors.text.clone(),
        font_family: fonts.body_font.clone(),
        heading_font: (fonts.heading_font != fonts.body_font).then(|| fonts.heading_font.clone()),
    }
}

/// Parse a `"✓ title: description"` line back into a benefit entry.
pub fn parse_benefit_line(text: &str) -> Option<Value> {
    let rest = text.strip_prefix(BENEFIT_MARKER)?.trim();
    if rest.is_empty() {
        return None;
    }
    let mut benefit = Map::new();
    match rest.split_once(": ") {
        Some((title, description)) => {
            benefit.insert("title".to_string(), Value::from(title.trim()));
            benefit.insert("description".to_string(), Value::from(description.trim()));
        }
        None => {
            benefit.insert("title".to_string(), Value::from(rest));
        }
    }
    Some(Value::Object(benefit))
}

fn downgrade_section(section: &V2Section) -> LegacySection {
    let section_type = match section.settings.get(LEGACY_TYPE_SETTING) {
        Some(Value::String(legacy_type)) if !legacy_type.is_empty() => legacy_type.clone(),
        _ => section.kind.as_str().to_string(),
    };

    let mut content = Map::new();
    let mut config: Map<String, Value> = section
        .styles
        .iter()
        .filter(|(key, _)| KNOWN_CONFIG_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    let mut extra = Map::new();

    let elements = section
        .rows
        .first()
        .and_then(|row| row.columns.first())
        .map(|column| column.elements.as_slice())
        .unwrap_or_default();

    let mut benefits = Vec::new();
    let mut unrendered_benefits = Vec::new();
    for element in elements {
        if is_legacy_metadata(element) {
            unrendered_benefits.extend(replay_metadata(
                element,
                &section.id,
                &mut content,
                &mut config,
                &mut extra,
            ));
            continue;
        }
        if is_placeholder(element) {
            continue;
        }
        match element.element_type {
            ElementType::Heading => set_once(&mut content, "title", element.content_str("text")),
            ElementType::Button => set_once(&mut content, "ctaLabel", element.content_str("label")),
            ElementType::Text => match element.content_str("text") {
                Some(text) if text.starts_with(BENEFIT_MARKER) => {
                    benefits.extend(parse_benefit_line(text));
                }
                text => set_once(&mut content, "subtitle", text),
            },
            _ => {}
        }
    }
    benefits.extend(unrendered_benefits);
    if !benefits.is_empty() {
        content.insert("benefits".to_string(), Value::Array(benefits));
    }

    LegacySection {
        id: section.id.clone(),
        section_type,
        content,
        config,
        extra,
    }
}

fn set_once(content: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        content
            .entry(key.to_string())
            .or_insert_with(|| Value::from(value));
    }
}

/// Merge a metadata element's serialized fields back into the section and
/// return the benefit entries it kept. Fields recovered from visible elements
/// take precedence.
fn replay_metadata(
    element: &V2Element,
    section_id: &str,
    content: &mut Map<String, Value>,
    config: &mut Map<String, Value>,
    extra: &mut Map<String, Value>,
) -> Vec<Value> {
    let Some(serialized) = element.content_str(LEGACY_FIELDS_KEY) else {
        return Vec::new();
    };
    let mut dump = match serde_json::from_str::<Value>(serialized) {
        Ok(Value::Object(dump)) => dump,
        Ok(_) | Err(_) => {
            tracing::warn!(section_id, "Ignoring unreadable legacy metadata element");
            return Vec::new();
        }
    };

    for (bucket, target) in [("content", &mut *content), ("config", &mut *config)] {
        if let Some(Value::Object(fields)) = dump.get(bucket) {
            for (key, value) in fields {
                target.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
    }
    if let Some(Value::Object(fields)) = dump.get("section") {
        for (key, value) in fields {
            if !RESERVED_SECTION_KEYS.contains(&key.as_str()) {
                extra.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
    }
    match dump.remove(UNRENDERED_BENEFITS_BUCKET) {
        Some(Value::Array(entries)) => entries,
        _ => Vec::new(),
    }
}
