//! Section -> Row -> Column tree conversion between V2 and V3.
//!
//! Conversion is 1:1 in cardinality: ids, child order and unmodelled keys
//! are copied verbatim, elements are delegated to [`super::elements`] and
//! styles to [`super::styles`].

use serde_json::{Map, Value};

use super::elements::{element_to_v2, element_to_v3};
use super::styles::{unwrap_responsive, warn_dropped_states, wrap_responsive};
use super::v2::{V2Column, V2Row, V2Section};
use super::v3::{V3Column, V3Row, V3Section};

/// V2 settings key that carries a V3 section's semantic tag across a downgrade.
pub const SEMANTIC_TAG_SETTING: &str = "semanticTag";

/// Section keys V3 models that V2 does not.
const V3_ONLY_SECTION_KEYS: &[&str] = &["semanticTag", "stateStyles"];

/// Copy unmodelled keys to the target node, minus `reserved` keys the
/// target shape models itself.
pub(crate) fn carry_extra(
    extra: &Map<String, Value>,
    reserved: &[&str],
    owner_id: &str,
) -> Map<String, Value> {
    let mut carried = extra.clone();
    let shadowed: Vec<&str> = reserved
        .iter()
        .copied()
        .filter(|key| carried.remove(*key).is_some())
        .collect();
    if !shadowed.is_empty() {
        tracing::warn!(
            owner_id,
            dropped = ?shadowed,
            "Discarding unmodelled keys that collide with the target shape",
        );
    }
    carried
}

// ---------------------------------------------------------------------------
// V2 -> V3
// ---------------------------------------------------------------------------

pub fn section_to_v3(section: &V2Section) -> V3Section {
    let mut settings = section.settings.clone();
    let semantic_tag = match settings.remove(SEMANTIC_TAG_SETTING) {
        Some(Value::String(tag)) if !tag.is_empty() => Some(tag),
        Some(other) => {
            // Not a usable tag; leave it where the author put it.
            settings.insert(SEMANTIC_TAG_SETTING.to_string(), other);
            None
        }
        None => None,
    };

    V3Section {
        id: section.id.clone(),
        kind: section.kind.clone(),
        display_name: section.display_name.clone(),
        semantic_tag,
        rows: section.rows.iter().map(row_to_v3).collect(),
        styles: wrap_responsive(&section.styles),
        state_styles: None,
        settings,
        extra: carry_extra(&section.extra, V3_ONLY_SECTION_KEYS, &section.id),
    }
}

pub fn row_to_v3(row: &V2Row) -> V3Row {
    V3Row {
        id: row.id.clone(),
        columns: row.columns.iter().map(column_to_v3).collect(),
        styles: wrap_responsive(&row.styles),
        extra: row.extra.clone(),
    }
}

pub fn column_to_v3(column: &V2Column) -> V3Column {
    V3Column {
        id: column.id.clone(),
        width: column.width.clone(),
        elements: column.elements.iter().map(element_to_v3).collect(),
        styles: wrap_responsive(&column.styles),
        extra: column.extra.clone(),
    }
}

// ---------------------------------------------------------------------------
// V3 -> V2
// ---------------------------------------------------------------------------

pub fn section_to_v2(section: &V3Section) -> V2Section {
    warn_dropped_states(section.state_styles.as_ref(), &section.id);

    let mut settings = section.settings.clone();
    if let Some(tag) = &section.semantic_tag {
        settings.insert(SEMANTIC_TAG_SETTING.to_string(), Value::String(tag.clone()));
    }

    V2Section {
        id: section.id.clone(),
        kind: section.kind.clone(),
        display_name: section.display_name.clone(),
        rows: section.rows.iter().map(row_to_v2).collect(),
        styles: unwrap_responsive(&section.styles, &section.id),
        settings,
        extra: section.extra.clone(),
    }
}

pub fn row_to_v2(row: &V3Row) -> V2Row {
    V2Row {
        id: row.id.clone(),
        columns: row.columns.iter().map(column_to_v2).collect(),
        styles: unwrap_responsive(&row.styles, &row.id),
        extra: row.extra.clone(),
    }
}

pub fn column_to_v2(column: &V3Column) -> V2Column {
    V2Column {
        id: column.id.clone(),
        width: column.width.clone(),
        elements: column.elements.iter().map(element_to_v2).collect(),
        styles: unwrap_responsive(&column.styles, &column.id),
        extra: column.extra.clone(),
    }
}
