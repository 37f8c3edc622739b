//! Element conversion between the dual-map (`props` + `content`) V2 shape
//! and the merged-`props` V3 shape.
//!
//! Merge rule (V2 -> V3): start from `props`, copy each `content` key that
//! `props` does not already hold. `props` wins on conflict.
//!
//! Split rule (V3 -> V2): the known content fields are copied first under
//! their canonical names (exact key preferred, otherwise a case-insensitive
//! match), then every remaining prop follows. `props` is kept unchanged.

use serde_json::{Map, Value};

use super::structure::carry_extra;
use super::styles::{unwrap_responsive, warn_dropped_states, wrap_responsive};
use super::v2::V2Element;
use super::v3::V3Element;

/// User-facing fields normalized into `content`, in copy order.
pub const KNOWN_CONTENT_FIELDS: &[&str] = &["text", "label", "href", "src", "alt", "placeholder"];

const V3_ONLY_ELEMENT_KEYS: &[&str] = &["stateStyles"];
const V2_ONLY_ELEMENT_KEYS: &[&str] = &["content"];

/// Convert a V2 element (and its children) to V3.
pub fn element_to_v3(element: &V2Element) -> V3Element {
    V3Element {
        id: element.id.clone(),
        element_type: element.element_type.clone(),
        props: merge_content_into_props(&element.props, &element.content),
        styles: wrap_responsive(&element.styles),
        state_styles: None,
        children: element
            .children
            .as_ref()
            .map(|children| children.iter().map(element_to_v3).collect()),
        extra: carry_extra(&element.extra, V3_ONLY_ELEMENT_KEYS, &element.id),
    }
}

/// Convert a V3 element (and its children) to V2.
///
/// Tablet/mobile styles and interaction-state styles have no V2
/// counterpart and are dropped with a warning.
pub fn element_to_v2(element: &V3Element) -> V2Element {
    warn_dropped_states(element.state_styles.as_ref(), &element.id);
    V2Element {
        id: element.id.clone(),
        element_type: element.element_type.clone(),
        props: element.props.clone(),
        content: split_props_into_content(&element.props),
        styles: unwrap_responsive(&element.styles, &element.id),
        children: element
            .children
            .as_ref()
            .map(|children| children.iter().map(element_to_v2).collect()),
        extra: carry_extra(&element.extra, V2_ONLY_ELEMENT_KEYS, &element.id),
    }
}

/// Merge `content` into a copy of `props` without overwriting existing props.
pub fn merge_content_into_props(
    props: &Map<String, Value>,
    content: &Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = props.clone();
    for (key, value) in content {
        if !merged.contains_key(key) {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Derive a V2 `content` map from merged V3 props.
pub fn split_props_into_content(props: &Map<String, Value>) -> Map<String, Value> {
    let mut content = Map::new();
    let mut consumed: Vec<&str> = Vec::new();

    for &field in KNOWN_CONTENT_FIELDS {
        if let Some((key, value)) = find_known_field(props, field) {
            content.insert(field.to_string(), value.clone());
            consumed.push(key);
        }
    }

    for (key, value) in props {
        if consumed.contains(&key.as_str()) || content.contains_key(key) {
            continue;
        }
        content.insert(key.clone(), value.clone());
    }

    content
}

/// Locate a known field in `props`: exact key first, then case-insensitive.
fn find_known_field<'a>(
    props: &'a Map<String, Value>,
    field: &str,
) -> Option<(&'a str, &'a Value)> {
    if let Some((key, value)) = props.get_key_value(field) {
        return Some((key.as_str(), value));
    }
    props
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(field))
        .map(|(key, value)| (key.as_str(), value))
}
