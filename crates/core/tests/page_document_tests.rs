//! Integration tests for the page-document adapter.
//!
//! Exercises the public facade end to end: V2 <-> V3 round trips, content
//! preservation, detection properties and legacy upgrade totality.

use std::collections::HashSet;

use serde_json::{json, Value};

use pagedoc_core::page_document::v3::V3Element;
use pagedoc_core::page_document::{
    classify, convert_v2_to_v3, convert_v3_to_v2, downgrade_to_legacy, ensure_v2, ensure_v3,
    upgrade_legacy, DocumentVersion, ElementType, LegacyDocument, V2Document,
};

fn landing_page() -> V2Document {
    V2Document::from_value(&json!({
        "version": 2,
        "sections": [
            {
                "id": "hero",
                "type": "hero",
                "displayName": "Hero",
                "styles": { "backgroundColor": "#0f172a" },
                "rows": [{
                    "id": "hero-row",
                    "columns": [{
                        "id": "hero-col",
                        "width": "full",
                        "elements": [
                            {
                                "id": "title",
                                "type": "heading",
                                "props": { "level": 1 },
                                "content": { "text": "Welcome" },
                                "styles": { "fontSize": "3rem" }
                            },
                            {
                                "id": "cta",
                                "type": "button",
                                "props": { "variant": "primary" },
                                "content": { "label": "Buy now", "href": "/checkout" }
                            }
                        ]
                    }]
                }]
            },
            {
                "id": "gallery",
                "type": "content",
                "rows": [{
                    "id": "gallery-row",
                    "columns": [
                        {
                            "id": "left",
                            "width": "1/2",
                            "elements": [{
                                "id": "photo",
                                "type": "image",
                                "content": { "src": "/img/shoe.png", "alt": "Red running shoe" }
                            }]
                        },
                        {
                            "id": "right",
                            "width": "1/2",
                            "elements": [{
                                "id": "box",
                                "type": "container",
                                "children": [
                                    { "id": "caption", "type": "text", "content": { "text": "Lightweight" } }
                                ]
                            }]
                        }
                    ]
                }]
            }
        ],
        "theme": { "colors": { "primary": "#e11d48" }, "typography": { "headingFont": "Georgia" } },
        "seo": { "title": "Test Page", "description": "Shoes", "keywords": ["shoes"] }
    }))
}

fn first_element(v3_elements: &[V3Element], id: &str) -> V3Element {
    v3_elements
        .iter()
        .find(|el| el.id == id)
        .cloned()
        .expect("element should exist")
}

/// Every node id in document order, nested children included.
fn all_ids(doc: &V2Document) -> Vec<String> {
    fn element_ids(elements: &[pagedoc_core::page_document::v2::V2Element], out: &mut Vec<String>) {
        for el in elements {
            out.push(el.id.clone());
            if let Some(children) = &el.children {
                element_ids(children, out);
            }
        }
    }

    let mut ids = Vec::new();
    for section in &doc.sections {
        ids.push(section.id.clone());
        for row in &section.rows {
            ids.push(row.id.clone());
            for column in &row.columns {
                ids.push(column.id.clone());
                element_ids(&column.elements, &mut ids);
            }
        }
    }
    ids
}

// ---------------------------------------------------------------------------
// Test: scenario round trips
// ---------------------------------------------------------------------------

/// Heading styles land under `desktop`, meta carries the SEO title, and the
/// heading text survives the trip back to V2.
#[test]
fn heading_round_trip_keeps_text_and_desktop_styles() {
    let v3 = convert_v2_to_v3(&landing_page());
    let elements = &v3.sections[0].rows[0].columns[0].elements;
    let heading = first_element(elements, "title");

    let desktop = heading.styles.desktop.as_ref().expect("desktop styles");
    assert_eq!(desktop["fontSize"], "3rem");
    assert_eq!(v3.meta.title, "Test Page");

    let back = convert_v3_to_v2(&v3);
    let heading = &back.sections[0].rows[0].columns[0].elements[0];
    assert_eq!(heading.content_str("text"), Some("Welcome"));
    assert_eq!(heading.styles["fontSize"], "3rem");
}

/// Button label and href survive V2 -> V3 -> V2.
#[test]
fn button_round_trip_keeps_label_and_href() {
    let back = convert_v3_to_v2(&convert_v2_to_v3(&landing_page()));
    let button = &back.sections[0].rows[0].columns[0].elements[1];
    assert_eq!(button.element_type, ElementType::Button);
    assert_eq!(button.content_str("label"), Some("Buy now"));
    assert_eq!(button.content_str("href"), Some("/checkout"));
    assert_eq!(button.props["variant"], "primary");
}

/// Image src and alt survive V2 -> V3 -> V2.
#[test]
fn image_round_trip_keeps_src_and_alt() {
    let back = convert_v3_to_v2(&convert_v2_to_v3(&landing_page()));
    let image = &back.sections[1].rows[0].columns[0].elements[0];
    assert_eq!(image.content_str("src"), Some("/img/shoe.png"));
    assert_eq!(image.content_str("alt"), Some("Red running shoe"));
}

// ---------------------------------------------------------------------------
// Test: structural preservation
// ---------------------------------------------------------------------------

/// Ids, node counts and nested children are preserved exactly.
#[test]
fn round_trip_preserves_ids_and_counts() {
    let original = landing_page();
    let back = convert_v3_to_v2(&convert_v2_to_v3(&original));

    assert_eq!(all_ids(&back), all_ids(&original));
    assert_eq!(back.element_count(), original.element_count());

    let caption = &back.sections[1].rows[0].columns[1].elements[0]
        .children
        .as_ref()
        .expect("container children")[0];
    assert_eq!(caption.content_str("text"), Some("Lightweight"));
}

/// V3 -> V2 -> V3 settles: first section id and meta title are stable.
#[test]
fn conversion_is_idempotent() {
    let once = convert_v2_to_v3(&landing_page());
    let twice = convert_v2_to_v3(&convert_v3_to_v2(&once));
    assert_eq!(twice.sections[0].id, once.sections[0].id);
    assert_eq!(twice.meta.title, once.meta.title);
    assert_eq!(twice.design_tokens, once.design_tokens);
}

/// Theme values survive through design tokens.
#[test]
fn theme_survives_design_tokens() {
    let original = landing_page();
    let back = convert_v3_to_v2(&convert_v2_to_v3(&original));
    assert_eq!(back.theme, original.theme);
    assert_eq!(back.seo, original.seo);
}

// ---------------------------------------------------------------------------
// Test: detection
// ---------------------------------------------------------------------------

/// A V2 document classifies as V2 and its conversion as V3.
#[test]
fn detection_follows_conversion() {
    let v2_value = serde_json::to_value(landing_page()).expect("serialize v2");
    assert_eq!(classify(&v2_value), DocumentVersion::V2);

    let v3_value = serde_json::to_value(convert_v2_to_v3(&landing_page())).expect("serialize v3");
    assert_eq!(classify(&v3_value), DocumentVersion::V3);

    let back = serde_json::to_value(convert_v3_to_v2(&convert_v2_to_v3(&landing_page())))
        .expect("serialize v2");
    assert_eq!(classify(&back), DocumentVersion::V2);
}

/// Serialized V3 reads back identically through the facade.
#[test]
fn ensure_v3_reads_serialized_v3_unchanged() {
    let v3 = convert_v2_to_v3(&landing_page());
    let value = serde_json::to_value(&v3).expect("serialize v3");
    assert_eq!(ensure_v3(&value), v3);
}

// ---------------------------------------------------------------------------
// Test: legacy upgrade
// ---------------------------------------------------------------------------

/// Degenerate legacy input never panics and always yields a first section
/// with at least one element.
#[test]
fn legacy_upgrade_is_total() {
    let inputs = [
        json!({}),
        json!({ "sections": [] }),
        json!({ "sections": [{ "id": "x", "type": "y" }] }),
        json!({ "sections": "nope", "theme": 7 }),
        json!({ "sections": [null, 5, { "content": "bad" }] }),
    ];
    for input in &inputs {
        let doc = ensure_v2(input);
        let first = doc.sections.first().expect("at least one section");
        let elements = &first.rows[0].columns[0].elements;
        assert!(!elements.is_empty(), "no elements for {input}");
        assert!(doc.converted_from_legacy);
    }
}

/// Every synthesized id in an upgraded document is distinct.
#[test]
fn legacy_upgrade_mints_unique_ids() {
    let sections: Vec<Value> = (0..20)
        .map(|i| {
            json!({
                "id": "dup",
                "type": "benefits",
                "content": {
                    "title": format!("Section {i}"),
                    "benefits": ["a", "b", "c"],
                    "extra": i
                }
            })
        })
        .collect();
    let doc = upgrade_legacy(&LegacyDocument::from_value(&json!({ "sections": sections })));

    let ids = all_ids(&doc);
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    // Per section: heading, three benefits, one metadata element.
    assert_eq!(doc.element_count(), 20 * 5);
}

/// Unknown legacy fields come back out after upgrade and downgrade, even
/// after a detour through V3.
#[test]
fn legacy_fields_survive_a_v3_detour() {
    let legacy = json!({
        "title": "Old page",
        "sections": [{
            "id": "promo",
            "type": "hero",
            "content": { "title": "Hello", "ctaLabel": "Join", "countdown": "2024-12-31" },
            "config": { "textAlign": "center", "sticky": true }
        }]
    });
    let v3 = ensure_v3(&legacy);
    let back = downgrade_to_legacy(&convert_v3_to_v2(&v3));

    let section = &back.sections[0];
    assert_eq!(section.id, "promo");
    assert_eq!(section.content["title"], "Hello");
    assert_eq!(section.content["ctaLabel"], "Join");
    assert_eq!(section.content["countdown"], "2024-12-31");
    assert_eq!(section.config["textAlign"], "center");
    assert_eq!(section.config["sticky"], true);
    assert_eq!(back.title, "Old page");
}

// ---------------------------------------------------------------------------
// Test: unmodelled data
// ---------------------------------------------------------------------------

/// Reading a V3 document keeps keys and type names the crate does not model,
/// and flat element styles land under desktop.
#[test]
fn ensure_v3_keeps_unmodelled_keys() {
    let doc = json!({
        "version": "3.0",
        "meta": { "title": "Launch" },
        "pageSettings": { "maxWidth": 1200 },
        "sections": [{
            "id": "s1",
            "type": "hero",
            "animation": "fade",
            "rows": [{ "id": "r1", "columns": [{ "id": "c1", "elements": [{
                "id": "e1",
                "type": "carousel",
                "locked": true,
                "styles": { "fontSize": "2rem" }
            }] }] }]
        }]
    });
    let v3 = ensure_v3(&doc);
    let element = &v3.sections[0].rows[0].columns[0].elements[0];
    assert_eq!(element.element_type.as_str(), "carousel");
    assert_eq!(
        element.styles.desktop.as_ref().and_then(|s| s.get("fontSize")),
        Some(&json!("2rem"))
    );

    let value = serde_json::to_value(&v3).expect("serialize v3");
    assert_eq!(value["pageSettings"]["maxWidth"], 1200);
    assert_eq!(value["sections"][0]["animation"], "fade");
    let element = &value["sections"][0]["rows"][0]["columns"][0]["elements"][0];
    assert_eq!(element["type"], "carousel");
    assert_eq!(element["locked"], true);
    assert_eq!(element["styles"]["desktop"]["fontSize"], "2rem");
}

/// Reading a V2 document keeps unknown element types and element keys, and
/// they survive a detour through V3.
#[test]
fn ensure_v2_keeps_unknown_element_types() {
    let doc = json!({
        "version": 2,
        "sections": [{
            "id": "s1",
            "type": "testimonials",
            "rows": [{ "id": "r1", "columns": [{ "id": "c1", "elements": [
                { "id": "t1", "type": "testimonial", "visible": false }
            ] }] }]
        }]
    });
    let v2 = ensure_v2(&doc);
    let value = serde_json::to_value(&v2).expect("serialize v2");
    let element = &value["sections"][0]["rows"][0]["columns"][0]["elements"][0];
    assert_eq!(element["type"], "testimonial");
    assert_eq!(element["visible"], false);

    let back = convert_v3_to_v2(&convert_v2_to_v3(&v2));
    let element = &back.sections[0].rows[0].columns[0].elements[0];
    assert_eq!(element.element_type.as_str(), "testimonial");
    assert_eq!(element.extra["visible"], false);
}

/// A benefit entry with no text of its own comes back after the upgrade.
#[test]
fn icon_only_benefit_survives_legacy_round_trip() {
    let legacy = json!({
        "sections": [{
            "id": "perks",
            "type": "benefits",
            "content": { "benefits": ["Fast", { "icon": "star" }] }
        }]
    });
    let back = downgrade_to_legacy(&ensure_v2(&legacy));
    assert_eq!(
        back.sections[0].content["benefits"],
        json!([{ "title": "Fast" }, { "icon": "star" }])
    );
}
