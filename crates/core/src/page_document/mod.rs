//! Page-document version adapter.
//!
//! Page documents are persisted in one of three generations:
//!
//! - **Legacy**: flat sections with free-form `content` / `config` maps and
//!   no version marker.
//! - **V2**: Section -> Row -> Column -> Element trees, flat styles, elements
//!   with side-by-side `props` and `content`.
//! - **V3**: the V2 tree with breakpoint-keyed styles, interaction-state
//!   styles, merged element `props` and tiered design tokens.
//!
//! [`adapter`] is the facade: [`ensure_v3`] reads anything as V3. Detection,
//! legacy upgrade and the per-level converters are exposed for callers and
//! tests that need a single step.

pub mod adapter;
pub mod detection;
pub mod downgrade;
pub mod elements;
pub mod ids;
pub mod kinds;
pub mod legacy;
pub mod legacy_upgrade;
pub mod lenient;
pub mod structure;
pub mod styles;
pub mod theme_tokens;
pub mod v2;
pub mod v3;

pub use adapter::{
    convert_v2_to_v3, convert_v3_to_v2, downgrade_to_legacy, empty_legacy_document,
    empty_v2_document, empty_v3_document, ensure_v2, ensure_v3, normalize, parse_document_json,
    parse_document_json_with_limit, validate_document_json_size, PageDocument,
    MAX_DOCUMENT_JSON_SIZE,
};
pub use detection::{classify, detect, is_legacy, is_v2, is_v3, DocumentVersion, FALLBACK_VERSION};
pub use ids::IdGenerator;
pub use kinds::{ElementType, SectionKind};
pub use legacy::LegacyDocument;
pub use legacy_upgrade::{upgrade_legacy, upgrade_legacy_with, LEGACY_UPGRADE_WARNINGS};
pub use v2::V2Document;
pub use v3::V3Document;
