//! `pagedoc-core` -- page-document version adapter.
//!
//! Pure, synchronous logic for classifying, upgrading and converting
//! page-builder documents across the Legacy, V2 and V3 generations.
//! No database, no async, no I/O.

pub mod error;
pub mod page_document;
pub mod types;
