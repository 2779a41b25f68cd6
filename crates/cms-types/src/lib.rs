//! Foundation types for the CMS publish pipeline.
//!
//! This crate provides the content categories, record identifiers, and
//! published-item shapes used throughout the pipeline. Every other `cms`
//! crate depends on `cms-types`.
//!
//! # Key Types
//!
//! - [`ContentType`] — Closed enumeration of publishable categories
//! - [`RecordId`] — Time-ordered record identifier (UUID v7)
//! - [`BlobRef`] — Durable reference to an uploaded file
//! - [`FieldMap`] / [`FieldValue`] — Type-specific metadata attributes
//! - [`ContentItem`] — The unit published through the pipeline

pub mod content;
pub mod error;
pub mod field;
pub mod item;

pub use content::ContentType;
pub use error::TypeError;
pub use field::{field_map, FieldMap, FieldValue};
pub use item::{BlobRef, ContentItem, RecordId};
