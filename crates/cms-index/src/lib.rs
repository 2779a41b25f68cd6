//! Index storage backends for the CMS publish pipeline.
//!
//! The index is the structured collection of metadata records that read
//! views list. Every backend implements the [`IndexStore`] trait:
//!
//! - [`InMemoryIndexStore`] -- `Vec`-based store for tests and embedding
//! - [`TableIndexStore`] -- rows in a remote table over an HTTP API
//! - [`CollectionIndexStore`] -- the whole collection serialized as one JSON
//!   document per content type, read-modify-written under an
//!   optimistic-concurrency token
//!
//! # Design Rules
//!
//! 1. Record IDs are unique for the lifetime of the index; `append` rejects
//!    duplicates instead of upserting.
//! 2. `list_all` orders newest first; an empty collection is a normal result,
//!    not an error.
//! 3. `update` replaces metadata fields only — never the blob reference or
//!    the creation timestamp.
//! 4. Collection documents are parsed and re-serialized wholesale with
//!    serde, never string-patched.
//! 5. A concurrent modification detected by the backing store surfaces as
//!    [`IndexError::StaleWrite`]; retrying with fresh state is the caller's
//!    decision.

pub mod collection;
pub mod document;
pub mod error;
pub mod memory;
pub mod table;
pub mod traits;

pub use collection::CollectionIndexStore;
pub use document::{DocVersion, DocumentStore, InMemoryDocumentStore, RepoDocumentStore};
pub use error::{IndexError, IndexResult};
pub use memory::InMemoryIndexStore;
pub use table::TableIndexStore;
pub use traits::IndexStore;
