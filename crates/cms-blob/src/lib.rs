//! Blob storage backends for the CMS publish pipeline.
//!
//! Uploaded files (gallery photos, faculty portraits, event posters) are
//! stored as opaque blobs addressed by a write-once key. The adapter owns
//! key generation: callers suggest a filename, the store derives
//! `{content_type}/{token}.{ext}` with a fresh time-ordered token, so two
//! concurrent uploads with the same name never collide and no stored blob
//! is ever overwritten.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`BucketBlobStore`] -- HTTP object-storage bucket
//! - [`RepoBlobStore`] -- file committed to a hosted git repository
//!
//! # Design Rules
//!
//! 1. Keys are write-once; the store never overwrites an existing blob.
//! 2. `read` returns byte-identical content to what `store` accepted.
//! 3. Empty uploads are rejected before any network call.
//! 4. Every remote operation is bounded by a timeout, surfaced distinctly
//!    from other availability failures.

pub mod bucket;
pub mod error;
pub mod key;
pub mod memory;
pub mod repo;
pub mod traits;

pub use bucket::BucketBlobStore;
pub use error::{BlobError, BlobResult};
pub use key::derive_key;
pub use memory::InMemoryBlobStore;
pub use repo::RepoBlobStore;
pub use traits::BlobStore;
