//! Publish orchestrator for the CMS pipeline.
//!
//! [`Publisher`] is the only component with multi-step side effects: it
//! validates a submission, stores the uploaded file, then appends the
//! metadata record to the index, in that strict order. A record never
//! becomes visible to readers unless both writes succeeded.
//!
//! The pipeline runs as one async task per caller request; there is no
//! background worker. Each invocation owns its item construction, so no
//! locking happens here — the only concurrency control is the bounded
//! stale-write retry around index writes.

pub mod error;
pub mod publisher;
pub mod retry;
pub mod stage;

pub use error::{PublishError, PublishResult};
pub use publisher::{Publisher, Upload};
pub use retry::RetryPolicy;
pub use stage::PublishStage;
