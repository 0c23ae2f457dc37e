//! Upload orchestration
//!
//! - [`pipeline`] - sequential row-by-row upsert with a failure policy
//! - [`summary`] - counters and per-row errors of a run

pub mod pipeline;
pub mod summary;

pub use pipeline::{UploadOptions, UploadPipeline};
pub use summary::{RowError, RowErrorKind, UploadSummary};
