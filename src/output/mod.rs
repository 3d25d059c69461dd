//! Experiment output module.
//!
//! Structured records produced for the downstream scheduler and the
//! content-addressed writer that persists them.

pub mod record;
pub mod writer;

// Re-export key types and functions for easier access
pub use record::{ExperimentRecord, FrameRecord, LinkRecord, NetworkSummary};
pub use writer::{experiment_hash, write_record};
