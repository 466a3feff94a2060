//! Candidate detections and sticker-grid ordering.
//!
//! This module owns the boundary with the external detection collaborator
//! and the first two pipeline stages: filtering raw candidates down to
//! plausible stickers, then ordering exactly nine of them row-major.

mod candidate;
mod grid;
mod source;

pub use candidate::{
    dedup_by_proximity, filter_by_consistency, Candidate, CandidateFilter, CandidateRect,
    ContourRef, FilterConfig,
};
pub use grid::{sequence_grid, SequenceError, CENTER, GRID_SIZE};
pub use source::{DetectionError, DetectionSource, MockDetectionSource, SampleRegion, ScriptedFrame};
