//! Per-frame sticker reading and temporal stabilization.
//!
//! The [`Scanner`] turns one frame's candidates into nine per-slot color
//! readings; the [`TemporalStabilizer`] accumulates readings across frames
//! until a face can be committed.
//!
//! ```text
//! candidates → filter → grid → sample + classify → stabilizer
//! ```

mod stabilizer;

pub use stabilizer::{SlotHistory, StabilizerConfig, StabilizerVerdict, TemporalStabilizer};

use crate::color::{ColorClassifier, NearestCentroid, ReferenceColor};
use crate::detection::{
    sequence_grid, Candidate, CandidateFilter, DetectionSource, SampleRegion, GRID_SIZE,
};

/// What one frame yielded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameReading {
    /// The filter did not leave exactly nine stickers.
    Mismatch {
        /// Candidates surviving the filter.
        found: usize,
    },
    /// One classification per grid slot, row-major.
    Stickers([Option<ReferenceColor>; GRID_SIZE]),
}

/// Reads sticker colors from a single frame.
pub struct Scanner {
    filter: CandidateFilter,
    classifier: Box<dyn ColorClassifier + Send>,
}

impl Scanner {
    /// Creates a scanner from its stages.
    pub fn new(filter: CandidateFilter, classifier: Box<dyn ColorClassifier + Send>) -> Self {
        Self { filter, classifier }
    }

    /// Filters, orders and classifies one frame's candidates.
    pub fn read(&self, candidates: Vec<Candidate>, source: &dyn DetectionSource) -> FrameReading {
        let kept = self.filter.filter(candidates, source.frame_area());
        let rects: Vec<_> = kept.iter().map(|c| c.rect).collect();

        let grid = match sequence_grid(&rects) {
            Ok(grid) => grid,
            Err(_) => return FrameReading::Mismatch { found: rects.len() },
        };

        let readings = grid.map(|rect| {
            let sample = source.sample_average_color(&SampleRegion::around(&rect));
            self.classifier.classify(&sample)
        });
        FrameReading::Stickers(readings)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(CandidateFilter::default(), Box::new(NearestCentroid::new()))
    }
}
