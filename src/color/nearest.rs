//! Nearest-centroid classification in RGB space.

use super::{ColorClassifier, ReferenceColor, Rgb};

/// Picks the reference color with the smallest Euclidean RGB distance.
///
/// Never returns `None`.
#[derive(Debug, Clone, Default)]
pub struct NearestCentroid;

impl NearestCentroid {
    /// Creates the classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classifies and returns the winning distance alongside the color.
    pub fn nearest(&self, sample: &Rgb) -> (ReferenceColor, f64) {
        let mut best = (ReferenceColor::White, f64::INFINITY);
        for color in ReferenceColor::ALL {
            let distance = sample.distance(&color.reference_rgb());
            // Strict comparison keeps the earlier color on exact ties.
            if distance < best.1 {
                best = (color, distance);
            }
        }
        best
    }
}

impl ColorClassifier for NearestCentroid {
    fn classify(&self, sample: &Rgb) -> Option<ReferenceColor> {
        Some(self.nearest(sample).0)
    }
}
