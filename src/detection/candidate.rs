//! Per-frame candidate rectangles and their quality filter.
//!
//! The detection collaborator reports every convex-ish contour it finds.
//! Most are noise: nested outlines of the same sticker, background clutter,
//! the cube silhouette itself. The filter narrows them down to the sticker
//! faces in three passes: geometric acceptance, proximity dedup, and area
//! consistency.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Opaque handle to the contour a candidate was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContourRef(pub usize);

/// Axis-aligned bounding box of a detected shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateRect {
    /// Left edge in pixels.
    pub x: f64,
    /// Top edge in pixels.
    pub y: f64,
    /// Width in pixels.
    pub w: f64,
    /// Height in pixels.
    pub h: f64,
    /// Source contour.
    pub contour: ContourRef,
}

impl CandidateRect {
    /// Creates a rectangle.
    pub fn new(x: f64, y: f64, w: f64, h: f64, contour: ContourRef) -> Self {
        Self { x, y, w, h, contour }
    }

    /// Horizontal center.
    #[inline]
    pub fn cx(&self) -> f64 {
        self.x + self.w / 2.0
    }

    /// Vertical center.
    #[inline]
    pub fn cy(&self) -> f64 {
        self.y + self.h / 2.0
    }

    /// Width over height; zero for degenerate boxes.
    pub fn aspect_ratio(&self) -> f64 {
        if self.h <= 0.0 {
            0.0
        } else {
            self.w / self.h
        }
    }

    fn center_distance_sq(&self, other: &CandidateRect) -> f64 {
        let dx = self.cx() - other.cx();
        let dy = self.cy() - other.cy();
        dx * dx + dy * dy
    }
}

/// One detection as reported by the collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Bounding box.
    pub rect: CandidateRect,
    /// Area of the source contour.
    pub area: f64,
    /// Corner count of the approximated polygon.
    pub corner_count: usize,
    /// Whether the approximated polygon is convex.
    pub convex: bool,
}

/// Thresholds for the candidate filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Smallest accepted contour area.
    pub min_area: f64,
    /// Largest accepted area is `frame_area / frame_area_divisor`.
    pub frame_area_divisor: f64,
    /// Fewest approximated corners.
    pub min_corners: usize,
    /// Most approximated corners.
    pub max_corners: usize,
    /// Lowest accepted width/height ratio.
    pub min_aspect: f64,
    /// Highest accepted width/height ratio.
    pub max_aspect: f64,
    /// Minimum center distance between kept candidates, in pixels.
    pub dedup_distance: f64,
    /// Consistency pass only runs with at least this many candidates.
    pub consistency_min_count: usize,
    /// Lower bound of the area band, as a fraction of the median.
    pub consistency_low: f64,
    /// Upper bound of the area band, as a fraction of the median.
    pub consistency_high: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_area: 1000.0,
            frame_area_divisor: 12.0,
            min_corners: 4,
            max_corners: 8,
            min_aspect: 0.8,
            max_aspect: 1.2,
            dedup_distance: 30.0,
            consistency_min_count: 4,
            consistency_low: 0.5,
            consistency_high: 1.5,
        }
    }
}

impl FilterConfig {
    /// Validates the thresholds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_area < 0.0 || self.frame_area_divisor <= 0.0 {
            return Err(ConfigError::Invalid("filter area bounds".into()));
        }
        if self.min_corners > self.max_corners {
            return Err(ConfigError::Invalid("filter corner range is empty".into()));
        }
        if self.min_aspect > self.max_aspect || self.min_aspect <= 0.0 {
            return Err(ConfigError::Invalid("filter aspect range".into()));
        }
        if self.dedup_distance < 0.0 {
            return Err(ConfigError::Invalid("negative dedup distance".into()));
        }
        if self.consistency_low > 1.0 || self.consistency_high < 1.0 {
            return Err(ConfigError::Invalid(
                "consistency band must contain the median".into(),
            ));
        }
        Ok(())
    }
}

/// Keeps only plausible sticker rectangles.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    config: FilterConfig,
}

impl CandidateFilter {
    /// Creates a filter with the given thresholds.
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Returns the active thresholds.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Runs all three passes. Output is ordered by area, largest first.
    pub fn filter(&self, candidates: Vec<Candidate>, frame_area: f64) -> Vec<Candidate> {
        let total = candidates.len();
        let accepted: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| self.accepts(c, frame_area))
            .collect();
        let geometric = accepted.len();

        let deduped = dedup_by_proximity(accepted, self.config.dedup_distance);
        let unique = deduped.len();

        let kept = filter_by_consistency(
            deduped,
            self.config.consistency_min_count,
            self.config.consistency_low,
            self.config.consistency_high,
        );

        tracing::trace!(
            total,
            geometric,
            unique,
            kept = kept.len(),
            "Candidate filter passes"
        );
        kept
    }

    /// Geometric acceptance of a single candidate.
    pub fn accepts(&self, candidate: &Candidate, frame_area: f64) -> bool {
        let c = &self.config;
        let max_area = frame_area / c.frame_area_divisor;
        let aspect = candidate.rect.aspect_ratio();

        candidate.area >= c.min_area
            && candidate.area <= max_area
            && candidate.convex
            && (c.min_corners..=c.max_corners).contains(&candidate.corner_count)
            && aspect >= c.min_aspect
            && aspect <= c.max_aspect
    }
}

/// Greedy dedup: largest first, drop anything whose center is closer than
/// `min_distance` to an already-kept center.
pub fn dedup_by_proximity(candidates: Vec<Candidate>, min_distance: f64) -> Vec<Candidate> {
    let mut sorted = candidates;
    sorted.sort_by(|a, b| b.area.total_cmp(&a.area));

    let min_sq = min_distance * min_distance;
    let mut kept: Vec<Candidate> = Vec::with_capacity(sorted.len());
    for candidate in sorted {
        let clear = kept
            .iter()
            .all(|k| k.rect.center_distance_sq(&candidate.rect) >= min_sq);
        if clear {
            kept.push(candidate);
        }
    }
    kept
}

/// Drops candidates whose area is outside `[low, high] × median`.
///
/// Left untouched when fewer than `min_count` candidates remain.
pub fn filter_by_consistency(
    candidates: Vec<Candidate>,
    min_count: usize,
    low: f64,
    high: f64,
) -> Vec<Candidate> {
    if candidates.len() < min_count || candidates.is_empty() {
        return candidates;
    }

    let mut areas: Vec<f64> = candidates.iter().map(|c| c.area).collect();
    let median = median(&mut areas);
    let (lo, hi) = (median * low, median * high);

    candidates
        .into_iter()
        .filter(|c| c.area >= lo && c.area <= hi)
        .collect()
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FRAME_AREA: f64 = 640.0 * 480.0;

    fn square(id: usize, cx: f64, cy: f64, side: f64) -> Candidate {
        Candidate {
            rect: CandidateRect::new(cx - side / 2.0, cy - side / 2.0, side, side, ContourRef(id)),
            area: side * side,
            corner_count: 4,
            convex: true,
        }
    }

    fn grid_of_nine(side: f64) -> Vec<Candidate> {
        (0..9)
            .map(|i| {
                let col = (i % 3) as f64;
                let row = (i / 3) as f64;
                square(i, 200.0 + col * 60.0, 150.0 + row * 60.0, side)
            })
            .collect()
    }

    #[test]
    fn test_clean_grid_passes() {
        let filter = CandidateFilter::default();
        let kept = filter.filter(grid_of_nine(50.0), FRAME_AREA);
        assert_eq!(kept.len(), 9);
    }

    #[test]
    fn test_geometric_rejections() {
        let filter = CandidateFilter::default();

        let tiny = square(0, 100.0, 100.0, 20.0);
        assert!(!filter.accepts(&tiny, FRAME_AREA));

        let huge = square(1, 300.0, 240.0, 200.0);
        assert!(!filter.accepts(&huge, FRAME_AREA));

        let mut concave = square(2, 100.0, 100.0, 50.0);
        concave.convex = false;
        assert!(!filter.accepts(&concave, FRAME_AREA));

        let mut triangle = square(3, 100.0, 100.0, 50.0);
        triangle.corner_count = 3;
        assert!(!filter.accepts(&triangle, FRAME_AREA));

        let mut wide = square(4, 100.0, 100.0, 50.0);
        wide.rect.w = 80.0;
        assert!(!filter.accepts(&wide, FRAME_AREA));

        let mut octagon = square(5, 100.0, 100.0, 50.0);
        octagon.corner_count = 8;
        assert!(filter.accepts(&octagon, FRAME_AREA));
    }

    #[test]
    fn test_dedup_keeps_largest_of_nested() {
        let outer = square(0, 100.0, 100.0, 50.0);
        let inner = square(1, 102.0, 101.0, 40.0);
        let kept = dedup_by_proximity(vec![inner, outer], 30.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].rect.contour, ContourRef(0));
    }

    #[test]
    fn test_dedup_distance_boundary_is_kept() {
        let a = square(0, 100.0, 100.0, 50.0);
        let b = square(1, 130.0, 100.0, 45.0);
        let kept = dedup_by_proximity(vec![a, b], 30.0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_consistency_rejects_outliers() {
        let mut candidates = grid_of_nine(50.0);
        candidates.push(square(20, 500.0, 400.0, 32.0)); // area 1024 < 0.5 * 2500
        let kept = filter_by_consistency(candidates, 4, 0.5, 1.5);
        assert_eq!(kept.len(), 9);
        assert!(kept.iter().all(|c| c.rect.contour != ContourRef(20)));
    }

    #[test]
    fn test_consistency_skipped_below_min_count() {
        let candidates = vec![
            square(0, 100.0, 100.0, 50.0),
            square(1, 200.0, 100.0, 100.0),
            square(2, 300.0, 100.0, 10.0),
        ];
        let kept = filter_by_consistency(candidates.clone(), 4, 0.5, 1.5);
        assert_eq!(kept, candidates);
    }

    #[test]
    fn test_median_even_count() {
        let mut values = vec![4.0, 1.0, 3.0, 2.0];
        assert_eq!(median(&mut values), 2.5);
    }

    #[test]
    fn test_default_config_valid() {
        assert!(FilterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_consistency_pass_can_shrink_again() {
        let areas = [1010.0, 1010.0, 1010.0, 2000.0, 3000.0, 3100.0, 3100.0];
        let candidates: Vec<Candidate> = areas
            .iter()
            .enumerate()
            .map(|(i, &area)| Candidate {
                area,
                ..square(i, 100.0 * i as f64, 100.0, 40.0)
            })
            .collect();

        let once = filter_by_consistency(candidates, 4, 0.5, 1.5);
        assert_eq!(once.len(), 5);
        let twice = filter_by_consistency(once, 4, 0.5, 1.5);
        assert_eq!(twice.len(), 3);
        assert!(twice.iter().all(|c| c.area == 1010.0));
    }

    proptest! {
        // Holds for the dedup stage only; the median band moves when
        // outliers are removed, so the full filter is not idempotent.
        #[test]
        fn prop_dedup_is_idempotent(
            points in prop::collection::vec((0.0f64..600.0, 0.0f64..400.0, 20.0f64..80.0), 0..30)
        ) {
            let candidates: Vec<Candidate> = points
                .iter()
                .enumerate()
                .map(|(i, &(x, y, side))| square(i, x, y, side))
                .collect();
            let once = dedup_by_proximity(candidates, 30.0);
            let twice = dedup_by_proximity(once.clone(), 30.0);
            prop_assert_eq!(once, twice);
        }
    }
}
