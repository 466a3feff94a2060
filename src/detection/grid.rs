//! Row-major ordering of the nine sticker rectangles.
//!
//! Position 0 is top-left, 4 is the center sticker, 8 is bottom-right.
//! Every downstream stage relies on this ordering.

use super::candidate::CandidateRect;
use std::cmp::Ordering;
use thiserror::Error;

/// Stickers on one face.
pub const GRID_SIZE: usize = 9;

/// Index of the center sticker.
pub const CENTER: usize = 4;

/// Sequencing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// The grid needs exactly nine rectangles.
    #[error("expected 9 stickers, found {found}")]
    WrongCount {
        /// Number of rectangles supplied.
        found: usize,
    },
}

/// Orders exactly nine rectangles row-major.
///
/// Sorts by vertical center, slices into rows of three and sorts each row
/// by horizontal center. Ties fall back to the remaining coordinates and
/// the contour handle, so the result does not depend on input order.
pub fn sequence_grid(rects: &[CandidateRect]) -> Result<[CandidateRect; GRID_SIZE], SequenceError> {
    let mut sorted: [CandidateRect; GRID_SIZE] = rects
        .try_into()
        .map_err(|_| SequenceError::WrongCount { found: rects.len() })?;

    sorted.sort_by(by_row);
    for row in sorted.chunks_mut(3) {
        row.sort_by(by_column);
    }
    Ok(sorted)
}

fn by_row(a: &CandidateRect, b: &CandidateRect) -> Ordering {
    a.cy()
        .total_cmp(&b.cy())
        .then_with(|| by_column(a, b))
}

fn by_column(a: &CandidateRect, b: &CandidateRect) -> Ordering {
    a.cx()
        .total_cmp(&b.cx())
        .then_with(|| a.cy().total_cmp(&b.cy()))
        .then_with(|| a.w.total_cmp(&b.w))
        .then_with(|| a.h.total_cmp(&b.h))
        .then_with(|| a.contour.cmp(&b.contour))
}
