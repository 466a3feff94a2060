//! Color-to-face orientation.
//!
//! The first accepted face of a session is, by definition, the front. Its
//! center color is bound to `F`, the standard-right table picks `R`, and
//! the opposite-color table fills in `B` and `L`. The binding is made once
//! per session and never revisited, even if a later scan disagrees.

use super::face::FaceId;
use crate::color::ReferenceColor;

/// Color that sits to the right of `front` on a standard cube.
///
/// Side colors cycle green, orange, blue, red. White and yellow fronts are
/// given fixed partners so the mapping stays a bijection.
pub fn standard_right(front: ReferenceColor) -> ReferenceColor {
    use ReferenceColor::*;
    match front {
        Green => Orange,
        Orange => Blue,
        Blue => Red,
        Red => Green,
        White => Red,
        Yellow => Orange,
    }
}

/// Bidirectional mapping between reference colors and faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrientationMap {
    face_of: [FaceId; 6],
    color_of: [ReferenceColor; 6],
    locked: bool,
}

impl Default for OrientationMap {
    fn default() -> Self {
        let mut map = Self {
            face_of: [FaceId::U; 6],
            color_of: [ReferenceColor::White; 6],
            locked: false,
        };
        map.assign(ReferenceColor::White, FaceId::U);
        map.assign(ReferenceColor::Yellow, FaceId::D);
        map.assign(ReferenceColor::Green, FaceId::F);
        map.assign(ReferenceColor::Blue, FaceId::B);
        map.assign(ReferenceColor::Orange, FaceId::L);
        map.assign(ReferenceColor::Red, FaceId::R);
        map
    }
}

impl OrientationMap {
    /// Creates the unlocked default mapping.
    pub fn new() -> Self {
        Self::default()
    }

    fn assign(&mut self, color: ReferenceColor, face: FaceId) {
        self.face_of[color.index()] = face;
        self.color_of[face.index()] = color;
    }

    /// Face a color currently resolves to.
    #[inline]
    pub fn face_of(&self, color: ReferenceColor) -> FaceId {
        self.face_of[color.index()]
    }

    /// Color currently bound to a face.
    #[inline]
    pub fn color_of(&self, face: FaceId) -> ReferenceColor {
        self.color_of[face.index()]
    }

    /// Whether the session orientation has been fixed.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Binds `front` to `F` and derives the rest. No-op once locked.
    ///
    /// Returns true if this call performed the lock.
    pub fn lock(&mut self, front: ReferenceColor) -> bool {
        if self.locked {
            return false;
        }

        let right = standard_right(front);
        let back = front.opposite();
        let left = right.opposite();

        let mut remaining = ReferenceColor::ALL
            .into_iter()
            .filter(|c| ![front, right, back, left].contains(c));
        // Side-color fronts leave white and yellow, which stay up and down.
        let (up, down) = match (remaining.next(), remaining.next()) {
            (Some(up), Some(down)) => (up, down),
            _ => (ReferenceColor::White, ReferenceColor::Yellow),
        };

        self.assign(front, FaceId::F);
        self.assign(right, FaceId::R);
        self.assign(back, FaceId::B);
        self.assign(left, FaceId::L);
        self.assign(up, FaceId::U);
        self.assign(down, FaceId::D);
        self.locked = true;

        tracing::info!(
            front = %front,
            right = %right,
            up = %up,
            "Orientation locked"
        );
        true
    }

    /// Returns to the unlocked default mapping.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
