//! Body-fixed face identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six faces of the cube in a body-fixed frame.
///
/// Discriminants double as array indices, so per-face tables are plain
/// `[T; 6]` arrays indexed with [`FaceId::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FaceId {
    /// Up.
    U = 0,
    /// Down.
    D = 1,
    /// Front.
    F = 2,
    /// Back.
    B = 3,
    /// Left.
    L = 4,
    /// Right.
    R = 5,
}

/// Lattice axis a face is perpendicular to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Left/right.
    X,
    /// Down/up.
    Y,
    /// Back/front.
    Z,
}

impl Axis {
    /// Component index into an `[x, y, z]` triple.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl FaceId {
    /// All faces in state-table order.
    pub const ALL: [FaceId; 6] = [FaceId::U, FaceId::D, FaceId::F, FaceId::B, FaceId::L, FaceId::R];

    /// Array index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Upper-case face letter.
    pub fn letter(self) -> char {
        match self {
            FaceId::U => 'U',
            FaceId::D => 'D',
            FaceId::F => 'F',
            FaceId::B => 'B',
            FaceId::L => 'L',
            FaceId::R => 'R',
        }
    }

    /// Parses a face letter, either case.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'U' => Some(FaceId::U),
            'D' => Some(FaceId::D),
            'F' => Some(FaceId::F),
            'B' => Some(FaceId::B),
            'L' => Some(FaceId::L),
            'R' => Some(FaceId::R),
            _ => None,
        }
    }

    /// The face on the other side of the cube.
    pub fn opposite(self) -> Self {
        match self {
            FaceId::U => FaceId::D,
            FaceId::D => FaceId::U,
            FaceId::F => FaceId::B,
            FaceId::B => FaceId::F,
            FaceId::L => FaceId::R,
            FaceId::R => FaceId::L,
        }
    }

    /// Axis this face is perpendicular to.
    pub fn axis(self) -> Axis {
        match self {
            FaceId::L | FaceId::R => Axis::X,
            FaceId::U | FaceId::D => Axis::Y,
            FaceId::F | FaceId::B => Axis::Z,
        }
    }

    /// `+1` for R/U/F, `-1` for L/D/B.
    pub fn side(self) -> i32 {
        match self {
            FaceId::R | FaceId::U | FaceId::F => 1,
            FaceId::L | FaceId::D | FaceId::B => -1,
        }
    }

    /// Outward unit normal as an integer lattice vector.
    pub fn normal(self) -> [i32; 3] {
        let mut n = [0; 3];
        n[self.axis().index()] = self.side();
        n
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
