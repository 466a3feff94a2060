//! The 54-sticker cube state.

use super::face::FaceId;
use super::orientation::OrientationMap;
use crate::color::ReferenceColor;
use crate::detection::{CENTER, GRID_SIZE};
use thiserror::Error;

/// Resolved labels of one face, row-major.
pub type FaceLabels = [FaceId; GRID_SIZE];

/// Validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Not every face has been scanned.
    #[error("cube incomplete, missing faces: {}", join_faces(.missing))]
    Incomplete {
        /// Faces with no stored scan.
        missing: Vec<FaceId>,
    },
    /// Some label does not appear exactly nine times.
    #[error("scan error: {}", describe_counts(.counts))]
    StickerCounts {
        /// Occurrences of each label, indexed by [`FaceId::index`].
        counts: [usize; 6],
    },
}

impl ValidationError {
    /// Labels appearing fewer than nine times.
    pub fn deficient(&self) -> Vec<FaceId> {
        self.faces_where(|n| n < GRID_SIZE)
    }

    /// Labels appearing more than nine times.
    pub fn surplus(&self) -> Vec<FaceId> {
        self.faces_where(|n| n > GRID_SIZE)
    }

    fn faces_where(&self, pred: impl Fn(usize) -> bool) -> Vec<FaceId> {
        match self {
            ValidationError::StickerCounts { counts } => FaceId::ALL
                .into_iter()
                .filter(|f| pred(counts[f.index()]))
                .collect(),
            ValidationError::Incomplete { .. } => Vec::new(),
        }
    }

    /// User-facing message naming colors rather than face labels.
    pub fn describe(&self, map: &OrientationMap) -> String {
        match self {
            ValidationError::Incomplete { missing } => {
                let names: Vec<&str> = missing.iter().map(|f| map.color_of(*f).name()).collect();
                format!("Still need to scan: {}.", names.join(", "))
            }
            ValidationError::StickerCounts { counts } => FaceId::ALL
                .into_iter()
                .filter(|f| counts[f.index()] != GRID_SIZE)
                .map(|f| {
                    format!(
                        "Scan Error: Found {} {} stickers (need 9).",
                        counts[f.index()],
                        map.color_of(f)
                    )
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

fn join_faces(faces: &[FaceId]) -> String {
    faces.iter().map(FaceId::to_string).collect::<Vec<_>>().join(", ")
}

fn describe_counts(counts: &[usize; 6]) -> String {
    FaceId::ALL
        .into_iter()
        .filter(|f| counts[f.index()] != GRID_SIZE)
        .map(|f| format!("found {} {} stickers (need 9)", counts[f.index()], f))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Face-indexed sticker labels; faces are `None` until scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CubeState {
    faces: [Option<FaceLabels>; 6],
}

impl CubeState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The solved cube: every face carries only its own label.
    pub fn solved() -> Self {
        let mut state = Self::new();
        for face in FaceId::ALL {
            state.set_face(face, [face; GRID_SIZE]);
        }
        state
    }

    /// Resolves observed colors through `map` and stores them under the
    /// face named by the center sticker, replacing any earlier scan.
    pub fn add_face(&mut self, colors: &[ReferenceColor; GRID_SIZE], map: &OrientationMap) -> FaceId {
        let labels: FaceLabels = colors.map(|c| map.face_of(c));
        let face = labels[CENTER];
        if self.faces[face.index()].is_some() {
            tracing::debug!(face = %face, "Overwriting earlier scan");
        }
        self.set_face(face, labels);
        face
    }

    /// Stores labels for a face directly.
    pub fn set_face(&mut self, face: FaceId, labels: FaceLabels) {
        self.faces[face.index()] = Some(labels);
    }

    /// Labels stored for a face.
    pub fn face(&self, face: FaceId) -> Option<&FaceLabels> {
        self.faces[face.index()].as_ref()
    }

    /// Faces without a stored scan, in state-table order.
    pub fn missing_faces(&self) -> Vec<FaceId> {
        FaceId::ALL
            .into_iter()
            .filter(|f| self.faces[f.index()].is_none())
            .collect()
    }

    /// Number of faces stored.
    pub fn scanned_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_some()).count()
    }

    /// True once every face has been scanned.
    pub fn is_complete(&self) -> bool {
        self.faces.iter().all(Option::is_some)
    }

    /// Occurrences of each label across all stored faces.
    pub fn label_counts(&self) -> [usize; 6] {
        let mut counts = [0usize; 6];
        for label in self.faces.iter().flatten().flatten() {
            counts[label.index()] += 1;
        }
        counts
    }

    /// Checks completeness and that every label appears exactly nine times.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = self.missing_faces();
        if !missing.is_empty() {
            return Err(ValidationError::Incomplete { missing });
        }

        let counts = self.label_counts();
        if counts.iter().any(|&n| n != GRID_SIZE) {
            return Err(ValidationError::StickerCounts { counts });
        }
        Ok(())
    }

    /// All 54 labels in `U, R, F, D, L, B` order, upper case.
    pub fn facelet_string(&self) -> Option<String> {
        const ORDER: [FaceId; 6] = [FaceId::U, FaceId::R, FaceId::F, FaceId::D, FaceId::L, FaceId::B];
        let mut out = String::with_capacity(54);
        for face in ORDER {
            for label in self.face(face)? {
                out.push(label.letter());
            }
        }
        Some(out)
    }

    /// Forgets every face.
    pub fn clear(&mut self) {
        self.faces = [None; 6];
    }
}
