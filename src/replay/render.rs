//! Rendering collaborator interface.

use super::cubie::CubieGrid;
use crate::cube::FaceId;

/// Receives sticker colors for display. Nothing flows back.
pub trait Renderer {
    /// Sets the sticker at `slot` of `face` to show `label`.
    fn apply_face_color(&mut self, face: FaceId, slot: usize, label: FaceId);

    /// Presents the current frame.
    fn render(&mut self);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn apply_face_color(&mut self, _face: FaceId, _slot: usize, _label: FaceId) {}

    fn render(&mut self) {}
}

/// Keeps the last pushed labels and counts frames; useful in tests.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    faces: [[Option<FaceId>; 9]; 6],
    frames: usize,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self {
            faces: [[None; 9]; 6],
            frames: 0,
        }
    }
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last label pushed for a sticker.
    pub fn label(&self, face: FaceId, slot: usize) -> Option<FaceId> {
        self.faces[face.index()].get(slot).copied().flatten()
    }

    /// Number of `render` calls.
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl Renderer for RecordingRenderer {
    fn apply_face_color(&mut self, face: FaceId, slot: usize, label: FaceId) {
        if let Some(cell) = self.faces[face.index()].get_mut(slot) {
            *cell = Some(label);
        }
    }

    fn render(&mut self) {
        self.frames += 1;
    }
}

/// Pushes every visible sticker of `grid`, then renders once.
pub fn draw(grid: &CubieGrid, renderer: &mut dyn Renderer) {
    for (face, labels) in FaceId::ALL.into_iter().zip(grid.facelets()) {
        for (slot, label) in labels.into_iter().enumerate() {
            renderer.apply_face_color(face, slot, label);
        }
    }
    renderer.render();
}
