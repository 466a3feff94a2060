//! Detection collaborator interface.
//!
//! Edge detection, contour extraction and polygon approximation happen
//! outside this crate. A [`DetectionSource`] hands over the resulting
//! candidates once per tick and answers color-sampling queries against
//! the same frame.

use super::candidate::{Candidate, CandidateRect, ContourRef};
use super::grid::GRID_SIZE;
use crate::color::Rgb;
use std::collections::VecDeque;
use thiserror::Error;

/// Errors reported by a detection source.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("detection source unavailable: {0}")]
    Unavailable(String),
    #[error("failed to process frame: {0}")]
    FrameFailed(String),
}

/// Square neighborhood sampled for a sticker's average color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRegion {
    /// Center x in pixels.
    pub cx: f64,
    /// Center y in pixels.
    pub cy: f64,
    /// Half the side length in pixels.
    pub half_size: f64,
}

impl SampleRegion {
    /// Half-size of the default 10x10 neighborhood.
    pub const DEFAULT_HALF_SIZE: f64 = 5.0;

    /// The default neighborhood around a rectangle's center.
    pub fn around(rect: &CandidateRect) -> Self {
        Self {
            cx: rect.cx(),
            cy: rect.cy(),
            half_size: Self::DEFAULT_HALF_SIZE,
        }
    }
}

/// Supplies per-tick detections and color samples.
pub trait DetectionSource {
    /// Frame dimensions in pixels.
    fn frame_size(&self) -> (u32, u32);

    /// Advances to the next frame and returns its candidates.
    fn detect(&mut self) -> Result<Vec<Candidate>, DetectionError>;

    /// Mean color of `region` in the current frame.
    fn sample_average_color(&self, region: &SampleRegion) -> Rgb;

    /// Frame area in square pixels.
    fn frame_area(&self) -> f64 {
        let (w, h) = self.frame_size();
        f64::from(w) * f64::from(h)
    }
}

/// One synthetic frame.
#[derive(Debug, Clone)]
pub struct ScriptedFrame {
    /// Colors of the nine stickers in view, row-major; `None` for an
    /// empty scene.
    pub stickers: Option<[Rgb; GRID_SIZE]>,
    /// Add nested and background detections.
    pub clutter: bool,
}

/// Synthetic detection source that plays back a script of frames.
///
/// Stickers are laid out as a centered 3x3 grid. When the script runs out
/// the source keeps reporting empty frames.
#[derive(Debug)]
pub struct MockDetectionSource {
    width: u32,
    height: u32,
    script: VecDeque<ScriptedFrame>,
    current: Option<ScriptedFrame>,
    frames_served: u64,
}

impl MockDetectionSource {
    /// Sticker side length in pixels.
    pub const STICKER_SIDE: f64 = 50.0;
    /// Distance between neighboring sticker centers.
    pub const STICKER_PITCH: f64 = 60.0;

    /// Creates an empty source with the given frame size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            script: VecDeque::new(),
            current: None,
            frames_served: 0,
        }
    }

    /// Queues `frames` identical frames showing one face.
    pub fn show_face(&mut self, stickers: [Rgb; GRID_SIZE], frames: usize, clutter: bool) {
        for _ in 0..frames {
            self.push_frame(ScriptedFrame {
                stickers: Some(stickers),
                clutter,
            });
        }
    }

    /// Queues `frames` frames with nothing in view.
    pub fn show_nothing(&mut self, frames: usize) {
        for _ in 0..frames {
            self.push_frame(ScriptedFrame {
                stickers: None,
                clutter: true,
            });
        }
    }

    /// Queues a single frame.
    pub fn push_frame(&mut self, frame: ScriptedFrame) {
        self.script.push_back(frame);
    }

    /// Frames remaining in the script.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Frames handed out so far.
    pub fn frames_served(&self) -> u64 {
        self.frames_served
    }

    fn sticker_center(&self, slot: usize) -> (f64, f64) {
        let col = (slot % 3) as f64 - 1.0;
        let row = (slot / 3) as f64 - 1.0;
        (
            f64::from(self.width) / 2.0 + col * Self::STICKER_PITCH,
            f64::from(self.height) / 2.0 + row * Self::STICKER_PITCH,
        )
    }

    fn square(id: usize, cx: f64, cy: f64, side: f64) -> Candidate {
        Candidate {
            rect: CandidateRect::new(cx - side / 2.0, cy - side / 2.0, side, side, ContourRef(id)),
            // Rounded corners shave a little off the bounding-box area.
            area: side * side * 0.96,
            corner_count: 4,
            convex: true,
        }
    }
}

impl DetectionSource for MockDetectionSource {
    fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn detect(&mut self) -> Result<Vec<Candidate>, DetectionError> {
        self.current = self.script.pop_front();
        self.frames_served += 1;

        let Some(frame) = self.current.as_ref() else {
            return Ok(Vec::new());
        };

        let mut candidates = Vec::new();
        let mut next_id = 0;
        let mut push = |c: Candidate, list: &mut Vec<Candidate>| {
            let mut c = c;
            c.rect.contour = ContourRef(next_id);
            next_id += 1;
            list.push(c);
        };

        if frame.stickers.is_some() {
            for slot in 0..GRID_SIZE {
                let (cx, cy) = self.sticker_center(slot);
                push(Self::square(0, cx, cy, Self::STICKER_SIDE), &mut candidates);
                if frame.clutter {
                    // Inner outline of the same sticker.
                    push(
                        Self::square(0, cx + 1.0, cy + 1.0, Self::STICKER_SIDE * 0.8),
                        &mut candidates,
                    );
                }
            }
        }

        if frame.clutter {
            // Small square-ish blob off to the side, inside geometric limits.
            push(Self::square(0, 40.0, 40.0, 34.0), &mut candidates);
            // Concave background shape.
            let mut blob = Self::square(0, f64::from(self.width) - 60.0, 60.0, 60.0);
            blob.convex = false;
            push(blob, &mut candidates);
        }

        Ok(candidates)
    }

    fn sample_average_color(&self, region: &SampleRegion) -> Rgb {
        let black = Rgb::new(0.0, 0.0, 0.0);
        let Some(stickers) = self.current.as_ref().and_then(|f| f.stickers) else {
            return black;
        };

        let half = Self::STICKER_SIDE / 2.0;
        (0..GRID_SIZE)
            .find(|&slot| {
                let (cx, cy) = self.sticker_center(slot);
                (region.cx - cx).abs() <= half && (region.cy - cy).abs() <= half
            })
            .map(|slot| stickers[slot])
            .unwrap_or(black)
    }
}
