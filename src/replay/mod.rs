//! Move replay on a virtual cube.
//!
//! A solution is stepped forward and backward on a lattice of cubies.
//! Each step rotates one layer by a multiple of 90 degrees and snaps
//! coordinates back to integers, so any sequence followed by its inverse
//! leaves the cube exactly as it was.

mod cubie;
mod engine;
mod render;

pub use cubie::{facelet_position, Cubie, CubieGrid};
pub use engine::{ReplayEngine, ReplayPosition};
pub use render::{draw, NullRenderer, RecordingRenderer, Renderer};
