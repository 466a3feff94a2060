//! Face identities, session orientation and the stored cube state.

mod face;
mod orientation;
mod state;

pub use face::{Axis, FaceId};
pub use orientation::{standard_right, OrientationMap};
pub use state::{CubeState, FaceLabels, ValidationError};
