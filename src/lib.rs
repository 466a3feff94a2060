//! Cube Scan Library
//!
//! Reconstructs a 3×3×3 puzzle cube from noisy per-frame sticker
//! detections, hands the assembled state to a solver, and replays the
//! solution on a virtual cubie lattice.
//!
//! # Architecture
//!
//! ```text
//! detection → filter → grid → classify → stabilize → orient → state
//!                                                               ↓
//!                                        renderer ← replay ← solver
//! ```
//!
//! Three collaborators sit outside the core and are reached only through
//! narrow traits: [`DetectionSource`] supplies candidates and color
//! samples, [`SolverBackend`] turns a facelet string into move tokens, and
//! [`Renderer`] receives sticker colors. Deterministic fakes for all three
//! ship with the crate.
//!
//! # Example
//!
//! ```no_run
//! use cube_scan::{
//!     color::ReferenceColor,
//!     detection::MockDetectionSource,
//!     replay::NullRenderer,
//!     solver::{RawSolution, ScriptedSolver},
//!     Session,
//! };
//!
//! let mut session = Session::default();
//! let mut source = MockDetectionSource::new(640, 480);
//! source.show_face([ReferenceColor::Green.reference_rgb(); 9], 5, true);
//!
//! while source.remaining() > 0 {
//!     let outcome = session.tick(&mut source).unwrap();
//!     println!("{:?}", outcome);
//! }
//!
//! if session.state().is_complete() {
//!     let backend = ScriptedSolver::new(RawSolution::flat(["R", "U"]));
//!     session.solve(&backend).unwrap();
//!     while session.next_move(&mut NullRenderer).is_some() {}
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod color;
pub mod config;
pub mod cube;
pub mod detection;
pub mod metrics;
pub mod replay;
pub mod scan;
pub mod session;
pub mod solver;

// Re-export commonly used types at crate root
pub use color::{ClassifierKind, ColorClassifier, ReferenceColor, Rgb};
pub use config::{ConfigError, FileConfig};
pub use cube::{CubeState, FaceId, OrientationMap, ValidationError};
pub use detection::{Candidate, CandidateFilter, DetectionError, DetectionSource, MockDetectionSource};
pub use replay::{CubieGrid, ReplayEngine, Renderer};
pub use scan::{Scanner, TemporalStabilizer};
pub use session::{FaceRecord, Session, SessionStats, TickOutcome};
pub use solver::{Move, Solution, SolverBackend, SolverError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
