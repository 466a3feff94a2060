//! Prometheus metrics for scan sessions.
//!
//! # Metrics Exposed
//!
//! ## Scan
//! - `cube_scan_ticks_total` - Frames examined
//! - `cube_scan_candidate_mismatches_total` - Frames without exactly nine stickers
//! - `cube_scan_detection_failures_total` - Frames the source failed to deliver
//! - `cube_scan_faces_accepted_total` - Faces committed by the stabilizer
//! - `cube_scan_faces_stored` - Faces currently stored
//!
//! ## Solve and replay
//! - `cube_scan_validation_failures_total` - Solve attempts rejected by validation
//! - `cube_scan_solver_failures_total` - Solve attempts the solver could not complete
//! - `cube_scan_solution_length` - Moves in the loaded solution
//! - `cube_scan_move_cursor` - Last applied replay move, -1 before the first
//!
//! With the `metrics` feature, [`MetricsServer`] serves these over HTTP.
//!
//! # Example
//!
//! ```no_run
//! use cube_scan::metrics::{MetricsRegistry, MetricsSnapshot};
//! use cube_scan::Session;
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! let session = Session::default();
//! registry.update(&MetricsSnapshot::from_session(&session));
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, MetricsState, ServerError};
