//! Metrics collection and registry.

use crate::session::Session;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of session state for metrics update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Frames examined.
    pub ticks: u64,
    /// Frames without exactly nine stickers.
    pub candidate_mismatches: u64,
    /// Frames the detection source failed to deliver.
    pub detection_failures: u64,
    /// Faces committed.
    pub faces_accepted: u64,
    /// Faces currently stored.
    pub faces_stored: usize,
    /// Solve attempts rejected by validation.
    pub validation_failures: u64,
    /// Solve attempts the solver could not complete.
    pub solver_failures: u64,
    /// Moves in the loaded solution.
    pub solution_length: usize,
    /// Replay cursor, -1 before the first move.
    pub move_cursor: i64,
}

impl MetricsSnapshot {
    /// Captures the current state of a session.
    pub fn from_session(session: &Session) -> Self {
        let stats = session.stats();
        let replay = session.replay();
        Self {
            ticks: stats.ticks,
            candidate_mismatches: stats.candidate_mismatches,
            detection_failures: stats.detection_failures,
            faces_accepted: stats.faces_accepted,
            faces_stored: session.state().scanned_count(),
            validation_failures: stats.validation_failures,
            solver_failures: stats.solver_failures,
            solution_length: replay.solution().len(),
            move_cursor: replay.cursor().map_or(-1, |i| i as i64),
        }
    }
}

/// Prometheus metrics registry for scan monitoring.
pub struct MetricsRegistry {
    registry: Registry,

    // Scan
    ticks_total: IntCounter,
    candidate_mismatches_total: IntCounter,
    detection_failures_total: IntCounter,
    faces_accepted_total: IntCounter,
    faces_stored: IntGauge,

    // Solve
    validation_failures_total: IntCounter,
    solver_failures_total: IntCounter,
    solution_length: IntGauge,
    move_cursor: IntGauge,
}

impl MetricsRegistry {
    /// Creates a registry with all scan metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let ticks_total = IntCounter::new("cube_scan_ticks_total", "Frames examined")?;
        let candidate_mismatches_total = IntCounter::new(
            "cube_scan_candidate_mismatches_total",
            "Frames that did not yield exactly nine stickers",
        )?;
        let detection_failures_total = IntCounter::new(
            "cube_scan_detection_failures_total",
            "Frames the detection source failed to deliver",
        )?;
        let faces_accepted_total =
            IntCounter::new("cube_scan_faces_accepted_total", "Faces committed by the stabilizer")?;
        let faces_stored = IntGauge::new("cube_scan_faces_stored", "Faces currently stored (0-6)")?;

        let validation_failures_total = IntCounter::new(
            "cube_scan_validation_failures_total",
            "Solve attempts rejected by state validation",
        )?;
        let solver_failures_total = IntCounter::new(
            "cube_scan_solver_failures_total",
            "Solve attempts the solver could not complete",
        )?;
        let solution_length =
            IntGauge::new("cube_scan_solution_length", "Moves in the loaded solution")?;
        let move_cursor = IntGauge::new(
            "cube_scan_move_cursor",
            "Index of the last applied replay move (-1 before the first)",
        )?;

        registry.register(Box::new(ticks_total.clone()))?;
        registry.register(Box::new(candidate_mismatches_total.clone()))?;
        registry.register(Box::new(detection_failures_total.clone()))?;
        registry.register(Box::new(faces_accepted_total.clone()))?;
        registry.register(Box::new(faces_stored.clone()))?;
        registry.register(Box::new(validation_failures_total.clone()))?;
        registry.register(Box::new(solver_failures_total.clone()))?;
        registry.register(Box::new(solution_length.clone()))?;
        registry.register(Box::new(move_cursor.clone()))?;

        Ok(Self {
            registry,
            ticks_total,
            candidate_mismatches_total,
            detection_failures_total,
            faces_accepted_total,
            faces_stored,
            validation_failures_total,
            solver_failures_total,
            solution_length,
            move_cursor,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        // Counters only move forward by the difference.
        advance(&self.ticks_total, snapshot.ticks);
        advance(&self.candidate_mismatches_total, snapshot.candidate_mismatches);
        advance(&self.detection_failures_total, snapshot.detection_failures);
        advance(&self.faces_accepted_total, snapshot.faces_accepted);
        advance(&self.validation_failures_total, snapshot.validation_failures);
        advance(&self.solver_failures_total, snapshot.solver_failures);

        self.faces_stored.set(snapshot.faces_stored as i64);
        self.solution_length.set(snapshot.solution_length as i64);
        self.move_cursor.set(snapshot.move_cursor);
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}
