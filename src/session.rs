//! Session context owning all mutable scan and replay state.
//!
//! A [`Session`] is created when scanning starts and lives until it is
//! dropped. [`Session::reset`] returns it to its initial state without
//! touching configuration or lifetime statistics.

use crate::color::ReferenceColor;
use crate::config::FileConfig;
use crate::cube::{CubeState, FaceId, FaceLabels, OrientationMap, ValidationError};
use crate::detection::{CandidateFilter, DetectionError, DetectionSource, CENTER, GRID_SIZE};
use crate::replay::{draw, CubieGrid, ReplayEngine, ReplayPosition, Renderer};
use crate::scan::{FrameReading, Scanner, StabilizerVerdict, TemporalStabilizer};
use crate::solver::{self, Move, Solution, SolverBackend, SolverError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Order in which faces are suggested to the user.
const GUIDANCE_ORDER: [FaceId; 6] = [FaceId::U, FaceId::D, FaceId::F, FaceId::B, FaceId::L, FaceId::R];

/// Result of one scan tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// All six faces are stored and consistent; the frame was not examined.
    AlreadyComplete,
    /// The frame did not contain exactly nine stickers.
    CandidateMismatch {
        /// Candidates surviving the filter.
        found: usize,
        /// What the user should show next.
        guidance: String,
    },
    /// A face was accepted recently.
    CoolingDown {
        /// Time left in the cooldown.
        remaining: Duration,
    },
    /// Samples were recorded but no face is stable yet.
    Sampling {
        /// Slots with enough valid samples.
        ready_slots: usize,
    },
    /// A face was committed to the cube state.
    FaceAccepted {
        /// Face the scan was stored under.
        face: FaceId,
        /// Faces still to scan.
        missing: Vec<FaceId>,
        /// True when this scan completed the cube.
        complete: bool,
    },
}

/// One accepted face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaceRecord {
    /// Face the scan was stored under.
    pub face: FaceId,
    /// Resolved labels.
    pub labels: FaceLabels,
    /// Observed colors.
    pub colors: [ReferenceColor; GRID_SIZE],
    /// When the face was accepted.
    pub captured_at: DateTime<Utc>,
}

/// Lifetime counters; survive [`Session::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames examined.
    pub ticks: u64,
    /// Frames rejected for not having nine stickers.
    pub candidate_mismatches: u64,
    /// Frames the detection source failed to deliver.
    pub detection_failures: u64,
    /// Faces committed.
    pub faces_accepted: u64,
    /// Solve attempts rejected by validation.
    pub validation_failures: u64,
    /// Solve attempts the solver could not complete.
    pub solver_failures: u64,
    /// Successful solves.
    pub solves: u64,
}

/// Scan pipeline, cube state and replay engine for one user session.
pub struct Session {
    scanner: Scanner,
    stabilizer: TemporalStabilizer,
    orientation: OrientationMap,
    state: CubeState,
    replay: ReplayEngine,
    solution: Option<Solution>,
    scan_log: Vec<FaceRecord>,
    stats: SessionStats,
}

impl Session {
    /// Creates a session from a validated configuration.
    pub fn new(config: &FileConfig) -> Self {
        let classifier = config.classifier.kind.build(&config.classifier.hsv);
        let filter = CandidateFilter::new(config.filter.clone());
        Self {
            scanner: Scanner::new(filter, classifier),
            stabilizer: TemporalStabilizer::new(config.stabilizer.clone()),
            orientation: OrientationMap::new(),
            state: CubeState::new(),
            replay: ReplayEngine::new(),
            solution: None,
            scan_log: Vec::new(),
            stats: SessionStats::default(),
        }
    }

    /// Stored cube state.
    pub fn state(&self) -> &CubeState {
        &self.state
    }

    /// Current color-to-face binding.
    pub fn orientation(&self) -> &OrientationMap {
        &self.orientation
    }

    /// Replay engine.
    pub fn replay(&self) -> &ReplayEngine {
        &self.replay
    }

    /// Last successful solution.
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Accepted faces in order.
    pub fn scan_log(&self) -> &[FaceRecord] {
        &self.scan_log
    }

    /// Lifetime counters.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Runs one scan tick using the wall clock.
    pub fn tick(&mut self, source: &mut dyn DetectionSource) -> Result<TickOutcome, DetectionError> {
        self.tick_at(source, Instant::now())
    }

    /// Runs one scan tick at `now`.
    pub fn tick_at(
        &mut self,
        source: &mut dyn DetectionSource,
        now: Instant,
    ) -> Result<TickOutcome, DetectionError> {
        // An inconsistent cube keeps scanning so the bad face can be rescanned.
        if self.state.is_complete() && self.state.validate().is_ok() {
            return Ok(TickOutcome::AlreadyComplete);
        }
        self.stats.ticks += 1;

        let candidates = match source.detect() {
            Ok(candidates) => candidates,
            Err(e) => {
                self.stats.detection_failures += 1;
                tracing::warn!(error = %e, "Detection failed");
                return Err(e);
            }
        };

        let samples = match self.scanner.read(candidates, source) {
            FrameReading::Stickers(samples) => samples,
            FrameReading::Mismatch { found } => {
                self.stats.candidate_mismatches += 1;
                tracing::trace!(found, "Candidate count mismatch");
                return Ok(TickOutcome::CandidateMismatch {
                    found,
                    guidance: self.guidance(),
                });
            }
        };

        Ok(match self.stabilizer.observe(samples, now) {
            StabilizerVerdict::CoolingDown { remaining } => TickOutcome::CoolingDown { remaining },
            StabilizerVerdict::Pending { ready_slots } => TickOutcome::Sampling { ready_slots },
            StabilizerVerdict::Accepted(colors) => self.accept_face(colors),
        })
    }

    fn accept_face(&mut self, colors: [ReferenceColor; GRID_SIZE]) -> TickOutcome {
        self.orientation.lock(colors[CENTER]);
        let face = self.state.add_face(&colors, &self.orientation);
        self.stats.faces_accepted += 1;
        self.scan_log.push(FaceRecord {
            face,
            labels: colors.map(|c| self.orientation.face_of(c)),
            colors,
            captured_at: Utc::now(),
        });

        let missing = self.state.missing_faces();
        let complete = missing.is_empty();
        tracing::info!(
            face = %face,
            center = %colors[CENTER],
            scanned = self.state.scanned_count(),
            "Face accepted"
        );
        if complete {
            match self.state.validate() {
                Ok(()) => tracing::info!("Cube complete, scanning stopped"),
                Err(e) => tracing::warn!(
                    reason = %e.describe(&self.orientation),
                    "Cube complete but inconsistent, rescan needed"
                ),
            }
        }

        TickOutcome::FaceAccepted {
            face,
            missing,
            complete,
        }
    }

    /// The next face to scan and the color of its center.
    ///
    /// `None` before the orientation lock and once the cube is complete and
    /// consistent. A complete but inconsistent cube names the first face
    /// whose label count is short.
    pub fn expected_face(&self) -> Option<(FaceId, ReferenceColor)> {
        if !self.orientation.is_locked() {
            return None;
        }
        if self.state.is_complete() {
            let err = self.state.validate().err()?;
            return err
                .deficient()
                .first()
                .map(|&f| (f, self.orientation.color_of(f)));
        }
        GUIDANCE_ORDER
            .into_iter()
            .find(|&f| self.state.face(f).is_none())
            .map(|f| (f, self.orientation.color_of(f)))
    }

    /// Human-readable hint for the next scan.
    pub fn guidance(&self) -> String {
        if self.state.is_complete() {
            return match (self.state.validate(), self.expected_face()) {
                (Ok(()), _) => "Cube complete.".to_string(),
                (Err(_), Some((face, color))) => {
                    format!("Rescan the {} center ({}) face.", color.name(), face)
                }
                (Err(e), None) => format!("{} Rescan the cube.", e.describe(&self.orientation)),
            };
        }
        match self.expected_face() {
            Some((face, color)) => format!("Show the {} center ({}) face.", color.name(), face),
            None => "Show any face of the cube to start.".to_string(),
        }
    }

    /// Checks the stored state.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.state.validate()
    }

    /// Solves the stored state and loads the result for replay.
    ///
    /// On failure the scanned state is kept so the user can rescan.
    pub fn solve(&mut self, backend: &dyn SolverBackend) -> Result<Solution, SolverError> {
        let solution = match solver::solve(&self.state, backend) {
            Ok(solution) => solution,
            Err(e) => {
                match &e {
                    SolverError::Invalid(v) => {
                        self.stats.validation_failures += 1;
                        tracing::warn!(reason = %v.describe(&self.orientation), "Validation failed");
                    }
                    other => {
                        self.stats.solver_failures += 1;
                        tracing::warn!(error = %other, "Solve failed");
                    }
                }
                return Err(e);
            }
        };

        let Some(grid) = CubieGrid::from_state(&self.state) else {
            self.stats.validation_failures += 1;
            return Err(ValidationError::Incomplete {
                missing: self.state.missing_faces(),
            }
            .into());
        };
        self.replay.set_grid(grid);
        self.replay.set_solution(solution.moves.clone());
        self.stats.solves += 1;
        tracing::info!(
            moves = solution.moves.len(),
            stages = solution.stages.len(),
            "Solution ready"
        );
        self.solution = Some(solution.clone());
        Ok(solution)
    }

    /// Applies the next solution move and redraws.
    pub fn next_move(&mut self, renderer: &mut dyn Renderer) -> Option<Move> {
        let mv = self.replay.next_move()?;
        draw(self.replay.grid(), renderer);
        Some(mv)
    }

    /// Undoes the current solution move and redraws.
    pub fn prev_move(&mut self, renderer: &mut dyn Renderer) -> Option<ReplayPosition> {
        let position = self.replay.prev_move()?;
        draw(self.replay.grid(), renderer);
        Some(position)
    }

    /// Replaces the stored state with a seeded scramble of a solved cube.
    ///
    /// The orientation is locked as a first scan with the green center in
    /// front would lock it, so orange resolves to `R` and red to `L`.
    pub fn force_scrambled(&mut self, length: usize, seed: u64) -> Vec<Move> {
        self.reset();
        let scramble = self.replay.scramble(length, seed);
        self.state = self.replay.grid().to_state();
        self.orientation.lock(self.orientation.color_of(FaceId::F));
        scramble
    }

    /// Returns the session to its initial state.
    pub fn reset(&mut self) {
        self.state.clear();
        self.stabilizer.reset();
        self.orientation.reset();
        self.replay.reset();
        self.solution = None;
        self.scan_log.clear();
        tracing::info!("Session reset");
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&FileConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::MockDetectionSource;
    use crate::replay::RecordingRenderer;
    use crate::solver::{BackendError, RawSolution, ScriptedSolver};

    fn show(source: &mut MockDetectionSource, center: ReferenceColor, frames: usize) {
        source.show_face([center.reference_rgb(); GRID_SIZE], frames, false);
    }

    fn run(session: &mut Session, source: &mut MockDetectionSource, start: Instant) -> Vec<TickOutcome> {
        let mut out = Vec::new();
        let mut now = start;
        while source.remaining() > 0 {
            out.push(session.tick_at(source, now).unwrap());
            now += Duration::from_millis(100);
        }
        out
    }

    #[test]
    fn test_first_face_locks_front() {
        let mut session = Session::default();
        let mut source = MockDetectionSource::new(640, 480);
        show(&mut source, ReferenceColor::Blue, 5);

        let outcomes = run(&mut session, &mut source, Instant::now());
        let last = outcomes.last().unwrap();
        assert!(matches!(last, TickOutcome::FaceAccepted { face: FaceId::F, .. }));
        assert!(session.orientation().is_locked());
        assert_eq!(session.orientation().face_of(ReferenceColor::Red), FaceId::R);
        assert_eq!(session.scan_log().len(), 1);
    }

    #[test]
    fn test_cooldown_blocks_second_face() {
        let mut session = Session::default();
        let mut source = MockDetectionSource::new(640, 480);
        show(&mut source, ReferenceColor::Green, 5);
        show(&mut source, ReferenceColor::Red, 5);

        let outcomes = run(&mut session, &mut source, Instant::now());
        assert!(matches!(outcomes[4], TickOutcome::FaceAccepted { .. }));
        assert!(outcomes[5..]
            .iter()
            .all(|o| matches!(o, TickOutcome::CoolingDown { .. })));
        assert_eq!(session.state().scanned_count(), 1);
    }

    #[test]
    fn test_mismatch_carries_guidance() {
        let mut session = Session::default();
        let mut source = MockDetectionSource::new(640, 480);
        source.show_nothing(1);

        let outcome = session.tick_at(&mut source, Instant::now()).unwrap();
        assert_eq!(
            outcome,
            TickOutcome::CandidateMismatch {
                found: 1,
                guidance: "Show any face of the cube to start.".into()
            }
        );
        assert_eq!(session.stats().candidate_mismatches, 1);
    }

    #[test]
    fn test_expected_face_follows_state_table() {
        let mut session = Session::default();
        assert_eq!(session.expected_face(), None);

        let mut source = MockDetectionSource::new(640, 480);
        show(&mut source, ReferenceColor::Green, 5);
        run(&mut session, &mut source, Instant::now());

        assert_eq!(session.expected_face(), Some((FaceId::U, ReferenceColor::White)));
        assert_eq!(session.guidance(), "Show the White center (U) face.");
    }

    #[test]
    fn test_force_scrambled_locks_green_front() {
        let mut session = Session::default();
        session.force_scrambled(4, 1);
        let map = session.orientation();
        assert!(map.is_locked());
        assert_eq!(map.face_of(ReferenceColor::Green), FaceId::F);
        assert_eq!(map.face_of(ReferenceColor::Orange), FaceId::R);
        assert_eq!(map.face_of(ReferenceColor::Red), FaceId::L);
    }

    #[test]
    fn test_inconsistent_complete_session_keeps_scanning() {
        let mut session = Session::default();
        session.force_scrambled(10, 3);
        let mut labels = *session.state().face(FaceId::U).unwrap();
        labels[0] = if labels[0] == FaceId::F { FaceId::B } else { FaceId::F };
        session.state.set_face(FaceId::U, labels);
        assert!(session.validate().is_err());
        assert!(session.expected_face().is_some());
        assert!(session.guidance().starts_with("Rescan the "));

        let mut source = MockDetectionSource::new(640, 480);
        show(&mut source, ReferenceColor::White, 1);
        assert_eq!(
            session.tick_at(&mut source, Instant::now()).unwrap(),
            TickOutcome::Sampling { ready_slots: 0 }
        );
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn test_complete_session_ignores_frames() {
        let mut session = Session::default();
        session.force_scrambled(10, 3);
        assert!(session.state().is_complete());

        let mut source = MockDetectionSource::new(640, 480);
        show(&mut source, ReferenceColor::Green, 1);
        assert_eq!(
            session.tick_at(&mut source, Instant::now()).unwrap(),
            TickOutcome::AlreadyComplete
        );
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn test_solve_loads_replay_and_draws() {
        let mut session = Session::default();
        let scramble = session.force_scrambled(12, 9);
        let inverse: Vec<String> = scramble.iter().rev().map(|m| m.invert().to_string()).collect();
        let backend = ScriptedSolver::new(RawSolution::flat(inverse));

        let solution = session.solve(&backend).unwrap();
        assert_eq!(solution.moves.len(), 12);
        assert_eq!(backend.calls().len(), 1);

        let mut renderer = RecordingRenderer::new();
        while session.next_move(&mut renderer).is_some() {}
        assert!(session.replay().grid().is_solved());
        assert_eq!(renderer.frames(), 12);
        assert_eq!(renderer.label(FaceId::L, 4), Some(FaceId::L));

        assert_eq!(session.prev_move(&mut renderer).map(|_| ()), Some(()));
        assert_eq!(renderer.frames(), 13);
    }

    #[test]
    fn test_solver_failure_keeps_state() {
        let mut session = Session::default();
        session.force_scrambled(8, 4);
        let before = session.state().clone();

        let failing = |_: &str| -> Result<RawSolution, BackendError> {
            Err(BackendError::Rejected("parity".into()))
        };
        let err = session.solve(&failing).unwrap_err();
        assert!(matches!(err, SolverError::ImpossibleState));
        assert_eq!(session.state(), &before);
        assert_eq!(session.stats().solver_failures, 1);
        assert!(session.solution().is_none());
    }

    #[test]
    fn test_incomplete_state_rejected() {
        let mut session = Session::default();
        let backend = ScriptedSolver::new(RawSolution::flat(Vec::<String>::new()));
        let err = session.solve(&backend).unwrap_err();
        assert!(matches!(err, SolverError::Invalid(ValidationError::Incomplete { .. })));
        assert!(backend.calls().is_empty());
        assert_eq!(session.stats().validation_failures, 1);
    }

    #[test]
    fn test_reset_clears_everything_but_stats() {
        let mut session = Session::default();
        let mut source = MockDetectionSource::new(640, 480);
        show(&mut source, ReferenceColor::Orange, 5);
        run(&mut session, &mut source, Instant::now());
        assert_eq!(session.state().scanned_count(), 1);

        session.reset();
        assert_eq!(session.state().scanned_count(), 0);
        assert!(!session.orientation().is_locked());
        assert!(session.scan_log().is_empty());
        assert_eq!(session.replay().cursor(), None);
        assert_eq!(session.stats().faces_accepted, 1);

        show(&mut source, ReferenceColor::Red, 5);
        let outcomes = run(&mut session, &mut source, Instant::now());
        assert!(matches!(outcomes.last(), Some(TickOutcome::FaceAccepted { face: FaceId::F, .. })));
    }

    #[test]
    fn test_scan_log_serializes() {
        let mut session = Session::default();
        let mut source = MockDetectionSource::new(640, 480);
        show(&mut source, ReferenceColor::Green, 5);
        run(&mut session, &mut source, Instant::now());

        let record = &session.scan_log()[0];
        assert_eq!(record.face, FaceId::F);
        assert_eq!(record.labels, [FaceId::F; GRID_SIZE]);
        let text = toml::to_string(&TomlWrap { record: record.clone() }).unwrap();
        assert!(text.contains("captured_at"));
    }

    #[derive(Serialize)]
    struct TomlWrap {
        record: FaceRecord,
    }
}
