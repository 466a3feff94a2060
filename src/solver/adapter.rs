//! Encoding cube state for the solver and decoding its answer.

use super::backend::{BackendError, SolverBackend};
use super::moves::{normalize_tokens, Move, MoveParseError};
use crate::cube::{CubeState, FaceId, ValidationError};
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Face order of the solver's input string.
pub const SOLVER_FACE_ORDER: [FaceId; 6] = [FaceId::F, FaceId::R, FaceId::U, FaceId::D, FaceId::L, FaceId::B];

/// User-facing solve failures. None of these invalidate the session.
#[derive(Debug, Clone, Error)]
pub enum SolverError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("solver not available: {0}")]
    Unavailable(String),
    #[error("Impossible Cube State. Please rescan.")]
    ImpossibleState,
    #[error("solver returned malformed moves: {0}")]
    MalformedMoves(#[from] MoveParseError),
}

/// Move count of one solution stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    /// Stage name as reported by the backend.
    pub name: String,
    /// Moves in the stage after normalization.
    pub moves: usize,
}

/// A decoded solution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    /// All stages flattened in order.
    pub moves: Vec<Move>,
    /// Per-stage move counts.
    pub stages: Vec<StageSummary>,
}

/// Renders a complete state as the solver's 54-character input.
pub fn encode_state(state: &CubeState) -> Option<String> {
    let mut out = String::with_capacity(54);
    for face in SOLVER_FACE_ORDER {
        for label in state.face(face)? {
            out.push(label.letter().to_ascii_lowercase());
        }
    }
    Some(out)
}

/// Validates, encodes and solves `state` with `backend`.
///
/// Backend errors and panics other than unavailability are reported as
/// [`SolverError::ImpossibleState`].
pub fn solve(state: &CubeState, backend: &dyn SolverBackend) -> Result<Solution, SolverError> {
    state.validate()?;
    let facelets = encode_state(state).ok_or_else(|| ValidationError::Incomplete {
        missing: state.missing_faces(),
    })?;

    tracing::debug!(facelets = %facelets, "Invoking solver");
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| backend.solve(&facelets)));

    let raw = match outcome {
        Ok(Ok(raw)) => raw,
        Ok(Err(BackendError::Unavailable(reason))) => {
            tracing::warn!(reason = %reason, "Solver unavailable");
            return Err(SolverError::Unavailable(reason));
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Solver rejected cube");
            return Err(SolverError::ImpossibleState);
        }
        Err(_) => {
            tracing::warn!("Solver panicked");
            return Err(SolverError::ImpossibleState);
        }
    };

    let mut solution = Solution::default();
    for stage in raw.stages {
        let moves = normalize_tokens(&stage.tokens)?;
        solution.stages.push(StageSummary {
            name: stage.name,
            moves: moves.len(),
        });
        solution.moves.extend(moves);
    }

    tracing::info!(
        moves = solution.moves.len(),
        stages = solution.stages.len(),
        "Solution decoded"
    );
    Ok(solution)
}
