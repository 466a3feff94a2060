//! Solver collaborator adapter.
//!
//! The search itself lives outside this crate. This module encodes a
//! validated cube for it, shields the session from its failures, and
//! normalizes whatever move tokens come back.

mod adapter;
mod backend;
mod moves;

pub use adapter::{encode_state, solve, Solution, SolverError, StageSummary, SOLVER_FACE_ORDER};
pub use backend::{BackendError, MissingSolver, RawSolution, ScriptedSolver, SolutionStage, SolverBackend};
pub use moves::{format_moves, normalize_tokens, Move, MoveParseError, Turn};
