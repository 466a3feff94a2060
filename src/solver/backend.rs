//! Solver collaborator interface.

use thiserror::Error;

/// Failures reported by a solver backend.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("solver backend not available: {0}")]
    Unavailable(String),
    #[error("solver rejected the cube: {0}")]
    Rejected(String),
}

/// A named part of a partitioned solution, e.g. cross or F2L.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionStage {
    /// Stage name.
    pub name: String,
    /// Raw move tokens as emitted by the backend.
    pub tokens: Vec<String>,
}

/// Raw backend output: one or more stages of move tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSolution {
    /// Stages in execution order.
    pub stages: Vec<SolutionStage>,
}

impl RawSolution {
    /// A single unnamed stage.
    pub fn flat<S: Into<String>>(tokens: impl IntoIterator<Item = S>) -> Self {
        Self {
            stages: vec![SolutionStage {
                name: "solution".into(),
                tokens: tokens.into_iter().map(Into::into).collect(),
            }],
        }
    }

    /// Appends a named stage.
    pub fn with_stage<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        tokens: impl IntoIterator<Item = S>,
    ) -> Self {
        self.stages.push(SolutionStage {
            name: name.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        });
        self
    }
}

/// Finds a move sequence for a cube.
///
/// `facelets` is 54 characters in face order `F, R, U, D, L, B`, nine per
/// face, drawn from `f r u d l b`.
pub trait SolverBackend {
    /// Solves the cube or reports why it cannot.
    fn solve(&self, facelets: &str) -> Result<RawSolution, BackendError>;
}

impl<F> SolverBackend for F
where
    F: Fn(&str) -> Result<RawSolution, BackendError>,
{
    fn solve(&self, facelets: &str) -> Result<RawSolution, BackendError> {
        self(facelets)
    }
}

/// Backend that always answers with a fixed solution.
#[derive(Debug, Clone)]
pub struct ScriptedSolver {
    solution: RawSolution,
    calls: std::cell::RefCell<Vec<String>>,
}

impl ScriptedSolver {
    /// Creates a solver returning `solution` for every input.
    pub fn new(solution: RawSolution) -> Self {
        Self {
            solution,
            calls: Default::default(),
        }
    }

    /// Facelet strings received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl SolverBackend for ScriptedSolver {
    fn solve(&self, facelets: &str) -> Result<RawSolution, BackendError> {
        self.calls.borrow_mut().push(facelets.to_string());
        Ok(self.solution.clone())
    }
}

/// Backend used when no solver is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingSolver;

impl SolverBackend for MissingSolver {
    fn solve(&self, _facelets: &str) -> Result<RawSolution, BackendError> {
        Err(BackendError::Unavailable("no solver backend configured".into()))
    }
}
