//! Stepping through a solution.

use super::cubie::CubieGrid;
use crate::cube::FaceId;
use crate::solver::{Move, Turn};
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};

/// Where the cursor points after stepping backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayPosition {
    /// Before the first move.
    Start,
    /// On this move, already applied.
    At(Move),
}

/// Applies and undoes solution moves on a cubie grid.
///
/// The cursor is `None` before the first move, otherwise the index of the
/// last applied move.
#[derive(Debug, Clone, Default)]
pub struct ReplayEngine {
    grid: CubieGrid,
    solution: Vec<Move>,
    cursor: Option<usize>,
}

impl ReplayEngine {
    /// Creates an engine over a solved grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine over an existing grid.
    pub fn with_grid(grid: CubieGrid) -> Self {
        Self {
            grid,
            solution: Vec::new(),
            cursor: None,
        }
    }

    /// The cubie grid.
    pub fn grid(&self) -> &CubieGrid {
        &self.grid
    }

    /// Replaces the grid, keeping the solution but rewinding the cursor.
    pub fn set_grid(&mut self, grid: CubieGrid) {
        self.grid = grid;
        self.cursor = None;
    }

    /// Loaded solution.
    pub fn solution(&self) -> &[Move] {
        &self.solution
    }

    /// Index of the last applied move.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// True when every move has been applied.
    pub fn is_finished(&self) -> bool {
        match self.cursor {
            Some(i) => i + 1 == self.solution.len(),
            None => self.solution.is_empty(),
        }
    }

    /// Loads a solution and rewinds the cursor.
    pub fn set_solution(&mut self, moves: Vec<Move>) {
        tracing::debug!(moves = moves.len(), "Solution loaded for replay");
        self.solution = moves;
        self.cursor = None;
    }

    /// Applies the next move and returns it; `None` at the end.
    pub fn next_move(&mut self) -> Option<Move> {
        let next = self.cursor.map_or(0, |i| i + 1);
        let mv = *self.solution.get(next)?;
        self.grid.apply_move(mv);
        self.cursor = Some(next);
        tracing::trace!(step = next, mv = %mv, "Replay forward");
        Some(mv)
    }

    /// Undoes the current move; `None` when already at the start.
    pub fn prev_move(&mut self) -> Option<ReplayPosition> {
        let current = self.cursor?;
        let mv = self.solution[current];
        self.grid.apply_move(mv.invert());
        self.cursor = current.checked_sub(1);
        tracing::trace!(step = current, mv = %mv, "Replay backward");

        Some(match self.cursor {
            Some(i) => ReplayPosition::At(self.solution[i]),
            None => ReplayPosition::Start,
        })
    }

    /// Clears the solution and restores a solved grid.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Applies a seeded random scramble and returns it.
    ///
    /// Consecutive moves never share a face. The solution is cleared.
    pub fn scramble(&mut self, length: usize, seed: u64) -> Vec<Move> {
        const TURNS: [Turn; 3] = [Turn::Clockwise, Turn::CounterClockwise, Turn::Double];

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut moves = Vec::with_capacity(length);
        let mut last: Option<FaceId> = None;

        while moves.len() < length {
            let face = FaceId::ALL[(rng.next_u32() % 6) as usize];
            if Some(face) == last {
                continue;
            }
            let turn = TURNS[(rng.next_u32() % 3) as usize];
            let mv = Move::new(face, turn);
            self.grid.apply_move(mv);
            moves.push(mv);
            last = Some(face);
        }

        self.solution.clear();
        self.cursor = None;
        tracing::info!(length, seed, "Cube scrambled");
        moves
    }
}
