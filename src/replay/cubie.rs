//! Cubie lattice and layer rotation.
//!
//! The 26 visible cubies live in a fixed arena. A cubie's identity is its
//! arena slot; where it currently sits is only known from its live
//! coordinates, so layers are always selected by coordinate. Coordinates
//! are rotated in floating point and snapped back onto the integer lattice
//! after every quarter turn.

use crate::cube::{Axis, CubeState, FaceId, FaceLabels};
use crate::detection::GRID_SIZE;
use crate::solver::Move;
use std::f64::consts::FRAC_PI_2;

/// Tolerance when selecting a layer by coordinate.
const LAYER_EPSILON: f64 = 0.1;

/// One small cube.
#[derive(Debug, Clone, PartialEq)]
pub struct Cubie {
    position: [f64; 3],
    /// Sticker facing each world direction, indexed by [`FaceId::index`].
    stickers: [Option<FaceId>; 6],
}

impl Cubie {
    fn new(lattice: [i32; 3]) -> Self {
        let mut stickers = [None; 6];
        for face in FaceId::ALL {
            if lattice[face.axis().index()] == face.side() {
                stickers[face.index()] = Some(face);
            }
        }
        Self {
            position: lattice.map(f64::from),
            stickers,
        }
    }

    /// Current position snapped to the lattice.
    pub fn lattice(&self) -> [i32; 3] {
        self.position.map(|c| c.round() as i32)
    }

    /// Sticker currently facing `direction`, if any.
    pub fn sticker(&self, direction: FaceId) -> Option<FaceId> {
        self.stickers[direction.index()]
    }

    fn in_layer(&self, face: FaceId) -> bool {
        let coord = self.position[face.axis().index()];
        coord * f64::from(face.side()) > LAYER_EPSILON
    }

    fn rotate(&mut self, axis: Axis, angle: f64) {
        self.position = rotate_vector(self.position, axis, angle);

        let mut rotated = [None; 6];
        for direction in FaceId::ALL {
            let normal = rotate_vector(direction.normal().map(f64::from), axis, angle);
            let target = face_for_normal(snap(normal));
            rotated[target.index()] = self.stickers[direction.index()];
        }
        self.stickers = rotated;
    }

    fn snap(&mut self) {
        self.position = snap(self.position).map(f64::from);
    }
}

fn snap(v: [f64; 3]) -> [i32; 3] {
    v.map(|c| c.round() as i32)
}

fn face_for_normal(n: [i32; 3]) -> FaceId {
    FaceId::ALL
        .into_iter()
        .find(|f| f.normal() == n)
        .unwrap_or(FaceId::U)
}

fn rotate_vector(v: [f64; 3], axis: Axis, angle: f64) -> [f64; 3] {
    let (s, c) = angle.sin_cos();
    let [x, y, z] = v;
    match axis {
        Axis::X => [x, y * c - z * s, y * s + z * c],
        Axis::Y => [x * c + z * s, y, -x * s + z * c],
        Axis::Z => [x * c - y * s, x * s + y * c, z],
    }
}

/// Lattice position of a face's sticker slot, row-major as seen from
/// outside with the conventional neighbor on top.
pub fn facelet_position(face: FaceId, slot: usize) -> [i32; 3] {
    let row = (slot / 3) as i32;
    let col = (slot % 3) as i32;
    match face {
        FaceId::U => [col - 1, 1, row - 1],
        FaceId::D => [col - 1, -1, 1 - row],
        FaceId::F => [col - 1, 1 - row, 1],
        FaceId::B => [1 - col, 1 - row, -1],
        FaceId::R => [1, 1 - row, 1 - col],
        FaceId::L => [-1, 1 - row, col - 1],
    }
}

/// Arena of the 26 visible cubies.
#[derive(Debug, Clone, PartialEq)]
pub struct CubieGrid {
    cubies: Vec<Cubie>,
}

impl Default for CubieGrid {
    fn default() -> Self {
        Self::solved()
    }
}

impl CubieGrid {
    /// A solved cube: every sticker faces its home direction.
    pub fn solved() -> Self {
        let mut cubies = Vec::with_capacity(26);
        for x in -1..=1 {
            for y in -1..=1 {
                for z in -1..=1 {
                    if (x, y, z) != (0, 0, 0) {
                        cubies.push(Cubie::new([x, y, z]));
                    }
                }
            }
        }
        Self { cubies }
    }

    /// A grid painted from a complete state.
    pub fn from_state(state: &CubeState) -> Option<Self> {
        let mut grid = Self::solved();
        grid.paint(state).then_some(grid)
    }

    /// Cubies in arena order.
    pub fn cubies(&self) -> &[Cubie] {
        &self.cubies
    }

    /// Cubie currently at `lattice`.
    pub fn cubie_at(&self, lattice: [i32; 3]) -> Option<&Cubie> {
        self.cubies.iter().find(|c| c.lattice() == lattice)
    }

    /// Overwrites visible stickers from a complete state.
    ///
    /// Returns false, leaving the grid untouched, if the state is incomplete.
    pub fn paint(&mut self, state: &CubeState) -> bool {
        if !state.is_complete() {
            return false;
        }
        for face in FaceId::ALL {
            let Some(labels) = state.face(face) else {
                continue;
            };
            for (slot, label) in labels.iter().enumerate() {
                let target = facelet_position(face, slot);
                if let Some(cubie) = self.cubies.iter_mut().find(|c| c.lattice() == target) {
                    cubie.stickers[face.index()] = Some(*label);
                }
            }
        }
        true
    }

    /// Reads the visible stickers back as one label array per face.
    pub fn facelets(&self) -> [FaceLabels; 6] {
        let mut out = [[FaceId::U; GRID_SIZE]; 6];
        for face in FaceId::ALL {
            for (slot, label) in out[face.index()].iter_mut().enumerate() {
                if let Some(sticker) = self
                    .cubie_at(facelet_position(face, slot))
                    .and_then(|c| c.sticker(face))
                {
                    *label = sticker;
                }
            }
        }
        out
    }

    /// The visible stickers as a cube state.
    pub fn to_state(&self) -> CubeState {
        let mut state = CubeState::new();
        for (face, labels) in FaceId::ALL.into_iter().zip(self.facelets()) {
            state.set_face(face, labels);
        }
        state
    }

    /// True if every face shows a single label.
    pub fn is_solved(&self) -> bool {
        self.facelets()
            .iter()
            .all(|labels| labels.iter().all(|l| *l == labels[0]))
    }

    /// Applies a move as one or two snapped quarter turns.
    pub fn apply_move(&mut self, mv: Move) {
        let quarters = mv.turn.quarter_turns();
        let direction = quarters.signum();
        for _ in 0..quarters.abs() {
            self.quarter_turn(mv.face, direction);
        }
    }

    /// One quarter turn of `face`'s layer; `direction` is `+1` for
    /// clockwise as seen from outside that face.
    fn quarter_turn(&mut self, face: FaceId, direction: i32) {
        let angle = -f64::from(face.side() * direction) * FRAC_PI_2;
        let axis = face.axis();
        for cubie in self.cubies.iter_mut().filter(|c| c.in_layer(face)) {
            cubie.rotate(axis, angle);
            cubie.snap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Turn;
    use proptest::prelude::*;

    fn mv(text: &str) -> Move {
        text.parse().unwrap()
    }

    #[test]
    fn test_solved_grid_shape() {
        let grid = CubieGrid::solved();
        assert_eq!(grid.cubies().len(), 26);
        assert!(grid.is_solved());
        assert_eq!(grid.to_state(), CubeState::solved());
    }

    #[test]
    fn test_facelet_positions_cover_faces() {
        for face in FaceId::ALL {
            assert_eq!(facelet_position(face, 4), face.normal());
            for slot in 0..GRID_SIZE {
                let p = facelet_position(face, slot);
                assert_eq!(p[face.axis().index()], face.side());
            }
        }
    }

    #[test]
    fn test_r_moves_front_column_up() {
        let mut grid = CubieGrid::solved();
        grid.apply_move(mv("R"));

        let up = grid.facelets()[FaceId::U.index()];
        // Right column of U now carries front stickers.
        assert_eq!([up[2], up[5], up[8]], [FaceId::F; 3]);
        assert_eq!(up[0], FaceId::U);
        let front = grid.facelets()[FaceId::F.index()];
        assert_eq!([front[2], front[5], front[8]], [FaceId::D; 3]);
    }

    #[test]
    fn test_u_moves_front_row_left() {
        let mut grid = CubieGrid::solved();
        grid.apply_move(mv("U"));
        let left = grid.facelets()[FaceId::L.index()];
        assert_eq!([left[0], left[1], left[2]], [FaceId::F; 3]);
        assert_eq!(left[3], FaceId::L);
    }

    #[test]
    fn test_opposite_faces_turn_opposite_ways() {
        // L moves the front column down; R moves it up.
        let mut grid = CubieGrid::solved();
        grid.apply_move(mv("L"));
        let down = grid.facelets()[FaceId::D.index()];
        assert_eq!([down[0], down[3], down[6]], [FaceId::F; 3]);
    }

    #[test]
    fn test_four_quarter_turns_are_identity() {
        for face in FaceId::ALL {
            let mut grid = CubieGrid::solved();
            for _ in 0..4 {
                grid.apply_move(Move::new(face, Turn::Clockwise));
            }
            assert_eq!(grid, CubieGrid::solved());
        }
    }

    #[test]
    fn test_sexy_move_order_six() {
        let mut grid = CubieGrid::solved();
        for _ in 0..6 {
            for text in ["R", "U", "R'", "U'"] {
                grid.apply_move(mv(text));
            }
        }
        assert_eq!(grid, CubieGrid::solved());
    }

    #[test]
    fn test_coordinates_stay_on_lattice() {
        let mut grid = CubieGrid::solved();
        for _ in 0..250 {
            for text in ["R", "U2", "F'", "L", "D", "B2"] {
                grid.apply_move(mv(text));
            }
        }
        for cubie in grid.cubies() {
            for c in cubie.position {
                assert_eq!(c, c.round());
            }
        }
    }

    #[test]
    fn test_paint_round_trip() {
        let mut scrambled = CubieGrid::solved();
        for text in ["R", "U", "F2", "L'"] {
            scrambled.apply_move(mv(text));
        }
        let state = scrambled.to_state();
        let painted = CubieGrid::from_state(&state).unwrap();
        assert_eq!(painted.to_state(), state);
        assert!(CubieGrid::from_state(&CubeState::new()).is_none());
    }

    fn any_move() -> impl Strategy<Value = Move> {
        (0usize..6, 0usize..3).prop_map(|(f, t)| {
            let turn = [Turn::Clockwise, Turn::CounterClockwise, Turn::Double][t];
            Move::new(FaceId::ALL[f], turn)
        })
    }

    proptest! {
        #[test]
        fn prop_sequence_then_inverse_restores(moves in prop::collection::vec(any_move(), 0..40)) {
            let mut grid = CubieGrid::solved();
            for m in &moves {
                grid.apply_move(*m);
            }
            for m in moves.iter().rev() {
                grid.apply_move(m.invert());
            }
            prop_assert_eq!(grid, CubieGrid::solved());
        }
    }
}
