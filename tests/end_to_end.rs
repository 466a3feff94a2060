//! Full sessions driven by the bundled fakes.

use cube_scan::{
    color::ReferenceColor,
    cube::{FaceId, OrientationMap},
    detection::{MockDetectionSource, GRID_SIZE},
    replay::{RecordingRenderer, ReplayEngine},
    solver::{BackendError, Move, RawSolution, ScriptedSolver, SolverError},
    Session, TickOutcome,
};
use std::time::{Duration, Instant};

const STEP: Duration = Duration::from_millis(250);

/// Shows each face for `frames` frames followed by a blank gap covering the
/// cooldown, starting the simulated clock at `start`. Returns every outcome
/// and the clock after the last frame.
fn scan_from(
    session: &mut Session,
    faces: &[[ReferenceColor; GRID_SIZE]],
    frames: usize,
    start: Instant,
) -> (Vec<TickOutcome>, Instant) {
    let mut source = MockDetectionSource::new(640, 480);
    for colors in faces {
        source.show_face(colors.map(|c| c.reference_rgb()), frames, true);
        source.show_nothing(10);
    }

    let mut outcomes = Vec::new();
    let mut now = start;
    while source.remaining() > 0 {
        let outcome = session.tick_at(&mut source, now).expect("mock source never fails");
        now += STEP;
        if outcome == TickOutcome::AlreadyComplete {
            break;
        }
        outcomes.push(outcome);
    }
    (outcomes, now)
}

fn scan(session: &mut Session, faces: &[[ReferenceColor; GRID_SIZE]], frames: usize) -> Vec<TickOutcome> {
    scan_from(session, faces, frames, Instant::now()).0
}

/// One solid face per center color, green first.
fn solid_faces() -> Vec<[ReferenceColor; GRID_SIZE]> {
    [
        ReferenceColor::Green,
        ReferenceColor::White,
        ReferenceColor::Yellow,
        ReferenceColor::Blue,
        ReferenceColor::Orange,
        ReferenceColor::Red,
    ]
    .into_iter()
    .map(|c| [c; GRID_SIZE])
    .collect()
}

fn accepted(outcomes: &[TickOutcome]) -> Vec<FaceId> {
    outcomes
        .iter()
        .filter_map(|o| match o {
            TickOutcome::FaceAccepted { face, .. } => Some(*face),
            _ => None,
        })
        .collect()
}

/// Faces of a scrambled cube as observed colors, front first.
fn scrambled_faces(length: usize, seed: u64) -> (Vec<Move>, Vec<[ReferenceColor; GRID_SIZE]>) {
    let mut physical = ReplayEngine::new();
    let scramble = physical.scramble(length, seed);
    let mut scheme = OrientationMap::new();
    scheme.lock(ReferenceColor::Green);
    let facelets = physical.grid().facelets();

    let order = [FaceId::F, FaceId::U, FaceId::D, FaceId::B, FaceId::L, FaceId::R];
    let faces = order
        .iter()
        .map(|f| facelets[f.index()].map(|label| scheme.color_of(label)))
        .collect();
    (scramble, faces)
}

#[test]
fn test_solid_faces_complete_the_cube() {
    let mut session = Session::default();
    let faces = solid_faces();

    let outcomes = scan(&mut session, &faces, 6);
    assert_eq!(
        accepted(&outcomes),
        vec![FaceId::F, FaceId::U, FaceId::D, FaceId::B, FaceId::R, FaceId::L]
    );
    assert!(session.state().is_complete());
    assert!(session.validate().is_ok());
    assert_eq!(
        session.state().facelet_string().as_deref(),
        Some("UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB")
    );

    let backend = ScriptedSolver::new(RawSolution::flat(Vec::<String>::new()));
    let solution = session.solve(&backend).unwrap();
    assert!(solution.moves.is_empty());

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 54);
    assert_eq!(&calls[0][..9], "fffffffff");
    assert_eq!(&calls[0][45..], "bbbbbbbbb");
}

#[test]
fn test_scanned_scramble_replays_to_solved() {
    let (scramble, faces) = scrambled_faces(18, 11);
    let mut session = Session::default();
    let outcomes = scan(&mut session, &faces, 8);
    assert_eq!(accepted(&outcomes).len(), 6);
    assert!(session.validate().is_ok());

    // Split modifiers exercise token normalization.
    let tokens: Vec<String> = scramble
        .iter()
        .rev()
        .map(|m| m.invert())
        .flat_map(|m| {
            let mut parts = vec![m.face.to_string()];
            if !m.turn.suffix().is_empty() {
                parts.push(m.turn.suffix().to_string());
            }
            parts
        })
        .collect();
    let half = tokens.len() / 2;
    let split = (0..=half).rev().find(|&i| !tokens[i].starts_with(|c: char| c == '\'' || c == '2')).unwrap_or(0);
    let raw = RawSolution::default()
        .with_stage("f2l", tokens[..split].to_vec())
        .with_stage("pll", tokens[split..].to_vec());

    let backend = ScriptedSolver::new(raw);
    let solution = session.solve(&backend).unwrap();
    assert_eq!(solution.moves.len(), scramble.len());
    assert_eq!(solution.stages.len(), 2);
    assert_eq!(solution.stages.iter().map(|s| s.moves).sum::<usize>(), scramble.len());

    let mut renderer = RecordingRenderer::new();
    while session.next_move(&mut renderer).is_some() {}
    assert!(session.replay().grid().is_solved());
    assert_eq!(renderer.frames(), scramble.len());
    for face in FaceId::ALL {
        for slot in 0..GRID_SIZE {
            assert_eq!(renderer.label(face, slot), Some(face));
        }
    }
}

#[test]
fn test_orientation_lock_is_permanent() {
    let mut session = Session::default();
    let faces = vec![
        [ReferenceColor::Red; GRID_SIZE],
        [ReferenceColor::Green; GRID_SIZE],
    ];
    let outcomes = scan(&mut session, &faces, 6);

    // Red front puts green on the right; a later green scan does not relock.
    assert_eq!(accepted(&outcomes), vec![FaceId::F, FaceId::R]);
    assert_eq!(session.orientation().face_of(ReferenceColor::Red), FaceId::F);
    assert_eq!(session.orientation().face_of(ReferenceColor::Orange), FaceId::B);
    assert_eq!(session.orientation().face_of(ReferenceColor::Blue), FaceId::L);
}

#[test]
fn test_inconsistent_scan_reports_counts_and_keeps_state() {
    let mut session = Session::default();
    let mut faces = solid_faces();
    faces[3][0] = ReferenceColor::Green;
    scan(&mut session, &faces, 6);
    assert!(session.state().is_complete());

    let err = session.validate().unwrap_err();
    assert_eq!(
        err.describe(session.orientation()),
        "Scan Error: Found 10 Green stickers (need 9). Scan Error: Found 8 Blue stickers (need 9)."
    );
    assert_eq!(err.deficient(), vec![FaceId::B]);
    assert_eq!(err.surplus(), vec![FaceId::F]);

    let backend = ScriptedSolver::new(RawSolution::flat(["R"]));
    assert!(matches!(session.solve(&backend), Err(SolverError::Invalid(_))));
    assert!(backend.calls().is_empty());
    assert!(session.state().is_complete());
}

#[test]
fn test_rescanning_bad_face_recovers() {
    let mut session = Session::default();
    let mut faces = solid_faces();
    faces[3][0] = ReferenceColor::Green;
    let (_, resume) = scan_from(&mut session, &faces, 6, Instant::now());
    assert!(session.state().is_complete());
    assert!(session.validate().is_err());
    assert_eq!(session.expected_face(), Some((FaceId::B, ReferenceColor::Blue)));
    assert_eq!(session.guidance(), "Rescan the Blue center (B) face.");

    let (outcomes, _) = scan_from(&mut session, &[[ReferenceColor::Blue; GRID_SIZE]], 6, resume);
    assert_eq!(accepted(&outcomes), vec![FaceId::B]);
    assert!(session.validate().is_ok());
    assert_eq!(session.expected_face(), None);
    assert_eq!(session.scan_log().len(), 7);

    let backend = ScriptedSolver::new(RawSolution::flat(["R", "R'"]));
    let solution = session.solve(&backend).unwrap();
    assert_eq!(solution.moves.len(), 2);
    assert_eq!(backend.calls().len(), 1);
}

#[test]
fn test_panicking_solver_is_contained() {
    let mut session = Session::default();
    session.force_scrambled(6, 2);
    let before = session.state().clone();

    let backend = |_: &str| -> Result<RawSolution, BackendError> { panic!("solver crashed") };
    assert!(matches!(session.solve(&backend), Err(SolverError::ImpossibleState)));
    assert_eq!(session.state(), &before);
}

#[test]
fn test_reset_starts_a_fresh_session() {
    let mut session = Session::default();
    scan(&mut session, &[[ReferenceColor::Blue; GRID_SIZE]], 6);
    assert_eq!(session.state().scanned_count(), 1);

    session.reset();
    assert_eq!(session.state().scanned_count(), 0);
    assert!(!session.orientation().is_locked());
    assert_eq!(session.expected_face(), None);
    assert!(session.solution().is_none());

    let outcomes = scan(&mut session, &[[ReferenceColor::Yellow; GRID_SIZE]], 6);
    assert_eq!(accepted(&outcomes), vec![FaceId::F]);
    assert_eq!(session.orientation().face_of(ReferenceColor::Yellow), FaceId::F);
}
