//! Cube Scan CLI
//!
//! Scrambles a virtual cube, scans its six faces through a mock detection
//! source with injected noise, solves it with a scripted solver and replays
//! the solution.

use clap::Parser;
use cube_scan::{
    color::{ClassifierKind, ReferenceColor, Rgb},
    config::FileConfig,
    cube::{FaceId, OrientationMap},
    detection::{MockDetectionSource, GRID_SIZE},
    metrics::{MetricsRegistry, MetricsSnapshot},
    replay::{RecordingRenderer, ReplayEngine},
    solver::{format_moves, Move, RawSolution, ScriptedSolver},
    Session, TickOutcome,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const FRAME_INTERVAL: Duration = Duration::from_millis(200);
const FRAME_SIZE: (u32, u32) = (640, 480);

/// Physical faces in the order they are shown to the camera.
const SHOW_ORDER: [FaceId; 6] = [FaceId::F, FaceId::U, FaceId::D, FaceId::B, FaceId::L, FaceId::R];

#[derive(Debug, Parser)]
#[command(name = "cube-scan", version, about = "Scan, solve and replay a puzzle cube")]
struct Args {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Color classifier: nearest or hsv.
    #[arg(long)]
    classifier: Option<ClassifierKind>,

    /// Moves in the generated scramble.
    #[arg(long)]
    scramble_length: Option<usize>,

    /// Scramble seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Frames each face stays in view.
    #[arg(long)]
    frames_per_face: Option<usize>,

    /// Serve Prometheus metrics on this port (requires the `metrics` feature).
    #[arg(long)]
    metrics_port: Option<u16>,
}

impl Args {
    fn load_config(&self) -> Result<FileConfig, cube_scan::ConfigError> {
        let mut config = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        if let Some(kind) = self.classifier {
            config.classifier.kind = kind;
        }
        if let Some(n) = self.scramble_length {
            config.output.scramble_length = n;
        }
        if let Some(seed) = self.seed {
            config.output.seed = seed;
        }
        if let Some(n) = self.frames_per_face {
            config.output.frames_per_face = n;
        }
        if let Some(port) = self.metrics_port {
            config.output.metrics_port = port;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Where metric snapshots go.
enum MetricsSink {
    Local(MetricsRegistry),
    #[cfg(feature = "metrics")]
    Served(Arc<tokio::sync::RwLock<cube_scan::metrics::MetricsState>>),
}

impl MetricsSink {
    fn start(port: u16) -> Option<Self> {
        let registry = match MetricsRegistry::new() {
            Ok(r) => r,
            Err(e) => {
                warn!("Metrics disabled: {}", e);
                return None;
            }
        };

        if port == 0 {
            return Some(MetricsSink::Local(registry));
        }

        #[cfg(feature = "metrics")]
        {
            use cube_scan::metrics::{MetricsServer, MetricsServerConfig};

            let server = MetricsServer::new(MetricsServerConfig::with_port(port), registry);
            let state = server.state();
            std::thread::spawn(move || {
                let runtime = match tokio::runtime::Runtime::new() {
                    Ok(rt) => rt,
                    Err(e) => {
                        warn!("Failed to start metrics runtime: {}", e);
                        return;
                    }
                };
                if let Err(e) = runtime.block_on(server.run()) {
                    warn!("Metrics server stopped: {}", e);
                }
            });
            Some(MetricsSink::Served(state))
        }

        #[cfg(not(feature = "metrics"))]
        {
            warn!(port, "Built without the `metrics` feature; not serving metrics");
            Some(MetricsSink::Local(registry))
        }
    }

    fn publish(&self, session: &Session) {
        let snapshot = MetricsSnapshot::from_session(session);
        match self {
            MetricsSink::Local(registry) => registry.update(&snapshot),
            #[cfg(feature = "metrics")]
            MetricsSink::Served(state) => state.blocking_read().update(&snapshot),
        }
    }
}

/// Colors of one physical face, as the camera would see them.
fn face_colors(labels: &[FaceId; GRID_SIZE], scheme: &OrientationMap) -> [Rgb; GRID_SIZE] {
    labels.map(|label| scheme.color_of(label).reference_rgb())
}

/// Queues every face with clutter, one misread frame each and a blank gap
/// long enough to outlast the cooldown.
fn script_faces(source: &mut MockDetectionSource, physical: &ReplayEngine, config: &FileConfig) {
    // The session locks on the first face shown, which is green.
    let mut scheme = OrientationMap::new();
    scheme.lock(ReferenceColor::Green);
    let facelets = physical.grid().facelets();
    let gap = (config.stabilizer.cooldown().as_millis() / FRAME_INTERVAL.as_millis()) as usize + 1;

    for face in SHOW_ORDER {
        let stickers = face_colors(&facelets[face.index()], &scheme);

        let mut misread = stickers;
        let wrong = ReferenceColor::ALL
            .into_iter()
            .find(|c| c.reference_rgb() != stickers[0])
            .unwrap_or(ReferenceColor::White);
        misread[0] = wrong.reference_rgb();

        source.show_face(stickers, 1, true);
        source.show_face(misread, 1, true);
        source.show_face(stickers, config.output.frames_per_face.saturating_sub(2), true);
        source.show_nothing(gap);
    }
}

/// Splits the solving sequence into named stages with modifiers emitted as
/// separate tokens.
fn scripted_answer(scramble: &[Move]) -> RawSolution {
    let inverse: Vec<Move> = scramble.iter().rev().map(|m| m.invert()).collect();
    let chunk = inverse.len().div_ceil(4).max(1);

    let mut answer = RawSolution::default();
    for (name, moves) in ["cross", "f2l", "oll", "pll"].into_iter().zip(inverse.chunks(chunk)) {
        let tokens = moves.iter().flat_map(|m| {
            let mut parts = vec![m.face.letter().to_string()];
            let suffix = m.turn.suffix();
            if !suffix.is_empty() {
                parts.push(suffix.to_string());
            }
            parts
        });
        answer = answer.with_stage(name, tokens);
    }
    answer
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match args.load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    info!("Cube Scan v{}", cube_scan::VERSION);
    info!(
        classifier = ?config.classifier.kind,
        frames_per_face = config.output.frames_per_face,
        "Scanning a mock cube"
    );

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        if let Err(e) = ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    let metrics = MetricsSink::start(config.output.metrics_port);

    // The cube in front of the camera.
    let mut physical = ReplayEngine::new();
    let scramble = physical.scramble(config.output.scramble_length, config.output.seed);
    info!(scramble = %format_moves(&scramble), "Physical cube scrambled");

    let mut source = MockDetectionSource::new(FRAME_SIZE.0, FRAME_SIZE.1);
    script_faces(&mut source, &physical, &config);

    let mut session = Session::new(&config);
    let mut now = Instant::now();

    while running.load(Ordering::SeqCst) && source.remaining() > 0 {
        match session.tick_at(&mut source, now) {
            Ok(TickOutcome::FaceAccepted {
                face,
                missing,
                complete,
            }) => {
                info!(face = %face, remaining = missing.len(), "Face stored");
                if complete && session.validate().is_ok() {
                    break;
                }
                info!("{}", session.guidance());
            }
            Ok(TickOutcome::CandidateMismatch { found, guidance }) => {
                debug!(found, "{}", guidance);
            }
            Ok(TickOutcome::AlreadyComplete) => break,
            Ok(other) => debug!(?other, "Tick"),
            Err(e) => warn!("Frame skipped: {}", e),
        }
        if let Some(sink) = &metrics {
            sink.publish(&session);
        }
        now += FRAME_INTERVAL;
    }

    if !running.load(Ordering::SeqCst) {
        info!("Interrupted");
        return;
    }

    if let Err(e) = session.validate() {
        warn!("{}", e.describe(session.orientation()));
        eprintln!("Scan incomplete: {}", session.guidance());
        std::process::exit(1);
    }

    if let Some(facelets) = session.state().facelet_string() {
        println!("Facelets: {}", facelets);
    }

    let backend = ScriptedSolver::new(scripted_answer(&scramble));
    let solution = match session.solve(&backend) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    for stage in &solution.stages {
        info!(stage = %stage.name, moves = stage.moves, "Stage");
    }
    println!("Solution ({} moves): {}", solution.moves.len(), format_moves(&solution.moves));

    let mut renderer = RecordingRenderer::new();
    while running.load(Ordering::SeqCst) {
        let Some(mv) = session.next_move(&mut renderer) else {
            break;
        };
        info!(mv = %mv, cursor = ?session.replay().cursor(), "Replay step");
        if let Some(sink) = &metrics {
            sink.publish(&session);
        }
    }

    if session.replay().grid().is_solved() {
        info!(frames = renderer.frames(), "Cube solved");
    } else {
        warn!("Replay stopped before the cube was solved");
    }
}
