use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use drift_common::Extent;
use drift_input::{InputEvent, Side};
use drift_kernel::{MAX_SKID_MARKS, Session, SessionEvent, VehicleTuning};
use drift_render::{DrawRecorder, SceneRenderer};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Frames spent on each side when steering alternates.
const ALTERNATE_PERIOD: u64 = 45;

#[derive(Parser)]
#[command(name = "drift-cli", about = "Headless drift simulation tool")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default tuning
    Info,
    /// Run a scripted session and print a summary
    Simulate {
        #[command(flatten)]
        run: RunArgs,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a scripted session and print the draw commands of its last frame
    Frame {
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Number of frames to simulate
    #[arg(short, long, default_value = "600")]
    frames: u64,
    /// Steering script
    #[arg(short, long, value_enum, default_value = "left")]
    steer: Steer,
    /// Frame duration in milliseconds
    #[arg(long, default_value = "16.67")]
    dt: f32,
    /// Surface width in pixels
    #[arg(long, default_value = "480")]
    width: f32,
    /// Surface height in pixels
    #[arg(long, default_value = "800")]
    height: f32,
    /// YAML file overriding vehicle tuning
    #[arg(long)]
    tuning: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Steer {
    None,
    Left,
    Right,
    Alternate,
}

impl Steer {
    /// Side held during `frame`, if any.
    fn side_at(self, frame: u64) -> Option<Side> {
        match self {
            Steer::None => None,
            Steer::Left => Some(Side::Left),
            Steer::Right => Some(Side::Right),
            Steer::Alternate if (frame / ALTERNATE_PERIOD) % 2 == 0 => Some(Side::Left),
            Steer::Alternate => Some(Side::Right),
        }
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    frames: u64,
    dt_ms: f32,
    steer: Steer,
    score: u64,
    drifts: u32,
    longest_drift: u64,
    drifting: bool,
    skid_marks: usize,
    position: [f32; 2],
    heading: f32,
    speed: f32,
    state_hash: String,
}

/// Scripted run outcome: the final session plus counters gathered from its
/// event log.
struct Run {
    session: Session,
    drifts: u32,
    longest_drift: u64,
}

fn simulate(args: &RunArgs) -> anyhow::Result<Run> {
    let tuning = match &args.tuning {
        Some(path) => VehicleTuning::load(path)?,
        None => VehicleTuning::default(),
    };
    let extent = Extent::new(args.width, args.height);
    anyhow::ensure!(
        extent.width > 0.0 && extent.height > 0.0,
        "surface must have a positive size, got {}x{}",
        extent.width,
        extent.height
    );

    let mut session = Session::new(tuning);
    session.resize(extent);
    session.reset();
    session.drain_events();

    let _span = tracing::info_span!("simulate", frames = args.frames, steer = ?args.steer).entered();

    let mut held = None;
    let mut drifts = 0;
    let mut longest_drift: u64 = 0;
    for frame in 0..args.frames {
        let side = args.steer.side_at(frame);
        if side != held {
            session.apply_input(&InputEvent::PointerUp);
            if let Some(side) = side {
                let x = match side {
                    Side::Left => extent.width * 0.25,
                    Side::Right => extent.width * 0.75,
                };
                session.apply_input(&InputEvent::PointerDown { x, y: extent.height * 0.5 });
            }
            held = side;
        }

        if session.step(args.dt).is_none() {
            tracing::warn!(dt = args.dt, "frame skipped, dt must be positive and finite");
        }

        for event in session.drain_events() {
            if let SessionEvent::DriftEnded { frames, .. } = event {
                drifts += 1;
                longest_drift = longest_drift.max(frames);
            }
        }
    }

    Ok(Run {
        session,
        drifts,
        longest_drift,
    })
}

fn summarize(args: &RunArgs, run: &Run) -> Summary {
    let session = &run.session;
    let (position, heading, speed) = session
        .vehicle()
        .map(|v| (v.position.to_array(), v.heading, v.speed))
        .unwrap_or_default();
    Summary {
        frames: session.frame(),
        dt_ms: args.dt,
        steer: args.steer,
        score: session.score().display(),
        drifts: run.drifts,
        longest_drift: run.longest_drift,
        drifting: session.is_drifting(),
        skid_marks: session.skids().len(),
        position,
        heading,
        speed,
        state_hash: format!("{:#018x}", session.state_hash()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            let tuning = VehicleTuning::default();
            println!("drift-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "vehicle: {}x{}, accel={}, max_speed={}, turn_rate={}",
                tuning.width, tuning.height, tuning.acceleration, tuning.max_speed, tuning.turn_rate
            );
            println!(
                "handling: friction={}, drift_retention={}",
                tuning.friction, tuning.drift_retention
            );
            println!("skid marks: cap={MAX_SKID_MARKS}");
        }
        Commands::Simulate { run, json } => {
            let outcome = simulate(&run)?;
            let summary = summarize(&run, &outcome);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "Simulated {} frames at {} ms, steering {:?}",
                    summary.frames, summary.dt_ms, summary.steer
                );
                println!(
                    "Score: {} ({} drifts, longest {} frames)",
                    summary.score, summary.drifts, summary.longest_drift
                );
                println!(
                    "Vehicle: pos=({:.2}, {:.2}) heading={:.3} speed={:.2} drifting={}",
                    summary.position[0],
                    summary.position[1],
                    summary.heading,
                    summary.speed,
                    summary.drifting
                );
                println!("Skid marks: {}", summary.skid_marks);
                println!("State hash: {}", summary.state_hash);
            }
        }
        Commands::Frame { run } => {
            let outcome = simulate(&run)?;
            let mut recorder = DrawRecorder::new(outcome.session.extent());
            SceneRenderer::default().render(&outcome.session, &mut recorder);
            for command in recorder.commands() {
                println!("{command}");
            }
        }
    }

    Ok(())
}
