//! Plinko Bells entry point
//!
//! Headless native runner: builds a board, drops a row of balls one by one
//! and logs every bell it would ring.
//!
//! Usage: `plinko-bells [config.json] [--lane] [--pendulum] [--fast] [--seed N] [--balls N]`

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;

use plinko_bells::audio::{AudioSink, LogSink};
use plinko_bells::consts::AUTO_START_INTERVAL;
use plinko_bells::render::draw_list;
use plinko_bells::sim::{PendulumRig, SimPhase, Simulation, StartRequest, TickInput, tick};
use plinko_bells::{FieldConfig, Layout};

/// Hard stop for runs that never settle
const MAX_TICKS: u64 = 60 * 60 * 5;

#[derive(Parser, Debug)]
#[command(version, about = "Drop balls through a pin board and ring a bell per bounce")]
struct Args {
    /// JSON board config (overrides --lane)
    config: Option<PathBuf>,

    /// Narrow two-slot board instead of the wide tray
    #[arg(long)]
    lane: bool,

    /// Run the three-pendulum rig instead of dropping balls
    #[arg(long)]
    pendulum: bool,

    /// Do not sleep between ticks
    #[arg(long)]
    fast: bool,

    /// RNG seed (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Balls parked along the top
    #[arg(long, default_value_t = 6)]
    balls: u32,
}

impl Args {
    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    fn layout(&self) -> Layout {
        if self.lane { Layout::SingleLane } else { Layout::Tray }
    }
}

fn build(args: &Args) -> Result<Simulation, String> {
    let config = match &args.config {
        Some(path) => FieldConfig::load(path).map_err(|e| format!("{}: {}", path.display(), e))?,
        None => FieldConfig::from_layout(args.layout()),
    };
    let (width, height) = (config.width, config.height);
    let mut sim = Simulation::new(config, args.seed()).map_err(|e| e.to_string())?;
    if args.pendulum {
        sim = sim.with_pendulums(PendulumRig::three_bells(width, height));
    }
    Ok(sim)
}

fn run(sim: &mut Simulation, args: &Args) {
    let mut sink = LogSink::new();
    let frame = Duration::from_secs_f32(sim.config.tick_seconds());

    if !args.pendulum {
        sim.spawn_row(args.balls);
    }

    let mut input = TickInput::default();
    while sim.time_ticks < MAX_TICKS {
        let frame_start = Instant::now();

        if sim.time_ticks % AUTO_START_INTERVAL == 0 {
            if args.pendulum {
                input.start_pendulum = true;
            } else if !sim.pending_ids().is_empty() {
                input.start.push(StartRequest::Random);
            }
        }

        tick(sim, &input);
        input = TickInput::default();

        for cue in sim.drain_cues() {
            sink.play(&cue);
        }
        sim.drain_events();

        let done = match &sim.pendulums {
            Some(rig) => rig.pendulums.iter().all(|p| p.finished),
            None => sim.phase == SimPhase::Settled,
        };
        if done {
            break;
        }

        if !args.fast {
            if let Some(rest) = frame.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    tick(
        sim,
        &TickInput {
            stop: true,
            ..TickInput::default()
        },
    );
    log::info!(
        "Finished after {} ticks: score {}, {} bells rung",
        sim.time_ticks,
        sim.score,
        sink.played()
    );
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Plinko Bells (native) starting...");

    let args = Args::parse();

    let mut sim = match build(&args) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Failed to build board: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "Seed {}, {} slots, {} shapes on the board",
        sim.seed,
        sim.field.slots.len(),
        draw_list(&sim).len()
    );
    run(&mut sim, &args);
    ExitCode::SUCCESS
}
