use std::{
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::{Duration, Instant},
};

use anyhow::anyhow;
use blockfall_engine::{
    Command, CommandOutcome, EngineConfig, GameSnapshot, PieceSeed, SharedEngine, TickOutcome,
};
use chrono::{DateTime, Utc};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::engine_arg::EngineArg;
use crate::util::Output;

/// Commands the input thread picks from.
const INPUTS: [Command; 4] = [
    Command::MoveLeft,
    Command::MoveRight,
    Command::Rotate,
    Command::SoftDrop,
];

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    engine: EngineArg,
    /// How long to run, in milliseconds
    #[clap(long, default_value_t = 3000)]
    duration_ms: u64,
    /// Milliseconds between two random inputs
    #[clap(long, default_value_t = 10)]
    input_interval_ms: u64,
    /// Seed for the random input sequence
    #[clap(long)]
    input_seed: Option<u64>,
    /// Restart when a game ends instead of stopping
    #[clap(long)]
    keep_going: bool,
    /// Output file for the JSON report (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
struct SimulationParams {
    duration: Duration,
    input_interval: Duration,
    input_seed: u64,
    keep_going: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
struct TickCounts {
    fell: usize,
    blocked: usize,
    locked: usize,
    topped_out: usize,
}

impl TickCounts {
    fn record(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Idle => {}
            TickOutcome::Fell => self.fell += 1,
            TickOutcome::Blocked => self.blocked += 1,
            TickOutcome::Locked { .. } => self.locked += 1,
            TickOutcome::ToppedOut => self.topped_out += 1,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
struct InputCounts {
    issued: usize,
    moved: usize,
}

#[derive(Debug, Default)]
struct TimerResult {
    ticks: TickCounts,
    finished_scores: Vec<u64>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    finished_at: DateTime<Utc>,
    config: EngineConfig,
    seed: PieceSeed,
    input_seed: u64,
    elapsed_ms: u64,
    ticks: TickCounts,
    inputs: InputCounts,
    finished_scores: Vec<u64>,
    final_state: GameSnapshot,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        engine,
        duration_ms,
        input_interval_ms,
        input_seed,
        keep_going,
        output,
    } = arg;

    let (engine, seed) = engine.build_engine()?;
    let shared = SharedEngine::new(engine);
    let params = SimulationParams {
        duration: Duration::from_millis(*duration_ms),
        input_interval: Duration::from_millis(*input_interval_ms),
        input_seed: input_seed.unwrap_or_else(|| rand::rng().random()),
        keep_going: *keep_going,
    };

    let started = Instant::now();
    let (timer, inputs) = simulate(&shared, params)?;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let final_state = shared.snapshot();
    let report = SimulationReport {
        finished_at: Utc::now(),
        config: shared.with_engine(|engine| engine.config().clone()),
        seed,
        input_seed: params.input_seed,
        elapsed_ms,
        ticks: timer.ticks,
        inputs,
        finished_scores: timer.finished_scores,
        final_state,
    };
    Output::save_json(&report, output.clone())?;

    Ok(())
}

/// Runs a timer thread and an input thread against `shared` until the duration elapses, or
/// until the first game ends unless `keep_going` is set.
fn simulate(
    shared: &SharedEngine,
    params: SimulationParams,
) -> anyhow::Result<(TimerResult, InputCounts)> {
    let deadline = Instant::now() + params.duration;
    let stop = AtomicBool::new(false);

    thread::scope(|s| {
        let timer = s.spawn(|| run_timer(shared, &stop, deadline, params.keep_going));
        let input = s.spawn(|| run_input(shared, &stop, deadline, params));

        let timer = timer.join().map_err(|_| anyhow!("Timer thread panicked"))?;
        let input = input.join().map_err(|_| anyhow!("Input thread panicked"))?;
        Ok((timer, input))
    })
}

fn run_timer(
    shared: &SharedEngine,
    stop: &AtomicBool,
    deadline: Instant,
    keep_going: bool,
) -> TimerResult {
    let mut result = TimerResult::default();
    loop {
        let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
            break;
        };
        let interval = shared.tick_interval();
        if interval > remaining {
            thread::sleep(remaining);
            break;
        }
        thread::sleep(interval);

        let CommandOutcome::Ticked(outcome) = shared.apply(Command::Tick) else {
            continue;
        };
        result.ticks.record(outcome);
        if outcome.is_topped_out() {
            let score = shared.with_engine(|engine| {
                let score = engine.score();
                if keep_going {
                    engine.restart();
                }
                score
            });
            result.finished_scores.push(score);
            if !keep_going {
                break;
            }
        }
    }
    stop.store(true, Ordering::Relaxed);
    result
}

fn run_input(
    shared: &SharedEngine,
    stop: &AtomicBool,
    deadline: Instant,
    params: SimulationParams,
) -> InputCounts {
    let mut rng = Pcg32::seed_from_u64(params.input_seed);
    let mut counts = InputCounts::default();
    while !stop.load(Ordering::Relaxed) && Instant::now() < deadline {
        let command = INPUTS[rng.random_range(0..INPUTS.len())];
        counts.issued += 1;
        if shared.apply(command) == CommandOutcome::Moved(true) {
            counts.moved += 1;
        }
        thread::sleep(params.input_interval);
    }
    counts
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{GameEngine, PieceGenerator, PieceKind};

    use super::*;

    fn shared_engine(config: EngineConfig, kind: PieceKind) -> SharedEngine {
        let generator = PieceGenerator::constant(kind);
        SharedEngine::new(GameEngine::with_generator(config, generator).unwrap())
    }

    fn fast_config() -> EngineConfig {
        EngineConfig {
            normal_interval_ms: 2,
            quick_interval_ms: 1,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_simulation_drives_both_threads() {
        let shared = shared_engine(fast_config(), PieceKind::T);
        let params = SimulationParams {
            duration: Duration::from_millis(200),
            input_interval: Duration::from_millis(1),
            input_seed: 7,
            keep_going: true,
        };

        let (timer, inputs) = simulate(&shared, params).unwrap();
        assert!(timer.ticks.fell > 0);
        assert!(inputs.issued > 0);
        assert!(inputs.moved <= inputs.issued);
        assert_eq!(timer.finished_scores.len(), timer.ticks.topped_out);

        let snapshot = shared.snapshot();
        assert!(!snapshot.state.is_over());
        for cell in snapshot.falling.cells() {
            assert!((0..10).contains(&cell.col));
            assert!(cell.row < 15);
        }
    }

    #[test]
    fn test_simulation_stops_at_game_over() {
        // Every O position overlaps columns 1 or 2, so the second piece tops out on the first.
        let config = EngineConfig {
            width: 4,
            height: 2,
            ..fast_config()
        };
        let shared = shared_engine(config, PieceKind::O);
        let params = SimulationParams {
            duration: Duration::from_secs(10),
            input_interval: Duration::from_secs(1),
            input_seed: 1,
            keep_going: false,
        };

        let started = Instant::now();
        let (timer, _) = simulate(&shared, params).unwrap();
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(timer.ticks.topped_out, 1);
        assert_eq!(timer.finished_scores, [0]);
        assert!(shared.is_over());
    }

    #[test]
    fn test_report_serialization() {
        let shared = shared_engine(EngineConfig::default(), PieceKind::I);
        let report = SimulationReport {
            finished_at: DateTime::from_timestamp(0, 0).unwrap(),
            config: EngineConfig::default(),
            seed: PieceSeed::from_bytes([0xab; 16]),
            input_seed: 3,
            elapsed_ms: 12,
            ticks: TickCounts::default(),
            inputs: InputCounts::default(),
            finished_scores: vec![],
            final_state: shared.snapshot(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["finished_at"], "1970-01-01T00:00:00Z");
        assert_eq!(json["final_state"]["state"], "Running");
        assert_eq!(json["final_state"]["grid"].as_array().unwrap().len(), 15);
        assert_eq!(json["seed"], "ab".repeat(16));
        assert_eq!(json["ticks"]["locked"], 0);
    }
}
