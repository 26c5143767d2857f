//! Lane Runner headless driver
//!
//! Plays the simulation on autopilot at a fixed timestep and prints the final
//! snapshot and leaderboard as JSON.
//!
//! Usage: `lane-runner [seed] [seconds] [--simple] [--tuning path.json] [--fps n]
//! [--keys standard|mirrored] [--dump-tuning]`

use anyhow::{Context, Result, bail};

use lane_runner::Tuning;
use lane_runner::consts::{MAX_SUBSTEPS, SIM_DT};
use lane_runner::sim::{GameEvent, KeyMapping, RunSession, TickInput, tick};

/// Seconds between progress lines
const REPORT_INTERVAL_SECS: f32 = 10.0;

struct Options {
    seed: u64,
    seconds: f32,
    simple: bool,
    tuning_path: Option<String>,
    fps: f32,
    keys: Option<KeyMapping>,
    /// Print the resolved tuning as JSON and exit
    dump_tuning: bool,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut options = Options {
            seed: 1,
            seconds: 120.0,
            simple: false,
            tuning_path: None,
            fps: 60.0,
            keys: None,
            dump_tuning: false,
        };
        let mut positional = 0;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--simple" => options.simple = true,
                "--dump-tuning" => options.dump_tuning = true,
                "--keys" => {
                    let value = args.next().context("--keys needs a mapping")?;
                    let keys = KeyMapping::from_str(&value)
                        .with_context(|| format!("unknown key mapping {value:?}"))?;
                    options.keys = Some(keys);
                }
                "--tuning" => {
                    options.tuning_path = Some(args.next().context("--tuning needs a path")?);
                }
                "--fps" => {
                    let value = args.next().context("--fps needs a value")?;
                    options.fps = value
                        .parse()
                        .with_context(|| format!("bad frame rate {value:?}"))?;
                    if !(options.fps.is_finite() && options.fps > 0.0) {
                        bail!("frame rate must be positive");
                    }
                }
                flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
                value => {
                    match positional {
                        0 => {
                            options.seed = value
                                .parse()
                                .with_context(|| format!("bad seed {value:?}"))?;
                        }
                        1 => {
                            options.seconds = value
                                .parse()
                                .with_context(|| format!("bad duration {value:?}"))?;
                        }
                        _ => bail!("unexpected argument {value:?}"),
                    }
                    positional += 1;
                }
            }
        }
        Ok(options)
    }

    fn tuning(&self) -> Result<Tuning> {
        let loaded = match &self.tuning_path {
            Some(path) => Tuning::load(path).with_context(|| format!("loading {path}"))?,
            None => Tuning::default(),
        };
        let mut tuning = if self.simple {
            // Fixed speed and pacing, one obstacle kind
            let mut simple = Tuning::simple();
            simple.runner = loaded.runner;
            simple.points_per_meter = loaded.points_per_meter;
            simple.cleanup_distance = loaded.cleanup_distance;
            simple.key_mapping = loaded.key_mapping;
            simple
        } else {
            loaded
        };
        if let Some(keys) = self.keys {
            tuning.key_mapping = keys;
        }
        Ok(tuning)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let options = Options::parse(std::env::args().skip(1))?;
    let tuning = options.tuning()?;
    if options.dump_tuning {
        println!("{}", tuning.to_json()?);
        return Ok(());
    }
    log::info!(
        "Lane Runner (headless) seed={} for {:.0}s at {:.0} fps, {} keys",
        options.seed,
        options.seconds,
        options.fps,
        tuning.key_mapping.as_str()
    );

    let mut session = RunSession::try_new(tuning, options.seed)?;
    let input = TickInput::autopilot();
    let frame_dt = 1.0 / options.fps;

    let mut accumulator = 0.0_f32;
    let mut sim_time = 0.0_f32;
    let mut next_report = REPORT_INTERVAL_SECS;
    let mut spawned = 0usize;
    let mut runs_ended = 0usize;

    while sim_time < options.seconds {
        // Fixed timestep with capped substeps, as a render loop would
        accumulator += frame_dt;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut session, &input, SIM_DT);
            accumulator -= SIM_DT;
            sim_time += SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            accumulator = 0.0;
        }

        for event in session.drain_events() {
            match event {
                GameEvent::ObstacleSpawned(_) => spawned += 1,
                GameEvent::RunEnded { score, best, rank } => {
                    runs_ended += 1;
                    match rank {
                        Some(rank) => log::info!("Run scored {score} (best {best}), rank #{rank}"),
                        None => log::debug!("Run scored {score} (best {best}), off the board"),
                    }
                }
                _ => {}
            }
        }

        if sim_time >= next_report {
            next_report += REPORT_INTERVAL_SECS;
            log::info!(
                "t={:.0}s run={} score={} level={} speed={:.1} obstacles={}",
                sim_time,
                session.run(),
                session.score(),
                session.difficulty().level,
                session.difficulty().forward_speed,
                session.obstacles().len()
            );
        }
    }

    log::info!(
        "Done: {} runs ended, {} obstacles spawned, best {}",
        runs_ended,
        spawned,
        session.best_score()
    );

    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    println!("{}", serde_json::to_string_pretty(session.high_scores())?);
    Ok(())
}
