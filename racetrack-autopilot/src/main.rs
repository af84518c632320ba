use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use racetrack_autopilot::benchmark::{run_benchmark, BenchmarkConfig};
use racetrack_autopilot::config::RacetrackConfig;
use racetrack_autopilot::interactive::{Console, UserMoveStrategy};
use racetrack_autopilot::roster::{
    assign_strategies, parse_assignments, StrategyKind, STRATEGY_KINDS,
};
use racetrack_autopilot::runner::{run_race, write_move_logs, RunOptions};
use racetrack_autopilot::util::{file_label, list_files, read_text, resolve_in_dir, write_text};
use racetrack_core::moves::format_waypoints;
use racetrack_core::pathfinder::shortest_path_to_finish;
use racetrack_core::{MoveStrategy, Race, Track};
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(name = "racetrack-autopilot")]
#[command(about = "Grid racetrack races with human, scripted and autopilot drivers")]
struct Cli {
    /// Directory searched for track names [env: RACETRACK_TRACK_DIR]
    #[arg(long, global = true)]
    track_dir: Option<PathBuf>,
    /// Directory searched for move-list files [env: RACETRACK_MOVE_DIR]
    #[arg(long, global = true)]
    move_dir: Option<PathBuf>,
    /// Directory searched for path-follower files [env: RACETRACK_FOLLOWER_DIR]
    #[arg(long, global = true)]
    follower_dir: Option<PathBuf>,
    /// Turn limit per race [env: RACETRACK_MAX_TURNS]
    #[arg(long, global = true)]
    max_turns: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List tracks in the track directory
    ListTracks,
    /// List the strategies a car can be given
    ListStrategies,
    /// Run one race; cars without a --car assignment are driven from stdin
    Race {
        track: String,
        /// Strategy assignment, e.g. `a=path-finder` or `b=move-list:lap.txt`
        #[arg(long = "car")]
        cars: Vec<String>,
        /// Write every car's accelerations as replayable move files
        #[arg(long)]
        record_dir: Option<PathBuf>,
        /// Write the race report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
        /// Do not print the board between turns
        #[arg(long)]
        quiet: bool,
    },
    /// Compute a car's shortest route to the finish line as a follower file
    ShortestPath {
        track: String,
        #[arg(long)]
        car: char,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Race every track in a directory with all cars on autopilot
    Benchmark {
        #[arg(long)]
        dir: Option<PathBuf>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = RacetrackConfig::from_env();
    if let Some(dir) = cli.track_dir {
        config.track_dir = dir;
    }
    if let Some(dir) = cli.move_dir {
        config.move_dir = dir;
    }
    if let Some(dir) = cli.follower_dir {
        config.follower_dir = dir;
    }
    if let Some(max_turns) = cli.max_turns {
        if max_turns == 0 {
            return Err(anyhow!("--max-turns must be >= 1"));
        }
        config.max_turns = max_turns;
    }

    match cli.command {
        Commands::ListTracks => {
            for path in list_files(&config.track_dir, "txt")? {
                match read_text(&path).and_then(|text| Ok(Track::parse(&text)?)) {
                    Ok(track) => {
                        let ids: String = track.cars().iter().map(|car| car.id()).collect();
                        println!(
                            "{:24} {}x{} cars={}",
                            file_label(&path),
                            track.width(),
                            track.height(),
                            ids
                        );
                    }
                    Err(err) => println!("{:24} invalid: {err}", file_label(&path)),
                }
            }
        }
        Commands::ListStrategies => {
            for (name, description) in STRATEGY_KINDS {
                println!("{name:22} {description}");
            }
        }
        Commands::Race {
            track,
            cars,
            record_dir,
            report,
            quiet,
        } => {
            let (name, track) = load_track(&track, &config)?;
            let assignments = parse_assignments(&cars)?;
            let mut race = Race::new(track);

            let console = Console::new(io::stdin().lock(), io::stdout()).shared();
            let mut user = |id: char| -> Box<dyn MoveStrategy> {
                Box::new(UserMoveStrategy::new(id, Rc::clone(&console)))
            };
            let roster = assign_strategies(
                &mut race,
                &assignments,
                &StrategyKind::User,
                &config,
                &mut user,
            )?;
            for (id, kind) in &roster {
                println!("car {id}: {kind}");
            }

            let options = RunOptions {
                max_turns: config.max_turns,
                render: !quiet,
            };
            let recording = run_race(&name, &mut race, &options, &mut io::stdout())?;
            let summary = &recording.report;

            println!("track={}", summary.track);
            println!("turns={}", summary.turns);
            println!("outcome={}", summary.outcome.as_str());
            if let Some(winner) = summary.outcome.winner() {
                println!("winner={winner}");
            }
            for car in &summary.cars {
                println!(
                    "car={} position={} velocity={} laps={} status={:?} strategy={}",
                    car.id, car.position, car.velocity, car.laps, car.status, car.strategy
                );
            }

            if let Some(dir) = record_dir {
                for path in write_move_logs(&dir, &name, &summary.cars, &recording.move_log)? {
                    println!("recorded={}", path.display());
                }
            }
            if let Some(path) = report {
                let encoded = serde_json::to_string_pretty(summary)
                    .context("failed to serialize race report")?;
                write_text(&path, &encoded)?;
                println!("report={}", path.display());
            }
        }
        Commands::ShortestPath { track, car, output } => {
            let (name, track) = load_track(&track, &config)?;
            let start = track
                .car_index_of(car)
                .and_then(|index| track.car(index))
                .map(|car| car.position())
                .ok_or_else(|| anyhow!("no car '{car}' on track {name}"))?;
            let path = shortest_path_to_finish(track.grid(), start)
                .with_context(|| format!("no route for car '{car}' on {name}"))?;

            println!("track={name}");
            println!("car={car}");
            println!("start={start}");
            println!("finish={}", path.finish);
            println!("distance={}", path.distance);
            let waypoints = format_waypoints(&path.waypoints);
            if let Some(output) = output {
                write_text(&output, &waypoints)?;
                println!("output={}", output.display());
            } else {
                print!("{waypoints}");
            }
        }
        Commands::Benchmark { dir, out_dir, jobs } => {
            let dir = dir.unwrap_or_else(|| config.track_dir.clone());
            let tracks = list_files(&dir, "txt")?;
            let out_dir = out_dir
                .unwrap_or_else(|| PathBuf::from(format!("benchmarks/{}", timestamp_suffix())));

            let report = run_benchmark(BenchmarkConfig {
                tracks,
                max_turns: config.max_turns,
                out_dir: out_dir.clone(),
                jobs,
            })?;

            println!("tracks={}", report.track_count);
            println!("wins={}", report.wins);
            println!("crashes={}", report.total_crashes);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("out_dir={}", out_dir.display());
            for result in &report.results {
                println!(
                    "  {:24} outcome={} winner={} turns={} crashes={} parked={}",
                    result.track,
                    result.outcome,
                    result.winner.map(String::from).unwrap_or_else(|| "-".to_string()),
                    result.turns,
                    result.crashes,
                    result.parked,
                );
            }
        }
    }

    Ok(())
}

fn load_track(raw: &str, config: &RacetrackConfig) -> Result<(String, Track)> {
    let path = resolve_in_dir(raw, &config.track_dir);
    let track = Track::parse(&read_text(&path)?)
        .with_context(|| format!("failed parsing {}", path.display()))?;
    Ok((file_label(&path), track))
}

fn timestamp_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{now}")
}
