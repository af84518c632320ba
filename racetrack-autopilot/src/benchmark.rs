use anyhow::{anyhow, Context, Result};
use racetrack_core::strategy::{DoNotMoveStrategy, PathFinderStrategy};
use racetrack_core::{Race, Track};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::runner::{run_race, RunOptions};
use crate::util::{file_label, read_text};

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub tracks: Vec<PathBuf>,
    pub max_turns: usize,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TrackResult {
    pub track: String,
    pub cars: usize,
    pub turns: usize,
    pub outcome: &'static str,
    pub winner: Option<char>,
    pub crashes: usize,
    /// Cars with no route to a finish line, parked for the whole race.
    pub parked: usize,
    pub finish_crossings: usize,
    pub reverse_crossings: usize,
    /// Shortest-path step count per car; `None` for parked cars.
    pub route_lengths: Vec<Option<u32>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub max_turns: usize,
    pub jobs: Option<usize>,
    pub track_count: usize,
    pub wins: usize,
    pub total_crashes: usize,
    pub results: Vec<TrackResult>,
}

/// Races every track with all cars on autopilot and writes `results.csv`
/// and `summary.json` into the output directory.
pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.tracks.is_empty() {
        return Err(anyhow!("benchmark requires at least one track"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
        }
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let run_one = |path: &PathBuf| -> Result<TrackResult> {
        run_track(path, config.max_turns)
            .with_context(|| format!("benchmark run failed for {}", path.display()))
    };

    let run_results: Vec<Result<TrackResult>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| config.tracks.par_iter().map(run_one).collect())
    } else {
        config.tracks.par_iter().map(run_one).collect()
    };

    let mut results = Vec::with_capacity(run_results.len());
    for result in run_results {
        results.push(result?);
    }

    write_results_csv(&config.out_dir.join("results.csv"), &results)?;

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        max_turns: config.max_turns,
        jobs: config.jobs,
        track_count: results.len(),
        wins: results.iter().filter(|r| r.winner.is_some()).count(),
        total_crashes: results.iter().map(|r| r.crashes).sum(),
        results,
    };

    let report_path = config.out_dir.join("summary.json");
    fs::write(
        &report_path,
        serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?,
    )
    .with_context(|| format!("failed writing {}", report_path.display()))?;

    Ok(report)
}

fn run_track(path: &Path, max_turns: usize) -> Result<TrackResult> {
    let name = file_label(path);
    let track = Track::parse(&read_text(path)?)
        .with_context(|| format!("failed parsing {}", path.display()))?;

    let mut race = Race::new(track);
    let mut route_lengths = Vec::with_capacity(race.car_count());
    let mut parked = 0;
    for index in 0..race.car_count() {
        let car = &race.track().cars()[index];
        let id = car.id();
        match PathFinderStrategy::new(car.position(), race.track()) {
            Ok(strategy) => {
                route_lengths.push(Some(strategy.path().distance));
                race.set_car_move_strategy(index, Box::new(strategy));
            }
            Err(err) => {
                tracing::warn!(track = %name, car = %id, "{err}; parking car");
                route_lengths.push(None);
                parked += 1;
                race.set_car_move_strategy(index, Box::new(DoNotMoveStrategy));
            }
        }
    }

    let options = RunOptions {
        max_turns,
        render: false,
    };
    let report = run_race(&name, &mut race, &options, &mut io::sink())?.report;

    Ok(TrackResult {
        track: name,
        cars: report.cars.len(),
        turns: report.turns,
        outcome: report.outcome.as_str(),
        winner: report.outcome.winner(),
        crashes: report.crashes,
        parked,
        finish_crossings: report.finish_crossings,
        reverse_crossings: report.reverse_crossings,
        route_lengths,
    })
}

fn write_results_csv(path: &Path, rows: &[TrackResult]) -> Result<()> {
    let mut csv = String::from(
        "track,cars,turns,outcome,winner,crashes,parked,finish_crossings,reverse_crossings\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            row.track,
            row.cars,
            row.turns,
            row.outcome,
            row.winner.map(String::from).unwrap_or_default(),
            row.crashes,
            row.parked,
            row.finish_crossings,
            row.reverse_crossings
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
