use anyhow::Result;
use racetrack_autopilot::benchmark::{run_benchmark, BenchmarkConfig};
use racetrack_autopilot::config::RacetrackConfig;
use racetrack_autopilot::roster::{assign_strategies, parse_assignments, StrategyKind};
use racetrack_autopilot::runner::{run_race, write_move_logs, RaceOutcome, RunOptions};
use racetrack_autopilot::util::{list_files, read_text};
use racetrack_core::{MoveStrategy, Race, Track};
use std::fs;
use std::io;
use std::path::PathBuf;

fn repo_path(relative: &str) -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "..", relative].iter().collect()
}

fn repo_config() -> RacetrackConfig {
    RacetrackConfig {
        track_dir: repo_path("tracks"),
        move_dir: repo_path("moves"),
        follower_dir: repo_path("follower"),
        max_turns: 1_000,
    }
}

fn no_users(id: char) -> Box<dyn MoveStrategy> {
    panic!("car {id} should not prompt")
}

fn race_with(track: &str, cars: &[&str], config: &RacetrackConfig) -> Result<Race> {
    let track = Track::parse(&read_text(&config.track_dir.join(track))?)?;
    let assignments =
        parse_assignments(&cars.iter().map(|car| car.to_string()).collect::<Vec<_>>())?;
    let mut race = Race::new(track);
    assign_strategies(
        &mut race,
        &assignments,
        &StrategyKind::DoNotMove,
        config,
        &mut no_users,
    )?;
    Ok(race)
}

fn quiet(config: &RacetrackConfig) -> RunOptions {
    RunOptions {
        max_turns: config.max_turns,
        render: false,
    }
}

#[test]
fn autopilot_wins_two_lanes_and_replays_from_its_move_log() -> Result<()> {
    let config = repo_config();
    let mut race = race_with("two-lanes.txt", &["a=path-finder"], &config)?;
    let recording = run_race("two-lanes", &mut race, &quiet(&config), &mut io::sink())?;

    assert_eq!(recording.report.outcome, RaceOutcome::Winner { index: 0, car: 'a' });
    assert_eq!(recording.report.turns, 33);
    assert_eq!(recording.report.finish_crossings, 1);
    assert_eq!(recording.move_log[0].len(), 17);
    assert_eq!(
        fs::read_to_string(repo_path("moves/two-lanes-a.txt"))?,
        racetrack_core::moves::format_move_list(&recording.move_log[0])
    );

    let dir = tempfile::tempdir()?;
    let written = write_move_logs(
        dir.path(),
        "two-lanes",
        &recording.report.cars,
        &recording.move_log,
    )?;
    assert_eq!(written.len(), 2);

    let replay_config = RacetrackConfig {
        move_dir: dir.path().to_path_buf(),
        ..repo_config()
    };
    let mut replay = race_with(
        "two-lanes.txt",
        &["a=move-list:two-lanes-a", "b=move-list:two-lanes-b.txt"],
        &replay_config,
    )?;
    let replayed = run_race("two-lanes", &mut replay, &quiet(&config), &mut io::sink())?;
    assert_eq!(replayed.report.outcome, recording.report.outcome);
    assert_eq!(replayed.report.turns, recording.report.turns);
    assert_eq!(replayed.move_log, recording.move_log);
    Ok(())
}

#[test]
fn follower_file_from_the_repo_drives_the_same_race() -> Result<()> {
    let config = repo_config();
    let mut race = race_with("two-lanes.txt", &["a=path-follower:two-lanes-a"], &config)?;
    let recording = run_race("two-lanes", &mut race, &quiet(&config), &mut io::sink())?;
    assert_eq!(recording.report.outcome.winner(), Some('a'));
    assert_eq!(recording.report.turns, 33);
    Ok(())
}

#[test]
fn parked_field_stops_without_a_winner() -> Result<()> {
    let config = repo_config();
    let mut race = race_with("oval-clock-up.txt", &[], &config)?;
    let recording = run_race("oval-clock-up", &mut race, &quiet(&config), &mut io::sink())?;
    assert_eq!(recording.report.outcome, RaceOutcome::NoMovingCars);
    assert_eq!(recording.report.turns, 0);
    Ok(())
}

#[test]
fn unknown_car_assignment_is_rejected() {
    let config = repo_config();
    let err = race_with("two-lanes.txt", &["q=path-finder"], &config).unwrap_err();
    assert!(err.to_string().contains("no car 'q'"));
}

#[test]
fn benchmark_covers_every_repo_track() -> Result<()> {
    let config = repo_config();
    let out = tempfile::tempdir()?;
    let tracks = list_files(&config.track_dir, "txt")?;
    let report = run_benchmark(BenchmarkConfig {
        tracks,
        max_turns: config.max_turns,
        out_dir: out.path().to_path_buf(),
        jobs: Some(2),
    })?;

    assert_eq!(report.track_count, 2);
    let names: Vec<&str> = report.results.iter().map(|r| r.track.as_str()).collect();
    assert_eq!(names, vec!["oval-clock-up", "two-lanes"]);

    let lanes = &report.results[1];
    assert_eq!(lanes.winner, Some('a'));
    assert_eq!(lanes.turns, 33);
    assert_eq!(lanes.parked, 0);
    assert_eq!(lanes.route_lengths, vec![Some(9), Some(9)]);

    let csv = fs::read_to_string(out.path().join("results.csv"))?;
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("\ntwo-lanes,2,33,winner,a,0,0,1,0\n"));

    let summary: serde_json::Value =
        serde_json::from_slice(&fs::read(out.path().join("summary.json"))?)?;
    assert_eq!(summary["track_count"], 2);
    assert_eq!(summary["results"][1]["outcome"], "winner");
    Ok(())
}
