use anyhow::Result;
use racetrack_core::moves::format_move_list;
use racetrack_core::{CarSnapshot, Direction, Race, TurnEvent};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::util::write_text;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RaceOutcome {
    Winner { index: usize, car: char },
    /// Every uncrashed car is parked.
    NoMovingCars,
    TurnLimit,
    /// A strategy gave up, e.g. a human quit at the prompt.
    Aborted { car: char },
    AllCrashed,
}

impl RaceOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Winner { .. } => "winner",
            Self::NoMovingCars => "no_moving_cars",
            Self::TurnLimit => "turn_limit",
            Self::Aborted { .. } => "aborted",
            Self::AllCrashed => "all_crashed",
        }
    }

    pub fn winner(self) -> Option<char> {
        match self {
            Self::Winner { car, .. } => Some(car),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub max_turns: usize,
    /// Print the track before every turn.
    pub render: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct RaceReport {
    pub track: String,
    pub turns: usize,
    pub outcome: RaceOutcome,
    pub crashes: usize,
    pub finish_crossings: usize,
    pub reverse_crossings: usize,
    pub cars: Vec<CarSnapshot>,
}

#[derive(Clone, Debug)]
pub struct RaceRecording {
    pub report: RaceReport,
    /// Accelerations applied by each car, in roster order.
    pub move_log: Vec<Vec<Direction>>,
}

pub fn run_race(
    track_name: &str,
    race: &mut Race,
    options: &RunOptions,
    out: &mut dyn Write,
) -> Result<RaceRecording> {
    let mut move_log = vec![Vec::new(); race.car_count()];
    let mut turns = 0;
    let mut crashes = 0;
    let mut finish_crossings = 0;
    let mut reverse_crossings = 0;

    let outcome = loop {
        if let Some(index) = race.winner() {
            let car = race.track().cars()[index].id();
            break RaceOutcome::Winner { index, car };
        }
        if !race.can_any_car_move() {
            break RaceOutcome::NoMovingCars;
        }
        if turns >= options.max_turns {
            break RaceOutcome::TurnLimit;
        }
        if options.render {
            write!(out, "{}", race.track())?;
            writeln!(out, "turn {} car {}", turns + 1, race.current_car().id())?;
        }

        let car = race.current_car().id();
        let Some(acceleration) = race.next_move_for_current_car() else {
            break RaceOutcome::Aborted { car };
        };
        let outcome = race.do_car_turn(acceleration);
        turns += 1;
        move_log[outcome.car_index].push(acceleration);

        tracing::debug!(
            track = track_name,
            turn = turns,
            car = %car,
            acceleration = %acceleration,
            event = ?outcome.event,
            "turn"
        );
        if let TurnEvent::Crashed { at, cause } = outcome.event {
            crashes += 1;
            tracing::info!(track = track_name, car = %car, turn = turns, "crashed at {at} ({cause:?})");
        }
        match outcome.lap_delta {
            0 => {}
            delta if delta > 0 => {
                finish_crossings += delta as usize;
                tracing::info!(track = track_name, car = %car, turn = turns, "crossed the finish line");
            }
            delta => {
                reverse_crossings += delta.unsigned_abs() as usize;
                tracing::info!(track = track_name, car = %car, turn = turns, "crossed the finish line backwards");
            }
        }

        if race.switch_to_next_active_car().is_none() {
            break match race.winner() {
                Some(index) => RaceOutcome::Winner {
                    index,
                    car: race.track().cars()[index].id(),
                },
                None => RaceOutcome::AllCrashed,
            };
        }
    };

    if options.render {
        write!(out, "{}", race.track())?;
    }
    tracing::info!(
        track = track_name,
        turns,
        outcome = outcome.as_str(),
        winner = ?outcome.winner(),
        "race finished"
    );

    let snapshot = race.snapshot();
    Ok(RaceRecording {
        report: RaceReport {
            track: track_name.to_string(),
            turns,
            outcome,
            crashes,
            finish_crossings,
            reverse_crossings,
            cars: snapshot.cars,
        },
        move_log,
    })
}

/// Writes `<track>-<car>.txt` move files for every car into `dir`, so the
/// race can be replayed with `move-list:` strategies.
pub fn write_move_logs(
    dir: &Path,
    track_name: &str,
    cars: &[CarSnapshot],
    move_log: &[Vec<Direction>],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(cars.len());
    for (car, moves) in cars.iter().zip(move_log) {
        let path = dir.join(format!("{track_name}-{}.txt", car.id));
        write_text(&path, &format_move_list(moves))?;
        written.push(path);
    }
    Ok(written)
}
