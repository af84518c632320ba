//! Builds per-car strategies from `<car>=<kind>` assignments.

use anyhow::{anyhow, Context, Result};
use racetrack_core::strategy::{
    DoNotMoveStrategy, MoveListStrategy, PathFinderStrategy, PathFollowerStrategy,
};
use racetrack_core::{MoveStrategy, Race};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::RacetrackConfig;
use crate::util::{read_text, resolve_in_dir};

pub const STRATEGY_KINDS: &[(&str, &str)] = &[
    ("user", "prompt for every acceleration on stdin"),
    ("do-not-move", "parked; never accelerates"),
    ("path-finder", "drive the shortest path to the finish line"),
    ("move-list:<file>", "replay one direction per line, then coast"),
    ("path-follower:<file>", "steer through a waypoint file"),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    User,
    DoNotMove,
    PathFinder,
    MoveList(PathBuf),
    PathFollower(PathBuf),
}

impl FromStr for StrategyKind {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if let Some((kind, file)) = raw.split_once(':') {
            let file = file.trim();
            if file.is_empty() {
                return Err(anyhow!("strategy '{kind}' needs a file, e.g. '{kind}:<file>'"));
            }
            return match kind {
                "move-list" => Ok(Self::MoveList(PathBuf::from(file))),
                "path-follower" => Ok(Self::PathFollower(PathBuf::from(file))),
                _ => Err(unknown_kind(raw)),
            };
        }
        match raw {
            "user" => Ok(Self::User),
            "do-not-move" => Ok(Self::DoNotMove),
            "path-finder" => Ok(Self::PathFinder),
            _ => Err(unknown_kind(raw)),
        }
    }
}

fn unknown_kind(raw: &str) -> anyhow::Error {
    let available: Vec<&str> = STRATEGY_KINDS.iter().map(|(name, _)| *name).collect();
    anyhow!("unknown strategy '{raw}'. available: {}", available.join(", "))
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::DoNotMove => f.write_str("do-not-move"),
            Self::PathFinder => f.write_str("path-finder"),
            Self::MoveList(file) => write!(f, "move-list:{}", file.display()),
            Self::PathFollower(file) => write!(f, "path-follower:{}", file.display()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub car: char,
    pub kind: StrategyKind,
}

impl FromStr for Assignment {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let (car, kind) = raw
            .split_once('=')
            .ok_or_else(|| anyhow!("expected <car>=<strategy>, got '{raw}'"))?;
        let mut chars = car.trim().chars();
        let car = match (chars.next(), chars.next()) {
            (Some(id), None) => id,
            _ => return Err(anyhow!("car id must be a single character, got '{car}'")),
        };
        Ok(Self {
            car,
            kind: kind.parse()?,
        })
    }
}

pub fn parse_assignments(raw: &[String]) -> Result<Vec<Assignment>> {
    let mut assignments: Vec<Assignment> = Vec::with_capacity(raw.len());
    for entry in raw {
        let assignment: Assignment = entry.parse()?;
        if assignments.iter().any(|seen| seen.car == assignment.car) {
            return Err(anyhow!("car '{}' is assigned twice", assignment.car));
        }
        assignments.push(assignment);
    }
    Ok(assignments)
}

/// Creates the strategy for car `index`. `user` builds interactive drivers,
/// which the benchmark never asks for.
pub fn build_strategy(
    kind: &StrategyKind,
    race: &Race,
    index: usize,
    config: &RacetrackConfig,
    user: &mut dyn FnMut(char) -> Box<dyn MoveStrategy>,
) -> Result<Box<dyn MoveStrategy>> {
    let track = race.track();
    let car = track
        .car(index)
        .ok_or_else(|| anyhow!("no car at index {index}"))?;
    let strategy: Box<dyn MoveStrategy> = match kind {
        StrategyKind::User => user(car.id()),
        StrategyKind::DoNotMove => Box::new(DoNotMoveStrategy),
        StrategyKind::PathFinder => Box::new(
            PathFinderStrategy::new(car.position(), track)
                .with_context(|| format!("no autopilot route for car '{}'", car.id()))?,
        ),
        StrategyKind::MoveList(file) => {
            let path = resolve_in_dir(&file.to_string_lossy(), &config.move_dir);
            let text = read_text(&path)?;
            Box::new(
                MoveListStrategy::parse(&text)
                    .with_context(|| format!("failed parsing {}", path.display()))?,
            )
        }
        StrategyKind::PathFollower(file) => {
            let path = resolve_in_dir(&file.to_string_lossy(), &config.follower_dir);
            let text = read_text(&path)?;
            Box::new(
                PathFollowerStrategy::parse(car.position(), &text)
                    .with_context(|| format!("failed parsing {}", path.display()))?,
            )
        }
    };
    Ok(strategy)
}

/// Installs a strategy on every car: the assigned one, or `default` for cars
/// without an assignment. Returns each car's id with its kind.
pub fn assign_strategies(
    race: &mut Race,
    assignments: &[Assignment],
    default: &StrategyKind,
    config: &RacetrackConfig,
    user: &mut dyn FnMut(char) -> Box<dyn MoveStrategy>,
) -> Result<Vec<(char, StrategyKind)>> {
    for assignment in assignments {
        if race.track().car_index_of(assignment.car).is_none() {
            let ids: Vec<String> = race
                .track()
                .cars()
                .iter()
                .map(|car| car.id().to_string())
                .collect();
            return Err(anyhow!(
                "no car '{}' on this track. cars: {}",
                assignment.car,
                ids.join(", ")
            ));
        }
    }

    let mut roster = Vec::with_capacity(race.car_count());
    for index in 0..race.car_count() {
        let id = race.track().cars()[index].id();
        let kind = assignments
            .iter()
            .find(|assignment| assignment.car == id)
            .map_or(default, |assignment| &assignment.kind);
        let strategy = build_strategy(kind, race, index, config, user)?;
        race.set_car_move_strategy(index, strategy);
        tracing::debug!(car = %id, strategy = %kind, "assigned strategy");
        roster.push((id, kind.clone()));
    }
    Ok(roster)
}
