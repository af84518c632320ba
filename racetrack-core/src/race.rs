//! Turn engine and race state.
//!
//! Turns are resolved strictly one car at a time. A moving car is checked
//! against the cells on its rasterized path and against the resting positions
//! of every other car, never against where those cars are headed.

use serde::{Deserialize, Serialize};

use crate::car::{Car, CarStatus};
use crate::geometry::{Direction, Position, Velocity};
use crate::path::calculate_path;
use crate::strategy::MoveStrategy;
use crate::track::{CellType, Track};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrashCause {
    Wall,
    OutOfBounds,
    /// Ran into the car with this id.
    Car(char),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnEvent {
    Moved { to: Position },
    Crashed { at: Position, cause: CrashCause },
    AlreadyCrashed,
}

/// What happened during one car's turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub car_index: usize,
    pub acceleration: Direction,
    /// Rasterized path from the turn-start position to the tentative end.
    pub path: Vec<Position>,
    pub event: TurnEvent,
    /// Net finish-line crossings recorded this turn.
    pub lap_delta: i32,
}

impl TurnOutcome {
    pub fn crashed(&self) -> bool {
        matches!(self.event, TurnEvent::Crashed { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarSnapshot {
    pub id: char,
    pub position: Position,
    pub velocity: Velocity,
    pub status: CarStatus,
    pub laps: i32,
    pub strategy: String,
}

impl From<&Car> for CarSnapshot {
    fn from(car: &Car) -> Self {
        Self {
            id: car.id(),
            position: car.position(),
            velocity: car.velocity(),
            status: car.status(),
            laps: car.laps(),
            strategy: car.strategy().name().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub car_count: usize,
    pub active_car: usize,
    pub winner: Option<usize>,
    pub cars: Vec<CarSnapshot>,
}

#[derive(Debug)]
pub struct Race {
    track: Track,
}

impl Race {
    pub fn new(track: Track) -> Self {
        Self { track }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn into_track(self) -> Track {
        self.track
    }

    pub fn car_count(&self) -> usize {
        self.track.car_count()
    }

    pub fn current_car_index(&self) -> usize {
        self.track.active_car_index()
    }

    pub fn current_car(&self) -> &Car {
        self.track.active_car()
    }

    /// Replaces the strategy of car `index`. Returns false if there is no such car.
    pub fn set_car_move_strategy(&mut self, index: usize, strategy: Box<dyn MoveStrategy>) -> bool {
        match self.track.car_mut(index) {
            Some(car) => {
                car.set_strategy(strategy);
                true
            }
            None => false,
        }
    }

    /// Asks the active car's strategy for its next acceleration.
    pub fn next_move_for_current_car(&mut self) -> Option<Direction> {
        self.track.active_car_mut().strategy_mut().next_move()
    }

    /// Resolves one turn for the active car.
    pub fn do_car_turn(&mut self, acceleration: Direction) -> TurnOutcome {
        let index = self.track.active_car_index();
        let car = self.track.active_car();
        let start = car.position();

        if car.is_crashed() {
            return TurnOutcome {
                car_index: index,
                acceleration,
                path: vec![start],
                event: TurnEvent::AlreadyCrashed,
                lap_delta: 0,
            };
        }

        let end = start + car.velocity() + acceleration.vector();
        let path = calculate_path(start, end);

        let mut crossings: Vec<bool> = Vec::new();
        let mut crash: Option<(Position, CrashCause)> = None;
        let mut last_safe = start;
        for &point in path.iter().skip(1) {
            if let Some(cause) = self.obstacle_at(index, point) {
                crash = Some((last_safe, cause));
                break;
            }
            if let Some(legal) = self.track.cell(point).is_legal_crossing(start, point) {
                crossings.push(legal);
            }
            last_safe = point;
        }

        let car = self.track.active_car_mut();
        car.accelerate(acceleration);
        for legal in &crossings {
            car.record_crossing(*legal);
        }
        let event = match crash {
            Some((at, cause)) => {
                car.crash(at);
                TurnEvent::Crashed { at, cause }
            }
            None => {
                car.advance();
                TurnEvent::Moved { to: end }
            }
        };
        let lap_delta = crossings
            .iter()
            .map(|legal| if *legal { 1 } else { -1 })
            .sum();

        TurnOutcome {
            car_index: index,
            acceleration,
            path,
            event,
            lap_delta,
        }
    }

    fn obstacle_at(&self, mover: usize, point: Position) -> Option<CrashCause> {
        let blocker = self
            .track
            .cars()
            .iter()
            .enumerate()
            .find(|(i, other)| *i != mover && other.position() == point);
        if let Some((_, other)) = blocker {
            return Some(CrashCause::Car(other.id()));
        }
        if !self.track.grid().contains(point) {
            return Some(CrashCause::OutOfBounds);
        }
        if self.track.cell(point) == CellType::Wall {
            return Some(CrashCause::Wall);
        }
        None
    }

    /// The sole surviving car, else the first car with exactly one lap.
    pub fn winner(&self) -> Option<usize> {
        let cars = self.track.cars();
        let mut survivors = cars.iter().enumerate().filter(|(_, car)| !car.is_crashed());
        if let (Some((only, _)), None) = (survivors.next(), survivors.next()) {
            return Some(only);
        }
        cars.iter().position(|car| car.laps() == 1)
    }

    /// Rotates to the next car that has not crashed; `None` when all have.
    pub fn switch_to_next_active_car(&mut self) -> Option<usize> {
        self.track.advance_active_car()
    }

    /// Whether some car can still change its position.
    pub fn can_any_car_move(&self) -> bool {
        self.track
            .cars()
            .iter()
            .any(|car| !car.is_crashed() && !car.strategy().is_stationary())
    }

    pub fn snapshot(&self) -> RaceSnapshot {
        RaceSnapshot {
            car_count: self.car_count(),
            active_car: self.current_car_index(),
            winner: self.winner(),
            cars: self.track.cars().iter().map(CarSnapshot::from).collect(),
        }
    }
}
