use core::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Direction, Position, Velocity};
use crate::strategy::{DoNotMoveStrategy, MoveStrategy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarStatus {
    Active,
    Crashed,
}

/// A car on the track. Once crashed it stays crashed, frozen where it hit.
pub struct Car {
    id: char,
    position: Position,
    velocity: Velocity,
    status: CarStatus,
    laps: i32,
    strategy: Box<dyn MoveStrategy>,
}

impl Car {
    pub fn new(id: char, start: Position) -> Self {
        Self {
            id,
            position: start,
            velocity: Velocity::ZERO,
            status: CarStatus::Active,
            laps: 0,
            strategy: Box::new(DoNotMoveStrategy),
        }
    }

    pub fn id(&self) -> char {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn status(&self) -> CarStatus {
        self.status
    }

    pub fn is_crashed(&self) -> bool {
        self.status == CarStatus::Crashed
    }

    /// Net count of legal finish-line crossings; reverse crossings subtract.
    pub fn laps(&self) -> i32 {
        self.laps
    }

    /// Where the car lands after the next move at its current velocity.
    pub fn next_position(&self) -> Position {
        self.position + self.velocity
    }

    pub fn accelerate(&mut self, acceleration: Direction) {
        if self.is_crashed() {
            return;
        }
        self.velocity += acceleration.vector();
    }

    pub fn advance(&mut self) {
        if self.is_crashed() {
            return;
        }
        self.position = self.next_position();
    }

    pub fn crash(&mut self, at: Position) {
        self.position = at;
        self.velocity = Velocity::ZERO;
        self.status = CarStatus::Crashed;
    }

    pub(crate) fn record_crossing(&mut self, legal: bool) {
        if legal {
            self.laps += 1;
        } else {
            self.laps -= 1;
        }
    }

    pub fn strategy(&self) -> &dyn MoveStrategy {
        self.strategy.as_ref()
    }

    pub fn strategy_mut(&mut self) -> &mut dyn MoveStrategy {
        self.strategy.as_mut()
    }

    pub fn set_strategy(&mut self, strategy: Box<dyn MoveStrategy>) {
        self.strategy = strategy;
    }
}

impl fmt::Debug for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Car")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("status", &self.status)
            .field("laps", &self.laps)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
