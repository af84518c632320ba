//! Sources of per-turn accelerations.
//!
//! A strategy never touches the track while deciding; whatever it needs is
//! captured when it is built.

use crate::error::{MoveDataError, PathError};
use crate::follower::PathFollower;
use crate::geometry::{Direction, Position};
use crate::moves::{parse_move_list, parse_waypoints};
use crate::pathfinder::{shortest_path_to_finish, ShortestPath};
use crate::track::Track;

pub trait MoveStrategy {
    fn name(&self) -> &'static str;

    /// Next acceleration, or `None` once no further input will ever come.
    fn next_move(&mut self) -> Option<Direction>;

    /// True for strategies that can never change a car's velocity.
    fn is_stationary(&self) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DoNotMoveStrategy;

impl MoveStrategy for DoNotMoveStrategy {
    fn name(&self) -> &'static str {
        "do-not-move"
    }

    fn next_move(&mut self) -> Option<Direction> {
        Some(Direction::None)
    }

    fn is_stationary(&self) -> bool {
        true
    }
}

/// Replays a fixed list of moves, then coasts with `NONE` forever.
#[derive(Clone, Debug)]
pub struct MoveListStrategy {
    moves: Vec<Direction>,
    cursor: usize,
}

impl MoveListStrategy {
    pub fn new(moves: Vec<Direction>) -> Self {
        Self { moves, cursor: 0 }
    }

    pub fn parse(text: &str) -> Result<Self, MoveDataError> {
        Ok(Self::new(parse_move_list(text)?))
    }

    pub fn moves(&self) -> &[Direction] {
        &self.moves
    }

    pub fn remaining(&self) -> usize {
        self.moves.len() - self.cursor
    }
}

impl MoveStrategy for MoveListStrategy {
    fn name(&self) -> &'static str {
        "move-list"
    }

    fn next_move(&mut self) -> Option<Direction> {
        match self.moves.get(self.cursor) {
            Some(dir) => {
                self.cursor += 1;
                Some(*dir)
            }
            None => Some(Direction::None),
        }
    }
}

/// Steers through a hand-made list of waypoints.
#[derive(Clone, Debug)]
pub struct PathFollowerStrategy {
    follower: PathFollower,
}

impl PathFollowerStrategy {
    pub fn new(start: Position, waypoints: Vec<Position>) -> Self {
        Self {
            follower: PathFollower::new(start, waypoints),
        }
    }

    pub fn parse(start: Position, text: &str) -> Result<Self, MoveDataError> {
        Ok(Self::new(start, parse_waypoints(text)?))
    }

    pub fn follower(&self) -> &PathFollower {
        &self.follower
    }
}

impl MoveStrategy for PathFollowerStrategy {
    fn name(&self) -> &'static str {
        "path-follower"
    }

    fn next_move(&mut self) -> Option<Direction> {
        Some(self.follower.next_move())
    }
}

/// Autopilot: searches the shortest route to a finish line once, then follows it.
#[derive(Clone, Debug)]
pub struct PathFinderStrategy {
    path: ShortestPath,
    follower: PathFollower,
}

impl PathFinderStrategy {
    pub fn new(start: Position, track: &Track) -> Result<Self, PathError> {
        let path = shortest_path_to_finish(track.grid(), start)?;
        let follower = PathFollower::new(start, path.waypoints.clone());
        Ok(Self { path, follower })
    }

    pub fn path(&self) -> &ShortestPath {
        &self.path
    }

    pub fn follower(&self) -> &PathFollower {
        &self.follower
    }
}

impl MoveStrategy for PathFinderStrategy {
    fn name(&self) -> &'static str {
        "path-finder"
    }

    fn next_move(&mut self) -> Option<Direction> {
        Some(self.follower.next_move())
    }
}
