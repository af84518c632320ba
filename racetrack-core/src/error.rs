use core::fmt;

use crate::geometry::Position;

/// Reasons a track file is rejected before any race starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackError {
    Empty,
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },
    NoCars,
    TooManyCars {
        count: usize,
        max: usize,
    },
    DuplicateCar {
        id: char,
    },
    NoFinishLine,
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "invalid track: no track lines"),
            Self::Ragged {
                row,
                expected,
                actual,
            } => write!(
                f,
                "invalid track: row {row} has {actual} columns, expected {expected}"
            ),
            Self::NoCars => write!(f, "invalid track: no cars"),
            Self::TooManyCars { count, max } => {
                write!(f, "invalid track: {count} cars (allowed 1..={max})")
            }
            Self::DuplicateCar { id } => write!(f, "invalid track: car '{id}' appears twice"),
            Self::NoFinishLine => write!(f, "invalid track: no finish line"),
        }
    }
}

impl std::error::Error for TrackError {}

/// Reasons a move or waypoint file is rejected before a strategy is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveDataError {
    InvalidDirection { line: usize, token: String },
    InvalidWaypoint { line: usize, content: String },
}

impl fmt::Display for MoveDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDirection { line, token } => {
                write!(f, "invalid move data at line {line}: unknown direction '{token}'")
            }
            Self::InvalidWaypoint { line, content } => write!(
                f,
                "invalid move data at line {line}: malformed waypoint '{content}'"
            ),
        }
    }
}

impl std::error::Error for MoveDataError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathError {
    StartOffTrack { start: Position },
    UnreachableFinish { start: Position },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartOffTrack { start } => {
                write!(f, "start {start} is not a drivable cell")
            }
            Self::UnreachableFinish { start } => {
                write!(f, "no finish line is reachable from {start}")
            }
        }
    }
}

impl std::error::Error for PathError {}
