pub mod car;
pub mod constants;
pub mod error;
pub mod follower;
pub mod geometry;
pub mod moves;
pub mod path;
pub mod pathfinder;
pub mod race;
pub mod strategy;
pub mod track;

pub use error::{MoveDataError, PathError, TrackError};
pub use geometry::{Direction, GridVector, Position, Velocity};
pub use race::{CarSnapshot, CrashCause, Race, RaceSnapshot, TurnEvent, TurnOutcome};
pub use strategy::MoveStrategy;
pub use track::{CellType, Track};
