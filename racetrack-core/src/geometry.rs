use core::fmt;
use core::ops::{Add, AddAssign, Sub};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Integer grid vector. `x` grows to the right, `y` grows downward, origin top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridVector {
    pub x: i32,
    pub y: i32,
}

pub type Position = GridVector;
pub type Velocity = GridVector;

impl GridVector {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 8-directional step count between two cells.
    #[inline]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }
}

impl Add for GridVector {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for GridVector {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for GridVector {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for GridVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(X:{}, Y:{})", self.x, self.y)
    }
}

/// One of the nine accelerations a car may apply in a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    DownLeft,
    Down,
    DownRight,
    Left,
    None,
    Right,
    UpLeft,
    Up,
    UpRight,
}

impl Direction {
    pub const ALL: [Direction; 9] = [
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
        Direction::Left,
        Direction::None,
        Direction::Right,
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
    ];

    pub const fn vector(self) -> GridVector {
        match self {
            Self::DownLeft => GridVector::new(-1, 1),
            Self::Down => GridVector::new(0, 1),
            Self::DownRight => GridVector::new(1, 1),
            Self::Left => GridVector::new(-1, 0),
            Self::None => GridVector::new(0, 0),
            Self::Right => GridVector::new(1, 0),
            Self::UpLeft => GridVector::new(-1, -1),
            Self::Up => GridVector::new(0, -1),
            Self::UpRight => GridVector::new(1, -1),
        }
    }

    /// Direction whose vector is exactly `(x, y)`, if both lie in -1..=1.
    pub fn from_components(x: i32, y: i32) -> Option<Self> {
        let wanted = GridVector::new(x, y);
        Self::ALL.into_iter().find(|dir| dir.vector() == wanted)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::DownLeft => "DOWN_LEFT",
            Self::Down => "DOWN",
            Self::DownRight => "DOWN_RIGHT",
            Self::Left => "LEFT",
            Self::None => "NONE",
            Self::Right => "RIGHT",
            Self::UpLeft => "UP_LEFT",
            Self::Up => "UP",
            Self::UpRight => "UP_RIGHT",
        }
    }

    /// Numeric keypad layout: 7 8 9 on top, 5 is NONE.
    pub fn from_keypad(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Self::DownLeft),
            '2' => Some(Self::Down),
            '3' => Some(Self::DownRight),
            '4' => Some(Self::Left),
            '5' => Some(Self::None),
            '6' => Some(Self::Right),
            '7' => Some(Self::UpLeft),
            '8' => Some(Self::Up),
            '9' => Some(Self::UpRight),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownDirection(pub String);

impl fmt::Display for UnknownDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown direction '{}'", self.0)
    }
}

impl std::error::Error for UnknownDirection {}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dir| dir.name() == s)
            .ok_or_else(|| UnknownDirection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_equal_by_component() {
        let a = GridVector::new(3, -2);
        let b = GridVector::new(3, -2);
        assert_eq!(a, b);

        let mut seen = std::collections::HashSet::new();
        seen.insert(a);
        assert!(seen.contains(&b));
    }

    #[test]
    fn every_unit_pair_maps_to_exactly_one_direction() {
        for x in -1..=1 {
            for y in -1..=1 {
                let dir = Direction::from_components(x, y).expect("unit components");
                assert_eq!(dir.vector(), GridVector::new(x, y));
            }
        }
        assert_eq!(Direction::from_components(2, 0), None);
    }

    #[test]
    fn parses_upper_snake_case_names_only() {
        assert_eq!("UP_LEFT".parse::<Direction>(), Ok(Direction::UpLeft));
        assert_eq!("NONE".parse::<Direction>(), Ok(Direction::None));
        assert!("up".parse::<Direction>().is_err());
        assert!("UPLEFT".parse::<Direction>().is_err());
    }

    #[test]
    fn keypad_surrounds_none() {
        assert_eq!(Direction::from_keypad('5'), Some(Direction::None));
        assert_eq!(Direction::from_keypad('8'), Some(Direction::Up));
        assert_eq!(Direction::from_keypad('3'), Some(Direction::DownRight));
        assert_eq!(Direction::from_keypad('0'), None);
    }

    #[test]
    fn displays_in_waypoint_notation() {
        assert_eq!(GridVector::new(24, 22).to_string(), "(X:24, Y:22)");
    }
}
