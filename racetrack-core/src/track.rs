//! Track grid, car roster and the active-car cursor.
//!
//! A track is read from a rectangular block of text. Leading empty lines are
//! skipped and the block ends at the first empty line after it started (or at
//! the end of input). Every character that is not a known cell symbol marks the
//! start of a car and doubles as that car's id.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::car::Car;
use crate::constants::{
    CRASH_MARKER, FINISH_DOWN_CHAR, FINISH_LEFT_CHAR, FINISH_RIGHT_CHAR, FINISH_UP_CHAR,
    MAX_CARS, TRACK_CHAR, WALL_CHAR,
};
use crate::error::TrackError;
use crate::geometry::{GridVector, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    Wall,
    Track,
    FinishUp,
    FinishDown,
    FinishLeft,
    FinishRight,
}

impl CellType {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            WALL_CHAR => Some(Self::Wall),
            TRACK_CHAR => Some(Self::Track),
            FINISH_UP_CHAR => Some(Self::FinishUp),
            FINISH_DOWN_CHAR => Some(Self::FinishDown),
            FINISH_LEFT_CHAR => Some(Self::FinishLeft),
            FINISH_RIGHT_CHAR => Some(Self::FinishRight),
            _ => None,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => WALL_CHAR,
            Self::Track => TRACK_CHAR,
            Self::FinishUp => FINISH_UP_CHAR,
            Self::FinishDown => FINISH_DOWN_CHAR,
            Self::FinishLeft => FINISH_LEFT_CHAR,
            Self::FinishRight => FINISH_RIGHT_CHAR,
        }
    }

    pub const fn is_finish(self) -> bool {
        matches!(
            self,
            Self::FinishUp | Self::FinishDown | Self::FinishLeft | Self::FinishRight
        )
    }

    /// Unit step a car must travel along to cross this finish cell legally.
    pub const fn legal_direction(self) -> Option<GridVector> {
        match self {
            Self::FinishUp => Some(GridVector::new(0, -1)),
            Self::FinishDown => Some(GridVector::new(0, 1)),
            Self::FinishLeft => Some(GridVector::new(-1, 0)),
            Self::FinishRight => Some(GridVector::new(1, 0)),
            Self::Wall | Self::Track => None,
        }
    }

    /// Whether a car coming from `from` crosses the finish cell at `at` legally.
    /// `None` for cells that are not finish cells. Equal coordinates count as illegal.
    pub fn is_legal_crossing(self, from: Position, at: Position) -> Option<bool> {
        match self {
            Self::FinishUp => Some(from.y > at.y),
            Self::FinishDown => Some(from.y < at.y),
            Self::FinishLeft => Some(from.x > at.x),
            Self::FinishRight => Some(from.x < at.x),
            Self::Wall | Self::Track => None,
        }
    }
}

/// Immutable rectangular grid of cell types, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellType>,
}

impl Grid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Cell type at `pos`; anything outside the grid is a wall.
    pub fn cell(&self, pos: Position) -> CellType {
        if !self.contains(pos) {
            return CellType::Wall;
        }
        self.cells[pos.y as usize * self.width + pos.x as usize]
    }

    /// All cells in row-major order with their coordinates.
    pub fn cells(&self) -> impl Iterator<Item = (Position, CellType)> + '_ {
        self.cells.iter().enumerate().map(|(i, cell)| {
            let pos = Position::new((i % self.width) as i32, (i / self.width) as i32);
            (pos, *cell)
        })
    }

    pub fn has_finish_line(&self) -> bool {
        self.cells.iter().any(|cell| cell.is_finish())
    }
}

/// Grid plus car roster in scan order plus the active-car cursor.
#[derive(Debug)]
pub struct Track {
    grid: Grid,
    cars: Vec<Car>,
    active: usize,
}

impl Track {
    pub fn parse(input: &str) -> Result<Self, TrackError> {
        let rows: Vec<&str> = input
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .skip_while(|line| line.is_empty())
            .take_while(|line| !line.is_empty())
            .collect();

        if rows.is_empty() {
            return Err(TrackError::Empty);
        }

        let width = rows[0].chars().count();
        let mut cells = Vec::with_capacity(width * rows.len());
        let mut cars: Vec<Car> = Vec::new();

        for (row, line) in rows.iter().enumerate() {
            let actual = line.chars().count();
            if actual != width {
                return Err(TrackError::Ragged {
                    row,
                    expected: width,
                    actual,
                });
            }

            for (col, c) in line.chars().enumerate() {
                match CellType::from_char(c) {
                    Some(cell) => cells.push(cell),
                    None => {
                        if cars.iter().any(|car| car.id() == c) {
                            return Err(TrackError::DuplicateCar { id: c });
                        }
                        cars.push(Car::new(c, Position::new(col as i32, row as i32)));
                        cells.push(CellType::Track);
                    }
                }
            }
        }

        if cars.is_empty() {
            return Err(TrackError::NoCars);
        }
        if cars.len() > MAX_CARS {
            return Err(TrackError::TooManyCars {
                count: cars.len(),
                max: MAX_CARS,
            });
        }

        let grid = Grid {
            width,
            height: rows.len(),
            cells,
        };
        if !grid.has_finish_line() {
            return Err(TrackError::NoFinishLine);
        }

        Ok(Self {
            grid,
            cars,
            active: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn cell(&self, pos: Position) -> CellType {
        self.grid.cell(pos)
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn car_count(&self) -> usize {
        self.cars.len()
    }

    pub fn car(&self, index: usize) -> Option<&Car> {
        self.cars.get(index)
    }

    pub fn car_mut(&mut self, index: usize) -> Option<&mut Car> {
        self.cars.get_mut(index)
    }

    pub fn car_index_of(&self, id: char) -> Option<usize> {
        self.cars.iter().position(|car| car.id() == id)
    }

    pub fn active_car_index(&self) -> usize {
        self.active
    }

    pub fn active_car(&self) -> &Car {
        &self.cars[self.active]
    }

    pub(crate) fn active_car_mut(&mut self) -> &mut Car {
        &mut self.cars[self.active]
    }

    /// Moves the cursor to the next car that has not crashed, looking at most
    /// one full lap of the roster. Leaves the cursor alone and returns `None`
    /// when every car has crashed.
    pub fn advance_active_car(&mut self) -> Option<usize> {
        let count = self.cars.len();
        for step in 1..=count {
            let candidate = (self.active + step) % count;
            if !self.cars[candidate].is_crashed() {
                self.active = candidate;
                return Some(candidate);
            }
        }
        None
    }

    /// Display character at (`row`, `col`): the first car standing there
    /// (its id, or the crash marker), otherwise the cell symbol.
    pub fn char_at(&self, row: usize, col: usize) -> char {
        let pos = Position::new(col as i32, row as i32);
        match self.cars.iter().find(|car| car.position() == pos) {
            Some(car) if car.is_crashed() => CRASH_MARKER,
            Some(car) => car.id(),
            None => self.grid.cell(pos).symbol(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.width() + 1) * self.height());
        for row in 0..self.height() {
            for col in 0..self.width() {
                out.push(self.char_at(row, col));
            }
            out.push('\n');
        }
        out
    }
}

impl FromStr for Track {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
