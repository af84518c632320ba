/// Upper bound on cars a single track may declare.
pub const MAX_CARS: usize = 9;

pub const WALL_CHAR: char = '#';
pub const TRACK_CHAR: char = ' ';
pub const FINISH_LEFT_CHAR: char = '<';
pub const FINISH_RIGHT_CHAR: char = '>';
pub const FINISH_UP_CHAR: char = '^';
pub const FINISH_DOWN_CHAR: char = 'v';

/// Rendered in place of a car id once that car has crashed.
pub const CRASH_MARKER: char = 'X';

/// Weight of every edge in the track graph.
pub const GRAPH_EDGE_WEIGHT: u32 = 1;
