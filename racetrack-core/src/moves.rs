//! Text codecs for move lists and waypoint (follower) files.
//!
//! Both formats are line oriented. Blank lines are skipped; line numbers in
//! errors are 1-based and count blank lines too.

use crate::error::MoveDataError;
use crate::geometry::{Direction, Position};

pub fn parse_move_list(text: &str) -> Result<Vec<Direction>, MoveDataError> {
    let mut moves = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let token = raw.trim();
        if token.is_empty() {
            continue;
        }
        let dir = token
            .parse::<Direction>()
            .map_err(|_| MoveDataError::InvalidDirection {
                line: idx + 1,
                token: token.to_string(),
            })?;
        moves.push(dir);
    }
    Ok(moves)
}

pub fn format_move_list(moves: &[Direction]) -> String {
    let mut out = String::with_capacity(moves.len() * 8);
    for dir in moves {
        out.push_str(dir.name());
        out.push('\n');
    }
    out
}

pub fn parse_waypoints(text: &str) -> Result<Vec<Position>, MoveDataError> {
    let mut waypoints = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let content = raw.trim();
        if content.is_empty() {
            continue;
        }
        let pos = parse_waypoint(content).ok_or_else(|| MoveDataError::InvalidWaypoint {
            line: idx + 1,
            content: content.to_string(),
        })?;
        waypoints.push(pos);
    }
    Ok(waypoints)
}

pub fn format_waypoints(waypoints: &[Position]) -> String {
    let mut out = String::new();
    for pos in waypoints {
        out.push_str(&pos.to_string());
        out.push('\n');
    }
    out
}

/// `(X:<int>, Y:<int>)`; whitespace around the numbers is tolerated.
fn parse_waypoint(content: &str) -> Option<Position> {
    let inner = content.strip_prefix('(')?.strip_suffix(')')?;
    let (x_part, y_part) = inner.split_once(',')?;
    let x = x_part.trim().strip_prefix("X:")?.trim().parse::<i32>().ok()?;
    let y = y_part.trim().strip_prefix("Y:")?.trim().parse::<i32>().ok()?;
    Some(Position::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directions_skipping_blank_lines() {
        let moves = parse_move_list("RIGHT\n\n  DOWN_RIGHT  \nNONE\r\n").unwrap();
        assert_eq!(
            moves,
            vec![Direction::Right, Direction::DownRight, Direction::None]
        );
    }

    #[test]
    fn reports_line_of_bad_direction() {
        let err = parse_move_list("UP\n\nright\n").unwrap_err();
        assert_eq!(
            err,
            MoveDataError::InvalidDirection {
                line: 3,
                token: "right".to_string()
            }
        );
    }

    #[test]
    fn formatted_move_list_is_accepted_back() {
        let moves = vec![Direction::UpLeft, Direction::None, Direction::Down];
        let text = format_move_list(&moves);
        assert_eq!(text, "UP_LEFT\nNONE\nDOWN\n");
        assert_eq!(parse_move_list(&text).unwrap(), moves);
    }

    #[test]
    fn parses_waypoint_lines() {
        let waypoints = parse_waypoints("(X:24, Y:22)\n\n(X:-1,Y:3)\n").unwrap();
        assert_eq!(waypoints, vec![Position::new(24, 22), Position::new(-1, 3)]);
    }

    #[test]
    fn rejects_malformed_waypoints() {
        for bad in ["24, 22", "(X:24 Y:22)", "(Y:22, X:24)", "(X:a, Y:1)", "(X:1, Y:2"] {
            let err = parse_waypoints(bad).unwrap_err();
            assert_eq!(
                err,
                MoveDataError::InvalidWaypoint {
                    line: 1,
                    content: bad.to_string()
                },
                "input {bad:?}"
            );
        }
    }

    #[test]
    fn formats_waypoints_in_file_notation() {
        let text = format_waypoints(&[Position::new(3, 4), Position::new(4, 4)]);
        assert_eq!(text, "(X:3, Y:4)\n(X:4, Y:4)\n");
    }
}
