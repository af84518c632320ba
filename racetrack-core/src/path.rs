use crate::geometry::Position;

/// Every grid cell on the digital line from `start` to `end`, both included.
///
/// Steps one cell along the axis with the larger distance each iteration (x on
/// ties) and lets an error accumulator decide when the other axis steps too.
/// The result always has `1 + max(|dx|, |dy|)` entries.
pub fn calculate_path(start: Position, end: Position) -> Vec<Position> {
    let diff_x = end.x - start.x;
    let diff_y = end.y - start.y;
    let dist_x = diff_x.abs();
    let dist_y = diff_y.abs();
    let dir_x = diff_x.signum();
    let dir_y = diff_y.signum();

    // (parallel step, slow-axis distance, fast-axis distance)
    let (parallel, dist_slow, dist_fast) = if dist_x >= dist_y {
        (Position::new(dir_x, 0), dist_y, dist_x)
    } else {
        (Position::new(0, dir_y), dist_x, dist_y)
    };
    let diagonal = Position::new(dir_x, dir_y);

    let mut path = Vec::with_capacity(dist_fast as usize + 1);
    let mut current = start;
    let mut error = dist_fast / 2;
    path.push(current);

    for _ in 0..dist_fast {
        error -= dist_slow;
        if error < 0 {
            error += dist_fast;
            current += diagonal;
        } else {
            current += parallel;
        }
        path.push(current);
    }

    path
}
