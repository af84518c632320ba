use crate::geometry::{Direction, Position, Velocity};

/// Bang-bang controller that steers through a list of waypoints.
///
/// It keeps its own copy of position and velocity and assumes every
/// acceleration it returns is applied to the car for exactly one turn.
#[derive(Clone, Debug)]
pub struct PathFollower {
    waypoints: Vec<Position>,
    cursor: usize,
    position: Position,
    velocity: Velocity,
}

impl PathFollower {
    pub fn new(start: Position, waypoints: Vec<Position>) -> Self {
        Self {
            waypoints,
            cursor: 0,
            position: start,
            velocity: Velocity::ZERO,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn waypoints(&self) -> &[Position] {
        &self.waypoints
    }

    pub fn current_target(&self) -> Option<Position> {
        self.waypoints.get(self.cursor).copied()
    }

    /// True once the last waypoint is reached and the car stands still on it.
    pub fn is_done(&self) -> bool {
        match self.waypoints.last() {
            Some(last) => {
                self.cursor + 1 == self.waypoints.len()
                    && self.position == *last
                    && self.velocity == Velocity::ZERO
            }
            None => true,
        }
    }

    pub fn next_move(&mut self) -> Direction {
        let Some(mut target) = self.current_target() else {
            return Direction::None;
        };
        if self.position == target && self.cursor + 1 < self.waypoints.len() {
            self.cursor += 1;
            target = self.waypoints[self.cursor];
        }

        let ax = axis_acceleration(self.position.x, target.x, self.velocity.x);
        let ay = axis_acceleration(self.position.y, target.y, self.velocity.y);
        let dir = Direction::from_components(ax, ay).unwrap_or(Direction::None);

        self.velocity += dir.vector();
        self.position += self.velocity;
        dir
    }
}

/// Accelerate while there is room to brake, brake once there is not, else coast.
fn axis_acceleration(current: i32, target: i32, velocity: i32) -> i32 {
    let toward = if target >= current { 1 } else { -1 };
    let dist = (target - current).abs();
    let speed = velocity.abs();

    if (speed + 1) * 2 <= dist || (dist > 0 && speed == 0) {
        toward
    } else if speed * 2 > dist {
        if velocity > 0 {
            -1
        } else {
            1
        }
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn axis_rule_accelerates_brakes_and_coasts() {
        // standing still with distance left
        assert_eq!(axis_acceleration(0, 1, 0), 1);
        assert_eq!(axis_acceleration(5, 0, 0), -1);
        // plenty of room
        assert_eq!(axis_acceleration(0, 10, 2), 1);
        // too fast for the remaining distance
        assert_eq!(axis_acceleration(0, 3, 2), -1);
        assert_eq!(axis_acceleration(3, 0, -2), 1);
        // exactly at braking distance
        assert_eq!(axis_acceleration(0, 2, 1), 0);
        // on target and stopped
        assert_eq!(axis_acceleration(4, 4, 0), 0);
    }

    #[test]
    fn outputs_stay_within_unit_range() {
        for current in -6..=6 {
            for target in -6..=6 {
                for velocity in -4..=4 {
                    let a = axis_acceleration(current, target, velocity);
                    assert!((-1..=1).contains(&a));
                }
            }
        }
    }

    #[test]
    fn empty_waypoints_never_move() {
        let mut follower = PathFollower::new(p(2, 2), Vec::new());
        for _ in 0..3 {
            assert_eq!(follower.next_move(), Direction::None);
        }
        assert_eq!(follower.position(), p(2, 2));
        assert!(follower.is_done());
    }

    #[test]
    fn single_step_target_is_reached_and_held() {
        let mut follower = PathFollower::new(p(0, 0), vec![p(1, 0)]);
        assert_eq!(follower.next_move(), Direction::Right);
        assert_eq!(follower.position(), p(1, 0));
        assert_eq!(follower.next_move(), Direction::Left);
        assert_eq!(follower.velocity(), Velocity::ZERO);
        assert_eq!(follower.position(), p(1, 0));
        assert!(follower.is_done());
        assert_eq!(follower.next_move(), Direction::None);
    }

    #[test]
    fn diagonal_waypoint_uses_both_axes() {
        let mut follower = PathFollower::new(p(0, 0), vec![p(1, 1)]);
        assert_eq!(follower.next_move(), Direction::DownRight);
        assert_eq!(follower.position(), p(1, 1));
    }

    #[test]
    fn straight_waypoint_list_makes_progress() {
        let waypoints: Vec<Position> = (1..=6).map(|x| p(x, 3)).collect();
        let last = *waypoints.last().unwrap();
        let mut follower = PathFollower::new(p(0, 3), waypoints);

        for _ in 0..40 {
            let before = follower.position().chebyshev_distance(last);
            follower.next_move();
            let after = follower.position().chebyshev_distance(last);
            assert!(after <= before + 1);
            if follower.is_done() {
                break;
            }
        }
        assert!(follower.is_done());
        assert_eq!(follower.position(), last);
    }

    #[test]
    fn advances_only_one_waypoint_per_call() {
        let mut follower = PathFollower::new(p(0, 0), vec![p(0, 0), p(1, 0), p(2, 0)]);
        assert_eq!(follower.current_target(), Some(p(0, 0)));
        follower.next_move();
        assert_eq!(follower.current_target(), Some(p(1, 0)));
        assert_eq!(follower.position(), p(1, 0));
        follower.next_move();
        assert_eq!(follower.current_target(), Some(p(2, 0)));
    }
}
