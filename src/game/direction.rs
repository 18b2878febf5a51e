use serde::{Deserialize, Serialize};

/// Absolute direction the snake can face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Relative steering input, seen from the snake's current facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnDirection {
    Left,
    Right,
}

/// Counter-clockwise order: a left turn moves one step forward in this cycle
const CYCLE: [Direction; 4] = [
    Direction::Up,
    Direction::Left,
    Direction::Down,
    Direction::Right,
];

impl Direction {
    pub const ALL: [Direction; 4] = CYCLE;

    fn cycle_index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Left => 1,
            Direction::Down => 2,
            Direction::Right => 3,
        }
    }

    /// Direction after a 90 degree turn to the given side
    pub fn turned(self, turn: TurnDirection) -> Direction {
        let step = match turn {
            TurnDirection::Left => 1,
            TurnDirection::Right => 3,
        };
        CYCLE[(self.cycle_index() + step) % CYCLE.len()]
    }

    /// Returns true if the two directions are perpendicular
    pub fn is_adjacent(self, other: Direction) -> bool {
        let distance = (other.cycle_index() + CYCLE.len() - self.cycle_index()) % CYCLE.len();
        distance == 1 || distance == 3
    }

    /// Relative turn that rotates `self` into `next`.
    ///
    /// Returns `None` when `next` is the same direction or the reverse one,
    /// neither of which can be reached by a single turn.
    pub fn turn_towards(self, next: Direction) -> Option<TurnDirection> {
        match (next.cycle_index() + CYCLE.len() - self.cycle_index()) % CYCLE.len() {
            1 => Some(TurnDirection::Left),
            3 => Some(TurnDirection::Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Direction {
        CYCLE[(self.cycle_index() + 2) % CYCLE.len()]
    }

    /// Returns the delta (dx, dy) for moving in this direction.
    ///
    /// The y axis grows upwards, so `Up` is `(0, 1)`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}
