use std::collections::HashMap;

use super::direction::{Direction, TurnDirection};
use super::error::CollisionError;

/// Shortest body a snake can have: a head, one body segment and a tail
pub const MIN_SNAKE_LENGTH: usize = 3;

/// Length of a snake built through `Snake::default`
pub const DEFAULT_SNAKE_LENGTH: usize = 5;

/// Coordinate-free shape of one cell of the snake.
///
/// `HeadLeft`/`HeadRight` mark a head that will bend on the next move.
/// `TurnLeft`/`TurnRight` mark a body cell where the path bends, and the
/// `Tail*` variants remember the bend of the segment the tail replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Head,
    HeadLeft,
    HeadRight,
    Straight,
    TurnLeft,
    TurnRight,
    Tail,
    TailLeft,
    TailRight,
}

/// Structural position a segment may occupy in the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    Head,
    Body,
    Tail,
}

impl Segment {
    pub fn role(self) -> SegmentRole {
        match self {
            Segment::Head | Segment::HeadLeft | Segment::HeadRight => SegmentRole::Head,
            Segment::Straight | Segment::TurnLeft | Segment::TurnRight => SegmentRole::Body,
            Segment::Tail | Segment::TailLeft | Segment::TailRight => SegmentRole::Tail,
        }
    }

    fn steered_head(turn: TurnDirection) -> Segment {
        match turn {
            TurnDirection::Left => Segment::HeadLeft,
            TurnDirection::Right => Segment::HeadRight,
        }
    }

    /// Body segment left behind by a head once the snake moves past it
    fn behind_head(self) -> Segment {
        match self {
            Segment::HeadLeft => Segment::TurnRight,
            Segment::HeadRight => Segment::TurnLeft,
            _ => Segment::Straight,
        }
    }

    /// Tail that takes the place of a pre-tail body segment
    fn as_tail(self) -> Segment {
        match self {
            Segment::TurnLeft => Segment::TailLeft,
            Segment::TurnRight => Segment::TailRight,
            _ => Segment::Tail,
        }
    }

    /// Turn applied when walking the body from head to tail through this segment
    pub fn traversal_turn(self) -> Option<TurnDirection> {
        match self {
            Segment::TurnLeft | Segment::HeadRight => Some(TurnDirection::Left),
            Segment::TurnRight | Segment::HeadLeft => Some(TurnDirection::Right),
            _ => None,
        }
    }
}

/// The snake's body as a sequence of shape segments, head first.
///
/// The body holds no coordinates: the board anchors the head on the grid and
/// recovers every other cell by walking the segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Segment>,
    /// Growth units still to be released, one per move
    pending_growth: usize,
}

impl Snake {
    /// Create a straight snake. Lengths below `MIN_SNAKE_LENGTH` are raised to it.
    pub fn new(length: usize) -> Self {
        let length = length.max(MIN_SNAKE_LENGTH);

        let mut body = Vec::with_capacity(length);
        body.push(Segment::Head);
        body.extend(std::iter::repeat_n(Segment::Straight, length - 2));
        body.push(Segment::Tail);

        Self {
            body,
            pending_growth: 0,
        }
    }

    pub fn body(&self) -> &[Segment] {
        &self.body
    }

    pub fn head(&self) -> Segment {
        self.body[0]
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (never true, the body has at least three segments)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn pending_growth(&self) -> usize {
        self.pending_growth
    }

    /// Steer the head for the next move. A later call before moving overrides it.
    pub fn turn(&mut self, turn: TurnDirection) {
        self.body[0] = Segment::steered_head(turn);
    }

    /// Advance the snake by one cell.
    ///
    /// `grow_by` adds that many growth units to the pending amount. Each move
    /// releases at most one unit by keeping the old tail, so a snake fed once
    /// per tick passes `1` when it eats and `0` otherwise.
    ///
    /// On a self-collision the snake is left exactly as it was.
    pub fn move_snake(&mut self, grow_by: usize) -> Result<(), CollisionError> {
        let growth = self.pending_growth + grow_by;
        let len = self.body.len();

        let mut body = Vec::with_capacity(len + 1);
        body.push(Segment::Head);
        body.push(self.head().behind_head());
        body.extend_from_slice(&self.body[1..len - 2]);

        if growth > 0 {
            body.extend_from_slice(&self.body[len - 2..]);
        } else {
            body.push(self.body[len - 2].as_tail());
        }

        if let Some(index) = find_collision(&body) {
            return Err(CollisionError { index });
        }

        self.body = body;
        self.pending_growth = growth.saturating_sub(1);
        Ok(())
    }
}

impl Default for Snake {
    fn default() -> Self {
        Self::new(DEFAULT_SNAKE_LENGTH)
    }
}

/// Walk the body from a local origin and report the first overlap.
///
/// Returns the index of the segment whose step lands on a cell already
/// occupied by an earlier segment.
pub fn find_collision(body: &[Segment]) -> Option<usize> {
    let mut visited: HashMap<(i32, i32), usize> = HashMap::with_capacity(body.len());
    let (mut x, mut y) = (0, 0);
    let mut direction = Direction::Right;

    for (index, segment) in body.iter().enumerate() {
        if visited.insert((x, y), index).is_some() {
            return Some(index - 1);
        }

        if let Some(turn) = segment.traversal_turn() {
            direction = direction.turned(turn);
        }
        let (dx, dy) = direction.delta();
        x += dx;
        y += dy;
    }

    None
}
