use std::collections::VecDeque;

use crate::config::GridSize;
use crate::input::Direction;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Result of one attempted movement step.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MoveOutcome {
    Moved,
    HitWall,
    HitSelf,
    /// The snake was already dead; nothing changed.
    Dead,
}

/// Mutable snake state: body, heading and pending growth.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending_direction: Direction,
    grow: bool,
    alive: bool,
}

impl Snake {
    /// Creates a snake of `length` segments with its head at `head`, the rest
    /// trailing behind it opposite to `direction`.
    #[must_use]
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        debug_assert!(length > 0, "snake needs at least one segment");

        let behind = direction.opposite();
        let mut body = VecDeque::with_capacity(length);
        let mut cell = head;
        for _ in 0..length.max(1) {
            body.push_back(cell);
            cell = cell.step(behind);
        }

        Self::from_segments(body.into(), direction)
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        debug_assert!(!segments.is_empty(), "snake body must not be empty");

        Self {
            body: VecDeque::from(segments),
            direction,
            pending_direction: direction,
            grow: false,
            alive: true,
        }
    }

    /// Requests a heading change for the next move. Reversals onto the neck
    /// are ignored.
    pub fn change_direction(&mut self, direction: Direction) {
        if direction == self.direction.opposite() {
            return;
        }
        self.pending_direction = direction;
    }

    /// Returns the head position for the next movement step.
    #[must_use]
    pub fn peek_next_head(&self) -> Position {
        self.head().step(self.pending_direction)
    }

    /// Queues growth; the extra segment appears on the next successful move.
    pub fn grow(&mut self) {
        self.grow = true;
    }

    /// Advances one cell, checking walls and the body before committing.
    ///
    /// The tail cell counts as free because it is vacated this same step,
    /// unless growth is pending, in which case it stays and blocks the head.
    /// A failed move leaves the body untouched and kills the snake.
    pub fn move_forward(&mut self, bounds: GridSize) -> MoveOutcome {
        if !self.alive {
            return MoveOutcome::Dead;
        }

        self.direction = self.pending_direction;
        let next_head = self.head().step(self.direction);

        if !next_head.is_within_bounds(bounds) {
            self.alive = false;
            return MoveOutcome::HitWall;
        }

        let blocking = if self.grow {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        if self.body.iter().take(blocking).any(|cell| *cell == next_head) {
            self.alive = false;
            return MoveOutcome::HitSelf;
        }

        self.body.push_front(next_head);
        if self.grow {
            self.grow = false;
        } else {
            let _ = self.body.pop_back();
        }

        MoveOutcome::Moved
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the direction of the last committed move.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn is_growing(&self) -> bool {
        self.grow
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
