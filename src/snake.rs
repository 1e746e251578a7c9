use std::collections::VecDeque;

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

/// Snake body, stored tail first with the head at the back.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Creates a vertical snake of `length` segments in `column`, entirely
    /// above the visible grid: rows `-length..=-1`, head at row `-1`.
    ///
    /// A zero `length` is treated as one.
    #[must_use]
    pub fn spawn_above(column: i32, length: usize) -> Self {
        let length = i32::try_from(length.max(1)).unwrap_or(i32::MAX);
        let body = (-length..0).map(|y| Position { x: column, y }).collect();
        Self { body }
    }

    /// Creates a snake from explicit body segments (front is tail, back is head).
    ///
    /// Returns `None` for an empty segment list.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }
        Some(Self {
            body: VecDeque::from(segments),
        })
    }

    /// Returns the cell the head would enter moving in `direction`.
    #[must_use]
    pub fn peek_next_head(&self, direction: Direction) -> Position {
        self.head().step(direction)
    }

    /// Returns true if any segment, head included, occupies `position`.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Pushes `new_head`; drops the tail unless the snake `grew`.
    pub fn advance(&mut self, new_head: Position, grew: bool) {
        self.body.push_back(new_head);
        if !grew {
            let _ = self.body.pop_front();
        }
    }

    /// Returns the most recently added segment.
    #[must_use]
    pub fn head(&self) -> Position {
        // The constructors never produce an empty body and `advance` pushes
        // before it pops.
        self.body.back().copied().unwrap_or(Position { x: 0, y: 0 })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from tail to head.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
