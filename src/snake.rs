use std::collections::VecDeque;

use crate::grid::{GridSize, Position};
use crate::input::{Direction, direction_change_is_valid};

/// Segment count of a freshly spawned snake.
pub const INITIAL_LENGTH: usize = 3;

/// Which two sides a bend connects.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CornerKind {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Drawing shape of one body segment, derived from its neighbours.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SegmentShape {
    /// Facing the way the head last moved.
    Head(Direction),
    /// Pointing away from the segment before it.
    Tail(Direction),
    Horizontal,
    Vertical,
    Corner(CornerKind),
}

/// Mutable snake state and movement buffering behavior.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending_direction: Option<Direction>,
    grow: bool,
    origin: Position,
    origin_direction: Direction,
}

impl Snake {
    /// Creates a three-segment snake with its head at `origin`, trailing
    /// behind it against `direction`.
    #[must_use]
    pub fn new(origin: Position, direction: Direction) -> Self {
        Self {
            body: initial_body(origin, direction),
            direction,
            pending_direction: None,
            grow: false,
            origin,
            origin_direction: direction,
        }
    }

    /// Creates the standard snake: centered, heading right.
    #[must_use]
    pub fn centered(bounds: GridSize) -> Self {
        Self::new(bounds.center(), Direction::Right)
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// `reset` returns it to a three-segment snake at the given head. An empty
    /// list gives the standard snake at the origin cell.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        let origin = segments.first().copied().unwrap_or(Position::new(0, 0));
        let mut snake = Self {
            body: VecDeque::from(segments),
            direction,
            pending_direction: None,
            grow: false,
            origin,
            origin_direction: direction,
        };

        if snake.is_empty() {
            snake.body = initial_body(origin, direction);
        }
        snake
    }

    /// Buffers a turn for the next tick.
    ///
    /// Reversals of the current direction are ignored. Otherwise the request
    /// replaces any turn already buffered since the last tick.
    pub fn set_direction(&mut self, direction: Direction) {
        if !direction_change_is_valid(self.direction, direction) {
            return;
        }
        self.pending_direction = Some(direction);
    }

    /// Queues growth on the next movement tick.
    pub fn grow(&mut self) {
        self.grow = true;
    }

    /// Applies the buffered turn and moves one cell, keeping the tail when
    /// growth is pending.
    pub fn advance(&mut self) {
        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }

        let next_head = self.head().step(self.direction);
        self.body.push_front(next_head);
        if self.grow {
            self.grow = false;
        } else {
            let _ = self.body.pop_back();
        }
    }

    /// Restores the spawn layout and heading.
    pub fn reset(&mut self) {
        self.body = initial_body(self.origin, self.origin_direction);
        self.direction = self.origin_direction;
        self.pending_direction = None;
        self.grow = false;
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
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

    /// Returns the current movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Turn that the next `advance` will apply, if any.
    #[must_use]
    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    #[must_use]
    pub fn is_growing(&self) -> bool {
        self.grow
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    /// Pairs every segment with its drawing shape, head first.
    #[must_use]
    pub fn segment_shapes(&self) -> Vec<(Position, SegmentShape)> {
        let last = self.body.len().saturating_sub(1);

        self.body
            .iter()
            .enumerate()
            .map(|(index, &segment)| {
                let shape = if index == 0 {
                    let heading = self
                        .body
                        .get(1)
                        .and_then(|neck| direction_between(*neck, segment))
                        .unwrap_or(self.direction);
                    SegmentShape::Head(heading)
                } else if index == last {
                    let pointing = direction_between(self.body[index - 1], segment)
                        .unwrap_or(self.direction);
                    SegmentShape::Tail(pointing)
                } else {
                    body_shape(self.body[index + 1], segment, self.body[index - 1])
                };
                (segment, shape)
            })
            .collect()
    }
}

fn initial_body(origin: Position, direction: Direction) -> VecDeque<Position> {
    let behind = direction.opposite();
    let mut body = VecDeque::with_capacity(INITIAL_LENGTH);
    let mut cursor = origin;
    for _ in 0..INITIAL_LENGTH {
        body.push_back(cursor);
        cursor = cursor.step(behind);
    }
    body
}

fn direction_between(from: Position, to: Position) -> Option<Direction> {
    Direction::from_delta(to.x - from.x, to.y - from.y)
}

/// Classifies a middle segment by where its two neighbours sit.
fn body_shape(previous: Position, segment: Position, next: Position) -> SegmentShape {
    let to_previous = (previous.x - segment.x, previous.y - segment.y);
    let to_next = (next.x - segment.x, next.y - segment.y);

    if to_previous.0 == to_next.0 {
        return SegmentShape::Vertical;
    }
    if to_previous.1 == to_next.1 {
        return SegmentShape::Horizontal;
    }

    let dx = to_previous.0 + to_next.0;
    let dy = to_previous.1 + to_next.1;
    let corner = match (dx, dy) {
        (-1, -1) => CornerKind::TopLeft,
        (1, -1) => CornerKind::TopRight,
        (-1, 1) => CornerKind::BottomLeft,
        _ => CornerKind::BottomRight,
    };
    SegmentShape::Corner(corner)
}
