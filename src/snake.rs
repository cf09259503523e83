use std::collections::VecDeque;

use log::debug;

use crate::display::{FrameBuffer, Renderable};
use crate::error::{GameError, Result};
use crate::events::{Event, HasListeners, ListenerHandle, Listeners};
use crate::grid::{Cell, Grid};
use crate::input::{Direction, direction_change_is_valid};

/// Default glyph for body segments.
pub const DEFAULT_BODY_GLYPH: char = 'X';

/// The player-controlled snake: ordered body segments (front is head) and a heading.
#[derive(Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
    last_dropped_tail: Option<Cell>,
    glyph: char,
    listeners: Listeners<Snake>,
}

impl Snake {
    /// Creates a one-cell snake at `start` with the provided direction.
    #[must_use]
    pub fn new(start: Cell, direction: Direction) -> Self {
        Self {
            body: VecDeque::from([start]),
            direction,
            last_dropped_tail: None,
            glyph: DEFAULT_BODY_GLYPH,
            listeners: Listeners::default(),
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    pub fn from_segments(segments: Vec<Cell>, direction: Direction) -> Result<Self> {
        if segments.is_empty() {
            return Err(GameError::EmptySnake);
        }

        Ok(Self {
            body: VecDeque::from(segments),
            direction,
            last_dropped_tail: None,
            glyph: DEFAULT_BODY_GLYPH,
            listeners: Listeners::default(),
        })
    }

    /// Builds a straight snake heading right, its body trailing left of `head`.
    pub fn horizontal(head: Cell, length: usize, grid: &Grid) -> Result<Self> {
        if length > usize::from(grid.width()) {
            return Err(GameError::GridTooSmall {
                width: grid.width(),
                height: grid.height(),
                length,
            });
        }

        let segments = (0..length)
            .map(|offset| {
                let offset = i32::try_from(offset).unwrap_or(i32::MAX);
                grid.wrap(Cell::new(head.x.saturating_sub(offset), head.y))
            })
            .collect();

        Self::from_segments(segments, Direction::Right)
    }

    #[must_use]
    pub fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    /// Where the head moves on the next step, wrapped into `grid`. Pure.
    #[must_use]
    pub fn next_head(&self, grid: &Grid) -> Cell {
        let head = self.head();
        let next = match self.direction {
            Direction::Up => Cell::new(head.x, head.y - 1),
            Direction::Down => Cell::new(head.x, head.y + 1),
            Direction::Left => Cell::new(head.x - 1, head.y),
            Direction::Right => Cell::new(head.x + 1, head.y),
        };
        grid.wrap(next)
    }

    /// Turns onto the other axis. Same-axis requests, reversals included, are ignored.
    pub fn change_direction(&mut self, requested: Direction) -> bool {
        if !direction_change_is_valid(self.direction, requested) {
            debug!(
                "ignoring turn {:?} while heading {:?}",
                requested, self.direction
            );
            return false;
        }

        self.direction = requested;
        true
    }

    /// Moves one cell: drops the tail (remembering it) and pushes a new head.
    pub fn step(&mut self, grid: &Grid) {
        let next_head = self.next_head(grid);
        self.last_dropped_tail = self.body.pop_back();
        self.body.push_front(next_head);
    }

    /// Restores the tail dropped by the last step, lengthening the snake by one.
    pub fn grow(&mut self) -> bool {
        match self.last_dropped_tail.take() {
            Some(tail) => {
                self.body.push_back(tail);
                true
            }
            None => false,
        }
    }

    /// Registers `callback` for the bus event `name`.
    pub fn register_listener<F>(&mut self, name: &str, callback: F) -> ListenerHandle
    where
        F: Fn(Event<'_, Snake>) + 'static,
    {
        self.listeners.register(name, callback)
    }

    pub fn unregister_listener(&mut self, handle: &ListenerHandle) -> bool {
        self.listeners.unregister(handle)
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Cell {
        // Every constructor guarantees at least one segment and step() pushes before returning.
        self.body[0]
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Returns true if the head overlaps a segment past the first `skip` ones.
    ///
    /// `skip` must be at least 1: segment 0 is the head itself, so `skip == 0`
    /// always reports a hit. `GameConfig::validate` rejects that value.
    #[must_use]
    pub fn head_hits_body(&self, skip: usize) -> bool {
        let head = self.head();
        self.body.iter().skip(skip).any(|segment| *segment == head)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a live snake; provided alongside `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn last_dropped_tail(&self) -> Option<Cell> {
        self.last_dropped_tail
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }
}

impl HasListeners for Snake {
    fn listeners_mut(&mut self) -> &mut Listeners<Self> {
        &mut self.listeners
    }
}

impl Renderable for Snake {
    fn render(&self, buffer: &mut FrameBuffer) {
        for segment in &self.body {
            buffer.set(*segment, self.glyph);
        }
    }
}
