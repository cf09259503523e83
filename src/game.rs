use std::cell::{Ref, RefCell};
use std::rc::Rc;

use log::{debug, info};
use rand::RngCore;

use crate::config::GameConfig;
use crate::display::{Display, TextFrame};
use crate::error::{GameError, Result};
use crate::events::EventPayload;
use crate::food::Food;
use crate::grid::{Cell, Grid, OccupiedSet};
use crate::input::{Direction, GameInput};
use crate::snake::Snake;

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameOverReason {
    /// The head ran into the body.
    SelfCollision,
    /// No free cell was left for the next food item.
    BoardFilled,
    /// The player asked to quit.
    Interrupted,
}

/// Result of one movement tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    Continue,
    GameOver(GameOverReason),
}

/// Drives one session: owns the grid, the display, and the shared entities.
pub struct Game {
    grid: Grid,
    display: Display,
    snake: Rc<RefCell<Snake>>,
    food: Rc<RefCell<Food>>,
    rng: Box<dyn RngCore>,
    collision_skip: usize,
    ticks: u64,
    foods_eaten: u32,
}

impl Game {
    /// Places a centered snake heading right and the first food item.
    pub fn new(grid: Grid, config: &GameConfig, rng: Box<dyn RngCore>) -> Result<Self> {
        let center = Cell::new(
            i32::from(grid.width().div_ceil(2)),
            i32::from(grid.height().div_ceil(2)),
        );
        let snake = Snake::horizontal(grid.wrap(center), config.initial_length, &grid)?;
        Self::with_snake(grid, config, snake, rng)
    }

    /// Starts a session from an explicit snake; food goes on a random free cell.
    pub fn with_snake(
        grid: Grid,
        config: &GameConfig,
        snake: Snake,
        mut rng: Box<dyn RngCore>,
    ) -> Result<Self> {
        if snake.len() >= grid.total_cells() {
            return Err(GameError::GridTooSmall {
                width: grid.width(),
                height: grid.height(),
                length: snake.len(),
            });
        }

        let occupied = OccupiedSet::from_cells(snake.segments());
        let food = Food::spawn(&grid, &occupied, &mut rng)?;
        let mut game = Self::assemble(grid, config, snake, food, rng);
        game.wire_direction_listeners();

        info!(
            "new game on {}x{} grid, snake length {}, food at {:?}",
            game.grid.width(),
            game.grid.height(),
            game.snake.borrow().len(),
            game.food.borrow().cell()
        );
        Ok(game)
    }

    /// Starts a session with both the snake and the food placed by the caller.
    pub fn with_entities(
        grid: Grid,
        config: &GameConfig,
        snake: Snake,
        food: Food,
        rng: Box<dyn RngCore>,
    ) -> Self {
        let mut game = Self::assemble(grid, config, snake, food, rng);
        game.wire_direction_listeners();
        game
    }

    fn assemble(
        grid: Grid,
        config: &GameConfig,
        snake: Snake,
        food: Food,
        rng: Box<dyn RngCore>,
    ) -> Self {
        let display = Display::new(grid.width(), grid.height(), config.background_glyph);

        Self {
            grid,
            display,
            snake: Rc::new(RefCell::new(snake.with_glyph(config.body_glyph))),
            food: Rc::new(RefCell::new(food.with_glyph(config.food_glyph))),
            rng,
            collision_skip: config.collision_skip,
            ticks: 0,
            foods_eaten: 0,
        }
    }

    fn wire_direction_listeners(&mut self) {
        {
            let mut snake = self.snake.borrow_mut();
            for direction in Direction::ALL {
                snake.register_listener(direction.event_name(), |event| {
                    if let Some(requested) = Direction::from_event_name(event.name) {
                        event.target.change_direction(requested);
                    }
                });
            }
        }

        // Food first so the snake draws over it.
        self.display.register_renderable(self.food.clone());
        self.display.register_renderable(self.snake.clone());
        self.display.register_listenable(self.snake.clone());
    }

    /// Routes one input. Returns a terminal outcome when the input ends the game.
    pub fn handle_input(&mut self, input: GameInput) -> Option<TickOutcome> {
        match input {
            GameInput::Direction(direction) => {
                self.display.trigger(
                    direction.event_name(),
                    EventPayload::Direction(direction),
                );
                None
            }
            GameInput::Quit => Some(TickOutcome::GameOver(GameOverReason::Interrupted)),
        }
    }

    /// Advances the snake one cell, handles eating, then checks for self-collision.
    pub fn tick(&mut self) -> TickOutcome {
        self.ticks += 1;
        let mut snake = self.snake.borrow_mut();
        snake.step(&self.grid);
        let head = snake.head();

        let mut food = self.food.borrow_mut();
        if head == food.cell() {
            let mut occupied = OccupiedSet::from_cells(snake.segments());
            occupied.insert(snake.next_head(&self.grid));
            if let Some(tail) = snake.last_dropped_tail() {
                occupied.insert(tail);
            }

            let Ok(cell) = self.grid.random_free_cell(&occupied, &mut self.rng) else {
                snake.grow();
                info!(
                    "board filled at length {} after {} ticks",
                    snake.len(),
                    self.ticks
                );
                return TickOutcome::GameOver(GameOverReason::BoardFilled);
            };
            food.reposition(cell);
            snake.grow();
            self.foods_eaten += 1;
            debug!(
                "ate food at {head:?}, length now {}, next food at {:?}",
                snake.len(),
                food.cell()
            );
        }

        if snake.head_hits_body(self.collision_skip) {
            info!(
                "self collision at {head:?} after {} ticks, length {}",
                self.ticks,
                snake.len()
            );
            return TickOutcome::GameOver(GameOverReason::SelfCollision);
        }

        TickOutcome::Continue
    }

    /// Composites the current state into a text frame.
    #[must_use]
    pub fn render_frame(&self) -> TextFrame {
        self.display.render_frame()
    }

    #[must_use]
    pub fn display(&self) -> &Display {
        &self.display
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn snake(&self) -> Ref<'_, Snake> {
        self.snake.borrow()
    }

    #[must_use]
    pub fn food(&self) -> Food {
        *self.food.borrow()
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn foods_eaten(&self) -> u32 {
        self.foods_eaten
    }
}
