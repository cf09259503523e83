pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod snake;
pub mod terminal_runtime;

pub use error::{GameError, Result};
