//! Level-based arcade Snake: a pure simulation core (snake, food, levels,
//! effects, session) driven by a screen state machine, with crossterm and
//! ratatui adapters for the terminal front end.

pub mod app;
pub mod audio;
pub mod clock;
pub mod config;
pub mod effect;
pub mod food;
pub mod game;
pub mod input;
pub mod level;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
