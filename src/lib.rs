pub mod app;
pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod item;
pub mod obstacle;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod spawn;
pub mod terminal_runtime;
pub mod ui;
