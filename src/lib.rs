//! Grid snake: the game core plus a crossterm front end.
//!
//! `state::GameState` holds all game logic and talks to the outside world only through
//! the `Renderer`, `InputSource`, `Scheduler` and `Clock` traits.

pub mod board;
pub mod clock;
pub mod collision;
pub mod config;
pub mod game;
pub mod input;
pub mod snake;
pub mod spawner;
pub mod state;
pub mod term;
