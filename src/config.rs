use std::{path::PathBuf, time::Duration};

use clap::Parser;
use thiserror::Error;

use crate::input::direction_for;
use crossterm::event::KeyCode;

pub const DEFAULT_WIDTH: i32 = 20;
pub const DEFAULT_HEIGHT: i32 = 15;
pub const DEFAULT_SEGMENTS: usize = 3;
pub const DEFAULT_TICK_MS: u64 = 100;
pub const DEFAULT_RESTART_KEY: char = ' ';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board must be at least 1x1, got {width}x{height}")]
    BadDimensions { width: i32, height: i32 },
    #[error("the snake needs at least one segment")]
    NoSegments,
    #[error("{segments} segments don't fit on a board of {cells} cells")]
    TooManySegments { segments: usize, cells: u64 },
    #[error("tick delay must be greater than zero")]
    ZeroDelay,
    #[error("restart key {0:?} is already used for steering")]
    RestartKeyConflict(char),
}

/// Everything that shapes a game. Fixed once the game starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub initial_segments: usize,
    pub tick_delay: Duration,
    pub restart_key: Option<char>,
    /// Walls and the snake's own body stop being fatal.
    pub ignore_collisions: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            initial_segments: DEFAULT_SEGMENTS,
            tick_delay: Duration::from_millis(DEFAULT_TICK_MS),
            restart_key: Some(DEFAULT_RESTART_KEY),
            ignore_collisions: false,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::BadDimensions { width: self.width, height: self.height });
        }
        if self.initial_segments == 0 {
            return Err(ConfigError::NoSegments);
        }
        let cells = self.width as u64 * self.height as u64;
        if self.initial_segments as u64 > cells {
            return Err(ConfigError::TooManySegments { segments: self.initial_segments, cells });
        }
        if self.tick_delay == Duration::from_millis(0) {
            return Err(ConfigError::ZeroDelay);
        }
        if let Some(key) = self.restart_key {
            if direction_for(&KeyCode::Char(key)).is_some() {
                return Err(ConfigError::RestartKeyConflict(key));
            }
        }
        Ok(())
    }
}

/// Grid snake in the terminal. Arrow keys or WASD to steer.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Board width in cells
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: i32,
    /// Board height in cells
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: i32,
    /// Number of segments the snake starts with
    #[arg(long, default_value_t = DEFAULT_SEGMENTS)]
    pub segments: usize,
    /// Milliseconds between snake moves
    #[arg(long = "tick-ms", value_name = "MILLISECONDS", default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,
    /// Key that restarts the game at any time
    #[arg(long, default_value_t = DEFAULT_RESTART_KEY, conflicts_with = "no_restart_key")]
    pub restart_key: char,
    /// Disable the restart key; any key starts a new round after a game over
    #[arg(long)]
    pub no_restart_key: bool,
    /// Walls and the snake's own body are no longer fatal
    #[arg(long)]
    pub ignore_collisions: bool,
    /// Seed for collectible placement
    #[arg(long)]
    pub seed: Option<u64>,
    /// Where log output goes, since the terminal is taken by the game
    #[arg(long, value_name = "PATH", default_value = "snake.log")]
    pub log_file: PathBuf,
    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
        let config = GameConfig {
            width: self.width,
            height: self.height,
            initial_segments: self.segments,
            tick_delay: Duration::from_millis(self.tick_ms),
            restart_key: if self.no_restart_key { None } else { Some(self.restart_key) },
            ignore_collisions: self.ignore_collisions,
        };
        config.validate()?;
        Ok(config)
    }
}
