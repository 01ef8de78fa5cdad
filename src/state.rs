use std::time::Instant;

use crossterm::event::KeyCode;
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::Rng;

use crate::board::{Board, Cell};
use crate::clock::TickTimer;
use crate::collision::{classify, Collision};
use crate::config::{ConfigError, GameConfig};
use crate::input::direction_for;
use crate::snake::{Direction, Snake};
use crate::spawner::Spawner;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Over,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellRole {
    Empty,
    Snake,
    Collectible,
    Dead,
}

/// Drawing surface for the board. Implementations keep the last role written to each
/// cell until it is overwritten, and must tolerate cells outside the board.
pub trait Renderer {
    fn set_cell(&mut self, cell: Cell, role: CellRole);
    fn clear(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not due yet, or the game is over.
    Idle,
    Moved,
    Collected { spawned: Cell },
    /// A collectible was eaten but no free cell is left for a new one.
    BoardFull,
    Died(Collision),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Steered(Direction),
    Rejected(Direction),
    Restarted,
    Ignored,
}

/// The whole mutable state of one game.
pub struct GameState<R = StdRng> {
    config: GameConfig,
    board: Board,
    snake: Snake,
    collectibles: Vec<Cell>,
    status: Status,
    spawner: Spawner<R>,
    timer: TickTimer,
}

impl<R: Rng> GameState<R> {
    /// Validates `config` and sets up the first round, drawing it on `renderer`.
    pub fn new(config: GameConfig, rng: R, now: Instant, renderer: &mut impl Renderer) -> Result<Self, ConfigError> {
        config.validate()?;

        let board = Board::new(config.width, config.height);
        let mut state = GameState {
            snake: Snake::new(board.center(), config.initial_segments),
            timer: TickTimer::new(config.tick_delay, now),
            collectibles: vec![],
            status: Status::Running,
            spawner: Spawner::new(rng),
            board,
            config,
        };
        state.reset(now, renderer);
        Ok(state)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn collectibles(&self) -> &[Cell] {
        &self.collectibles
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status == Status::Over
    }

    pub fn reset(&mut self, now: Instant, renderer: &mut impl Renderer) {
        renderer.clear();

        self.snake = Snake::new(self.board.center(), self.config.initial_segments);
        renderer.set_cell(self.snake.head(), CellRole::Snake);

        self.collectibles.clear();
        match self.spawner.spawn(&self.board, &self.snake, &mut self.collectibles) {
            Some(cell) => renderer.set_cell(cell, CellRole::Collectible),
            None => warn!("No room for a collectible on a {}x{} board", self.board.width(), self.board.height()),
        }

        self.status = Status::Running;
        self.timer.mark(now);
        info!("New round: snake of {} at {:?}", self.snake.len(), self.snake.head());
    }

    /// Starts the tick delay over, e.g. after the game was paused.
    pub fn reset_timer(&mut self, now: Instant) {
        self.timer.mark(now);
    }

    /// Ends the round without a collision, e.g. when the caller declares a win on a full board.
    pub fn end(&mut self) {
        self.status = Status::Over;
    }

    /// Accepts a new pending direction unless it reverses the current one.
    pub fn steer(&mut self, direction: Direction) -> bool {
        self.snake.steer(direction)
    }

    pub fn on_key(&mut self, code: KeyCode, now: Instant, renderer: &mut impl Renderer) -> KeyOutcome {
        if let (KeyCode::Char(c), Some(restart)) = (code, self.config.restart_key) {
            if c == restart {
                info!("Restart requested");
                self.reset(now, renderer);
                return KeyOutcome::Restarted;
            }
        }

        match direction_for(&code) {
            Some(dir) if self.steer(dir) => KeyOutcome::Steered(dir),
            Some(dir) => {
                trace!("Ignoring reversal to {:?}", dir);
                KeyOutcome::Rejected(dir)
            },
            None => KeyOutcome::Ignored,
        }
    }

    /// Called once per frame. Runs a game step when the tick delay has elapsed.
    pub fn update(&mut self, now: Instant, renderer: &mut impl Renderer) -> TickOutcome {
        if self.is_over() || !self.timer.is_due(now) {
            return TickOutcome::Idle;
        }

        let outcome = self.step(renderer);
        self.timer.mark(now);
        outcome
    }

    /// One game step regardless of timing.
    pub fn step(&mut self, renderer: &mut impl Renderer) -> TickOutcome {
        if self.is_over() {
            return TickOutcome::Idle;
        }

        let direction = self.snake.commit_direction();
        let next_head = self.snake.next_head(direction);
        let collision = classify(next_head, &self.snake, &self.board);

        if collision.is_fatal() && !self.config.ignore_collisions {
            self.status = Status::Over;
            for pos in self.snake.body() {
                renderer.set_cell(*pos, CellRole::Dead);
            }
            info!("Game over: {:?} at {:?}, length {}", collision, next_head, self.snake.len());
            return TickOutcome::Died(collision);
        }

        match self.collectibles.iter().position(|c| *c == next_head) {
            Some(index) => {
                self.collectibles.swap_remove(index);
                let tail = self.snake.tail();
                self.snake.grow(Some(tail));
                self.move_snake(next_head, renderer);

                match self.spawner.spawn(&self.board, &self.snake, &mut self.collectibles) {
                    Some(spawned) => {
                        renderer.set_cell(spawned, CellRole::Collectible);
                        debug!("Collected {:?}, length {}, next at {:?}", next_head, self.snake.len(), spawned);
                        TickOutcome::Collected { spawned }
                    },
                    None => {
                        warn!("Board full at length {}", self.snake.len());
                        TickOutcome::BoardFull
                    },
                }
            },
            None => {
                self.move_snake(next_head, renderer);
                TickOutcome::Moved
            },
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn move_snake(&mut self, next_head: Cell, renderer: &mut impl Renderer) {
        let old_tail = self.snake.tail();
        self.snake.advance(next_head);

        // Collapsed or growing segments may still sit on the old tail cell
        if !self.snake.occupies(old_tail) {
            renderer.set_cell(old_tail, CellRole::Empty);
        }
        renderer.set_cell(next_head, CellRole::Snake);
    }
}
