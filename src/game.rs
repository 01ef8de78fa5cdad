use crossterm::event::{KeyCode, KeyEvent};
use log::info;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::board::Board;
use crate::clock::{Clock, Scheduler};
use crate::config::{ConfigError, GameConfig};
use crate::input::{is_ctrl_c, InputSource};
use crate::state::{GameState, KeyOutcome, Renderer, TickOutcome};
use crate::term::{Coords, TermManager};

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),
    #[error("terminal is {available:?} but the board needs {needed:?} (columns, rows)")]
    TerminalTooSmall { needed: Coords, available: Coords },
    #[error("could not start logging: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Everything the front end needs from the surface it plays on, besides drawing cells and reading keys.
pub trait Screen: Renderer + InputSource {
    fn setup(&mut self) -> crossterm::Result<()>;
    fn restore(&mut self) -> crossterm::Result<()>;
    fn read_key_blocking(&mut self) -> crossterm::Result<KeyEvent>;
    fn draw_borders(&mut self) -> crossterm::Result<()>;
    fn show_message(&mut self, lines: &[&str]) -> crossterm::Result<()>;
    fn hide_message(&mut self) -> crossterm::Result<()>;
    fn present(&mut self) -> crossterm::Result<()>;
}

/// Opens the terminal canvas for `config`, failing if the board can't be shown in full.
pub fn open_terminal(config: &GameConfig) -> Result<TermManager, GameError> {
    config.validate()?;
    let board = Board::new(config.width, config.height);
    let term = TermManager::new(board)?;
    if !term.fits() {
        return Err(GameError::TerminalTooSmall {
            needed: TermManager::required_size(&board),
            available: term.get_terminal_size(),
        });
    }
    Ok(term)
}

/// What the front end does with a key press.
enum Action {
    Quit,
    TogglePause,
    Game(KeyCode),
}

/// Session around a `GameState`: intro, pause, and end-of-round messages.
pub struct SnakeGame<T, C, S> {
    term: T,
    state: GameState<StdRng>,
    clock: C,
    scheduler: S,
    paused: bool,
}

impl<T: Screen, C: Clock, S: Scheduler> SnakeGame<T, C, S> {
    pub fn new(config: GameConfig, rng: StdRng, mut term: T, clock: C, scheduler: S) -> Result<Self, GameError> {
        let state = GameState::new(config, rng, clock.now(), &mut term)?;
        Ok(SnakeGame { term, state, clock, scheduler, paused: false })
    }

    pub fn initialize(&mut self) -> Result<(), GameError> {
        self.term.setup()?;
        self.term.draw_borders()?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<(), GameError> {
        self.term.restore()?;
        Ok(())
    }

    /// Returns `false` if the player quit from the intro screen.
    pub fn show_intro(&mut self) -> Result<bool, GameError> {
        let restart = self.restart_hint();
        let lines = [
            "Arrow keys or WASD to move",
            "Esc to pause",
            restart.as_str(),
            "CTRL+C to quit",
            "",
            "Press any key to begin",
        ];

        self.term.show_message(&lines)?;
        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(false);
        }

        self.term.hide_message()?;
        // The round was set up in `new`; only the wait on the intro must not count
        self.state.reset_timer(self.clock.now());
        self.term.present()?;
        Ok(true)
    }

    /// Runs frames until the player quits.
    pub fn play(&mut self) -> Result<(), GameError> {
        loop {
            self.scheduler.wait_frame();
            if !self.frame()? {
                return Ok(());
            }
        }
    }

    /// Handles the keys and the tick of one frame. Returns `false` once the player quits.
    pub fn frame(&mut self) -> Result<bool, GameError> {
        for key_ev in self.term.poll_keys()? {
            match self.action_for(&key_ev) {
                Action::Quit => {
                    info!("Quit requested");
                    return Ok(false);
                },
                Action::TogglePause => self.toggle_pause()?,
                Action::Game(code) => self.handle_key(code)?,
            }
        }

        if self.paused { return Ok(true); }

        match self.state.update(self.clock.now(), &mut self.term) {
            TickOutcome::Died(_) => {
                self.term.present()?;
                self.round_over("Game over!")?;
            },
            TickOutcome::BoardFull => {
                self.state.end();
                self.term.present()?;
                self.round_over("You won!")?;
            },
            TickOutcome::Idle | TickOutcome::Moved | TickOutcome::Collected { .. } => {},
        }

        self.term.present()?;
        Ok(true)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn action_for(&self, ev: &KeyEvent) -> Action {
        if is_ctrl_c(ev) {
            Action::Quit
        } else if ev.code == KeyCode::Esc && !self.state.is_over() {
            Action::TogglePause
        } else {
            Action::Game(ev.code)
        }
    }

    fn is_restart_key(&self, code: KeyCode) -> bool {
        match (code, self.state.config().restart_key) {
            (KeyCode::Char(c), Some(key)) => c == key,
            _ => false,
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<(), GameError> {
        let now = self.clock.now();

        // Without a restart key, any key starts the next round once this one is over
        if self.state.is_over() && self.state.config().restart_key.is_none() {
            self.state.reset(now, &mut self.term);
            return self.resume();
        }

        // Steering waits while paused, restarting doesn't
        if self.paused && !self.is_restart_key(code) {
            return Ok(());
        }

        if let KeyOutcome::Restarted = self.state.on_key(code, now, &mut self.term) {
            return self.resume();
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<(), GameError> {
        self.paused = false;
        self.term.hide_message()?;
        self.term.present()?;
        Ok(())
    }

    fn round_over(&mut self, headline: &str) -> Result<(), GameError> {
        let restart = self.restart_hint();
        self.term.show_message(&[headline, "", restart.as_str(), "or CTRL+C to quit."])?;
        Ok(())
    }

    fn restart_hint(&self) -> String {
        match self.state.config().restart_key {
            Some(' ') => "Space to restart".to_string(),
            Some(key) => format!("'{}' to restart", key),
            None => "Any key to restart after a game over".to_string(),
        }
    }

    fn toggle_pause(&mut self) -> Result<(), GameError> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            self.term.hide_message()?;
            // Don't count the paused time as elapsed
            self.state.reset_timer(self.clock.now());
        }

        self.paused = !self.paused;
        info!("Paused: {}", self.paused);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as TimeCell;
    use std::collections::{HashMap, VecDeque};
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    use crossterm::event::KeyModifiers;
    use rand::SeedableRng;

    use crate::board::Cell;
    use crate::state::{CellRole, Status};

    #[derive(Default)]
    struct FakeScreen {
        cells: HashMap<Cell, CellRole>,
        keys: VecDeque<KeyEvent>,
        message: Option<Vec<String>>,
    }

    impl Renderer for FakeScreen {
        fn set_cell(&mut self, cell: Cell, role: CellRole) {
            self.cells.insert(cell, role);
        }

        fn clear(&mut self) {
            self.cells.clear();
        }
    }

    impl InputSource for FakeScreen {
        fn poll_keys(&mut self) -> crossterm::Result<Vec<KeyEvent>> {
            Ok(self.keys.drain(..).collect())
        }
    }

    impl Screen for FakeScreen {
        fn setup(&mut self) -> crossterm::Result<()> { Ok(()) }
        fn restore(&mut self) -> crossterm::Result<()> { Ok(()) }
        fn draw_borders(&mut self) -> crossterm::Result<()> { Ok(()) }

        fn read_key_blocking(&mut self) -> crossterm::Result<KeyEvent> {
            Ok(self.keys.pop_front().unwrap_or_else(|| key(KeyCode::Enter)))
        }

        fn show_message(&mut self, lines: &[&str]) -> crossterm::Result<()> {
            self.message = Some(lines.iter().map(|l| l.to_string()).collect());
            Ok(())
        }

        fn hide_message(&mut self) -> crossterm::Result<()> {
            self.message = None;
            Ok(())
        }

        fn present(&mut self) -> crossterm::Result<()> { Ok(()) }
    }

    #[derive(Clone)]
    struct ManualClock(Rc<TimeCell<Instant>>);

    impl ManualClock {
        fn advance(&self, ms: u64) {
            self.0.set(self.0.get() + Duration::from_millis(ms));
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.0.get()
        }
    }

    struct NoWait;

    impl Scheduler for NoWait {
        fn wait_frame(&mut self) {}
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE }
    }

    fn game(config: GameConfig) -> (SnakeGame<FakeScreen, ManualClock, NoWait>, ManualClock) {
        let clock = ManualClock(Rc::new(TimeCell::new(Instant::now())));
        let game = SnakeGame::new(config, StdRng::seed_from_u64(9), FakeScreen::default(), clock.clone(), NoWait).unwrap();
        (game, clock)
    }

    fn press(game: &mut SnakeGame<FakeScreen, ManualClock, NoWait>, code: KeyCode) -> bool {
        game.term.keys.push_back(key(code));
        game.frame().unwrap()
    }

    /// Runs the snake into the right wall of the default 20 wide board.
    fn crash(game: &mut SnakeGame<FakeScreen, ManualClock, NoWait>, clock: &ManualClock) {
        for _ in 0..20 {
            clock.advance(100);
            game.frame().unwrap();
        }
        assert_eq!(game.state.status(), Status::Over);
    }

    #[test]
    fn intro_does_not_start_a_second_round() {
        let (mut game, clock) = game(GameConfig::default());
        let first_apple = game.state.collectibles().to_vec();

        clock.advance(5_000);
        assert!(game.show_intro().unwrap());

        assert_eq!(game.state.collectibles(), &first_apple[..]);
        assert!(game.term.message.is_none());
        // Time spent on the intro screen doesn't trigger a move
        assert!(game.frame().unwrap());
        assert_eq!(game.state.snake().head(), Cell::new(10, 7));
    }

    #[test]
    fn ctrl_c_on_intro_quits() {
        let (mut game, _) = game(GameConfig::default());
        game.term.keys.push_back(KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL });

        assert!(!game.show_intro().unwrap());
    }

    #[test]
    fn restart_key_works_while_paused() {
        let (mut game, clock) = game(GameConfig::default());
        clock.advance(100);
        game.frame().unwrap();
        assert_eq!(game.state.snake().head(), Cell::new(11, 7));

        press(&mut game, KeyCode::Esc);
        assert!(game.paused);
        assert!(game.term.message.is_some());

        press(&mut game, KeyCode::Char(' '));

        assert!(!game.paused);
        assert!(game.term.message.is_none());
        assert_eq!(game.state.snake().head(), Cell::new(10, 7));
        assert_eq!(game.state.collectibles().len(), 1);
    }

    #[test]
    fn steering_is_ignored_while_paused() {
        let (mut game, _) = game(GameConfig::default());

        press(&mut game, KeyCode::Esc);
        press(&mut game, KeyCode::Up);

        assert!(game.paused);
        assert_eq!(game.state.snake().pending_direction(), crate::snake::Direction::Right);
    }

    #[test]
    fn unpausing_restarts_the_tick_delay() {
        let (mut game, clock) = game(GameConfig::default());

        press(&mut game, KeyCode::Esc);
        clock.advance(1_000);
        game.frame().unwrap();
        press(&mut game, KeyCode::Esc);
        assert!(!game.paused);

        // Paused time doesn't count, so nothing moves until a full delay has passed
        assert_eq!(game.state.snake().head(), Cell::new(10, 7));
        clock.advance(99);
        game.frame().unwrap();
        assert_eq!(game.state.snake().head(), Cell::new(10, 7));
        clock.advance(1);
        game.frame().unwrap();
        assert_eq!(game.state.snake().head(), Cell::new(11, 7));
    }

    #[test]
    fn game_over_shows_message() {
        let (mut game, clock) = game(GameConfig::default());

        crash(&mut game, &clock);

        let message = game.term.message.clone().unwrap();
        assert_eq!(message[0], "Game over!");
        assert_eq!(game.term.cells.get(&game.state.snake().head()), Some(&CellRole::Dead));
    }

    #[test]
    fn any_key_restarts_after_game_over_without_restart_key() {
        let (mut game, clock) = game(GameConfig { restart_key: None, ..GameConfig::default() });
        crash(&mut game, &clock);

        press(&mut game, KeyCode::Char('x'));

        assert_eq!(game.state.status(), Status::Running);
        assert_eq!(game.state.snake().len(), 3);
        assert_eq!(game.state.collectibles().len(), 1);
        assert!(game.term.message.is_none());
    }

    #[test]
    fn other_keys_do_not_restart_when_restart_key_is_set() {
        let (mut game, clock) = game(GameConfig::default());
        crash(&mut game, &clock);

        press(&mut game, KeyCode::Char('x'));
        assert_eq!(game.state.status(), Status::Over);

        press(&mut game, KeyCode::Char(' '));
        assert_eq!(game.state.status(), Status::Running);
    }

    #[test]
    fn full_board_ends_the_round_as_a_win() {
        // 1x2 board: the snake starts on (0,1) and the only free cell (0,0) holds the apple
        let config = GameConfig { width: 1, height: 2, initial_segments: 1, ..GameConfig::default() };
        let (mut game, clock) = game(config);
        assert_eq!(game.state.collectibles(), &[Cell::new(0, 0)]);

        press(&mut game, KeyCode::Up);
        clock.advance(100);
        game.frame().unwrap();

        assert_eq!(game.state.status(), Status::Over);
        assert_eq!(game.state.snake().body(), &[Cell::new(0, 0), Cell::new(0, 1)]);
        assert_eq!(game.term.message.clone().unwrap()[0], "You won!");

        // Nothing moves once the round is won
        clock.advance(100);
        game.frame().unwrap();
        assert_eq!(game.state.snake().head(), Cell::new(0, 0));
    }

    #[test]
    fn ctrl_c_quits_from_play() {
        let (mut game, _) = game(GameConfig::default());
        game.term.keys.push_back(KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL });

        assert!(!game.frame().unwrap());

        game.term.keys.push_back(KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL });
        assert!(game.play().is_ok());
    }
}
