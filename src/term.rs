use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

use crate::board::{Board, Cell};
use crate::game::Screen;
use crate::input::InputSource;
use crate::state::{CellRole, Renderer};

pub type TermInt = u16;
pub type Coords = (u16, u16);

// Every board cell is two terminal columns wide so cells look roughly square
const CELL_COLUMNS: TermInt = 2;

const EMPTY_COLOUR: Color = Color::Rgb { r: 0xbf, g: 0xbf, b: 0xbf };
const SNAKE_COLOUR: Color = Color::Rgb { r: 0x00, g: 0x82, b: 0x23 };
const COLLECTIBLE_COLOUR: Color = Color::Rgb { r: 0xbd, g: 0x00, b: 0x00 };
const DEAD_COLOUR: Color = Color::Rgb { r: 0x1c, g: 0x1c, b: 0x1c };

#[derive(Copy, Clone, Debug, PartialEq)]
struct Glyph {
    ch: char,
    bg: Option<Color>,
}

impl Glyph {
    const BLANK: Glyph = Glyph { ch: ' ', bg: None };

    fn plain(ch: char) -> Self {
        Glyph { ch, bg: None }
    }

    fn for_role(role: CellRole) -> Self {
        let bg = match role {
            CellRole::Empty => EMPTY_COLOUR,
            CellRole::Snake => SNAKE_COLOUR,
            CellRole::Collectible => COLLECTIBLE_COLOUR,
            CellRole::Dead => DEAD_COLOUR,
        };
        Glyph { ch: ' ', bg: Some(bg) }
    }
}

/// Terminal canvas. Board cells are buffered and only written out on `present`,
/// so the game core can draw without dealing with I/O errors.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Glyph>,
    dirty: Vec<Coords>,
    board: Board,
    origin: Coords,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new(board: Board) -> crossterm::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager::with_size(board, width, height))
    }

    fn with_size(board: Board, width: TermInt, height: TermInt) -> Self {
        let (outer_w, outer_h) = TermManager::required_size(&board);
        let origin = (
            width.saturating_sub(outer_w) / 2 + 1,
            height.saturating_sub(outer_h) / 2 + 1,
        );
        let screen = vec![Glyph::BLANK; width as usize * height as usize];
        TermManager { width, height, stdout: stdout(), screen, dirty: vec![], board, origin, current_msg: None }
    }

    /// Terminal size needed for the board plus its border.
    pub fn required_size(board: &Board) -> Coords {
        let w = board.width() as i64 * CELL_COLUMNS as i64 + 2;
        let h = board.height() as i64 + 2;
        (w.min(TermInt::MAX as i64) as TermInt, h.min(TermInt::MAX as i64) as TermInt)
    }

    pub fn fits(&self) -> bool {
        let (w, h) = TermManager::required_size(&self.board);
        w <= self.width && h <= self.height
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    pub fn flush(&mut self) -> crossterm::Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: Coords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    fn glyph_at(&self, pos: Coords) -> Option<Glyph> {
        self.index(pos).map(|i| self.screen[i])
    }

    /// Terminal position of the left column of a board cell, if it is on the board.
    fn cell_origin(&self, cell: Cell) -> Option<Coords> {
        if !self.board.in_bounds(cell) {
            return None;
        }
        let x = self.origin.0 as i64 + cell.x as i64 * CELL_COLUMNS as i64;
        let y = self.origin.1 as i64 + cell.y as i64;
        if x + (CELL_COLUMNS as i64) > self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((x as TermInt, y as TermInt))
    }

    fn store(&mut self, pos: Coords, glyph: Glyph) {
        if let Some(i) = self.index(pos) {
            if self.screen[i] != glyph {
                self.screen[i] = glyph;
                self.dirty.push(pos);
            }
        }
    }

    fn print_at(&mut self, pos: Coords, glyph: Glyph) -> crossterm::Result<()> {
        if let Some(i) = self.index(pos) {
            self.screen[i] = glyph;
        }
        self.print_at_no_save(pos, glyph)
    }

    fn print_at_no_save(&mut self, pos: Coords, glyph: Glyph) -> crossterm::Result<()> {
        // Used directly for messages, so the buffer keeps what is underneath
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1))?;
        match glyph.bg {
            Some(bg) => queue!(self.stdout, style::SetBackgroundColor(bg), style::Print(glyph.ch), style::ResetColor),
            None => queue!(self.stdout, style::Print(glyph.ch)),
        }
    }
}

impl Screen for TermManager {
    fn setup(&mut self) -> crossterm::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))
    }

    fn restore(&mut self) -> crossterm::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    fn read_key_blocking(&mut self) -> crossterm::Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    fn draw_borders(&mut self) -> crossterm::Result<()> {
        let (outer_w, outer_h) = TermManager::required_size(&self.board);
        let (x0, y0) = (self.origin.0 - 1, self.origin.1 - 1);
        let (end_x, end_y) = (x0 + outer_w - 1, y0 + outer_h - 1);

        for x in x0..=end_x {
            let ch = if x == x0 || x == end_x {'+'} else {'-'};
            self.print_at((x, y0), Glyph::plain(ch))?;
            self.print_at((x, end_y), Glyph::plain(ch))?;
        }

        for y in y0 + 1..end_y {
            self.print_at((x0, y), Glyph::plain('|'))?;
            self.print_at((end_x, y), Glyph::plain('|'))?;
        }

        self.flush()
    }

    fn show_message(&mut self, lines: &[&str]) -> crossterm::Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), Glyph::BLANK)?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), Glyph::plain(ch))?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    fn hide_message(&mut self) -> crossterm::Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let pos = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some(glyph) = self.glyph_at(pos) {
                    self.print_at_no_save(pos, glyph)?;
                }
            }
        }

        self.flush()
    }

    /// Writes every cell drawn since the last call.
    fn present(&mut self) -> crossterm::Result<()> {
        if self.dirty.is_empty() {
            return Ok(());
        }

        let dirty = std::mem::take(&mut self.dirty);
        for pos in dirty {
            if let Some(glyph) = self.glyph_at(pos) {
                self.print_at_no_save(pos, glyph)?;
            }
        }

        self.flush()
    }
}

impl Renderer for TermManager {
    fn set_cell(&mut self, cell: Cell, role: CellRole) {
        if let Some((x, y)) = self.cell_origin(cell) {
            let glyph = Glyph::for_role(role);
            for col in 0..CELL_COLUMNS {
                self.store((x + col, y), glyph);
            }
        }
    }

    fn clear(&mut self) {
        for cell in self.board.cells() {
            self.set_cell(cell, CellRole::Empty);
        }
    }
}

impl InputSource for TermManager {
    fn poll_keys(&mut self) -> crossterm::Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }
}
