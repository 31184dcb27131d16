use std::time::{Duration, Instant};

use crate::{Coord, TermInt};
use crate::term::Terminal;
use crate::snake::{Snake, Position, Direction::{*, self}, BODY_GLYPH, APPLE_GLYPH};

use anyhow::Result;
use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use Tick::*;

pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
pub const INITIAL_SNAKE_LENGTH: usize = 5;
const MAX_FOOD_SAMPLES: usize = 4096;

/// Playable bounds. The head may sit anywhere in `[0, width] x [0, height]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub width: Coord,
    pub height: Coord,
}

impl Board {
    /// Leaves room for a double-width glyph on the right and a status line.
    pub fn from_terminal_size((cols, rows): (TermInt, TermInt)) -> Self {
        Board {
            width: Coord::from(cols.saturating_sub(2)),
            height: Coord::from(rows.saturating_sub(1)),
        }
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    /// Torus wrap: leaving one edge re-enters at the opposite one.
    pub fn wrap(&self, pos: Position) -> Position {
        let x = if pos.x < 0 {
            self.width
        } else if pos.x > self.width {
            0
        } else {
            pos.x
        };

        let y = if pos.y < 0 {
            self.height
        } else if pos.y > self.height {
            0
        } else {
            pos.y
        };

        Position::new(x, y)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    Moved,
    Ate,
    Crashed,
    /// The apple was eaten and no free cell is left for another.
    Cleared,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ending {
    Lost { score: usize },
    Quit { score: usize },
    /// No free cell was left for the next apple.
    Won { score: usize },
}

pub struct GameState {
    snake: Snake,
    board: Board,
    apple: Position,
    rng: StdRng,
}

impl GameState {
    pub fn new(board: Board) -> Option<Self> {
        Self::with_rng(board, StdRng::from_entropy())
    }

    /// `None` if the board has no room for the first apple.
    pub fn with_rng(board: Board, rng: StdRng) -> Option<Self> {
        let snake = Snake::new(board.center(), INITIAL_SNAKE_LENGTH, Left);
        let mut state = GameState { snake, board, apple: Position::new(0, 0), rng };
        state.apple = state.spawn_apple()?;
        Some(state)
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn apple(&self) -> Position {
        self.apple
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn score(&self) -> usize {
        self.snake.len() - INITIAL_SNAKE_LENGTH
    }

    pub fn set_direction(&mut self, dir: Direction) {
        if dir != self.snake.get_direction() {
            debug!("turning {:?}", dir);
        }
        self.snake.set_direction(dir);
    }

    /// Advances the game by one tick.
    pub fn update(&mut self) -> Tick {
        let new_head = self.board.wrap(self.snake.advance_head());
        self.snake.step(new_head);

        if self.snake.head_collides() {
            return Crashed;
        }

        if new_head.overlaps(self.apple) {
            match self.spawn_apple() {
                Some(apple) => self.apple = apple,
                None => return Cleared,
            }
            self.snake.grow();
            return Ate;
        }

        Moved
    }

    /// Picks a random cell the snake does not occupy. Sampling is tried
    /// first; a crowded board falls back to scanning every free cell.
    fn spawn_apple(&mut self) -> Option<Position> {
        let (w, h) = (self.board.width, self.board.height);
        if w <= 0 {
            return None;
        }

        for _ in 0..MAX_FOOD_SAMPLES {
            let pos = Position::new(self.rng.gen_range(0..w), self.rng.gen_range(0..=h));
            if !self.snake.occupies(pos) {
                debug!("apple spawned at ({}, {})", pos.x, pos.y);
                return Some(pos);
            }
        }

        warn!("apple sampling exhausted, scanning free cells");
        let free = self.free_cells();
        free.choose(&mut self.rng).copied()
    }

    fn free_cells(&self) -> Vec<Position> {
        let w = self.board.width;
        (0..=self.board.height)
            .flat_map(|y| (0..w).map(move |x| Position::new(x, y)))
            .filter(|pos| !self.snake.occupies(*pos))
            .collect()
    }
}

pub struct SnakeGame<T: Terminal> {
    state: GameState,
    term: T,
    last_update: Instant,
}

impl<T: Terminal> SnakeGame<T> {
    pub fn new(state: GameState, term: T, now: Instant) -> Self {
        SnakeGame { state, term, last_update: now }
    }

    pub fn play(&mut self) -> Result<Ending> {
        let board = self.state.board();
        info!("game started on a {}x{} board", board.width, board.height);
        self.draw()?;

        loop {
            if let Some(ending) = self.tick(Instant::now())? {
                info!("game over: {:?}", ending);
                return Ok(ending);
            }
        }
    }

    /// One pass of the loop: read at most one key, then update and redraw
    /// if a full tick has elapsed since the last update.
    pub fn tick(&mut self, now: Instant) -> Result<Option<Ending>> {
        if let Some(key_ev) = self.term.poll_key()? {
            match &key_ev {
                ev if is_quit(ev) => return Ok(Some(Ending::Quit { score: self.state.score() })),
                KeyEvent { code, modifiers: _ } => match code {
                    KeyCode::Char('w') | KeyCode::Up => self.state.set_direction(Up),
                    KeyCode::Char('a') | KeyCode::Left => self.state.set_direction(Left),
                    KeyCode::Char('s') | KeyCode::Down => self.state.set_direction(Down),
                    KeyCode::Char('d') | KeyCode::Right => self.state.set_direction(Right),
                    _ => {}
                }
            }
        }

        if now.saturating_duration_since(self.last_update) < TICK_INTERVAL {
            return Ok(None);
        }
        self.last_update = now;

        match self.state.update() {
            Crashed => return Ok(Some(Ending::Lost { score: self.state.score() })),
            Cleared => return Ok(Some(Ending::Won { score: self.state.score() })),
            Ate => info!("apple eaten, length {} with {} owed", self.state.snake.len(), self.state.snake.stock()),
            Moved => {}
        }

        self.draw()?;
        Ok(None)
    }

    fn draw(&mut self) -> Result<()> {
        let snake = &self.state.snake;

        self.term.clear()?;
        self.term.print_at(Position::new(0, 0), &format!("Score: {}", self.state.score()))?;

        for pos in &snake.body()[1..] {
            self.term.print_at(*pos, BODY_GLYPH)?;
        }
        self.term.print_at(snake.head(), snake.head_glyph())?;
        self.term.print_at(self.state.apple(), APPLE_GLYPH)?;

        self.term.present()
    }
}

fn is_quit(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('q'), .. })
        || matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
