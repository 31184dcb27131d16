mod game;
mod term;
mod snake;

use std::{fs::File, process::ExitCode, thread::sleep, time::{Duration, Instant}};

use anyhow::{anyhow, Result};
use log::{error, info};
use simplelog::{Config, LevelFilter, WriteLogger};

use game::{Board, Ending, GameState, SnakeGame};
use term::TermManager;

pub type TermInt = u16;
pub type Coord = i32;

const LOG_FILE_NAME: &str = "snake.log";
const TEARDOWN_GRACE: Duration = Duration::from_millis(10);

fn main() -> ExitCode {
    init_logging();

    let mut term = TermManager::new();
    let res = run(&mut term);
    term.restore();

    match res {
        Ok(Ending::Lost { score }) | Ok(Ending::Quit { score }) => {
            finish(Some(&format!("YOU LOSE!\nScore: {}", score)), true)
        }
        Ok(Ending::Won { score }) => finish(Some(&format!("YOU WIN!\nScore: {}", score)), true),
        Err(e) => {
            error!("{:#}", e);
            finish(Some(&format!("Error: {:#}", e)), false)
        }
    }
}

fn run(term: &mut TermManager) -> Result<Ending> {
    let board = Board::from_terminal_size(term.get_terminal_size()?);
    let state = GameState::new(board).ok_or_else(|| anyhow!("terminal too small to play"))?;

    term.setup()?;
    let mut game = SnakeGame::new(state, term, Instant::now());
    game.play()
}

/// Prints the closing message once the terminal has settled. Failures go to
/// stderr, everything else to stdout.
fn finish(message: Option<&str>, success: bool) -> ExitCode {
    sleep(TEARDOWN_GRACE);

    match (message, success) {
        (Some(msg), true) => println!("{}", msg),
        (Some(msg), false) => eprintln!("{}", msg),
        (None, _) => {}
    }

    if success { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// The screen belongs to the game, so logs go to a file in the temp dir.
/// Without one the game just runs unlogged.
fn init_logging() {
    let path = std::env::temp_dir().join(LOG_FILE_NAME);
    if let Ok(file) = File::create(&path) {
        if WriteLogger::init(LevelFilter::Info, Config::default(), file).is_ok() {
            info!("logging to {}", path.display());
        }
    }
}
