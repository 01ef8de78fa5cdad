use std::{fs::File, process::exit, time::Duration};

use clap::Parser;
use log::{error, info, LevelFilter};
use rand::{rngs::StdRng, SeedableRng};
use simplelog::{Config, WriteLogger};

use gridsnake::clock::{Clock, FrameScheduler, Scheduler, SystemClock};
use gridsnake::config::Args;
use gridsnake::game::{open_terminal, GameError, Screen, SnakeGame};

const FRAME_INTERVAL_MS: u64 = 5;

fn play_session<T: Screen, C: Clock, S: Scheduler>(game: &mut SnakeGame<T, C, S>) -> Result<(), GameError> {
    game.initialize()?;
    if game.show_intro()? {
        game.play()?;
    }
    Ok(())
}

fn run(args: Args) -> Result<(), GameError> {
    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    WriteLogger::init(level, Config::default(), File::create(&args.log_file)?)?;

    let config = args.game_config()?;
    info!("Starting with {:?}", config);

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let scheduler = FrameScheduler::new(Duration::from_millis(FRAME_INTERVAL_MS));
    let term = open_terminal(&config)?;
    let mut game = SnakeGame::new(config, rng, term, SystemClock, scheduler)?;

    // The terminal goes back to normal whatever happens during play
    let res = play_session(&mut game);
    let restored = game.restore();

    res.and(restored)
}

fn main() {
    if let Err(e) = run(Args::parse()) {
        error!("{}", e);
        eprintln!("snake: {}", e);
        exit(1);
    }
}
