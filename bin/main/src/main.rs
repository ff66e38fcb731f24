//! # main.rs
//!
//! The `mess` driver: loads a game configuration and shows, plays or
//! plays out games from its starting position.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

mod cli;

use clap::{CommandFactory, Parser};
use env_logger::Env;
use log::{error, info, warn};
use rand::{rngs::StdRng, Rng};
use std::{error::Error, path::PathBuf, process};
use timed::timed;

use cli::{Cli, Commands};
use game::{seeded, Game, LogEntry, MoveLog, MoveRequest, Position};
use io::{
    board_io::format_destinations,
    game_io::{format_game_state, format_log, format_status, side_name},
    parse_config_file,
    piece_io::{format_piece_types, format_rules},
    standard_config, Config,
};

fn main() {
    let env = Env::default().filter_or("MESS_LOG_LEVEL", "info");
    env_logger::Builder::from_env(env).init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help().expect("Failed to print help");
        return;
    };

    let config_path = cli
        .config
        .or_else(|| std::env::var_os("MESS_CONFIG_PATH").map(PathBuf::from));

    if let Err(failure) = run(command, config_path) {
        report(failure.as_ref());
        process::exit(1);
    }
}

fn report(failure: &dyn Error) {
    error!("{failure}");

    let mut source = failure.source();
    while let Some(cause) = source {
        error!("  caused by: {cause}");
        source = cause.source();
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    match path {
        Some(path) => {
            let config = parse_config_file(&path)?;
            info!("Loaded `{}` from {}", config.title, path.display());
            Ok(config)
        }
        None => Ok(standard_config()),
    }
}

fn run(
    command: Commands,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let config = load_config(config_path)?;

    match command {
        Commands::Show {
            verbose,
            pieces,
            rules,
        } => {
            let game = config.game(seeded(None));
            print!("{}", format_game_state(&game, &config, verbose));

            if pieces {
                print!("\n{}", format_piece_types(&config));
            }
            if rules {
                print!("\n{}", format_rules(&config));
            }
        }

        Commands::Moves { tile, after } => {
            let tile: Position = tile.parse()?;
            let log: MoveLog = after.parse()?;

            let mut game = config.game(seeded(None));
            game.replay(&log)?;

            let Some(piece) = game.board().id_at(tile) else {
                return Err(format!("No piece stands on {tile}").into());
            };

            let destinations = game.legal_destinations(piece);
            print!(
                "{}",
                format_destinations(game.board(), &config, &destinations)
            );

            for destination in &destinations {
                println!(
                    "{tile}:{}\t{:.2}",
                    destination.position, destination.probability
                );
            }
        }

        Commands::Play { tokens, seed } => {
            let mut game = config.game(seeded(seed));

            for token in &tokens {
                if !game.execute_token(token) {
                    warn!("Token `{token}` was refused");
                }
            }

            print!("{}", format_game_state(&game, &config, true));
            print!("\n{}", format_log(game.log()));
            println!("{}", game.log());
        }

        Commands::Playout { seed, max_plies } => {
            let mut game = config.game(seeded(seed));
            let mut chooser = seeded(seed.map(|seed| seed.wrapping_add(1)));

            let plies = playout(&mut game, &mut chooser, max_plies);

            print!("{}", format_game_state(&game, &config, true));
            info!(
                "Played {plies} plies: {}",
                format_status(game.status())
            );
            println!("{}", game.log());
        }
    }

    Ok(())
}

/// Random self-play. Takes the automatic draw as soon as it is available,
/// and picks a random promotion whenever one is offered.
#[timed(duration(printer = "info!"))]
fn playout(game: &mut Game, chooser: &mut StdRng, max_plies: usize) -> usize {
    let mut plies = 0;

    while plies < max_plies && !game.log().is_terminal() {
        if game.log().admits(&LogEntry::Draw) {
            game.execute(MoveRequest::OfferDraw);
            break;
        }

        let moves = game.legal_moves();
        if moves.is_empty() {
            info!("No legal moves left for {}", side_name(game.turn()));
            break;
        }

        let (id, destination) = moves[chooser.random_range(0..moves.len())];
        let piece = game.board().piece_by_id(id);
        let options = game.catalog().promotion_options(
            &piece.piece_type,
            piece.orientation,
            destination.position,
        );
        let promotion = (!options.is_empty())
            .then(|| options[chooser.random_range(0..options.len())].clone());

        if !game.move_piece(id, destination.position, promotion.as_deref()) {
            warn!("Move of piece {id} to {} was refused", destination.position);
            break;
        }
        plies += 1;
    }

    plies
}
