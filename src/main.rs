use std::env;
use std::process;
use std::str::FromStr;

use scrabble_engine::scrabble::{Scrabble, ScrabbleConfig, TurnOutcome};
use tracing::error;
use tracing_subscriber::EnvFilter;
#[macro_use]
extern crate text_io;

const DEFAULT_CONFIG: &str = "config/scrabble.json";

/// Asks until the answer parses, giving up after a few tries
fn ask<T>(question: &str) -> Option<T>
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Debug,
{
    for _ in 0..3 {
        println!("{}", question);
        if let Ok(answer) = try_read!("{}\n") {
            return Some(answer);
        }
    }
    None
}

fn add_players(game: &mut Scrabble) -> Option<()> {
    let count: usize = ask("How many players?")?;
    for i in 1..=count {
        let name: String = ask(&format!("Enter name of player {}:", i))?;
        let computer: String = ask("Is this player a computer? (y/n)")?;
        if computer.trim().eq_ignore_ascii_case("y") {
            game.add_computer(name.trim());
        } else {
            game.add_human(name.trim());
        }
    }
    Some(())
}

fn report_turn(game: &Scrabble, index: usize, outcome: &TurnOutcome) {
    let player = &game.players()[index];
    match outcome {
        TurnOutcome::Passed => println!("{} passed.", player.name()),
        TurnOutcome::Exchanged(n) => println!("{} exchanged {} tiles.", player.name(), n),
        TurnOutcome::Placed { words, points, bingo } => {
            println!("{} played {} for {} points.", player.name(), words.join(", "), points);
            if *bingo {
                println!("Bingo!");
            }
        }
        TurnOutcome::Rejected(e) => println!("{} lost their turn: {}", player.name(), e),
    }
    println!("Score: {}", player.points());
    println!();
    println!("{}", game.board());
}

fn print_results(game: &Scrabble) {
    let winners = game
        .winners()
        .into_iter()
        .map(|p| p.name())
        .collect::<Vec<_>>();
    let label = if winners.len() == 1 { "Winner:" } else { "Winners:" };
    println!("{} {}", label, winners.join(" "));
    println!("Scores:");
    println!("---------------------------------");
    let width = game
        .players()
        .iter()
        .map(|p| p.points().to_string().len())
        .max()
        .unwrap_or(1);
    for player in game.players() {
        println!("{:>width$} | {}", player.points(), player.name(), width = width);
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = match ScrabbleConfig::read(&path) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %path, error = %e, "could not load config");
            process::exit(1);
        }
    };
    let mut game = match Scrabble::new(&config) {
        Ok(game) => game,
        Err(e) => {
            error!(error = %e, "could not start game");
            process::exit(1);
        }
    };

    if add_players(&mut game).is_none() {
        error!("could not read the players");
        process::exit(1);
    }

    println!("{}", game.board());
    game.game_loop(report_turn);
    game.final_subtraction();
    print_results(&game);
}
