use tracing::warn;

use super::board::{Board, PlaceResult};
use super::dictionary::Dictionary;
use super::error::{MoveParseError, MoveRejected};
use super::tile_pool::TilePool;
use super::util::{Direction, Letter, Move, MoveKind, Position, TileKind};
use super::word_search::{MoveGenerator, SearchOptions};

/// What every player has regardless of who is choosing the moves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub name: String,
    pub hand: TilePool,
    pub points: u32,
}

impl PlayerState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hand: TilePool::empty(),
            points: 0,
        }
    }
}

pub trait Player {
    fn state(&self) -> &PlayerState;

    fn state_mut(&mut self) -> &mut PlayerState;

    /// Picks the next move. Placements coming back from here have already
    /// been checked against the board and the dictionary.
    fn get_move(&mut self, board: &Board, dictionary: &Dictionary) -> Move;

    fn is_human(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        &self.state().name
    }

    fn hand(&self) -> &TilePool {
        &self.state().hand
    }

    fn hand_mut(&mut self) -> &mut TilePool {
        &mut self.state_mut().hand
    }

    fn points(&self) -> u32 {
        self.state().points
    }

    fn add_points(&mut self, points: u32) {
        self.state_mut().points += points;
    }

    /// Never drops below zero
    fn subtract_points(&mut self, points: u32) {
        let state = self.state_mut();
        state.points = state.points.saturating_sub(points);
    }

    fn add_tiles(&mut self, tiles: Vec<TileKind>) {
        let hand = self.hand_mut();
        tiles.into_iter().for_each(|t| hand.add_tile(t));
    }

    /// Blanks are removed as blanks, whatever letter they were given
    fn remove_tiles(&mut self, tiles: &[TileKind]) {
        let hand = self.hand_mut();
        for tile in tiles {
            if !hand.remove_tile(tile) {
                warn!(tile = %tile.letter, "tried to remove a tile that is not in hand");
            }
        }
    }

    /// Face value of the tiles left in hand
    fn hand_value(&self) -> u32 {
        self.hand().total_points()
    }
}

/// Plays the highest scoring placement it can find, or passes
pub struct ComputerPlayer {
    state: PlayerState,
    options: SearchOptions,
}

impl ComputerPlayer {
    pub fn new(name: impl Into<String>, options: SearchOptions) -> Self {
        Self {
            state: PlayerState::new(name),
            options,
        }
    }
}

impl Player for ComputerPlayer {
    fn state(&self) -> &PlayerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.state
    }

    fn get_move(&mut self, board: &Board, dictionary: &Dictionary) -> Move {
        MoveGenerator::with_options(board, dictionary, self.options).generate(&mut self.state.hand)
    }
}

/// Reads moves from stdin until one of them is acceptable
pub struct HumanPlayer {
    state: PlayerState,
}

impl HumanPlayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            state: PlayerState::new(name),
        }
    }
}

impl Player for HumanPlayer {
    fn state(&self) -> &PlayerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.state
    }

    fn is_human(&self) -> bool {
        true
    }

    fn get_move(&mut self, board: &Board, dictionary: &Dictionary) -> Move {
        println!("Your hand: {}", describe_hand(&self.state.hand));
        loop {
            println!("Your move, {}:", self.state.name);
            let line: String = match try_read!("{}\n") {
                Ok(line) => line,
                Err(e) => {
                    warn!(player = %self.state.name, error = %e, "could not read a move, passing");
                    return Move::pass();
                }
            };
            let mv = match parse_move(&line, &self.state.hand) {
                Ok(mv) => mv,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };
            if mv.kind == MoveKind::Place {
                if let Err(e) = validate_placement(board, dictionary, &mv) {
                    println!("{}", e);
                    continue;
                }
            }
            return mv;
        }
    }
}

/// Lists a hand as letter and points, e.g. `A1 E1 ?0`
pub fn describe_hand(hand: &TilePool) -> String {
    hand.tiles()
        .iter()
        .map(|t| format!("{}{}", t.letter, t.points))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses one of
///
/// * `PASS`
/// * `EXCHANGE <tiles>`
/// * `PLACE <-|> <row> <column> <tiles>`
///
/// Rows and columns count from 1. When placing, `?` must be followed by the
/// letter the blank stands for. Every tile has to be in `hand`.
pub fn parse_move(input: &str, hand: &TilePool) -> Result<Move, MoveParseError> {
    let mut fields = input.split_whitespace();
    let command = fields
        .next()
        .ok_or(MoveParseError::Empty)?
        .to_ascii_uppercase();
    let mv = match command.as_str() {
        "PASS" => Move::pass(),
        "EXCHANGE" => {
            let letters = fields
                .next()
                .ok_or(MoveParseError::MissingField("tiles to exchange"))?;
            Move::exchange(parse_tiles(letters, hand, false)?)
        }
        "PLACE" => {
            let dir = match fields.next().ok_or(MoveParseError::MissingField("direction"))? {
                "-" => Direction::Across,
                "|" => Direction::Down,
                other => return Err(MoveParseError::BadDirection(other.to_string())),
            };
            let row = parse_coordinate(fields.next(), "row")?;
            let col = parse_coordinate(fields.next(), "column")?;
            let letters = fields
                .next()
                .ok_or(MoveParseError::MissingField("tiles to place"))?;
            Move::place(parse_tiles(letters, hand, true)?, Position::new(row, col), dir)
        }
        _ => return Err(MoveParseError::UnknownCommand(command)),
    };
    if let Some(extra) = fields.next() {
        return Err(MoveParseError::TrailingInput(extra.to_string()));
    }
    Ok(mv)
}

fn parse_coordinate(field: Option<&str>, name: &'static str) -> Result<usize, MoveParseError> {
    let value = field.ok_or(MoveParseError::MissingField(name))?;
    value
        .parse::<usize>()
        .ok()
        .and_then(|v| v.checked_sub(1))
        .ok_or_else(|| MoveParseError::BadCoordinate {
            field: name,
            value: value.to_string(),
        })
}

fn parse_tiles(letters: &str, hand: &TilePool, placing: bool) -> Result<Vec<TileKind>, MoveParseError> {
    let mut remaining = hand.clone();
    let mut tiles = Vec::new();
    let mut chars = letters.chars();
    while let Some(c) = chars.next() {
        let letter = match c {
            '?' => Letter::Blank,
            c if c.is_ascii_alphabetic() => Letter::from(c),
            c => return Err(MoveParseError::BadTile(c)),
        };
        let tile = remaining
            .lookup_tile(letter)
            .ok_or(MoveParseError::NotInHand(c.to_ascii_uppercase()))?;
        remaining.remove_tile(&tile);
        if tile.is_blank() && placing {
            match chars.next() {
                Some(a) if a.is_ascii_alphabetic() => tiles.push(tile.assign(a)),
                _ => return Err(MoveParseError::BlankWithoutLetter),
            }
        } else {
            tiles.push(tile);
        }
    }
    Ok(tiles)
}

/// Full check of a placement: legal on the board and every word it forms is
/// in the dictionary. Returns the words and points it would score.
pub fn validate_placement(
    board: &Board,
    dictionary: &Dictionary,
    mv: &Move,
) -> Result<(Vec<String>, u32), MoveRejected> {
    match board.evaluate(mv) {
        PlaceResult::Invalid(e) => Err(e.into()),
        PlaceResult::Valid { words, points } => {
            if let Some(word) = words.iter().find(|w| !dictionary.is_word(w)) {
                return Err(MoveRejected::UnknownWord(word.clone()));
            }
            Ok((words, points))
        }
    }
}
