use tracing::{info, warn};

use super::bag::TileBag;
use super::board::Board;
use super::config::ScrabbleConfig;
use super::dictionary::Dictionary;
use super::error::{LoadError, MoveRejected};
use super::player::{validate_placement, ComputerPlayer, HumanPlayer, Player};
use super::tile_pool::TilePool;
use super::util::{Move, MoveKind, TileKind};
use super::word_search::SearchOptions;

/// What happened on one player's turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Passed,
    Exchanged(usize),
    /// `points` includes the bingo bonus when `bingo` is set
    Placed {
        words: Vec<String>,
        points: u32,
        bingo: bool,
    },
    /// The move was refused and the turn is lost
    Rejected(MoveRejected),
}

impl TurnOutcome {
    fn is_pass(&self) -> bool {
        matches!(self, TurnOutcome::Passed | TurnOutcome::Rejected(_))
    }
}

/// A full game: board, bag, dictionary and the players taking turns.
pub struct Scrabble {
    hand_size: usize,
    bingo_bonus: u32,
    search: SearchOptions,
    board: Board,
    bag: TileBag,
    dictionary: Dictionary,
    players: Vec<Box<dyn Player>>,
}

impl Scrabble {
    /// Loads the board, tile bag and dictionary named in `config`
    pub fn new(config: &ScrabbleConfig) -> Result<Self, LoadError> {
        let board = Board::read(&config.board_file_path)?;
        let bag = TileBag::read(&config.tile_bag_file_path, config.seed)?;
        let dictionary = Dictionary::read(&config.dictionary_file_path)?;
        Ok(Self::from_parts(config, board, bag, dictionary))
    }

    pub fn from_parts(config: &ScrabbleConfig, mut board: Board, bag: TileBag, dictionary: Dictionary) -> Self {
        board.set_minimum_word_length(config.minimum_word_length);
        Self {
            hand_size: config.hand_size,
            bingo_bonus: config.bingo_bonus,
            search: config.search_options(),
            board,
            bag,
            dictionary,
            players: Vec::new(),
        }
    }

    /// Seats a player and deals them a full hand
    pub fn add_player(&mut self, mut player: Box<dyn Player>) {
        player.add_tiles(self.bag.remove_random_tiles(self.hand_size));
        info!(
            player = player.name(),
            human = player.is_human(),
            tiles = player.hand().count_tiles(),
            "player joined"
        );
        self.players.push(player);
    }

    pub fn add_computer(&mut self, name: impl Into<String>) {
        let player = ComputerPlayer::new(name, self.search);
        self.add_player(Box::new(player));
    }

    pub fn add_human(&mut self, name: impl Into<String>) {
        self.add_player(Box::new(HumanPlayer::new(name)));
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn bag(&self) -> &TileBag {
        &self.bag
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn players(&self) -> &[Box<dyn Player>] {
        &self.players
    }

    /// Asks player `index` for a move and carries it out
    pub fn play_turn(&mut self, index: usize) -> TurnOutcome {
        let mv = self.players[index].get_move(&self.board, &self.dictionary);
        self.apply_move(index, &mv)
    }

    /// Carries out `mv` for player `index`. Placements are checked against
    /// the board and dictionary again before anything changes.
    pub fn apply_move(&mut self, index: usize, mv: &Move) -> TurnOutcome {
        let player = &mut self.players[index];
        if mv.kind != MoveKind::Pass && !holds(player.hand(), &mv.tiles) {
            warn!(player = player.name(), mv = %mv, "move uses tiles the player does not hold");
            return TurnOutcome::Rejected(MoveRejected::MissingTiles);
        }

        match mv.kind {
            MoveKind::Pass => {
                info!(player = player.name(), "passed");
                TurnOutcome::Passed
            }
            MoveKind::Exchange => {
                player.remove_tiles(&mv.tiles);
                for &tile in mv.tiles.iter() {
                    self.bag.add_tile(tile);
                }
                player.add_tiles(self.bag.remove_random_tiles(mv.tiles.len()));
                info!(player = player.name(), tiles = mv.tiles.len(), "exchanged");
                TurnOutcome::Exchanged(mv.tiles.len())
            }
            MoveKind::Place => {
                let (words, points) = match validate_placement(&self.board, &self.dictionary, mv) {
                    Ok(scored) => scored,
                    Err(e) => {
                        warn!(player = player.name(), mv = %mv, error = %e, "placement rejected");
                        return TurnOutcome::Rejected(e);
                    }
                };
                self.board.place(mv);

                let bingo = mv.tiles.len() == self.hand_size;
                let points = if bingo { points + self.bingo_bonus } else { points };
                player.add_points(points);
                player.remove_tiles(&mv.tiles);
                player.add_tiles(self.bag.remove_random_tiles(mv.tiles.len()));
                info!(
                    player = player.name(),
                    mv = %mv,
                    points,
                    bingo,
                    total = player.points(),
                    "placed"
                );
                TurnOutcome::Placed {
                    words,
                    points,
                    bingo,
                }
            }
        }
    }

    /// Plays rounds until someone runs out of tiles or a whole round goes by
    /// with every human passing. With no humans seated, every player has to
    /// pass. `on_turn` sees the game after each turn.
    pub fn game_loop<F>(&mut self, mut on_turn: F)
    where
        F: FnMut(&Self, usize, &TurnOutcome),
    {
        if self.players.is_empty() {
            return;
        }
        let watch_all = !self.players.iter().any(|p| p.is_human());
        for round in 1.. {
            let mut all_passed = true;
            for i in 0..self.players.len() {
                let outcome = self.play_turn(i);
                on_turn(self, i, &outcome);
                let player = &self.players[i];
                if !outcome.is_pass() && (watch_all || player.is_human()) {
                    all_passed = false;
                }
                if player.hand().is_empty() {
                    info!(player = player.name(), round, "hand emptied, game over");
                    return;
                }
            }
            if all_passed {
                info!(round, "everyone passed, game over");
                return;
            }
        }
    }

    /// End of game scoring: everyone loses what is left in their hand, and
    /// whoever went out collects all of it.
    pub fn final_subtraction(&mut self) {
        let left_over: u32 = self.players.iter().map(|p| p.hand_value()).sum();
        for player in self.players.iter_mut() {
            let value = player.hand_value();
            player.subtract_points(value);
        }
        for player in self.players.iter_mut().filter(|p| p.hand().is_empty()) {
            player.add_points(left_over);
        }
    }

    /// Every player tied for the top score
    pub fn winners(&self) -> Vec<&dyn Player> {
        let best = self.players.iter().map(|p| p.points()).max().unwrap_or(0);
        self.players
            .iter()
            .filter(|p| p.points() == best)
            .map(|p| &**p)
            .collect()
    }
}

fn holds(hand: &TilePool, tiles: &[TileKind]) -> bool {
    let mut remaining = hand.clone();
    tiles.iter().all(|t| remaining.remove_tile(t))
}
