pub mod bag;
pub mod board;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod game;
pub mod player;
pub mod tile_pool;
pub mod util;
pub mod word_search;

pub use self::board::{Anchor, Board, BoardSquare, PlaceError, PlaceResult};
pub use self::config::ScrabbleConfig;
pub use self::dictionary::{Dictionary, TrieNode};
pub use self::error::{LoadError, MoveParseError, MoveRejected};
pub use self::game::{Scrabble, TurnOutcome};
pub use self::player::{ComputerPlayer, HumanPlayer, Player, PlayerState};
pub use self::tile_pool::TilePool;
pub use self::util::{Direction, Letter, Move, MoveKind, Position, TileKind};
pub use self::word_search::{MoveGenerator, ScoredMove, SearchOptions};
