use std::path::PathBuf;

use thiserror::Error;

use super::board::PlaceError;

/// Failures while loading the board, tile bag, dictionary or config.
/// All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed board: {0}")]
    Board(String),
    #[error("malformed tile bag at line {line}: {reason}")]
    TileBag { line: usize, reason: String },
    #[error("cannot build dictionary: {0}")]
    Dictionary(#[from] fst::Error),
    #[error("malformed config: {0}")]
    Config(#[from] serde_json::Error),
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Problems with a typed move command. The player is asked again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("no move entered")]
    Empty,
    #[error("unknown command '{0}', expected PASS, EXCHANGE or PLACE")]
    UnknownCommand(String),
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("direction must be '-' or '|', got '{0}'")]
    BadDirection(String),
    #[error("invalid {field} '{value}'")]
    BadCoordinate { field: &'static str, value: String },
    #[error("'{0}' is not a tile")]
    BadTile(char),
    #[error("not enough '{0}' tiles in hand")]
    NotInHand(char),
    #[error("a blank '?' must be followed by the letter it stands for")]
    BlankWithoutLetter,
    #[error("unexpected input after the tiles: '{0}'")]
    TrailingInput(String),
}

/// A well-formed placement the board or dictionary refuses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveRejected {
    #[error(transparent)]
    Illegal(#[from] PlaceError),
    #[error("{0} is not a word")]
    UnknownWord(String),
    #[error("those tiles are not in hand")]
    MissingTiles,
}
