use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::LoadError;
use super::word_search::SearchOptions;
use crate::utils::serialization;

/// Game settings, read from a JSON file. Relative paths are resolved against
/// the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrabbleConfig {
    /// Tiles each player holds
    #[serde(default = "default_hand_size")]
    pub hand_size: usize,
    /// Shorter runs are not scored as words
    #[serde(default = "default_minimum_word_length")]
    pub minimum_word_length: usize,
    pub board_file_path: PathBuf,
    pub tile_bag_file_path: PathBuf,
    pub dictionary_file_path: PathBuf,
    /// Seed for the tile bag
    #[serde(default)]
    pub seed: u64,
    /// Extra points for playing a full hand in one move
    #[serde(default = "default_bingo_bonus")]
    pub bingo_bonus: u32,
    #[serde(default)]
    pub parallel_search: bool,
    /// Per-anchor trie node budget for computer players
    #[serde(default)]
    pub max_search_nodes: Option<usize>,
}

fn default_hand_size() -> usize {
    7
}

fn default_minimum_word_length() -> usize {
    2
}

fn default_bingo_bonus() -> u32 {
    50
}

impl ScrabbleConfig {
    /// Config with the default rules for the given data files
    pub fn new(
        board_file_path: impl Into<PathBuf>,
        tile_bag_file_path: impl Into<PathBuf>,
        dictionary_file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            hand_size: default_hand_size(),
            minimum_word_length: default_minimum_word_length(),
            board_file_path: board_file_path.into(),
            tile_bag_file_path: tile_bag_file_path.into(),
            dictionary_file_path: dictionary_file_path.into(),
            seed: 0,
            bingo_bonus: default_bingo_bonus(),
            parallel_search: false,
            max_search_nodes: None,
        }
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let config: Self = serialization::load_from_disk(path)?;
        info!(path = %path.display(), seed = config.seed, "loaded config");
        Ok(config)
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            parallel: self.parallel_search,
            max_nodes_per_anchor: self.max_search_nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let json = r#"{
            "board_file_path": "board.txt",
            "tile_bag_file_path": "tiles.txt",
            "dictionary_file_path": "words.txt"
        }"#;
        let config: ScrabbleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config, ScrabbleConfig::new("board.txt", "tiles.txt", "words.txt"));
        assert_eq!(config.search_options(), SearchOptions::default());
    }

    #[test]
    fn test_search_options() {
        let json = r#"{
            "hand_size": 5,
            "board_file_path": "b",
            "tile_bag_file_path": "t",
            "dictionary_file_path": "d",
            "parallel_search": true,
            "max_search_nodes": 5000
        }"#;
        let config: ScrabbleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.hand_size, 5);
        assert_eq!(
            config.search_options(),
            SearchOptions {
                parallel: true,
                max_nodes_per_anchor: Some(5000)
            }
        );
    }

    #[test]
    fn test_save_and_reload() {
        let mut config = ScrabbleConfig::new("b", "t", "d");
        config.seed = 99;
        config.max_search_nodes = Some(10);
        let path = std::env::temp_dir().join(format!("scrabble-config-{}.json", std::process::id()));
        serialization::save_to_disk(&config, &path).unwrap();
        let loaded = ScrabbleConfig::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ScrabbleConfig::read("no/such/config.json"),
            Err(LoadError::Io { .. })
        ));
    }
}
