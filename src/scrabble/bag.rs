use std::fs;
use std::path::Path;

use rand::prelude::SliceRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::error::LoadError;
use super::util::{Letter, TileKind};

/// The undrawn tiles. Draws are random but reproducible for a given seed.
#[derive(Debug, Clone)]
pub struct TileBag {
    tiles: Vec<TileKind>,
    rng: StdRng,
}

impl TileBag {
    pub fn new(mut tiles: Vec<TileKind>, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        tiles.shuffle(&mut rng);
        Self { tiles, rng }
    }

    pub fn read<P: AsRef<Path>>(path: P, seed: u64) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let bag = Self::parse(&data, seed)?;
        info!(path = %path.display(), tiles = bag.count_tiles(), "loaded tile bag");
        Ok(bag)
    }

    /// Parses lines of `<letter> <points> <count>`, with `?` for the blank
    pub fn parse(data: &str, seed: u64) -> Result<Self, LoadError> {
        let mut tiles = Vec::new();
        for (i, line) in data.lines().enumerate() {
            let fields = line.split_whitespace().collect::<Vec<_>>();
            if fields.is_empty() {
                continue;
            }
            let bad = |reason: &str| LoadError::TileBag {
                line: i + 1,
                reason: reason.to_string(),
            };
            let (letter, points, count) = match fields[..] {
                [letter, points, count] => (letter, points, count),
                _ => return Err(bad("expected <letter> <points> <count>")),
            };
            let mut chars = letter.chars();
            let letter = match (chars.next(), chars.next()) {
                (Some(c), None) if c == '?' || c.is_ascii_alphabetic() => Letter::from(c),
                _ => return Err(bad("tile must be a single letter or '?'")),
            };
            let points = points.parse::<u32>().map_err(|_| bad("invalid point value"))?;
            let count = count.parse::<usize>().map_err(|_| bad("invalid tile count"))?;
            tiles.extend(std::iter::repeat(TileKind::new(letter, points)).take(count));
        }
        Ok(Self::new(tiles, seed))
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn count_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Puts a tile back at a random spot. Blanks come back unbound
    pub fn add_tile(&mut self, tile: TileKind) {
        let tile = TileKind {
            assigned: None,
            ..tile
        };
        let idx = self.rng.gen_range(0..=self.tiles.len());
        self.tiles.insert(idx, tile);
    }

    /// Draws up to `n` tiles; fewer if the bag runs out
    pub fn remove_random_tiles(&mut self, n: usize) -> Vec<TileKind> {
        let n = n.min(self.tiles.len());
        let mut drawn = Vec::with_capacity(n);
        for _ in 0..n {
            let idx = self.rng.gen_range(0..self.tiles.len());
            drawn.push(self.tiles.swap_remove(idx));
        }
        drawn
    }
}
