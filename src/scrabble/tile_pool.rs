use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use super::util::{Letter, TileKind};

/// Multiset of tiles held by a player, keyed by letter (or blank).
///
/// Every tile of the same letter is assumed to be worth the same, so the pool
/// keeps one template tile per letter along with a count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilePool {
    /// Template tile and count for each letter in the pool
    tiles: BTreeMap<Letter, (TileKind, usize)>,
    /// The total number of tiles in the pool
    n_total: usize,
}

impl TilePool {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a tile for `letter` if the pool holds one. Absence is an
    /// ordinary outcome during search, not an error.
    pub fn lookup_tile(&self, letter: Letter) -> Option<TileKind> {
        self.tiles
            .get(&letter)
            .filter(|(_, count)| *count > 0)
            .map(|(tile, _)| *tile)
    }

    /// Adds a tile. Blank assignments are dropped: a blank goes back into the
    /// pool as an unbound blank.
    pub fn add_tile(&mut self, tile: TileKind) {
        let tile = TileKind {
            assigned: None,
            ..tile
        };
        self.tiles.entry(tile.letter).or_insert((tile, 0)).1 += 1;
        self.n_total += 1;
    }

    /// Removes one tile with the same letter (or one blank). Returns false if
    /// there was none to remove.
    pub fn remove_tile(&mut self, tile: &TileKind) -> bool {
        match self.tiles.get_mut(&tile.letter) {
            Some((_, count)) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.tiles.remove(&tile.letter);
                }
                self.n_total -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn count_tiles(&self) -> usize {
        self.n_total
    }

    pub fn count_tile(&self, letter: Letter) -> usize {
        self.tiles.get(&letter).map_or(0, |(_, count)| *count)
    }

    pub fn is_empty(&self) -> bool {
        self.n_total == 0
    }

    /// Face value of every tile in the pool
    pub fn total_points(&self) -> u32 {
        self.tiles
            .values()
            .map(|(tile, count)| tile.points * *count as u32)
            .sum()
    }

    /// Every tile in the pool, blanks first then alphabetical
    pub fn tiles(&self) -> Vec<TileKind> {
        self.tiles
            .values()
            .flat_map(|(tile, count)| std::iter::repeat(*tile).take(*count))
            .collect()
    }

    /// Takes a tile out of the pool for the lifetime of the returned guard.
    /// The tile goes back in when the guard is dropped, on every exit path.
    pub fn take(&mut self, letter: Letter) -> Option<TakenTile<'_>> {
        let tile = self.lookup_tile(letter)?;
        self.remove_tile(&tile);
        Some(TakenTile { pool: self, tile })
    }
}

impl std::iter::FromIterator<TileKind> for TilePool {
    fn from_iter<T: IntoIterator<Item = TileKind>>(iter: T) -> Self {
        let mut pool = Self::empty();
        iter.into_iter().for_each(|t| pool.add_tile(t));
        pool
    }
}

/// A tile borrowed out of a [`TilePool`]. Dereferences to the pool that is
/// left, so the search can keep recursing while the tile is out.
pub struct TakenTile<'p> {
    pool: &'p mut TilePool,
    tile: TileKind,
}

impl TakenTile<'_> {
    pub fn tile(&self) -> TileKind {
        self.tile
    }
}

impl Deref for TakenTile<'_> {
    type Target = TilePool;

    fn deref(&self) -> &Self::Target {
        self.pool
    }
}

impl DerefMut for TakenTile<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.pool
    }
}

impl Drop for TakenTile<'_> {
    fn drop(&mut self) {
        self.pool.add_tile(self.tile);
    }
}
