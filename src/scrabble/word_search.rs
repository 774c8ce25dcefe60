use std::cmp::Reverse;

use rayon::prelude::*;
use tracing::{debug, warn};

use super::board::{Anchor, Board, PlaceResult};
use super::dictionary::{Dictionary, TrieNode};
use super::tile_pool::TilePool;
use super::util::{Direction, Letter, Move, Position, TileKind};

/// Tuning knobs for move generation. Neither setting changes which move is
/// chosen when the search runs to completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Search anchors on the rayon thread pool
    pub parallel: bool,
    /// Stop exploring an anchor after visiting this many trie nodes
    pub max_nodes_per_anchor: Option<usize>,
}

/// A legal, dictionary-checked placement and what it scores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub words: Vec<String>,
    pub points: u32,
}

impl ScoredMove {
    /// Smaller is better: highest score, then the top-left-most start, then
    /// across before down, then the tile sequence itself.
    fn preference(&self) -> (Reverse<u32>, Position, Direction, Vec<(char, bool)>) {
        let tiles = self
            .mv
            .tiles
            .iter()
            .map(|t| (t.face().unwrap_or('?'), t.is_blank()))
            .collect();
        (Reverse(self.points), self.mv.pos, self.mv.dir, tiles)
    }

    fn better(self, other: ScoredMove) -> ScoredMove {
        if other.preference() < self.preference() {
            other
        } else {
            self
        }
    }
}

/// Finds the best placement for a pool of tiles by walking the dictionary
/// trie outward from every anchor on the board.
pub struct MoveGenerator<'a> {
    board: &'a Board,
    dictionary: &'a Dictionary,
    options: SearchOptions,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(board: &'a Board, dictionary: &'a Dictionary) -> Self {
        Self::with_options(board, dictionary, SearchOptions::default())
    }

    pub fn with_options(board: &'a Board, dictionary: &'a Dictionary, options: SearchOptions) -> Self {
        Self {
            board,
            dictionary,
            options,
        }
    }

    /// Every placement the trie walk proposes, before scoring. Some of these
    /// may still be illegal or form invalid cross-words.
    pub fn candidates(&self, pool: &mut TilePool) -> Vec<Move> {
        self.board
            .get_anchors()
            .iter()
            .flat_map(|anchor| self.search_anchor(anchor, pool))
            .collect()
    }

    /// Highest scoring legal move, or None if nothing scores above zero.
    /// The pool is left exactly as it was passed in.
    pub fn best_move(&self, pool: &mut TilePool) -> Option<ScoredMove> {
        let anchors = self.board.get_anchors();
        debug!(anchors = anchors.len(), tiles = pool.count_tiles(), "searching for move");

        let best = if self.options.parallel {
            let pool: &TilePool = pool;
            anchors
                .par_iter()
                .filter_map(|anchor| {
                    let mut pool = pool.clone();
                    self.search_anchor(anchor, &mut pool)
                        .into_iter()
                        .filter_map(|mv| self.score(mv))
                        .reduce(ScoredMove::better)
                })
                .reduce_with(ScoredMove::better)
        } else {
            anchors
                .iter()
                .flat_map(|anchor| self.search_anchor(anchor, pool))
                .filter_map(|mv| self.score(mv))
                .reduce(ScoredMove::better)
        };

        match &best {
            Some(best) => debug!(mv = %best.mv, points = best.points, "best move"),
            None => debug!("no scoring move"),
        }
        best
    }

    /// The move an automated player makes: the best placement or a pass
    pub fn generate(&self, pool: &mut TilePool) -> Move {
        self.best_move(pool)
            .map_or_else(Move::pass, |scored| scored.mv)
    }

    fn search_anchor(&self, anchor: &Anchor, pool: &mut TilePool) -> Vec<Move> {
        let mut search = AnchorSearch {
            board: self.board,
            anchor: *anchor,
            tiles: Vec::new(),
            found: Vec::new(),
            visited: 0,
            budget: self.options.max_nodes_per_anchor,
            truncated: false,
        };

        if anchor.limit > 0 {
            search.left_part(pool, self.dictionary.root(), anchor.limit);
        } else {
            let prefix = self.board.prefix_before(anchor.pos, anchor.dir);
            if let Some(node) = self.dictionary.find_prefix(&prefix) {
                search.extend_right(pool, Some(anchor.pos), node, anchor.pos);
            }
        }

        if search.truncated {
            warn!(
                row = anchor.pos.row,
                col = anchor.pos.col,
                dir = ?anchor.dir,
                visited = search.visited,
                "anchor search hit its node budget"
            );
        }
        search.found
    }

    /// Re-checks a candidate against the board and the dictionary
    fn score(&self, mv: Move) -> Option<ScoredMove> {
        match self.board.evaluate(&mv) {
            PlaceResult::Valid { words, points }
                if points > 0 && words.iter().all(|w| self.dictionary.is_word(w)) =>
            {
                Some(ScoredMove { mv, words, points })
            }
            _ => None,
        }
    }
}

/// Backtracking state for a single anchor
struct AnchorSearch<'b> {
    board: &'b Board,
    anchor: Anchor,
    /// Tiles laid so far, in board order
    tiles: Vec<TileKind>,
    found: Vec<Move>,
    visited: usize,
    budget: Option<usize>,
    truncated: bool,
}

impl AnchorSearch<'_> {
    /// Counts a visited trie node; false once the budget is spent
    fn tick(&mut self) -> bool {
        if self.truncated {
            return false;
        }
        self.visited += 1;
        if self.budget.map_or(false, |max| self.visited > max) {
            self.truncated = true;
            return false;
        }
        true
    }

    /// Runs `then` with a tile for `letter` taken out of the pool, first the
    /// real tile and then a blank standing in for it.
    fn with_tile<F>(&mut self, pool: &mut TilePool, letter: char, mut then: F)
    where
        F: FnMut(&mut Self, &mut TilePool),
    {
        if let Some(mut taken) = pool.take(Letter::Letter(letter)) {
            self.tiles.push(taken.tile());
            then(self, &mut *taken);
            self.tiles.pop();
        }
        if let Some(mut taken) = pool.take(Letter::Blank) {
            self.tiles.push(taken.tile().assign(letter));
            then(self, &mut *taken);
            self.tiles.pop();
        }
    }

    /// Builds every prefix that fits in the empty squares before the anchor,
    /// extending each one rightward from the anchor.
    fn left_part(&mut self, pool: &mut TilePool, node: TrieNode<'_>, limit: usize) {
        if !self.tick() {
            return;
        }
        let dir = self.anchor.dir;
        let anchor = self.anchor.pos;
        if let Some(start) = anchor.translate(dir, -(self.tiles.len() as isize)) {
            self.extend_right(pool, Some(anchor), node, start);
        }
        if limit == 0 {
            return;
        }
        for (letter, child) in node.children() {
            self.with_tile(pool, letter, |search, pool| {
                search.left_part(pool, child, limit - 1)
            });
        }
    }

    /// Follows the trie along the board from `pos`, stepping through tiles
    /// already placed and filling empty squares from the pool.
    fn extend_right(
        &mut self,
        pool: &mut TilePool,
        pos: Option<Position>,
        node: TrieNode<'_>,
        start: Position,
    ) {
        if !self.tick() {
            return;
        }
        let dir = self.anchor.dir;
        let pos = pos.filter(|p| self.board.is_in_bounds(*p));
        let blocked = pos.map_or(false, |p| self.board[p].has_tile());
        if node.is_final() && !self.tiles.is_empty() && !blocked {
            self.found
                .push(Move::place(self.tiles.clone(), start, dir));
        }

        let pos = match pos {
            Some(pos) => pos,
            None => return,
        };
        match self.board.letter_at(pos) {
            Some(letter) => {
                if let Some(next) = node.next(letter) {
                    self.extend_right(pool, pos.next(dir), next, start);
                }
            }
            None => {
                for (letter, child) in node.children() {
                    self.with_tile(pool, letter, |search, pool| {
                        search.extend_right(pool, pos.next(dir), child, start)
                    });
                }
            }
        }
    }
}
