use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use super::error::LoadError;
use super::util::{Direction, Move, Position, TileKind};

/// A square on the board. Multipliers are fixed when the board is built and
/// only ever apply to tiles placed on the square in the current move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSquare {
    tile: Option<TileKind>,
    pub letter_multiplier: u32,
    pub word_multiplier: u32,
}

impl BoardSquare {
    pub fn new(letter_multiplier: u32, word_multiplier: u32) -> Self {
        Self {
            tile: None,
            letter_multiplier,
            word_multiplier,
        }
    }

    /// Any symbol without a meaning of its own is a triple word square
    fn from_layout(c: char) -> Self {
        match c {
            '.' => Self::new(1, 1),
            '2' => Self::new(2, 1),
            '3' => Self::new(3, 1),
            'd' => Self::new(1, 2),
            _ => Self::new(1, 3),
        }
    }

    pub fn has_tile(&self) -> bool {
        self.tile.is_some()
    }

    pub fn tile(&self) -> Option<&TileKind> {
        self.tile.as_ref()
    }
}

/// Why a placement is structurally illegal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("Cannot start word on an existing tile.")]
    AnchorOccupied,
    #[error("Must place tile on start square")]
    MissesStart,
    #[error("Out of bounds")]
    OutOfBounds,
    #[error("Needs at least one adjacent tile")]
    NoAdjacentTile,
    #[error("Move places no tiles")]
    NoTiles,
    #[error("Blank tile has no assigned letter")]
    UnassignedBlank,
}

/// Outcome of evaluating a placement against the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceResult {
    Invalid(PlaceError),
    /// Primary word first (when it is long enough to count), then cross-words
    Valid { words: Vec<String>, points: u32 },
}

impl PlaceResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, PlaceResult::Valid { .. })
    }

    pub fn points(&self) -> u32 {
        match self {
            PlaceResult::Valid { points, .. } => *points,
            PlaceResult::Invalid(_) => 0,
        }
    }

    pub fn words(&self) -> &[String] {
        match self {
            PlaceResult::Valid { words, .. } => words,
            PlaceResult::Invalid(_) => &[],
        }
    }

    pub fn error(&self) -> Option<PlaceError> {
        match self {
            PlaceResult::Invalid(e) => Some(*e),
            PlaceResult::Valid { .. } => None,
        }
    }
}

/// A square a new word may be built through, searched along `dir`.
/// `limit` is how many tiles may go in front of it before running into the
/// edge, a tile or another anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub pos: Position,
    pub dir: Direction,
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct Board {
    rows: usize,
    columns: usize,
    /// Square the first move has to cover
    start: Position,
    squares: Vec<Vec<BoardSquare>>,
    /// Shorter runs are not scored as words
    minimum_word_length: usize,
    /// Number of tiles on the board
    n_tiles: usize,
    /// Number of successful placements
    move_count: usize,
}

impl Board {
    /// An unadorned board with no multipliers
    pub fn new(rows: usize, columns: usize, start: Position) -> Self {
        Self {
            rows,
            columns,
            start,
            squares: vec![vec![BoardSquare::new(1, 1); columns]; rows],
            minimum_word_length: 2,
            n_tiles: 0,
            move_count: 0,
        }
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let board = Self::parse(&data)?;
        info!(path = %path.display(), rows = board.rows, columns = board.columns, "loaded board");
        Ok(board)
    }

    /// Parses `rows columns start_row start_column` followed by one layout
    /// character per square. Whitespace between squares is ignored.
    pub fn parse(data: &str) -> Result<Self, LoadError> {
        let mut tokens = data.split_whitespace();
        let mut header = [0usize; 4];
        for (field, name) in header
            .iter_mut()
            .zip(["rows", "columns", "start row", "start column"])
        {
            *field = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| LoadError::Board(format!("missing or invalid {}", name)))?;
        }
        let [rows, columns, start_row, start_col] = header;
        if rows == 0 || columns == 0 {
            return Err(LoadError::Board("board has no squares".to_string()));
        }
        let mut board = Self::new(rows, columns, Position::new(start_row, start_col));
        if !board.is_in_bounds(board.start) {
            return Err(LoadError::Board(format!(
                "start square ({}, {}) is off the board",
                start_row, start_col
            )));
        }

        let mut cells = tokens.flat_map(str::chars);
        for row in board.squares.iter_mut() {
            for square in row.iter_mut() {
                let c = cells
                    .next()
                    .ok_or_else(|| LoadError::Board(format!("expected {} squares", rows * columns)))?;
                *square = BoardSquare::from_layout(c);
            }
        }
        if cells.next().is_some() {
            return Err(LoadError::Board(format!(
                "more than {} squares",
                rows * columns
            )));
        }
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn minimum_word_length(&self) -> usize {
        self.minimum_word_length
    }

    pub fn set_minimum_word_length(&mut self, length: usize) {
        self.minimum_word_length = length;
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn is_empty(&self) -> bool {
        self.n_tiles == 0
    }

    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.columns
    }

    pub fn in_bounds_and_has_tile(&self, pos: Position) -> bool {
        self.is_in_bounds(pos) && self[pos].has_tile()
    }

    /// Letter showing at `pos`; blanks report the letter they stand for
    pub fn letter_at(&self, pos: Position) -> Option<char> {
        if !self.is_in_bounds(pos) {
            return None;
        }
        self[pos].tile.and_then(|t| t.face())
    }

    fn has_tile_at(&self, pos: Option<Position>) -> bool {
        pos.map_or(false, |p| self.in_bounds_and_has_tile(p))
    }

    /// Letters already on the board running up to `pos` along `dir`
    pub fn prefix_before(&self, pos: Position, dir: Direction) -> String {
        let mut prefix = Vec::new();
        let mut curr = pos.prev(dir);
        while let Some(c) = curr.and_then(|p| self.letter_at(p)) {
            prefix.push(c);
            curr = curr.and_then(|p| p.prev(dir));
        }
        prefix.into_iter().rev().collect()
    }

    /// Checks if a position can be used as an anchor position
    pub fn is_anchor_spot(&self, pos: Position) -> bool {
        if !self.is_in_bounds(pos) || self[pos].has_tile() {
            return false;
        }
        pos.adjacent().into_iter().any(|n| self.in_bounds_and_has_tile(n)) || pos == self.start
    }

    /// Every anchor on the board, row by row, each square searched across
    /// and then down.
    pub fn get_anchors(&self) -> Vec<Anchor> {
        let mut anchors = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.columns {
                let pos = Position::new(row, col);
                if !self.is_anchor_spot(pos) {
                    continue;
                }
                for &dir in Direction::iter() {
                    let mut limit = 0;
                    let mut curr = pos.prev(dir);
                    while let Some(p) = curr.filter(|p| {
                        self.is_in_bounds(*p) && !self[*p].has_tile() && !self.is_anchor_spot(*p)
                    }) {
                        limit += 1;
                        curr = p.prev(dir);
                    }
                    anchors.push(Anchor { pos, dir, limit });
                }
            }
        }
        anchors
    }

    /// Works out which square each tile of the move lands on. Squares that
    /// already hold a tile are stepped over.
    fn layout(&self, m: &Move) -> Result<Vec<(Position, TileKind)>, PlaceError> {
        if m.tiles.is_empty() {
            return Err(PlaceError::NoTiles);
        }
        if m.tiles.iter().any(|t| t.face().is_none()) {
            return Err(PlaceError::UnassignedBlank);
        }
        if !self.is_in_bounds(m.pos) {
            return Err(PlaceError::OutOfBounds);
        }
        if self[m.pos].has_tile() {
            return Err(PlaceError::AnchorOccupied);
        }

        let mut placed = Vec::with_capacity(m.tiles.len());
        let mut curr = Some(m.pos);
        for &tile in m.tiles.iter() {
            loop {
                let pos = curr
                    .filter(|p| self.is_in_bounds(*p))
                    .ok_or(PlaceError::OutOfBounds)?;
                curr = pos.next(m.dir);
                if !self[pos].has_tile() {
                    placed.push((pos, tile));
                    break;
                }
            }
        }
        Ok(placed)
    }

    /// First square of the run of tiles that `from` belongs to along `dir`
    fn run_start(&self, from: Position, dir: Direction) -> Position {
        let mut start = from;
        while let Some(prev) = start.prev(dir).filter(|p| self.in_bounds_and_has_tile(*p)) {
            start = prev;
        }
        start
    }

    /// Reads the word through `from` along `dir`, treating `placed` as if
    /// they were on the board. Returns the word, its score and whether it ran
    /// through any tile already on the board.
    ///
    /// Multipliers only count for squares in `placed`.
    fn score_run(
        &self,
        from: Position,
        dir: Direction,
        placed: &[(Position, TileKind)],
    ) -> (String, u32, bool) {
        let mut word = String::new();
        let mut sum = 0;
        let mut word_multiplier = 1;
        let mut touches = false;
        let mut curr = Some(self.run_start(from, dir));
        while let Some(pos) = curr.filter(|p| self.is_in_bounds(*p)) {
            let square = &self[pos];
            if let Some(tile) = square.tile {
                word.extend(tile.face());
                sum += tile.points;
                touches = true;
            } else if let Some((_, tile)) = placed.iter().find(|(p, _)| *p == pos) {
                word.extend(tile.face());
                sum += tile.points * square.letter_multiplier;
                word_multiplier *= square.word_multiplier;
            } else {
                break;
            }
            curr = pos.next(dir);
        }
        (word, sum * word_multiplier, touches)
    }

    /// Checks a placement and scores it without touching the board
    pub fn evaluate(&self, m: &Move) -> PlaceResult {
        let placed = match self.layout(m) {
            Ok(placed) => placed,
            Err(e) => return PlaceResult::Invalid(e),
        };

        let first_move = self.is_empty();
        if first_move && !placed.iter().any(|(p, _)| *p == self.start) {
            return PlaceResult::Invalid(PlaceError::MissesStart);
        }

        let mut words = Vec::new();
        let mut points = 0;
        let (word, score, mut adjacent) = self.score_run(m.pos, m.dir, &placed);
        if word.len() >= self.minimum_word_length {
            words.push(word);
            points += score;
        }

        let cross = m.dir.flip();
        for placement in placed.iter() {
            let pos = placement.0;
            if !self.has_tile_at(pos.prev(cross)) && !self.has_tile_at(pos.next(cross)) {
                continue;
            }
            adjacent = true;
            let (word, score, _) = self.score_run(pos, cross, std::slice::from_ref(placement));
            if word.len() >= self.minimum_word_length {
                words.push(word);
                points += score;
            }
        }

        if !(adjacent || first_move) {
            return PlaceResult::Invalid(PlaceError::NoAdjacentTile);
        }
        PlaceResult::Valid { words, points }
    }

    /// Evaluates the move and, if it is legal, writes its tiles to the board.
    /// Nothing is written for an illegal move.
    pub fn place(&mut self, m: &Move) -> PlaceResult {
        let result = self.evaluate(m);
        if !result.is_valid() {
            return result;
        }
        if let Ok(placed) = self.layout(m) {
            for (pos, tile) in placed {
                self[pos].tile = Some(tile);
                self.n_tiles += 1;
            }
            self.move_count += 1;
        }
        result
    }
}

impl std::ops::Index<Position> for Board {
    type Output = BoardSquare;

    fn index(&self, index: Position) -> &Self::Output {
        &self.squares[index.row][index.col]
    }
}

impl std::ops::IndexMut<Position> for Board {
    fn index_mut(&mut self, index: Position) -> &mut Self::Output {
        &mut self.squares[index.row][index.col]
    }
}

/// Plain text grid: tiles as letters (blanks in lower case), empty squares
/// by their multiplier, `*` for an open start square.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.columns {
            write!(f, "{:>3}", col + 1)?;
        }
        writeln!(f)?;
        for (row, squares) in self.squares.iter().enumerate() {
            write!(f, "{:>3}", row + 1)?;
            for (col, square) in squares.iter().enumerate() {
                let c = match square.tile {
                    Some(tile) if tile.is_blank() => tile.face().map_or('?', |c| c.to_ascii_lowercase()),
                    Some(tile) => tile.face().unwrap_or('?'),
                    None if self.start == Position::new(row, col) => '*',
                    None => match (square.letter_multiplier, square.word_multiplier) {
                        (_, 3) => 't',
                        (_, 2) => 'd',
                        (3, _) => '3',
                        (2, _) => '2',
                        _ => '.',
                    },
                };
                write!(f, "{:>3}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(word: &str) -> Vec<TileKind> {
        word.chars().map(|c| TileKind::new(c, 1)).collect()
    }

    fn across(word: &str, row: usize, col: usize) -> Move {
        Move::place(tiles(word), Position::new(row, col), Direction::Across)
    }

    fn down(word: &str, row: usize, col: usize) -> Move {
        Move::place(tiles(word), Position::new(row, col), Direction::Down)
    }

    fn plain() -> Board {
        Board::new(15, 15, Position::new(7, 7))
    }

    #[test]
    fn test_parse_layout() {
        let board = Board::parse("2 3 1 1\n.2d\n3t.\n").unwrap();
        assert_eq!((board.rows(), board.columns()), (2, 3));
        assert_eq!(board.start(), Position::new(1, 1));
        assert_eq!(board[Position::new(0, 1)].letter_multiplier, 2);
        assert_eq!(board[Position::new(0, 2)].word_multiplier, 2);
        assert_eq!(board[Position::new(1, 0)].letter_multiplier, 3);
        assert_eq!(board[Position::new(1, 1)].word_multiplier, 3);
        assert_eq!(board[Position::new(1, 2)], BoardSquare::new(1, 1));

        let odd = Board::parse("1 2 0 0 .T").unwrap();
        assert_eq!(odd[Position::new(0, 1)].word_multiplier, 3);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Board::parse("2 3 1"), Err(LoadError::Board(_))));
        assert!(matches!(Board::parse("2 2 0 0 ..."), Err(LoadError::Board(_))));
        assert!(matches!(Board::parse("2 2 0 0 ....."), Err(LoadError::Board(_))));
        assert!(matches!(Board::parse("2 2 5 0 ...."), Err(LoadError::Board(_))));
        assert!(matches!(Board::parse("x 2 0 0 ...."), Err(LoadError::Board(_))));
    }

    #[test]
    fn test_first_move_must_cover_start() {
        let board = plain();
        assert_eq!(
            board.evaluate(&across("HI", 0, 0)),
            PlaceResult::Invalid(PlaceError::MissesStart)
        );
        let result = board.evaluate(&across("HI", 7, 6));
        assert_eq!(result.words(), ["HI".to_string()]);
        assert_eq!(result.points(), 2);
    }

    #[test]
    fn test_anchor_occupied() {
        let mut board = plain();
        assert!(board.place(&across("HI", 7, 7)).is_valid());
        assert_eq!(
            board.evaluate(&down("AX", 7, 8)),
            PlaceResult::Invalid(PlaceError::AnchorOccupied)
        );
        assert_eq!(board.move_count(), 1);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = plain();
        assert_eq!(
            board.evaluate(&across("ABCDEFGHI", 7, 7)),
            PlaceResult::Invalid(PlaceError::OutOfBounds)
        );
        assert!(board.place(&across("ABCDEFGH", 7, 7)).is_valid());
        // the run steps over the resident tiles and falls off the edge
        assert_eq!(
            board.evaluate(&across("SA", 7, 6)),
            PlaceResult::Invalid(PlaceError::OutOfBounds)
        );
        assert_eq!(
            board.evaluate(&across("S", 7, 15)),
            PlaceResult::Invalid(PlaceError::OutOfBounds)
        );
    }

    #[test]
    fn test_needs_adjacent_tile() {
        let mut board = plain();
        board.place(&across("HI", 7, 7));
        assert_eq!(
            board.evaluate(&across("AT", 2, 2)),
            PlaceResult::Invalid(PlaceError::NoAdjacentTile)
        );
        let empty = Move::place(vec![], Position::new(1, 1), Direction::Down);
        assert_eq!(board.evaluate(&empty).error(), Some(PlaceError::NoTiles));
        let unbound = Move::place(vec![TileKind::blank(0)], Position::new(8, 7), Direction::Down);
        assert_eq!(board.evaluate(&unbound).error(), Some(PlaceError::UnassignedBlank));
    }

    #[test]
    fn test_extends_through_existing_tiles() {
        let mut board = plain();
        board.place(&across("AT", 7, 7));
        // S _ _ E around AT spells SATE
        let result = board.evaluate(&across("SE", 7, 6));
        assert_eq!(result.words(), ["SATE".to_string()]);
        assert_eq!(result.points(), 4);
        // prefix and suffix on the board
        let result = board.evaluate(&across("S", 7, 9));
        assert_eq!(result.words(), ["ATS".to_string()]);
    }

    #[test]
    fn test_cross_words() {
        let mut board = plain();
        let hi = Move::place(
            vec![TileKind::new('H', 4), TileKind::new('I', 1)],
            Position::new(7, 7),
            Direction::Across,
        );
        board.place(&hi);
        let mv = Move::place(
            vec![TileKind::new('O', 1), TileKind::new('N', 1)],
            Position::new(8, 7),
            Direction::Across,
        );
        let result = board.evaluate(&mv);
        assert_eq!(
            result.words(),
            ["ON".to_string(), "HO".to_string(), "IN".to_string()]
        );
        assert_eq!(result.points(), 2 + 5 + 2);
    }

    #[test]
    fn test_multipliers_only_for_new_tiles() {
        let mut board = Board::parse("3 5 1 0\n..d..\nt2..3\n..3..").unwrap();
        board.place(&Move::place(
            vec![TileKind::new('A', 1), TileKind::new('T', 2)],
            Position::new(1, 0),
            Direction::Across,
        ));
        // A already sits on the triple word square, so CA is not tripled
        let cat = Move::place(vec![TileKind::new('C', 3)], Position::new(0, 0), Direction::Down);
        let result = board.evaluate(&cat);
        assert_eq!(result.words(), ["CA".to_string()]);
        assert_eq!(result.points(), 4);

        // new tile on a triple letter square scores it in both words
        let s = Move::place(vec![TileKind::new('S', 2)], Position::new(2, 2), Direction::Across);
        board.place(&Move::place(vec![TileKind::new('E', 1)], Position::new(1, 2), Direction::Across));
        let result = board.evaluate(&s);
        assert_eq!(result.words(), ["ES".to_string()]);
        assert_eq!(result.points(), 1 + 6);

        // double word square doubles the cross-word too
        let o = Move::place(vec![TileKind::new('O', 1)], Position::new(0, 2), Direction::Across);
        let result = board.evaluate(&o);
        assert_eq!(result.words(), ["OE".to_string()]);
        assert_eq!(result.points(), 4);
    }

    #[test]
    fn test_short_primary_run_not_scored() {
        let mut board = plain();
        board.place(&across("HI", 7, 7));
        // a lone tile below H forms only the cross-word
        let result = board.evaluate(&across("O", 8, 7));
        assert_eq!(result.words(), ["HO".to_string()]);
        assert_eq!(result.points(), 2);

        board.set_minimum_word_length(3);
        let result = board.evaluate(&across("O", 8, 7));
        assert!(result.is_valid());
        assert!(result.words().is_empty());
        assert_eq!(result.points(), 0);
    }

    #[test]
    fn test_blank_scores_its_own_points() {
        let board = plain();
        let mv = Move::place(
            vec![TileKind::new('Q', 10), TileKind::blank(0).assign('i')],
            Position::new(7, 7),
            Direction::Down,
        );
        let result = board.evaluate(&mv);
        assert_eq!(result.words(), ["QI".to_string()]);
        assert_eq!(result.points(), 10);
    }

    #[test]
    fn test_evaluate_is_pure() {
        let mut board = plain();
        board.place(&across("HI", 7, 7));
        let mv = down("AAS", 6, 8);
        let first = board.evaluate(&mv);
        let second = board.evaluate(&mv);
        assert_eq!(first, second);
        assert_eq!(board.move_count(), 1);
        assert!(board.letter_at(Position::new(6, 8)).is_none());
    }

    #[test]
    fn test_place_rejects_without_writing() {
        let mut board = plain();
        let result = board.place(&across("HI", 0, 0));
        assert!(!result.is_valid());
        assert!(board.is_empty());
        assert_eq!(board.move_count(), 0);

        board.place(&across("HI", 7, 7));
        assert_eq!(board.letter_at(Position::new(7, 8)), Some('I'));
    }

    #[test]
    fn test_prefix_before() {
        let mut board = plain();
        board.place(&across("HI", 7, 7));
        assert_eq!(board.prefix_before(Position::new(7, 9), Direction::Across), "HI");
        assert_eq!(board.prefix_before(Position::new(8, 8), Direction::Down), "I");
        assert_eq!(board.prefix_before(Position::new(7, 6), Direction::Across), "");
        assert_eq!(board.prefix_before(Position::new(0, 0), Direction::Down), "");
    }

    #[test]
    fn test_anchors() {
        let mut board = plain();
        let anchors = board.get_anchors();
        assert_eq!(
            anchors,
            vec![
                Anchor { pos: Position::new(7, 7), dir: Direction::Across, limit: 7 },
                Anchor { pos: Position::new(7, 7), dir: Direction::Down, limit: 7 },
            ]
        );

        board.place(&across("HI", 7, 7));
        let anchors = board.get_anchors();
        // 2 above, 2 below, 1 left, 1 right; each searched both ways
        assert_eq!(anchors.len(), 12);
        let left = anchors
            .iter()
            .find(|a| a.pos == Position::new(7, 6) && a.dir == Direction::Across)
            .unwrap();
        assert_eq!(left.limit, 6);
        let right = anchors
            .iter()
            .find(|a| a.pos == Position::new(7, 9) && a.dir == Direction::Across)
            .unwrap();
        assert_eq!(right.limit, 0);
        let above_i = anchors
            .iter()
            .find(|a| a.pos == Position::new(6, 8) && a.dir == Direction::Across)
            .unwrap();
        assert_eq!(above_i.limit, 0);
        let above_h = anchors
            .iter()
            .find(|a| a.pos == Position::new(6, 7) && a.dir == Direction::Down)
            .unwrap();
        assert_eq!(above_h.limit, 6);
    }

    #[test]
    fn test_display() {
        let mut board = Board::parse("2 3 0 1\n.2d\n3t.\n").unwrap();
        assert!(board.to_string().contains('*'));
        board.place(&Move::place(
            vec![TileKind::blank(0).assign('O'), TileKind::new('X', 8)],
            Position::new(0, 0),
            Direction::Across,
        ));
        let text = board.to_string();
        assert!(text.contains("  o  X  d"));
        assert!(text.contains("  3  t  ."));
    }
}
