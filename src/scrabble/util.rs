use std::fmt;
use std::slice::Iter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    pub fn iter() -> Iter<'static, Direction> {
        static DIRS: [Direction; 2] = [Direction::Across, Direction::Down];
        DIRS.iter()
    }

    pub fn flip(&self) -> Self {
        match self {
            Self::Across => Self::Down,
            Self::Down => Self::Across,
        }
    }
}

/// Square coordinates. Positions know nothing about board size; the board
/// decides what is in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Moves `distance` squares along `dir` (negative goes up / left).
    /// Returns None when that would step past row or column zero
    pub fn translate(&self, dir: Direction, distance: isize) -> Option<Position> {
        let mut p = *self;
        p[dir] = p[dir].checked_add_signed(distance)?;
        Some(p)
    }

    /// Returns the next position in the given direction
    pub fn next(&self, dir: Direction) -> Option<Position> {
        self.translate(dir, 1)
    }

    /// Returns the previous position in the given direction
    pub fn prev(&self, dir: Direction) -> Option<Position> {
        self.translate(dir, -1)
    }

    /// Returns all the adjacent positions that do not fall off the top or left edge
    pub fn adjacent(&self) -> Vec<Position> {
        let mut result = Vec::new();
        for d in Direction::iter() {
            if let Some(pos) = self.next(*d) {
                result.push(pos);
            }
            if let Some(pos) = self.prev(*d) {
                result.push(pos);
            }
        }
        result
    }
}

impl std::ops::Index<Direction> for Position {
    type Output = usize;

    fn index(&self, index: Direction) -> &Self::Output {
        match index {
            Direction::Across => &self.col,
            Direction::Down => &self.row,
        }
    }
}

impl std::ops::IndexMut<Direction> for Position {
    fn index_mut(&mut self, index: Direction) -> &mut Self::Output {
        match index {
            Direction::Across => &mut self.col,
            Direction::Down => &mut self.row,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Letter {
    Blank,
    Letter(char),
}

impl From<char> for Letter {
    fn from(c: char) -> Self {
        if c == '?' {
            Letter::Blank
        } else {
            Letter::Letter(c.to_ascii_uppercase())
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Letter::Blank => write!(f, "?"),
            Letter::Letter(l) => write!(f, "{}", l),
        }
    }
}

/// A single tile. Blanks carry the letter they were bound to once placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKind {
    pub letter: Letter,
    pub points: u32,
    pub assigned: Option<char>,
}

impl TileKind {
    pub fn new(letter: impl Into<Letter>, points: u32) -> Self {
        Self {
            letter: letter.into(),
            points,
            assigned: None,
        }
    }

    pub fn blank(points: u32) -> Self {
        Self::new(Letter::Blank, points)
    }

    /// Binds a blank to `letter`. Concrete tiles are returned unchanged
    pub fn assign(mut self, letter: char) -> Self {
        if self.is_blank() {
            self.assigned = Some(letter.to_ascii_uppercase());
        }
        self
    }

    pub fn is_blank(&self) -> bool {
        self.letter == Letter::Blank
    }

    /// The letter this tile spells on the board
    pub fn face(&self) -> Option<char> {
        match self.letter {
            Letter::Letter(l) => Some(l),
            Letter::Blank => self.assigned,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Place,
    Exchange,
    Pass,
}

/// A player's intended action. Placements are not validated until they are
/// evaluated against a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub kind: MoveKind,
    pub tiles: Vec<TileKind>,
    pub pos: Position,
    pub dir: Direction,
}

impl Move {
    pub fn place(tiles: Vec<TileKind>, pos: Position, dir: Direction) -> Self {
        Self {
            kind: MoveKind::Place,
            tiles,
            pos,
            dir,
        }
    }

    pub fn exchange(tiles: Vec<TileKind>) -> Self {
        Self {
            kind: MoveKind::Exchange,
            tiles,
            pos: Position::new(0, 0),
            dir: Direction::Across,
        }
    }

    pub fn pass() -> Self {
        Self {
            kind: MoveKind::Pass,
            tiles: Vec::new(),
            pos: Position::new(0, 0),
            dir: Direction::Across,
        }
    }

    /// Letters spelled by the tiles this move puts down, blanks in lower case
    pub fn spelling(&self) -> String {
        self.tiles
            .iter()
            .map(|t| match (t.letter, t.assigned) {
                (Letter::Blank, Some(a)) => a.to_ascii_lowercase(),
                (Letter::Blank, None) => '?',
                (Letter::Letter(l), _) => l,
            })
            .collect()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            MoveKind::Pass => write!(f, "PASS"),
            MoveKind::Exchange => write!(f, "EXCHANGE {}", self.spelling()),
            MoveKind::Place => {
                let dir = match self.dir {
                    Direction::Across => '-',
                    Direction::Down => '|',
                };
                write!(
                    f,
                    "PLACE {} {} {} {}",
                    dir,
                    self.pos.row + 1,
                    self.pos.col + 1,
                    self.spelling()
                )
            }
        }
    }
}
