use std::path::{Path, PathBuf};

use scrabble_engine::scrabble::{
    Board, Dictionary, Direction, Move, MoveGenerator, Position, ScoredMove, SearchOptions, TileKind,
    TilePool,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config").join(name)
}

fn dictionary() -> Dictionary {
    Dictionary::read(fixture("dictionary.txt")).unwrap()
}

fn board(name: &str) -> Board {
    Board::read(fixture(name)).unwrap()
}

fn hand(tiles: &[(char, u32)]) -> TilePool {
    tiles
        .iter()
        .map(|&(c, points)| match c {
            '?' => TileKind::blank(points),
            c => TileKind::new(c, points),
        })
        .collect()
}

const BATONS: &[(char, u32)] = &[('A', 3), ('B', 1), ('F', 2), ('T', 1), ('N', 3), ('O', 7), ('S', 4)];
const BLANK_FOR_O: &[(char, u32)] = &[('A', 3), ('B', 1), ('F', 2), ('T', 1), ('N', 3), ('?', 1), ('S', 4)];
const BLANK_FOR_S: &[(char, u32)] = &[('A', 3), ('B', 1), ('F', 2), ('T', 1), ('N', 3), ('O', 7), ('?', 1)];

/// Puts a word down with one point tiles, skipping squares already taken
fn place(board: &mut Board, word: &str, row: usize, col: usize, dir: Direction) {
    let tiles = word.chars().map(|c| TileKind::new(c, 1)).collect();
    let mv = Move::place(tiles, Position::new(row, col), dir);
    assert!(board.place(&mv).is_valid(), "setup move {} rejected", mv);
}

fn hi(board: &mut Board) {
    place(board, "HI", 7, 7, Direction::Across);
}

fn search(board: &Board, dict: &Dictionary, tiles: &[(char, u32)]) -> ScoredMove {
    let mut pool = hand(tiles);
    let before = pool.clone();
    let best = MoveGenerator::new(board, dict).best_move(&mut pool).unwrap();
    assert_eq!(pool, before, "search must leave the hand untouched");
    best
}

fn check(best: &ScoredMove, points: u32, words: &[&str], row: usize, col: usize, dir: Direction, spelling: &str) {
    assert_eq!(best.points, points);
    assert_eq!(best.words, words);
    assert_eq!(best.mv.pos, Position::new(row, col));
    assert_eq!(best.mv.dir, dir);
    assert_eq!(best.mv.spelling(), spelling);
}

#[test]
fn empty_plain_board() {
    let best = search(&board("board0.txt"), &dictionary(), BATONS);
    check(&best, 19, &["BATONS"], 2, 7, Direction::Down, "BATONS");
}

#[test]
fn empty_standard_board() {
    let best = search(&board("standard-board.txt"), &dictionary(), BATONS);
    check(&best, 24, &["FATSO"], 7, 7, Direction::Across, "FATSO");
}

#[test]
fn empty_board_with_blank() {
    let best = search(&board("board0.txt"), &dictionary(), BLANK_FOR_O);
    check(&best, 14, &["FAINTS"], 2, 7, Direction::Down, "FAiNTS");
    assert!(best.mv.tiles[2].is_blank());

    // a standard blank is worth nothing
    let free_blank = &[('A', 3), ('B', 1), ('F', 2), ('T', 1), ('N', 3), ('?', 0), ('S', 4)];
    let best = search(&board("board0.txt"), &dictionary(), free_blank);
    check(&best, 13, &["FAINTS"], 2, 7, Direction::Down, "FAiNTS");
}

#[test]
fn builds_cross_words() {
    let mut board = board("board0.txt");
    hi(&mut board);
    let best = search(&board, &dictionary(), BATONS);
    check(&best, 31, &["BATONS", "HO", "IN"], 8, 4, Direction::Across, "BATONS");
}

#[test]
fn blank_leads_a_word() {
    let mut board = board("board0.txt");
    hi(&mut board);
    let best = search(&board, &dictionary(), BLANK_FOR_S);
    check(&best, 29, &["CONFAB", "HO", "IN"], 8, 6, Direction::Across, "cONFAB");
}

#[test]
fn multipliers_on_standard_board() {
    let mut board = board("standard-board.txt");
    hi(&mut board);
    let dict = dictionary();
    let best = search(&board, &dict, BATONS);
    check(&best, 40, &["BOAST", "AH", "SI"], 6, 5, Direction::Across, "BOAST");

    let best = search(&board, &dict, BLANK_FOR_S);
    check(&best, 38, &["OATEN", "HIT"], 5, 9, Direction::Down, "OATeN");
}

#[test]
fn plays_through_resident_tile() {
    let mut board = board("board0.txt");
    hi(&mut board);
    place(&mut board, "AA", 5, 7, Direction::Down);
    let best = search(&board, &dictionary(), BATONS);
    check(&best, 27, &["BASTION", "AS", "AT"], 3, 8, Direction::Down, "BASTON");
}

#[test]
fn hooks_onto_existing_word() {
    let mut board = board("standard-board.txt");
    hi(&mut board);
    place(&mut board, "AA", 5, 7, Direction::Down);
    let best = search(&board, &dictionary(), BATONS);
    check(&best, 39, &["BATONS", "HIS"], 2, 9, Direction::Down, "BATONS");
}

#[test]
fn parallel_agrees_with_sequential() {
    let mut board = board("standard-board.txt");
    hi(&mut board);
    place(&mut board, "AA", 5, 7, Direction::Down);
    let dict = dictionary();
    let options = SearchOptions {
        parallel: true,
        max_nodes_per_anchor: None,
    };
    let mut pool = hand(BATONS);
    let parallel = MoveGenerator::with_options(&board, &dict, options)
        .best_move(&mut pool)
        .unwrap();
    assert_eq!(parallel, search(&board, &dict, BATONS));
    assert_eq!(pool, hand(BATONS));
}

#[test]
fn parallel_lines_under_long_word() {
    let mut board = board("board0.txt");
    place(&mut board, "BLIZZARD", 7, 7, Direction::Across);
    let tiles = &[('A', 2), ('B', 3), ('K', 2), ('T', 1), ('N', 3), ('O', 7), ('S', 4)];
    let best = search(&board, &dictionary(), tiles);
    check(&best, 32, &["BOAS", "BO", "LA", "IS"], 8, 6, Direction::Across, "BOAS");
}

#[test]
fn fits_into_concave_gap() {
    let mut board = board("board0.txt");
    place(&mut board, "AUNTY", 7, 7, Direction::Across);
    place(&mut board, "BER", 5, 7, Direction::Down);
    place(&mut board, "ANLER", 5, 10, Direction::Down);
    place(&mut board, "I", 6, 9, Direction::Down);
    let best = search(&board, &dictionary(), BATONS);
    check(&best, 26, &["BOAST", "BE", "OR"], 9, 9, Direction::Down, "BOAST");
}

#[test]
fn candidates_with_bad_cross_words_are_dropped() {
    let mut board = board("board0.txt");
    hi(&mut board);
    let dict = dictionary();
    let mut pool = hand(BATONS);
    let generator = MoveGenerator::new(&board, &dict);

    // AB above HI is a word, but it stacks B on I to make BI
    let ab = Move::place(
        vec![TileKind::new('A', 3), TileKind::new('B', 1)],
        Position::new(6, 7),
        Direction::Across,
    );
    let candidates = generator.candidates(&mut pool);
    assert!(candidates.contains(&ab));
    assert!(candidates.iter().all(|mv| !mv.tiles.is_empty()));
    assert_eq!(board.evaluate(&ab).words(), ["AB", "AH", "BI"]);
    assert!(!dict.is_word("BI"));

    let best = generator.best_move(&mut pool).unwrap();
    assert!(best.words.iter().all(|w| dict.is_word(w)));
}
