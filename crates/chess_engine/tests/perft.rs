//! Move generator validation
//!
//! Perft counts against published reference values, plus a cross-check of
//! the table-driven check detector against a slow square-walking one.

use chess_engine::board::square_at;
use chess_engine::{perft, perft_divide, Color, PieceKind, Position};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";

fn position(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

/// Piece on (file, rank), or None when off the board or empty
fn piece_on(position: &Position, file: i8, rank: i8) -> Option<(PieceKind, Color)> {
    if !(0..8).contains(&file) || !(0..8).contains(&rank) {
        return None;
    }
    position.piece_at(square_at(file as u8, rank as u8))
}

fn slider_hits(
    position: &Position,
    file: i8,
    rank: i8,
    dirs: &[(i8, i8)],
    kinds: [PieceKind; 2],
    by: Color,
) -> bool {
    for &(df, dr) in dirs {
        let (mut f, mut r) = (file + df, rank + dr);
        while (0..8).contains(&f) && (0..8).contains(&r) {
            if let Some((kind, color)) = piece_on(position, f, r) {
                if color == by && kinds.contains(&kind) {
                    return true;
                }
                break;
            }
            f += df;
            r += dr;
        }
    }
    false
}

/// Reference attack detector that walks the board square by square
fn naive_attacked(position: &Position, square: u8, by: Color) -> bool {
    let (file, rank) = ((square % 8) as i8, (square / 8) as i8);
    let is = |f: i8, r: i8, kind: PieceKind| piece_on(position, file + f, rank + r) == Some((kind, by));

    let knight = [(1, 2), (2, 1), (-1, 2), (-2, 1), (1, -2), (2, -1), (-1, -2), (-2, -1)];
    if knight.iter().any(|&(f, r)| is(f, r, PieceKind::Knight)) {
        return true;
    }
    let king = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)];
    if king.iter().any(|&(f, r)| is(f, r, PieceKind::King)) {
        return true;
    }
    // a pawn attacking this square stands one rank behind it, from the attacker's view
    let behind = if by == Color::White { -1 } else { 1 };
    if is(-1, behind, PieceKind::Pawn) || is(1, behind, PieceKind::Pawn) {
        return true;
    }
    slider_hits(
        position,
        file,
        rank,
        &king[..4],
        [PieceKind::Rook, PieceKind::Queen],
        by,
    ) || slider_hits(
        position,
        file,
        rank,
        &king[4..],
        [PieceKind::Bishop, PieceKind::Queen],
        by,
    )
}

fn naive_in_check(position: &Position, color: Color) -> bool {
    match position.king_square(color) {
        Some(square) => naive_attacked(position, square, !color),
        None => true,
    }
}

/// Walk the legal tree and compare both detectors at every node
fn cross_check(position: &Position, depth: u32) -> u64 {
    let mut compared = 0;
    for color in Color::BOTH {
        assert_eq!(
            position.is_in_check(color),
            naive_in_check(position, color),
            "check detectors disagree for {color} in {}",
            position.to_fen()
        );
        compared += 1;
    }
    if depth == 0 {
        return compared;
    }
    for (mv, child) in position.legal_children().unwrap() {
        let mover = position.side_to_move();
        assert!(
            !naive_in_check(&child, mover),
            "{mv} leaves the king attacked in {}",
            position.to_fen()
        );
        compared += cross_check(&child, depth - 1);
    }
    compared
}

#[test]
fn test_perft_start_position() {
    //! Published counts for the initial position
    //!
    //! Depth 3 is the first depth where captures and checks appear.

    let start = Position::startpos();
    assert_eq!(perft(&start, 1).unwrap(), 20);
    assert_eq!(perft(&start, 2).unwrap(), 400);
    assert_eq!(perft(&start, 3).unwrap(), 8_902);
}

#[test]
fn test_perft_kiwipete() {
    //! "Kiwipete" exercises castling both ways, pins and promotions-in-waiting

    let kiwipete = position(KIWIPETE);
    assert_eq!(perft(&kiwipete, 1).unwrap(), 48);
    assert_eq!(perft(&kiwipete, 2).unwrap(), 2_039);
}

#[test]
fn test_perft_position_3() {
    //! Rook and pawn endgame rich in en passant and discovered checks

    let endgame = position(POSITION_3);
    assert_eq!(perft(&endgame, 1).unwrap(), 14);
    assert_eq!(perft(&endgame, 2).unwrap(), 191);
    assert_eq!(perft(&endgame, 3).unwrap(), 2_812);
}

#[test]
fn test_perft_position_4() {
    //! White in check at the root with promotions and castling for black

    let tactical = position(POSITION_4);
    assert_eq!(perft(&tactical, 1).unwrap(), 6);
    assert_eq!(perft(&tactical, 2).unwrap(), 264);
}

#[test]
fn test_divide_matches_perft() {
    //! The per-move split adds up to the whole and lists every legal move once

    let kiwipete = position(KIWIPETE);
    let split = perft_divide(&kiwipete, 2).unwrap();
    assert_eq!(split.len(), 48);
    assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 2_039);
    let castles: Vec<String> = split
        .iter()
        .map(|(mv, _)| mv.to_string())
        .filter(|text| text == "e1g1" || text == "e1c1")
        .collect();
    assert_eq!(castles, ["e1c1", "e1g1"]);
}

#[test]
fn test_check_detection_matches_reference() {
    //! Table lookups and ray subtraction agree with a naive board walk
    //!
    //! Covers every node two plies deep from four positions with different
    //! piece mixes.

    let mut compared = 0;
    for fen in [chess_engine::constants::START_FEN, KIWIPETE, POSITION_3, POSITION_4] {
        compared += cross_check(&position(fen), 2);
    }
    assert!(compared > 5_000, "only {compared} comparisons ran");
}

#[test]
fn test_occupied_count_rule_over_tree() {
    //! A move removes exactly one piece when it captures and none otherwise

    let kiwipete = position(KIWIPETE);
    for (mv, child) in kiwipete.legal_children().unwrap() {
        let captured = kiwipete.piece_at(mv.to()).is_some()
            || (kiwipete.en_passant() == Some(mv.to())
                && kiwipete.piece_at(mv.from()).map(|(kind, _)| kind) == Some(PieceKind::Pawn));
        let expected = kiwipete.piece_count() - u32::from(captured);
        assert_eq!(child.piece_count(), expected, "after {mv}");
    }
}
