//! FEN ingestion
//!
//! The position layer reads the first three FEN fields (placement, side to
//! move, castling rights) and ignores the rest; the en-passant square and the
//! clocks belong to the game record in [`api`](crate::api). A FEN is still
//! required to have all six fields.

use crate::board::{square_at, write_square, Position};
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::types::{CastlingRights, Color, PieceKind};
use std::fmt::Write;
use std::str::FromStr;

/// Number of whitespace-separated FEN fields
pub const FEN_FIELDS: usize = 6;

impl Position {
    /// Build a position from FEN text
    ///
    /// # Arguments
    ///
    /// * `text` - Six-field FEN; only placement, side and castling are used
    ///
    /// # Returns
    ///
    /// The position with the engine color set to the side to move, or
    /// `InvalidFen` describing the first problem found.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let position = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1")?;
    /// assert_eq!(position.piece_count(), 3);
    /// ```
    pub fn from_fen(text: &str) -> ChessEngineResult<Position> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != FEN_FIELDS {
            return Err(ChessEngineError::fen(format!(
                "expected {FEN_FIELDS} fields, found {}",
                fields.len()
            )));
        }

        let mut position = Position::empty();
        parse_placement(&mut position, fields[0])?;

        position.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessEngineError::fen(format!(
                    "side to move must be 'w' or 'b', found {other:?}"
                )))
            }
        };
        position.engine_color = position.side_to_move;
        position.castling = parse_castling(fields[2])?;

        Ok(position)
    }

    /// Replace this position with a parsed FEN, leaving it untouched on error
    pub fn set_fen(&mut self, text: &str) -> ChessEngineResult<()> {
        *self = Position::from_fen(text)?;
        Ok(())
    }

    /// Render as FEN; clocks are always written as `0 1`
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(square_at(file, rank)) {
                    Some((kind, color)) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(kind.fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        let _ = write!(fen, " {} {} ", self.side_to_move.fen_char(), self.castling);
        match self.en_passant {
            Some(square) => {
                let _ = write_square(&mut fen, square);
            }
            None => fen.push('-'),
        }
        fen.push_str(" 0 1");
        fen
    }
}

impl FromStr for Position {
    type Err = ChessEngineError;

    fn from_str(text: &str) -> ChessEngineResult<Position> {
        Position::from_fen(text)
    }
}

fn parse_placement(position: &mut Position, placement: &str) -> ChessEngineResult<()> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessEngineError::fen(format!(
            "placement needs 8 ranks, found {}",
            ranks.len()
        )));
    }

    // FEN lists rank 8 first
    for (row, rank_text) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file: u8 = 0;
        for c in rank_text.chars() {
            if let Some(skip) = c.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(ChessEngineError::fen(format!("bad empty-square count {c:?}")));
                }
                file += skip as u8;
            } else {
                let (kind, color) = PieceKind::from_fen_char(c)
                    .ok_or_else(|| ChessEngineError::fen(format!("unrecognized piece letter {c:?}")))?;
                if file > 7 {
                    return Err(ChessEngineError::fen(format!("rank {} overflows", rank + 1)));
                }
                position.put_piece(kind, color, square_at(file, rank));
                file += 1;
            }
            if file > 8 {
                return Err(ChessEngineError::fen(format!("rank {} overflows", rank + 1)));
            }
        }
        if file != 8 {
            return Err(ChessEngineError::fen(format!(
                "rank {} describes {file} files",
                rank + 1
            )));
        }
    }

    for color in Color::BOTH {
        if position.pieces(PieceKind::King, color).count_ones() > 1 {
            return Err(ChessEngineError::fen(format!("more than one {color} king")));
        }
    }
    Ok(())
}

fn parse_castling(field: &str) -> ChessEngineResult<CastlingRights> {
    if field == "-" {
        return Ok(CastlingRights::NONE);
    }
    let mut rights = CastlingRights::NONE;
    for c in field.chars() {
        rights.insert(match c {
            'K' => CastlingRights::WHITE_KINGSIDE,
            'Q' => CastlingRights::WHITE_QUEENSIDE,
            'k' => CastlingRights::BLACK_KINGSIDE,
            'q' => CastlingRights::BLACK_QUEENSIDE,
            other => {
                return Err(ChessEngineError::fen(format!(
                    "unrecognized castling flag {other:?}"
                )))
            }
        });
    }
    Ok(rights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{START_FEN, H1};

    #[test]
    fn test_start_fen_matches_startpos() {
        let parsed = Position::from_fen(START_FEN).unwrap();
        assert_eq!(parsed, Position::startpos());
        assert_eq!(parsed.to_fen(), START_FEN);
    }

    #[test]
    fn test_reads_only_first_three_fields() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/4K2R b K e3 12 40").unwrap();
        assert_eq!(position.side_to_move(), Color::Black);
        assert_eq!(position.engine_color(), Color::Black);
        assert_eq!(position.castling(), CastlingRights::WHITE_KINGSIDE);
        assert_eq!(position.en_passant(), None, "field 4 belongs to the caller");
        assert_eq!(position.piece_at(H1), Some((PieceKind::Rook, Color::White)));
        assert!(position.is_consistent());
    }

    #[test]
    fn test_rejects_field_count_mismatch() {
        let err = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K -").unwrap_err();
        assert!(matches!(err, ChessEngineError::InvalidFen { .. }));
    }

    #[test]
    fn test_rejects_bad_placement() {
        let bad = [
            "4x3/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8 w - - 0 1",
            "4k4/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k2/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 x - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w X - 0 1",
            "4k3/8/8/8/8/8/8/3KK3 w - - 0 1",
        ];
        for fen in bad {
            assert!(Position::from_fen(fen).is_err(), "{fen} should be rejected");
        }
    }

    #[test]
    fn test_set_fen_leaves_state_on_error() {
        let mut position = Position::startpos();
        assert!(position.set_fen("not a fen").is_err());
        assert_eq!(position, Position::startpos());

        position.set_fen("8/8/8/8/8/8/8/K6k w - - 0 1").unwrap();
        assert_eq!(position.piece_count(), 2);
    }

    #[test]
    fn test_to_fen_writes_en_passant() {
        let position = Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - - 0 1")
            .unwrap()
            .with_en_passant(Some(20));
        assert_eq!(position.to_fen(), "4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1");
    }
}
