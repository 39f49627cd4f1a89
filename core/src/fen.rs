/// FEN (Forsyth-Edwards Notation) import.
/// Positions are only read; the halfmove and fullmove fields are accepted
/// but not tracked.
use crate::board::Board;
use crate::error::FenError;
use crate::game_state::GameState;
use crate::types::{CastlingRights, Color, File, Piece, PieceType, Rank, Square};

impl GameState {
    /// Parses a FEN string into a game state with legal moves computed.
    /// Standard starting position: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 4 && parts.len() != 6 {
            return Err(FenError::InvalidFormat(format!(
                "Expected 4 or 6 fields, got {}",
                parts.len()
            )));
        }

        let board = parse_board(parts[0])?;

        let turn = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenError::InvalidColor(parts[1].to_string())),
        };

        let castling = parse_castling(parts[2])?;
        let en_passant = parse_en_passant(parts[3], turn, &board)?;

        let mut state = GameState::from_parts(board, turn, castling, en_passant)?;
        state.refresh_legal_moves();
        Ok(state)
    }
}

/// Parses the board portion of a FEN string.
fn parse_board(board_str: &str) -> Result<Board, FenError> {
    let mut board = Board::empty();
    let ranks: Vec<&str> = board_str.split('/').collect();

    if ranks.len() != 8 {
        return Err(FenError::InvalidFormat(format!(
            "Expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        // FEN lists rank 8 first
        let rank = Rank::new(7 - rank_idx as u8)
            .ok_or_else(|| FenError::InvalidFormat(board_str.to_string()))?;
        let mut file_idx = 0u8;

        for ch in rank_str.chars() {
            if let Some(skip) = ch.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(FenError::InvalidFormat(format!("Bad empty count '{ch}'")));
                }
                file_idx += skip as u8;
            } else {
                let piece = Piece::from_char(ch).ok_or(FenError::InvalidPiece(ch))?;
                let file = File::new(file_idx).ok_or_else(|| {
                    FenError::InvalidFormat(format!("Rank '{rank_str}' is too long"))
                })?;
                board.set_piece(Square::new(file, rank), Some(piece));
                file_idx += 1;
            }

            if file_idx > 8 {
                return Err(FenError::InvalidFormat(format!(
                    "Rank '{rank_str}' is too long"
                )));
            }
        }

        if file_idx != 8 {
            return Err(FenError::InvalidFormat(format!(
                "Rank '{rank_str}' covers {file_idx} files"
            )));
        }
    }

    Ok(board)
}

/// Parses castling rights from FEN.
fn parse_castling(castling_str: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    if castling_str == "-" {
        return Ok(rights);
    }

    for ch in castling_str.chars() {
        match ch {
            'K' => rights.white.kingside = true,
            'Q' => rights.white.queenside = true,
            'k' => rights.black.kingside = true,
            'q' => rights.black.queenside = true,
            _ => return Err(FenError::InvalidCastling(castling_str.to_string())),
        }
    }

    Ok(rights)
}

/// Parses the en passant target. It must be the empty square a double push
/// just skipped: the pushed pawn stands beyond it and its start square is empty.
fn parse_en_passant(
    ep_str: &str,
    turn: Color,
    board: &Board,
) -> Result<Option<Square>, FenError> {
    if ep_str == "-" {
        return Ok(None);
    }

    let invalid = || FenError::InvalidEnPassant(ep_str.to_string());
    let square: Square = ep_str.parse().map_err(|_| invalid())?;
    let expected_rank = match turn {
        Color::White => Rank::Sixth,
        Color::Black => Rank::Third,
    };
    if square.rank() != expected_rank {
        return Err(invalid());
    }

    // The side that just moved pushed toward the side to move.
    let pushed = turn.opponent();
    let direction = pushed.pawn_direction();
    let victim = square.offset(0, direction).ok_or_else(invalid)?;
    let origin = square.offset(0, -direction).ok_or_else(invalid)?;

    let victim_is_pawn = board
        .piece_at(victim)
        .is_some_and(|p| p.is(PieceType::Pawn, pushed));
    if !victim_is_pawn || !board.is_empty(square) || !board.is_empty(origin) {
        return Err(invalid());
    }

    Ok(Some(square))
}

/// Reference positions used by tests, perft and benchmarks.
pub mod positions {
    pub const STARTING: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    pub const KIWIPETE: &str =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    /// Position 3 from CPW: en passant and discovered checks along the rank.
    pub const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    pub const FOOLS_MATE: &str = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";

    pub const BACK_RANK_MATE: &str = "3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1";

    pub const STALEMATE: &str = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1";
}
