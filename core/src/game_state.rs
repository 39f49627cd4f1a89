/// Complete game state: board, turn, castling rights, en passant target,
/// the undo stack, and the check/pin/terminal data derived from them.
use crate::board::*;
use crate::error::{MoveError, PositionError};
use crate::move_gen::generate_legal_moves;
use crate::types::*;

/// Everything needed to take back one applied move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UndoRecord {
    pub mv: Move,
    pub captured: Option<Piece>,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) turn: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    /// Indexed by `Color::index()`.
    pub(crate) king_squares: [Square; 2],
    pub(crate) history: Vec<UndoRecord>,

    // Derived for the side to move.
    pub(crate) in_check: bool,
    pub(crate) checks: Vec<Square>,
    pub(crate) pins: Vec<Square>,
    pub(crate) checkmate: bool,
    pub(crate) stalemate: bool,
    legal_moves: Vec<Move>,
}

impl GameState {
    /// Creates a new game in the starting position, legal moves computed.
    pub fn new() -> Self {
        let mut state = Self::from_parts(
            Board::starting_position(),
            Color::White,
            CastlingRights::all(),
            None,
        )
        .expect("starting position has both kings");
        state.refresh_legal_moves();
        state
    }

    /// Builds a state around an arbitrary board. Check and pin data are
    /// computed; legal moves are not until `refresh_legal_moves`.
    pub fn from_parts(
        board: Board,
        turn: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
    ) -> Result<Self, PositionError> {
        let white_king = board.find_king(Color::White)?;
        let black_king = board.find_king(Color::Black)?;

        let mut state = Self {
            board,
            turn,
            castling,
            en_passant,
            king_squares: [white_king, black_king],
            history: Vec::new(),
            in_check: false,
            checks: Vec::new(),
            pins: Vec::new(),
            checkmate: false,
            stalemate: false,
            legal_moves: Vec::new(),
        };
        state.update_check_and_pins();
        Ok(state)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move.
    pub fn side_to_move(&self) -> Color {
        self.turn
    }

    pub fn white_to_move(&self) -> bool {
        self.turn == Color::White
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    /// True if the side to move is in check.
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    /// Squares of pieces giving check to the side to move.
    pub fn checks(&self) -> &[Square] {
        &self.checks
    }

    /// Squares of the side to move's pieces pinned to their king.
    pub fn pins(&self) -> &[Square] {
        &self.pins
    }

    /// Valid only after a legal move computation.
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// Valid only after a legal move computation.
    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    /// Legal moves from the last `refresh_legal_moves`; empty after any mutation.
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    pub fn history(&self) -> impl Iterator<Item = &Move> + '_ {
        self.history.iter().map(|record| &record.mv)
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|record| record.mv)
    }

    /// Recomputes and caches the legal moves, updating checkmate/stalemate.
    pub fn refresh_legal_moves(&mut self) -> &[Move] {
        let moves = generate_legal_moves(self);
        self.legal_moves.clear();
        self.legal_moves.extend(moves.iter().copied());
        &self.legal_moves
    }

    /// Finds a cached legal move between two squares.
    pub fn find_legal_move(&self, from: Square, to: Square) -> Option<Move> {
        self.legal_moves
            .iter()
            .find(|mv| mv.from == from && mv.to == to)
            .copied()
    }

    /// Applies `mv` if it is in the cached legal set, then refreshes it.
    pub fn make_legal_move(&mut self, mv: Move) -> Result<(), MoveError> {
        let Some(&legal) = self.legal_moves.iter().find(|m| **m == mv) else {
            return Err(MoveError::Illegal(mv));
        };
        self.apply(legal);
        self.refresh_legal_moves();
        Ok(())
    }

    /// Applies a move in place. The move must come from generation;
    /// no legality checking happens here.
    pub fn apply(&mut self, mv: Move) {
        let color = mv.piece.color;
        let captured = if mv.en_passant {
            self.board.piece_at(mv.en_passant_victim())
        } else {
            self.board.piece_at(mv.to)
        };
        debug_assert_eq!(self.board.piece_at(mv.from), Some(mv.piece));

        self.history.push(UndoRecord {
            mv,
            captured,
            castling: self.castling,
            en_passant: self.en_passant,
        });

        self.board.set_piece(mv.from, None);
        self.board.set_piece(mv.to, Some(mv.piece));

        if mv.piece.piece_type == PieceType::King {
            self.king_squares[color.index()] = mv.to;
        }

        if mv.promotion {
            self.board
                .set_piece(mv.to, Some(Piece::new(PieceType::Queen, color)));
        }

        if mv.en_passant {
            self.board.set_piece(mv.en_passant_victim(), None);
        }

        if mv.castle {
            let (rook_from, rook_to) = mv.castle_rook_squares();
            let rook = self.board.piece_at(rook_from);
            self.board.set_piece(rook_from, None);
            self.board.set_piece(rook_to, rook);
        }

        self.en_passant = double_push_target(&mv);
        self.castling = self.castling.after_move(&Move { captured, ..mv });
        self.turn = self.turn.opponent();

        self.after_mutation();
    }

    /// Takes back the last applied move. Does nothing on an empty history.
    pub fn undo(&mut self) {
        let Some(record) = self.history.pop() else {
            return;
        };
        let mv = record.mv;
        let color = mv.piece.color;

        self.board.set_piece(mv.from, Some(mv.piece));
        if mv.en_passant {
            self.board.set_piece(mv.to, None);
            self.board.set_piece(mv.en_passant_victim(), record.captured);
        } else {
            self.board.set_piece(mv.to, record.captured);
        }

        if mv.piece.piece_type == PieceType::King {
            self.king_squares[color.index()] = mv.from;
        }

        if mv.castle {
            let (rook_from, rook_to) = mv.castle_rook_squares();
            let rook = self.board.piece_at(rook_to);
            self.board.set_piece(rook_to, None);
            self.board.set_piece(rook_from, rook);
        }

        self.castling = record.castling;
        self.en_passant = match self.history.last() {
            Some(previous) => double_push_target(&previous.mv),
            None => record.en_passant,
        };
        debug_assert_eq!(self.en_passant, record.en_passant);
        self.turn = color;

        self.after_mutation();
    }

    fn after_mutation(&mut self) {
        self.update_check_and_pins();
        self.checkmate = false;
        self.stalemate = false;
        self.legal_moves.clear();
    }

    pub(crate) fn set_terminal_flags(&mut self, has_legal_moves: bool) {
        self.checkmate = !has_legal_moves && self.in_check;
        self.stalemate = !has_legal_moves && !self.in_check;
    }
}

/// The square a pawn skipped over, if `mv` was a two-square push.
fn double_push_target(mv: &Move) -> Option<Square> {
    if mv.piece.piece_type != PieceType::Pawn {
        return None;
    }
    let from_rank = mv.from.rank().index();
    let to_rank = mv.to.rank().index();
    if from_rank.abs_diff(to_rank) != 2 {
        return None;
    }
    Rank::new((from_rank + to_rank) / 2).map(|rank| Square::new(mv.from.file(), rank))
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
