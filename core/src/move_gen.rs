use crate::attacks::{DIAGONALS, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONALS};
use crate::game_state::GameState;
use crate::types::{Color, File, Move, Piece, PieceType, Square};

const MAX_MOVES: usize = 256;

/// A list of moves with a fixed capacity to avoid allocations.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    count: usize,
}

impl MoveList {
    /// Creates an empty move list.
    pub const fn new() -> Self {
        Self {
            moves: [Move::NULL; MAX_MOVES],
            count: 0,
        }
    }

    /// Adds a move to the list.
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.count < MAX_MOVES, "Move list overflow");
        self.moves[self.count] = mv;
        self.count += 1;
    }

    /// Returns the number of moves.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns an iterator over the moves.
    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.as_slice().iter()
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.count]
    }

    pub fn contains(&self, mv: &Move) -> bool {
        self.as_slice().contains(mv)
    }

    /// Clears the move list.
    pub fn clear(&mut self) {
        self.count = 0;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// Generates all legal moves for the side to move and records
/// checkmate/stalemate on the state. The position is restored, but the
/// cached legal moves are invalidated; use `GameState::refresh_legal_moves`
/// to read them back through the state.
pub fn generate_legal_moves(state: &mut GameState) -> MoveList {
    let color = state.side_to_move();
    let mut candidates = MoveList::new();

    if state.in_double_check() {
        let king = state.king_square(color);
        generate_king_moves(state, king, color, &mut candidates);
    } else {
        generate_pseudo_legal_moves(state, &mut candidates);
        if !state.in_check() {
            generate_castling_moves(state, color, &mut candidates);
        }
    }

    let mut legal = MoveList::new();
    for &mv in candidates.iter() {
        if leaves_king_safe(state, mv) {
            legal.push(mv);
        }
    }

    state.set_terminal_flags(!legal.is_empty());
    legal
}

/// Simulates `mv` and reports whether the mover's king survives it.
fn leaves_king_safe(state: &mut GameState, mv: Move) -> bool {
    let mover = mv.piece.color;
    state.apply(mv);
    let safe = !state.square_is_attacked(state.king_square(mover), mover.opponent());
    state.undo();
    safe
}

/// Generates all pseudo-legal moves (not checking for king safety),
/// scanning the board a1..h8. Castling is not included.
pub fn generate_pseudo_legal_moves(state: &GameState, moves: &mut MoveList) {
    let color = state.side_to_move();

    for (from, piece) in state.board().pieces() {
        if piece.color != color {
            continue;
        }
        match piece.piece_type {
            PieceType::Pawn => generate_pawn_moves(state, from, color, moves),
            PieceType::Knight => generate_leaper_moves(state, from, piece, &KNIGHT_OFFSETS, moves),
            PieceType::Bishop => generate_sliding_moves(state, from, piece, &DIAGONALS, moves),
            PieceType::Rook => generate_sliding_moves(state, from, piece, &ORTHOGONALS, moves),
            PieceType::Queen => {
                generate_sliding_moves(state, from, piece, &ORTHOGONALS, moves);
                generate_sliding_moves(state, from, piece, &DIAGONALS, moves);
            }
            PieceType::King => generate_king_moves(state, from, color, moves),
        }
    }
}

/// Generates pawn moves from one square.
fn generate_pawn_moves(state: &GameState, from: Square, color: Color, moves: &mut MoveList) {
    let board = state.board();
    let pawn = Piece::new(PieceType::Pawn, color);
    let direction = color.pawn_direction();
    let promotion_rank = color.promotion_rank();

    let push = |to: Square, captured: Option<Piece>, moves: &mut MoveList| {
        if to.rank() == promotion_rank {
            moves.push(Move::new_promotion(from, to, pawn, captured));
        } else {
            moves.push(Move::new(from, to, pawn, captured));
        }
    };

    // Single push, then double push from the home rank
    if let Some(one) = from.offset(0, direction) {
        if board.is_empty(one) {
            push(one, None, moves);

            if from.rank() == color.pawn_rank() {
                if let Some(two) = one.offset(0, direction) {
                    if board.is_empty(two) {
                        moves.push(Move::new(from, two, pawn, None));
                    }
                }
            }
        }
    }

    // Captures, including en passant
    for df in [-1, 1] {
        let Some(target) = from.offset(df, direction) else {
            continue;
        };
        if board.is_enemy(target, color) {
            push(target, board.piece_at(target), moves);
        } else if state.en_passant() == Some(target) {
            moves.push(Move::new_en_passant(from, target, pawn));
        }
    }
}

/// Generates knight-style moves onto any square not held by a friendly piece.
fn generate_leaper_moves(
    state: &GameState,
    from: Square,
    piece: Piece,
    offsets: &[(i8, i8)],
    moves: &mut MoveList,
) {
    let board = state.board();
    for &(df, dr) in offsets {
        if let Some(to) = from.offset(df, dr) {
            if !board.is_color(to, piece.color) {
                moves.push(Move::new(from, to, piece, board.piece_at(to)));
            }
        }
    }
}

/// Generates sliding piece moves along the given directions.
fn generate_sliding_moves(
    state: &GameState,
    from: Square,
    piece: Piece,
    directions: &[(i8, i8)],
    moves: &mut MoveList,
) {
    let board = state.board();

    for &(df, dr) in directions {
        let mut current = from;

        while let Some(to) = current.offset(df, dr) {
            current = to;
            match board.piece_at(to) {
                None => moves.push(Move::new(from, to, piece, None)),
                Some(blocker) => {
                    if blocker.color != piece.color {
                        moves.push(Move::new(from, to, piece, Some(blocker)));
                    }
                    break; // Can't move past any piece
                }
            }
        }
    }
}

/// Generates king moves (excluding castling).
fn generate_king_moves(state: &GameState, from: Square, color: Color, moves: &mut MoveList) {
    let king = Piece::new(PieceType::King, color);
    generate_leaper_moves(state, from, king, &KING_OFFSETS, moves);
}

/// Generates castling candidates. The landing square is left to the
/// king-safety filter; the king's square and the square it crosses are checked here.
fn generate_castling_moves(state: &GameState, color: Color, moves: &mut MoveList) {
    let rights = state.castling_rights().get(color);
    if !rights.any() {
        return;
    }

    let board = state.board();
    let rank = color.back_rank();
    let king_square = state.king_square(color);
    if king_square != Square::new(File::E, rank) {
        return;
    }

    let enemy = color.opponent();
    let king = Piece::new(PieceType::King, color);
    let rook = Piece::new(PieceType::Rook, color);
    let at = |file: File| Square::new(file, rank);
    let has_rook = |file: File| board.piece_at(at(file)) == Some(rook);

    if state.square_is_attacked(king_square, enemy) {
        return;
    }

    if rights.kingside
        && has_rook(File::H)
        && board.is_empty(at(File::F))
        && board.is_empty(at(File::G))
        && !state.square_is_attacked(at(File::F), enemy)
    {
        moves.push(Move::new_castle(king_square, at(File::G), king));
    }

    if rights.queenside
        && has_rook(File::A)
        && board.is_empty(at(File::D))
        && board.is_empty(at(File::C))
        && board.is_empty(at(File::B))
        && !state.square_is_attacked(at(File::D), enemy)
    {
        moves.push(Move::new_castle(king_square, at(File::C), king));
    }
}
