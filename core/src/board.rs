/// Array-based board: one cell per square, `None` for empty.
use crate::error::PositionError;
use crate::types::*;

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    /// 64 squares, indexed by Square::index()
    squares: [Option<Piece>; 64],
}

impl Board {
    /// Creates an empty board.
    pub const fn empty() -> Self {
        Self {
            squares: [None; 64],
        }
    }

    /// Creates the standard starting position.
    pub fn starting_position() -> Self {
        let mut board = Self::empty();

        for color in [Color::White, Color::Black] {
            for (file, &piece_type) in (0..8).filter_map(File::new).zip(BACK_RANK.iter()) {
                board.set_piece(
                    Square::new(file, color.back_rank()),
                    Some(Piece::new(piece_type, color)),
                );
                board.set_piece(
                    Square::new(file, color.pawn_rank()),
                    Some(Piece::new(PieceType::Pawn, color)),
                );
            }
        }

        board
    }

    /// Gets the piece at the given square.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index() as usize]
    }

    /// Sets the piece at the given square.
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index() as usize] = piece;
    }

    /// Returns true if the given square is empty.
    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Returns true if the given square contains a piece of the given color.
    pub fn is_color(&self, square: Square, color: Color) -> bool {
        self.piece_at(square).is_some_and(|p| p.color == color)
    }

    /// Returns true if the given square contains an enemy piece.
    pub fn is_enemy(&self, square: Square, color: Color) -> bool {
        self.is_color(square, color.opponent())
    }

    /// Iterates occupied squares in scan order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Locates the single king of `color`.
    pub fn find_king(&self, color: Color) -> Result<Square, PositionError> {
        let mut kings = self
            .pieces()
            .filter(|(_, p)| p.is(PieceType::King, color))
            .map(|(sq, _)| sq);

        match (kings.next(), kings.next()) {
            (Some(square), None) => Ok(square),
            (None, _) => Err(PositionError::MissingKing(color)),
            (Some(_), Some(_)) => Err(PositionError::DuplicateKing(color)),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting_position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_starting_position() {
        let board = Board::starting_position();

        assert_eq!(
            board.piece_at(sq("a1")),
            Some(Piece::new(PieceType::Rook, Color::White))
        );
        assert_eq!(
            board.piece_at(sq("e1")),
            Some(Piece::new(PieceType::King, Color::White))
        );
        assert_eq!(
            board.piece_at(sq("d8")),
            Some(Piece::new(PieceType::Queen, Color::Black))
        );
        assert_eq!(
            board.piece_at(sq("h7")),
            Some(Piece::new(PieceType::Pawn, Color::Black))
        );
        assert!(board.is_empty(sq("d5")));
        assert_eq!(board.pieces().count(), 32);
    }

    #[test]
    fn test_find_king() {
        let mut board = Board::starting_position();
        assert_eq!(board.find_king(Color::Black), Ok(sq("e8")));

        board.set_piece(sq("e8"), None);
        assert_eq!(
            board.find_king(Color::Black),
            Err(PositionError::MissingKing(Color::Black))
        );

        board.set_piece(sq("a4"), Some(Piece::new(PieceType::King, Color::White)));
        assert_eq!(
            board.find_king(Color::White),
            Err(PositionError::DuplicateKing(Color::White))
        );
    }

    #[test]
    fn test_color_queries() {
        let board = Board::starting_position();
        assert!(board.is_color(sq("b2"), Color::White));
        assert!(board.is_enemy(sq("b7"), Color::White));
        assert!(!board.is_enemy(sq("b4"), Color::White));
    }
}
