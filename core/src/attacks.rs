//! Attack and pin detection, scanned outward from the target square.
//!
//! Nothing here generates moves; it only reads the board.

use crate::game_state::GameState;
use crate::types::{Color, Piece, PieceType, Square};

/// Rook directions as (file, rank) steps.
pub(crate) const ORTHOGONALS: [(i8, i8); 4] = [(0, 1), (-1, 0), (0, -1), (1, 0)];

/// Bishop directions as (file, rank) steps.
pub(crate) const DIAGONALS: [(i8, i8); 4] = [(-1, 1), (1, 1), (-1, -1), (1, -1)];

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-1, 2),
    (1, 2),
    (-2, 1),
    (2, 1),
    (-2, -1),
    (2, -1),
    (-1, -2),
    (1, -2),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Returns true if `piece` attacks along a ray of the given kind from any distance.
fn slides_along(piece: Piece, diagonal: bool) -> bool {
    if diagonal {
        piece.piece_type.slides_diagonally()
    } else {
        piece.piece_type.slides_straight()
    }
}

/// Returns true if a pawn of `pawn_color` one step away in `(df, dr)` attacks the origin.
fn pawn_attacks_from(pawn_color: Color, df: i8, dr: i8) -> bool {
    df != 0 && dr == -pawn_color.pawn_direction()
}

impl GameState {
    /// Returns true if the given square is attacked by `attacker`.
    pub fn square_is_attacked(&self, square: Square, attacker: Color) -> bool {
        self.is_pawn_attacked(square, attacker)
            || self.is_leaper_attacked(square, attacker, PieceType::Knight, &KNIGHT_OFFSETS)
            || self.is_slider_attacked(square, attacker)
            || self.is_leaper_attacked(square, attacker, PieceType::King, &KING_OFFSETS)
    }

    /// Pawns of `attacker` sit one rank behind the square in their direction of travel.
    fn is_pawn_attacked(&self, square: Square, attacker: Color) -> bool {
        let dr = -attacker.pawn_direction();
        [-1, 1].into_iter().any(|df| {
            square
                .offset(df, dr)
                .and_then(|from| self.board.piece_at(from))
                .is_some_and(|p| p.is(PieceType::Pawn, attacker))
        })
    }

    fn is_leaper_attacked(
        &self,
        square: Square,
        attacker: Color,
        piece_type: PieceType,
        offsets: &[(i8, i8)],
    ) -> bool {
        offsets.iter().any(|&(df, dr)| {
            square
                .offset(df, dr)
                .and_then(|from| self.board.piece_at(from))
                .is_some_and(|p| p.is(piece_type, attacker))
        })
    }

    fn is_slider_attacked(&self, square: Square, attacker: Color) -> bool {
        let rays = ORTHOGONALS
            .iter()
            .map(|&d| (d, false))
            .chain(DIAGONALS.iter().map(|&d| (d, true)));

        for ((df, dr), diagonal) in rays {
            let mut current = square;
            while let Some(next) = current.offset(df, dr) {
                current = next;
                if let Some(piece) = self.board.piece_at(current) {
                    if piece.color == attacker && slides_along(piece, diagonal) {
                        return true;
                    }
                    break; // Piece blocks the ray
                }
            }
        }

        false
    }

    /// Recomputes check, checking squares and pinned squares for the side to move.
    pub(crate) fn update_check_and_pins(&mut self) {
        self.checks.clear();
        self.pins.clear();

        let own = self.turn;
        let enemy = own.opponent();
        let king = self.king_squares[own.index()];

        let rays = ORTHOGONALS
            .iter()
            .map(|&d| (d, false))
            .chain(DIAGONALS.iter().map(|&d| (d, true)));

        for ((df, dr), diagonal) in rays {
            let mut candidate_pin: Option<Square> = None;
            let mut current = king;
            let mut distance = 0;

            while let Some(next) = current.offset(df, dr) {
                current = next;
                distance += 1;

                let Some(piece) = self.board.piece_at(current) else {
                    continue;
                };

                if piece.color == own {
                    if candidate_pin.is_some() {
                        break; // Two own pieces: nothing can be pinned here
                    }
                    candidate_pin = Some(current);
                    continue;
                }

                let attacks_king = slides_along(piece, diagonal)
                    || (distance == 1
                        && diagonal
                        && piece.piece_type == PieceType::Pawn
                        && pawn_attacks_from(enemy, df, dr));

                if attacks_king {
                    match candidate_pin {
                        None => self.checks.push(current),
                        Some(pinned) => self.pins.push(pinned),
                    }
                }
                // Any enemy piece ends the ray, an adjacent king included.
                break;
            }
        }

        for &(df, dr) in &KNIGHT_OFFSETS {
            if let Some(square) = king.offset(df, dr) {
                if self
                    .board
                    .piece_at(square)
                    .is_some_and(|p| p.is(PieceType::Knight, enemy))
                {
                    self.checks.push(square);
                }
            }
        }

        self.in_check = !self.checks.is_empty();
    }

    /// True when two pieces give check at once; only the king may move.
    pub fn in_double_check(&self) -> bool {
        self.checks.len() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn state(fen: &str) -> GameState {
        GameState::from_fen(fen).unwrap()
    }

    #[test]
    fn test_rook_attacks_until_blocked() {
        let s = state("4k3/8/8/8/4R3/8/4P3/K7 w - - 0 1");

        assert!(s.square_is_attacked(sq("e8"), Color::White));
        assert!(s.square_is_attacked(sq("a4"), Color::White));
        assert!(s.square_is_attacked(sq("e3"), Color::White));
        assert!(!s.square_is_attacked(sq("e1"), Color::White));
        assert!(!s.square_is_attacked(sq("d5"), Color::White));
    }

    #[test]
    fn test_pawn_attack_direction() {
        let s = state("4k3/8/8/3p4/8/8/4P3/4K3 w - - 0 1");

        assert!(s.square_is_attacked(sq("d3"), Color::White));
        assert!(s.square_is_attacked(sq("f3"), Color::White));
        assert!(!s.square_is_attacked(sq("e3"), Color::White));
        assert!(!s.square_is_attacked(sq("e4"), Color::White));

        assert!(s.square_is_attacked(sq("c4"), Color::Black));
        assert!(s.square_is_attacked(sq("e4"), Color::Black));
        assert!(!s.square_is_attacked(sq("c6"), Color::Black));
    }

    #[test]
    fn test_knight_and_king_attacks() {
        let s = state("4k3/8/8/8/3n4/8/8/K7 w - - 0 1");

        assert!(s.square_is_attacked(sq("e2"), Color::Black));
        assert!(s.square_is_attacked(sq("b5"), Color::Black));
        assert!(!s.square_is_attacked(sq("d3"), Color::Black));
        assert!(s.square_is_attacked(sq("d7"), Color::Black));
        assert!(s.square_is_attacked(sq("b2"), Color::White));
    }

    #[test]
    fn test_pawn_check_for_both_colors() {
        let white_in_check = state("4k3/8/8/3p4/4K3/8/8/8 w - - 0 1");
        assert!(white_in_check.in_check());
        assert_eq!(white_in_check.checks(), &[sq("d5")]);

        let black_in_check = state("8/8/8/4k3/3P4/8/8/4K3 b - - 0 1");
        assert!(black_in_check.in_check());
        assert_eq!(black_in_check.checks(), &[sq("d4")]);

        // Black pawn on d2 attacks e1; one on d3 has already passed e4.
        let attacking = state("8/8/8/4k3/8/8/3p4/4K3 w - - 0 1");
        assert!(attacking.in_check());
        let passed = state("8/8/8/8/4K3/3p4/8/7k w - - 0 1");
        assert!(!passed.in_check());
    }

    #[test]
    fn test_slider_and_knight_checks() {
        let s = state("4k3/8/8/8/8/5n2/8/r3K3 w - - 0 1");
        assert!(s.in_check());
        assert!(s.in_double_check());
        assert!(s.checks().contains(&sq("a1")));
        assert!(s.checks().contains(&sq("f3")));
    }

    #[test]
    fn test_pin_detection() {
        let s = state("4k3/4r3/8/8/1b6/8/3BN3/4K3 w - - 0 1");
        assert!(!s.in_check());
        assert!(s.pins().contains(&sq("e2")));
        assert!(s.pins().contains(&sq("d2")));
        assert_eq!(s.pins().len(), 2);
    }

    #[test]
    fn test_two_own_pieces_prevent_pin() {
        let s = state("4k3/4r3/8/8/4B3/8/4N3/4K3 w - - 0 1");
        assert!(s.pins().is_empty());
        assert!(!s.in_check());
    }

    #[test]
    fn test_non_slider_does_not_pin() {
        // Knight and king behind own pieces on a ray are not pinners.
        let s = state("8/8/8/8/4n3/8/4N3/4K2k w - - 0 1");
        assert!(s.pins().is_empty());
    }

    #[test]
    fn test_adjacent_king_stops_ray_without_check() {
        let s = state("8/8/8/8/8/8/3k4/4K2R w - - 0 1");
        assert!(!s.in_check());
        assert!(s.pins().is_empty());
        assert!(s.square_is_attacked(sq("e2"), Color::Black));
    }
}
