use chess_core::{Board, Color, GameState};

/// Score for the side that delivers mate. Material never comes close.
pub const MATE_SCORE: i32 = 1_000_000_000;

/// Evaluates a position from White's perspective: positive favors White.
///
/// Checkmate and stalemate are read from the state's terminal flags, so the
/// legal moves must have been computed for this position first.
pub fn evaluate(state: &GameState) -> i32 {
    if state.is_checkmate() {
        // The side to move is the one that got mated.
        return match state.side_to_move() {
            Color::White => -MATE_SCORE,
            Color::Black => MATE_SCORE,
        };
    }
    if state.is_stalemate() {
        return 0;
    }

    material_balance(state.board())
}

/// White material minus Black material.
pub fn material_balance(board: &Board) -> i32 {
    evaluate_material(board, Color::White) - evaluate_material(board, Color::Black)
}

/// Counts material value for a color.
fn evaluate_material(board: &Board, color: Color) -> i32 {
    board
        .pieces()
        .filter(|(_, piece)| piece.color == color)
        .map(|(_, piece)| piece.piece_type.value())
        .sum()
}

/// Anything that can be scored from White's perspective.
pub trait Evaluatable {
    fn evaluate(&self) -> i32;
}

impl Evaluatable for GameState {
    fn evaluate(&self) -> i32 {
        evaluate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::positions;

    #[test]
    fn test_starting_position_is_balanced() {
        let state = GameState::new();
        assert_eq!(evaluate(&state), 0);
        assert_eq!(evaluate_material(state.board(), Color::White), 8 * 10 + 4 * 30 + 2 * 50 + 90);
    }

    #[test]
    fn test_material_advantage() {
        // White is up a rook.
        let state = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        assert_eq!(state.evaluate(), 50);

        // Black is up a queen and a knight, regardless of who moves.
        let state = GameState::from_fen("3qk1n1/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(evaluate(&state), -120);
        let state = GameState::from_fen("3qk1n1/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(evaluate(&state), -120);
    }

    #[test]
    fn test_checkmate_scores() {
        let white_mated = GameState::from_fen(positions::FOOLS_MATE).unwrap();
        assert_eq!(evaluate(&white_mated), -MATE_SCORE);

        let black_mated = GameState::from_fen(positions::BACK_RANK_MATE).unwrap();
        assert_eq!(evaluate(&black_mated), MATE_SCORE);
    }

    #[test]
    fn test_stalemate_is_draw() {
        // White is a queen up, but it is stalemate.
        let state = GameState::from_fen(positions::STALEMATE).unwrap();
        assert_eq!(evaluate(&state), 0);
    }
}
