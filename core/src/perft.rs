//! Perft: counts leaf nodes of the legal move tree to validate generation.

use crate::game_state::GameState;
use crate::move_gen::generate_legal_moves;
use crate::types::Move;

/// Leaf statistics gathered by `perft_detailed`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PerftResults {
    pub nodes: u64,
    pub captures: u64,
    pub en_passants: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftResults {
    /// Combines results from child nodes.
    pub fn add(&mut self, other: &Self) {
        self.nodes += other.nodes;
        self.captures += other.captures;
        self.en_passants += other.en_passants;
        self.castles += other.castles;
        self.promotions += other.promotions;
        self.checks += other.checks;
        self.checkmates += other.checkmates;
    }
}

/// Counts the leaf nodes `depth` plies below `state`. The position is
/// restored before returning; its cached legal moves are not.
pub fn perft(state: &mut GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(state);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for &mv in moves.iter() {
        state.apply(mv);
        nodes += perft(state, depth - 1);
        state.undo();
    }

    nodes
}

/// Node counts per root move, in generation order.
pub fn perft_divide(state: &mut GameState, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let moves = generate_legal_moves(state);
    let mut results = Vec::with_capacity(moves.len());

    for &mv in moves.iter() {
        state.apply(mv);
        let nodes = perft(state, depth - 1);
        state.undo();
        results.push((mv, nodes));
    }

    results
}

/// Perft with move-kind counts at the leaves.
pub fn perft_detailed(state: &mut GameState, depth: u8) -> PerftResults {
    let mut results = PerftResults::default();

    if depth == 0 {
        results.nodes = 1;
        return results;
    }

    let moves = generate_legal_moves(state);

    for &mv in moves.iter() {
        state.apply(mv);

        if depth == 1 {
            results.nodes += 1;
            if mv.is_capture() {
                results.captures += 1;
            }
            if mv.en_passant {
                results.en_passants += 1;
            }
            if mv.castle {
                results.castles += 1;
            }
            if mv.promotion {
                results.promotions += 1;
            }
            if state.in_check() {
                results.checks += 1;
                if generate_legal_moves(state).is_empty() {
                    results.checkmates += 1;
                }
            }
        } else {
            let child = perft_detailed(state, depth - 1);
            results.add(&child);
        }

        state.undo();
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::positions;

    #[test]
    fn test_perft_starting_position() {
        let mut state = GameState::new();

        for (depth, expected) in [(1, 20), (2, 400), (3, 8902)] {
            let result = perft(&mut state, depth);
            assert_eq!(result, expected, "perft({depth})");
        }
        assert_eq!(state.history().count(), 0);
    }

    #[test]
    fn test_perft_depth_zero() {
        let mut state = GameState::new();
        assert_eq!(perft(&mut state, 0), 1);
        assert!(perft_divide(&mut state, 0).is_empty());
    }

    #[test]
    fn test_perft_divide_sums_to_perft() {
        let mut state = GameState::new();
        let divide = perft_divide(&mut state, 2);

        assert_eq!(divide.len(), 20);
        assert!(divide.iter().all(|&(_, nodes)| nodes == 20));
        let total: u64 = divide.iter().map(|&(_, nodes)| nodes).sum();
        assert_eq!(total, perft(&mut state, 2));
    }

    #[test]
    fn test_perft_detailed_kiwipete() {
        let mut state = GameState::from_fen(positions::KIWIPETE).unwrap();
        let results = perft_detailed(&mut state, 1);

        assert_eq!(results.nodes, 48);
        assert_eq!(results.captures, 8);
        assert_eq!(results.en_passants, 0);
        assert_eq!(results.castles, 2);
        assert_eq!(results.checks, 0);
    }

    #[test]
    fn test_perft_detailed_finds_mate() {
        // Rook lift to the back rank mates.
        let mut state = GameState::from_fen("6k1/5ppp/8/8/8/8/8/3R2K1 w - - 0 1").unwrap();
        let results = perft_detailed(&mut state, 1);
        assert_eq!(results.checkmates, 1);
        assert_eq!(results.checks, 1);
    }
}
