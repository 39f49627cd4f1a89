use crate::Agent;
use chess_core::{GameState, Move};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Plays a uniformly random legal move.
pub struct RandomAgent {
    name: String,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible move choices for tests and demos.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        RandomAgent {
            name: "Random".to_string(),
            rng,
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn best_move(&mut self, state: &mut GameState) -> Option<Move> {
        state.refresh_legal_moves().choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::positions;

    #[test]
    fn test_plays_legal_moves() {
        let mut state = GameState::new();
        let mut agent = RandomAgent::seeded(42);

        for _ in 0..40 {
            let Some(mv) = agent.best_move(&mut state) else {
                break;
            };
            assert!(state.make_legal_move(mv).is_ok());
        }
    }

    #[test]
    fn test_same_seed_same_moves() {
        let mut a = RandomAgent::seeded(7);
        let mut b = RandomAgent::seeded(7);
        let mut state = GameState::new();
        assert_eq!(a.best_move(&mut state), b.best_move(&mut state));
    }

    #[test]
    fn test_no_move_in_mate() {
        let mut state = GameState::from_fen(positions::FOOLS_MATE).unwrap();
        assert_eq!(RandomAgent::new().best_move(&mut state), None);
    }
}
