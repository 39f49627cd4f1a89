pub mod evaluation;
pub mod minimax;
pub mod random;
pub mod search;

use chess_core::{GameState, Move};

/// Core trait for chess agents
pub trait Agent {
    /// Picks a move for the side to move, or `None` when there is none.
    /// The state may be searched in place but is restored before returning.
    fn best_move(&mut self, state: &mut GameState) -> Option<Move>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

pub use evaluation::*;
pub use minimax::MinimaxAgent;
pub use random::RandomAgent;
pub use search::*;
