use crate::{
    search::{search, SearchConfig},
    Agent,
};
use chess_core::{GameState, Move};

pub struct MinimaxAgent {
    name: String,
    config: SearchConfig,
}

impl MinimaxAgent {
    pub fn new(depth: u8) -> Self {
        Self::with_config(SearchConfig::depth(depth))
    }

    pub fn with_config(config: SearchConfig) -> Self {
        MinimaxAgent {
            name: format!("Minimax(depth={})", config.depth),
            config,
        }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }
}

impl Default for MinimaxAgent {
    fn default() -> Self {
        Self::with_config(SearchConfig::default())
    }
}

impl Agent for MinimaxAgent {
    fn best_move(&mut self, state: &mut GameState) -> Option<Move> {
        search(state, self.config).best_move
    }

    fn name(&self) -> &str {
        &self.name
    }
}
