use crate::evaluation::evaluate;
use chess_core::{generate_legal_moves, Color, GameState, Move};
use std::thread::{self, JoinHandle};
use tracing::{debug, info_span, trace};

/// Search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Plies to look ahead. Depth 0 only evaluates the root.
    pub depth: u8,
}

impl SearchConfig {
    pub const DEFAULT_DEPTH: u8 = 3;

    pub fn depth(depth: u8) -> Self {
        Self { depth }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::depth(Self::DEFAULT_DEPTH)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// `None` when the root has no legal moves or depth is 0.
    pub best_move: Option<Move>,
    /// White-relative score of the root.
    pub score: i32,
    pub depth: u8,
    pub nodes: u64,
}

struct SearchInfo {
    nodes: u64,
    best_move: Option<Move>,
}

/// Runs a fixed-depth minimax search with alpha-beta pruning. White
/// maximizes, Black minimizes. Moves are tried in generation order and
/// only a strictly better score replaces the current best, so the first
/// of several equal moves wins.
///
/// The state is mutated during the search and restored before returning,
/// with its legal moves refreshed.
pub fn search(state: &mut GameState, config: SearchConfig) -> SearchResult {
    let span = info_span!("search", depth = config.depth);
    let _guard = span.enter();

    let mut info = SearchInfo {
        nodes: 0,
        best_move: None,
    };
    let maximizing = state.side_to_move() == Color::White;
    let score = alpha_beta(
        state,
        config.depth,
        0,
        i32::MIN,
        i32::MAX,
        maximizing,
        &mut info,
    );

    state.refresh_legal_moves();

    let result = SearchResult {
        best_move: info.best_move,
        score,
        depth: config.depth,
        nodes: info.nodes,
    };
    debug!(
        nodes = result.nodes,
        score = result.score,
        best_move = %DisplayMove(result.best_move),
        "search complete"
    );
    result
}

/// Searches a clone of `state` on a worker thread.
pub fn spawn_search(state: &GameState, config: SearchConfig) -> JoinHandle<SearchResult> {
    let mut state = state.clone();
    thread::spawn(move || {
        trace!(depth = config.depth, "background search started");
        search(&mut state, config)
    })
}

fn alpha_beta(
    state: &mut GameState,
    depth: u8,
    ply: u8,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    info: &mut SearchInfo,
) -> i32 {
    info.nodes += 1;

    // Generated first so the terminal flags are valid for evaluation.
    let moves = generate_legal_moves(state);

    if depth == 0 || moves.is_empty() {
        return evaluate(state);
    }

    if maximizing {
        let mut best_score = i32::MIN;
        for &mv in moves.iter() {
            state.apply(mv);
            let score = alpha_beta(state, depth - 1, ply + 1, alpha, beta, false, info);
            state.undo();

            if score > best_score {
                best_score = score;
                if ply == 0 {
                    info.best_move = Some(mv);
                }
            }

            alpha = alpha.max(best_score);
            if beta <= alpha {
                break;
            }
        }
        best_score
    } else {
        let mut best_score = i32::MAX;
        for &mv in moves.iter() {
            state.apply(mv);
            let score = alpha_beta(state, depth - 1, ply + 1, alpha, beta, true, info);
            state.undo();

            if score < best_score {
                best_score = score;
                if ply == 0 {
                    info.best_move = Some(mv);
                }
            }

            beta = beta.min(best_score);
            if beta <= alpha {
                break;
            }
        }
        best_score
    }
}

struct DisplayMove(Option<Move>);

impl std::fmt::Display for DisplayMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(mv) => write!(f, "{mv}"),
            None => f.write_str("none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::MATE_SCORE;
    use chess_core::positions;

    fn state(fen: &str) -> GameState {
        GameState::from_fen(fen).unwrap()
    }

    /// Plain minimax without pruning, same ordering and tie rule.
    fn minimax(state: &mut GameState, depth: u8, ply: u8, best: &mut Option<Move>) -> i32 {
        let moves = generate_legal_moves(state);
        if depth == 0 || moves.is_empty() {
            return evaluate(state);
        }

        let maximizing = state.side_to_move() == Color::White;
        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        for &mv in moves.iter() {
            state.apply(mv);
            let score = minimax(state, depth - 1, ply + 1, best);
            state.undo();

            let better = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if better {
                best_score = score;
                if ply == 0 {
                    *best = Some(mv);
                }
            }
        }
        best_score
    }

    #[test]
    fn test_finds_back_rank_mate() {
        let mut state = state("6k1/5ppp/8/8/8/8/8/3R2K1 w - - 0 1");
        let result = search(&mut state, SearchConfig::depth(1));

        assert_eq!(result.best_move.map(|m| m.to_string()), Some("d1d8".into()));
        assert_eq!(result.score, MATE_SCORE);
    }

    #[test]
    fn test_black_finds_mate() {
        let mut state = state("3r2k1/8/8/8/8/8/5PPP/6K1 b - - 0 1");
        let result = search(&mut state, SearchConfig::depth(2));

        assert_eq!(result.best_move.map(|m| m.to_string()), Some("d8d1".into()));
        assert_eq!(result.score, -MATE_SCORE);
    }

    #[test]
    fn test_captures_hanging_queen() {
        let mut state = state("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1");
        let result = search(&mut state, SearchConfig::depth(2));

        assert_eq!(result.best_move.map(|m| m.to_string()), Some("d1d5".into()));
        assert_eq!(result.score, 50);
    }

    #[test]
    fn test_no_move_when_mated_or_stalemated() {
        let mut mated = state(positions::FOOLS_MATE);
        let result = search(&mut mated, SearchConfig::default());
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, -MATE_SCORE);
        assert_eq!(result.nodes, 1);

        let mut stalemate = state(positions::STALEMATE);
        let result = search(&mut stalemate, SearchConfig::default());
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_depth_zero_only_evaluates() {
        let mut state = state("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let result = search(&mut state, SearchConfig::depth(0));
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 50);
    }

    #[test]
    fn test_search_restores_position() {
        let mut state = state(positions::KIWIPETE);
        let before = state.clone();
        search(&mut state, SearchConfig::depth(2));

        assert_eq!(state.board(), before.board());
        assert_eq!(state.castling_rights(), before.castling_rights());
        assert_eq!(state.en_passant(), before.en_passant());
        assert_eq!(state.history().count(), 0);
        assert_eq!(state.legal_moves().len(), 48);
    }

    #[test]
    fn test_alpha_beta_matches_minimax() {
        let cases = [
            (positions::STARTING, 3),
            (positions::KIWIPETE, 2),
            (positions::POSITION_3, 3),
            ("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1", 3),
            ("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3", 3),
            ("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 2 3", 2),
        ];

        for (fen, max_depth) in cases {
            for depth in 1..=max_depth {
                let mut state = state(fen);
                let pruned = search(&mut state, SearchConfig::depth(depth));

                let mut best = None;
                let score = minimax(&mut state, depth, 0, &mut best);

                assert_eq!(pruned.score, score, "{fen} depth {depth}");
                assert_eq!(pruned.best_move, best, "{fen} depth {depth}");
            }
        }
    }

    #[test]
    fn test_search_is_deterministic() {
        let mut state = state(positions::KIWIPETE);
        let first = search(&mut state, SearchConfig::depth(2));
        let second = search(&mut state, SearchConfig::depth(2));
        assert_eq!(first, second);
    }

    #[test]
    fn test_spawn_search_leaves_caller_state() {
        let state = state("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1");
        let handle = spawn_search(&state, SearchConfig::depth(2));
        let result = handle.join().unwrap();

        assert_eq!(result.best_move.map(|m| m.to_string()), Some("d1d5".into()));
        assert_eq!(state.history().count(), 0);
    }
}
