use chess_core::{positions, Board, CastlingRights, Color, GameState, Square};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type Snapshot = (Board, Color, CastlingRights, Option<Square>, Square, Square);

fn snapshot(state: &GameState) -> Snapshot {
    (
        state.board().clone(),
        state.side_to_move(),
        state.castling_rights(),
        state.en_passant(),
        state.king_square(Color::White),
        state.king_square(Color::Black),
    )
}

/// Plays random legal moves, then unwinds them and checks every
/// intermediate position comes back exactly.
fn random_walk(fen: &str, seed: u64, plies: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = GameState::from_fen(fen).unwrap();
    let mut trail = vec![snapshot(&state)];

    for _ in 0..plies {
        let moves = state.refresh_legal_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        state.apply(mv);
        trail.push(snapshot(&state));
    }

    while let Some(expected) = trail.pop() {
        assert_eq!(snapshot(&state), expected, "seed {seed}");
        state.undo();
    }
    assert_eq!(state.history().count(), 0);
}

#[test]
fn test_random_walks_from_start() {
    for seed in 0..16 {
        random_walk(positions::STARTING, seed, 120);
    }
}

#[test]
fn test_random_walks_from_kiwipete() {
    for seed in 0..16 {
        random_walk(positions::KIWIPETE, seed, 80);
    }
}

#[test]
fn test_random_walks_from_position_3() {
    for seed in 0..16 {
        random_walk(positions::POSITION_3, seed, 80);
    }
}

#[test]
fn test_check_flags_survive_undo() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut state = GameState::new();

    for _ in 0..60 {
        let moves = state.refresh_legal_moves().to_vec();
        if moves.is_empty() {
            break;
        }
        let in_check = state.in_check();
        let checks = state.checks().to_vec();
        let pins = state.pins().to_vec();

        let mv = moves[rng.gen_range(0..moves.len())];
        state.apply(mv);
        state.undo();
        assert_eq!(state.in_check(), in_check);
        assert_eq!(state.checks(), checks.as_slice());
        assert_eq!(state.pins(), pins.as_slice());

        state.apply(mv);
    }
}
