mod interactive;

use anyhow::{bail, Context, Result};
use chess_agents::{evaluate, search, SearchConfig};
use chess_core::{perft, perft_detailed, perft_divide, Color, GameState, Piece, PieceType, Square};
use clap::{Parser, Subcommand, ValueEnum};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess", version, about = "Terminal chess with a minimax opponent")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play against the engine in the terminal
    Play {
        /// Side the human plays
        #[arg(long, value_enum, default_value_t = Side::White)]
        color: Side,
        #[arg(long, default_value_t = SearchConfig::DEFAULT_DEPTH)]
        depth: u8,
        /// Start from this FEN instead of the initial position
        #[arg(long)]
        fen: Option<String>,
    },
    /// Count leaf nodes of the legal move tree
    Perft {
        depth: u8,
        #[arg(long)]
        fen: Option<String>,
        /// Print the node count under each root move
        #[arg(long)]
        divide: bool,
        /// Print capture, castle and check counts at the leaves
        #[arg(long, conflicts_with = "divide")]
        detailed: bool,
    },
    /// Search a position and print the chosen move
    Search {
        #[arg(long, default_value_t = SearchConfig::DEFAULT_DEPTH)]
        depth: u8,
        #[arg(long)]
        fen: Option<String>,
    },
    /// Show a position with its legal moves, check and pins
    Moves {
        #[arg(long)]
        fen: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

fn load_position(fen: Option<&str>) -> Result<GameState> {
    match fen {
        Some(fen) => GameState::from_fen(fen).with_context(|| format!("cannot load FEN '{fen}'")),
        None => Ok(GameState::new()),
    }
}

pub(crate) fn piece_symbol(piece: Piece) -> char {
    match (piece.piece_type, piece.color) {
        (PieceType::King, Color::White) => '♔',
        (PieceType::Queen, Color::White) => '♕',
        (PieceType::Rook, Color::White) => '♖',
        (PieceType::Bishop, Color::White) => '♗',
        (PieceType::Knight, Color::White) => '♘',
        (PieceType::Pawn, Color::White) => '♙',
        (PieceType::King, Color::Black) => '♚',
        (PieceType::Queen, Color::Black) => '♛',
        (PieceType::Rook, Color::Black) => '♜',
        (PieceType::Bishop, Color::Black) => '♝',
        (PieceType::Knight, Color::Black) => '♞',
        (PieceType::Pawn, Color::Black) => '♟',
    }
}

fn display_board(state: &GameState) {
    println!("\n  a b c d e f g h");
    println!("  ---------------");

    for rank_idx in (0..8u8).rev() {
        print!("{} ", rank_idx + 1);

        for file_idx in 0..8u8 {
            let piece = Square::from_index(rank_idx * 8 + file_idx)
                .and_then(|square| state.board().piece_at(square));
            match piece {
                Some(piece) => print!("{} ", piece_symbol(piece)),
                None => print!(". "),
            }
        }

        println!("| {}", rank_idx + 1);
    }

    println!("  ---------------");
    println!("  a b c d e f g h\n");

    let side = match state.side_to_move() {
        Color::White => "White",
        Color::Black => "Black",
    };
    println!("{side} to move");

    let rights = state.castling_rights();
    if rights.white.any() || rights.black.any() {
        let mut text = String::new();
        for (flag, ch) in [
            (rights.white.kingside, 'K'),
            (rights.white.queenside, 'Q'),
            (rights.black.kingside, 'k'),
            (rights.black.queenside, 'q'),
        ] {
            if flag {
                text.push(ch);
            }
        }
        println!("Castling: {text}");
    }

    if let Some(ep) = state.en_passant() {
        println!("En passant: {ep}");
    }
}

fn run_perft(state: &mut GameState, depth: u8, divide: bool, detailed: bool) {
    println!("Running perft({depth})...");
    let start = Instant::now();

    let nodes = if divide {
        let results = perft_divide(state, depth);
        for (mv, count) in &results {
            println!("{mv}: {count}");
        }
        results.iter().map(|(_, count)| count).sum()
    } else if detailed {
        let results = perft_detailed(state, depth);
        println!("Captures: {}", results.captures);
        println!("En passant: {}", results.en_passants);
        println!("Castles: {}", results.castles);
        println!("Promotions: {}", results.promotions);
        println!("Checks: {}", results.checks);
        println!("Checkmates: {}", results.checkmates);
        results.nodes
    } else {
        perft(state, depth)
    };

    let elapsed = start.elapsed();
    println!("\nNodes: {nodes}");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    if elapsed.as_secs_f64() > 0.0 {
        println!("NPS: {:.0}", nodes as f64 / elapsed.as_secs_f64());
    }
}

fn run_search(state: &mut GameState, config: SearchConfig) {
    display_board(state);
    println!("Searching to depth {}...", config.depth);

    let start = Instant::now();
    let result = search(state, config);
    let elapsed = start.elapsed();

    match result.best_move {
        Some(best_move) => println!("\nBest move: {best_move}"),
        None => println!("\nNo legal moves available"),
    }
    println!("Score: {} (positive favors White)", result.score);
    println!("Depth: {}", result.depth);
    println!("Nodes: {}", result.nodes);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
}

fn show_moves(state: &GameState) {
    display_board(state);

    let list: Vec<String> = state.legal_moves().iter().map(|mv| mv.to_string()).collect();
    println!("Legal moves ({}): {}", list.len(), list.join(" "));
    println!("Material: {}", evaluate(state));

    if state.is_checkmate() {
        println!("Checkmate");
    } else if state.is_stalemate() {
        println!("Stalemate");
    } else if state.in_check() {
        let checkers: Vec<String> = state.checks().iter().map(|sq| sq.to_string()).collect();
        let kind = if state.in_double_check() { "Double check" } else { "Check" };
        println!("{kind} from {}", checkers.join(", "));
    }

    if !state.pins().is_empty() {
        let pinned: Vec<String> = state.pins().iter().map(|sq| sq.to_string()).collect();
        println!("Pinned: {}", pinned.join(", "));
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { color, depth, fen } => {
            let state = load_position(fen.as_deref())?;
            let mut game =
                interactive::InteractiveGame::new(state, color.into(), SearchConfig::depth(depth));
            game.run().context("terminal session failed")?;
        }
        Command::Perft {
            depth,
            fen,
            divide,
            detailed,
        } => {
            if depth == 0 {
                bail!("perft depth must be at least 1");
            }
            let mut state = load_position(fen.as_deref())?;
            run_perft(&mut state, depth, divide, detailed);
        }
        Command::Search { depth, fen } => {
            let mut state = load_position(fen.as_deref())?;
            run_search(&mut state, SearchConfig::depth(depth));
        }
        Command::Moves { fen } => {
            let state = load_position(fen.as_deref())?;
            show_moves(&state);
        }
    }

    Ok(())
}
