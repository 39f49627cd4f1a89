pub mod attacks;
pub mod board;
pub mod error;
pub mod fen;
pub mod game_state;
pub mod move_gen;
pub mod perft;
pub mod types;

pub use board::*;
pub use error::{FenError, MoveError, PositionError, SquareParseError};
pub use fen::positions;
pub use game_state::*;
pub use move_gen::*;
pub use perft::{perft, perft_detailed, perft_divide, PerftResults};
pub use types::*;
