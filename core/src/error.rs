//! Error types for position setup and move submission.
//!
//! Rule violations during generation are not errors: illegal moves are never
//! produced, and a move outside the legal set is rejected before any mutation.

use crate::types::{Color, Move};
use thiserror::Error;

/// FEN parsing errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FenError {
    #[error("Invalid FEN format: {0}")]
    InvalidFormat(String),
    #[error("Invalid piece character: '{0}'")]
    InvalidPiece(char),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Invalid castling rights: {0}")]
    InvalidCastling(String),
    #[error("Invalid en passant square: {0}")]
    InvalidEnPassant(String),
    #[error(transparent)]
    Position(#[from] PositionError),
}

/// A board that cannot back a game.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PositionError {
    #[error("No {0:?} king on the board")]
    MissingKing(Color),
    #[error("More than one {0:?} king on the board")]
    DuplicateKing(Color),
}

/// A move submitted from outside the legal set.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoveError {
    #[error("Illegal move: {0}")]
    Illegal(Move),
}

/// Text that is not a square name such as "e4".
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid square: {0}")]
pub struct SquareParseError(pub String);
