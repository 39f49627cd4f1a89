use crate::error::SquareParseError;
use std::fmt;
use std::str::FromStr;

/// Represents one of the two players in chess.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Returns the opposite color.
    pub const fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Index into per-color arrays.
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Returns the rank the king and rooks start on.
    pub const fn back_rank(self) -> Rank {
        match self {
            Color::White => Rank::First,
            Color::Black => Rank::Eighth,
        }
    }

    /// Returns the starting rank for pawns of this color.
    pub const fn pawn_rank(self) -> Rank {
        match self {
            Color::White => Rank::Second,
            Color::Black => Rank::Seventh,
        }
    }

    /// Returns the promotion rank for pawns of this color.
    pub const fn promotion_rank(self) -> Rank {
        match self {
            Color::White => Rank::Eighth,
            Color::Black => Rank::First,
        }
    }

    /// Returns the direction pawns of this color move.
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

/// The six types of chess pieces.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Material weight used by the evaluator.
    pub const fn value(self) -> i32 {
        match self {
            PieceType::Pawn => 10,
            PieceType::Knight => 30,
            PieceType::Bishop => 30,
            PieceType::Rook => 50,
            PieceType::Queen => 90,
            PieceType::King => 0,
        }
    }

    /// Returns true if this piece type attacks along orthogonal rays.
    pub const fn slides_straight(self) -> bool {
        matches!(self, PieceType::Rook | PieceType::Queen)
    }

    /// Returns true if this piece type attacks along diagonal rays.
    pub const fn slides_diagonally(self) -> bool {
        matches!(self, PieceType::Bishop | PieceType::Queen)
    }
}

/// A chess piece with both type and color.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    /// Creates a new piece with the given type and color.
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Self { piece_type, color }
    }

    /// Returns true if this is a piece of the given type and color.
    pub fn is(self, piece_type: PieceType, color: Color) -> bool {
        self.piece_type == piece_type && self.color == color
    }

    /// FEN letter for this piece, uppercase for white.
    pub const fn to_char(self) -> char {
        let c = match self.piece_type {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN piece letter.
    pub const fn from_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece_type = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };
        Some(Piece::new(piece_type, color))
    }
}

/// A file on the chess board (a-h).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct File(u8);

impl File {
    /// Creates a new file from index (0-7).
    /// Returns None if index is out of range.
    pub const fn new(index: u8) -> Option<Self> {
        if index < 8 {
            Some(File(index))
        } else {
            None
        }
    }

    /// Creates a file from a character ('a'-'h').
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(File(c as u8 - b'a')),
            _ => None,
        }
    }

    /// Returns the file as a character ('a'-'h').
    pub const fn to_char(self) -> char {
        (b'a' + self.0) as char
    }

    /// Returns the file index (0-7).
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the adjacent file in the given direction, if valid.
    pub const fn offset(self, delta: i8) -> Option<Self> {
        let new_file = self.0 as i8 + delta;
        if new_file >= 0 && new_file < 8 {
            Some(File(new_file as u8))
        } else {
            None
        }
    }
}

impl File {
    pub const A: File = File(0);
    pub const B: File = File(1);
    pub const C: File = File(2);
    pub const D: File = File(3);
    pub const E: File = File(4);
    pub const F: File = File(5);
    pub const G: File = File(6);
    pub const H: File = File(7);
}

/// A rank on the chess board (1-8).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(u8);

impl Rank {
    /// Creates a new rank from index (0-7).
    /// Returns None if index is out of range.
    pub const fn new(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Rank(index))
        } else {
            None
        }
    }

    /// Creates a rank from a digit ('1'-'8').
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Some(Rank(c as u8 - b'1')),
            _ => None,
        }
    }

    /// Returns the rank as a character ('1'-'8').
    pub const fn to_char(self) -> char {
        (b'1' + self.0) as char
    }

    /// Returns the rank index (0-7).
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the adjacent rank in the given direction, if valid.
    pub const fn offset(self, delta: i8) -> Option<Self> {
        let new_rank = self.0 as i8 + delta;
        if new_rank >= 0 && new_rank < 8 {
            Some(Rank(new_rank as u8))
        } else {
            None
        }
    }
}

/// Rank constants for readability.
#[allow(non_upper_case_globals)]
impl Rank {
    pub const First: Rank = Rank(0);
    pub const Second: Rank = Rank(1);
    pub const Third: Rank = Rank(2);
    pub const Fourth: Rank = Rank(3);
    pub const Fifth: Rank = Rank(4);
    pub const Sixth: Rank = Rank(5);
    pub const Seventh: Rank = Rank(6);
    pub const Eighth: Rank = Rank(7);
}

/// A square on the chess board, indexed `rank * 8 + file` (a1 = 0).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Square(u8);

impl Square {
    /// Creates a new square from file and rank.
    pub const fn new(file: File, rank: Rank) -> Self {
        Square(rank.0 * 8 + file.0)
    }

    /// Creates a square from index (0-63).
    /// Returns None if index is out of range.
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Iterates all 64 squares in scan order: a1, b1, ..., h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }

    /// Returns the file of this square.
    pub const fn file(self) -> File {
        File(self.0 % 8)
    }

    /// Returns the rank of this square.
    pub const fn rank(self) -> Rank {
        Rank(self.0 / 8)
    }

    /// Returns the square index (0-63).
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Steps by a (file, rank) delta, staying on the board.
    pub const fn offset(self, df: i8, dr: i8) -> Option<Self> {
        match (self.file().offset(df), self.rank().offset(dr)) {
            (Some(file), Some(rank)) => Some(Square::new(file, rank)),
            _ => None,
        }
    }

    /// Chebyshev distance to another square.
    pub const fn distance(self, other: Square) -> u8 {
        let file_diff = self.file().0.abs_diff(other.file().0);
        let rank_diff = self.rank().0.abs_diff(other.rank().0);

        if file_diff > rank_diff {
            file_diff
        } else {
            rank_diff
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file().to_char(), self.rank().to_char())
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(f), Some(r), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareParseError(s.to_string()));
        };
        match (File::from_char(f), Rank::from_char(r)) {
            (Some(file), Some(rank)) => Ok(Square::new(file, rank)),
            _ => Err(SquareParseError(s.to_string())),
        }
    }
}

/// Castling rights for a single side.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SideCastlingRights {
    pub kingside: bool,
    pub queenside: bool,
}

impl SideCastlingRights {
    /// Creates new castling rights with both sides available.
    pub const fn both() -> Self {
        Self {
            kingside: true,
            queenside: true,
        }
    }

    /// Creates castling rights with no rights available.
    pub const fn none() -> Self {
        Self {
            kingside: false,
            queenside: false,
        }
    }

    /// Returns true if any castling right is available.
    pub const fn any(self) -> bool {
        self.kingside || self.queenside
    }
}

/// Complete castling rights for both colors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct CastlingRights {
    pub white: SideCastlingRights,
    pub black: SideCastlingRights,
}

impl CastlingRights {
    /// Creates castling rights with all rights available.
    pub const fn all() -> Self {
        Self {
            white: SideCastlingRights::both(),
            black: SideCastlingRights::both(),
        }
    }

    /// Creates castling rights with no rights available.
    pub const fn none() -> Self {
        Self {
            white: SideCastlingRights::none(),
            black: SideCastlingRights::none(),
        }
    }

    /// Gets castling rights for a specific color.
    pub const fn get(self, color: Color) -> SideCastlingRights {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    fn side_mut(&mut self, color: Color) -> &mut SideCastlingRights {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Clears the wing whose rook starts on `square`, if it is a home corner of `color`.
    fn revoke_corner(&mut self, color: Color, square: Square) {
        if square.rank() != color.back_rank() {
            return;
        }
        let side = self.side_mut(color);
        if square.file() == File::H {
            side.kingside = false;
        } else if square.file() == File::A {
            side.queenside = false;
        }
    }

    /// Returns the rights left after `mv` is played.
    pub fn after_move(self, mv: &Move) -> Self {
        let mut rights = self;
        let mover = mv.piece;

        match mover.piece_type {
            PieceType::King => *rights.side_mut(mover.color) = SideCastlingRights::none(),
            PieceType::Rook => rights.revoke_corner(mover.color, mv.from),
            _ => {}
        }

        if let Some(captured) = mv.captured {
            if captured.piece_type == PieceType::Rook {
                rights.revoke_corner(captured.color, mv.to);
            }
        }

        rights
    }
}

/// A single ply. Carries everything apply/undo and the front end need.
///
/// Two moves compare equal when their squares and flags match; the
/// moving and captured pieces are descriptive only.
#[derive(Clone, Copy, Debug)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: bool,
    pub en_passant: bool,
    pub castle: bool,
}

impl Move {
    const PROMOTION_BIT: u16 = 1 << 12;
    const EN_PASSANT_BIT: u16 = 1 << 13;
    const CASTLE_BIT: u16 = 1 << 14;

    /// Placeholder used to fill fixed-size move buffers.
    pub(crate) const NULL: Move = Move {
        from: Square(0),
        to: Square(0),
        piece: Piece::new(PieceType::Pawn, Color::White),
        captured: None,
        promotion: false,
        en_passant: false,
        castle: false,
    };

    /// Creates a plain move or capture.
    pub const fn new(from: Square, to: Square, piece: Piece, captured: Option<Piece>) -> Self {
        Self {
            from,
            to,
            piece,
            captured,
            promotion: false,
            en_passant: false,
            castle: false,
        }
    }

    /// Creates a pawn move onto the far rank. Always promotes to a queen.
    pub const fn new_promotion(
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
    ) -> Self {
        let mut mv = Self::new(from, to, piece, captured);
        mv.promotion = true;
        mv
    }

    /// Creates an en passant capture. The captured pawn sits beside the origin.
    pub const fn new_en_passant(from: Square, to: Square, piece: Piece) -> Self {
        let victim = Piece::new(PieceType::Pawn, piece.color.opponent());
        let mut mv = Self::new(from, to, piece, Some(victim));
        mv.en_passant = true;
        mv
    }

    /// Creates a castling move, expressed as the king's two-square step.
    pub const fn new_castle(from: Square, to: Square, piece: Piece) -> Self {
        let mut mv = Self::new(from, to, piece, None);
        mv.castle = true;
        mv
    }

    /// Compact identity: origin, destination and flags.
    pub const fn key(self) -> u16 {
        let mut key = self.from.0 as u16 | (self.to.0 as u16) << 6;
        if self.promotion {
            key |= Self::PROMOTION_BIT;
        }
        if self.en_passant {
            key |= Self::EN_PASSANT_BIT;
        }
        if self.castle {
            key |= Self::CASTLE_BIT;
        }
        key
    }

    /// Returns true if the move removes an enemy piece.
    pub const fn is_capture(self) -> bool {
        self.captured.is_some()
    }

    /// Returns true for a king-side castle; only meaningful when `castle` is set.
    pub fn is_kingside_castle(self) -> bool {
        self.castle && self.to.file() > self.from.file()
    }

    /// Square of the pawn removed by an en passant capture.
    pub const fn en_passant_victim(self) -> Square {
        Square::new(self.to.file(), self.from.rank())
    }

    /// Rook origin and destination for a castling move.
    pub fn castle_rook_squares(self) -> (Square, Square) {
        let rank = self.from.rank();
        if self.is_kingside_castle() {
            (Square::new(File::H, rank), Square::new(File::F, rank))
        } else {
            (Square::new(File::A, rank), Square::new(File::D, rank))
        }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Move {}

impl std::hash::Hash for Move {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if self.promotion {
            write!(f, "q")?;
        }
        Ok(())
    }
}
