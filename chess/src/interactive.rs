use chess_agents::{spawn_search, SearchConfig};
use chess_core::{Color, File, GameState, Move, PieceType, Rank, Square};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    style::{Color as TermColor, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
    ExecutableCommand,
};
use std::io::{self, Write};
use tracing::{debug, warn};

pub struct InteractiveGame {
    state: GameState,
    start: GameState,
    human: Color,
    config: SearchConfig,
    cursor_pos: (u8, u8), // (file, rank) in 0-7 range
    selected_square: Option<Square>,
    legal_moves_for_selected: Vec<Move>,
    message: String,
}

impl InteractiveGame {
    pub fn new(state: GameState, human: Color, config: SearchConfig) -> Self {
        Self {
            start: state.clone(),
            state,
            human,
            config,
            cursor_pos: home_cursor(human),
            selected_square: None,
            legal_moves_for_selected: Vec::new(),
            message: String::from("Use hjkl to move, Enter to select/move, q to quit"),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(Hide)?;
        stdout.execute(Clear(ClearType::All))?;

        let result = self.game_loop();

        stdout.execute(Show)?;
        terminal::disable_raw_mode()?;
        stdout.execute(Clear(ClearType::All))?;
        stdout.execute(MoveTo(0, 0))?;

        result
    }

    fn game_loop(&mut self) -> io::Result<()> {
        self.state.refresh_legal_moves();
        if self.state.side_to_move() != self.human {
            self.engine_move()?;
        }

        loop {
            if self.state.is_checkmate() {
                self.message = format!("Checkmate! {} wins!", color_name(self.state.side_to_move().opponent()));
            } else if self.state.is_stalemate() {
                self.message = String::from("Stalemate!");
            } else if self.state.in_check() {
                self.message = String::from("Check!");
            }
            self.draw_board()?;

            let Event::Key(KeyEvent { code, kind, .. }) = event::read()? else {
                continue;
            };
            if kind != KeyEventKind::Press {
                continue;
            }

            match code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1, 0),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(0, -1),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(0, 1),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1, 0),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if self.handle_selection() {
                        self.engine_move()?;
                    }
                }
                KeyCode::Char('u') => self.undo_move(),
                KeyCode::Char('n') => self.new_game()?,
                _ => {}
            }
        }

        Ok(())
    }

    fn move_cursor(&mut self, dx: i8, dy: i8) {
        let new_file = self.cursor_pos.0 as i8 + dx;
        let new_rank = self.cursor_pos.1 as i8 + dy;

        if (0..8).contains(&new_file) && (0..8).contains(&new_rank) {
            self.cursor_pos = (new_file as u8, new_rank as u8);
        }
    }

    fn cursor_square(&self) -> Option<Square> {
        Some(Square::new(
            File::new(self.cursor_pos.0)?,
            Rank::new(self.cursor_pos.1)?,
        ))
    }

    /// Returns true when the human completed a move.
    fn handle_selection(&mut self) -> bool {
        let Some(cursor_square) = self.cursor_square() else {
            return false;
        };
        if self.state.side_to_move() != self.human {
            return false;
        }

        if self.selected_square.is_some() {
            let chosen = self
                .legal_moves_for_selected
                .iter()
                .find(|m| m.to == cursor_square)
                .copied();
            self.selected_square = None;
            self.legal_moves_for_selected.clear();

            if let Some(mv) = chosen {
                match self.state.make_legal_move(mv) {
                    Ok(()) => {
                        self.message = format!("Moved: {mv}");
                        return true;
                    }
                    Err(err) => {
                        warn!(%err, "rejected move");
                        self.message = err.to_string();
                        return false;
                    }
                }
            }
        }

        // Try to select a piece
        if let Some(piece) = self.state.board().piece_at(cursor_square) {
            if piece.color == self.human {
                self.selected_square = Some(cursor_square);
                self.legal_moves_for_selected = self
                    .state
                    .legal_moves()
                    .iter()
                    .filter(|m| m.from == cursor_square)
                    .copied()
                    .collect();

                self.message = format!(
                    "Selected {} at {}",
                    piece_name(piece.piece_type),
                    cursor_square
                );
            }
        }

        false
    }

    fn engine_move(&mut self) -> io::Result<()> {
        if self.state.legal_moves().is_empty() {
            return Ok(());
        }

        self.message = String::from("Engine thinking...");
        self.draw_board()?;

        let handle = spawn_search(&self.state, self.config);
        let result = handle
            .join()
            .map_err(|_| io::Error::other("search thread panicked"))?;
        debug!(score = result.score, nodes = result.nodes, "engine replied");

        self.play_engine_reply(result.best_move);
        Ok(())
    }

    fn play_engine_reply(&mut self, best_move: Option<Move>) {
        let Some(engine_move) = best_move else {
            self.message = String::from("Engine has no move");
            return;
        };

        match self.state.make_legal_move(engine_move) {
            Ok(()) => self.message = format!("Engine played: {engine_move}"),
            Err(err) => {
                warn!(%err, "engine move rejected");
                self.message = err.to_string();
            }
        }
    }

    /// Takes back the last human move and any engine reply after it. The
    /// human is always to move afterwards; an engine move with no human move
    /// before it stays on the board.
    fn undo_move(&mut self) {
        let plies = if self.state.side_to_move() == self.human { 2 } else { 1 };
        if self.state.history().count() < plies {
            self.message = String::from("Nothing to undo");
            return;
        }

        for _ in 0..plies {
            self.state.undo();
        }
        self.state.refresh_legal_moves();

        self.selected_square = None;
        self.legal_moves_for_selected.clear();
        self.message = String::from("Undid last move");
    }

    fn new_game(&mut self) -> io::Result<()> {
        self.state = self.start.clone();
        self.state.refresh_legal_moves();
        self.selected_square = None;
        self.legal_moves_for_selected.clear();
        self.cursor_pos = home_cursor(self.human);
        self.message = String::from("New game started!");

        if self.state.side_to_move() != self.human {
            self.engine_move()?;
        }
        Ok(())
    }

    fn draw_board(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.execute(MoveTo(0, 0))?;
        stdout.execute(Clear(ClearType::FromCursorDown))?;

        println!("Chess - Interactive Mode (vim keys: hjkl)\r");
        println!("Commands: Enter=select/move, u=undo, n=new, q=quit\r");
        println!("\r");

        println!("  a b c d e f g h  \r");
        println!(" ┌─────────────────┐\r");

        let checked_king = self
            .state
            .in_check()
            .then(|| self.state.king_square(self.state.side_to_move()));

        for rank_idx in (0..8u8).rev() {
            print!("{}│ ", rank_idx + 1);

            for file_idx in 0..8u8 {
                let square = Square::from_index(rank_idx * 8 + file_idx)
                    .ok_or_else(|| io::Error::other("square out of range"))?;

                let is_cursor = self.cursor_pos == (file_idx, rank_idx);
                let is_selected = self.selected_square == Some(square);
                let is_legal_move = self.legal_moves_for_selected.iter().any(|m| m.to == square);

                let background = if is_cursor {
                    TermColor::Yellow
                } else if is_selected {
                    TermColor::Green
                } else if is_legal_move {
                    TermColor::Blue
                } else if checked_king == Some(square) {
                    TermColor::Red
                } else if (file_idx + rank_idx) % 2 == 0 {
                    TermColor::DarkGrey
                } else {
                    TermColor::Black
                };
                stdout.execute(SetBackgroundColor(background))?;

                if let Some(piece) = self.state.board().piece_at(square) {
                    let foreground = match piece.color {
                        Color::White => TermColor::White,
                        Color::Black => TermColor::Magenta,
                    };
                    stdout.execute(SetForegroundColor(foreground))?;
                    print!("{} ", crate::piece_symbol(piece));
                } else {
                    print!("  ");
                }

                stdout.execute(ResetColor)?;
            }

            println!("│{}\r", rank_idx + 1);
        }

        println!(" └─────────────────┘\r");
        println!("  a b c d e f g h  \r");
        println!("\r");

        let last = self
            .state
            .last_move()
            .map(|mv| mv.to_string())
            .unwrap_or_else(|| String::from("-"));
        println!(
            "{} to move | Ply {} | Last {}\r",
            color_name(self.state.side_to_move()),
            self.state.history().count(),
            last
        );

        println!("\r");
        println!("{}\r", self.message);

        stdout.flush()?;
        Ok(())
    }
}

fn home_cursor(human: Color) -> (u8, u8) {
    // e-pawn of the human side
    (4, human.pawn_rank().index())
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

fn piece_name(piece_type: PieceType) -> &'static str {
    match piece_type {
        PieceType::Pawn => "Pawn",
        PieceType::Knight => "Knight",
        PieceType::Bishop => "Bishop",
        PieceType::Rook => "Rook",
        PieceType::Queen => "Queen",
        PieceType::King => "King",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Piece;

    fn game(human: Color) -> InteractiveGame {
        let mut game = InteractiveGame::new(GameState::new(), human, SearchConfig::depth(1));
        game.state.refresh_legal_moves();
        game
    }

    fn play(game: &mut InteractiveGame, text: &str) {
        let mv = game
            .state
            .legal_moves()
            .iter()
            .find(|mv| mv.to_string() == text)
            .copied()
            .unwrap();
        game.state.make_legal_move(mv).unwrap();
    }

    #[test]
    fn test_undo_keeps_engine_opening_move() {
        let mut game = game(Color::Black);
        play(&mut game, "e2e4");

        game.undo_move();

        assert_eq!(game.message, "Nothing to undo");
        assert_eq!(game.state.history().count(), 1);
        assert_eq!(game.state.side_to_move(), Color::Black);
        assert_eq!(game.state.legal_moves().len(), 20);
    }

    #[test]
    fn test_undo_takes_back_move_and_reply() {
        let mut game = game(Color::Black);
        play(&mut game, "e2e4");
        play(&mut game, "e7e5");
        play(&mut game, "g1f3");

        game.undo_move();

        assert_eq!(game.message, "Undid last move");
        assert_eq!(game.state.history().count(), 1);
        assert_eq!(game.state.side_to_move(), Color::Black);
    }

    #[test]
    fn test_undo_as_white_returns_to_start() {
        let mut game = game(Color::White);
        game.undo_move();
        assert_eq!(game.message, "Nothing to undo");

        play(&mut game, "d2d4");
        play(&mut game, "d7d5");
        game.undo_move();

        assert_eq!(game.state.history().count(), 0);
        assert_eq!(game.state.side_to_move(), Color::White);
        assert_eq!(game.state.legal_moves().len(), 20);
    }

    #[test]
    fn test_engine_reply_reports_rejected_move() {
        let mut game = game(Color::Black);
        let bogus = Move::new(
            Square::new(File::A, Rank::First),
            Square::new(File::A, Rank::Fourth),
            Piece::new(PieceType::Rook, Color::White),
            None,
        );

        game.play_engine_reply(Some(bogus));
        assert!(game.message.starts_with("Illegal move"), "{}", game.message);
        assert_eq!(game.state.history().count(), 0);

        let legal = game.state.legal_moves()[0];
        game.play_engine_reply(Some(legal));
        assert_eq!(game.message, format!("Engine played: {legal}"));
        assert_eq!(game.state.history().count(), 1);

        game.play_engine_reply(None);
        assert_eq!(game.message, "Engine has no move");
    }
}
