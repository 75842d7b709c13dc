//! Tic-tac-toe rules
//!
//! Plain game state, no protocol awareness. The handlers in
//! [`tools`](crate::tools) own an `Arc<Mutex<Game>>` and call into this.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A mark on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    /// The X player, who moves first
    X,
    /// The O player
    O,
}

impl Player {
    /// The opposing player.
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::O => "O",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Player {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" => Ok(Self::X),
            "O" => Ok(Self::O),
            other => Err(format!("not a player: {other}")),
        }
    }
}

/// Where the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Moves are still being accepted
    Playing,
    /// X completed a line
    XWins,
    /// O completed a line
    OWins,
    /// The board filled with no winner
    Draw,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Playing => "playing",
            Self::XWins => "x_wins",
            Self::OWins => "o_wins",
            Self::Draw => "draw",
        })
    }
}

/// The eight winning lines.
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// A 3×3 tic-tac-toe game.
#[derive(Debug, Clone)]
pub struct Game {
    board: [[Option<Player>; 3]; 3],
    current_player: Player,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A fresh game; X moves first.
    pub fn new() -> Self {
        Self {
            board: [[None; 3]; 3],
            current_player: Player::X,
            status: GameStatus::Playing,
        }
    }

    /// Place a mark. Returns false without changing anything if the game
    /// is over, the cell is out of range or occupied, or it is not this
    /// player's turn.
    pub fn make_move(&mut self, row: usize, col: usize, player: Player) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        if row > 2 || col > 2 {
            return false;
        }
        if self.board[row][col].is_some() {
            return false;
        }
        if player != self.current_player {
            return false;
        }

        self.board[row][col] = Some(player);
        self.update_status();
        if self.status == GameStatus::Playing {
            self.current_player = self.current_player.other();
        }
        true
    }

    /// All empty cells, row-major.
    pub fn available_moves(&self) -> Vec<(usize, usize)> {
        let mut moves = Vec::new();
        for row in 0..3 {
            for col in 0..3 {
                if self.board[row][col].is_none() {
                    moves.push((row, col));
                }
            }
        }
        moves
    }

    /// Back to a fresh board.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Where the game stands.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Whose turn it is.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    fn update_status(&mut self) {
        if let Some(winner) = self.winner() {
            self.status = match winner {
                Player::X => GameStatus::XWins,
                Player::O => GameStatus::OWins,
            };
        } else if self.available_moves().is_empty() {
            self.status = GameStatus::Draw;
        }
    }

    fn winner(&self) -> Option<Player> {
        for line in LINES {
            let [a, b, c] = line.map(|(row, col)| self.board[row][col]);
            if a.is_some() && a == b && b == c {
                return a;
            }
        }
        None
    }
}

impl fmt::Display for Game {
    /// Text rendering: three cell rows separated by dashes, then the
    /// current player and game state.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.board.iter().enumerate() {
            if index > 0 {
                writeln!(f, "---------")?;
            }
            let cells: Vec<&str> = row
                .iter()
                .map(|cell| cell.map_or(" ", Player::as_str))
                .collect();
            writeln!(f, "{}", cells.join(" | "))?;
        }
        writeln!(f, "Current player: {}", self.current_player)?;
        write!(f, "Game state: {}", self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_moves_first_and_turns_alternate() {
        let mut game = Game::new();
        assert_eq!(game.current_player(), Player::X);

        // O may not jump the queue.
        assert!(!game.make_move(0, 0, Player::O));
        assert!(game.make_move(0, 0, Player::X));
        assert_eq!(game.current_player(), Player::O);
        assert!(game.make_move(1, 1, Player::O));
        assert_eq!(game.current_player(), Player::X);
    }

    #[test]
    fn rejects_occupied_and_out_of_range_cells() {
        let mut game = Game::new();
        assert!(game.make_move(0, 0, Player::X));
        assert!(!game.make_move(0, 0, Player::O));
        assert!(!game.make_move(3, 0, Player::O));
        assert!(!game.make_move(0, 3, Player::O));
        // The failed attempts did not consume O's turn.
        assert!(game.make_move(0, 1, Player::O));
    }

    #[test]
    fn detects_a_row_win() {
        let mut game = Game::new();
        game.make_move(0, 0, Player::X);
        game.make_move(1, 0, Player::O);
        game.make_move(0, 1, Player::X);
        game.make_move(1, 1, Player::O);
        game.make_move(0, 2, Player::X);
        assert_eq!(game.status(), GameStatus::XWins);
        // No further moves once the game is over.
        assert!(!game.make_move(2, 2, Player::O));
    }

    #[test]
    fn detects_a_diagonal_win() {
        let mut game = Game::new();
        game.make_move(0, 2, Player::X);
        game.make_move(0, 0, Player::O);
        game.make_move(1, 1, Player::X);
        game.make_move(0, 1, Player::O);
        game.make_move(2, 0, Player::X);
        assert_eq!(game.status(), GameStatus::XWins);
    }

    #[test]
    fn detects_a_draw() {
        let mut game = Game::new();
        // X X O / O O X / X O X — full board, no line.
        for (row, col, player) in [
            (0, 0, Player::X),
            (0, 2, Player::O),
            (0, 1, Player::X),
            (1, 0, Player::O),
            (1, 2, Player::X),
            (1, 1, Player::O),
            (2, 0, Player::X),
            (2, 1, Player::O),
            (2, 2, Player::X),
        ] {
            assert!(game.make_move(row, col, player), "({row},{col})");
        }
        assert_eq!(game.status(), GameStatus::Draw);
    }

    #[test]
    fn available_moves_shrink_as_the_board_fills() {
        let mut game = Game::new();
        assert_eq!(game.available_moves().len(), 9);
        game.make_move(1, 1, Player::X);
        let moves = game.available_moves();
        assert_eq!(moves.len(), 8);
        assert!(!moves.contains(&(1, 1)));
    }

    #[test]
    fn reset_restores_a_fresh_game() {
        let mut game = Game::new();
        game.make_move(0, 0, Player::X);
        game.reset();
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.current_player(), Player::X);
        assert_eq!(game.available_moves().len(), 9);
    }

    #[test]
    fn renders_the_reference_layout() {
        let mut game = Game::new();
        game.make_move(0, 0, Player::X);
        game.make_move(1, 1, Player::O);

        let rendered = game.to_string();
        let expected = "X |   |  \n\
                        ---------\n\
                        \u{20} | O |  \n\
                        ---------\n\
                        \u{20} |   |  \n\
                        Current player: X\n\
                        Game state: playing";
        assert_eq!(rendered, expected);
    }
}
