//! Board state representation and move application

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{game::TerminalResult, lines::LineAnalyzer};
use crate::types::{CELL_COUNT, Position, StateKey};

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Zero,
    One,
}

impl Cell {
    /// Display glyph: player 0 plays noughts, player 1 plays crosses.
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Zero => 'O',
            Cell::One => 'X',
        }
    }

    /// Digit used in [`StateKey`] encodings.
    pub fn to_digit(self) -> char {
        match self {
            Cell::Zero => '0',
            Cell::One => '1',
            Cell::Empty => '2',
        }
    }

    pub fn from_digit(c: char) -> Option<Cell> {
        match c {
            '0' => Some(Cell::Zero),
            '1' => Some(Cell::One),
            '2' => Some(Cell::Empty),
            _ => None,
        }
    }

    pub(crate) fn ternary(self) -> usize {
        match self {
            Cell::Zero => 0,
            Cell::One => 1,
            Cell::Empty => 2,
        }
    }

    pub(crate) fn from_ternary(value: usize) -> Cell {
        match value {
            0 => Cell::Zero,
            1 => Cell::One,
            _ => Cell::Empty,
        }
    }

    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::Zero => Some(Player::Zero),
            Cell::One => Some(Player::One),
            Cell::Empty => None,
        }
    }

    /// Swap the owner of a marked cell.
    pub fn swapped(self) -> Cell {
        match self {
            Cell::Zero => Cell::One,
            Cell::One => Cell::Zero,
            Cell::Empty => Cell::Empty,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Zero,
    One,
}

impl Player {
    /// Map a raw identity (0 or 1) to a player.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPlayer`] for any other value.
    pub fn from_index(index: u8) -> Result<Player, crate::Error> {
        match index {
            0 => Ok(Player::Zero),
            1 => Ok(Player::One),
            _ => Err(crate::Error::InvalidPlayer { index }),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Player::Zero => 0,
            Player::One => 1,
        }
    }

    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::Zero => Player::One,
            Player::One => Player::Zero,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Zero => Cell::Zero,
            Player::One => Cell::One,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Who a move is applied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mover {
    /// Whoever is due; player 0 when nobody has moved yet this game.
    Auto,
    Player(Player),
}

impl From<Player> for Mover {
    fn from(player: Player) -> Self {
        Mover::Player(player)
    }
}

/// Outcome of a move attempt that did not violate the turn protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[must_use = "a declined move leaves the board unchanged"]
pub enum MoveStatus {
    Applied,
    /// Target cell was already occupied; nothing changed.
    Declined,
}

impl MoveStatus {
    pub fn is_applied(self) -> bool {
        matches!(self, MoveStatus::Applied)
    }
}

/// The 3x3 game board with turn tracking and the opening rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
    current: Option<Player>,
    starter: Player,
    key: StateKey,
}

impl Board {
    /// Create an empty board. Player 0 is recorded as the starter; the
    /// first [`reset`](Self::reset) hands the opening to player 1.
    pub fn new() -> Self {
        Board {
            cells: [Cell::Empty; CELL_COUNT],
            current: None,
            starter: Player::Zero,
            key: StateKey::empty(),
        }
    }

    /// Decode a grid from a state key. Turn order is left unestablished.
    pub fn from_key(key: &StateKey) -> Self {
        Board {
            cells: key.cells(),
            current: None,
            starter: Player::Zero,
            key: key.clone(),
        }
    }

    /// Clear the grid for a new game and rotate the opening player.
    ///
    /// Calling this twice in a row leaves the same empty grid but flips
    /// [`starter`](Self::starter) back, since every call is a new game.
    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; CELL_COUNT];
        self.current = None;
        self.starter = self.starter.opponent();
        self.key = StateKey::empty();
    }

    /// Mark `(row, col)` for `mover`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::OutOfBounds`] if `row` or `col` is not in 0..3
    /// - [`crate::Error::GameOver`] if the game is already decided
    /// - [`crate::Error::TurnViolation`] if `mover` names a player who is not due
    ///
    /// An occupied cell is not an error: it yields [`MoveStatus::Declined`].
    pub fn apply_move(
        &mut self,
        mover: impl Into<Mover>,
        row: usize,
        col: usize,
    ) -> Result<MoveStatus, crate::Error> {
        let position = Position::from_coords(row, col)?;
        if self.result().is_decided() {
            return Err(crate::Error::GameOver);
        }
        if !self.is_empty(position) {
            return Ok(MoveStatus::Declined);
        }

        let player = match mover.into() {
            Mover::Auto => self.current.unwrap_or(Player::Zero),
            Mover::Player(player) => player,
        };
        if let Some(expected) = self.current
            && expected != player
        {
            return Err(crate::Error::TurnViolation {
                expected,
                attempted: player,
            });
        }

        self.cells[position.value()] = player.to_cell();
        self.key = StateKey::from_cells(&self.cells);
        self.current = Some(player.opponent());
        Ok(MoveStatus::Applied)
    }

    /// Mark a row-major position for `mover`.
    pub fn apply_at(
        &mut self,
        mover: impl Into<Mover>,
        position: Position,
    ) -> Result<MoveStatus, crate::Error> {
        let (row, col) = position.coords();
        self.apply_move(mover, row, col)
    }

    /// Evaluate the grid. Has no side effects.
    pub fn result(&self) -> TerminalResult {
        LineAnalyzer::evaluate(&self.cells)
    }

    /// Key of the current grid.
    pub fn canonical_state(&self) -> &StateKey {
        &self.key
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Get cell at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Result<Cell, crate::Error> {
        let position = Position::from_coords(row, col)?;
        Ok(self.cells[position.value()])
    }

    /// Check if a position is empty
    pub fn is_empty(&self, position: Position) -> bool {
        self.cells[position.value()] == Cell::Empty
    }

    /// Get all empty positions
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of marks on the grid.
    pub fn move_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Player due to move, or `None` before the first move of a game.
    pub fn current_player(&self) -> Option<Player> {
        self.current
    }

    /// Player who opens the current game.
    pub fn starter(&self) -> Player {
        self.starter
    }

    /// Relabel every mark (and the turn) to the other player.
    #[must_use = "swap_players returns a new board; the original is unchanged"]
    pub fn swap_players(&self) -> Board {
        let mut cells = self.cells;
        for cell in &mut cells {
            *cell = cell.swapped();
        }
        Board {
            cells,
            current: self.current.map(Player::opponent),
            starter: self.starter.opponent(),
            key: StateKey::from_cells(&cells),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Outcome;

    #[test]
    fn test_new_board() {
        let board = Board::new();
        assert_eq!(board.current_player(), None);
        assert_eq!(board.starter(), Player::Zero);
        assert_eq!(board.canonical_state().as_str(), "222222222");
        assert_eq!(board.empty_positions().len(), 9);
    }

    #[test]
    fn test_apply_move() {
        let mut board = Board::new();
        let status = board.apply_move(Player::One, 1, 1).unwrap();
        assert!(status.is_applied());
        assert_eq!(board.cell(1, 1).unwrap(), Cell::One);
        assert_eq!(board.current_player(), Some(Player::Zero));
        assert_eq!(board.canonical_state().as_str(), "222212222");

        // Occupied cell is declined without state change
        let before = board.clone();
        let status = board.apply_move(Player::Zero, 1, 1).unwrap();
        assert_eq!(status, MoveStatus::Declined);
        assert_eq!(board, before);
    }

    #[test]
    fn test_auto_mover_starts_with_player_zero() {
        let mut board = Board::new();
        assert!(board.apply_move(Mover::Auto, 0, 0).unwrap().is_applied());
        assert_eq!(board.cell(0, 0).unwrap(), Cell::Zero);
        assert!(board.apply_move(Mover::Auto, 0, 1).unwrap().is_applied());
        assert_eq!(board.cell(0, 1).unwrap(), Cell::One);
        assert_eq!(board.current_player(), Some(Player::Zero));
    }

    #[test]
    fn test_turn_violation() {
        let mut board = Board::new();
        assert!(board.apply_move(Player::Zero, 0, 0).unwrap().is_applied());
        let err = board.apply_move(Player::Zero, 2, 2).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::TurnViolation {
                expected: Player::One,
                attempted: Player::Zero
            }
        ));
        assert!(board.is_empty(Position::new(8).unwrap()));
    }

    #[test]
    fn test_is_empty_by_position() {
        let mut board = Board::new();
        let center = Position::from_coords(1, 1).unwrap();
        assert!(board.is_empty(center));
        assert!(board.apply_at(Player::Zero, center).unwrap().is_applied());
        assert!(!board.is_empty(center));
        assert!(Position::new(CELL_COUNT).is_err());
    }

    #[test]
    fn test_invalid_player_index() {
        assert_eq!(Player::from_index(1).unwrap(), Player::One);
        assert!(matches!(
            Player::from_index(2),
            Err(crate::Error::InvalidPlayer { index: 2 })
        ));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::new();
        assert!(matches!(
            board.apply_move(Player::Zero, 3, 0),
            Err(crate::Error::OutOfBounds { row: 3, col: 0 })
        ));
        assert!(board.cell(0, 5).is_err());
    }

    #[test]
    fn test_no_moves_after_decision() {
        let mut board = Board::new();
        for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            assert!(board.apply_move(Mover::Auto, row, col).unwrap().is_applied());
        }
        assert_eq!(board.result().outcome, Outcome::Win(Player::Zero));
        assert!(matches!(
            board.apply_move(Mover::Auto, 2, 2),
            Err(crate::Error::GameOver)
        ));
    }

    #[test]
    fn test_reset_flips_starter() {
        let mut board = Board::new();
        assert!(board.apply_move(Player::One, 0, 0).unwrap().is_applied());
        board.reset();
        assert_eq!(board.starter(), Player::One);
        assert_eq!(board.current_player(), None);
        assert_eq!(board.canonical_state(), &StateKey::empty());

        let once = board.clone();
        board.reset();
        assert_eq!(board.starter(), Player::Zero);
        assert_eq!(board.cells(), once.cells());
        assert_eq!(board.current_player(), once.current_player());
        assert_eq!(board.canonical_state(), once.canonical_state());
    }

    #[test]
    fn test_swap_players() {
        let mut board = Board::new();
        assert!(board.apply_move(Player::One, 0, 0).unwrap().is_applied());
        assert!(board.apply_move(Player::Zero, 2, 2).unwrap().is_applied());
        let swapped = board.swap_players();
        assert_eq!(swapped.canonical_state().as_str(), "022222221");
        assert_eq!(swapped.current_player(), Some(Player::Zero));
    }

    #[test]
    fn test_display() {
        let board = Board::from_key(&StateKey::parse("102222221").unwrap());
        assert_eq!(board.to_string(), "XO.\n...\n..X");
    }
}
