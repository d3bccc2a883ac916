//! Newtype wrappers for board positions and canonical state keys.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::tictactoe::Cell;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Number of distinct canonical state keys (3^9).
pub const STATE_SPACE: usize = 19_683;

/// A position on the game board (0-8, row-major).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position(usize);

impl Position {
    /// Create a new position, validating it's within board bounds.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPosition`] if the position is >= 9.
    pub fn new(value: usize) -> Result<Self, crate::Error> {
        if value < CELL_COUNT {
            Ok(Position(value))
        } else {
            Err(crate::Error::InvalidPosition { position: value })
        }
    }

    /// Create a position from row and column coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if either coordinate is >= 3.
    pub fn from_coords(row: usize, col: usize) -> Result<Self, crate::Error> {
        if row < 3 && col < 3 {
            Ok(Position(row * 3 + col))
        } else {
            Err(crate::Error::OutOfBounds { row, col })
        }
    }

    /// Get the inner value.
    pub fn value(&self) -> usize {
        self.0
    }

    pub fn row(&self) -> usize {
        self.0 / 3
    }

    pub fn col(&self) -> usize {
        self.0 % 3
    }

    /// The `(row, col)` pair addressed by this position.
    pub fn coords(&self) -> (usize, usize) {
        (self.row(), self.col())
    }
}

impl From<Position> for usize {
    fn from(pos: Position) -> Self {
        pos.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical state key: one ternary digit per cell in row-major order.
///
/// `'0'` and `'1'` are cells owned by player 0 and player 1, `'2'` is an
/// empty cell. The same digits read as a base-3 number give [`index`],
/// which addresses the flat knowledge arrays.
///
/// [`index`]: StateKey::index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateKey {
    encoding: String,
    index: usize,
}

impl StateKey {
    /// Encode a grid.
    pub fn from_cells(cells: &[Cell; CELL_COUNT]) -> Self {
        let mut encoding = String::with_capacity(CELL_COUNT);
        let mut index = 0;
        for cell in cells {
            encoding.push(cell.to_digit());
            index = index * 3 + cell.ternary();
        }
        StateKey { encoding, index }
    }

    /// The key of the empty board.
    pub fn empty() -> Self {
        Self::from_cells(&[Cell::Empty; CELL_COUNT])
    }

    /// Parse a nine-digit key such as `"112220202"`.
    ///
    /// # Errors
    ///
    /// Returns error if the string is not exactly nine characters or any
    /// character is outside `{'0', '1', '2'}`.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != CELL_COUNT {
            return Err(crate::Error::InvalidKeyLength {
                expected: CELL_COUNT,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; CELL_COUNT];
        for (position, &character) in chars.iter().enumerate() {
            cells[position] =
                Cell::from_digit(character).ok_or_else(|| crate::Error::InvalidKeyCharacter {
                    character,
                    position,
                    context: s.to_string(),
                })?;
        }
        Ok(Self::from_cells(&cells))
    }

    /// Rebuild a key from its base-3 value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `index` is outside the state space.
    pub fn from_index(index: usize) -> Result<Self, crate::Error> {
        if index >= STATE_SPACE {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("state index {index} exceeds {}", STATE_SPACE - 1),
            });
        }
        let mut cells = [Cell::Empty; CELL_COUNT];
        let mut rest = index;
        for slot in cells.iter_mut().rev() {
            *slot = Cell::from_ternary(rest % 3);
            rest /= 3;
        }
        Ok(Self::from_cells(&cells))
    }

    pub fn as_str(&self) -> &str {
        &self.encoding
    }

    /// Base-3 value of the key (0..19683).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Decode the key back into a grid.
    pub fn cells(&self) -> [Cell; CELL_COUNT] {
        let mut cells = [Cell::Empty; CELL_COUNT];
        for (slot, character) in cells.iter_mut().zip(self.encoding.chars()) {
            // Keys are validated on construction.
            *slot = Cell::from_digit(character).unwrap_or(Cell::Empty);
        }
        cells
    }

    /// Positions still empty in this state, ascending.
    pub fn empty_positions(&self) -> Vec<usize> {
        self.encoding
            .char_indices()
            .filter(|&(_, c)| c == '2')
            .map(|(i, _)| i)
            .collect()
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoding)
    }
}

impl FromStr for StateKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StateKey {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StateKey> for String {
    fn from(key: StateKey) -> Self {
        key.encoding
    }
}
