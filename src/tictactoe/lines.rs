//! Line analysis: termination detection and one-move-from-decided scans

use serde::{Deserialize, Serialize};

use super::{
    Cell,
    game::{Outcome, TerminalResult},
};
use crate::types::{CELL_COUNT, Position};

/// Index of a row or column, limited to the three on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lane {
    First,
    Second,
    Third,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::First, Lane::Second, Lane::Third];

    /// Lane for a 0-based row or column index.
    pub fn from_index(index: usize) -> Option<Lane> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            Lane::First => 0,
            Lane::Second => 1,
            Lane::Third => 2,
        }
    }
}

/// One of the eight lines of the 3x3 board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    Row(Lane),
    Column(Lane),
    MainDiagonal,
    AntiDiagonal,
}

/// Lines in scan order: rows, then columns, then the main and anti diagonals.
pub const SCAN_ORDER: [Line; 8] = [
    Line::Row(Lane::First),
    Line::Row(Lane::Second),
    Line::Row(Lane::Third),
    Line::Column(Lane::First),
    Line::Column(Lane::Second),
    Line::Column(Lane::Third),
    Line::MainDiagonal,
    Line::AntiDiagonal,
];

impl Line {
    /// Row-major indices of the line's cells, in reading order.
    pub fn positions(self) -> [usize; 3] {
        match self {
            Line::Row(lane) => {
                let r = lane.index();
                [3 * r, 3 * r + 1, 3 * r + 2]
            }
            Line::Column(lane) => {
                let c = lane.index();
                [c, c + 3, c + 6]
            }
            Line::MainDiagonal => [0, 4, 8],
            Line::AntiDiagonal => [2, 4, 6],
        }
    }

    /// Coordinate pair used by board renderers: `(3, i)` for row `i`,
    /// `(i, 3)` for column `i`, `(-3, -3)` for the main diagonal and
    /// `(3, 3)` for the anti-diagonal.
    pub fn coordinate_pair(self) -> (i8, i8) {
        match self {
            Line::Row(lane) => (3, lane.index() as i8),
            Line::Column(lane) => (lane.index() as i8, 3),
            Line::MainDiagonal => (-3, -3),
            Line::AntiDiagonal => (3, 3),
        }
    }
}

/// Utility for analyzing lines of a grid
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Evaluate a grid without assuming it arose from legal play.
    ///
    /// The first closed line in [`SCAN_ORDER`] decides the result, so the
    /// reported cause is deterministic even when several lines are closed.
    pub fn evaluate(cells: &[Cell; CELL_COUNT]) -> TerminalResult {
        for line in SCAN_ORDER {
            if let Some(winner) = Self::closed_by(cells, line) {
                return TerminalResult {
                    outcome: Outcome::Win(winner),
                    cause: Some(line),
                };
            }
        }

        let outcome = if cells.contains(&Cell::Empty) {
            Outcome::Undecided
        } else {
            Outcome::Draw
        };
        TerminalResult {
            outcome,
            cause: None,
        }
    }

    /// The player whose three marks fill `line`, if any.
    pub fn closed_by(cells: &[Cell; CELL_COUNT], line: Line) -> Option<super::Player> {
        let [a, b, c] = line.positions();
        let first = cells[a];
        if first != Cell::Empty && cells[b] == first && cells[c] == first {
            first.to_player()
        } else {
            None
        }
    }

    /// First line (in [`SCAN_ORDER`]) with exactly one empty cell whose other
    /// two cells hold the same mark, paired with that empty cell.
    ///
    /// Completing the line wins for the owner of the pair and blocks for the
    /// other player, so the cell is the move either way. Only the first hit
    /// is reported: a double threat yields a single answer.
    pub fn decisive_cell(cells: &[Cell; CELL_COUNT]) -> Option<(Line, Position)> {
        SCAN_ORDER.iter().find_map(|&line| {
            Self::open_cell_in_line(cells, line).map(|position| (line, position))
        })
    }

    fn open_cell_in_line(cells: &[Cell; CELL_COUNT], line: Line) -> Option<Position> {
        let mut empty_pos = None;
        let mut marks = Vec::with_capacity(2);

        for idx in line.positions() {
            match cells[idx] {
                Cell::Empty => {
                    if empty_pos.is_some() {
                        return None;
                    }
                    empty_pos = Some(idx);
                }
                mark => marks.push(mark),
            }
        }

        match (empty_pos, marks.as_slice()) {
            (Some(idx), [first, second]) if first == second => Position::new(idx).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tictactoe::Player, types::StateKey};

    fn cells(key: &str) -> [Cell; CELL_COUNT] {
        StateKey::parse(key).unwrap().cells()
    }

    #[test]
    fn test_row_win() {
        let result = LineAnalyzer::evaluate(&cells("111002222"));
        assert_eq!(result.outcome, Outcome::Win(Player::One));
        assert_eq!(result.cause, Some(Line::Row(Lane::First)));
    }

    #[test]
    fn test_column_win() {
        let result = LineAnalyzer::evaluate(&cells("012012222"));
        assert_eq!(result.outcome, Outcome::Undecided);

        let result = LineAnalyzer::evaluate(&cells("012012012"));
        assert_eq!(result.outcome, Outcome::Win(Player::Zero));
        assert_eq!(result.cause, Some(Line::Column(Lane::First)));
    }

    #[test]
    fn test_diagonal_wins() {
        let main = LineAnalyzer::evaluate(&cells("102210221"));
        assert_eq!(main.outcome, Outcome::Win(Player::One));
        assert_eq!(main.cause, Some(Line::MainDiagonal));

        let anti = LineAnalyzer::evaluate(&cells("110202022"));
        assert_eq!(anti.outcome, Outcome::Win(Player::Zero));
        assert_eq!(anti.cause, Some(Line::AntiDiagonal));
    }

    #[test]
    fn test_rows_reported_before_columns() {
        // Row 0 and column 0 both closed by player 1 (not reachable in play)
        let result = LineAnalyzer::evaluate(&cells("111122122"));
        assert_eq!(result.cause, Some(Line::Row(Lane::First)));
    }

    #[test]
    fn test_lower_index_row_reported_first_across_players() {
        let result = LineAnalyzer::evaluate(&cells("000222111"));
        assert_eq!(result.outcome, Outcome::Win(Player::Zero));
        assert_eq!(result.cause, Some(Line::Row(Lane::First)));
    }

    #[test]
    fn test_draw_and_undecided() {
        let draw = LineAnalyzer::evaluate(&cells("101100010"));
        assert_eq!(draw.outcome, Outcome::Draw);
        assert_eq!(draw.cause, None);

        let open = LineAnalyzer::evaluate(&cells("222222222"));
        assert_eq!(open.outcome, Outcome::Undecided);
        assert_eq!(open.cause, None);
    }

    #[test]
    fn test_decisive_cell_for_own_pair() {
        let (line, position) = LineAnalyzer::decisive_cell(&cells("112220202")).unwrap();
        assert_eq!(line, Line::Row(Lane::First));
        assert_eq!(position.coords(), (0, 2));
    }

    #[test]
    fn test_decisive_cell_needs_equal_marks() {
        assert!(LineAnalyzer::decisive_cell(&cells("102222222")).is_none());
        assert!(LineAnalyzer::decisive_cell(&cells("122222222")).is_none());
    }

    #[test]
    fn test_decisive_cell_scan_order() {
        // Column 2 (opponent pair) and the anti-diagonal both qualify;
        // columns come first.
        let (line, position) = LineAnalyzer::decisive_cell(&cells("202210120")).unwrap();
        assert_eq!(line, Line::Column(Lane::Third));
        assert_eq!(position.value(), 2);
    }

    #[test]
    fn test_lanes_stay_on_board() {
        assert_eq!(Lane::from_index(2), Some(Lane::Third));
        assert_eq!(Lane::from_index(3), None);

        let cells = cells("222222222");
        for line in SCAN_ORDER {
            assert!(line.positions().iter().all(|&i| i < CELL_COUNT));
            assert_eq!(LineAnalyzer::closed_by(&cells, line), None);
        }
    }

    #[test]
    fn test_coordinate_pairs() {
        assert_eq!(Line::Row(Lane::Third).coordinate_pair(), (3, 2));
        assert_eq!(Line::Column(Lane::Second).coordinate_pair(), (1, 3));
        assert_eq!(Line::MainDiagonal.coordinate_pair(), (-3, -3));
        assert_eq!(Line::AntiDiagonal.coordinate_pair(), (3, 3));
    }
}
