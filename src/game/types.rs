//! Core domain types for the line-sweep board.

use crate::error::GameClientError;
use derive_getters::Getters;
use derive_new::new;
use tracing::instrument;

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Nothing to collect.
    Empty,
    /// A stone worth one point to whoever clears it.
    Occupied,
}

impl Cell {
    /// Maps a wire value to a cell. Zero is empty; anything else is occupied.
    pub fn from_wire(value: u32) -> Self {
        if value == 0 { Cell::Empty } else { Cell::Occupied }
    }

    /// Wire and board-file value of this cell.
    pub fn to_wire(self) -> u32 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied => 1,
        }
    }
}

/// Latest board snapshot reported by the server.
///
/// Only built through [`BoardState::new`] and [`BoardState::from_wire`], so
/// `cells` always matches `rows × cols`.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct BoardState {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Cells in row-major order, one `Vec` per row.
    cells: Vec<Vec<Cell>>,
}

impl BoardState {
    /// Builds a snapshot, checking that `cells` is exactly `rows × cols`.
    #[instrument(skip(cells))]
    #[track_caller]
    pub fn new(rows: usize, cols: usize, cells: Vec<Vec<Cell>>) -> Result<Self, GameClientError> {
        if rows == 0 || cols == 0 {
            return Err(GameClientError::protocol(format!(
                "board must have at least one row and column, got {}x{}",
                rows, cols
            )));
        }
        if cells.len() != rows {
            return Err(GameClientError::protocol(format!(
                "expected {} rows, got {}",
                rows,
                cells.len()
            )));
        }
        if let Some((i, row)) = cells.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(GameClientError::protocol(format!(
                "row {} has {} cells, expected {}",
                i + 1,
                row.len(),
                cols
            )));
        }
        Ok(Self { rows, cols, cells })
    }

    /// Builds a snapshot from the wire matrix of integers.
    #[track_caller]
    pub fn from_wire(
        rows: usize,
        cols: usize,
        board: Vec<Vec<u32>>,
    ) -> Result<Self, GameClientError> {
        let cells = board
            .into_iter()
            .map(|row| row.into_iter().map(Cell::from_wire).collect())
            .collect();
        Self::new(rows, cols, cells)
    }

    /// Gets the cell at a 1-based `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row == 0 || col == 0 {
            return None;
        }
        self.cells.get(row - 1).and_then(|r| r.get(col - 1)).copied()
    }

    /// Counts occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell == Cell::Occupied)
            .count()
    }

    /// Formats the board as text with column letters and row numbers.
    pub fn display(&self) -> String {
        let mut result = String::from("   ");
        for col in 1..=self.cols {
            result.push_str(&format!(" {:>2}", super::column_label(col)));
        }
        for (i, row) in self.cells.iter().enumerate() {
            result.push_str(&format!("\n{:>3}", i + 1));
            for cell in row {
                let symbol = match cell {
                    Cell::Empty => '.',
                    Cell::Occupied => 'o',
                };
                result.push_str(&format!("  {}", symbol));
            }
        }
        result
    }
}

/// Points collected by each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Getters, new)]
pub struct Score {
    /// Points collected by the human player.
    player: u32,
    /// Points collected by the AI.
    ai: u32,
}

/// Termination status reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, new)]
pub struct GameStatus {
    /// Whether the game has ended.
    over: bool,
    /// Result line, e.g. "Player wins!".
    message: Option<String>,
}

/// Whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Actor {
    /// The human at the keyboard.
    #[strum(to_string = "Player")]
    Player,
    /// The server-side opponent.
    #[strum(to_string = "AI")]
    Ai,
}
