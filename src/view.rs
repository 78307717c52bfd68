//! Pure rendering of a board snapshot into a display-independent view tree.
//!
//! The view tree is what any display adapter draws: one labelled header per
//! row and column, each carrying the move it issues, and one marker per cell.
//! Rendering has no side effects, so the same input always yields an equal
//! tree.

use crate::error::{ErrorKind, GameClientError};
use crate::game::{BoardState, Cell, Direction, MoveRequest};
use derive_getters::Getters;
use tracing::instrument;

/// Visual marker of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Occupied cell.
    Stone,
    /// Empty cell.
    Blank,
}

/// A row or column label that can be activated to issue a move.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct HeaderCell {
    /// Text shown in the header (`A`, `B`, ... or `1`, `2`, ...).
    label: String,
    /// Move issued when this header is activated.
    target: MoveRequest,
}

impl HeaderCell {
    /// Identifier carried by gestures on this header.
    pub fn element_id(&self) -> String {
        self.target.element_id()
    }
}

/// A rendered board cell. Coordinates are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct CellView {
    /// Row number.
    row: usize,
    /// Column number.
    col: usize,
    /// What to draw.
    marker: Marker,
}

/// Renderable description of a board.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ViewTree {
    /// Side length shared by every square, headers included.
    square_size: u16,
    /// Column headers, left to right.
    column_headers: Vec<HeaderCell>,
    /// Row headers, top to bottom.
    row_headers: Vec<HeaderCell>,
    /// Cells, one `Vec` per row.
    cells: Vec<Vec<CellView>>,
}

impl ViewTree {
    /// Number of rows rendered.
    pub fn rows(&self) -> usize {
        self.row_headers.len()
    }

    /// Number of columns rendered.
    pub fn cols(&self) -> usize {
        self.column_headers.len()
    }

    /// Looks up the header for a 1-based row or column.
    pub fn header(&self, direction: Direction, index: usize) -> Option<&HeaderCell> {
        let headers = match direction {
            Direction::Row => &self.row_headers,
            Direction::Col => &self.column_headers,
        };
        index.checked_sub(1).and_then(|i| headers.get(i))
    }

    /// The same tree laid out for a container `container_width` wide.
    pub fn resized(&self, container_width: u16) -> ViewTree {
        ViewTree {
            square_size: square_size(container_width, self.cols()),
            ..self.clone()
        }
    }

    /// Cells addressed by a move, in board order.
    pub fn line(&self, request: MoveRequest) -> Vec<&CellView> {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| match request.direction {
                Direction::Row => cell.row == request.index,
                Direction::Col => cell.col == request.index,
            })
            .collect()
    }
}

/// Renders `rows × cols` cells into a view tree sized for `container_width`.
///
/// One square of width is reserved for the row-label column, so each square
/// is `container_width / (cols + 1)` wide, and rows reuse the same value.
#[instrument(skip(cells))]
pub fn render(
    rows: usize,
    cols: usize,
    cells: &[Vec<Cell>],
    container_width: u16,
) -> Result<ViewTree, GameClientError> {
    if rows == 0 || cols == 0 {
        return Err(GameClientError::new(ErrorKind::View(format!(
            "cannot render a {}x{} board",
            rows, cols
        ))));
    }
    if cells.len() != rows || cells.iter().any(|row| row.len() != cols) {
        return Err(GameClientError::new(ErrorKind::View(format!(
            "cell matrix does not match {}x{}",
            rows, cols
        ))));
    }

    let square_size = square_size(container_width, cols);

    let column_headers = (1..=cols)
        .map(|j| header(MoveRequest::new(Direction::Col, j)))
        .collect();
    let row_headers = (1..=rows)
        .map(|i| header(MoveRequest::new(Direction::Row, i)))
        .collect();

    let cells = cells
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, cell)| CellView {
                    row: i + 1,
                    col: j + 1,
                    marker: match cell {
                        Cell::Occupied => Marker::Stone,
                        Cell::Empty => Marker::Blank,
                    },
                })
                .collect()
        })
        .collect();

    Ok(ViewTree {
        square_size,
        column_headers,
        row_headers,
        cells,
    })
}

/// Renders a validated snapshot.
pub fn render_board(board: &BoardState, container_width: u16) -> Result<ViewTree, GameClientError> {
    render(*board.rows(), *board.cols(), board.cells(), container_width)
}

fn square_size(container_width: u16, cols: usize) -> u16 {
    container_width / u16::try_from(cols + 1).unwrap_or(u16::MAX)
}

fn header(target: MoveRequest) -> HeaderCell {
    HeaderCell {
        label: target.label(),
        target,
    }
}
