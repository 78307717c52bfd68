//! Board file uploads.
//!
//! A board file is plain text: a `"<rows> <cols>"` header line followed by
//! one line per row of whitespace-separated cell values, e.g.
//!
//! ```text
//! 3 4
//! 0 1 1 0
//! 1 0 0 0
//! 0 0 1 1
//! ```
//!
//! The file is validated locally before it is sent, so a typo is reported
//! against the file instead of as an opaque server error.

use crate::client::GameServer;
use crate::error::{ErrorKind, GameClientError};
use crate::game::{BoardState, Cell};
use rand::Rng;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// A parsed board file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardFile {
    board: BoardState,
}

impl BoardFile {
    /// Parses board file text.
    #[instrument(skip(text))]
    pub fn parse(text: &str) -> Result<Self, GameClientError> {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

        let header = lines
            .next()
            .ok_or_else(|| board_file_error("file is empty"))?;
        let dims: Vec<usize> = header
            .split_whitespace()
            .map(|v| v.parse::<usize>())
            .collect::<Result<_, _>>()
            .map_err(|_| board_file_error(format!("invalid header line: {:?}", header)))?;
        let [rows, cols] = dims[..] else {
            return Err(board_file_error(format!(
                "header must be \"<rows> <cols>\", got {:?}",
                header
            )));
        };
        if rows == 0 || cols == 0 {
            return Err(board_file_error("board must have at least one row and column"));
        }

        let mut matrix = Vec::with_capacity(rows);
        for (i, line) in lines.enumerate() {
            let row: Vec<u32> = line
                .split_whitespace()
                .map(|v| v.parse::<u32>())
                .collect::<Result<_, _>>()
                .map_err(|_| board_file_error(format!("row {} has a non-numeric cell", i + 1)))?;
            if row.len() != cols {
                return Err(board_file_error(format!(
                    "row {} has {} cells, expected {}",
                    i + 1,
                    row.len(),
                    cols
                )));
            }
            matrix.push(row);
        }
        if matrix.len() != rows {
            return Err(board_file_error(format!(
                "expected {} rows, found {}",
                rows,
                matrix.len()
            )));
        }

        let board = BoardState::from_wire(rows, cols, matrix)
            .map_err(|e| board_file_error(e.kind.to_string()))?;
        Ok(Self { board })
    }

    /// Generates a `rows × cols` board where each cell is occupied with
    /// probability one half.
    #[instrument(skip(rng))]
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Result<Self, GameClientError> {
        let cells = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| if rng.random_bool(0.5) { Cell::Occupied } else { Cell::Empty })
                    .collect()
            })
            .collect();
        let board = BoardState::new(rows, cols, cells)
            .map_err(|e| board_file_error(e.kind.to_string()))?;
        debug!(occupied = board.occupied(), "Generated random board");
        Ok(Self { board })
    }

    /// The board described by the file.
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Formats the board in the file format [`BoardFile::parse`] reads.
    pub fn to_text(&self) -> String {
        let mut text = format!("{} {}\n", self.board.rows(), self.board.cols());
        for row in self.board.cells() {
            let values: Vec<String> = row.iter().map(|cell| cell.to_wire().to_string()).collect();
            text.push_str(&values.join(" "));
            text.push('\n');
        }
        text
    }

    /// Writes the board file to `path`.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn write(&self, path: &Path) -> Result<(), GameClientError> {
        tokio::fs::write(path, self.to_text()).await.map_err(|e| {
            warn!(error = %e, "Failed to write board file");
            board_file_error(format!("cannot write {}: {}", path.display(), e))
        })?;
        info!(rows = self.board.rows(), cols = self.board.cols(), "Board file written");
        Ok(())
    }
}

#[track_caller]
fn board_file_error(message: impl Into<String>) -> GameClientError {
    GameClientError::new(ErrorKind::BoardFile(message.into()))
}

/// Sends board files to the server and returns the board it installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadCoordinator;

impl UploadCoordinator {
    /// Reads, validates and uploads the board file at `path`.
    #[instrument(skip(self, server, path), fields(path = %path.display()))]
    pub async fn upload<S: GameServer + ?Sized>(
        &self,
        server: &S,
        path: &Path,
    ) -> Result<BoardState, GameClientError> {
        let contents = tokio::fs::read(path).await.map_err(|e| {
            warn!(error = %e, "Failed to read board file");
            board_file_error(format!("cannot read {}: {}", path.display(), e))
        })?;
        let local = BoardFile::parse(&String::from_utf8_lossy(&contents))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "board.txt".to_string());
        let board = server.upload(&file_name, contents).await?;

        if board.rows() != local.board().rows() || board.cols() != local.board().cols() {
            warn!(
                sent_rows = local.board().rows(),
                sent_cols = local.board().cols(),
                got_rows = board.rows(),
                got_cols = board.cols(),
                "Server installed a board of different size"
            );
        }
        info!(rows = board.rows(), cols = board.cols(), "Board uploaded");
        Ok(board)
    }
}
