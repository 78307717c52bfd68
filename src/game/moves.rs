//! Move requests and the header identifiers they are read from.

use super::types::BoardState;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Axis of a move.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Clear a whole row.
    Row,
    /// Clear a whole column.
    Col,
}

/// A move as sent to `POST /move`. `index` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Axis being cleared.
    pub direction: Direction,
    /// 1-based row or column number.
    pub index: usize,
}

impl MoveRequest {
    /// Creates a move request.
    pub fn new(direction: Direction, index: usize) -> Self {
        Self { direction, index }
    }

    /// Identifier of the header that issues this move, e.g. `col-2`.
    pub fn element_id(&self) -> String {
        format!("{}-{}", self.direction, self.index)
    }

    /// Reads a move from a header identifier such as `row-3`.
    #[instrument]
    pub fn from_element_id(id: &str) -> Option<Self> {
        let (direction, index) = id.split_once('-')?;
        let direction = Direction::from_str(direction).ok()?;
        let index = index.parse::<usize>().ok()?;
        Some(Self { direction, index })
    }

    /// Whether this move addresses a row or column that exists on `board`.
    pub fn fits(&self, board: &BoardState) -> bool {
        let limit = match self.direction {
            Direction::Row => *board.rows(),
            Direction::Col => *board.cols(),
        };
        (1..=limit).contains(&self.index)
    }

    /// Human-readable label: the row number or the column letter.
    pub fn label(&self) -> String {
        match self.direction {
            Direction::Row => self.index.to_string(),
            Direction::Col => column_label(self.index),
        }
    }
}

/// Letter notation for a 1-based column: `A..Z`, then `AA, AB, ...`.
pub fn column_label(index: usize) -> String {
    let mut n = index;
    let mut label = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

/// A user activation of a board header.
///
/// Carries only the identifier of the activated element; the controller
/// decodes it against the current board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gesture {
    /// Identifier of the activated header.
    pub target_id: String,
}

impl Gesture {
    /// Creates a gesture for the given element identifier.
    pub fn new(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
        }
    }
}

impl From<MoveRequest> for Gesture {
    fn from(request: MoveRequest) -> Self {
        Self::new(request.element_id())
    }
}
