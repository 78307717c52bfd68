//! Header cursor movement for keyboard navigation.

use crossterm::event::KeyCode;
use linesweep::{Direction, MoveRequest};

/// Moves the header cursor based on arrow keys.
///
/// Left/Right walk the column headers, Up/Down walk the row headers. Pressing
/// across axes jumps to the first header of the other axis.
pub fn move_cursor(cursor: MoveRequest, key: KeyCode, rows: usize, cols: usize) -> MoveRequest {
    use Direction::*;

    let MoveRequest { direction, index } = cursor;
    match (direction, key) {
        (Col, KeyCode::Right) => MoveRequest::new(Col, (index + 1).min(cols)),
        (Col, KeyCode::Left) => MoveRequest::new(Col, index.saturating_sub(1).max(1)),
        (Col, KeyCode::Down) => MoveRequest::new(Row, 1),

        (Row, KeyCode::Down) => MoveRequest::new(Row, (index + 1).min(rows)),
        (Row, KeyCode::Up) if index > 1 => MoveRequest::new(Row, index - 1),
        (Row, KeyCode::Up) => MoveRequest::new(Col, 1),
        (Row, KeyCode::Right) => MoveRequest::new(Col, 1),

        // No change for other keys or edge cases
        _ => cursor,
    }
}

/// Pulls the cursor back onto the board after the board shrank.
pub fn clamp_cursor(cursor: MoveRequest, rows: usize, cols: usize) -> MoveRequest {
    let limit = match cursor.direction {
        Direction::Row => rows,
        Direction::Col => cols,
    };
    MoveRequest::new(cursor.direction, cursor.index.clamp(1, limit.max(1)))
}
