//! Line-sweep board domain types.

mod moves;
mod types;

pub use moves::{Direction, Gesture, MoveRequest, column_label};
pub use types::{Actor, BoardState, Cell, GameStatus, Score};
