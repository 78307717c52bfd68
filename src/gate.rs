//! Input gate suppressing board gestures while a turn is being resolved.

use tracing::debug;

/// Single flag gating whether the board accepts move gestures.
///
/// There is no queue behind the gate: a gesture that finds it locked is
/// dropped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputGate {
    locked: bool,
}

impl InputGate {
    /// Creates an open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether gestures are currently suppressed.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Locks the gate. Returns `false` if it was already locked.
    pub fn try_lock(&mut self) -> bool {
        if self.locked {
            debug!("Input gate already locked");
            return false;
        }
        self.locked = true;
        debug!("Input gate locked");
        true
    }

    /// Opens the gate.
    pub fn release(&mut self) {
        if self.locked {
            debug!("Input gate released");
        }
        self.locked = false;
    }
}
