//! Application state and logic.

use super::input::{clamp_cursor, move_cursor};
use crossterm::event::KeyCode;
use linesweep::{
    Actor, Direction, GameEvent, Gesture, MoveRequest, Phase, Score, UserAction, ViewTree,
};
use std::path::PathBuf;
use tracing::debug;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Nothing to send.
    None,
    /// Forward an action to the controller.
    Action(UserAction),
    /// Leave the application.
    Quit,
}

/// Main application state.
pub struct App {
    view: Option<ViewTree>,
    score: Score,
    turn: Actor,
    phase: Phase,
    input_locked: bool,
    cursor: MoveRequest,
    notice: Option<String>,
    status_message: String,
    board_file: Option<PathBuf>,
}

impl App {
    /// Creates a new application. `board_file` enables re-uploading with `u`.
    pub fn new(board_file: Option<PathBuf>) -> Self {
        Self {
            view: None,
            score: Score::default(),
            turn: Actor::Player,
            phase: Phase::Idle,
            input_locked: false,
            cursor: MoveRequest::new(Direction::Col, 1),
            notice: None,
            status_message: "Connecting to game server...".to_string(),
            board_file,
        }
    }

    /// Latest rendered board.
    pub fn view(&self) -> Option<&ViewTree> {
        self.view.as_ref()
    }

    /// Latest scores.
    pub fn score(&self) -> Score {
        self.score
    }

    /// Whose turn the banner shows.
    pub fn turn(&self) -> Actor {
        self.turn
    }

    /// Currently highlighted header.
    pub fn cursor(&self) -> MoveRequest {
        self.cursor
    }

    /// Whether the board is refusing gestures.
    pub fn input_locked(&self) -> bool {
        self.input_locked
    }

    /// Pending modal notification.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Gets the current status message.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Whether a board file can be re-uploaded.
    pub fn has_board_file(&self) -> bool {
        self.board_file.is_some()
    }

    /// Handles a game event from the controller.
    pub fn handle_event(&mut self, event: GameEvent) {
        debug!(?event, "Handling game event");

        match event {
            GameEvent::BoardRendered(view) => {
                self.cursor = clamp_cursor(self.cursor, view.rows(), view.cols());
                self.view = Some(view);
            }
            GameEvent::ScoreChanged(score) => {
                self.score = score;
            }
            GameEvent::TurnChanged(actor) => {
                self.turn = actor;
                self.status_message = format!("{}'s turn", actor);
            }
            GameEvent::PhaseChanged {
                phase,
                input_locked,
            } => {
                self.phase = phase;
                self.input_locked = input_locked;
                match phase {
                    Phase::CreatingBoard => {
                        self.status_message = "Setting up board...".to_string();
                    }
                    Phase::Idle => {
                        self.status_message = "No game. Press 'n' to try again.".to_string();
                    }
                    Phase::Stalled => {
                        self.status_message = "Board locked. Press 'n' for a new game.".to_string();
                    }
                    _ => {}
                }
            }
            GameEvent::Notice(message) => {
                self.notice = Some(message);
            }
            GameEvent::Info(message) => {
                self.status_message = message;
            }
            GameEvent::GameOver { message } => {
                let message = message.unwrap_or_default();
                self.notice = Some(format!("Game over\n{}", message));
                self.status_message = format!("Game over. {} Press 'n' to play again.", message);
            }
        }
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyCode) -> KeyOutcome {
        if self.notice.is_some() {
            return match key {
                KeyCode::Enter | KeyCode::Esc => {
                    self.notice = None;
                    KeyOutcome::None
                }
                KeyCode::Char('q') => KeyOutcome::Quit,
                _ => KeyOutcome::None,
            };
        }

        match key {
            KeyCode::Char('q') => KeyOutcome::Quit,
            KeyCode::Char('n') => KeyOutcome::Action(UserAction::NewGame),
            KeyCode::Char('u') => match &self.board_file {
                Some(path) => KeyOutcome::Action(UserAction::Upload(path.clone())),
                None => KeyOutcome::None,
            },
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.input_locked || self.phase != Phase::PlayerReady || self.view.is_none() {
                    debug!("Board disabled, ignoring activation");
                    return KeyOutcome::None;
                }
                KeyOutcome::Action(UserAction::Activate(Gesture::from(self.cursor)))
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => {
                if let Some(view) = &self.view {
                    self.cursor = move_cursor(self.cursor, key, view.rows(), view.cols());
                }
                KeyOutcome::None
            }
            _ => KeyOutcome::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linesweep::{Cell, render};

    fn ready_app() -> App {
        let mut app = App::new(None);
        let view = render(3, 3, &vec![vec![Cell::Empty; 3]; 3], 48).unwrap();
        app.handle_event(GameEvent::BoardRendered(view));
        app.handle_event(GameEvent::TurnChanged(Actor::Player));
        app.handle_event(GameEvent::PhaseChanged {
            phase: Phase::PlayerReady,
            input_locked: false,
        });
        app
    }

    #[test]
    fn enter_activates_highlighted_header() {
        let mut app = ready_app();
        app.handle_key(KeyCode::Right);
        assert_eq!(
            app.handle_key(KeyCode::Enter),
            KeyOutcome::Action(UserAction::Activate(Gesture::new("col-2")))
        );
    }

    #[test]
    fn locked_board_swallows_activation() {
        let mut app = ready_app();
        app.handle_event(GameEvent::PhaseChanged {
            phase: Phase::SubmittingPlayerMove,
            input_locked: true,
        });
        assert_eq!(app.handle_key(KeyCode::Enter), KeyOutcome::None);
    }

    #[test]
    fn game_over_is_modal() {
        let mut app = ready_app();
        app.handle_event(GameEvent::GameOver {
            message: Some("Player wins!".to_string()),
        });
        assert_eq!(app.notice(), Some("Game over\nPlayer wins!"));
        assert_eq!(app.handle_key(KeyCode::Char('n')), KeyOutcome::None);
        assert_eq!(app.handle_key(KeyCode::Esc), KeyOutcome::None);
        assert_eq!(app.notice(), None);
        assert_eq!(app.handle_key(KeyCode::Char('n')), KeyOutcome::Action(UserAction::NewGame));
    }

    #[test]
    fn turn_banner_follows_turn() {
        let mut app = ready_app();
        app.handle_event(GameEvent::TurnChanged(Actor::Ai));
        assert_eq!(app.status_message(), "AI's turn");
    }

    #[test]
    fn upload_key_needs_board_file() {
        let mut app = ready_app();
        assert_eq!(app.handle_key(KeyCode::Char('u')), KeyOutcome::None);

        let mut app = App::new(Some(PathBuf::from("board.txt")));
        assert_eq!(
            app.handle_key(KeyCode::Char('u')),
            KeyOutcome::Action(UserAction::Upload(PathBuf::from("board.txt")))
        );
    }
}
