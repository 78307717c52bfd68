//! Turn orchestration between the player and the server-side AI.
//!
//! One round runs: gesture → lock input → `/move` → render → `/points` →
//! pause → `/check` → pause → `/AI` → render → `/points` → pause → `/check`
//! → unlock. Every step awaits the previous one, and the input gate stays
//! locked from the player's submission until the AI's move is resolved, so
//! the two sides never overlap.

use crate::client::GameServer;
use crate::config::{ClientConfig, LockPolicy};
use crate::error::GameClientError;
use crate::events::{EventSink, GameEvent, Phase, UserAction};
use crate::game::{Actor, BoardState, GameStatus, Gesture, MoveRequest, Score};
use crate::gate::InputGate;
use crate::oracle::EndgameOracle;
use crate::pacing::Pacer;
use crate::protocol::BoardReply;
use crate::score::ScoreTracker;
use crate::upload::UploadCoordinator;
use crate::view;
use derive_getters::Getters;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Everything the client knows about the current game.
#[derive(Debug, Clone, Getters)]
pub struct Session {
    /// Latest snapshot; `None` until a board has been created.
    board: Option<BoardState>,
    /// Latest scores.
    score: Score,
    /// Whose turn it is.
    turn: Actor,
    /// Position in the turn cycle.
    phase: Phase,
    /// Latest termination status.
    status: GameStatus,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            board: None,
            score: Score::default(),
            turn: Actor::Player,
            phase: Phase::Idle,
            status: GameStatus::default(),
        }
    }
}

/// How a controller operation ended.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// Not accepted in the current phase, or the input gate was locked.
    Ignored,
    /// The gesture did not name a header of the current board.
    Rejected(String),
    /// The game goes on and the player may move.
    Continued,
    /// The server reported the end of the game.
    GameOver(Option<String>),
    /// A step failed; the user has been notified.
    Failed(GameClientError),
}

/// Drives the turn cycle for one client session.
#[derive(Debug)]
pub struct TurnController<S, P> {
    server: S,
    pacer: P,
    events: EventSink,
    gate: InputGate,
    session: Session,
    lock_policy: LockPolicy,
    board_width: u16,
    scores: ScoreTracker,
    oracle: EndgameOracle,
    uploads: UploadCoordinator,
}

impl<S: GameServer, P: Pacer> TurnController<S, P> {
    /// Creates a controller with the default lock policy and board width.
    pub fn new(server: S, pacer: P, events: mpsc::UnboundedSender<GameEvent>) -> Self {
        let defaults = ClientConfig::default();
        Self {
            server,
            pacer,
            events: EventSink::new(events),
            gate: InputGate::new(),
            session: Session::default(),
            lock_policy: *defaults.lock_policy(),
            board_width: *defaults.board_width(),
            scores: ScoreTracker,
            oracle: EndgameOracle,
            uploads: UploadCoordinator,
        }
    }

    /// Creates a controller using the lock policy and board width from `config`.
    pub fn from_config(
        server: S,
        pacer: P,
        events: mpsc::UnboundedSender<GameEvent>,
        config: &ClientConfig,
    ) -> Self {
        Self::new(server, pacer, events)
            .with_lock_policy(*config.lock_policy())
            .with_board_width(*config.board_width())
    }

    /// Sets how rejected moves treat the input lock.
    pub fn with_lock_policy(mut self, lock_policy: LockPolicy) -> Self {
        self.lock_policy = lock_policy;
        self
    }

    /// Sets the width boards are rendered for.
    pub fn with_board_width(mut self, board_width: u16) -> Self {
        self.board_width = board_width;
        self
    }

    /// Current session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether gestures are currently suppressed.
    pub fn input_locked(&self) -> bool {
        self.gate.is_locked()
    }

    /// The server this controller talks to.
    pub fn server(&self) -> &S {
        &self.server
    }

    /// Requests a fresh board and starts a new session on it.
    #[instrument(skip(self))]
    pub async fn create_game(&mut self) -> TurnOutcome {
        info!("Creating new game");
        self.set_phase(Phase::CreatingBoard);
        match self.server.create().await {
            Ok(reply) => {
                self.announce(&reply);
                self.start_session(reply.board).await
            }
            Err(e) => self.abandon_session(e),
        }
    }

    /// Starts a new session on a board the server installed from an upload.
    #[instrument(skip(self, board), fields(rows = board.rows(), cols = board.cols()))]
    pub async fn on_upload_complete(&mut self, board: BoardState) -> TurnOutcome {
        info!("Installing uploaded board");
        self.set_phase(Phase::CreatingBoard);
        self.start_session(board).await
    }

    /// Uploads a board file and, on success, starts a session on it.
    ///
    /// A failed upload leaves the current session untouched.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn upload_board(&mut self, path: &Path) -> TurnOutcome {
        match self.uploads.upload(&self.server, path).await {
            Ok(board) => self.on_upload_complete(board).await,
            Err(e) => {
                warn!(error = %e, "Board upload failed");
                self.events.emit(GameEvent::Notice(e.user_message()));
                TurnOutcome::Failed(e)
            }
        }
    }

    /// Handles a header activation by the player.
    ///
    /// Accepted only in [`Phase::PlayerReady`] with the gate open; anything
    /// else is dropped. On success the AI's reply is played out before this
    /// returns.
    #[instrument(skip(self), fields(header = %gesture.target_id))]
    pub async fn submit_player_move(&mut self, gesture: &Gesture) -> TurnOutcome {
        if self.session.phase != Phase::PlayerReady || self.gate.is_locked() {
            debug!(phase = %self.session.phase, locked = self.gate.is_locked(), "Ignoring gesture");
            return TurnOutcome::Ignored;
        }
        let Some(board) = &self.session.board else {
            return TurnOutcome::Ignored;
        };
        let request = match MoveRequest::from_element_id(&gesture.target_id) {
            Some(request) if request.fits(board) => request,
            _ => {
                warn!("Gesture does not name a header of the current board");
                return TurnOutcome::Rejected(format!("unknown header {:?}", gesture.target_id));
            }
        };

        if !self.gate.try_lock() {
            return TurnOutcome::Ignored;
        }
        self.set_phase(Phase::SubmittingPlayerMove);
        info!(direction = %request.direction, index = request.index, "Submitting player move");

        let reply = match self.server.submit_move(request).await {
            Ok(reply) => reply,
            Err(e) => return self.fail_turn(e),
        };
        if let Err(e) = self.apply(reply) {
            return self.fail_turn(e);
        }
        if let Err(e) = self.refresh_score().await {
            return self.fail_turn(e);
        }

        self.set_phase(Phase::PostMoveCheck);
        self.pacer.pause().await;
        let status = match self.oracle.check_over(&self.server).await {
            Ok(status) => status,
            Err(e) => return self.fail_turn(e),
        };
        if *status.over() {
            return self.finish(status);
        }
        self.session.status = status;

        self.set_phase(Phase::SchedulingAi);
        self.set_turn(Actor::Ai);
        self.pacer.pause().await;
        self.submit_ai_move().await
    }

    /// Plays the AI's move. Only valid in [`Phase::SchedulingAi`].
    #[instrument(skip(self))]
    pub async fn submit_ai_move(&mut self) -> TurnOutcome {
        if self.session.phase != Phase::SchedulingAi {
            debug!(phase = %self.session.phase, "No AI move scheduled");
            return TurnOutcome::Ignored;
        }
        self.set_phase(Phase::SubmittingAiMove);
        info!("Requesting AI move");

        let reply = match self.server.request_ai_move().await {
            Ok(reply) => reply,
            Err(e) => return self.fail_turn(e),
        };
        if let Err(e) = self.apply(reply) {
            return self.fail_turn(e);
        }
        if let Err(e) = self.refresh_score().await {
            return self.fail_turn(e);
        }

        self.set_phase(Phase::PostAiCheck);
        self.pacer.pause().await;
        let status = match self.oracle.check_over(&self.server).await {
            Ok(status) => status,
            Err(e) => return self.fail_turn(e),
        };
        if *status.over() {
            return self.finish(status);
        }
        self.session.status = status;

        self.gate.release();
        self.set_turn(Actor::Player);
        self.set_phase(Phase::PlayerReady);
        TurnOutcome::Continued
    }

    /// Dispatches one user action.
    pub async fn handle(&mut self, action: UserAction) -> TurnOutcome {
        match action {
            UserAction::Activate(gesture) => self.submit_player_move(&gesture).await,
            UserAction::NewGame => self.create_game().await,
            UserAction::Upload(path) => self.upload_board(&path).await,
        }
    }

    /// Runs the session until the action channel closes.
    ///
    /// Starts on the board file at `initial_board` when given, falling back to
    /// a random board if that upload fails. Gestures that arrive while a turn
    /// is being resolved are dropped; other actions are kept in order.
    #[instrument(skip(self, actions))]
    pub async fn run(
        &mut self,
        mut actions: mpsc::UnboundedReceiver<UserAction>,
        initial_board: Option<PathBuf>,
    ) {
        info!("Starting session");
        if let Some(path) = initial_board {
            self.upload_board(&path).await;
        }
        if self.session.board.is_none() {
            self.create_game().await;
        }

        let mut pending = VecDeque::new();
        loop {
            let action = match pending.pop_front() {
                Some(action) => action,
                None => match actions.recv().await {
                    Some(action) => action,
                    None => break,
                },
            };

            let outcome = self.handle(action).await;
            debug!(?outcome, "Action handled");
            if matches!(outcome, TurnOutcome::Ignored | TurnOutcome::Rejected(_)) {
                continue;
            }

            while let Ok(late) = actions.try_recv() {
                match late {
                    UserAction::Activate(gesture) => {
                        debug!(
                            header = %gesture.target_id,
                            "Dropping gesture received while input was locked"
                        );
                    }
                    other => pending.push_back(other),
                }
            }
        }
        info!("Action channel closed, ending session");
    }

    async fn start_session(&mut self, board: BoardState) -> TurnOutcome {
        self.session = Session {
            phase: self.session.phase,
            ..Session::default()
        };
        if let Err(e) = self.install(board) {
            return self.abandon_session(e);
        }
        if let Err(e) = self.refresh_score().await {
            return self.abandon_session(e);
        }
        self.gate.release();
        self.set_turn(Actor::Player);
        self.set_phase(Phase::PlayerReady);
        TurnOutcome::Continued
    }

    fn abandon_session(&mut self, error: GameClientError) -> TurnOutcome {
        warn!(error = %error, "Could not start a game");
        self.events.emit(GameEvent::Notice(error.user_message()));
        self.session.board = None;
        self.gate.release();
        self.set_phase(Phase::Idle);
        TurnOutcome::Failed(error)
    }

    fn fail_turn(&mut self, error: GameClientError) -> TurnOutcome {
        warn!(error = %error, phase = %self.session.phase, "Turn step failed");
        self.events.emit(GameEvent::Notice(error.user_message()));

        if error.is_application() && self.lock_policy == LockPolicy::Hold {
            self.set_phase(Phase::Stalled);
        } else {
            self.gate.release();
            if self.session.turn != Actor::Player {
                self.set_turn(Actor::Player);
            }
            self.set_phase(Phase::PlayerReady);
        }
        TurnOutcome::Failed(error)
    }

    fn finish(&mut self, status: GameStatus) -> TurnOutcome {
        let message = status.message().clone();
        info!(message = ?message, "Game over");
        self.session.status = status;
        self.events.emit(GameEvent::GameOver {
            message: message.clone(),
        });
        self.set_phase(Phase::GameOver);
        TurnOutcome::GameOver(message)
    }

    fn apply(&mut self, reply: BoardReply) -> Result<(), GameClientError> {
        self.announce(&reply);
        self.install(reply.board)
    }

    fn announce(&self, reply: &BoardReply) {
        if let Some(message) = &reply.message {
            debug!(message = %message, "Server attached a message");
            self.events.emit(GameEvent::Info(message.clone()));
        }
    }

    fn install(&mut self, board: BoardState) -> Result<(), GameClientError> {
        let tree = view::render_board(&board, self.board_width)?;
        debug!(occupied = board.occupied(), "Board installed");
        self.session.board = Some(board);
        self.events.emit(GameEvent::BoardRendered(tree));
        Ok(())
    }

    async fn refresh_score(&mut self) -> Result<(), GameClientError> {
        self.session.score = self.scores.refresh(&self.server, &self.events).await?;
        Ok(())
    }

    fn set_turn(&mut self, actor: Actor) {
        debug!(turn = %actor, "Turn changed");
        self.session.turn = actor;
        self.events.emit(GameEvent::TurnChanged(actor));
    }

    fn set_phase(&mut self, phase: Phase) {
        debug!(phase = %phase, locked = self.gate.is_locked(), "Phase changed");
        self.session.phase = phase;
        self.events.emit(GameEvent::PhaseChanged {
            phase,
            input_locked: self.gate.is_locked(),
        });
    }
}
