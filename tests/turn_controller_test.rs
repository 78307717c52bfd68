//! Turn cycle tests against a scripted game server.

use async_trait::async_trait;
use linesweep::{
    Actor, BoardReply, BoardState, Cell, ErrorKind, GameClientError, GameEvent, GameServer,
    GameStatus, Gesture, LockPolicy, MoveRequest, NoPacing, Phase, Score, TurnController,
    TurnOutcome, UserAction,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::mpsc;

type Reply<T> = Result<T, GameClientError>;

/// Game server that answers from per-endpoint scripts and records every call.
///
/// An exhausted script falls back to an empty 3x3 board, a game that is not
/// over, and zero points.
#[derive(Default)]
struct ScriptedServer {
    calls: Mutex<Vec<String>>,
    create: Mutex<VecDeque<Reply<BoardReply>>>,
    moves: Mutex<VecDeque<Reply<BoardReply>>>,
    ai: Mutex<VecDeque<Reply<BoardReply>>>,
    checks: Mutex<VecDeque<Reply<GameStatus>>>,
    points: Mutex<VecDeque<Reply<Score>>>,
    uploads: Mutex<VecDeque<Reply<BoardState>>>,
}

impl ScriptedServer {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn script<T>(queue: &Mutex<VecDeque<Reply<T>>>, items: impl IntoIterator<Item = Reply<T>>) {
        queue.lock().unwrap().extend(items);
    }

    fn next<T>(queue: &Mutex<VecDeque<Reply<T>>>, fallback: impl FnOnce() -> T) -> Reply<T> {
        queue.lock().unwrap().pop_front().unwrap_or_else(|| Ok(fallback()))
    }
}

fn board(rows: usize, cols: usize, occupied: &[(usize, usize)]) -> BoardState {
    let mut cells = vec![vec![Cell::Empty; cols]; rows];
    for &(row, col) in occupied {
        cells[row - 1][col - 1] = Cell::Occupied;
    }
    BoardState::new(rows, cols, cells).unwrap()
}

fn reply(board: BoardState) -> BoardReply {
    BoardReply {
        board,
        message: None,
    }
}

fn empty_reply() -> BoardReply {
    reply(board(3, 3, &[]))
}

fn not_over() -> Reply<GameStatus> {
    Ok(GameStatus::new(false, None))
}

fn over(message: &str) -> Reply<GameStatus> {
    Ok(GameStatus::new(true, Some(message.to_string())))
}

#[async_trait]
impl GameServer for ScriptedServer {
    async fn create(&self) -> Result<BoardReply, GameClientError> {
        self.record("create");
        Self::next(&self.create, empty_reply)
    }

    async fn submit_move(&self, request: MoveRequest) -> Result<BoardReply, GameClientError> {
        self.record(format!("move {}", request.element_id()));
        Self::next(&self.moves, empty_reply)
    }

    async fn request_ai_move(&self) -> Result<BoardReply, GameClientError> {
        self.record("AI");
        Self::next(&self.ai, empty_reply)
    }

    async fn check(&self) -> Result<GameStatus, GameClientError> {
        self.record("check");
        Self::next(&self.checks, GameStatus::default)
    }

    async fn points(&self) -> Result<Score, GameClientError> {
        self.record("points");
        Self::next(&self.points, Score::default)
    }

    async fn upload(
        &self,
        file_name: &str,
        _contents: Vec<u8>,
    ) -> Result<BoardState, GameClientError> {
        self.record(format!("upload {}", file_name));
        Self::next(&self.uploads, || board(3, 3, &[]))
    }
}

type Controller = TurnController<ScriptedServer, NoPacing>;

fn controller(server: ScriptedServer) -> (Controller, mpsc::UnboundedReceiver<GameEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TurnController::new(server, NoPacing, tx), rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<GameEvent>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn phases(events: &[GameEvent]) -> Vec<(Phase, bool)> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::PhaseChanged {
                phase,
                input_locked,
            } => Some((*phase, *input_locked)),
            _ => None,
        })
        .collect()
}

fn notices(events: &[GameEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Notice(message) => Some(message.clone()),
            _ => None,
        })
        .collect()
}

async fn started(server: ScriptedServer) -> (Controller, mpsc::UnboundedReceiver<GameEvent>) {
    let (mut controller, mut rx) = controller(server);
    let outcome = controller.create_game().await;
    assert!(matches!(outcome, TurnOutcome::Continued));
    drain(&mut rx);
    (controller, rx)
}

#[tokio::test]
async fn create_renders_empty_board() {
    let (mut controller, mut rx) = controller(ScriptedServer::default());

    controller.create_game().await;

    let events = drain(&mut rx);
    let view = events
        .iter()
        .find_map(|e| match e {
            GameEvent::BoardRendered(view) => Some(view.clone()),
            _ => None,
        })
        .expect("board rendered");
    let labels: Vec<_> = view.column_headers().iter().map(|h| h.label().clone()).collect();
    assert_eq!(labels, ["A", "B", "C"]);
    let labels: Vec<_> = view.row_headers().iter().map(|h| h.label().clone()).collect();
    assert_eq!(labels, ["1", "2", "3"]);
    assert_eq!(view.cells().iter().flatten().count(), 9);

    assert_eq!(controller.server().calls(), ["create", "points"]);
    assert_eq!(*controller.session().phase(), Phase::PlayerReady);
    assert_eq!(*controller.session().turn(), Actor::Player);
    assert!(!controller.input_locked());
    assert_eq!(phases(&events).last(), Some(&(Phase::PlayerReady, false)));
}

#[tokio::test]
async fn player_move_is_followed_by_one_ai_move() {
    let server = ScriptedServer::default();
    ScriptedServer::script(&server.moves, [Ok(reply(board(3, 3, &[(1, 2)])))]);
    ScriptedServer::script(
        &server.points,
        [Ok(Score::new(0, 0)), Ok(Score::new(1, 0)), Ok(Score::new(1, 2))],
    );
    let (mut controller, mut rx) = started(server).await;

    let outcome = controller.submit_player_move(&Gesture::new("col-2")).await;

    assert!(matches!(outcome, TurnOutcome::Continued));
    assert_eq!(
        controller.server().calls()[2..],
        ["move col-2", "points", "check", "AI", "points", "check"]
    );
    assert_eq!(*controller.session().score(), Score::new(1, 2));
    assert_eq!(*controller.session().turn(), Actor::Player);
    assert!(!controller.input_locked());

    let events = drain(&mut rx);
    let scores: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::ScoreChanged(score) => Some(*score),
            _ => None,
        })
        .collect();
    assert_eq!(scores, [Score::new(1, 0), Score::new(1, 2)]);
    let turns: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::TurnChanged(actor) => Some(*actor),
            _ => None,
        })
        .collect();
    assert_eq!(turns, [Actor::Ai, Actor::Player]);
}

#[tokio::test]
async fn input_stays_locked_for_the_whole_round() {
    let (mut controller, mut rx) = started(ScriptedServer::default()).await;

    controller.submit_player_move(&Gesture::new("row-3")).await;

    let phases = phases(&drain(&mut rx));
    assert_eq!(
        phases,
        [
            (Phase::SubmittingPlayerMove, true),
            (Phase::PostMoveCheck, true),
            (Phase::SchedulingAi, true),
            (Phase::SubmittingAiMove, true),
            (Phase::PostAiCheck, true),
            (Phase::PlayerReady, false),
        ]
    );
}

#[tokio::test]
async fn several_rounds_alternate_turns() {
    let (mut controller, _rx) = started(ScriptedServer::default()).await;

    for header in ["col-1", "row-2", "col-3"] {
        let outcome = controller.submit_player_move(&Gesture::new(header)).await;
        assert!(matches!(outcome, TurnOutcome::Continued));
    }

    let server = controller.server();
    assert_eq!(server.count("move"), 3);
    assert_eq!(server.count("AI"), 3);
    assert_eq!(server.count("check"), 6);
}

#[tokio::test]
async fn game_over_after_player_move_skips_ai() {
    let server = ScriptedServer::default();
    ScriptedServer::script(&server.checks, [over("Player wins")]);
    let (mut controller, mut rx) = started(server).await;

    let outcome = controller.submit_player_move(&Gesture::new("col-2")).await;

    assert!(matches!(outcome, TurnOutcome::GameOver(Some(ref m)) if m == "Player wins"));
    let events = drain(&mut rx);
    assert!(events.contains(&GameEvent::GameOver {
        message: Some("Player wins".to_string())
    }));
    assert_eq!(*controller.session().phase(), Phase::GameOver);
    assert_eq!(controller.server().count("AI"), 0);

    let again = controller.submit_player_move(&Gesture::new("col-1")).await;
    assert!(matches!(again, TurnOutcome::Ignored));
    let again = controller.submit_ai_move().await;
    assert!(matches!(again, TurnOutcome::Ignored));
    assert_eq!(controller.server().count("move"), 1);
    assert_eq!(controller.server().count("AI"), 0);
}

#[tokio::test]
async fn game_over_after_ai_move_halts_session() {
    let server = ScriptedServer::default();
    ScriptedServer::script(&server.checks, [not_over(), over("AI wins")]);
    let (mut controller, _rx) = started(server).await;

    let outcome = controller.submit_player_move(&Gesture::new("row-1")).await;

    assert!(matches!(outcome, TurnOutcome::GameOver(Some(ref m)) if m == "AI wins"));
    assert!(controller.input_locked());
    assert!(*controller.session().status().over());

    controller.submit_player_move(&Gesture::new("row-2")).await;
    assert_eq!(controller.server().count("move"), 1);
    assert_eq!(controller.server().count("AI"), 1);
}

#[tokio::test]
async fn new_game_after_game_over_unlocks_board() {
    let server = ScriptedServer::default();
    ScriptedServer::script(&server.checks, [over("Player wins")]);
    let (mut controller, _rx) = started(server).await;
    controller.submit_player_move(&Gesture::new("col-2")).await;

    let outcome = controller.create_game().await;

    assert!(matches!(outcome, TurnOutcome::Continued));
    assert_eq!(*controller.session().phase(), Phase::PlayerReady);
    assert!(!controller.input_locked());
    assert!(!*controller.session().status().over());
}

#[tokio::test]
async fn rejected_move_releases_lock_by_default() {
    let server = ScriptedServer::default();
    ScriptedServer::script(&server.moves, [Err(GameClientError::application("Invalid move"))]);
    let (mut controller, mut rx) = started(server).await;

    let outcome = controller.submit_player_move(&Gesture::new("col-2")).await;

    assert!(matches!(outcome, TurnOutcome::Failed(ref e) if e.is_application()));
    let events = drain(&mut rx);
    assert_eq!(notices(&events), ["Invalid move"]);
    assert_eq!(phases(&events).last(), Some(&(Phase::PlayerReady, false)));
    assert_eq!(controller.server().count("AI"), 0);

    let retry = controller.submit_player_move(&Gesture::new("col-1")).await;
    assert!(matches!(retry, TurnOutcome::Continued));
}

#[tokio::test]
async fn rejected_move_keeps_lock_when_holding() {
    let server = ScriptedServer::default();
    ScriptedServer::script(&server.moves, [Err(GameClientError::application("Invalid move"))]);
    let (controller, rx) = started(server).await;
    let (mut controller, mut rx) = (controller.with_lock_policy(LockPolicy::Hold), rx);

    controller.submit_player_move(&Gesture::new("col-2")).await;

    let events = drain(&mut rx);
    assert_eq!(notices(&events), ["Invalid move"]);
    assert_eq!(*controller.session().phase(), Phase::Stalled);
    assert!(controller.input_locked());

    let retry = controller.submit_player_move(&Gesture::new("col-1")).await;
    assert!(matches!(retry, TurnOutcome::Ignored));
    assert_eq!(controller.server().count("move"), 1);

    controller.create_game().await;
    assert!(!controller.input_locked());
    assert_eq!(*controller.session().phase(), Phase::PlayerReady);
}

#[tokio::test]
async fn transport_failure_releases_lock_even_when_holding() {
    let server = ScriptedServer::default();
    ScriptedServer::script(&server.ai, [Err(GameClientError::transport("connection refused"))]);
    let (controller, rx) = started(server).await;
    let (mut controller, mut rx) = (controller.with_lock_policy(LockPolicy::Hold), rx);

    let outcome = controller.submit_player_move(&Gesture::new("col-2")).await;

    assert!(matches!(
        outcome,
        TurnOutcome::Failed(GameClientError { kind: ErrorKind::Transport(_), .. })
    ));
    let events = drain(&mut rx);
    assert_eq!(notices(&events), ["Could not reach the game server. Please try again."]);
    assert!(!controller.input_locked());
    assert_eq!(*controller.session().phase(), Phase::PlayerReady);
    assert_eq!(*controller.session().turn(), Actor::Player);
}

#[tokio::test]
async fn score_failure_is_reported_and_unlocks() {
    let server = ScriptedServer::default();
    ScriptedServer::script(
        &server.points,
        [Ok(Score::default()), Err(GameClientError::protocol("missing AI"))],
    );
    let (mut controller, mut rx) = started(server).await;

    let outcome = controller.submit_player_move(&Gesture::new("col-2")).await;

    assert!(matches!(outcome, TurnOutcome::Failed(_)));
    assert_eq!(notices(&drain(&mut rx)).len(), 1);
    assert_eq!(controller.server().count("check"), 0);
    assert!(!controller.input_locked());
}

#[tokio::test]
async fn malformed_gestures_are_rejected_without_locking() {
    let (mut controller, mut rx) = started(ScriptedServer::default()).await;

    for target in ["diagonal-1", "col-0", "col-4", "row-x"] {
        let outcome = controller.submit_player_move(&Gesture::new(target)).await;
        assert!(matches!(outcome, TurnOutcome::Rejected(_)), "{target}");
    }

    assert!(!controller.input_locked());
    assert_eq!(controller.server().count("move"), 0);
    assert!(phases(&drain(&mut rx)).is_empty());
}

#[tokio::test]
async fn gestures_before_any_board_are_ignored() {
    let (mut controller, _rx) = controller(ScriptedServer::default());

    let outcome = controller.submit_player_move(&Gesture::new("col-1")).await;

    assert!(matches!(outcome, TurnOutcome::Ignored));
    assert!(controller.server().calls().is_empty());
}

#[tokio::test]
async fn create_failure_leaves_session_idle() {
    let server = ScriptedServer::default();
    ScriptedServer::script(&server.create, [Err(GameClientError::transport("HTTP 500"))]);
    let (mut controller, mut rx) = controller(server);

    let outcome = controller.create_game().await;

    assert!(matches!(outcome, TurnOutcome::Failed(_)));
    assert_eq!(*controller.session().phase(), Phase::Idle);
    assert!(controller.session().board().is_none());
    assert_eq!(notices(&drain(&mut rx)).len(), 1);

    let gesture = controller.submit_player_move(&Gesture::new("col-1")).await;
    assert!(matches!(gesture, TurnOutcome::Ignored));
}

#[tokio::test]
async fn server_messages_are_forwarded() {
    let server = ScriptedServer::default();
    ScriptedServer::script(
        &server.moves,
        [Ok(BoardReply {
            board: board(3, 3, &[]),
            message: Some("Cleared 2".to_string()),
        })],
    );
    let (mut controller, mut rx) = started(server).await;

    controller.submit_player_move(&Gesture::new("col-2")).await;

    assert!(drain(&mut rx).contains(&GameEvent::Info("Cleared 2".to_string())));
}

#[tokio::test]
async fn uploaded_board_starts_fresh_session() {
    let server = ScriptedServer::default();
    ScriptedServer::script(&server.points, [Ok(Score::new(0, 0)), Ok(Score::new(4, 1))]);
    let (mut controller, _rx) = started(server).await;
    controller.submit_player_move(&Gesture::new("col-1")).await;

    let uploaded = board(2, 4, &[(1, 1), (2, 4)]);
    let outcome = controller.on_upload_complete(uploaded.clone()).await;

    assert!(matches!(outcome, TurnOutcome::Continued));
    let session = controller.session();
    assert_eq!(session.board().as_ref(), Some(&uploaded));
    assert_eq!(*session.score(), Score::default());
    assert_eq!(*session.turn(), Actor::Player);
    assert!(!controller.input_locked());

    let outcome = controller.submit_player_move(&Gesture::new("col-4")).await;
    assert!(matches!(outcome, TurnOutcome::Continued));
}

#[tokio::test]
async fn upload_board_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.txt");
    std::fs::write(&path, "2 3\n1 0 1\n0 0 1\n").unwrap();
    let server = ScriptedServer::default();
    ScriptedServer::script(&server.uploads, [Ok(board(2, 3, &[(1, 1), (1, 3), (2, 3)]))]);
    let (mut controller, _rx) = controller(server);

    let outcome = controller.upload_board(&path).await;

    assert!(matches!(outcome, TurnOutcome::Continued));
    assert_eq!(controller.server().calls()[0], "upload board.txt");
    let board = controller.session().board().clone().unwrap();
    assert_eq!(board.occupied(), 3);
}

#[tokio::test]
async fn failed_upload_keeps_current_game() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.txt");
    std::fs::write(&path, "3 3\n1 0 1\n").unwrap();
    let (mut controller, mut rx) = started(ScriptedServer::default()).await;
    let before = controller.session().board().clone();

    let outcome = controller.upload_board(&path).await;

    assert!(matches!(outcome, TurnOutcome::Failed(_)));
    assert_eq!(controller.server().count("upload"), 0);
    assert_eq!(controller.session().board(), &before);
    assert_eq!(*controller.session().phase(), Phase::PlayerReady);
    assert_eq!(notices(&drain(&mut rx)).len(), 1);
}

#[tokio::test]
async fn run_drops_gestures_sent_during_a_turn() {
    let (mut controller, _rx) = controller(ScriptedServer::default());
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    action_tx.send(UserAction::Activate(Gesture::new("col-1"))).unwrap();
    action_tx.send(UserAction::Activate(Gesture::new("col-2"))).unwrap();
    action_tx.send(UserAction::NewGame).unwrap();
    drop(action_tx);

    controller.run(action_rx, None).await;

    assert_eq!(
        controller.server().calls(),
        [
            "create", "points", "move col-1", "points", "check", "AI", "points", "check",
            "create", "points",
        ]
    );
}

#[tokio::test]
async fn run_starts_on_initial_board_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("start.txt");
    std::fs::write(&path, "1 2\n1 1\n").unwrap();
    let (mut controller, _rx) = controller(ScriptedServer::default());
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    drop(action_tx);

    controller.run(action_rx, Some(path)).await;

    let calls = controller.server().calls();
    assert_eq!(calls, ["upload start.txt", "points"]);
}

#[tokio::test]
async fn failed_check_after_player_move_stalls_when_holding() {
    let server = ScriptedServer::default();
    ScriptedServer::script(&server.checks, [Err(GameClientError::application("No session"))]);
    let (controller, rx) = started(server).await;
    let (mut controller, mut rx) = (controller.with_lock_policy(LockPolicy::Hold), rx);

    let outcome = controller.submit_player_move(&Gesture::new("col-2")).await;

    assert!(matches!(outcome, TurnOutcome::Failed(ref e) if e.is_application()));
    let events = drain(&mut rx);
    assert_eq!(notices(&events), ["No session"]);
    assert_eq!(phases(&events).last(), Some(&(Phase::Stalled, true)));
    assert!(controller.input_locked());
    assert_eq!(controller.server().count("AI"), 0);
}

#[tokio::test]
async fn failed_check_after_ai_move_returns_turn_to_player() {
    let server = ScriptedServer::default();
    ScriptedServer::script(
        &server.checks,
        [not_over(), Err(GameClientError::transport("connection reset"))],
    );
    let (mut controller, mut rx) = started(server).await;

    let outcome = controller.submit_player_move(&Gesture::new("row-2")).await;

    assert!(matches!(
        outcome,
        TurnOutcome::Failed(GameClientError { kind: ErrorKind::Transport(_), .. })
    ));
    let events = drain(&mut rx);
    assert_eq!(phases(&events).last(), Some(&(Phase::PlayerReady, false)));
    assert_eq!(*controller.session().turn(), Actor::Player);
    assert!(!controller.input_locked());
    assert_eq!(controller.server().count("AI"), 1);
}

#[tokio::test]
async fn rejected_ai_move_stalls_when_holding() {
    let server = ScriptedServer::default();
    ScriptedServer::script(&server.ai, [Err(GameClientError::application("AI has no move"))]);
    let (controller, rx) = started(server).await;
    let (mut controller, mut rx) = (controller.with_lock_policy(LockPolicy::Hold), rx);

    let outcome = controller.submit_player_move(&Gesture::new("col-1")).await;

    assert!(matches!(outcome, TurnOutcome::Failed(ref e) if e.is_application()));
    assert_eq!(notices(&drain(&mut rx)), ["AI has no move"]);
    assert_eq!(*controller.session().phase(), Phase::Stalled);
    assert!(controller.input_locked());

    let retry = controller.submit_player_move(&Gesture::new("col-1")).await;
    assert!(matches!(retry, TurnOutcome::Ignored));
    assert_eq!(controller.server().count("move"), 1);
}
