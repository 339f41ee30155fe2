use super::*;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use wire::{SubmitScoreResponse, Winner};

use crate::session::Outcome;

// =============================================================================
// MOCK BACKEND
// =============================================================================

#[derive(Default)]
struct MockBackend {
    plays: Mutex<VecDeque<Result<PlayResponse, BackendError>>>,
    play_calls: AtomicUsize,
    /// When set, `play` waits for a permit before answering.
    gate: Option<Arc<Semaphore>>,
    board: Mutex<Vec<LeaderboardEntry>>,
    board_calls: AtomicUsize,
    board_fails: AtomicBool,
    submissions: Mutex<Vec<SubmitScoreRequest>>,
    submit_error: Option<BackendError>,
    submit_rejects: bool,
}

impl MockBackend {
    fn with_plays(plays: Vec<Result<PlayResponse, BackendError>>) -> Self {
        Self { plays: Mutex::new(plays.into()), ..Self::default() }
    }

    fn winning(rounds: usize) -> Self {
        Self::with_plays((0..rounds).map(|_| Ok(win())).collect())
    }

    fn gated(self, gate: Arc<Semaphore>) -> Self {
        Self { gate: Some(gate), ..self }
    }
}

#[async_trait::async_trait]
impl GameBackend for MockBackend {
    async fn play(&self, _player_move: Move) -> Result<PlayResponse, BackendError> {
        self.play_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate open").forget();
        }
        self.plays
            .lock()
            .expect("mock mutex should lock")
            .pop_front()
            .unwrap_or(Ok(PlayResponse { bot_move: Move::Rock, winner: Winner::Draw }))
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, BackendError> {
        self.board_calls.fetch_add(1, Ordering::SeqCst);
        if self.board_fails.load(Ordering::SeqCst) {
            return Err(BackendError::Request("connection refused".into()));
        }
        let mut rows = self.board.lock().expect("mock mutex should lock").clone();
        rows.sort_by_key(|e| std::cmp::Reverse(e.score));
        Ok(rows)
    }

    async fn submit_score(&self, request: &SubmitScoreRequest) -> Result<SubmitScoreResponse, BackendError> {
        self.submissions.lock().expect("mock mutex should lock").push(request.clone());
        if let Some(err) = &self.submit_error {
            return Err(err.clone());
        }
        if self.submit_rejects {
            return Ok(SubmitScoreResponse { success: false });
        }
        self.board
            .lock()
            .expect("mock mutex should lock")
            .push(LeaderboardEntry { name: request.name.clone(), score: request.score });
        Ok(SubmitScoreResponse { success: true })
    }
}

fn win() -> PlayResponse {
    PlayResponse { bot_move: Move::Scissors, winner: Winner::Player }
}

fn loss() -> PlayResponse {
    PlayResponse { bot_move: Move::Paper, winner: Winner::Bot }
}

fn controller(backend: &Arc<MockBackend>) -> RoundController {
    RoundController::new(backend.clone(), ControllerConfig::default())
}

async fn wait_until_playing(controller: &RoundController) {
    while !controller.is_playing() {
        tokio::task::yield_now().await;
    }
}

fn session(current_streak: u32, best_streak: u32, current_score: u32) -> SessionState {
    SessionState { current_streak, best_streak, current_score, is_playing: false }
}

// =============================================================================
// submit_move
// =============================================================================

#[tokio::test(start_paused = true)]
async fn three_wins_then_a_loss() {
    let backend = Arc::new(MockBackend::with_plays(vec![Ok(win()), Ok(win()), Ok(win()), Ok(loss())]));
    let controller = controller(&backend);

    for _ in 0..3 {
        controller.submit_move(Move::Rock).await.expect("round");
    }
    assert_eq!(controller.session(), session(3, 3, 30));

    let report = controller.submit_move(Move::Rock).await.expect("round");
    assert_eq!(report.result.outcome, Outcome::Bot);
    assert_eq!(report.result.bot_move, Move::Paper);
    assert_eq!(report.session, session(0, 3, 25));
    assert_eq!(controller.session(), report.session);
}

#[tokio::test(start_paused = true)]
async fn result_is_revealed_after_delay() {
    let backend = Arc::new(MockBackend::winning(1));
    let controller = controller(&backend);

    let start = tokio::time::Instant::now();
    let round = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit_move(Move::Rock).await }
    });

    tokio::time::sleep(Duration::from_millis(799)).await;
    assert!(controller.is_playing());
    assert_eq!(controller.session().current_score, 0);

    let report = round.await.expect("join").expect("round");
    assert!(start.elapsed() >= Duration::from_millis(800));
    assert_eq!(report.session, session(1, 1, 10));
    assert!(!controller.is_playing());
}

#[tokio::test(start_paused = true)]
async fn move_while_pending_is_ignored() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = Arc::new(MockBackend::winning(2).gated(gate.clone()));
    let controller = controller(&backend);

    let round = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit_move(Move::Rock).await }
    });
    wait_until_playing(&controller).await;

    let second = controller.submit_move(Move::Paper).await;
    assert_eq!(second, Err(RoundError::InProgress));
    assert_eq!(backend.play_calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.session().current_score, 0);
    assert!(controller.is_playing());

    gate.add_permits(1);
    let report = round.await.expect("join").expect("round");
    assert_eq!(report.session, session(1, 1, 10));
    assert_eq!(backend.play_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn busy_flag_is_released_only_by_the_pending_round() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = Arc::new(MockBackend::winning(2).gated(gate.clone()));
    let controller = controller(&backend);

    let round = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit_move(Move::Rock).await }
    });
    wait_until_playing(&controller).await;

    // Nothing but the round's own result frees the slot.
    controller.request_leaderboard().await.expect("leaderboard");
    assert_eq!(controller.submit_score("  ").await, Err(SubmitError::EmptyName));
    assert!(controller.is_playing());
    assert_eq!(controller.submit_move(Move::Paper).await, Err(RoundError::InProgress));
    assert_eq!(backend.play_calls.load(Ordering::SeqCst), 1);

    gate.add_permits(1);
    let report = round.await.expect("join").expect("round");
    assert_eq!(report.session, session(1, 1, 10));
    assert!(!controller.is_playing());
}

#[tokio::test(start_paused = true)]
async fn backend_failure_abandons_round() {
    let backend = Arc::new(MockBackend::with_plays(vec![
        Err(BackendError::Request("connection reset".into())),
        Ok(win()),
    ]));
    let controller = controller(&backend);

    let err = controller.submit_move(Move::Rock).await.expect_err("should fail");
    assert!(matches!(err, RoundError::Backend(BackendError::Request(_))));
    assert_eq!(controller.session(), SessionState::default());

    controller.submit_move(Move::Rock).await.expect("next round plays");
    assert_eq!(controller.session(), session(1, 1, 10));
}

#[tokio::test(start_paused = true)]
async fn stalled_round_times_out() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = Arc::new(MockBackend::winning(1).gated(gate));
    let config = ControllerConfig::default().with_round_timeout(Some(Duration::from_secs(2)));
    let controller = RoundController::new(backend, config);

    let err = controller.submit_move(Move::Rock).await.expect_err("should time out");
    assert_eq!(err, RoundError::TimedOut(Duration::from_secs(2)));
    assert!(!controller.is_playing());
    assert_eq!(controller.session(), SessionState::default());
}

#[tokio::test(start_paused = true)]
async fn cancel_during_request_abandons_round() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = Arc::new(MockBackend::winning(1).gated(gate));
    let controller = controller(&backend);
    assert!(!controller.cancel_round(), "nothing pending yet");

    let round = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit_move(Move::Rock).await }
    });
    wait_until_playing(&controller).await;

    assert!(controller.cancel_round());
    assert_eq!(round.await.expect("join"), Err(RoundError::Cancelled));
    assert!(!controller.is_playing());
    assert_eq!(controller.session(), SessionState::default());
}

#[tokio::test(start_paused = true)]
async fn cancel_during_reveal_abandons_round() {
    let backend = Arc::new(MockBackend::winning(1));
    let controller = controller(&backend);

    let round = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit_move(Move::Rock).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(backend.play_calls.load(Ordering::SeqCst), 1);

    assert!(controller.cancel_round());
    assert_eq!(round.await.expect("join"), Err(RoundError::Cancelled));
    assert_eq!(controller.session(), SessionState::default());
}

#[tokio::test(start_paused = true)]
async fn dropped_round_clears_busy_flag() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = Arc::new(MockBackend::winning(1).gated(gate));
    let controller = controller(&backend);

    let round = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit_move(Move::Rock).await }
    });
    wait_until_playing(&controller).await;

    round.abort();
    assert!(round.await.is_err());
    assert!(!controller.is_playing());
}

#[test]
fn resolve_round_applies_scoring_each_call() {
    let backend = Arc::new(MockBackend::default());
    let controller = controller(&backend);
    let result = RoundResult { player_move: Move::Rock, bot_move: Move::Scissors, outcome: Outcome::Player };

    controller.resolve_round(&result);
    let after = controller.resolve_round(&result);
    assert_eq!(after, session(2, 2, 20));
}

// =============================================================================
// request_leaderboard
// =============================================================================

#[tokio::test]
async fn leaderboard_failure_keeps_previous_list() {
    let backend = Arc::new(MockBackend::default());
    backend
        .board
        .lock()
        .expect("lock")
        .push(LeaderboardEntry { name: "Bob".into(), score: 40 });
    let controller = controller(&backend);

    let rows = controller.request_leaderboard().await.expect("fetch");
    assert_eq!(rows.len(), 1);

    backend.board_fails.store(true, Ordering::SeqCst);
    assert!(controller.request_leaderboard().await.is_err());
    assert_eq!(controller.leaderboard(), rows);
}

#[tokio::test(start_paused = true)]
async fn leaderboard_refreshes_while_round_pending() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = Arc::new(MockBackend::winning(1).gated(gate.clone()));
    let controller = controller(&backend);

    let round = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit_move(Move::Rock).await }
    });
    wait_until_playing(&controller).await;

    controller.request_leaderboard().await.expect("fetch");
    assert!(controller.is_playing());

    gate.add_permits(1);
    round.await.expect("join").expect("round");
}

// =============================================================================
// submit_score
// =============================================================================

#[tokio::test]
async fn blank_name_sends_nothing() {
    let backend = Arc::new(MockBackend::default());
    let controller = controller(&backend);

    assert_eq!(controller.submit_score("").await, Err(SubmitError::EmptyName));
    assert_eq!(controller.submit_score(" \t ").await, Err(SubmitError::EmptyName));
    assert!(backend.submissions.lock().expect("lock").is_empty());
    assert_eq!(backend.board_calls.load(Ordering::SeqCst), 0);
    assert_eq!(controller.session(), SessionState::default());
}

#[tokio::test(start_paused = true)]
async fn submit_sends_cumulative_score_and_refreshes() {
    let backend = Arc::new(MockBackend::with_plays(vec![Ok(win()), Ok(win()), Ok(win()), Ok(loss())]));
    let controller = controller(&backend);
    for _ in 0..4 {
        controller.submit_move(Move::Rock).await.expect("round");
    }
    assert_eq!(controller.session(), session(0, 3, 25));

    let saved = controller.submit_score("  Ada ").await.expect("submit");
    assert_eq!(saved, ScoreSaved { name: "Ada".into(), score: 25, leaderboard_refreshed: true });

    let sent = backend.submissions.lock().expect("lock").clone();
    assert_eq!(sent, vec![SubmitScoreRequest { name: "Ada".into(), score: 25 }]);
    assert!(
        controller
            .leaderboard()
            .contains(&LeaderboardEntry { name: "Ada".into(), score: 25 })
    );
    assert_eq!(controller.session(), session(0, 3, 25));
}

#[tokio::test]
async fn rejected_submission_skips_refresh() {
    let backend = Arc::new(MockBackend { submit_rejects: true, ..MockBackend::default() });
    let controller = controller(&backend);

    assert_eq!(controller.submit_score("Ada").await, Err(SubmitError::Rejected));
    assert_eq!(backend.board_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_submission_is_surfaced() {
    let backend = Arc::new(MockBackend {
        submit_error: Some(BackendError::Status { status: 500, body: String::new() }),
        ..MockBackend::default()
    });
    let controller = controller(&backend);

    let err = controller.submit_score("Ada").await.expect_err("should fail");
    assert!(matches!(err, SubmitError::Backend(BackendError::Status { status: 500, .. })));
    assert!(controller.leaderboard().is_empty());
}

#[tokio::test]
async fn submit_succeeds_even_if_refresh_fails() {
    let backend = Arc::new(MockBackend::default());
    backend.board_fails.store(true, Ordering::SeqCst);
    let controller = controller(&backend);

    let saved = controller.submit_score("Ada").await.expect("submit");
    assert!(!saved.leaderboard_refreshed);
    assert_eq!(saved.score, 0);
}
