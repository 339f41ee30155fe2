//! End-to-end: the controller against a live server on an ephemeral port.

use std::sync::Arc;
use std::time::Duration;

use client::{ControllerConfig, HttpBackend, LeaderboardEntry, Move, Outcome, RoundController, SessionState};
use server::bot::ScriptedPicker;
use server::state::AppState;
use server::store::LeaderboardStore;

struct Harness {
    controller: RoundController,
    store: LeaderboardStore,
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(self.store.path());
    }
}

async fn harness(bot_moves: Vec<Move>) -> Harness {
    let path = std::env::temp_dir().join(format!("rps-e2e-{}.json", uuid::Uuid::new_v4()));
    let store = LeaderboardStore::new(&path);
    let state = AppState::new(store.clone(), Arc::new(ScriptedPicker::new(bot_moves)), 10);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, server::routes::app(state, None)).await;
    });

    let config = ControllerConfig::default().with_reveal_delay(Duration::from_millis(10));
    let backend = HttpBackend::new(&format!("http://{addr}"), config.http_timeout).expect("backend");
    Harness { controller: RoundController::new(Arc::new(backend), config), store }
}

#[tokio::test]
async fn session_score_reaches_leaderboard() {
    let h = harness(vec![Move::Scissors, Move::Scissors, Move::Scissors, Move::Paper]).await;

    let initial = h.controller.request_leaderboard().await.expect("initial fetch");
    assert!(initial.is_empty());

    for _ in 0..3 {
        let report = h.controller.submit_move(Move::Rock).await.expect("round");
        assert_eq!(report.result.outcome, Outcome::Player);
    }
    assert!(h.controller.can_save());

    let report = h.controller.submit_move(Move::Rock).await.expect("round");
    assert_eq!(report.result.outcome, Outcome::Bot);
    assert_eq!(
        h.controller.session(),
        SessionState { current_streak: 0, best_streak: 3, current_score: 25, is_playing: false }
    );

    let saved = h.controller.submit_score("Ada").await.expect("submit");
    assert_eq!(saved.score, 25);
    assert!(saved.leaderboard_refreshed);
    assert!(
        h.controller
            .leaderboard()
            .contains(&LeaderboardEntry { name: "Ada".to_owned(), score: 25 })
    );
}

#[tokio::test]
async fn draw_round_over_http_changes_nothing() {
    let h = harness(vec![Move::Paper]).await;

    let report = h.controller.submit_move(Move::Paper).await.expect("round");
    assert_eq!(report.result.outcome, Outcome::Draw);
    assert_eq!(h.controller.session(), SessionState::default());
}

#[tokio::test]
async fn leaderboard_is_ranked_by_server() {
    let h = harness(vec![Move::Scissors]).await;

    h.controller.submit_move(Move::Rock).await.expect("round");
    h.controller.submit_score("low").await.expect("submit");
    h.controller.submit_move(Move::Rock).await.expect("round");
    h.controller.submit_score("high").await.expect("submit");

    let names: Vec<String> = h.controller.leaderboard().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["high".to_owned(), "low".to_owned()]);
}
