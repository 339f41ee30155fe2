//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the leaderboard store, the bot's move picker and the number of
//! rows `GET /leaderboard` returns. Rounds themselves are stateless on the
//! server; session scoring lives entirely in the client.

use std::sync::Arc;

use crate::bot::MovePicker;
use crate::store::LeaderboardStore;

/// Cloned per request by Axum; every field is an Arc or cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: LeaderboardStore,
    pub bot: Arc<dyn MovePicker>,
    pub leaderboard_limit: usize,
}

impl AppState {
    #[must_use]
    pub fn new(store: LeaderboardStore, bot: Arc<dyn MovePicker>, leaderboard_limit: usize) -> Self {
        Self { store, bot, leaderboard_limit }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
