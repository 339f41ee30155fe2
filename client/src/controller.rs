//! Round controller: one session against the game backend.
//!
//! DESIGN
//! ======
//! `RoundController` is a cheap `Clone` handle over shared state so a front
//! end can refresh the leaderboard while a round is pending. The session sits
//! behind a `std::sync::Mutex` that is never held across an `.await`; the
//! `is_playing` flag, not the lock, keeps at most one round outstanding.
//!
//! A round runs: claim the busy flag → await `/play` (bounded by
//! `round_timeout`) → sleep `reveal_delay` → apply scoring. Failure, timeout
//! or cancellation at any point abandons the round and clears the flag. A
//! drop guard clears it too if the round future is dropped mid-flight.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, info, warn};
use wire::{LeaderboardEntry, Move, PlayResponse, SubmitScoreRequest};

use crate::backend::{BackendError, GameBackend};
use crate::config::ControllerConfig;
use crate::session::{RoundResult, SessionState};

// =============================================================================
// ERRORS
// =============================================================================

/// Why a round did not resolve. None of these change the score.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RoundError {
    /// A round is already pending; the move was ignored.
    #[error("a round is already in progress")]
    InProgress,
    #[error("round abandoned: {0}")]
    Backend(#[from] BackendError),
    #[error("round abandoned: no result after {}ms", .0.as_millis())]
    TimedOut(Duration),
    #[error("round cancelled")]
    Cancelled,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Name was empty after trimming; nothing was sent.
    #[error("name must not be empty")]
    EmptyName,
    #[error("score submission failed: {0}")]
    Backend(#[from] BackendError),
    #[error("server did not accept the score")]
    Rejected,
}

// =============================================================================
// REPORTS
// =============================================================================

/// A resolved round and the session right after scoring it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundReport {
    pub result: RoundResult,
    pub session: SessionState,
}

/// Confirmation of an accepted score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreSaved {
    pub name: String,
    pub score: u32,
    /// Whether the follow-up leaderboard refresh succeeded.
    pub leaderboard_refreshed: bool,
}

// =============================================================================
// CONTROLLER
// =============================================================================

#[derive(Clone)]
pub struct RoundController {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn GameBackend>,
    config: ControllerConfig,
    shared: Mutex<Shared>,
    cancel: Notify,
}

#[derive(Default)]
struct Shared {
    session: SessionState,
    /// Last successfully fetched leaderboard, in server order.
    leaderboard: Vec<LeaderboardEntry>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RoundController {
    #[must_use]
    pub fn new(backend: Arc<dyn GameBackend>, config: ControllerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                config,
                shared: Mutex::new(Shared::default()),
                cancel: Notify::new(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> ControllerConfig {
        self.inner.config
    }

    /// Snapshot of the session score.
    #[must_use]
    pub fn session(&self) -> SessionState {
        self.inner.lock().session
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.inner.lock().session.is_playing
    }

    /// Whether the save-score path should be offered right now.
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.inner.lock().session.can_save()
    }

    /// The last leaderboard fetched successfully.
    #[must_use]
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.inner.lock().leaderboard.clone()
    }

    /// Play one round with `player_move`.
    ///
    /// Returns [`RoundError::InProgress`] without touching anything if a round
    /// is already pending. Otherwise the result is revealed after the
    /// configured delay and scored exactly once.
    ///
    /// # Errors
    ///
    /// Any error means the round was ignored or abandoned and the score is
    /// unchanged.
    pub async fn submit_move(&self, player_move: Move) -> Result<RoundReport, RoundError> {
        // Registered before claiming the round so a cancel cannot slip between.
        let cancelled = self.inner.cancel.notified();
        tokio::pin!(cancelled);

        let guard = self.begin_round()?;
        debug!(%player_move, "round submitted");

        let response = tokio::select! {
            response = self.request_round(player_move) => response,
            () = &mut cancelled => Err(RoundError::Cancelled),
        };
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, %player_move, "round abandoned");
                return Err(e);
            }
        };

        let result = RoundResult::new(player_move, response);
        tokio::select! {
            () = tokio::time::sleep(self.inner.config.reveal_delay) => {}
            () = &mut cancelled => {
                warn!(%player_move, "round cancelled during reveal");
                return Err(RoundError::Cancelled);
            }
        }

        let session = guard.resolve(&result);
        info!(
            player = %result.player_move,
            bot = %result.bot_move,
            outcome = ?result.outcome,
            streak = session.current_streak,
            score = session.current_score,
            "round resolved"
        );
        Ok(RoundReport { result, session })
    }

    /// Apply one round's scoring and clear the busy flag.
    ///
    /// Only reached through [`PlayingGuard::resolve`] outside tests, so the
    /// flag is cleared by the round that set it. A second call scores again.
    pub(crate) fn resolve_round(&self, result: &RoundResult) -> SessionState {
        let mut shared = self.inner.lock();
        shared.session.apply(result.outcome);
        shared.session
    }

    /// Abort the pending round, if any. Returns whether one was pending.
    pub fn cancel_round(&self) -> bool {
        let pending = self.is_playing();
        if pending {
            self.inner.cancel.notify_waiters();
        }
        pending
    }

    /// Refresh the leaderboard. On failure the previous list is kept.
    ///
    /// # Errors
    ///
    /// Returns the backend error; it has already been logged.
    pub async fn request_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, BackendError> {
        match self.inner.backend.leaderboard().await {
            Ok(entries) => {
                debug!(rows = entries.len(), "leaderboard fetched");
                self.inner.lock().leaderboard.clone_from(&entries);
                Ok(entries)
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch leaderboard");
                Err(e)
            }
        }
    }

    /// Submit the current cumulative score under `name`, then refresh the
    /// leaderboard.
    ///
    /// # Errors
    ///
    /// [`SubmitError::EmptyName`] is returned before any network call.
    /// Backend failures and rejections leave all state unchanged.
    pub async fn submit_score(&self, name: &str) -> Result<ScoreSaved, SubmitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SubmitError::EmptyName);
        }

        let score = self.session().current_score;
        let request = SubmitScoreRequest { name: name.to_owned(), score: i64::from(score) };
        let response = match self.inner.backend.submit_score(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, player = %name, "score submission failed");
                return Err(e.into());
            }
        };
        if !response.success {
            warn!(player = %name, score, "score submission rejected");
            return Err(SubmitError::Rejected);
        }

        info!(player = %name, score, "score submitted");
        let leaderboard_refreshed = self.request_leaderboard().await.is_ok();
        Ok(ScoreSaved { name: request.name, score, leaderboard_refreshed })
    }

    fn begin_round(&self) -> Result<PlayingGuard<'_>, RoundError> {
        let mut shared = self.inner.lock();
        if shared.session.is_playing {
            debug!("move ignored, round in progress");
            return Err(RoundError::InProgress);
        }
        shared.session.is_playing = true;
        Ok(PlayingGuard { controller: self, armed: true })
    }

    async fn request_round(&self, player_move: Move) -> Result<PlayResponse, RoundError> {
        let call = self.inner.backend.play(player_move);
        match self.inner.config.round_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(response) => Ok(response?),
                Err(_) => Err(RoundError::TimedOut(limit)),
            },
            None => Ok(call.await?),
        }
    }
}

/// Clears `is_playing` unless the round resolved.
struct PlayingGuard<'a> {
    controller: &'a RoundController,
    armed: bool,
}

impl PlayingGuard<'_> {
    fn resolve(mut self, result: &RoundResult) -> SessionState {
        self.armed = false;
        self.controller.resolve_round(result)
    }
}

impl Drop for PlayingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.controller.inner.lock().session.is_playing = false;
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
