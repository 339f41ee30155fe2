//! Session-side game logic for rock-paper-scissors.
//!
//! [`RoundController`] owns the session score, plays one round at a time
//! against a [`GameBackend`], and mediates leaderboard reads and score
//! submission. Rendering is left to the front end.

pub mod backend;
pub mod config;
pub mod controller;
pub mod session;

pub use backend::{BackendError, GameBackend, HttpBackend};
pub use config::ControllerConfig;
pub use controller::{RoundController, RoundError, RoundReport, ScoreSaved, SubmitError};
pub use session::{Outcome, RoundResult, SessionState};
pub use wire::{LeaderboardEntry, Move};
