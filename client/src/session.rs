//! Session score model and the scoring rule.
//!
//! DESIGN
//! ======
//! `SessionState` is a plain `Copy` value. The controller owns the live copy
//! and hands out snapshots; the only mutation path is [`SessionState::apply`],
//! called once per resolved round.

use wire::{Move, PlayResponse, Winner};

/// Points for a won round.
pub const WIN_POINTS: u32 = 10;
/// Points taken for a lost round, floored at zero.
pub const LOSS_PENALTY: u32 = 5;

/// Round outcome from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Player,
    Bot,
    Draw,
}

impl From<Winner> for Outcome {
    fn from(winner: Winner) -> Self {
        match winner {
            Winner::Player => Self::Player,
            Winner::Bot => Self::Bot,
            Winner::Draw => Self::Draw,
        }
    }
}

/// One judged round, consumed exactly once by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundResult {
    pub player_move: Move,
    pub bot_move: Move,
    pub outcome: Outcome,
}

impl RoundResult {
    #[must_use]
    pub fn new(player_move: Move, response: PlayResponse) -> Self {
        Self { player_move, bot_move: response.bot_move, outcome: response.winner.into() }
    }
}

/// Score tracker for the current session. Reset when the process restarts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current_streak: u32,
    pub best_streak: u32,
    pub current_score: u32,
    pub is_playing: bool,
}

impl SessionState {
    /// Apply one round's scoring and end the round.
    ///
    /// Not idempotent: every call scores again.
    pub(crate) fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Player => {
                self.current_streak = self.current_streak.saturating_add(1);
                self.current_score = self.current_score.saturating_add(WIN_POINTS);
            }
            Outcome::Bot => {
                self.current_streak = 0;
                self.current_score = self.current_score.saturating_sub(LOSS_PENALTY);
            }
            Outcome::Draw => {}
        }
        if self.current_streak > self.best_streak {
            self.best_streak = self.current_streak;
        }
        self.is_playing = false;
    }

    /// Saving is offered only while a win streak is running.
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.current_streak > 0
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
