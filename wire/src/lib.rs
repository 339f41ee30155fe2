//! Shared JSON wire model for the game backend.
//!
//! This crate owns the request/response bodies exchanged between `client`
//! and `server` over `/play`, `/leaderboard` and `/submit_score`, plus the
//! pure round judge both sides agree on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing wire vocabulary from text.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WireError {
    /// The text is not one of `rock`, `paper`, `scissors`.
    #[error("unknown move: {0}")]
    UnknownMove(String),
}

// =============================================================================
// MOVE
// =============================================================================

/// A hand shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// Every move, in display order.
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        }
    }

    /// The move this one defeats.
    #[must_use]
    pub fn beats(self) -> Move {
        match self {
            Self::Rock => Self::Scissors,
            Self::Paper => Self::Rock,
            Self::Scissors => Self::Paper,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Move {
    type Err = WireError;

    /// Accepts the wire name or its first letter, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" | "r" => Ok(Self::Rock),
            "paper" | "p" => Ok(Self::Paper),
            "scissors" | "s" => Ok(Self::Scissors),
            _ => Err(WireError::UnknownMove(s.to_owned())),
        }
    }
}

// =============================================================================
// WINNER
// =============================================================================

/// Who took the round, as spelled on the wire.
///
/// The server writes `draw`; `tie` is accepted on input for backends that
/// use that spelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Bot,
    #[serde(alias = "tie")]
    Draw,
}

impl Winner {
    /// Judge a round from the player's point of view.
    #[must_use]
    pub fn judge(player: Move, bot: Move) -> Self {
        if player == bot {
            Self::Draw
        } else if player.beats() == bot {
            Self::Player
        } else {
            Self::Bot
        }
    }
}

// =============================================================================
// BODIES
// =============================================================================

/// `POST /play` request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRequest {
    #[serde(rename = "move")]
    pub player_move: Move,
}

/// `POST /play` response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayResponse {
    pub bot_move: Move,
    pub winner: Winner,
}

/// One row of `GET /leaderboard`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i64,
}

/// `POST /submit_score` request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitScoreRequest {
    pub name: String,
    pub score: i64,
}

/// `POST /submit_score` response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitScoreResponse {
    #[serde(default)]
    pub success: bool,
}

/// Body of any 4xx response from the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
