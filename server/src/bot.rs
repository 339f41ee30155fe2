//! Bot move selection.
//!
//! DESIGN
//! ======
//! `AppState` holds an `Arc<dyn MovePicker>` so `/play` can be driven by a
//! uniform random bot in production and by a fixed script in tests and
//! demos (`BOT_MOVES`).

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;
use wire::Move;

pub trait MovePicker: Send + Sync {
    /// Choose the bot's move for the next round.
    fn pick(&self) -> Move;
}

/// Uniform random choice over the three moves.
pub struct RandomPicker;

impl MovePicker for RandomPicker {
    fn pick(&self) -> Move {
        Move::ALL[rand::rng().random_range(0..Move::ALL.len())]
    }
}

/// Cycles through a fixed sequence of moves.
pub struct ScriptedPicker {
    moves: Vec<Move>,
    next: AtomicUsize,
}

impl ScriptedPicker {
    /// An empty script falls back to `Rock` forever.
    #[must_use]
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves, next: AtomicUsize::new(0) }
    }
}

impl MovePicker for ScriptedPicker {
    fn pick(&self) -> Move {
        if self.moves.is_empty() {
            return Move::Rock;
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.moves.len();
        self.moves[index]
    }
}

#[cfg(test)]
#[path = "bot_test.rs"]
mod tests;
