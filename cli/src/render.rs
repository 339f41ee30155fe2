//! Text rendering for the terminal session.

use std::fmt::Write as _;

use client::{LeaderboardEntry, Outcome, RoundReport, SessionState};

pub const PENDING: &str = "BATTLE IN PROGRESS...";

#[must_use]
pub fn verdict(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Player => "VICTORY",
        Outcome::Bot => "DEFEAT",
        Outcome::Draw => "DRAW",
    }
}

#[must_use]
pub fn render_stats(session: &SessionState) -> String {
    format!(
        "streak {} | best {} | score {}",
        session.current_streak, session.best_streak, session.current_score
    )
}

#[must_use]
pub fn render_round(report: &RoundReport) -> String {
    format!(
        "you: {:<8} bot: {:<8} {}\n{}",
        report.result.player_move,
        report.result.bot_move,
        verdict(report.result.outcome),
        render_stats(&report.session)
    )
}

/// Numbered rows in server order.
#[must_use]
pub fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "leaderboard: (no scores yet)".to_owned();
    }
    let width = entries.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
    let mut out = String::from("leaderboard:");
    for (index, entry) in entries.iter().enumerate() {
        let _ = write!(out, "\n  #{:<2} {:<width$}  {}", index + 1, entry.name, entry.score);
    }
    out
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
