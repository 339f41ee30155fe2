//! Game routes: play a round, read and extend the leaderboard.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use tracing::{debug, error, info};
use wire::{ErrorBody, LeaderboardEntry, PlayRequest, PlayResponse, SubmitScoreResponse, Winner};

use crate::state::AppState;
use crate::store::StoreError;

pub type ApiError = (StatusCode, Json<ErrorBody>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message.to_owned() }))
}

pub(crate) fn store_error_to_response(err: StoreError) -> ApiError {
    error!(error = %err, "leaderboard store failed");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { error: "Leaderboard unavailable".to_owned() }))
}

/// `POST /play`: bot picks a move, the round is judged for the player.
pub async fn play(
    State(state): State<AppState>,
    body: Result<Json<PlayRequest>, JsonRejection>,
) -> Result<Json<PlayResponse>, ApiError> {
    let Ok(Json(req)) = body else {
        return Err(bad_request("Invalid move"));
    };

    let bot_move = state.bot.pick();
    let winner = Winner::judge(req.player_move, bot_move);
    debug!(player = %req.player_move, bot = %bot_move, ?winner, "round played");

    Ok(Json(PlayResponse { bot_move, winner }))
}

/// `GET /leaderboard`: top rows, highest score first.
pub async fn leaderboard(State(state): State<AppState>) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let entries = state
        .store
        .top(state.leaderboard_limit)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(entries))
}

/// Lenient body so missing fields produce our 400 instead of a 422.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitScoreBody {
    pub name: Option<String>,
    pub score: Option<i64>,
}

/// `POST /submit_score`: append a row to the leaderboard.
pub async fn submit_score(
    State(state): State<AppState>,
    body: Result<Json<SubmitScoreBody>, JsonRejection>,
) -> Result<Json<SubmitScoreResponse>, ApiError> {
    let Ok(Json(body)) = body else {
        return Err(bad_request("Invalid data"));
    };
    let Some(entry) = validate_submission(body) else {
        return Err(bad_request("Invalid data"));
    };

    info!(name = %entry.name, score = entry.score, "score submitted");
    state.store.append(entry).await.map_err(store_error_to_response)?;

    Ok(Json(SubmitScoreResponse { success: true }))
}

/// A submission needs a non-blank name and a score.
fn validate_submission(body: SubmitScoreBody) -> Option<LeaderboardEntry> {
    let name = body.name?.trim().to_owned();
    if name.is_empty() {
        return None;
    }
    Some(LeaderboardEntry { name, score: body.score? })
}

#[cfg(test)]
#[path = "game_test.rs"]
mod tests;
