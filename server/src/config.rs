//! Server configuration parsed from environment variables.

use std::path::PathBuf;

use wire::{Move, WireError};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LEADERBOARD_FILE: &str = "leaderboard.json";
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid BOT_MOVES: {0}")]
    BotMoves(#[from] WireError),
    #[error("BOT_MOVES is set but lists no moves")]
    EmptyBotMoves,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub leaderboard_file: PathBuf,
    pub leaderboard_limit: usize,
    pub static_dir: Option<PathBuf>,
    /// Fixed bot move sequence, cycled. `None` means uniform random.
    pub bot_script: Option<Vec<Move>>,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `LEADERBOARD_FILE`: default `leaderboard.json`
    /// - `LEADERBOARD_LIMIT`: rows returned by `GET /leaderboard`, default 10
    /// - `STATIC_DIR`: directory served at `/`
    /// - `BOT_MOVES`: comma-separated moves the bot cycles through
    ///
    /// # Errors
    ///
    /// Returns an error if `BOT_MOVES` is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_script = parse_bot_script(std::env::var("BOT_MOVES").ok().as_deref())?;

        Ok(Self {
            port: env_parse("PORT", DEFAULT_PORT),
            leaderboard_file: std::env::var("LEADERBOARD_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_LEADERBOARD_FILE)),
            leaderboard_limit: env_parse("LEADERBOARD_LIMIT", DEFAULT_LEADERBOARD_LIMIT),
            static_dir: std::env::var("STATIC_DIR").ok().map(PathBuf::from),
            bot_script,
        })
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_bot_script(raw: Option<&str>) -> Result<Option<Vec<Move>>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let moves = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<Move>)
        .collect::<Result<Vec<_>, _>>()?;
    if moves.is_empty() {
        return Err(ConfigError::EmptyBotMoves);
    }
    Ok(Some(moves))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
