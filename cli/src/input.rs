//! Parsing of interactive session commands.

use std::future::Future;

use tokio::io::{AsyncBufRead, Lines};
use wire::Move;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Play(Move),
    /// `save [name]`; the name is prompted for when absent.
    Save(Option<String>),
    Board,
    Stats,
    Help,
    Quit,
    Empty,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown command `{0}` (type `help`)")]
pub struct UnknownCommand(pub String);

pub const HELP: &str = "\
commands:
  rock | paper | scissors   play a round (r / p / s also work)
  save [name]               submit your session score
  board                     refresh the leaderboard
  stats                     show streak and score
  help                      this text
  quit                      leave";

/// Parse one line typed at the session prompt.
pub fn parse_input(line: &str) -> Result<Input, UnknownCommand> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "" => Ok(Input::Empty),
        "save" => Ok(Input::Save((!rest.is_empty()).then(|| rest.to_owned()))),
        "board" | "leaderboard" => Ok(Input::Board),
        "stats" => Ok(Input::Stats),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" | "q" => Ok(Input::Quit),
        other => other
            .parse::<Move>()
            .map(Input::Play)
            .map_err(|_| UnknownCommand(line.to_owned())),
    }
}

/// Next input line, or `None` at end of input or once `interrupt` fires.
///
/// # Errors
///
/// Returns the read error from the underlying reader.
pub async fn next_line_or_interrupt<R, F, T>(lines: &mut Lines<R>, interrupt: F) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = T>,
{
    tokio::select! {
        line = lines.next_line() => line,
        _ = interrupt => Ok(None),
    }
}

#[cfg(test)]
#[path = "input_test.rs"]
mod tests;
