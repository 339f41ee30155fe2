mod input;
mod render;

use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use client::{BackendError, ControllerConfig, HttpBackend, RoundController, RoundError, SubmitError};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::Level;
use wire::Move;

use crate::input::{HELP, Input, next_line_or_interrupt, parse_input};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("terminal io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("server returned HTTP {0}")]
    ServerStatus(u16),
}

#[derive(Parser, Debug)]
#[command(name = "rps", about = "Rock-paper-scissors against the house")]
struct Cli {
    #[arg(long, env = "RPS_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Seconds to wait for a round result; 0 waits forever.
    #[arg(long, env = "RPS_ROUND_TIMEOUT_SECS")]
    round_timeout_secs: Option<u64>,

    /// Milliseconds between receiving a result and revealing it.
    #[arg(long, env = "RPS_REVEAL_DELAY_MS")]
    reveal_delay_ms: Option<u64>,

    /// Log debug output to stderr.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (default).
    Play,
    /// Print the leaderboard and exit.
    Leaderboard,
    /// Check the server is up.
    Ping,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let config = controller_config(&cli);
    let backend = HttpBackend::new(&cli.base_url, config.http_timeout)?;
    let controller = RoundController::new(Arc::new(backend), config);

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => run_session(&controller).await,
        Command::Leaderboard => {
            let entries = controller.request_leaderboard().await?;
            println!("{}", render::render_leaderboard(&entries));
            Ok(())
        }
        Command::Ping => run_ping(&cli.base_url).await,
    }
}

/// Environment defaults, overridden by explicit flags.
fn controller_config(cli: &Cli) -> ControllerConfig {
    let mut config = ControllerConfig::from_env();
    if let Some(secs) = cli.round_timeout_secs {
        config = config.with_round_timeout((secs > 0).then(|| Duration::from_secs(secs)));
    }
    if let Some(ms) = cli.reveal_delay_ms {
        config = config.with_reveal_delay(Duration::from_millis(ms));
    }
    config
}

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let url = format!("{}/healthz", base_url.trim_end_matches('/'));
    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerStatus(status.as_u16()));
    }
    println!("ok");
    Ok(())
}

// =============================================================================
// INTERACTIVE SESSION
// =============================================================================

async fn run_session(controller: &RoundController) -> Result<(), CliError> {
    println!("rock, paper, scissors. type `help` for commands.");
    match controller.request_leaderboard().await {
        Ok(entries) => println!("{}", render::render_leaderboard(&entries)),
        Err(_) => println!("leaderboard unavailable"),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt("> ")?;
        // Once a round has listened for Ctrl-C the default handler is gone,
        // so the prompt has to watch for it too.
        let Some(line) = next_line_or_interrupt(&mut lines, tokio::signal::ctrl_c()).await? else {
            println!();
            break;
        };
        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        match input {
            Input::Empty => {}
            Input::Play(player_move) => play_round(controller, player_move).await,
            Input::Save(name) => save_score(controller, name, &mut lines).await?,
            Input::Board => {
                if controller.request_leaderboard().await.is_err() {
                    println!("leaderboard unavailable; showing last known");
                }
                println!("{}", render::render_leaderboard(&controller.leaderboard()));
            }
            Input::Stats => println!("{}", render::render_stats(&controller.session())),
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
        }
    }

    println!("final: {}", render::render_stats(&controller.session()));
    Ok(())
}

/// Play one round; Ctrl-C while it is pending cancels it.
async fn play_round(controller: &RoundController, player_move: Move) {
    println!("{}", render::PENDING);
    let round = controller.submit_move(player_move);
    tokio::pin!(round);

    let outcome = tokio::select! {
        outcome = &mut round => outcome,
        _ = tokio::signal::ctrl_c() => {
            controller.cancel_round();
            round.await
        }
    };

    match outcome {
        Ok(report) => println!("{}", render::render_round(&report)),
        Err(RoundError::InProgress) => {}
        Err(RoundError::Cancelled) => println!("round cancelled"),
        Err(e) => println!("{e}; try again"),
    }
}

async fn save_score(
    controller: &RoundController,
    name: Option<String>,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<(), CliError> {
    if !controller.can_save() {
        println!("Score at least 1 point to save!");
        return Ok(());
    }

    let name = match name {
        Some(name) => name,
        None => {
            prompt("name: ")?;
            lines.next_line().await?.unwrap_or_default()
        }
    };

    match controller.submit_score(&name).await {
        Ok(saved) => {
            println!("Score Submitted! ({} points as {})", saved.score, saved.name);
            println!("{}", render::render_leaderboard(&controller.leaderboard()));
        }
        Err(SubmitError::EmptyName) => println!("name required"),
        Err(e) => println!("{e}"),
    }
    Ok(())
}

fn prompt(text: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{text}")?;
    stdout.flush()?;
    Ok(())
}
