mod report;
mod ui;

use std::{env, path::PathBuf, sync::mpsc};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use gambit_client::{GameSource, LichessClient, PgnFileSource};
use gambit_dashboard::Dashboard;
use gambit_ops::init_tracing;
use gambit_types::config::GambitConfig;
use tracing::info;
use ui::UiMessage;

const DEFAULT_CONFIG_PATH: &str = "configs/gambit.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Tui,
    Text,
    Json,
}

/// Explore a Lichess player's results and favorite openings.
#[derive(Debug, Parser)]
#[command(name = "gambit", version)]
struct Args {
    /// Lichess username to explore.
    username: String,
    /// TOML configuration file.
    #[arg(long, env = "GAMBIT_CONFIG")]
    config: Option<PathBuf>,
    /// Read games from a local PGN export instead of the Lichess API.
    #[arg(long)]
    pgn_file: Option<PathBuf>,
    /// Maximum number of games to download.
    #[arg(long)]
    max_games: Option<u32>,
    /// Only games played on or after this date (YYYY-MM-DD).
    #[arg(long)]
    since: Option<NaiveDate>,
    /// Number of openings listed per color.
    #[arg(long)]
    top: Option<usize>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Tui)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;
    init_tracing(&config.ops, args.format == OutputFormat::Tui)?;

    match &args.pgn_file {
        Some(path) => {
            let dashboard = Dashboard::new(
                PgnFileSource::new(path),
                config.query.clone(),
                config.display.top_n,
            );
            run(dashboard, &args).await
        }
        None => {
            let dashboard = Dashboard::new(
                LichessClient::new(&config.lichess)?,
                config.query.clone(),
                config.display.top_n,
            );
            run(dashboard, &args).await
        }
    }
}

async fn run<S>(dashboard: Dashboard<S>, args: &Args) -> Result<()>
where
    S: GameSource + 'static,
{
    match args.format {
        OutputFormat::Text => {
            let report = dashboard.load(&args.username).await?;
            print!("{}", report::render_text(&report));
        }
        OutputFormat::Json => {
            let report = dashboard.load(&args.username).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Tui => {
            let (tx, rx) = mpsc::channel();
            let username = args.username.clone();
            let loader = tokio::spawn(async move {
                let _ = tx.send(UiMessage::Status(format!("Fetching games for {username}...")));
                let message = match dashboard.load(&username).await {
                    Ok(report) => UiMessage::Report(Box::new(report)),
                    Err(err) => UiMessage::Failed(err.to_string()),
                };
                let _ = tx.send(message);
            });

            let title = format!("Lichess Game Metrics Explorer: {}", args.username);
            tokio::task::spawn_blocking(move || ui::run(rx, title))
                .await
                .context("terminal UI task panicked")??;
            loader.abort();
        }
    }
    info!("Done");
    Ok(())
}

fn resolve_config(args: &Args) -> Result<GambitConfig> {
    let mut config = load_config(args.config.as_ref());

    if let Ok(token) = env::var("LICHESS_TOKEN") {
        config.lichess.token = Some(token);
    }
    if args.max_games.is_some() {
        config.query.max_games = args.max_games;
    }
    if args.since.is_some() {
        config.query.since = args.since;
    }
    if let Some(top) = args.top {
        config.display.top_n = top;
    }

    config.validate()?;
    Ok(config)
}

fn load_config(explicit: Option<&PathBuf>) -> GambitConfig {
    let path = explicit
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    if explicit.is_none() && !path.exists() {
        return GambitConfig::default();
    }
    match GambitConfig::from_file(&path) {
        Ok(cfg) => {
            if let Err(err) = cfg.validate() {
                eprintln!(
                    "Invalid config in '{}': {err}. Falling back to internal defaults.",
                    path.display()
                );
                GambitConfig::default()
            } else {
                cfg
            }
        }
        Err(err) => {
            eprintln!(
                "Failed to load config from '{}': {err}. Falling back to internal defaults.",
                path.display()
            );
            GambitConfig::default()
        }
    }
}
