use anyhow::{Context, Result, bail};
use clap::Parser;
use level_snake::game::GameConfig;
use level_snake::modes::PlayMode;
use level_snake::persistence::{JsonFileStore, MemoryStore, ProgressStore};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "level_snake")]
#[command(version, about = "Snake with levels, walls and saved progress")]
struct Cli {
    /// Player name; asked for on start when omitted
    #[arg(long)]
    username: Option<String>,

    /// Directory holding progress and saved games
    #[arg(long, default_value = ".")]
    save_dir: PathBuf,

    /// Keep progress in memory only
    #[arg(long)]
    no_save: bool,

    /// Log file (the terminal is used by the game)
    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let username = match cli.username {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => prompt_username()?,
    };

    let config = GameConfig::default();

    if cli.no_save {
        return play(config, MemoryStore::new(), &username).await;
    }

    match JsonFileStore::open(&cli.save_dir) {
        Ok(store) => play(config, store, &username).await,
        Err(err) => {
            warn!(error = %err, "save directory unavailable, progress will not be kept");
            play(config, MemoryStore::new(), &username).await
        }
    }
}

async fn play<S: ProgressStore>(config: GameConfig, store: S, username: &str) -> Result<()> {
    info!(username, "starting");
    let mut play_mode = PlayMode::new(config, store, username);
    play_mode.run().await
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn prompt_username() -> Result<String> {
    let stdin = io::stdin();
    loop {
        print!("Enter your username: ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = stdin
            .read_line(&mut line)
            .context("Failed to read username")?;
        if read == 0 {
            bail!("No username given");
        }

        let name = line.trim();
        if !name.is_empty() {
            return Ok(name.to_string());
        }
    }
}
