use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use std::fs;

mod config;
mod output;
mod player;
mod protocol;

use config::Config;
use player::Player;

#[derive(Parser)]
#[command(name = "pixelbuf")]
#[command(
    about = concat!(
        "pixelbuf - LED strip driver\n\n",
        "Fills a pixel buffer from a JSON configuration and sends it to a serial LED controller."
    ),
    long_about = None
)]
struct Cli {
    /// Path to configuration file (JSON)
    config: String,

    /// Enable debug output (statistics)
    #[arg(long)]
    debug: bool,

    /// Enable detailed debug (hex dumps every frame)
    #[arg(long)]
    ddebug: bool,

    /// Stop after this many animation frames
    #[arg(long)]
    frames: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ddebug implies debug
    let level = if cli.ddebug {
        LevelFilter::Trace
    } else if cli.debug {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    // Load configuration
    let config_data = fs::read_to_string(&cli.config)
        .context(format!("Failed to read {}", cli.config))?;
    let config: Config = serde_json::from_str(&config_data)
        .context(format!("Failed to parse {}", cli.config))?;

    let mut player = Player::new(config)?;

    // Set up Ctrl-C handler with graceful shutdown
    let running = player.get_running_flag();
    let result = ctrlc::set_handler(move || {
        info!("Shutting down...");
        running.store(false, std::sync::atomic::Ordering::Relaxed);
    });

    if let Err(e) = result {
        warn!("Could not set Ctrl-C handler: {}", e);
    }

    // Blocks until Ctrl-C or the frame limit; blanks the strip even on error
    player.play(cli.frames)
}
