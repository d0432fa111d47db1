// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use channel_kiosk::Config;
use channel_kiosk::player::{CommandSink, LogSink, PlaybackSink};

mod cli;
use cli::{CacheCommand, CommandContext, ListCommand, OutputFormat, PlayCommand};

fn cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default())
}

#[derive(Parser)]
#[command(name = "channel-kiosk")]
#[command(about = "A remote-controlled channel kiosk for embedded web players")]
#[command(version)]
#[command(styles = cargo_style())]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging to file (channel_kiosk_debug.log)
    #[arg(long, global = true)]
    debug_log: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the kiosk (default if no command given)
    Run {
        /// Log channel URLs instead of launching the player
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the resolved channel list
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Play a single channel by index and wait for the player to exit
    Play {
        /// Channel index; out-of-range values wrap around
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Manage the channel cache
    #[command(subcommand)]
    Cache(CacheSubCommand),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigSubCommand),
}

#[derive(Subcommand)]
enum CacheSubCommand {
    /// Show what is cached and how old it is
    Show,
    /// Fetch the remote list and rewrite the cache
    Refresh,
    /// Delete the cache file
    Clear,
}

#[derive(Subcommand)]
enum ConfigSubCommand {
    /// Create or update the config file interactively
    Init,
    /// Print the config file path
    Path,
}

fn init_logging(cli: &Cli) -> Result<()> {
    if cli.debug_log {
        let file = File::create("channel_kiosk_debug.log")?;
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_level(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(file_layer)
            .with(
                EnvFilter::from_default_env()
                    .add_directive("channel_kiosk=debug".parse()?)
                    .add_directive("hyper_util=error".parse()?),
            )
            .init();
    } else if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive(tracing::Level::DEBUG.into())
                    .add_directive("hyper_util=error".parse()?),
            )
            .init();
    } else if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("hyper_util=error".parse()?),
            )
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    match cli.command {
        Some(Commands::Config(ConfigSubCommand::Path)) => {
            println!("{}", config_path.display());
            return Ok(());
        }
        Some(Commands::Config(ConfigSubCommand::Init)) => {
            return channel_kiosk::setup::interactive_setup(&config_path).await;
        }
        _ => {}
    }

    let config = Config::load_or_default(&config_path)?;
    tracing::debug!("Using config {}", config_path.display());

    match cli.command {
        Some(Commands::Run { dry_run }) => run_kiosk(config, dry_run).await?,
        None => run_kiosk(config, false).await?,

        Some(Commands::List { format }) => {
            let cmd = ListCommand {
                format: OutputFormat::from_str(&format)?,
            };
            cmd.execute(CommandContext::new(config)?).await?;
        }

        Some(Commands::Play { index }) => {
            PlayCommand { index }
                .execute(CommandContext::new(config)?)
                .await?;
        }

        Some(Commands::Cache(cache_cmd)) => {
            let cmd = match cache_cmd {
                CacheSubCommand::Show => CacheCommand::Show,
                CacheSubCommand::Refresh => CacheCommand::Refresh,
                CacheSubCommand::Clear => CacheCommand::Clear,
            };
            cmd.execute(CommandContext::new(config)?).await?;
        }

        Some(Commands::Config(_)) => {}
    }

    Ok(())
}

async fn run_kiosk(config: Config, dry_run: bool) -> Result<()> {
    let sink: Box<dyn PlaybackSink> = if dry_run {
        Box::new(LogSink::default())
    } else {
        let sink = CommandSink::new(&config.player);
        if !sink.is_available() {
            tracing::warn!(
                "Player '{}' did not answer --version; launching it anyway",
                config.player.command
            );
        }
        Box::new(sink)
    };

    channel_kiosk::run_tui(config, sink).await
}
