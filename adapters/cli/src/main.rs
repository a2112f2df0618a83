#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays, inspects and claims Coin Shooter sessions.

mod autoplay;
mod config;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coin_shooter_core::{StatField, Timestamp};
use coin_shooter_session::Session;
use coin_shooter_storage::{load_json, save_json, FileStore};
use coin_shooter_system_claim::{FixedNetwork, OfflineLedger, WalletPreference};

use crate::{autoplay::AutoplayConfig, config::CliConfig};

const LEDGER_KEY: &str = "offline_ledger";
const DEFAULT_PLAYER: &str = "local-player";

/// Top-level command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "coin-shooter", version, about = "Shoot the coin, headless")]
struct Cli {
    /// Directory holding the persisted records.
    #[arg(long, default_value = ".coin-shooter")]
    data_dir: PathBuf,
    /// TOML file overriding the session and claim defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Raises log verbosity (`-v` info, `-vv` debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

/// Operations offered by the binary.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Plays a session with a seeded bot.
    Play {
        /// Session length in seconds.
        #[arg(long, default_value_t = 60)]
        seconds: u64,
        /// Virtual milliseconds per frame.
        #[arg(long, default_value_t = 250)]
        tick_ms: u64,
        /// Percentage of aimed shots that land, between 0 and 100.
        #[arg(long, default_value_t = 85.0, value_parser = parse_accuracy)]
        accuracy: f64,
        /// Seed of the bot's aim.
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Prints statistics, progression, achievements and pending kills.
    Stats,
    /// Submits pending kills to the offline ledger.
    Claim {
        /// Chain the wallet is connected to. Defaults to the contract's chain.
        #[arg(long)]
        chain_id: Option<u64>,
    },
    /// Stores which wallet signs claims.
    Wallet {
        /// `local` or `external`.
        preference: WalletPreference,
    },
    /// Restores statistics to their defaults.
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = CliConfig::load(cli.config.as_deref(), &cli.data_dir)?;
    let store = FileStore::open(&cli.data_dir)
        .with_context(|| format!("could not open data directory {}", cli.data_dir.display()))?;
    let mut session = Session::new(
        store,
        config.session.clone(),
        config.claim.clone(),
        Timestamp::now(),
    );

    match cli.command {
        Commands::Play {
            seconds,
            tick_ms,
            accuracy,
            seed,
        } => play(
            &mut session,
            AutoplayConfig {
                duration: Duration::from_secs(seconds),
                tick: Duration::from_millis(tick_ms),
                accuracy: accuracy / 100.0,
                seed,
            },
        ),
        Commands::Stats => {
            print_stats(&session);
            Ok(())
        }
        Commands::Claim { chain_id } => claim(&mut session, &config, &cli.data_dir, chain_id),
        Commands::Wallet { preference } => {
            session.set_wallet_preference(preference);
            println!("wallet preference set to {preference}");
            Ok(())
        }
        Commands::Reset => {
            let mut events = Vec::new();
            session.reset_stats(&mut events);
            println!("statistics reset");
            Ok(())
        }
    }
}

fn parse_accuracy(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|error| format!("\"{raw}\" is not a number: {error}"))?;
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(format!("accuracy must be between 0 and 100, got {raw}"));
    }
    Ok(value)
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn play(session: &mut Session<FileStore>, config: AutoplayConfig) -> Result<()> {
    let summary = autoplay::run(session, config);

    println!(
        "played {}s over {} frames: {} kills, level {}, accuracy {:.1}%",
        summary.elapsed_seconds,
        summary.frames,
        summary.kills,
        session.level(),
        session.stats().accuracy(),
    );
    println!(
        "best combo {}, pending kills {}",
        session.combo().max_combo(),
        session.kill_queue().pending_kills()
    );
    println!("events:");
    for (name, count) in &summary.event_counts {
        println!("  {name:<24}{count}");
    }
    Ok(())
}

fn print_stats(session: &Session<FileStore>) {
    let stats = session.stats();
    let progression = session.progression();

    println!("kills          {}", stats.get(StatField::TotalKills));
    println!("shots          {}", stats.get(StatField::TotalShots));
    println!("accuracy       {:.1}%", stats.accuracy());
    println!("best combo     {}", stats.get(StatField::BestCombo));
    println!("best session   {}", stats.get(StatField::BestSession));
    println!("play time      {}", stats.formatted_play_time());
    println!("claims         {}", stats.get(StatField::TotalClaims));
    println!(
        "level          {} ({:.0}% to next)",
        session.level(),
        progression.level_progress(stats) * 100.0
    );
    match progression.next_unlock(stats) {
        Some(next) => println!(
            "next unlock    {} at level {} ({} kills to go)",
            next.unlock.name, next.unlock.level, next.kills_needed
        ),
        None => println!("next unlock    everything unlocked"),
    }

    println!("achievements");
    for status in session.achievements().all_achievements() {
        let mark = if status.unlocked { "x" } else { " " };
        println!(
            "  [{mark}] {:<14}{}",
            status.achievement.name, status.achievement.description
        );
    }

    println!(
        "pending kills  {}{}",
        session.kill_queue().pending_kills(),
        if session.can_claim() { " (claimable)" } else { "" }
    );
    println!("wallet         {}", session.wallet_preference());
}

fn claim(
    session: &mut Session<FileStore>,
    config: &CliConfig,
    data_dir: &Path,
    chain_id: Option<u64>,
) -> Result<()> {
    let mut ledger = load_json::<OfflineLedger, _>(session.store(), LEDGER_KEY)
        .context("could not read the offline ledger")?
        .unwrap_or_else(|| {
            OfflineLedger::new(config.player.as_deref().unwrap_or(DEFAULT_PLAYER))
        });
    if let Some(player) = &config.player {
        ledger.set_player(player.as_str());
    }
    ledger.begin_day(Timestamp::now().as_millis() / 86_400_000);

    let network = FixedNetwork(chain_id.unwrap_or(config.claim.chain_id));
    let mut events = Vec::new();
    let receipt = session.claim(&mut ledger, &network, &mut events)?;

    save_json(session.store_mut(), LEDGER_KEY, &ledger).with_context(|| {
        format!(
            "claim confirmed but the ledger could not be saved in {}",
            data_dir.display()
        )
    })?;

    println!(
        "claimed {} kills in block {} ({} gas)",
        receipt.kills, receipt.block_number, receipt.gas_used
    );
    println!("{}", config.claim.transaction_url(&receipt.transaction));
    println!(
        "{} kills credited to {}",
        ledger.player_kills(ledger.player()),
        ledger.player()
    );
    Ok(())
}
