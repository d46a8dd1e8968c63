//! Command-line definitions for the `xidach` binary.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "xidach",
    version,
    about = "Xì dách table engine: simulated rounds, rules and player accounts"
)]
pub struct XidachCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play rounds between a dealer and bot players
    Play {
        /// Number of bot players besides the dealer
        #[arg(long, default_value_t = 3)]
        bots: usize,
        #[arg(long, default_value_t = 1)]
        rounds: u32,
        #[arg(long)]
        seed: Option<u64>,
        /// Bot strategy: baseline, cautious or random
        #[arg(long, default_value = "baseline")]
        strategy: String,
        /// Append one JSON line per finished round to this file
        #[arg(long)]
        log: Option<String>,
        /// SQLite database; overrides the configured one
        #[arg(long)]
        db: Option<String>,
    },
    /// Deal one round and show every hand face up
    Deal {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 3)]
        players: usize,
    },
    /// List the payout rules
    Rules,
    /// Show the resolved configuration and where each value came from
    Cfg,
    /// List registered players
    Players {
        #[arg(long)]
        db: Option<String>,
    },
    /// Show a player's most recent results
    History {
        #[arg(long)]
        player: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        db: Option<String>,
    },
    /// Add to (or with a negative amount, take from) a player's balance
    Deposit {
        #[arg(long)]
        player: String,
        #[arg(long, allow_hyphen_values = true)]
        amount: i64,
        #[arg(long)]
        db: Option<String>,
    },
}
