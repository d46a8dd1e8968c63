//! # xidach CLI Library
//!
//! Command-line front end for the xì dách table engine: simulated rounds
//! between bots, single deals for inspection, the rule list, configuration
//! and player accounts kept in SQLite.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["xidach", "play", "--bots", "3", "--rounds", "10"];
//! let code = xidach_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Run full rounds between a dealer and bot players
//! - `deal`: Deal a single round for inspection
//! - `rules`: List the payout rules
//! - `cfg`: Display current configuration settings
//! - `players`: List registered players
//! - `history`: Show a player's recent results
//! - `deposit`: Adjust a player's balance

use clap::Parser;
use std::io::Write;
#[macro_use]
mod macros;
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod store;
pub mod ui;

use cli::{Commands, XidachCli};
use commands::{
    handle_cfg_command, handle_deal_command, handle_deposit_command, handle_history_command,
    handle_play_command, handle_players_command, handle_rules_command, PlayOptions,
};

pub use error::CliError;

/// Main entry point for the CLI application.
///
/// Parses command-line arguments and dispatches to the matching subcommand
/// handler. Returns the process exit code: `0` for success, `2` for errors.
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["xidach", "deal", "--seed", "42"];
/// let code = xidach_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    const COMMANDS: &[&str] = &[
        "play", "deal", "rules", "cfg", "players", "history", "deposit",
    ];
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match XidachCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version go to stdout and succeed
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    write_or_exit!(err, "{}", e);
                    write_or_exit!(err, "xidach: xì dách table engine");
                    write_or_exit!(err, "Usage: xidach <command> [options]\n");
                    write_or_exit!(err, "Commands:");
                    for c in COMMANDS {
                        write_or_exit!(err, "  {}", c);
                    }
                    write_or_exit!(err, "\nFor full help, run: xidach --help");
                    exit_code::ERROR
                }
            };
        }
    };

    let result = match cli.cmd {
        Commands::Play {
            bots,
            rounds,
            seed,
            strategy,
            log,
            db,
        } => {
            let opts = PlayOptions {
                bots,
                rounds,
                seed,
                strategy,
                log,
                db,
            };
            handle_play_command(&opts, out, err)
        }
        Commands::Deal { seed, players } => handle_deal_command(seed, players, out),
        Commands::Rules => handle_rules_command(out),
        Commands::Cfg => handle_cfg_command(out),
        Commands::Players { db } => handle_players_command(db.as_deref(), out),
        Commands::History { player, limit, db } => {
            handle_history_command(&player, limit, db.as_deref(), out)
        }
        Commands::Deposit { player, amount, db } => {
            handle_deposit_command(&player, amount, db.as_deref(), out)
        }
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}
