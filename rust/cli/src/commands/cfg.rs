//! `cfg`: prints the resolved configuration as pretty JSON.
//!
//! ```json
//! {
//!   "max_bet": {
//!     "value": 200,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::load_with_sources()?;
    let display = serde_json::json!({
        "max_bet": {
            "value": config.max_bet,
            "source": sources.max_bet,
        },
        "min_deal": {
            "value": config.min_deal,
            "source": sources.min_deal,
        },
        "turn_timeout_secs": {
            "value": config.turn_timeout_secs,
            "source": sources.turn_timeout_secs,
        },
        "initial_balance": {
            "value": config.initial_balance,
            "source": sources.initial_balance,
        },
        "rule": {
            "value": config.rule,
            "source": sources.rule,
        },
        "db": {
            "value": config.db,
            "source": sources.db,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
