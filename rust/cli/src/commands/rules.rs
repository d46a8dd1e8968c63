use crate::error::CliError;
use std::io::Write;
use xidach_engine::rules::rule_list_text;

/// Prints every payout rule with its description.
pub fn handle_rules_command(out: &mut dyn Write) -> Result<(), CliError> {
    writeln!(out, "{}", rule_list_text())?;
    Ok(())
}
