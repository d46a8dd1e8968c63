use xidach_cli::run;
use xidach_engine::logger::RoundSummary;

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let mut argv = vec!["xidach"];
    argv.extend_from_slice(args);
    let code = run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

#[test]
fn help_lists_every_command() {
    let (code, stdout, _) = run_cli(&["--help"]);
    assert_eq!(code, 0);
    for cmd in ["play", "deal", "rules", "cfg", "players", "history", "deposit"] {
        assert!(stdout.contains(cmd), "missing {cmd} in help:\n{stdout}");
    }
}

#[test]
fn unknown_command_prints_usage_to_stderr() {
    let (code, stdout, stderr) = run_cli(&["shuffle"]);
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Usage: xidach <command> [options]"));
    assert!(stderr.contains("  deposit"));
}

#[test]
fn rules_lists_both_tables() {
    let (code, stdout, _) = run_cli(&["rules"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Rules:"));
    assert!(stdout.contains("Rule: Hai Dinh, ID: 1"));
    assert!(stdout.contains("Rule: Normal, ID: 2"));
}

#[test]
fn deal_is_reproducible_with_a_seed() {
    let first = run_cli(&["deal", "--seed", "42", "--players", "4"]);
    let second = run_cli(&["deal", "--seed", "42", "--players", "4"]);
    assert_eq!(first.0, 0);
    assert_eq!(first.1, second.1);
    assert!(first.1.contains("Player 4: "));
    assert!(first.1.contains("Remaining: 42"));
}

#[test]
fn deal_rejects_an_oversized_table() {
    let (code, _, stderr) = run_cli(&["deal", "--players", "26"]);
    assert_eq!(code, 2);
    assert!(stderr.starts_with("Error: Invalid input"));
}

#[test]
fn play_runs_rounds_and_prints_balances() {
    let (code, stdout, stderr) = run_cli(&[
        "play", "--bots", "3", "--rounds", "5", "--seed", "42", "--strategy", "cautious",
    ]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.starts_with("play: bots=3 rounds=5 strategy=CautiousBot seed=42"));
    for n in 1..=5 {
        assert!(stdout.contains(&format!("Round {n}/5 (")));
    }
    assert_eq!(stdout.matches("\nRewards:").count(), 5);
    let balances = stdout.split("\nBalances:\n").nth(1).unwrap();
    assert_eq!(balances.lines().count(), 5, "header, dealer and three bots");
}

#[test]
fn seeded_play_ends_with_the_same_balances() {
    let args = [
        "play", "--bots", "4", "--rounds", "8", "--seed", "7", "--strategy", "baseline",
    ];
    let balances = |stdout: String| stdout.split("\nBalances:\n").nth(1).unwrap().to_string();
    let (_, first, _) = run_cli(&args);
    let (_, second, _) = run_cli(&args);
    assert_eq!(balances(first), balances(second));
}

#[test]
fn play_rejects_bad_arguments() {
    let (code, _, stderr) = run_cli(&["play", "--strategy", "psychic"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Unknown bot strategy: psychic"));

    let (code, _, stderr) = run_cli(&["play", "--bots", "0"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("bots must be between 1 and 9"));

    let (code, _, _) = run_cli(&["play", "--rounds", "0"]);
    assert_eq!(code, 2);
}

#[test]
fn play_log_writes_one_zero_sum_line_per_round() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("logs").join("rounds.jsonl");
    let (code, _, stderr) = run_cli(&[
        "play",
        "--bots",
        "2",
        "--rounds",
        "3",
        "--seed",
        "9",
        "--log",
        log.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr: {stderr}");

    let content = std::fs::read_to_string(&log).unwrap();
    let summaries: Vec<RoundSummary> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(summaries.len(), 3);
    for s in &summaries {
        assert_eq!(s.net(), 0);
        assert_eq!(s.results.len(), 3);
        assert!(s.ts.is_some());
    }
}
