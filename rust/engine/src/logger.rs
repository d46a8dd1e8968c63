use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::hand::HandKind;
use crate::round::Round;

/// Outcome of one seat in a finished round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub round_id: String,
    pub player_id: String,
    pub name: String,
    /// Signed reward booked for this seat
    pub reward: i64,
    pub kind: HandKind,
    pub value: u8,
    pub is_dealer: bool,
    /// Timestamp when the round was recorded (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

/// A seat's cards as they stood at the end of the round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatCards {
    pub player_id: String,
    pub cards: Vec<Card>,
}

/// Complete record of one round, one JSON line per round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round_id: String,
    pub rule_id: String,
    /// Participants followed by the dealer
    pub seats: Vec<SeatCards>,
    pub results: Vec<SettlementRecord>,
    #[serde(default)]
    pub ts: Option<String>,
}

impl RoundSummary {
    pub fn from_round(round: &Round) -> Self {
        let seats = round
            .all_participants()
            .iter()
            .map(|p| SeatCards {
                player_id: p.id().to_string(),
                cards: p.cards(),
            })
            .collect();
        Self {
            round_id: round.id().to_string(),
            rule_id: round.rule().id.clone(),
            seats,
            results: round.results(),
            ts: None,
        }
    }

    /// Sum of every booked reward; zero for a fully settled round.
    pub fn net(&self) -> i64 {
        self.results.iter().map(|r| r.reward).sum()
    }
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Appends [`RoundSummary`] lines to a JSONL file.
pub struct RoundLogger {
    writer: Option<BufWriter<File>>,
}

impl RoundLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                let _ = create_dir_all(parent);
            }
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
        })
    }

    /// A logger that serializes but writes nowhere.
    pub fn disabled() -> Self {
        Self { writer: None }
    }

    pub fn write(&mut self, summary: &RoundSummary) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = summary.clone();
        let ts = rec.ts.get_or_insert_with(timestamp).clone();
        for r in &mut rec.results {
            if r.ts.is_none() {
                r.ts = Some(ts.clone());
            }
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
