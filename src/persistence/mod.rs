//! Leaderboard flat-file store
//!
//! One record per line, five comma-separated fields:
//! `winner,loser,winner_score,loser_score,timestamp`.
//!
//! - Appends only; nothing is rewritten in place
//! - Reading stops at the first line that is not a well-formed record,
//!   keeping everything parsed before it

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::{MAX_LEADER_ENTRIES, NAME_MAX_LEN};
use crate::leaderboard::LeaderboardEntry;

/// Field separator in the leaderboard file
pub const FIELD_DELIMITER: char = ',';

/// Errors from reading or writing the leaderboard file
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("leaderboard I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: &'static str },

    #[error("name {0:?} cannot be stored (empty, too long or contains a delimiter)")]
    InvalidName(String),
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= NAME_MAX_LEN
        && !name.contains(FIELD_DELIMITER)
        && !name.contains(['\n', '\r'])
}

/// Encode an entry as one line (without the trailing newline)
pub fn encode_entry(entry: &LeaderboardEntry) -> Result<String, PersistenceError> {
    for name in [&entry.winner, &entry.loser] {
        if !valid_name(name) {
            return Err(PersistenceError::InvalidName(name.clone()));
        }
    }
    Ok(format!(
        "{}{d}{}{d}{}{d}{}{d}{}",
        entry.winner,
        entry.loser,
        entry.winner_score,
        entry.loser_score,
        entry.timestamp,
        d = FIELD_DELIMITER
    ))
}

/// Parse one record; `line` is the 1-based line number for error reports
pub fn parse_line(text: &str, line: usize) -> Result<LeaderboardEntry, PersistenceError> {
    let malformed = |reason| PersistenceError::Malformed { line, reason };

    let fields: Vec<&str> = text.trim_end_matches('\r').split(FIELD_DELIMITER).collect();
    let [winner, loser, winner_score, loser_score, timestamp] = fields[..] else {
        return Err(malformed("expected 5 fields"));
    };
    if !valid_name(winner) || !valid_name(loser) {
        return Err(malformed("bad player name"));
    }
    Ok(LeaderboardEntry {
        winner: winner.to_string(),
        loser: loser.to_string(),
        winner_score: winner_score
            .trim()
            .parse()
            .map_err(|_| malformed("bad winner score"))?,
        loser_score: loser_score
            .trim()
            .parse()
            .map_err(|_| malformed("bad loser score"))?,
        timestamp: timestamp
            .trim()
            .parse()
            .map_err(|_| malformed("bad timestamp"))?,
    })
}

/// Parse records in file order, stopping at the first malformed line.
/// Only the last `max` records are kept, so new results stay visible.
pub fn parse_records(text: &str, max: usize) -> Vec<LeaderboardEntry> {
    let mut entries = VecDeque::with_capacity(max.min(64));
    for (i, line) in text.lines().enumerate() {
        match parse_line(line, i + 1) {
            Ok(entry) => {
                if max == 0 {
                    continue;
                }
                if entries.len() == max {
                    entries.pop_front();
                }
                entries.push_back(entry);
            }
            Err(e) => {
                log::warn!("Leaderboard truncated: {}", e);
                break;
            }
        }
    }
    entries.into()
}

/// Append-only leaderboard file
#[derive(Debug, Clone)]
pub struct LeaderboardStore {
    path: PathBuf,
}

impl LeaderboardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file if needed
    pub fn append(&self, entry: &LeaderboardEntry) -> Result<(), PersistenceError> {
        let line = encode_entry(entry)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        log::info!(
            "Recorded {} {}-{} {}",
            entry.winner,
            entry.winner_score,
            entry.loser_score,
            entry.loser
        );
        Ok(())
    }

    /// Load the most recent `MAX_LEADER_ENTRIES` records. A missing or
    /// unreadable file reads as empty.
    pub fn load(&self) -> Vec<LeaderboardEntry> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                let entries = parse_records(&text, MAX_LEADER_ENTRIES);
                log::info!("Loaded {} leaderboard entries", entries.len());
                entries
            }
            Err(e) => {
                log::info!("No leaderboard at {} ({})", self.path.display(), e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(winner: &str, loser: &str, ws: u32, ls: u32, ts: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            winner: winner.to_string(),
            loser: loser.to_string(),
            winner_score: ws,
            loser_score: ls,
            timestamp: ts,
        }
    }

    fn temp_store(tag: &str) -> LeaderboardStore {
        let path = std::env::temp_dir().join(format!(
            "term-pong-{}-{}-{}.txt",
            tag,
            std::process::id(),
            crate::now_epoch_secs()
        ));
        let _ = std::fs::remove_file(&path);
        LeaderboardStore::new(path)
    }

    #[test]
    fn test_encode_line() {
        let line = encode_entry(&entry("Ana", "Bo", 7, 3, 1700000000)).unwrap();
        assert_eq!(line, "Ana,Bo,7,3,1700000000");
    }

    #[test]
    fn test_encode_rejects_delimiter_in_name() {
        let err = encode_entry(&entry("A,na", "Bo", 7, 3, 1)).unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidName(_)));
    }

    #[test]
    fn test_parse_line_shapes() {
        assert_eq!(
            parse_line("Ana,Bo,7,3,1700000000", 1).unwrap(),
            entry("Ana", "Bo", 7, 3, 1700000000)
        );
        assert!(parse_line("Ana,Bo,7,3", 1).is_err());
        assert!(parse_line("Ana,Bo,7,3,1,extra", 1).is_err());
        assert!(parse_line("Ana,Bo,seven,3,1", 1).is_err());
        assert!(parse_line(",Bo,7,3,1", 1).is_err());
        assert!(parse_line("", 1).is_err());
    }

    #[test]
    fn test_parse_stops_at_first_bad_line() {
        let text = "A,B,7,1,10\nC,D,7,2,20\ngarbage\nE,F,7,3,30\n";
        let entries = parse_records(text, 100);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].winner, "C");
    }

    #[test]
    fn test_parse_keeps_newest_under_cap() {
        let text: String = (0..10).map(|i| format!("A,B,7,1,{}\n", i)).collect();
        let entries = parse_records(&text, 4);
        let stamps: Vec<i64> = entries.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, [6, 7, 8, 9]);
        assert!(parse_records(&text, 0).is_empty());
    }

    #[test]
    fn test_store_roundtrip() {
        let store = temp_store("roundtrip");
        assert!(store.load().is_empty());

        let written = vec![
            entry("Ana", "CPU", 7, 3, 100),
            entry("CPU 1", "CPU 2", 7, 6, 200),
            entry("Player 2", "Player 1", 7, 0, 300),
        ];
        for e in &written {
            store.append(e).unwrap();
        }
        assert_eq!(store.load(), written);

        // Loads in between appends see a prefix, never a torn record
        store.append(&entry("Zed", "Ana", 7, 5, 400)).unwrap();
        let loaded = store.load();
        assert_eq!(loaded.len(), 4);
        assert_eq!(&loaded[..3], &written[..]);

        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn test_result_past_read_cap_still_ranks() {
        let store = temp_store("cap");
        for ts in 0..MAX_LEADER_ENTRIES as i64 {
            store.append(&entry("Old", "Bo", 7, 1, ts)).unwrap();
        }
        store.append(&entry("Newest", "Bo", 7, 6, 10_000)).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), MAX_LEADER_ENTRIES);
        assert_eq!(loaded.last().map(|e| e.winner.as_str()), Some("Newest"));

        let board = crate::leaderboard::Leaderboard::new(loaded);
        assert_eq!(board.top()[0].winner, "Newest");

        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn test_append_to_unwritable_path_fails_cleanly() {
        let path = std::env::temp_dir().join("no-such-dir-term-pong/x/scores.txt");
        let store = LeaderboardStore::new(path);
        assert!(matches!(
            store.append(&entry("A", "B", 7, 1, 1)),
            Err(PersistenceError::Io(_))
        ));
        assert!(store.load().is_empty());
    }
}
