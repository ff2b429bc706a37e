//! Match history leaderboard
//!
//! Every decided match appends one entry; ranking happens at read time
//! (winner score descending, newest first on ties).

use crate::consts::{LEADERBOARD_TOP_N, NAME_MAX_LEN};
use crate::persistence::FIELD_DELIMITER;
use crate::sim::MatchOutcome;

/// A single finished match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub winner: String,
    pub loser: String,
    pub winner_score: u32,
    pub loser_score: u32,
    /// Unix timestamp (seconds) when the match ended
    pub timestamp: i64,
}

impl LeaderboardEntry {
    pub fn from_outcome(outcome: &MatchOutcome, timestamp: i64) -> Self {
        Self {
            winner: outcome.winner_name.clone(),
            loser: outcome.loser_name.clone(),
            winner_score: outcome.winner_score,
            loser_score: outcome.loser_score,
            timestamp,
        }
    }
}

/// Ranked view over stored entries
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Rank `entries` for display
    pub fn new(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| {
            b.winner_score
                .cmp(&a.winner_score)
                .then(b.timestamp.cmp(&a.timestamp))
        });
        Self { entries }
    }

    /// The best `LEADERBOARD_TOP_N` entries
    pub fn top(&self) -> &[LeaderboardEntry] {
        &self.entries[..self.entries.len().min(LEADERBOARD_TOP_N)]
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Make a typed name storable: no delimiter or control characters, trimmed,
/// at most `NAME_MAX_LEN` characters. Blank input becomes `fallback`.
pub fn sanitize_name(raw: &str, fallback: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != FIELD_DELIMITER && !c.is_control())
        .take(NAME_MAX_LEN)
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Format a timestamp relative to `now` (both epoch seconds)
pub fn format_age(now: i64, timestamp: i64) -> String {
    let diff_secs = (now - timestamp).max(0);
    let mins = diff_secs / 60;
    let hours = mins / 60;
    let days = hours / 24;

    if days >= 1 {
        match days {
            1 => "Yesterday".to_string(),
            2..=6 => format!("{} days ago", days),
            7..=13 => "1 week ago".to_string(),
            _ => format!("{} weeks ago", days / 7),
        }
    } else if hours >= 1 {
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if mins >= 1 {
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(winner: &str, score: u32, ts: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            winner: winner.to_string(),
            loser: "X".to_string(),
            winner_score: score,
            loser_score: 1,
            timestamp: ts,
        }
    }

    #[test]
    fn test_ranking_score_then_recency() {
        let board = Leaderboard::new(vec![
            entry("a", 7, 100),
            entry("b", 9, 50),
            entry("c", 7, 300),
            entry("d", 5, 999),
        ]);
        let order: Vec<_> = board.entries.iter().map(|e| e.winner.as_str()).collect();
        assert_eq!(order, ["b", "c", "a", "d"]);
    }

    #[test]
    fn test_top_is_capped() {
        let board = Leaderboard::new((0..25).map(|i| entry("p", i, i as i64)).collect());
        assert_eq!(board.len(), 25);
        assert_eq!(board.top().len(), LEADERBOARD_TOP_N);
        assert_eq!(board.top()[0].winner_score, 24);
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("  Ada, Lovelace ", "Player"), "Ada Lovelace");
        assert_eq!(sanitize_name(",,,", "Player"), "Player");
        assert_eq!(sanitize_name("", "CPU"), "CPU");
        let long = "x".repeat(40);
        assert_eq!(sanitize_name(&long, "P").chars().count(), NAME_MAX_LEN);
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(1000, 990), "Just now");
        assert_eq!(format_age(1000, 1000 - 60), "1 min ago");
        assert_eq!(format_age(10_000, 10_000 - 2 * 3600), "2 hours ago");
        assert_eq!(format_age(200_000, 200_000 - 86_400), "Yesterday");
        assert_eq!(format_age(2_000_000, 2_000_000 - 3 * 86_400), "3 days ago");
        assert_eq!(format_age(5_000_000, 5_000_000 - 21 * 86_400), "3 weeks ago");
        // Clock skew never goes negative
        assert_eq!(format_age(0, 50), "Just now");
    }

    #[test]
    fn test_entry_from_outcome() {
        use crate::sim::{Score, Side};
        let names = ["L".to_string(), "R".to_string()];
        let outcome = MatchOutcome::decide(&Score { left: 3, right: 7 }, 7, &names).unwrap();
        assert_eq!(outcome.winner, Side::Right);
        let e = LeaderboardEntry::from_outcome(&outcome, 123);
        assert_eq!(e.winner, "R");
        assert_eq!(e.loser, "L");
        assert_eq!((e.winner_score, e.loser_score, e.timestamp), (7, 3, 123));
    }
}
