//! Completed-game ledger and its derived statistics.
//!
//! The ledger holds at most one record per calendar date. Every aggregate
//! field is recomputed from the full ledger after each change, walking the
//! records in chronological date order regardless of when they were appended.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Entity;
use crate::constants::MAX_ATTEMPTS;
use crate::daily::GameDate;
use crate::numbers::percent;

/// A finished daily game. Created once, when its session turns terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub date: GameDate,
    #[serde(rename = "mysteryEntity")]
    pub mystery: Entity,
    pub guesses: Vec<Entity>,
    pub attempts: u32,
    pub won: bool,
    pub completed_at: DateTime<Utc>,
}

/// Ledger plus aggregate statistics, all derived from `games`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "LedgerDocument")]
pub struct HistoryAggregate {
    games: Vec<GameRecord>,
    total_games: u32,
    wins: u32,
    losses: u32,
    current_streak: u32,
    max_streak: u32,
}

/// Persisted form; only the ledger is trusted; aggregates are rebuilt.
#[derive(Deserialize)]
struct LedgerDocument {
    #[serde(default)]
    games: Vec<GameRecord>,
}

impl From<LedgerDocument> for HistoryAggregate {
    fn from(doc: LedgerDocument) -> Self {
        Self::from_records(doc.games)
    }
}

impl HistoryAggregate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records in any order; a later record for a date replaces an
    /// earlier one.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = GameRecord>) -> Self {
        let mut history = Self::default();
        for record in records {
            history.upsert(record);
        }
        history.recompute();
        history
    }

    /// Insert `record`, replacing any record with the same date, then
    /// recompute every aggregate.
    pub fn append(&mut self, record: GameRecord) -> &Self {
        let date = record.date;
        let replaced = self.upsert(record);
        self.recompute();
        log::debug!(
            "history {} {date}: {} games, streak {}/{}",
            if replaced { "replaced" } else { "recorded" },
            self.total_games,
            self.current_streak,
            self.max_streak
        );
        self
    }

    fn upsert(&mut self, record: GameRecord) -> bool {
        match self.games.binary_search_by_key(&record.date, |g| g.date) {
            Ok(pos) => {
                self.games[pos] = record;
                true
            }
            Err(pos) => {
                self.games.insert(pos, record);
                false
            }
        }
    }

    fn recompute(&mut self) {
        let wins = self.games.iter().filter(|g| g.won).count();
        self.total_games = count_u32(self.games.len());
        self.wins = count_u32(wins);
        self.losses = self.total_games - self.wins;
        self.current_streak = count_u32(self.games.iter().rev().take_while(|g| g.won).count());
        self.max_streak = self
            .games
            .iter()
            .fold((0_u32, 0_u32), |(run, best), game| {
                let run = if game.won { run + 1 } else { 0 };
                (run, best.max(run))
            })
            .1;
    }

    /// Records in chronological date order.
    #[must_use]
    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    #[must_use]
    pub const fn total_games(&self) -> u32 {
        self.total_games
    }

    #[must_use]
    pub const fn wins(&self) -> u32 {
        self.wins
    }

    #[must_use]
    pub const fn losses(&self) -> u32 {
        self.losses
    }

    #[must_use]
    pub const fn current_streak(&self) -> u32 {
        self.current_streak
    }

    #[must_use]
    pub const fn max_streak(&self) -> u32 {
        self.max_streak
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    #[must_use]
    pub fn record_for(&self, date: GameDate) -> Option<&GameRecord> {
        self.games
            .binary_search_by_key(&date, |g| g.date)
            .ok()
            .map(|pos| &self.games[pos])
    }

    /// Rounded percentage of games won.
    #[must_use]
    pub fn win_rate_pct(&self) -> u32 {
        percent(
            usize::try_from(self.wins).unwrap_or(usize::MAX),
            usize::try_from(self.total_games).unwrap_or(usize::MAX),
        )
    }

    /// Up to `limit` records, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &GameRecord> {
        self.games.iter().rev().take(limit)
    }

    /// Won games bucketed by attempts used; index 0 holds one-guess wins.
    #[must_use]
    pub fn guess_distribution(&self) -> [u32; MAX_ATTEMPTS as usize] {
        let mut buckets = [0_u32; MAX_ATTEMPTS as usize];
        for game in self.won_games() {
            if let Some(slot) = usize::try_from(game.attempts)
                .ok()
                .and_then(|a| a.checked_sub(1))
                .and_then(|i| buckets.get_mut(i))
            {
                *slot += 1;
            }
        }
        buckets
    }

    pub fn won_games(&self) -> impl Iterator<Item = &GameRecord> {
        self.games.iter().filter(|g| g.won)
    }
}

fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
