//! Single-day guessing session state machine.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::catalog::{Catalog, Entity};
use crate::compare::{Verdicts, compare, is_win};
use crate::constants::MAX_ATTEMPTS;
use crate::daily::{GameDate, PuzzleSelector};
use crate::history::GameRecord;

/// Lifecycle of a daily session. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Won,
    Lost,
}

impl SessionStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "in progress"),
            Self::Won => write!(f, "won"),
            Self::Lost => write!(f, "lost"),
        }
    }
}

/// Reasons a submission leaves the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("\"{input}\" is not a character in the catalog")]
    Unresolved { input: String },
    #[error("today's puzzle is already {status}")]
    Finished { status: SessionStatus },
}

/// One evaluated guess, ready for grid display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRow {
    pub entity: Entity,
    pub verdicts: Verdicts,
    pub winning: bool,
}

impl GuessRow {
    #[must_use]
    pub fn evaluate(guess: &Entity, mystery: &Entity) -> Self {
        Self {
            entity: guess.clone(),
            verdicts: compare(guess, mystery),
            winning: is_win(guess, mystery),
        }
    }
}

/// Result of an accepted guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessOutcome {
    pub row: GuessRow,
    pub status: SessionStatus,
    pub attempts: u32,
    /// Present exactly once per session: on the guess that ended it.
    pub record: Option<GameRecord>,
}

/// State of one calendar day's puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    date: GameDate,
    mystery: Entity,
    guesses: Vec<Entity>,
    attempts: u32,
    status: SessionStatus,
}

impl GameSession {
    /// Start a fresh session for `date`.
    #[must_use]
    pub fn start(selector: &PuzzleSelector<'_>, date: GameDate) -> Self {
        let mystery = selector.select(date).clone();
        log::debug!("session {date} started");
        Self {
            date,
            mystery,
            guesses: Vec::new(),
            attempts: 0,
            status: SessionStatus::InProgress,
        }
    }

    /// Resume a persisted session when it belongs to `today`, otherwise start
    /// over. Stale or inconsistent documents are discarded.
    #[must_use]
    pub fn resume_or_start(
        stored: Option<Self>,
        selector: &PuzzleSelector<'_>,
        today: GameDate,
    ) -> Self {
        match stored {
            Some(session) if session.date != today => {
                log::info!("discarding stale session from {} (today is {today})", session.date);
                Self::start(selector, today)
            }
            Some(session) if !session.is_consistent() => {
                log::warn!("discarding inconsistent session for {today}");
                Self::start(selector, today)
            }
            Some(session) => {
                log::debug!(
                    "resuming session {today} at attempt {} ({})",
                    session.attempts,
                    session.status
                );
                session
            }
            None => Self::start(selector, today),
        }
    }

    /// Submit raw guess text.
    ///
    /// # Errors
    ///
    /// Returns [`GuessError::Finished`] for a terminal session and
    /// [`GuessError::Unresolved`] when the text names no catalog entity. In
    /// both cases no state changes and no attempt is consumed.
    pub fn submit(
        &mut self,
        catalog: &Catalog,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<GuessOutcome, GuessError> {
        if self.status.is_terminal() {
            return Err(GuessError::Finished {
                status: self.status,
            });
        }
        let guess = catalog
            .resolve(raw)
            .ok_or_else(|| GuessError::Unresolved {
                input: raw.trim().to_string(),
            })?
            .clone();

        let row = GuessRow::evaluate(&guess, &self.mystery);
        self.guesses.push(guess);
        self.attempts += 1;

        if row.winning {
            self.status = SessionStatus::Won;
        } else if self.attempts >= MAX_ATTEMPTS {
            self.status = SessionStatus::Lost;
        }
        log::debug!(
            "session {} guess {} -> {} ({})",
            self.date,
            self.attempts,
            row.entity.name,
            self.status
        );

        let record = self.record(now);
        Ok(GuessOutcome {
            row,
            status: self.status,
            attempts: self.attempts,
            record,
        })
    }

    /// The completed-game record, once the session is terminal.
    #[must_use]
    pub fn record(&self, completed_at: DateTime<Utc>) -> Option<GameRecord> {
        self.status.is_terminal().then(|| GameRecord {
            date: self.date,
            mystery: self.mystery.clone(),
            guesses: self.guesses.clone(),
            attempts: self.attempts,
            won: self.status == SessionStatus::Won,
            completed_at,
        })
    }

    /// Evaluated rows for every guess so far.
    #[must_use]
    pub fn rows(&self) -> Vec<GuessRow> {
        self.guesses
            .iter()
            .map(|guess| GuessRow::evaluate(guess, &self.mystery))
            .collect()
    }

    #[must_use]
    pub fn has_guessed(&self, name: &str) -> bool {
        self.guesses.iter().any(|g| g.name == name)
    }

    #[must_use]
    pub const fn date(&self) -> GameDate {
        self.date
    }

    #[must_use]
    pub const fn mystery(&self) -> &Entity {
        &self.mystery
    }

    #[must_use]
    pub fn guesses(&self) -> &[Entity] {
        &self.guesses
    }

    #[must_use]
    pub fn last_guess(&self) -> Option<&Entity> {
        self.guesses.last()
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub const fn remaining_attempts(&self) -> u32 {
        MAX_ATTEMPTS.saturating_sub(self.attempts)
    }

    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    fn is_consistent(&self) -> bool {
        let Ok(count) = u32::try_from(self.guesses.len()) else {
            return false;
        };
        if count != self.attempts || count > MAX_ATTEMPTS {
            return false;
        }
        let last_wins = self
            .guesses
            .last()
            .is_some_and(|g| is_win(g, &self.mystery));
        match self.status {
            SessionStatus::Won => last_wins,
            SessionStatus::Lost => !last_wins && count == MAX_ATTEMPTS,
            SessionStatus::InProgress => !last_wins && count < MAX_ATTEMPTS,
        }
    }
}
