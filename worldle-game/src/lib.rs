//! Wizarding Worldle Game Engine
//!
//! Platform-agnostic core logic for the Wizarding Worldle daily guessing game.
//! This crate selects the daily mystery character, scores guesses, keeps the
//! completed-game ledger and derives trophies, without UI or platform-specific
//! dependencies. Persistence goes through the [`KeyValueStore`] trait.

pub mod achievements;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod constants;
pub mod daily;
pub mod history;
pub mod numbers;
pub mod preferences;
pub mod session;
pub mod share;
pub mod storage;

// Re-export commonly used types
pub use achievements::{
    AchievementEngine, Milestone, Progress, Trophy, TrophyCategory, TrophyDef, TrophyRule,
    TrophySummary, newly_unlocked, summarize,
};
pub use catalog::{Attribute, Catalog, CatalogError, Entity};
pub use compare::{AttributeVerdict, Verdict, Verdicts, compare, compare_attribute, is_win};
pub use config::{ConfigError, GameConfig};
pub use constants::MAX_ATTEMPTS;
pub use daily::{GameDate, PuzzleSelector, SeedFormat, seed_hash};
pub use history::{GameRecord, HistoryAggregate};
pub use preferences::Preferences;
pub use session::{GameSession, GuessError, GuessOutcome, GuessRow, SessionStatus};
pub use share::share_text;
pub use storage::{GameStore, KeyValueStore, MemoryStore, MemoryStoreError, StoreError};

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures from [`DailyGame::submit`].
#[derive(Debug, Error)]
pub enum TurnError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Guess(#[from] GuessError),
    #[error(transparent)]
    Store(#[from] StoreError<E>),
}

/// Everything a front end needs after an accepted guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub row: GuessRow,
    pub status: SessionStatus,
    pub attempts: u32,
    pub remaining: u32,
    /// Set on the guess that ended the session.
    pub record: Option<GameRecord>,
    /// Trophies earned by this session; only populated when it ends.
    pub newly_unlocked: Vec<Trophy>,
}

/// Main game engine tying the daily session to persistence and trophies.
pub struct DailyGame<S>
where
    S: KeyValueStore,
{
    catalog: Catalog,
    config: GameConfig,
    achievements: AchievementEngine,
    store: GameStore<S>,
    session: GameSession,
    history: HistoryAggregate,
    baseline: Vec<Trophy>,
}

impl<S> DailyGame<S>
where
    S: KeyValueStore,
{
    /// Open the game for `today`, resuming a stored session from the same day.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the fresh session
    /// cannot be saved.
    pub fn open(
        catalog: Catalog,
        config: GameConfig,
        backend: S,
        today: GameDate,
    ) -> Result<Self, StoreError<S::Error>> {
        let store = GameStore::new(backend);
        let history = store.load_history()?;
        let stored = store.load_session(catalog.fingerprint())?;
        let selector = PuzzleSelector::new(&catalog, config.seed_format);
        let session = GameSession::resume_or_start(stored, &selector, today);
        let mut game = Self {
            catalog,
            config,
            achievements: AchievementEngine::standard(),
            store,
            session,
            history,
            baseline: Vec::new(),
        };
        game.settle_session()?;
        Ok(game)
    }

    /// Move to `today` if the calendar has rolled over since the session began.
    /// Returns whether a new session was started.
    ///
    /// # Errors
    ///
    /// Returns an error if the new session cannot be saved.
    pub fn roll_over(&mut self, today: GameDate) -> Result<bool, StoreError<S::Error>> {
        if self.session.date() == today {
            return Ok(false);
        }
        log::info!("day rolled over from {} to {today}", self.session.date());
        self.session = GameSession::start(&self.selector(), today);
        self.settle_session()?;
        Ok(true)
    }

    /// Submit raw guess text for today's puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::Guess`] when the guess is rejected and
    /// [`TurnError::Store`] when persisting the result fails. Either way the
    /// in-memory session is left as it was, so the guess can be retried.
    pub fn submit(
        &mut self,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<TurnReport, TurnError<S::Error>> {
        let mut next = self.session.clone();
        let outcome = next.submit(&self.catalog, raw, now)?;
        let history = match outcome.record.clone() {
            Some(record) => Some(self.store.append_record(record)?),
            None => None,
        };
        self.store.save_session(&next, self.catalog.fingerprint())?;
        self.session = next;

        let mut newly = Vec::new();
        if let Some(history) = history {
            self.history = history;
            newly = newly_unlocked(&self.baseline, &self.trophies());
            for trophy in &newly {
                log::info!("trophy unlocked: {} ({})", trophy.name, trophy.id);
            }
        }
        Ok(TurnReport {
            row: outcome.row,
            status: outcome.status,
            attempts: outcome.attempts,
            remaining: self.session.remaining_attempts(),
            record: outcome.record,
            newly_unlocked: newly,
        })
    }

    /// Trophies derived from the current history.
    #[must_use]
    pub fn trophies(&self) -> Vec<Trophy> {
        self.achievements.evaluate(&self.history)
    }

    /// Trophies unlocked since the baseline taken at the start of this session.
    #[must_use]
    pub fn unlocked_since_baseline(&self) -> Vec<Trophy> {
        newly_unlocked(&self.baseline, &self.trophies())
    }

    /// Share text once today's session is over.
    #[must_use]
    pub fn share_text(&self) -> Option<String> {
        share::share_text(&self.config.title, &self.session)
    }

    /// Most recent completed games, newest first, limited by configuration.
    pub fn recent_games(&self) -> impl Iterator<Item = &GameRecord> {
        self.history.recent(self.config.recent_games_limit)
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn preferences(&self) -> Result<Preferences, StoreError<S::Error>> {
        self.store.load_preferences()
    }

    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn set_preferences(
        &mut self,
        preferences: Preferences,
    ) -> Result<(), StoreError<S::Error>> {
        self.store.save_preferences(preferences)
    }

    /// Erase every persisted slot and start today's puzzle from scratch.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects a removal or the new session
    /// cannot be saved.
    pub fn reset(&mut self, today: GameDate) -> Result<(), StoreError<S::Error>> {
        self.store.clear_all()?;
        self.history = HistoryAggregate::new();
        self.session = GameSession::start(&self.selector(), today);
        self.settle_session()
    }

    #[must_use]
    pub const fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub const fn history(&self) -> &HistoryAggregate {
        &self.history
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn achievements(&self) -> &AchievementEngine {
        &self.achievements
    }

    #[must_use]
    pub fn into_backend(self) -> S {
        self.store.into_backend()
    }

    fn selector(&self) -> PuzzleSelector<'_> {
        PuzzleSelector::new(&self.catalog, self.config.seed_format)
    }

    /// Persist the current session and load or capture its trophy baseline.
    /// A session with no guesses yet takes a fresh snapshot.
    fn settle_session(&mut self) -> Result<(), StoreError<S::Error>> {
        if self.session.attempts() == 0 {
            self.baseline = self.trophies();
            self.store.save_baseline(&self.baseline)?;
        } else {
            self.baseline = self.store.load_baseline()?;
        }
        self.store
            .save_session(&self.session, self.catalog.fingerprint())
    }
}
