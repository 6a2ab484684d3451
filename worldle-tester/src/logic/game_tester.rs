use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, TimeZone, Utc};
use colored::Colorize;
use std::sync::Arc;
use worldle_game::{
    Catalog, DailyGame, GameConfig, GameDate, HistoryAggregate, MemoryStore, SeedFormat,
    SessionStatus, Trophy,
};
use worldle_game::numbers::ratio;

use crate::logic::dates::offset_date;
use crate::logic::policy::GuessStrategy;

/// Hour (UTC) at which simulated players submit their guesses.
const SUBMIT_HOUR: u32 = 20;

/// Declarative description of a scripted run of consecutive days.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: GuessStrategy,
    pub days: u32,
    pub seed_format: SeedFormat,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(strategy: GuessStrategy) -> Self {
        Self {
            strategy,
            days: 1,
            seed_format: SeedFormat::Iso,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    #[must_use]
    pub const fn with_seed_format(mut self, seed_format: SeedFormat) -> Self {
        self.seed_format = seed_format;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// What happened on one simulated day.
#[derive(Debug, Clone)]
pub struct DayOutcome {
    pub date: GameDate,
    pub mystery: String,
    pub status: SessionStatus,
    pub attempts: u32,
    pub guesses: Vec<String>,
    pub share: Option<String>,
    pub newly_unlocked: Vec<String>,
}

impl DayOutcome {
    /// The policy stopped guessing before the session ended.
    #[must_use]
    pub const fn abandoned(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// Per-run numbers fed into playability aggregates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayabilityMetrics {
    pub days_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub abandoned: u32,
    pub win_attempts: u32,
    pub mean_attempts_to_win: f64,
    pub max_streak: u32,
    pub current_streak: u32,
    pub trophies_unlocked: u32,
}

impl PlayabilityMetrics {
    fn record_day(&mut self, day: &DayOutcome) {
        self.days_played += 1;
        match day.status {
            SessionStatus::Won => {
                self.wins += 1;
                self.win_attempts += day.attempts;
            }
            SessionStatus::Lost => self.losses += 1,
            SessionStatus::InProgress => self.abandoned += 1,
        }
    }

    fn finalize(&mut self, history: &HistoryAggregate, trophies: &[Trophy]) {
        self.mean_attempts_to_win = if self.wins == 0 {
            0.0
        } else {
            f64::from(self.win_attempts) / f64::from(self.wins)
        };
        self.max_streak = history.max_streak();
        self.current_streak = history.current_streak();
        self.trophies_unlocked =
            u32::try_from(trophies.iter().filter(|t| t.unlocked).count()).unwrap_or(u32::MAX);
    }

    #[must_use]
    pub fn win_rate(&self) -> f64 {
        ratio(self.wins, self.wins + self.losses)
    }
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub start: GameDate,
    pub seed: u64,
    pub strategy: GuessStrategy,
    pub seed_format: SeedFormat,
    pub days: Vec<DayOutcome>,
    pub metrics: PlayabilityMetrics,
    pub history: HistoryAggregate,
    pub trophies: Vec<Trophy>,
    /// The slots the run persisted into, for follow-up inspection.
    pub store: MemoryStore,
}

impl SimulationSummary {
    /// Fresh engine over the run's store, opened on `today`.
    pub fn reopen(&self, today: GameDate) -> Result<DailyGame<MemoryStore>> {
        let catalog = Catalog::bundled().context("loading bundled catalog")?;
        let config = GameConfig {
            seed_format: self.seed_format,
            ..GameConfig::default()
        };
        DailyGame::open(catalog, config, self.store.clone(), today)
            .map_err(|err| anyhow!("reopening store on {today}: {err}"))
    }
}

/// Headless deterministic runner for the daily game.
#[derive(Clone)]
pub struct GameTester {
    verbose: bool,
    catalog: Arc<Catalog>,
}

impl GameTester {
    pub fn try_new(verbose: bool) -> Result<Self> {
        let catalog = Catalog::bundled().context("loading bundled catalog")?;
        for name in catalog.duplicate_names() {
            log::debug!("catalog repeats {name}; guesses resolve to the first entry");
        }
        Ok(Self {
            verbose,
            catalog: Arc::new(catalog),
        })
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Play `plan.days` consecutive days from `start` against a fresh store.
    pub fn run_plan(
        &self,
        plan: &SimulationPlan,
        start: GameDate,
        seed: u64,
    ) -> Result<SimulationSummary> {
        let store = MemoryStore::new();
        let config = GameConfig {
            seed_format: plan.seed_format,
            ..GameConfig::default()
        };
        config.validate()?;

        let mut days = Vec::new();
        let mut metrics = PlayabilityMetrics::default();
        let mut last_game = None;

        for offset in 0..plan.days {
            let date = offset_date(start, u64::from(offset))?;
            let day_seed = seed.wrapping_add(u64::from(offset));
            let catalog = self.catalog().clone();
            let mut game = DailyGame::open(catalog, config.clone(), store.clone(), date)
                .map_err(|err| anyhow!("opening {date}: {err}"))?;
            let outcome = self.play_day(&mut game, plan.strategy, day_seed)?;
            metrics.record_day(&outcome);
            days.push(outcome);
            last_game = Some(game);
        }

        let (history, trophies) = match &last_game {
            Some(game) => (game.history().clone(), game.trophies()),
            None => (HistoryAggregate::new(), Vec::new()),
        };
        metrics.finalize(&history, &trophies);

        Ok(SimulationSummary {
            start,
            seed,
            strategy: plan.strategy,
            seed_format: plan.seed_format,
            days,
            metrics,
            history,
            trophies,
            store,
        })
    }

    fn play_day(
        &self,
        game: &mut DailyGame<MemoryStore>,
        strategy: GuessStrategy,
        seed: u64,
    ) -> Result<DayOutcome> {
        let date = game.session().date();
        let now = submit_time(date)?;
        let mut policy = strategy.create_policy(seed);
        let mut newly_unlocked = Vec::new();

        while !game.session().status().is_terminal() {
            let Some(decision) = policy.next_guess(game.catalog(), game.session()) else {
                log::debug!("{} gave up on {date}", policy.name());
                break;
            };
            let report = game.submit(&decision.name, now).map_err(|err| {
                anyhow!("{} guessing {:?} on {date}: {err}", policy.name(), decision.name)
            })?;
            if self.verbose {
                println!(
                    "  🪄 {date} guess {}: {} ({})",
                    report.attempts,
                    decision.name,
                    decision.rationale.as_deref().unwrap_or("-")
                );
            }
            newly_unlocked.extend(report.newly_unlocked.into_iter().map(|t| t.id));
        }

        let session = game.session();
        if self.verbose {
            let status = match session.status() {
                SessionStatus::Won => "won".green(),
                SessionStatus::Lost => "lost".red(),
                SessionStatus::InProgress => "abandoned".yellow(),
            };
            println!(
                "  📅 {date}: {status} in {} (answer {})",
                session.attempts(),
                session.mystery().name
            );
        }

        Ok(DayOutcome {
            date,
            mystery: session.mystery().name.clone(),
            status: session.status(),
            attempts: session.attempts(),
            guesses: session.guesses().iter().map(|g| g.name.clone()).collect(),
            share: game.share_text(),
            newly_unlocked,
        })
    }
}

fn submit_time(date: GameDate) -> Result<DateTime<Utc>> {
    let naive = date
        .naive()
        .and_hms_opt(SUBMIT_HOUR, 0, 0)
        .with_context(|| format!("no {SUBMIT_HOUR}:00 on {date}"))?;
    Ok(Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan(day: u32) -> GameDate {
        GameDate::from_ymd(2024, 1, day).unwrap()
    }

    #[test]
    fn oracle_run_wins_every_day() {
        let tester = GameTester::try_new(false).unwrap();
        let plan = SimulationPlan::new(GuessStrategy::Oracle).with_days(5);
        let summary = tester.run_plan(&plan, jan(1), 7).unwrap();
        assert_eq!(summary.days.len(), 5);
        assert_eq!(summary.metrics.wins, 5);
        assert!((summary.metrics.mean_attempts_to_win - 1.0).abs() < f64::EPSILON);
        assert_eq!(summary.history.current_streak(), 5);
        assert_eq!(summary.days[4].date, jan(5));
        assert!(summary.days.iter().all(|d| d.share.is_some()));
    }

    #[test]
    fn hopeless_run_loses_and_persists() {
        let tester = GameTester::try_new(false).unwrap();
        let plan = SimulationPlan::new(GuessStrategy::Hopeless).with_days(2);
        let summary = tester.run_plan(&plan, jan(10), 0).unwrap();
        assert_eq!(summary.metrics.losses, 2);
        assert!(summary.metrics.win_rate().abs() < f64::EPSILON);
        let reopened = summary.reopen(jan(12)).unwrap();
        assert_eq!(reopened.history().total_games(), 2);
    }

    #[test]
    fn zero_day_plan_yields_empty_summary() {
        let tester = GameTester::try_new(false).unwrap();
        let plan = SimulationPlan::new(GuessStrategy::Oracle).with_days(0);
        let summary = tester.run_plan(&plan, jan(1), 0).unwrap();
        assert!(summary.days.is_empty());
        assert!(summary.history.is_empty());
        assert_eq!(summary.metrics, PlayabilityMetrics::default());
    }

    #[test]
    fn first_day_reports_first_trophies() {
        let tester = GameTester::try_new(false).unwrap();
        let plan = SimulationPlan::new(GuessStrategy::Oracle);
        let summary = tester.run_plan(&plan, jan(15), 0).unwrap();
        let unlocked = &summary.days[0].newly_unlocked;
        assert!(unlocked.iter().any(|id| id == "wins_1"));
        assert!(unlocked.iter().any(|id| id == "perfect_game"));
    }
}
