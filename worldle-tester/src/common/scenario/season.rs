use anyhow::{Result, ensure};
use worldle_game::{MAX_ATTEMPTS, summarize};

use super::TestScenario;
use crate::logic::game_tester::SimulationSummary;
use crate::logic::{GuessStrategy, SimulationPlan};

pub const SEASON_DAYS: u32 = 90;

/// Days per run in the playability sweep.
pub const PLAYABILITY_DAYS: u32 = 30;

pub fn season_scenario() -> TestScenario {
    TestScenario::simulation(
        "Season",
        SimulationPlan::new(GuessStrategy::Eliminator)
            .with_days(SEASON_DAYS)
            .with_expectation(season_completes),
    )
}

pub fn season_plan(strategy: GuessStrategy) -> SimulationPlan {
    SimulationPlan::new(strategy).with_days(PLAYABILITY_DAYS)
}

fn season_completes(summary: &SimulationSummary) -> Result<()> {
    let days = u32::try_from(summary.days.len())?;
    ensure!(days == SEASON_DAYS, "season stopped after {days} days");
    ensure!(summary.metrics.abandoned == 0, "solver gave up on a live puzzle");
    ensure!(
        summary.history.total_games() == SEASON_DAYS,
        "ledger holds {} games",
        summary.history.total_games()
    );
    ensure!(
        summary.days.iter().all(|d| d.attempts <= MAX_ATTEMPTS),
        "a day exceeded the guess limit"
    );
    let (overall, _) = summarize(&summary.trophies);
    ensure!(
        u32::try_from(overall.unlocked)? == summary.metrics.trophies_unlocked,
        "trophy summary disagrees with run metrics"
    );
    Ok(())
}

pub fn oracle_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.metrics.wins == summary.metrics.days_played,
        "oracle lost {} of {} days",
        summary.metrics.losses,
        summary.metrics.days_played
    );
    Ok(())
}

pub fn hopeless_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.metrics.wins == 0, "hopeless strategy won a day");
    ensure!(summary.history.max_streak() == 0, "losses built a streak");
    Ok(())
}

pub fn solver_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.metrics.abandoned == 0, "strategy gave up on a live puzzle");
    Ok(())
}
