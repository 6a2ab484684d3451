use anyhow::{Context, Result, ensure};
use worldle_game::{GuessError, SessionStatus, TurnError};

use super::TestScenario;
use crate::logic::game_tester::SimulationSummary;
use crate::logic::{GuessStrategy, SimulationPlan};

pub fn smoke_scenario() -> TestScenario {
    TestScenario::simulation(
        "Smoke",
        SimulationPlan::new(GuessStrategy::Oracle).with_expectation(smoke_expectation),
    )
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    let day = summary.days.first().context("smoke run played no days")?;
    ensure!(day.status == SessionStatus::Won, "oracle should win, got {}", day.status);
    ensure!(day.attempts == 1, "oracle took {} guesses", day.attempts);

    let share = day.share.as_deref().context("finished day has no share text")?;
    let header = format!("Wizarding Worldle {}\n1/7\n\n", day.date);
    ensure!(share.starts_with(&header), "unexpected share header: {share:?}");

    ensure!(
        summary.history.total_games() == 1 && summary.history.wins() == 1,
        "history should hold exactly one win"
    );

    let mut reopened = summary.reopen(day.date)?;
    ensure!(
        reopened.session().status() == SessionStatus::Won,
        "same-day reopen lost the finished session"
    );
    let answer = reopened.session().mystery().name.clone();
    let now = summary
        .history
        .games()
        .first()
        .map(|record| record.completed_at)
        .context("win was not recorded")?;
    match reopened.submit(&answer, now) {
        Err(TurnError::Guess(GuessError::Finished { .. })) => {}
        other => anyhow::bail!("guess after a win should be refused, got {other:?}"),
    }
    ensure!(
        reopened.history().total_games() == 1,
        "refused guess changed the ledger"
    );
    Ok(())
}
