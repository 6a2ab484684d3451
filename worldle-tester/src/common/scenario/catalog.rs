use anyhow::{Context, Result, bail, ensure};
use std::collections::HashSet;
use worldle_game::constants::SLOT_HISTORY;
use worldle_game::{
    Catalog, GameStore, GuessError, KeyValueStore, MAX_ATTEMPTS, MemoryStore, PuzzleSelector,
    SeedFormat, SessionStatus, TurnError,
};

use super::TestScenario;
use crate::logic::game_tester::SimulationSummary;
use crate::logic::{GuessStrategy, SimulationPlan};

pub fn determinism_scenario() -> TestScenario {
    TestScenario::simulation(
        "Daily Determinism",
        SimulationPlan::new(GuessStrategy::Random)
            .with_days(14)
            .with_expectation(answers_match_selector),
    )
}

pub fn legacy_format_scenario() -> TestScenario {
    TestScenario::simulation(
        "Legacy Seed Format",
        SimulationPlan::new(GuessStrategy::Oracle)
            .with_days(7)
            .with_seed_format(SeedFormat::Legacy)
            .with_expectation(answers_match_selector),
    )
}

pub fn session_rules_scenario() -> TestScenario {
    TestScenario::simulation(
        "Session Rules",
        SimulationPlan::new(GuessStrategy::Hopeless)
            .with_days(3)
            .with_expectation(every_day_lost_at_limit)
            .with_expectation(finished_and_unknown_guesses_rejected),
    )
}

pub fn history_upsert_scenario() -> TestScenario {
    TestScenario::simulation(
        "History Upsert",
        SimulationPlan::new(GuessStrategy::Random)
            .with_days(10)
            .with_expectation(history_aggregates_consistent)
            .with_expectation(same_date_record_replaces),
    )
}

pub fn trophy_ladder_scenario() -> TestScenario {
    TestScenario::simulation(
        "Trophy Ladders",
        SimulationPlan::new(GuessStrategy::Oracle)
            .with_days(30)
            .with_expectation(ladders_reached)
            .with_expectation(unlocks_reported_once),
    )
}

pub fn share_grid_scenario() -> TestScenario {
    TestScenario::simulation(
        "Share Grid",
        SimulationPlan::new(GuessStrategy::Random)
            .with_days(7)
            .with_expectation(share_rows_match_guesses),
    )
}

fn answers_match_selector(summary: &SimulationSummary) -> Result<()> {
    let catalog = Catalog::bundled()?;
    let selector = PuzzleSelector::new(&catalog, summary.seed_format);
    for day in &summary.days {
        let expected = selector.select(day.date);
        ensure!(
            expected.name == day.mystery,
            "{} answered {} but the selector picks {}",
            day.date,
            day.mystery,
            expected.name
        );
        ensure!(
            selector.select(day.date).name == expected.name,
            "selector is not stable for {}",
            day.date
        );
    }
    Ok(())
}

fn every_day_lost_at_limit(summary: &SimulationSummary) -> Result<()> {
    for day in &summary.days {
        ensure!(
            day.status == SessionStatus::Lost && day.attempts == MAX_ATTEMPTS,
            "{} ended {} after {} guesses",
            day.date,
            day.status,
            day.attempts
        );
        let distinct: HashSet<&str> = day.guesses.iter().map(String::as_str).collect();
        ensure!(distinct.len() == day.guesses.len(), "{} repeated a guess", day.date);
        let share = day.share.as_deref().context("lost day has no share text")?;
        ensure!(
            share.lines().nth(1) == Some("X/7"),
            "loss should score X/7: {share:?}"
        );
    }
    ensure!(
        summary.history.losses() == summary.history.total_games(),
        "hopeless run recorded a win"
    );
    Ok(())
}

fn finished_and_unknown_guesses_rejected(summary: &SimulationSummary) -> Result<()> {
    let last = summary.days.last().context("no days played")?;
    let record = summary.history.record_for(last.date).context("last day missing")?;

    let mut game = summary.reopen(last.date)?;
    let answer = game.session().mystery().name.clone();
    match game.submit(&answer, record.completed_at) {
        Err(TurnError::Guess(GuessError::Finished {
            status: SessionStatus::Lost,
        })) => {}
        other => bail!("finished session accepted a guess: {other:?}"),
    }

    let next = last.date.next().context("calendar overflow")?;
    let mut fresh = summary.reopen(next)?;
    match fresh.submit("  Not A Wizard  ", record.completed_at) {
        Err(TurnError::Guess(GuessError::Unresolved { input })) => {
            ensure!(input == "Not A Wizard", "input not trimmed: {input:?}");
        }
        other => bail!("unknown name was accepted: {other:?}"),
    }
    ensure!(
        fresh.session().attempts() == 0,
        "rejected guess consumed an attempt"
    );
    Ok(())
}

fn history_aggregates_consistent(summary: &SimulationSummary) -> Result<()> {
    let history = &summary.history;
    let played = u32::try_from(summary.days.len())?;
    ensure!(
        history.total_games() == played,
        "ledger size {} != {played}",
        history.total_games()
    );
    ensure!(
        history.wins() + history.losses() == history.total_games(),
        "wins and losses do not add up"
    );
    ensure!(
        history.current_streak() <= history.max_streak() && history.max_streak() <= history.wins(),
        "streaks out of bounds: current {} max {} wins {}",
        history.current_streak(),
        history.max_streak(),
        history.wins()
    );
    let distributed: u32 = history.guess_distribution().iter().sum();
    ensure!(distributed == history.wins(), "guess distribution covers {distributed} wins");
    ensure!(
        history.games().windows(2).all(|pair| pair[0].date < pair[1].date),
        "ledger is not strictly ordered by date"
    );

    let last = summary.days.last().context("no days played")?;
    let reopened = summary.reopen(last.date)?;
    ensure!(reopened.history() == history, "persisted ledger differs from the run");
    Ok(())
}

fn same_date_record_replaces(summary: &SimulationSummary) -> Result<()> {
    let mut scratch = MemoryStore::new();
    if let Some(doc) = summary.store.raw(SLOT_HISTORY) {
        scratch.write(SLOT_HISTORY, &doc)?;
    }
    let mut store = GameStore::new(scratch);
    let first = summary.history.games().first().context("empty ledger")?;
    let mut flipped = first.clone();
    flipped.won = !flipped.won;

    let after = store.append_record(flipped)?;
    ensure!(
        after.total_games() == summary.history.total_games(),
        "same-date record was appended instead of replaced"
    );
    let replaced = after.record_for(first.date).context("record vanished")?;
    ensure!(replaced.won != first.won, "replacement did not take effect");
    ensure!(
        store.load_history()? == after,
        "persisted ledger differs from the returned aggregate"
    );
    Ok(())
}

fn ladders_reached(summary: &SimulationSummary) -> Result<()> {
    let days = u32::try_from(summary.days.len())?;
    ensure!(summary.history.current_streak() == days, "oracle streak broke");
    let trophy = |id: &str| summary.trophies.iter().find(|t| t.id == id);

    for id in [
        "streak_3",
        "streak_30",
        "wins_1",
        "wins_25",
        "perfect_game",
        "master_detective",
        "first_game",
    ] {
        let unlocked = trophy(id).is_some_and(|t| t.unlocked);
        ensure!(unlocked, "{id} should be unlocked after {days} straight wins");
    }
    let next_rung = trophy("wins_50").context("wins_50 missing")?;
    ensure!(!next_rung.unlocked, "wins_50 unlocked early");
    let progress = next_rung.progress.context("lowest locked rung has no progress")?;
    ensure!(
        progress.current == days && progress.required == 50,
        "wins_50 progress {}/{}",
        progress.current,
        progress.required
    );
    ensure!(
        trophy("wins_100").is_some_and(|t| t.progress.is_none()),
        "only the lowest locked rung should carry progress"
    );
    Ok(())
}

fn unlocks_reported_once(summary: &SimulationSummary) -> Result<()> {
    let mut reported = HashSet::new();
    for day in &summary.days {
        for id in &day.newly_unlocked {
            ensure!(reported.insert(id.as_str()), "{id} reported twice (again on {})", day.date);
        }
    }
    let unlocked: HashSet<&str> = summary
        .trophies
        .iter()
        .filter(|t| t.unlocked)
        .map(|t| t.id.as_str())
        .collect();
    ensure!(
        reported == unlocked,
        "reported unlocks {reported:?} differ from final unlocks {unlocked:?}"
    );
    Ok(())
}

fn share_rows_match_guesses(summary: &SimulationSummary) -> Result<()> {
    for day in &summary.days {
        let Some(share) = day.share.as_deref() else {
            ensure!(day.abandoned(), "{} finished without share text", day.date);
            continue;
        };
        let mut lines = share.lines();
        ensure!(
            lines.next() == Some(format!("Wizarding Worldle {}", day.date).as_str()),
            "bad header on {}",
            day.date
        );
        let score = match day.status {
            SessionStatus::Won => day.attempts.to_string(),
            _ => "X".to_string(),
        };
        ensure!(
            lines.next() == Some(format!("{score}/{MAX_ATTEMPTS}").as_str()),
            "bad score line on {}",
            day.date
        );
        ensure!(lines.next() == Some(""), "missing blank line on {}", day.date);
        let rows: Vec<&str> = lines.collect();
        ensure!(
            rows.len() == day.guesses.len(),
            "{} rows for {} guesses on {}",
            rows.len(),
            day.guesses.len(),
            day.date
        );
        for row in rows {
            ensure!(row.chars().count() == 5, "row {row:?} is not five markers");
            ensure!(
                row.chars().all(|c| c == '🟩' || c == '⬜'),
                "row {row:?} leaks more than hit/miss"
            );
        }
    }
    Ok(())
}
