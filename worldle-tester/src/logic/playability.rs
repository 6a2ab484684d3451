use anyhow::{Context, Result, ensure};
use std::collections::BTreeMap;

use crate::common::scenario::season::{
    hopeless_expectation, oracle_expectation, season_plan, solver_expectation,
};
use crate::logic::dates::{DateInfo, offset_date};
use crate::logic::{GameTester, GuessStrategy, PlayabilityMetrics, SimulationPlan};

#[derive(Debug, Clone)]
pub struct PlayabilityRecord {
    pub scenario_name: String,
    pub strategy: GuessStrategy,
    pub start_date: String,
    pub seed: u64,
    pub metrics: PlayabilityMetrics,
}

#[derive(Debug, Clone)]
pub struct PlayabilityAggregate {
    pub scenario_name: String,
    pub strategy: GuessStrategy,
    pub iterations: usize,
    pub mean_win_rate: f64,
    pub std_win_rate: f64,
    pub mean_attempts_to_win: f64,
    pub std_attempts_to_win: f64,
    pub mean_max_streak: f64,
    pub best_max_streak: u32,
    pub mean_trophies: f64,
    pub abandoned_days: u32,
}

pub fn run_playability_analysis(
    tester: &GameTester,
    dates: &[DateInfo],
    iterations: usize,
) -> Result<Vec<PlayabilityRecord>> {
    run_playability_analysis_with(tester, dates, iterations, |strategy| {
        add_expectations(season_plan(strategy), strategy)
    })
}

fn run_playability_analysis_with<F>(
    tester: &GameTester,
    dates: &[DateInfo],
    iterations: usize,
    mut plan_builder: F,
) -> Result<Vec<PlayabilityRecord>>
where
    F: FnMut(GuessStrategy) -> SimulationPlan,
{
    let iterations = iterations.max(1);
    let mut records = Vec::with_capacity(dates.len() * GuessStrategy::ALL.len() * iterations);

    for strategy in GuessStrategy::ALL {
        for date in dates {
            for iteration in 0..iterations {
                let offset = u64::try_from(iteration).unwrap_or(0);
                let iteration_seed = date.seed().wrapping_add(offset);
                let start = offset_date(date.date, offset)?;
                let plan = plan_builder(strategy);
                let summary = tester.run_plan(&plan, start, iteration_seed)?;
                let context = format!(
                    "Playability expectation failed for strategy {strategy}, start {start} (iteration {})",
                    iteration + 1
                );
                for expectation in &plan.expectations {
                    expectation
                        .evaluate(&summary)
                        .with_context(|| context.clone())?;
                }

                records.push(PlayabilityRecord {
                    scenario_name: format!("{strategy} - {} days", plan.days),
                    strategy,
                    start_date: start.to_string(),
                    seed: iteration_seed,
                    metrics: summary.metrics,
                });
            }
        }
    }

    Ok(records)
}

pub fn aggregate_playability(records: &[PlayabilityRecord]) -> Vec<PlayabilityAggregate> {
    let mut aggregates: BTreeMap<String, AggregateBuilder> = BTreeMap::new();

    for record in records {
        let entry = aggregates
            .entry(record.scenario_name.clone())
            .or_insert_with(|| AggregateBuilder::new(record));
        entry.ingest(&record.metrics);
        if record.metrics.abandoned > 0 {
            log::warn!(
                "{} abandoned {} days from {}",
                record.scenario_name,
                record.metrics.abandoned,
                record.start_date
            );
        }
    }

    aggregates
        .into_values()
        .map(AggregateBuilder::finish)
        .collect()
}

/// Sanity bounds every sweep must satisfy regardless of dates.
pub fn validate_playability_targets(aggregates: &[PlayabilityAggregate]) -> Result<()> {
    for aggregate in aggregates {
        match aggregate.strategy {
            GuessStrategy::Oracle => {
                ensure!(
                    (aggregate.mean_win_rate - 1.0).abs() < f64::EPSILON,
                    "{} should win every day, mean win rate {:.3}",
                    aggregate.scenario_name,
                    aggregate.mean_win_rate
                );
                ensure!(
                    (aggregate.mean_attempts_to_win - 1.0).abs() < f64::EPSILON,
                    "{} should need one guess",
                    aggregate.scenario_name
                );
            }
            GuessStrategy::Hopeless => ensure!(
                aggregate.mean_win_rate.abs() < f64::EPSILON,
                "{} should never win",
                aggregate.scenario_name
            ),
            GuessStrategy::Eliminator | GuessStrategy::Random => ensure!(
                aggregate.abandoned_days == 0,
                "{} gave up on {} days",
                aggregate.scenario_name,
                aggregate.abandoned_days
            ),
        }
    }
    Ok(())
}

struct AggregateBuilder {
    scenario_name: String,
    strategy: GuessStrategy,
    iterations: usize,
    stats_win_rate: RunningStats,
    stats_attempts: RunningStats,
    stats_max_streak: RunningStats,
    best_max_streak: u32,
    trophies_sum: u32,
    abandoned_days: u32,
}

impl AggregateBuilder {
    fn new(record: &PlayabilityRecord) -> Self {
        Self {
            scenario_name: record.scenario_name.clone(),
            strategy: record.strategy,
            iterations: 0,
            stats_win_rate: RunningStats::default(),
            stats_attempts: RunningStats::default(),
            stats_max_streak: RunningStats::default(),
            best_max_streak: 0,
            trophies_sum: 0,
            abandoned_days: 0,
        }
    }

    fn ingest(&mut self, metrics: &PlayabilityMetrics) {
        self.iterations += 1;
        self.stats_win_rate.add(metrics.win_rate());
        if metrics.wins > 0 {
            self.stats_attempts.add(metrics.mean_attempts_to_win);
        }
        self.stats_max_streak.add(f64::from(metrics.max_streak));
        self.best_max_streak = self.best_max_streak.max(metrics.max_streak);
        self.trophies_sum = self.trophies_sum.saturating_add(metrics.trophies_unlocked);
        self.abandoned_days = self.abandoned_days.saturating_add(metrics.abandoned);
    }

    fn finish(self) -> PlayabilityAggregate {
        let denom = f64::from(u32::try_from(self.iterations.max(1)).unwrap_or(u32::MAX));
        PlayabilityAggregate {
            scenario_name: self.scenario_name,
            strategy: self.strategy,
            iterations: self.iterations,
            mean_win_rate: self.stats_win_rate.mean(),
            std_win_rate: self.stats_win_rate.std_dev(),
            mean_attempts_to_win: self.stats_attempts.mean(),
            std_attempts_to_win: self.stats_attempts.std_dev(),
            mean_max_streak: self.stats_max_streak.mean(),
            best_max_streak: self.best_max_streak,
            mean_trophies: f64::from(self.trophies_sum) / denom,
            abandoned_days: self.abandoned_days,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let count = f64::from(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    fn variance(&self) -> f64 {
        if self.count > 1 {
            self.m2 / f64::from(self.count - 1)
        } else {
            0.0
        }
    }

    fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

fn add_expectations(plan: SimulationPlan, strategy: GuessStrategy) -> SimulationPlan {
    match strategy {
        GuessStrategy::Oracle => plan.with_expectation(oracle_expectation),
        GuessStrategy::Hopeless => plan.with_expectation(hopeless_expectation),
        GuessStrategy::Eliminator | GuessStrategy::Random => {
            plan.with_expectation(solver_expectation)
        }
    }
}
