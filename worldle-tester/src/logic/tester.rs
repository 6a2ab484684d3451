use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::TestScenario;
use crate::logic::dates::{DateInfo, offset_date};
use crate::logic::game_tester::{GameTester, SimulationPlan, SimulationSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub start_date: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    tester: GameTester,
}

impl LogicTester {
    pub const fn new(tester: GameTester) -> Self {
        Self { tester }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        dates: &[DateInfo],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for date in dates {
            if self.tester.verbose() {
                println!(
                    "🧪 Testing scenario: {} (strategy: {} start: {} from {} days: {})",
                    scenario.name.bright_white(),
                    scenario.plan.strategy,
                    date.date,
                    date.token.as_deref().unwrap_or("default"),
                    scenario.plan.days
                );
            }

            let result = self.run_single_scenario(scenario, date, iterations);
            results.push(result);
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        date: &DateInfo,
        iterations: usize,
    ) -> ScenarioResult {
        let (successes, failures, performance_data) =
            self.run_simulation_iterations(&scenario.plan, date, iterations);

        let avg_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            start_date: date.date.to_string(),
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration: avg_duration,
            performance_data,
        }
    }

    /// Iteration `i` starts `i` days after `date` with the seed shifted by `i`.
    fn run_simulation_iterations(
        &self,
        plan: &SimulationPlan,
        date: &DateInfo,
        iterations: usize,
    ) -> (usize, Vec<String>, Vec<Duration>) {
        let verbose = self.tester.verbose();
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let offset = u64::try_from(i).unwrap_or(u64::MAX);
            let iteration_seed = date.seed().wrapping_add(offset);

            let outcome = offset_date(date.date, offset)
                .and_then(|start| self.tester.run_plan(plan, start, iteration_seed));
            let summary = match outcome {
                Ok(summary) => summary,
                Err(err) => {
                    failures.push(format!("Iteration {} could not run: {err:#}", i + 1));
                    continue;
                }
            };

            if let Some(err) = evaluate_expectations(plan, &summary) {
                let context = summarize_recent_days(&summary);
                failures.push(format!(
                    "Iteration {} (strategy {}, start {}, seed {}, days {}, won {} lost {}): {} | {}",
                    i + 1,
                    summary.strategy.label(),
                    summary.start,
                    summary.seed,
                    summary.days.len(),
                    summary.metrics.wins,
                    summary.metrics.losses,
                    err,
                    context
                ));

                if verbose {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.clone().red()
                    );
                    println!("     ↳ {context}");
                }
            } else {
                successes += 1;
                let duration = start_time.elapsed();
                performance_data.push(duration);

                if verbose {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) days:{} won:{} strategy:{}",
                        i + 1,
                        iterations,
                        summary.days.len(),
                        summary.metrics.wins,
                        summary.strategy.label()
                    );
                }
            }
        }

        (successes, failures, performance_data)
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    for expectation in &plan.expectations {
        if let Err(err) = expectation.evaluate(summary) {
            return Some(format!("{err:#}"));
        }
    }
    None
}

fn summarize_recent_days(summary: &SimulationSummary) -> String {
    if summary.days.is_empty() {
        return "no days played".to_string();
    }

    summary
        .days
        .iter()
        .rev()
        .take(3)
        .map(|day| {
            format!(
                "{} answer {} -> {} in {} [{}]",
                day.date,
                day.mystery,
                day.status,
                day.attempts,
                day.guesses.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::scenario::get_scenario;
    use worldle_game::GameDate;

    fn start() -> DateInfo {
        DateInfo::from_date(GameDate::from_ymd(2024, 1, 1).unwrap())
    }

    #[test]
    fn smoke_scenario_passes_every_iteration() {
        let tester = LogicTester::new(GameTester::try_new(false).unwrap());
        let scenario = get_scenario("smoke").unwrap();
        let results = tester.run_scenario(&scenario, &[start()], 3);
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert!(result.passed, "{:?}", result.failures);
        assert_eq!(result.successful_iterations, 3);
        assert_eq!(result.performance_data.len(), 3);
        assert_eq!(result.start_date, "2024-01-01");
    }

    #[test]
    fn failing_expectation_is_reported_with_context() {
        let tester = LogicTester::new(GameTester::try_new(false).unwrap());
        let plan = SimulationPlan::new(crate::logic::GuessStrategy::Hopeless)
            .with_expectation(|_: &SimulationSummary| -> anyhow::Result<()> {
                anyhow::bail!("never satisfied")
            });
        let scenario = TestScenario::simulation("Always Fails", plan);
        let results = tester.run_scenario(&scenario, &[start()], 2);
        let result = &results[0];
        assert!(!result.passed);
        assert_eq!(result.successful_iterations, 0);
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures[0].contains("never satisfied"));
        assert!(result.failures[0].contains("Hopeless"));
    }

    #[test]
    fn results_serialize_durations_as_millis() {
        let result = ScenarioResult {
            scenario_name: "Smoke".to_string(),
            start_date: "2024-01-01".to_string(),
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
            performance_data: vec![Duration::from_millis(12)],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["average_duration"], 12);
        assert_eq!(value["performance_data"][0], 12);
        let back: ScenarioResult = serde_json::from_str(&value.to_string()).unwrap();
        assert_eq!(back.average_duration, Duration::from_millis(12));
    }
}
