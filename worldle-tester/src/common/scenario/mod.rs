pub mod catalog;
pub mod season;
pub mod smoke;

use crate::logic::SimulationPlan;

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// Key, description and constructor for every runnable scenario.
type ScenarioEntry = (&'static str, &'static str, fn() -> TestScenario);

const SCENARIOS: &[ScenarioEntry] = &[
    (
        "smoke",
        "One perfect day: answer, share text, persisted history",
        smoke::smoke_scenario,
    ),
    (
        "daily-determinism",
        "Two weeks of random play; every answer matches an independent selector",
        catalog::determinism_scenario,
    ),
    (
        "legacy-format",
        "A week under the legacy seed format keeps the published answers",
        catalog::legacy_format_scenario,
    ),
    (
        "session-rules",
        "Seven misses lose the day; finished and unknown guesses are rejected",
        catalog::session_rules_scenario,
    ),
    (
        "history-upsert",
        "Ledger aggregates stay consistent and same-date records replace",
        catalog::history_upsert_scenario,
    ),
    (
        "trophy-ladders",
        "A 30-day win streak climbs the ladders and reports each unlock once",
        catalog::trophy_ladder_scenario,
    ),
    (
        "share-grid",
        "Share text carries one five-marker row per guess",
        catalog::share_grid_scenario,
    ),
    (
        "season",
        "A 90-day season with the eliminator solver",
        season::season_scenario,
    ),
];

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let key = name.to_lowercase();
    SCENARIOS
        .iter()
        .find(|(entry, _, _)| *entry == key)
        .map(|(_, _, build)| build())
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS
        .iter()
        .map(|(key, description, _)| (*key, *description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, _) in list_scenarios() {
            let scenario = get_scenario(key).unwrap();
            assert!(!scenario.plan.expectations.is_empty(), "{key} checks nothing");
        }
    }

    #[test]
    fn keys_are_unique_and_lookup_ignores_case() {
        let keys: HashSet<&str> = list_scenarios().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), SCENARIOS.len());
        assert!(get_scenario("SMOKE").is_some());
        assert!(get_scenario("no-such-scenario").is_none());
    }
}
