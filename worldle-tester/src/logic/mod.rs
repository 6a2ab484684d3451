pub mod dates;
pub mod game_tester;
pub mod playability;
pub mod policy;
pub mod reports;
pub mod tester;

pub use dates::{DateInfo, resolve_date_inputs};
pub use game_tester::{GameTester, PlayabilityMetrics, SimulationPlan};
pub use playability::{
    PlayabilityAggregate, PlayabilityRecord, aggregate_playability, run_playability_analysis,
    validate_playability_targets,
};
pub use policy::GuessStrategy;
pub use tester::*;
