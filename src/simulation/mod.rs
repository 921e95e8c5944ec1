//! Annual claims simulation: claim inputs, accumulator state, cost-share
//! evaluation, and the engine that ties them together

pub mod claims;
pub mod engine;
pub mod evaluator;
pub mod result;
pub mod state;

pub use claims::{load_claims_csv, standard_utilization, ServiceType, SimulatedClaim};
pub use engine::{SimulationConfig, SimulationEngine, TierRouting};
pub use evaluator::{describe_rule, format_money, line_liability};
pub use result::{ClaimRow, SimulationResult, SimulationRun};
pub use state::{AccumulatorLimits, AccumulatorState};
