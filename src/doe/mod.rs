/// Design of Experiments (DOE) module for Taguchi parametric studies
///
/// This module provides functionality to:
/// - Define control factors with present and absent levels
/// - Enumerate the full factorial space and draw a seeded orthogonal array from it
/// - Evaluate every run through an injected evaluator (in parallel)
/// - Evaluate the full factorial space for comparison with the sampled array
/// - Compute signal-to-noise ratios and pick the optimal level of each factor
/// - Export results for statistical analysis

pub mod analysis;
pub mod array;
pub mod config;
pub mod export;
pub mod factors;
pub mod runner;
pub mod sampling;

pub use analysis::{
    level_response_table, rank_optimal_levels, signal_to_noise, FactorResponse, OptimalLevel,
    SnConvention,
};
pub use array::{Evaluator, Observation, OrthogonalArray, Run};
pub use config::{DoeConfig, FactorRole, FactorSpec, OperatingMap, ResponseMetric};
pub use export::{
    array_to_csv, parse_array_csv, write_array_csv, write_control_factors_csv, write_summary_csv,
};
pub use factors::{
    canonical_control_factors, enumerate_factorial_space, ControlFactor, DesignPoint, Level,
    LevelSetting,
};
pub use runner::{DoeRunner, PolarizationEvaluator, StudyReport};
pub use sampling::sample_orthogonal_array;
