/// DOE runner: designs the array, evaluates the polarization model at every run, and ranks levels
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::analysis::{level_response_table, rank_optimal_levels, FactorResponse, OptimalLevel};
use super::array::{Evaluator, OrthogonalArray};
use super::config::{DoeConfig, FactorRole, FactorSpec, OperatingMap, ResponseMetric};
use super::export::{write_array_csv, write_control_factors_csv, write_summary_csv};
use super::factors::{enumerate_factorial_space, DesignPoint};
use crate::cell::{
    oxygen_concentration, CellParameters, CurrentSweep, PhysicalConstants, PolarizationModel,
    SweepConditions,
};
use crate::error::{DesignError, DomainError, ModelTerm, PemfcResult};
use crate::units;

/// Operating conditions derived from one design point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignConditions {
    pub sweep: SweepConditions,
    /// Effective limiting current density (A/cm²)
    pub limiting_current_density: f64,
}

/// Evaluates a design point by sweeping the polarization model and reducing the curve to one number.
#[derive(Debug, Clone)]
pub struct PolarizationEvaluator {
    constants: PhysicalConstants,
    cell: CellParameters,
    sweep: CurrentSweep,
    response: ResponseMetric,
    operating: OperatingMap,
    roles: Vec<FactorRole>,
}

impl PolarizationEvaluator {
    pub fn from_config(config: &DoeConfig) -> Result<Self, DesignError> {
        config.validate()?;
        Ok(Self {
            constants: config.constants,
            cell: config.cell.clone(),
            sweep: config.sweep,
            response: config.response,
            operating: config.operating.clone(),
            roles: config.factors.iter().map(|f: &FactorSpec| f.role).collect(),
        })
    }

    /// Map factor values onto temperature, pressures and the limiting current density.
    pub fn conditions(&self, point: &DesignPoint) -> Result<DesignConditions, DomainError> {
        let op = &self.operating;
        let mut temperature = op.temperature;
        let mut p_h2 = op.pressure_atm;
        let mut limit = self.cell.limiting_current_density;

        for (role, setting) in self.roles.iter().zip(&point.settings) {
            match role {
                FactorRole::Temperature => temperature = setting.value,
                FactorRole::HydrogenPressure => p_h2 = setting.value,
                FactorRole::FuelFlow => limit = limit.min(setting.value * op.fuel_flow_limit_per_unit),
                FactorRole::AirFlow => limit = limit.min(setting.value * op.air_flow_limit_per_unit),
            }
        }

        let air_pressure = op.air_pressure_atm.unwrap_or(p_h2);
        let c_o2 = oxygen_concentration(&self.constants, air_pressure, temperature)?;
        Ok(DesignConditions {
            sweep: SweepConditions {
                temperature,
                p_h2,
                p_o2: units::O2_VOLUME_FRACTION * air_pressure,
                oxygen_concentration: c_o2,
            },
            limiting_current_density: limit,
        })
    }
}

impl Evaluator for PolarizationEvaluator {
    fn evaluate(&self, point: &DesignPoint) -> Result<f64, DomainError> {
        let conditions = self.conditions(point)?;
        let limit = conditions.limiting_current_density;
        let model = PolarizationModel::new(
            self.constants,
            self.cell.with_limiting_current_density(limit),
        );
        let curve = model.sweep(&conditions.sweep, &self.sweep.clamped_below(limit));
        if !curve.excluded.is_empty() {
            warn!(
                excluded = curve.excluded.len(),
                j_max = limit,
                temperature = conditions.sweep.temperature,
                "design point sweep lost points below the limiting current"
            );
        }

        if let Some(value) = self.response.measure(&curve) {
            return Ok(value);
        }
        Err(match curve.excluded.into_iter().next() {
            Some(excluded) => excluded.error,
            None => DomainError::new(
                ModelTerm::CurrentDensity,
                "sweep produced no points",
                &[("j_max", limit), ("points", self.sweep.points as f64)],
            ),
        })
    }
}

/// Outcome of a complete study.
#[derive(Debug, Clone, Serialize)]
pub struct StudyReport {
    pub study_name: String,
    pub array: OrthogonalArray,
    pub response_table: Vec<FactorResponse>,
    pub optimal_levels: BTreeMap<String, OptimalLevel>,
}

pub struct DoeRunner {
    config: DoeConfig,
    output_dir: PathBuf,
}

impl DoeRunner {
    pub fn new(config: DoeConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            output_dir: output_dir.into(),
        }
    }

    pub fn config(&self) -> &DoeConfig {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Unevaluated orthogonal array for this study.
    pub fn design(&self) -> PemfcResult<OrthogonalArray> {
        Ok(OrthogonalArray::design(
            &self.config.control_factors(),
            self.config.array_size,
            self.config.seed,
        )?)
    }

    /// Design, evaluate and analyse the study.
    pub fn run(&self) -> PemfcResult<StudyReport> {
        let start = Instant::now();
        info!(study = %self.config.study_name, "running DOE study");

        let design = self.design()?;
        let evaluator = PolarizationEvaluator::from_config(&self.config)?;
        let array = design.evaluate(&evaluator)?;
        debug!(runs = array.len(), "evaluated all runs");

        let response_table = level_response_table(&array)?;
        let optimal_levels = rank_optimal_levels(&array, self.config.convention)?;
        for (factor, best) in &optimal_levels {
            info!(
                factor = %factor,
                level = best.level,
                value = best.value,
                mean_snr = best.mean_snr,
                "optimal level"
            );
        }
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "study complete");

        Ok(StudyReport {
            study_name: self.config.study_name.clone(),
            array,
            response_table,
            optimal_levels,
        })
    }

    /// Write the array table, the response table and a JSON report into the output directory.
    pub fn export(&self, report: &StudyReport) -> PemfcResult<Vec<PathBuf>> {
        let stem = self.config.file_stem();
        let array_path = write_array_csv(&report.array, &self.output_dir, &stem)?;
        let summary_path = write_summary_csv(&report.response_table, &self.output_dir, &stem)?;

        let json_path = self.output_dir.join(format!("{stem}_report.json"));
        std::fs::write(&json_path, serde_json::to_string_pretty(report)?)?;
        info!(path = %json_path.display(), "exported study report");

        Ok(vec![array_path, summary_path, json_path])
    }

    /// Evaluate every point of the factorial space rather than the sampled rows.
    ///
    /// The signal-to-noise ratios use the size of the whole space as sample count.
    pub fn run_full_factorial(&self) -> PemfcResult<OrthogonalArray> {
        let start = Instant::now();
        let factors = self.config.control_factors();
        let space = enumerate_factorial_space(&factors)?;
        info!(
            study = %self.config.study_name,
            points = space.len(),
            "evaluating full factorial space"
        );

        let evaluator = PolarizationEvaluator::from_config(&self.config)?;
        let names = factors.iter().map(|f| f.name.clone()).collect();
        let array = OrthogonalArray::from_points(names, space).evaluate(&evaluator)?;
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "full factorial complete");
        Ok(array)
    }

    /// Write the control factor table and the evaluated factorial space.
    pub fn export_full_factorial(&self, array: &OrthogonalArray) -> PemfcResult<Vec<PathBuf>> {
        let stem = self.config.file_stem();
        let factors_path =
            write_control_factors_csv(&self.config.control_factors(), &self.output_dir, &stem)?;
        let factorial_path =
            write_array_csv(array, &self.output_dir, &format!("{stem}_factorial"))?;
        Ok(vec![factors_path, factorial_path])
    }

    /// List the designed runs
    pub fn list_runs(&self) -> PemfcResult<()> {
        let array = self.design()?;

        println!("\nDOE Study: {}", self.config.study_name);
        println!(
            "Runs: {} (seed {}, drawn from {} factors)\n",
            array.len(),
            self.config.seed,
            array.factors.len()
        );

        for (idx, run) in array.runs.iter().enumerate() {
            let settings: Vec<String> = array
                .factors
                .iter()
                .zip(&run.point.settings)
                .map(|(name, s)| format!("{}=L{} ({})", name, s.level, s.value))
                .collect();
            println!("  [{:>2}] {}", idx + 1, settings.join(", "));
        }
        println!();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_study_ranks_every_factor() {
        let runner = DoeRunner::new(DoeConfig::canonical(), "unused");
        let report = runner.run().unwrap();
        assert_eq!(report.array.len(), 18);
        assert!(report.array.is_evaluated());
        for obs in report.array.observations().unwrap() {
            assert!(obs.observed > 0.0 && obs.observed < 1.3);
            assert!(obs.snr.is_finite());
        }
        assert_eq!(report.optimal_levels.len(), 4);
        assert_eq!(report.response_table.len(), 4);
    }

    #[test]
    fn runs_are_reproducible() {
        let runner = DoeRunner::new(DoeConfig::canonical(), "unused");
        assert_eq!(runner.run().unwrap().array, runner.run().unwrap().array);
    }

    #[test]
    fn flows_cap_the_limiting_current() {
        let config = DoeConfig::canonical();
        let evaluator = PolarizationEvaluator::from_config(&config).unwrap();
        let space = crate::doe::factors::enumerate_factorial_space(&config.control_factors()).unwrap();
        // temperature L1, fuel 50, air 300, pressure 1.5
        let c = evaluator.conditions(&space[0]).unwrap();
        assert_eq!(c.sweep.temperature, 313.0);
        assert_eq!(c.sweep.p_h2, 1.5);
        assert!((c.limiting_current_density - 0.5).abs() < 1e-12);
        assert!((c.sweep.p_o2 - 0.315).abs() < 1e-12);
    }

    #[test]
    fn temperature_changes_the_response() {
        let config = DoeConfig::canonical();
        let evaluator = PolarizationEvaluator::from_config(&config).unwrap();
        let space = crate::doe::factors::enumerate_factorial_space(&config.control_factors()).unwrap();
        // same supply settings, 313 K vs 353 K
        let cold = evaluator.evaluate(&space[0]).unwrap();
        let hot = evaluator.evaluate(&space[135]).unwrap();
        assert!(cold.is_finite() && hot.is_finite());
        assert_ne!(cold, hot);
    }

    #[test]
    fn full_factorial_evaluates_every_combination() {
        let runner = DoeRunner::new(DoeConfig::canonical(), "unused");
        let array = runner.run_full_factorial().unwrap();
        assert_eq!(array.len(), 162);
        assert!(array.is_evaluated());

        let distinct: std::collections::HashSet<Vec<usize>> =
            array.runs.iter().map(|r| r.point.levels()).collect();
        assert_eq!(distinct.len(), 162);
        for obs in array.observations().unwrap() {
            let snr = crate::doe::analysis::signal_to_noise(obs.observed, 162).unwrap();
            assert_eq!(obs.snr, snr);
        }
    }

    #[test]
    fn full_factorial_contains_the_sampled_rows() {
        let runner = DoeRunner::new(DoeConfig::canonical(), "unused");
        let full = runner.run_full_factorial().unwrap();
        let sampled = runner.run().unwrap().array;
        for run in &sampled.runs {
            let matching = full.runs.iter().find(|r| r.point == run.point).unwrap();
            assert_eq!(
                matching.observation.unwrap().observed,
                run.observation.unwrap().observed
            );
        }
    }

    #[test]
    fn duplicate_roles_stop_the_study() {
        let mut config = DoeConfig::canonical();
        config.factors.push(FactorSpec::new(
            "backpressure",
            FactorRole::HydrogenPressure,
            &[1.0, 3.0],
        ));
        assert!(matches!(
            PolarizationEvaluator::from_config(&config),
            Err(DesignError::DuplicateRole { .. })
        ));
        assert!(DoeRunner::new(config, "unused").run().is_err());
    }

    #[test]
    fn empty_sweep_reports_a_domain_error() {
        let mut config = DoeConfig::canonical();
        config.sweep = CurrentSweep::new(0.01, 1.0, 0);
        let evaluator = PolarizationEvaluator::from_config(&config).unwrap();
        let space = crate::doe::factors::enumerate_factorial_space(&config.control_factors()).unwrap();
        let err = evaluator.evaluate(&space[0]).unwrap_err();
        assert_eq!(err.term, ModelTerm::CurrentDensity);
    }
}
