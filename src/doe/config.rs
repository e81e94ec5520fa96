/// DOE configuration structures
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::analysis::SnConvention;
use super::factors::{validate_factors, ControlFactor};
use crate::cell::{CellParameters, CurrentSweep, PhysicalConstants, PolarizationCurve};
use crate::config;
use crate::error::{DesignError, PemfcResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoeConfig {
    /// Name of the DOE study
    pub study_name: String,

    /// Seed for the orthogonal array row selection
    pub seed: u64,

    /// Number of rows in the orthogonal array
    pub array_size: usize,

    /// Whether a larger or smaller mean S/N marks the best level
    #[serde(default)]
    pub convention: SnConvention,

    /// Scalar taken from each design point's polarization curve
    #[serde(default)]
    pub response: ResponseMetric,

    /// Current density sweep run at every design point
    #[serde(default)]
    pub sweep: CurrentSweep,

    /// How factor values turn into operating conditions
    #[serde(default)]
    pub operating: OperatingMap,

    #[serde(default)]
    pub constants: PhysicalConstants,

    #[serde(default)]
    pub cell: CellParameters,

    /// Control factors, in design-point order
    pub factors: Vec<FactorSpec>,
}

/// What a control factor drives in the cell model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactorRole {
    /// Operating temperature (K)
    Temperature,
    /// Anode H₂ pressure (atm), also the cathode air pressure unless one is configured
    HydrogenPressure,
    /// Fuel flow, caps the limiting current density
    FuelFlow,
    /// Air flow, caps the limiting current density
    AirFlow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSpec {
    pub name: String,
    pub role: FactorRole,
    /// Real levels, in level order
    pub values: Vec<f64>,
    /// Nominal level count; missing levels are absent
    #[serde(default = "default_nominal_levels")]
    pub nominal_levels: usize,
}

fn default_nominal_levels() -> usize {
    config::NOMINAL_LEVEL_COUNT
}

impl FactorSpec {
    pub fn new(name: &str, role: FactorRole, values: &[f64]) -> Self {
        Self {
            name: name.to_string(),
            role,
            values: values.to_vec(),
            nominal_levels: default_nominal_levels(),
        }
    }

    pub fn to_control_factor(&self) -> ControlFactor {
        ControlFactor::padded(self.name.clone(), &self.values, self.nominal_levels)
    }
}

/// Scalar summary of a polarization curve used as the observed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ResponseMetric {
    /// Highest net voltage on the curve (V)
    MaxVoltage,
    /// Highest power density on the curve (W/cm²)
    PeakPowerDensity,
    /// Net voltage at the grid point nearest to a current density (V)
    VoltageAt { current_density: f64 },
}

impl Default for ResponseMetric {
    fn default() -> Self {
        ResponseMetric::MaxVoltage
    }
}

impl ResponseMetric {
    pub fn measure(&self, curve: &PolarizationCurve) -> Option<f64> {
        match self {
            ResponseMetric::MaxVoltage => curve.max_voltage(),
            ResponseMetric::PeakPowerDensity => curve.peak_power().map(|p| p.power_density()),
            ResponseMetric::VoltageAt { current_density } => curve.voltage_at(*current_density),
        }
    }
}

/// Fixed operating conditions and the coefficients linking flows to limiting current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingMap {
    /// Temperature when no factor has the `Temperature` role (K)
    pub temperature: f64,
    /// H₂ pressure when no factor has the `HydrogenPressure` role (atm)
    pub pressure_atm: f64,
    /// Cathode air pressure; follows the H₂ pressure when unset (atm)
    #[serde(default)]
    pub air_pressure_atm: Option<f64>,
    /// Limiting current density per unit of fuel flow (A/cm²)
    pub fuel_flow_limit_per_unit: f64,
    /// Limiting current density per unit of air flow (A/cm²)
    pub air_flow_limit_per_unit: f64,
}

impl Default for OperatingMap {
    fn default() -> Self {
        Self {
            temperature: config::DEFAULT_TEMPERATURE,
            pressure_atm: config::DEFAULT_PRESSURE_ATM,
            air_pressure_atm: None,
            fuel_flow_limit_per_unit: config::FUEL_FLOW_LIMIT_PER_UNIT,
            air_flow_limit_per_unit: config::AIR_FLOW_LIMIT_PER_UNIT,
        }
    }
}

impl DoeConfig {
    /// The four-factor PEMFC study: 6 temperatures against 3 fuel flows, air flows and pressures.
    pub fn canonical() -> Self {
        DoeConfig {
            study_name: "PEMFC Taguchi Study".to_string(),
            seed: config::DEFAULT_SEED,
            array_size: config::DEFAULT_ARRAY_SIZE,
            convention: SnConvention::default(),
            response: ResponseMetric::default(),
            sweep: CurrentSweep::default(),
            operating: OperatingMap::default(),
            constants: PhysicalConstants::default(),
            cell: CellParameters::default(),
            factors: vec![
                FactorSpec::new(
                    "operating_temperature",
                    FactorRole::Temperature,
                    &[313.0, 323.0, 333.0, 338.0, 343.0, 353.0],
                ),
                FactorSpec::new("fuel_flow_rate", FactorRole::FuelFlow, &[50.0, 65.0, 85.0]),
                FactorSpec::new("air_flow_rate", FactorRole::AirFlow, &[300.0, 400.0, 500.0]),
                FactorSpec::new(
                    "fuel_supply_pressure",
                    FactorRole::HydrogenPressure,
                    &[1.5, 2.0, 2.5],
                ),
            ],
        }
    }

    pub fn control_factors(&self) -> Vec<ControlFactor> {
        self.factors.iter().map(FactorSpec::to_control_factor).collect()
    }

    /// Check the factor definitions and that temperature and pressure each
    /// have at most one driving factor.
    pub fn validate(&self) -> Result<(), DesignError> {
        for role in [FactorRole::Temperature, FactorRole::HydrogenPressure] {
            let mut drivers = self.factors.iter().filter(|f| f.role == role);
            if let (Some(first), Some(second)) = (drivers.next(), drivers.next()) {
                return Err(DesignError::DuplicateRole {
                    role: format!("{role:?}"),
                    first: first.name.clone(),
                    second: second.name.clone(),
                });
            }
        }
        validate_factors(&self.control_factors())
    }

    /// Study name usable as a file stem.
    pub fn file_stem(&self) -> String {
        self.study_name.trim().replace(' ', "_")
    }

    /// Load DOE configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> PemfcResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: DoeConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save DOE configuration to TOML file
    pub fn to_file(&self, path: impl AsRef<Path>) -> PemfcResult<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
