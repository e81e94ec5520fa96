// Centralized defaults for the polarization model and the experiment design

// ====================
// Experiment Design
// ====================
/// Nominal number of levels every control factor carries (absent levels included)
pub const NOMINAL_LEVEL_COUNT: usize = 6;
/// Rows in the reduced orthogonal array
pub const DEFAULT_ARRAY_SIZE: usize = 18;
/// Seed used for the reproducible row selection
pub const DEFAULT_SEED: u64 = 42;

// ====================
// Current Density Sweep
// ====================
/// First current density of a polarization sweep (A/cm²)
pub const SWEEP_START: f64 = 0.01;
/// Number of grid points in a polarization sweep
pub const SWEEP_POINTS: usize = 200;
/// Relative margin kept below the limiting current density when clamping a sweep
pub const SWEEP_LIMIT_MARGIN: f64 = 1.0e-3;

// ====================
// Operating Defaults
// ====================
/// Temperature used when no factor drives it (K)
pub const DEFAULT_TEMPERATURE: f64 = 343.0;
/// Anode and cathode pressure used when no factor drives them (atm)
pub const DEFAULT_PRESSURE_ATM: f64 = 1.0;
/// Limiting current density gained per unit of fuel flow (A/cm² per unit)
pub const FUEL_FLOW_LIMIT_PER_UNIT: f64 = 0.01;
/// Limiting current density gained per unit of air flow (A/cm² per unit)
pub const AIR_FLOW_LIMIT_PER_UNIT: f64 = 0.002;
