// cell/mod.rs
// Steady-state PEMFC polarization model
//
// This module handles:
// - Physical constants and cell design parameters
// - The four loss terms (activation, ohmic, concentration) around the reversible voltage
// - Current density sweeps with explicit exclusion of out-of-domain points

pub mod constants;
pub mod params;
pub mod sweep;
pub mod voltage;

pub use constants::PhysicalConstants;
pub use params::{ActivationCoefficients, ActivationModel, CellParameters, OperatingPoint};
pub use sweep::{CurrentSweep, ExcludedPoint, PolarizationCurve, SweepConditions};
pub use voltage::{
    current_density_from_current, max_current_density, oxygen_concentration, PolarizationModel,
    VoltageBreakdown,
};
