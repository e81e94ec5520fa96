//! Physical unit definitions and conversions.
//!
//! Base units used by the polarization model:
//! - Current density: A/cm²
//! - Area: cm²
//! - Pressure: atm
//! - Concentration: mol/cm³
//! - Temperature: K

/// One standard atmosphere in pascals.
pub const ATM_TO_PA: f64 = 101_325.0;
/// Cubic centimetres per cubic metre.
pub const CM3_PER_M3: f64 = 1.0e6;
/// Reference temperature for the reversible potential (K).
pub const T_REF: f64 = 298.15;
/// Volume fraction of oxygen in air.
pub const O2_VOLUME_FRACTION: f64 = 0.21;

/// Convert a pressure in atm to Pa.
pub fn atm_to_pa(pressure_atm: f64) -> f64 {
    pressure_atm * ATM_TO_PA
}

/// Convert mol/m³ to mol/cm³.
pub fn per_m3_to_per_cm3(concentration: f64) -> f64 {
    concentration / CM3_PER_M3
}

/// Convert Celsius to Kelvin.
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + 273.15
}
