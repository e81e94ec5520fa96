// cell/constants.rs
// Immutable physical constants shared by every model evaluation

use serde::{Deserialize, Serialize};

/// Universal gas constant (J/mol·K).
pub const GAS_CONSTANT: f64 = 8.314;
/// Faraday constant (C/mol).
pub const FARADAY: f64 = 96_485.0;
/// Electrons transferred per H₂ molecule.
pub const ELECTRONS_PER_H2: f64 = 2.0;
/// Standard potential of the H₂/O₂ reaction (V).
pub const STANDARD_POTENTIAL: f64 = 1.229;
/// Temperature coefficient of the reversible potential (V/K).
pub const REVERSIBLE_TEMPERATURE_COEFF: f64 = 0.85e-3;

/// Constants of the cell chemistry.
///
/// Passed explicitly into the model so an alternate chemistry can be swapped in
/// without touching global state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Universal gas constant R (J/mol·K)
    pub gas_constant: f64,
    /// Faraday constant F (C/mol)
    pub faraday: f64,
    /// Number of electrons transferred n
    pub electrons: f64,
    /// Standard potential E0 (V)
    pub standard_potential: f64,
    /// Temperature coefficient k1 of the reversible potential (V/K)
    #[serde(default = "default_temperature_coeff")]
    pub temperature_coeff: f64,
}

fn default_temperature_coeff() -> f64 {
    REVERSIBLE_TEMPERATURE_COEFF
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            gas_constant: GAS_CONSTANT,
            faraday: FARADAY,
            electrons: ELECTRONS_PER_H2,
            standard_potential: STANDARD_POTENTIAL,
            temperature_coeff: REVERSIBLE_TEMPERATURE_COEFF,
        }
    }
}

impl PhysicalConstants {
    /// R/(nF), the Nernst slope per kelvin (V/K).
    pub fn nernst_slope(&self) -> f64 {
        self.gas_constant / (self.electrons * self.faraday)
    }

    /// RT/(nF) at temperature `t` (V).
    pub fn thermal_voltage(&self, t: f64) -> f64 {
        self.nernst_slope() * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nernst_slope_matches_hydrogen_cell() {
        let c = PhysicalConstants::default();
        assert!((c.nernst_slope() - 4.3085e-5).abs() < 1e-8);
        assert!((c.thermal_voltage(298.15) - 0.012846).abs() < 1e-5);
    }
}
