// cell/params.rs
// Cell design parameters and per-evaluation operating points

use serde::{Deserialize, Serialize};

/// Semi-empirical activation coefficients ε₁..ε₄.
///
/// The activation loss is `ε1 + ε2*T + ε3*T*ln(C_O2) + ε4*T*ln(i_cell)`.
/// Signs are stored so the loss comes out positive over the normal operating range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivationCoefficients(pub f64, pub f64, pub f64, pub f64);

impl Default for ActivationCoefficients {
    fn default() -> Self {
        ActivationCoefficients(0.948, -0.00315, -7.6e-5, 1.93e-4)
    }
}

/// Which activation-loss expression the model uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationModel {
    /// Four-coefficient fit in temperature, O₂ concentration and cell current
    SemiEmpirical,
    /// Tafel slope `RT/(αnF) * ln(J/i0)` driven by the exchange current density
    Tafel,
}

impl Default for ActivationModel {
    fn default() -> Self {
        ActivationModel::SemiEmpirical
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellParameters {
    /// Active area (cm²)
    pub area: f64,
    /// Nominal operating current (A)
    pub nominal_current: f64,
    /// Nominal operating voltage (V)
    pub nominal_voltage: f64,
    /// Membrane ionic resistance (Ω·cm²)
    pub membrane_resistance: f64,
    /// Contact resistance (Ω·cm²)
    pub contact_resistance: f64,
    /// Exchange current density i0 (A/cm²)
    pub exchange_current_density: f64,
    /// Limiting current density (A/cm²)
    pub limiting_current_density: f64,
    pub activation: ActivationCoefficients,
    #[serde(default)]
    pub activation_model: ActivationModel,
    /// Charge transfer coefficient α, only read by the Tafel form
    #[serde(default = "default_transfer_coeff")]
    pub transfer_coeff: f64,
}

fn default_transfer_coeff() -> f64 {
    0.5
}

impl Default for CellParameters {
    fn default() -> Self {
        Self {
            area: 50.0,
            nominal_current: 30.0,
            nominal_voltage: 0.65,
            membrane_resistance: 0.08,
            contact_resistance: 0.02,
            exchange_current_density: 1.0e-4,
            limiting_current_density: 1.5,
            activation: ActivationCoefficients::default(),
            activation_model: ActivationModel::default(),
            transfer_coeff: default_transfer_coeff(),
        }
    }
}

impl CellParameters {
    /// Total area-specific resistance (Ω·cm²).
    pub fn total_resistance(&self) -> f64 {
        self.membrane_resistance + self.contact_resistance
    }

    /// Same cell with a different limiting current density.
    pub fn with_limiting_current_density(&self, limit: f64) -> Self {
        Self {
            limiting_current_density: limit,
            ..self.clone()
        }
    }
}

/// Inputs for a single voltage evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperatingPoint {
    /// Current density J (A/cm²)
    pub current_density: f64,
    /// Temperature T (K)
    pub temperature: f64,
    /// H₂ partial pressure (atm)
    pub p_h2: f64,
    /// O₂ partial pressure (atm)
    pub p_o2: f64,
    /// O₂ concentration at the catalyst interface (mol/cm³)
    pub oxygen_concentration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_physical() {
        let p = CellParameters::default();
        assert!(p.area > 0.0);
        assert!(p.total_resistance() > 0.0);
        assert!(p.exchange_current_density < p.limiting_current_density);
        assert_eq!(p.activation_model, ActivationModel::SemiEmpirical);
    }

    #[test]
    fn limit_override_keeps_other_fields() {
        let p = CellParameters::default();
        let q = p.with_limiting_current_density(0.65);
        assert_eq!(q.limiting_current_density, 0.65);
        assert_eq!(q.area, p.area);
        assert_eq!(q.activation, p.activation);
    }
}
