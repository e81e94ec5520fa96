// cell/voltage.rs
// Polarization equation: reversible voltage minus activation, ohmic and concentration losses

use super::constants::PhysicalConstants;
use super::params::{ActivationModel, CellParameters, OperatingPoint};
use crate::error::{DomainError, ModelTerm};
use crate::units;

/// Every term of one polarization evaluation (V).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoltageBreakdown {
    pub current_density: f64,
    pub reversible: f64,
    pub activation: f64,
    pub ohmic: f64,
    pub concentration: f64,
    pub net: f64,
}

impl VoltageBreakdown {
    /// Power density delivered at this point (W/cm²).
    pub fn power_density(&self) -> f64 {
        self.current_density * self.net
    }

    /// Sum of the three losses (V).
    pub fn total_loss(&self) -> f64 {
        self.activation + self.ohmic + self.concentration
    }
}

/// Ensure a computed term is finite, otherwise report it against `term`.
fn finite(
    value: f64,
    term: ModelTerm,
    inputs: &[(&'static str, f64)],
) -> Result<f64, DomainError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::new(term, "evaluated to a non-finite value", inputs))
    }
}

/// Current density from a cell current (A/cm²).
pub fn current_density_from_current(current: f64, area: f64) -> Result<f64, DomainError> {
    if !(area > 0.0) {
        return Err(DomainError::new(
            ModelTerm::CurrentDensity,
            "area must be positive",
            &[("current", current), ("area", area)],
        ));
    }
    Ok(current / area)
}

/// Maximum current density implied by the nominal current (A/cm²).
pub fn max_current_density(nominal_current: f64, area: f64) -> Result<f64, DomainError> {
    let j_max = current_density_from_current(nominal_current, area)?;
    if j_max <= 0.0 {
        return Err(DomainError::new(
            ModelTerm::CurrentDensity,
            "maximum current density must be positive",
            &[("nominal_current", nominal_current), ("area", area)],
        ));
    }
    Ok(j_max)
}

/// O₂ concentration (mol/cm³) from the air pressure (atm) using the ideal gas law.
pub fn oxygen_concentration(
    constants: &PhysicalConstants,
    air_pressure_atm: f64,
    temperature: f64,
) -> Result<f64, DomainError> {
    let inputs = [("air_pressure", air_pressure_atm), ("temperature", temperature)];
    if !(air_pressure_atm > 0.0) || !(temperature > 0.0) {
        return Err(DomainError::new(
            ModelTerm::OxygenConcentration,
            "pressure and temperature must be positive",
            &inputs,
        ));
    }
    let p_o2 = units::O2_VOLUME_FRACTION * units::atm_to_pa(air_pressure_atm);
    let per_m3 = p_o2 / (constants.gas_constant * temperature);
    finite(
        units::per_m3_to_per_cm3(per_m3),
        ModelTerm::OxygenConcentration,
        &inputs,
    )
}

/// Nernst voltage `E0 - k1*(T - T_ref) + (R/nF)*T*ln(P_H2*sqrt(P_O2))`.
pub fn reversible_voltage(
    constants: &PhysicalConstants,
    temperature: f64,
    p_h2: f64,
    p_o2: f64,
) -> Result<f64, DomainError> {
    let inputs = [("temperature", temperature), ("p_h2", p_h2), ("p_o2", p_o2)];
    if !(temperature > 0.0) || !(p_h2 > 0.0) || !(p_o2 > 0.0) {
        return Err(DomainError::new(
            ModelTerm::Reversible,
            "temperature and partial pressures must be positive",
            &inputs,
        ));
    }
    let e = constants.standard_potential
        - constants.temperature_coeff * (temperature - units::T_REF)
        + constants.nernst_slope() * temperature * (p_h2 * p_o2.sqrt()).ln();
    finite(e, ModelTerm::Reversible, &inputs)
}

/// Activation overvoltage for the configured activation model.
pub fn activation_loss(
    constants: &PhysicalConstants,
    params: &CellParameters,
    point: &OperatingPoint,
) -> Result<f64, DomainError> {
    let t = point.temperature;
    match params.activation_model {
        ActivationModel::SemiEmpirical => {
            let i_cell = point.current_density * params.area;
            let c_o2 = point.oxygen_concentration;
            let inputs = [("i_cell", i_cell), ("c_o2", c_o2), ("temperature", t)];
            if !(i_cell > 0.0) || !(c_o2 > 0.0) {
                return Err(DomainError::new(
                    ModelTerm::Activation,
                    "cell current and O2 concentration must be positive",
                    &inputs,
                ));
            }
            let eps = params.activation;
            let loss = eps.0 + eps.1 * t + eps.2 * t * c_o2.ln() + eps.3 * t * i_cell.ln();
            finite(loss, ModelTerm::Activation, &inputs)
        }
        ActivationModel::Tafel => {
            let j = point.current_density;
            let i0 = params.exchange_current_density;
            let alpha = params.transfer_coeff;
            let inputs = [("j", j), ("i0", i0), ("alpha", alpha), ("temperature", t)];
            if !(j > 0.0) || !(i0 > 0.0) || !(alpha > 0.0) {
                return Err(DomainError::new(
                    ModelTerm::Activation,
                    "current density, exchange current density and transfer coefficient must be positive",
                    &inputs,
                ));
            }
            let slope = constants.thermal_voltage(t) / alpha;
            finite(slope * (j / i0).ln(), ModelTerm::Activation, &inputs)
        }
    }
}

/// Ohmic drop `J * (R_membrane + R_contact)`.
pub fn ohmic_loss(params: &CellParameters, current_density: f64) -> Result<f64, DomainError> {
    let inputs = [
        ("j", current_density),
        ("r_membrane", params.membrane_resistance),
        ("r_contact", params.contact_resistance),
    ];
    if params.membrane_resistance < 0.0 || params.contact_resistance < 0.0 {
        return Err(DomainError::new(
            ModelTerm::Ohmic,
            "resistances must be non-negative",
            &inputs,
        ));
    }
    finite(
        current_density * params.total_resistance(),
        ModelTerm::Ohmic,
        &inputs,
    )
}

/// Mass-transport loss `-b * ln(1 - J/J_max)` with `b = RT/(nF)`.
///
/// Defined only for `0 <= J < J_max`.
pub fn concentration_loss(
    constants: &PhysicalConstants,
    temperature: f64,
    current_density: f64,
    limiting_current_density: f64,
) -> Result<f64, DomainError> {
    let inputs = [
        ("j", current_density),
        ("j_max", limiting_current_density),
        ("temperature", temperature),
    ];
    if !(limiting_current_density > 0.0) {
        return Err(DomainError::new(
            ModelTerm::Concentration,
            "limiting current density must be positive",
            &inputs,
        ));
    }
    if !(current_density >= 0.0) || current_density >= limiting_current_density {
        return Err(DomainError::new(
            ModelTerm::Concentration,
            "current density must lie in [0, j_max)",
            &inputs,
        ));
    }
    let b = constants.thermal_voltage(temperature);
    finite(
        -b * (1.0 - current_density / limiting_current_density).ln(),
        ModelTerm::Concentration,
        &inputs,
    )
}

/// Polarization model bound to one set of constants and one cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolarizationModel {
    pub constants: PhysicalConstants,
    pub params: CellParameters,
}

impl PolarizationModel {
    pub fn new(constants: PhysicalConstants, params: CellParameters) -> Self {
        Self { constants, params }
    }

    /// Evaluate every term of the polarization equation at `point`.
    pub fn evaluate(&self, point: &OperatingPoint) -> Result<VoltageBreakdown, DomainError> {
        let j = point.current_density;
        let reversible =
            reversible_voltage(&self.constants, point.temperature, point.p_h2, point.p_o2)?;
        let activation = activation_loss(&self.constants, &self.params, point)?;
        let ohmic = ohmic_loss(&self.params, j)?;
        let concentration = concentration_loss(
            &self.constants,
            point.temperature,
            j,
            self.params.limiting_current_density,
        )?;
        let net = reversible - activation - ohmic - concentration;
        let net = finite(net, ModelTerm::Reversible, &[("j", j)])?;
        Ok(VoltageBreakdown {
            current_density: j,
            reversible,
            activation,
            ohmic,
            concentration,
            net,
        })
    }

    /// Maximum current density implied by this cell's nominal current.
    pub fn nominal_max_current_density(&self) -> Result<f64, DomainError> {
        max_current_density(self.params.nominal_current, self.params.area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(j: f64) -> OperatingPoint {
        let constants = PhysicalConstants::default();
        OperatingPoint {
            current_density: j,
            temperature: 343.0,
            p_h2: 1.5,
            p_o2: 0.21 * 1.5,
            oxygen_concentration: oxygen_concentration(&constants, 1.5, 343.0).unwrap(),
        }
    }

    #[test]
    fn net_is_reversible_minus_losses() {
        let model = PolarizationModel::default();
        let b = model.evaluate(&point(0.5)).unwrap();
        assert_eq!(b.net, b.reversible - b.activation - b.ohmic - b.concentration);
        assert!(b.net > 0.0 && b.net < b.reversible);
    }

    #[test]
    fn reversible_voltage_at_standard_conditions_is_e0() {
        let c = PhysicalConstants::default();
        let e = reversible_voltage(&c, units::T_REF, 1.0, 1.0).unwrap();
        assert!((e - c.standard_potential).abs() < 1e-12);
    }

    #[test]
    fn reversible_voltage_drops_with_temperature() {
        let c = PhysicalConstants::default();
        let cold = reversible_voltage(&c, 313.0, 1.5, 0.315).unwrap();
        let hot = reversible_voltage(&c, 353.0, 1.5, 0.315).unwrap();
        assert!(hot < cold);
    }

    #[test]
    fn at_or_above_limit_is_domain_error() {
        let model = PolarizationModel::default();
        let j_max = model.params.limiting_current_density;
        for j in [j_max, j_max * 1.2] {
            let err = model.evaluate(&point(j)).unwrap_err();
            assert_eq!(err.term, ModelTerm::Concentration);
            assert_eq!(err.input("j"), Some(j));
        }
    }

    #[test]
    fn zero_current_is_activation_domain_error() {
        let model = PolarizationModel::default();
        let err = model.evaluate(&point(0.0)).unwrap_err();
        assert_eq!(err.term, ModelTerm::Activation);
    }

    #[test]
    fn non_positive_oxygen_concentration_is_rejected() {
        let model = PolarizationModel::default();
        let mut p = point(0.4);
        p.oxygen_concentration = 0.0;
        let err = model.evaluate(&p).unwrap_err();
        assert_eq!(err.term, ModelTerm::Activation);
        assert_eq!(err.input("c_o2"), Some(0.0));
    }

    #[test]
    fn concentration_loss_grows_towards_limit() {
        let c = PhysicalConstants::default();
        let low = concentration_loss(&c, 343.0, 0.1, 1.5).unwrap();
        let high = concentration_loss(&c, 343.0, 1.49, 1.5).unwrap();
        assert!(low >= 0.0);
        assert!(high > low);
        assert_eq!(concentration_loss(&c, 343.0, 0.0, 1.5).unwrap(), 0.0);
        assert!(concentration_loss(&c, 343.0, 0.5, 0.0).is_err());
        assert!(concentration_loss(&c, 343.0, -0.1, 1.5).is_err());
    }

    #[test]
    fn negative_resistance_is_rejected() {
        let params = CellParameters {
            membrane_resistance: -0.1,
            ..CellParameters::default()
        };
        assert_eq!(ohmic_loss(&params, 0.5).unwrap_err().term, ModelTerm::Ohmic);
    }

    #[test]
    fn tafel_activation_increases_with_current() {
        let params = CellParameters {
            activation_model: ActivationModel::Tafel,
            ..CellParameters::default()
        };
        let model = PolarizationModel::new(PhysicalConstants::default(), params);
        let low = model.evaluate(&point(0.1)).unwrap();
        let high = model.evaluate(&point(1.0)).unwrap();
        assert!(high.activation > low.activation);
    }

    #[test]
    fn helpers_divide_by_area() {
        assert_eq!(current_density_from_current(25.0, 50.0).unwrap(), 0.5);
        assert_eq!(max_current_density(30.0, 50.0).unwrap(), 0.6);
        assert!(max_current_density(0.0, 50.0).is_err());
        assert!(current_density_from_current(1.0, 0.0).is_err());
        let c = PhysicalConstants::default();
        let c_o2 = oxygen_concentration(&c, 1.0, units::T_REF).unwrap();
        assert!((c_o2 - 8.584e-6).abs() < 1e-8);
        assert!(oxygen_concentration(&c, -1.0, 343.0).is_err());
    }
}
