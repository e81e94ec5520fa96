// cell/sweep.rs
// Current density sweeps and the polarization curves they produce

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::params::OperatingPoint;
use super::voltage::{PolarizationModel, VoltageBreakdown};
use crate::config;
use crate::error::DomainError;

/// Evenly spaced current density grid (A/cm²), both ends included.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrentSweep {
    pub start: f64,
    pub stop: f64,
    pub points: usize,
}

impl Default for CurrentSweep {
    fn default() -> Self {
        Self {
            start: config::SWEEP_START,
            stop: 1.5,
            points: config::SWEEP_POINTS,
        }
    }
}

impl CurrentSweep {
    pub fn new(start: f64, stop: f64, points: usize) -> Self {
        Self { start, stop, points }
    }

    /// Pull `stop` back so every grid point stays strictly below `j_max`.
    pub fn clamped_below(&self, j_max: f64) -> Self {
        let ceiling = j_max * (1.0 - config::SWEEP_LIMIT_MARGIN);
        Self {
            stop: self.stop.min(ceiling),
            ..*self
        }
    }

    pub fn values(&self) -> Vec<f64> {
        match self.points {
            0 => Vec::new(),
            1 => vec![self.start],
            n => {
                let step = (self.stop - self.start) / (n - 1) as f64;
                (0..n).map(|i| self.start + step * i as f64).collect()
            }
        }
    }
}

/// Environment shared by every point of a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepConditions {
    pub temperature: f64,
    pub p_h2: f64,
    pub p_o2: f64,
    pub oxygen_concentration: f64,
}

impl SweepConditions {
    pub fn at(&self, current_density: f64) -> OperatingPoint {
        OperatingPoint {
            current_density,
            temperature: self.temperature,
            p_h2: self.p_h2,
            p_o2: self.p_o2,
            oxygen_concentration: self.oxygen_concentration,
        }
    }
}

/// A grid point that was dropped from a sweep, with the reason.
#[derive(Clone, Debug, PartialEq)]
pub struct ExcludedPoint {
    pub current_density: f64,
    pub error: DomainError,
}

/// Voltage against current density. Out-of-domain grid points live in `excluded`, never in `points`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolarizationCurve {
    pub points: Vec<VoltageBreakdown>,
    pub excluded: Vec<ExcludedPoint>,
}

impl PolarizationCurve {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_voltage(&self) -> Option<f64> {
        self.points.iter().map(|p| p.net).reduce(f64::max)
    }

    /// Point of maximum power density.
    pub fn peak_power(&self) -> Option<&VoltageBreakdown> {
        self.points
            .iter()
            .max_by(|a, b| a.power_density().total_cmp(&b.power_density()))
    }

    /// Net voltage at the grid point nearest to `current_density`.
    pub fn voltage_at(&self, current_density: f64) -> Option<f64> {
        self.points
            .iter()
            .min_by(|a, b| {
                (a.current_density - current_density)
                    .abs()
                    .total_cmp(&(b.current_density - current_density).abs())
            })
            .map(|p| p.net)
    }
}

impl PolarizationModel {
    /// Evaluate the model over a current density grid.
    pub fn sweep(&self, conditions: &SweepConditions, sweep: &CurrentSweep) -> PolarizationCurve {
        let mut curve = PolarizationCurve::default();
        for j in sweep.values() {
            match self.evaluate(&conditions.at(j)) {
                Ok(breakdown) => curve.points.push(breakdown),
                Err(error) => curve.excluded.push(ExcludedPoint {
                    current_density: j,
                    error,
                }),
            }
        }
        if !curve.excluded.is_empty() {
            debug!(
                excluded = curve.excluded.len(),
                kept = curve.points.len(),
                "sweep points outside the model domain were dropped"
            );
        }
        curve
    }
}
