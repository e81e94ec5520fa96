// doe/factors.rs
// Control factors, their levels, and the full factorial space they span

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::DesignError;

/// One level slot of a control factor.
///
/// A factor with fewer real levels than the nominal count pads with `Absent`,
/// never with a placeholder number.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Level {
    Present(f64),
    Absent,
}

impl Level {
    pub fn value(&self) -> Option<f64> {
        match self {
            Level::Present(v) => Some(*v),
            Level::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Level::Present(_))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlFactor {
    pub name: String,
    pub levels: Vec<Level>,
}

impl ControlFactor {
    pub fn new(name: impl Into<String>, levels: Vec<Level>) -> Self {
        Self {
            name: name.into(),
            levels,
        }
    }

    /// Build a factor from its real levels, padding with `Absent` up to `nominal`.
    pub fn padded(name: impl Into<String>, values: &[f64], nominal: usize) -> Self {
        let mut levels: Vec<Level> = values.iter().map(|&v| Level::Present(v)).collect();
        levels.resize(nominal.max(values.len()), Level::Absent);
        Self::new(name, levels)
    }

    /// Present levels as (1-based level number, value).
    pub fn present_levels(&self) -> impl Iterator<Item = LevelSetting> + '_ {
        self.levels.iter().enumerate().filter_map(|(i, level)| {
            level.value().map(|value| LevelSetting {
                level: i + 1,
                value,
            })
        })
    }

    pub fn present_count(&self) -> usize {
        self.levels.iter().filter(|l| l.is_present()).count()
    }
}

/// A factor fixed at one of its levels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelSetting {
    /// 1-based position in the factor's level sequence
    pub level: usize,
    pub value: f64,
}

/// One combination of factor levels, in factor order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignPoint {
    pub settings: Vec<LevelSetting>,
}

impl DesignPoint {
    pub fn new(settings: Vec<LevelSetting>) -> Self {
        Self { settings }
    }

    pub fn level(&self, factor_index: usize) -> Option<usize> {
        self.settings.get(factor_index).map(|s| s.level)
    }

    pub fn value(&self, factor_index: usize) -> Option<f64> {
        self.settings.get(factor_index).map(|s| s.value)
    }

    pub fn levels(&self) -> Vec<usize> {
        self.settings.iter().map(|s| s.level).collect()
    }
}

/// Check that the factors describe a rectangular design.
pub fn validate_factors(factors: &[ControlFactor]) -> Result<(), DesignError> {
    let first = factors.first().ok_or(DesignError::NoFactors)?;
    let expected = first.levels.len();
    let mut seen = HashSet::new();

    for factor in factors {
        if !seen.insert(factor.name.as_str()) {
            return Err(DesignError::DuplicateFactor(factor.name.clone()));
        }
        if factor.levels.len() != expected {
            return Err(DesignError::InconsistentLevelCount {
                factor: factor.name.clone(),
                expected,
                found: factor.levels.len(),
            });
        }
        if let Some(level) = factor
            .present_levels()
            .find(|setting| !setting.value.is_finite())
        {
            return Err(DesignError::NonFiniteLevel {
                factor: factor.name.clone(),
                level: level.level,
            });
        }
        if factor.present_count() == 0 {
            return Err(DesignError::NoPresentLevels(factor.name.clone()));
        }
    }
    Ok(())
}

/// Cartesian product of the present levels of every factor.
///
/// The first factor varies slowest. Absent levels never appear.
pub fn enumerate_factorial_space(factors: &[ControlFactor]) -> Result<Vec<DesignPoint>, DesignError> {
    validate_factors(factors)?;

    let mut space: Vec<Vec<LevelSetting>> = vec![Vec::new()];
    for factor in factors {
        let levels: Vec<LevelSetting> = factor.present_levels().collect();
        space = space
            .into_iter()
            .flat_map(|prefix| {
                levels.iter().map(move |setting| {
                    let mut row = prefix.clone();
                    row.push(*setting);
                    row
                })
            })
            .collect();
    }
    Ok(space.into_iter().map(DesignPoint::new).collect())
}

/// Number of points `enumerate_factorial_space` would produce.
pub fn factorial_size(factors: &[ControlFactor]) -> usize {
    factors.iter().map(ControlFactor::present_count).product()
}

/// The four PEMFC control factors: a 6-level temperature and three 3-level supply factors.
pub fn canonical_control_factors() -> Vec<ControlFactor> {
    let n = config::NOMINAL_LEVEL_COUNT;
    vec![
        ControlFactor::padded(
            "operating_temperature",
            &[313.0, 323.0, 333.0, 338.0, 343.0, 353.0],
            n,
        ),
        ControlFactor::padded("fuel_flow_rate", &[50.0, 65.0, 85.0], n),
        ControlFactor::padded("air_flow_rate", &[300.0, 400.0, 500.0], n),
        ControlFactor::padded("fuel_supply_pressure", &[1.5, 2.0, 2.5], n),
    ]
}
