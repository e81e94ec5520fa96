// doe/analysis.rs
// Signal-to-noise ratios, level response table, and optimal level selection

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::array::OrthogonalArray;
use crate::error::{DesignError, UndefinedMetricError};

/// `10 * log10(observed² / sample_count)`.
pub fn signal_to_noise(observed: f64, sample_count: usize) -> Result<f64, UndefinedMetricError> {
    if !observed.is_finite() {
        return Err(UndefinedMetricError::NonFiniteObserved(observed));
    }
    if observed == 0.0 {
        return Err(UndefinedMetricError::ZeroObserved);
    }
    if sample_count == 0 {
        return Err(UndefinedMetricError::EmptySample);
    }
    Ok(10.0 * (observed * observed / sample_count as f64).log10())
}

/// Which end of the mean S/N scale marks the best level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnConvention {
    LargerIsBetter,
    SmallerIsBetter,
}

impl Default for SnConvention {
    fn default() -> Self {
        SnConvention::LargerIsBetter
    }
}

impl SnConvention {
    fn prefers(&self, candidate: f64, incumbent: f64) -> bool {
        match self {
            SnConvention::LargerIsBetter => candidate > incumbent,
            SnConvention::SmallerIsBetter => candidate < incumbent,
        }
    }
}

/// Mean S/N of one factor level across the runs that used it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelMean {
    pub level: usize,
    pub value: f64,
    pub mean_snr: f64,
    pub runs: usize,
}

/// Response table row for one factor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactorResponse {
    pub factor: String,
    /// Levels that appear in the array, ascending by level number
    pub levels: Vec<LevelMean>,
    /// Max minus min of the level means
    pub range: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimalLevel {
    pub level: usize,
    pub value: f64,
    pub mean_snr: f64,
}

/// Mean S/N per level for every factor. The array must be fully evaluated.
pub fn level_response_table(array: &OrthogonalArray) -> Result<Vec<FactorResponse>, DesignError> {
    let observations = array.observations()?;

    let table = array
        .factors
        .iter()
        .enumerate()
        .map(|(factor_index, name)| {
            // level -> (value, snr sum, count)
            let mut groups: BTreeMap<usize, (f64, f64, usize)> = BTreeMap::new();
            for (run, obs) in array.runs.iter().zip(&observations) {
                if let Some(setting) = run.point.settings.get(factor_index) {
                    let entry = groups.entry(setting.level).or_insert((setting.value, 0.0, 0));
                    entry.1 += obs.snr;
                    entry.2 += 1;
                }
            }

            let levels: Vec<LevelMean> = groups
                .into_iter()
                .map(|(level, (value, sum, runs))| LevelMean {
                    level,
                    value,
                    mean_snr: sum / runs as f64,
                    runs,
                })
                .collect();
            let max = levels.iter().map(|l| l.mean_snr).fold(f64::NEG_INFINITY, f64::max);
            let min = levels.iter().map(|l| l.mean_snr).fold(f64::INFINITY, f64::min);
            let range = if levels.is_empty() { 0.0 } else { max - min };

            FactorResponse {
                factor: name.clone(),
                levels,
                range,
            }
        })
        .collect();
    Ok(table)
}

/// Best level of each factor by mean S/N. Ties keep the lowest level number.
pub fn rank_optimal_levels(
    array: &OrthogonalArray,
    convention: SnConvention,
) -> Result<BTreeMap<String, OptimalLevel>, DesignError> {
    let table = level_response_table(array)?;
    let mut optimal = BTreeMap::new();
    for response in table {
        let mut best: Option<&LevelMean> = None;
        for candidate in &response.levels {
            match best {
                Some(incumbent) if !convention.prefers(candidate.mean_snr, incumbent.mean_snr) => {}
                _ => best = Some(candidate),
            }
        }
        if let Some(best) = best {
            optimal.insert(
                response.factor.clone(),
                OptimalLevel {
                    level: best.level,
                    value: best.value,
                    mean_snr: best.mean_snr,
                },
            );
        }
    }
    Ok(optimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doe::array::{Observation, Run};
    use crate::doe::factors::{DesignPoint, LevelSetting};

    fn setting(level: usize, value: f64) -> LevelSetting {
        LevelSetting { level, value }
    }

    /// Two factors; temperature level 2 (333 K) always observes the highest value.
    fn synthetic() -> OrthogonalArray {
        let mut runs = Vec::new();
        for (t_level, t) in [(1, 313.0), (2, 333.0), (3, 353.0)] {
            for (p_level, p) in [(1, 1.5), (2, 2.0)] {
                let base = if t_level == 2 { 2.0 } else { 1.0 };
                let observed = base + 0.1 * p_level as f64;
                runs.push(Run {
                    point: DesignPoint::new(vec![setting(t_level, t), setting(p_level, p)]),
                    observation: Some(Observation::new(observed, 6).unwrap()),
                });
            }
        }
        OrthogonalArray {
            factors: vec!["temperature".into(), "pressure".into()],
            runs,
        }
    }

    #[test]
    fn snr_reference_values() {
        let snr = signal_to_noise(2.0, 18).unwrap();
        assert!((snr - 10.0 * (4.0f64 / 18.0).log10()).abs() < 1e-12);
        assert!((snr + 6.532).abs() < 1e-3);
        assert_eq!(signal_to_noise(-2.0, 18).unwrap(), snr);
    }

    #[test]
    fn snr_undefined_cases() {
        assert_eq!(signal_to_noise(0.0, 18), Err(UndefinedMetricError::ZeroObserved));
        assert_eq!(signal_to_noise(2.0, 0), Err(UndefinedMetricError::EmptySample));
        assert!(matches!(
            signal_to_noise(f64::NAN, 18),
            Err(UndefinedMetricError::NonFiniteObserved(_))
        ));
    }

    #[test]
    fn dominant_temperature_level_is_selected() {
        let optimal = rank_optimal_levels(&synthetic(), SnConvention::LargerIsBetter).unwrap();
        let t = optimal["temperature"];
        assert_eq!(t.level, 2);
        assert_eq!(t.value, 333.0);
        assert_eq!(optimal["pressure"].level, 2);
    }

    #[test]
    fn smaller_is_better_flips_the_choice() {
        let optimal = rank_optimal_levels(&synthetic(), SnConvention::SmallerIsBetter).unwrap();
        assert_eq!(optimal["temperature"].level, 1);
        assert_eq!(optimal["pressure"].level, 1);
    }

    #[test]
    fn response_table_groups_and_ranges() {
        let table = level_response_table(&synthetic()).unwrap();
        assert_eq!(table.len(), 2);
        let temp = &table[0];
        assert_eq!(temp.levels.len(), 3);
        assert!(temp.levels.iter().all(|l| l.runs == 2));
        assert!(temp.range > table[1].range);
    }

    #[test]
    fn unevaluated_array_cannot_be_ranked() {
        let mut array = synthetic();
        array.runs[3].observation = None;
        assert_eq!(
            rank_optimal_levels(&array, SnConvention::default()).unwrap_err(),
            DesignError::NotEvaluated { run: 4 }
        );
    }
}
