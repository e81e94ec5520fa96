// doe/array.rs
// The reduced orthogonal array and its evaluation

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::analysis::signal_to_noise;
use super::factors::{enumerate_factorial_space, ControlFactor, DesignPoint};
use super::sampling::sample_orthogonal_array;
use crate::error::{DesignError, DomainError, UndefinedMetricError};

/// Maps a design point to the scalar response the study optimizes.
///
/// The designer attaches no physical meaning to the value.
pub trait Evaluator: Sync {
    fn evaluate(&self, point: &DesignPoint) -> Result<f64, DomainError>;
}

impl<F> Evaluator for F
where
    F: Fn(&DesignPoint) -> Result<f64, DomainError> + Sync,
{
    fn evaluate(&self, point: &DesignPoint) -> Result<f64, DomainError> {
        self(point)
    }
}

/// Observed response of one run with its signal-to-noise ratio. Always set together.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub observed: f64,
    pub snr: f64,
}

impl Observation {
    pub fn new(observed: f64, sample_count: usize) -> Result<Self, UndefinedMetricError> {
        let snr = signal_to_noise(observed, sample_count)?;
        Ok(Self { observed, snr })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub point: DesignPoint,
    pub observation: Option<Observation>,
}

impl Run {
    pub fn is_evaluated(&self) -> bool {
        self.observation.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrthogonalArray {
    /// Factor names, in design-point order
    pub factors: Vec<String>,
    pub runs: Vec<Run>,
}

impl OrthogonalArray {
    /// Unevaluated array over the given points.
    pub fn from_points(factors: Vec<String>, points: Vec<DesignPoint>) -> Self {
        let runs = points
            .into_iter()
            .map(|point| Run {
                point,
                observation: None,
            })
            .collect();
        Self { factors, runs }
    }

    /// Enumerate the factorial space of `factors` and draw `size` rows with `seed`.
    pub fn design(factors: &[ControlFactor], size: usize, seed: u64) -> Result<Self, DesignError> {
        let space = enumerate_factorial_space(factors)?;
        let rows = sample_orthogonal_array(&space, size, seed)?;
        info!(
            factorial = space.len(),
            rows = rows.len(),
            seed,
            "sampled orthogonal array"
        );
        let names = factors.iter().map(|f| f.name.clone()).collect();
        Ok(Self::from_points(names, rows))
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn is_evaluated(&self) -> bool {
        !self.runs.is_empty() && self.runs.iter().all(Run::is_evaluated)
    }

    pub fn factor_index(&self, name: &str) -> Result<usize, DesignError> {
        self.factors
            .iter()
            .position(|f| f == name)
            .ok_or_else(|| DesignError::UnknownFactor(name.to_string()))
    }

    /// Observations of every run, or the 1-based number of the first unevaluated run.
    pub fn observations(&self) -> Result<Vec<Observation>, DesignError> {
        self.runs
            .iter()
            .enumerate()
            .map(|(i, run)| run.observation.ok_or(DesignError::NotEvaluated { run: i + 1 }))
            .collect()
    }

    /// Evaluate every run and return the filled-in array.
    ///
    /// Runs are evaluated in parallel. If any run fails, no array is returned and
    /// the error of the lowest-numbered failing run is reported.
    pub fn evaluate<E>(&self, evaluator: &E) -> Result<OrthogonalArray, DesignError>
    where
        E: Evaluator + ?Sized,
    {
        let sample_count = self.runs.len();
        let results: Vec<Result<Observation, DesignError>> = self
            .runs
            .par_iter()
            .enumerate()
            .map(|(i, run)| -> Result<Observation, DesignError> {
                let observed = evaluator
                    .evaluate(&run.point)
                    .map_err(|source| DesignError::Evaluation { run: i + 1, source })?;
                Ok(Observation::new(observed, sample_count)?)
            })
            .collect();
        let observations = results.into_iter().collect::<Result<Vec<_>, DesignError>>()?;

        let runs = self
            .runs
            .iter()
            .zip(observations)
            .map(|(run, observation)| Run {
                point: run.point.clone(),
                observation: Some(observation),
            })
            .collect();
        Ok(OrthogonalArray {
            factors: self.factors.clone(),
            runs,
        })
    }
}
