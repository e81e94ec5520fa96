use std::fmt;

use thiserror::Error;

/// Term of the polarization model in which a domain violation occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTerm {
    Reversible,
    Activation,
    Ohmic,
    Concentration,
    OxygenConcentration,
    CurrentDensity,
}

impl fmt::Display for ModelTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelTerm::Reversible => "reversible",
            ModelTerm::Activation => "activation",
            ModelTerm::Ohmic => "ohmic",
            ModelTerm::Concentration => "concentration",
            ModelTerm::OxygenConcentration => "oxygen concentration",
            ModelTerm::CurrentDensity => "current density",
        };
        f.write_str(name)
    }
}

/// A physical or mathematical precondition of the voltage model was violated.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{term} term out of domain: {reason} ({})", format_inputs(.inputs))]
pub struct DomainError {
    pub term: ModelTerm,
    pub reason: &'static str,
    /// Named input values that triggered the violation.
    pub inputs: Vec<(&'static str, f64)>,
}

impl DomainError {
    pub fn new(term: ModelTerm, reason: &'static str, inputs: &[(&'static str, f64)]) -> Self {
        Self {
            term,
            reason,
            inputs: inputs.to_vec(),
        }
    }

    /// Look up one of the recorded inputs by name.
    pub fn input(&self, name: &str) -> Option<f64> {
        self.inputs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }
}

fn format_inputs(inputs: &[(&'static str, f64)]) -> String {
    inputs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UndefinedMetricError {
    #[error("signal-to-noise ratio is undefined for an observed value of zero")]
    ZeroObserved,

    #[error("signal-to-noise ratio is undefined for non-finite observed value {0}")]
    NonFiniteObserved(f64),

    #[error("signal-to-noise ratio is undefined for a sample count of zero")]
    EmptySample,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DesignError {
    #[error("experiment design needs at least one control factor")]
    NoFactors,

    #[error("factor '{factor}' has {found} levels, expected {expected}")]
    InconsistentLevelCount {
        factor: String,
        expected: usize,
        found: usize,
    },

    #[error("factor '{0}' has no present levels")]
    NoPresentLevels(String),

    #[error("factor '{0}' is defined more than once")]
    DuplicateFactor(String),

    #[error("factor '{factor}' level {level} is not a finite number")]
    NonFiniteLevel { factor: String, level: usize },

    #[error("cannot sample {size} distinct rows from a space of {available}")]
    InvalidSampleSize { size: usize, available: usize },

    #[error("evaluation of run {run} failed: {source}")]
    Evaluation {
        run: usize,
        #[source]
        source: DomainError,
    },

    #[error(transparent)]
    Metric(#[from] UndefinedMetricError),

    #[error("run {run} has not been evaluated")]
    NotEvaluated { run: usize },

    #[error("unknown control factor '{0}'")]
    UnknownFactor(String),

    #[error("factors '{first}' and '{second}' both drive the {role} role")]
    DuplicateRole {
        role: String,
        first: String,
        second: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("table is empty, header row missing")]
    MissingHeader,

    #[error("malformed header: {0}")]
    BadHeader(String),

    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: cannot parse '{value}' as a number")]
    BadNumber { line: usize, value: String },

    #[error("line {line}: observed value and signal-to-noise ratio must be set together")]
    PartialObservation { line: usize },

    #[error("line {line}: run number {found}, expected {expected}")]
    RunNumber {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        TableError::Csv(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum PemfcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Design error: {0}")]
    Design(#[from] DesignError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type PemfcResult<T> = Result<T, PemfcError>;
