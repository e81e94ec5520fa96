pub mod cell;
pub mod config;
pub mod doe;
pub mod error;
pub mod units;

pub use cell::{
    CellParameters, OperatingPoint, PhysicalConstants, PolarizationModel, VoltageBreakdown,
};
pub use error::{DesignError, DomainError, PemfcError, PemfcResult, UndefinedMetricError};
