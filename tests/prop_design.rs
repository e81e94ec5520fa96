//! Property-based tests for the experiment designer using proptest.
//!
//! Covers: seeded sampling determinism and distinctness, array table
//! serialization roundtrip.

use std::collections::HashSet;

use pemfc_taguchi::doe::{
    array_to_csv, canonical_control_factors, enumerate_factorial_space, parse_array_csv,
    sample_orthogonal_array, ControlFactor, DesignPoint, OrthogonalArray,
};
use pemfc_taguchi::error::DomainError;
use proptest::prelude::*;

// ── Seeded sampling ──────────────────────────────────────────────────

proptest! {
    /// Same seed and space give the same rows.
    #[test]
    fn sampling_is_deterministic(seed in any::<u64>(), size in 1usize..=162) {
        let space = enumerate_factorial_space(&canonical_control_factors()).unwrap();
        let a = sample_orthogonal_array(&space, size, seed).unwrap();
        let b = sample_orthogonal_array(&space, size, seed).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Rows are distinct members of the factorial space.
    #[test]
    fn sampling_draws_without_replacement(seed in any::<u64>(), size in 1usize..=162) {
        let space = enumerate_factorial_space(&canonical_control_factors()).unwrap();
        let rows = sample_orthogonal_array(&space, size, seed).unwrap();

        prop_assert_eq!(rows.len(), size);
        let unique: HashSet<Vec<usize>> = rows.iter().map(DesignPoint::levels).collect();
        prop_assert_eq!(unique.len(), size);
        prop_assert!(rows.iter().all(|r| space.contains(r)));
    }
}

// ── Table roundtrip ──────────────────────────────────────────────────

proptest! {
    /// Parsing a serialized array reproduces its design points and observations.
    #[test]
    fn csv_roundtrip(seed in any::<u64>(), scale in 0.01f64..100.0) {
        let array = OrthogonalArray::design(&canonical_control_factors(), 18, seed)
            .unwrap()
            .evaluate(&|p: &DesignPoint| -> Result<f64, DomainError> {
                Ok(scale * p.value(0).unwrap_or(1.0) / 7.0)
            })
            .unwrap();

        let parsed = parse_array_csv(&array_to_csv(&array).unwrap()).unwrap();
        prop_assert_eq!(parsed, array);
    }
}

proptest! {
    /// Factor names survive the table even when they contain delimiters or quotes.
    #[test]
    fn csv_roundtrip_arbitrary_names(name in "[a-z ,\"]{1,12}", seed in any::<u64>()) {
        let factors = vec![
            ControlFactor::padded(name.clone(), &[313.0, 333.0, 353.0], 3),
            ControlFactor::padded("pressure_atm", &[1.5, 2.5], 3),
        ];
        let array = OrthogonalArray::design(&factors, 4, seed)
            .unwrap()
            .evaluate(&|p: &DesignPoint| -> Result<f64, DomainError> {
                Ok(p.value(0).unwrap_or(1.0) / 300.0)
            })
            .unwrap();

        let parsed = parse_array_csv(&array_to_csv(&array).unwrap()).unwrap();
        prop_assert_eq!(&parsed.factors[0], &name);
        prop_assert_eq!(parsed, array);
    }
}
