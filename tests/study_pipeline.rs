//! End-to-end study: config file in, exported tables and report out.

use std::path::PathBuf;

use pemfc_taguchi::doe::{parse_array_csv, DoeConfig, DoeRunner, ResponseMetric, SnConvention};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pemfc_taguchi_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn config_file_drives_a_full_study() {
    let dir = scratch_dir("pipeline");
    let config_path = dir.join("study.toml");
    DoeConfig::canonical().to_file(&config_path).unwrap();

    let config = DoeConfig::from_file(&config_path).unwrap();
    assert_eq!(config, DoeConfig::canonical());

    let runner = DoeRunner::new(config, dir.join("out"));
    let report = runner.run().unwrap();
    let paths = runner.export(&report).unwrap();
    assert_eq!(paths.len(), 3);
    assert!(paths.iter().all(|p| p.exists()));

    let table = std::fs::read_to_string(&paths[0]).unwrap();
    assert_eq!(parse_array_csv(&table).unwrap(), report.array);

    let summary = std::fs::read_to_string(&paths[1]).unwrap();
    assert!(summary.starts_with("Factor,Level,Value,Runs,Mean_SNR,Range"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths[2]).unwrap()).unwrap();
    assert_eq!(json["study_name"], "PEMFC Taguchi Study");
    assert_eq!(json["array"]["runs"].as_array().unwrap().len(), 18);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn every_optimal_level_is_a_present_level() {
    let mut config = DoeConfig::canonical();
    config.response = ResponseMetric::PeakPowerDensity;
    let factors = config.factors.clone();
    let report = DoeRunner::new(config, "unused").run().unwrap();

    for factor in factors {
        let best = report.optimal_levels[&factor.name];
        assert!(best.level >= 1 && best.level <= factor.values.len());
        assert_eq!(best.value, factor.values[best.level - 1]);
    }
}

#[test]
fn convention_only_changes_the_ranking() {
    let mut larger = DoeConfig::canonical();
    larger.convention = SnConvention::LargerIsBetter;
    let mut smaller = larger.clone();
    smaller.convention = SnConvention::SmallerIsBetter;

    let a = DoeRunner::new(larger, "unused").run().unwrap();
    let b = DoeRunner::new(smaller, "unused").run().unwrap();
    assert_eq!(a.array, b.array);
    assert_eq!(a.response_table, b.response_table);

    for response in &a.response_table {
        if response.range > 0.0 {
            assert_ne!(
                a.optimal_levels[&response.factor].level,
                b.optimal_levels[&response.factor].level
            );
        }
    }
}

#[test]
fn full_factorial_export_reads_back() {
    let dir = scratch_dir("factorial");
    let runner = DoeRunner::new(DoeConfig::canonical(), dir.clone());
    let array = runner.run_full_factorial().unwrap();
    let paths = runner.export_full_factorial(&array).unwrap();

    assert!(paths[0].ends_with("PEMFC_Taguchi_Study_control_factors.csv"));
    let factors = std::fs::read_to_string(&paths[0]).unwrap();
    assert_eq!(factors.lines().count(), 7);

    let table = std::fs::read_to_string(&paths[1]).unwrap();
    let parsed = parse_array_csv(&table).unwrap();
    assert_eq!(parsed.len(), 162);
    assert_eq!(parsed, array);

    let _ = std::fs::remove_dir_all(&dir);
}
