/// Export DOE results to CSV format for spreadsheet analysis
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Writer};
use tracing::info;

use super::analysis::FactorResponse;
use super::array::{Observation, OrthogonalArray, Run};
use super::factors::{ControlFactor, DesignPoint, LevelSetting};
use crate::error::{PemfcResult, TableError};

const RUN_COLUMN: &str = "Run";
const OBSERVED_COLUMN: &str = "Observed";
const SNR_COLUMN: &str = "SNR";
const LEVEL_SUFFIX: &str = "_level";

fn array_header(factors: &[String]) -> Vec<String> {
    let mut header = vec![RUN_COLUMN.to_string()];
    for name in factors {
        header.push(format!("{name}{LEVEL_SUFFIX}"));
        header.push(name.clone());
    }
    header.push(OBSERVED_COLUMN.to_string());
    header.push(SNR_COLUMN.to_string());
    header
}

fn write_array_records<W: io::Write>(
    writer: &mut Writer<W>,
    array: &OrthogonalArray,
) -> Result<(), csv::Error> {
    writer.write_record(array_header(&array.factors))?;
    for (i, run) in array.runs.iter().enumerate() {
        let mut record = vec![(i + 1).to_string()];
        for setting in &run.point.settings {
            record.push(setting.level.to_string());
            record.push(setting.value.to_string());
        }
        match run.observation {
            Some(obs) => {
                record.push(obs.observed.to_string());
                record.push(obs.snr.to_string());
            }
            None => record.extend([String::new(), String::new()]),
        }
        writer.write_record(&record)?;
    }
    Ok(())
}

/// Render the array as CSV: `Run,<factor>_level,<factor>,...,Observed,SNR`.
///
/// Unevaluated runs leave the last two cells empty. Factor names are quoted
/// when they contain delimiters.
pub fn array_to_csv(array: &OrthogonalArray) -> Result<String, TableError> {
    let mut writer = Writer::from_writer(Vec::new());
    write_array_records(&mut writer, array)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| TableError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TableError::Csv(e.to_string()))
}

/// Parse a table written by [`array_to_csv`].
pub fn parse_array_csv(text: &str) -> Result<OrthogonalArray, TableError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader.headers()?.clone();
    if header.is_empty() {
        return Err(TableError::MissingHeader);
    }
    let factors = parse_header(&header)?;
    let columns = 3 + 2 * factors.len();

    let mut runs = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map_or(idx + 2, |pos| pos.line() as usize);
        if record.len() != columns {
            return Err(TableError::ColumnCount {
                line,
                expected: columns,
                found: record.len(),
            });
        }

        let cells: Vec<&str> = record.iter().map(str::trim).collect();
        let run_number: usize = parse_cell(cells[0], line)?;
        if run_number != idx + 1 {
            return Err(TableError::RunNumber {
                line,
                expected: idx + 1,
                found: run_number,
            });
        }

        let settings = cells[1..columns - 2]
            .chunks(2)
            .map(|pair| -> Result<LevelSetting, TableError> {
                Ok(LevelSetting {
                    level: parse_cell::<usize>(pair[0], line)?,
                    value: parse_cell::<f64>(pair[1], line)?,
                })
            })
            .collect::<Result<Vec<_>, TableError>>()?;

        let observation = match (cells[columns - 2], cells[columns - 1]) {
            ("", "") => None,
            (observed, snr) if !observed.is_empty() && !snr.is_empty() => Some(Observation {
                observed: parse_cell(observed, line)?,
                snr: parse_cell(snr, line)?,
            }),
            _ => return Err(TableError::PartialObservation { line }),
        };

        runs.push(Run {
            point: DesignPoint::new(settings),
            observation,
        });
    }
    Ok(OrthogonalArray { factors, runs })
}

fn parse_header(header: &StringRecord) -> Result<Vec<String>, TableError> {
    let cells: Vec<&str> = header.iter().collect();
    let n = cells.len();
    let joined = || cells.join(",");
    if n < 3 || n % 2 == 0 {
        return Err(TableError::BadHeader(joined()));
    }
    if cells[0] != RUN_COLUMN || cells[n - 2] != OBSERVED_COLUMN || cells[n - 1] != SNR_COLUMN {
        return Err(TableError::BadHeader(joined()));
    }
    cells[1..n - 2]
        .chunks(2)
        .map(|pair| match pair[0].strip_suffix(LEVEL_SUFFIX) {
            Some(name) if name == pair[1] && !name.is_empty() => Ok(name.to_string()),
            _ => Err(TableError::BadHeader(format!(
                "expected '{}{LEVEL_SUFFIX}' before '{}'",
                pair[1], pair[1]
            ))),
        })
        .collect()
}

fn parse_cell<T: std::str::FromStr>(cell: &str, line: usize) -> Result<T, TableError> {
    cell.parse().map_err(|_| TableError::BadNumber {
        line,
        value: cell.to_string(),
    })
}

/// Write the array table to `<output_dir>/<stem>_array.csv`.
pub fn write_array_csv(array: &OrthogonalArray, output_dir: &Path, stem: &str) -> PemfcResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{stem}_array.csv"));
    let mut writer = Writer::from_path(&path)?;
    write_array_records(&mut writer, array)?;
    writer.flush()?;
    info!(path = %path.display(), runs = array.len(), "exported orthogonal array");
    Ok(path)
}

/// Write the factor definitions to `<output_dir>/<stem>_control_factors.csv`.
///
/// One column per factor, one row per level slot. Absent levels are empty cells.
pub fn write_control_factors_csv(
    factors: &[ControlFactor],
    output_dir: &Path,
    stem: &str,
) -> PemfcResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{stem}_control_factors.csv"));
    let mut writer = Writer::from_path(&path)?;

    let mut header = vec!["Level".to_string()];
    header.extend(factors.iter().map(|f| f.name.clone()));
    writer.write_record(&header)?;

    let slots = factors.iter().map(|f| f.levels.len()).max().unwrap_or(0);
    for slot in 0..slots {
        let mut record = vec![(slot + 1).to_string()];
        record.extend(factors.iter().map(|f| {
            f.levels
                .get(slot)
                .and_then(|level| level.value())
                .map(|v| v.to_string())
                .unwrap_or_default()
        }));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    info!(path = %path.display(), factors = factors.len(), "exported control factors");
    Ok(path)
}

/// Write the level response table to `<output_dir>/<stem>_summary.csv`.
pub fn write_summary_csv(
    table: &[FactorResponse],
    output_dir: &Path,
    stem: &str,
) -> PemfcResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{stem}_summary.csv"));
    let mut writer = Writer::from_path(&path)?;

    writer.write_record(["Factor", "Level", "Value", "Runs", "Mean_SNR", "Range"])?;
    for response in table {
        for level in &response.levels {
            writer.write_record([
                response.factor.clone(),
                level.level.to_string(),
                level.value.to_string(),
                level.runs.to_string(),
                level.mean_snr.to_string(),
                response.range.to_string(),
            ])?;
        }
    }
    writer.flush()?;
    info!(path = %path.display(), "exported level response table");
    Ok(path)
}
