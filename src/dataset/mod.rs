//! Dataset loading and partitioning for the heart-failure clinical records.
//!
//! The loader reads the fixed 13-column CSV (12 features + `DEATH_EVENT`)
//! into memory, verifying the header schema and the binary label invariant
//! up front. It has no side effects beyond reading the file.

pub mod split;

use std::fs::File;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::types::{ClinicalRecord, FEATURE_NAMES, NUM_FEATURES};

/// Expected CSV header, in order. The last column is the label.
pub const EXPECTED_HEADER: [&str; NUM_FEATURES + 1] = [
    "age",
    "anaemia",
    "creatinine_phosphokinase",
    "diabetes",
    "ejection_fraction",
    "high_blood_pressure",
    "platelets",
    "serum_creatinine",
    "serum_sodium",
    "sex",
    "smoking",
    "time",
    "DEATH_EVENT",
];

/// Errors raised while reading the input file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open dataset file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV near row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("schema mismatch: expected columns {expected:?}, found {found:?}")]
    Schema {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("DEATH_EVENT must be 0 or 1, got {value} at row {row}")]
    Label { row: usize, value: u8 },

    #[error("dataset contains no records")]
    Empty,
}

/// Per-column summary statistics (count/mean/std/min/max).
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: &'static str,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// An ordered, immutable sequence of clinical records.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<ClinicalRecord>,
}

impl Dataset {
    /// Wrap an already-validated record list (used by tests and synthetic
    /// data generators). Labels outside {0, 1} are rejected.
    pub fn from_records(records: Vec<ClinicalRecord>) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::Empty);
        }
        for (i, rec) in records.iter().enumerate() {
            if rec.death_event > 1 {
                return Err(LoadError::Label {
                    row: i + 1,
                    value: rec.death_event,
                });
            }
        }
        Ok(Self { records })
    }

    /// Read the dataset from a CSV file with a header row.
    pub fn from_csv(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = reader
            .headers()
            .map_err(|source| LoadError::Csv { row: 0, source })?;
        let found: Vec<String> = header.iter().map(str::to_string).collect();
        if found != EXPECTED_HEADER {
            return Err(LoadError::Schema {
                expected: EXPECTED_HEADER.iter().map(|s| s.to_string()).collect(),
                found,
            });
        }

        let mut records = Vec::new();
        for (i, row) in reader.deserialize::<ClinicalRecord>().enumerate() {
            let rec = row.map_err(|source| LoadError::Csv { row: i + 1, source })?;
            if rec.death_event > 1 {
                return Err(LoadError::Label {
                    row: i + 1,
                    value: rec.death_event,
                });
            }
            records.push(rec);
        }

        if records.is_empty() {
            return Err(LoadError::Empty);
        }

        info!(rows = records.len(), path = %path.display(), "Loaded dataset");
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ClinicalRecord] {
        &self.records
    }

    /// All feature rows in [`FEATURE_NAMES`] order.
    pub fn feature_rows(&self) -> Vec<Vec<f64>> {
        self.records.iter().map(ClinicalRecord::feature_vector).collect()
    }

    /// All labels, aligned with [`Dataset::feature_rows`].
    pub fn labels(&self) -> Vec<i32> {
        self.records.iter().map(ClinicalRecord::label).collect()
    }

    /// Feature rows and labels for a subset of row indices.
    pub fn subset(&self, indices: &[usize]) -> (Vec<Vec<f64>>, Vec<i32>) {
        let rows = indices
            .iter()
            .map(|&i| self.records[i].feature_vector())
            .collect();
        let labels = indices.iter().map(|&i| self.records[i].label()).collect();
        (rows, labels)
    }

    /// Summary statistics per feature column (pandas `describe()` shape,
    /// sample standard deviation).
    pub fn describe(&self) -> Vec<ColumnSummary> {
        let rows = self.feature_rows();
        let n = rows.len();

        FEATURE_NAMES
            .iter()
            .enumerate()
            .map(|(col, &name)| {
                let values: Vec<f64> = rows.iter().map(|r| r[col]).collect();
                let mean = values.iter().sum::<f64>() / n as f64;
                let var = if n > 1 {
                    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64
                } else {
                    0.0
                };
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                ColumnSummary {
                    name,
                    count: n,
                    mean,
                    std: var.sqrt(),
                    min,
                    max,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GOOD_CSV: &str = "\
age,anaemia,creatinine_phosphokinase,diabetes,ejection_fraction,high_blood_pressure,platelets,serum_creatinine,serum_sodium,sex,smoking,time,DEATH_EVENT
75,0,582,0,20,1,265000,1.9,130,1,0,4,1
55,0,7861,0,38,0,263358.03,1.1,136,1,0,6,1
65,0,146,0,20,0,162000,1.3,129,1,1,7,0
";

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("tmp file");
        f.write_all(content.as_bytes()).expect("write csv");
        f
    }

    #[test]
    fn test_load_valid_csv() {
        let f = write_csv(GOOD_CSV);
        let ds = Dataset::from_csv(f.path()).expect("load");
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.labels(), vec![1, 1, 0]);
        assert_eq!(ds.records()[1].platelets, 263_358.03);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Dataset::from_csv(Path::new("/nonexistent/heart.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let f = write_csv("age,anaemia,weight\n60,0,80\n");
        let err = Dataset::from_csv(f.path()).unwrap_err();
        assert!(matches!(err, LoadError::Schema { .. }));
    }

    #[test]
    fn test_malformed_row_rejected() {
        let bad = GOOD_CSV.replace("65,0,146", "sixty-five,0,146");
        let f = write_csv(&bad);
        let err = Dataset::from_csv(f.path()).unwrap_err();
        assert!(matches!(err, LoadError::Csv { row: 3, .. }));
    }

    #[test]
    fn test_non_binary_label_rejected() {
        let bad = GOOD_CSV.replace("129,1,1,7,0", "129,1,1,7,2");
        let f = write_csv(&bad);
        let err = Dataset::from_csv(f.path()).unwrap_err();
        assert!(matches!(err, LoadError::Label { row: 3, value: 2 }));
    }

    #[test]
    fn test_header_only_is_empty() {
        let header = GOOD_CSV.lines().next().expect("header");
        let f = write_csv(&format!("{header}\n"));
        let err = Dataset::from_csv(f.path()).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn test_describe_basic_stats() {
        let f = write_csv(GOOD_CSV);
        let ds = Dataset::from_csv(f.path()).expect("load");
        let summary = ds.describe();
        assert_eq!(summary.len(), 12);

        let age = &summary[0];
        assert_eq!(age.name, "age");
        assert_eq!(age.count, 3);
        assert!((age.mean - 65.0).abs() < 1e-9);
        assert_eq!(age.min, 55.0);
        assert_eq!(age.max, 75.0);
        assert!((age.std - 10.0).abs() < 1e-9);
    }
}
