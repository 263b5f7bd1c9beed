//! Plain-text dense matrix and label files
//!
//! Feature files hold one sample per line with whitespace separated
//! values. Label files hold one label per line. In both, blank lines
//! and lines starting with `#` are skipped.

use crate::core::{ClassifierError, DenseFeatures, MulticlassLabels, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load a dense feature matrix from a file
pub fn load_features<P: AsRef<Path>>(path: P) -> Result<DenseFeatures> {
    let file = File::open(path).map_err(ClassifierError::IoError)?;
    read_features(BufReader::new(file))
}

/// Load a label vector from a file
pub fn load_labels<P: AsRef<Path>>(path: P) -> Result<MulticlassLabels> {
    let file = File::open(path).map_err(ClassifierError::IoError)?;
    read_labels(BufReader::new(file))
}

/// Read a dense feature matrix from a reader
pub fn read_features<R: BufRead>(reader: R) -> Result<DenseFeatures> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(ClassifierError::IoError)?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    ClassifierError::ParseError(format!(
                        "Error parsing line {}: invalid value: {}",
                        line_num + 1,
                        token
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(ClassifierError::ParseError(format!(
                    "Error parsing line {}: expected {} values, found {}",
                    line_num + 1,
                    first.len(),
                    row.len()
                )));
            }
        }
        rows.push(row);
    }

    DenseFeatures::from_rows(rows)
}

/// Read a label vector from a reader
pub fn read_labels<R: BufRead>(reader: R) -> Result<MulticlassLabels> {
    let mut labels = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(ClassifierError::IoError)?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let label = line.parse::<f64>().map_err(|_| {
            ClassifierError::ParseError(format!(
                "Error parsing line {}: invalid label: {}",
                line_num + 1,
                line
            ))
        })?;
        labels.push(label);
    }

    MulticlassLabels::new(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_features_basic() {
        let data = "# two samples\n1.0 2.0 3.0\n\n-1.5\t0.0 4e-1\n";
        let features = read_features(Cursor::new(data)).unwrap();

        assert_eq!(features.n_samples(), 2);
        assert_eq!(features.n_dims(), 3);
        assert_eq!(features.row(1), &[-1.5, 0.0, 0.4]);
    }

    #[test]
    fn test_read_features_ragged() {
        let result = read_features(Cursor::new("1 2\n3\n"));
        match result {
            Err(ClassifierError::ParseError(msg)) => assert!(msg.contains("line 2")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_features_invalid_value() {
        let result = read_features(Cursor::new("1 abc\n"));
        assert!(matches!(result, Err(ClassifierError::ParseError(_))));
    }

    #[test]
    fn test_read_features_empty() {
        let result = read_features(Cursor::new("# nothing\n\n"));
        assert!(matches!(result, Err(ClassifierError::EmptyDataset)));
    }

    #[test]
    fn test_read_labels() {
        let labels = read_labels(Cursor::new("0\n1\n# comment\n2.0\n")).unwrap();
        assert_eq!(labels.as_slice(), &[0.0, 1.0, 2.0]);

        let result = read_labels(Cursor::new("0\n0.5\n"));
        assert!(matches!(result, Err(ClassifierError::InvalidLabel(_))));

        let result = read_labels(Cursor::new("zero\n"));
        assert!(matches!(result, Err(ClassifierError::ParseError(_))));
    }

    #[test]
    fn test_load_from_files() {
        let mut features_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(features_file, "0.5 1.0").expect("Failed to write");
        writeln!(features_file, "1.5 2.0").expect("Failed to write");
        features_file.flush().expect("Failed to flush");

        let mut labels_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(labels_file, "3").expect("Failed to write");
        writeln!(labels_file, "4").expect("Failed to write");
        labels_file.flush().expect("Failed to flush");

        let features = load_features(features_file.path()).unwrap();
        let labels = load_labels(labels_file.path()).unwrap();
        assert_eq!(features.n_samples(), labels.len());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_features("/non/existent/features.dat");
        assert!(matches!(result, Err(ClassifierError::IoError(_))));
    }
}
