//! LibSVM format dataset implementation
//!
//! Supports loading multiclass datasets in the libsvm format:
//! label index:value index:value ...
//!
//! Example:
//! 1 1:0.5 3:1.2 7:0.8
//! 3 2:0.3 5:2.1
//!
//! Samples are densified; missing indices become zero.

use crate::core::{ClassifierError, DenseFeatures, MulticlassLabels, Result};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Largest accepted 1-based feature index
pub const MAX_FEATURE_INDEX: usize = 1 << 24;

/// Largest number of values a densified dataset may hold
pub const MAX_DENSE_VALUES: usize = 1 << 28;

/// Dataset loaded from a LibSVM format file
#[derive(Debug, Clone)]
pub struct LibSVMDataset {
    pub features: DenseFeatures,
    pub labels: MulticlassLabels,
}

impl LibSVMDataset {
    /// Load a dataset from a LibSVM format file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(ClassifierError::IoError)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a dataset from a reader, padding every sample to the largest index seen
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::read(reader, 0, None)
    }

    /// Like [`from_reader`](Self::from_reader) with at least `min_dim` dimensions
    pub fn from_reader_with_dim<R: BufRead>(reader: R, min_dim: usize) -> Result<Self> {
        Self::read(reader, min_dim, None)
    }

    /// Load samples for a model trained on `n_dims` features
    ///
    /// Every sample gets exactly `n_dims` columns. Test files often lack the
    /// highest training index, which is padded with zeros; indices beyond
    /// `n_dims` were never seen in training and are dropped.
    pub fn from_reader_for_model<R: BufRead>(reader: R, n_dims: usize) -> Result<Self> {
        Self::read(reader, n_dims, Some(n_dims))
    }

    fn read<R: BufRead>(reader: R, min_dim: usize, max_dim: Option<usize>) -> Result<Self> {
        let mut sparse = Vec::new();
        let mut labels = Vec::new();
        let mut dimensions = min_dim;
        let mut dropped = 0;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(ClassifierError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (label, mut pairs) = Self::parse_line(line).map_err(|e| {
                ClassifierError::ParseError(format!("Error parsing line {}: {}", line_num + 1, e))
            })?;

            if let Some(limit) = max_dim {
                let kept = pairs.partition_point(|&(idx, _)| idx < limit);
                dropped += pairs.len() - kept;
                pairs.truncate(kept);
            }
            if let Some(&(max_idx, _)) = pairs.last() {
                if max_idx >= MAX_FEATURE_INDEX {
                    return Err(ClassifierError::InvalidFeatures(format!(
                        "line {}: feature index {} exceeds the limit of {}",
                        line_num + 1,
                        max_idx + 1,
                        MAX_FEATURE_INDEX
                    )));
                }
            }
            if let Some(&(max_idx, _)) = pairs.last() {
                dimensions = dimensions.max(max_idx + 1);
            }
            labels.push(label);
            sparse.push(pairs);
        }

        if sparse.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }
        if dimensions == 0 {
            return Err(ClassifierError::InvalidFeatures(
                "no feature indices present".to_string(),
            ));
        }
        if dropped > 0 {
            debug!("Dropped {dropped} feature values beyond dimension {dimensions}");
        }

        let n_samples = sparse.len();
        let n_values = n_samples
            .checked_mul(dimensions)
            .filter(|&n| n <= MAX_DENSE_VALUES)
            .ok_or_else(|| {
                ClassifierError::InvalidFeatures(format!(
                    "{n_samples} samples x {dimensions} dimensions exceeds the limit of {MAX_DENSE_VALUES} values"
                ))
            })?;

        let mut data = vec![0.0; n_values];
        for (i, pairs) in sparse.iter().enumerate() {
            for &(idx, value) in pairs {
                data[i * dimensions + idx] = value;
            }
        }

        Ok(Self {
            features: DenseFeatures::from_row_major(data, n_samples, dimensions)?,
            labels: MulticlassLabels::new(labels)?,
        })
    }

    /// Parse a single line into its label and sorted zero-based feature pairs
    fn parse_line(line: &str) -> std::result::Result<(f64, Vec<(usize, f64)>), String> {
        let mut parts = line.split_whitespace();

        let label_str = parts.next().ok_or_else(|| "Empty line".to_string())?;
        let label = label_str
            .parse::<f64>()
            .map_err(|_| format!("Invalid label: {label_str}"))?;

        let mut pairs = Vec::new();
        for feature_str in parts {
            let (index_str, value_str) = feature_str
                .split_once(':')
                .ok_or_else(|| format!("Invalid feature format: {feature_str}"))?;

            let index = index_str
                .parse::<usize>()
                .map_err(|_| format!("Invalid feature index: {index_str}"))?;
            let value = value_str
                .parse::<f64>()
                .map_err(|_| format!("Invalid feature value: {value_str}"))?;

            // libsvm uses 1-based indexing, convert to 0-based
            if index == 0 {
                return Err(format!("Feature index must be positive: {index}"));
            }
            pairs.push((index - 1, value));
        }

        pairs.sort_by_key(|&(idx, _)| idx);
        Ok((label, pairs))
    }
}
