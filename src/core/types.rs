//! Core type definitions for multiclass linear classification

use crate::core::{ClassifierError, Result};
use serde::{Deserialize, Serialize};

/// Dense feature matrix, one row per sample
///
/// Values are stored row-major so that a sample is a contiguous slice.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseFeatures {
    data: Vec<f64>,
    n_samples: usize,
    n_dims: usize,
}

impl DenseFeatures {
    /// Build a feature matrix from per-sample rows
    ///
    /// All rows must have the same, non-zero length and contain finite values.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_samples = rows.len();
        if n_samples == 0 {
            return Err(ClassifierError::EmptyDataset);
        }

        let n_dims = rows[0].len();
        let mut data = Vec::with_capacity(n_samples * n_dims);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_dims {
                return Err(ClassifierError::InvalidFeatures(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    n_dims
                )));
            }
            data.extend(row);
        }

        Self::from_row_major(data, n_samples, n_dims)
    }

    /// Build a feature matrix from a flat row-major buffer
    pub fn from_row_major(data: Vec<f64>, n_samples: usize, n_dims: usize) -> Result<Self> {
        if n_samples == 0 {
            return Err(ClassifierError::EmptyDataset);
        }
        if n_dims == 0 {
            return Err(ClassifierError::InvalidFeatures(
                "samples must have at least one dimension".to_string(),
            ));
        }
        if data.len() != n_samples * n_dims {
            return Err(ClassifierError::InvalidFeatures(format!(
                "buffer holds {} values, expected {} x {}",
                data.len(),
                n_samples,
                n_dims
            )));
        }
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(ClassifierError::InvalidFeatures(format!(
                "non-finite value in sample {}",
                pos / n_dims
            )));
        }

        Ok(Self {
            data,
            n_samples,
            n_dims,
        })
    }

    /// Number of samples (rows)
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Dimensionality of each sample
    pub fn n_dims(&self) -> usize {
        self.n_dims
    }

    /// Feature values of sample `i`
    ///
    /// # Panics
    /// Panics if `i >= n_samples()`
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.n_dims;
        &self.data[start..start + self.n_dims]
    }

    /// Iterate over all samples in order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.n_dims)
    }
}

/// Class labels for a multiclass problem
///
/// Labels are floating-point encoded integers. Any integral value is a
/// valid class; the distinct values define the class set.
#[derive(Clone, Debug, PartialEq)]
pub struct MulticlassLabels {
    labels: Vec<f64>,
}

impl MulticlassLabels {
    /// Wrap a label vector, rejecting empty input and non-integral values
    pub fn new(labels: Vec<f64>) -> Result<Self> {
        if labels.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }
        if let Some(&bad) = labels.iter().find(|l| !l.is_finite() || l.fract() != 0.0) {
            return Err(ClassifierError::InvalidLabel(bad));
        }
        Ok(Self { labels })
    }

    /// Labels produced by a trained machine, already drawn from a valid class set
    pub(crate) fn from_predictions(labels: Vec<f64>) -> Self {
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, i: usize) -> f64 {
        self.labels[i]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.labels
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.labels
    }

    /// Distinct classes in ascending order
    pub fn classes(&self) -> Vec<f64> {
        let mut classes = self.labels.clone();
        classes.sort_by(|a, b| a.total_cmp(b));
        classes.dedup();
        classes
    }

    pub fn num_classes(&self) -> usize {
        self.classes().len()
    }
}

/// Loss used by the binary dual solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Loss {
    /// Hinge loss
    L1,
    /// Squared hinge loss
    #[default]
    L2,
}

/// Configuration shared by the linear solvers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Regularization constant
    pub c: f64,
    /// Stopping tolerance on the maximal dual violation
    pub epsilon: f64,
    /// Maximum number of outer passes over the data
    pub max_iterations: usize,
    /// Append a constant bias feature to every sample (on by default)
    pub use_bias: bool,
    /// Value of the appended bias feature
    pub bias: f64,
    /// Seed for the sample visiting order
    pub seed: u64,
}

impl SolverConfig {
    /// Check hyperparameters before any training work
    pub fn validate(&self) -> Result<()> {
        if !(self.c > 0.0) || !self.c.is_finite() {
            return Err(ClassifierError::InvalidParameter(format!(
                "C must be positive, got: {}",
                self.c
            )));
        }
        if !(self.epsilon > 0.0) || !self.epsilon.is_finite() {
            return Err(ClassifierError::InvalidParameter(format!(
                "epsilon must be positive, got: {}",
                self.epsilon
            )));
        }
        if self.max_iterations == 0 {
            return Err(ClassifierError::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.use_bias && !self.bias.is_finite() {
            return Err(ClassifierError::InvalidParameter(format!(
                "bias must be finite, got: {}",
                self.bias
            )));
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            epsilon: 0.01,
            max_iterations: 10_000,
            use_bias: true,
            bias: 1.0,
            seed: 1,
        }
    }
}
