//! Training problem view over a dense feature matrix

use crate::core::DenseFeatures;

/// A subset of the rows of a feature matrix, optionally extended with a
/// constant bias feature at index `n_dims`.
#[derive(Debug, Clone)]
pub struct Problem<'a> {
    features: &'a DenseFeatures,
    rows: Vec<usize>,
    bias: Option<f64>,
}

impl<'a> Problem<'a> {
    /// Problem over the given rows of `features`
    pub fn new(features: &'a DenseFeatures, rows: Vec<usize>, bias: Option<f64>) -> Self {
        Self {
            features,
            rows,
            bias,
        }
    }

    /// Problem over every row of `features`
    pub fn all(features: &'a DenseFeatures, bias: Option<f64>) -> Self {
        Self::new(features, (0..features.n_samples()).collect(), bias)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Length of a weight vector for this problem
    pub fn dim(&self) -> usize {
        self.features.n_dims() + usize::from(self.bias.is_some())
    }

    /// `(feature index, value)` pairs of the `i`-th sample, bias last
    pub fn entries(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let n_dims = self.features.n_dims();
        self.features
            .row(self.rows[i])
            .iter()
            .copied()
            .enumerate()
            .chain(self.bias.map(|b| (n_dims, b)))
    }

    pub fn norm_squared(&self, i: usize) -> f64 {
        self.entries(i).map(|(_, v)| v * v).sum()
    }

    /// Inner product of sample `i` with `w`
    pub fn dot(&self, i: usize, w: &[f64]) -> f64 {
        self.entries(i).map(|(j, v)| w[j] * v).sum()
    }

    /// `w += a * x_i`
    pub fn axpy(&self, i: usize, a: f64, w: &mut [f64]) {
        for (j, v) in self.entries(i) {
            w[j] += a * v;
        }
    }
}
