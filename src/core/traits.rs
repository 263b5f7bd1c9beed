//! Core traits for multiclass linear classification

use crate::core::{DenseFeatures, MulticlassLabels, Result};

/// A classifier that is configured with its training labels up front,
/// then trained on a feature matrix and applied to new samples.
pub trait Machine {
    /// Fit the model to `features`, paired row-by-row with the labels
    /// supplied at construction
    fn train(&mut self, features: &DenseFeatures) -> Result<()>;

    /// Predict a label for every sample in `features`
    fn apply(&self, features: &DenseFeatures) -> Result<MulticlassLabels>;

    /// Whether `train` has completed successfully
    fn is_trained(&self) -> bool;
}

/// Scores predicted labels against ground truth
pub trait Evaluation {
    fn evaluate(&self, predicted: &MulticlassLabels, truth: &MulticlassLabels) -> Result<f64>;
}
