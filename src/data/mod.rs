//! Data loading and preparation
//!
//! [`prepare_data`] produces the pre-split train/test matrices and labels
//! consumed by the classification example, either from synthetic blobs or
//! from plain-text files.

pub mod dense;
pub mod libsvm;
pub mod toy;

pub use self::dense::{load_features, load_labels, read_features, read_labels};
pub use self::libsvm::*;
pub use self::toy::{generate_blobs, LabelledSplit, ToyConfig};

use crate::core::{DenseFeatures, MulticlassLabels, Result};
use log::info;
use std::path::PathBuf;

/// Where the example data comes from
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Deterministic Gaussian blobs
    Toy(ToyConfig),
    /// Dense feature files and label files; test labels are optional
    Files {
        train: PathBuf,
        train_labels: PathBuf,
        test: PathBuf,
        test_labels: Option<PathBuf>,
    },
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Toy(ToyConfig::default())
    }
}

/// Pre-split data ready for training and evaluation
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub train_features: DenseFeatures,
    pub train_labels: MulticlassLabels,
    pub test_features: DenseFeatures,
    pub test_labels: Option<MulticlassLabels>,
}

/// Obtain training and test data from `source`
pub fn prepare_data(source: &DataSource) -> Result<PreparedData> {
    match source {
        DataSource::Toy(config) => {
            info!(
                "Generating toy data: {} classes, {} dimensions, seed {}",
                config.n_classes, config.n_dims, config.seed
            );
            let ((train_features, train_labels), (test_features, test_labels)) =
                generate_blobs(config)?;
            Ok(PreparedData {
                train_features,
                train_labels,
                test_features,
                test_labels: Some(test_labels),
            })
        }
        DataSource::Files {
            train,
            train_labels,
            test,
            test_labels,
        } => {
            info!("Loading training data from {train:?} and {train_labels:?}");
            info!("Loading test data from {test:?}");
            Ok(PreparedData {
                train_features: load_features(train)?,
                train_labels: load_labels(train_labels)?,
                test_features: load_features(test)?,
                test_labels: test_labels.as_ref().map(load_labels).transpose()?,
            })
        }
    }
}
