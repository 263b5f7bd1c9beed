//! Error types for multiclass linear classification

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid label: expected an integral class value, got {0}")]
    InvalidLabel(f64),

    #[error("Invalid features: {0}")]
    InvalidFeatures(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Label count mismatch: {labels} labels for {samples} samples")]
    LabelCountMismatch { labels: usize, samples: usize },

    #[error("At least two classes are required, found {0}")]
    TooFewClasses(usize),

    #[error("Model not trained")]
    ModelNotTrained,

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
