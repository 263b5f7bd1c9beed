//! High-level API for multiclass linear classification
//!
//! [`LibLinear`] is a builder over [`MachineConfig`];
//! [`classifier_multiclass_liblinear`] is the end-to-end example: train a
//! multiclass linear SVM, predict the test set and report accuracy.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mclinear::api::{classifier_multiclass_liblinear, ExampleParams};
//! use mclinear::data::{prepare_data, DataSource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = prepare_data(&DataSource::default())?;
//! let test_labels = data.test_labels.as_ref().map(|l| l.as_slice());
//!
//! // Prints "Accuracy = X.XXXX" because test labels are present
//! let predicted = classifier_multiclass_liblinear(
//!     &data.train_features,
//!     &data.test_features,
//!     data.train_labels.as_slice(),
//!     test_labels,
//!     &ExampleParams::default(),
//! )?;
//! assert_eq!(predicted.len(), data.test_features.n_samples());
//! # Ok(())
//! # }
//! ```

use crate::core::{
    DenseFeatures, Evaluation, Loss, Machine, MulticlassLabels, Result, SolverConfig,
};
use crate::evaluation::MulticlassAccuracy;
use crate::machine::{create_machine, MachineConfig, MulticlassMachine};
use log::{debug, info};
use std::io::{self, Write};

/// Builder for multiclass linear machines
#[derive(Debug, Clone)]
pub struct LibLinear {
    config: MachineConfig,
}

impl LibLinear {
    /// Direct multiclass (Crammer-Singer) machine with default parameters
    pub fn new() -> Self {
        Self {
            config: MachineConfig::MulticlassLibLinear(SolverConfig::default()),
        }
    }

    /// One binary machine per class against the rest
    pub fn one_vs_rest(loss: Loss) -> Self {
        Self {
            config: MachineConfig::OneVsRest {
                solver: SolverConfig::default(),
                loss,
            },
        }
    }

    /// One binary machine per pair of classes
    pub fn one_vs_one(loss: Loss) -> Self {
        Self {
            config: MachineConfig::OneVsOne {
                solver: SolverConfig::default(),
                loss,
            },
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: MachineConfig) -> Self {
        Self { config }
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.solver_mut().c = c;
        self
    }

    /// Set stopping tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.config.solver_mut().epsilon = epsilon;
        self
    }

    /// Set maximum number of solver passes
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.solver_mut().max_iterations = max_iterations;
        self
    }

    /// Append a constant bias feature with the given value, or none
    pub fn with_bias(mut self, bias: Option<f64>) -> Self {
        let solver = self.config.solver_mut();
        solver.use_bias = bias.is_some();
        if let Some(b) = bias {
            solver.bias = b;
        }
        self
    }

    /// Set the seed of the sample visiting order
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.solver_mut().seed = seed;
        self
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Create an untrained machine bound to `labels`
    pub fn build(self, labels: MulticlassLabels) -> Result<MulticlassMachine> {
        create_machine(self.config, labels)
    }

    /// Create and train a machine in one step
    pub fn train(
        self,
        features: &DenseFeatures,
        labels: MulticlassLabels,
    ) -> Result<MulticlassMachine> {
        let mut machine = self.build(labels)?;
        machine.train(features)?;
        Ok(machine)
    }
}

impl Default for LibLinear {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of the classification example
///
/// `width` and `epsilon` are accepted for interface compatibility but do
/// not influence the machine; it keeps its own solver tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExampleParams {
    pub width: f64,
    pub c: f64,
    pub epsilon: f64,
}

impl ExampleParams {
    /// The two canonical parameter sets `(width, C, epsilon)`
    pub fn parameter_list() -> [ExampleParams; 2] {
        [
            ExampleParams {
                width: 2.1,
                c: 1.0,
                epsilon: 1e-5,
            },
            ExampleParams {
                width: 2.2,
                c: 1.0,
                epsilon: 1e-5,
            },
        ]
    }
}

impl Default for ExampleParams {
    fn default() -> Self {
        Self::parameter_list()[0]
    }
}

/// Train a multiclass linear SVM, predict the test set and, when test
/// labels are given, print `Accuracy = X.XXXX` to stdout
pub fn classifier_multiclass_liblinear(
    train_features: &DenseFeatures,
    test_features: &DenseFeatures,
    train_labels: &[f64],
    test_labels: Option<&[f64]>,
    params: &ExampleParams,
) -> Result<MulticlassLabels> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    classifier_multiclass_liblinear_to(
        &mut out,
        train_features,
        test_features,
        train_labels,
        test_labels,
        params,
    )
}

/// Same as [`classifier_multiclass_liblinear`], writing the accuracy line to `out`
pub fn classifier_multiclass_liblinear_to<W: Write>(
    out: &mut W,
    train_features: &DenseFeatures,
    test_features: &DenseFeatures,
    train_labels: &[f64],
    test_labels: Option<&[f64]>,
    params: &ExampleParams,
) -> Result<MulticlassLabels> {
    debug!(
        "width={} and epsilon={} are not used by MulticlassLibLinear",
        params.width, params.epsilon
    );

    let labels = MulticlassLabels::new(train_labels.to_vec())?;

    let mut classifier = LibLinear::new().with_c(params.c).build(labels)?;
    classifier.train(train_features)?;

    let predicted = classifier.apply(test_features)?;

    if let Some(truth) = test_labels {
        let labels_test = MulticlassLabels::new(truth.to_vec())?;
        let evaluator = MulticlassAccuracy::new();
        let accuracy = evaluator.evaluate(&predicted, &labels_test)?;
        info!("Evaluated {} test samples", labels_test.len());
        writeln!(out, "Accuracy = {accuracy:.4}")?;
    }

    Ok(predicted)
}
