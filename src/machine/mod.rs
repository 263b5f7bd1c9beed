//! Multiclass linear machines
//!
//! A machine is created from a [`MachineConfig`] and the training labels,
//! trained on a feature matrix, then applied to new samples.

pub mod model;
mod strategy;

pub use self::model::*;

use crate::core::{
    ClassifierError, DenseFeatures, Loss, Machine, MulticlassLabels, Result, SolverConfig,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// The supported classifier variants and their parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MachineConfig {
    /// Direct multiclass linear SVM (Crammer-Singer)
    MulticlassLibLinear(SolverConfig),
    /// One binary linear SVM per class against the rest
    OneVsRest { solver: SolverConfig, loss: Loss },
    /// One binary linear SVM per pair of classes, combined by voting
    OneVsOne { solver: SolverConfig, loss: Loss },
}

impl MachineConfig {
    /// Display name of the variant
    pub fn name(&self) -> &'static str {
        match self {
            MachineConfig::MulticlassLibLinear(_) => "MulticlassLibLinear",
            MachineConfig::OneVsRest { .. } => "LinearOneVsRest",
            MachineConfig::OneVsOne { .. } => "LinearOneVsOne",
        }
    }

    pub fn solver(&self) -> &SolverConfig {
        match self {
            MachineConfig::MulticlassLibLinear(solver)
            | MachineConfig::OneVsRest { solver, .. }
            | MachineConfig::OneVsOne { solver, .. } => solver,
        }
    }

    pub fn solver_mut(&mut self) -> &mut SolverConfig {
        match self {
            MachineConfig::MulticlassLibLinear(solver)
            | MachineConfig::OneVsRest { solver, .. }
            | MachineConfig::OneVsOne { solver, .. } => solver,
        }
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig::MulticlassLibLinear(SolverConfig::default())
    }
}

/// A multiclass linear classifier bound to its training labels
#[derive(Debug, Clone)]
pub struct MulticlassMachine {
    config: MachineConfig,
    labels: MulticlassLabels,
    model: Option<TrainedLinearModel>,
}

impl MulticlassMachine {
    /// Create an untrained machine, validating the hyperparameters
    pub fn new(config: MachineConfig, labels: MulticlassLabels) -> Result<Self> {
        config.solver().validate()?;
        Ok(Self {
            config,
            labels,
            model: None,
        })
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn labels(&self) -> &MulticlassLabels {
        &self.labels
    }

    /// The fitted model, once trained
    pub fn model(&self) -> Option<&TrainedLinearModel> {
        self.model.as_ref()
    }

    /// Per-class scores for each sample (votes for one-vs-one)
    pub fn decision_values(&self, features: &DenseFeatures) -> Result<Vec<Vec<f64>>> {
        self.model
            .as_ref()
            .ok_or(ClassifierError::ModelNotTrained)?
            .decision_values(features)
    }
}

impl Machine for MulticlassMachine {
    fn train(&mut self, features: &DenseFeatures) -> Result<()> {
        if self.labels.len() != features.n_samples() {
            return Err(ClassifierError::LabelCountMismatch {
                labels: self.labels.len(),
                samples: features.n_samples(),
            });
        }

        let classes = self.labels.classes();
        if classes.len() < 2 {
            return Err(ClassifierError::TooFewClasses(classes.len()));
        }

        // classes is sorted and contains every label
        let y: Vec<usize> = self
            .labels
            .as_slice()
            .iter()
            .map(|l| classes.partition_point(|c| c < l))
            .collect();

        let n_classes = classes.len();
        info!(
            "Training {} on {} samples, {} dimensions, {} classes",
            self.config.name(),
            features.n_samples(),
            features.n_dims(),
            n_classes
        );

        let output = match &self.config {
            MachineConfig::MulticlassLibLinear(solver) => {
                strategy::train_crammer_singer(features, &y, n_classes, solver)?
            }
            MachineConfig::OneVsRest { solver, loss } => {
                strategy::train_one_vs_rest(features, &y, n_classes, solver, *loss)?
            }
            MachineConfig::OneVsOne { solver, loss } => {
                strategy::train_one_vs_one(features, &y, n_classes, solver, *loss)?
            }
        };
        debug!("Training finished after {} solver passes", output.iterations);

        let solver = self.config.solver();
        self.model = Some(TrainedLinearModel {
            classes,
            n_dims: features.n_dims(),
            bias: solver.use_bias.then_some(solver.bias),
            weights: output.weights,
        });
        Ok(())
    }

    fn apply(&self, features: &DenseFeatures) -> Result<MulticlassLabels> {
        self.model
            .as_ref()
            .ok_or(ClassifierError::ModelNotTrained)?
            .predict(features)
    }

    fn is_trained(&self) -> bool {
        self.model.is_some()
    }
}

/// Build an untrained machine for `config`
pub fn create_machine(config: MachineConfig, labels: MulticlassLabels) -> Result<MulticlassMachine> {
    MulticlassMachine::new(config, labels)
}
