//! Model serialization and persistence
//!
//! Trained machines are stored as pretty-printed JSON together with the
//! configuration they were trained with and some metadata.

use crate::core::{ClassifierError, Result};
use crate::machine::{LinearWeights, MachineConfig, MulticlassMachine, TrainedLinearModel};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable representation of a trained machine
#[derive(Debug, Serialize, Deserialize)]
pub struct SerializableModel {
    /// Configuration used for training
    pub config: MachineConfig,
    /// Fitted weights and class set
    pub model: TrainedLinearModel,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Model metadata for tracking and validation
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Number of training samples
    pub n_training_samples: usize,
    /// Creation timestamp
    pub created_at: String,
}

impl SerializableModel {
    /// Capture a trained machine
    pub fn from_machine(machine: &MulticlassMachine) -> Result<Self> {
        let model = machine.model().ok_or(ClassifierError::ModelNotTrained)?;

        Ok(Self {
            config: machine.config().clone(),
            model: model.clone(),
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                n_training_samples: machine.labels().len(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        })
    }

    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(ClassifierError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| ClassifierError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load model from file, rejecting inconsistent weight shapes
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(ClassifierError::IoError)?;
        let reader = BufReader::new(file);
        let model: Self = serde_json::from_reader(reader)
            .map_err(|e| ClassifierError::SerializationError(e.to_string()))?;
        model.model.validate()?;
        Ok(model)
    }

    /// The model ready for prediction
    pub fn into_trained_model(self) -> TrainedLinearModel {
        self.model
    }

    /// Print model summary
    pub fn print_summary(&self) {
        let solver = self.config.solver();
        println!("=== Model Summary ===");
        println!("Machine: {}", self.config.name());
        println!("Classes: {:?}", self.model.classes);
        println!("Dimensions: {}", self.model.n_dims);
        match &self.model.weights {
            LinearWeights::PerClass { weights } => {
                println!("Weight vectors: {} (one per class)", weights.len())
            }
            LinearWeights::Pairwise { weights, .. } => {
                println!("Weight vectors: {} (one per class pair)", weights.len())
            }
        }
        println!("Training samples: {}", self.metadata.n_training_samples);
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
        println!("Training Parameters:");
        println!("  C: {}", solver.c);
        println!("  Epsilon: {}", solver.epsilon);
        println!("  Max Iterations: {}", solver.max_iterations);
        match self.model.bias {
            Some(b) => println!("  Bias: {b}"),
            None => println!("  Bias: none"),
        }
    }
}
