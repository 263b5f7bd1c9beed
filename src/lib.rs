//! Multiclass linear classification in Rust
//!
//! LibLinear-style linear SVMs trained by dual coordinate descent, with a
//! direct Crammer-Singer multiclass machine and one-vs-rest / one-vs-one
//! reductions over a binary solver.

pub mod api;
pub mod core;
pub mod data;
pub mod evaluation;
pub mod machine;
pub mod persistence;
pub mod solver;

// Re-export main types for convenience
pub use crate::api::{classifier_multiclass_liblinear, ExampleParams, LibLinear};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{ClassifierError, Result};
pub use crate::data::{prepare_data, DataSource, LibSVMDataset, PreparedData, ToyConfig};
pub use crate::evaluation::{ConfusionMatrix, MulticlassAccuracy};
pub use crate::machine::{create_machine, MachineConfig, MulticlassMachine, TrainedLinearModel};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
