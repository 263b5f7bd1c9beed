//! Linear SVM solvers
//!
//! Both solvers work on the dual problem by coordinate descent, visiting
//! samples in a seeded random order and shrinking variables that sit at
//! a bound with a gradient pointing outward.

pub mod dual_cd;
pub mod mcsvm_cs;
pub mod problem;

pub use self::dual_cd::*;
pub use self::mcsvm_cs::*;
pub use self::problem::*;

/// Result of a solver run
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Primal weights recovered from the dual variables
    pub weights: Vec<f64>,
    /// Number of outer passes performed
    pub iterations: usize,
    /// Whether the stopping tolerance was reached before `max_iterations`
    pub converged: bool,
    /// Number of samples with at least one non-zero dual variable
    pub n_support: usize,
}
