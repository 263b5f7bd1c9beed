//! Dual coordinate descent for binary L2-regularized linear SVMs
//!
//! Solves
//!
//! ```text
//! min_α  ½ αᵀ Q̄ α − eᵀα   s.t. 0 ≤ αᵢ ≤ U
//! ```
//!
//! where `Q̄ = Q + D`, `Qᵢⱼ = yᵢyⱼ xᵢᵀxⱼ`. For the hinge loss `D = 0` and
//! `U = C`; for the squared hinge loss `Dᵢᵢ = 1/(2C)` and `U = ∞`.
//! The primal weights `w = Σ αᵢ yᵢ xᵢ` are maintained incrementally.

use crate::core::{ClassifierError, Loss, Result, SolverConfig};
use crate::solver::{OptimizationResult, Problem};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Binary linear SVM solver
pub struct DualCoordinateDescent {
    config: SolverConfig,
    loss: Loss,
}

impl DualCoordinateDescent {
    pub fn new(config: SolverConfig, loss: Loss) -> Self {
        Self { config, loss }
    }

    /// Solve for the weights separating `y[i] = +1` from `y[i] = -1`
    pub fn solve(&self, problem: &Problem, y: &[f64]) -> Result<OptimizationResult> {
        let l = problem.len();
        if l == 0 {
            return Err(ClassifierError::EmptyDataset);
        }
        if y.len() != l {
            return Err(ClassifierError::LabelCountMismatch {
                labels: y.len(),
                samples: l,
            });
        }
        if let Some(&bad) = y.iter().find(|&&v| v != 1.0 && v != -1.0) {
            return Err(ClassifierError::InvalidLabel(bad));
        }

        let c = self.config.c;
        let eps = self.config.epsilon;
        let (diag, upper_bound) = match self.loss {
            Loss::L1 => (0.0, c),
            Loss::L2 => (0.5 / c, f64::INFINITY),
        };

        let mut w = vec![0.0; problem.dim()];
        let mut alpha = vec![0.0; l];
        let qd: Vec<f64> = (0..l).map(|i| diag + problem.norm_squared(i)).collect();
        let mut index: Vec<usize> = (0..l).collect();
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let mut active_size = l;
        let mut pg_max_old = f64::INFINITY;
        let mut pg_min_old = f64::NEG_INFINITY;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            let mut pg_max_new = f64::NEG_INFINITY;
            let mut pg_min_new = f64::INFINITY;

            index[..active_size].shuffle(&mut rng);

            let mut s = 0;
            while s < active_size {
                let i = index[s];
                let yi = y[i];

                // A zero row with no diagonal term cannot move w
                if qd[i] <= 0.0 {
                    s += 1;
                    continue;
                }

                let g = yi * problem.dot(i, &w) - 1.0 + alpha[i] * diag;

                let mut pg = 0.0;
                if alpha[i] == 0.0 {
                    if g > pg_max_old {
                        active_size -= 1;
                        index.swap(s, active_size);
                        continue;
                    } else if g < 0.0 {
                        pg = g;
                    }
                } else if alpha[i] == upper_bound {
                    if g < pg_min_old {
                        active_size -= 1;
                        index.swap(s, active_size);
                        continue;
                    } else if g > 0.0 {
                        pg = g;
                    }
                } else {
                    pg = g;
                }

                pg_max_new = pg_max_new.max(pg);
                pg_min_new = pg_min_new.min(pg);

                if pg.abs() > 1e-12 {
                    let alpha_old = alpha[i];
                    alpha[i] = (alpha[i] - g / qd[i]).max(0.0).min(upper_bound);
                    let d = (alpha[i] - alpha_old) * yi;
                    problem.axpy(i, d, &mut w);
                }

                s += 1;
            }

            iterations += 1;

            if pg_max_new - pg_min_new <= eps {
                if active_size == l {
                    converged = true;
                    break;
                }
                active_size = l;
                pg_max_old = f64::INFINITY;
                pg_min_old = f64::NEG_INFINITY;
                continue;
            }

            pg_max_old = if pg_max_new <= 0.0 {
                f64::INFINITY
            } else {
                pg_max_new
            };
            pg_min_old = if pg_min_new >= 0.0 {
                f64::NEG_INFINITY
            } else {
                pg_min_new
            };
        }

        if !converged {
            warn!(
                "Dual coordinate descent reached max_iterations ({}) before convergence",
                self.config.max_iterations
            );
        }

        let n_support = alpha.iter().filter(|&&a| a > 0.0).count();
        debug!(
            "Dual coordinate descent: {} iterations, {} support vectors",
            iterations, n_support
        );

        Ok(OptimizationResult {
            weights: w,
            iterations,
            converged,
            n_support,
        })
    }
}
