//! Crammer-Singer multiclass linear SVM solver
//!
//! Optimizes the dual of
//!
//! ```text
//! min_w  ½ Σₘ ‖wₘ‖² + C Σᵢ ξᵢ
//! s.t.   wᵀ_{yᵢ} xᵢ − wᵀₘ xᵢ ≥ e^m_i − ξᵢ   for all m, i
//! ```
//!
//! one sample at a time. Each sample owns `K` dual variables; the
//! sub-problem over them has a closed-form solution after sorting.
//! Weights are stored feature-major: `w[j * K + m]`.

use crate::core::{ClassifierError, Result, SolverConfig};
use crate::solver::{OptimizationResult, Problem};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Direct multiclass solver
pub struct CrammerSingerSolver {
    config: SolverConfig,
}

impl CrammerSingerSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Solve for `n_classes` weight vectors given class indices `y`
    pub fn solve(
        &self,
        problem: &Problem,
        y: &[usize],
        n_classes: usize,
    ) -> Result<OptimizationResult> {
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
        if n_classes < 2 {
            return Err(ClassifierError::TooFewClasses(n_classes));
        }
        if let Some(&bad) = y.iter().find(|&&c| c >= n_classes) {
            return Err(ClassifierError::InvalidLabel(bad as f64));
        }

        let k = n_classes;
        let c = self.config.c;
        let eps = self.config.epsilon;

        let mut w = vec![0.0; problem.dim() * k];
        let mut alpha = vec![0.0; l * k];
        // alpha_index[i*k + m] is the class held at position m for sample i
        let mut alpha_index: Vec<usize> = (0..l * k).map(|p| p % k).collect();
        let qd: Vec<f64> = (0..l).map(|i| problem.norm_squared(i)).collect();
        let mut active_size_i = vec![k; l];
        // position of the true class inside alpha_index for each sample
        let mut y_index: Vec<usize> = y.to_vec();
        let mut index: Vec<usize> = (0..l).collect();

        let mut g = vec![0.0; k];
        let mut b = vec![0.0; k];
        let mut alpha_new = vec![0.0; k];
        let mut d_ind = vec![0usize; k];
        let mut d_val = vec![0.0; k];

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut active_size = l;
        let mut eps_shrink = (10.0 * eps).max(1.0);
        let mut start_from_all = true;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            let mut stopping = f64::NEG_INFINITY;

            index[..active_size].shuffle(&mut rng);

            let mut s = 0;
            while s < active_size {
                let i = index[s];
                let a_i = qd[i];
                let base = i * k;

                if a_i <= 0.0 {
                    s += 1;
                    continue;
                }

                let act = active_size_i[i];
                g[..act].fill(1.0);
                if y_index[i] < act {
                    g[y_index[i]] = 0.0;
                }
                for (j, v) in problem.entries(i) {
                    let w_j = &w[j * k..(j + 1) * k];
                    for m in 0..act {
                        g[m] += w_j[alpha_index[base + m]] * v;
                    }
                }

                let mut min_g = f64::INFINITY;
                let mut max_g = f64::NEG_INFINITY;
                for m in 0..act {
                    if alpha[base + alpha_index[base + m]] < 0.0 && g[m] < min_g {
                        min_g = g[m];
                    }
                    if g[m] > max_g {
                        max_g = g[m];
                    }
                }
                if y_index[i] < act && alpha[base + y[i]] < c && g[y_index[i]] < min_g {
                    min_g = g[y_index[i]];
                }

                let mut m = 0;
                while m < active_size_i[i] {
                    let alpha_m = alpha[base + alpha_index[base + m]];
                    if be_shrunk(m, y_index[i], alpha_m, g[m], c, min_g) {
                        active_size_i[i] -= 1;
                        while active_size_i[i] > m {
                            let last = active_size_i[i];
                            let alpha_last = alpha[base + alpha_index[base + last]];
                            if !be_shrunk(last, y_index[i], alpha_last, g[last], c, min_g) {
                                alpha_index.swap(base + m, base + last);
                                g.swap(m, last);
                                if y_index[i] == last {
                                    y_index[i] = m;
                                } else if y_index[i] == m {
                                    y_index[i] = last;
                                }
                                break;
                            }
                            active_size_i[i] -= 1;
                        }
                    }
                    m += 1;
                }

                if active_size_i[i] <= 1 {
                    active_size -= 1;
                    index.swap(s, active_size);
                    continue;
                }

                if max_g - min_g <= 1e-12 {
                    s += 1;
                    continue;
                }
                stopping = stopping.max(max_g - min_g);

                let act = active_size_i[i];
                for m in 0..act {
                    b[m] = g[m] - a_i * alpha[base + alpha_index[base + m]];
                }

                solve_sub_problem(a_i, y_index[i], c, &b[..act], &mut alpha_new[..act]);

                let mut nz = 0;
                for m in 0..act {
                    let class = alpha_index[base + m];
                    let d = alpha_new[m] - alpha[base + class];
                    alpha[base + class] = alpha_new[m];
                    if d.abs() >= 1e-12 {
                        d_ind[nz] = class;
                        d_val[nz] = d;
                        nz += 1;
                    }
                }

                for (j, v) in problem.entries(i) {
                    let w_j = &mut w[j * k..(j + 1) * k];
                    for t in 0..nz {
                        w_j[d_ind[t]] += d_val[t] * v;
                    }
                }

                s += 1;
            }

            iterations += 1;

            if stopping < eps_shrink {
                if stopping < eps && start_from_all {
                    converged = true;
                    break;
                }
                active_size = l;
                active_size_i.fill(k);
                start_from_all = true;
                eps_shrink = (eps_shrink / 2.0).max(eps);
            } else {
                start_from_all = false;
            }
        }

        if !converged {
            warn!(
                "Crammer-Singer solver reached max_iterations ({}) before convergence",
                self.config.max_iterations
            );
        }

        let n_support = alpha
            .chunks_exact(k)
            .filter(|a| a.iter().any(|&v| v != 0.0))
            .count();
        debug!(
            "Crammer-Singer solver: {} iterations, {} support vectors",
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

/// A variable at its bound whose gradient is below the smallest free gradient
fn be_shrunk(m: usize, y_pos: usize, alpha: f64, g_m: f64, c: f64, min_g: f64) -> bool {
    let bound = if m == y_pos { c } else { 0.0 };
    alpha == bound && g_m < min_g
}

/// Closed-form minimizer of the per-sample sub-problem
///
/// `b[m] = G[m] - A_i * alpha[m]`; writes the new dual values into `alpha_new`.
fn solve_sub_problem(a_i: f64, y_pos: usize, c_y: f64, b: &[f64], alpha_new: &mut [f64]) {
    let active = b.len();
    let mut d = b.to_vec();
    if y_pos < active {
        d[y_pos] += a_i * c_y;
    }
    d.sort_by(|x, y| y.total_cmp(x));

    let mut beta = d[0] - a_i * c_y;
    let mut r = 1;
    while r < active && beta < r as f64 * d[r] {
        beta += d[r];
        r += 1;
    }
    beta /= r as f64;

    for (m, value) in alpha_new.iter_mut().enumerate() {
        let candidate = (beta - b[m]) / a_i;
        *value = if m == y_pos {
            c_y.min(candidate)
        } else {
            candidate.min(0.0)
        };
    }
}
