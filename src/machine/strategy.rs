//! Multiclass training strategies built on the linear solvers

use crate::core::{DenseFeatures, Loss, Result, SolverConfig};
use crate::machine::LinearWeights;
use crate::solver::{CrammerSingerSolver, DualCoordinateDescent, Problem};
use log::debug;

/// Output of a strategy: the weights plus the total solver passes
pub(crate) struct StrategyOutput {
    pub weights: LinearWeights,
    pub iterations: usize,
}

fn bias_of(config: &SolverConfig) -> Option<f64> {
    config.use_bias.then_some(config.bias)
}

/// Direct multiclass training with the Crammer-Singer formulation
pub(crate) fn train_crammer_singer(
    features: &DenseFeatures,
    y: &[usize],
    n_classes: usize,
    config: &SolverConfig,
) -> Result<StrategyOutput> {
    let problem = Problem::all(features, bias_of(config));
    let dim = problem.dim();
    let result = CrammerSingerSolver::new(config.clone()).solve(&problem, y, n_classes)?;

    // feature-major w[j * K + m] into one vector per class
    let weights = (0..n_classes)
        .map(|m| (0..dim).map(|j| result.weights[j * n_classes + m]).collect())
        .collect();

    Ok(StrategyOutput {
        weights: LinearWeights::PerClass { weights },
        iterations: result.iterations,
    })
}

/// One binary machine per class, trained against all other classes
pub(crate) fn train_one_vs_rest(
    features: &DenseFeatures,
    y: &[usize],
    n_classes: usize,
    config: &SolverConfig,
    loss: Loss,
) -> Result<StrategyOutput> {
    let problem = Problem::all(features, bias_of(config));
    let solver = DualCoordinateDescent::new(config.clone(), loss);

    let mut weights = Vec::with_capacity(n_classes);
    let mut iterations = 0;
    for m in 0..n_classes {
        let binary: Vec<f64> = y
            .iter()
            .map(|&c| if c == m { 1.0 } else { -1.0 })
            .collect();
        let result = solver.solve(&problem, &binary)?;
        debug!("Class {} vs rest: {} iterations", m, result.iterations);
        iterations += result.iterations;
        weights.push(result.weights);
    }

    Ok(StrategyOutput {
        weights: LinearWeights::PerClass { weights },
        iterations,
    })
}

/// One binary machine per class pair, trained on that pair's samples only
pub(crate) fn train_one_vs_one(
    features: &DenseFeatures,
    y: &[usize],
    n_classes: usize,
    config: &SolverConfig,
    loss: Loss,
) -> Result<StrategyOutput> {
    let solver = DualCoordinateDescent::new(config.clone(), loss);

    let mut pairs = Vec::with_capacity(n_classes * (n_classes - 1) / 2);
    let mut weights = Vec::with_capacity(pairs.capacity());
    let mut iterations = 0;
    for a in 0..n_classes {
        for b in (a + 1)..n_classes {
            let rows: Vec<usize> = (0..y.len()).filter(|&i| y[i] == a || y[i] == b).collect();
            let binary: Vec<f64> = rows
                .iter()
                .map(|&i| if y[i] == a { 1.0 } else { -1.0 })
                .collect();
            let problem = Problem::new(features, rows, bias_of(config));
            let result = solver.solve(&problem, &binary)?;
            debug!("Class {} vs {}: {} iterations", a, b, result.iterations);
            iterations += result.iterations;
            pairs.push((a, b));
            weights.push(result.weights);
        }
    }

    Ok(StrategyOutput {
        weights: LinearWeights::Pairwise { pairs, weights },
        iterations,
    })
}
