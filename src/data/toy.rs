//! Synthetic multiclass data: one Gaussian blob per class

use crate::core::{ClassifierError, DenseFeatures, MulticlassLabels, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use std::f64::consts::PI;

/// Parameters of the blob generator
#[derive(Debug, Clone, PartialEq)]
pub struct ToyConfig {
    pub n_classes: usize,
    pub n_dims: usize,
    pub n_train_per_class: usize,
    pub n_test_per_class: usize,
    /// Distance of each class mean from the origin
    pub separation: f64,
    /// Standard deviation of every coordinate around its mean
    pub spread: f64,
    pub seed: u64,
}

impl Default for ToyConfig {
    fn default() -> Self {
        Self {
            n_classes: 3,
            n_dims: 2,
            n_train_per_class: 30,
            n_test_per_class: 30,
            separation: 4.0,
            spread: 1.0,
            seed: 17,
        }
    }
}

/// Features paired with their labels
pub type LabelledSplit = (DenseFeatures, MulticlassLabels);

/// Blob samples for training and test
pub fn generate_blobs(config: &ToyConfig) -> Result<(LabelledSplit, LabelledSplit)> {
    if config.n_classes < 2 {
        return Err(ClassifierError::InvalidParameter(format!(
            "toy data needs at least 2 classes, got: {}",
            config.n_classes
        )));
    }
    if config.n_dims == 0 || config.n_train_per_class == 0 || config.n_test_per_class == 0 {
        return Err(ClassifierError::InvalidParameter(
            "toy data needs non-zero dimensions and sample counts".to_string(),
        ));
    }
    if !config.spread.is_finite() || config.spread < 0.0 || !config.separation.is_finite() {
        return Err(ClassifierError::InvalidParameter(format!(
            "invalid toy spread {} or separation {}",
            config.spread, config.separation
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let means: Vec<Vec<f64>> = (0..config.n_classes)
        .map(|m| class_mean(config, m))
        .collect();

    let train = sample_split(config, &means, config.n_train_per_class, &mut rng)?;
    let test = sample_split(config, &means, config.n_test_per_class, &mut rng)?;
    Ok((train, test))
}

/// Means evenly spaced on a circle in the first two dimensions
fn class_mean(config: &ToyConfig, m: usize) -> Vec<f64> {
    let mut mean = vec![0.0; config.n_dims];
    if config.n_dims == 1 {
        mean[0] = config.separation * m as f64;
    } else {
        let angle = 2.0 * PI * m as f64 / config.n_classes as f64;
        mean[0] = config.separation * angle.cos();
        mean[1] = config.separation * angle.sin();
    }
    mean
}

fn sample_split(
    config: &ToyConfig,
    means: &[Vec<f64>],
    per_class: usize,
    rng: &mut StdRng,
) -> Result<LabelledSplit> {
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(means.len() * per_class);
    let mut labels = Vec::with_capacity(means.len() * per_class);

    for (m, mean) in means.iter().enumerate() {
        for _ in 0..per_class {
            rows.push(
                mean.iter()
                    .map(|&mu| {
                        let z: f64 = StandardNormal.sample(rng);
                        mu + config.spread * z
                    })
                    .collect(),
            );
            labels.push(m as f64);
        }
    }

    Ok((
        DenseFeatures::from_rows(rows)?,
        MulticlassLabels::new(labels)?,
    ))
}
