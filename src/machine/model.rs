//! Trained linear multiclass model

use crate::core::{ClassifierError, DenseFeatures, MulticlassLabels, Result};
use serde::{Deserialize, Serialize};

/// Weight layout of a trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinearWeights {
    /// One weight vector per class; the highest score wins
    PerClass { weights: Vec<Vec<f64>> },
    /// One weight vector per class pair `(a, b)`; a positive score votes
    /// for `a`, otherwise for `b`. The most voted class wins.
    Pairwise {
        pairs: Vec<(usize, usize)>,
        weights: Vec<Vec<f64>>,
    },
}

/// A fitted model that maps feature rows to class labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedLinearModel {
    /// Class labels in ascending order; class index `m` is `classes[m]`
    pub classes: Vec<f64>,
    /// Dimensionality of the training features, bias excluded
    pub n_dims: usize,
    /// Constant feature appended to each sample during training
    pub bias: Option<f64>,
    pub weights: LinearWeights,
}

impl TrainedLinearModel {
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Check that the stored weights agree with the declared shape
    pub fn validate(&self) -> Result<()> {
        if self.classes.len() < 2 {
            return Err(ClassifierError::TooFewClasses(self.classes.len()));
        }
        let dim = self.n_dims + usize::from(self.bias.is_some());
        let k = self.classes.len();
        let (expected, weights) = match &self.weights {
            LinearWeights::PerClass { weights } => (k, weights),
            LinearWeights::Pairwise { pairs, weights } => {
                if pairs.len() != weights.len() {
                    return Err(ClassifierError::InvalidParameter(format!(
                        "{} class pairs but {} weight vectors",
                        pairs.len(),
                        weights.len()
                    )));
                }
                if let Some(&(a, b)) = pairs.iter().find(|&&(a, b)| a >= k || b >= k) {
                    return Err(ClassifierError::InvalidParameter(format!(
                        "class pair ({a}, {b}) out of range for {k} classes"
                    )));
                }
                (k * (k - 1) / 2, weights)
            }
        };
        if weights.len() != expected {
            return Err(ClassifierError::InvalidParameter(format!(
                "expected {} weight vectors, found {}",
                expected,
                weights.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| w.len() != dim) {
            return Err(ClassifierError::DimensionMismatch {
                expected: dim,
                actual: w.len(),
            });
        }
        Ok(())
    }

    /// Per-sample class scores
    ///
    /// For per-class weights these are decision values; for pairwise
    /// weights they are vote counts.
    pub fn decision_values(&self, features: &DenseFeatures) -> Result<Vec<Vec<f64>>> {
        if features.n_dims() != self.n_dims {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.n_dims,
                actual: features.n_dims(),
            });
        }

        let k = self.n_classes();
        let scores = features
            .rows()
            .map(|x| match &self.weights {
                LinearWeights::PerClass { weights } => {
                    weights.iter().map(|w| self.score(w, x)).collect()
                }
                LinearWeights::Pairwise { pairs, weights } => {
                    let mut votes = vec![0.0; k];
                    for (&(a, b), w) in pairs.iter().zip(weights) {
                        if self.score(w, x) > 0.0 {
                            votes[a] += 1.0;
                        } else {
                            votes[b] += 1.0;
                        }
                    }
                    votes
                }
            })
            .collect();

        Ok(scores)
    }

    /// Predict a label for every row of `features`
    pub fn predict(&self, features: &DenseFeatures) -> Result<MulticlassLabels> {
        let labels = self
            .decision_values(features)?
            .iter()
            .map(|scores| self.classes[argmax(scores)])
            .collect();
        Ok(MulticlassLabels::from_predictions(labels))
    }

    fn score(&self, w: &[f64], x: &[f64]) -> f64 {
        let linear: f64 = w.iter().zip(x).map(|(wj, xj)| wj * xj).sum();
        match self.bias {
            Some(b) => linear + w[self.n_dims] * b,
            None => linear,
        }
    }
}

/// Index of the largest score; ties resolve to the lowest index
fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (m, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] {
            best = m;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn per_class_model() -> TrainedLinearModel {
        TrainedLinearModel {
            classes: vec![0.0, 1.0, 2.0],
            n_dims: 2,
            bias: Some(1.0),
            weights: LinearWeights::PerClass {
                weights: vec![vec![-1.0, 0.0, 0.0], vec![1.0, 0.0, 0.0], vec![0.0, 1.0, -0.5]],
            },
        }
    }

    #[test]
    fn test_per_class_prediction() {
        let model = per_class_model();
        let features =
            DenseFeatures::from_rows(vec![vec![-3.0, 0.0], vec![3.0, 0.0], vec![0.0, 3.0]])
                .unwrap();

        let predicted = model.predict(&features).unwrap();
        assert_eq!(predicted.as_slice(), &[0.0, 1.0, 2.0]);

        let scores = model.decision_values(&features).unwrap();
        assert_eq!(scores[2], vec![0.0, 0.0, 2.5]);
    }

    #[test]
    fn test_pairwise_votes() {
        let model = TrainedLinearModel {
            classes: vec![3.0, 7.0, 9.0],
            n_dims: 1,
            bias: None,
            weights: LinearWeights::Pairwise {
                pairs: vec![(0, 1), (0, 2), (1, 2)],
                weights: vec![vec![1.0], vec![1.0], vec![-1.0]],
            },
        };
        let features = DenseFeatures::from_rows(vec![vec![1.0], vec![-1.0]]).unwrap();

        let votes = model.decision_values(&features).unwrap();
        assert_eq!(votes[0], vec![2.0, 0.0, 1.0]);
        assert_eq!(votes[1], vec![0.0, 2.0, 1.0]);

        let predicted = model.predict(&features).unwrap();
        assert_eq!(predicted.as_slice(), &[3.0, 7.0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = per_class_model();
        let features = DenseFeatures::from_rows(vec![vec![1.0, 2.0, 3.0]]).unwrap();

        let result = model.predict(&features);
        assert!(matches!(
            result,
            Err(ClassifierError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_argmax_ties_pick_lowest() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), 1);
        assert_eq!(argmax(&[2.0, 2.0]), 0);
    }

    #[test]
    fn test_validate_shapes() {
        assert!(per_class_model().validate().is_ok());

        let mut model = per_class_model();
        model.weights = LinearWeights::PerClass {
            weights: vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0]],
        };
        assert!(matches!(
            model.validate(),
            Err(ClassifierError::DimensionMismatch { .. })
        ));

        let mut model = per_class_model();
        model.weights = LinearWeights::Pairwise {
            pairs: vec![(0, 4)],
            weights: vec![vec![0.0; 3]],
        };
        assert!(model.validate().is_err());
    }
}
