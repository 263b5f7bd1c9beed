//! Evaluation of predicted labels against ground truth

use crate::core::{ClassifierError, Evaluation, MulticlassLabels, Result};

/// Fraction of samples whose predicted label equals the true label
#[derive(Debug, Clone, Copy, Default)]
pub struct MulticlassAccuracy;

impl MulticlassAccuracy {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluation for MulticlassAccuracy {
    fn evaluate(&self, predicted: &MulticlassLabels, truth: &MulticlassLabels) -> Result<f64> {
        check_lengths(predicted, truth)?;

        let correct = predicted
            .as_slice()
            .iter()
            .zip(truth.as_slice())
            .filter(|(p, t)| p == t)
            .count();

        Ok(correct as f64 / truth.len() as f64)
    }
}

fn check_lengths(predicted: &MulticlassLabels, truth: &MulticlassLabels) -> Result<()> {
    if truth.is_empty() {
        return Err(ClassifierError::EmptyDataset);
    }
    if predicted.len() != truth.len() {
        return Err(ClassifierError::LabelCountMismatch {
            labels: predicted.len(),
            samples: truth.len(),
        });
    }
    Ok(())
}

/// Confusion matrix over the union of predicted and true classes
///
/// `counts[t][p]` is the number of samples of true class `classes[t]`
/// predicted as `classes[p]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    pub classes: Vec<f64>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn new(predicted: &MulticlassLabels, truth: &MulticlassLabels) -> Result<Self> {
        check_lengths(predicted, truth)?;

        let mut classes: Vec<f64> = predicted
            .as_slice()
            .iter()
            .chain(truth.as_slice())
            .copied()
            .collect();
        classes.sort_by(|a, b| a.total_cmp(b));
        classes.dedup();

        let position = |label: f64| classes.partition_point(|&c| c < label);
        let mut counts = vec![vec![0; classes.len()]; classes.len()];
        for (&p, &t) in predicted.as_slice().iter().zip(truth.as_slice()) {
            counts[position(t)][position(p)] += 1;
        }

        Ok(Self { classes, counts })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            let correct: usize = (0..self.classes.len()).map(|i| self.counts[i][i]).sum();
            correct as f64 / total as f64
        }
    }

    /// Precision of class index `m`: TP / (TP + FP)
    pub fn precision(&self, m: usize) -> f64 {
        let predicted: usize = self.counts.iter().map(|row| row[m]).sum();
        if predicted == 0 {
            0.0
        } else {
            self.counts[m][m] as f64 / predicted as f64
        }
    }

    /// Recall of class index `m`: TP / (TP + FN)
    pub fn recall(&self, m: usize) -> f64 {
        let actual: usize = self.counts[m].iter().sum();
        if actual == 0 {
            0.0
        } else {
            self.counts[m][m] as f64 / actual as f64
        }
    }

    pub fn f1_score(&self, m: usize) -> f64 {
        let p = self.precision(m);
        let r = self.recall(m);
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn labels(values: &[f64]) -> MulticlassLabels {
        MulticlassLabels::new(values.to_vec()).unwrap()
    }

    #[test]
    fn test_accuracy_simple_case() {
        let predicted = labels(&[0.0, 1.0, 2.0, 2.0]);
        let truth = labels(&[0.0, 1.0, 1.0, 2.0]);

        let accuracy = MulticlassAccuracy::new().evaluate(&predicted, &truth).unwrap();
        assert_relative_eq!(accuracy, 0.75);
    }

    #[test]
    fn test_accuracy_bounds() {
        let truth = labels(&[0.0, 1.0, 2.0]);
        let evaluator = MulticlassAccuracy::new();

        assert_eq!(evaluator.evaluate(&truth, &truth).unwrap(), 1.0);
        assert_eq!(
            evaluator
                .evaluate(&labels(&[1.0, 2.0, 0.0]), &truth)
                .unwrap(),
            0.0
        );
    }

    #[test]
    fn test_accuracy_length_mismatch() {
        let result = MulticlassAccuracy::new().evaluate(&labels(&[0.0]), &labels(&[0.0, 1.0]));
        assert!(matches!(
            result,
            Err(ClassifierError::LabelCountMismatch {
                labels: 1,
                samples: 2
            })
        ));
    }

    #[test]
    fn test_confusion_matrix() {
        let predicted = labels(&[0.0, 1.0, 2.0, 2.0, 0.0]);
        let truth = labels(&[0.0, 1.0, 1.0, 2.0, 2.0]);

        let matrix = ConfusionMatrix::new(&predicted, &truth).unwrap();

        assert_eq!(matrix.classes, vec![0.0, 1.0, 2.0]);
        assert_eq!(
            matrix.counts,
            vec![vec![1, 0, 0], vec![0, 1, 1], vec![1, 0, 1]]
        );
        assert_eq!(matrix.total(), 5);
        assert_relative_eq!(matrix.accuracy(), 0.6);
        assert_relative_eq!(matrix.precision(2), 0.5);
        assert_relative_eq!(matrix.recall(1), 0.5);
        assert_relative_eq!(matrix.f1_score(0), 2.0 * 0.5 / 1.5);
    }

    #[test]
    fn test_confusion_matrix_includes_unseen_predictions() {
        let predicted = labels(&[5.0, 0.0]);
        let truth = labels(&[0.0, 0.0]);

        let matrix = ConfusionMatrix::new(&predicted, &truth).unwrap();
        assert_eq!(matrix.classes, vec![0.0, 5.0]);
        assert_eq!(matrix.recall(1), 0.0);
        assert_eq!(matrix.precision(1), 0.0);
    }
}
