//! Evaluation metrics for the risk classifier
//!
//! Accuracy, confusion matrix and a per-class precision / recall / F1
//! report over integer class labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of matching labels
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "Arrays must have same length");

    if y_true.is_empty() {
        return 0.0;
    }

    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

/// Square confusion matrix; rows are true classes, columns predicted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    class_names: Vec<String>,
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn new(class_names: Vec<String>, y_true: &[usize], y_pred: &[usize]) -> Self {
        assert_eq!(y_true.len(), y_pred.len(), "Arrays must have same length");

        let n = class_names.len();
        let mut counts = vec![vec![0; n]; n];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            counts[t][p] += 1;
        }

        Self {
            class_names,
            counts,
        }
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    /// Count of samples of class `actual` predicted as `predicted`
    pub fn get(&self, actual: usize, predicted: usize) -> usize {
        self.counts[actual][predicted]
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn true_positives(&self, class: usize) -> usize {
        self.counts[class][class]
    }

    /// Samples of `class` (row sum)
    pub fn support(&self, class: usize) -> usize {
        self.counts[class].iter().sum()
    }

    /// Samples predicted as `class` (column sum)
    pub fn predicted(&self, class: usize) -> usize {
        self.counts.iter().map(|row| row[class]).sum()
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let diagonal: usize = (0..self.class_names.len()).map(|c| self.counts[c][c]).sum();
        diagonal as f64 / total as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>10}", "")?;
        for name in &self.class_names {
            write!(f, "{:>10}", name)?;
        }
        writeln!(f)?;
        for (name, row) in self.class_names.iter().zip(&self.counts) {
            write!(f, "{:>10}", name)?;
            for count in row {
                write!(f, "{:>10}", count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Precision, recall and F1 of one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub class: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class metrics plus macro and weighted averages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn from_confusion(matrix: &ConfusionMatrix) -> Self {
        let classes: Vec<ClassMetrics> = matrix
            .class_names()
            .iter()
            .enumerate()
            .map(|(c, name)| {
                let tp = matrix.true_positives(c);
                let precision = ratio(tp, matrix.predicted(c));
                let recall = ratio(tp, matrix.support(c));
                ClassMetrics {
                    class: name.clone(),
                    precision,
                    recall,
                    f1: f1(precision, recall),
                    support: matrix.support(c),
                }
            })
            .collect();

        let total = matrix.total();
        let k = classes.len().max(1) as f64;
        let macro_avg = ClassMetrics {
            class: "macro avg".to_string(),
            precision: classes.iter().map(|m| m.precision).sum::<f64>() / k,
            recall: classes.iter().map(|m| m.recall).sum::<f64>() / k,
            f1: classes.iter().map(|m| m.f1).sum::<f64>() / k,
            support: total,
        };

        let weight = |m: &ClassMetrics| {
            if total == 0 {
                0.0
            } else {
                m.support as f64 / total as f64
            }
        };
        let weighted_avg = ClassMetrics {
            class: "weighted avg".to_string(),
            precision: classes.iter().map(|m| m.precision * weight(m)).sum(),
            recall: classes.iter().map(|m| m.recall * weight(m)).sum(),
            f1: classes.iter().map(|m| m.f1 * weight(m)).sum(),
            support: total,
        };

        Self {
            classes,
            accuracy: matrix.accuracy(),
            macro_avg,
            weighted_avg,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for m in self.classes.iter() {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                m.class, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for m in [&self.macro_avg, &self.weighted_avg] {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                m.class, m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn names() -> Vec<String> {
        vec!["Low".to_string(), "Medium".to_string(), "High".to_string()]
    }

    #[test]
    fn test_accuracy() {
        assert_relative_eq!(accuracy(&[0, 1, 2, 2], &[0, 1, 1, 2]), 0.75);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_confusion_matrix() {
        let y_true = [0, 0, 1, 1, 1, 2, 2, 2, 2];
        let y_pred = [0, 1, 1, 1, 2, 2, 2, 2, 1];
        let cm = ConfusionMatrix::new(names(), &y_true, &y_pred);

        assert_eq!(cm.get(0, 0), 1);
        assert_eq!(cm.get(0, 1), 1);
        assert_eq!(cm.get(1, 2), 1);
        assert_eq!(cm.get(2, 1), 1);
        assert_eq!(cm.total(), 9);
        assert_eq!(cm.support(2), 4);
        assert_eq!(cm.predicted(1), 4);
        assert_relative_eq!(cm.accuracy(), 6.0 / 9.0);
    }

    #[test]
    fn test_classification_report() {
        let y_true = [0, 0, 1, 1, 1, 2, 2, 2, 2];
        let y_pred = [0, 1, 1, 1, 2, 2, 2, 2, 1];
        let report = ClassificationReport::from_confusion(&ConfusionMatrix::new(
            names(),
            &y_true,
            &y_pred,
        ));

        let low = &report.classes[0];
        assert_relative_eq!(low.precision, 1.0);
        assert_relative_eq!(low.recall, 0.5);
        assert_relative_eq!(low.f1, 2.0 / 3.0, epsilon = 1e-12);

        let medium = &report.classes[1];
        assert_relative_eq!(medium.precision, 0.5);
        assert_relative_eq!(medium.recall, 2.0 / 3.0, epsilon = 1e-12);

        assert_eq!(report.macro_avg.support, 9);
        assert_relative_eq!(report.accuracy, 6.0 / 9.0);
        assert!(report.to_string().contains("weighted avg"));
    }

    #[test]
    fn test_class_never_predicted() {
        let report = ClassificationReport::from_confusion(&ConfusionMatrix::new(
            names(),
            &[0, 1, 2],
            &[1, 1, 1],
        ));
        assert_eq!(report.classes[0].precision, 0.0);
        assert_eq!(report.classes[0].f1, 0.0);
    }
}
