//! Common metrics for performance evaluation of classifier
//!
//! Scoring is essential for classification tasks. This module implements a confusion matrix
//! together with the accuracy derived from it.
use std::collections::HashMap;
use std::fmt;

use ndarray::prelude::*;
use ndarray::Data;

use crate::dataset::{AsTargets, DatasetBase, Label, Records};
use crate::error::{Error, Result};

/// Confusion matrix for multi-label evaluation
///
/// A confusion matrix shows predictions in a matrix, where rows correspond to target and columns
/// to predicted. The diagonal entries are correct predictions.
#[derive(Clone, PartialEq)]
pub struct ConfusionMatrix<A> {
    matrix: Array2<f32>,
    members: Array1<A>,
}

impl<A> ConfusionMatrix<A> {
    /// Return mean accuracy
    ///
    /// The fraction of samples whose predicted label matches the ground truth.
    pub fn accuracy(&self) -> f32 {
        self.matrix.diag().sum() / self.matrix.sum()
    }
}

/// Print a confusion matrix
impl<A: fmt::Display> fmt::Debug for ConfusionMatrix<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let len = self.matrix.len_of(Axis(0));
        writeln!(f)?;
        write!(f, "{: <10}", "classes")?;
        for i in 0..len {
            write!(f, " | {: <10}", self.members[i])?;
        }
        writeln!(f)?;

        for i in 0..len {
            write!(f, "{: <10}", self.members[i])?;

            for j in 0..len {
                write!(f, " | {: <10}", self.matrix[(i, j)])?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Classification for multi-label evaluation
///
/// Contains a routine to calculate the confusion matrix, all other scores are derived form it.
pub trait ToConfusionMatrix<A, T> {
    fn confusion_matrix(&self, ground_truth: T) -> Result<ConfusionMatrix<A>>;
}

impl<L: Label, S: Data<Elem = L>, T: Data<Elem = L>> ToConfusionMatrix<L, &ArrayBase<S, Ix1>>
    for ArrayBase<T, Ix1>
{
    fn confusion_matrix(&self, ground_truth: &ArrayBase<S, Ix1>) -> Result<ConfusionMatrix<L>> {
        confusion_matrix_from(self.view(), ground_truth.view())
    }
}

impl<L: Label, R: Records, S: AsTargets<Elem = L>, T: Data<Elem = L>>
    ToConfusionMatrix<L, &DatasetBase<R, S>> for ArrayBase<T, Ix1>
{
    fn confusion_matrix(&self, ground_truth: &DatasetBase<R, S>) -> Result<ConfusionMatrix<L>> {
        let targets = ground_truth.try_single_target()?;

        confusion_matrix_from(self.view(), targets)
    }
}

/// Count every (ground truth, prediction) pair
///
/// Classes are ordered by first appearance, ground truth before predictions, so a class which is
/// only ever predicted still gets its own row and column.
fn confusion_matrix_from<L: Label>(
    prediction: ArrayView1<L>,
    ground_truth: ArrayView1<L>,
) -> Result<ConfusionMatrix<L>> {
    if prediction.len() != ground_truth.len() {
        return Err(Error::Parameters(format!(
            "{} predictions for {} ground truth labels",
            prediction.len(),
            ground_truth.len()
        )));
    }

    if ground_truth.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let mut classes = Vec::new();
    let mut index = HashMap::new();
    for label in ground_truth.iter().chain(prediction.iter()) {
        if !index.contains_key(label) {
            index.insert(label.clone(), classes.len());
            classes.push(label.clone());
        }
    }

    let mut matrix = Array2::zeros((classes.len(), classes.len()));
    for (truth, pred) in ground_truth.iter().zip(prediction.iter()) {
        matrix[(index[truth], index[pred])] += 1.0;
    }

    Ok(ConfusionMatrix {
        matrix,
        members: Array1::from(classes),
    })
}

#[cfg(test)]
mod tests {
    use super::{ConfusionMatrix, ToConfusionMatrix};
    use crate::dataset::Dataset;
    use crate::error::Error;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1, ArrayView1};

    fn assert_cm_eq(cm: &ConfusionMatrix<&str>, expected: &[&str], accuracy: f32) {
        assert_eq!(cm.members.view(), ArrayView1::from(expected));
        assert_abs_diff_eq!(cm.accuracy(), accuracy, epsilon = 1e-6);
    }

    #[test]
    fn accuracy_counts_matching_labels() {
        let predicted = array!["Yes", "No", "Yes", "Yes"];
        let ground_truth = array!["Yes", "No", "No", "Yes"];

        let cm = predicted.confusion_matrix(&ground_truth).unwrap();

        assert_cm_eq(&cm, &["Yes", "No"], 0.75);
        assert_eq!(cm.matrix, array![[2f32, 0.], [1., 1.]]);
    }

    #[test]
    fn accuracy_against_dataset() {
        let dataset = Dataset::new(array![[0.], [1.], [2.]], array![true, true, false]);
        let predicted = array![true, false, false];

        let cm = predicted.confusion_matrix(&dataset).unwrap();

        assert_abs_diff_eq!(cm.accuracy(), 2. / 3., epsilon = 1e-6);
    }

    #[test]
    fn predicted_only_class_gets_a_column() {
        let predicted = array!["Yes", "Maybe"];
        let ground_truth = array!["Yes", "Yes"];

        let cm = predicted.confusion_matrix(&ground_truth).unwrap();

        assert_cm_eq(&cm, &["Yes", "Maybe"], 0.5);
        assert_eq!(cm.matrix, array![[1f32, 1.], [0., 0.]]);
    }

    #[test]
    fn single_class_is_perfect_not_nan() {
        let predicted = array!["No", "No", "No"];
        let cm = predicted.confusion_matrix(&predicted).unwrap();

        assert_abs_diff_eq!(cm.accuracy(), 1.0);
    }

    #[test]
    fn empty_ground_truth_is_an_error() {
        let predicted: Array1<bool> = Array1::from(vec![]);

        assert!(matches!(
            predicted.confusion_matrix(&predicted),
            Err(Error::EmptyDataset)
        ));
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let predicted = array![1usize, 0];
        let ground_truth = array![1usize];

        assert!(matches!(
            predicted.confusion_matrix(&ground_truth),
            Err(Error::Parameters(_))
        ));
    }
}
