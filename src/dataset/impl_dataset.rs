use super::{
    partition::shuffled_partition, AsTargets, Dataset, DatasetBase, Float, Label, Records,
};
use crate::error::{Error, Result};
use crate::traits::{Predict, PredictInplace};
use ndarray::{Array1, ArrayBase, Axis, Data, Ix2};
use rand::Rng;

/// Implementation without constraints on records and targets
///
/// This implementation block provides methods for the creation and mutation of datasets. This
/// includes swapping the targets, return the records etc.
impl<R: Records, T> DatasetBase<R, T> {
    /// Create a new dataset from records and targets
    ///
    /// # Example
    ///
    /// ```
    /// use ndarray::array;
    /// use seekcare::prelude::*;
    ///
    /// let records = array![[34., 1.], [27., 0.]];
    /// let targets = array!["Yes", "No"];
    /// let dataset = Dataset::new(records, targets);
    ///
    /// assert_eq!(dataset.nsamples(), 2);
    /// assert_eq!(dataset.nfeatures(), 2);
    /// ```
    pub fn new(records: R, targets: T) -> DatasetBase<R, T> {
        DatasetBase {
            records,
            targets,
            weights: Array1::zeros(0),
            feature_names: Vec::new(),
        }
    }

    /// Returns reference to targets
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Return a single weight
    ///
    /// The weight of the `idx`th observation is returned. If no weight is specified, then all
    /// observations are unweighted with default value `1.0`.
    pub fn weight_for(&self, idx: usize) -> f32 {
        self.weights.get(idx).copied().unwrap_or(1.0)
    }

    /// Returns feature names
    ///
    /// A feature name gives a human-readable string describing the purpose of a single feature.
    /// This allow the reader to understand its purpose while analysing results, for example
    /// correlation analysis or feature importance.
    pub fn feature_names(&self) -> Vec<String> {
        if !self.feature_names.is_empty() {
            self.feature_names.clone()
        } else {
            (0..self.records.nfeatures())
                .map(|idx| format!("feature-{}", idx))
                .collect()
        }
    }

    /// Return records of a dataset
    ///
    /// The records are data points from which predictions are made. This functions returns a
    /// reference to the record field.
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Updates the weights of a dataset
    pub fn with_weights(mut self, weights: Array1<f32>) -> DatasetBase<R, T> {
        self.weights = weights;

        self
    }

    /// Updates the feature names of a dataset
    pub fn with_feature_names<I: Into<String>>(mut self, names: Vec<I>) -> DatasetBase<R, T> {
        let feature_names = names.into_iter().map(|x| x.into()).collect();

        self.feature_names = feature_names;

        self
    }
}

impl<L: Label, R: Records, T: AsTargets<Elem = L>> DatasetBase<R, T> {
    /// Returns the distinct labels of a single-target dataset in order of first appearance
    pub fn labels_in_order(&self) -> Result<Vec<L>> {
        let targets = self.try_single_target()?;
        let mut labels: Vec<L> = Vec::new();

        for label in targets.iter() {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }

        Ok(labels)
    }
}

impl<F: Float, L: Clone> Dataset<F, L> {
    /// Selects the observations at `indices`, in that order
    ///
    /// Weights follow their observations and feature names are kept.
    pub fn select(&self, indices: &[usize]) -> Dataset<F, L> {
        let weights = if self.weights.is_empty() {
            Array1::zeros(0)
        } else {
            self.weights.select(Axis(0), indices)
        };

        DatasetBase {
            records: self.records.select(Axis(0), indices),
            targets: self.targets.select(Axis(0), indices),
            weights,
            feature_names: self.feature_names.clone(),
        }
    }

    /// Randomly split the dataset into a training and a test set
    ///
    /// `test_ratio` is the fraction of observations held out for testing. The two returned
    /// datasets are disjoint and together contain every observation exactly once.
    ///
    /// ### Returns
    ///
    /// `(train, test)`, or an error if either side would be empty.
    pub fn shuffle_split<R: Rng + ?Sized>(
        &self,
        test_ratio: f64,
        rng: &mut R,
    ) -> Result<(Dataset<F, L>, Dataset<F, L>)> {
        if self.records.nrows() != self.targets.len() {
            return Err(Error::Parameters(format!(
                "{} records but {} targets",
                self.records.nrows(),
                self.targets.len()
            )));
        }

        let (train, test) = shuffled_partition(self.records.nrows(), test_ratio, rng)?;

        Ok((self.select(&train), self.select(&test)))
    }
}

impl<'a, F, D, T, O> Predict<&'a ArrayBase<D, Ix2>, T> for O
where
    D: Data<Elem = F>,
    ArrayBase<D, Ix2>: Records,
    O: PredictInplace<ArrayBase<D, Ix2>, T>,
{
    fn predict(&self, records: &'a ArrayBase<D, Ix2>) -> T {
        let mut targets = self.default_target(records);
        self.predict_inplace(records, &mut targets);
        targets
    }
}

impl<'a, R, T, S, O> Predict<&'a DatasetBase<R, S>, T> for O
where
    R: Records,
    DatasetBase<R, S>: Records,
    O: PredictInplace<R, T>,
{
    fn predict(&self, ds: &'a DatasetBase<R, S>) -> T {
        let mut targets = self.default_target(ds.records());
        self.predict_inplace(ds.records(), &mut targets);
        targets
    }
}
