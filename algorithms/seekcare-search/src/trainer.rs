use rand::Rng;
use seekcare::prelude::*;
use seekcare_trees::DecisionTree;
use tracing::info;

use crate::{DepthOutcome, SearchValidParams};

/// The two final trees and how well they do on the test part
#[derive(Debug, Clone)]
pub struct TrainedModels {
    unconstrained: DecisionTree<f64, String>,
    unconstrained_accuracy: f32,
    limited: DecisionTree<f64, String>,
    limited_accuracy: f32,
    depth: usize,
}

impl TrainedModels {
    /// Tree fitted without depth limit
    pub fn unconstrained(&self) -> &DecisionTree<f64, String> {
        &self.unconstrained
    }

    pub fn unconstrained_accuracy(&self) -> f32 {
        self.unconstrained_accuracy
    }

    /// Tree fitted with the depth found by the depth search
    pub fn limited(&self) -> &DecisionTree<f64, String> {
        &self.limited
    }

    pub fn limited_accuracy(&self) -> f32 {
        self.limited_accuracy
    }

    /// Depth limit of the limited tree, zero if it is unconstrained as well
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Fit the final pair of trees on the partition the searches settled on
///
/// One tree is fitted without depth limit and one with the depth of `depth`. Both are scored on
/// `test`. The tree seeds are drawn from `rng`.
///
/// ### Returns
///
/// `Error::ModelFitting` if `train` has no samples.
pub fn train_models<R: Rng + ?Sized>(
    train: &Dataset<f64, String>,
    test: &Dataset<f64, String>,
    depth: &DepthOutcome,
    params: &SearchValidParams,
    rng: &mut R,
) -> Result<TrainedModels> {
    if train.nsamples() == 0 {
        return Err(Error::ModelFitting(
            "the training partition has no samples".to_string(),
        ));
    }

    let unconstrained = DecisionTree::params()
        .split_quality(params.split_quality())
        .seed(rng.gen())
        .fit(train)?;
    let unconstrained_accuracy = unconstrained
        .predict(test)
        .confusion_matrix(test)?
        .accuracy();

    let limited = DecisionTree::params()
        .split_quality(params.split_quality())
        .max_depth(depth.max_depth())
        .seed(rng.gen())
        .fit(train)?;
    let limited_accuracy = limited.predict(test).confusion_matrix(test)?.accuracy();

    info!(
        unconstrained_accuracy,
        unconstrained_depth = unconstrained.max_depth(),
        limited_accuracy,
        limited_depth = limited.max_depth(),
        "trained final models"
    );

    Ok(TrainedModels {
        unconstrained,
        unconstrained_accuracy,
        limited,
        limited_accuracy,
        depth: depth.depth(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{best_max_depth, SearchParams};
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1, Array2};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn labels(x: &[&str]) -> Array1<String> {
        x.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn both_trees_are_scored() -> Result<()> {
        let train = Dataset::new(
            array![[0., 1.], [0., 0.], [1., 1.], [1., 0.], [0., 1.], [1., 0.]],
            labels(&["No", "No", "Yes", "Yes", "No", "Yes"]),
        );
        let test = Dataset::new(array![[0., 0.], [1., 1.]], labels(&["No", "Yes"]));
        let params = SearchParams::new().check_unwrap();
        let mut rng = SmallRng::seed_from_u64(5);

        let depth = best_max_depth(&train, &test, &params, &mut rng)?;
        let models = train_models(&train, &test, &depth, &params, &mut rng)?;

        assert_eq!(models.depth(), 2);
        assert!(models.limited().max_depth() <= 2);
        assert_abs_diff_eq!(models.unconstrained_accuracy(), 1.0);
        assert_abs_diff_eq!(models.limited_accuracy(), 1.0);

        Ok(())
    }

    #[test]
    fn empty_training_part_is_a_fitting_error() {
        let train = Dataset::new(Array2::zeros((0, 2)), labels(&[]));
        let test = Dataset::new(array![[0., 0.]], labels(&["No"]));
        let params = SearchParams::new().check_unwrap();
        let mut rng = SmallRng::seed_from_u64(5);
        let depth = best_max_depth(&test, &test, &params, &mut rng).unwrap();

        let res = train_models(&train, &test, &depth, &params, &mut rng);

        assert!(matches!(res, Err(Error::ModelFitting(_))));
    }
}
