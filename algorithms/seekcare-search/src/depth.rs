//! Search for the depth limit of the tree
//!
use rand::Rng;
use seekcare::prelude::*;
use seekcare_trees::DecisionTree;
use tracing::{debug, info};

use crate::budget::Budget;
use crate::SearchValidParams;

/// Result of [`best_max_depth`]
#[derive(Debug, Clone, PartialEq)]
pub struct DepthOutcome {
    depth: usize,
    accuracy: f32,
    candidates: Vec<(usize, f32)>,
}

impl DepthOutcome {
    /// The chosen depth, zero if no tree deeper than one level scored above zero
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The depth limit to fit with, `None` means unconstrained
    pub fn max_depth(&self) -> Option<usize> {
        match self.depth {
            0 => None,
            depth => Some(depth),
        }
    }

    /// Test accuracy of the chosen depth, zero if no depth was chosen
    pub fn accuracy(&self) -> f32 {
        self.accuracy
    }

    /// Every tried depth with its test accuracy, shallowest first
    pub fn candidates(&self) -> &[(usize, f32)] {
        &self.candidates
    }
}

/// Find the depth limit under which a tree generalises best on a fixed partition
///
/// Trees limited to 1, 2, ... up to the deepest candidate of `params` are fitted on `train` and
/// scored on `test`. The shallowest depth with the strictly highest accuracy is chosen, but a
/// single level is never chosen even if it scores best. Starting from a score of zero and depth
/// zero, a search where no tree deeper than one level scores above zero returns depth zero,
/// which stands for an unconstrained tree.
///
/// The seed of every tree is drawn from `rng`.
pub fn best_max_depth<R: Rng + ?Sized>(
    train: &Dataset<f64, String>,
    test: &Dataset<f64, String>,
    params: &SearchValidParams,
    rng: &mut R,
) -> Result<DepthOutcome> {
    if test.nsamples() == 0 {
        return Err(Error::EmptyDataset);
    }

    let budget = Budget::start(params.time_budget());
    let mut candidates = Vec::with_capacity(params.deepest_candidate());
    let mut best_depth = 0;
    let mut best_score = 0.0;

    for depth in 1..=params.deepest_candidate() {
        budget.check()?;

        let tree = DecisionTree::params()
            .split_quality(params.split_quality())
            .max_depth(Some(depth))
            .seed(rng.gen())
            .fit(train)?;
        let accuracy = tree.predict(test).confusion_matrix(test)?.accuracy();

        debug!(depth, accuracy, fitted_depth = tree.max_depth(), "depth candidate");

        if accuracy > best_score && depth > 1 {
            best_score = accuracy;
            best_depth = depth;
        }
        candidates.push((depth, accuracy));
    }

    info!(depth = best_depth, accuracy = best_score, "selected max depth");

    Ok(DepthOutcome {
        depth: best_depth,
        accuracy: best_score,
        candidates,
    })
}
