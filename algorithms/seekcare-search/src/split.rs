//! Search for the test ratio of the train/test partition
//!
use rand::Rng;
use seekcare::prelude::*;
use seekcare_trees::DecisionTree;
use tracing::{debug, info};

use crate::budget::Budget;
use crate::SearchValidParams;

/// Candidate test ratios are `k / 10` for these `k`
const CANDIDATE_TENTHS: std::ops::RangeInclusive<u32> = 1..=9;

/// Ratio used whenever the best candidate is not trusted
const FALLBACK_TENTHS: u32 = 3;

fn tenths_to_ratio(tenths: u32) -> f64 {
    tenths as f64 / 10.0
}

/// Keeps 0.2, 0.3 and 0.4, everything else (no selection, 0.1, above 0.4) becomes 0.3
fn corrected_tenths(best_tenths: u32) -> u32 {
    match best_tenths {
        2..=4 => best_tenths,
        _ => FALLBACK_TENTHS,
    }
}

/// Result of [`best_test_split`]
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    tenths: u32,
    best: Option<(f64, f32)>,
    candidates: Vec<(f64, f32)>,
}

impl SplitOutcome {
    /// The chosen test ratio, one of 0.2, 0.3 and 0.4
    pub fn ratio(&self) -> f64 {
        tenths_to_ratio(self.tenths)
    }

    /// The candidate with the highest test accuracy, before the correction to 0.3 applies
    ///
    /// `None` if no candidate scored above zero.
    pub fn best_candidate(&self) -> Option<(f64, f32)> {
        self.best
    }

    /// Whether the best candidate was replaced by the fallback ratio
    pub fn corrected(&self) -> bool {
        self.best
            .map(|(ratio, _)| (ratio - self.ratio()).abs() > f64::EPSILON)
            .unwrap_or(true)
    }

    /// Every tried ratio with its test accuracy, in the order they were tried
    pub fn candidates(&self) -> &[(f64, f32)] {
        &self.candidates
    }
}

/// Find the test ratio under which an unconstrained tree generalises best
///
/// For every candidate ratio 0.1, 0.2, ..., 0.9 the dataset is partitioned anew with randomness
/// drawn from `rng`, a tree without depth limit is fitted on the training part and scored on the
/// test part. The first candidate with the strictly highest accuracy is selected.
///
/// The selection is then corrected: the smallest ratio and every ratio above 0.4 are replaced by
/// 0.3, so the result is always 0.2, 0.3 or 0.4. The same happens when no candidate reaches an
/// accuracy above zero.
///
/// ### Returns
///
/// `Error::EmptyDataset` if there are no samples, `Error::BudgetExceeded` if the time budget in
/// `params` runs out before the last candidate.
pub fn best_test_split<R: Rng + ?Sized>(
    dataset: &Dataset<f64, String>,
    params: &SearchValidParams,
    rng: &mut R,
) -> Result<SplitOutcome> {
    if dataset.nsamples() == 0 || dataset.targets().is_empty() {
        return Err(Error::EmptyDataset);
    }

    let budget = Budget::start(params.time_budget());
    let mut candidates = Vec::new();
    let mut best_tenths = 0;
    let mut best_score = 0.0;

    for tenths in CANDIDATE_TENTHS {
        budget.check()?;

        let ratio = tenths_to_ratio(tenths);
        let (train, test) = dataset.shuffle_split(ratio, rng)?;

        let tree = DecisionTree::params()
            .split_quality(params.split_quality())
            .seed(rng.gen())
            .fit(&train)?;
        let accuracy = tree.predict(&test).confusion_matrix(&test)?.accuracy();

        debug!(
            ratio,
            accuracy,
            train = train.nsamples(),
            test = test.nsamples(),
            "split candidate"
        );

        if accuracy > best_score {
            best_score = accuracy;
            best_tenths = tenths;
        }
        candidates.push((ratio, accuracy));
    }

    let best = if best_tenths > 0 {
        Some((tenths_to_ratio(best_tenths), best_score))
    } else {
        None
    };

    let tenths = corrected_tenths(best_tenths);

    info!(
        ratio = tenths_to_ratio(tenths),
        best = ?best,
        "selected test ratio"
    );

    Ok(SplitOutcome {
        tenths,
        best,
        candidates,
    })
}
