use std::time::Duration;

use seekcare::{
    error::{Error, Result},
    ParamGuard,
};
use seekcare_trees::SplitQuality;

/// Settings shared by the split search, the depth search and the final training
///
/// ### Example
///
/// ```rust
/// use seekcare::ParamGuard;
/// use seekcare_search::SearchParams;
/// use std::time::Duration;
///
/// let params = SearchParams::new()
///     .seed(42)
///     .time_budget(Some(Duration::from_secs(30)))
///     .check()
///     .unwrap();
///
/// assert_eq!(params.deepest_candidate(), 10);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchValidParams {
    seed: u64,
    deepest_candidate: usize,
    split_quality: SplitQuality,
    time_budget: Option<Duration>,
}

impl SearchValidParams {
    /// Seed of the random source drawing partitions and tree seeds
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Largest depth tried by the depth search, which starts at one
    pub fn deepest_candidate(&self) -> usize {
        self.deepest_candidate
    }

    pub fn split_quality(&self) -> SplitQuality {
        self.split_quality
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchParams(SearchValidParams);

impl Default for SearchParams {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchParams {
    /// Defaults are
    /// * `seed = 0`
    /// * `deepest_candidate = 10`
    /// * `split_quality = SplitQuality::Gini`
    /// * `time_budget = None`
    pub fn new() -> Self {
        SearchParams(SearchValidParams {
            seed: 0,
            deepest_candidate: 10,
            split_quality: SplitQuality::Gini,
            time_budget: None,
        })
    }

    /// Sets the seed, equal seeds reproduce ratio, depth and accuracies
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }

    /// Sets the largest depth tried by the depth search
    pub fn deepest_candidate(mut self, depth: usize) -> Self {
        self.0.deepest_candidate = depth;
        self
    }

    /// Sets the split quality of every fitted tree
    pub fn split_quality(mut self, split_quality: SplitQuality) -> Self {
        self.0.split_quality = split_quality;
        self
    }

    /// Sets the wall-clock time a search may take, checked before every candidate
    pub fn time_budget(mut self, time_budget: Option<Duration>) -> Self {
        self.0.time_budget = time_budget;
        self
    }
}

impl ParamGuard for SearchParams {
    type Checked = SearchValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.deepest_candidate < 2 {
            Err(Error::Parameters(format!(
                "the depth search needs candidates deeper than one, but the deepest was {}",
                self.0.deepest_candidate
            )))
        } else if self.0.time_budget == Some(Duration::from_secs(0)) {
            Err(Error::Parameters(
                "time budget should be positive".to_string(),
            ))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_the_check() {
        let params = SearchParams::default().check_unwrap();

        assert_eq!(params.seed(), 0);
        assert_eq!(params.deepest_candidate(), 10);
        assert_eq!(params.split_quality(), SplitQuality::Gini);
        assert_eq!(params.time_budget(), None);
    }

    #[test]
    fn shallow_depth_search_is_rejected() {
        let res = SearchParams::new().deepest_candidate(1).check();

        assert!(matches!(res, Err(Error::Parameters(_))));
    }

    #[test]
    fn zero_budget_is_rejected() {
        let res = SearchParams::new()
            .time_budget(Some(Duration::from_secs(0)))
            .check();

        assert!(matches!(res, Err(Error::Parameters(_))));
    }
}
