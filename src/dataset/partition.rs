use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};

/// Randomly partitions `nsamples` indices into a training and a test set
///
/// The test set receives `ceil(test_ratio * nsamples)` indices and the training set the rest, so
/// both sets are disjoint and together cover `0..nsamples`. Each call draws a fresh permutation
/// from `rng`.
///
/// ### Returns
///
/// `(train_indices, test_indices)`, or `Error::Parameters` if the ratio is outside of `(0, 1)` or
/// one of the two sides would end up empty.
pub fn shuffled_partition<R: Rng + ?Sized>(
    nsamples: usize,
    test_ratio: f64,
    rng: &mut R,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(Error::Parameters(format!(
            "test ratio should be in (0, 1), but was {}",
            test_ratio
        )));
    }

    let ntest = (test_ratio * nsamples as f64).ceil() as usize;
    let ntrain = nsamples.saturating_sub(ntest);
    if ntest == 0 || ntrain == 0 {
        return Err(Error::Parameters(format!(
            "test ratio {} leaves an empty partition for {} samples",
            test_ratio, nsamples
        )));
    }

    let mut indices = (0..nsamples).collect::<Vec<_>>();
    indices.shuffle(rng);

    let test = indices.split_off(ntrain);

    Ok((indices, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn partitions_are_disjoint_for_every_ratio() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(42);

        for n in &[10usize, 37, 100] {
            for k in 1..=9 {
                let ratio = k as f64 / 10.0;
                let (train, test) = shuffled_partition(*n, ratio, &mut rng)?;

                let train_set = train.iter().collect::<HashSet<_>>();
                let test_set = test.iter().collect::<HashSet<_>>();

                assert!(train_set.is_disjoint(&test_set));
                assert_eq!(train.len() + test.len(), *n);
                assert_eq!(test.len(), (ratio * *n as f64).ceil() as usize);
            }
        }

        Ok(())
    }

    #[test]
    fn same_seed_gives_same_partition() -> Result<()> {
        let first = shuffled_partition(50, 0.3, &mut SmallRng::seed_from_u64(3))?;
        let second = shuffled_partition(50, 0.3, &mut SmallRng::seed_from_u64(3))?;

        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    fn rejects_ratios_outside_unit_interval() {
        let mut rng = SmallRng::seed_from_u64(42);

        assert!(shuffled_partition(10, 1.0, &mut rng).is_err());
        assert!(shuffled_partition(10, -0.5, &mut rng).is_err());
        assert!(shuffled_partition(10, f64::NAN, &mut rng).is_err());
        assert!(shuffled_partition(0, 0.5, &mut rng).is_err());
    }
}
