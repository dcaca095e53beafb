use std::time::{Duration, Instant};

use seekcare::error::{Error, Result};

/// Wall-clock limit of a search, started on creation
pub(crate) struct Budget {
    started: Instant,
    limit: Option<Duration>,
}

impl Budget {
    pub(crate) fn start(limit: Option<Duration>) -> Budget {
        Budget {
            started: Instant::now(),
            limit,
        }
    }

    /// Fails once more time than the limit has passed
    pub(crate) fn check(&self) -> Result<()> {
        match self.limit {
            Some(limit) if self.started.elapsed() > limit => Err(Error::BudgetExceeded(limit)),
            _ => Ok(()),
        }
    }
}
