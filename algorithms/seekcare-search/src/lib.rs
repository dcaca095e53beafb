//! # Searching for a treatment predictor
//!
//! `seekcare-search` answers two questions about a decision tree predicting whether a survey
//! respondent seeks treatment: how much of the data should be held out for testing, and how deep
//! may the tree grow? It then trains the final trees and optionally renders one of them.
//!
//! The stages can be run one by one
//!
//! * [`best_test_split`] tries test ratios from 0.1 to 0.9 and settles on 0.2, 0.3 or 0.4
//! * [`best_max_depth`] tries depth limits on a fixed partition, never settling on one level
//! * [`train_models`] fits an unconstrained and a depth-limited tree and scores both
//!
//! or all together through a [`Pipeline`], which produces a [`Report`].
//!
//! Randomness is always drawn from a caller supplied random source, so every stage is
//! reproducible with a fixed seed.
//!

mod budget;
mod depth;
mod hyperparams;
mod pipeline;
mod split;
mod trainer;

pub use depth::{best_max_depth, DepthOutcome};
pub use hyperparams::{SearchParams, SearchValidParams};
pub use pipeline::{Pipeline, Report};
pub use split::{best_test_split, SplitOutcome};
pub use trainer::{train_models, TrainedModels};
