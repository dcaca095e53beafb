//! `seekcare` is a small toolkit for asking one question of a mental-health
//! workplace survey: can a decision tree predict whether a worker seeks treatment,
//! and which demographic and workplace factors does it lean on?
//!
//! ## The big picture
//!
//! This crate holds the shared vocabulary of the workspace. It defines the
//! [`DatasetBase`] container for records, targets and feature names, the traits
//! that models implement ([`traits::Fit`], [`traits::PredictInplace`]), the
//! hyperparameter checking machinery ([`ParamGuard`]) and classification metrics.
//!
//! The algorithms live in sibling crates:
//!
//! * `seekcare-datasets` turns a raw survey table into a one-hot encoded [`Dataset`]
//! * `seekcare-trees` fits, inspects and renders decision trees
//! * `seekcare-search` runs the split-ratio and depth searches and trains the final models
//!

pub mod benchmarks;
pub mod dataset;
pub mod error;
mod metrics_classification;
mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{Dataset, DatasetBase, Float, Label};
pub use param_guard::ParamGuard;

/// Common metrics functions for classification
pub mod metrics {
    pub use crate::metrics_classification::{ConfusionMatrix, ToConfusionMatrix};
}
