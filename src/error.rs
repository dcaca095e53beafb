//! Error types in seekcare
//!

use std::time::Duration;

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("required column `{0}` is missing from the input")]
    MissingColumn(String),
    #[error("dataset contains no samples")]
    EmptyDataset,
    #[error("model fitting failed: {0}")]
    ModelFitting(String),
    #[error("could not render tree: {0}")]
    Visualization(String),
    #[error("search exceeded its time budget of {0:?}")]
    BudgetExceeded(Duration),
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
    #[error("multiple targets not supported")]
    MultipleTargets,
}
