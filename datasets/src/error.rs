//! Error definitions for loading and preparing survey data
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not read csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not open input: {0}")]
    Io(#[from] std::io::Error),
    #[error("row {row} has {found} cells, but there are {expected} columns")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error(transparent)]
    Seekcare(#[from] seekcare::error::Error),
}
