//! `seekcare-datasets` turns raw mental-health survey answers into datasets ready for fitting.
//!
//! ## The Big Picture
//!
//! The survey comes as a CSV table with one row per respondent and one column per question. Most
//! answers are categorical ("Yes", "No", "Don't know", a country, a company size bucket), some are
//! numeric and a few are missing. Models want a numeric matrix, so the survey is
//!
//! * read into a [`Table`] of optional text cells, with the usual spellings of missing values
//!   recognised, from plain or gzipped CSV
//! * [prepared](SurveyPreparer::prepare), projecting the relevant questions, dropping incomplete
//!   answers and one-hot encoding the categorical ones
//!
//! ## Using the survey
//!
//! ```ignore
//! let dataset = seekcare_datasets::load_survey("survey.csv.gz")?;
//! let (train, test) = dataset.shuffle_split(0.3, &mut rng)?;
//! ```

use std::path::Path;

use seekcare::Dataset;

pub mod error;
mod survey;
mod table;

pub use error::{Error, Result};
pub use survey::{SurveyPreparer, LABEL_COLUMN, SURVEY_COLUMNS};
pub use table::{Table, MISSING_MARKERS};

/// Read the survey at `path` and prepare it with the default survey columns
///
/// Files ending with `.gz` are decompressed while reading.
pub fn load_survey<P: AsRef<Path>>(path: P) -> Result<Dataset<f64, String>> {
    let table = Table::from_path(path)?;
    let dataset = SurveyPreparer::default().prepare(&table)?;

    Ok(dataset)
}
