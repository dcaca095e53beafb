use std::collections::BTreeSet;

use ndarray::{Array1, Array2};
use seekcare::error::{Error, Result};
use seekcare::Dataset;
use tracing::{debug, info};

use crate::table::Table;

/// Survey columns used to predict treatment, the label included
pub const SURVEY_COLUMNS: [&str; 8] = [
    "Age",
    "Country",
    "self_employed",
    "family_history",
    "no_employees",
    "tech_company",
    "wellness_program",
    "treatment",
];

/// Whether a respondent sought treatment
pub const LABEL_COLUMN: &str = "treatment";

/// How a feature column ends up in the feature matrix
#[derive(Debug, Clone, PartialEq)]
enum Encoding {
    /// every value is a number
    Numeric,
    /// every value is a spelling of true or false
    Boolean,
    /// one indicator column per distinct value, in sorted order
    OneHot(Vec<String>),
}

impl Encoding {
    fn of_values<'a>(values: impl Iterator<Item = &'a str> + Clone) -> Encoding {
        if values.clone().all(|x| x.parse::<f64>().is_ok()) {
            Encoding::Numeric
        } else if values.clone().all(|x| parse_bool(x).is_some()) {
            Encoding::Boolean
        } else {
            let distinct = values.map(|x| x.to_string()).collect::<BTreeSet<_>>();
            Encoding::OneHot(distinct.into_iter().collect())
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Turns the raw survey table into a labelled dataset
///
/// Preparing a table
///
/// * projects the configured columns, by default [`SURVEY_COLUMNS`]
/// * drops every row with a missing answer in one of them
/// * separates the label column, by default [`LABEL_COLUMN`]
/// * one-hot encodes the remaining non-numeric columns
///
/// Numeric and boolean columns stay single columns, in projection order, and are followed by the
/// indicator columns `<column>_<value>` grouped by their source column. Which indicator columns
/// exist depends only on the values left after dropping incomplete rows.
///
/// ### Example
///
/// ```rust
/// use seekcare_datasets::{SurveyPreparer, Table};
///
/// let table = Table::from_csv(
///     "Age,family_history,treatment\n35,Yes,Yes\n41,No,No\n29,,Yes\n".as_bytes(),
/// )
/// .unwrap();
///
/// let dataset = SurveyPreparer::new()
///     .columns(vec!["Age", "family_history", "treatment"])
///     .prepare(&table)
///     .unwrap();
///
/// assert_eq!(
///     dataset.feature_names(),
///     vec!["Age", "family_history_No", "family_history_Yes"]
/// );
/// assert_eq!(dataset.targets().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyPreparer {
    columns: Vec<String>,
    label: String,
}

impl Default for SurveyPreparer {
    fn default() -> Self {
        SurveyPreparer {
            columns: SURVEY_COLUMNS.iter().map(|x| x.to_string()).collect(),
            label: LABEL_COLUMN.to_string(),
        }
    }
}

impl SurveyPreparer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the projected columns, the label column is added if it is not among them
    pub fn columns<S: Into<String>>(mut self, columns: Vec<S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the column holding the labels
    pub fn label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    fn projection(&self) -> Vec<&str> {
        let mut projection = self.columns.iter().map(|x| x.as_str()).collect::<Vec<_>>();
        if !projection.contains(&self.label.as_str()) {
            projection.push(&self.label);
        }

        projection
    }

    /// Prepare `table` for fitting
    ///
    /// ### Returns
    ///
    /// The encoded dataset with named features and the labels as text. If every row misses an
    /// answer the dataset is empty, which is not an error here.
    ///
    /// `Error::MissingColumn` if one of the projected columns is not in the table.
    pub fn prepare(&self, table: &Table) -> Result<Dataset<f64, String>> {
        let projection = self.projection();

        let indices = projection
            .iter()
            .map(|name| {
                table
                    .column_index(name)
                    .ok_or_else(|| Error::MissingColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        // complete rows, restricted to the projected columns
        let rows = table
            .rows()
            .iter()
            .filter_map(|row| {
                indices
                    .iter()
                    .map(|idx| row[*idx].as_deref())
                    .collect::<Option<Vec<&str>>>()
            })
            .collect::<Vec<_>>();

        debug!(
            rows = table.nrows(),
            complete = rows.len(),
            dropped = table.nrows() - rows.len(),
            "dropped incomplete survey rows"
        );

        let label_pos = projection
            .iter()
            .position(|x| *x == self.label)
            .ok_or_else(|| Error::MissingColumn(self.label.clone()))?;

        let feature_pos = (0..projection.len())
            .filter(|pos| *pos != label_pos)
            .collect::<Vec<_>>();

        let encodings = feature_pos
            .iter()
            .map(|pos| Encoding::of_values(rows.iter().map(move |row| row[*pos])))
            .collect::<Vec<_>>();

        // single columns first, indicator columns after them
        let mut layout = Vec::new();
        for (pos, encoding) in feature_pos.iter().zip(&encodings) {
            if !matches!(encoding, Encoding::OneHot(_)) {
                layout.push((*pos, encoding, None));
            }
        }
        for (pos, encoding) in feature_pos.iter().zip(&encodings) {
            if let Encoding::OneHot(values) = encoding {
                for value in values {
                    layout.push((*pos, encoding, Some(value.as_str())));
                }
            }
        }

        let feature_names = layout
            .iter()
            .map(|(pos, _, value)| match value {
                Some(value) => format!("{}_{}", projection[*pos], value),
                None => projection[*pos].to_string(),
            })
            .collect::<Vec<_>>();

        let mut records = Array2::zeros((rows.len(), layout.len()));
        for (row, mut record) in rows.iter().zip(records.rows_mut()) {
            for (col, (pos, encoding, value)) in layout.iter().enumerate() {
                let cell = row[*pos];

                record[col] = match (encoding, value) {
                    (Encoding::Numeric, _) => cell.parse::<f64>().unwrap_or(f64::NAN),
                    (Encoding::Boolean, _) => {
                        if parse_bool(cell).unwrap_or(false) {
                            1.0
                        } else {
                            0.0
                        }
                    }
                    (Encoding::OneHot(_), Some(value)) if cell == *value => 1.0,
                    (Encoding::OneHot(_), _) => 0.0,
                };
            }
        }

        let targets = rows
            .iter()
            .map(|row| row[label_pos].to_string())
            .collect::<Array1<_>>();

        info!(
            samples = records.nrows(),
            features = records.ncols(),
            "prepared survey dataset"
        );

        Ok(Dataset::new(records, targets).with_feature_names(feature_names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn cell(x: &str) -> Option<String> {
        Some(x.to_string())
    }

    /// A row of answers, empty strings are missing
    fn answers(cells: &[&str]) -> Vec<Option<String>> {
        cells
            .iter()
            .map(|x| if x.is_empty() { None } else { cell(x) })
            .collect()
    }

    fn survey_table() -> Table {
        Table::new(
            SURVEY_COLUMNS.to_vec(),
            vec![
                answers(&["37", "United States", "No", "No", "6-25", "Yes", "No", "Yes"]),
                answers(&["44", "Canada", "No", "Yes", "1-5", "No", "Yes", "No"]),
                answers(&["32", "", "Yes", "No", "6-25", "Yes", "No", "No"]),
                answers(&["31", "United States", "Yes", "Yes", "1-5", "Yes", "Yes", "Yes"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn incomplete_rows_are_dropped() -> Result<()> {
        let dataset = SurveyPreparer::new().prepare(&survey_table())?;

        assert_eq!(dataset.records().nrows(), 3);
        assert_eq!(
            dataset.targets(),
            &array!["Yes", "No", "Yes"].map(|x| x.to_string())
        );

        Ok(())
    }

    #[test]
    fn categorical_columns_are_one_hot_encoded() -> Result<()> {
        let dataset = SurveyPreparer::new().prepare(&survey_table())?;

        assert_eq!(
            dataset.feature_names(),
            vec![
                "Age",
                "Country_Canada",
                "Country_United States",
                "self_employed_No",
                "self_employed_Yes",
                "family_history_No",
                "family_history_Yes",
                "no_employees_1-5",
                "no_employees_6-25",
                "tech_company_No",
                "tech_company_Yes",
                "wellness_program_No",
                "wellness_program_Yes",
            ]
        );

        assert_abs_diff_eq!(
            dataset.records().row(1),
            array![44., 1., 0., 1., 0., 0., 1., 1., 0., 1., 0., 0., 1.]
        );

        // one indicator per source column is set
        for row in dataset.records().rows() {
            assert_abs_diff_eq!(row.iter().skip(1).sum::<f64>(), 6.0);
        }

        Ok(())
    }

    #[test]
    fn indicators_depend_on_the_complete_rows() -> Result<()> {
        // "Yes" for self_employed only shows up in rows dropped for another missing answer
        let table = Table::new(
            vec!["Age", "self_employed", "treatment"],
            vec![
                vec![cell("30"), cell("No"), cell("Yes")],
                vec![None, cell("Yes"), cell("No")],
            ],
        )
        .unwrap();

        let dataset = SurveyPreparer::new()
            .columns(vec!["Age", "self_employed", "treatment"])
            .prepare(&table)?;

        assert_eq!(dataset.feature_names(), vec!["Age", "self_employed_No"]);

        Ok(())
    }

    #[test]
    fn boolean_columns_stay_single() -> Result<()> {
        let table = Table::new(
            vec!["tech_company", "Country", "treatment"],
            vec![
                vec![cell("True"), cell("France"), cell("Yes")],
                vec![cell("false"), cell("France"), cell("No")],
            ],
        )
        .unwrap();

        let dataset = SurveyPreparer::new()
            .columns(vec!["tech_company", "Country"])
            .prepare(&table)?;

        assert_eq!(dataset.feature_names(), vec!["tech_company", "Country_France"]);
        assert_abs_diff_eq!(dataset.records(), &array![[1., 1.], [0., 1.]]);

        Ok(())
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let table = Table::new(
            vec!["Age", "Country", "treatment"],
            vec![vec![cell("30"), cell("Canada"), cell("Yes")]],
        )
        .unwrap();

        match SurveyPreparer::new().prepare(&table) {
            Err(Error::MissingColumn(name)) => assert_eq!(name, "self_employed"),
            other => panic!("expected a missing column, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn all_rows_dropped_gives_an_empty_dataset() -> Result<()> {
        let table = Table::new(
            vec!["Age", "treatment"],
            vec![vec![None, cell("Yes")], vec![cell("40"), None]],
        )
        .unwrap();

        let dataset = SurveyPreparer::new()
            .columns(vec!["Age"])
            .prepare(&table)?;

        assert_eq!(dataset.records().nrows(), 0);
        assert_eq!(dataset.targets().len(), 0);

        Ok(())
    }

    #[test]
    fn label_column_can_be_changed() -> Result<()> {
        let table = Table::new(
            vec!["Age", "seek_help"],
            vec![vec![cell("30"), cell("Yes")], vec![cell("50"), cell("No")]],
        )
        .unwrap();

        let dataset = SurveyPreparer::new()
            .columns(vec!["Age"])
            .label("seek_help")
            .prepare(&table)?;

        assert_eq!(dataset.feature_names(), vec!["Age"]);
        assert_eq!(dataset.targets(), &array!["Yes", "No"].map(|x| x.to_string()));

        Ok(())
    }
}
