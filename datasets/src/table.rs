use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::{Error, Result};

/// Cell contents treated as missing when reading CSV, compared after trimming whitespace
pub const MISSING_MARKERS: [&str; 11] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "<NA>", "#N/A",
];

/// A table of raw survey answers
///
/// Cells are kept as text, a missing answer is `None`. Every row has exactly one cell per header.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Create a table from headers and rows
    ///
    /// ### Returns
    ///
    /// An error if a row does not have one cell per header.
    pub fn new<S: Into<String>>(headers: Vec<S>, rows: Vec<Vec<Option<String>>>) -> Result<Table> {
        let headers = headers.into_iter().map(Into::into).collect::<Vec<String>>();

        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != headers.len())
        {
            return Err(Error::RaggedRow {
                row,
                found: cells.len(),
                expected: headers.len(),
            });
        }

        Ok(Table { headers, rows })
    }

    /// Read a table from CSV with a header line
    ///
    /// Cells matching one of the [`MISSING_MARKERS`] become `None`, all other cells are trimmed.
    pub fn from_csv<R: Read>(csv: R) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(b',')
            .from_reader(csv);

        let headers = reader
            .headers()?
            .iter()
            .map(|x| x.trim().to_string())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(parse_cell).collect::<Vec<_>>());
        }

        debug!(
            columns = headers.len(),
            rows = rows.len(),
            "read survey table"
        );

        Table::new(headers, rows)
    }

    /// Read a table from gzipped CSV
    pub fn from_gz_csv<R: Read>(gz: R) -> Result<Table> {
        // unzip file
        let file = GzDecoder::new(gz);
        Table::from_csv(file)
    }

    /// Read a table from a CSV file, decompressing it first if the name ends with `.gz`
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Table> {
        let path = path.as_ref();
        let file = BufReader::new(File::open(path)?);

        match path.extension().and_then(|x| x.to_str()) {
            Some("gz") => Table::from_gz_csv(file),
            _ => Table::from_csv(file),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Position of the column called `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|x| x == name)
    }
}

fn parse_cell(cell: &str) -> Option<String> {
    let cell = cell.trim();

    if MISSING_MARKERS.contains(&cell) {
        None
    } else {
        Some(cell.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const CSV: &str = "Age,Country,treatment\n\
                       37, United States ,Yes\n\
                       44,NA,No\n\
                       ,Canada,n/a\n";

    #[test]
    fn missing_markers_become_none() -> Result<()> {
        let table = Table::from_csv(CSV.as_bytes())?;

        assert_eq!(table.headers(), &["Age", "Country", "treatment"]);
        assert_eq!(table.nrows(), 3);
        assert_eq!(
            table.rows()[0],
            vec![
                Some("37".to_string()),
                Some("United States".to_string()),
                Some("Yes".to_string())
            ]
        );
        assert_eq!(table.rows()[1][1], None);
        assert_eq!(table.rows()[2][0], None);
        assert_eq!(table.rows()[2][2], None);

        Ok(())
    }

    #[test]
    fn gzipped_input_is_decompressed() -> Result<()> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(CSV.as_bytes())?;
        let compressed = encoder.finish()?;

        let table = Table::from_gz_csv(&compressed[..])?;

        assert_eq!(table, Table::from_csv(CSV.as_bytes())?);

        Ok(())
    }

    #[test]
    fn path_extension_selects_the_decoder() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let plain = dir.path().join("survey.csv");
        let gz = dir.path().join("survey.csv.gz");

        std::fs::write(&plain, CSV)?;
        let mut encoder = GzEncoder::new(File::create(&gz)?, Compression::default());
        encoder.write_all(CSV.as_bytes())?;
        encoder.finish()?;

        assert_eq!(Table::from_path(&plain)?, Table::from_path(&gz)?);

        Ok(())
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let res = Table::new(
            vec!["Age", "treatment"],
            vec![vec![Some("30".to_string())]],
        );

        assert!(matches!(
            res,
            Err(Error::RaggedRow {
                row: 0,
                found: 1,
                expected: 2
            })
        ));
        assert!(matches!(
            Table::from_csv("a,b\n1\n".as_bytes()),
            Err(Error::Csv(_))
        ));
    }

    #[test]
    fn columns_are_found_by_name() -> Result<()> {
        let table = Table::from_csv(CSV.as_bytes())?;

        assert_eq!(table.column_index("treatment"), Some(2));
        assert_eq!(table.column_index("wellness_program"), None);

        Ok(())
    }
}
