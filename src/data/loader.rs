//! CSV loading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::{DataResult, Table, Value};

impl Table {
    /// Read a table from CSV with a header row.
    ///
    /// Cells are trimmed; empty cells become nulls and numeric cells become
    /// numbers. Rows with a different number of cells than the header are
    /// rejected.
    pub fn from_csv_reader<R: Read>(reader: R) -> DataResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(Value::parse_cell).collect());
        }

        debug!(columns = columns.len(), rows = rows.len(), "loaded csv");
        Table::new(columns, rows)
    }

    /// Read a table from a CSV file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> DataResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }
}
