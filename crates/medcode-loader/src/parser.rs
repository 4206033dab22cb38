//! Streaming parser for phecode mapping tables.
//!
//! The tables are comma-separated with a header row. Only the ICD code and
//! phecode columns are read; they are located by header name, so extra
//! columns (phenotype strings, exclusion ranges, ...) are ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::types::{MappingError, MappingResult, PhecodeTable, TableConfig};

/// One code → phecode row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhecodeRow {
    /// ICD code as written in the table.
    pub code: String,
    /// Phecode as written in the table.
    pub phecode: String,
}

/// A streaming parser over one phecode table.
pub struct PhecodeParser<R: Read> {
    reader: Reader<R>,
    table: PhecodeTable,
    config: TableConfig,
    code_index: usize,
    phecode_index: usize,
    records_read: usize,
}

impl PhecodeParser<BufReader<File>> {
    /// Creates a new parser from a file path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or lacks the table's columns.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        table: PhecodeTable,
        config: TableConfig,
    ) -> MappingResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MappingError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), table, config)
    }
}

impl<R: Read> PhecodeParser<R> {
    /// Creates a new parser from a reader.
    pub fn from_reader(reader: R, table: PhecodeTable, config: TableConfig) -> MappingResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::None)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let code_index = column_index(&headers, table, table.code_column())?;
        let phecode_index = column_index(&headers, table, table.phecode_column())?;

        Ok(Self {
            reader: csv_reader,
            table,
            config,
            code_index,
            phecode_index,
            records_read: 0,
        })
    }

    /// Returns the table being parsed.
    pub fn table(&self) -> PhecodeTable {
        self.table
    }

    /// Returns the number of records read so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    fn field(&self, record: &StringRecord, index: usize) -> String {
        let value = record.get(index).unwrap_or("");
        let value = if self.config.trim_values {
            value.trim()
        } else {
            value
        };
        value.to_string()
    }
}

impl<R: Read> Iterator for PhecodeParser<R> {
    type Item = MappingResult<PhecodeRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    self.records_read += 1;

                    let row = PhecodeRow {
                        code: self.field(&record, self.code_index),
                        phecode: self.field(&record, self.phecode_index),
                    };

                    if self.config.skip_empty_values
                        && (row.code.is_empty() || row.phecode.is_empty())
                    {
                        continue;
                    }
                    return Some(Ok(row));
                }
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Finds a column by name, tolerating a UTF-8 BOM and R-style quoting.
fn column_index(headers: &StringRecord, table: PhecodeTable, name: &str) -> MappingResult<usize> {
    headers
        .iter()
        .position(|header| {
            header
                .trim_start_matches('\u{feff}')
                .trim()
                .trim_matches('"')
                == name
        })
        .ok_or_else(|| MappingError::MissingColumn {
            table: table.name(),
            column: name.to_string(),
        })
}
