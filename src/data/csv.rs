// CSV data source and sink implementation
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{DataError, DataSet, DataSink, DataSource, Record, SourceType};

/// Parse delimited text with a header row into text-typed records
pub fn read_csv<R: Read>(reader: R, delimiter: u8) -> Result<DataSet, DataError> {
    let mut csv_reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| DataError::ParseError(e.to_string()))?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut dataset = DataSet::new();

    for result in csv_reader.records() {
        let row = result.map_err(|e| DataError::ParseError(e.to_string()))?;

        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(name, field)| (name.clone(), field.to_string()))
            .collect();

        dataset.push(record);
    }

    Ok(dataset)
}

/// CSV data source
pub struct CsvSource {
    path: String,
    delimiter: char,
}

impl CsvSource {
    /// Create a new CSV data source
    pub fn new<P: AsRef<Path>>(path: P, delimiter: char) -> Self {
        CsvSource {
            path: path.as_ref().to_string_lossy().to_string(),
            delimiter,
        }
    }
}

impl DataSource for CsvSource {
    fn read(&self) -> Result<DataSet, DataError> {
        let file = File::open(&self.path)?;
        let mut dataset = read_csv(BufReader::new(file), self.delimiter as u8)?;

        dataset.metadata.add("source", "csv");
        dataset.metadata.add("path", &self.path);

        Ok(dataset)
    }

    fn name(&self) -> &str {
        &self.path
    }

    fn source_type(&self) -> SourceType {
        SourceType::File
    }
}

/// CSV data sink.
///
/// The header comes from the first record. Every record is written
/// positionally with its own values, so records whose field set differs from
/// the first produce ragged or shifted rows.
pub struct CsvSink {
    delimiter: char,
}

impl CsvSink {
    /// Create a new CSV data sink
    pub fn new(delimiter: char) -> Self {
        CsvSink { delimiter }
    }
}

impl DataSink for CsvSink {
    fn write(&self, data: &DataSet, writer: &mut dyn std::io::Write) -> Result<(), DataError> {
        let first = data
            .get(0)
            .ok_or_else(|| DataError::NotSupported("Cannot convert to CSV".to_string()))?;

        let mut csv_writer = ::csv::WriterBuilder::new()
            .delimiter(self.delimiter as u8)
            .flexible(true)
            .from_writer(writer);

        let to_io = |e: ::csv::Error| DataError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e));

        csv_writer.write_record(first.keys()).map_err(to_io)?;

        for record in &data.records {
            let row: Vec<String> = record.values().map(|v| v.to_text()).collect();
            csv_writer.write_record(&row).map_err(to_io)?;
        }

        csv_writer.flush()?;

        Ok(())
    }

    fn name(&self) -> &str {
        "csv"
    }
}
