// Export serializer rendering datasets as capped text payloads
// Author: Gabriel Demetrios Lafis

use thiserror::Error;

use crate::data::{CsvSink, DataError, DataSet, DataSink, FileFormat, JsonSink};

/// Longest export payload, in characters, before truncation
pub const MAX_EXPORT_CHARS: usize = 500;

/// Appended to truncated payloads
pub const TRUNCATION_MARKER: &str = "...";

/// Text returned when a CSV export has no records to take a header from
pub const EMPTY_CSV_MESSAGE: &str = "Cannot convert to CSV";

/// Represents an error in the export module
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Data error: {0}")]
    DataError(#[from] DataError),
}

/// Cut `text` to `max_chars` characters plus the marker when it is longer
pub fn truncate(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut truncated = text[..cut].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => text,
    }
}

/// Render the full dataset without the length cap
pub fn render(data: &DataSet, format: FileFormat) -> Result<String, ExportError> {
    if format == FileFormat::Csv && data.is_empty() {
        return Ok(EMPTY_CSV_MESSAGE.to_string());
    }

    let sink: Box<dyn DataSink> = match format {
        FileFormat::Json => Box::new(JsonSink::new(true)),
        FileFormat::Csv => Box::new(CsvSink::new(',')),
    };

    let mut buffer = Vec::new();
    sink.write(data, &mut buffer)?;

    String::from_utf8(buffer).map_err(|e| ExportError::DataError(DataError::ParseError(e.to_string())))
}

/// Render `data` as JSON or CSV, capped at [`MAX_EXPORT_CHARS`] characters
pub fn export(data: &DataSet, format: FileFormat) -> Result<String, ExportError> {
    render(data, format).map(|text| truncate(text, MAX_EXPORT_CHARS))
}

/// Parse a caller-supplied format name
pub fn parse_format(name: &str) -> Result<FileFormat, ExportError> {
    FileFormat::parse(name).ok_or_else(|| ExportError::UnsupportedFormat(name.to_string()))
}
