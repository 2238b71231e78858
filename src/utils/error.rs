// Error handling utilities
// Author: Gabriel Demetrios Lafis

use thiserror::Error;

use crate::data::DataError;
use crate::export::ExportError;
use crate::processing::ProcessingError;
use crate::sources::SourceError;
use crate::translate::TranslateError;

/// Every failure a tool call can report
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or store-rejected query
    #[error("{0}")]
    Query(String),
    /// Missing or malformed file
    #[error("{0}")]
    File(String),
    /// Fewer than two datasets supplied
    #[error("{0}")]
    Integration(String),
    /// Unknown export format, source type or join type
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Text placed in an error response
    pub fn payload_text(&self) -> String {
        match self {
            EngineError::UnknownTool(_) => self.to_string(),
            other => format!("Error: {}", other),
        }
    }
}

impl From<DataError> for EngineError {
    fn from(err: DataError) -> Self {
        EngineError::File(err.to_string())
    }
}

impl From<SourceError> for EngineError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Query(msg) => EngineError::Query(msg),
            SourceError::File(msg) => EngineError::File(msg),
        }
    }
}

impl From<ProcessingError> for EngineError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::NotEnoughDatasets(_) => EngineError::Integration(err.to_string()),
            other => EngineError::InvalidArguments(other.to_string()),
        }
    }
}

impl From<ExportError> for EngineError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::UnsupportedFormat(name) => EngineError::UnsupportedFormat(name),
            other => EngineError::InvalidArguments(other.to_string()),
        }
    }
}

impl From<TranslateError> for EngineError {
    fn from(err: TranslateError) -> Self {
        EngineError::Config(err.to_string())
    }
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
