// Source adapters normalizing external data into datasets
// Author: Gabriel Demetrios Lafis

mod file;
mod mock;
mod sql;

pub use file::*;
pub use mock::*;
pub use sql::*;

use thiserror::Error;

use crate::data::DataError;

/// Represents an error raised by a source adapter
#[derive(Debug, Error)]
pub enum SourceError {
    /// The store rejected the query; carries the engine's message verbatim
    #[error("{0}")]
    Query(String),
    #[error("{0}")]
    File(String),
}

impl From<rusqlite::Error> for SourceError {
    fn from(err: rusqlite::Error) -> Self {
        SourceError::Query(err.to_string())
    }
}

impl From<DataError> for SourceError {
    fn from(err: DataError) -> Self {
        SourceError::File(err.to_string())
    }
}
