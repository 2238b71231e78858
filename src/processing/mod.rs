// Processing module for data transformation and integration
// Author: Gabriel Demetrios Lafis

mod aggregate;
mod filter;
mod integrate;
mod sort;
mod transform;

pub use aggregate::*;
pub use filter::*;
pub use integrate::*;
pub use sort::*;
pub use transform::*;

use log::debug;
use thiserror::Error;

use crate::data::{DataError, DataSet};

/// Represents a data processor that transforms data
pub trait DataProcessor {
    /// Process a dataset and return a new dataset
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError>;

    /// Get the processor name
    fn name(&self) -> &str;

    /// Get the processor type
    fn processor_type(&self) -> ProcessorType;
}

/// Represents a processor type
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessorType {
    Sort,
    Filter,
    Aggregate,
    Passthrough,
    Custom(String),
}

/// Represents an error in the processing module
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Data error: {0}")]
    DataError(#[from] DataError),
    #[error("Integration requires at least 2 datasets, got {0}")]
    NotEnoughDatasets(usize),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Pipeline for chaining multiple processors
pub struct Pipeline {
    name: String,
    processors: Vec<Box<dyn DataProcessor>>,
}

impl Pipeline {
    /// Create a new pipeline with the given name
    pub fn new(name: &str) -> Self {
        Pipeline {
            name: name.to_string(),
            processors: Vec::new(),
        }
    }

    /// Add a processor to the pipeline
    pub fn add<P: DataProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Add an already boxed processor
    pub fn add_boxed(mut self, processor: Box<dyn DataProcessor>) -> Self {
        self.processors.push(processor);
        self
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Execute the pipeline on a dataset
    pub fn execute(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        let mut current = input.clone();

        for processor in &self.processors {
            debug!(
                "Pipeline '{}': {} ({:?}) on {} records",
                self.name,
                processor.name(),
                processor.processor_type(),
                current.len()
            );
            current = processor.process(&current)?;
        }

        Ok(current)
    }
}

impl DataProcessor for Pipeline {
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        self.execute(input)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Custom("Pipeline".to_string())
    }
}
