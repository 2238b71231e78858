// Sort operation for data processing
// Author: Gabriel Demetrios Lafis

use crate::data::{DataSet, Value};
use super::{DataProcessor, ProcessingError, ProcessorType};

/// Stable sort of records by one field
pub struct SortProcessor {
    by: String,
    reverse: bool,
}

impl SortProcessor {
    /// Create a new sort processor
    pub fn new(by: &str, reverse: bool) -> Self {
        SortProcessor {
            by: by.to_string(),
            reverse,
        }
    }

    /// Sort ascending by `by`
    pub fn ascending(by: &str) -> Self {
        Self::new(by, false)
    }

    /// Sort descending by `by`
    pub fn descending(by: &str) -> Self {
        Self::new(by, true)
    }
}

impl DataProcessor for SortProcessor {
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        let missing = Value::Integer(0);
        let mut records = input.records.clone();

        // Vec::sort_by is stable; descending order keeps ties in input order too
        records.sort_by(|a, b| {
            let x = a.get(&self.by).unwrap_or(&missing);
            let y = b.get(&self.by).unwrap_or(&missing);

            if self.reverse {
                y.sort_cmp(x)
            } else {
                x.sort_cmp(y)
            }
        });

        Ok(input.with_records(records))
    }

    fn name(&self) -> &str {
        "sort"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Sort
    }
}
