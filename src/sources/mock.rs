// Mock remote API source
// Author: Gabriel Demetrios Lafis

use crate::data::{DataSet, Record};

/// Note attached to every mock response
pub const MOCK_NOTE: &str = "Mock API response - data is synthetic";

/// Stand-in for a remote REST endpoint; always answers with the same records
#[derive(Debug, Clone, Default)]
pub struct MockApiSource;

impl MockApiSource {
    pub fn new() -> Self {
        MockApiSource
    }

    /// Return the canned dataset for `question`
    pub fn fetch(&self, question: &str) -> DataSet {
        let mut dataset = DataSet::from_records(vec![
            Record::new().with("id", 1).with("name", "Sample 1"),
            Record::new().with("id", 2).with("name", "Sample 2"),
        ]);

        dataset.metadata.add("source", "api");
        dataset.metadata.add("note", MOCK_NOTE);
        dataset.metadata.add("query", question);

        dataset
    }
}
