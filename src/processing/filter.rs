// Filter operations for data processing
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;

use serde::Deserialize;

use crate::data::{DataSet, Record, Value};
use super::{DataProcessor, ProcessingError, ProcessorType};

/// Comparison applied by a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Condition {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "contains")]
    Contains,
}

impl Default for Condition {
    fn default() -> Self {
        Condition::GreaterThan
    }
}

impl Condition {
    /// Whether `field_value` satisfies the condition against `operand`
    pub fn matches(&self, field_value: &Value, operand: &Value) -> bool {
        match self {
            Condition::GreaterThan => field_value.compare(operand) == Some(Ordering::Greater),
            Condition::LessThan => field_value.compare(operand) == Some(Ordering::Less),
            Condition::Equals => field_value.compare(operand) == Some(Ordering::Equal),
            Condition::Contains => field_value.to_text().contains(&operand.to_text()),
        }
    }
}

/// Filter rows based on a predicate
pub struct FilterProcessor {
    name: String,
    predicate: Box<dyn Fn(&Record) -> bool>,
}

impl FilterProcessor {
    /// Create a new filter processor with a predicate function
    pub fn new<F>(name: &str, predicate: F) -> Self
    where
        F: Fn(&Record) -> bool + 'static,
    {
        FilterProcessor {
            name: name.to_string(),
            predicate: Box::new(predicate),
        }
    }

    /// Keep records whose `field` satisfies `condition` against `value`.
    ///
    /// A missing field reads as integer 0, or as empty text for `contains`.
    pub fn condition(field: &str, condition: Condition, value: Value) -> Self {
        let field = field.to_string();
        let name = format!("{:?}_{}", condition, field).to_lowercase();

        Self::new(&name, move |record| {
            let missing = match condition {
                Condition::Contains => Value::String(String::new()),
                _ => Value::Integer(0),
            };
            let field_value = record.get(&field).unwrap_or(&missing);
            condition.matches(field_value, &value)
        })
    }

    /// Create a filter that keeps rows where a column is greater than a value
    pub fn greater_than(field: &str, value: Value) -> Self {
        Self::condition(field, Condition::GreaterThan, value)
    }

    /// Create a filter that keeps rows where a column equals a value
    pub fn equals(field: &str, value: Value) -> Self {
        Self::condition(field, Condition::Equals, value)
    }

    /// Create a filter that keeps rows where a column is less than a value
    pub fn less_than(field: &str, value: Value) -> Self {
        Self::condition(field, Condition::LessThan, value)
    }

    /// Create a filter that keeps rows where a column contains a substring
    pub fn contains(field: &str, substring: &str) -> Self {
        Self::condition(field, Condition::Contains, Value::String(substring.to_string()))
    }
}

impl DataProcessor for FilterProcessor {
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        let records = input
            .iter()
            .filter(|record| (self.predicate)(*record))
            .cloned()
            .collect();

        Ok(input.with_records(records))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Filter
    }
}

/// Limit the number of rows in a dataset
pub struct LimitProcessor {
    limit: usize,
}

impl LimitProcessor {
    /// Create a new limit processor
    pub fn new(limit: usize) -> Self {
        LimitProcessor { limit }
    }
}

impl DataProcessor for LimitProcessor {
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        let records = input.iter().take(self.limit).cloned().collect();
        Ok(input.with_records(records))
    }

    fn name(&self) -> &str {
        "limit"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Filter
    }
}
