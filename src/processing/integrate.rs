// Multi-dataset integration (join) operations
// Author: Gabriel Demetrios Lafis

use log::debug;
use serde::Deserialize;

use crate::data::{DataSet, Record, Value};
use super::ProcessingError;

/// Join type for integrating datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    Inner,
    Left,
}

impl Default for JoinType {
    fn default() -> Self {
        JoinType::Inner
    }
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "inner",
            JoinType::Left => "left",
        }
    }
}

/// Name of a field copied from the dataset at 1-based `position`
fn prefixed(position: usize, field: &str) -> String {
    format!("dataset{}_{}", position, field)
}

fn first_match<'a>(dataset: &'a DataSet, join_key: &str, key: &Value) -> Option<&'a Record> {
    dataset.iter().find(|record| record.get(join_key) == Some(key))
}

fn copy_prefixed(target: &mut Record, source: &Record, position: usize, join_key: &str) {
    for (field, value) in source.iter().filter(|(field, _)| *field != join_key) {
        target.insert(prefixed(position, field), value.clone());
    }
}

/// Joins two or more datasets on a shared key.
///
/// Fields coming from the dataset at position `i` (1-based) are renamed to
/// `dataset{i}_{field}`, so colliding names never overwrite each other.
pub struct IntegrationProcessor {
    join_key: String,
    join_type: JoinType,
}

impl IntegrationProcessor {
    /// Create a new integration processor
    pub fn new(join_key: &str, join_type: JoinType) -> Self {
        IntegrationProcessor {
            join_key: join_key.to_string(),
            join_type,
        }
    }

    /// Create an inner integration processor
    pub fn inner(join_key: &str) -> Self {
        Self::new(join_key, JoinType::Inner)
    }

    /// Create a left integration processor
    pub fn left(join_key: &str) -> Self {
        Self::new(join_key, JoinType::Left)
    }

    /// Integrate `datasets`; fails before doing any work when fewer than two are given
    pub fn integrate(&self, datasets: &[DataSet]) -> Result<DataSet, ProcessingError> {
        if datasets.len() < 2 {
            return Err(ProcessingError::NotEnoughDatasets(datasets.len()));
        }

        let result = match self.join_type {
            JoinType::Inner => self.integrate_inner(datasets),
            JoinType::Left => self.integrate_left(datasets),
        };

        debug!(
            "Integrated {} datasets on '{}' ({}): {} records",
            datasets.len(),
            self.join_key,
            self.join_type.as_str(),
            result.len()
        );

        Ok(result)
    }

    /// Every key observed in any dataset produces one record; datasets
    /// without a match for the key contribute no fields.
    fn integrate_inner(&self, datasets: &[DataSet]) -> DataSet {
        let mut keys: Vec<&Value> = Vec::new();
        for value in datasets
            .iter()
            .flat_map(|dataset| dataset.iter())
            .filter_map(|record| record.get(&self.join_key))
        {
            if !keys.contains(&value) {
                keys.push(value);
            }
        }
        keys.sort_by(|a, b| a.sort_cmp(b));

        keys.into_iter()
            .map(|key| {
                let mut record = Record::new().with(self.join_key.as_str(), key.clone());

                for (index, dataset) in datasets.iter().enumerate() {
                    if let Some(matched) = first_match(dataset, &self.join_key, key) {
                        copy_prefixed(&mut record, matched, index + 1, &self.join_key);
                    }
                }

                record
            })
            .collect()
    }

    /// Base records keep their fields; unmatched datasets are null-filled using
    /// the field names of their last record.
    fn integrate_left(&self, datasets: &[DataSet]) -> DataSet {
        let (base, others) = match datasets.split_first() {
            Some(split) => split,
            None => return DataSet::new(),
        };

        let missing = Value::Null;

        base.iter()
            .map(|base_record| {
                let mut record = base_record.clone();
                let key = base_record.get(&self.join_key).unwrap_or(&missing);

                for (offset, dataset) in others.iter().enumerate() {
                    let position = offset + 2;

                    match first_match(dataset, &self.join_key, key) {
                        Some(matched) => copy_prefixed(&mut record, matched, position, &self.join_key),
                        None => {
                            if let Some(last) = dataset.records.last() {
                                for field in last.keys().filter(|field| *field != self.join_key) {
                                    record.insert(prefixed(position, field), Value::Null);
                                }
                            }
                        }
                    }
                }

                record
            })
            .collect()
    }
}
