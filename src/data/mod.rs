// Data module for the record model and its serialized forms
// Author: Gabriel Demetrios Lafis

mod csv;
mod json;

pub use self::csv::*;
pub use self::json::*;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Represents a source of records
pub trait DataSource {
    /// Read data from the source
    fn read(&self) -> Result<DataSet, DataError>;

    /// Get the source name
    fn name(&self) -> &str;

    /// Get the source type
    fn source_type(&self) -> SourceType;
}

/// Represents a sink that renders records into a writer
pub trait DataSink {
    /// Write data to the sink
    fn write(&self, data: &DataSet, writer: &mut dyn std::io::Write) -> Result<(), DataError>;

    /// Get the sink name
    fn name(&self) -> &str;
}

/// An ordered sequence of records plus descriptive metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    pub records: Vec<Record>,
    pub metadata: Metadata,
}

impl DataSet {
    /// Create a new empty dataset
    pub fn new() -> Self {
        DataSet::default()
    }

    /// Create a dataset from records
    pub fn from_records(records: Vec<Record>) -> Self {
        DataSet {
            records,
            metadata: Metadata::new(),
        }
    }

    /// Append a record
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Get the number of records in the dataset
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a reference to a record by index
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Iterate over the records
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Copy of this dataset with a different record list and the same metadata
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        DataSet {
            records,
            metadata: self.metadata.clone(),
        }
    }
}

impl FromIterator<Record> for DataSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        DataSet::from_records(iter.into_iter().collect())
    }
}

/// A field-ordered mapping from field name to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create a new empty record
    pub fn new() -> Self {
        Record::default()
    }

    /// Builder-style insert
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a field, replacing an existing value in place
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, name: K, value: V) {
        let name = name.into();
        let value = value.into();

        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Get a value by field name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Check whether the field is present
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Field names in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Values in field order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, v)| v)
    }

    /// Iterate over (name, value) pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Represents a scalar value in a record
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Numeric view of the value; numeric text counts, booleans are 0/1
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render the value as plain text (no quoting)
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::String(s) => s.clone(),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) | Value::Integer(_) | Value::Float(_) => 1,
            Value::String(_) => 2,
        }
    }

    /// Total ordering used for sorting: null < numbers and booleans < text
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (a, b) if a.type_rank() == 1 && b.type_rank() == 1 => {
                let x = a.as_number().unwrap_or(0.0);
                let y = b.as_number().unwrap_or(0.0);
                x.partial_cmp(&y).unwrap_or_else(|| x.total_cmp(&y))
            }
            (a, b) => a.type_rank().cmp(&b.type_rank()),
        }
    }

    /// Loose comparison used by filters: numeric when both sides are numeric
    /// (numeric text included), lexicographic when both are text
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => match (self, other) {
                    (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                    _ => None,
                },
            },
        }
    }
}

/// Floats always carry a fractional part when rendered as text
pub(crate) fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                (*a as f64) == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            other => write!(f, "{}", other.to_text()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Represents metadata for a dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub properties: HashMap<String, String>,
}

impl Metadata {
    /// Create new empty metadata
    pub fn new() -> Self {
        Metadata::default()
    }

    /// Add a property to the metadata
    pub fn add(&mut self, key: &str, value: &str) {
        self.properties.insert(key.to_string(), value.to_string());
    }

    /// Get a property from the metadata
    pub fn get(&self, key: &str) -> Option<&String> {
        self.properties.get(key)
    }
}

/// Represents a source type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Sql,
    File,
    Api,
}

impl SourceType {
    /// Parse a source type from the names callers use
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sql" | "database" | "db" => Some(SourceType::Sql),
            "file" | "csv" | "json" => Some(SourceType::File),
            "api" | "mock" | "rest" => Some(SourceType::Api),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Sql => "sql",
            SourceType::File => "file",
            SourceType::Api => "api",
        }
    }
}

/// Represents an error in the data module
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Not supported: {0}")]
    NotSupported(String),
}

/// Serialized formats understood by the file source and the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
        }
    }

    /// Parse a file format from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }

    /// Detect the format from a path's extension
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }
}
