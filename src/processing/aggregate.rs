// Aggregate operations for data processing
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;

use serde::Deserialize;

use crate::data::{DataSet, Record, Value};
use super::{DataProcessor, ProcessingError, ProcessorType};

/// Supported aggregation functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateType {
    Sum,
    Avg,
    Count,
    Max,
    Min,
}

impl Default for AggregateType {
    fn default() -> Self {
        AggregateType::Sum
    }
}

impl AggregateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateType::Sum => "sum",
            AggregateType::Avg => "avg",
            AggregateType::Count => "count",
            AggregateType::Max => "max",
            AggregateType::Min => "min",
        }
    }
}

/// A numeric reading of a value: exact when it is an integer
#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

fn to_number(value: &Value) -> Option<Number> {
    match value {
        Value::Integer(i) => Some(Number::Int(*i)),
        Value::Boolean(b) => Some(Number::Int(*b as i64)),
        Value::Float(f) => Some(Number::Float(*f)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .map(Number::Int)
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(Number::Float))
        }
        Value::Null => None,
    }
}

/// Sum that stays integral until a float shows up or it would overflow
fn sum(numbers: &[Number]) -> Value {
    let mut int_sum: i64 = 0;
    let mut float_sum: f64 = 0.0;
    let mut is_float = false;

    for n in numbers {
        match *n {
            Number::Int(i) if !is_float => match int_sum.checked_add(i) {
                Some(total) => int_sum = total,
                None => {
                    float_sum = int_sum as f64 + i as f64;
                    is_float = true;
                }
            },
            Number::Int(i) => float_sum += i as f64,
            Number::Float(f) => {
                if !is_float {
                    float_sum = int_sum as f64;
                    is_float = true;
                }
                float_sum += f;
            }
        }
    }

    if is_float {
        Value::Float(float_sum)
    } else {
        Value::Integer(int_sum)
    }
}

fn number_value(n: Number) -> Value {
    match n {
        Number::Int(i) => Value::Integer(i),
        Number::Float(f) => Value::Float(f),
    }
}

fn number_cmp(a: Number, b: Number) -> Ordering {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.cmp(&y),
        (x, y) => {
            let (x, y) = (as_f64(x), as_f64(y));
            x.partial_cmp(&y).unwrap_or_else(|| x.total_cmp(&y))
        }
    }
}

fn as_f64(n: Number) -> f64 {
    match n {
        Number::Int(i) => i as f64,
        Number::Float(f) => f,
    }
}

/// Largest (`Greater`) or smallest (`Less`) value. Numeric readings win when
/// any exist, numeric text included; otherwise values use the sort ordering.
fn extreme(values: &[&Value], wanted: Ordering) -> Value {
    let numbers: Vec<Number> = values.iter().filter_map(|v| to_number(v)).collect();

    if !numbers.is_empty() {
        return numbers
            .into_iter()
            .reduce(|best, n| if number_cmp(n, best) == wanted { n } else { best })
            .map_or(Value::Integer(0), number_value);
    }

    values
        .iter()
        .copied()
        .reduce(|best, v| if v.sort_cmp(best) == wanted { v } else { best })
        .cloned()
        .unwrap_or(Value::Integer(0))
}

/// Computes one scalar over a field and replaces the dataset with a summary record
pub struct AggregateProcessor {
    field: String,
    aggregate_type: AggregateType,
}

impl AggregateProcessor {
    /// Create a new aggregate processor
    pub fn new(field: &str, aggregate_type: AggregateType) -> Self {
        AggregateProcessor {
            field: field.to_string(),
            aggregate_type,
        }
    }

    /// Compute the aggregate over `input`.
    ///
    /// The value set is every present, non-null value of the field. `count`
    /// ignores it and reports the dataset length. An empty value set yields 0.
    pub fn compute(&self, input: &DataSet) -> Value {
        let values: Vec<&Value> = input
            .iter()
            .filter_map(|record| record.get(&self.field))
            .filter(|value| !value.is_null())
            .collect();

        match self.aggregate_type {
            AggregateType::Count => Value::Integer(input.len() as i64),
            AggregateType::Sum => {
                let numbers: Vec<Number> = values.iter().filter_map(|v| to_number(v)).collect();
                sum(&numbers)
            }
            AggregateType::Avg => {
                let numbers: Vec<Number> = values.iter().filter_map(|v| to_number(v)).collect();
                if numbers.is_empty() {
                    return Value::Integer(0);
                }
                let total = match sum(&numbers) {
                    Value::Integer(i) => i as f64,
                    Value::Float(f) => f,
                    _ => 0.0,
                };
                Value::Float(total / numbers.len() as f64)
            }
            AggregateType::Max => extreme(&values, Ordering::Greater),
            AggregateType::Min => extreme(&values, Ordering::Less),
        }
    }
}

impl DataProcessor for AggregateProcessor {
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        let summary = Record::new()
            .with("aggregation_type", self.aggregate_type.as_str())
            .with("field", self.field.as_str())
            .with("result", self.compute(input));

        Ok(input.with_records(vec![summary]))
    }

    fn name(&self) -> &str {
        self.aggregate_type.as_str()
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Aggregate
    }
}
