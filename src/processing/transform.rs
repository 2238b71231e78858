// Transform operation selection and typed parameters
// Author: Gabriel Demetrios Lafis

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::data::{DataSet, Value};
use super::{
    AggregateProcessor, AggregateType, Condition, DataProcessor, FilterProcessor, LimitProcessor,
    Pipeline, ProcessingError, ProcessorType, SortProcessor,
};

/// Parameters of the `sort` operation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SortParams {
    pub by: String,
    pub reverse: bool,
}

impl Default for SortParams {
    fn default() -> Self {
        SortParams {
            by: "id".to_string(),
            reverse: false,
        }
    }
}

/// Parameters of the `filter` operation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    pub field: String,
    pub value: Value,
    pub condition: Condition,
}

impl Default for FilterParams {
    fn default() -> Self {
        FilterParams {
            field: "id".to_string(),
            value: Value::Integer(1),
            condition: Condition::GreaterThan,
        }
    }
}

/// Parameters of the `limit` operation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LimitParams {
    pub limit: usize,
}

impl Default for LimitParams {
    fn default() -> Self {
        LimitParams { limit: 3 }
    }
}

/// Parameters of the `aggregate` operation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AggregateParams {
    pub field: String,
    #[serde(rename = "type")]
    pub aggregate_type: AggregateType,
}

impl Default for AggregateParams {
    fn default() -> Self {
        AggregateParams {
            field: "value".to_string(),
            aggregate_type: AggregateType::Sum,
        }
    }
}

/// A transform operation with its validated, default-filled parameters
#[derive(Debug, Clone, PartialEq)]
pub enum TransformSpec {
    Sort(SortParams),
    Filter(FilterParams),
    Limit(LimitParams),
    Aggregate(AggregateParams),
    /// Unrecognized operation names leave the data untouched
    Passthrough(String),
}

fn parse_params<T: DeserializeOwned + Default>(operation: &str, params: &JsonValue) -> Result<T, ProcessingError> {
    if params.is_null() {
        return Ok(T::default());
    }

    serde_json::from_value(params.clone()).map_err(|e| {
        ProcessingError::InvalidArgument(format!("Invalid parameters for '{}': {}", operation, e))
    })
}

impl TransformSpec {
    /// Build a spec from an operation name and a parameter object
    pub fn parse(operation: &str, params: &JsonValue) -> Result<Self, ProcessingError> {
        let spec = match operation.to_lowercase().as_str() {
            "sort" => TransformSpec::Sort(parse_params(operation, params)?),
            "filter" => TransformSpec::Filter(parse_params(operation, params)?),
            "limit" => TransformSpec::Limit(parse_params(operation, params)?),
            "aggregate" => TransformSpec::Aggregate(parse_params(operation, params)?),
            _ => TransformSpec::Passthrough(operation.to_string()),
        };
        Ok(spec)
    }

    /// Operation name
    pub fn operation(&self) -> &str {
        match self {
            TransformSpec::Sort(_) => "sort",
            TransformSpec::Filter(_) => "filter",
            TransformSpec::Limit(_) => "limit",
            TransformSpec::Aggregate(_) => "aggregate",
            TransformSpec::Passthrough(name) => name,
        }
    }

    /// Processor implementing this operation
    pub fn processor(&self) -> Box<dyn DataProcessor> {
        match self {
            TransformSpec::Sort(p) => Box::new(SortProcessor::new(&p.by, p.reverse)),
            TransformSpec::Filter(p) => {
                Box::new(FilterProcessor::condition(&p.field, p.condition, p.value.clone()))
            }
            TransformSpec::Limit(p) => Box::new(LimitProcessor::new(p.limit)),
            TransformSpec::Aggregate(p) => Box::new(AggregateProcessor::new(&p.field, p.aggregate_type)),
            TransformSpec::Passthrough(name) => Box::new(PassthroughProcessor::new(name)),
        }
    }
}

/// Apply one operation to `data`
pub fn transform(data: &DataSet, spec: &TransformSpec) -> Result<DataSet, ProcessingError> {
    spec.processor().process(data)
}

/// Chain several operations in order
pub fn pipeline(name: &str, specs: &[TransformSpec]) -> Pipeline {
    specs
        .iter()
        .fold(Pipeline::new(name), |pipeline, spec| pipeline.add_boxed(spec.processor()))
}

/// Returns its input unchanged
pub struct PassthroughProcessor {
    operation: String,
}

impl PassthroughProcessor {
    pub fn new(operation: &str) -> Self {
        PassthroughProcessor {
            operation: operation.to_string(),
        }
    }
}

impl DataProcessor for PassthroughProcessor {
    fn process(&self, input: &DataSet) -> Result<DataSet, ProcessingError> {
        Ok(input.clone())
    }

    fn name(&self) -> &str {
        &self.operation
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Passthrough
    }
}
