// Tool argument and response models
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::data::{DataSet, FileFormat, SourceType};
use crate::processing::{JoinType, TransformSpec};

fn default_source_type() -> String {
    "sql".to_string()
}

fn default_operation() -> String {
    "sort".to_string()
}

fn default_format() -> String {
    "json".to_string()
}

fn default_join_key() -> String {
    "id".to_string()
}

fn default_join_type() -> String {
    "inner".to_string()
}

/// Arguments of `query_data` / `query_natural_language`
#[derive(Debug, Clone, Deserialize)]
pub struct QueryDataArgs {
    #[serde(alias = "question")]
    pub query: String,
    #[serde(default = "default_source_type")]
    pub source_type: String,
}

/// Arguments of `execute_sql`
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteSqlArgs {
    pub query: String,
}

/// Arguments of `transform_data`.
///
/// Operation parameters come from `params`; without it, any other top-level
/// keys are read as parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct TransformDataArgs {
    pub data: DataSet,
    #[serde(default = "default_operation")]
    pub operation: String,
    #[serde(default)]
    pub operations: Option<Vec<String>>,
    #[serde(default)]
    pub params: Option<JsonValue>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Arguments of `export_data`
#[derive(Debug, Clone, Deserialize)]
pub struct ExportDataArgs {
    pub data: DataSet,
    #[serde(default = "default_format")]
    pub format: String,
}

/// Arguments of `integrate_data`
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrateDataArgs {
    pub datasets: Vec<DataSet>,
    #[serde(default = "default_join_key")]
    pub join_key: String,
    #[serde(default = "default_join_type")]
    pub join_type: String,
}

/// Validated `query_data` request
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub query: String,
    pub source_type: SourceType,
    /// Whether SQL text runs as-is instead of being translated
    pub allow_sql: bool,
}

/// Validated `transform_data` request
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRequest {
    pub data: DataSet,
    pub specs: Vec<TransformSpec>,
}

impl TransformRequest {
    /// Label reported back as `operation`
    pub fn label(&self) -> String {
        self.specs
            .iter()
            .map(|spec| spec.operation())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Validated `export_data` request
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub data: DataSet,
    pub format: FileFormat,
}

/// Validated `integrate_data` request
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrateRequest {
    pub datasets: Vec<DataSet>,
    pub join_key: String,
    pub join_type: JoinType,
}

/// One request line of the stdio driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: JsonValue,
}

/// One content block of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Response envelope returned for every tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<Content>,
    #[serde(rename = "isError", default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolResponse {
    /// Successful response carrying `payload` as pretty-printed JSON text
    pub fn success(payload: &JsonValue) -> Self {
        let text = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
        ToolResponse {
            content: vec![Content {
                kind: "text".to_string(),
                text,
            }],
            is_error: None,
        }
    }

    /// Error response carrying `message` verbatim
    pub fn error(message: String) -> Self {
        ToolResponse {
            content: vec![Content {
                kind: "text".to_string(),
                text: message,
            }],
            is_error: Some(true),
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Text of the first content block
    pub fn text(&self) -> &str {
        self.content.first().map_or("", |c| c.text.as_str())
    }
}
