// Tool dispatch: typed tool calls routed to the engine components
// Author: Gabriel Demetrios Lafis

mod handlers;
mod models;

pub use handlers::*;
pub use models::*;

use std::time::Duration;

use log::{debug, error, info};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use crate::data::SourceType;
use crate::export::parse_format;
use crate::processing::{JoinType, TransformSpec};
use crate::sources::{FileSource, MockApiSource, SqlStore};
use crate::translate::{OllamaBackend, Translator};
use crate::utils::{BackendKind, Config, EngineError, EngineResult};

/// Names accepted by [`Tool::parse`]
pub const TOOL_NAMES: [&str; 7] = [
    "query_data",
    "query_natural_language",
    "list_sources",
    "execute_sql",
    "transform_data",
    "export_data",
    "integrate_data",
];

/// A tool call with validated arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Tool {
    QueryData(QueryRequest),
    ListSources,
    ExecuteSql(String),
    TransformData(TransformRequest),
    ExportData(ExportRequest),
    IntegrateData(IntegrateRequest),
}

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: JsonValue) -> EngineResult<T> {
    let arguments = if arguments.is_null() {
        JsonValue::Object(Map::new())
    } else {
        arguments
    };

    serde_json::from_value(arguments)
        .map_err(|e| EngineError::InvalidArguments(format!("{}: {}", tool, e)))
}

impl Tool {
    /// Validate and default-fill `arguments` for the tool called `name`
    pub fn parse(name: &str, arguments: JsonValue) -> EngineResult<Self> {
        let tool = match name {
            "query_data" | "query_natural_language" => {
                let args: QueryDataArgs = parse_args(name, arguments)?;
                let natural_language = name == "query_natural_language";
                let source_type = if natural_language {
                    SourceType::Sql
                } else {
                    SourceType::parse(&args.source_type).ok_or_else(|| {
                        EngineError::UnsupportedFormat(format!("source type '{}'", args.source_type))
                    })?
                };

                Tool::QueryData(QueryRequest {
                    query: args.query,
                    source_type,
                    allow_sql: !natural_language,
                })
            }
            "list_sources" => Tool::ListSources,
            "execute_sql" => {
                let args: ExecuteSqlArgs = parse_args(name, arguments)?;
                Tool::ExecuteSql(args.query)
            }
            "transform_data" => {
                let args: TransformDataArgs = parse_args(name, arguments)?;
                let params = args
                    .params
                    .unwrap_or_else(|| JsonValue::Object(args.extra.clone()));
                let operations = args.operations.unwrap_or_else(|| vec![args.operation.clone()]);

                let specs = operations
                    .iter()
                    .map(|operation| TransformSpec::parse(operation, &params))
                    .collect::<Result<Vec<_>, _>>()?;

                Tool::TransformData(TransformRequest {
                    data: args.data,
                    specs,
                })
            }
            "export_data" => {
                let args: ExportDataArgs = parse_args(name, arguments)?;
                Tool::ExportData(ExportRequest {
                    data: args.data,
                    format: parse_format(&args.format)?,
                })
            }
            "integrate_data" => {
                let args: IntegrateDataArgs = parse_args(name, arguments)?;
                let join_type = match args.join_type.to_lowercase().as_str() {
                    "inner" => JoinType::Inner,
                    "left" => JoinType::Left,
                    _ => return Err(EngineError::UnsupportedFormat(format!("join type '{}'", args.join_type))),
                };

                Tool::IntegrateData(IntegrateRequest {
                    datasets: args.datasets,
                    join_key: args.join_key,
                    join_type,
                })
            }
            other => return Err(EngineError::UnknownTool(other.to_string())),
        };

        Ok(tool)
    }

    /// Canonical tool name
    pub fn name(&self) -> &'static str {
        match self {
            Tool::QueryData(_) => "query_data",
            Tool::ListSources => "list_sources",
            Tool::ExecuteSql(_) => "execute_sql",
            Tool::TransformData(_) => "transform_data",
            Tool::ExportData(_) => "export_data",
            Tool::IntegrateData(_) => "integrate_data",
        }
    }
}

/// The integration engine: owns the source adapters and the translator
pub struct Engine {
    store: SqlStore,
    files: FileSource,
    api: MockApiSource,
    translator: Translator,
}

impl Engine {
    /// Create an engine from its collaborators
    pub fn new(store: SqlStore, files: FileSource, translator: Translator) -> Self {
        Engine {
            store,
            files,
            api: MockApiSource::new(),
            translator,
        }
    }

    /// Create an engine as described by `config`
    pub fn from_config(config: &Config) -> EngineResult<Self> {
        let translator = match config.translator.backend {
            BackendKind::None => Translator::rules_only(),
            BackendKind::Ollama => {
                info!(
                    "Using Ollama model {} at {}",
                    config.translator.model, config.translator.url
                );
                Translator::with_backend(OllamaBackend::new(
                    &config.translator.url,
                    &config.translator.model,
                    Duration::from_secs(config.translator.timeout_secs),
                )?)
                .temperature(config.translator.temperature)
            }
        };

        Ok(Engine::new(
            SqlStore::new(&config.store.path),
            FileSource::new(&config.files.data_dir),
            translator,
        ))
    }

    pub fn store(&self) -> &SqlStore {
        &self.store
    }

    /// Run one tool call; failures come back as error responses
    pub fn call(&self, name: &str, arguments: JsonValue) -> ToolResponse {
        let result = Tool::parse(name, arguments).and_then(|tool| self.dispatch(tool));

        match result {
            Ok(payload) => ToolResponse::success(&payload),
            Err(err) => {
                error!("Tool '{}' failed: {}", name, err);
                ToolResponse::error(err.payload_text())
            }
        }
    }

    /// Execute a parsed tool and return its JSON payload
    pub fn dispatch(&self, tool: Tool) -> EngineResult<JsonValue> {
        debug!("Dispatching {}", tool.name());

        match tool {
            Tool::QueryData(request) => match request.source_type {
                SourceType::Sql => {
                    query_sql(&self.store, &self.translator, &request.query, request.allow_sql)
                }
                SourceType::File => query_file(&self.files, &request.query),
                SourceType::Api => Ok(query_api(&self.api, &request.query)),
            },
            Tool::ListSources => list_sources(&self.store, &self.files),
            Tool::ExecuteSql(query) => execute_sql(&self.store, &query),
            Tool::TransformData(request) => transform_data(&request),
            Tool::ExportData(request) => export_data(&request),
            Tool::IntegrateData(request) => integrate_data(&request),
        }
    }
}
