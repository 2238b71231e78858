// Tool handlers producing JSON payloads
// Author: Gabriel Demetrios Lafis

use log::debug;
use serde_json::{json, Value as JsonValue};

use crate::data::{DataSet, Record, SourceType};
use crate::export::export;
use crate::processing::{pipeline, IntegrationProcessor};
use crate::sources::{FileSource, MockApiSource, SqlSource, SqlStore};
use crate::translate::Translator;
use crate::utils::EngineResult;

use super::{ExportRequest, IntegrateRequest, TransformRequest};

/// Records shown in an integration response
pub const INTEGRATION_PREVIEW: usize = 10;

fn records_json(records: &[Record]) -> JsonValue {
    JsonValue::Array(records.iter().map(Record::to_json).collect())
}

/// Translate `text` and run it against the store; with `allow_sql`, SQL text runs unchanged
pub fn query_sql(
    store: &SqlStore,
    translator: &Translator,
    text: &str,
    allow_sql: bool,
) -> EngineResult<JsonValue> {
    let translation = if allow_sql {
        translator.resolve(text)
    } else {
        translator.translate(text)
    };
    debug!("Query strategy {:?}: {}", translation.strategy, translation.query);

    let data = SqlSource::new(store).execute(&translation.query)?;

    Ok(json!({
        "question": translation.question,
        "generated_sql": translation.query,
        "strategy": translation.strategy,
        "source_type": SourceType::Sql.as_str(),
        "result": data.to_json(),
        "row_count": data.len(),
    }))
}

/// Read the file named by `name` from the data directory
pub fn query_file(files: &FileSource, name: &str) -> EngineResult<JsonValue> {
    let data = files.read(name)?;

    Ok(json!({
        "question": name,
        "source_type": SourceType::File.as_str(),
        "result": data.to_json(),
        "row_count": data.len(),
    }))
}

/// Answer `question` from the mock remote endpoint
pub fn query_api(api: &MockApiSource, question: &str) -> JsonValue {
    let data = api.fetch(question);
    let note = data.metadata.get("note").cloned().unwrap_or_default();

    json!({
        "question": question,
        "source_type": SourceType::Api.as_str(),
        "result": data.to_json(),
        "row_count": data.len(),
        "note": note,
    })
}

pub fn list_sources(store: &SqlStore, files: &FileSource) -> EngineResult<JsonValue> {
    let tables = store.tables()?;
    let file_names = files.list()?;

    Ok(json!({
        "sources": [
            {
                "type": SourceType::Sql.as_str(),
                "name": "sample_db",
                "description": "SQLite database",
                "tables": tables,
            },
            {
                "type": SourceType::File.as_str(),
                "name": "data_files",
                "description": "CSV and JSON files",
                "files": file_names,
            },
            {
                "type": SourceType::Api.as_str(),
                "name": "mock_api",
                "description": "Mock REST API",
            },
        ]
    }))
}

pub fn execute_sql(store: &SqlStore, query: &str) -> EngineResult<JsonValue> {
    let data = SqlSource::new(store).execute(query)?;

    Ok(json!({
        "query": query,
        "result": data.to_json(),
        "row_count": data.len(),
    }))
}

/// Apply every requested operation in order
pub fn transform_data(request: &TransformRequest) -> EngineResult<JsonValue> {
    let label = request.label();
    let result: DataSet = pipeline(&label, &request.specs).execute(&request.data)?;

    Ok(json!({
        "operation": label,
        "result": result.to_json(),
        "count": result.len(),
    }))
}

pub fn export_data(request: &ExportRequest) -> EngineResult<JsonValue> {
    let text = export(&request.data, request.format)?;

    Ok(json!({
        "format": request.format.extension(),
        "export": text,
    }))
}

/// Join the datasets; only the first [`INTEGRATION_PREVIEW`] records are returned
pub fn integrate_data(request: &IntegrateRequest) -> EngineResult<JsonValue> {
    let processor = IntegrationProcessor::new(&request.join_key, request.join_type);
    let integrated = processor.integrate(&request.datasets)?;
    let preview = &integrated.records[..integrated.len().min(INTEGRATION_PREVIEW)];

    Ok(json!({
        "join_key": request.join_key,
        "join_type": request.join_type.as_str(),
        "datasets_count": request.datasets.len(),
        "integrated_records": integrated.len(),
        "result": records_json(preview),
    }))
}
