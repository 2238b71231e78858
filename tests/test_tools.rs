// Tool dispatch tests
// Author: Gabriel Demetrios Lafis

use std::fs;

use serde_json::{json, Value as JsonValue};
use tempfile::TempDir;

use data_integration_engine::{
    data::{FileFormat, SourceType},
    processing::JoinType,
    sources::{FileSource, SqlStore},
    tools::{Engine, Tool, ToolCall, ToolResponse},
    translate::Translator,
    utils::EngineError,
};

fn engine(dir: &TempDir) -> Engine {
    let store = SqlStore::new(dir.path().join("sample.db"));
    store.provision().unwrap();

    let data_dir = dir.path().join("files");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("users.csv"), "id,name\n1,Alice\n2,Bob\n").unwrap();

    Engine::new(store, FileSource::new(&data_dir), Translator::rules_only())
}

fn payload(response: &ToolResponse) -> JsonValue {
    assert!(!response.is_error(), "unexpected error: {}", response.text());
    serde_json::from_str(response.text()).unwrap()
}

#[test]
fn test_natural_language_query() {
    let dir = TempDir::new().unwrap();
    let response = engine(&dir).call("query_natural_language", json!({"question": "Show users from USA"}));

    let body = payload(&response);
    assert_eq!(body["generated_sql"], "SELECT * FROM users WHERE country = 'USA'");
    assert_eq!(body["question"], "Show users from USA");
    assert_eq!(body["row_count"], 2);
    assert_eq!(body["result"][0]["name"], "John Doe");
}

#[test]
fn test_natural_language_query_always_translates() {
    let dir = TempDir::new().unwrap();
    let response = engine(&dir).call("query_natural_language", json!({"question": "Select the users from USA"}));

    let body = payload(&response);
    assert_eq!(body["generated_sql"], "SELECT * FROM users WHERE country = 'USA'");
    assert_eq!(body["strategy"], "rules");
    assert_eq!(body["row_count"], 2);
}

#[test]
fn test_query_data_sources() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);

    let sql = payload(&engine.call("query_data", json!({"query": "SELECT COUNT(*) AS n FROM orders"})));
    assert_eq!(sql["generated_sql"], "SELECT COUNT(*) AS n FROM orders");
    assert_eq!(sql["strategy"], "passthrough");
    assert_eq!(sql["result"][0]["n"], 5);

    let file = payload(&engine.call("query_data", json!({"query": "users", "source_type": "file"})));
    assert_eq!(file["row_count"], 2);
    assert_eq!(file["result"][1]["name"], "Bob");

    let api = payload(&engine.call("query_data", json!({"query": "anything", "source_type": "api"})));
    assert_eq!(api["row_count"], 2);
    assert_eq!(api["note"], "Mock API response - data is synthetic");
}

#[test]
fn test_list_sources() {
    let dir = TempDir::new().unwrap();
    let body = payload(&engine(&dir).call("list_sources", JsonValue::Null));

    let sources = body["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 3);
    assert_eq!(sources[0]["tables"], json!(["orders", "users"]));
    assert_eq!(sources[1]["files"], json!(["users.csv"]));
    assert_eq!(sources[2]["type"], "api");
}

#[test]
fn test_execute_sql() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);

    let body = payload(&engine.call("execute_sql", json!({"query": "SELECT product FROM orders WHERE user_id = 1"})));
    assert_eq!(body["row_count"], 2);
    assert_eq!(body["result"], json!([{"product": "Laptop"}, {"product": "Mouse"}]));

    let failed = engine.call("execute_sql", json!({"query": "SELEC nonsense"}));
    assert!(failed.is_error());
    assert!(failed.text().starts_with("Error: "));
}

#[test]
fn test_transform_data() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);
    let data = json!([{"id": 2, "name": "Bob"}, {"id": 1, "name": "Alice"}, {"id": 1, "name": "Zed"}]);

    // Default operation is sort by id
    let sorted = payload(&engine.call("transform_data", json!({"data": data})));
    assert_eq!(sorted["operation"], "sort");
    assert_eq!(sorted["count"], 3);
    assert_eq!(sorted["result"][0]["name"], "Alice");
    assert_eq!(sorted["result"][1]["name"], "Zed");

    // Parameters may sit at the top level
    let filtered = payload(&engine.call(
        "transform_data",
        json!({"data": data, "operation": "filter", "field": "name", "value": "lic", "condition": "contains"}),
    ));
    assert_eq!(filtered["result"], json!([{"id": 1, "name": "Alice"}]));

    let chained = payload(&engine.call(
        "transform_data",
        json!({"data": data, "operations": ["sort", "limit"], "params": {"by": "name", "limit": 2}}),
    ));
    assert_eq!(chained["operation"], "sort,limit");
    assert_eq!(chained["result"], json!([{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]));

    let aggregated = payload(&engine.call(
        "transform_data",
        json!({"data": [], "operation": "aggregate", "params": {"type": "avg"}}),
    ));
    assert_eq!(aggregated["result"], json!([{"aggregation_type": "avg", "field": "value", "result": 0}]));

    let rejected = engine.call("transform_data", json!({"data": data, "operation": "filter", "condition": "~"}));
    assert!(rejected.is_error());
}

#[test]
fn test_export_data() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);

    let csv = payload(&engine.call("export_data", json!({"data": [{"id": 1, "name": "Alice"}], "format": "csv"})));
    assert_eq!(csv["format"], "csv");
    assert_eq!(csv["export"], "id,name\n1,Alice\n");

    let empty = payload(&engine.call("export_data", json!({"data": [], "format": "csv"})));
    assert_eq!(empty["export"], "Cannot convert to CSV");

    let unsupported = engine.call("export_data", json!({"data": [], "format": "xml"}));
    assert!(unsupported.is_error());
    assert_eq!(unsupported.text(), "Error: Unsupported format: xml");
}

#[test]
fn test_integrate_data() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);

    let body = payload(&engine.call(
        "integrate_data",
        json!({"datasets": [
            [{"id": 1, "name": "John"}, {"id": 2, "name": "Jane"}],
            [{"id": 1, "user_id": 1, "product": "Laptop"}, {"id": 2, "user_id": 2, "product": "Monitor"}]
        ]}),
    ));
    assert_eq!(body["join_key"], "id");
    assert_eq!(body["join_type"], "inner");
    assert_eq!(body["datasets_count"], 2);
    assert_eq!(body["integrated_records"], 2);
    assert_eq!(body["result"][1]["dataset2_product"], "Monitor");

    let failed = engine.call("integrate_data", json!({"datasets": [[{"id": 1}]]}));
    assert!(failed.is_error());
    assert_eq!(failed.text(), "Error: Integration requires at least 2 datasets, got 1");

    let bad_join = engine.call("integrate_data", json!({"datasets": [[], []], "join_type": "outer"}));
    assert!(bad_join.is_error());
    assert!(bad_join.text().contains("Unsupported format"));
}

#[test]
fn test_integrate_data_previews_ten_records() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<JsonValue> = (0..15).map(|i| json!({"id": i, "v": i})).collect();

    let body = payload(&engine(&dir).call(
        "integrate_data",
        json!({"datasets": [rows, rows], "join_type": "left"}),
    ));

    assert_eq!(body["integrated_records"], 15);
    assert_eq!(body["result"].as_array().unwrap().len(), 10);
}

#[test]
fn test_unknown_tool_and_bad_arguments() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);

    let unknown = engine.call("drop_tables", json!({}));
    assert!(unknown.is_error());
    assert_eq!(unknown.text(), "Unknown tool: drop_tables");

    let missing = engine.call("execute_sql", json!({}));
    assert!(missing.is_error());
    assert!(missing.text().starts_with("Error: Invalid arguments"));

    let bad_source = engine.call("query_data", json!({"query": "x", "source_type": "ftp"}));
    assert!(bad_source.is_error());
    assert!(bad_source.text().contains("ftp"));
}

#[test]
fn test_tool_parse() {
    let tool = Tool::parse("query_natural_language", json!({"question": "hi", "source_type": "api"})).unwrap();
    match tool {
        Tool::QueryData(request) => {
            assert_eq!(request.query, "hi");
            assert_eq!(request.source_type, SourceType::Sql);
            assert!(!request.allow_sql);
        }
        other => panic!("unexpected tool: {:?}", other),
    }

    match Tool::parse("export_data", json!({"data": []})).unwrap() {
        Tool::ExportData(request) => assert_eq!(request.format, FileFormat::Json),
        other => panic!("unexpected tool: {:?}", other),
    }

    match Tool::parse("integrate_data", json!({"datasets": []})).unwrap() {
        Tool::IntegrateData(request) => {
            assert_eq!(request.join_key, "id");
            assert_eq!(request.join_type, JoinType::Inner);
        }
        other => panic!("unexpected tool: {:?}", other),
    }

    assert!(matches!(Tool::parse("nope", JsonValue::Null), Err(EngineError::UnknownTool(_))));
    assert!(matches!(
        Tool::parse("transform_data", json!({"data": "not records"})),
        Err(EngineError::InvalidArguments(_))
    ));
}

#[test]
fn test_response_envelope() {
    let ok = ToolResponse::success(&json!({"a": 1}));
    assert_eq!(
        serde_json::to_value(&ok).unwrap(),
        json!({"content": [{"type": "text", "text": "{\n  \"a\": 1\n}"}]})
    );

    let err = ToolResponse::error("Error: boom".to_string());
    assert_eq!(
        serde_json::to_value(&err).unwrap(),
        json!({"content": [{"type": "text", "text": "Error: boom"}], "isError": true})
    );

    let call: ToolCall = serde_json::from_str(r#"{"name": "list_sources"}"#).unwrap();
    assert_eq!(call.name, "list_sources");
    assert!(call.arguments.is_null());
}
