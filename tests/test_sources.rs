// Source adapter tests
// Author: Gabriel Demetrios Lafis

use std::fs;

use tempfile::TempDir;

use data_integration_engine::{
    data::Value,
    sources::{FileSource, MockApiSource, SourceError, SqlSource, SqlStore, MOCK_NOTE},
};

fn seeded_store(dir: &TempDir) -> SqlStore {
    let store = SqlStore::new(dir.path().join("db").join("sample.db"));
    store.provision().unwrap();
    store
}

#[test]
fn test_provision_seeds_once() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);

    // A second run must not duplicate the seed rows
    store.provision().unwrap();

    let source = SqlSource::new(&store);
    let users = source.execute("SELECT * FROM users").unwrap();
    let orders = source.execute("SELECT * FROM orders").unwrap();
    assert_eq!(users.len(), 5);
    assert_eq!(orders.len(), 5);

    assert_eq!(store.tables().unwrap(), vec!["orders", "users"]);
}

#[test]
fn test_sql_maps_column_types_in_order() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);

    let data = SqlSource::new(&store)
        .execute("SELECT id, product, amount, NULL AS note FROM orders WHERE id = 1")
        .unwrap();

    let record = data.get(0).unwrap();
    let fields: Vec<&str> = record.keys().collect();
    assert_eq!(fields, vec!["id", "product", "amount", "note"]);
    assert_eq!(record.get("id"), Some(&Value::Integer(1)));
    assert_eq!(record.get("product"), Some(&Value::from("Laptop")));
    assert_eq!(record.get("amount"), Some(&Value::Float(999.99)));
    assert_eq!(record.get("note"), Some(&Value::Null));

    assert_eq!(data.metadata.get("source").map(String::as_str), Some("sql"));
}

#[test]
fn test_sql_usa_users() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);

    let data = SqlSource::new(&store)
        .execute("SELECT * FROM users WHERE country = 'USA'")
        .unwrap();

    let names: Vec<Value> = data.iter().filter_map(|r| r.get("name").cloned()).collect();
    assert_eq!(names, vec![Value::from("John Doe"), Value::from("Alice Brown")]);
}

#[test]
fn test_sql_error_is_query_error() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);

    let err = SqlSource::new(&store).execute("SELECT * FROM missing_table").unwrap_err();
    match err {
        SourceError::Query(msg) => assert!(msg.contains("missing_table")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_file_csv_is_text_typed() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("users.csv"), "id,name,city\n1,Alice,\n2,Bob,Paris\n").unwrap();

    let data = FileSource::new(dir.path()).read("users.csv").unwrap();

    assert_eq!(data.len(), 2);
    let first = data.get(0).unwrap();
    assert_eq!(first.get("id"), Some(&Value::from("1")));
    assert_eq!(first.get("city"), Some(&Value::from("")));
}

#[test]
fn test_file_json_array_and_object() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("products.json"),
        r#"[{"id": 1, "price": 9.5, "tags": ["a", "b"], "active": true}, {"id": 2, "price": null}]"#,
    )
    .unwrap();
    fs::write(dir.path().join("single.json"), r#"{"id": 7, "name": "Only"}"#).unwrap();

    let files = FileSource::new(dir.path());

    let products = files.read("products.json").unwrap();
    assert_eq!(products.len(), 2);
    let first = products.get(0).unwrap();
    assert_eq!(first.get("price"), Some(&Value::Float(9.5)));
    assert_eq!(first.get("tags"), Some(&Value::from(r#"["a","b"]"#)));
    assert_eq!(first.get("active"), Some(&Value::Boolean(true)));
    assert_eq!(products.get(1).unwrap().get("price"), Some(&Value::Null));

    let single = files.read("single.json").unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(single.get(0).unwrap().get("name"), Some(&Value::from("Only")));
}

#[test]
fn test_file_without_suffix_tries_json_then_csv() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("orders.csv"), "id,product\n1,Laptop\n").unwrap();
    fs::write(dir.path().join("both.json"), r#"[{"from": "json"}]"#).unwrap();
    fs::write(dir.path().join("both.csv"), "from\ncsv\n").unwrap();
    fs::write(dir.path().join("bare"), "from\ncsv\n").unwrap();

    let files = FileSource::new(dir.path());

    let orders = files.read("orders").unwrap();
    assert_eq!(orders.get(0).unwrap().get("product"), Some(&Value::from("Laptop")));

    let both = files.read("both").unwrap();
    assert_eq!(both.get(0).unwrap().get("from"), Some(&Value::from("json")));

    // Existing file without suffix: not JSON, so parsed as CSV
    let bare = files.read("bare").unwrap();
    assert_eq!(bare.get(0).unwrap().get("from"), Some(&Value::from("csv")));
}

#[test]
fn test_file_suffix_is_appended_to_dotted_names() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("users.v2.json"), r#"[{"name": "Alice"}]"#).unwrap();
    fs::write(dir.path().join("users.json"), r#"[{"name": "Old"}]"#).unwrap();

    let users = FileSource::new(dir.path()).read("users.v2").unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users.get(0).unwrap().get("name"), Some(&Value::from("Alice")));
}

#[test]
fn test_file_errors() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.json"), "{not json").unwrap();

    let files = FileSource::new(dir.path());

    assert!(matches!(files.read("missing"), Err(SourceError::File(_))));
    assert!(matches!(files.read("missing.csv"), Err(SourceError::File(_))));
    assert!(matches!(files.read("broken.json"), Err(SourceError::File(_))));
    assert!(matches!(files.read("../secret.csv"), Err(SourceError::File(_))));
    assert!(matches!(files.read("/etc/passwd"), Err(SourceError::File(_))));
}

#[test]
fn test_file_list() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.json"), "[]").unwrap();
    fs::write(dir.path().join("a.csv"), "id\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    assert_eq!(FileSource::new(dir.path()).list().unwrap(), vec!["a.csv", "b.json"]);
    assert!(FileSource::new(dir.path().join("nope")).list().unwrap().is_empty());
}

#[test]
fn test_mock_api() {
    let data = MockApiSource::new().fetch("anything");

    assert_eq!(data.len(), 2);
    assert_eq!(data.get(1).unwrap().get("name"), Some(&Value::from("Sample 2")));
    assert_eq!(data.metadata.get("note").map(String::as_str), Some(MOCK_NOTE));
}
