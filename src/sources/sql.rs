// Relational source backed by SQLite
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};

use crate::data::{DataSet, Record, Value};
use super::SourceError;

const USERS: [(i64, &str, &str, &str, &str); 5] = [
    (1, "John Doe", "john@example.com", "USA", "2024-01-15"),
    (2, "Jane Smith", "jane@example.com", "UK", "2024-02-20"),
    (3, "Bob Wilson", "bob@example.com", "Canada", "2024-03-10"),
    (4, "Alice Brown", "alice@example.com", "USA", "2024-01-25"),
    (5, "Charlie Davis", "charlie@example.com", "Australia", "2024-02-28"),
];

const ORDERS: [(i64, i64, &str, f64, &str); 5] = [
    (1, 1, "Laptop", 999.99, "2024-01-20"),
    (2, 1, "Mouse", 29.99, "2024-01-25"),
    (3, 2, "Monitor", 399.99, "2024-02-25"),
    (4, 3, "Keyboard", 89.99, "2024-03-15"),
    (5, 4, "Laptop", 999.99, "2024-02-01"),
];

/// Handle to the backing relational store.
///
/// Holds only the location; every operation opens its own connection and
/// closes it before returning.
#[derive(Debug, Clone)]
pub struct SqlStore {
    path: PathBuf,
}

impl SqlStore {
    /// Create a handle for the database file at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        SqlStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection, SourceError> {
        Connection::open(&self.path).map_err(SourceError::from)
    }

    /// Create the `users` and `orders` tables and seed them when empty
    pub fn provision(&self) -> Result<(), SourceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SourceError::File(e.to_string()))?;
        }

        let mut conn = self.open()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                name TEXT,
                email TEXT,
                country TEXT,
                signup_date DATE
            );
            CREATE TABLE IF NOT EXISTS orders (
                id INTEGER PRIMARY KEY,
                user_id INTEGER,
                product TEXT,
                amount REAL,
                order_date DATE
            );
            "#,
        )?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        if count > 0 {
            debug!("Store {} already seeded ({} users)", self.path.display(), count);
            return Ok(());
        }

        let tx = conn.transaction()?;
        for (id, name, email, country, signup_date) in USERS {
            tx.execute(
                "INSERT INTO users VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, name, email, country, signup_date],
            )?;
        }
        for (id, user_id, product, amount, order_date) in ORDERS {
            tx.execute(
                "INSERT INTO orders VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, user_id, product, amount, order_date],
            )?;
        }
        tx.commit()?;

        info!("Seeded store {} with {} users and {} orders", self.path.display(), USERS.len(), ORDERS.len());
        Ok(())
    }

    /// List user table names
    pub fn tables(&self) -> Result<Vec<String>, SourceError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(names)
    }
}

/// Relational source adapter
pub struct SqlSource {
    store: SqlStore,
}

impl SqlSource {
    /// Create a new adapter over the given store
    pub fn new(store: &SqlStore) -> Self {
        SqlSource {
            store: store.clone(),
        }
    }

    /// Execute `query` verbatim and collect every row as a record
    pub fn execute(&self, query: &str) -> Result<DataSet, SourceError> {
        debug!("Executing SQL: {}", query);

        let conn = self.store.open()?;
        let mut stmt = conn.prepare(query)?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut dataset = DataSet::new();
        let mut rows = stmt.query([])?;

        while let Some(row) = rows.next()? {
            let mut record = Record::new();

            for (i, name) in columns.iter().enumerate() {
                let value = match row.get_ref(i)? {
                    ValueRef::Null => Value::Null,
                    ValueRef::Integer(v) => Value::Integer(v),
                    ValueRef::Real(v) => Value::Float(v),
                    ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
                    ValueRef::Blob(b) => Value::String(String::from_utf8_lossy(b).into_owned()),
                };
                record.insert(name.as_str(), value);
            }

            dataset.push(record);
        }

        dataset.metadata.add("source", "sql");
        dataset.metadata.add("query", query);

        Ok(dataset)
    }
}
