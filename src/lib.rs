// Data Integration Engine
// Author: Gabriel Demetrios Lafis

//! # Data Integration Engine
//!
//! An ad-hoc data integration and transformation engine written in Rust.
//!
//! ## Features
//!
//! - Relational (SQLite), file (CSV, JSON) and mock remote sources
//! - Natural language to SQL translation with keyword rules and an optional
//!   generative backend
//! - Sorting, filtering, limiting and aggregation through pipelines
//! - Inner and left joins across any number of datasets
//! - Capped JSON and CSV export
//! - Tool dispatch returning text content envelopes
//!
//! ## Example
//!
//! ```rust
//! use data_integration_engine::{
//!     data::{DataSet, Record},
//!     processing::{IntegrationProcessor, Pipeline, SortProcessor, LimitProcessor},
//! };
//!
//! let users = DataSet::from_records(vec![
//!     Record::new().with("id", 2).with("name", "Bob"),
//!     Record::new().with("id", 1).with("name", "Alice"),
//! ]);
//! let orders = DataSet::from_records(vec![
//!     Record::new().with("id", 1).with("product", "Laptop"),
//! ]);
//!
//! let pipeline = Pipeline::new("example")
//!     .add(SortProcessor::ascending("id"))
//!     .add(LimitProcessor::new(1));
//! let first = pipeline.execute(&users).unwrap();
//! assert_eq!(first.len(), 1);
//!
//! let joined = IntegrationProcessor::inner("id").integrate(&[users, orders]).unwrap();
//! assert_eq!(joined.len(), 2);
//! ```

pub mod data;
pub mod export;
pub mod processing;
pub mod sources;
pub mod tools;
pub mod translate;
pub mod utils;

// Re-export main types
pub use data::{DataSet, Record, Value};
pub use processing::Pipeline;
pub use tools::{Engine, Tool, ToolResponse};
pub use utils::Config;
