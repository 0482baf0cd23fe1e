//! PostgreSQL database integration
//!
//! This module provides integration with PostgreSQL for storing the
//! refined relational record set.

pub mod client;
pub mod models;
pub mod sink;

pub use client::PostgreSQLClient;
pub use models::{InsertStatement, SqlRow};
pub use sink::PostgreSQLSink;
