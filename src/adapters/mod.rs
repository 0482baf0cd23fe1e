//! Record sinks for Refiner.
//!
//! - [`database`] - the [`RecordSink`](database::RecordSink) trait every sink implements
//! - [`memory`] - in-memory sink for dry runs, validation and tests
//! - [`postgresql`] - PostgreSQL implementation
//!
//! # Design Pattern
//!
//! Sinks follow the **Adapter Pattern**: the refine pipeline only sees the
//! trait, so storage can be swapped or mocked without touching the
//! transformation code.
//!
//! ```rust,no_run
//! use refiner::adapters::database::RecordSink;
//! use refiner::adapters::postgresql::{PostgreSQLClient, PostgreSQLSink};
//! use refiner::config::{secret_string, PostgreSQLConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PostgreSQLConfig {
//!     connection_string: secret_string("postgresql://refiner:pw@localhost/refiner".to_string()),
//!     max_connections: 10,
//!     connection_timeout_seconds: 30,
//!     statement_timeout_seconds: 60,
//! };
//!
//! let sink = PostgreSQLSink::new(PostgreSQLClient::new(config)?);
//! sink.test_connection().await?;
//! sink.ensure_schema().await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod memory;
pub mod postgresql;

pub use memory::MemorySink;
