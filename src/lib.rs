// Refiner - FHIR profile bundle normalizer
// Copyright (c) 2025 Refiner Contributors
// Licensed under the MIT License

//! # Refiner - FHIR profile bundle normalizer
//!
//! Refiner accepts user profile documents wrapping a FHIR transaction bundle,
//! validates them against a strict input schema and projects them onto a fixed
//! relational model stored in PostgreSQL.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Validating** documents, reporting the path of the first offending field
//! - **Transforming** bundles into `users`, `storage_metrics`, `auth_sources`
//!   and `patients` rows, flattening FHIR arrays by a first-element policy
//! - **Loading** one document's records into PostgreSQL in a single transaction
//!
//! ## Architecture
//!
//! Refiner follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (refine orchestration, transform, timestamps)
//! - [`schema`] - Typed input schema and validation
//! - [`refined`] - Canonical relational model
//! - [`adapters`] - Record sinks (PostgreSQL, in-memory)
//! - [`anonymization`] - Email masking
//! - [`domain`] - Error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust
//! use refiner::core::transform::{DataTransformer, UserTransformer};
//! use refiner::schema::validate_str;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bundle = validate_str(r#"{
//!     "userId": "u1",
//!     "email": "a@b.com",
//!     "timestamp": 1700000000,
//!     "profile": {"name": "Ada", "locale": "en-US"},
//!     "metadata": {"source": "x", "collectionDate": "2023-01-01", "dataType": "export"},
//!     "resourceType": "Bundle",
//!     "type": "transaction",
//!     "entry": [{"resource": {"resourceType": "Patient", "id": "p1", "gender": "female"}}]
//! }"#)?;
//!
//! let records = UserTransformer::new().transform(&bundle)?;
//! let tables: Vec<_> = records.iter().map(|r| r.table_name()).collect();
//! assert_eq!(tables, ["users", "auth_sources", "patients"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Refiner uses the [`domain::RefinerError`] type for all errors:
//!
//! ```rust
//! use refiner::domain::RefinerError;
//!
//! let err = refiner::schema::validate_str(r#"{"resourceType": "Bundle"}"#).unwrap_err();
//! let err: RefinerError = err.into();
//! assert!(matches!(err, RefinerError::SchemaValidation(_)));
//! ```

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod refined;
pub mod schema;
