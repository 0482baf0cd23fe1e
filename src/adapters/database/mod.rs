//! Persistence abstraction layer
//!
//! This module provides a trait-based abstraction for storing canonical
//! records, allowing Refiner to write to PostgreSQL or keep records in memory.

pub mod traits;

pub use traits::{InsertResult, RecordSink};
