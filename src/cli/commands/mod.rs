//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod refine;
pub mod validate;
pub mod validate_config;
