//! Refine orchestration
//!
//! Runs input documents through validation, transformation and a record
//! sink, and reports the outcome in a [`RefineSummary`].

pub mod coordinator;
pub mod summary;

pub use coordinator::{collect_input_files, RefineCoordinator};
pub use summary::{RefineError, RefineErrorType, RefineSummary};
