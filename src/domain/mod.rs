//! Domain types for Refiner.
//!
//! The domain layer holds the error hierarchy shared by every other module:
//!
//! - [`RefinerError`] - top-level error
//! - [`SchemaValidationError`] - input schema violation with a field path
//! - [`TimestampError`] - timestamp collaborator failure
//! - [`Result`] - result alias over [`RefinerError`]
//!
//! # Error Handling
//!
//! ```rust
//! use refiner::domain::{RefinerError, Result};
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let created_at = refiner::core::timestamp::parse_epoch(1_700_000_000)?;
//!     assert_eq!(created_at.timestamp(), 1_700_000_000);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::{RefinerError, SchemaValidationError, TimestampError};
pub use result::Result;
