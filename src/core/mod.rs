//! Core business logic for Refiner.
//!
//! # Modules
//!
//! - [`refine`] - Refine orchestration over input files and summary reporting
//! - [`timestamp`] - Epoch and date-string parsing into UTC instants
//! - [`transform`] - Projection of validated bundles onto canonical records
//!
//! # Refine Workflow
//!
//! 1. **Collect**: List the `.json` documents under the configured input paths
//! 2. **Validate**: Check each document against the input schema
//! 3. **Transform**: Project the bundle onto `User`, `StorageMetric`,
//!    `AuthSource` and `Patient` records
//! 4. **Store**: Hand the records of one document to the sink in one call
//! 5. **Report**: Generate the refine summary
//!
//! # Example
//!
//! ```rust,no_run
//! use refiner::config::load_config;
//! use refiner::core::refine::RefineCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("refiner.toml")?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let coordinator = RefineCoordinator::from_config(config, shutdown_rx).await?;
//! let summary = coordinator.execute_refine().await?;
//!
//! println!("Documents: {}", summary.documents_total);
//! println!("Succeeded: {}", summary.documents_succeeded);
//! println!("Failed: {}", summary.documents_failed);
//! # Ok(())
//! # }
//! ```

pub mod refine;
pub mod timestamp;
pub mod transform;
