//! floe: A library for exporting GCS bucket object metadata to Avro.
//!
//! This library provides components for enumerating every object in a
//! bucket, normalizing the raw metadata into a flat record shape, and
//! encoding the records into a single self-describing Avro container file
//! for warehouse ingestion.
//!
//! # Example
//!
//! ```ignore
//! use floe::{Config, run_pipeline, error::PipelineError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), PipelineError> {
//!     let config = Config { /* ... */ };
//!     let stats = run_pipeline(config).await?;
//!     println!("Exported {} records", stats.records_written);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod gcs;
pub mod metrics;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod sink;

// Re-export main types
pub use config::{Config, SchemaSource};
pub use pipeline::{PipelineStats, run_pipeline, run_with_lister};
