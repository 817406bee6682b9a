//! Run configuration.
//!
//! Holds the validated options for a single export run. The configuration
//! surface is entirely flag-driven; `main` builds a `Config` from the parsed
//! command line and validates it before the pipeline starts.

use snafu::prelude::*;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{
    ConfigError, EmptyBucketSnafu, ZeroBufferCapacitySnafu, ZeroConcurrencySnafu,
    ZeroPageSizeSnafu,
};

/// Default record buffer capacity.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1000;

/// Default listing page size (the API maximum).
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Default number of runtime worker threads.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Where the Avro schema for the output container comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// The schema compiled into the binary.
    Embedded,
    /// An externally supplied schema file.
    File(PathBuf),
}

impl SchemaSource {
    /// Parse the `--schema` flag value: the literal `embedded` selects the
    /// compiled-in schema, anything else is treated as a file path.
    pub fn parse(value: &str) -> Self {
        if value == "embedded" {
            SchemaSource::Embedded
        } else {
            SchemaSource::File(PathBuf::from(value))
        }
    }
}

/// Validated configuration for one export run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Source bucket name.
    pub bucket: String,

    /// Output file path.
    pub output: PathBuf,

    /// Whether to include noncurrent object versions in the listing.
    pub include_versions: bool,

    /// Record buffer capacity (bounds memory between the stages).
    pub buffer_capacity: usize,

    /// Listing page size.
    pub page_size: usize,

    /// Runtime worker threads.
    pub concurrency: usize,

    /// Avro schema source for the output container.
    pub schema: SchemaSource,

    /// Optional listing endpoint override (storage emulators).
    pub endpoint: Option<String>,

    /// Optional address for the Prometheus metrics endpoint.
    pub metrics_address: Option<SocketAddr>,
}

impl Config {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(!self.bucket.is_empty(), EmptyBucketSnafu);
        ensure!(self.buffer_capacity > 0, ZeroBufferCapacitySnafu);
        ensure!(self.page_size > 0, ZeroPageSizeSnafu);
        ensure!(self.concurrency > 0, ZeroConcurrencySnafu);
        Ok(())
    }
}
