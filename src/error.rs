//! Error types for floe using snafu.
//!
//! This module defines structured error types with context selectors for
//! all error conditions in the codebase.

use snafu::prelude::*;

// ============ Auth Errors ============

/// Errors that can occur while obtaining a GCS access token.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AuthError {
    /// Service account key file could not be read.
    #[snafu(display("Failed to read service account key: {path}"))]
    CredentialsRead {
        source: std::io::Error,
        path: String,
    },

    /// Service account key file is not valid JSON.
    #[snafu(display("Invalid service account key: {path}"))]
    CredentialsParse {
        source: serde_json::Error,
        path: String,
    },

    /// JWT assertion could not be built or signed.
    #[snafu(display("Failed to sign token assertion"))]
    Assertion {
        source: jsonwebtoken::errors::Error,
    },

    /// Token endpoint request failed at the transport level.
    #[snafu(display("Token request failed"))]
    TokenRequest { source: reqwest::Error },

    /// Token endpoint returned a non-success status.
    #[snafu(display("Token exchange failed ({status}): {body}"))]
    TokenStatus { status: u16, body: String },

    /// Token endpoint response could not be decoded.
    #[snafu(display("Invalid token response"))]
    TokenDecode { source: reqwest::Error },
}

// ============ Listing Errors ============

/// Errors that can occur while enumerating bucket objects.
///
/// Listing errors are never fatal: they halt enumeration early and surface
/// as a partial-success run status, not as a pipeline abort.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ListingError {
    /// The listing URL could not be constructed.
    #[snafu(display("Invalid listing endpoint: {endpoint}"))]
    InvalidEndpoint {
        source: url::ParseError,
        endpoint: String,
    },

    /// Authentication failed before the page could be requested.
    #[snafu(display("Authentication failed"))]
    Auth { source: AuthError },

    /// The page request failed at the transport level.
    #[snafu(display("Listing request failed for bucket {bucket}"))]
    Request {
        source: reqwest::Error,
        bucket: String,
    },

    /// The listing API returned a non-success status.
    #[snafu(display("Listing failed for bucket {bucket} ({status}): {body}"))]
    Status {
        bucket: String,
        status: u16,
        body: String,
    },

    /// The page response could not be decoded.
    #[snafu(display("Invalid listing response for bucket {bucket}"))]
    Decode {
        source: reqwest::Error,
        bucket: String,
    },
}

// ============ Schema Errors ============

/// Errors that can occur while loading the Avro schema.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SchemaError {
    /// Schema file could not be read.
    #[snafu(display("Failed to read schema file: {path}"))]
    ReadFile {
        source: std::io::Error,
        path: String,
    },

    /// Schema definition is not valid Avro.
    #[snafu(display("Failed to parse Avro schema"))]
    Parse { source: apache_avro::Error },
}

// ============ Sink Errors ============

/// Errors that can occur while encoding records to the output container.
///
/// Any of these is fatal: past the first failed write the container's
/// schema/record consistency can no longer be guaranteed.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// Output file could not be created.
    #[snafu(display("Failed to create output file: {path}"))]
    Create {
        source: std::io::Error,
        path: String,
    },

    /// A record failed to serialize against the schema.
    #[snafu(display("Failed to encode record"))]
    Encode { source: apache_avro::Error },

    /// The writer failed to flush a record block to the file.
    #[snafu(display("Failed to flush record block"))]
    Flush { source: apache_avro::Error },

    /// The container could not be finalized.
    #[snafu(display("Failed to finalize output container"))]
    Finalize { source: apache_avro::Error },
}

// ============ Config Errors ============

/// Errors that can occur during configuration validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Bucket name is empty.
    #[snafu(display("Bucket name cannot be empty"))]
    EmptyBucket,

    /// Buffer capacity is zero.
    #[snafu(display("Buffer capacity must be at least 1"))]
    ZeroBufferCapacity,

    /// Listing page size is zero.
    #[snafu(display("Page size must be at least 1"))]
    ZeroPageSize,

    /// Runtime concurrency is zero.
    #[snafu(display("Concurrency must be at least 1"))]
    ZeroConcurrency,
}

// ============ Metrics Errors ============

/// Errors that can occur during metrics initialization.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum MetricsError {
    /// Failed to initialize Prometheus recorder.
    #[snafu(display("Failed to initialize Prometheus recorder"))]
    PrometheusInit {
        source: metrics_exporter_prometheus::BuildError,
    },
}

// ============ Pipeline Error (top-level) ============

/// Top-level pipeline errors that aggregate all fatal error types.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PipelineError {
    /// Configuration error.
    #[snafu(display("Configuration error"))]
    Config { source: ConfigError },

    /// Schema loading error.
    #[snafu(display("Schema error"))]
    Schema { source: SchemaError },

    /// Sink setup or encode error.
    #[snafu(display("Sink error"))]
    Sink { source: SinkError },

    /// Metrics error.
    #[snafu(display("Metrics error"))]
    Metrics { source: MetricsError },

    /// Address parsing error.
    #[snafu(display("Failed to parse metrics address"))]
    AddressParse { source: std::net::AddrParseError },

    /// Tokio runtime construction error.
    #[snafu(display("Failed to build async runtime"))]
    Runtime { source: std::io::Error },

    /// Task join error.
    #[snafu(display("Task join error"))]
    TaskJoin { source: tokio::task::JoinError },
}
