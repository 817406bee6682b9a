//! Main processing pipeline.
//!
//! Connects enumeration and encoding into a two-stage streaming pipeline
//! joined by one bounded record buffer.
//!
//! # Architecture
//!
//! - **Enumerator**: a tokio task pages through the bucket listing and
//!   pushes raw descriptors into the buffer (I/O bound, backpressured).
//! - **Encoder**: a blocking-pool task drains the buffer, normalizes each
//!   descriptor, and appends it to the Avro container (file I/O per record).
//!
//! The orchestrator waits for both tasks and aggregates their outcomes into
//! an explicit result: a listing failure degrades the run to partial
//! success, an encode failure aborts it.

mod tasks;

use snafu::prelude::*;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{PipelineError, SchemaSnafu, SinkSnafu, TaskJoinSnafu};
use crate::gcs::{GcsClient, ObjectLister};
use crate::schema;
use crate::sink::AvroSink;

use tasks::{Encoder, Enumerator};

pub use tasks::EnumerationSummary;

/// Statistics about the pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub pages_fetched: u64,
    pub objects_listed: u64,
    pub records_written: u64,
    pub bytes_written: u64,
    /// True when enumeration halted early on a page-fetch error; the
    /// output still holds every record that entered the buffer.
    pub listing_failed: bool,
}

/// Run the pipeline against the configured bucket.
pub async fn run_pipeline(config: Config) -> Result<PipelineStats, PipelineError> {
    let client = GcsClient::new(&config.bucket, config.include_versions, config.page_size);
    let client = match &config.endpoint {
        Some(endpoint) => {
            info!("Using listing endpoint override: {}", endpoint);
            client.with_endpoint(endpoint)
        }
        None => client,
    };
    run_with_lister(client, &config).await
}

/// Run the pipeline with an explicit listing capability.
///
/// Setup (schema load, output creation) happens before any task is spawned,
/// so setup failures abort the run without touching the bucket.
pub async fn run_with_lister(
    lister: impl ObjectLister + 'static,
    config: &Config,
) -> Result<PipelineStats, PipelineError> {
    let schema = schema::load(&config.schema).context(SchemaSnafu)?;
    let sink = AvroSink::create(&config.output, schema).context(SinkSnafu)?;

    info!(
        "Starting pipeline: bucket {} -> {} (buffer capacity {})",
        config.bucket,
        config.output.display(),
        config.buffer_capacity
    );

    let Enumerator { rx, handle } = Enumerator::spawn(lister, config.buffer_capacity);
    let encoder = Encoder::spawn(rx, sink);

    // The enumerator finishes first in the normal case; if the encoder dies
    // early instead, the closed buffer unblocks the enumerator promptly.
    let enumeration = handle.await.context(TaskJoinSnafu)?;
    let encoding = encoder
        .finish()
        .await
        .context(TaskJoinSnafu)?
        .context(SinkSnafu)?;

    let stats = PipelineStats {
        pages_fetched: enumeration.pages_fetched,
        objects_listed: enumeration.objects_listed,
        records_written: encoding.records_written,
        bytes_written: encoding.bytes_written,
        listing_failed: enumeration.failed,
    };

    if stats.listing_failed {
        warn!(
            "Enumeration halted early; output is a partial listing of bucket {}",
            config.bucket
        );
    }
    info!(
        "Processing complete, output in: {}",
        config.output.display()
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaSource;
    use crate::error::ListingError;
    use crate::gcs::{ObjectDescriptor, ObjectPage};
    use async_trait::async_trait;
    use std::path::PathBuf;

    /// Serves queued pages, then reports exhaustion (or a queued error).
    struct QueuedLister {
        pages: Vec<Result<ObjectPage, ListingError>>,
    }

    #[async_trait]
    impl ObjectLister for QueuedLister {
        async fn next_page(
            &mut self,
            _page_token: Option<&str>,
        ) -> Result<ObjectPage, ListingError> {
            if self.pages.is_empty() {
                Ok(ObjectPage::default())
            } else {
                self.pages.remove(0)
            }
        }
    }

    fn descriptor(name: &str) -> ObjectDescriptor {
        ObjectDescriptor {
            name: name.to_string(),
            bucket: "test-bucket".to_string(),
            ..Default::default()
        }
    }

    fn test_config(output: PathBuf) -> Config {
        Config {
            bucket: "test-bucket".to_string(),
            output,
            include_versions: false,
            buffer_capacity: 8,
            page_size: 1000,
            concurrency: 2,
            schema: SchemaSource::Embedded,
            endpoint: None,
            metrics_address: None,
        }
    }

    #[test]
    fn test_pipeline_stats_default() {
        let stats = PipelineStats::default();
        assert_eq!(stats.records_written, 0);
        assert!(!stats.listing_failed);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_run_with_queued_pages() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = test_config(dir.path().join("out.avro"));

        let lister = QueuedLister {
            pages: vec![
                Ok(ObjectPage {
                    items: vec![descriptor("a"), descriptor("b")],
                    next_page_token: Some("next".to_string()),
                }),
                Ok(ObjectPage {
                    items: vec![descriptor("c")],
                    next_page_token: None,
                }),
            ],
        };

        let stats = run_with_lister(lister, &config).await.unwrap();

        assert_eq!(stats.pages_fetched, 2);
        assert_eq!(stats.objects_listed, 3);
        assert_eq!(stats.records_written, 3);
        assert!(!stats.listing_failed);
        assert!(config.output.exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_schema_failure_aborts_before_listing() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = test_config(dir.path().join("out.avro"));
        config.schema = SchemaSource::File("/nonexistent/schema.avsc".into());

        let lister = QueuedLister { pages: vec![] };
        let result = run_with_lister(lister, &config).await;

        assert!(matches!(result, Err(PipelineError::Schema { .. })));
        assert!(!config.output.exists());
    }
}
