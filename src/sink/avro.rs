//! Avro container sink.
//!
//! Writes normalized records to a single Avro object-container file: a
//! header carrying the schema definition followed by binary record blocks.
//! The writer is flushed after every record, trading throughput for
//! durability against abrupt termination; an interrupted run leaves a
//! readable container holding every record flushed so far.
//!
//! Encode and write failures are fatal. Past the first failed write the
//! container's schema/record consistency can no longer be guaranteed, so
//! the sink aborts the run instead of skipping records.

use apache_avro::{Codec, Schema, Writer};
use snafu::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::emit;
use crate::error::{CreateSnafu, EncodeSnafu, FinalizeSnafu, FlushSnafu, SinkError};
use crate::gcs::ObjectDescriptor;
use crate::metrics::events::{BytesWritten, RecordsWritten};
use crate::record::ObjectRecord;

/// Statistics from a completed drain.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinkSummary {
    /// Records encoded into the container.
    pub records_written: u64,
    /// Final size of the container file.
    pub bytes_written: u64,
}

/// The output container destination.
///
/// Creating the sink opens the destination file, so an uncreatable output
/// path fails before the pipeline starts. The container header itself is
/// written with the first record block.
pub struct AvroSink {
    schema: Schema,
    file: File,
    path: PathBuf,
}

impl AvroSink {
    /// Open the destination file for the given schema.
    pub fn create(path: impl AsRef<Path>, schema: Schema) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).context(CreateSnafu {
            path: path.display().to_string(),
        })?;
        Ok(Self { schema, file, path })
    }

    /// Consume descriptors from the record buffer until it closes,
    /// normalizing each at dequeue time and appending it to the container
    /// in arrival order.
    ///
    /// Blocking: runs on the blocking thread pool, parked on the channel
    /// whenever the producer is slower than the encoder.
    pub fn drain(
        self,
        mut buffer: mpsc::Receiver<ObjectDescriptor>,
    ) -> Result<SinkSummary, SinkError> {
        let Self { schema, file, path } = self;
        let mut writer = Writer::with_codec(&schema, file, Codec::Null);
        let mut records_written = 0u64;

        while let Some(descriptor) = buffer.blocking_recv() {
            debug!(object = %descriptor.name, "Encoding record");
            let record = ObjectRecord::from_descriptor(descriptor);
            writer.append_ser(&record).context(EncodeSnafu)?;
            writer.flush().context(FlushSnafu)?;
            records_written += 1;
            emit!(RecordsWritten { count: 1 });
        }

        let file = writer.into_inner().context(FinalizeSnafu)?;

        // Best-effort durability; the container is already complete on disk.
        if let Err(e) = file.sync_all() {
            warn!("fsync of {} failed: {}", path.display(), e);
        }

        let bytes_written = file.metadata().map(|meta| meta.len()).unwrap_or(0);
        emit!(BytesWritten {
            bytes: bytes_written
        });
        info!(
            "Sink finalized: {} records, {} bytes, output in {}",
            records_written,
            bytes_written,
            path.display()
        );

        Ok(SinkSummary {
            records_written,
            bytes_written,
        })
    }
}
