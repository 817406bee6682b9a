//! Background encoding task.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::SinkError;
use crate::gcs::ObjectDescriptor;
use crate::sink::{AvroSink, SinkSummary};

/// Handle to the background encoding task.
pub(in crate::pipeline) struct Encoder {
    handle: JoinHandle<Result<SinkSummary, SinkError>>,
}

impl Encoder {
    /// Spawn the encoding task.
    ///
    /// The drain loop does synchronous file I/O after every record, so it
    /// runs on the blocking thread pool rather than a runtime worker.
    pub fn spawn(rx: mpsc::Receiver<ObjectDescriptor>, sink: AvroSink) -> Self {
        let handle = tokio::task::spawn_blocking(move || sink.drain(rx));
        Self { handle }
    }

    /// Wait for the encoder to drain the buffer and finalize the container.
    pub async fn finish(
        self,
    ) -> Result<Result<SinkSummary, SinkError>, tokio::task::JoinError> {
        self.handle.await
    }
}
