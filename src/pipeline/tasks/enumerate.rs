//! Background enumeration task.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::emit;
use crate::gcs::{ObjectDescriptor, ObjectLister};
use crate::metrics::events::{BufferDepth, ListingFailed, ObjectsListed, PagesFetched};

/// Outcome of the enumeration stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumerationSummary {
    /// Listing pages fetched successfully.
    pub pages_fetched: u64,
    /// Descriptors delivered into the record buffer.
    pub objects_listed: u64,
    /// Whether a page fetch failed and enumeration halted early.
    pub failed: bool,
}

/// Handle to the background enumeration task.
pub(in crate::pipeline) struct Enumerator {
    pub rx: mpsc::Receiver<ObjectDescriptor>,
    pub handle: JoinHandle<EnumerationSummary>,
}

impl Enumerator {
    /// Spawn the enumeration task.
    ///
    /// `capacity` bounds the record buffer between enumeration and encoding;
    /// a full buffer suspends the task until the encoder frees space.
    pub fn spawn(lister: impl ObjectLister + 'static, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = tokio::spawn(Self::run(lister, tx));
        Self { rx, handle }
    }

    /// Page through the listing, pushing every descriptor into the buffer.
    ///
    /// A failed page fetch is logged and halts enumeration, but descriptors
    /// already delivered stay delivered; the run degrades to partial
    /// output, not an abort. Dropping the sender on return closes the
    /// buffer, which is how the encoder learns enumeration is done.
    async fn run(
        mut lister: impl ObjectLister,
        tx: mpsc::Sender<ObjectDescriptor>,
    ) -> EnumerationSummary {
        let mut summary = EnumerationSummary::default();
        let mut page_token: Option<String> = None;

        loop {
            let page = match lister.next_page(page_token.as_deref()).await {
                Ok(page) => page,
                Err(e) => {
                    error!("Listing page fetch failed, halting enumeration: {}", e);
                    emit!(ListingFailed);
                    summary.failed = true;
                    break;
                }
            };

            summary.pages_fetched += 1;
            emit!(PagesFetched { count: 1 });

            for descriptor in page.items {
                debug!(object = %descriptor.name, "Enumerated object");
                if tx.send(descriptor).await.is_err() {
                    debug!("Encoder closed, stopping enumeration");
                    return summary;
                }
                summary.objects_listed += 1;
                emit!(ObjectsListed { count: 1 });
                emit!(BufferDepth {
                    depth: tx.max_capacity() - tx.capacity()
                });
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(
            "Enumeration complete: {} pages, {} objects",
            summary.pages_fetched, summary.objects_listed
        );
        summary
    }
}
