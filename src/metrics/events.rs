//! Internal events for metrics emission.
//!
//! Each event struct represents a measurable occurrence in the pipeline.
//! Events implement the `InternalEvent` trait which emits the corresponding
//! Prometheus metric.

use metrics::{counter, gauge};
use tracing::trace;

/// Trait for internal events that can be emitted as metrics.
pub trait InternalEvent {
    /// Emit this event as a metric.
    fn emit(self);
}

/// Event emitted when a listing page is fetched.
pub struct PagesFetched {
    pub count: u64,
}

impl InternalEvent for PagesFetched {
    fn emit(self) {
        trace!(count = self.count, "Pages fetched");
        counter!("floe_pages_fetched_total").increment(self.count);
    }
}

/// Event emitted when objects are enumerated into the record buffer.
pub struct ObjectsListed {
    pub count: u64,
}

impl InternalEvent for ObjectsListed {
    fn emit(self) {
        trace!(count = self.count, "Objects listed");
        counter!("floe_objects_listed_total").increment(self.count);
    }
}

/// Event emitted when records are encoded into the container.
pub struct RecordsWritten {
    pub count: u64,
}

impl InternalEvent for RecordsWritten {
    fn emit(self) {
        trace!(count = self.count, "Records written");
        counter!("floe_records_written_total").increment(self.count);
    }
}

/// Event emitted with the final container size.
pub struct BytesWritten {
    pub bytes: u64,
}

impl InternalEvent for BytesWritten {
    fn emit(self) {
        trace!(bytes = self.bytes, "Bytes written");
        counter!("floe_bytes_written_total").increment(self.bytes);
    }
}

/// Event emitted when a page fetch fails and enumeration halts.
pub struct ListingFailed;

impl InternalEvent for ListingFailed {
    fn emit(self) {
        trace!("Listing failed");
        counter!("floe_listing_failures_total").increment(1);
    }
}

/// Event emitted after each enqueue with the current buffer occupancy.
pub struct BufferDepth {
    pub depth: usize,
}

impl InternalEvent for BufferDepth {
    fn emit(self) {
        gauge!("floe_buffer_depth").set(self.depth as f64);
    }
}
