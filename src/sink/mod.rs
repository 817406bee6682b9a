//! Output sink.
//!
//! The encoder side of the pipeline: the Avro container writer and its
//! drain loop.

mod avro;

pub use avro::{AvroSink, SinkSummary};
