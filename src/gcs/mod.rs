//! GCS listing capability.
//!
//! Exposes the paginated object-listing interface the pipeline consumes:
//! the `ObjectLister` trait, the `GcsClient` implementation over the JSON
//! API, and the wire types for descriptors and access-control entries.

mod auth;
mod client;
mod types;

pub use auth::Authenticator;
pub use client::{DEFAULT_ENDPOINT, GcsClient, ObjectLister, ObjectPage};
pub use types::{
    CustomerEncryption, ListResponse, ObjectAccessControl, ObjectDescriptor, ObjectOwner,
    ProjectTeam,
};
