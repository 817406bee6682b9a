//! Normalization of raw descriptors into the canonical record shape.
//!
//! The record schema has no unions, so there is no way to express absence:
//! every optional source field maps to a type-appropriate zero value (empty
//! string, 0, false). Normalization is total: malformed numerics and
//! timestamps degrade to zero values rather than failing the record.
//!
//! Timestamp units differ by field and must stay that way: `created`,
//! `deleted` and `updated` are microseconds since epoch while
//! `retention_expiration_time` is milliseconds. Downstream consumers depend
//! on the units the schema declares, so the inconsistency is preserved, not
//! fixed. An absent timestamp encodes as 0 and is indistinguishable from
//! the epoch itself, a known limitation of the format.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::gcs::{ObjectAccessControl, ObjectDescriptor};

/// One access-control grant in canonical form.
///
/// The team fields are populated only when the source entity is
/// project-scoped; for every other entity kind they stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AclRecord {
    pub entity: String,
    pub entity_id: String,
    pub role: String,
    pub domain: String,
    pub email: String,
    pub team_project_number: String,
    pub team_project_team: String,
}

impl AclRecord {
    fn from_entry(entry: ObjectAccessControl) -> Self {
        let (team_project_number, team_project_team) = match entry.project_team {
            Some(team) => (
                team.project_number.unwrap_or_default(),
                team.team.unwrap_or_default(),
            ),
            None => (String::new(), String::new()),
        };

        Self {
            entity: entry.entity.unwrap_or_default(),
            entity_id: entry.entity_id.unwrap_or_default(),
            role: entry.role.unwrap_or_default(),
            domain: entry.domain.unwrap_or_default(),
            email: entry.email.unwrap_or_default(),
            team_project_number,
            team_project_team,
        }
    }
}

/// The canonical, flat record written to the sink. One-to-one with raw
/// descriptors; field names and order match the embedded schema.
///
/// Arbitrary user metadata key/value pairs are deliberately not part of
/// the record; the listing projection does not return them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub bucket: String,
    pub name: String,
    pub content_type: String,
    pub content_language: String,
    pub cache_control: String,
    pub event_based_hold: bool,
    pub temporary_hold: bool,
    /// Milliseconds since epoch; 0 when unset.
    pub retention_expiration_time: i64,
    pub acl: Vec<AclRecord>,
    /// Present in the schema but never returned by the listing API.
    pub predefined_acl: String,
    pub owner: String,
    pub size: i64,
    pub content_encoding: String,
    pub content_disposition: String,
    /// Lowercase hex of the object's MD5 content hash.
    pub md5: String,
    pub crc32c: i32,
    pub media_link: String,
    pub generation: i64,
    pub metageneration: i64,
    pub storage_class: String,
    /// Microseconds since epoch; 0 when unset.
    pub created: i64,
    /// Microseconds since epoch; 0 when unset.
    pub deleted: i64,
    /// Microseconds since epoch; 0 when unset.
    pub updated: i64,
    pub customer_key_sha256: String,
    pub kms_key_name: String,
    pub etag: String,
}

impl ObjectRecord {
    /// Normalize one raw descriptor. Pure and total: never fails,
    /// defensively defaults every absent or malformed field.
    pub fn from_descriptor(descriptor: ObjectDescriptor) -> Self {
        let acl = descriptor
            .acl
            .into_iter()
            .map(AclRecord::from_entry)
            .collect();

        Self {
            bucket: descriptor.bucket,
            name: descriptor.name,
            content_type: descriptor.content_type.unwrap_or_default(),
            content_language: descriptor.content_language.unwrap_or_default(),
            cache_control: descriptor.cache_control.unwrap_or_default(),
            event_based_hold: descriptor.event_based_hold.unwrap_or_default(),
            temporary_hold: descriptor.temporary_hold.unwrap_or_default(),
            retention_expiration_time: timestamp_millis(
                descriptor.retention_expiration_time.as_deref(),
            ),
            acl,
            predefined_acl: String::new(),
            owner: descriptor
                .owner
                .and_then(|owner| owner.entity)
                .unwrap_or_default(),
            size: decimal_or_zero(descriptor.size.as_deref()),
            content_encoding: descriptor.content_encoding.unwrap_or_default(),
            content_disposition: descriptor.content_disposition.unwrap_or_default(),
            md5: md5_hex(descriptor.md5_hash.as_deref()),
            crc32c: crc32c_checksum(descriptor.crc32c.as_deref()),
            media_link: descriptor.media_link.unwrap_or_default(),
            generation: decimal_or_zero(descriptor.generation.as_deref()),
            metageneration: decimal_or_zero(descriptor.metageneration.as_deref()),
            storage_class: descriptor.storage_class.unwrap_or_default(),
            created: timestamp_micros(descriptor.time_created.as_deref()),
            deleted: timestamp_micros(descriptor.time_deleted.as_deref()),
            updated: timestamp_micros(descriptor.updated.as_deref()),
            customer_key_sha256: descriptor
                .customer_encryption
                .and_then(|encryption| encryption.key_sha256)
                .unwrap_or_default(),
            kms_key_name: descriptor.kms_key_name.unwrap_or_default(),
            etag: descriptor.etag.unwrap_or_default(),
        }
    }
}

/// RFC 3339 timestamp to microseconds since epoch; 0 when absent or
/// malformed.
fn timestamp_micros(value: Option<&str>) -> i64 {
    value
        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
        .map(|time| time.timestamp_micros())
        .unwrap_or(0)
}

/// RFC 3339 timestamp to milliseconds since epoch; 0 when absent or
/// malformed.
fn timestamp_millis(value: Option<&str>) -> i64 {
    value
        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
        .map(|time| time.timestamp_millis())
        .unwrap_or(0)
}

/// The API serializes 64-bit integers as decimal strings.
fn decimal_or_zero(value: Option<&str>) -> i64 {
    value.and_then(|text| text.parse().ok()).unwrap_or(0)
}

/// Base64 MD5 from the API to the lowercase hex form the warehouse expects.
fn md5_hex(value: Option<&str>) -> String {
    value
        .and_then(|text| BASE64.decode(text).ok())
        .map(hex::encode)
        .unwrap_or_default()
}

/// Base64 big-endian CRC32C from the API to its integer form.
fn crc32c_checksum(value: Option<&str>) -> i32 {
    value
        .and_then(|text| BASE64.decode(text).ok())
        .and_then(|bytes| <[u8; 4]>::try_from(bytes.as_slice()).ok())
        .map(|bytes| u32::from_be_bytes(bytes) as i32)
        .unwrap_or(0)
}
