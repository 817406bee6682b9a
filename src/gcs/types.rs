//! Wire types for the GCS JSON listing API.
//!
//! These mirror the `Objects: list` response shape
//! (`GET /storage/v1/b/{bucket}/o` with `projection=full`). Every field the
//! API may omit is optional here; normalization maps absence to zero values.
//! Integer-valued fields (`size`, `generation`, `metageneration`) arrive as
//! decimal strings and are kept as such until normalization.

use serde::Deserialize;

/// One page of a bucket listing.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    #[serde(default)]
    pub items: Vec<ObjectDescriptor>,
    pub next_page_token: Option<String>,
}

/// Raw metadata for one storage object, as returned by the listing API.
///
/// Immutable once produced; created by one page fetch and consumed exactly
/// once by normalization.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectDescriptor {
    pub name: String,
    pub bucket: String,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub content_language: Option<String>,
    pub content_disposition: Option<String>,
    pub cache_control: Option<String>,
    pub size: Option<String>,
    pub generation: Option<String>,
    pub metageneration: Option<String>,
    pub md5_hash: Option<String>,
    pub crc32c: Option<String>,
    pub etag: Option<String>,
    pub time_created: Option<String>,
    pub time_deleted: Option<String>,
    pub updated: Option<String>,
    pub retention_expiration_time: Option<String>,
    pub event_based_hold: Option<bool>,
    pub temporary_hold: Option<bool>,
    pub storage_class: Option<String>,
    pub media_link: Option<String>,
    pub kms_key_name: Option<String>,
    pub customer_encryption: Option<CustomerEncryption>,
    pub owner: Option<ObjectOwner>,
    pub acl: Vec<ObjectAccessControl>,
}

/// Customer-supplied encryption key information.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerEncryption {
    pub encryption_algorithm: Option<String>,
    pub key_sha256: Option<String>,
}

/// The object owner (always the entity form, e.g. `user-<id>`).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectOwner {
    pub entity: Option<String>,
    pub entity_id: Option<String>,
}

/// One access-control grant on an object.
///
/// Listing order is authoritative and preserved end to end.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectAccessControl {
    pub entity: Option<String>,
    pub entity_id: Option<String>,
    pub role: Option<String>,
    pub domain: Option<String>,
    pub email: Option<String>,
    pub project_team: Option<ProjectTeam>,
}

/// Project team associated with a project-scoped ACL entity.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectTeam {
    pub project_number: Option<String>,
    pub team: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_deserializes() {
        let body = r#"{
            "kind": "storage#objects",
            "items": [
                {
                    "name": "logs/app.log",
                    "bucket": "my-bucket",
                    "size": "2048",
                    "generation": "1700000000000000",
                    "md5Hash": "CY9rzUYh03PK3k6DJie09g==",
                    "timeCreated": "2024-01-15T10:30:00Z",
                    "storageClass": "STANDARD",
                    "acl": [
                        {"entity": "user-alice@example.com", "role": "OWNER"}
                    ]
                }
            ],
            "nextPageToken": "token-1"
        }"#;

        let page: ListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.next_page_token.as_deref(), Some("token-1"));

        let object = &page.items[0];
        assert_eq!(object.name, "logs/app.log");
        assert_eq!(object.size.as_deref(), Some("2048"));
        assert_eq!(object.acl.len(), 1);
        assert_eq!(object.acl[0].role.as_deref(), Some("OWNER"));
    }

    #[test]
    fn test_sparse_object_deserializes() {
        let body = r#"{"name": "empty-object"}"#;
        let object: ObjectDescriptor = serde_json::from_str(body).unwrap();
        assert_eq!(object.name, "empty-object");
        assert!(object.size.is_none());
        assert!(object.acl.is_empty());
        assert!(object.owner.is_none());
    }

    #[test]
    fn test_last_page_has_no_token() {
        let body = r#"{"items": []}"#;
        let page: ListResponse = serde_json::from_str(body).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
