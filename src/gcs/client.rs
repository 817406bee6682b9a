//! GCS listing client.
//!
//! Pages through `Objects: list` with `projection=full` so every descriptor
//! carries the access-control and hash metadata the record schema needs.
//! One page per call; the pagination token drives the enumeration loop.

use async_trait::async_trait;
use reqwest::Url;
use snafu::prelude::*;
use tracing::debug;

use super::auth::Authenticator;
use super::types::{ListResponse, ObjectDescriptor};
use crate::error::{
    AuthSnafu, DecodeSnafu, InvalidEndpointSnafu, ListingError, RequestSnafu, StatusSnafu,
};

/// The production GCS endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

/// One page of raw object descriptors.
#[derive(Debug, Default)]
pub struct ObjectPage {
    pub items: Vec<ObjectDescriptor>,
    pub next_page_token: Option<String>,
}

/// A paginated bucket-listing capability.
///
/// `next_page(None)` fetches the first page; passing the previous page's
/// continuation token fetches the next one. A page without a token signals
/// exhaustion. Implementations do not retry: a failed fetch is reported
/// once and the caller decides how the run degrades.
#[async_trait]
pub trait ObjectLister: Send {
    async fn next_page(&mut self, page_token: Option<&str>)
    -> Result<ObjectPage, ListingError>;
}

/// Listing client for one bucket.
pub struct GcsClient {
    http: reqwest::Client,
    auth: Authenticator,
    endpoint: String,
    bucket: String,
    include_versions: bool,
    page_size: usize,
}

impl GcsClient {
    /// Create a client for the production endpoint with application-default
    /// credentials.
    pub fn new(bucket: impl Into<String>, include_versions: bool, page_size: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth: Authenticator::application_default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            bucket: bucket.into(),
            include_versions,
            page_size,
        }
    }

    /// Point the client at a different endpoint. Emulator endpoints are
    /// unauthenticated, so this also drops credentials.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self.auth = Authenticator::anonymous();
        self
    }

    /// Replace the authenticator (tests use a static token).
    pub fn with_authenticator(mut self, auth: Authenticator) -> Self {
        self.auth = auth;
        self
    }

    fn page_url(&self, page_token: Option<&str>) -> Result<Url, ListingError> {
        let base = format!("{}/storage/v1/b/{}/o", self.endpoint, self.bucket);
        let mut url = Url::parse(&base).context(InvalidEndpointSnafu {
            endpoint: self.endpoint.clone(),
        })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("projection", "full");
            query.append_pair("maxResults", &self.page_size.to_string());
            if self.include_versions {
                query.append_pair("versions", "true");
            }
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl ObjectLister for GcsClient {
    async fn next_page(
        &mut self,
        page_token: Option<&str>,
    ) -> Result<ObjectPage, ListingError> {
        let url = self.page_url(page_token)?;
        let token = self
            .auth
            .bearer_token(&self.http)
            .await
            .context(AuthSnafu)?;

        let mut request = self.http.get(url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.context(RequestSnafu {
            bucket: self.bucket.clone(),
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return StatusSnafu {
                bucket: self.bucket.clone(),
                status,
                body,
            }
            .fail();
        }

        let page: ListResponse = response.json().await.context(DecodeSnafu {
            bucket: self.bucket.clone(),
        })?;

        debug!(
            items = page.items.len(),
            more = page.next_page_token.is_some(),
            "Fetched listing page for bucket {}",
            self.bucket
        );

        Ok(ObjectPage {
            items: page.items,
            next_page_token: page.next_page_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn object_body(name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "bucket": "test-bucket",
            "size": "11",
            "storageClass": "STANDARD"
        })
    }

    #[tokio::test]
    async fn test_paginated_listing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/storage/v1/b/test-bucket/o"))
            .and(query_param_is_missing("pageToken"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [object_body("a.txt"), object_body("b.txt")],
                "nextPageToken": "page-2"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/storage/v1/b/test-bucket/o"))
            .and(query_param("pageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [object_body("c.txt")]
            })))
            .mount(&server)
            .await;

        let mut client = GcsClient::new("test-bucket", false, 2)
            .with_endpoint(server.uri())
            .with_authenticator(Authenticator::with_static_token("test-token"));

        let first = client.next_page(None).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.next_page_token.as_deref(), Some("page-2"));

        let second = client.next_page(Some("page-2")).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].name, "c.txt");
        assert!(second.next_page_token.is_none());
    }

    #[tokio::test]
    async fn test_versions_flag_in_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/storage/v1/b/test-bucket/o"))
            .and(query_param("versions", "true"))
            .and(query_param("projection", "full"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .mount(&server)
            .await;

        let mut client = GcsClient::new("test-bucket", true, 100).with_endpoint(server.uri());
        let page = client.next_page(None).await.unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/storage/v1/b/test-bucket/o"))
            .respond_with(
                ResponseTemplate::new(403).set_body_string("permission denied"),
            )
            .mount(&server)
            .await;

        let mut client = GcsClient::new("test-bucket", false, 100).with_endpoint(server.uri());
        let result = client.next_page(None).await;

        match result {
            Err(ListingError::Status { status, body, .. }) => {
                assert_eq!(status, 403);
                assert!(body.contains("permission denied"));
            }
            other => panic!("Expected status error, got {:?}", other.map(|p| p.items.len())),
        }
    }
}
