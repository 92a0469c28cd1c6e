//! oEmbed HTTP client
//!
//! Talks to an oEmbed-compatible lookup endpoint (noembed.com by default).
//! The endpoint answers `GET {endpoint}?format=json&url=<encoded>` with a
//! JSON document carrying `title`, `author_name` and provider-specific
//! fields such as `width`/`height`. noembed reports URLs it has no provider
//! for with a 200 response carrying an `error` field, so that case is
//! checked before the field mapping runs.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::{EmbedError, EmbedInfo, EmbedProvider};

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
    author_name: Option<String>,
    error: Option<String>,
    #[serde(flatten)]
    extra: Map<String, JsonValue>,
}

/// oEmbed lookup client
pub struct OEmbedClient {
    endpoint: String,
    metadata_fields: Vec<String>,
    http_client: reqwest::Client,
}

impl OEmbedClient {
    /// Create a new client for the given endpoint.
    ///
    /// `metadata_fields` names the oEmbed response fields that should be
    /// surfaced under the bookmark's metadata (e.g. width, height).
    pub fn new(endpoint: impl Into<String>, metadata_fields: Vec<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            endpoint: endpoint.into(),
            metadata_fields,
            http_client,
        }
    }

    async fn send_lookup_request(&self, url: &str) -> Result<OEmbedResponse, EmbedError> {
        let request_url = format!(
            "{}?format=json&url={}",
            self.endpoint,
            urlencoding::encode(url)
        );

        let response = self
            .http_client
            .get(&request_url)
            .send()
            .await
            .map_err(|e| EmbedError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        response
            .json::<OEmbedResponse>()
            .await
            .map_err(|e| EmbedError::Parse(e.to_string()))
    }

    fn to_embed_info(&self, response: OEmbedResponse) -> EmbedInfo {
        let mut metadata = Map::new();
        for field in &self.metadata_fields {
            if let Some(value) = response.extra.get(field) {
                metadata.insert(field.clone(), value.clone());
            }
        }

        EmbedInfo {
            title: response.title,
            author: response.author_name,
            metadata,
        }
    }
}

#[async_trait]
impl EmbedProvider for OEmbedClient {
    async fn get_embed_info(&self, url: &str) -> Result<EmbedInfo, EmbedError> {
        let response = self.send_lookup_request(url).await?;
        if response.error.is_some() {
            return Err(EmbedError::UnsupportedUrl(url.to_string()));
        }
        Ok(self.to_embed_info(response))
    }
}
