//! Embed Lookup Module
//!
//! The external collaborator that turns a URL into structured metadata
//! (title, author, provider fields like image dimensions). Production code
//! uses the oEmbed client; tests substitute a scripted provider through the
//! `EmbedProvider` trait.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bokmerke::embed::{EmbedProvider, OEmbedClient};
//!
//! let client = OEmbedClient::new("https://noembed.com/embed", vec!["width".into()]);
//! let info = client.get_embed_info("https://vimeo.com/900680873").await?;
//! ```

mod oembed;

pub use oembed::OEmbedClient;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};

/// Embed details for a single URL, already mapped into our shape.
#[derive(Debug, Clone, Default)]
pub struct EmbedInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub metadata: Map<String, JsonValue>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EmbedError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("lookup returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse lookup response: {0}")]
    Parse(String),

    #[error("no embed data available for url: {0}")]
    UnsupportedUrl(String),
}

/// Trait for embed metadata lookup.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait EmbedProvider: Send + Sync {
    /// Retrieve embed information for the given URL.
    async fn get_embed_info(&self, url: &str) -> Result<EmbedInfo, EmbedError>;
}
