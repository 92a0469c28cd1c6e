//! Bookmark processing pipeline.
//!
//! The create flow is an explicit sequence of stages sharing one small
//! interface: the input transformer turns the raw DTO into a draft entity,
//! the enricher fills missing fields from the embed provider and persists,
//! and the composite runs the two in order. Deletion is its own stage. A
//! failure in any stage aborts the whole invocation; nothing is stored for
//! a request whose embed lookup failed.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};

use crate::db::Database;
use crate::embed::EmbedProvider;
use crate::error::ProcessorError;
use crate::model::{Bookmark, BookmarkInput};

/// What flows between stages. Stages that receive the wrong variant fail
/// with a type mismatch naming both shapes.
#[derive(Debug)]
pub enum ProcessorData {
    Input(BookmarkInput),
    Bookmark(Bookmark),
}

impl ProcessorData {
    pub fn type_name(&self) -> &'static str {
        match self {
            ProcessorData::Input(_) => "BookmarkInput",
            ProcessorData::Bookmark(_) => "Bookmark",
        }
    }
}

#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(&self, data: ProcessorData) -> Result<Bookmark, ProcessorError>;
}

/// Turns a `BookmarkInput` into a draft entity. An entity passed back in is
/// returned unchanged, so re-entering the pipeline is harmless.
pub struct InputTransformer;

#[async_trait]
impl Processor for InputTransformer {
    async fn process(&self, data: ProcessorData) -> Result<Bookmark, ProcessorError> {
        let input = match data {
            ProcessorData::Bookmark(bookmark) => return Ok(bookmark),
            ProcessorData::Input(input) => input,
        };

        let url = input.url.unwrap_or_default();
        if url.is_empty() {
            return Err(ProcessorError::Validation("Url not defined.".to_string()));
        }

        Ok(Bookmark::with_url(url))
    }
}

/// Fills missing fields from the embed provider and persists the entity.
pub struct EnricherProcessor {
    db: Arc<Database>,
    embed: Arc<dyn EmbedProvider>,
}

impl EnricherProcessor {
    pub fn new(db: Arc<Database>, embed: Arc<dyn EmbedProvider>) -> Self {
        Self { db, embed }
    }

    fn needs_enrichment(bookmark: &Bookmark) -> bool {
        !bookmark.url.is_empty()
            && (!bookmark.has_title() || !bookmark.has_author() || !bookmark.has_metadata())
    }
}

fn is_falsy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(a) => a.is_empty(),
        JsonValue::Object(o) => o.is_empty(),
    }
}

fn filter_falsy(metadata: Map<String, JsonValue>) -> Map<String, JsonValue> {
    metadata.into_iter().filter(|(_, v)| !is_falsy(v)).collect()
}

#[async_trait]
impl Processor for EnricherProcessor {
    async fn process(&self, data: ProcessorData) -> Result<Bookmark, ProcessorError> {
        let mut bookmark = match data {
            ProcessorData::Bookmark(bookmark) => bookmark,
            other => {
                return Err(ProcessorError::TypeMismatch {
                    expected: "Bookmark",
                    actual: other.type_name(),
                });
            }
        };

        // Already fully populated (or nothing to look up): neither the
        // provider nor the store is touched.
        if !Self::needs_enrichment(&bookmark) {
            return Ok(bookmark);
        }

        let info = self.embed.get_embed_info(&bookmark.url).await?;

        if !bookmark.has_title() {
            if let Some(title) = info.title.filter(|t| !t.is_empty()) {
                bookmark.title = Some(title);
            }
        }

        if !bookmark.has_author() {
            if let Some(author) = info.author.filter(|a| !a.is_empty()) {
                bookmark.author = Some(author);
            }
        }

        if !bookmark.has_metadata() {
            bookmark.metadata = filter_falsy(info.metadata);
        }

        self.db.save_bookmark(&mut bookmark).await?;

        Ok(bookmark)
    }
}

/// The create flow: transformer, then enricher.
pub struct CompositeProcessor {
    transformer: InputTransformer,
    enricher: EnricherProcessor,
}

impl CompositeProcessor {
    pub fn new(db: Arc<Database>, embed: Arc<dyn EmbedProvider>) -> Self {
        Self {
            transformer: InputTransformer,
            enricher: EnricherProcessor::new(db, embed),
        }
    }
}

#[async_trait]
impl Processor for CompositeProcessor {
    async fn process(&self, data: ProcessorData) -> Result<Bookmark, ProcessorError> {
        let entity = self.transformer.process(data).await?;
        self.enricher.process(ProcessorData::Bookmark(entity)).await
    }
}

/// Removes the entity by id and echoes it back for the response.
pub struct DeleteProcessor {
    db: Arc<Database>,
}

impl DeleteProcessor {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Processor for DeleteProcessor {
    async fn process(&self, data: ProcessorData) -> Result<Bookmark, ProcessorError> {
        let bookmark = match data {
            ProcessorData::Bookmark(bookmark) => bookmark,
            other => {
                return Err(ProcessorError::TypeMismatch {
                    expected: "Bookmark",
                    actual: other.type_name(),
                });
            }
        };

        let Some(id) = bookmark.id else {
            return Err(ProcessorError::Storage(anyhow::anyhow!(
                "bookmark has no id"
            )));
        };

        self.db.delete_bookmark(id).await?;

        Ok(bookmark)
    }
}
