use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: Option<i64>,
    pub url: String,
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, JsonValue>,
    pub created_at: Option<String>,
}

impl Bookmark {
    pub fn with_url(url: impl Into<String>) -> Self {
        Bookmark {
            id: None,
            url: url.into(),
            title: None,
            author: None,
            metadata: Map::new(),
            created_at: None,
        }
    }

    // Set-if-absent: a second call never overwrites the stored timestamp.
    pub fn set_created_at_if_absent(&mut self) {
        if self.created_at.is_none() {
            self.created_at = Some(Utc::now().to_rfc3339());
        }
    }

    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn has_author(&self) -> bool {
        self.author.as_deref().is_some_and(|a| !a.is_empty())
    }

    pub fn has_metadata(&self) -> bool {
        !self.metadata.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkInput {
    pub url: Option<String>,
}
