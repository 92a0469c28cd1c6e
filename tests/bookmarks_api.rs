//! End-to-end tests for the bookmarks API.
//!
//! Spawns the real router on an ephemeral listener with an in-memory
//! database and a scripted embed provider, then drives it over HTTP:
//!
//! - POST with an allowed URL succeeds and returns the enriched entity
//! - POST with a disallowed domain (e.g. "https://john.doe") returns 422
//! - GET the collection succeeds
//! - GET an existing bookmark by id succeeds
//! - GET a non-existent bookmark returns 404
//! - DELETE an existing bookmark succeeds
//! - DELETE a non-existent bookmark returns 404
//! - a failing embed lookup returns 502 and persists nothing

use std::sync::Arc;

use async_trait::async_trait;
use axum::{Router, routing::get};
use bokmerke::bookmarks;
use bokmerke::db::Database;
use bokmerke::embed::{EmbedError, EmbedInfo, EmbedProvider};
use bokmerke::handler::{AppState, healthcheck};
use serde_json::{Value, json};

struct ScriptedEmbed {
    result: Result<EmbedInfo, EmbedError>,
}

impl ScriptedEmbed {
    fn vimeo_like() -> Self {
        let mut metadata = serde_json::Map::new();
        metadata.insert("width".to_string(), json!(640));
        metadata.insert("height".to_string(), json!(360));

        Self {
            result: Ok(EmbedInfo {
                title: Some("Sample Video".to_string()),
                author: Some("Jane Doe".to_string()),
                metadata,
            }),
        }
    }

    fn failing() -> Self {
        Self {
            result: Err(EmbedError::Http("connection refused".to_string())),
        }
    }
}

#[async_trait]
impl EmbedProvider for ScriptedEmbed {
    async fn get_embed_info(&self, _url: &str) -> Result<EmbedInfo, EmbedError> {
        self.result.clone()
    }
}

async fn spawn_app(embed: Arc<dyn EmbedProvider>) -> String {
    let db = Arc::new(Database::open_in_memory().await.unwrap());
    let state = AppState {
        db,
        embed,
        allowed_domains: Arc::new(vec![
            "vimeo.com".to_string(),
            "flickr.com".to_string(),
            "flic.kr".to_string(),
        ]),
    };

    let app = Router::new()
        .route("/", get(healthcheck))
        .nest("/bookmarks", bookmarks::routes())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn post_bookmark(base: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/bookmarks", base))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_healthcheck() {
    let base = spawn_app(Arc::new(ScriptedEmbed::vimeo_like())).await;

    let response = reqwest::get(&base).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_bookmark_returns_enriched_entity() {
    let base = spawn_app(Arc::new(ScriptedEmbed::vimeo_like())).await;

    let response = post_bookmark(&base, json!({ "url": "https://vimeo.com/900680873" })).await;
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.unwrap();
    assert!(body["id"].as_i64().is_some());
    assert_eq!(body["url"], "https://vimeo.com/900680873");
    assert_eq!(body["title"], "Sample Video");
    assert_eq!(body["author"], "Jane Doe");
    assert_eq!(body["metadata"]["width"], 640);
    assert_eq!(body["metadata"]["height"], 360);
    assert!(body["created_at"].as_str().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn test_create_bookmark_accepts_short_link_domain() {
    let base = spawn_app(Arc::new(ScriptedEmbed::vimeo_like())).await;

    let response = post_bookmark(&base, json!({ "url": "https://flic.kr/p/2gPAGVq" })).await;
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_create_bookmark_accepts_subdomain_of_allowed_domain() {
    let base = spawn_app(Arc::new(ScriptedEmbed::vimeo_like())).await;

    let response = post_bookmark(&base, json!({ "url": "https://player.vimeo.com/video/1" })).await;
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_create_bookmark_with_disallowed_domain_returns_422() {
    let base = spawn_app(Arc::new(ScriptedEmbed::vimeo_like())).await;

    let response = post_bookmark(&base, json!({ "url": "https://john.doe" })).await;
    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.unwrap();
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("john.doe"), "error should name the domain: {}", error);
}

#[tokio::test]
async fn test_create_bookmark_with_blank_url_returns_422() {
    let base = spawn_app(Arc::new(ScriptedEmbed::vimeo_like())).await;

    let response = post_bookmark(&base, json!({})).await;
    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "The URL must not be blank.");
}

#[tokio::test]
async fn test_create_bookmark_with_malformed_url_returns_422() {
    let base = spawn_app(Arc::new(ScriptedEmbed::vimeo_like())).await;

    let response = post_bookmark(&base, json!({ "url": "not a url" })).await;
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn test_get_bookmarks_collection() {
    let base = spawn_app(Arc::new(ScriptedEmbed::vimeo_like())).await;

    let created = post_bookmark(&base, json!({ "url": "https://vimeo.com/900680873" })).await;
    assert_eq!(created.status(), 201);

    let response = reqwest::get(format!("{}/bookmarks", base)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["url"], "https://vimeo.com/900680873");
    assert_eq!(items[0]["metadata"]["width"], 640);
    assert_eq!(items[0]["metadata"]["height"], 360);
}

#[tokio::test]
async fn test_get_bookmark_by_id() {
    let base = spawn_app(Arc::new(ScriptedEmbed::vimeo_like())).await;

    let created = post_bookmark(&base, json!({ "url": "https://vimeo.com/900680873" })).await;
    let id = created.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    let response = reqwest::get(format!("{}/bookmarks/{}", base, id)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"].as_i64(), Some(id));
}

#[tokio::test]
async fn test_get_missing_bookmark_returns_404() {
    let base = spawn_app(Arc::new(ScriptedEmbed::vimeo_like())).await;

    let response = reqwest::get(format!("{}/bookmarks/99", base)).await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_delete_bookmark() {
    let base = spawn_app(Arc::new(ScriptedEmbed::vimeo_like())).await;

    let created = post_bookmark(&base, json!({ "url": "https://vimeo.com/900680873" })).await;
    let id = created.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    let client = reqwest::Client::new();
    let response = client
        .delete(format!("{}/bookmarks/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = reqwest::get(format!("{}/bookmarks/{}", base, id)).await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_delete_missing_bookmark_returns_404() {
    let base = spawn_app(Arc::new(ScriptedEmbed::vimeo_like())).await;

    let response = reqwest::Client::new()
        .delete(format!("{}/bookmarks/99", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_provider_failure_returns_502_and_persists_nothing() {
    let base = spawn_app(Arc::new(ScriptedEmbed::failing())).await;

    let response = post_bookmark(&base, json!({ "url": "https://vimeo.com/900680873" })).await;
    assert_eq!(response.status(), 502);

    let collection = reqwest::get(format!("{}/bookmarks", base)).await.unwrap();
    let body: Value = collection.json().await.unwrap();
    assert!(body.as_array().unwrap().is_empty());
}
