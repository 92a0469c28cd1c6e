use std::sync::Arc;

use axum::{Json, response::IntoResponse};
use tracing::info;

use crate::db::Database;
use crate::embed::EmbedProvider;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub embed: Arc<dyn EmbedProvider>,
    pub allowed_domains: Arc<Vec<String>>,
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(serde_json::json!({ "status": "ok" }))
}
