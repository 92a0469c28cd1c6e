use std::sync::Arc;

use axum::http::Method;
use axum::{Router, routing::get};
use bokmerke::bookmarks;
use bokmerke::config::{Cli, Config, default_config_dir, default_config_path};
use bokmerke::db::Database;
use bokmerke::embed::{EmbedProvider, OEmbedClient};
use bokmerke::handler::{AppState, healthcheck};
use clap::Parser;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    // Determine config path and data directory
    // If --config is provided, use its parent directory for data (database, etc.)
    // Otherwise use ~/.bokmerke/ for both
    let (config_path, data_dir) = match args.config_path {
        Some(path) => {
            let path = std::path::PathBuf::from(path);
            let dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| std::path::PathBuf::from("."));
            (path, dir)
        }
        None => {
            let dir = default_config_dir();
            (default_config_path(), dir)
        }
    };

    // Ensure data directory exists
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("failed to create data directory {:?}: {}", data_dir, e);
        std::process::exit(1);
    }

    tracing_subscriber::fmt().json().init();
    tracing::info!("bokmerke.svc starting");

    let cfg = Config::new(config_path.to_str().unwrap()).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?config_path, "failed to load config file");
        std::process::exit(1);
    });
    let db = Arc::new(Database::new(&cfg, &data_dir).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup database");
        std::process::exit(1);
    }));
    let embed: Arc<dyn EmbedProvider> = Arc::new(OEmbedClient::new(
        cfg.embed.endpoint.clone(),
        cfg.embed.metadata_fields.clone(),
    ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(healthcheck))
        .nest("/bookmarks", bookmarks::routes())
        .layer(cors)
        .with_state(AppState {
            db,
            embed,
            allowed_domains: Arc::new(cfg.bookmarks.allowed_domains.clone()),
        });

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    tracing::info!("bokmerke.svc running on {}", &address);
    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(err) = result {
                tracing::error!(error = %err, "server exited with error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            tracing::info!("ctrl+c signal received, shutting down");
        }
    }

    tracing::info!("bokmerke.svc going off, graceful shutdown complete");
}
