//! TRPG Sheet Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trpgsheet_engine::app::{App, Repositories};
use trpgsheet_engine::config::{ServerConfig, StorageBackend};
use trpgsheet_engine::infrastructure::{memory::InMemoryStore, sqlite::SqliteRepositories};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trpgsheet_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting TRPG Sheet Engine");

    let config = ServerConfig::from_env()?;

    let repositories = match &config.storage {
        StorageBackend::Sqlite { path } => {
            tracing::info!(path = %path, "Opening SQLite sheet database");
            Repositories::sqlite(SqliteRepositories::open(path).await?)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; sheets are lost on restart");
            Repositories::in_memory(Arc::new(InMemoryStore::new()))
        }
    };

    let app = Arc::new(App::new(repositories, config.level_up_plan_ttl));
    tracing::info!(
        ttl_secs = config.level_up_plan_ttl.as_secs(),
        "Level-up plans expire after TTL"
    );

    // Spawn pending plan cleanup
    let cleanup_app = app.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let removed = cleanup_app
                .stores
                .pending_level_ups
                .cleanup_expired()
                .await;
            if removed > 0 {
                tracing::debug!(removed, "Dropped expired level-up plans");
            }
        }
    });

    let mut router = trpgsheet_engine::api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
