//! Router construction and the serve loop.

use axum::routing::get;
use axum::Router;
use color_eyre::Result;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{health, issues, users, AppState};

/// Listener configuration for the API server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: "127.0.0.1".to_string(),
      port: 3333,
    }
  }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/issues", get(issues::list).post(issues::create))
    .route(
      "/issues/:id",
      get(issues::detail).put(issues::update).delete(issues::remove),
    )
    .route("/users", get(users::list).post(users::create))
    .route("/users/:id", get(users::detail))
    .route("/health", get(health::health))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
  let app = router(state);

  let addr = format!("{}:{}", config.host, config.port);
  info!("Listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(&addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
