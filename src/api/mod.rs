//! HTTP API: routing, handlers, and error translation.

mod error;
mod health;
mod issues;
mod server;
mod users;

pub use error::{ApiError, ApiResult};
pub use server::{router, serve, ServerConfig};

use std::sync::Arc;
use std::time::Instant;

use crate::cache::ResponseCache;
use crate::db::Database;

/// Shared state threaded into every handler.
///
/// Constructed once at startup; the cache lives here for the process
/// lifetime rather than in any global.
#[derive(Clone)]
pub struct AppState {
  pub db: Arc<Database>,
  pub cache: ResponseCache,
  pub started: Instant,
}

impl AppState {
  pub fn new(db: Arc<Database>, cache: ResponseCache) -> Self {
    Self {
      db,
      cache,
      started: Instant::now(),
    }
  }
}
