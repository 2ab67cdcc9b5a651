//! Cache key derivation for paginated list queries.

/// Types that identify a cacheable query.
pub trait QueryKey {
  /// Stable cache key derived from the query's identifying parameters.
  fn cache_key(&self) -> String;

  /// Human-readable description for logging.
  fn description(&self) -> String;
}

/// Sentinel used in place of the owner filter when no filter is applied.
///
/// Cannot collide with a real filter value: the filter is a numeric user id.
const NO_FILTER: &str = "all";

/// Query keys for the paginated list endpoints.
///
/// Keys concatenate the collection name and the query parameters with a fixed
/// `:` delimiter, e.g. `issues:1:20:all` or `issues:1:20:7`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListKey {
  /// List issues, optionally filtered by owning user
  Issues {
    page: u32,
    limit: u32,
    user_id: Option<i64>,
  },
  /// List users
  Users { page: u32, limit: u32 },
}

impl QueryKey for ListKey {
  fn cache_key(&self) -> String {
    match self {
      Self::Issues {
        page,
        limit,
        user_id,
      } => {
        let filter = user_id.map_or_else(|| NO_FILTER.to_string(), |id| id.to_string());
        format!("issues:{}:{}:{}", page, limit, filter)
      }
      Self::Users { page, limit } => format!("users:{}:{}", page, limit),
    }
  }

  fn description(&self) -> String {
    match self {
      Self::Issues {
        page,
        limit,
        user_id: Some(id),
      } => format!("issues page {} (limit {}) for user {}", page, limit, id),
      Self::Issues { page, limit, .. } => format!("issues page {} (limit {})", page, limit),
      Self::Users { page, limit } => format!("users page {} (limit {})", page, limit),
    }
  }
}
