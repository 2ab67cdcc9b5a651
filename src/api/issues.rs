//! Issue endpoints. The list endpoint is the only cached read; every write
//! invalidates the whole cache after its mutation commits.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::cache::{ListKey, QueryKey};
use crate::db;
use crate::models::{Issue, IssueUpdate, IssueWithUser, NewIssue, Page, Pagination};

use super::error::{ApiError, ApiResult};
use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
  page: Option<u32>,
  limit: Option<u32>,
  user_id: Option<i64>,
}

fn validate_title(title: &str) -> ApiResult<()> {
  if title.is_empty() || title.chars().count() > 255 {
    return Err(ApiError::Validation(
      "title must be between 1 and 255 characters".to_string(),
    ));
  }
  Ok(())
}

/// `GET /issues?page&limit&userId`: paginated list, served through the
/// read-through cache with an `X-Cache: HIT|MISS` header.
pub async fn list(
  State(state): State<AppState>,
  Query(query): Query<ListQuery>,
) -> ApiResult<Response> {
  let page = query.page.unwrap_or(1);
  let limit = query.limit.unwrap_or(20);

  if page < 1 {
    return Err(ApiError::Validation("page must be positive".to_string()));
  }
  if !(1..=100).contains(&limit) {
    return Err(ApiError::Validation(
      "limit must be between 1 and 100".to_string(),
    ));
  }
  if query.user_id.is_some_and(|id| id < 1) {
    return Err(ApiError::Validation("userId must be positive".to_string()));
  }

  let key = ListKey::Issues {
    page,
    limit,
    user_id: query.user_id,
  };

  let (value, outcome) = state
    .cache
    .fetch_or_compute(&key, || {
      let db = state.db.clone();
      let user_id = query.user_id;
      async move {
        let (issues, total) = db::issues::list(&db, page, limit, user_id)?;
        let body = Page {
          data: issues,
          pagination: Pagination::new(page, limit, total),
        };
        Ok(serde_json::to_value(body)?)
      }
    })
    .await?;

  debug!("{} for {}", outcome.header_value(), key.description());

  Ok(([("x-cache", outcome.header_value())], Json(value)).into_response())
}

/// `GET /issues/:id`: issue detail with its owning user.
pub async fn detail(
  State(state): State<AppState>,
  Path(id): Path<i64>,
) -> ApiResult<Json<IssueWithUser>> {
  match db::issues::get(&state.db, id)? {
    Some(issue) => Ok(Json(issue)),
    None => Err(ApiError::NotFound("Issue not found".to_string())),
  }
}

/// `POST /issues`: create an issue, then invalidate the list cache.
pub async fn create(
  State(state): State<AppState>,
  Json(new): Json<NewIssue>,
) -> ApiResult<(StatusCode, Json<Issue>)> {
  validate_title(&new.title)?;
  if new.user_id < 1 {
    return Err(ApiError::Validation("userId must be positive".to_string()));
  }

  let issue = db::issues::create(&state.db, &new)?;
  state.cache.clear()?;

  Ok((StatusCode::CREATED, Json(issue)))
}

/// `PUT /issues/:id`: partial update. The cache is cleared only after a
/// successful update; a 404 leaves it untouched.
pub async fn update(
  State(state): State<AppState>,
  Path(id): Path<i64>,
  Json(changes): Json<IssueUpdate>,
) -> ApiResult<Json<Issue>> {
  if let Some(title) = &changes.title {
    validate_title(title)?;
  }
  if changes.user_id.is_some_and(|uid| uid < 1) {
    return Err(ApiError::Validation("userId must be positive".to_string()));
  }

  match db::issues::update(&state.db, id, &changes)? {
    Some(issue) => {
      state.cache.clear()?;
      Ok(Json(issue))
    }
    None => Err(ApiError::NotFound("Issue not found".to_string())),
  }
}

/// `DELETE /issues/:id`: delete, then invalidate the list cache.
pub async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
  if db::issues::delete(&state.db, id)? {
    state.cache.clear()?;
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound("Issue not found".to_string()))
  }
}
