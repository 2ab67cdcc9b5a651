//! User endpoints. These reads are not cached: user lists are small and
//! rarely re-requested compared to the issue list.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::db;
use crate::models::{Page, Pagination, User, UserWithCount};

use super::error::{ApiError, ApiResult};
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
  page: Option<u32>,
  limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct NewUser {
  name: String,
}

/// `GET /users?page&limit`: paginated list.
pub async fn list(
  State(state): State<AppState>,
  Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<User>>> {
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

  let (users, total) = db::users::list(&state.db, page, limit)?;

  Ok(Json(Page {
    data: users,
    pagination: Pagination::new(page, limit, total),
  }))
}

/// `GET /users/:id`: user detail with their issue count.
pub async fn detail(
  State(state): State<AppState>,
  Path(id): Path<i64>,
) -> ApiResult<Json<UserWithCount>> {
  match db::users::get(&state.db, id)? {
    Some(user) => Ok(Json(user)),
    None => Err(ApiError::NotFound("User not found".to_string())),
  }
}

/// `POST /users`: create a user.
pub async fn create(
  State(state): State<AppState>,
  Json(new): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
  if new.name.is_empty() || new.name.chars().count() > 255 {
    return Err(ApiError::Validation(
      "name must be between 1 and 255 characters".to_string(),
    ));
  }

  let user = db::users::create(&state.db, &new.name)?;
  Ok((StatusCode::CREATED, Json(user)))
}
