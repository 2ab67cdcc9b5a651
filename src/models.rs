//! Domain types shared between the store and the API layer.
//!
//! Wire names are camelCase to match the JSON the frontend consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
  pub id: i64,
  pub title: String,
  pub description: Option<String>,
  pub user_id: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// A user that can own issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: i64,
  pub name: String,
  pub created_at: DateTime<Utc>,
}

/// Issue detail with its owning user joined in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueWithUser {
  pub id: i64,
  pub title: String,
  pub description: Option<String>,
  pub user_id: i64,
  pub created_at: DateTime<Utc>,
  pub user: UserRef,
}

/// Minimal user reference embedded in issue detail responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
  pub id: i64,
  pub name: String,
}

/// User detail with the number of issues they own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithCount {
  pub id: i64,
  pub name: String,
  pub created_at: DateTime<Utc>,
  pub issues_count: i64,
}

/// Fields required to create an issue.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
  pub title: String,
  pub description: Option<String>,
  pub user_id: i64,
}

/// Partial update for an issue. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueUpdate {
  pub title: Option<String>,
  pub description: Option<String>,
  pub user_id: Option<i64>,
}

/// One page of records plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
  pub data: Vec<T>,
  pub pagination: Pagination,
}

/// Pagination metadata for list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub page: u32,
  pub limit: u32,
  pub total: u64,
  pub total_pages: u32,
}

impl Pagination {
  /// Build pagination metadata, rounding the page count up.
  pub fn new(page: u32, limit: u32, total: u64) -> Self {
    let total_pages = if limit == 0 {
      0
    } else {
      total.div_ceil(u64::from(limit)) as u32
    };
    Self {
      page,
      limit,
      total,
      total_pages,
    }
  }
}
