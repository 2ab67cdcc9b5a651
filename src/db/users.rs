//! User queries: paginated list, detail with issue count, create.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, OptionalExtension};

use crate::models::{User, UserWithCount};

use super::{parse_datetime, Database};

/// List one page of users ordered newest-first, with the total row count.
pub fn list(db: &Database, page: u32, limit: u32) -> Result<(Vec<User>, u64)> {
  let conn = db.conn()?;
  let offset = u64::from(page.saturating_sub(1)) * u64::from(limit);

  let mut stmt = conn
    .prepare(
      "SELECT id, name, created_at FROM users
       ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
    )
    .map_err(|e| eyre!("Failed to prepare user query: {}", e))?;

  let rows: Vec<(i64, String, String)> = stmt
    .query_map(params![limit, offset], |row| {
      Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    })
    .map_err(|e| eyre!("Failed to query users: {}", e))?
    .collect::<rusqlite::Result<_>>()
    .map_err(|e| eyre!("Failed to read user row: {}", e))?;

  let total: i64 = conn
    .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
    .map_err(|e| eyre!("Failed to count users: {}", e))?;

  let users = rows
    .into_iter()
    .map(|(id, name, created_at)| {
      Ok(User {
        id,
        name,
        created_at: parse_datetime(&created_at)?,
      })
    })
    .collect::<Result<Vec<_>>>()?;

  Ok((users, total as u64))
}

/// Get a single user with the number of issues they own.
pub fn get(db: &Database, id: i64) -> Result<Option<UserWithCount>> {
  let conn = db.conn()?;

  let row: Option<(i64, String, String, i64)> = conn
    .query_row(
      "SELECT u.id, u.name, u.created_at,
              (SELECT COUNT(*) FROM issues i WHERE i.user_id = u.id)
       FROM users u WHERE u.id = ?",
      params![id],
      |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )
    .optional()
    .map_err(|e| eyre!("Failed to fetch user {}: {}", id, e))?;

  match row {
    Some((id, name, created_at, issues_count)) => Ok(Some(UserWithCount {
      id,
      name,
      created_at: parse_datetime(&created_at)?,
      issues_count,
    })),
    None => Ok(None),
  }
}

/// Insert a new user and return the stored row.
pub fn create(db: &Database, name: &str) -> Result<User> {
  let conn = db.conn()?;

  conn
    .execute("INSERT INTO users (name) VALUES (?)", params![name])
    .map_err(|e| eyre!("Failed to insert user: {}", e))?;

  let id = conn.last_insert_rowid();

  let (name, created_at): (String, String) = conn
    .query_row(
      "SELECT name, created_at FROM users WHERE id = ?",
      params![id],
      |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .map_err(|e| eyre!("Inserted user {} not found: {}", id, e))?;

  Ok(User {
    id,
    name,
    created_at: parse_datetime(&created_at)?,
  })
}
