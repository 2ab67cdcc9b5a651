//! Issue queries: paginated list, detail with owner, create, update, delete.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{Issue, IssueUpdate, IssueWithUser, NewIssue, UserRef};

use super::{parse_datetime, Database};

type IssueRow = (i64, String, Option<String>, i64, String, Option<String>);

fn issue_from_row(row: IssueRow) -> Result<Issue> {
  let (id, title, description, user_id, created_at, updated_at) = row;
  Ok(Issue {
    id,
    title,
    description,
    user_id,
    created_at: parse_datetime(&created_at)?,
    updated_at: updated_at.as_deref().map(parse_datetime).transpose()?,
  })
}

fn fetch_issue(conn: &Connection, id: i64) -> Result<Option<Issue>> {
  let row: Option<IssueRow> = conn
    .query_row(
      "SELECT id, title, description, user_id, created_at, updated_at
       FROM issues WHERE id = ?",
      params![id],
      |row| {
        Ok((
          row.get(0)?,
          row.get(1)?,
          row.get(2)?,
          row.get(3)?,
          row.get(4)?,
          row.get(5)?,
        ))
      },
    )
    .optional()
    .map_err(|e| eyre!("Failed to fetch issue {}: {}", id, e))?;

  row.map(issue_from_row).transpose()
}

/// List one page of issues ordered newest-first, with the total row count.
///
/// `user_id` filters to a single owner when present.
pub fn list(
  db: &Database,
  page: u32,
  limit: u32,
  user_id: Option<i64>,
) -> Result<(Vec<Issue>, u64)> {
  let conn = db.conn()?;
  let offset = u64::from(page.saturating_sub(1)) * u64::from(limit);

  let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<IssueRow> {
    Ok((
      row.get(0)?,
      row.get(1)?,
      row.get(2)?,
      row.get(3)?,
      row.get(4)?,
      row.get(5)?,
    ))
  };

  let rows: Vec<IssueRow> = match user_id {
    Some(uid) => {
      let mut stmt = conn
        .prepare(
          "SELECT id, title, description, user_id, created_at, updated_at
           FROM issues WHERE user_id = ?
           ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .map_err(|e| eyre!("Failed to prepare issue query: {}", e))?;
      let rows = stmt
        .query_map(params![uid, limit, offset], map_row)
        .map_err(|e| eyre!("Failed to query issues: {}", e))?
        .collect::<rusqlite::Result<_>>()
        .map_err(|e| eyre!("Failed to read issue row: {}", e))?;
      rows
    }
    None => {
      let mut stmt = conn
        .prepare(
          "SELECT id, title, description, user_id, created_at, updated_at
           FROM issues
           ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .map_err(|e| eyre!("Failed to prepare issue query: {}", e))?;
      let rows = stmt
        .query_map(params![limit, offset], map_row)
        .map_err(|e| eyre!("Failed to query issues: {}", e))?
        .collect::<rusqlite::Result<_>>()
        .map_err(|e| eyre!("Failed to read issue row: {}", e))?;
      rows
    }
  };

  let total: i64 = match user_id {
    Some(uid) => conn.query_row(
      "SELECT COUNT(*) FROM issues WHERE user_id = ?",
      params![uid],
      |row| row.get(0),
    ),
    None => conn.query_row("SELECT COUNT(*) FROM issues", [], |row| row.get(0)),
  }
  .map_err(|e| eyre!("Failed to count issues: {}", e))?;

  let issues = rows
    .into_iter()
    .map(issue_from_row)
    .collect::<Result<Vec<_>>>()?;

  Ok((issues, total as u64))
}

/// Get a single issue with its owning user joined in.
pub fn get(db: &Database, id: i64) -> Result<Option<IssueWithUser>> {
  let conn = db.conn()?;

  let row: Option<(i64, String, Option<String>, i64, String, i64, String)> = conn
    .query_row(
      "SELECT i.id, i.title, i.description, i.user_id, i.created_at, u.id, u.name
       FROM issues i
       INNER JOIN users u ON u.id = i.user_id
       WHERE i.id = ?",
      params![id],
      |row| {
        Ok((
          row.get(0)?,
          row.get(1)?,
          row.get(2)?,
          row.get(3)?,
          row.get(4)?,
          row.get(5)?,
          row.get(6)?,
        ))
      },
    )
    .optional()
    .map_err(|e| eyre!("Failed to fetch issue {}: {}", id, e))?;

  match row {
    Some((id, title, description, user_id, created_at, uid, name)) => Ok(Some(IssueWithUser {
      id,
      title,
      description,
      user_id,
      created_at: parse_datetime(&created_at)?,
      user: UserRef { id: uid, name },
    })),
    None => Ok(None),
  }
}

/// Insert a new issue and return the stored row.
pub fn create(db: &Database, new: &NewIssue) -> Result<Issue> {
  let conn = db.conn()?;

  conn
    .execute(
      "INSERT INTO issues (title, description, user_id) VALUES (?, ?, ?)",
      params![new.title, new.description, new.user_id],
    )
    .map_err(|e| eyre!("Failed to insert issue: {}", e))?;

  let id = conn.last_insert_rowid();
  fetch_issue(&conn, id)?.ok_or_else(|| eyre!("Inserted issue {} not found", id))
}

/// Apply a partial update. Returns the updated row, or None if the issue
/// does not exist.
pub fn update(db: &Database, id: i64, update: &IssueUpdate) -> Result<Option<Issue>> {
  let conn = db.conn()?;

  let Some(existing) = fetch_issue(&conn, id)? else {
    return Ok(None);
  };

  // Absent fields keep their current values.
  let title = update.title.clone().unwrap_or(existing.title);
  let description = update.description.clone().or(existing.description);
  let user_id = update.user_id.unwrap_or(existing.user_id);

  conn
    .execute(
      "UPDATE issues SET title = ?, description = ?, user_id = ?, updated_at = datetime('now')
       WHERE id = ?",
      params![title, description, user_id, id],
    )
    .map_err(|e| eyre!("Failed to update issue {}: {}", id, e))?;

  fetch_issue(&conn, id)
}

/// Delete an issue. Returns false when no row matched.
pub fn delete(db: &Database, id: i64) -> Result<bool> {
  let conn = db.conn()?;

  let affected = conn
    .execute("DELETE FROM issues WHERE id = ?", params![id])
    .map_err(|e| eyre!("Failed to delete issue {}: {}", id, e))?;

  Ok(affected > 0)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::users;

  fn test_db() -> (Database, i64) {
    let db = Database::open_in_memory().unwrap();
    let user = users::create(&db, "Ada Lovelace").unwrap();
    (db, user.id)
  }

  fn new_issue(user_id: i64, title: &str) -> NewIssue {
    NewIssue {
      title: title.to_string(),
      description: None,
      user_id,
    }
  }

  #[test]
  fn test_create_and_get() {
    let (db, user_id) = test_db();

    let created = create(
      &db,
      &NewIssue {
        title: "Fix login".to_string(),
        description: Some("Session expires too early".to_string()),
        user_id,
      },
    )
    .unwrap();

    let fetched = get(&db, created.id).unwrap().unwrap();
    assert_eq!(fetched.title, "Fix login");
    assert_eq!(fetched.description.as_deref(), Some("Session expires too early"));
    assert_eq!(fetched.user.name, "Ada Lovelace");
  }

  #[test]
  fn test_get_missing_returns_none() {
    let (db, _) = test_db();
    assert!(get(&db, 9999).unwrap().is_none());
  }

  #[test]
  fn test_list_orders_newest_first() {
    let (db, user_id) = test_db();
    for i in 1..=3 {
      create(&db, &new_issue(user_id, &format!("Issue {}", i))).unwrap();
    }

    let (issues, total) = list(&db, 1, 20, None).unwrap();
    assert_eq!(total, 3);
    assert_eq!(issues[0].title, "Issue 3");
    assert_eq!(issues[2].title, "Issue 1");
  }

  #[test]
  fn test_list_paginates() {
    let (db, user_id) = test_db();
    for i in 1..=5 {
      create(&db, &new_issue(user_id, &format!("Issue {}", i))).unwrap();
    }

    let (page1, total) = list(&db, 1, 2, None).unwrap();
    let (page3, _) = list(&db, 3, 2, None).unwrap();

    assert_eq!(total, 5);
    assert_eq!(page1.len(), 2);
    assert_eq!(page3.len(), 1);
    assert_eq!(page3[0].title, "Issue 1");
  }

  #[test]
  fn test_list_filters_by_user() {
    let (db, ada) = test_db();
    let grace = users::create(&db, "Grace Hopper").unwrap();

    create(&db, &new_issue(ada, "Ada's issue")).unwrap();
    create(&db, &new_issue(grace.id, "Grace's issue")).unwrap();

    let (issues, total) = list(&db, 1, 20, Some(grace.id)).unwrap();
    assert_eq!(total, 1);
    assert_eq!(issues[0].title, "Grace's issue");
  }

  #[test]
  fn test_update_partial() {
    let (db, user_id) = test_db();
    let created = create(
      &db,
      &NewIssue {
        title: "Original".to_string(),
        description: Some("Keep me".to_string()),
        user_id,
      },
    )
    .unwrap();

    let updated = update(
      &db,
      created.id,
      &IssueUpdate {
        title: Some("Renamed".to_string()),
        ..IssueUpdate::default()
      },
    )
    .unwrap()
    .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.description.as_deref(), Some("Keep me"));
    assert!(updated.updated_at.is_some());
  }

  #[test]
  fn test_update_missing_returns_none() {
    let (db, _) = test_db();
    assert!(update(&db, 9999, &IssueUpdate::default()).unwrap().is_none());
  }

  #[test]
  fn test_delete() {
    let (db, user_id) = test_db();
    let created = create(&db, &new_issue(user_id, "Doomed")).unwrap();

    assert!(delete(&db, created.id).unwrap());
    assert!(get(&db, created.id).unwrap().is_none());
    assert!(!delete(&db, created.id).unwrap());
  }
}
