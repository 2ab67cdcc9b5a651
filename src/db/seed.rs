//! Sample-data seeding for local development.

use color_eyre::{eyre::eyre, Result};
use rusqlite::params;
use tracing::info;

use super::Database;

const SAMPLE_USERS: [&str; 5] = [
  "Ada Lovelace",
  "Grace Hopper",
  "Edsger Dijkstra",
  "Barbara Liskov",
  "Donald Knuth",
];

const SAMPLE_TITLES: [&str; 8] = [
  "Pagination off by one on the last page",
  "Stale list shown after creating an issue",
  "Description field drops trailing newlines",
  "Sort order flips when two issues share a timestamp",
  "Filter by owner returns unrelated issues",
  "Detail view 404s for freshly created issues",
  "Slow list queries under repeated identical requests",
  "Update endpoint clears the description unexpectedly",
];

/// Populate the database with sample users and issues.
///
/// No-op when any user already exists, so repeated `--seed` runs are safe.
pub fn run(db: &Database, issue_count: u32) -> Result<()> {
  let conn = db.conn()?;

  let existing: i64 = conn
    .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
    .map_err(|e| eyre!("Failed to count users: {}", e))?;

  if existing > 0 {
    info!("Database already has data, skipping seed");
    return Ok(());
  }

  conn
    .execute_batch("BEGIN")
    .map_err(|e| eyre!("Failed to begin seed transaction: {}", e))?;

  for name in SAMPLE_USERS {
    conn
      .execute("INSERT INTO users (name) VALUES (?)", params![name])
      .map_err(|e| eyre!("Failed to seed user: {}", e))?;
  }

  for i in 0..issue_count {
    let title = SAMPLE_TITLES[(i as usize) % SAMPLE_TITLES.len()];
    let user_id = i64::from(i % SAMPLE_USERS.len() as u32) + 1;
    conn
      .execute(
        "INSERT INTO issues (title, description, user_id, created_at)
         VALUES (?, ?, ?, datetime('now', '-1 day'))",
        params![
          format!("{} (#{})", title, i + 1),
          format!("Reproduced while triaging batch {}.", i / 100 + 1),
          user_id
        ],
      )
      .map_err(|e| eyre!("Failed to seed issue: {}", e))?;
  }

  conn
    .execute_batch("COMMIT")
    .map_err(|e| eyre!("Failed to commit seed transaction: {}", e))?;

  info!(users = SAMPLE_USERS.len(), issues = issue_count, "Seeded database");
  Ok(())
}
