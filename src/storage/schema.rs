//! Database schema definitions.
//!
//! Layout: one row in `scopes` per repository namespace, one row in `issues`
//! per stored payload where `(scope, state)` is the partition, and one row in
//! `issue_index` per issue number naming the partition that holds it.

use rusqlite::{Connection, Result};

/// Current schema version, recorded in `PRAGMA user_version`.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the OGI database.
///
/// Timestamps are stored as INTEGER (Unix milliseconds).
pub const SCHEMA_SQL: &str = r"
-- Repository namespaces
CREATE TABLE IF NOT EXISTS scopes (
    name TEXT PRIMARY KEY,
    owner TEXT NOT NULL,
    repo TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

-- Issue payloads, partitioned by (scope, state)
CREATE TABLE IF NOT EXISTS issues (
    scope TEXT NOT NULL,
    state TEXT NOT NULL,
    number INTEGER NOT NULL,
    payload TEXT NOT NULL,
    saved_at INTEGER NOT NULL,
    PRIMARY KEY (scope, state, number)
);

-- number -> state index
CREATE TABLE IF NOT EXISTS issue_index (
    scope TEXT NOT NULL,
    number INTEGER NOT NULL,
    state TEXT NOT NULL,
    PRIMARY KEY (scope, number)
);

CREATE INDEX IF NOT EXISTS idx_issues_scope_number ON issues(scope, number);
";

/// Apply the schema to the database.
///
/// Idempotent: all statements use `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;

    conn.execute_batch(SCHEMA_SQL)?;

    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < CURRENT_SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_schema() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).expect("Failed to apply schema");

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(tables, vec!["issue_index", "issues", "scopes"]);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        apply_schema(&conn).expect("First apply failed");
        apply_schema(&conn).expect("Second apply failed");

        let version: i32 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_index_key_is_unique_per_scope() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO issue_index (scope, number, state) VALUES ('a-b', 1, 'open')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO issue_index (scope, number, state) VALUES ('a-b', 1, 'closed')",
            [],
        );
        assert!(dup.is_err());

        // Same number in another scope is fine
        conn.execute(
            "INSERT INTO issue_index (scope, number, state) VALUES ('c-d', 1, 'open')",
            [],
        )
        .unwrap();
    }
}
