//! SQLite storage implementation.
//!
//! One connection per handle, guarded by a mutex. The database file is opened
//! in exclusive locking mode so a second process gets `StorageOpen` instead
//! of interleaving writes with a running sync.

use crate::error::{Error, Result};
use crate::model::{Issue, RECOGNIZED_STATES, RepoScope};
use crate::storage::schema::apply_schema;
use crate::storage::{IssueStore, StoreOptions};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, trace};

/// How long `open` waits for another process to release the database.
const LOCK_TIMEOUT: Duration = Duration::from_secs(1);

/// SQLite-backed issue store for one repository scope.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    scope: RepoScope,
    namespace: String,
    options: StoreOptions,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open the database at `path` and take the exclusive lock on it.
    ///
    /// Creates the file, schema and scope namespace if missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageOpen` if the file is inaccessible or locked by another process.
    pub fn open(path: &Path, scope: RepoScope, options: StoreOptions) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| Error::StorageDir {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let conn = Self::connect(path).map_err(|source| Error::StorageOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::from_connection(conn, scope, options, Some(path.to_path_buf()))?;
        debug!(path = %path.display(), scope = %store.scope, "Opened issue store");
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory(scope: RepoScope, options: StoreOptions) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Self::from_connection(conn, scope, options, None)
    }

    fn connect(path: &Path) -> rusqlite::Result<Connection> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(LOCK_TIMEOUT)?;

        // Must precede the first WAL access so no shared-memory file is used
        conn.pragma_update(None, "locking_mode", "EXCLUSIVE")?;
        conn.execute_batch("BEGIN EXCLUSIVE; COMMIT;")?;

        apply_schema(&conn)?;
        Ok(conn)
    }

    fn from_connection(
        conn: Connection,
        scope: RepoScope,
        options: StoreOptions,
        path: Option<PathBuf>,
    ) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
            namespace: scope.namespace(),
            scope,
            options,
            path,
        };
        store.mutate("ensure_scope", |tx, store| store.ensure_scope(tx))?;
        Ok(store)
    }

    /// Path of the backing file, `None` for in-memory databases.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Storage("issue store lock poisoned".to_string()))
    }

    /// Execute a mutation inside one IMMEDIATE transaction.
    ///
    /// Commits only if the closure succeeds; on error the transaction is
    /// dropped and SQLite rolls it back.
    fn mutate<F, R>(&self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction, &Self) -> Result<R>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let result = f(&tx, self)?;

        tx.commit()?;
        trace!(op, scope = %self.namespace, "Committed");
        Ok(result)
    }

    fn ensure_scope(&self, tx: &Transaction) -> Result<()> {
        tx.execute(
            "INSERT OR IGNORE INTO scopes (name, owner, repo, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                self.namespace,
                self.scope.owner,
                self.scope.repo,
                chrono::Utc::now().timestamp_millis()
            ],
        )?;
        Ok(())
    }
}

impl IssueStore for SqliteStore {
    fn scope(&self) -> &RepoScope {
        &self.scope
    }

    fn clear(&self) -> Result<()> {
        self.mutate("clear", |tx, store| {
            let removed = tx.execute("DELETE FROM issues WHERE scope = ?1", [&store.namespace])?;
            tx.execute("DELETE FROM issue_index WHERE scope = ?1", [&store.namespace])?;
            tx.execute("DELETE FROM scopes WHERE name = ?1", [&store.namespace])?;
            store.ensure_scope(tx)?;

            debug!(scope = %store.namespace, removed, "Cleared issue store");
            Ok(())
        })
    }

    fn save(&self, issue: &Issue) -> Result<()> {
        let number = sql_number(issue.number)?;
        let payload = serde_json::to_string(issue)?;
        let now = chrono::Utc::now().timestamp_millis();

        self.mutate("save", |tx, store| {
            if store.options.evict_stale {
                tx.execute(
                    "DELETE FROM issues WHERE scope = ?1 AND number = ?2 AND state != ?3",
                    params![store.namespace, number, issue.state],
                )?;
            }

            tx.execute(
                "INSERT INTO issues (scope, state, number, payload, saved_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(scope, state, number) DO UPDATE SET
                    payload = excluded.payload,
                    saved_at = excluded.saved_at",
                params![store.namespace, issue.state, number, payload, now],
            )?;

            tx.execute(
                "INSERT INTO issue_index (scope, number, state) VALUES (?1, ?2, ?3)
                 ON CONFLICT(scope, number) DO UPDATE SET state = excluded.state",
                params![store.namespace, number, issue.state],
            )?;

            Ok(())
        })
    }

    fn get(&self, number: u64) -> Result<Issue> {
        // Numbers beyond i64 can never have been saved
        let key = sql_number(number).map_err(|_| Error::IssueNotFound { number })?;
        let conn = self.lock()?;

        let payload: Option<String> = conn
            .query_row(
                "SELECT i.payload
                 FROM issue_index x
                 JOIN issues i ON i.scope = x.scope AND i.state = x.state AND i.number = x.number
                 WHERE x.scope = ?1 AND x.number = ?2",
                params![self.namespace, key],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(payload) => Ok(serde_json::from_str(&payload)?),
            None => Err(Error::IssueNotFound { number }),
        }
    }

    fn all(&self) -> Result<Vec<Issue>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT payload FROM issues WHERE scope = ?1 AND state IN (?2, ?3) ORDER BY state DESC, number",
        )?;
        let rows = stmt.query_map(
            params![self.namespace, RECOGNIZED_STATES[0], RECOGNIZED_STATES[1]],
            |row| row.get::<_, String>(0),
        )?;

        decode_payloads(rows)
    }

    fn all_by_state(&self, state: &str) -> Result<Vec<Issue>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT payload FROM issues WHERE scope = ?1 AND state = ?2 ORDER BY number")?;
        let rows = stmt.query_map(params![self.namespace, state], |row| row.get::<_, String>(0))?;

        decode_payloads(rows)
    }

    fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM issue_index WHERE scope = ?1",
            [&self.namespace],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn sql_number(number: u64) -> Result<i64> {
    i64::try_from(number)
        .map_err(|_| Error::Storage(format!("issue number {number} is out of range")))
}

fn decode_payloads(
    rows: impl Iterator<Item = rusqlite::Result<String>>,
) -> Result<Vec<Issue>> {
    rows.map(|row| -> Result<Issue> { Ok(serde_json::from_str(&row?)?) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::conformance;
    use std::sync::Arc;

    fn scope() -> RepoScope {
        RepoScope::new("octo", "hello").unwrap()
    }

    fn store() -> SqliteStore {
        SqliteStore::open_memory(scope(), StoreOptions::default()).unwrap()
    }

    #[test]
    fn test_open_memory() {
        let store = store();
        assert_eq!(store.scope(), &scope());
        assert!(store.path().is_none());
    }

    #[test]
    fn test_round_trip() {
        conformance::round_trip(&store());
    }

    #[test]
    fn test_save_overwrites() {
        conformance::save_overwrites(&store());
    }

    #[test]
    fn test_get_missing() {
        conformance::get_missing(&store());
    }

    #[test]
    fn test_clear_empties() {
        conformance::clear_empties(&store());
    }

    #[test]
    fn test_partition_union() {
        conformance::partition_union(&store());
    }

    #[test]
    fn test_missing_partition_is_empty() {
        conformance::missing_partition_is_empty(&store());
    }

    #[test]
    fn test_unknown_state_excluded() {
        conformance::unknown_state_excluded(&store());
    }

    #[test]
    fn test_state_change_keeps_stale_by_default() {
        conformance::state_change_keeps_stale(&store());
    }

    #[test]
    fn test_state_change_evicts_when_enabled() {
        let store =
            SqliteStore::open_memory(scope(), StoreOptions { evict_stale: true }).unwrap();
        conformance::state_change_evicts(&store);
    }

    #[test]
    fn test_concurrent_saves_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("issues.db"), scope(), StoreOptions::default())
            .unwrap();
        conformance::concurrent_saves(Arc::new(store));
    }

    #[test]
    fn test_index_divergence_is_not_found() {
        let store = store();
        store.save(&conformance::issue(4, "open")).unwrap();

        // Drop the payload behind the index's back
        store
            .lock()
            .unwrap()
            .execute("DELETE FROM issues WHERE number = 4", [])
            .unwrap();

        assert!(matches!(store.get(4), Err(Error::IssueNotFound { number: 4 })));
    }

    #[test]
    fn test_scopes_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issues.db");

        {
            let a = SqliteStore::open(&path, scope(), StoreOptions::default()).unwrap();
            a.save(&conformance::issue(1, "open")).unwrap();
        }

        let other = RepoScope::new("octo", "world").unwrap();
        let b = SqliteStore::open(&path, other, StoreOptions::default()).unwrap();
        assert!(b.all().unwrap().is_empty());
        assert!(b.get(1).is_err());
        b.clear().unwrap();
        drop(b);

        // Clearing another scope leaves this one alone
        let a = SqliteStore::open(&path, scope(), StoreOptions::default()).unwrap();
        assert_eq!(a.all().unwrap().len(), 1);
    }

    #[test]
    fn test_hyphenated_scopes_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issues.db");
        let first = RepoScope::new("foo-bar", "baz").unwrap();
        let second = RepoScope::new("foo", "bar-baz").unwrap();

        {
            let store = SqliteStore::open(&path, first.clone(), StoreOptions::default()).unwrap();
            store.save(&conformance::issue(1, "open")).unwrap();
        }

        {
            let other = SqliteStore::open(&path, second, StoreOptions::default()).unwrap();
            assert!(other.all().unwrap().is_empty());
            assert!(matches!(other.get(1), Err(Error::IssueNotFound { number: 1 })));
            other.clear().unwrap();
        }

        let store = SqliteStore::open(&path, first, StoreOptions::default()).unwrap();
        assert_eq!(store.all().unwrap().len(), 1);
        assert!(store.get(1).is_ok());
    }

    #[test]
    fn test_uncreatable_directory_is_storage_open() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let result = SqliteStore::open(&blocker.join("issues.db"), scope(), StoreOptions::default());

        let err = result.unwrap_err();
        assert!(matches!(err, Error::StorageDir { .. }));
        assert_eq!(err.error_code(), crate::error::ErrorCode::StorageOpenError);
    }

    #[test]
    fn test_unstorable_number_is_not_found() {
        let number = u64::MAX;
        assert!(matches!(store().get(number), Err(Error::IssueNotFound { number: n }) if n == number));
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("issues.db");
        let original = conformance::issue(21, "closed");

        {
            let store = SqliteStore::open(&path, scope(), StoreOptions::default()).unwrap();
            store.save(&original).unwrap();
        }

        let store = SqliteStore::open(&path, scope(), StoreOptions::default()).unwrap();
        assert_eq!(store.get(21).unwrap(), original);
        assert_eq!(store.path(), Some(path.as_path()));
    }

    #[test]
    fn test_second_open_is_locked_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issues.db");

        let _held = SqliteStore::open(&path, scope(), StoreOptions::default()).unwrap();
        let second = SqliteStore::open(&path, scope(), StoreOptions::default());

        assert!(matches!(second, Err(Error::StorageOpen { .. })));
    }
}
