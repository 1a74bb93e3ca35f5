//! In-memory storage implementation.
//!
//! Mirrors the SQLite layout (partitions of serialized payloads plus an
//! index) behind a single `RwLock`, so saves are atomic and reads run
//! concurrently. Nothing survives the process.

use crate::error::{Error, Result};
use crate::model::{Issue, RECOGNIZED_STATES, RepoScope};
use crate::storage::{IssueStore, StoreOptions};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Namespace {
    /// state -> number -> serialized issue
    partitions: HashMap<String, BTreeMap<u64, String>>,
    /// number -> state
    index: HashMap<u64, String>,
}

/// Process-local issue store.
#[derive(Debug)]
pub struct MemoryStore {
    scope: RepoScope,
    options: StoreOptions,
    data: RwLock<Namespace>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(scope: RepoScope, options: StoreOptions) -> Self {
        Self {
            scope,
            options,
            data: RwLock::new(Namespace::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Namespace>> {
        self.data
            .read()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Namespace>> {
        self.data
            .write()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }
}

impl IssueStore for MemoryStore {
    fn scope(&self) -> &RepoScope {
        &self.scope
    }

    fn clear(&self) -> Result<()> {
        *self.write()? = Namespace::default();
        Ok(())
    }

    fn save(&self, issue: &Issue) -> Result<()> {
        // Serialize before taking the lock so a failure leaves nothing behind
        let payload = serde_json::to_string(issue)?;
        let mut data = self.write()?;

        if self.options.evict_stale
            && let Some(previous) = data.index.get(&issue.number).cloned()
            && previous != issue.state
            && let Some(partition) = data.partitions.get_mut(&previous)
        {
            partition.remove(&issue.number);
        }

        data.partitions
            .entry(issue.state.clone())
            .or_default()
            .insert(issue.number, payload);
        data.index.insert(issue.number, issue.state.clone());
        Ok(())
    }

    fn get(&self, number: u64) -> Result<Issue> {
        let data = self.read()?;
        let payload = data
            .index
            .get(&number)
            .and_then(|state| data.partitions.get(state))
            .and_then(|partition| partition.get(&number))
            .ok_or(Error::IssueNotFound { number })?;

        Ok(serde_json::from_str(payload)?)
    }

    fn all(&self) -> Result<Vec<Issue>> {
        let data = self.read()?;
        RECOGNIZED_STATES
            .iter()
            .filter_map(|state| data.partitions.get(*state))
            .flat_map(BTreeMap::values)
            .map(|payload| -> Result<Issue> { Ok(serde_json::from_str(payload)?) })
            .collect()
    }

    fn all_by_state(&self, state: &str) -> Result<Vec<Issue>> {
        let data = self.read()?;
        match data.partitions.get(state) {
            Some(partition) => partition
                .values()
                .map(|payload| -> Result<Issue> { Ok(serde_json::from_str(payload)?) })
                .collect(),
            None => Ok(Vec::new()),
        }
    }

    fn count(&self) -> Result<usize> {
        Ok(self.read()?.index.len())
    }
}
