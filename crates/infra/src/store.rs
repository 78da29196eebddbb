//! Collection storage abstraction.
//!
//! Every soft-deletable record kind lives in one [`Collection`]. The default
//! read operations (`get`, `list`, `find`) exclude soft-deleted rows — this
//! read-time filter, applied uniformly on every collection, is what lets a
//! partially-applied cascade never resurrect access to orphaned children.
//!
//! All operations return `Result` so tests can substitute fault-injecting
//! implementations and exercise the partial-failure paths.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use thiserror::Error;

use branchline_core::{Entity, SoftDelete};

/// Storage-layer failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Unavailable(String),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// A collection of soft-deletable records.
pub trait Collection<T>: Send + Sync
where
    T: Entity + SoftDelete + Clone,
{
    fn insert(&self, record: T) -> Result<(), StoreError>;

    /// Fetch by id, excluding soft-deleted rows.
    fn get(&self, id: T::Id) -> Result<Option<T>, StoreError>;

    /// Fetch by id, including soft-deleted rows. Used by restore and by
    /// cascade retries, never by default read paths.
    fn get_any(&self, id: T::Id) -> Result<Option<T>, StoreError>;

    /// Replace an existing row (matched by id).
    fn update(&self, record: T) -> Result<(), StoreError>;

    /// All non-deleted rows.
    fn list(&self) -> Result<Vec<T>, StoreError>;

    /// All soft-deleted rows (the "deleted/all" administrative listing).
    fn list_deleted(&self) -> Result<Vec<T>, StoreError>;

    /// Non-deleted rows matching the predicate.
    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> Result<Vec<T>, StoreError>;

    /// Rows matching the predicate regardless of deletion state. Cascade
    /// snapshots use this so a retried teardown re-finds rows the failed
    /// attempt already marked.
    fn find_any(&self, predicate: &dyn Fn(&T) -> bool) -> Result<Vec<T>, StoreError>;

    /// Soft-delete every non-deleted row matching the predicate, stamping
    /// `at`. Returns how many rows were newly marked. Re-running with the
    /// same predicate is a no-op.
    fn mark_deleted_where(
        &self,
        predicate: &dyn Fn(&T) -> bool,
        at: DateTime<Utc>,
    ) -> Result<usize, StoreError>;

    /// Flip one row back to active. Returns the restored row, or `None` if
    /// the id is unknown.
    fn restore(&self, id: T::Id) -> Result<Option<T>, StoreError>;
}

/// In-memory collection for tests/dev and single-process deployments.
#[derive(Debug)]
pub struct MemCollection<T: Entity> {
    inner: RwLock<HashMap<T::Id, T>>,
}

impl<T: Entity> MemCollection<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Entity> Default for MemCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Collection<T> for MemCollection<T>
where
    T: Entity + SoftDelete + Clone + Send + Sync + 'static,
    T::Id: Send + Sync,
{
    fn insert(&self, record: T) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(record.id(), record);
        Ok(())
    }

    fn get(&self, id: T::Id) -> Result<Option<T>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(&id).filter(|r| !r.is_deleted()).cloned())
    }

    fn get_any(&self, id: T::Id) -> Result<Option<T>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(&id).cloned())
    }

    fn update(&self, record: T) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(record.id(), record);
        Ok(())
    }

    fn list(&self) -> Result<Vec<T>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.values().filter(|r| !r.is_deleted()).cloned().collect())
    }

    fn list_deleted(&self) -> Result<Vec<T>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.values().filter(|r| r.is_deleted()).cloned().collect())
    }

    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> Result<Vec<T>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map
            .values()
            .filter(|r| !r.is_deleted() && predicate(r))
            .cloned()
            .collect())
    }

    fn find_any(&self, predicate: &dyn Fn(&T) -> bool) -> Result<Vec<T>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.values().filter(|r| predicate(r)).cloned().collect())
    }

    fn mark_deleted_where(
        &self,
        predicate: &dyn Fn(&T) -> bool,
        at: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let mut marked = 0;
        for record in map.values_mut() {
            if !record.is_deleted() && predicate(record) {
                record.mark_deleted(at);
                marked += 1;
            }
        }
        Ok(marked)
    }

    fn restore(&self, id: T::Id) -> Result<Option<T>, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        match map.get_mut(&id) {
            Some(record) => {
                record.restore();
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchline_core::CompanyId;
    use branchline_tenancy::Company;

    fn company(name: &str) -> Company {
        Company::new(name, format!("{name}@example.com")).unwrap()
    }

    #[test]
    fn default_reads_exclude_soft_deleted_rows() {
        let store: MemCollection<Company> = MemCollection::new();
        let acme = company("acme");
        let id = acme.id;
        store.insert(acme).unwrap();

        store
            .mark_deleted_where(&|c| c.id == id, Utc::now())
            .unwrap();

        assert_eq!(store.get(id).unwrap(), None);
        assert!(store.list().unwrap().is_empty());
        assert!(store.find(&|_| true).unwrap().is_empty());
        assert!(store.get_any(id).unwrap().is_some());
        assert_eq!(store.list_deleted().unwrap().len(), 1);
    }

    #[test]
    fn mark_deleted_where_counts_only_newly_marked_rows() {
        let store: MemCollection<Company> = MemCollection::new();
        store.insert(company("a")).unwrap();
        store.insert(company("b")).unwrap();

        let first = store.mark_deleted_where(&|_| true, Utc::now()).unwrap();
        let second = store.mark_deleted_where(&|_| true, Utc::now()).unwrap();
        assert_eq!(first, 2);
        assert_eq!(second, 0);
    }

    #[test]
    fn restore_returns_the_row_to_default_reads() {
        let store: MemCollection<Company> = MemCollection::new();
        let acme = company("acme");
        let id = acme.id;
        store.insert(acme).unwrap();
        store
            .mark_deleted_where(&|c| c.id == id, Utc::now())
            .unwrap();

        let restored = store.restore(id).unwrap().unwrap();
        assert!(!restored.deletion.is_deleted);
        assert!(store.get(id).unwrap().is_some());
    }

    #[test]
    fn restore_of_unknown_id_is_none() {
        let store: MemCollection<Company> = MemCollection::new();
        assert_eq!(store.restore(CompanyId::new()).unwrap(), None);
    }
}
