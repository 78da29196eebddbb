//! Soft-delete primitives.
//!
//! Every soft-deletable record carries exactly one [`Deletion`] pair:
//! a flag and a timestamp. Physical removal never happens through this
//! mechanism; every default read path excludes rows whose flag is set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The flag/timestamp pair embedded in every soft-deletable record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Deletion {
    /// An active (never deleted) marker.
    pub fn active() -> Self {
        Self::default()
    }

    /// Mark as deleted at `at`.
    ///
    /// Idempotent: re-marking an already-deleted row keeps the original
    /// timestamp, so cascade retries are no-ops per row.
    pub fn mark(&mut self, at: DateTime<Utc>) {
        if !self.is_deleted {
            self.is_deleted = true;
            self.deleted_at = Some(at);
        }
    }

    /// Flip back to active and clear the timestamp.
    pub fn clear(&mut self) {
        self.is_deleted = false;
        self.deleted_at = None;
    }
}

/// Interface for records carrying a [`Deletion`] pair.
pub trait SoftDelete {
    fn deletion(&self) -> &Deletion;
    fn deletion_mut(&mut self) -> &mut Deletion;

    fn is_deleted(&self) -> bool {
        self.deletion().is_deleted
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deletion().deleted_at
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deletion_mut().mark(at);
    }

    fn restore(&mut self) {
        self.deletion_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_sets_flag_and_timestamp() {
        let mut d = Deletion::active();
        let at = Utc::now();
        d.mark(at);
        assert!(d.is_deleted);
        assert_eq!(d.deleted_at, Some(at));
    }

    #[test]
    fn mark_is_idempotent_and_keeps_first_timestamp() {
        let mut d = Deletion::active();
        let first = Utc::now();
        d.mark(first);
        let later = first + chrono::Duration::seconds(30);
        d.mark(later);
        assert_eq!(d.deleted_at, Some(first));
    }

    #[test]
    fn clear_restores_active_state() {
        let mut d = Deletion::active();
        d.mark(Utc::now());
        d.clear();
        assert!(!d.is_deleted);
        assert_eq!(d.deleted_at, None);
    }
}
