//! Module: store
//! Responsibility: key-value primitives the index engine depends on.
//! Does not own: key layout, index semantics, or record encoding.
//! Boundary: every byte the engine persists goes through [`KvStore`].

mod memory;


pub use memory::MemoryStore;

use std::{collections::BTreeSet, sync::Arc};
use thiserror::Error as ThisError;

///
/// StoreError
///
/// Failures surfaced by a store adapter.
/// `Unavailable` is transient and always safe to retry for reads.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    #[error("key '{key}' holds a value of the wrong type")]
    WrongType { key: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

///
/// KvStore
///
/// Store adapter port.
///
/// Contract:
/// - Membership add/remove are individually atomic and idempotent.
/// - Removing the last member of a set drops the set, so no empty set is
///   ever observable through `members`.
/// - A key holds either a plain value or a set, never both.
///

pub trait KvStore: Send + Sync {
    /// Write a plain value, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Read a plain value, or `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Delete a key of either kind. Returns whether anything was removed.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Add `member` to the set at `set_key`. Returns whether it was newly added.
    fn add_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError>;

    /// Remove `member` from the set at `set_key`. Returns whether it was present.
    fn remove_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError>;

    /// Every member of the set at `set_key`; empty when the set is absent.
    fn members(&self, set_key: &str) -> Result<BTreeSet<String>, StoreError>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete(key)
    }

    fn add_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError> {
        (**self).add_member(set_key, member)
    }

    fn remove_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError> {
        (**self).remove_member(set_key, member)
    }

    fn members(&self, set_key: &str) -> Result<BTreeSet<String>, StoreError> {
        (**self).members(set_key)
    }
}

impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete(key)
    }

    fn add_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError> {
        (**self).add_member(set_key, member)
    }

    fn remove_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError> {
        (**self).remove_member(set_key, member)
    }

    fn members(&self, set_key: &str) -> Result<BTreeSet<String>, StoreError> {
        (**self).members(set_key)
    }
}
