use crate::store::{KvStore, StoreError};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

///
/// Slot
/// One stored key: a plain value or a member set.
///

#[derive(Clone, Debug)]
enum Slot {
    Value(String),
    Set(BTreeSet<String>),
}

///
/// MemoryStore
///
/// Thread-safe in-memory store adapter.
/// Mirrors Redis semantics for the primitives the engine uses.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<BTreeMap<String, Slot>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys of either kind.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.slots.read().len()
    }

    /// Snapshot all live keys (diagnostics only).
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.slots.read().keys().cloned().collect()
    }

    /// Snapshot live keys that start with `prefix`.
    #[must_use]
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.slots
            .read()
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.slots.write().clear();
    }
}

impl KvStore for MemoryStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut slots = self.slots.write();
        if let Some(Slot::Set(_)) = slots.get(key) {
            return Err(StoreError::WrongType {
                key: key.to_string(),
            });
        }
        slots.insert(key.to_string(), Slot::Value(value.to_string()));

        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.slots.read().get(key) {
            None => Ok(None),
            Some(Slot::Value(value)) => Ok(Some(value.clone())),
            Some(Slot::Set(_)) => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.slots.write().remove(key).is_some())
    }

    fn add_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError> {
        let mut slots = self.slots.write();
        let slot = slots
            .entry(set_key.to_string())
            .or_insert_with(|| Slot::Set(BTreeSet::new()));

        match slot {
            Slot::Set(members) => Ok(members.insert(member.to_string())),
            Slot::Value(_) => Err(StoreError::WrongType {
                key: set_key.to_string(),
            }),
        }
    }

    fn remove_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError> {
        let mut slots = self.slots.write();
        let (removed, now_empty) = match slots.get_mut(set_key) {
            None => return Ok(false),
            Some(Slot::Value(_)) => {
                return Err(StoreError::WrongType {
                    key: set_key.to_string(),
                });
            }
            Some(Slot::Set(members)) => (members.remove(member), members.is_empty()),
        };

        // Same as SREM: the set disappears with its last member.
        if now_empty {
            slots.remove(set_key);
        }

        Ok(removed)
    }

    fn members(&self, set_key: &str) -> Result<BTreeSet<String>, StoreError> {
        match self.slots.read().get(set_key) {
            None => Ok(BTreeSet::new()),
            Some(Slot::Set(members)) => Ok(members.clone()),
            Some(Slot::Value(_)) => Err(StoreError::WrongType {
                key: set_key.to_string(),
            }),
        }
    }
}
