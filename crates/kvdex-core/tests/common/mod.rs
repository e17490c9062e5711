#![allow(dead_code)]

use kvdex_core::{
    config::IndexConfig,
    context::IndexContext,
    registry::IndexRegistry,
    store::{KvStore, MemoryStore, StoreError},
};
use parking_lot::Mutex;
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::atomic::{AtomicBool, Ordering},
};

///
/// Op
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Op {
    AddMember,
    RemoveMember,
    Members,
}

///
/// FlakyStore
///
/// MemoryStore wrapper that fails chosen operations on matching keys.
///

#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    rules: Mutex<Vec<(Op, String)>>,
    offline: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `op` on every key containing `fragment`.
    pub fn fail(&self, op: Op, fragment: &str) {
        self.rules.lock().push((op, fragment.to_string()));
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.rules.lock().clear();
        self.set_offline(false);
    }

    fn check(&self, op: Option<Op>, key: &str) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("connection refused"));
        }
        let Some(op) = op else {
            return Ok(());
        };
        if self
            .rules
            .lock()
            .iter()
            .any(|(rule_op, fragment)| *rule_op == op && key.contains(fragment.as_str()))
        {
            return Err(StoreError::unavailable(format!("injected {op:?} failure")));
        }

        Ok(())
    }
}

impl KvStore for FlakyStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check(None, key)?;
        self.inner.set(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check(None, key)?;
        self.inner.get(key)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.check(None, key)?;
        self.inner.delete(key)
    }

    fn add_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError> {
        self.check(Some(Op::AddMember), set_key)?;
        self.inner.add_member(set_key, member)
    }

    fn remove_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError> {
        self.check(Some(Op::RemoveMember), set_key)?;
        self.inner.remove_member(set_key, member)
    }

    fn members(&self, set_key: &str) -> Result<BTreeSet<String>, StoreError> {
        self.check(Some(Op::Members), set_key)?;
        self.inner.members(set_key)
    }
}

/// Index declarations used across the integration suites.
pub fn registry() -> IndexRegistry {
    let mut registry = IndexRegistry::new();
    registry.register("User", &["first_name"], false).unwrap();
    registry.register("User", &["last_name"], false).unwrap();
    registry
        .register("User", &["first_name", "last_name"], false)
        .unwrap();
    registry.register("OmniUser", &["email"], true).unwrap();
    registry.register("OmniUser", &["uid"], false).unwrap();
    registry
        .register("OmniUser", &["email", "uid"], true)
        .unwrap();
    registry
}

pub fn memory_context() -> IndexContext<MemoryStore> {
    IndexContext::new(registry(), MemoryStore::new(), IndexConfig::default()).unwrap()
}

pub fn flaky_context() -> IndexContext<FlakyStore> {
    IndexContext::new(registry(), FlakyStore::new(), IndexConfig::default()).unwrap()
}

/// Full contents of every index entry set, keyed by entry key.
pub fn dump(store: &MemoryStore) -> BTreeMap<String, BTreeSet<String>> {
    store
        .keys_with_prefix(&format!("{}:", IndexConfig::DEFAULT_NAMESPACE))
        .into_iter()
        .filter(|key| key.contains(":idx:"))
        .map(|key| {
            let members = store.members(&key).unwrap();
            (key, members)
        })
        .collect()
}
