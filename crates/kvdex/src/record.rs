use derive_more::{Deref, DerefMut};
use kvdex_core::{
    model::index::IndexDescriptor,
    value::{AttributeSnapshot, Value},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// Record
///
/// Full attribute map of one stored record.
/// Persisted as a JSON object at the record key.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(attribute.into(), value.into());
        self
    }

    /// Overwrite attributes present in `changes`; others are kept.
    pub fn merge(&mut self, changes: Self) {
        self.0.extend(changes.0);
    }

    /// Capture the attributes `descriptors` index.
    #[must_use]
    pub fn snapshot(&self, descriptors: &[IndexDescriptor]) -> AttributeSnapshot {
        descriptors
            .iter()
            .flat_map(IndexDescriptor::attribute_names)
            .filter_map(|name| self.0.get(name).map(|value| (name.clone(), value.clone())))
            .collect()
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
