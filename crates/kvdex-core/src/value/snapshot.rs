use crate::{model::index::IndexDescriptor, value::Value};
use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// AttributeSnapshot
///
/// Attribute values of one record at one point in time.
/// Missing attributes behave like `Value::Null`.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttributeSnapshot(BTreeMap<String, Value>);

impl AttributeSnapshot {
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

    /// Values for `descriptor`'s attributes, in declaration order.
    ///
    /// Returns `None` when any attribute is absent or null: the record is not
    /// present in that index.
    #[must_use]
    pub fn values_for(&self, descriptor: &IndexDescriptor) -> Option<Vec<&Value>> {
        descriptor
            .attribute_names()
            .iter()
            .map(|name| self.0.get(name).filter(|value| !value.is_null()))
            .collect()
    }

    /// Keep only the attributes referenced by `descriptors`.
    #[must_use]
    pub fn project<'a>(&self, descriptors: impl IntoIterator<Item = &'a IndexDescriptor>) -> Self {
        let mut out = BTreeMap::new();

        for descriptor in descriptors {
            for name in descriptor.attribute_names() {
                if let Some(value) = self.0.get(name) {
                    out.insert(name.clone(), value.clone());
                }
            }
        }

        Self(out)
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }
}

impl From<BTreeMap<String, Value>> for AttributeSnapshot {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeSnapshot
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
