use crate::{
    error::InternalError,
    key::{IndexKey, KeyBuilder},
    model::index::IndexDescriptor,
    value::AttributeSnapshot,
};

///
/// IndexDelta
///
/// Membership change for one index family.
/// `remove` and `add` are never equal; unchanged families produce no delta.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexDelta<'a> {
    pub descriptor: &'a IndexDescriptor,
    pub remove: Option<IndexKey>,
    pub add: Option<IndexKey>,
}

impl IndexDelta<'_> {
    #[must_use]
    pub fn op_count(&self) -> usize {
        usize::from(self.remove.is_some()) + usize::from(self.add.is_some())
    }
}

///
/// IndexPlan
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IndexPlan<'a> {
    pub deltas: Vec<IndexDelta<'a>>,

    /// Families whose entry key is the same before and after.
    pub unchanged: usize,
}

impl IndexPlan<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

/// Plan all index membership changes for one record transition.
///
/// `old == None` is a creation, `new == None` a deletion.
/// No store access happens here; every fallible step of key derivation
/// runs before the writer touches the store.
pub fn plan_index_deltas<'a>(
    keys: &KeyBuilder,
    descriptors: &'a [IndexDescriptor],
    old: Option<&AttributeSnapshot>,
    new: Option<&AttributeSnapshot>,
) -> Result<IndexPlan<'a>, InternalError> {
    let mut plan = IndexPlan {
        deltas: Vec::with_capacity(descriptors.len()),
        unchanged: 0,
    };

    for descriptor in descriptors {
        let old_key = match old {
            Some(snapshot) => keys.snapshot_key(descriptor, snapshot)?,
            None => None,
        };
        let new_key = match new {
            Some(snapshot) => keys.snapshot_key(descriptor, snapshot)?,
            None => None,
        };

        if old_key == new_key {
            if old_key.is_some() {
                plan.unchanged += 1;
            }
            continue;
        }

        plan.deltas.push(IndexDelta {
            descriptor,
            remove: old_key,
            add: new_key,
        });
    }

    Ok(plan)
}
