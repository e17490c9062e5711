//! Core runtime for kvdex: index descriptors, key derivation, value
//! normalization, index maintenance and attribute lookups over a
//! schema-less key-value store.

// public exports are one module level down
pub mod config;
pub mod context;
pub mod error;
pub mod index;
pub mod key;
pub mod model;
pub mod obs;
pub mod registry;
pub mod store;
pub mod value;

///
/// CONSTANTS
///

/// Maximum number of attributes allowed in one composite index.
///
/// Keeps derived index keys bounded and keeps composite declarations honest.
pub const MAX_INDEX_FIELDS: usize = 4;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{identity::RecordId, index::IndexDescriptor},
        value::{AttributeSnapshot, Value},
    };
}
