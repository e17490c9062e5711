//! kvdex: secondary indices over a schema-less key-value store.
//!
//! This is the public meta-crate. Downstream users depend on **kvdex** only.
//!
//! ## Crate layout
//! - `core`: the index engine (keys, normalization, registry, writer, resolver)
//!   and the store adapter port.
//! - `error`: the public error type with a stable kind/origin taxonomy.
//! - `schema`: index declarations per record type.
//! - `session`: the model-layer API (`create`, `save`, `find_by`, ...).
//!
//! The `prelude` module mirrors the surface used by application code.

pub use kvdex_core as core;

pub mod error;
pub mod record;
pub mod schema;
pub mod session;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        error::Error,
        record::Record,
        schema::Schema,
        session::Session,
    };
    pub use kvdex_core::{
        config::IndexConfig,
        prelude::*,
        store::{KvStore, MemoryStore},
    };
}
