//! Module: index
//! Responsibility: keep index entries in step with record state and answer equality lookups.
//! Does not own: key layout, normalization rules, or record persistence.
//! Boundary: the model layer calls [`IndexWriter`] on every persist and
//! [`QueryResolver`] on every attribute lookup.

mod plan;
mod resolver;
mod writer;


pub use plan::{IndexDelta, IndexPlan, plan_index_deltas};
pub use resolver::QueryResolver;
pub use writer::{ApplyReport, IndexWriter};
