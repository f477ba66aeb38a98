//! Structural diffing between two versions of an IRF content tree.
//!
//! "Old" is typically the currently published story content, "new" the proposed content.
//! The output is a sparse, deterministic list of component-level changes (added, removed,
//! modified), each carrying property-level changes, plus a derived summary. The approval
//! workflow renders this for a human and uses `summary.total_changes == 0` as its no-op
//! short-circuit before dispatching any publish handler.
//!
//! Nodes are matched across versions by `id`, never by position: a moved-but-unmodified
//! component produces no change at all.

mod change;
mod engine;

pub use change::{ChangeType, ComponentChange, DiffRecord, DiffSummary, PropertyChange};
pub use engine::{DiffError, DiffOptions, diff_trees};
