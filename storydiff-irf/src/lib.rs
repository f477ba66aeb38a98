//! IRF (Intermediate Representation Format) tree model and traversal.
//!
//! IRF trees arrive from an upstream agent pipeline as already-parsed JSON. This crate is
//! deliberately *tolerant* when reading them:
//! - Unknown component types are preserved, never rejected.
//! - Optional fields may be absent; absent `children`/`slots` mean "leaf".
//!
//! Stricter per-component validation lives in `storydiff-schema`; this crate only owns the
//! shape of the tree and the canonical visit order every other crate depends on.

mod node;
mod traverse;

pub use node::{DesignBlock, IrfNode};
pub use traverse::{
    FlatNode, IntegrityError, NodeIter, TraversalError, MAX_DEPTH, collect, count_nodes,
    find_all, flatten_with_paths, verify_ids, walk,
};
