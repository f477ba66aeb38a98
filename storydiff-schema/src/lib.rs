//! Design-field validation for IRF trees.
//!
//! Two layers live here:
//! - the field schema library: one strict validator per design-field kind, plus a union
//!   validator with an explicit priority order and a generic-custom fallback;
//! - the component schema registry: which field names (and kinds) each component type
//!   declares, with a permissive default for component types the registry has never
//!   heard of.
//!
//! The registry never hard-fails on an unknown component type. It validates what it
//! recognizes and passes the rest through the union validator, so new component types can
//! show up in content before this crate learns about them.

mod error;
mod fields;
mod registry;

pub use error::{FieldError, SchemaError};
pub use fields::{
    Breakpoint, BooleanLiteral, ColorPickerValue, ColorSelection, CustomFieldValue, FieldKind,
    FieldValue, SpacingValue, TransitionValue, TypedFieldValue, UNION_ORDER, validate,
    validate_any,
};
pub use registry::{
    ComponentErrors, ComponentSchema, SchemaRegistry, TreeValidation, ValidatedBlock,
};
