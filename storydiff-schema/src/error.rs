use crate::fields::FieldKind;
use thiserror::Error;

/// A design-field value that does not match any recognized shape.
///
/// These are expected "bad content" errors: callers collect them per field and report them
/// all in one pass, they are never fatal to sibling fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("value is not an object")]
    NotAnObject,

    #[error("expected `{expected}` value, found tag `{found}`")]
    KindMismatch { expected: FieldKind, found: String },

    #[error("missing `type` discriminator for declared kind `{expected}`")]
    MissingTag { expected: FieldKind },

    #[error("invalid `{kind}` value: {message}")]
    InvalidValue { kind: FieldKind, message: String },

    #[error("no `type` tag matching a known field kind and no `field_type` fallback")]
    UnrecognizedShape,
}

/// A [`SchemaError`] attributed to a named design field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("field `{field}`: {error}")]
pub struct FieldError {
    pub field: String,
    #[source]
    pub error: SchemaError,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error: SchemaError) -> Self {
        Self {
            field: field.into(),
            error,
        }
    }
}
