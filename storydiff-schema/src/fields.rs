use crate::error::SchemaError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Responsive viewport tier. Field values carry a partial map over these; absence at a
/// breakpoint means "inherit, no override there" and is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    S,
    M,
    L,
}

/// Discriminator for the design-field value union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Boolean,
    Number,
    Option,
    Spacing,
    ColorPicker,
    Toggle,
    Layout,
    Transition,
    Custom,
}

impl FieldKind {
    /// The wire tag for this kind (`type` for typed kinds, the `field_type` fallback for
    /// custom).
    pub fn tag(self) -> &'static str {
        match self {
            FieldKind::Boolean => "boolean",
            FieldKind::Number => "number",
            FieldKind::Option => "option",
            FieldKind::Spacing => "spacing",
            FieldKind::ColorPicker => "color-picker",
            FieldKind::Toggle => "toggle",
            FieldKind::Layout => "layout",
            FieldKind::Transition => "transition",
            FieldKind::Custom => "custom",
        }
    }

    pub fn from_tag(tag: &str) -> Option<FieldKind> {
        UNION_ORDER.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The order the union validator tries typed kinds in. Generic-custom is not listed; it
/// always runs last. Generic-custom accepts almost anything, so a malformed typed value
/// must get its shape error from its own kind before the fallback can claim it.
pub const UNION_ORDER: [FieldKind; 8] = [
    FieldKind::Boolean,
    FieldKind::Number,
    FieldKind::Option,
    FieldKind::Spacing,
    FieldKind::ColorPicker,
    FieldKind::Toggle,
    FieldKind::Layout,
    FieldKind::Transition,
];

/// A validated design-field value: one of the typed kinds, or the generic-custom fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Typed(TypedFieldValue),
    Custom(CustomFieldValue),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Typed(typed) => typed.kind(),
            FieldValue::Custom(_) => FieldKind::Custom,
        }
    }
}

/// The eight typed field shapes, discriminated by the wire `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TypedFieldValue {
    /// `"true"` / `"false"` literal per breakpoint.
    Boolean {
        #[serde(default)]
        values: IndexMap<Breakpoint, BooleanLiteral>,
    },
    /// Opaque value map, never breakpoint-keyed.
    Number {
        #[serde(default)]
        values: serde_json::Map<String, Value>,
    },
    /// String enum value per breakpoint.
    Option {
        #[serde(default)]
        values: IndexMap<Breakpoint, String>,
    },
    Spacing {
        #[serde(default)]
        values: IndexMap<Breakpoint, SpacingValue>,
    },
    ColorPicker {
        #[serde(default)]
        values: IndexMap<Breakpoint, ColorPickerValue>,
    },
    /// Arbitrary string per breakpoint.
    Toggle {
        #[serde(default)]
        values: IndexMap<Breakpoint, String>,
    },
    /// Opaque record per breakpoint.
    Layout {
        #[serde(default)]
        values: IndexMap<Breakpoint, serde_json::Map<String, Value>>,
    },
    Transition {
        #[serde(default)]
        values: IndexMap<Breakpoint, TransitionValue>,
    },
}

impl TypedFieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            TypedFieldValue::Boolean { .. } => FieldKind::Boolean,
            TypedFieldValue::Number { .. } => FieldKind::Number,
            TypedFieldValue::Option { .. } => FieldKind::Option,
            TypedFieldValue::Spacing { .. } => FieldKind::Spacing,
            TypedFieldValue::ColorPicker { .. } => FieldKind::ColorPicker,
            TypedFieldValue::Toggle { .. } => FieldKind::Toggle,
            TypedFieldValue::Layout { .. } => FieldKind::Layout,
            TypedFieldValue::Transition { .. } => FieldKind::Transition,
        }
    }
}

/// Boolean fields carry string literals on the wire, not JSON booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanLiteral {
    #[serde(rename = "true")]
    True,
    #[serde(rename = "false")]
    False,
}

/// Per-breakpoint padding/margin overrides. All sides optional; unknown keys are a shape
/// error, not tolerated extras.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpacingValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorPickerValue {
    pub selected: ColorSelection,
}

/// A palette entry as the CMS color plugin stores it. `id` is numeric in current content
/// but has been a string in older exports, so it stays opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorSelection {
    pub id: Value,
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<Value>,
    #[serde(default, rename = "classNames", skip_serializing_if = "Option::is_none")]
    pub class_names: Option<Value>,
    #[serde(
        default,
        rename = "transitionConfig",
        skip_serializing_if = "Option::is_none"
    )]
    pub transition_config: Option<Value>,
}

/// Generic-custom fallback: declared but unvalidated. Extra keys are carried opaquely so
/// the value round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldValue {
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Value>,
    #[serde(flatten, default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, Value>,
}

/// Validate `raw` against one declared kind. Total over the kind's shape: anything that
/// does not match is a [`SchemaError`], never a panic.
pub fn validate(kind: FieldKind, raw: &Value) -> Result<FieldValue, SchemaError> {
    let object = raw.as_object().ok_or(SchemaError::NotAnObject)?;

    if kind == FieldKind::Custom {
        return match object.get("field_type").and_then(Value::as_str) {
            Some(_) => serde_json::from_value::<CustomFieldValue>(raw.clone())
                .map(FieldValue::Custom)
                .map_err(|e| SchemaError::InvalidValue {
                    kind,
                    message: e.to_string(),
                }),
            None => Err(SchemaError::InvalidValue {
                kind,
                message: "missing `field_type` string".to_string(),
            }),
        };
    }

    let tag = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(SchemaError::MissingTag { expected: kind })?;
    if tag != kind.tag() {
        return Err(SchemaError::KindMismatch {
            expected: kind,
            found: tag.to_string(),
        });
    }

    let typed: TypedFieldValue =
        serde_json::from_value(raw.clone()).map_err(|e| SchemaError::InvalidValue {
            kind,
            message: e.to_string(),
        })?;
    debug_assert_eq!(typed.kind(), kind);
    Ok(FieldValue::Typed(typed))
}

/// Validate `raw` against the whole union: typed kinds in [`UNION_ORDER`], generic-custom
/// last. A value whose `type` tag names a typed kind but whose shape is malformed fails
/// with that kind's error; it does not fall through to custom.
pub fn validate_any(raw: &Value) -> Result<FieldValue, SchemaError> {
    let object = raw.as_object().ok_or(SchemaError::NotAnObject)?;

    if let Some(tag) = object.get("type").and_then(Value::as_str) {
        for kind in UNION_ORDER {
            if kind.tag() == tag {
                return validate(kind, raw);
            }
        }
    }

    if object.get("field_type").and_then(Value::as_str).is_some() {
        return validate(FieldKind::Custom, raw);
    }

    Err(SchemaError::UnrecognizedShape)
}
