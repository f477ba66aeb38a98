use crate::error::{FieldError, SchemaError};
use crate::fields::{FieldKind, FieldValue, validate, validate_any};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use storydiff_irf::{DesignBlock, IrfNode, TraversalError, flatten_with_paths};
use tracing::{debug, warn};

/// Declared design fields for one component type. Every field is optional in content;
/// the schema only pins down the kind a field must have *when present*.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSchema {
    pub component_type: String,
    pub fields: IndexMap<String, FieldKind>,
}

impl ComponentSchema {
    pub fn new(component_type: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }
}

/// A design block whose fields all validated, ready for token resolution and CMS
/// serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedBlock {
    pub fields: IndexMap<String, FieldValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Lookup table from component type to its design schema.
///
/// Unknown component types resolve to a permissive fallback schema instead of failing:
/// content regularly grows new component types before this table learns about them, and
/// blocking a publish on that would be wrong. The miss is logged so it can be noticed.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, ComponentSchema>,
    fallback: ComponentSchema,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SchemaRegistry {
    /// A registry with no known types; everything goes through the fallback.
    pub fn empty() -> Self {
        Self {
            schemas: HashMap::new(),
            fallback: ComponentSchema::new("*"),
        }
    }

    /// The registry for the component set the CMS space currently uses.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for schema in builtin_schemas() {
            registry.register(schema);
        }
        registry
    }

    pub fn register(&mut self, schema: ComponentSchema) {
        self.schemas.insert(schema.component_type.clone(), schema);
    }

    /// Schema for a component type; the permissive fallback for types the registry does
    /// not know. Never fails.
    pub fn lookup(&self, component_type: &str) -> &ComponentSchema {
        match self.schemas.get(component_type) {
            Some(schema) => schema,
            None => {
                warn!(component_type, "unknown component type, using fallback schema");
                &self.fallback
            }
        }
    }

    /// Validate every field of a design block against this component type's schema.
    ///
    /// Fields the schema declares are validated against their declared kind; undeclared
    /// fields go through the union validator so recognizable shapes still get their strict
    /// check. Errors are collected per field, not short-circuited, so the caller can
    /// report every problem in one pass.
    pub fn validate_design_block(
        &self,
        component_type: &str,
        block: &DesignBlock,
    ) -> Result<ValidatedBlock, Vec<FieldError>> {
        let schema = self.lookup(component_type);

        let mut fields = IndexMap::with_capacity(block.fields.len());
        let mut errors: Vec<FieldError> = Vec::new();

        for (name, raw) in &block.fields {
            let result: Result<FieldValue, SchemaError> = match schema.fields.get(name) {
                Some(kind) => validate(*kind, raw),
                None => validate_any(raw),
            };
            match result {
                Ok(value) => {
                    fields.insert(name.clone(), value);
                }
                Err(error) => errors.push(FieldError::new(name, error)),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        debug!(
            component_type,
            fields = fields.len(),
            "design block validated"
        );
        Ok(ValidatedBlock {
            fields,
            plugin: block.plugin.clone(),
            version: block.version.clone(),
        })
    }
}

/// All field errors attributed to one component in a tree validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentErrors {
    pub path: String,
    pub component_id: String,
    pub component_type: String,
    pub errors: Vec<FieldError>,
}

/// Outcome of validating every design block in a tree. Blocks and errors are both
/// collected; one broken component does not hide its siblings' results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeValidation {
    /// Validated blocks keyed by component id, in canonical traversal order. Components
    /// without a design block do not appear.
    pub blocks: IndexMap<String, ValidatedBlock>,
    pub errors: Vec<ComponentErrors>,
}

impl TreeValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl SchemaRegistry {
    /// Validate the design block of every node in a tree, in canonical traversal order.
    /// Only structural problems (runaway depth) are fatal; schema problems are collected.
    pub fn validate_tree(&self, root: &IrfNode) -> Result<TreeValidation, TraversalError> {
        let mut outcome = TreeValidation::default();
        for entry in flatten_with_paths(root)? {
            let Some(design) = &entry.node.design else {
                continue;
            };
            match self.validate_design_block(&entry.node.node_type, design) {
                Ok(block) => {
                    outcome.blocks.insert(entry.node.id.clone(), block);
                }
                Err(errors) => outcome.errors.push(ComponentErrors {
                    path: entry.path,
                    component_id: entry.node.id.clone(),
                    component_type: entry.node.node_type.clone(),
                    errors,
                }),
            }
        }
        Ok(outcome)
    }
}

fn builtin_schemas() -> Vec<ComponentSchema> {
    vec![
        ComponentSchema::new("page")
            .field("layout", FieldKind::Layout)
            .field("spacing", FieldKind::Spacing),
        ComponentSchema::new("section")
            .field("backgroundColor", FieldKind::ColorPicker)
            .field("spacing", FieldKind::Spacing)
            .field("layout", FieldKind::Layout)
            .field("hidden", FieldKind::Boolean)
            .field("transition", FieldKind::Transition),
        ComponentSchema::new("headline")
            .field("variant", FieldKind::Option)
            .field("spacing", FieldKind::Spacing)
            .field("hidden", FieldKind::Boolean),
        ComponentSchema::new("text")
            .field("variant", FieldKind::Option)
            .field("spacing", FieldKind::Spacing)
            .field("hidden", FieldKind::Boolean),
        ComponentSchema::new("list")
            .field("variant", FieldKind::Option)
            .field("spacing", FieldKind::Spacing),
        ComponentSchema::new("list-item").field("spacing", FieldKind::Spacing),
        ComponentSchema::new("blockquote")
            .field("variant", FieldKind::Option)
            .field("backgroundColor", FieldKind::ColorPicker)
            .field("spacing", FieldKind::Spacing),
        ComponentSchema::new("editorial-card")
            .field("layout", FieldKind::Layout)
            .field("backgroundColor", FieldKind::ColorPicker)
            .field("spacing", FieldKind::Spacing)
            .field("transition", FieldKind::Transition)
            .field("aspectRatio", FieldKind::Option),
        ComponentSchema::new("image")
            .field("aspectRatio", FieldKind::Option)
            .field("spacing", FieldKind::Spacing),
        ComponentSchema::new("button")
            .field("variant", FieldKind::Option)
            .field("display", FieldKind::Toggle),
        ComponentSchema::new("grid")
            .field("columns", FieldKind::Number)
            .field("layout", FieldKind::Layout)
            .field("spacing", FieldKind::Spacing),
    ]
}
