//! Design-token resolution.
//!
//! Design fields may hold a symbolic token (a plain string like `"brand-pink"`) instead of
//! a concrete value. Resolution looks the token up in the space's global style table and
//! substitutes the stored value.
//!
//! The policy is fail-open: a token with no table entry resolves to itself, as a literal.
//! A missing global variable must not block an entire publish; the miss is logged and the
//! string goes through unchanged. Resolution is single-step and non-recursive; nested
//! structures inside a field value are not individually tokenized.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storydiff_irf::DesignBlock;
use tracing::{debug, warn};

/// The global style table, supplied by the CMS integration layer. Always threaded through
/// calls as an explicit parameter; never ambient state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalVars {
    #[serde(default)]
    pub styles: IndexMap<String, Value>,
}

impl GlobalVars {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolve one value. Non-strings are already concrete and pass through unchanged; strings
/// are treated as token candidates and looked up in `vars.styles`.
pub fn resolve(value: &Value, vars: &GlobalVars) -> Value {
    let Value::String(token) = value else {
        return value.clone();
    };
    match vars.styles.get(token) {
        Some(concrete) => {
            debug!(token, "resolved design token");
            concrete.clone()
        }
        None => {
            warn!(token, "design token not in global styles, keeping literal");
            value.clone()
        }
    }
}

/// Resolve each top-level field value of a design-fields record. Non-recursive by policy.
pub fn resolve_all(fields: &IndexMap<String, Value>, vars: &GlobalVars) -> IndexMap<String, Value> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), resolve(value, vars)))
        .collect()
}

/// Resolve a whole design block's fields, keeping provenance metadata untouched. This is
/// the shape the CMS write path consumes.
pub fn resolve_design_block(block: &DesignBlock, vars: &GlobalVars) -> DesignBlock {
    DesignBlock {
        fields: resolve_all(&block.fields, vars),
        plugin: block.plugin.clone(),
        version: block.version.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn brand_vars() -> GlobalVars {
        serde_json::from_value(json!({
            "styles": {
                "brand-pink": { "selected": { "id": 1, "name": "Pink", "value": "#FF329B" } },
                "gutter-m": "24px"
            }
        }))
        .unwrap()
    }

    #[test]
    fn known_token_resolves_to_table_value() {
        let vars = brand_vars();
        let resolved = resolve(&json!("brand-pink"), &vars);
        assert_eq!(
            resolved,
            json!({ "selected": { "id": 1, "name": "Pink", "value": "#FF329B" } })
        );
    }

    #[test]
    fn unknown_token_degrades_to_literal() {
        let vars = brand_vars();
        assert_eq!(resolve(&json!("unknown-token"), &vars), json!("unknown-token"));
    }

    #[test]
    fn non_strings_pass_through_unchanged() {
        let vars = brand_vars();
        let concrete = json!({ "type": "spacing", "values": { "s": { "pt": "8px" } } });
        assert_eq!(resolve(&concrete, &vars), concrete);
        assert_eq!(resolve(&json!(42), &vars), json!(42));
        assert_eq!(resolve(&Value::Null, &vars), Value::Null);
    }

    #[test]
    fn resolution_is_idempotent() {
        let vars = brand_vars();
        for input in [json!("brand-pink"), json!("unknown-token"), json!({ "a": 1 })] {
            let once = resolve(&input, &vars);
            let twice = resolve(&once, &vars);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn resolve_all_applies_per_top_level_field_only() {
        let vars = brand_vars();
        let fields: IndexMap<String, Value> = serde_json::from_value(json!({
            "backgroundColor": "brand-pink",
            // Nested strings are not tokenized; the value is already concrete.
            "spacing": { "type": "spacing", "values": { "m": { "pt": "gutter-m" } } }
        }))
        .unwrap();

        let resolved = resolve_all(&fields, &vars);
        assert_eq!(
            resolved["backgroundColor"],
            json!({ "selected": { "id": 1, "name": "Pink", "value": "#FF329B" } })
        );
        assert_eq!(
            resolved["spacing"],
            json!({ "type": "spacing", "values": { "m": { "pt": "gutter-m" } } })
        );
    }

    #[test]
    fn resolve_design_block_keeps_provenance() {
        let vars = brand_vars();
        let block: DesignBlock = serde_json::from_value(json!({
            "fields": { "backgroundColor": "brand-pink" },
            "plugin": "backpack-breakpoints",
            "version": "2.1.0"
        }))
        .unwrap();

        let resolved = resolve_design_block(&block, &vars);
        assert_eq!(resolved.plugin.as_deref(), Some("backpack-breakpoints"));
        assert_eq!(resolved.version.as_deref(), Some("2.1.0"));
        assert_eq!(
            resolved.fields["backgroundColor"],
            json!({ "selected": { "id": 1, "name": "Pink", "value": "#FF329B" } })
        );
    }
}
