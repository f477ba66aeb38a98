//! Whole-tree validation: the registry walks every node, validates what it recognizes,
//! and collects problems per component instead of stopping at the first one.

use pretty_assertions::assert_eq;
use serde_json::json;
use storydiff_irf::IrfNode;
use storydiff_schema::{FieldKind, SchemaRegistry};

fn tree(value: serde_json::Value) -> IrfNode {
    serde_json::from_value(value).unwrap()
}

#[test]
fn collects_blocks_and_errors_across_the_whole_tree() {
    let registry = SchemaRegistry::builtin();
    let root = tree(json!({
        "type": "page",
        "id": "root",
        "children": [
            {
                "type": "headline",
                "id": "h1",
                "design": { "fields": { "variant": { "type": "option", "values": { "s": "header2" } } } }
            },
            {
                "type": "headline",
                "id": "h2",
                "design": { "fields": { "variant": { "type": "option", "values": { "xl": "header2" } } } }
            },
            { "type": "text", "id": "t1", "content": "no design block here" }
        ],
        "slots": {
            "footer": [
                {
                    "type": "mystery-widget",
                    "id": "m1",
                    "design": { "fields": { "knob": { "field_type": "dial", "values": { "turns": 3 } } } }
                }
            ]
        }
    }));

    let outcome = registry.validate_tree(&root).unwrap();
    assert!(!outcome.is_valid());

    // Valid blocks: h1's declared option, the unknown widget's custom field.
    let ids: Vec<&str> = outcome.blocks.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["h1", "m1"]);
    assert_eq!(outcome.blocks["m1"].fields["knob"].kind(), FieldKind::Custom);

    // One broken component, attributed with its path.
    assert_eq!(outcome.errors.len(), 1);
    let broken = &outcome.errors[0];
    assert_eq!(broken.component_id, "h2");
    assert_eq!(broken.component_type, "headline");
    assert_eq!(broken.path, "page[0]/headline[1]");
    assert_eq!(broken.errors.len(), 1);
    assert_eq!(broken.errors[0].field, "variant");
}

#[test]
fn all_valid_tree_reports_clean() {
    let registry = SchemaRegistry::builtin();
    let root = tree(json!({
        "type": "section",
        "id": "s1",
        "design": { "fields": {
            "hidden": { "type": "boolean", "values": { "m": "false" } },
            "spacing": { "type": "spacing", "values": { "s": { "pt": "8px", "pb": "8px" } } }
        } },
        "children": [ { "type": "text", "id": "t1", "content": "hi" } ]
    }));

    let outcome = registry.validate_tree(&root).unwrap();
    assert!(outcome.is_valid());
    assert_eq!(outcome.blocks.len(), 1);
    assert!(outcome.blocks.contains_key("s1"));
}
