//! End-to-end checks against a wire-shaped IRF tree as the upstream pipeline emits it.

use pretty_assertions::assert_eq;
use storydiff_irf::{IrfNode, collect, count_nodes, find_all, verify_ids};

fn wire_tree() -> serde_json::Value {
    serde_json::json!({
        "type": "page",
        "id": "root",
        "name": "Landing",
        "children": [
            {
                "type": "section",
                "id": "s1",
                "design": {
                    "fields": {
                        "backgroundColor": {
                            "type": "color-picker",
                            "values": { "s": { "selected": { "id": 4, "name": "Pink", "value": "#FF329B" } } }
                        }
                    }
                },
                "children": [
                    { "type": "headline", "id": "h1", "content": "Hello" },
                    { "type": "text", "id": "t1", "content": { "type": "doc", "content": [] } }
                ]
            },
            {
                "type": "editorial-card",
                "id": "c1",
                "slots": {
                    "media": [ { "type": "image", "id": "i1" } ],
                    "body": [ { "type": "text", "id": "t2", "content": "Caption" } ]
                }
            }
        ]
    })
}

#[test]
fn parses_and_round_trips_wire_shape() {
    let raw = wire_tree();
    let tree: IrfNode = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(serde_json::to_value(&tree).unwrap(), raw);
}

#[test]
fn traversal_covers_children_and_slots() {
    let tree: IrfNode = serde_json::from_value(wire_tree()).unwrap();
    assert_eq!(count_nodes(&tree).unwrap(), 7);

    let ids: Vec<String> = collect(&tree, |_| true)
        .unwrap()
        .iter()
        .map(|n| n.id.clone())
        .collect();
    assert_eq!(ids, vec!["root", "s1", "h1", "t1", "c1", "i1", "t2"]);

    let texts = find_all(&tree, "text").unwrap();
    assert_eq!(texts.len(), 2);

    verify_ids(&tree).unwrap();
}
