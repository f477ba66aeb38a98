use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single node in an IRF content tree.
///
/// `children` is the single default content region; `slots` holds additional named regions
/// for components with more than one (e.g. an editorial card with `media` and `body` slots).
/// A node's effective descendants are `children` followed by every slot's nodes in slot
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrfNode {
    /// Component kind tag, e.g. `"section"` or `"headline"`. Open set; unknown tags are
    /// carried through untouched.
    #[serde(rename = "type")]
    pub node_type: String,

    /// Stable identity, unique within one tree version. Diffing matches nodes across
    /// versions by this id, never by position.
    pub id: String,

    /// Optional human label; no semantic weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Responsive styling directives; absent means "no styling declared".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<DesignBlock>,

    /// Leaf payload: a plain string or a rich-text document. Absent for purely
    /// structural nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<IrfNode>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub slots: IndexMap<String, Vec<IrfNode>>,
}

impl IrfNode {
    pub fn new(node_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            id: id.into(),
            name: None,
            design: None,
            content: None,
            children: Vec::new(),
            slots: IndexMap::new(),
        }
    }

    /// All direct descendants: `children` first, then each slot's nodes in declaration
    /// order. This is the single branching abstraction traversal and diffing consume.
    pub fn descendants(&self) -> impl Iterator<Item = &IrfNode> {
        self.children
            .iter()
            .chain(self.slots.values().flat_map(|nodes| nodes.iter()))
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.slots.values().all(|nodes| nodes.is_empty())
    }
}

/// Per-node design directives as found on the wire. Field values are raw JSON here;
/// `storydiff-schema` turns them into typed `FieldValue`s.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DesignBlock {
    #[serde(default)]
    pub fields: IndexMap<String, serde_json::Value>,

    /// Provenance: which editor plugin produced this block. Not compared during diffing
    /// unless explicitly requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{DesignBlock, IrfNode};
    use pretty_assertions::assert_eq;

    #[test]
    fn deserialize_tolerates_missing_optionals() {
        let node: IrfNode =
            serde_json::from_value(serde_json::json!({ "type": "headline", "id": "h1" })).unwrap();
        assert_eq!(node.node_type, "headline");
        assert!(node.children.is_empty());
        assert!(node.slots.is_empty());
        assert!(node.is_leaf());
    }

    #[test]
    fn unknown_component_type_is_preserved() {
        let raw = serde_json::json!({
            "type": "holo-carousel-3000",
            "id": "x1",
            "content": "future tech"
        });
        let node: IrfNode = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(node.node_type, "holo-carousel-3000");
        assert_eq!(serde_json::to_value(&node).unwrap(), raw);
    }

    #[test]
    fn descendants_order_children_then_slots() {
        let mut node = IrfNode::new("editorial-card", "card1");
        node.children.push(IrfNode::new("text", "t1"));
        node.slots
            .insert("media".to_string(), vec![IrfNode::new("image", "i1")]);
        node.slots
            .insert("footer".to_string(), vec![IrfNode::new("button", "b1")]);

        let ids: Vec<&str> = node.descendants().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "i1", "b1"]);
    }

    #[test]
    fn design_block_round_trips_field_order() {
        let raw = serde_json::json!({
            "fields": {
                "variant": { "type": "option", "values": { "s": "header2" } },
                "spacing": { "type": "spacing", "values": {} }
            },
            "plugin": "backpack-breakpoints",
            "version": "2.1.0"
        });
        let block: DesignBlock = serde_json::from_value(raw.clone()).unwrap();
        let keys: Vec<&str> = block.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["variant", "spacing"]);
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }
}
