use crate::node::IrfNode;
use std::collections::HashMap;
use thiserror::Error;

/// Depth cap for traversal.
///
/// An owned tree cannot alias, so a true reference cycle cannot occur here; what a cyclic or
/// runaway producer bug degrades to after deserialization is unbounded depth, and that is
/// what this guards against.
pub const MAX_DEPTH: usize = 512;

/// Fatal structural errors. Unlike schema errors these are never collected; a tree that
/// trips one cannot be meaningfully diffed or published.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TraversalError {
    #[error("tree exceeds maximum depth {max} at node `{id}`")]
    DepthExceeded { id: String, max: usize },
}

/// Identity violations found by [`verify_ids`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("duplicate node id `{id}` at `{first_path}` and `{second_path}`")]
    DuplicateId {
        id: String,
        first_path: String,
        second_path: String,
    },

    #[error(transparent)]
    Traversal(#[from] TraversalError),
}

/// A node paired with its structural path, produced by [`flatten_with_paths`].
///
/// Paths are slash-joined `type[index]` segments, with `type@slot[index]` for nodes that
/// live in a named slot. They are display metadata; identity matching always uses `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatNode<'a> {
    pub path: String,
    pub node: &'a IrfNode,
}

/// Lazy preorder iterator over a tree in canonical order: each node, then its `children`
/// in order, then each slot's nodes in slot declaration order.
///
/// Yields `Err` once and then nothing further if the depth cap is exceeded. Every call to
/// [`IrfNode::iter`] produces a fresh, independent iterator; there is no shared state.
#[derive(Debug, Clone)]
pub struct NodeIter<'a> {
    stack: Vec<(&'a IrfNode, usize)>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = Result<&'a IrfNode, TraversalError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        if depth > MAX_DEPTH {
            self.stack.clear();
            return Some(Err(TraversalError::DepthExceeded {
                id: node.id.clone(),
                max: MAX_DEPTH,
            }));
        }
        // Descendants go on the stack in reverse so the first child is popped next.
        let descendants: Vec<&IrfNode> = node.descendants().collect();
        for child in descendants.into_iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some(Ok(node))
    }
}

impl IrfNode {
    /// Iterate this node and every descendant lazily, in canonical order.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter {
            stack: vec![(self, 0)],
        }
    }
}

/// Visit `node` and every descendant in canonical order.
///
/// Every consumer (collection, token resolution, diffing) uses this order, so results are
/// reproducible across runs.
pub fn walk<'a, F>(node: &'a IrfNode, visit: &mut F) -> Result<(), TraversalError>
where
    F: FnMut(&'a IrfNode),
{
    for item in node.iter() {
        visit(item?);
    }
    Ok(())
}

/// Flatten a tree into canonical order, recording each node's structural path.
pub fn flatten_with_paths(root: &IrfNode) -> Result<Vec<FlatNode<'_>>, TraversalError> {
    let mut out = Vec::new();
    let segment = format!("{}[0]", root.node_type);
    flatten_at(root, &segment, 0, &mut out)?;
    Ok(out)
}

fn flatten_at<'a>(
    node: &'a IrfNode,
    path: &str,
    depth: usize,
    out: &mut Vec<FlatNode<'a>>,
) -> Result<(), TraversalError> {
    if depth > MAX_DEPTH {
        return Err(TraversalError::DepthExceeded {
            id: node.id.clone(),
            max: MAX_DEPTH,
        });
    }
    out.push(FlatNode {
        path: path.to_string(),
        node,
    });
    for (index, child) in node.children.iter().enumerate() {
        let child_path = format!("{path}/{}[{index}]", child.node_type);
        flatten_at(child, &child_path, depth + 1, out)?;
    }
    for (slot, nodes) in &node.slots {
        for (index, child) in nodes.iter().enumerate() {
            let child_path = format!("{path}/{}@{slot}[{index}]", child.node_type);
            flatten_at(child, &child_path, depth + 1, out)?;
        }
    }
    Ok(())
}

/// Collect every node matching `predicate`, in canonical order. Each call starts a fresh
/// traversal; there is no shared iterator state.
pub fn collect<'a, P>(root: &'a IrfNode, predicate: P) -> Result<Vec<&'a IrfNode>, TraversalError>
where
    P: Fn(&IrfNode) -> bool,
{
    root.iter()
        .filter(|item| match item {
            Ok(node) => predicate(node),
            Err(_) => true,
        })
        .collect()
}

/// All nodes of the given component type, in canonical order.
pub fn find_all<'a>(root: &'a IrfNode, node_type: &str) -> Result<Vec<&'a IrfNode>, TraversalError> {
    collect(root, |node| node.node_type == node_type)
}

pub fn count_nodes(root: &IrfNode) -> Result<usize, TraversalError> {
    let mut count = 0usize;
    walk(root, &mut |_| count += 1)?;
    Ok(count)
}

/// Check that every id in the tree is unique. The diff engine requires this before it can
/// match nodes across versions; a duplicate is reported, never resolved by picking one
/// occurrence.
pub fn verify_ids(root: &IrfNode) -> Result<(), IntegrityError> {
    let flat = flatten_with_paths(root)?;
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for entry in &flat {
        if let Some(first_path) = seen.get(entry.node.id.as_str()) {
            return Err(IntegrityError::DuplicateId {
                id: entry.node.id.clone(),
                first_path: (*first_path).to_string(),
                second_path: entry.path.clone(),
            });
        }
        seen.insert(entry.node.id.as_str(), entry.path.as_str());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::IrfNode;
    use pretty_assertions::assert_eq;

    fn sample_tree() -> IrfNode {
        let mut root = IrfNode::new("section", "s1");
        root.children.push(IrfNode::new("headline", "h1"));
        let mut card = IrfNode::new("editorial-card", "c1");
        card.children.push(IrfNode::new("text", "t1"));
        card.slots
            .insert("media".to_string(), vec![IrfNode::new("image", "i1")]);
        card.slots.insert(
            "footer".to_string(),
            vec![IrfNode::new("button", "b1"), IrfNode::new("button", "b2")],
        );
        root.children.push(card);
        root
    }

    #[test]
    fn walk_visits_children_before_slots() {
        let tree = sample_tree();
        let mut ids = Vec::new();
        walk(&tree, &mut |node| ids.push(node.id.clone())).unwrap();
        assert_eq!(ids, vec!["s1", "h1", "c1", "t1", "i1", "b1", "b2"]);
    }

    #[test]
    fn independent_iterators_yield_the_same_sequence() {
        let tree = sample_tree();
        let first: Vec<&str> = tree.iter().map(|item| item.unwrap().id.as_str()).collect();
        let second: Vec<&str> = tree.iter().map(|item| item.unwrap().id.as_str()).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["s1", "h1", "c1", "t1", "i1", "b1", "b2"]);
    }

    #[test]
    fn iterator_can_stop_early() {
        let tree = sample_tree();
        let prefix: Vec<&str> = tree
            .iter()
            .take(3)
            .map(|item| item.unwrap().id.as_str())
            .collect();
        assert_eq!(prefix, vec!["s1", "h1", "c1"]);
    }

    #[test]
    fn iterator_surfaces_depth_error_and_ends() {
        let mut node = IrfNode::new("text", "leaf");
        for i in 0..(MAX_DEPTH + 1) {
            let mut parent = IrfNode::new("section", format!("s{i}"));
            parent.children.push(node);
            node = parent;
        }
        let mut iter = node.iter();
        let last = iter.find(|item| item.is_err()).unwrap();
        assert!(matches!(
            last,
            Err(TraversalError::DepthExceeded { .. })
        ));
        assert!(iter.next().is_none());
    }

    #[test]
    fn collect_is_restartable_and_deterministic() {
        let tree = sample_tree();
        let first: Vec<&str> = collect(&tree, |_| true)
            .unwrap()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        let second: Vec<&str> = collect(&tree, |_| true)
            .unwrap()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn find_all_matches_type_across_slots() {
        let tree = sample_tree();
        let buttons = find_all(&tree, "button").unwrap();
        let ids: Vec<&str> = buttons.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
    }

    #[test]
    fn flatten_records_slot_paths() {
        let tree = sample_tree();
        let flat = flatten_with_paths(&tree).unwrap();
        let paths: Vec<&str> = flat.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "section[0]",
                "section[0]/headline[0]",
                "section[0]/editorial-card[1]",
                "section[0]/editorial-card[1]/text[0]",
                "section[0]/editorial-card[1]/image@media[0]",
                "section[0]/editorial-card[1]/button@footer[0]",
                "section[0]/editorial-card[1]/button@footer[1]",
            ]
        );
    }

    #[test]
    fn depth_guard_trips_on_runaway_nesting() {
        let mut node = IrfNode::new("text", "leaf");
        for i in 0..(MAX_DEPTH + 1) {
            let mut parent = IrfNode::new("section", format!("s{i}"));
            parent.children.push(node);
            node = parent;
        }
        let err = count_nodes(&node).unwrap_err();
        assert!(matches!(err, TraversalError::DepthExceeded { .. }));
    }

    #[test]
    fn verify_ids_flags_duplicates() {
        let mut tree = sample_tree();
        tree.children.push(IrfNode::new("text", "h1"));
        let err = verify_ids(&tree).unwrap_err();
        match err {
            IntegrityError::DuplicateId {
                id,
                first_path,
                second_path,
            } => {
                assert_eq!(id, "h1");
                assert_eq!(first_path, "section[0]/headline[0]");
                assert_eq!(second_path, "section[0]/text[2]");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn verify_ids_accepts_unique_tree() {
        assert!(verify_ids(&sample_tree()).is_ok());
    }
}
