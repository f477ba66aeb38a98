use crate::change::{ChangeType, ComponentChange, DiffRecord, DiffSummary, PropertyChange};
use chrono::Utc;
use indexmap::IndexMap;
use serde_json::Value;
use storydiff_irf::{FlatNode, IrfNode, TraversalError, flatten_with_paths};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct DiffOptions {
    /// Also compare the design block's `plugin`/`version` provenance metadata. Off by
    /// default: provenance churn is editor noise, not a content change.
    pub compare_provenance: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error(transparent)]
    Traversal(#[from] TraversalError),

    /// Duplicate ids make identity matching ambiguous, so the diff refuses the input.
    #[error("duplicate node id `{id}` in {side} tree at `{first_path}` and `{second_path}`")]
    IdentityIntegrity {
        side: &'static str,
        id: String,
        first_path: String,
        second_path: String,
    },
}

/// Diff two tree versions into an ordered, sparse change list plus derived summary.
///
/// Classification is by id: present only in `new` is added, only in `old` is removed,
/// present in both is compared property-by-property and reported as modified only if
/// something actually differs. Unchanged and merely-moved nodes emit nothing. The change
/// list is ordered added, then removed, then modified, each group in canonical traversal
/// order, so output is stable across runs for snapshot purposes.
pub fn diff_trees(
    old: &IrfNode,
    new: &IrfNode,
    options: DiffOptions,
) -> Result<DiffRecord, DiffError> {
    let old_flat = flatten_with_paths(old)?;
    let new_flat = flatten_with_paths(new)?;
    let old_index = index_by_id(&old_flat, "old")?;
    let new_index = index_by_id(&new_flat, "new")?;

    let mut added = Vec::new();
    let mut modified = Vec::new();
    for entry in &new_flat {
        match old_index.get(entry.node.id.as_str()) {
            None => added.push(whole_component_change(ChangeType::Added, entry)),
            Some(old_entry) => {
                if let Some(change) = diff_matched(old_entry, entry, options) {
                    modified.push(change);
                }
            }
        }
    }

    let removed: Vec<ComponentChange> = old_flat
        .iter()
        .filter(|entry| !new_index.contains_key(entry.node.id.as_str()))
        .map(|entry| whole_component_change(ChangeType::Removed, entry))
        .collect();

    let mut changes = added;
    changes.extend(removed);
    changes.extend(modified);

    let summary = DiffSummary::from_changes(&changes);
    debug!(
        added = summary.components_added,
        removed = summary.components_removed,
        modified = summary.components_modified,
        "tree diff computed"
    );

    Ok(DiffRecord {
        summary,
        changes,
        markdown_diff: None,
        visual_diff: None,
        generated_at: Utc::now(),
    })
}

fn index_by_id<'a>(
    flat: &'a [FlatNode<'a>],
    side: &'static str,
) -> Result<IndexMap<&'a str, &'a FlatNode<'a>>, DiffError> {
    let mut index: IndexMap<&str, &FlatNode<'_>> = IndexMap::with_capacity(flat.len());
    for entry in flat {
        if let Some(first) = index.insert(entry.node.id.as_str(), entry) {
            return Err(DiffError::IdentityIntegrity {
                side,
                id: entry.node.id.clone(),
                first_path: first.path.clone(),
                second_path: entry.path.clone(),
            });
        }
    }
    Ok(index)
}

fn whole_component_change(change_type: ChangeType, entry: &FlatNode<'_>) -> ComponentChange {
    let node = entry.node;
    let (old_component, new_component) = match change_type {
        ChangeType::Removed => (Some(node.clone()), None),
        _ => (None, Some(node.clone())),
    };
    ComponentChange {
        change_type,
        path: entry.path.clone(),
        component_type: node.node_type.clone(),
        component_id: Some(node.id.clone()),
        component_name: node.name.clone(),
        old_component,
        new_component,
        property_changes: Vec::new(),
    }
}

/// Compare a matched pair. Returns a `modified` change when any property differs or the
/// component type itself changed; `None` for unchanged pairs (the diff is sparse).
fn diff_matched(
    old: &FlatNode<'_>,
    new: &FlatNode<'_>,
    options: DiffOptions,
) -> Option<ComponentChange> {
    // Property paths use the new tree's position; the old path is reachable through
    // old_component for consumers that need it.
    let path = new.path.as_str();
    let mut properties = Vec::new();

    diff_design_fields(old.node, new.node, path, &mut properties);

    if options.compare_provenance {
        let old_design = old.node.design.as_ref();
        let new_design = new.node.design.as_ref();
        let old_plugin = old_design.and_then(|d| d.plugin.clone()).map(Value::String);
        let new_plugin = new_design.and_then(|d| d.plugin.clone()).map(Value::String);
        push_property(path, "plugin", old_plugin, new_plugin, &mut properties);
        let old_version = old_design.and_then(|d| d.version.clone()).map(Value::String);
        let new_version = new_design.and_then(|d| d.version.clone()).map(Value::String);
        push_property(path, "version", old_version, new_version, &mut properties);
    }

    push_property(
        path,
        "content",
        old.node.content.clone(),
        new.node.content.clone(),
        &mut properties,
    );

    let type_changed = old.node.node_type != new.node.node_type;
    if properties.is_empty() && !type_changed {
        return None;
    }

    Some(ComponentChange {
        change_type: ChangeType::Modified,
        path: new.path.clone(),
        component_type: new.node.node_type.clone(),
        component_id: Some(new.node.id.clone()),
        component_name: new.node.name.clone(),
        old_component: Some(old.node.clone()),
        new_component: Some(new.node.clone()),
        property_changes: properties,
    })
}

fn diff_design_fields(
    old: &IrfNode,
    new: &IrfNode,
    path: &str,
    out: &mut Vec<PropertyChange>,
) {
    let old_fields = old.design.as_ref().map(|d| &d.fields);
    let new_fields = new.design.as_ref().map(|d| &d.fields);

    // New block's declaration order first, then fields only the old block had.
    if let Some(new_fields) = new_fields {
        for (name, new_value) in new_fields {
            let old_value = old_fields.and_then(|f| f.get(name));
            push_property(
                path,
                name,
                old_value.cloned(),
                Some(new_value.clone()),
                out,
            );
        }
    }
    if let Some(old_fields) = old_fields {
        for (name, old_value) in old_fields {
            let in_new = new_fields.is_some_and(|f| f.contains_key(name));
            if !in_new {
                push_property(path, name, Some(old_value.clone()), None, out);
            }
        }
    }
}

fn push_property(
    path: &str,
    property: &str,
    old_value: Option<Value>,
    new_value: Option<Value>,
    out: &mut Vec<PropertyChange>,
) {
    let change_type = match (&old_value, &new_value) {
        (None, None) => return,
        (Some(a), Some(b)) if a == b => return,
        (Some(_), Some(_)) => ChangeType::Modified,
        (None, Some(_)) => ChangeType::Added,
        (Some(_), None) => ChangeType::Removed,
    };
    out.push(PropertyChange {
        property: property.to_string(),
        path: path.to_string(),
        old_value,
        new_value,
        change_type,
    });
}
