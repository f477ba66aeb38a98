use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storydiff_irf::IrfNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

/// One changed property on a matched component. `property` is a design-field name, or the
/// synthetic `"content"` for the node's own payload, or `"plugin"`/`"version"` when
/// provenance comparison is requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyChange {
    pub property: String,

    /// Structural path of the owning component; display metadata only.
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<serde_json::Value>,

    pub change_type: ChangeType,
}

/// One component-level change. Created once per diff run, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentChange {
    #[serde(rename = "type")]
    pub change_type: ChangeType,

    pub path: String,

    pub component_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_component: Option<IrfNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_component: Option<IrfNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_changes: Vec<PropertyChange>,
}

/// Aggregate counters, always derived from the change list, never hand-mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub components_added: u64,
    pub components_removed: u64,
    pub components_modified: u64,
    pub properties_changed: u64,
    pub total_changes: u64,
}

impl DiffSummary {
    pub fn from_changes(changes: &[ComponentChange]) -> Self {
        let mut summary = DiffSummary::default();
        for change in changes {
            match change.change_type {
                ChangeType::Added => summary.components_added += 1,
                ChangeType::Removed => summary.components_removed += 1,
                ChangeType::Modified => {
                    summary.components_modified += 1;
                    summary.properties_changed += change.property_changes.len() as u64;
                }
            }
        }
        summary.total_changes =
            summary.components_added + summary.components_removed + summary.components_modified;
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.total_changes == 0
    }
}

/// The diff envelope handed to the approval UI and the approval-granted dispatcher.
/// `markdown_diff`/`visual_diff` are filled by `storydiff-render`, never computed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRecord {
    pub summary: DiffSummary,

    #[serde(default)]
    pub changes: Vec<ComponentChange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown_diff: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_diff: Option<String>,

    pub generated_at: DateTime<Utc>,
}
