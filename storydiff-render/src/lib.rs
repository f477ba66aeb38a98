//! Rendering helpers (summary line, markdown, visual HTML) for diff records.
//!
//! All three renderers are pure projections: they read the change records and derived
//! summary as-is, never recompute or mutate them, and produce byte-identical output for
//! equal inputs so the approval UI can snapshot them. `generated_at` is deliberately not
//! rendered; it would make otherwise-identical diffs differ.

use storydiff_engine::{ChangeType, ComponentChange, DiffRecord, PropertyChange};

/// One-line human summary, e.g. `3 changes: 1 added, 0 removed, 2 modified (4 properties)`.
pub fn to_summary_string(record: &DiffRecord) -> String {
    let summary = &record.summary;
    if summary.total_changes == 0 {
        return "No changes.".to_string();
    }
    let noun = if summary.total_changes == 1 {
        "change"
    } else {
        "changes"
    };
    let property_noun = if summary.properties_changed == 1 {
        "property"
    } else {
        "properties"
    };
    format!(
        "{} {}: {} added, {} removed, {} modified ({} {})",
        summary.total_changes,
        noun,
        summary.components_added,
        summary.components_removed,
        summary.components_modified,
        summary.properties_changed,
        property_noun
    )
}

pub fn to_markdown(record: &DiffRecord) -> String {
    let mut out = String::new();
    out.push_str("# Story diff\n\n");
    out.push_str(&format!("- Added: {}\n", record.summary.components_added));
    out.push_str(&format!("- Removed: {}\n", record.summary.components_removed));
    out.push_str(&format!(
        "- Modified: {}\n",
        record.summary.components_modified
    ));
    out.push_str(&format!(
        "- Properties changed: {}\n\n",
        record.summary.properties_changed
    ));

    if record.changes.is_empty() {
        out.push_str("_No changes._\n");
        return out;
    }

    for (heading, change_type) in [
        ("## Added", ChangeType::Added),
        ("## Removed", ChangeType::Removed),
        ("## Modified", ChangeType::Modified),
    ] {
        let group: Vec<&ComponentChange> = record
            .changes
            .iter()
            .filter(|c| c.change_type == change_type)
            .collect();
        if group.is_empty() {
            continue;
        }
        out.push_str(heading);
        out.push_str("\n\n");
        for (i, change) in group.iter().enumerate() {
            out.push_str(&format!(
                "### {}. {} `{}`\n\n",
                i + 1,
                change.component_type,
                change.component_id.as_deref().unwrap_or("-")
            ));
            if let Some(name) = &change.component_name {
                out.push_str(&format!("- Name: {name}\n"));
            }
            out.push_str(&format!("- Path: `{}`\n", change.path));
            if !change.property_changes.is_empty() {
                out.push_str("\n**Properties**\n\n");
                for property in &change.property_changes {
                    out.push_str(&format!("- {}\n", property_line(property)));
                }
            }
            out.push('\n');
        }
    }

    out
}

pub fn to_visual_html(record: &DiffRecord) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"storydiff\">\n");
    out.push_str(&format!(
        "  <p class=\"storydiff-summary\">{}</p>\n",
        escape_html(&to_summary_string(record))
    ));

    if !record.changes.is_empty() {
        out.push_str("  <ul class=\"storydiff-changes\">\n");
        for change in &record.changes {
            out.push_str(&format!(
                "    <li class=\"change change-{}\">\n",
                change_label(change.change_type)
            ));
            out.push_str(&format!(
                "      <span class=\"component-type\">{}</span> <code class=\"component-id\">{}</code>\n",
                escape_html(&change.component_type),
                escape_html(change.component_id.as_deref().unwrap_or("-"))
            ));
            out.push_str(&format!(
                "      <code class=\"component-path\">{}</code>\n",
                escape_html(&change.path)
            ));
            if !change.property_changes.is_empty() {
                out.push_str("      <ul class=\"properties\">\n");
                for property in &change.property_changes {
                    out.push_str(&format!(
                        "        <li class=\"property property-{}\"><code>{}</code>",
                        change_label(property.change_type),
                        escape_html(&property.property)
                    ));
                    if let Some(old) = &property.old_value {
                        out.push_str(&format!(
                            " <del>{}</del>",
                            escape_html(&render_value(old))
                        ));
                    }
                    if let Some(new) = &property.new_value {
                        out.push_str(&format!(
                            " <ins>{}</ins>",
                            escape_html(&render_value(new))
                        ));
                    }
                    out.push_str("</li>\n");
                }
                out.push_str("      </ul>\n");
            }
            out.push_str("    </li>\n");
        }
        out.push_str("  </ul>\n");
    }

    out.push_str("</div>\n");
    out
}

/// Attach the rendered markdown and visual payloads to a record, leaving the change
/// records and summary untouched.
pub fn decorate(mut record: DiffRecord) -> DiffRecord {
    record.markdown_diff = Some(to_markdown(&record));
    record.visual_diff = Some(to_visual_html(&record));
    record
}

fn property_line(property: &PropertyChange) -> String {
    let old = property
        .old_value
        .as_ref()
        .map(render_value)
        .unwrap_or_else(|| "(none)".to_string());
    let new = property
        .new_value
        .as_ref()
        .map(render_value)
        .unwrap_or_else(|| "(none)".to_string());
    format!(
        "`{}` {}: `{}` → `{}`",
        property.property,
        change_label(property.change_type),
        old,
        new
    )
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn change_label(change_type: ChangeType) -> &'static str {
    match change_type {
        ChangeType::Added => "added",
        ChangeType::Removed => "removed",
        ChangeType::Modified => "modified",
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
