//! Rendering of check results and merge plans.

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use specmerge_core::plan::AUTO_RESOLVE_COMMENT;
use specmerge_core::{Classification, MergeOutcome, MergePlan, MergePolicy};

use crate::style;

/// Plain-text summary of a speculative merge check.
pub fn format_outcome(base: &str, head: &str, outcome: &MergeOutcome) -> String {
    if !outcome.conflicts {
        return format!("Merge is clean when merging {} into {}", head, base);
    }

    let mut lines = vec![format!(
        "Merge would conflict when merging {} into {}",
        head, base
    )];
    if !outcome.conflicted_files.is_empty() {
        lines.push("Conflicted files:".to_string());
        lines.extend(outcome.conflicted_files.iter().map(|f| format!("- {}", f)));
    }
    if !outcome.conflict_summary.is_empty() {
        lines.push("Conflict summary:".to_string());
        lines.extend(
            outcome
                .conflict_summary
                .iter()
                .map(|(label, count)| format!("- {}: {}", label, count)),
        );
    }
    lines.join("\n")
}

/// Pretty JSON with object keys in sorted order.
pub fn to_sorted_json<T: Serialize>(value: &T) -> Result<String> {
    // serde_json::Map is ordered by key unless `preserve_order` is enabled.
    let value = serde_json::to_value(value).context("failed to serialize result")?;
    serde_json::to_string_pretty(&value).context("failed to render JSON")
}

/// Human-readable merge plan: verdict, per-file table, checks, metadata.
pub fn format_plan(plan: &MergePlan) -> String {
    let mut out = Vec::new();

    out.push(style::header(&format!(
        "Merge plan: {} into {}",
        plan.head, plan.base
    )));
    out.push(String::new());

    if !plan.result.conflicts {
        out.push(style::success("Merge is clean"));
    } else {
        out.push(resolution_table(plan).to_string());
    }
    out.push(String::new());

    out.push(if plan.auto_resolve {
        style::success("Auto-resolve: yes")
    } else {
        style::warn("Manual review required")
    });

    if !plan.safety_checks.is_empty() {
        out.push(String::new());
        out.push(style::header("Safety checks"));
        out.extend(plan.safety_checks.iter().map(|check| format!("  - {}", describe_check(check))));
    }

    if !plan.policy_metadata.is_empty() {
        out.push(String::new());
        out.push(style::header("Policy"));
        for (key, value) in &plan.policy_metadata {
            out.push(format!(
                "  {}: {}",
                scalar_text(key),
                style::dim(&scalar_text(value))
            ));
        }
    }

    out.join("\n")
}

fn resolution_table(plan: &MergePlan) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["File", "Classification", "Resolution"]);

    for file in &plan.result.conflicted_files {
        let classification = plan
            .result
            .classification(file)
            .unwrap_or(Classification::Unknown);
        let resolution = plan.resolution(file).unwrap_or("-");

        let class_cell = match classification {
            Classification::CommentOnly => Cell::new(classification).fg(Color::Green),
            Classification::Code => Cell::new(classification).fg(Color::Red),
            Classification::Unknown => Cell::new(classification).fg(Color::Yellow),
        };
        let resolution_cell = if resolution == AUTO_RESOLVE_COMMENT {
            Cell::new(resolution).fg(Color::Green)
        } else {
            Cell::new(resolution)
        };

        table.add_row(vec![Cell::new(file), class_cell, resolution_cell]);
    }

    table
}

/// One-line description of a safety check record.
fn describe_check(check: &Mapping) -> String {
    let name = check.get("name").map(scalar_text);
    let command = check.get("command").map(scalar_text);
    let required = check.get("required").and_then(Value::as_bool).unwrap_or(false);

    let mut text = match (name, command) {
        (Some(name), Some(command)) => format!("{}: {}", name, command),
        (Some(name), None) => name,
        (None, Some(command)) => command,
        (None, None) => serde_yaml::to_string(check)
            .map(|s| s.trim().replace('\n', ", "))
            .unwrap_or_default(),
    };
    if required {
        text.push_str(" (required)");
    }
    text
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "~".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Short validation summary for a loaded policy.
pub fn format_policy_summary(source: &str, policy: &MergePolicy) -> String {
    let mut lines = vec![
        format!("Policy source : {}", source),
        format!("Priority rules: {}", policy.priority_rules.len()),
    ];
    lines.extend(
        policy
            .priority_rules
            .iter()
            .map(|rule| format!("  {} -> {}", rule.pattern, rule.resolution)),
    );
    lines.push(format!("Fallback      : {}", policy.fallback));
    lines.push(format!(
        "Comment-only  : {}",
        if policy.comment_heuristic() {
            "auto-resolve"
        } else {
            "fallback"
        }
    ));
    lines.push(format!("Safety checks : {}", policy.safety_checks.len()));
    lines.join("\n")
}
