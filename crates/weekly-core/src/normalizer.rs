//! Content normalizer: heterogeneous raw record → canonical [`ReportRecord`].
//!
//! Producers hand over whatever shape they have (form data, hand-edited YAML, legacy
//! files, LLM JSON). Each field has its own decoder that inspects the shape and maps
//! every accepted variant onto the canonical type. Unknown shapes fall back to the
//! field's default; nothing in here fails.

use crate::marked::normalize_bullets;
use crate::record::{
    AiTask, ExecutionItem, FrictionItem, ReportRecord, SopItem, DEFAULT_SOP_ITEM, NOT_AVAILABLE,
};
use serde_json::{Map, Value};
use tracing::debug;

/// Legacy execution ordering: description after the bullets (default) or before them.
const ORDER_DESCRIPTION_FIRST: &str = "description_first";

/// Normalize a raw record. Total: missing or malformed fields get their documented defaults.
pub fn normalize(raw: &Value) -> ReportRecord {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or_else(|| {
        debug!("record is not a mapping; using defaults for every field");
        &empty
    });

    let name = scalar_field(obj, "name");
    let name_for_file = obj
        .get("name_for_file")
        .map(text_of)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut record = ReportRecord {
        name,
        role: scalar_field(obj, "role"),
        week: scalar_field(obj, "week"),
        name_for_file,
        weekly_objective: scalar_field(obj, "weekly_objective"),
        execution_output: normalize_execution_output(obj.get("execution_output")),
        ai_acceleration_tasks: normalize_ai_tasks(obj),
        sop_items: normalize_sop_items(obj),
        friction_blockers_ask: normalize_friction_items(obj.get("friction_blockers_ask")),
        next_week_focus: normalize_focus(obj.get("next_week_focus")),
    };
    normalize_marked_fields(&mut record);
    record
}

/// Apply [`normalize_bullets`] to every marked-text field.
pub fn normalize_marked_fields(record: &mut ReportRecord) {
    for item in &mut record.execution_output {
        item.content = normalize_bullets(&item.content);
    }
    for task in &mut record.ai_acceleration_tasks {
        task.insight_failure = normalize_bullets(&task.insight_failure);
    }
    for sop in &mut record.sop_items {
        sop.impact = normalize_bullets(&sop.impact);
    }
    for friction in &mut record.friction_blockers_ask {
        friction.action_mitigation = normalize_bullets(&friction.action_mitigation);
        friction.ask_attention_needed = normalize_bullets(&friction.ask_attention_needed);
    }
}

// ---------------------------------------------------------------------------
// Field decoders
// ---------------------------------------------------------------------------

fn normalize_execution_output(raw: Option<&Value>) -> Vec<ExecutionItem> {
    let items: Vec<ExecutionItem> = match raw {
        Some(Value::Array(entries)) => entries.iter().map(execution_item).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(single) => vec![execution_item(single)],
    };
    if items.is_empty() {
        return vec![ExecutionItem::default()];
    }
    items
}

fn execution_item(entry: &Value) -> ExecutionItem {
    match entry {
        Value::Object(obj) => {
            let content = match obj.get("content") {
                Some(content) => marked_text_of(content),
                None => content_from_legacy_execution(obj),
            };
            ExecutionItem {
                summary: scalar_field(obj, "summary"),
                content,
            }
        }
        other => ExecutionItem {
            summary: String::new(),
            content: text_of(other),
        },
    }
}

/// Rebuild one content string from the legacy `{description, bullets, order}` shape.
fn content_from_legacy_execution(obj: &Map<String, Value>) -> String {
    let description = scalar_field(obj, "description");
    let bullets: Vec<String> = match obj.get("bullets") {
        Some(Value::Array(list)) => list
            .iter()
            .map(text_of)
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .lines()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    };
    let description_first = obj
        .get("order")
        .and_then(Value::as_str)
        .map(|o| o.trim() == ORDER_DESCRIPTION_FIRST)
        .unwrap_or(false);

    let mut parts = Vec::with_capacity(bullets.len() + 1);
    if description_first && !description.is_empty() {
        parts.push(description.clone());
    }
    parts.extend(bullets.iter().map(|b| format!("- {}", b)));
    if !description_first && !description.is_empty() {
        parts.push(description);
    }
    parts.join("\n")
}

/// AI tasks live under `transformation_log.ai_acceleration_tasks` (file shape) or
/// top-level `ai_acceleration_tasks` (LLM shape). The container is a list or a map keyed
/// by task index. Rows with every field blank are dropped.
fn normalize_ai_tasks(obj: &Map<String, Value>) -> Vec<AiTask> {
    let container = obj
        .get("transformation_log")
        .and_then(|tl| tl.get("ai_acceleration_tasks"))
        .or_else(|| obj.get("ai_acceleration_tasks"));

    let rows: Vec<&Value> = match container {
        Some(Value::Array(list)) => list.iter().collect(),
        Some(Value::Object(by_index)) => {
            let mut indexed: Vec<(u64, &Value)> = by_index
                .iter()
                .filter_map(|(k, v)| match k.trim().parse::<u64>() {
                    Ok(i) => Some((i, v)),
                    Err(_) => {
                        debug!(key = %k, "skipping AI task with non-numeric index");
                        None
                    }
                })
                .collect();
            indexed.sort_by_key(|(i, _)| *i);
            indexed.into_iter().map(|(_, v)| v).collect()
        }
        _ => Vec::new(),
    };

    rows.into_iter()
        .filter_map(|row| row.as_object())
        .map(|row| AiTask {
            task: scalar_field(row, "task"),
            tool_agent: scalar_field(row, "tool_agent"),
            time_saved: scalar_field(row, "time_saved"),
            insight_failure: row
                .get("insight_failure")
                .map(marked_text_of)
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        })
        .filter(|task| !task.is_blank())
        .collect()
}

/// SOP items: a `sop_items` list or single `{item, impact}` object, then the same two
/// shapes under `sop_process_solidification` (`items` list or the object itself).
/// Never empty.
fn normalize_sop_items(obj: &Map<String, Value>) -> Vec<SopItem> {
    let legacy = obj.get("sop_process_solidification");
    let candidates = [
        obj.get("sop_items"),
        legacy.and_then(|s| s.get("items")),
        legacy,
    ];

    let items = candidates
        .into_iter()
        .flatten()
        .find_map(|value| match value {
            Value::Array(entries) if !entries.is_empty() => {
                Some(entries.iter().map(sop_item).collect::<Vec<_>>())
            }
            Value::Object(single) if single.contains_key("item") || single.contains_key("impact") => {
                Some(vec![sop_item(value)])
            }
            _ => None,
        });
    items.unwrap_or_else(|| vec![SopItem::default()])
}

fn sop_item(entry: &Value) -> SopItem {
    let Some(obj) = entry.as_object() else {
        return SopItem::default();
    };
    let item = scalar_field(obj, "item");
    let impact = obj.get("impact").map(marked_text_of).unwrap_or_default();
    SopItem {
        item: if item.is_empty() {
            DEFAULT_SOP_ITEM.to_string()
        } else {
            item
        },
        impact: if impact.trim().is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            impact
        },
    }
}

/// Friction entries: list of mappings or bare strings. Never empty.
fn normalize_friction_items(raw: Option<&Value>) -> Vec<FrictionItem> {
    let items: Vec<FrictionItem> = match raw {
        Some(Value::Array(entries)) => entries.iter().map(friction_item).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(single) => vec![friction_item(single)],
    };
    if items.is_empty() {
        return vec![FrictionItem::default()];
    }
    items
}

fn friction_item(entry: &Value) -> FrictionItem {
    match entry {
        Value::Object(obj) => FrictionItem {
            friction: scalar_field(obj, "friction"),
            action_mitigation: obj
                .get("action_mitigation")
                .map(marked_text_of)
                .unwrap_or_default(),
            ask_attention_needed: obj
                .get("ask_attention_needed")
                .map(marked_text_of)
                .unwrap_or_default(),
        },
        other => FrictionItem {
            friction: text_of(other).trim().to_string(),
            ..Default::default()
        },
    }
}

fn normalize_focus(raw: Option<&Value>) -> Vec<String> {
    let entries: Vec<String> = match raw {
        Some(Value::Array(list)) => list.iter().map(text_of).collect(),
        Some(Value::String(s)) => s.lines().map(String::from).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![text_of(other)],
    };
    entries
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Scalar coercion
// ---------------------------------------------------------------------------

/// Trimmed string for `key`, empty when missing.
fn scalar_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .map(text_of)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Render any JSON value as text. Null → empty.
fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(list) => list
            .iter()
            .map(text_of)
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(_) => value.to_string(),
    }
}

/// Like [`text_of`], but a list becomes one bullet line per entry.
fn marked_text_of(value: &Value) -> String {
    match value {
        Value::Array(list) => list
            .iter()
            .map(text_of)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(|s| if s.starts_with('-') { s } else { format!("- {}", s) })
            .collect::<Vec<_>>()
            .join("\n"),
        other => text_of(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_record_gets_all_defaults() {
        let record = normalize(&json!({}));
        assert_eq!(record.name, "");
        assert_eq!(record.execution_output, vec![ExecutionItem::default()]);
        assert!(record.ai_acceleration_tasks.is_empty());
        assert_eq!(record.sop_items, vec![SopItem::default()]);
        assert_eq!(record.friction_blockers_ask, vec![FrictionItem::default()]);
        assert!(record.next_week_focus.is_empty());
    }

    #[test]
    fn non_mapping_record_is_absorbed() {
        let record = normalize(&json!(["not", "a", "record"]));
        assert_eq!(record.sop_items, vec![SopItem::default()]);
    }

    #[test]
    fn scalars_are_trimmed() {
        let record = normalize(&json!({"name": "  Ana ", "role": 42, "week": null}));
        assert_eq!(record.name, "Ana");
        assert_eq!(record.role, "42");
        assert_eq!(record.week, "");
    }

    #[test]
    fn legacy_execution_bullets_first_by_default() {
        let record = normalize(&json!({
            "execution_output": [{"summary": "S", "description": "Desc", "bullets": ["a", "b"]}]
        }));
        assert_eq!(record.execution_output[0].content, "- a\n- b\nDesc");
    }

    #[test]
    fn legacy_execution_description_first() {
        let record = normalize(&json!({
            "execution_output": [{
                "description": "Desc",
                "bullets": "a\n\n b ",
                "order": "description_first"
            }]
        }));
        assert_eq!(record.execution_output[0].content, "Desc\n- a\n- b");
    }

    #[test]
    fn scalar_execution_entries_become_content() {
        let record = normalize(&json!({"execution_output": ["did a thing", 7]}));
        assert_eq!(record.execution_output.len(), 2);
        assert_eq!(record.execution_output[0].summary, "");
        assert_eq!(record.execution_output[0].content, "did a thing");
        assert_eq!(record.execution_output[1].content, "7");
    }

    #[test]
    fn empty_sop_list_gets_default_entry() {
        let record = normalize(&json!({"sop_process_solidification": {"items": []}}));
        assert_eq!(
            record.sop_items,
            vec![SopItem {
                item: "None".to_string(),
                impact: "N/A".to_string()
            }]
        );
    }

    #[test]
    fn legacy_single_sop_object() {
        let record = normalize(&json!({
            "sop_process_solidification": {"item": "Runbook", "impact": "Faster onboarding"}
        }));
        assert_eq!(record.sop_items.len(), 1);
        assert_eq!(record.sop_items[0].item, "Runbook");
        assert_eq!(record.sop_items[0].impact, "Faster onboarding");
    }

    #[test]
    fn single_sop_object_under_sop_items() {
        let record = normalize(&json!({
            "sop_items": {"item": "Runbook", "impact": "Faster onboarding"}
        }));
        assert_eq!(
            record.sop_items,
            vec![SopItem {
                item: "Runbook".to_string(),
                impact: "Faster onboarding".to_string()
            }]
        );
    }

    #[test]
    fn empty_sop_items_fall_back_to_legacy_container() {
        let record = normalize(&json!({
            "sop_items": [],
            "sop_process_solidification": {"items": [{"item": "Checklist"}]}
        }));
        assert_eq!(record.sop_items[0].item, "Checklist");
        assert_eq!(record.sop_items[0].impact, "N/A");
    }

    #[test]
    fn llm_sop_items_with_blanks() {
        let record = normalize(&json!({"sop_items": [{"item": "", "impact": "  "}, "junk"]}));
        assert_eq!(record.sop_items, vec![SopItem::default(), SopItem::default()]);
    }

    #[test]
    fn friction_accepts_bare_strings() {
        let record = normalize(&json!({"friction_blockers_ask": ["VPN flaky", {"friction": "CI", "ask_attention_needed": "budget"}]}));
        assert_eq!(
            record.friction_blockers_ask[0],
            FrictionItem {
                friction: "VPN flaky".to_string(),
                ..Default::default()
            }
        );
        assert_eq!(record.friction_blockers_ask[1].ask_attention_needed, "budget");
    }

    #[test]
    fn ai_tasks_keyed_by_index_are_sorted_and_filtered() {
        let record = normalize(&json!({
            "transformation_log": {"ai_acceleration_tasks": {
                "10": {"task": "third"},
                "2": {"task": "second"},
                "0": {"task": "first", "tool_agent": "Cursor"},
                "1": {"task": "", "tool_agent": " ", "time_saved": "", "insight_failure": ""}
            }}
        }));
        let tasks: Vec<&str> = record.ai_acceleration_tasks.iter().map(|t| t.task.as_str()).collect();
        assert_eq!(tasks, vec!["first", "second", "third"]);
    }

    #[test]
    fn ai_tasks_top_level_list() {
        let record = normalize(&json!({
            "ai_acceleration_tasks": [{"task": "Drafted tests", "insight_failure": "Good. - missed edge cases"}]
        }));
        assert_eq!(record.ai_acceleration_tasks.len(), 1);
        assert_eq!(
            record.ai_acceleration_tasks[0].insight_failure,
            "Good.\n- missed edge cases"
        );
    }

    #[test]
    fn focus_keeps_trimmed_non_empty_entries() {
        let record = normalize(&json!({"next_week_focus": [" a ", "", "  ", "b"]}));
        assert_eq!(record.next_week_focus, vec!["a", "b"]);
    }

    #[test]
    fn list_content_becomes_bullets() {
        let record = normalize(&json!({
            "execution_output": [{"summary": "S", "content": ["one", "- two"]}]
        }));
        assert_eq!(record.execution_output[0].content, "- one\n- two");
    }

    #[test]
    fn inline_bullets_fixed_in_every_marked_field() {
        let record = normalize(&json!({
            "execution_output": [{"summary": "S", "content": "Done. - a"}],
            "sop_items": [{"item": "I", "impact": "Big! - b"}],
            "friction_blockers_ask": [{"friction": "F", "action_mitigation": "Tried: - c", "ask_attention_needed": "Help? - d"}]
        }));
        assert_eq!(record.execution_output[0].content, "Done.\n- a");
        assert_eq!(record.sop_items[0].impact, "Big!\n- b");
        assert_eq!(record.friction_blockers_ask[0].action_mitigation, "Tried:\n- c");
        assert_eq!(record.friction_blockers_ask[0].ask_attention_needed, "Help?\n- d");
    }

    #[test]
    fn canonical_record_is_a_fixed_point() {
        let raw = json!({
            "name": "A",
            "role": "B",
            "week": "2024-01-01 → 2024-01-05",
            "weekly_objective": "Shipped X",
            "execution_output": [{"summary": "S1", "content": "- b1\n- b2"}],
            "ai_acceleration_tasks": [{"task": "t", "tool_agent": "a", "time_saved": "1h", "insight_failure": "i"}],
            "sop_items": [{"item": "None", "impact": "N/A"}],
            "friction_blockers_ask": [{"friction": "", "action_mitigation": "", "ask_attention_needed": ""}],
            "next_week_focus": ["f"]
        });
        let once = normalize(&raw);
        let again = normalize(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, again);
    }
}
