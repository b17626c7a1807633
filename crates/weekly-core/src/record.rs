//! Canonical weekly report record.
//!
//! Every producer (YAML file, CLI, LLM-produced JSON) ends up in this shape after
//! passing through [`crate::normalize`]. The document renderer only ever sees these types.

use serde::{Deserialize, Serialize};

/// Placeholder rendered for any empty marked-text value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Default SOP item label when none was supplied.
pub const DEFAULT_SOP_ITEM: &str = "None";

/// Characters stripped from the person's name when building a download file name.
const FILE_NAME_FORBIDDEN: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// One week's status data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    /// "YYYY-MM-DD → YYYY-MM-DD". Empty means "current week" at render time.
    #[serde(default)]
    pub week: String,
    /// Name used for the download file; defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_for_file: Option<String>,
    #[serde(default)]
    pub weekly_objective: String,
    #[serde(default)]
    pub execution_output: Vec<ExecutionItem>,
    #[serde(default)]
    pub ai_acceleration_tasks: Vec<AiTask>,
    #[serde(default)]
    pub sop_items: Vec<SopItem>,
    #[serde(default)]
    pub friction_blockers_ask: Vec<FrictionItem>,
    #[serde(default)]
    pub next_week_focus: Vec<String>,
}

/// Execution & Output entry: bold summary line followed by marked-text content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionItem {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
}

impl ExecutionItem {
    pub fn is_blank(&self) -> bool {
        self.summary.trim().is_empty() && self.content.trim().is_empty()
    }
}

/// AI Acceleration row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiTask {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub tool_agent: String,
    #[serde(default)]
    pub time_saved: String,
    /// Marked text.
    #[serde(default)]
    pub insight_failure: String,
}

impl AiTask {
    pub fn is_blank(&self) -> bool {
        [&self.task, &self.tool_agent, &self.time_saved, &self.insight_failure]
            .iter()
            .all(|s| s.trim().is_empty())
    }
}

/// SOP & Process Solidification entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SopItem {
    pub item: String,
    /// Marked text.
    pub impact: String,
}

impl Default for SopItem {
    fn default() -> Self {
        Self {
            item: DEFAULT_SOP_ITEM.to_string(),
            impact: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Friction, Blockers & Ask entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrictionItem {
    #[serde(default)]
    pub friction: String,
    /// Marked text.
    #[serde(default)]
    pub action_mitigation: String,
    /// Marked text.
    #[serde(default)]
    pub ask_attention_needed: String,
}

impl FrictionItem {
    pub fn is_blank(&self) -> bool {
        self.friction.trim().is_empty()
            && self.action_mitigation.trim().is_empty()
            && self.ask_attention_needed.trim().is_empty()
    }
}

impl ReportRecord {
    /// `[CAP Weekly Report] <name>.docx`, with path-hostile characters removed.
    pub fn download_file_name(&self) -> String {
        let source = self
            .name_for_file
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.name.trim());
        let safe: String = source
            .chars()
            .filter(|c| !FILE_NAME_FORBIDDEN.contains(c))
            .collect();
        let safe = safe.trim();
        let safe = if safe.is_empty() { "Report" } else { safe };
        format!("[CAP Weekly Report] {}.docx", safe)
    }
}
