//! Heading-anchored editing of a loaded template.
//!
//! Every section follows the same shape: find its heading, delete the sample paragraphs
//! up to the next known heading ([`TemplateMutator::region_replace`]), then chain new
//! paragraphs downward from the heading, each inserted after the previous one.
//! Headings are looked up again by text for every operation, never cached. Paragraphs
//! this mutator inserted are never taken for a heading, so user text that reads like
//! one cannot move a section.

use crate::anchors::{Anchor, HeaderLine};
use crate::document::{ParagraphId, WordDocument};
use crate::error::{DocxError, DocxResult};
use crate::paragraph::{ParagraphSpec, Run};
use crate::styles::{StyleCatalog, StyleRef};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};
use weekly_core::{
    is_simple_one_liner, parse_marked_text, week_range, AiTask, ExecutionItem, FrictionItem,
    ReportRecord, SopItem, NOT_AVAILABLE,
};

const LIST_PARAGRAPH: &str = "List Paragraph";
const FIRST_PARAGRAPH: &str = "First Paragraph";
const BODY_TEXT: &str = "Body Text";
const NORMAL: &str = "Normal";

/// Style and indentation of an inserted paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Style display name.
    pub style: &'static str,
    /// Apply the configured left indent.
    pub indented: bool,
}

impl Layout {
    pub const fn plain(style: &'static str) -> Self {
        Self {
            style,
            indented: false,
        }
    }

    pub const fn indented(style: &'static str) -> Self {
        Self {
            style,
            indented: true,
        }
    }
}

pub struct TemplateMutator<'a> {
    doc: &'a mut WordDocument,
    styles: &'a StyleCatalog,
    resolved: HashMap<&'static str, Option<String>>,
    indent_twips: i32,
    inserted: HashSet<ParagraphId>,
}

impl<'a> TemplateMutator<'a> {
    pub fn new(doc: &'a mut WordDocument, styles: &'a StyleCatalog, indent_twips: i32) -> Self {
        Self {
            doc,
            styles,
            resolved: HashMap::new(),
            indent_twips,
            inserted: HashSet::new(),
        }
    }

    /// Number of paragraphs inserted so far.
    pub fn inserted(&self) -> usize {
        self.inserted.len()
    }

    /// Fill every section of the template from `record`. `today` picks the week when
    /// the record leaves it empty.
    pub fn apply(&mut self, record: &ReportRecord, today: NaiveDate) -> DocxResult<()> {
        self.set_line_value(HeaderLine::Name, &record.name)?;
        self.set_line_value(HeaderLine::Role, &record.role)?;
        let week = match record.week.trim() {
            "" => week_range(today),
            week => week.to_string(),
        };
        self.set_line_value(HeaderLine::Week, &week)?;

        self.write_objective(&record.weekly_objective)?;
        self.write_execution(&record.execution_output)?;
        self.write_ai_tasks(&record.ai_acceleration_tasks)?;
        self.write_sop(&record.sop_items)?;
        self.write_friction(&record.friction_blockers_ask)?;
        self.write_focus(&record.next_week_focus)?;

        info!(inserted = self.inserted.len(), "template filled");
        Ok(())
    }

    /// First template paragraph matching `anchor`.
    pub fn find_anchor(&self, anchor: Anchor) -> DocxResult<ParagraphId> {
        for id in self.doc.paragraphs() {
            if self.inserted.contains(&id) {
                continue;
            }
            if anchor.matches(&self.doc.text(id)?) {
                return Ok(id);
            }
        }
        Err(DocxError::AnchorNotFound(anchor.canonical().to_string()))
    }

    /// Delete the paragraphs strictly between `start` and the first following paragraph
    /// matching any of `stops` (or the end of the document if none does). Tables and
    /// section properties in the region are left alone. Returns the start heading.
    pub fn region_replace(&mut self, start: Anchor, stops: &[Anchor]) -> DocxResult<ParagraphId> {
        let heading = self.find_anchor(start)?;
        let mut doomed = Vec::new();
        for id in self.doc.paragraphs_after(heading)? {
            let text = self.doc.text(id)?;
            if stops.iter().any(|stop| stop.matches(&text)) {
                break;
            }
            doomed.push(id);
        }
        for id in &doomed {
            self.doc.remove(*id)?;
        }
        debug!(heading = start.canonical(), removed = doomed.len(), "region cleared");
        self.find_anchor(start)
    }

    /// Delete every paragraph after `start`.
    pub fn clear_to_end(&mut self, start: Anchor) -> DocxResult<ParagraphId> {
        self.region_replace(start, &[])
    }

    /// Rewrite the first header line for `line` as `prefix + value`.
    pub fn set_line_value(&mut self, line: HeaderLine, value: &str) -> DocxResult<()> {
        let id = self
            .doc
            .find_first(|text| line.matches(text))?
            .ok_or_else(|| DocxError::AnchorNotFound(line.prefix().trim_end().to_string()))?;
        self.doc
            .replace_text(id, &format!("{}{}", line.prefix(), value))
    }

    /// Insert one paragraph after `after`.
    pub fn insert(
        &mut self,
        after: ParagraphId,
        runs: Vec<Run>,
        layout: Layout,
    ) -> DocxResult<ParagraphId> {
        let spec = ParagraphSpec::new()
            .style_id(self.style_id(layout.style))
            .left_indent(layout.indented.then_some(self.indent_twips))
            .runs(runs);
        let id = self.doc.insert_after(after, &spec)?;
        self.inserted.insert(id);
        Ok(id)
    }

    pub fn insert_text(
        &mut self,
        after: ParagraphId,
        text: &str,
        layout: Layout,
    ) -> DocxResult<ParagraphId> {
        self.insert(after, vec![Run::inherit(text)], layout)
    }

    /// Blank paragraph.
    pub fn insert_spacer(
        &mut self,
        after: ParagraphId,
        style: &'static str,
    ) -> DocxResult<ParagraphId> {
        self.insert(after, Vec::new(), Layout::plain(style))
    }

    /// One paragraph per non-empty line of marked text; bullets get the glyph.
    /// Blank content becomes a single `N/A` line. Returns the last paragraph inserted.
    pub fn insert_content(
        &mut self,
        after: ParagraphId,
        content: &str,
        layout: Layout,
    ) -> DocxResult<ParagraphId> {
        let mut last = after;
        for line in parse_marked_text(content) {
            last = self.insert_text(last, &line.display(), layout)?;
        }
        Ok(last)
    }

    /// Bold label followed by the value as written.
    pub fn insert_label_value(
        &mut self,
        after: ParagraphId,
        label: &str,
        value: &str,
        layout: Layout,
    ) -> DocxResult<ParagraphId> {
        self.insert(after, vec![Run::bold(label), Run::plain(value)], layout)
    }

    /// Label and value on one line when the value is a simple one-liner; otherwise the
    /// label alone, then the value expanded line by line.
    pub fn insert_label_value_block(
        &mut self,
        after: ParagraphId,
        label: &str,
        value: &str,
        layout: Layout,
    ) -> DocxResult<ParagraphId> {
        let value = value.trim_matches('\n');
        if value.trim().is_empty() {
            return self.insert_label_value(after, label, &format!(" {}", NOT_AVAILABLE), layout);
        }
        if is_simple_one_liner(value) {
            return self.insert_label_value(after, label, &format!(" {}", value), layout);
        }
        let label_line = self.insert(after, vec![Run::bold(label)], layout)?;
        self.insert_content(label_line, value, layout)
    }

    fn style_id(&mut self, style: &'static str) -> Option<String> {
        let styles = self.styles;
        self.resolved
            .entry(style)
            .or_insert_with(|| match styles.resolve(style) {
                StyleRef::Id(id) => Some(id),
                StyleRef::Default => None,
                StyleRef::Missing => {
                    warn!(style, "paragraph style not defined in template; using default");
                    None
                }
            })
            .clone()
    }

    fn write_objective(&mut self, objective: &str) -> DocxResult<()> {
        let heading = self.region_replace(
            Anchor::WeeklyObjective,
            &[Anchor::ExecutionOutput, Anchor::TransformationLog],
        )?;
        let objective = match objective.trim() {
            "" => NOT_AVAILABLE,
            text => text,
        };
        let line = self.insert_text(heading, objective, Layout::plain(LIST_PARAGRAPH))?;
        self.insert_spacer(line, LIST_PARAGRAPH)?;
        Ok(())
    }

    fn write_execution(&mut self, items: &[ExecutionItem]) -> DocxResult<()> {
        let mut last = self.region_replace(
            Anchor::ExecutionOutput,
            &[Anchor::TransformationLog, Anchor::AiAcceleration],
        )?;
        let layout = Layout::plain(LIST_PARAGRAPH);
        let items: Vec<&ExecutionItem> = items.iter().filter(|item| !item.is_blank()).collect();
        for (idx, item) in items.iter().enumerate() {
            let summary = item.summary.trim();
            if !summary.is_empty() {
                last = self.insert(last, vec![Run::bold(summary)], layout)?;
            }
            last = self.insert_content(last, &item.content, layout)?;
            if idx + 1 < items.len() {
                last = self.insert_spacer(last, LIST_PARAGRAPH)?;
            }
        }
        self.insert_spacer(last, LIST_PARAGRAPH)?;
        Ok(())
    }

    fn write_ai_tasks(&mut self, tasks: &[AiTask]) -> DocxResult<()> {
        let mut last = self.region_replace(
            Anchor::AiAcceleration,
            &[Anchor::SopProcess, Anchor::FrictionBlockers],
        )?;
        for (idx, task) in tasks.iter().enumerate() {
            let style = if idx == 0 { FIRST_PARAGRAPH } else { BODY_TEXT };
            let layout = Layout::indented(style);
            let label = format!("Task {}: ", idx + 1);
            last = self.insert_label_value(last, &label, &task.task, layout)?;
            last = self.insert_label_value(last, "Tool / Agent: ", &task.tool_agent, layout)?;
            last = self.insert_label_value(last, "Time Saved (Est.): ", &task.time_saved, layout)?;
            last = self.insert(last, vec![Run::bold("Insight / Limitation:")], layout)?;
            last = self.insert_content(last, &task.insight_failure, layout)?;
            if idx + 1 < tasks.len() {
                last = self.insert_spacer(last, style)?;
            }
        }
        self.insert_spacer(last, BODY_TEXT)?;
        Ok(())
    }

    fn write_sop(&mut self, items: &[SopItem]) -> DocxResult<()> {
        let mut last = self.region_replace(
            Anchor::SopProcess,
            &[Anchor::FrictionBlockers, Anchor::NextWeekFocus],
        )?;
        let default_item = [SopItem::default()];
        let items = if items.is_empty() { &default_item[..] } else { items };
        let layout = Layout::indented(NORMAL);
        for (idx, item) in items.iter().enumerate() {
            last = self.insert_label_value(last, "Item: ", &item.item, layout)?;
            last = self.insert_label_value_block(last, "Impact:", &item.impact, layout)?;
            if idx + 1 < items.len() {
                last = self.insert_spacer(last, NORMAL)?;
            }
        }
        self.insert_spacer(last, NORMAL)?;
        Ok(())
    }

    fn write_friction(&mut self, items: &[FrictionItem]) -> DocxResult<()> {
        let mut last = self.region_replace(Anchor::FrictionBlockers, &[Anchor::NextWeekFocus])?;
        let layout = Layout::indented(NORMAL);
        let items: Vec<&FrictionItem> = items.iter().filter(|item| !item.is_blank()).collect();
        for (idx, item) in items.iter().enumerate() {
            let friction = match item.friction.trim() {
                "" => NOT_AVAILABLE,
                text => text,
            };
            let label = format!("Friction {}: ", idx + 1);
            last = self.insert_label_value(last, &label, friction, layout)?;
            last = self.insert_label_value_block(
                last,
                "Action/Mitigation:",
                &item.action_mitigation,
                layout,
            )?;
            last = self.insert_label_value_block(
                last,
                "Ask/Attention needed:",
                &item.ask_attention_needed,
                layout,
            )?;
            if idx + 1 < items.len() {
                last = self.insert_spacer(last, NORMAL)?;
            }
        }
        self.insert_spacer(last, NORMAL)?;
        Ok(())
    }

    fn write_focus(&mut self, focus: &[String]) -> DocxResult<()> {
        let mut last = self.clear_to_end(Anchor::NextWeekFocus)?;
        for (idx, line) in focus.iter().enumerate() {
            let label = format!("Focus {}: ", idx + 1);
            last = self.insert_label_value(last, &label, line, Layout::indented(NORMAL))?;
        }
        Ok(())
    }
}
