//! # weekly-docx - Template Mutation for Weekly Reports
//!
//! Fills a fixed-structure Word template from a normalized [`ReportRecord`]. Sections are
//! found by heading text, their sample paragraphs deleted, and new paragraphs spliced in
//! after the heading. Everything else in the package is written back untouched.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     ReportTemplate                        │
//! │  ┌─────────────┐   ┌──────────────┐   ┌───────────────┐   │
//! │  │ DocxPackage │ → │ WordDocument │ → │ StyleCatalog  │   │
//! │  │    (zip)    │   │ (quick-xml)  │   │ (styles.xml)  │   │
//! │  └─────────────┘   └──────────────┘   └───────────────┘   │
//! │                           ↓                               │
//! │                 ┌──────────────────┐                      │
//! │                 │ TemplateMutator  │ ← ReportRecord       │
//! │                 │ (anchor regions) │                      │
//! │                 └──────────────────┘                      │
//! └───────────────────────────────────────────────────────────┘
//! ```

pub mod anchors;
pub mod document;
pub mod error;
pub mod mutator;
pub mod package;
pub mod paragraph;
pub mod styles;
pub mod template;

pub use anchors::{Anchor, HeaderLine};
pub use document::{ParagraphId, WordDocument};
pub use error::{DocxError, DocxResult};
pub use mutator::{Layout, TemplateMutator};
pub use package::DocxPackage;
pub use paragraph::{ParagraphSpec, Run};
pub use styles::{StyleCatalog, StyleRef};
pub use template::ReportTemplate;

use chrono::{Local, NaiveDate};
use std::path::Path;
use tracing::info;
use weekly_core::{inches_to_twips, ReportConfig, ReportRecord};

/// Per-render settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Date whose Monday–Friday range fills an empty `week`.
    pub today: NaiveDate,
    /// Left indent for indented section lines.
    pub left_indent_inches: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            today: Local::now().date_naive(),
            left_indent_inches: 0.25,
        }
    }
}

impl RenderOptions {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            left_indent_inches: config.left_indent_inches,
            ..Self::default()
        }
    }
}

/// Render `record` into a copy of `template` with default options.
pub fn render(template: &ReportTemplate, record: &ReportRecord) -> DocxResult<ReportTemplate> {
    render_with(template, record, &RenderOptions::default())
}

/// Render `record` into a copy of `template`. The template is left as loaded, so one
/// template can serve many renders.
pub fn render_with(
    template: &ReportTemplate,
    record: &ReportRecord,
    options: &RenderOptions,
) -> DocxResult<ReportTemplate> {
    let mut output = template.clone();
    let (document, styles) = output.parts_mut();
    TemplateMutator::new(document, styles, inches_to_twips(options.left_indent_inches))
        .apply(record, options.today)?;
    Ok(output)
}

/// Load the template, render, and save to `output_path`. Nothing is written when any
/// step fails.
pub fn generate_report(
    template_path: &Path,
    record: &ReportRecord,
    output_path: &Path,
    options: &RenderOptions,
) -> DocxResult<()> {
    let template = ReportTemplate::open(template_path)?;
    let rendered = render_with(&template, record, options)?;
    rendered.save(output_path)?;
    info!(output = %output_path.display(), "weekly report generated");
    Ok(())
}
