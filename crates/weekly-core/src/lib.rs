//! weekly-core: canonical weekly report record and the content normalizer.
//!
//! Leaf crate. Producers (YAML files, CLI, LLM output) feed raw values in through
//! [`normalize`]; the document renderer in `weekly-docx` consumes the resulting
//! [`ReportRecord`] and the marked-text helpers.

mod config;
mod error;
mod input;
mod marked;
mod normalizer;
mod record;
mod week;

pub use config::{inches_to_twips, ReportConfig};
pub use error::{CoreError, CoreResult};
pub use input::{load_record, parse_raw_record, save_record};
pub use marked::{
    is_simple_one_liner, normalize_bullets, normalize_newlines, parse_marked_text, MarkedLine,
    BULLET_GLYPH,
};
pub use normalizer::{normalize, normalize_marked_fields};
pub use record::{
    AiTask, ExecutionItem, FrictionItem, ReportRecord, SopItem, DEFAULT_SOP_ITEM, NOT_AVAILABLE,
};
pub use week::{current_week_range, week_range};
