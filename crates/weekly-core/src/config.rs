//! Generator configuration loaded from file and environment.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | WEEKLY_REPORT_CONFIG | config/weekly_report.toml | Optional TOML file with the keys below. |
//! | WEEKLY_REPORT_TEMPLATE_PATH | Weekly_Report_Template.docx | Word template with the fixed headings. |
//! | WEEKLY_REPORT_INPUT_FILE | weekly_report_input_template.yaml | Record file read by the generator. |
//! | WEEKLY_REPORT_OUTPUT_PATH | Weekly_Report_This_Week.docx | Where the filled document is written. |
//! | WEEKLY_REPORT_LEFT_INDENT_INCHES | 0.25 | Indent for label/value sections. |

use crate::error::CoreResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "WEEKLY_REPORT";
const DEFAULT_CONFIG_PATH: &str = "config/weekly_report.toml";

fn default_template_path() -> PathBuf {
    PathBuf::from("Weekly_Report_Template.docx")
}

fn default_input_file() -> PathBuf {
    PathBuf::from("weekly_report_input_template.yaml")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("Weekly_Report_This_Week.docx")
}

fn default_left_indent_inches() -> f32 {
    0.25
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,
    #[serde(default = "default_input_file")]
    pub input_file: PathBuf,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_left_indent_inches")]
    pub left_indent_inches: f32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            template_path: default_template_path(),
            input_file: default_input_file(),
            output_path: default_output_path(),
            left_indent_inches: default_left_indent_inches(),
        }
    }
}

impl ReportConfig {
    /// Config file path: `WEEKLY_REPORT_CONFIG` or `config/weekly_report.toml`.
    pub fn default_path() -> PathBuf {
        std::env::var("WEEKLY_REPORT_CONFIG")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load config. Precedence: `WEEKLY_REPORT_*` env > config file > defaults.
    pub fn load() -> CoreResult<Self> {
        Self::load_from_path(&Self::default_path())
    }

    /// Same as [`ReportConfig::load`] with an explicit file; a missing file is skipped.
    pub fn load_from_path(path: &Path) -> CoreResult<Self> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("template_path", path_str(&defaults.template_path))?
            .set_default("input_file", path_str(&defaults.input_file))?
            .set_default("output_path", path_str(&defaults.output_path))?
            .set_default("left_indent_inches", defaults.left_indent_inches as f64)?;

        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(built.try_deserialize()?)
    }

    /// Write the config as TOML, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> CoreResult<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Left indent in twentieths of a point, the unit Word stores indents in.
    pub fn left_indent_twips(&self) -> i32 {
        inches_to_twips(self.left_indent_inches)
    }
}

/// 1 inch = 1440 twips.
pub fn inches_to_twips(inches: f32) -> i32 {
    (inches * 1440.0).round() as i32
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
