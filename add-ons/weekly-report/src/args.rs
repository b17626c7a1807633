//! Command-line flags.

use std::path::PathBuf;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub template: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    /// Render in a child process against per-run temporary files.
    pub isolated: bool,
    /// Write the default config file and exit.
    pub init_config: bool,
    pub help: bool,
}

impl CliArgs {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--template" => parsed.template = Some(value_for(&arg, args.next())?),
                "--input" => parsed.input = Some(value_for(&arg, args.next())?),
                "--output" => parsed.output = Some(value_for(&arg, args.next())?),
                "--isolated" => parsed.isolated = true,
                "--init-config" => parsed.init_config = true,
                "-h" | "--help" => parsed.help = true,
                other => return Err(format!("unrecognized argument: {}", other)),
            }
        }
        Ok(parsed)
    }
}

fn value_for(flag: &str, value: Option<String>) -> Result<PathBuf, String> {
    match value {
        Some(v) if !v.starts_with("--") => Ok(PathBuf::from(v)),
        _ => Err(format!("{} expects a path", flag)),
    }
}

pub fn print_usage() {
    eprintln!("weekly-report: fill the weekly report Word template from a record file");
    eprintln!("  --template PATH   Word template (.docx) with the fixed section headings");
    eprintln!("  --input PATH      Record file (.yaml, or .json)");
    eprintln!("  --output PATH     Where to write the generated .docx");
    eprintln!("  --isolated        Render in a separate process with private temp files");
    eprintln!("  --init-config     Write the default config file and exit");
    eprintln!();
    eprintln!("Defaults come from config/weekly_report.toml (or WEEKLY_REPORT_CONFIG)");
    eprintln!("and WEEKLY_REPORT_* environment variables.");
}
