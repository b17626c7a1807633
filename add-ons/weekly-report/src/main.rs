//! Weekly report generator.
//!
//! Usage:
//!   cargo run -p weekly-report -- --template Weekly_Report_Template.docx \
//!       --input weekly_report_input_template.yaml --output Weekly_Report_This_Week.docx
//!
//! Any flag left out falls back to the config file and `WEEKLY_REPORT_*` variables.

mod args;
mod isolate;

use args::{print_usage, CliArgs};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weekly_core::{load_record, ReportConfig};
use weekly_docx::{generate_report, RenderOptions};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[weekly-report] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            print_usage();
            std::process::exit(2);
        }
    };
    if args.help {
        print_usage();
        return Ok(());
    }

    if args.init_config {
        let path = ReportConfig::default_path();
        ReportConfig::default().save_to_path(&path)?;
        info!(path = %path.display(), "default config written");
        return Ok(());
    }

    let config = ReportConfig::load()?;
    let template = args.template.unwrap_or_else(|| config.template_path.clone());
    let input = args.input.unwrap_or_else(|| config.input_file.clone());
    let output = args.output.unwrap_or_else(|| config.output_path.clone());

    let record = load_record(&input)?;
    info!(
        template = %template.display(),
        input = %input.display(),
        output = %output.display(),
        isolated = args.isolated,
        "generating weekly report"
    );

    if args.isolated {
        isolate::generate_isolated(&template, &record, &output)?;
    } else {
        generate_report(&template, &record, &output, &RenderOptions::from_config(&config))?;
    }

    println!("Saved: {}", output.display());
    Ok(())
}
