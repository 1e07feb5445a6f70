//! Analyze command - classify pages and report the chosen strategy.

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use pdfpress_core::{DocumentAnalysis, PageMetrics, Strategy};

use super::{bind_backend, load_config, open_pdf, InputPdf, OutputFormat};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct AnalysisReport<'a> {
    file: String,
    #[serde(flatten)]
    analysis: &'a DocumentAnalysis,
    strategy: Strategy,
    strategy_description: &'static str,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let InputPdf { data, structure } = InputPdf::read(&args.input)?;

    info!("Analyzing file: {}", args.input.display());
    let backend = bind_backend(&config)?;
    let pdf = open_pdf(&backend, &data, structure)?;
    let analysis = pdf.analyze()?;
    let strategy = Strategy::for_document(analysis.dominant);

    match args.format {
        OutputFormat::Json => {
            let report = AnalysisReport {
                file: super::file_name(&args.input),
                analysis: &analysis,
                strategy,
                strategy_description: strategy.description(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print!("{}", format_text(&analysis, strategy)),
    }

    Ok(())
}

fn format_text(analysis: &DocumentAnalysis, strategy: Strategy) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document type: {}\n", analysis.dominant.title()));
    output.push_str(&format!("Pages: {}\n", analysis.total_pages));
    output.push_str(&format!("  Text:  {}\n", analysis.text_pages));
    output.push_str(&format!("  Image: {}\n", analysis.image_pages));
    output.push_str(&format!("  Mixed: {}\n", analysis.mixed_pages));
    output.push('\n');

    output.push_str("Per page:\n");
    for page in &analysis.pages {
        output.push_str(&format_page(page));
    }
    output.push('\n');

    output.push_str(&format!(
        "{} Strategy: {}\n",
        style("ℹ").blue(),
        strategy.description()
    ));

    output
}

fn format_page(page: &PageMetrics) -> String {
    format!(
        "  {:>4}  {:<6}  text {:>5.1}%  image {:>5.1}%\n",
        page.index + 1,
        page.classification.as_str(),
        page.text_area_ratio * 100.0,
        page.image_area_ratio * 100.0
    )
}
