//! Compress command - compress a single PDF file.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use pdfpress_core::models::CompressionLevel;
use pdfpress_core::{format_size, CompressOptions, CompressionSummary, PressConfig, Verdict};

use super::{bind_backend, compress_input, file_name, load_config, InputPdf, OutputFormat};

/// Arguments for the compress command.
#[derive(Args)]
pub struct CompressArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: compressed_<name> next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compression level: low, medium, or high (default from config)
    #[arg(short, long)]
    level: Option<CompressionLevel>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Linearize lossless output for fast web view (requires qpdf)
    #[arg(long)]
    linearize: bool,
}

/// Default output path: the configured prefix plus the input name, in the input's directory.
pub fn default_output_path(input: &Path, config: &PressConfig) -> PathBuf {
    let name = config.output_file_name(&file_name(input));
    match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

pub async fn run(args: CompressArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let level = args.level.unwrap_or(config.compression.default_level);
    let mut options = CompressOptions::from(&config);
    options.linearize |= args.linearize;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input, &config));

    let input = InputPdf::read(&args.input)?;
    info!("Compressing {} at {} level", args.input.display(), level);

    let backend = bind_backend(&config)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Analyzing and compressing...");

    let result = compress_input(&backend, &args.input, input, &output, level, &config, &options);
    pb.finish_and_clear();
    let summary = result?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => {
            print!("{}", format_text(&summary));
            println!(
                "{} Output written to {} in {:?}",
                style("✓").green(),
                output.display(),
                start.elapsed()
            );
        }
    }

    Ok(())
}

fn format_text(summary: &CompressionSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Document type: {} ({} pages: {} text, {} image, {} mixed)\n",
        summary.dominant.title(),
        summary.total_pages,
        summary.text_pages,
        summary.image_pages,
        summary.mixed_pages
    ));
    output.push_str(&format!("Strategy: {}\n", summary.strategy.description()));
    if summary.strategy.uses_level() {
        output.push_str(&format!("Level: {}\n", summary.level));
    }
    output.push('\n');

    output.push_str(&format!("Original:   {}\n", format_size(summary.original_size)));
    output.push_str(&format!("Compressed: {}\n", format_size(summary.compressed_size)));
    output.push_str(&format!("Reduction:  {:.1}%\n", summary.reduction_percent));
    output.push('\n');

    let verdict = match summary.verdict {
        Verdict::AlreadyOptimized => style(format!("⚠ {}", summary.verdict.message())).yellow(),
        Verdict::Normal => style(format!("ℹ {}", summary.verdict.message())).blue(),
        Verdict::Excellent => style(format!("✓ {}", summary.verdict.message())).green(),
    };
    output.push_str(&format!("{}\n", verdict));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let config = PressConfig::default();
        assert_eq!(
            default_output_path(Path::new("/tmp/scans/report.pdf"), &config),
            PathBuf::from("/tmp/scans/compressed_report.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("report.pdf"), &config),
            PathBuf::from("compressed_report.pdf")
        );
    }
}
