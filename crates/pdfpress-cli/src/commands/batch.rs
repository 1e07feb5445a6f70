//! Batch command - compress multiple PDF files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use pdfpress_core::models::CompressionLevel;
use pdfpress_core::{format_size, CompressOptions, CompressionSummary};

use super::compress::default_output_path;
use super::{bind_backend, compress_input, file_name, load_config, InputPdf};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Compression level: low, medium, or high (default from config)
    #[arg(short, long)]
    level: Option<CompressionLevel>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    summary: Option<CompressionSummary>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let level = args.level.unwrap_or(config.compression.default_level);
    let options = CompressOptions::from(&config);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .filter(|p| !file_name(p).starts_with(&config.output.file_prefix))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to compress",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let backend = bind_backend(&config)?;

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let output = output_path(&path, args.output_dir.as_deref(), &config);

        let result = InputPdf::read(&path).and_then(|input| {
            compress_input(&backend, &path, input, &output, level, &config, &options)
        });
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(summary) => results.push(FileResult {
                path,
                summary: Some(summary),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if args.continue_on_error {
                    warn!("Failed to compress {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        summary: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    overall_pb.abandon();
                    error!("Failed to compress {}: {}", path.display(), error_msg);
                    anyhow::bail!("Compression failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter_map(|r| r.summary.as_ref()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let original: u64 = successful.iter().map(|s| s.original_size).sum();
    let compressed: u64 = successful.iter().map(|s| s.compressed_size).sum();

    println!();
    println!(
        "{} Compressed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );
    if !successful.is_empty() {
        println!(
            "   {} -> {} ({:.1}% smaller)",
            format_size(original),
            format_size(compressed),
            pdfpress_core::reduction(original, compressed)
        );
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn output_path(input: &Path, output_dir: Option<&Path>, config: &pdfpress_core::PressConfig) -> PathBuf {
    match output_dir {
        Some(dir) => dir.join(config.output_file_name(&file_name(input))),
        None => default_output_path(input, config),
    }
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "output",
        "document_type",
        "strategy",
        "level",
        "pages",
        "original_bytes",
        "compressed_bytes",
        "reduction_percent",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = file_name(&result.path);

        if let Some(summary) = &result.summary {
            wtr.write_record([
                filename.as_str(),
                "success",
                &summary.output,
                summary.dominant.as_str(),
                &summary.strategy.to_string(),
                summary.level.as_str(),
                &summary.total_pages.to_string(),
                &summary.original_size.to_string(),
                &summary.compressed_size.to_string(),
                &format!("{:.1}", summary.reduction_percent),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename.as_str(),
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
