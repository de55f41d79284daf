//! Batch processing command for multiple documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use docuflow_core::ocr::encoding::mime_type_for;
use docuflow_core::{BatchItem, BatchReport, DocuflowConfig, Processor};

use super::{
    OutputFormat, PipelineOverrides, build_processor, format_document, load_config,
    resolve_config_path,
};

/// Characters of page text kept in the summary CSV.
const PREVIEW_CHARS: usize = 200;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Disable the LLM correction stage
    #[arg(long)]
    no_llm: bool,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(&resolve_config_path(config_path))?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    let processor = build_processor(
        &config,
        PipelineOverrides {
            no_llm: args.no_llm,
        },
    )?;

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // One file at a time so the bar tracks real progress.
    let mut items = Vec::with_capacity(files.len());
    for path in &files {
        overall_pb.set_message(path.display().to_string());
        items.extend(processor.process_many(std::slice::from_ref(path)));
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    if let Some(output_dir) = &args.output_dir {
        write_outputs(&processor, &config, &items, output_dir, args.format)?;
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &items)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let report = BatchReport::from_items(&items);

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.total(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed ({:.2}s OCR time)",
        style(report.successes).green(),
        style(report.failures).red(),
        report.total_time
    );

    let failed: Vec<_> = items.iter().filter(|item| !item.is_ok()).collect();
    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for item in failed {
            if let Err(e) = &item.outcome {
                println!("  - {}: {}", item.path.display(), e);
            }
        }
    }

    if let Some(usage) = processor.llm_usage() {
        println!(
            "{} LLM: {} requests ({} failed), {} tokens",
            style("ℹ").blue(),
            usage.requests,
            usage.failures,
            usage.total_tokens
        );
    }

    Ok(())
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| mime_type_for(&ext.to_lowercase()).is_some())
}

fn write_outputs(
    processor: &Processor,
    config: &DocuflowConfig,
    items: &[BatchItem],
    output_dir: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    for item in items {
        let Ok(response) = &item.outcome else {
            continue;
        };

        let fields = config
            .pipeline
            .extract_fields
            .then(|| processor.extract_structured_data(response));

        let stem = item
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        let output_path = output_dir.join(format!("{}.{}", stem, format.extension()));

        match format_document(response, fields.as_ref(), format) {
            Ok(content) => {
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
            Err(e) => warn!("Failed to format {}: {}", item.path.display(), e),
        }
    }

    Ok(())
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn write_summary(path: &Path, items: &[BatchItem]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "pages",
        "processing_time",
        "text_preview",
        "error",
    ])?;

    for item in items {
        let filename = item
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        match &item.outcome {
            Ok(response) => {
                let text = response
                    .first_page()
                    .map(|page| preview(&page.text))
                    .unwrap_or_default();
                wtr.write_record([
                    filename,
                    "success",
                    &response.total_pages.to_string(),
                    &format!("{:.2}", response.total_processing_time),
                    &text,
                    "",
                ])?;
            }
            Err(e) => {
                wtr.write_record([filename, "error", "", "", "", &e.to_string()])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
