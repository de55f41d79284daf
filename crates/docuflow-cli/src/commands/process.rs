//! Process command - OCR a single document.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use super::{
    OutputFormat, PipelineOverrides, build_processor, format_document, load_config,
    resolve_config_path,
};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (image or PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Return raw OCR text without cleanup or correction
    #[arg(long)]
    no_post_processing: bool,

    /// Skip structured field extraction
    #[arg(long)]
    no_extract: bool,

    /// Disable the LLM correction stage
    #[arg(long)]
    no_llm: bool,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(&resolve_config_path(config_path))?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let processor = build_processor(
        &config,
        PipelineOverrides {
            no_llm: args.no_llm,
        },
    )?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Running OCR with {}...", processor.ocr_model()));

    let run_post_processing = config.pipeline.post_processing && !args.no_post_processing;
    let result = processor.process_document(&args.input, run_post_processing);

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    let fields = if config.pipeline.extract_fields && !args.no_extract {
        pb.set_message("Extracting fields...");
        let fields = processor.extract_structured_data(&response);
        if fields.is_empty() {
            debug!("No business fields found on the first page");
        }
        Some(fields)
    } else {
        None
    };

    pb.finish_and_clear();

    let output = format_document(&response, fields.as_ref(), args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(usage) = processor.llm_usage() {
        let cost = usage
            .estimated_cost_usd
            .map(|c| format!(", ~${c:.4}"))
            .unwrap_or_default();
        eprintln!(
            "{} LLM: {} requests ({} failed), {} tokens{}",
            style("ℹ").blue(),
            usage.requests,
            usage.failures,
            usage.total_tokens,
            cost
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
