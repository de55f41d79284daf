//! CLI subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use docuflow_core::{DocuflowConfig, DocumentResponse, Processor, StructuredFields};

/// Output format for a processed document.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON with the response and extracted fields
    Json,
    /// Plain text pages followed by a field summary
    Text,
    /// Markdown, one section per page
    Markdown,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
            Self::Markdown => "md",
        }
    }
}

/// Options that shape how a processor is built from the config file.
#[derive(Clone, Copy, Debug, Default)]
pub struct PipelineOverrides {
    pub no_llm: bool,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docuflow")
        .join("config.json")
}

/// The `--config` path, or the per-user default.
pub fn resolve_config_path(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load the config file, or defaults when it does not exist yet.
pub fn load_config(path: &Path) -> anyhow::Result<DocuflowConfig> {
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(DocuflowConfig::from_file(path)?)
    } else {
        debug!("No configuration at {}, using defaults", path.display());
        Ok(DocuflowConfig::default())
    }
}

pub fn build_processor(
    config: &DocuflowConfig,
    overrides: PipelineOverrides,
) -> anyhow::Result<Processor> {
    let mut settings = config.processor_config();
    if overrides.no_llm {
        settings.llm_enabled = false;
    }
    Ok(Processor::new(settings)?)
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    response: &'a DocumentResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a StructuredFields>,
}

pub fn format_document(
    response: &DocumentResponse,
    fields: Option<&StructuredFields>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonOutput {
            response,
            fields,
        })?),
        OutputFormat::Text => Ok(format_text(response, fields)),
        OutputFormat::Markdown => Ok(format_markdown(response, fields)),
    }
}

fn format_text(response: &DocumentResponse, fields: Option<&StructuredFields>) -> String {
    let mut output = response.full_text();
    output.push_str("\n\n");

    if let Some(fields) = fields {
        let rows = fields.display_rows();
        if !rows.is_empty() {
            output.push_str("Extracted fields:\n");
            for (label, value) in rows {
                output.push_str(&format!("  {label}: {value}\n"));
            }
        }
        if let Some(largest) = fields.largest_amount() {
            output.push_str(&format!("  Largest amount: {largest}\n"));
        }
    }

    output.push_str(&format!(
        "\nModel: {} | Pages: {} | Time: {:.2}s\n",
        response.model_used, response.total_pages, response.total_processing_time
    ));

    output
}

fn format_markdown(response: &DocumentResponse, fields: Option<&StructuredFields>) -> String {
    let mut output = String::new();

    let title = response
        .file_info
        .as_ref()
        .map(|info| info.filename.as_str())
        .unwrap_or("Document");
    output.push_str(&format!("# {title}\n\n"));

    for page in &response.pages {
        output.push_str(&format!("## Page {}\n\n", page.page_index + 1));
        output.push_str(&page.text);
        output.push_str("\n\n");
    }

    if let Some(fields) = fields {
        let rows = fields.display_rows();
        if !rows.is_empty() {
            output.push_str("## Extracted fields\n\n| Field | Value |\n|---|---|\n");
            for (label, value) in rows {
                output.push_str(&format!("| {} | {} |\n", label, value.replace('\n', "<br>")));
            }
        }
    }

    output
}
