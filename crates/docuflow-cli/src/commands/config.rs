//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use docuflow_core::DocuflowConfig;

use super::{load_config, resolve_config_path};

const MASK: &str = "***";

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "llm.model")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value (parsed as JSON, otherwise taken as a string)
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = resolve_config_path(config_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }

    let config = load_config(path)?;
    let mut json = serde_json::to_value(&config)?;
    mask_tokens(&mut json);
    println!("{}", serde_json::to_string_pretty(&json)?);

    Ok(())
}

/// Replace every set `*token` value with a placeholder.
fn mask_tokens(value: &mut Value) {
    if let Value::Object(map) = value {
        for (key, child) in map.iter_mut() {
            if is_secret(key) && !child.is_null() {
                *child = Value::String(MASK.to_string());
            } else {
                mask_tokens(child);
            }
        }
    }
}

fn is_secret(key: &str) -> bool {
    key.ends_with("token")
}

fn init_config(args: InitArgs, default_path: PathBuf) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or(default_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    DocuflowConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let config = load_config(path)?;

    let value = config
        .get_value(key)
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found or unset: {}", key))?;

    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = load_config(path)?;

    let mut parsed_value: Value = serde_json::from_str(value)
        .unwrap_or_else(|_| Value::String(value.to_string()));

    // A numeric-looking token is still a string.
    if let Err(e) = config.set_value(key, parsed_value.clone()) {
        if parsed_value.is_string() {
            return Err(e.into());
        }
        parsed_value = Value::String(value.to_string());
        config.set_value(key, parsed_value.clone())?;
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    // Credentials are never echoed back.
    let shown = if key.rsplit('.').next().is_some_and(is_secret) {
        format!("\"{MASK}\"")
    } else {
        serde_json::to_string(&parsed_value)?
    };
    println!("{} Set {} = {}", style("✓").green(), key, shown);

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'docuflow config init' to create a configuration file.");
    }

    Ok(())
}
