//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use pdfpress_core::PressConfig;

use super::default_config_path;

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
    Init {
        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "compression.default_level")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value (JSON, or a bare string)
        value: String,
    },

    /// Show configuration file path
    Path,
}

/// `-c` selects the file every subcommand works on.
pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init { force } => init_config(&path, force),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

fn read_or_default(path: &Path) -> anyhow::Result<PressConfig> {
    if path.exists() {
        PressConfig::from_file(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))
    } else {
        Ok(PressConfig::default())
    }
}

fn write_config(path: &Path, config: &PressConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;
    Ok(())
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }
    let config = read_or_default(path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    write_config(path, &PressConfig::default())?;
    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        path.display()
    );
    Ok(())
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(read_or_default(path)?)?;
    let value = lookup(&json, key)
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;

    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let parsed: Value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    let mut json = serde_json::to_value(read_or_default(path)?)?;
    assign(&mut json, key, parsed.clone())?;

    // Round-trip through the typed config so bad values are rejected here.
    let config: PressConfig = serde_json::from_value(json)
        .with_context(|| format!("Invalid value for {}: {}", key, value))?;
    write_config(path, &config)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed)?
    );
    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'pdfpress config init' to create a configuration file.");
    }
    Ok(())
}

/// Follow a dotted key through nested objects.
fn lookup<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(json, |current, part| current.get(part))
}

/// Replace the value at an existing dotted key.
fn assign(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let (parent, last) = match key.rsplit_once('.') {
        Some((parent, last)) => (Some(parent), last),
        None => (None, key),
    };

    let mut current = json;
    if let Some(parent) = parent {
        for part in parent.split('.') {
            current = current
                .get_mut(part)
                .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
        }
    }

    let object = current
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("Cannot set value at non-object path: {}", key))?;
    if !object.contains_key(last) {
        anyhow::bail!("Configuration key not found: {}", key);
    }
    object.insert(last.to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested_key() {
        let json = json!({"output": {"file_prefix": "small_"}});
        assert_eq!(lookup(&json, "output.file_prefix"), Some(&json!("small_")));
        assert_eq!(lookup(&json, "output.missing"), None);
    }

    #[test]
    fn test_assign_rejects_unknown_keys() {
        let mut json = serde_json::to_value(PressConfig::default()).unwrap();
        assign(&mut json, "output.linearize", json!(true)).unwrap();
        assert_eq!(json["output"]["linearize"], json!(true));

        assert!(assign(&mut json, "output.typo", json!(1)).is_err());
        assert!(assign(&mut json, "nope.linearize", json!(1)).is_err());
    }
}
