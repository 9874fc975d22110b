use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, validate_config, Config};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Serialize `config` to `path`, creating parent directories.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: &Path, config: &Config, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Pass --force to overwrite",
            path.display()
        );
    }

    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    std::fs::write(path, &yaml)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

/// Ask for the few settings worth changing, then write the config file.
///
/// Pressing enter at every prompt writes the built-in defaults.
pub fn run_init(default_path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let defaults = Config::default();
    println!();
    println!("admit-odds configuration");
    println!("========================");
    println!();

    let dataset = prompt_with_default("Dataset path or URL", &defaults.dataset)?;
    let sticker_price = loop {
        let input = prompt_with_default(
            "Sticker price for net price estimates",
            &format!("{:.0}", defaults.sticker_price),
        )?;
        match input.replace(['$', ','], "").parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => break v,
            _ => println!("  Invalid: must be a non-negative number. Try again."),
        }
    };
    let model = prompt_with_default("Model for explanations", &defaults.explain.model)?;

    let mut config = Config {
        dataset,
        sticker_price,
        ..defaults
    };
    config.explain.model = model;

    if let Err(errors) = validate_config(&config) {
        anyhow::bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }

    let config_path = match default_path {
        Some(path) => path,
        None => get_config_path()?,
    };

    let mut force = force;
    if config_path.exists() && !force {
        force = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !force {
            println!("Aborted.");
            return Ok(config_path);
        }
    }

    write_default_config(&config_path, &config, force)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!(
        "Set {} to enable `admit-odds explain`.",
        config.explain.api_key_env
    );
    Ok(config_path)
}
