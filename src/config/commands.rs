//! Config command handlers

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use super::{Config, LoadedConfig};
use crate::cli::{ConfigAction, ConfigArgs};
use crate::utils::mask_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Str,
    Int,
    Float,
    Bool,
    /// Unset when given an empty value
    OptInt,
    OptFloat,
}

const KNOWN_KEYS: &[(&str, Kind)] = &[
    ("llm_settings.api_url", Kind::Str),
    ("llm_settings.api_key", Kind::Str),
    ("llm_settings.model", Kind::Str),
    ("llm_settings.temperature", Kind::Float),
    ("llm_settings.system_prompt", Kind::Str),
    ("llm_settings.user_prompt_prefix", Kind::Str),
    ("llm_settings.max_tokens", Kind::OptInt),
    ("llm_settings.top_p", Kind::OptFloat),
    ("llm_settings.top_k", Kind::OptInt),
    ("llm_settings.min_p", Kind::OptFloat),
    ("llm_settings.timeout_secs", Kind::Int),
    ("translation_settings.input_folder", Kind::Str),
    ("translation_settings.output_folder", Kind::Str),
    ("translation_settings.use_dictionary", Kind::Bool),
    ("translation_settings.dictionary_file", Kind::Str),
    ("translation_settings.context_lines", Kind::Int),
    ("translation_settings.request_delay_ms", Kind::Int),
    ("translation_settings.clean_monologue", Kind::Bool),
    ("translation_settings.dictionary_names_verbatim", Kind::Bool),
    ("excel_export.output_file", Kind::Str),
    ("excel_export.sheet_name", Kind::Str),
];

/// Runs a config subcommand. Only `show` and `get` parse the file, so a
/// missing or broken config can still be created, inspected or repaired.
pub fn run(args: ConfigArgs, explicit: Option<&Path>) -> Result<()> {
    let path = Config::resolve_path(explicit);
    match args.action {
        ConfigAction::Show => show_config(&Config::load(explicit)?),
        ConfigAction::Init { force } => init_config(&path, force),
        ConfigAction::Set { key, value } => set_config(&path, &key, &value),
        ConfigAction::Get { key } => get_config(&Config::load(explicit)?, &key),
        ConfigAction::Path => show_path(&path),
        ConfigAction::Edit => edit_config(&path),
    }
}

fn show_config(loaded: &LoadedConfig) -> Result<()> {
    let mut config = loaded.config.clone();
    if !config.llm_settings.api_key.is_empty() {
        config.llm_settings.api_key = mask_key(&config.llm_settings.api_key);
    }
    let content = toml::to_string_pretty(&config)?;

    println!("{}", "[Config]".green());
    if loaded.from_file {
        println!("# {}", loaded.path.display());
    } else {
        println!("# defaults (no config file at {})", loaded.path.display());
    }
    println!("{}", content);

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!(
            "{}",
            format!("Config file already exists: {}", path.display()).yellow()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    Config::default().save_to(path)?;

    println!("{}", "[Config] Initialized".green());
    println!("  Created: {}", path.display());
    println!();
    println!("Edit the config file to point at your model endpoint:");
    println!("  mtl config edit");

    Ok(())
}

/// The file's own settings, without environment fallbacks applied.
fn read_file_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_value(kind: Kind, key: &str, value: &str) -> Result<Option<toml::Value>> {
    let parsed = match kind {
        Kind::Str => toml::Value::String(value.to_string()),
        Kind::OptInt | Kind::OptFloat if value.is_empty() => return Ok(None),
        Kind::Int | Kind::OptInt => toml::Value::Integer(
            value
                .parse()
                .with_context(|| format!("{} expects an integer", key))?,
        ),
        Kind::Float | Kind::OptFloat => toml::Value::Float(
            value
                .parse()
                .with_context(|| format!("{} expects a number", key))?,
        ),
        Kind::Bool => toml::Value::Boolean(
            value
                .parse()
                .with_context(|| format!("{} expects true or false", key))?,
        ),
    };
    Ok(Some(parsed))
}

/// Applies `key = value` to a config, checking the key and the value type.
pub fn set_value(config: &Config, key: &str, value: &str) -> Result<Config> {
    let kind = KNOWN_KEYS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, kind)| *kind)
        .with_context(|| format!("Unknown config key: {}", key))?;
    let (section, field) = key
        .split_once('.')
        .with_context(|| format!("Unknown config key: {}", key))?;

    let mut root = toml::Value::try_from(config).context("Failed to serialize config")?;
    let table = root
        .get_mut(section)
        .and_then(|s| s.as_table_mut())
        .with_context(|| format!("Missing config section: {}", section))?;

    match parse_value(kind, key, value)? {
        Some(v) => {
            table.insert(field.to_string(), v);
        }
        None => {
            table.remove(field);
        }
    }

    let updated: Config = root
        .try_into()
        .with_context(|| format!("Invalid value for {}: {}", key, value))?;
    Ok(updated)
}

fn set_config(path: &Path, key: &str, value: &str) -> Result<()> {
    let config = read_file_config(path)?;
    let updated = set_value(&config, key, value)?;
    updated.save_to(path)?;

    let shown = if key.ends_with("api_key") {
        mask_key(value)
    } else {
        value.to_string()
    };
    println!("{}", format!("[Config] Set {} = {}", key, shown).green());
    println!("  Saved: {}", path.display());

    Ok(())
}

pub fn get_value(config: &Config, key: &str) -> Result<Option<String>> {
    if !KNOWN_KEYS.iter().any(|(k, _)| *k == key) {
        anyhow::bail!("Unknown config key: {}", key);
    }
    let root = toml::Value::try_from(config).context("Failed to serialize config")?;
    let value = key
        .split('.')
        .try_fold(&root, |v, part| v.get(part))
        .map(|v| match v {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        });

    Ok(if key.ends_with("api_key") {
        value.filter(|v| !v.is_empty()).map(|v| mask_key(&v))
    } else {
        value
    })
}

fn get_config(loaded: &LoadedConfig, key: &str) -> Result<()> {
    match get_value(&loaded.config, key)? {
        Some(v) => println!("{} = {}", key, v),
        None => println!("{} = (not set)", key),
    }
    Ok(())
}

fn show_path(path: &Path) -> Result<()> {
    println!("{}", path.display());
    if path.exists() {
        println!("{}", "(exists)".green());
    } else {
        println!("{}", "(not created)".yellow());
    }
    Ok(())
}

fn edit_config(path: &Path) -> Result<()> {
    if !path.exists() {
        Config::default().save_to(path)?;
        println!("{}", "[Config] Created default config".green());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening config with: {}", editor);
    println!("Path: {}", path.display());

    std::process::Command::new(&editor)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to open editor: {}", editor))?;

    Ok(())
}
