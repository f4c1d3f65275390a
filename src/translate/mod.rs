pub mod dictionary;
pub mod llm;
pub mod pipeline;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::cli::TranslateArgs;
use crate::config::{Config, LoadedConfig};
use crate::error::TranslationError;
use dictionary::Dictionary;
use llm::LlmClient;
use pipeline::{Pipeline, PipelineOptions, PipelineReport};

/// Turns one source string into its translation. `context` carries the
/// preceding dialogue when context lines are enabled.
pub trait Translator {
    fn translate(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> std::result::Result<String, TranslationError>;
}

/// Command-line values take precedence over the config file.
pub fn apply_overrides(cfg: &mut Config, args: &TranslateArgs) {
    let llm = &mut cfg.llm_settings;
    if let Some(url) = &args.api_url {
        llm.api_url = url.clone();
    }
    if let Some(key) = &args.api_key {
        llm.api_key = key.clone();
    }
    if let Some(model) = &args.model {
        llm.model = model.clone();
    }

    let t = &mut cfg.translation_settings;
    if let Some(input) = &args.input {
        t.input_folder = input.to_string_lossy().into_owned();
    }
    if let Some(output) = &args.output {
        t.output_folder = output.to_string_lossy().into_owned();
    }
    if let Some(dictionary) = &args.dictionary {
        t.dictionary_file = dictionary.to_string_lossy().into_owned();
    }
    if args.no_dictionary {
        t.use_dictionary = false;
    }
    if let Some(n) = args.context_lines {
        t.context_lines = n;
    }
}

pub fn load_dictionary(cfg: &Config) -> Result<Dictionary> {
    let t = &cfg.translation_settings;
    if !t.use_dictionary {
        return Ok(Dictionary::new());
    }

    let path = Path::new(&t.dictionary_file);
    if !path.exists() {
        println!(
            "{}",
            format!(
                "[WARN] Dictionary file not found: {} (continuing without it)",
                path.display()
            )
            .yellow()
        );
        return Ok(Dictionary::new());
    }

    let dictionary = Dictionary::load(path)
        .with_context(|| format!("Failed to load dictionary {}", path.display()))?;
    if dictionary.is_empty() {
        println!("{}", format!("[WARN] {} has no entries", path.display()).yellow());
    } else {
        println!("  Loaded {} dictionary entries", dictionary.len());
    }
    Ok(dictionary)
}

pub fn run(args: &TranslateArgs, loaded: &LoadedConfig) -> Result<PipelineReport> {
    let mut cfg = loaded.config.clone();
    apply_overrides(&mut cfg, args);
    cfg.validate_llm()?;

    let t = &cfg.translation_settings;
    println!(
        "{}",
        format!("[Translate] {} -> {}", t.input_folder, t.output_folder).green()
    );
    println!("  Endpoint: {}", cfg.llm_settings.api_url);

    let dictionary = load_dictionary(&cfg)?;
    let client = LlmClient::new(cfg.llm_settings.clone())?;
    println!("  Model: {}", client.model().cyan());

    let options = PipelineOptions {
        force: args.force,
        show_progress: true,
        ..PipelineOptions::from_settings(t)
    };

    let report = Pipeline::new(&client, &dictionary, options)
        .run(Path::new(&t.input_folder), Path::new(&t.output_folder))?;

    report.print_summary();
    Ok(report)
}
