//! Setup check: configuration, dictionary, folders and (optionally) the endpoint

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::cli::CheckArgs;
use crate::config::LoadedConfig;
use crate::document::find_json_files;
use crate::translate::Translator;
use crate::translate::dictionary::Dictionary;
use crate::translate::llm::LlmClient;

const PING_TEXT: &str = "テスト";

fn ok(msg: impl AsRef<str>) {
    println!("  {} {}", "[OK]".green(), msg.as_ref());
}

fn warn(msg: impl AsRef<str>) {
    println!("  {} {}", "[WARN]".yellow(), msg.as_ref());
}

fn fail(msg: impl AsRef<str>) {
    println!("  {} {}", "[ERROR]".red(), msg.as_ref());
}

/// Prints a report; returns whether every required check passed.
pub fn run(args: &CheckArgs, loaded: &LoadedConfig) -> Result<bool> {
    let cfg = &loaded.config;
    let mut healthy = true;

    println!("{}", "[Check] Configuration".green());
    if loaded.from_file {
        ok(format!("Loaded {}", loaded.path.display()));
    } else {
        warn(format!(
            "No config file at {}, using defaults (run 'mtl config init')",
            loaded.path.display()
        ));
    }
    match cfg.validate_llm().and_then(|_| cfg.validate_excel()) {
        Ok(()) => ok(format!(
            "Endpoint {} with model {}",
            cfg.llm_settings.api_url, cfg.llm_settings.model
        )),
        Err(e) => {
            fail(e.to_string());
            healthy = false;
        }
    }
    if cfg.translation_settings.context_lines > 0 {
        ok(format!(
            "Context lines enabled: {}",
            cfg.translation_settings.context_lines
        ));
    }

    println!("\n{}", "[Check] Dictionary".green());
    let t = &cfg.translation_settings;
    let dict_path = Path::new(&t.dictionary_file);
    if !t.use_dictionary {
        ok("Dictionary disabled");
    } else if !dict_path.exists() {
        warn(format!("{} not found", dict_path.display()));
    } else {
        match Dictionary::load(dict_path) {
            Ok(d) => ok(format!("{} loaded with {} entries", dict_path.display(), d.len())),
            Err(e) => {
                fail(e.to_string());
                healthy = false;
            }
        }
    }

    println!("\n{}", "[Check] Folders".green());
    let input = Path::new(&t.input_folder);
    if input.is_dir() {
        ok(format!(
            "Input folder '{}' exists with {} JSON file(s)",
            input.display(),
            find_json_files(input).len()
        ));
    } else {
        warn(format!("Input folder '{}' not found", input.display()));
    }
    let output = Path::new(&t.output_folder);
    if output.is_dir() {
        ok(format!("Output folder '{}' exists", output.display()));
    } else {
        warn(format!(
            "Output folder '{}' not found (will be created)",
            output.display()
        ));
    }

    if args.ping {
        println!("\n{}", "[Check] Endpoint".green());
        println!("  Attempting connection to {}...", cfg.llm_settings.api_url);
        let result = LlmClient::new(cfg.llm_settings.clone())
            .map_err(|e| e.to_string())
            .and_then(|client| {
                client
                    .translate(PING_TEXT, None)
                    .map_err(|e| e.to_string())
            });
        match result {
            Ok(translation) => ok(format!("Test translation: {} -> {}", PING_TEXT, translation)),
            Err(e) => {
                fail(e);
                healthy = false;
            }
        }
    }

    println!();
    if healthy {
        println!("{}", "[OK] Setup check complete".green());
    } else {
        println!("{}", "[ERROR] Setup check found problems".red());
    }
    Ok(healthy)
}
