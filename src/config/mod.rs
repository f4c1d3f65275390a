//! Configuration management

pub mod commands;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_NAME: &str = "mtl-tools";
const API_KEY_ENV_VARS: &[&str] = &["MTL_API_KEY", "OPENAI_API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm_settings: LlmSettings,

    #[serde(default)]
    pub translation_settings: TranslationSettings,

    #[serde(default)]
    pub excel_export: ExcelSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Full chat-completion endpoint URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer credential; `MTL_API_KEY` / `OPENAI_API_KEY` are used when empty
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Prepended to every user message; empty sends the text alone
    #[serde(default = "default_user_prompt_prefix")]
    pub user_prompt_prefix: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_p: Option<f32>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:1234/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "local-model".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_system_prompt() -> String {
    "You are a professional Japanese to English translator for game dialogue. \
     Translate the user's text into natural English. \
     Keep names, line breaks and formatting tags intact. \
     Only output the translated text, nothing else."
        .to_string()
}

fn default_user_prompt_prefix() -> String {
    "Translate this to English: ".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            system_prompt: default_system_prompt(),
            user_prompt_prefix: default_user_prompt_prefix(),
            max_tokens: None,
            top_p: None,
            top_k: None,
            min_p: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationSettings {
    #[serde(default = "default_input_folder")]
    pub input_folder: String,

    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    #[serde(default = "default_true")]
    pub use_dictionary: bool,

    #[serde(default = "default_dictionary_file")]
    pub dictionary_file: String,

    /// Number of previous blocks sent along as dialogue context (0 = off)
    #[serde(default)]
    pub context_lines: usize,

    /// Pause after each completion call
    #[serde(default)]
    pub request_delay_ms: u64,

    /// Drop "Monologue" placeholders the model produces for narrator names
    #[serde(default = "default_true")]
    pub clean_monologue: bool,

    /// Use the dictionary result for a name directly when it matched a term
    #[serde(default)]
    pub dictionary_names_verbatim: bool,
}

fn default_input_folder() -> String {
    "raw_umatl".to_string()
}

fn default_output_folder() -> String {
    "slop".to_string()
}

fn default_dictionary_file() -> String {
    "dictionary.json".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            input_folder: default_input_folder(),
            output_folder: default_output_folder(),
            use_dictionary: true,
            dictionary_file: default_dictionary_file(),
            context_lines: 0,
            request_delay_ms: 0,
            clean_monologue: true,
            dictionary_names_verbatim: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcelSettings {
    #[serde(default = "default_excel_file")]
    pub output_file: String,

    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

fn default_excel_file() -> String {
    "translations_qc.xlsx".to_string()
}

fn default_sheet_name() -> String {
    "Translations".to_string()
}

impl Default for ExcelSettings {
    fn default() -> Self {
        Self {
            output_file: default_excel_file(),
            sheet_name: default_sheet_name(),
        }
    }
}

/// A configuration plus the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    pub from_file: bool,
}

impl Config {
    /// Get the per-user config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_NAME))
    }

    /// Resolve which file to use: explicit path, `./config.toml`, then the
    /// per-user config file. Falls back to `./config.toml` when none exist.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }
        match Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME)) {
            Some(user) if user.exists() => user,
            _ => local,
        }
    }

    /// Load config, using defaults when no file exists. An explicit path
    /// that does not exist is an error.
    pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
        let path = Self::resolve_path(explicit);

        if !path.exists() {
            if explicit.is_some() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            let mut config = Self::default();
            config.apply_env();
            return Ok(LoadedConfig {
                config,
                path,
                from_file: false,
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let mut config: Config = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.apply_env();

        Ok(LoadedConfig {
            config,
            path,
            from_file: true,
        })
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if !self.llm_settings.api_key.is_empty() {
            return;
        }
        if let Some(key) = API_KEY_ENV_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        {
            self.llm_settings.api_key = key;
        }
    }

    /// Checks everything the translation stage needs.
    pub fn validate_llm(&self) -> Result<()> {
        let llm = &self.llm_settings;
        let url = llm.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "llm_settings.api_url must be an http(s) URL, got {:?}",
                llm.api_url
            )));
        }
        if llm.model.trim().is_empty() {
            return Err(Error::Config("llm_settings.model is empty".to_string()));
        }
        if !(0.0..=1.0).contains(&llm.temperature) {
            return Err(Error::Config(format!(
                "llm_settings.temperature must be within 0.0-1.0, got {}",
                llm.temperature
            )));
        }
        if llm.timeout_secs == 0 {
            return Err(Error::Config(
                "llm_settings.timeout_secs must be greater than 0".to_string(),
            ));
        }
        self.validate_folders()
    }

    pub fn validate_folders(&self) -> Result<()> {
        let t = &self.translation_settings;
        if t.input_folder.trim().is_empty() {
            return Err(Error::Config(
                "translation_settings.input_folder is empty".to_string(),
            ));
        }
        if t.output_folder.trim().is_empty() {
            return Err(Error::Config(
                "translation_settings.output_folder is empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_excel(&self) -> Result<()> {
        let excel = &self.excel_export;
        if excel.output_file.trim().is_empty() {
            return Err(Error::Config("excel_export.output_file is empty".to_string()));
        }
        let name = &excel.sheet_name;
        let len = name.chars().count();
        if len == 0 || len > 31 || name.contains(['[', ']', ':', '*', '?', '/', '\\']) {
            return Err(Error::Config(format!(
                "excel_export.sheet_name {:?} is not a valid sheet name",
                name
            )));
        }
        self.validate_folders()
    }
}
