use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mtl")]
#[command(author, version, about = "Machine translation and QC round-trip for game dialogue JSON", long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./config.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate every dialogue file with the configured model
    Translate(TranslateArgs),

    /// Export translated files to an xlsx workbook for review
    Export(ExportArgs),

    /// Import QC corrections from a reviewed workbook
    Import(ImportArgs),

    /// Translate, then export for review
    Workflow(TranslateArgs),

    /// Numbered menu for the workflow stages
    Interactive,

    /// Check folders, dictionary and endpoint settings
    Check(CheckArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Initialize configuration file with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., llm_settings.model)
        key: String,
        /// Value to set
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show config file path
    Path,

    /// Edit config file with default editor
    Edit,
}

#[derive(Parser, Debug, Default, Clone)]
pub struct TranslateArgs {
    /// Input folder with source JSON files
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output folder for translated files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Dictionary JSON file
    #[arg(short, long)]
    pub dictionary: Option<PathBuf>,

    /// Skip the dictionary pass
    #[arg(long, default_value_t = false)]
    pub no_dictionary: bool,

    /// Translate fields that already have a translation
    #[arg(short, long, default_value_t = false)]
    pub force: bool,

    /// Chat-completion endpoint URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Previous dialogue blocks sent as context
    #[arg(long)]
    pub context_lines: Option<usize>,
}

#[derive(Parser, Debug, Default, Clone)]
pub struct ExportArgs {
    /// Folder with translated JSON files
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Workbook to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Default, Clone)]
pub struct ImportArgs {
    /// Reviewed workbook
    #[arg(short, long)]
    pub excel: Option<PathBuf>,

    /// Folder with translated JSON files to update
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also take direct edits to enText/enName when QC is blank
    #[arg(long, default_value_t = false)]
    pub apply_edits: bool,
}

#[derive(Parser, Debug, Default, Clone)]
pub struct CheckArgs {
    /// Send a one-line test request to the endpoint
    #[arg(long, default_value_t = false)]
    pub ping: bool,
}
