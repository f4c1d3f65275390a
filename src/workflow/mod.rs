//! Full workflow (translate, then export) and the interactive menu

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};

use crate::cli::{ExportArgs, ImportArgs, TranslateArgs};
use crate::config::LoadedConfig;
use crate::{excel, translate};

const BANNER: &str = r"
    ╔═══════════════════════════════════════════════════════════╗
    ║           MTL Translation Tools                           ║
    ║     Japanese to English Translation Pipeline              ║
    ╚═══════════════════════════════════════════════════════════╝
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Translate,
    Export,
    Import,
    Workflow,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Translate),
            "2" => Some(Self::Export),
            "3" => Some(Self::Import),
            "4" => Some(Self::Workflow),
            "5" => Some(Self::Exit),
            _ => None,
        }
    }
}

pub fn print_banner() {
    println!("{}", BANNER.cyan());
}

pub fn run(args: &TranslateArgs, loaded: &LoadedConfig) -> Result<()> {
    println!("\n{}", "[Step 1/2] Translating...".cyan());
    let report = translate::run(args, loaded)?;

    println!("\n{}", "[Step 2/2] Exporting to Excel for QC...".cyan());
    let export_args = ExportArgs {
        input: args.output.clone(),
        output: None,
    };
    let exported = excel::run_export(&export_args, loaded)?;

    println!("\n{}", "[Workflow] Translation workflow complete!".green().bold());
    if !report.files_failed.is_empty() || !report.field_failures.is_empty() {
        println!(
            "{}",
            "  Some files or fields failed; re-run 'mtl translate' to retry them.".yellow()
        );
    }
    println!();
    println!("Next steps:");
    println!("  1. Open {} to review translations", exported.output_file.display());
    println!("  2. Add corrected translations to the 'QC' column");
    println!("  3. Run: mtl import");

    Ok(())
}

fn print_menu() {
    println!("\nWhat would you like to do?\n");
    println!("  1. Translate JSON files");
    println!("  2. Export translated files to Excel for QC");
    println!("  3. Import QC updates from Excel");
    println!("  4. Full workflow (translate + export to Excel)");
    println!("  5. Exit");
}

/// Reads menu choices until a valid one arrives. `None` at end of input.
pub fn prompt_choice<R: BufRead>(input: &mut R) -> Result<Option<MenuChoice>> {
    loop {
        print!("\nEnter your choice (1-5): ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read input")? == 0 {
            return Ok(None);
        }
        match MenuChoice::parse(&line) {
            Some(choice) => return Ok(Some(choice)),
            None => println!("{}", "Invalid choice. Please try again.".yellow()),
        }
    }
}

pub fn interactive(loaded: &LoadedConfig) -> Result<()> {
    print_banner();
    print_menu();

    let stdin = io::stdin();
    let choice = prompt_choice(&mut stdin.lock())?;

    match choice {
        Some(MenuChoice::Translate) => {
            translate::run(&TranslateArgs::default(), loaded)?;
        }
        Some(MenuChoice::Export) => {
            excel::run_export(&ExportArgs::default(), loaded)?;
        }
        Some(MenuChoice::Import) => {
            excel::run_import(&ImportArgs::default(), loaded)?;
            println!("\n{}", "[Import] QC import complete!".green());
        }
        Some(MenuChoice::Workflow) => run(&TranslateArgs::default(), loaded)?,
        Some(MenuChoice::Exit) | None => println!("\nGoodbye!"),
    }

    Ok(())
}
