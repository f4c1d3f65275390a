pub mod export;
pub mod import;
pub mod xlsx;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::cli::{ExportArgs, ImportArgs};
use crate::config::LoadedConfig;
use crate::document::load_tree;
use export::ExportReport;
use import::{ImportOptions, ImportReport};

pub fn run_export(args: &ExportArgs, loaded: &LoadedConfig) -> Result<ExportReport> {
    let mut cfg = loaded.config.clone();
    if let Some(input) = &args.input {
        cfg.translation_settings.output_folder = input.to_string_lossy().into_owned();
    }
    if let Some(output) = &args.output {
        cfg.excel_export.output_file = output.to_string_lossy().into_owned();
    }
    cfg.validate_excel()?;

    let input = PathBuf::from(&cfg.translation_settings.output_folder);
    let output_file = PathBuf::from(&cfg.excel_export.output_file);

    if !input.is_dir() {
        anyhow::bail!(
            "Translated folder does not exist: {}\nRun 'mtl translate' first.",
            input.display()
        );
    }

    println!(
        "{}",
        format!("[Export] {} -> {}", input.display(), output_file.display()).green()
    );

    let (documents, failures) = load_tree(&input);
    for failure in &failures {
        eprintln!("{}", format!("[WARN] Skipping {}", failure).yellow());
    }

    if documents.is_empty() {
        println!(
            "{}",
            format!("[WARN] No JSON files found in {}", input.display()).yellow()
        );
        return Ok(ExportReport {
            output_file,
            ..ExportReport::default()
        });
    }

    let report = export::export(&documents, &output_file, &cfg.excel_export.sheet_name)
        .with_context(|| format!("Failed to write {}", output_file.display()))?;

    println!(
        "{}",
        format!(
            "[OK] Exported {} row(s) from {} file(s) -> {}",
            report.total_rows(),
            report.documents,
            output_file.display()
        )
        .green()
    );
    println!(
        "  {} dialogue row(s), {} choice row(s)",
        report.block_rows, report.choice_rows
    );
    if !failures.is_empty() {
        println!(
            "{}",
            format!("  {} file(s) could not be read", failures.len()).yellow()
        );
    }
    println!("  Fill the QC column with corrections, then run 'mtl import'.");

    Ok(report)
}

pub fn run_import(args: &ImportArgs, loaded: &LoadedConfig) -> Result<ImportReport> {
    let mut cfg = loaded.config.clone();
    if let Some(excel) = &args.excel {
        cfg.excel_export.output_file = excel.to_string_lossy().into_owned();
    }
    if let Some(output) = &args.output {
        cfg.translation_settings.output_folder = output.to_string_lossy().into_owned();
    }
    cfg.validate_excel()?;

    let input_file = PathBuf::from(&cfg.excel_export.output_file);
    let output_root = PathBuf::from(&cfg.translation_settings.output_folder);

    if !input_file.is_file() {
        anyhow::bail!("Workbook not found: {}", input_file.display());
    }

    println!(
        "{}",
        format!(
            "[Import] {} -> {}",
            input_file.display(),
            output_root.display()
        )
        .green()
    );

    let options = ImportOptions {
        sheet_name: cfg.excel_export.sheet_name.clone(),
        apply_edits: args.apply_edits,
    };
    let report = import::import_qc(&input_file, &output_root, &options)
        .with_context(|| format!("Failed to import {}", input_file.display()))?;

    print_import_summary(&report, &output_root);
    Ok(report)
}

fn print_import_summary(report: &ImportReport, output_root: &Path) {
    if report.rows_with_changes == 0 {
        println!("{}", "[Import] No QC corrections found".yellow());
        return;
    }

    println!(
        "{}",
        format!(
            "[OK] Updated {} field(s) in {} file(s) under {}",
            report.fields_updated,
            report.documents_updated,
            output_root.display()
        )
        .green()
    );

    if !report.unmatched.is_empty() {
        println!(
            "{}",
            format!("  [WARN] {} row(s) could not be matched", report.unmatched.len()).yellow()
        );
        for e in &report.unmatched {
            println!("    {}", e);
        }
    }
    if !report.failed_documents.is_empty() {
        println!(
            "{}",
            format!(
                "  [ERROR] {} file(s) could not be loaded",
                report.failed_documents.len()
            )
            .red()
        );
        for e in &report.failed_documents {
            println!("    {}", e);
        }
    }
}
