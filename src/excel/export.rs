//! Flattens translated documents into review rows

use std::path::{Path, PathBuf};

use super::xlsx::{self, CellValue, Column};
use crate::document::DocumentFile;
use crate::error::Result;

pub const COL_BLOCK_IDX: usize = 0;
pub const COL_JP_NAME: usize = 1;
pub const COL_EN_NAME: usize = 2;
pub const COL_JP_TEXT: usize = 3;
pub const COL_EN_TEXT: usize = 4;
pub const COL_QC: usize = 5;
pub const COL_FILE_PATH: usize = 6;

/// Name cells of choice rows
pub const CHOICE_LABEL: &str = "[Choice]";

pub const COLUMNS: [Column; 7] = [
    Column { header: "blockIdx", width: 10.0, wrap: false, hidden: false },
    Column { header: "jpName", width: 15.0, wrap: false, hidden: false },
    Column { header: "enName", width: 15.0, wrap: false, hidden: false },
    Column { header: "jpText", width: 50.0, wrap: true, hidden: false },
    Column { header: "enText", width: 50.0, wrap: true, hidden: false },
    Column { header: "QC", width: 50.0, wrap: true, hidden: false },
    Column { header: "FilePath", width: 30.0, wrap: false, hidden: true },
];

#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub output_file: PathBuf,
    pub documents: usize,
    pub block_rows: usize,
    pub choice_rows: usize,
}

impl ExportReport {
    pub fn total_rows(&self) -> usize {
        self.block_rows + self.choice_rows
    }
}

/// `<blockIdx>-C<n>` with a 1-based choice position
pub fn choice_anchor(block_idx: i64, position: usize) -> String {
    format!("{}-C{}", block_idx, position + 1)
}

/// One row per block, each followed by one row per choice.
pub fn document_rows(file: &DocumentFile) -> Vec<Vec<CellValue>> {
    let key = file.key();
    let mut rows = Vec::new();

    for block in &file.document.text {
        rows.push(vec![
            CellValue::Number(block.block_idx as f64),
            CellValue::text(block.jp_name.as_str()),
            CellValue::text(block.en_name.as_str()),
            CellValue::text(block.jp_text.as_str()),
            CellValue::text(block.en_text.as_str()),
            CellValue::Empty,
            CellValue::text(key.as_str()),
        ]);

        for (i, choice) in block.choices.iter().enumerate() {
            rows.push(vec![
                CellValue::text(choice_anchor(block.block_idx, i)),
                CellValue::text(CHOICE_LABEL),
                CellValue::text(CHOICE_LABEL),
                CellValue::text(choice.jp_text.as_str()),
                CellValue::text(choice.en_text.as_str()),
                CellValue::Empty,
                CellValue::text(key.as_str()),
            ]);
        }
    }
    rows
}

pub fn export(documents: &[DocumentFile], output_file: &Path, sheet_name: &str) -> Result<ExportReport> {
    let mut sorted: Vec<&DocumentFile> = documents.iter().collect();
    sorted.sort_by_key(|d| d.key());

    let mut report = ExportReport {
        output_file: output_file.to_path_buf(),
        documents: sorted.len(),
        ..ExportReport::default()
    };

    let mut rows = Vec::new();
    for file in sorted {
        report.block_rows += file.document.text.len();
        report.choice_rows += file.document.choice_count();
        rows.extend(document_rows(file));
    }

    tracing::debug!(
        "Writing {} rows to {}",
        rows.len(),
        output_file.display()
    );
    xlsx::write_sheet(output_file, sheet_name, &COLUMNS, &rows)?;
    Ok(report)
}
