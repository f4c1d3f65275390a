//! Applies reviewer corrections from a QC workbook back to the documents

use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::export::{COLUMNS, COL_BLOCK_IDX, COL_EN_NAME, COL_EN_TEXT, COL_FILE_PATH, COL_QC};
use super::xlsx::{self, CellValue, SheetRow};
use crate::document::{Document, key_to_rel_path, path_key};
use crate::error::{Error, Result};

static CHOICE_ANCHOR: OnceLock<Regex> = OnceLock::new();

fn choice_anchor_regex() -> &'static Regex {
    CHOICE_ANCHOR.get_or_init(|| Regex::new(r"^(-?\d+)-C(\d+)$").expect("Invalid regex pattern"))
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub sheet_name: String,
    /// Take direct edits to enText/enName when QC is blank
    pub apply_edits: bool,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub rows_with_changes: usize,
    pub documents_updated: usize,
    pub fields_updated: usize,
    /// Rows that could not be matched, as `Error::RowMatch`
    pub unmatched: Vec<Error>,
    pub failed_documents: Vec<Error>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Block,
    /// 0-based choice position
    Choice(usize),
}

/// Reads the blockIdx column: a plain index addresses a block, `N-Ck` the
/// k-th choice of block N.
pub fn parse_anchor(cell: &CellValue) -> Option<(i64, Target)> {
    match cell {
        CellValue::Number(n) if n.fract() == 0.0 => Some((*n as i64, Target::Block)),
        CellValue::Text(s) => {
            let s = s.trim();
            if let Ok(idx) = s.parse::<i64>() {
                return Some((idx, Target::Block));
            }
            let caps = choice_anchor_regex().captures(s)?;
            let idx = caps[1].parse().ok()?;
            let n: usize = caps[2].parse().ok()?;
            (n >= 1).then(|| (idx, Target::Choice(n - 1)))
        }
        _ => None,
    }
}

#[derive(Debug)]
struct RowEdit {
    row: u32,
    block_idx: i64,
    target: Target,
    en_text: Option<String>,
    en_name: Option<String>,
}

struct ColumnMap {
    block_idx: usize,
    qc: usize,
    file_path: usize,
    en_text: Option<usize>,
    en_name: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &SheetRow, apply_edits: bool) -> Result<Self> {
        let by_name: HashMap<String, usize> = header
            .cells
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_text().trim().to_string(), i))
            .collect();
        let find = |col: usize| by_name.get(COLUMNS[col].header).copied();

        let mut required = vec![COL_BLOCK_IDX, COL_QC, COL_FILE_PATH];
        if apply_edits {
            required.extend([COL_EN_TEXT, COL_EN_NAME]);
        }
        let missing: Vec<&str> = required
            .iter()
            .filter(|&&c| find(c).is_none())
            .map(|&c| COLUMNS[c].header)
            .collect();
        if !missing.is_empty() {
            return Err(Error::SpreadsheetFormat(format!(
                "missing column(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            block_idx: find(COL_BLOCK_IDX).unwrap_or(COL_BLOCK_IDX),
            qc: find(COL_QC).unwrap_or(COL_QC),
            file_path: find(COL_FILE_PATH).unwrap_or(COL_FILE_PATH),
            en_text: find(COL_EN_TEXT).filter(|_| apply_edits),
            en_name: find(COL_EN_NAME).filter(|_| apply_edits),
        })
    }
}

fn row_match(row: u32, reason: impl Into<String>) -> Error {
    Error::RowMatch {
        row,
        reason: reason.into(),
    }
}

/// New `(enText, enName)` values a row asks for. QC wins over direct edits.
fn row_values(row: &SheetRow, cols: &ColumnMap) -> (Option<String>, Option<String>) {
    let qc = row.get(cols.qc).as_text().trim().to_string();
    if !qc.is_empty() {
        return (Some(qc), None);
    }
    let edited = |col: Option<usize>| {
        col.map(|c| row.get(c).as_text().trim().to_string())
            .filter(|v| !v.is_empty())
    };
    (edited(cols.en_text), edited(cols.en_name))
}

pub fn import_qc(input_file: &Path, output_root: &Path, options: &ImportOptions) -> Result<ImportReport> {
    let sheet = xlsx::read_sheet(input_file, &options.sheet_name)?;
    let mut rows = sheet.rows.iter();
    let header = rows
        .next()
        .ok_or_else(|| Error::SpreadsheetFormat(format!("sheet {:?} is empty", sheet.name)))?;
    let cols = ColumnMap::from_header(header, options.apply_edits)?;

    let mut report = ImportReport::default();
    let mut by_document: BTreeMap<PathBuf, Vec<RowEdit>> = BTreeMap::new();

    for row in rows {
        if row.is_blank() {
            continue;
        }
        let (en_text, en_name) = row_values(row, &cols);
        if en_text.is_none() && en_name.is_none() {
            continue;
        }
        report.rows_with_changes += 1;

        let anchor = row.get(cols.block_idx);
        let Some((block_idx, target)) = parse_anchor(anchor) else {
            report.unmatched.push(row_match(
                row.number,
                format!("unrecognised blockIdx {:?}", anchor.as_text()),
            ));
            continue;
        };

        let key = row.get(cols.file_path).as_text();
        let Some(rel_path) = key_to_rel_path(&key) else {
            report.unmatched.push(row_match(
                row.number,
                format!("invalid FilePath {:?}", key),
            ));
            continue;
        };

        by_document.entry(rel_path).or_default().push(RowEdit {
            row: row.number,
            block_idx,
            target,
            en_text,
            en_name: if target == Target::Block { en_name } else { None },
        });
    }

    for (rel_path, edits) in by_document {
        let path = output_root.join(&rel_path);
        if !path.is_file() {
            for edit in &edits {
                report.unmatched.push(row_match(
                    edit.row,
                    format!("document {} not found", path_key(&rel_path)),
                ));
            }
            continue;
        }

        let mut doc = match Document::load(&path) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("{}", e);
                report.failed_documents.push(e);
                continue;
            }
        };

        let changed = apply_edits(&mut doc, &rel_path, edits, &mut report);
        if changed > 0 {
            if let Err(e) = doc.save(&path) {
                tracing::warn!("{}", e);
                report.failed_documents.push(e);
                continue;
            }
            report.documents_updated += 1;
            report.fields_updated += changed;
            tracing::debug!("Updated {} field(s) in {}", changed, path.display());
        }
    }

    Ok(report)
}

fn set_field(field: &mut String, value: Option<String>) -> usize {
    match value {
        Some(v) if *field != v => {
            *field = v;
            1
        }
        _ => 0,
    }
}

fn apply_edits(
    doc: &mut Document,
    rel_path: &Path,
    edits: Vec<RowEdit>,
    report: &mut ImportReport,
) -> usize {
    let mut changed = 0;

    for edit in edits {
        let Some(block) = doc.block_by_idx_mut(edit.block_idx) else {
            report.unmatched.push(row_match(
                edit.row,
                format!(
                    "blockIdx {} not found in {}",
                    edit.block_idx,
                    path_key(rel_path)
                ),
            ));
            continue;
        };

        match edit.target {
            Target::Block => {
                changed += set_field(&mut block.en_text, edit.en_text);
                changed += set_field(&mut block.en_name, edit.en_name);
            }
            Target::Choice(i) => match block.choices.get_mut(i) {
                Some(choice) => changed += set_field(&mut choice.en_text, edit.en_text),
                None => report.unmatched.push(row_match(
                    edit.row,
                    format!(
                        "block {} in {} has no choice {}",
                        edit.block_idx,
                        path_key(rel_path),
                        i + 1
                    ),
                )),
            },
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::load_tree;
    use crate::excel::export::export;
    use std::fs;
    use tempfile::TempDir;

    const SCENE: &str = r#"{
    "text": [
        {"blockIdx": 1, "jpName": "ウマ娘", "enName": "Umamusume", "jpText": "こんにちは", "enText": "Hello", "choices": []},
        {"blockIdx": 5, "jpName": "", "enName": "", "jpText": "どうする？", "enText": "What now?",
         "choices": [{"jpText": "走る", "enText": "Run"}, {"jpText": "休む", "enText": "Rest"}]}
    ]
}"#;

    fn options() -> ImportOptions {
        ImportOptions {
            sheet_name: "Translations".to_string(),
            apply_edits: false,
        }
    }

    fn slop_with(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = temp.path().join("slop").join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        temp
    }

    fn row(cells: [&str; 7]) -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::text(*c)).collect()
    }

    fn write_rows(path: &Path, rows: &[Vec<CellValue>]) {
        xlsx::write_sheet(path, "Translations", &COLUMNS, rows).unwrap();
    }

    #[test]
    fn test_parse_anchor() {
        assert_eq!(parse_anchor(&CellValue::Number(7.0)), Some((7, Target::Block)));
        assert_eq!(parse_anchor(&CellValue::text(" 12 ")), Some((12, Target::Block)));
        assert_eq!(parse_anchor(&CellValue::text("5-C2")), Some((5, Target::Choice(1))));
        assert_eq!(parse_anchor(&CellValue::text("-3-C1")), Some((-3, Target::Choice(0))));
        assert_eq!(parse_anchor(&CellValue::text("5-C0")), None);
        assert_eq!(parse_anchor(&CellValue::text("five")), None);
        assert_eq!(parse_anchor(&CellValue::Number(1.5)), None);
        assert_eq!(parse_anchor(&CellValue::Empty), None);
    }

    #[test]
    fn test_blank_qc_round_trip_changes_nothing() {
        let temp = slop_with(&[("scene.json", SCENE), ("sub/other.json", SCENE)]);
        let slop = temp.path().join("slop");
        let workbook = temp.path().join("qc.xlsx");
        let before = fs::read(slop.join("scene.json")).unwrap();

        let (docs, failures) = load_tree(&slop);
        assert!(failures.is_empty());
        export(&docs, &workbook, "Translations").unwrap();

        let report = import_qc(&workbook, &slop, &options()).unwrap();
        assert_eq!(report.documents_updated, 0);
        assert_eq!(report.fields_updated, 0);
        assert!(report.unmatched.is_empty());
        assert_eq!(fs::read(slop.join("scene.json")).unwrap(), before);
    }

    #[test]
    fn test_choice_qc_changes_only_that_choice() {
        let temp = slop_with(&[("scene.json", SCENE)]);
        let slop = temp.path().join("slop");
        let workbook = temp.path().join("qc.xlsx");
        write_rows(
            &workbook,
            &[
                row(["1", "ウマ娘", "Umamusume", "こんにちは", "Hello", "", "scene.json"]),
                row(["5-C2", "[Choice]", "[Choice]", "休む", "Rest", " Take a break ", "scene.json"]),
            ],
        );

        let report = import_qc(&workbook, &slop, &options()).unwrap();
        assert_eq!(report.documents_updated, 1);
        assert_eq!(report.fields_updated, 1);

        let doc = Document::load(slop.join("scene.json")).unwrap();
        assert_eq!(doc.text[1].choices[1].en_text, "Take a break");
        assert_eq!(doc.text[1].choices[0].en_text, "Run");
        assert_eq!(doc.text[1].en_text, "What now?");
        assert_eq!(doc.text[0].en_text, "Hello");
    }

    #[test]
    fn test_reordered_rows_and_unmatched_rows() {
        let temp = slop_with(&[("a.json", SCENE), ("b/c.json", SCENE)]);
        let slop = temp.path().join("slop");
        let workbook = temp.path().join("qc.xlsx");
        write_rows(
            &workbook,
            &[
                row(["5", "", "", "", "", "Well then?", "b/c.json"]),
                row(["1", "", "", "", "", "Hi there", "a.json"]),
                row(["99", "", "", "", "", "nowhere", "a.json"]),
                row(["5-C3", "", "", "", "", "nowhere", "a.json"]),
                row(["abc", "", "", "", "", "nowhere", "a.json"]),
                row(["1", "", "", "", "", "nowhere", "../escape.json"]),
                row(["1", "", "", "", "", "nowhere", "missing.json"]),
                row(["1", "", "", "", "", "Hello", "b/c.json"]),
            ],
        );

        let report = import_qc(&workbook, &slop, &options()).unwrap();
        assert_eq!(report.documents_updated, 2);
        assert_eq!(report.fields_updated, 2);
        assert_eq!(report.unmatched.len(), 5);
        assert!(
            report
                .unmatched
                .iter()
                .all(|e| matches!(e, Error::RowMatch { .. }))
        );

        let a = Document::load(slop.join("a.json")).unwrap();
        assert_eq!(a.text[0].en_text, "Hi there");
        let c = Document::load(slop.join("b/c.json")).unwrap();
        assert_eq!(c.text[1].en_text, "Well then?");
        assert_eq!(c.text[0].en_text, "Hello");
    }

    #[test]
    fn test_missing_columns_is_format_error() {
        let temp = slop_with(&[("a.json", SCENE)]);
        let workbook = temp.path().join("qc.xlsx");
        let columns = &COLUMNS[..5];
        xlsx::write_sheet(&workbook, "Translations", columns, &[]).unwrap();

        let result = import_qc(&workbook, &temp.path().join("slop"), &options());
        match result {
            Err(Error::SpreadsheetFormat(msg)) => {
                assert!(msg.contains("QC"));
                assert!(msg.contains("FilePath"));
            }
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_document_is_reported() {
        let temp = slop_with(&[("a.json", "{ broken")]);
        let workbook = temp.path().join("qc.xlsx");
        write_rows(&workbook, &[row(["1", "", "", "", "", "Hi", "a.json"])]);

        let report = import_qc(&workbook, &temp.path().join("slop"), &options()).unwrap();
        assert_eq!(report.failed_documents.len(), 1);
        assert_eq!(report.documents_updated, 0);
    }

    #[test]
    fn test_apply_edits_takes_direct_changes() {
        let temp = slop_with(&[("scene.json", SCENE)]);
        let slop = temp.path().join("slop");
        let workbook = temp.path().join("qc.xlsx");
        write_rows(
            &workbook,
            &[
                row(["1", "ウマ娘", " Uma Musume ", "こんにちは", "Hello!\n", "", "scene.json"]),
                row(["5-C1", "[Choice]", "[Choice]", "走る", "Sprint", "", "scene.json"]),
                row(["5", "", "", "どうする？", "What now?", "", "scene.json"]),
            ],
        );

        let report = import_qc(&workbook, &slop, &options()).unwrap();
        assert_eq!(report.fields_updated, 0);

        let opts = ImportOptions {
            apply_edits: true,
            ..options()
        };
        let report = import_qc(&workbook, &slop, &opts).unwrap();
        assert_eq!(report.fields_updated, 3);

        let doc = Document::load(slop.join("scene.json")).unwrap();
        assert_eq!(doc.text[0].en_name, "Uma Musume");
        assert_eq!(doc.text[0].en_text, "Hello!");
        assert_eq!(doc.text[1].choices[0].en_text, "Sprint");
        assert_eq!(doc.text[1].en_name, "");
    }

    #[test]
    fn test_write_failure_does_not_stop_other_documents() {
        let temp = slop_with(&[("a.json", SCENE), ("b.json", SCENE)]);
        let slop = temp.path().join("slop");
        let workbook = temp.path().join("qc.xlsx");
        write_rows(
            &workbook,
            &[
                row(["1", "", "", "", "", "Hi from a", "a.json"]),
                row(["1", "", "", "", "", "Hi from b", "b.json"]),
                row(["99", "", "", "", "", "nowhere", "b.json"]),
            ],
        );

        let locked = slop.join("a.json");
        let mut perms = fs::metadata(&locked).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&locked, perms).unwrap();
        // Privileged users can write read-only files anyway.
        let blocked = fs::OpenOptions::new().write(true).open(&locked).is_err();

        let report = import_qc(&workbook, &slop, &options()).unwrap();
        let b = Document::load(slop.join("b.json")).unwrap();
        assert_eq!(b.text[0].en_text, "Hi from b");
        assert_eq!(report.unmatched.len(), 1);

        if blocked {
            assert_eq!(report.failed_documents.len(), 1);
            assert!(matches!(report.failed_documents[0], Error::Io { .. }));
            assert_eq!(report.documents_updated, 1);
            assert_eq!(report.fields_updated, 1);
            let a = Document::load(&locked).unwrap();
            assert_eq!(a.text[0].en_text, "Hello");
        } else {
            assert!(report.failed_documents.is_empty());
            assert_eq!(report.documents_updated, 2);
        }
    }
}
