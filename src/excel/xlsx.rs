//! Minimal Office Open XML workbook: one styled sheet out, any sheet back in

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const STYLE_HEADER: u32 = 1;
const STYLE_WRAP: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() { Self::Empty } else { Self::Text(s) }
    }

    /// Cell content as the reviewer sees it; whole numbers print without `.0`.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Bool(true) => "TRUE".to_string(),
            Self::Bool(false) => "FALSE".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub header: &'static str,
    pub width: f64,
    pub wrap: bool,
    pub hidden: bool,
}

#[derive(Debug, Clone)]
pub struct SheetRow {
    /// 1-based row number as stored in the file
    pub number: u32,
    pub cells: Vec<CellValue>,
}

impl SheetRow {
    pub fn get(&self, col: usize) -> &CellValue {
        self.cells.get(col).unwrap_or(&CellValue::Empty)
    }

    pub fn is_blank(&self) -> bool {
        self.cells
            .iter()
            .all(|c| c.as_text().trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<SheetRow>,
}

/// `0` → `A`, `25` → `Z`, `26` → `AA`
pub fn column_name(mut idx: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Splits a reference like `AB12` into a 0-based column and a 1-based row.
pub fn parse_cell_ref(r: &str) -> Option<(usize, u32)> {
    let letters: String = r.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    if letters.is_empty() {
        return None;
    }
    let mut col = 0usize;
    for c in letters.chars() {
        col = col * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    let row = r[letters.len()..].parse().ok()?;
    Some((col - 1, row))
}

/// XML 1.0 forbids most control characters even when escaped.
fn xml_text(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect();
    escape(cleaned.as_str()).into_owned()
}

fn content_types_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#
        .to_string()
}

fn root_rels_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{NS_PKG_REL}"><Relationship Id="rId1" Type="{NS_REL}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
    )
}

fn workbook_xml(sheet_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{NS_MAIN}" xmlns:r="{NS_REL}"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        xml_text(sheet_name)
    )
}

fn workbook_rels_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{NS_PKG_REL}"><Relationship Id="rId1" Type="{NS_REL}/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="{NS_REL}/styles" Target="styles.xml"/></Relationships>"#
    )
}

/// Style 1: bold white on blue, centered. Style 2: wrapped, top aligned.
fn styles_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="{NS_MAIN}"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><color rgb="FFFFFFFF"/><name val="Calibri"/></font></fonts><fills count="3"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FF366092"/><bgColor indexed="64"/></patternFill></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="2" borderId="0" xfId="0" applyFont="1" applyFill="1" applyAlignment="1"><alignment horizontal="center" vertical="center"/></xf><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0" applyAlignment="1"><alignment vertical="top" wrapText="1"/></xf></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#
    )
}

fn push_cell(out: &mut String, cell_ref: &str, value: &CellValue, style: Option<u32>) {
    let s = style.map(|s| format!(r#" s="{}""#, s)).unwrap_or_default();
    match value {
        CellValue::Empty => {
            if style.is_some() {
                out.push_str(&format!(r#"<c r="{cell_ref}"{s}/>"#));
            }
        }
        CellValue::Number(n) => {
            out.push_str(&format!(r#"<c r="{cell_ref}"{s}><v>{n}</v></c>"#));
        }
        CellValue::Bool(b) => {
            out.push_str(&format!(
                r#"<c r="{cell_ref}"{s} t="b"><v>{}</v></c>"#,
                u8::from(*b)
            ));
        }
        CellValue::Text(text) => {
            out.push_str(&format!(
                r#"<c r="{cell_ref}"{s} t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                xml_text(text)
            ));
        }
    }
}

fn worksheet_xml(columns: &[Column], rows: &[Vec<CellValue>]) -> String {
    let mut out = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{NS_MAIN}" xmlns:r="{NS_REL}"><sheetViews><sheetView workbookViewId="0"><pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/></sheetView></sheetViews><sheetFormatPr defaultRowHeight="15"/><cols>"#
    );

    for (i, col) in columns.iter().enumerate() {
        let hidden = if col.hidden { r#" hidden="1""# } else { "" };
        out.push_str(&format!(
            r#"<col min="{n}" max="{n}" width="{}" customWidth="1"{hidden}/>"#,
            col.width,
            n = i + 1
        ));
    }
    out.push_str("</cols><sheetData>");

    out.push_str(r#"<row r="1">"#);
    for (i, col) in columns.iter().enumerate() {
        let cell_ref = format!("{}1", column_name(i));
        push_cell(
            &mut out,
            &cell_ref,
            &CellValue::text(col.header),
            Some(STYLE_HEADER),
        );
    }
    out.push_str("</row>");

    for (r, row) in rows.iter().enumerate() {
        let row_num = r + 2;
        out.push_str(&format!(r#"<row r="{row_num}">"#));
        for (i, value) in row.iter().enumerate() {
            let style = columns.get(i).filter(|c| c.wrap).map(|_| STYLE_WRAP);
            let cell_ref = format!("{}{}", column_name(i), row_num);
            push_cell(&mut out, &cell_ref, value, style);
        }
        out.push_str("</row>");
    }

    out.push_str("</sheetData></worksheet>");
    out
}

/// Writes a single-sheet workbook: a styled, frozen header row from
/// `columns`, then `rows` starting at row 2.
pub fn write_sheet(
    path: &Path,
    sheet_name: &str,
    columns: &[Column],
    rows: &[Vec<CellValue>],
) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }

    let parts = [
        ("[Content_Types].xml", content_types_xml()),
        ("_rels/.rels", root_rels_xml()),
        ("xl/workbook.xml", workbook_xml(sheet_name)),
        ("xl/_rels/workbook.xml.rels", workbook_rels_xml()),
        ("xl/styles.xml", styles_xml()),
        ("xl/worksheets/sheet1.xml", worksheet_xml(columns, rows)),
    ];

    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut zout = ZipWriter::new(file);
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let zip_err = |e: zip::result::ZipError| Error::io(path, std::io::Error::other(e));

    for (name, content) in parts {
        zout.start_file(name, opts).map_err(zip_err)?;
        zout.write_all(content.as_bytes())
            .map_err(|e| Error::io(path, e))?;
    }
    zout.finish().map_err(zip_err)?;
    Ok(())
}

fn attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// `r:id` under whatever prefix the relationships namespace got.
fn rel_id_attr(e: &BytesStart) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.prefix().is_some() && a.key.local_name().as_ref() == b"id")
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn format_err(part: &str, e: impl std::fmt::Display) -> Error {
    Error::SpreadsheetFormat(format!("{}: {}", part, e))
}

struct Package {
    archive: ZipArchive<File>,
}

impl Package {
    fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let archive = ZipArchive::new(file).map_err(|e| {
            Error::SpreadsheetFormat(format!("{} is not an xlsx workbook: {}", path.display(), e))
        })?;
        Ok(Self { archive })
    }

    fn part(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(format_err(name, e)),
        };
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut data)
            .map_err(|e| format_err(name, e))?;
        Ok(Some(data))
    }

    fn required_part(&mut self, name: &str) -> Result<Vec<u8>> {
        self.part(name)?
            .ok_or_else(|| Error::SpreadsheetFormat(format!("missing part {}", name)))
    }
}

/// `(sheet name, relationship id)` in workbook order
fn parse_workbook(xml: &[u8]) -> Result<Vec<(String, String)>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sheet" => {
                if let (Some(name), Some(id)) = (attr(&e, b"name"), rel_id_attr(&e)) {
                    sheets.push((name, id));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format_err("xl/workbook.xml", e)),
        }
        buf.clear();
    }
    Ok(sheets)
}

/// Relationship id → part name inside the package
fn parse_workbook_rels(xml: &[u8]) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut targets = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attr(&e, b"Id"), attr(&e, b"Target")) {
                    let part = match target.strip_prefix('/') {
                        Some(abs) => abs.to_string(),
                        None => format!("xl/{}", target),
                    };
                    targets.insert(id, part);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format_err("xl/_rels/workbook.xml.rels", e)),
        }
        buf.clear();
    }
    Ok(targets)
}

/// Plain text of each `<si>`; phonetic runs (`<rPh>`) are left out.
fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_t = false;
    let mut in_rph = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => current.clear(),
                b"t" => in_t = true,
                b"rPh" => in_rph = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"si" => strings.push(std::mem::take(&mut current)),
                b"t" => in_t = false,
                b"rPh" => in_rph = false,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Ok(Event::Text(t)) if in_t && !in_rph => {
                let text = t.unescape().map_err(|e| format_err("xl/sharedStrings.xml", e))?;
                current.push_str(&text);
            }
            Ok(Event::CData(t)) if in_t && !in_rph => {
                current.push_str(&String::from_utf8_lossy(&t.into_inner()));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format_err("xl/sharedStrings.xml", e)),
        }
        buf.clear();
    }
    Ok(strings)
}

#[derive(Default)]
struct PendingCell {
    col: usize,
    kind: String,
    value: String,
    inline: String,
}

impl PendingCell {
    fn finish(self, shared: &[String]) -> CellValue {
        match self.kind.as_str() {
            "s" => match self.value.trim().parse::<usize>().ok().and_then(|i| shared.get(i)) {
                Some(s) => CellValue::text(s.clone()),
                None => {
                    tracing::warn!("Shared string index {:?} out of range", self.value);
                    CellValue::Empty
                }
            },
            "inlineStr" => CellValue::text(self.inline),
            "str" | "e" => CellValue::text(self.value),
            "b" => CellValue::Bool(self.value.trim() == "1"),
            _ => {
                let v = self.value.trim();
                if v.is_empty() {
                    CellValue::Empty
                } else {
                    v.parse::<f64>()
                        .map(CellValue::Number)
                        .unwrap_or_else(|_| CellValue::Text(v.to_string()))
                }
            }
        }
    }
}

fn parse_worksheet(xml: &[u8], part: &str, shared: &[String]) -> Result<Vec<SheetRow>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut rows = Vec::new();

    let mut row: Option<SheetRow> = None;
    let mut last_row = 0u32;
    let mut next_col = 0usize;
    let mut cell: Option<PendingCell> = None;
    let mut in_v = false;
    let mut in_t = false;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| format_err(part, e))?;
        match event {
            Event::Start(e) if e.local_name().as_ref() == b"row" => {
                let number = attr(&e, b"r")
                    .and_then(|r| r.parse().ok())
                    .unwrap_or(last_row + 1);
                last_row = number;
                next_col = 0;
                rows.extend(row.take());
                row = Some(SheetRow {
                    number,
                    cells: Vec::new(),
                });
            }
            Event::Empty(e) if e.local_name().as_ref() == b"row" => {
                last_row = attr(&e, b"r")
                    .and_then(|r| r.parse().ok())
                    .unwrap_or(last_row + 1);
            }
            Event::End(e) if e.local_name().as_ref() == b"row" => {
                rows.extend(row.take());
            }
            Event::Start(e) if e.local_name().as_ref() == b"c" => {
                let col = attr(&e, b"r")
                    .and_then(|r| parse_cell_ref(&r))
                    .map(|(c, _)| c)
                    .unwrap_or(next_col);
                next_col = col + 1;
                cell = Some(PendingCell {
                    col,
                    kind: attr(&e, b"t").unwrap_or_default(),
                    ..PendingCell::default()
                });
            }
            Event::Empty(e) if e.local_name().as_ref() == b"c" => {
                next_col = attr(&e, b"r")
                    .and_then(|r| parse_cell_ref(&r))
                    .map(|(c, _)| c + 1)
                    .unwrap_or(next_col + 1);
            }
            Event::End(e) if e.local_name().as_ref() == b"c" => {
                if let (Some(pending), Some(current)) = (cell.take(), row.as_mut()) {
                    let col = pending.col;
                    let value = pending.finish(shared);
                    if current.cells.len() <= col {
                        current.cells.resize(col + 1, CellValue::Empty);
                    }
                    current.cells[col] = value;
                }
            }
            Event::Start(e) => match e.local_name().as_ref() {
                b"v" => in_v = true,
                b"t" => in_t = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"v" => in_v = false,
                b"t" => in_t = false,
                _ => {}
            },
            Event::Text(t) if in_v || in_t => {
                let text = t.unescape().map_err(|e| format_err(part, e))?;
                if let Some(pending) = cell.as_mut() {
                    if in_v {
                        pending.value.push_str(&text);
                    } else {
                        pending.inline.push_str(&text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    rows.extend(row.take());
    Ok(rows)
}

/// Reads the sheet called `preferred`, or the first sheet when there is
/// no such sheet.
pub fn read_sheet(path: &Path, preferred: &str) -> Result<Sheet> {
    let mut package = Package::open(path)?;

    let sheets = parse_workbook(&package.required_part("xl/workbook.xml")?)?;
    let rels = parse_workbook_rels(&package.required_part("xl/_rels/workbook.xml.rels")?)?;
    let shared = match package.part("xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let (name, rel_id) = match sheets.iter().find(|(name, _)| name == preferred) {
        Some(sheet) => sheet.clone(),
        None => {
            let first = sheets
                .first()
                .cloned()
                .ok_or_else(|| Error::SpreadsheetFormat("workbook has no sheets".to_string()))?;
            tracing::warn!(
                "Sheet {:?} not found, reading {:?} instead",
                preferred,
                first.0
            );
            first
        }
    };

    let part = rels.get(&rel_id).ok_or_else(|| {
        Error::SpreadsheetFormat(format!("sheet {:?} has no relationship {}", name, rel_id))
    })?;
    let xml = package.required_part(part)?;
    let rows = parse_worksheet(&xml, part, &shared)?;

    Ok(Sheet { name, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cell_refs() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(6), "G");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
        assert_eq!(parse_cell_ref("G12"), Some((6, 12)));
        assert_eq!(parse_cell_ref("AB3"), Some((27, 3)));
        assert_eq!(parse_cell_ref("12"), None);
    }

    #[test]
    fn test_number_text_display() {
        assert_eq!(CellValue::Number(5.0).as_text(), "5");
        assert_eq!(CellValue::Number(-2.0).as_text(), "-2");
        assert_eq!(CellValue::Number(1.5).as_text(), "1.5");
        assert_eq!(CellValue::text(""), CellValue::Empty);
    }

    #[test]
    fn test_written_sheet_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/qc.xlsx");
        let columns = [
            Column { header: "id", width: 10.0, wrap: false, hidden: false },
            Column { header: "text", width: 40.0, wrap: true, hidden: false },
            Column { header: "path", width: 30.0, wrap: false, hidden: true },
        ];
        let rows = vec![
            vec![
                CellValue::Number(3.0),
                CellValue::text("「はい」 & <タグ>\n二行目"),
                CellValue::text("a/b.json"),
            ],
            vec![CellValue::text("3-C1"), CellValue::Empty, CellValue::text("a/b.json")],
        ];

        write_sheet(&path, "Translations", &columns, &rows).unwrap();
        let sheet = read_sheet(&path, "Translations").unwrap();

        assert_eq!(sheet.name, "Translations");
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[0].get(2).as_text(), "path");
        assert_eq!(sheet.rows[1].number, 2);
        assert_eq!(sheet.rows[1].get(0), &CellValue::Number(3.0));
        assert_eq!(sheet.rows[1].get(1).as_text(), "「はい」 & <タグ>\n二行目");
        assert_eq!(sheet.rows[2].get(0).as_text(), "3-C1");
        assert_eq!(sheet.rows[2].get(1), &CellValue::Empty);
    }

    fn zip_parts(path: &Path, parts: &[(&str, &str)]) {
        let mut zout = ZipWriter::new(File::create(path).unwrap());
        for (name, content) in parts {
            zout.start_file(*name, SimpleFileOptions::default()).unwrap();
            zout.write_all(content.as_bytes()).unwrap();
        }
        zout.finish().unwrap();
    }

    #[test]
    fn test_reads_shared_strings_from_office_workbook() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("saved_by_excel.xlsx");
        zip_parts(
            &path,
            &[
                (
                    "xl/workbook.xml",
                    r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:rel="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Notes" sheetId="1" rel:id="rId7"/><sheet name="QC" sheetId="2" rel:id="rId8"/></sheets></workbook>"#,
                ),
                (
                    "xl/_rels/workbook.xml.rels",
                    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId7" Target="worksheets/notes.xml"/><Relationship Id="rId8" Target="/xl/worksheets/qc.xml"/></Relationships>"#,
                ),
                (
                    "xl/sharedStrings.xml",
                    r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>QC</t></si><si><r><t xml:space="preserve">Good </t></r><r><t>morning</t></r><rPh sb="0" eb="1"><t>ヨミ</t></rPh></si><si/></sst>"#,
                ),
                (
                    "xl/worksheets/notes.xml",
                    r#"<worksheet><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>ignore me</t></is></c></row></sheetData></worksheet>"#,
                ),
                (
                    "xl/worksheets/qc.xml",
                    r#"<worksheet><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="C1" t="b"><v>1</v></c></row><row r="4"><c r="B4" t="s"><v>1</v></c><c r="D4"><v>42</v></c><c r="E4" t="str"><v>a&amp;b</v></c></row></sheetData></worksheet>"#,
                ),
            ],
        );

        let sheet = read_sheet(&path, "QC").unwrap();
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].get(0).as_text(), "QC");
        assert_eq!(sheet.rows[0].get(1), &CellValue::Empty);
        assert_eq!(sheet.rows[0].get(2), &CellValue::Bool(true));
        assert_eq!(sheet.rows[1].number, 4);
        assert_eq!(sheet.rows[1].get(1).as_text(), "Good morning");
        assert_eq!(sheet.rows[1].get(3), &CellValue::Number(42.0));
        assert_eq!(sheet.rows[1].get(4).as_text(), "a&b");

        let fallback = read_sheet(&path, "Missing").unwrap();
        assert_eq!(fallback.name, "Notes");
        assert_eq!(fallback.rows[0].get(0).as_text(), "ignore me");
    }

    #[test]
    fn test_not_a_zip_is_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fake.xlsx");
        fs::write(&path, "blockIdx,QC\n1,hi\n").unwrap();
        assert!(matches!(
            read_sheet(&path, "Translations"),
            Err(Error::SpreadsheetFormat(_))
        ));
    }
}
