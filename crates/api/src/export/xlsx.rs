//! XLSX renderer.
//!
//! Writes a minimal SpreadsheetML package: one worksheet per section with
//! inline strings and numeric cells. No shared strings, no styles.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{Cell, ExportDocument, ExportError, ReportRenderer, Section};

/// Excel's sheet name limit.
const MAX_SHEET_NAME_CHARS: usize = 31;

pub struct XlsxRenderer;

impl ReportRenderer for XlsxRenderer {
    fn content_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn render(&self, document: &ExportDocument) -> Result<Vec<u8>, ExportError> {
        let sheets: Vec<(String, String)> = sheet_names(document)
            .into_iter()
            .zip(sheet_contents(document))
            .collect();

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(content_types(sheets.len()).as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(ROOT_RELS.as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(workbook(&sheets).as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(workbook_rels(sheets.len()).as_bytes())?;

        for (i, (_, xml)) in sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)?;
            zip.write_all(xml.as_bytes())?;
        }

        Ok(zip.finish()?.into_inner())
    }
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

fn content_types(sheet_count: usize) -> String {
    let overrides: String = (1..=sheet_count)
        .map(|i| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{overrides}</Types>"#
    )
}

fn workbook(sheets: &[(String, String)]) -> String {
    let entries: String = sheets
        .iter()
        .enumerate()
        .map(|(i, (name, _))| {
            format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(name),
                i + 1,
                i + 1
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{entries}</sheets></workbook>"#
    )
}

fn workbook_rels(sheet_count: usize) -> String {
    let rels: String = (1..=sheet_count)
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
    )
}

/// One sheet per section; a document without sections still gets one
/// sheet holding the title.
fn sheet_contents(document: &ExportDocument) -> Vec<String> {
    if document.sections.is_empty() {
        let mut rows = vec![vec![Cell::Text(document.title.clone())]];
        rows.extend(document.preamble.iter().map(|l| vec![Cell::Text(l.clone())]));
        return vec![worksheet(&rows)];
    }

    document
        .sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let mut rows = Vec::new();
            if i == 0 {
                rows.push(vec![Cell::Text(document.title.clone())]);
                rows.extend(document.preamble.iter().map(|l| vec![Cell::Text(l.clone())]));
                rows.push(Vec::new());
            }
            rows.extend(section_rows(section));
            worksheet(&rows)
        })
        .collect()
}

fn section_rows(section: &Section) -> Vec<Vec<Cell>> {
    let mut rows = vec![vec![Cell::Text(section.title.clone())]];
    rows.push(section.headers.iter().cloned().map(Cell::Text).collect());
    rows.extend(section.rows.iter().cloned());
    rows
}

fn worksheet(rows: &[Vec<Cell>]) -> String {
    let mut data = String::new();
    for (r, row) in rows.iter().enumerate() {
        let row_number = r + 1;
        data.push_str(&format!(r#"<row r="{row_number}">"#));
        for (c, cell) in row.iter().enumerate() {
            let reference = format!("{}{row_number}", column_letters(c));
            match cell {
                Cell::Number(n) if n.is_finite() => {
                    data.push_str(&format!(r#"<c r="{reference}"><v>{n}</v></c>"#));
                }
                other => {
                    data.push_str(&format!(
                        r#"<c r="{reference}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                        escape_xml(&other.display())
                    ));
                }
            }
        }
        data.push_str("</row>");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{data}</sheetData></worksheet>"#
    )
}

/// Zero-based column index to `A`, `B`, ..., `Z`, `AA`, ...
fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Unique sheet names derived from section titles.
fn sheet_names(document: &ExportDocument) -> Vec<String> {
    if document.sections.is_empty() {
        return vec!["Relatório".to_string()];
    }

    let mut used = HashSet::new();
    document
        .sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let base: String = section
                .title
                .chars()
                .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
                .take(MAX_SHEET_NAME_CHARS)
                .collect();
            let base = if base.trim().is_empty() {
                format!("Planilha {}", i + 1)
            } else {
                base
            };

            let mut name = base.clone();
            let mut n = 2;
            while !used.insert(name.to_lowercase()) {
                let suffix = format!(" ({n})");
                let keep = MAX_SHEET_NAME_CHARS.saturating_sub(suffix.chars().count());
                name = format!("{}{suffix}", base.chars().take(keep).collect::<String>());
                n += 1;
            }
            name
        })
        .collect()
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}
