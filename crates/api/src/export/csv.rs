//! CSV renderer: UTF-8 with BOM, RFC 4180 quoting, CRLF line endings.
//!
//! Sections are written one after another, each preceded by its title and
//! separated by a blank line.

use super::{ExportDocument, ExportError, ReportRenderer};

const BOM: &str = "\u{feff}";
const LINE_END: &str = "\r\n";

pub struct CsvRenderer;

impl ReportRenderer for CsvRenderer {
    fn content_type(&self) -> &'static str {
        "text/csv; charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, document: &ExportDocument) -> Result<Vec<u8>, ExportError> {
        let mut out = String::from(BOM);

        write_record(&mut out, [document.title.as_str()]);
        for line in &document.preamble {
            write_record(&mut out, [line.as_str()]);
        }

        for section in &document.sections {
            out.push_str(LINE_END);
            write_record(&mut out, [section.title.as_str()]);
            write_record(&mut out, section.headers.iter().map(String::as_str));
            for row in &section.rows {
                let cells: Vec<String> = row.iter().map(|c| c.display()).collect();
                write_record(&mut out, cells.iter().map(String::as_str));
            }
        }

        Ok(out.into_bytes())
    }
}

fn write_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&quote(field));
    }
    out.push_str(LINE_END);
}

/// Quote a field when it contains a separator, quote or line break.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
