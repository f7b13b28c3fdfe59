//! PDF renderer.
//!
//! Emits a PDF 1.4 file by hand using the two standard Helvetica faces with
//! `WinAnsiEncoding`, so no font embedding is needed. Sections are laid out
//! as fixed-width tables on A4 pages; cell text that does not fit is
//! truncated. Every page carries a "Página n de m" footer.

use std::fmt::Write as _;

use super::{Cell, ExportDocument, ExportError, ReportRenderer, Section};

// ---------------------------------------------------------------------------
// Page geometry
// ---------------------------------------------------------------------------

const PAGE_WIDTH: f64 = 595.0;
const PAGE_HEIGHT: f64 = 842.0;
const MARGIN: f64 = 50.0;
const FOOTER_Y: f64 = 30.0;

const TITLE_SIZE: f64 = 16.0;
const HEADING_SIZE: f64 = 12.0;
const BODY_SIZE: f64 = 9.0;
const LINE_FACTOR: f64 = 1.4;

/// Average Helvetica glyph width relative to the font size.
const AVG_GLYPH_WIDTH: f64 = 0.5;
const CELL_PADDING: f64 = 4.0;

/// Object numbers fixed ahead of the page objects.
const CATALOG_OBJ: usize = 1;
const PAGES_OBJ: usize = 2;
const REGULAR_FONT_OBJ: usize = 3;
const BOLD_FONT_OBJ: usize = 4;
const FIRST_PAGE_OBJ: usize = 5;

pub struct PdfRenderer;

impl ReportRenderer for PdfRenderer {
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, document: &ExportDocument) -> Result<Vec<u8>, ExportError> {
        let mut layout = Layout::new();

        layout.text_line(Face::Bold, TITLE_SIZE, &document.title);
        for line in &document.preamble {
            layout.text_line(Face::Regular, BODY_SIZE, line);
        }
        for section in &document.sections {
            layout.gap(HEADING_SIZE);
            layout.table(section);
        }

        Ok(serialize(&layout.finish()))
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
}

impl Face {
    fn resource(&self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Text {
        face: Face,
        size: f64,
        x: f64,
        y: f64,
        bytes: Vec<u8>,
    },
    Rule {
        y: f64,
    },
}

struct Layout {
    pages: Vec<Vec<Op>>,
    y: f64,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn current(&mut self) -> &mut Vec<Op> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Start a new page when `height` more points would run into the footer.
    /// Returns whether a break happened.
    fn ensure_space(&mut self, height: f64) -> bool {
        if self.y - height < MARGIN {
            self.pages.push(Vec::new());
            self.y = PAGE_HEIGHT - MARGIN;
            return true;
        }
        false
    }

    fn gap(&mut self, size: f64) {
        self.y -= size * 0.5;
    }

    fn text_line(&mut self, face: Face, size: f64, text: &str) {
        let height = size * LINE_FACTOR;
        self.ensure_space(height);
        self.y -= height;
        let bytes = fit(text, size, PAGE_WIDTH - 2.0 * MARGIN);
        let y = self.y;
        self.current().push(Op::Text {
            face,
            size,
            x: MARGIN,
            y,
            bytes,
        });
    }

    fn row(&mut self, face: Face, cells: &[String], column_width: f64) {
        let height = BODY_SIZE * LINE_FACTOR;
        self.y -= height;
        let y = self.y;
        let ops: Vec<Op> = cells
            .iter()
            .enumerate()
            .map(|(i, text)| Op::Text {
                face,
                size: BODY_SIZE,
                x: MARGIN + i as f64 * column_width,
                y,
                bytes: fit(text, BODY_SIZE, column_width - CELL_PADDING),
            })
            .collect();
        self.current().extend(ops);
    }

    fn header_row(&mut self, headers: &[String], column_width: f64) {
        self.row(Face::Bold, headers, column_width);
        let y = self.y - 3.0;
        self.current().push(Op::Rule { y });
        self.y -= 3.0;
    }

    /// Section title, header row, then data rows. Headers repeat after a
    /// page break.
    fn table(&mut self, section: &Section) {
        let row_height = BODY_SIZE * LINE_FACTOR;
        self.ensure_space(HEADING_SIZE * LINE_FACTOR + 2.0 * row_height + 3.0);
        self.text_line(Face::Bold, HEADING_SIZE, &section.title);

        let columns = section
            .headers
            .len()
            .max(section.rows.iter().map(Vec::len).max().unwrap_or(0))
            .max(1);
        let column_width = (PAGE_WIDTH - 2.0 * MARGIN) / columns as f64;

        if !section.headers.is_empty() {
            self.header_row(&section.headers, column_width);
        }

        if section.rows.is_empty() {
            self.text_line(Face::Regular, BODY_SIZE, "Nenhum registro.");
            return;
        }

        for row in &section.rows {
            if self.ensure_space(row_height) && !section.headers.is_empty() {
                self.header_row(&section.headers, column_width);
            }
            let cells: Vec<String> = row.iter().map(Cell::display).collect();
            self.row(Face::Regular, &cells, column_width);
        }
    }

    fn finish(self) -> Vec<Vec<Op>> {
        self.pages
    }
}

/// Encode and truncate `text` so it fits in `width` points at `size`.
fn fit(text: &str, size: f64, width: f64) -> Vec<u8> {
    let max_chars = (width / (size * AVG_GLYPH_WIDTH)).floor().max(1.0) as usize;
    let encoded = encode_win_ansi(text);
    if encoded.len() <= max_chars {
        return encoded;
    }
    let keep = max_chars.saturating_sub(3);
    let mut truncated = encoded[..keep].to_vec();
    truncated.extend_from_slice(b"...");
    truncated.truncate(max_chars);
    truncated
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Map text to WinAnsi (cp1252) bytes. Unrepresentable characters become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\t' => b' ',
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8a,
            '‹' => 0x8b,
            'Œ' => 0x8c,
            'Ž' => 0x8e,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '•' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9a,
            '›' => 0x9b,
            'œ' => 0x9c,
            'ž' => 0x9e,
            'Ÿ' => 0x9f,
            _ => b'?',
        })
        .collect()
}

/// Escape a WinAnsi byte string for a PDF literal string.
fn escape_literal(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    for &b in bytes {
        if matches!(b, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(b);
    }
    out
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

fn content_stream(ops: &[Op], page_number: usize, page_count: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for op in ops {
        match op {
            Op::Text {
                face,
                size,
                x,
                y,
                bytes,
            } => {
                out.extend_from_slice(
                    format!("BT /{} {size:.1} Tf {x:.2} {y:.2} Td (", face.resource()).as_bytes(),
                );
                out.extend_from_slice(&escape_literal(bytes));
                out.extend_from_slice(b") Tj ET\n");
            }
            Op::Rule { y } => {
                out.extend_from_slice(
                    format!(
                        "0.5 w {MARGIN:.2} {y:.2} m {:.2} {y:.2} l S\n",
                        PAGE_WIDTH - MARGIN
                    )
                    .as_bytes(),
                );
            }
        }
    }

    let footer = encode_win_ansi(&format!("Página {page_number} de {page_count}"));
    out.extend_from_slice(
        format!(
            "BT /F1 8.0 Tf {:.2} {FOOTER_Y:.2} Td (",
            PAGE_WIDTH / 2.0 - 30.0
        )
        .as_bytes(),
    );
    out.extend_from_slice(&escape_literal(&footer));
    out.extend_from_slice(b") Tj ET\n");
    out
}

fn serialize(pages: &[Vec<Op>]) -> Vec<u8> {
    let page_count = pages.len();
    let object_count = FIRST_PAGE_OBJ - 1 + 2 * page_count;

    let mut out: Vec<u8> = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n".to_vec();
    let mut offsets = vec![0usize; object_count + 1];

    let mut write_object = |out: &mut Vec<u8>, number: usize, body: &[u8]| {
        offsets[number] = out.len();
        out.extend_from_slice(format!("{number} 0 obj\n").as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    };

    write_object(
        &mut out,
        CATALOG_OBJ,
        format!("<< /Type /Catalog /Pages {PAGES_OBJ} 0 R >>").as_bytes(),
    );

    let kids = (0..page_count).fold(String::new(), |mut acc, i| {
        let _ = write!(acc, "{} 0 R ", FIRST_PAGE_OBJ + 2 * i);
        acc
    });
    write_object(
        &mut out,
        PAGES_OBJ,
        format!("<< /Type /Pages /Kids [{}] /Count {page_count} >>", kids.trim_end()).as_bytes(),
    );

    write_object(
        &mut out,
        REGULAR_FONT_OBJ,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    write_object(
        &mut out,
        BOLD_FONT_OBJ,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    );

    for (i, ops) in pages.iter().enumerate() {
        let page_obj = FIRST_PAGE_OBJ + 2 * i;
        let content_obj = page_obj + 1;

        write_object(
            &mut out,
            page_obj,
            format!(
                "<< /Type /Page /Parent {PAGES_OBJ} 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 {REGULAR_FONT_OBJ} 0 R /F2 {BOLD_FONT_OBJ} 0 R >> >> \
                 /Contents {content_obj} 0 R >>"
            )
            .as_bytes(),
        );

        let stream = content_stream(ops, i + 1, page_count);
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend_from_slice(&stream);
        body.extend_from_slice(b"\nendstream");
        write_object(&mut out, content_obj, &body);
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", object_count + 1);
    for offset in &offsets[1..] {
        let _ = writeln!(xref, "{offset:010} 00000 n ");
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root {CATALOG_OBJ} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        object_count + 1
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn document(rows: usize) -> ExportDocument {
        let mut section = Section::new("Ranking de Maturidade", &["Órgão", "Nível"]);
        for i in 0..rows {
            section.row(vec![Cell::from(format!("Órgão {i}")), Cell::from(2u8)]);
        }
        ExportDocument {
            title: "Relatório (teste)".into(),
            preamble: vec!["Gerado em: hoje".into()],
            sections: vec![section],
        }
    }

    #[test]
    fn produces_a_well_formed_file() {
        let bytes = PdfRenderer.render(&document(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(contains(&bytes, b"/Count 1"));
        assert!(contains(&bytes, b"Relat\xf3rio \\(teste\\)"));
        assert!(contains(&bytes, b"P\xe1gina 1 de 1"));
    }

    #[test]
    fn long_tables_span_pages() {
        let bytes = PdfRenderer.render(&document(200)).unwrap();
        assert!(!contains(&bytes, b"/Count 1 "));
        assert!(contains(&bytes, b"P\xe1gina 2 de"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = PdfRenderer.render(&document(1)).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        let xref_start = text.find("xref\n").unwrap();
        let first_entry = text[xref_start..].lines().nth(3).unwrap();
        let offset: usize = first_entry[..10].parse().unwrap();
        assert!(bytes[offset..].starts_with(b"1 0 obj"));
    }

    #[test]
    fn win_ansi_mapping() {
        assert_eq!(encode_win_ansi("ção"), vec![0xe7, 0xe3, b'o']);
        assert_eq!(encode_win_ansi("€–"), vec![0x80, 0x96]);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
    }

    #[test]
    fn long_cells_are_truncated() {
        let text = "x".repeat(500);
        let fitted = fit(&text, BODY_SIZE, 100.0);
        assert_eq!(fitted.len(), 22);
        assert!(fitted.ends_with(b"..."));
    }
}
