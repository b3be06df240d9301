//! Minimal PDF writer for the report.
//!
//! Emits an uncompressed PDF 1.4 document: one catalog, one page tree, two
//! standard Helvetica fonts, and a page plus content stream per laid-out
//! page. Only the small subset of the format the report needs.

use crate::report::layout::{Page, TextStyle};

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

fn font_for(style: TextStyle) -> (&'static str, u32) {
    match style {
        TextStyle::Title => (FONT_BOLD, 16),
        TextStyle::Header => (FONT_BOLD, 12),
        TextStyle::Body => (FONT_REGULAR, 10),
    }
}

/// Escapes text for a PDF literal string. Non-ASCII is outside the standard
/// font encoding we use, so it is replaced rather than mis-rendered.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            c if c.is_ascii_graphic() || c == ' ' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn content_stream(page: &Page) -> String {
    let mut ops = String::new();
    for line in &page.lines {
        let (font, size) = font_for(line.style);
        ops.push_str(&format!(
            "BT /{font} {size} Tf {x:.2} {y:.2} Td ({text}) Tj ET\n",
            x = line.x,
            y = line.y,
            text = escape_text(&line.text),
        ));
    }
    ops
}

/// Serializes laid-out pages into PDF bytes.
pub fn render_pdf(pages: &[Page], page_width: f64, page_height: f64) -> Vec<u8> {
    // Object numbering: 1 catalog, 2 pages tree, 3 regular font, 4 bold
    // font, then (page, content) pairs.
    let first_page_obj = 5u32;
    let page_count = pages.len();
    let total_objects = 4 + 2 * page_count;

    let page_ids: Vec<u32> = (0..page_count)
        .map(|i| first_page_obj + 2 * i as u32)
        .collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects: Vec<(u32, String)> = Vec::with_capacity(total_objects);
    objects.push((1, "<< /Type /Catalog /Pages 2 0 R >>".to_string()));
    objects.push((
        2,
        format!("<< /Type /Pages /Kids [{kids}] /Count {page_count} >>"),
    ));
    objects.push((
        3,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ));
    objects.push((
        4,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>".to_string(),
    ));

    for (i, page) in pages.iter().enumerate() {
        let page_id = page_ids[i];
        let content_id = page_id + 1;
        objects.push((
            page_id,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {page_width:.2} {page_height:.2}] \
                 /Resources << /Font << /{FONT_REGULAR} 3 0 R /{FONT_BOLD} 4 0 R >> >> \
                 /Contents {content_id} 0 R >>"
            ),
        ));
        let stream = content_stream(page);
        objects.push((
            content_id,
            format!(
                "<< /Length {} >>\nstream\n{stream}endstream",
                stream.len()
            ),
        ));
    }

    let mut buf: Vec<u8> = Vec::new();
    buf.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets: Vec<usize> = Vec::with_capacity(objects.len());
    for (id, body) in &objects {
        offsets.push(buf.len());
        buf.extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    let xref_offset = buf.len();
    buf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    // Each xref entry is exactly 20 bytes.
    buf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        buf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    buf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::layout::DocLine;

    fn page_with(text: &str, style: TextStyle) -> Page {
        Page {
            lines: vec![DocLine {
                x: 50.0,
                y: 752.0,
                text: text.to_string(),
                style,
            }],
        }
    }

    #[test]
    fn test_pdf_header_and_trailer() {
        let bytes = render_pdf(&[Page::default()], 612.0, 792.0);
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn test_title_rendered_in_bold_sixteen() {
        let bytes = render_pdf(
            &[page_with("InsightPulse Report", TextStyle::Title)],
            612.0,
            792.0,
        );
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/F2 16 Tf"));
        assert!(text.contains("(InsightPulse Report) Tj"));
    }

    #[test]
    fn test_page_count_matches() {
        let pages = vec![
            page_with("one", TextStyle::Body),
            page_with("two", TextStyle::Body),
            page_with("three", TextStyle::Body),
        ];
        let bytes = render_pdf(&pages, 612.0, 792.0);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 3"));
        assert_eq!(text.matches("/Type /Page ").count(), 3);
    }

    #[test]
    fn test_escapes_parens_and_backslash() {
        assert_eq!(escape_text(r"a(b)c\d"), r"a\(b\)c\\d");
        assert_eq!(escape_text("café"), "caf?");
    }
}
