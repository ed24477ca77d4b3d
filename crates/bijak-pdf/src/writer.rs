//! # PDF Object Writer
//!
//! Low-level assembly of a PDF 1.4 file: page tree, content streams,
//! font resources and the cross-reference table. The layout module draws
//! through this API in top-left page coordinates (y grows downward, like
//! every layout algorithm); the writer flips into PDF's bottom-left
//! coordinate space when emitting operators.
//!
//! ## Object numbering
//! ```text
//! 1  Catalog        /Root
//! 2  Pages          /Kids [...]
//! 3  Font F1        Helvetica
//! 4  Font F2        Helvetica-Bold
//! 5,7,9,...  Page objects
//! 6,8,10,... Content streams (one per page)
//! ```

use std::fmt::Write as _;

/// The two fonts the engine draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// Resource name inside the page's font dictionary.
    fn resource(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    /// PostScript base font name.
    fn base_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }
}

/// A PDF document under construction: fixed page size, one content
/// stream per page, always at least one page.
#[derive(Debug)]
pub struct Document {
    width: f64,
    height: f64,
    pages: Vec<String>,
}

impl Document {
    /// Starts a document with one empty page of the given size (points).
    pub fn new(width: f64, height: f64) -> Self {
        Document {
            width,
            height,
            pages: vec![String::new()],
        }
    }

    /// Starts a fresh page; subsequent drawing lands on it.
    pub fn add_page(&mut self) {
        self.pages.push(String::new());
    }

    /// Number of pages so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn content(&mut self) -> &mut String {
        self.pages.last_mut().expect("document always has a page")
    }

    /// Draws `text` with its baseline `y_top` points from the top edge.
    pub fn text(&mut self, x: f64, y_top: f64, font: Font, size: f64, text: &str) {
        let y = self.height - y_top;
        let escaped = escape_string(text);
        let content = self.content();
        let _ = writeln!(
            content,
            "BT /{} {:.2} Tf {:.2} {:.2} Td ({}) Tj ET",
            font.resource(),
            size,
            x,
            y,
            escaped
        );
    }

    /// Draws a horizontal or arbitrary line in the given gray level
    /// (0 = black, 1 = white).
    pub fn line(&mut self, x1: f64, y1_top: f64, x2: f64, y2_top: f64, width: f64, gray: f64) {
        let (ya, yb) = (self.height - y1_top, self.height - y2_top);
        let content = self.content();
        let _ = writeln!(
            content,
            "{gray:.2} G {width:.2} w {x1:.2} {ya:.2} m {x2:.2} {yb:.2} l S 0 G"
        );
    }

    /// Fills a rectangle whose TOP edge is `y_top` points from the top.
    pub fn fill_rect(&mut self, x: f64, y_top: f64, w: f64, h: f64, gray: f64) {
        let y = self.height - y_top - h;
        let content = self.content();
        let _ = writeln!(content, "{gray:.2} g {x:.2} {y:.2} {w:.2} {h:.2} re f 0 g");
    }

    /// Assembles the final PDF bytes: objects, xref table, trailer.
    pub fn finish(self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();

        out.extend_from_slice(b"%PDF-1.4\n");

        let page_count = self.pages.len();
        let page_obj_id = |i: usize| 5 + 2 * i;
        let content_obj_id = |i: usize| 6 + 2 * i;

        let mut push_obj = |out: &mut Vec<u8>, offsets: &mut Vec<usize>, body: String| {
            offsets.push(out.len());
            out.extend_from_slice(body.as_bytes());
        };

        // 1: catalog
        push_obj(
            &mut out,
            &mut offsets,
            "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n".to_string(),
        );

        // 2: page tree
        let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", page_obj_id(i))).collect();
        push_obj(
            &mut out,
            &mut offsets,
            format!(
                "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
                kids.join(" "),
                page_count
            ),
        );

        // 3, 4: fonts
        for (id, font) in [(3, Font::Helvetica), (4, Font::HelveticaBold)] {
            push_obj(
                &mut out,
                &mut offsets,
                format!(
                    "{id} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>\nendobj\n",
                    font.base_name()
                ),
            );
        }

        // page + content pairs
        for (i, content) in self.pages.iter().enumerate() {
            push_obj(
                &mut out,
                &mut offsets,
                format!(
                    "{} 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>\nendobj\n",
                    page_obj_id(i),
                    self.width,
                    self.height,
                    content_obj_id(i)
                ),
            );
            push_obj(
                &mut out,
                &mut offsets,
                format!(
                    "{} 0 obj\n<< /Length {} >>\nstream\n{}endstream\nendobj\n",
                    content_obj_id(i),
                    content.len(),
                    content
                ),
            );
        }

        // xref
        let xref_offset = out.len();
        let total = offsets.len() + 1; // + the free object 0
        let mut xref = format!("xref\n0 {total}\n0000000000 65535 f \n");
        for offset in &offsets {
            let _ = writeln!(xref, "{offset:010} 00000 n ");
        }
        out.extend_from_slice(xref.as_bytes());

        let _ = write!(
            out_string(&mut out),
            "trailer\n<< /Size {total} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        );

        out
    }
}

/// Escapes a string for a PDF literal: backslash, parens, and everything
/// outside printable ASCII (base-14 fonts carry no glyphs for it anyway).
fn escape_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            ' '..='~' => escaped.push(c),
            _ => escaped.push('?'),
        }
    }
    escaped
}

/// Adapter so `write!` can append UTF-8 straight into the byte buffer.
fn out_string(out: &mut Vec<u8>) -> impl std::fmt::Write + '_ {
    struct W<'a>(&'a mut Vec<u8>);
    impl std::fmt::Write for W<'_> {
        fn write_str(&mut self, s: &str) -> std::fmt::Result {
            self.0.extend_from_slice(s.as_bytes());
            Ok(())
        }
    }
    W(out)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_document_structure() {
        let mut doc = Document::new(595.28, 841.89);
        doc.text(40.0, 50.0, Font::Helvetica, 12.0, "Hello");
        let bytes = doc.finish();
        let pdf = String::from_utf8(bytes).unwrap();

        assert!(pdf.starts_with("%PDF-1.4"));
        assert!(pdf.trim_end().ends_with("%%EOF"));
        assert!(pdf.contains("/Type /Catalog"));
        assert!(pdf.contains("/Count 1"));
        assert!(pdf.contains("/BaseFont /Helvetica"));
        assert!(pdf.contains("(Hello) Tj"));
    }

    #[test]
    fn test_page_count_matches_kids() {
        let mut doc = Document::new(595.28, 841.89);
        doc.add_page();
        doc.add_page();
        assert_eq!(doc.page_count(), 3);

        let pdf = String::from_utf8(doc.finish()).unwrap();
        assert!(pdf.contains("/Count 3"));
        assert_eq!(pdf.matches("/Type /Page ").count(), 3);
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut doc = Document::new(595.28, 841.89);
        doc.text(40.0, 50.0, Font::HelveticaBold, 12.0, "x");
        let bytes = doc.finish();
        let pdf = std::str::from_utf8(&bytes).unwrap();

        // Every xref entry must point at an "N 0 obj" header.
        let xref_start = pdf.rfind("xref\n").unwrap();
        for (i, line) in pdf[xref_start..].lines().skip(3).enumerate() {
            if !line.ends_with(" n ") && !line.ends_with(" n") {
                break;
            }
            let offset: usize = line[..10].parse().unwrap();
            let header = format!("{} 0 obj", i + 1);
            assert!(
                pdf[offset..].starts_with(&header),
                "xref entry {i} does not point at {header}"
            );
        }
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(escape_string("a(b)c"), "a\\(b\\)c");
        assert_eq!(escape_string("back\\slash"), "back\\\\slash");
        assert_eq!(escape_string("café"), "caf?");
    }

    #[test]
    fn test_text_y_flips_to_pdf_space() {
        let mut doc = Document::new(600.0, 800.0);
        doc.text(10.0, 100.0, Font::Helvetica, 10.0, "x");
        let pdf = String::from_utf8(doc.finish()).unwrap();
        // 100 from the top of an 800pt page = baseline at 700 in PDF space.
        assert!(pdf.contains("10.00 700.00 Td"));
    }
}
