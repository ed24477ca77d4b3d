//! # Font Metrics
//!
//! Width tables and word wrapping for the two base-14 fonts the engine
//! uses. Widths are the standard Adobe AFM values in 1/1000 em for the
//! printable ASCII range (0x20..=0x7E); anything outside that range is
//! measured at 600/1000 em, wide enough that wrapping errs toward
//! breaking early rather than overflowing a column.

use crate::writer::Font;

/// Helvetica glyph widths for 0x20..=0x7E, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold glyph widths for 0x20..=0x7E, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width of an out-of-table glyph, in 1/1000 em.
const FALLBACK_WIDTH: u16 = 600;

/// Width of one character at 1/1000 em scale.
fn glyph_width(c: char, font: Font) -> u16 {
    let table = match font {
        Font::Helvetica => &HELVETICA,
        Font::HelveticaBold => &HELVETICA_BOLD,
    };
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Measured width of `text` in points at the given font size.
pub fn text_width(text: &str, font: Font, size: f64) -> f64 {
    let units: u64 = text.chars().map(|c| glyph_width(c, font) as u64).sum();
    units as f64 * size / 1000.0
}

/// Word-wraps `text` so every returned line measures at most `max_width`
/// points at the given font size.
///
/// Words are kept whole when possible; a single word wider than the
/// column is hard-broken by characters so long names degrade to extra
/// lines instead of overflowing. Always returns at least one line.
pub fn wrap_text(text: &str, font: Font, size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(&candidate, font, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        // The word alone fits on a fresh line, or must be hard-broken.
        if text_width(word, font, size) <= max_width {
            current = word.to_string();
        } else {
            let mut piece = String::new();
            for c in word.chars() {
                piece.push(c);
                if text_width(&piece, font, size) > max_width && piece.chars().count() > 1 {
                    piece.pop();
                    lines.push(piece.clone());
                    piece.clear();
                    piece.push(c);
                }
            }
            current = piece;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        // "HI" in Helvetica 10pt: (722 + 278) / 1000 * 10 = 10.0
        let w = text_width("HI", Font::Helvetica, 10.0);
        assert!((w - 10.0).abs() < 1e-9);

        // Bold is wider than regular for the same text.
        let regular = text_width("Invoice", Font::Helvetica, 10.0);
        let bold = text_width("Invoice", Font::HelveticaBold, 10.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_non_ascii_uses_fallback() {
        let w = text_width("é", Font::Helvetica, 10.0);
        assert!((w - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_short_text_single_line() {
        let lines = wrap_text("Milk", Font::Helvetica, 10.0, 200.0);
        assert_eq!(lines, vec!["Milk"]);
    }

    #[test]
    fn test_wrap_empty_text_yields_one_line() {
        let lines = wrap_text("", Font::Helvetica, 10.0, 200.0);
        assert_eq!(lines, vec![""]);
    }

    #[test]
    fn test_wrap_breaks_at_words() {
        let lines = wrap_text(
            "Fresh buffalo paneer hand pressed daily",
            Font::Helvetica,
            10.0,
            80.0,
        );
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, Font::Helvetica, 10.0) <= 80.0);
        }
        // No words lost or reordered.
        assert_eq!(
            lines.join(" "),
            "Fresh buffalo paneer hand pressed daily"
        );
    }

    #[test]
    fn test_oversized_word_hard_broken() {
        let word = "X".repeat(100);
        let lines = wrap_text(&word, Font::Helvetica, 10.0, 50.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, Font::Helvetica, 10.0) <= 50.0);
        }
        assert_eq!(lines.concat(), word);
    }
}
