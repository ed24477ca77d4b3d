//! # Invoice Layout
//!
//! Renders a finalizable invoice to PDF bytes: A4 portrait, 40pt margins,
//! and a vertical cursor that paginates whenever a block will not fit in
//! the space left on the current page.
//!
//! Block order: title, right-aligned merchant identity, invoice id + date,
//! customer block, item table (45/15/20/20 columns), subtotal, emphasized
//! total, footer.

use bijak_core::{Invoice, MerchantConfig};

use crate::error::RenderError;
use crate::metrics::{text_width, wrap_text};
use crate::writer::{Document, Font};

// A4 portrait, in points.
const PAGE_WIDTH: f64 = 595.28;
const PAGE_HEIGHT: f64 = 841.89;
const MARGIN: f64 = 40.0;
const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f64 = 22.0;
const BODY_SIZE: f64 = 10.0;
const HEADER_SIZE: f64 = 10.0;
const TOTAL_SIZE: f64 = 13.0;
const LINE_HEIGHT: f64 = 14.0;
// Vertical gap kept free above the footer baseline.
const FOOTER_CLEARANCE: f64 = LINE_HEIGHT * 1.5;

// Column widths as a share of the content width: item / qty / price / amount.
const COL_ITEM: f64 = 0.45;
const COL_QTY: f64 = 0.15;
const COL_PRICE: f64 = 0.20;
const COL_AMOUNT: f64 = 0.20;

/// Tracks the vertical write position and breaks pages when a block of
/// known height will not fit above the bottom margin.
struct Cursor {
    y: f64,
}

impl Cursor {
    fn new() -> Self {
        Cursor { y: MARGIN }
    }

    /// Starts a new page if `height` points will not fit; returns an error
    /// only when the block could never fit on an empty page.
    fn ensure_space(&mut self, doc: &mut Document, height: f64) -> Result<(), RenderError> {
        if height > PAGE_HEIGHT - 2.0 * MARGIN {
            return Err(RenderError::BlockTooTall { height });
        }
        if self.y + height > PAGE_HEIGHT - MARGIN {
            doc.add_page();
            self.y = MARGIN;
        }
        Ok(())
    }

    fn advance(&mut self, by: f64) {
        self.y += by;
    }
}

/// Renders `invoice` as a complete PDF document. Pure and deterministic:
/// the same invoice and merchant always produce the same bytes.
pub fn render(invoice: &Invoice, merchant: &MerchantConfig) -> Result<Vec<u8>, RenderError> {
    if invoice.items.is_empty() {
        return Err(RenderError::EmptyInvoice);
    }

    let mut doc = Document::new(PAGE_WIDTH, PAGE_HEIGHT);
    let mut cursor = Cursor::new();

    draw_header(&mut doc, &mut cursor, invoice, merchant);
    draw_customer_block(&mut doc, &mut cursor, invoice);
    draw_item_table(&mut doc, &mut cursor, invoice)?;
    draw_totals(&mut doc, &mut cursor, invoice)?;
    draw_footer(&mut doc);

    Ok(doc.finish())
}

fn draw_header(doc: &mut Document, cursor: &mut Cursor, invoice: &Invoice, merchant: &MerchantConfig) {
    cursor.advance(TITLE_SIZE);
    doc.text(MARGIN, cursor.y, Font::HelveticaBold, TITLE_SIZE, "INVOICE");

    // Merchant identity, right-aligned, empty optionals skipped.
    let mut identity: Vec<&str> = vec![merchant.business_name.as_str()];
    for field in [
        Some(merchant.address_line1.as_str()),
        Some(merchant.address_line2.as_str()),
        Some(merchant.phone.as_str()),
        merchant.email.as_deref(),
        merchant.tax_id.as_deref(),
    ] {
        if let Some(value) = field {
            if !value.trim().is_empty() {
                identity.push(value);
            }
        }
    }
    let mut identity_y = MARGIN + BODY_SIZE;
    for (i, line) in identity.iter().enumerate() {
        let font = if i == 0 { Font::HelveticaBold } else { Font::Helvetica };
        let width = text_width(line, font, BODY_SIZE);
        doc.text(PAGE_WIDTH - MARGIN - width, identity_y, font, BODY_SIZE, line);
        identity_y += LINE_HEIGHT;
    }
    if identity_y - LINE_HEIGHT > cursor.y {
        cursor.y = identity_y - LINE_HEIGHT;
    }

    cursor.advance(LINE_HEIGHT * 1.5);
    doc.text(
        MARGIN,
        cursor.y,
        Font::Helvetica,
        BODY_SIZE,
        &format!("Invoice #{}", invoice.short_id()),
    );
    cursor.advance(LINE_HEIGHT);
    doc.text(
        MARGIN,
        cursor.y,
        Font::Helvetica,
        BODY_SIZE,
        &invoice.created_at.format("%B %d, %Y").to_string(),
    );

    cursor.advance(LINE_HEIGHT * 0.75);
    doc.line(MARGIN, cursor.y, PAGE_WIDTH - MARGIN, cursor.y, 0.75, 0.6);
}

fn draw_customer_block(doc: &mut Document, cursor: &mut Cursor, invoice: &Invoice) {
    cursor.advance(LINE_HEIGHT * 1.25);
    doc.text(MARGIN, cursor.y, Font::Helvetica, BODY_SIZE, "Bill To");
    cursor.advance(LINE_HEIGHT);
    doc.text(MARGIN, cursor.y, Font::HelveticaBold, BODY_SIZE, &invoice.customer_name);
    for extra in [invoice.customer_phone.as_deref(), invoice.customer_address.as_deref()] {
        if let Some(value) = extra {
            if !value.trim().is_empty() {
                cursor.advance(LINE_HEIGHT);
                doc.text(MARGIN, cursor.y, Font::Helvetica, BODY_SIZE, value);
            }
        }
    }
    cursor.advance(LINE_HEIGHT * 0.75);
    doc.line(MARGIN, cursor.y, PAGE_WIDTH - MARGIN, cursor.y, 0.75, 0.6);
}

/// Left x position of each column, plus each column's width.
fn columns() -> [(f64, f64); 4] {
    let widths = [
        CONTENT_WIDTH * COL_ITEM,
        CONTENT_WIDTH * COL_QTY,
        CONTENT_WIDTH * COL_PRICE,
        CONTENT_WIDTH * COL_AMOUNT,
    ];
    let mut x = MARGIN;
    let mut out = [(0.0, 0.0); 4];
    for (slot, width) in out.iter_mut().zip(widths) {
        *slot = (x, width);
        x += width;
    }
    out
}

fn draw_column_headers(doc: &mut Document, cursor: &mut Cursor) {
    let cols = columns();
    cursor.advance(LINE_HEIGHT * 1.25);
    doc.text(cols[0].0, cursor.y, Font::HelveticaBold, HEADER_SIZE, "Item");
    doc.text(cols[1].0, cursor.y, Font::HelveticaBold, HEADER_SIZE, "Qty");
    text_right(doc, cols[2], cursor.y, Font::HelveticaBold, HEADER_SIZE, "Unit Price");
    text_right(doc, cols[3], cursor.y, Font::HelveticaBold, HEADER_SIZE, "Amount");
    cursor.advance(LINE_HEIGHT * 0.5);
    doc.line(MARGIN, cursor.y, PAGE_WIDTH - MARGIN, cursor.y, 0.5, 0.4);
}

fn draw_item_table(doc: &mut Document, cursor: &mut Cursor, invoice: &Invoice) -> Result<(), RenderError> {
    let cols = columns();
    draw_column_headers(doc, cursor);

    for item in &invoice.items {
        // Wrapped name height decides the row height; the row never splits
        // across a page boundary.
        let name_width = cols[0].1 - 6.0;
        let lines = wrap_text(&item.name, Font::Helvetica, BODY_SIZE, name_width);
        let row_height = LINE_HEIGHT * lines.len() as f64 + LINE_HEIGHT * 0.25;

        if cursor.y + row_height > PAGE_HEIGHT - MARGIN {
            cursor.ensure_space(doc, row_height + LINE_HEIGHT * 2.0)?;
            draw_column_headers(doc, cursor);
        }

        cursor.advance(LINE_HEIGHT);
        let first_line_y = cursor.y;
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                cursor.advance(LINE_HEIGHT);
            }
            doc.text(cols[0].0, cursor.y, Font::Helvetica, BODY_SIZE, line);
        }

        let qty = format!("{} {}", format_quantity(item.quantity), item.unit);
        doc.text(cols[1].0, first_line_y, Font::Helvetica, BODY_SIZE, qty.trim_end());
        text_right(
            doc,
            cols[2],
            first_line_y,
            Font::Helvetica,
            BODY_SIZE,
            &item.unit_price().format(),
        );
        text_right(
            doc,
            cols[3],
            first_line_y,
            Font::Helvetica,
            BODY_SIZE,
            &item.line_total().format(),
        );
        cursor.advance(LINE_HEIGHT * 0.25);
    }

    cursor.advance(LINE_HEIGHT * 0.5);
    doc.line(MARGIN, cursor.y, PAGE_WIDTH - MARGIN, cursor.y, 0.5, 0.4);
    Ok(())
}

fn draw_totals(doc: &mut Document, cursor: &mut Cursor, invoice: &Invoice) -> Result<(), RenderError> {
    let cols = columns();
    let block_height = LINE_HEIGHT * 3.5;
    // The footer draws at the bottom margin of this same page; reserve its
    // clearance too so the total band never runs underneath it.
    cursor.ensure_space(doc, block_height + FOOTER_CLEARANCE)?;

    cursor.advance(LINE_HEIGHT * 1.25);
    text_right(doc, cols[2], cursor.y, Font::Helvetica, BODY_SIZE, "Subtotal");
    text_right(doc, cols[3], cursor.y, Font::Helvetica, BODY_SIZE, &invoice.subtotal().format());

    // Emphasized total: filled band, bold, larger type.
    cursor.advance(LINE_HEIGHT * 0.75);
    let band_height = LINE_HEIGHT * 1.5;
    let band_x = cols[2].0 - 6.0;
    doc.fill_rect(band_x, cursor.y, PAGE_WIDTH - MARGIN - band_x, band_height, 0.9);
    let baseline = cursor.y + band_height - (band_height - TOTAL_SIZE) / 2.0;
    text_right(doc, cols[2], baseline, Font::HelveticaBold, TOTAL_SIZE, "Total");
    text_right(doc, cols[3], baseline, Font::HelveticaBold, TOTAL_SIZE, &invoice.total().format());
    cursor.advance(band_height);
    Ok(())
}

/// Thank-you line pinned to the lower portion of the final page.
fn draw_footer(doc: &mut Document) {
    let text = "Thank you for your business!";
    let width = text_width(text, Font::Helvetica, BODY_SIZE);
    doc.text(
        (PAGE_WIDTH - width) / 2.0,
        PAGE_HEIGHT - MARGIN,
        Font::Helvetica,
        BODY_SIZE,
        text,
    );
}

/// Right-aligns text against a column's right edge.
fn text_right(doc: &mut Document, col: (f64, f64), y: f64, font: Font, size: f64, text: &str) {
    let width = text_width(text, font, size);
    doc.text(col.0 + col.1 - width, y, font, size, text);
}

/// Whole quantities print without a decimal point; fractional ones keep up
/// to two places with trailing zeros trimmed ("0.5", "1.25").
fn format_quantity(qty: f64) -> String {
    if (qty.fract()).abs() < 1e-9 {
        format!("{}", qty as i64)
    } else {
        let s = format!("{qty:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
