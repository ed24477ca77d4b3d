//! # Catalog CSV Parsing
//!
//! Row-tolerant parsing of the remote sheet export.
//!
//! Expected shape (header row always present, always skipped):
//!
//! ```text
//! Product Name, Price, Unit, Default Quantity
//! Milk,        50,    Liter, 1
//! Paneer,      500,   Kg
//! ```
//!
//! ## Validation policy
//! - a row needs at least three fields: name, price, unit
//! - price must parse as a finite, non-negative number
//! - rows failing either rule are DROPPED individually - one bad row
//!   never aborts the rest
//! - the optional fourth field is a default quantity; unparsable or
//!   non-positive values mean "absent", not rejection
//! - unit labels are normalized to lower case
//! - names are trimmed; empty names are dropped like short rows

use tracing::debug;
use uuid::Uuid;

use bijak_core::{Money, Product, ProductOrigin};

/// Parses a CSV body into remote-origin candidate products, in row order.
pub fn parse_catalog_csv(body: &str) -> Vec<Product> {
    let mut products = Vec::new();

    // First line is the header, always skipped.
    for (line_no, line) in body.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }

        match parse_row(line) {
            Some(product) => products.push(product),
            None => debug!(line = line_no + 1, "Dropping malformed catalog row"),
        }
    }

    products
}

fn parse_row(line: &str) -> Option<Product> {
    let fields = split_fields(line);
    if fields.len() < 3 {
        return None;
    }

    let name = fields[0].trim();
    if name.is_empty() {
        return None;
    }

    let price: f64 = fields[1].trim().parse().ok()?;
    if !price.is_finite() || price < 0.0 {
        return None;
    }

    let unit = fields[2].trim().to_lowercase();

    // Optional default quantity; bad values degrade to absent.
    let default_quantity = fields
        .get(3)
        .and_then(|f| f.trim().parse::<f64>().ok())
        .filter(|q| q.is_finite() && *q > 0.0);

    Some(Product {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        unit_price_cents: Money::from_decimal(price).cents(),
        unit,
        default_quantity,
        usage_count: 0,
        origin: ProductOrigin::CatalogSync,
    })
}

/// Splits one CSV line into fields, honoring double-quoted fields with
/// `""` escapes so product names may contain commas.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
Product Name,Price,Unit,Default Quantity
Milk,50,Liter,1
Paneer,500,Kg
Yogurt,80,KG,0.5
";

    #[test]
    fn test_parses_rows_in_order() {
        let products = parse_catalog_csv(SHEET);
        assert_eq!(products.len(), 3);
        assert_eq!(products[0].name, "Milk");
        assert_eq!(products[0].unit_price_cents, 5000);
        assert_eq!(products[0].unit, "liter");
        assert_eq!(products[0].default_quantity, Some(1.0));
        assert_eq!(products[0].origin, ProductOrigin::CatalogSync);

        assert_eq!(products[1].name, "Paneer");
        assert_eq!(products[1].unit_price_cents, 50000);
        assert_eq!(products[1].default_quantity, None);

        // Unit label normalized
        assert_eq!(products[2].unit, "kg");
    }

    #[test]
    fn test_header_is_always_skipped() {
        // Even a header that would parse as a row is skipped.
        let body = "Milk,50,liter\nPaneer,500,kg\n";
        let products = parse_catalog_csv(body);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Paneer");
    }

    #[test]
    fn test_malformed_rows_dropped_individually() {
        let body = "\
Product Name,Price,Unit
Milk,50,liter
only-two,fields
Ghee,not-a-price,kg
Cream,-10,liter
,55,kg
Butter,300,kg
";
        let products = parse_catalog_csv(body);
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Butter"]);
    }

    #[test]
    fn test_bad_default_quantity_degrades_to_absent() {
        let body = "h,h,h\nMilk,50,liter,abc\nPaneer,500,kg,-2\n";
        let products = parse_catalog_csv(body);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].default_quantity, None);
        assert_eq!(products[1].default_quantity, None);
    }

    #[test]
    fn test_quoted_names_may_contain_commas() {
        let body = "h,h,h\n\"Cheese, aged\",950,kg\n";
        let products = parse_catalog_csv(body);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Cheese, aged");
    }

    #[test]
    fn test_blank_lines_ignored() {
        let body = "h,h,h\n\nMilk,50,liter\n\n";
        assert_eq!(parse_catalog_csv(body).len(), 1);
    }

    #[test]
    fn test_price_rounds_to_cents() {
        let body = "h,h,h\nMilk,49.999,liter\n";
        let products = parse_catalog_csv(body);
        assert_eq!(products[0].unit_price_cents, 5000);
    }
}
