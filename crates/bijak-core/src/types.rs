//! # Domain Types
//!
//! Core domain types used throughout Bijak.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │     Product     │   │    Invoice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  name           │   │  customer snap  │       │
//! │  │  usage_count    │   │  unit_price     │   │  Vec<LineItem>  │       │
//! │  │  last_used_at   │   │  origin         │   │  subtotal/total │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  A LineItem is a SNAPSHOT: name, unit price and unit label are copied  │
//! │  at entry time and never track later Product edits. An invoice says    │
//! │  what was agreed, not what the catalog says today.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Customer
// =============================================================================

/// A billing customer.
///
/// Customers are never deleted; only created and usage-counted, so that
/// finalized invoices always have a resolvable reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the invoice.
    pub name: String,

    /// Optional contact phone.
    pub phone: Option<String>,

    /// Optional free-text address.
    pub address: Option<String>,

    /// How many finalized invoices were billed to this customer.
    /// Drives most-recently-useful ordering in pickers.
    pub usage_count: u32,

    /// When this customer last had an invoice finalized.
    pub last_used_at: Option<DateTime<Utc>>,

    /// When the customer was created.
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a new customer with a fresh identity and zero usage.
    pub fn new(name: impl Into<String>, phone: Option<String>, address: Option<String>) -> Self {
        Customer {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            phone,
            address,
            usage_count: 0,
            last_used_at: None,
            created_at: Utc::now(),
        }
    }

    /// Records a finalized invoice against this customer.
    pub fn record_usage(&mut self, at: DateTime<Utc>) {
        self.usage_count += 1;
        self.last_used_at = Some(at);
    }
}

// =============================================================================
// Product
// =============================================================================

/// Where a catalog product came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductOrigin {
    /// Entered by the user on this device; persisted indefinitely.
    Local,
    /// Parsed from the remote catalog sheet; ephemeral, lives only in the
    /// catalog cache and is never written to the local products record.
    CatalogSync,
}

/// A reusable product available for line-item entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name (also the case-insensitive merge key).
    pub name: String,

    /// Unit price in cents.
    pub unit_price_cents: i64,

    /// Unit label ("kg", "liter", "dozen"). Always lower case.
    pub unit: String,

    /// Quantity to pre-fill in the item form, if the catalog provides one.
    pub default_quantity: Option<f64>,

    /// How many line items were created from this product.
    pub usage_count: u32,

    /// Local entry vs remote catalog row.
    pub origin: ProductOrigin,
}

impl Product {
    /// Creates a locally-entered product with usage count 1 (it is created
    /// the first time a line item names it).
    pub fn new_local(name: impl Into<String>, unit_price_cents: i64, unit: impl Into<String>) -> Self {
        Product {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            unit_price_cents,
            unit: unit.into(),
            default_quantity: None,
            usage_count: 1,
            origin: ProductOrigin::Local,
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A line on an invoice.
///
/// Uses the snapshot pattern: `name`, `unit_price_cents` and `unit` are
/// write-once copies taken when the line is entered. Editing a line
/// replaces the whole snapshot with the edited values; it never patches
/// through to the source Product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Product name at time of entry (frozen).
    pub name: String,

    /// Unit price in cents at time of entry (frozen).
    pub unit_price_cents: i64,

    /// Quantity sold. Fractional quantities are first-class (0.5 liter).
    pub quantity: f64,

    /// Unit label at time of entry (frozen).
    pub unit: String,
}

impl LineItem {
    /// Creates a line item with a fresh identity, snapshotting the given
    /// values.
    pub fn new(
        name: impl Into<String>,
        unit_price_cents: i64,
        quantity: f64,
        unit: impl Into<String>,
    ) -> Self {
        LineItem {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            unit_price_cents,
            quantity,
            unit: unit.into(),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line amount: unit price × quantity, rounded to the cent.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// An invoice document: a customer snapshot plus an ordered list of line
/// items and derived totals.
///
/// ## Invariants
/// - `subtotal_cents == total_cents == Σ line_total` after every mutation
///   (callers go through [`Invoice::recompute_totals`])
/// - item order is entry order and is meaningful for display
/// - at most one invoice with `is_draft == true` exists at a time (enforced
///   by the session layer, which owns the single draft storage key)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Reference to the selected customer, if any.
    pub customer_id: Option<String>,

    /// Customer name at selection time (frozen).
    pub customer_name: String,

    /// Customer phone at selection time (frozen).
    pub customer_phone: Option<String>,

    /// Customer address at selection time (frozen).
    pub customer_address: Option<String>,

    /// Ordered line items (entry order).
    pub items: Vec<LineItem>,

    /// Sum of line totals.
    pub subtotal_cents: i64,

    /// Grand total. Currently always equal to the subtotal; kept as a
    /// separate field so tax/discount lines can slot in later without a
    /// data migration.
    pub total_cents: i64,

    /// When the invoice was started.
    pub created_at: DateTime<Utc>,

    /// True until the invoice is finalized into history.
    pub is_draft: bool,

    /// Rendered document bytes, held in memory once generated. Not
    /// persisted - re-rendering from the invoice data is deterministic.
    #[serde(skip)]
    pub document: Option<Vec<u8>>,
}

impl Invoice {
    /// Creates a fresh empty draft: no customer, no items, zero totals.
    pub fn new_draft() -> Self {
        Invoice {
            id: Uuid::new_v4().to_string(),
            customer_id: None,
            customer_name: String::new(),
            customer_phone: None,
            customer_address: None,
            items: Vec::new(),
            subtotal_cents: 0,
            total_cents: 0,
            created_at: Utc::now(),
            is_draft: true,
            document: None,
        }
    }

    /// Attaches a customer reference plus a deep copy of its display
    /// fields. The snapshot never tracks later customer edits.
    pub fn attach_customer(&mut self, customer: &Customer) {
        self.customer_id = Some(customer.id.clone());
        self.customer_name = customer.name.clone();
        self.customer_phone = customer.phone.clone();
        self.customer_address = customer.address.clone();
    }

    /// Clears the customer reference and snapshot. Line items survive.
    pub fn detach_customer(&mut self) {
        self.customer_id = None;
        self.customer_name.clear();
        self.customer_phone = None;
        self.customer_address = None;
    }

    /// Recomputes `subtotal_cents` and `total_cents` from the line items.
    /// Must be called after every item mutation.
    pub fn recompute_totals(&mut self) {
        let subtotal: Money = self.items.iter().map(|i| i.line_total()).sum();
        self.subtotal_cents = subtotal.cents();
        self.total_cents = subtotal.cents();
    }

    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Short upper-cased form of the identity for human display,
    /// e.g. `"1A2B3C4D"`.
    pub fn short_id(&self) -> String {
        self.id.chars().take(8).collect::<String>().to_uppercase()
    }
}

// =============================================================================
// Merchant Configuration
// =============================================================================

/// The merchant's own identity, printed on every invoice, plus the
/// optional remote catalog source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MerchantConfig {
    /// Business name (invoice header).
    pub business_name: String,

    /// First free-text address line.
    pub address_line1: String,

    /// Second free-text address line.
    pub address_line2: String,

    /// Contact phone.
    pub phone: String,

    /// Optional contact email.
    pub email: Option<String>,

    /// Optional tax registration string (NTN/GST etc.), printed verbatim.
    pub tax_id: Option<String>,

    /// Identifier of the remote catalog sheet. `None` (or empty) means
    /// catalog sync is off and only local products are offered.
    pub catalog_source_id: Option<String>,
}

impl MerchantConfig {
    /// The configured catalog source, treating empty strings as absent.
    pub fn catalog_source(&self) -> Option<&str> {
        self.catalog_source_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft_is_empty() {
        let draft = Invoice::new_draft();
        assert!(draft.is_draft);
        assert!(draft.items.is_empty());
        assert!(draft.customer_id.is_none());
        assert_eq!(draft.subtotal_cents, 0);
        assert_eq!(draft.total_cents, 0);
    }

    #[test]
    fn test_recompute_totals_paneer_and_milk() {
        // The canonical scenario: Paneer 500.00 × 1 kg + Milk 50.00 × 0.5 l
        let mut invoice = Invoice::new_draft();
        invoice.items.push(LineItem::new("Paneer", 50000, 1.0, "kg"));
        invoice.items.push(LineItem::new("Milk", 5000, 0.5, "liter"));
        invoice.recompute_totals();

        assert_eq!(invoice.subtotal_cents, 52500);
        assert_eq!(invoice.total_cents, 52500);
        assert_eq!(invoice.total().format(), "525.00");
    }

    #[test]
    fn test_subtotal_always_equals_total() {
        let mut invoice = Invoice::new_draft();
        for i in 0..5i64 {
            invoice
                .items
                .push(LineItem::new(format!("Item {i}"), 199 * (i + 1), 2.0, "pc"));
            invoice.recompute_totals();
            assert_eq!(invoice.subtotal_cents, invoice.total_cents);
        }
    }

    #[test]
    fn test_customer_snapshot_is_a_copy() {
        let mut customer = Customer::new("Ali Traders", Some("0300-1234567".into()), None);
        let mut invoice = Invoice::new_draft();
        invoice.attach_customer(&customer);

        // Mutating the customer afterwards must not leak into the invoice.
        customer.name = "Renamed Traders".into();
        customer.phone = None;
        assert_eq!(invoice.customer_name, "Ali Traders");
        assert_eq!(invoice.customer_phone.as_deref(), Some("0300-1234567"));
    }

    #[test]
    fn test_detach_customer_preserves_items() {
        let customer = Customer::new("Ali Traders", None, None);
        let mut invoice = Invoice::new_draft();
        invoice.attach_customer(&customer);
        invoice.items.push(LineItem::new("Paneer", 50000, 1.0, "kg"));
        invoice.recompute_totals();

        invoice.detach_customer();
        assert!(invoice.customer_id.is_none());
        assert!(invoice.customer_name.is_empty());
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.total_cents, 50000);
    }

    #[test]
    fn test_short_id_is_upper() {
        let invoice = Invoice::new_draft();
        let short = invoice.short_id();
        assert_eq!(short.len(), 8);
        assert_eq!(short, short.to_uppercase());
        assert!(invoice.id.to_uppercase().starts_with(&short));
    }

    #[test]
    fn test_merchant_catalog_source_empty_means_none() {
        let mut config = MerchantConfig::default();
        assert!(config.catalog_source().is_none());

        config.catalog_source_id = Some("   ".into());
        assert!(config.catalog_source().is_none());

        config.catalog_source_id = Some("sheet-abc".into());
        assert_eq!(config.catalog_source(), Some("sheet-abc"));
    }

    #[test]
    fn test_invoice_serde_round_trip() {
        let mut invoice = Invoice::new_draft();
        let customer = Customer::new("Ali Traders", None, Some("Shop 4, Anarkali".into()));
        invoice.attach_customer(&customer);
        invoice.items.push(LineItem::new("Milk", 5000, 0.5, "liter"));
        invoice.recompute_totals();
        invoice.document = Some(vec![1, 2, 3]); // must NOT survive the trip

        let json = serde_json::to_string(&invoice).unwrap();
        let back: Invoice = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, invoice.id);
        assert_eq!(back.items.len(), 1);
        assert_eq!(back.total_cents, 2500);
        assert_eq!(back.customer_address.as_deref(), Some("Shop 4, Anarkali"));
        assert!(back.document.is_none());
    }
}
