//! # Logical Record Keys
//!
//! Each key names one independently-readable record. A missing key means
//! "first run", never an error. Consumers own the record type behind
//! their key:
//!
//! | key              | value type            | owner          |
//! |------------------|-----------------------|----------------|
//! | `customers`      | `Vec<Customer>`       | bijak-session  |
//! | `products`       | `Vec<Product>` (local)| bijak-session  |
//! | `draft_invoice`  | `Invoice`             | bijak-session  |
//! | `invoice_history`| `Vec<Invoice>`        | bijak-session  |
//! | `merchant_config`| `MerchantConfig`      | settings layer |
//! | `catalog_cache`  | `CacheEntry`          | bijak-catalog  |

/// All known customers. Append-and-update only; customers are never deleted.
pub const CUSTOMERS: &str = "customers";

/// Locally-entered products. Remote catalog rows are never written here.
pub const PRODUCTS: &str = "products";

/// The single in-progress draft invoice. At most one exists at a time.
pub const DRAFT_INVOICE: &str = "draft_invoice";

/// Finalized invoices, oldest first.
pub const INVOICE_HISTORY: &str = "invoice_history";

/// Merchant identity and catalog source configuration.
pub const MERCHANT_CONFIG: &str = "merchant_config";

/// Last successful remote catalog fetch (value + timestamp + source id).
pub const CATALOG_CACHE: &str = "catalog_cache";
