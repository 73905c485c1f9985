//! Read-side cart views with best-effort catalog enrichment.

use catalog::Product;
use common::{LineItem, Money};

/// A cart line joined with the catalog's current product data.
///
/// The line item itself is the source of truth for quantity and the
/// price snapshot; `product` is presentation-only and is `None` when
/// the catalog lookup failed.
#[derive(Debug, Clone)]
pub struct EnrichedLine {
    pub item: LineItem,
    pub product: Option<Product>,
}

/// The owner's cart as returned to callers, enriched for display.
#[derive(Debug, Clone)]
pub struct EnrichedCart {
    pub items: Vec<EnrichedLine>,
    pub total: Money,
}

impl EnrichedCart {
    /// Returns an empty zero-total view, used when no cart exists.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Money::zero(),
        }
    }
}
