//! Order summary read once by the order submission flow.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{item::CartLineItem, op::CartSnapshot};

/// Frozen view of the cart at submit time plus shipping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub lines: Vec<CartLineItem>,
    pub total_items: u64,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// Builds a summary from `snapshot` with a flat `shipping_fee`.
    ///
    /// Empty carts are not charged shipping.
    pub fn from_snapshot(snapshot: CartSnapshot, shipping_fee: Decimal) -> Self {
        let total_items: u64 = snapshot
            .items
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum();
        let subtotal = snapshot
            .items
            .iter()
            .map(CartLineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let shipping = if snapshot.items.is_empty() {
            Decimal::ZERO
        } else {
            shipping_fee
        };

        Self {
            lines: snapshot.items,
            total_items,
            subtotal,
            shipping,
            total: subtotal.saturating_add(shipping),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::store::CartStore, item::ProductSummary};

    #[test]
    fn subtotal_matches_cart_total_and_shipping_is_flat() {
        let mut store = CartStore::new();
        store.add_to_cart(ProductSummary::new("1", "Rose", Decimal::from(100), ""));
        store.add_to_cart(ProductSummary::new("2", "Daisy", Decimal::from(50), ""));
        store.update_quantity("1", 2);

        let summary = OrderSummary::from_snapshot(store.snapshot(), Decimal::from(15));

        assert_eq!(summary.subtotal, store.total_price());
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.shipping, Decimal::from(15));
        assert_eq!(summary.total, Decimal::from(265));
    }

    #[test]
    fn empty_cart_has_no_shipping() {
        let summary = OrderSummary::from_snapshot(CartSnapshot::default(), Decimal::from(15));
        assert!(summary.is_empty());
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[test]
    fn oversized_totals_saturate() {
        let mut store = CartStore::new();
        store.add_to_cart(ProductSummary::new("1", "Rose", Decimal::MAX, ""));
        store.add_to_cart(ProductSummary::new("2", "Daisy", Decimal::MAX, ""));

        let summary = OrderSummary::from_snapshot(store.snapshot(), Decimal::from(15));
        assert_eq!(summary.subtotal, Decimal::MAX);
        assert_eq!(summary.total, Decimal::MAX);
    }
}
