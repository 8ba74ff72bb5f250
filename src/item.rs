//! Product summaries, product records, and cart line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, Quantity};

/// Product fields captured by the cart when a unit is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Thumbnail URL.
    pub image_url: String,
}

impl ProductSummary {
    /// Builds a summary from its parts.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Decimal,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image_url: image_url.into(),
        }
    }
}

/// One row of the cart: a product and how many units of it are held.
///
/// `name`, `price`, and `image_url` are frozen at the first add and never
/// re-fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product identifier, unique within a cart.
    pub id: ProductId,
    /// Display name captured at add time.
    pub name: String,
    /// Unit price captured at add time.
    pub price: Decimal,
    /// Thumbnail URL captured at add time.
    pub image_url: String,
    /// Units held, always at least 1 while the line is in the cart.
    pub quantity: Quantity,
}

impl CartLineItem {
    /// Creates a line from `summary` holding `quantity` units.
    pub fn from_summary(summary: ProductSummary, quantity: Quantity) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            price: summary.price,
            image_url: summary.image_url,
            quantity,
        }
    }

    /// Unit price times quantity, saturating at the `Decimal` bounds.
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Product row as served by the catalog backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current list price.
    pub price: Decimal,
    /// Category slug.
    pub category: String,
    /// Thumbnail URL.
    pub image_url: String,
    /// Units available to sell.
    pub stock_quantity: i64,
    /// Shown in the featured section of the home page.
    pub is_featured: bool,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Long-form description.
    pub description: Option<String>,
}

impl ProductRecord {
    /// True when at least one unit can be sold.
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

impl From<&ProductRecord> for ProductSummary {
    fn from(rec: &ProductRecord) -> Self {
        Self {
            id: rec.id.clone(),
            name: rec.name.clone(),
            price: rec.price,
            image_url: rec.image_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_projects_display_fields_from_record() {
        let rec = ProductRecord {
            id: "tulip-bouquet".to_string(),
            name: "Tulip Bouquet".to_string(),
            price: Decimal::new(64900, 2),
            category: "bouquets".to_string(),
            image_url: "/img/tulip.jpg".to_string(),
            stock_quantity: 0,
            is_featured: true,
            created_at: DateTime::<Utc>::default(),
            description: None,
        };

        let summary = ProductSummary::from(&rec);
        assert_eq!(summary.id, "tulip-bouquet");
        assert_eq!(summary.price, Decimal::new(64900, 2));
        assert!(!rec.in_stock());
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        let line = CartLineItem::from_summary(
            ProductSummary::new("1", "Rose", Decimal::new(1250, 2), ""),
            4,
        );
        assert_eq!(line.line_total(), Decimal::new(5000, 2));
    }

    #[test]
    fn line_total_saturates_instead_of_overflowing() {
        let line = CartLineItem::from_summary(
            ProductSummary::new("1", "Rose", Decimal::from(10u128.pow(20)), ""),
            1_000_000_000,
        );
        assert_eq!(line.line_total(), Decimal::MAX);
    }
}
