use hashbrown::HashMap;
use rust_decimal::Decimal;

use crate::{
    item::{CartLineItem, ProductSummary},
    op::{CartChange, CartSnapshot},
    types::{ProductId, Quantity, Revision},
};

/// Ordered, id-unique collection of cart lines.
///
/// Every mutator is total: it either applies and returns the [`CartChange`],
/// or it is a no-op and returns `None`. No-ops leave the revision untouched.
#[derive(Debug, Default, Clone)]
pub struct CartStore {
    items: Vec<CartLineItem>,
    pos: HashMap<ProductId, usize>,
    revision: Revision,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from a persisted snapshot.
    ///
    /// Lines with zero quantity are dropped and repeated ids are folded into
    /// the first occurrence, so a malformed record still yields a valid cart.
    pub fn from_snapshot(snapshot: CartSnapshot) -> Self {
        let mut store = Self {
            revision: snapshot.revision,
            ..Self::default()
        };

        for line in snapshot.items {
            if line.quantity == 0 {
                continue;
            }
            match store.pos.get(&line.id).copied() {
                Some(idx) => {
                    let existing = &mut store.items[idx];
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => {
                    store.pos.insert(line.id.clone(), store.items.len());
                    store.items.push(line);
                }
            }
        }

        store
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            revision: self.revision,
            items: self.items.clone(),
        }
    }

    /// Adds one unit of `item`.
    ///
    /// An existing line keeps the display fields captured on its first add.
    pub fn add_to_cart(&mut self, item: ProductSummary) -> Option<CartChange> {
        self.add_units(item, 1)
    }

    /// Adds `units` units of `item` as a single mutation.
    ///
    /// Leaves the cart in the same state as `units` calls to
    /// [`Self::add_to_cart`] but bumps the revision once.
    pub fn add_units(&mut self, item: ProductSummary, units: Quantity) -> Option<CartChange> {
        if units == 0 {
            return None;
        }

        let id = item.id.clone();
        let quantity = match self.pos.get(&id).copied() {
            Some(idx) => {
                let line = &mut self.items[idx];
                let quantity = line.quantity.saturating_add(units);
                if quantity == line.quantity {
                    return None;
                }
                line.quantity = quantity;
                quantity
            }
            None => {
                self.pos.insert(id.clone(), self.items.len());
                self.items.push(CartLineItem::from_summary(item, units));
                units
            }
        };

        Some(self.applied(CartChange::Added { id, quantity }))
    }

    /// Sets the quantity of line `id` to exactly `new_quantity`.
    ///
    /// Zero or negative removes the line. Unknown ids and unchanged quantities
    /// are no-ops.
    pub fn update_quantity(&mut self, id: &str, new_quantity: i64) -> Option<CartChange> {
        if new_quantity <= 0 {
            return self.remove_from_cart(id);
        }

        let quantity = Quantity::try_from(new_quantity).unwrap_or(Quantity::MAX);
        let idx = self.pos.get(id).copied()?;
        let line = &mut self.items[idx];
        if line.quantity == quantity {
            return None;
        }
        line.quantity = quantity;

        Some(self.applied(CartChange::QuantitySet {
            id: id.to_string(),
            quantity,
        }))
    }

    /// Removes line `id` if present.
    pub fn remove_from_cart(&mut self, id: &str) -> Option<CartChange> {
        let idx = self.pos.remove(id)?;
        let line = self.items.remove(idx);
        self.reindex_from(idx);

        Some(self.applied(CartChange::Removed { id: line.id }))
    }

    /// Drops every line.
    ///
    /// Always applied, even on an empty cart, so the emptied state is written
    /// over whatever record is stored.
    pub fn clear_cart(&mut self) -> Option<CartChange> {
        let removed = self.items.len();
        self.items.clear();
        self.pos.clear();

        Some(self.applied(CartChange::Cleared { removed }))
    }

    /// Sum of quantities over all lines.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `price * quantity` over all lines, saturating at the `Decimal` bounds.
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .map(CartLineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CartLineItem> {
        self.pos.get(id).and_then(|idx| self.items.get(*idx))
    }

    pub fn quantity_of(&self, id: &str) -> Quantity {
        self.get(id).map_or(0, |line| line.quantity)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    fn applied(&mut self, change: CartChange) -> CartChange {
        self.revision += 1;
        change
    }

    fn reindex_from(&mut self, start: usize) {
        for (idx, line) in self.items.iter().enumerate().skip(start) {
            self.pos.insert(line.id.clone(), idx);
        }
    }
}
