//! Applied-mutation descriptions and the persisted cart record.

use serde::{Deserialize, Serialize};

use crate::{
    item::CartLineItem,
    types::{ProductId, Quantity, Revision},
};

/// Version number for serialized [`StoredCartEnvelope`] payloads.
pub const CART_FORMAT_VERSION: u16 = 1;

/// One mutation that actually changed the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartChange {
    /// Units were added, either as a new line or merged into an existing one.
    Added {
        /// Product id that received the units.
        id: ProductId,
        /// Quantity of the line after the add.
        quantity: Quantity,
    },
    /// A line's quantity was set to an absolute value.
    QuantitySet {
        /// Product id of the line.
        id: ProductId,
        /// New quantity.
        quantity: Quantity,
    },
    /// A line was removed.
    Removed {
        /// Product id of the removed line.
        id: ProductId,
    },
    /// Every line was removed.
    Cleared {
        /// Number of lines dropped.
        removed: usize,
    },
}

impl CartChange {
    /// Product id touched by this change, if it targets a single line.
    pub fn product_id(&self) -> Option<&str> {
        match self {
            Self::Added { id, .. } | Self::QuantitySet { id, .. } | Self::Removed { id } => {
                Some(id)
            }
            Self::Cleared { .. } => None,
        }
    }
}

/// Point-in-time copy of the cart contents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Revision the snapshot was taken at.
    pub revision: Revision,
    /// Lines in first-added order.
    pub items: Vec<CartLineItem>,
}

/// Versioned wrapper for the record written under the storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCartEnvelope {
    /// Payload format version.
    pub format_version: u16,
    /// Revision at write time.
    pub revision: Revision,
    /// Persisted lines.
    pub items: Vec<CartLineItem>,
}

impl StoredCartEnvelope {
    /// Wraps `snapshot` using [`CART_FORMAT_VERSION`].
    pub fn new(snapshot: CartSnapshot) -> Self {
        Self {
            format_version: CART_FORMAT_VERSION,
            revision: snapshot.revision,
            items: snapshot.items,
        }
    }

    /// Unwraps into a snapshot.
    pub fn into_snapshot(self) -> CartSnapshot {
        CartSnapshot {
            revision: self.revision,
            items: self.items,
        }
    }
}
