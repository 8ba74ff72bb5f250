//! Shared primitive IDs, counters, and storage constants.

/// Product identifier; the natural merge key of a cart line.
pub type ProductId = String;
/// Units of one product held in the cart.
pub type Quantity = u32;
/// Monotonic counter of applied cart mutations.
pub type Revision = u64;

/// Well-known storage key the cart record is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "cart";
