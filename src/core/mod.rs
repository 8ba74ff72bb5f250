//! In-memory authoritative cart state.

/// Authoritative cart store with merge semantics and derived totals.
pub mod store;
