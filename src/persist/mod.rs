pub mod memory;
pub mod sqlite;

use thiserror::Error;

use crate::{
    core::store::CartStore,
    item::CartLineItem,
    op::{CART_FORMAT_VERSION, CartSnapshot, StoredCartEnvelope},
};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("cart record decode failed: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unsupported cart format version: {0}")]
    UnsupportedFormat(u16),
    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Durable key/value storage the cart is written through to.
///
/// A missing key must load as `None`, never as an error.
pub trait CartSink: Send {
    fn load(&self, key: &str) -> PersistResult<Option<String>>;
    fn store(&mut self, key: &str, record: &str) -> PersistResult<()>;
    fn flush(&mut self) -> PersistResult<()> {
        Ok(())
    }
}

/// Serializes `snapshot` into the record written under the storage key.
pub fn encode_cart_record(snapshot: &CartSnapshot) -> PersistResult<String> {
    Ok(serde_json::to_string(&StoredCartEnvelope::new(snapshot.clone()))?)
}

/// Parses a stored record back into a snapshot.
pub fn decode_cart_record(record: &str) -> PersistResult<CartSnapshot> {
    if let Ok(envelope) = serde_json::from_str::<StoredCartEnvelope>(record) {
        if envelope.format_version != CART_FORMAT_VERSION {
            return Err(PersistError::UnsupportedFormat(envelope.format_version));
        }
        return Ok(envelope.into_snapshot());
    }

    // Bare item arrays predate the envelope and carry no revision.
    let items = serde_json::from_str::<Vec<CartLineItem>>(record)?;
    Ok(CartSnapshot { revision: 0, items })
}

/// Hydrates a store from `sink`, treating an absent key as an empty cart.
pub fn load_store(sink: &dyn CartSink, key: &str) -> PersistResult<CartStore> {
    match sink.load(key)? {
        Some(record) => Ok(CartStore::from_snapshot(decode_cart_record(&record)?)),
        None => Ok(CartStore::new()),
    }
}
