use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::{Mutex, broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::{
    checkout::OrderSummary,
    config::CartConfig,
    core::store::CartStore,
    item::{CartLineItem, ProductSummary},
    op::{CartChange, CartSnapshot},
    persist::{self, CartSink, PersistError},
    types::{ProductId, Quantity, Revision},
};

use super::events::CartEvent;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("cart runtime is no longer running")]
    ChannelClosed,
    #[error(transparent)]
    Persist(#[from] PersistError),
}

type SharedSink = Arc<Mutex<Box<dyn CartSink>>>;

/// Cloneable context object every view uses to read and mutate the cart.
#[derive(Clone)]
pub struct CartHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<CartEvent>,
}

enum Command {
    Add {
        item: ProductSummary,
        units: Quantity,
        resp: oneshot::Sender<Option<CartChange>>,
    },
    UpdateQuantity {
        id: ProductId,
        quantity: i64,
        resp: oneshot::Sender<Option<CartChange>>,
    },
    Remove {
        id: ProductId,
        resp: oneshot::Sender<Option<CartChange>>,
    },
    Clear {
        resp: oneshot::Sender<Option<CartChange>>,
    },
    Snapshot {
        resp: oneshot::Sender<CartSnapshot>,
    },
    Get {
        id: ProductId,
        resp: oneshot::Sender<Option<CartLineItem>>,
    },
    Totals {
        resp: oneshot::Sender<(u64, Decimal)>,
    },
    Summary {
        resp: oneshot::Sender<OrderSummary>,
    },
    Flush {
        resp: oneshot::Sender<Result<Revision, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

/// Starts the writer task owning `store`, writing through to `sink` if given.
pub fn spawn_cart(
    store: CartStore,
    sink: Option<Box<dyn CartSink>>,
    config: CartConfig,
) -> CartHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_capacity);
    let (events_tx, _) = broadcast::channel::<CartEvent>(config.event_capacity);

    let sink: Option<SharedSink> = sink.map(|s| Arc::new(Mutex::new(s)));
    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut store = store;
        while let Some(cmd) = cmd_rx.recv().await {
            let done =
                handle_command(cmd, &mut store, &events_tx_loop, sink.as_ref(), &config).await;
            if done {
                break;
            }
        }
        debug!(revision = store.revision(), "cart writer stopped");
    });

    CartHandle { cmd_tx, events_tx }
}

/// Hydrates a store from `sink` on a blocking thread and starts the writer
/// over it.
///
/// An unreadable record is logged and replaced by an empty cart on the next
/// write.
pub async fn spawn_hydrated(sink: Box<dyn CartSink>, config: CartConfig) -> CartHandle {
    let key = config.storage_key.clone();
    let (sink, loaded) = match tokio::task::spawn_blocking(move || {
        let loaded = persist::load_store(sink.as_ref(), &key);
        (sink, loaded)
    })
    .await
    {
        Ok(out) => out,
        Err(err) => {
            // The sink went down with the panicked load; run without storage.
            warn!(key = %config.storage_key, error = %err, "cart hydration task failed");
            return spawn_cart(CartStore::new(), None, config);
        }
    };

    let store = match loaded {
        Ok(store) => {
            info!(
                key = %config.storage_key,
                lines = store.len(),
                revision = store.revision(),
                "cart hydrated"
            );
            store
        }
        Err(err) => {
            warn!(key = %config.storage_key, error = %err, "discarding unreadable cart record");
            CartStore::new()
        }
    };
    spawn_cart(store, Some(sink), config)
}

impl CartHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events_tx.subscribe()
    }

    /// Adds one unit of `item`.
    pub async fn add_to_cart(
        &self,
        item: ProductSummary,
    ) -> Result<Option<CartChange>, RuntimeError> {
        self.add_units(item, 1).await
    }

    pub async fn add_units(
        &self,
        item: ProductSummary,
        units: Quantity,
    ) -> Result<Option<CartChange>, RuntimeError> {
        self.request(|resp| Command::Add { item, units, resp }).await
    }

    pub async fn update_quantity(
        &self,
        id: impl Into<ProductId>,
        quantity: i64,
    ) -> Result<Option<CartChange>, RuntimeError> {
        let id = id.into();
        self.request(|resp| Command::UpdateQuantity { id, quantity, resp })
            .await
    }

    pub async fn remove_from_cart(
        &self,
        id: impl Into<ProductId>,
    ) -> Result<Option<CartChange>, RuntimeError> {
        let id = id.into();
        self.request(|resp| Command::Remove { id, resp }).await
    }

    pub async fn clear_cart(&self) -> Result<Option<CartChange>, RuntimeError> {
        self.request(|resp| Command::Clear { resp }).await
    }

    pub async fn snapshot(&self) -> Result<CartSnapshot, RuntimeError> {
        self.request(|resp| Command::Snapshot { resp }).await
    }

    pub async fn get(&self, id: impl Into<ProductId>) -> Result<Option<CartLineItem>, RuntimeError> {
        let id = id.into();
        self.request(|resp| Command::Get { id, resp }).await
    }

    pub async fn total_items(&self) -> Result<u64, RuntimeError> {
        Ok(self.request(|resp| Command::Totals { resp }).await?.0)
    }

    pub async fn total_price(&self) -> Result<Decimal, RuntimeError> {
        Ok(self.request(|resp| Command::Totals { resp }).await?.1)
    }

    /// Order summary of the current contents with the configured shipping fee.
    pub async fn order_summary(&self) -> Result<OrderSummary, RuntimeError> {
        self.request(|resp| Command::Summary { resp }).await
    }

    /// Flushes the sink; returns the revision known written.
    pub async fn flush(&self) -> Result<Revision, RuntimeError> {
        self.request(|resp| Command::Flush { resp }).await?
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Shutdown { resp }).await?
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

async fn handle_command(
    cmd: Command,
    store: &mut CartStore,
    events_tx: &broadcast::Sender<CartEvent>,
    sink: Option<&SharedSink>,
    config: &CartConfig,
) -> bool {
    match cmd {
        Command::Add { item, units, resp } => {
            let change = store.add_units(item, units);
            publish(store, change.clone(), events_tx, sink, config).await;
            let _ = resp.send(change);
        }
        Command::UpdateQuantity { id, quantity, resp } => {
            let change = store.update_quantity(&id, quantity);
            publish(store, change.clone(), events_tx, sink, config).await;
            let _ = resp.send(change);
        }
        Command::Remove { id, resp } => {
            let change = store.remove_from_cart(&id);
            publish(store, change.clone(), events_tx, sink, config).await;
            let _ = resp.send(change);
        }
        Command::Clear { resp } => {
            let change = store.clear_cart();
            publish(store, change.clone(), events_tx, sink, config).await;
            let _ = resp.send(change);
        }
        Command::Snapshot { resp } => {
            let _ = resp.send(store.snapshot());
        }
        Command::Get { id, resp } => {
            let _ = resp.send(store.get(&id).cloned());
        }
        Command::Totals { resp } => {
            let _ = resp.send((store.total_items(), store.total_price()));
        }
        Command::Summary { resp } => {
            let _ = resp.send(OrderSummary::from_snapshot(
                store.snapshot(),
                config.shipping_fee,
            ));
        }
        Command::Flush { resp } => {
            let out = match sink {
                Some(sink) => flush_sink(sink).await.map(|()| store.revision()),
                None => Ok(store.revision()),
            };
            let _ = resp.send(out);
        }
        Command::Shutdown { resp } => {
            let out = match sink {
                Some(sink) => flush_sink(sink).await,
                None => Ok(()),
            };
            info!(revision = store.revision(), "cart shutting down");
            let _ = resp.send(out);
            return true;
        }
    }

    false
}

/// Writes the new state through and notifies subscribers of an applied change.
async fn publish(
    store: &CartStore,
    change: Option<CartChange>,
    events_tx: &broadcast::Sender<CartEvent>,
    sink: Option<&SharedSink>,
    config: &CartConfig,
) {
    let Some(change) = change else {
        return;
    };

    let snapshot = store.snapshot();
    let revision = snapshot.revision;
    debug!(revision, ?change, "cart mutation applied");

    if let Some(sink) = sink {
        if let Err(err) = write_through(sink, &config.storage_key, &snapshot).await {
            warn!(revision, error = %err, "cart write-through failed");
            let _ = events_tx.send(CartEvent::PersistFailed {
                revision,
                reason: err.to_string(),
            });
        }
    }

    let _ = events_tx.send(CartEvent::Changed {
        revision,
        change,
        snapshot,
    });
}

async fn write_through(
    sink: &SharedSink,
    key: &str,
    snapshot: &CartSnapshot,
) -> Result<(), PersistError> {
    let record = persist::encode_cart_record(snapshot)?;
    let key = key.to_string();
    let sink_ref = Arc::clone(sink);
    tokio::task::spawn_blocking(move || {
        let mut sink = sink_ref.blocking_lock();
        sink.store(&key, &record)
    })
    .await
    .map_err(|e| PersistError::Backend(format!("join error: {e}")))?
}

async fn flush_sink(sink: &SharedSink) -> Result<(), RuntimeError> {
    let sink_ref = Arc::clone(sink);
    tokio::task::spawn_blocking(move || {
        let mut sink = sink_ref.blocking_lock();
        sink.flush()
    })
    .await
    .map_err(|e| PersistError::Backend(format!("join error: {e}")))??;
    Ok(())
}
