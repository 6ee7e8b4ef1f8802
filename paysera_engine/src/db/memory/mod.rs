//! An in-process order store.
//!
//! Each order sits behind its own async mutex, so concurrent callbacks for one order queue up while callbacks for
//! different orders proceed independently.
mod errors;
mod order;

use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{atomic::AtomicI64, Arc},
};

pub use errors::MemoryStoreError;
use log::*;
pub use order::MemoryOrder;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::{
    db_types::{OrderSnapshot, PaymentRecord},
    traits::OrderStore,
};

#[derive(Clone, Default)]
pub struct MemoryOrderStore {
    orders: Arc<RwLock<HashMap<String, Arc<Mutex<MemoryOrder>>>>>,
    payment_ids: Arc<AtomicI64>,
}

impl Debug for MemoryOrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MemoryOrderStore")
    }
}

impl MemoryOrderStore {
    /// Adds the order if there is no order with the same number yet. Returns true if it was added.
    pub async fn insert(&self, order: OrderSnapshot) -> bool {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.number) {
            debug!("🗃️ Order {} already exists. Not replacing it.", order.number);
            return false;
        }
        debug!("🗃️ Order {} stored with a total of {}", order.number, order.total);
        let number = order.number.clone();
        let entry = MemoryOrder::new(order, Arc::clone(&self.payment_ids));
        orders.insert(number, Arc::new(Mutex::new(entry)));
        true
    }

    /// All payments recorded against the order, oldest first.
    pub async fn payments_for(&self, number: &str) -> Vec<PaymentRecord> {
        match self.entry(number).await {
            Some(order) => order.lock().await.payments().to_vec(),
            None => Vec::new(),
        }
    }

    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    async fn entry(&self, number: &str) -> Option<Arc<Mutex<MemoryOrder>>> {
        self.orders.read().await.get(number).cloned()
    }
}

impl OrderStore for MemoryOrderStore {
    type Error = MemoryStoreError;
    type Order = OwnedMutexGuard<MemoryOrder>;

    async fn fetch_order(&self, number: &str) -> Result<Option<OrderSnapshot>, Self::Error> {
        match self.entry(number).await {
            Some(order) => Ok(Some(order.lock().await.snapshot().clone())),
            None => Ok(None),
        }
    }

    async fn lock_order(&self, number: &str) -> Result<Option<Self::Order>, Self::Error> {
        match self.entry(number).await {
            Some(order) => Ok(Some(order.lock_owned().await)),
            None => Ok(None),
        }
    }
}
