use std::error::Error;

use crate::{db_types::OrderSnapshot, traits::PayableOrder};

/// Access to the merchant's orders.
///
/// Persistence is not this crate's concern. Backends decide how orders are stored; the only ordering guarantee they
/// must give is that [`OrderStore::lock_order`] hands out at most one live handle per order at a time, so that two
/// deliveries of the same callback cannot both see an unpaid order.
#[allow(async_fn_in_trait)]
pub trait OrderStore: Clone {
    type Error: Error;
    type Order: PayableOrder<Error = Self::Error>;

    /// A read-only copy of the order, or `None` if there is no order with that number.
    async fn fetch_order(&self, number: &str) -> Result<Option<OrderSnapshot>, Self::Error>;

    /// An exclusive handle on the order. Waits until any other holder has released it.
    async fn lock_order(&self, number: &str) -> Result<Option<Self::Order>, Self::Error>;
}
