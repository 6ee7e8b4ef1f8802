//! Seams between the engine and the merchant's side of the world.
//!
//! * [`PayableOrder`] is the capability a payment is applied through.
//! * [`OrderStore`] finds orders and hands out exclusive handles on them.
//! * [`PublicKeySource`] supplies the provider key for `ss2` checks.
mod order_store;
mod payable_order;
mod public_key_source;

pub use order_store::OrderStore;
pub use payable_order::PayableOrder;
pub use public_key_source::{KeySourceError, PublicKeySource};
