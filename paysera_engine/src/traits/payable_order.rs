use std::error::Error;

use paysera_common::MinorUnits;
use tokio::sync::OwnedMutexGuard;

use crate::db_types::{OrderState, PaymentRecord, PaymentState};

/// The narrow view of a merchant order that reconciliation needs.
///
/// Implementations are expected to be exclusive handles: whoever holds one may read the payment state and write a
/// payment without another callback for the same order interleaving.
#[allow(async_fn_in_trait)]
pub trait PayableOrder {
    type Error: Error;

    fn number(&self) -> &str;

    /// The amount due, in minor units.
    fn total(&self) -> MinorUnits;

    /// Derived from the completed payments recorded against the order.
    fn payment_state(&self) -> PaymentState;

    fn is_paid_or_credited(&self) -> bool {
        self.payment_state().is_paid_or_credited()
    }

    /// Records a new, not yet completed, payment against the order.
    async fn create_payment(&mut self, amount: MinorUnits) -> Result<PaymentRecord, Self::Error>;

    /// Marks the payment complete, which updates the order's payment state.
    async fn complete_payment(&mut self, payment_id: i64) -> Result<PaymentRecord, Self::Error>;

    /// Moves the order on to its next state.
    async fn advance(&mut self) -> Result<OrderState, Self::Error>;
}

impl<O: PayableOrder> PayableOrder for OwnedMutexGuard<O> {
    type Error = O::Error;

    fn number(&self) -> &str {
        (**self).number()
    }

    fn total(&self) -> MinorUnits {
        (**self).total()
    }

    fn payment_state(&self) -> PaymentState {
        (**self).payment_state()
    }

    async fn create_payment(&mut self, amount: MinorUnits) -> Result<PaymentRecord, Self::Error> {
        (**self).create_payment(amount).await
    }

    async fn complete_payment(&mut self, payment_id: i64) -> Result<PaymentRecord, Self::Error> {
        (**self).complete_payment(payment_id).await
    }

    async fn advance(&mut self) -> Result<OrderState, Self::Error> {
        (**self).advance().await
    }
}
