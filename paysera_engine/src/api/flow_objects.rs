use serde::Serialize;

use crate::{
    db_types::{OrderSnapshot, PaymentRecord},
    reconcile::ReconciliationOutcome,
};

/// What a successfully handled callback did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackResult {
    pub order_number: String,
    pub outcome: ReconciliationOutcome,
    /// The payment recorded by this callback. `None` when the order had already been settled.
    pub payment: Option<PaymentRecord>,
}

impl CallbackResult {
    /// The plain-text acknowledgement the provider expects. Anything not starting with `OK` is treated as a failure.
    pub fn acknowledgement(&self) -> String {
        match &self.outcome {
            ReconciliationOutcome::PaidWithCredit(credit) => format!("OK credit owed: {credit}"),
            _ => "OK".to_string(),
        }
    }
}

/// The result of the buyer returning from the payment page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConfirmationResult {
    /// The notification was genuine and the order is paid (or in credit).
    Processed(OrderSnapshot),
    /// Anything else: a bad signature, an unknown order, or a payment that has not been recorded (yet).
    NotProcessed(String),
}

impl ConfirmationResult {
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed(_))
    }
}
