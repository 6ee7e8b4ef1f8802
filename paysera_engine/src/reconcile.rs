//! Matching a verified payment against the order it is for.
//!
//! [`PaymentReconciler::reconcile`] only decides. [`PaymentReconciler::apply`] carries the decision out through the
//! order's [`PayableOrder`] handle. The caller must hold that handle exclusively across both calls.
use std::fmt::Display;

use log::*;
use paysera_common::MinorUnits;
use serde::Serialize;

use crate::{
    config::MerchantConfig,
    db_types::{PaymentRecord, PaymentState},
    errors::PayseraError,
    response::VerifiedPayload,
    traits::PayableOrder,
};

pub const BAD_ORDER_AMOUNT: &str = "bad order amount";
pub const WRONG_PROJECT_ID: &str = "wrong project id";
pub const INVALID_ORDER_TOTAL: &str = "invalid order total";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReconciliationOutcome {
    /// Less than the order total was paid. Nothing is recorded.
    Rejected(String),
    /// Exactly the order total was paid.
    PaidExact,
    /// More than the order total was paid. Carries the excess.
    PaidWithCredit(MinorUnits),
    /// The order was already paid (or in credit) before this notification arrived. Repeat deliveries land here.
    AlreadySettled(PaymentState),
}

impl ReconciliationOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl Display for ReconciliationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(reason) => write!(f, "rejected ({reason})"),
            Self::PaidExact => write!(f, "paid"),
            Self::PaidWithCredit(credit) => write!(f, "paid with {credit} credit owed"),
            Self::AlreadySettled(state) => write!(f, "already settled ({state})"),
        }
    }
}

pub struct PaymentReconciler<'a> {
    config: &'a MerchantConfig,
}

impl<'a> PaymentReconciler<'a> {
    pub fn new(config: &'a MerchantConfig) -> Self {
        Self { config }
    }

    /// The notification must be for this merchant's project. Ids are compared as strings, so `012` is not `12`.
    pub fn check_project_id(&self, payload: &VerifiedPayload) -> Result<(), PayseraError> {
        let project_id = payload.project_id()?;
        if project_id == self.config.project_id {
            Ok(())
        } else {
            warn!("💰️ Notification for project {project_id} received, but this merchant is {}", self.config.project_id);
            Err(PayseraError::ProtocolError(WRONG_PROJECT_ID.into()))
        }
    }

    /// Decides what a verified notification means for the order. Nothing is written.
    ///
    /// A project id mismatch is an error rather than an outcome. An order that is already paid or in credit yields
    /// [`ReconciliationOutcome::AlreadySettled`] before the paid amount is even looked at.
    pub fn reconcile<O: PayableOrder>(
        &self,
        order: &O,
        payload: &VerifiedPayload,
    ) -> Result<ReconciliationOutcome, PayseraError> {
        self.check_project_id(payload)?;
        if order.is_paid_or_credited() {
            let state = order.payment_state();
            info!("💰️ Order {} is already settled ({state}). Ignoring repeat notification.", order.number());
            return Ok(ReconciliationOutcome::AlreadySettled(state));
        }
        let paid = payload.pay_amount()?;
        let owed = order.total();
        if owed.value() < 0 {
            warn!("💰️ Order {} has a negative total of {owed}. Refusing to settle it.", order.number());
            return Err(PayseraError::ProtocolError(INVALID_ORDER_TOTAL.into()));
        }
        let outcome = if paid < owed {
            ReconciliationOutcome::Rejected(BAD_ORDER_AMOUNT.into())
        } else if paid == owed {
            ReconciliationOutcome::PaidExact
        } else {
            let credit = paid
                .value()
                .checked_sub(owed.value())
                .ok_or_else(|| PayseraError::ProtocolError(INVALID_ORDER_TOTAL.into()))?;
            ReconciliationOutcome::PaidWithCredit(MinorUnits::from(credit))
        };
        debug!("💰️ Order {}: {paid} paid against {owed} owed. Outcome: {outcome}", order.number());
        Ok(outcome)
    }

    /// Carries out a reconciliation outcome.
    ///
    /// For a successful payment, a single payment of the *full* amount received is created and completed, and the
    /// order is advanced. A rejection is returned as a [`PayseraError::ProtocolError`] with the order untouched, and an
    /// already-settled order is left as it is (`Ok(None)`).
    pub async fn apply<O: PayableOrder>(
        &self,
        outcome: &ReconciliationOutcome,
        order: &mut O,
    ) -> Result<Option<PaymentRecord>, PayseraError> {
        let paid = match outcome {
            ReconciliationOutcome::Rejected(reason) => {
                warn!("💰️ Payment for order {} rejected: {reason}", order.number());
                return Err(PayseraError::ProtocolError(reason.clone()));
            },
            ReconciliationOutcome::AlreadySettled(_) => return Ok(None),
            ReconciliationOutcome::PaidExact => order.total(),
            ReconciliationOutcome::PaidWithCredit(credit) => order
                .total()
                .value()
                .checked_add(credit.value())
                .map(MinorUnits::from)
                .ok_or_else(|| PayseraError::ProtocolError(INVALID_ORDER_TOTAL.into()))?,
        };
        let payment = order.create_payment(paid).await.map_err(backend_error)?;
        let payment = order.complete_payment(payment.id).await.map_err(backend_error)?;
        let state = order.advance().await.map_err(backend_error)?;
        info!(
            "💰️ Payment #{} of {paid} recorded for order {}. Order is now {state}, payment state {}",
            payment.id,
            order.number(),
            order.payment_state()
        );
        Ok(Some(payment))
    }
}

fn backend_error<E: Display>(e: E) -> PayseraError {
    PayseraError::BackendError(e.to_string())
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;
    use tokio::runtime::Runtime;

    use super::*;
    use crate::{
        db::MemoryOrderStore,
        db_types::OrderSnapshot,
        test_utils::merchant_config,
        traits::OrderStore,
    };

    struct Settlement {
        first: Result<Option<PaymentRecord>, PayseraError>,
        second: Result<Option<PaymentRecord>, PayseraError>,
        before_second: OrderSnapshot,
        after_second: OrderSnapshot,
        payments: Vec<PaymentRecord>,
    }

    async fn deliver(
        store: &MemoryOrderStore,
        reconciler: &PaymentReconciler<'_>,
        payload: &VerifiedPayload,
    ) -> Result<Option<PaymentRecord>, PayseraError> {
        let mut order = store.lock_order("R1").await.unwrap().unwrap();
        let outcome = reconciler.reconcile(&order, payload)?;
        reconciler.apply(&outcome, &mut order).await
    }

    /// Delivers the same notification twice against a fresh order.
    fn settle_twice(owed: i64, paid: i64) -> Settlement {
        let runtime = Runtime::new().expect("Failed to start runtime");
        runtime.block_on(async {
            let store = MemoryOrderStore::default();
            store.insert(OrderSnapshot::new("R1", MinorUnits::from(owed), "EUR")).await;
            let config = merchant_config();
            let reconciler = PaymentReconciler::new(&config);
            let paid = paid.to_string();
            let fields = [("projectid", "12"), ("orderid", "R1"), ("payamount", paid.as_str())]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            let payload = VerifiedPayload::new(fields);
            let first = deliver(&store, &reconciler, &payload).await;
            let before_second = store.fetch_order("R1").await.unwrap().unwrap();
            let second = deliver(&store, &reconciler, &payload).await;
            let after_second = store.fetch_order("R1").await.unwrap().unwrap();
            let payments = store.payments_for("R1").await;
            Settlement { first, second, before_second, after_second, payments }
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn every_paid_amount_has_one_outcome(owed in 0i64..1_000_000, paid in 0i64..2_000_000) {
            let s = settle_twice(owed, paid);
            if paid < owed {
                prop_assert_eq!(s.first, Err(PayseraError::ProtocolError(BAD_ORDER_AMOUNT.into())));
                prop_assert_eq!(s.second, Err(PayseraError::ProtocolError(BAD_ORDER_AMOUNT.into())));
                prop_assert!(s.payments.is_empty());
                prop_assert_eq!(s.after_second.payment_state, PaymentState::BalanceDue);
            } else {
                let payment = s.first.unwrap().expect("No payment recorded");
                prop_assert_eq!(payment.amount, MinorUnits::from(paid));
                let expected = if paid == owed { PaymentState::Paid } else { PaymentState::CreditOwed };
                prop_assert_eq!(s.before_second.payment_state, expected);
                // The repeat delivery changes nothing
                prop_assert_eq!(s.second, Ok(None));
                prop_assert_eq!(&s.after_second, &s.before_second);
                prop_assert_eq!(s.payments.len(), 1);
            }
        }

        #[test]
        fn outcome_matches_the_comparison(owed in 0i64..=i64::MAX, paid in 0i64..=i64::MAX) {
            let s = settle_twice(owed, paid);
            prop_assert_eq!(s.first.is_ok(), paid >= owed);
        }
    }
}
