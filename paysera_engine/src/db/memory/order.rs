use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use log::*;
use paysera_common::MinorUnits;

use super::MemoryStoreError;
use crate::{
    db_types::{OrderSnapshot, OrderState, PaymentRecord, PaymentRecordState, PaymentState},
    traits::PayableOrder,
};

/// An order and the payments recorded against it.
#[derive(Debug)]
pub struct MemoryOrder {
    snapshot: OrderSnapshot,
    payments: Vec<PaymentRecord>,
    payment_ids: Arc<AtomicI64>,
}

impl MemoryOrder {
    pub(super) fn new(snapshot: OrderSnapshot, payment_ids: Arc<AtomicI64>) -> Self {
        Self { snapshot, payments: Vec::new(), payment_ids }
    }

    pub fn snapshot(&self) -> &OrderSnapshot {
        &self.snapshot
    }

    pub fn payments(&self) -> &[PaymentRecord] {
        &self.payments
    }

    fn completed_total(&self) -> MinorUnits {
        self.payments.iter().filter(|p| p.is_completed()).map(|p| p.amount).sum()
    }
}

impl PayableOrder for MemoryOrder {
    type Error = MemoryStoreError;

    fn number(&self) -> &str {
        &self.snapshot.number
    }

    fn total(&self) -> MinorUnits {
        self.snapshot.total
    }

    fn payment_state(&self) -> PaymentState {
        self.snapshot.payment_state
    }

    async fn create_payment(&mut self, amount: MinorUnits) -> Result<PaymentRecord, Self::Error> {
        let id = self.payment_ids.fetch_add(1, Ordering::SeqCst) + 1;
        let payment = PaymentRecord::new(id, &self.snapshot.number, amount);
        trace!("🗃️ Payment #{id} of {amount} created for order {}", self.snapshot.number);
        self.payments.push(payment.clone());
        Ok(payment)
    }

    async fn complete_payment(&mut self, payment_id: i64) -> Result<PaymentRecord, Self::Error> {
        let number = self.snapshot.number.clone();
        let payment = self.payments.iter_mut().find(|p| p.id == payment_id).ok_or_else(|| {
            MemoryStoreError::PaymentNotFound { order_number: number.clone(), payment_id }
        })?;
        if payment.is_completed() {
            return Err(MemoryStoreError::PaymentAlreadyCompleted(payment_id));
        }
        payment.state = PaymentRecordState::Completed;
        let payment = payment.clone();
        self.snapshot.payment_state = PaymentState::derive(self.completed_total(), self.snapshot.total);
        trace!("🗃️ Payment #{payment_id} completed. Order {number} is now {}", self.snapshot.payment_state);
        Ok(payment)
    }

    async fn advance(&mut self) -> Result<OrderState, Self::Error> {
        self.snapshot.state = self.snapshot.state.next();
        Ok(self.snapshot.state)
    }
}
