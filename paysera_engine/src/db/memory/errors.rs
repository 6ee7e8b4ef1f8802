use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryStoreError {
    #[error("Payment #{payment_id} does not belong to order {order_number}")]
    PaymentNotFound { order_number: String, payment_id: i64 },
    #[error("Payment #{0} has already been completed")]
    PaymentAlreadyCompleted(i64),
}
