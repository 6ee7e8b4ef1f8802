use std::fmt::Debug;

use log::*;

use crate::{
    api::flow_objects::{CallbackResult, ConfirmationResult},
    config::MerchantConfig,
    db_types::OrderSnapshot,
    errors::PayseraError,
    reconcile::PaymentReconciler,
    request::{PaymentRequest, RequestBuilder},
    response::{verify_notification, InboundNotification, VerifiedPayload},
    traits::{OrderStore, PublicKeySource},
};

/// `PaymentFlowApi` ties the protocol pieces to the merchant's orders: it builds checkout redirects and handles the
/// provider's callbacks and the buyer's return from the payment page.
pub struct PaymentFlowApi<S, K> {
    config: MerchantConfig,
    store: S,
    keys: K,
}

impl<S, K> Debug for PaymentFlowApi<S, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentFlowApi (project {})", self.config.project_id)
    }
}

impl<S, K> PaymentFlowApi<S, K> {
    pub fn new(config: MerchantConfig, store: S, keys: K) -> Self {
        Self { config, store, keys }
    }

    pub fn config(&self) -> &MerchantConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S, K> PaymentFlowApi<S, K>
where
    S: OrderStore,
    K: PublicKeySource,
{
    /// Builds the signed redirect that sends the buyer to the payment page for the given order.
    pub async fn checkout(&self, order_number: &str) -> Result<PaymentRequest, PayseraError> {
        let order = self
            .store
            .fetch_order(order_number)
            .await
            .map_err(|e| PayseraError::BackendError(e.to_string()))?
            .ok_or_else(|| PayseraError::OrderNotFound(order_number.to_string()))?;
        if order.is_paid_or_credited() {
            warn!("💳️ Checkout requested for order {order_number}, which is already {}", order.payment_state);
            return Err(PayseraError::ProtocolError(format!("order {order_number} has already been paid")));
        }
        RequestBuilder::new(&self.config).build(&order)
    }

    /// Authenticates a notification against this merchant's sign key and the provider key. See
    /// [`verify_notification`] for the order of the checks.
    pub async fn verify(&self, notification: &InboundNotification) -> Result<VerifiedPayload, PayseraError> {
        verify_notification(&self.config, notification, &self.keys).await
    }

    /// Handles the provider's server-to-server callback: verification, then reconciliation against the order.
    ///
    /// The order is held exclusively from the moment its payment state is read until the payment is recorded, so a
    /// callback that is delivered twice cannot be applied twice.
    pub async fn process_callback(&self, notification: &InboundNotification) -> Result<CallbackResult, PayseraError> {
        let payload = self.verify(notification).await?;
        let reconciler = PaymentReconciler::new(&self.config);
        reconciler.check_project_id(&payload)?;
        let order_number = payload.order_id()?;
        let mut order = self
            .store
            .lock_order(order_number)
            .await
            .map_err(|e| PayseraError::BackendError(e.to_string()))?
            .ok_or_else(|| PayseraError::OrderNotFound(order_number.to_string()))?;
        let outcome = reconciler.reconcile(&order, &payload)?;
        let payment = reconciler.apply(&outcome, &mut order).await?;
        info!("💰️ Callback for order {order_number} handled: {outcome}");
        Ok(CallbackResult { order_number: order_number.to_string(), outcome, payment })
    }

    /// Handles the buyer's return from the payment page. Nothing is written; the order is only reported as processed
    /// if the notification is genuine and the callback has already settled the order.
    pub async fn confirm(&self, notification: &InboundNotification) -> ConfirmationResult {
        match self.confirmed_order(notification).await {
            Ok(order) if order.is_paid_or_credited() => ConfirmationResult::Processed(order),
            Ok(order) => {
                info!("💳️ Buyer returned for order {}, but it is {}", order.number, order.payment_state);
                ConfirmationResult::NotProcessed(format!("order {} is {}", order.number, order.payment_state))
            },
            Err(e) => {
                warn!("💳️ Could not confirm payment. {e}");
                ConfirmationResult::NotProcessed(e.to_string())
            },
        }
    }

    async fn confirmed_order(&self, notification: &InboundNotification) -> Result<OrderSnapshot, PayseraError> {
        let payload = self.verify(notification).await?;
        PaymentReconciler::new(&self.config).check_project_id(&payload)?;
        let order_number = payload.order_id()?;
        self.store
            .fetch_order(order_number)
            .await
            .map_err(|e| PayseraError::BackendError(e.to_string()))?
            .ok_or_else(|| PayseraError::OrderNotFound(order_number.to_string()))
    }
}
