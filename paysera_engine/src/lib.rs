//! Paysera Payment Engine
//!
//! This library implements the merchant side of Paysera's signed-message payment protocol. It is framework-agnostic:
//! nothing in here speaks HTTP, and order persistence is left to a backend implementing [`traits::OrderStore`].
//!
//! The library is divided into these sections:
//! 1. The wire format ([`mod@codec`]): the canonical query encoding, the url-safe body encoding and the MD5 request
//!    signature.
//! 2. Outbound payment requests ([`mod@request`]). Gateway and order fields are validated against the provider's field
//!    schema and sealed into a redirect URL.
//! 3. Inbound notifications ([`mod@response`]). A callback is only trusted once both its shared-secret digest (`ss1`)
//!    and the provider's RSA signature (`ss2`) check out.
//! 4. Reconciliation ([`mod@reconcile`]): comparing what was paid with what is owed and recording the payment.
//! 5. The payment flow API ([`PaymentFlowApi`]), which strings the above together against an order store and a source
//!    for the provider's public key.
pub mod api;
pub mod codec;
pub mod config;
mod db;
pub mod db_types;
pub mod errors;
pub mod key_source;
pub mod reconcile;
pub mod request;
pub mod response;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{
    flow_objects::{CallbackResult, ConfirmationResult},
    PaymentFlowApi,
};
pub use config::MerchantConfig;
pub use db::{MemoryOrder, MemoryOrderStore, MemoryStoreError};
pub use errors::{PayseraError, SignatureCheck, ValidationFailure};
pub use key_source::StaticKeySource;
pub use reconcile::{PaymentReconciler, ReconciliationOutcome};
pub use request::{PaymentRequest, RequestBuilder};
pub use response::{InboundNotification, NotificationParams, ProviderPublicKey, VerifiedPayload};
