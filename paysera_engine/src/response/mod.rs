//! Inbound notifications: authentication of the `ss1`/`ss2` signatures and decoding of the payload.
mod notification;
mod public_key;
mod verifier;

pub use notification::{InboundNotification, NotificationParams, VerifiedPayload};
pub use public_key::{ProviderPublicKey, PublicKeyError};
pub use verifier::{decode_payload, verify_notification, verify_ss1, verify_ss2};
