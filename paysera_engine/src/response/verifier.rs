//! Authentication of inbound notifications.
//!
//! A notification carries two independent signatures over the same `data` text:
//! * `ss1` is the lowercase hex MD5 of the (unescaped) data followed by the merchant's sign key.
//! * `ss2` is the provider's RSA signature (PKCS#1 v1.5, SHA-1) over the same text, in the url-safe base64 alphabet.
//!
//! Both must hold before any payload field is read. Nothing here touches order state.
use log::*;

use paysera_common::Secret;

use crate::{
    codec::{decode_body, parse_query, sign, unescape, unescape_bytes},
    config::MerchantConfig,
    errors::{PayseraError, SignatureCheck},
    response::{InboundNotification, ProviderPublicKey, VerifiedPayload},
    traits::PublicKeySource,
};

/// Checks the shared-secret signature. The comparison is exact: `ss1` is expected in lowercase hex.
///
/// The unescaped bytes are hashed as they are, so escapes that are not UTF-8 simply fail the check.
pub fn verify_ss1(data: &str, ss1: &str, sign_key: &Secret<String>) -> Result<(), PayseraError> {
    let data = unescape_bytes(data);
    let expected = sign(&data, sign_key.reveal());
    if expected == ss1 {
        Ok(())
    } else {
        debug!("🔐️ ss1 mismatch");
        Err(PayseraError::SignatureError(SignatureCheck::Ss1))
    }
}

/// Checks the provider's RSA signature. A signature that cannot even be decoded counts as a failed check.
pub fn verify_ss2(data: &str, ss2: &str, key: &ProviderPublicKey) -> Result<(), PayseraError> {
    let data = unescape_bytes(data);
    let signature = unescape(ss2).and_then(|s| decode_body(&s)).map_err(|e| {
        debug!("🔐️ ss2 is not a valid signature encoding. {e}");
        PayseraError::SignatureError(SignatureCheck::Ss2)
    })?;
    if key.verify_sha1(&data, &signature) {
        Ok(())
    } else {
        debug!("🔐️ ss2 does not verify against the provider key");
        Err(PayseraError::SignatureError(SignatureCheck::Ss2))
    }
}

/// Decodes the `data` field into its key/value pairs. Only call this on data whose signatures have been checked.
pub fn decode_payload(data: &str) -> Result<VerifiedPayload, PayseraError> {
    let raw = decode_body(&unescape(data)?)?;
    let text = String::from_utf8(raw).map_err(|e| PayseraError::DecodeError(format!("Payload is not UTF-8. {e}")))?;
    trace!("🔐️ Decoded payload: {text}");
    parse_query(&text).map(VerifiedPayload::new)
}

/// Full authentication of a notification: configuration, then `ss1`, then `ss2`, then decoding.
///
/// No field of the payload is inspected unless both signatures are valid. The provider key is only fetched once
/// `ss1` holds, so forged callbacks cost nothing but a hash. A key that cannot be obtained fails the `ss2` check.
pub async fn verify_notification<K: PublicKeySource>(
    config: &MerchantConfig,
    notification: &InboundNotification,
    keys: &K,
) -> Result<VerifiedPayload, PayseraError> {
    config.ensure_configured()?;
    verify_ss1(&notification.data, &notification.ss1, &config.sign_key)?;
    let key = keys.public_key().await.map_err(|e| {
        error!("🔐️ Provider public key is unavailable, so ss2 cannot be checked. {e}");
        PayseraError::SignatureError(SignatureCheck::Ss2)
    })?;
    verify_ss2(&notification.data, &notification.ss2, &key)?;
    let payload = decode_payload(&notification.data)?;
    debug!("🔐️ Notification verified for order {}", payload.get("orderid").unwrap_or("<none>"));
    Ok(payload)
}
