//! Fixtures for tests in this crate and downstream. Enabled by the `test_utils` feature.
pub mod keys;

use log::*;
use paysera_common::{MinorUnits, Secret};
use rsa::{pkcs8::DecodePrivateKey, Pkcs1v15Sign, RsaPrivateKey};
use sha1::{Digest, Sha1};

use crate::{
    codec::{encode_body, encode_query, sign},
    config::MerchantConfig,
    db_types::{BillingAddress, OrderSnapshot},
    key_source::StaticKeySource,
    response::{InboundNotification, ProviderPublicKey},
    traits::{KeySourceError, PublicKeySource},
};

pub const TEST_PROJECT_ID: &str = "12";
pub const TEST_SIGN_KEY: &str = "change me";

pub fn init_test_logging() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
}

pub fn merchant_config() -> MerchantConfig {
    MerchantConfig {
        project_id: TEST_PROJECT_ID.into(),
        sign_key: Secret::new(TEST_SIGN_KEY.into()),
        domain_name: "https://dommy.domain".into(),
        test_mode: true,
        ..Default::default()
    }
}

pub fn test_public_key() -> ProviderPublicKey {
    ProviderPublicKey::from_pem(keys::TEST_CERTIFICATE_PEM).expect("Test certificate is invalid")
}

pub fn test_key_source() -> StaticKeySource {
    StaticKeySource::new(test_public_key())
}

/// A key source whose fetches always fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableKeySource;

impl PublicKeySource for UnavailableKeySource {
    async fn public_key(&self) -> Result<ProviderPublicKey, KeySourceError> {
        Err(KeySourceError::FetchError("connection refused".into()))
    }
}

/// Plays the provider: encodes the fields, then signs them with the shared secret (`ss1`) and the test private key
/// (`ss2`).
pub fn sign_notification(fields: &[(&str, &str)], sign_key: &str) -> InboundNotification {
    let data = encode_body(encode_query(fields.iter().copied()).as_bytes());
    let ss1 = sign(&data, sign_key);
    let private_key = RsaPrivateKey::from_pkcs8_pem(keys::TEST_PRIVATE_KEY_PEM).expect("Test private key is invalid");
    let signature = private_key
        .sign(Pkcs1v15Sign::new::<Sha1>(), &Sha1::digest(data.as_bytes()))
        .expect("Failed to sign test notification");
    InboundNotification::new(data, ss1, encode_body(&signature))
}

/// A provider callback reporting that `payamount` minor units were paid for the order.
pub fn payment_notification(project_id: &str, order_id: &str, payamount: i64) -> InboundNotification {
    let payamount = payamount.to_string();
    sign_notification(
        &[
            ("projectid", project_id),
            ("orderid", order_id),
            ("amount", payamount.as_str()),
            ("payamount", payamount.as_str()),
            ("currency", "EUR"),
            ("paycurrency", "EUR"),
            ("status", "1"),
            ("test", "1"),
        ],
        TEST_SIGN_KEY,
    )
}

pub fn sample_order(number: &str, total: i64) -> OrderSnapshot {
    OrderSnapshot::new(number, MinorUnits::from(total), "EUR").with_bill_address(BillingAddress {
        firstname: "John".into(),
        lastname: "Doe".into(),
        address1: "10 Lovely Street".into(),
        address2: Some("Northwest".into()),
        city: "Herndon".into(),
        zipcode: "35005".into(),
    })
}
