use std::collections::BTreeMap;

use log::*;
use serde::Serialize;

use crate::{
    codec::{encode_query, SignedEnvelope},
    config::MerchantConfig,
    db_types::OrderSnapshot,
    errors::PayseraError,
    request::validate_fields,
};

/// Request field name to value. The canonical query sorts the pairs itself, so map order carries no meaning.
pub type RequestFields = BTreeMap<String, String>;

/// A validated, signed payment request, ready to send the buyer to.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub fields: RequestFields,
    pub envelope: SignedEnvelope,
    pub redirect_url: String,
}

/// Turns merchant settings and an order into a signed redirect to the provider's payment page.
///
/// Building is pure computation: nothing is sent anywhere, and a failed build never yields a URL.
pub struct RequestBuilder<'a> {
    config: &'a MerchantConfig,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a MerchantConfig) -> Self {
        Self { config }
    }

    /// Validates, signs and wraps up a request for the given order.
    pub fn build(&self, order: &OrderSnapshot) -> Result<PaymentRequest, PayseraError> {
        let fields = self.fields_for(order);
        let (envelope, redirect_url) = self.sign_fields(&fields)?;
        debug!("💳️ Payment request for order {} built for {}", order.number, order.total);
        Ok(PaymentRequest { fields, envelope, redirect_url })
    }

    /// Gateway fields from the merchant configuration merged with the order's own fields. No validation is done here.
    pub fn fields_for(&self, order: &OrderSnapshot) -> RequestFields {
        let config = self.config;
        let mut fields = RequestFields::new();
        let mut put = |k: &str, v: String| {
            fields.insert(k.to_string(), v);
        };
        put("version", config.api_version.clone());
        put("projectid", config.project_id.clone());
        put("callbackurl", config.callback_url());
        put("accepturl", config.accept_url());
        put("cancelurl", config.cancel_url());
        put("paytext", config.pay_text().to_string());
        put("test", if config.test_mode { "1" } else { "0" }.to_string());
        put("orderid", order.number.clone());
        put("amount", order.total.value().to_string());
        put("currency", order.currency.clone());
        if let Some(address) = &order.bill_address {
            put("p_firstname", address.firstname.clone());
            put("p_lastname", address.lastname.clone());
            put("p_street", address.street());
            put("p_city", address.city.clone());
            put("p_zip", address.zipcode.clone());
        }
        fields
    }

    /// Validates the fields, then encodes and signs the canonical query. Returns the envelope and the full redirect
    /// URL, `<service_url>data=…&sign=…`.
    pub fn sign_fields(&self, fields: &RequestFields) -> Result<(SignedEnvelope, String), PayseraError> {
        if self.config.sign_key.is_blank() {
            return Err(PayseraError::ConfigurationError("sign_password not found".into()));
        }
        validate_fields(fields).map_err(|e| {
            warn!("💳️ Refusing to sign payment request. {e}");
            e
        })?;
        let canonical = encode_query(fields);
        trace!("💳️ Canonical request: {canonical}");
        let envelope = SignedEnvelope::seal(&canonical, &self.config.sign_key);
        let url = format!("{}{}", self.config.service_url, envelope.as_query());
        Ok((envelope, url))
    }
}
