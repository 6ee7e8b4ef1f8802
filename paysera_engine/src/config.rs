use log::*;
use paysera_common::{helpers::{chomp_slash, parse_boolean_flag}, Secret};

use crate::errors::PayseraError;

pub const DEFAULT_SERVICE_URL: &str = "https://www.paysera.lt/pay/?";
pub const DEFAULT_API_VERSION: &str = "1.6";
pub const DEFAULT_PAYTEXT: &str = "Payment";
pub const DEFAULT_DOMAIN_NAME: &str = "http://localhost:8380";

/// The merchant's Paysera project settings. The engine only ever reads these.
#[derive(Debug, Clone)]
pub struct MerchantConfig {
    /// Numeric project id issued by Paysera.
    pub project_id: String,
    /// The project password used for `sign`/`ss1` digests.
    pub sign_key: Secret<String>,
    /// Protocol version, `major.minor`.
    pub api_version: String,
    /// The provider URL prefix that the encoded query is appended to. It should end in `?`.
    pub service_url: String,
    /// Public base URL of the store. Callback, accept and cancel URLs are built from it.
    pub domain_name: String,
    pub test_mode: bool,
    /// Text shown to the buyer on the payment page. Blank means [`DEFAULT_PAYTEXT`].
    pub message_text: Option<String>,
}

impl Default for MerchantConfig {
    fn default() -> Self {
        Self {
            project_id: String::default(),
            sign_key: Secret::default(),
            api_version: DEFAULT_API_VERSION.to_string(),
            service_url: DEFAULT_SERVICE_URL.to_string(),
            domain_name: DEFAULT_DOMAIN_NAME.to_string(),
            test_mode: false,
            message_text: None,
        }
    }
}

impl MerchantConfig {
    pub fn new_from_env_or_default() -> Self {
        let project_id = std::env::var("PAYSERA_PROJECT_ID").unwrap_or_else(|_| {
            error!("🪛️ PAYSERA_PROJECT_ID is not set. Payment notifications will be rejected until it is.");
            String::default()
        });
        let sign_key = Secret::new(std::env::var("PAYSERA_SIGN_KEY").unwrap_or_else(|_| {
            error!("🪛️ PAYSERA_SIGN_KEY is not set. Payment notifications will be rejected until it is.");
            String::default()
        }));
        let api_version = std::env::var("PAYSERA_API_VERSION").unwrap_or_else(|_| {
            info!("🪛️ PAYSERA_API_VERSION not set, using {DEFAULT_API_VERSION} as default");
            DEFAULT_API_VERSION.to_string()
        });
        let service_url = std::env::var("PAYSERA_SERVICE_URL").unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string());
        let domain_name = std::env::var("PAYSERA_DOMAIN_NAME").unwrap_or_else(|_| {
            warn!("🪛️ PAYSERA_DOMAIN_NAME not set, using (probably useless) default {DEFAULT_DOMAIN_NAME}");
            DEFAULT_DOMAIN_NAME.to_string()
        });
        let test_mode = parse_boolean_flag(std::env::var("PAYSERA_TEST_MODE").ok(), false);
        if test_mode {
            warn!("🪛️ Paysera test mode is ON. No real money will change hands.");
        }
        let message_text = std::env::var("PAYSERA_MESSAGE_TEXT").ok().filter(|s| !s.trim().is_empty());
        Self { project_id, sign_key, api_version, service_url, domain_name, test_mode, message_text }
    }

    /// Notifications cannot be authenticated without the sign key, nor attributed without the project id.
    pub fn ensure_configured(&self) -> Result<(), PayseraError> {
        if self.sign_key.is_blank() {
            return Err(PayseraError::ConfigurationError("sign_password not found".into()));
        }
        if self.project_id.trim().is_empty() {
            return Err(PayseraError::ConfigurationError("projectid not found".into()));
        }
        Ok(())
    }

    pub fn callback_url(&self) -> String {
        format!("{}/paysera/callback", chomp_slash(&self.domain_name))
    }

    pub fn accept_url(&self) -> String {
        format!("{}/paysera/confirm", chomp_slash(&self.domain_name))
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/paysera/cancel", chomp_slash(&self.domain_name))
    }

    pub fn pay_text(&self) -> &str {
        self.message_text.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or(DEFAULT_PAYTEXT)
    }
}
