use std::{env, path::PathBuf};

use chrono::Duration;
use log::*;
use paysera_engine::MerchantConfig;

const DEFAULT_PAYSERA_HOST: &str = "127.0.0.1";
const DEFAULT_PAYSERA_PORT: u16 = 8380;
pub const DEFAULT_PUBLIC_KEY_URL: &str = "https://www.paysera.com/download/public.key";
const DEFAULT_PUBLIC_KEY_TIMEOUT_SECS: i64 = 10;
const DEFAULT_PUBLIC_KEY_CACHE_TTL_MINS: i64 = 60;
const DEFAULT_ACCOUNT_URL: &str = "/account";
const DEFAULT_PRODUCTS_URL: &str = "/products";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// The merchant's Paysera project settings
    pub merchant: MerchantConfig,
    pub public_key: PublicKeyConfig,
    /// Where the buyer lands after returning from the payment page.
    pub account_url: String,
    /// Where the buyer lands after canceling a payment.
    pub products_url: String,
    /// A JSON array of orders to load into the order store on startup.
    pub orders_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct PublicKeyConfig {
    /// Where the provider's certificate is downloaded from.
    pub url: String,
    pub timeout: Duration,
    /// How long a downloaded key is trusted before it is fetched again.
    pub cache_ttl: Duration,
}

impl Default for PublicKeyConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_PUBLIC_KEY_URL.to_string(),
            timeout: Duration::seconds(DEFAULT_PUBLIC_KEY_TIMEOUT_SECS),
            cache_ttl: Duration::minutes(DEFAULT_PUBLIC_KEY_CACHE_TTL_MINS),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PAYSERA_HOST.to_string(),
            port: DEFAULT_PAYSERA_PORT,
            merchant: MerchantConfig::default(),
            public_key: PublicKeyConfig::default(),
            account_url: DEFAULT_ACCOUNT_URL.to_string(),
            products_url: DEFAULT_PRODUCTS_URL.to_string(),
            orders_file: None,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("PAYSERA_HOST").ok().unwrap_or_else(|| DEFAULT_PAYSERA_HOST.into());
        let port = env::var("PAYSERA_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for PAYSERA_PORT. {e} Using the default, {DEFAULT_PAYSERA_PORT}, \
                         instead."
                    );
                    DEFAULT_PAYSERA_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_PAYSERA_PORT);
        let merchant = MerchantConfig::new_from_env_or_default();
        let public_key = PublicKeyConfig::from_env_or_default();
        let account_url = env::var("PAYSERA_ACCOUNT_URL").ok().unwrap_or_else(|| DEFAULT_ACCOUNT_URL.into());
        let products_url = env::var("PAYSERA_PRODUCTS_URL").ok().unwrap_or_else(|| DEFAULT_PRODUCTS_URL.into());
        let orders_file = env::var("PAYSERA_ORDERS_FILE").ok().filter(|s| !s.trim().is_empty()).map(PathBuf::from);
        Self { host, port, merchant, public_key, account_url, products_url, orders_file }
    }
}

impl PublicKeyConfig {
    pub fn from_env_or_default() -> Self {
        let url = env::var("PAYSERA_PUBLIC_KEY_URL").ok().unwrap_or_else(|| DEFAULT_PUBLIC_KEY_URL.into());
        let timeout =
            duration_from_env("PAYSERA_PUBLIC_KEY_TIMEOUT", DEFAULT_PUBLIC_KEY_TIMEOUT_SECS, Duration::seconds);
        let cache_ttl =
            duration_from_env("PAYSERA_PUBLIC_KEY_CACHE_TTL", DEFAULT_PUBLIC_KEY_CACHE_TTL_MINS, Duration::minutes);
        info!("🪛️ Provider public key is read from {url} (timeout {timeout}, cached for {cache_ttl})");
        Self { url, timeout, cache_ttl }
    }
}

fn duration_from_env(var: &str, default: i64, unit: fn(i64) -> Duration) -> Duration {
    let value = env::var(var)
        .map(|s| {
            s.parse::<i64>().ok().filter(|v| *v > 0).unwrap_or_else(|| {
                error!("🪛️ {s} is not a valid value for {var}. Using the default, {default}, instead.");
                default
            })
        })
        .unwrap_or(default);
    unit(value)
}
