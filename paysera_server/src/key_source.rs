//! Downloads Paysera's signing certificate and keeps the public key around for a while.
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::*;
use paysera_engine::{
    traits::{KeySourceError, PublicKeySource},
    ProviderPublicKey,
};
use reqwest::Client;
use tokio::sync::RwLock;

use crate::{config::PublicKeyConfig, errors::ServerError};

#[derive(Debug, Clone)]
struct CachedKey {
    key: ProviderPublicKey,
    fetched_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct CertificateKeySource {
    url: String,
    cache_ttl: Duration,
    client: Arc<Client>,
    cache: Arc<RwLock<Option<CachedKey>>>,
}

impl CertificateKeySource {
    pub fn new(config: &PublicKeyConfig) -> Result<Self, ServerError> {
        let timeout = config
            .timeout
            .to_std()
            .map_err(|e| ServerError::ConfigurationError(format!("Invalid public key fetch timeout. {e}")))?;
        let client =
            Client::builder().timeout(timeout).build().map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Ok(Self {
            url: config.url.clone(),
            cache_ttl: config.cache_ttl,
            client: Arc::new(client),
            cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn cached_key(&self) -> Option<ProviderPublicKey> {
        let cache = self.cache.read().await;
        cache.as_ref().filter(|c| Utc::now() - c.fetched_at < self.cache_ttl).map(|c| c.key.clone())
    }

    async fn fetch(&self) -> Result<ProviderPublicKey, KeySourceError> {
        debug!("🔐️ Fetching provider certificate from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| KeySourceError::FetchError(e.to_string()))?;
        let body = response.bytes().await.map_err(|e| KeySourceError::FetchError(e.to_string()))?;
        let key = match std::str::from_utf8(&body) {
            Ok(pem) if pem.contains("-----BEGIN") => ProviderPublicKey::from_pem(pem),
            _ => ProviderPublicKey::from_certificate_der(&body),
        }
        .map_err(|e| KeySourceError::InvalidKey(e.to_string()))?;
        info!("🔐️ Provider public key refreshed from {}", self.url);
        Ok(key)
    }

    #[cfg(test)]
    async fn seed(&self, key: ProviderPublicKey, fetched_at: DateTime<Utc>) {
        *self.cache.write().await = Some(CachedKey { key, fetched_at });
    }
}

impl PublicKeySource for CertificateKeySource {
    async fn public_key(&self) -> Result<ProviderPublicKey, KeySourceError> {
        if let Some(key) = self.cached_key().await {
            trace!("🔐️ Using cached provider key");
            return Ok(key);
        }
        let key = self.fetch().await.map_err(|e| {
            warn!("🔐️ {e}");
            e
        })?;
        *self.cache.write().await = Some(CachedKey { key: key.clone(), fetched_at: Utc::now() });
        Ok(key)
    }
}
