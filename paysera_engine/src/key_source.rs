use crate::{
    response::ProviderPublicKey,
    traits::{KeySourceError, PublicKeySource},
};

/// A provider key that is known up front, e.g. pinned in configuration.
#[derive(Debug, Clone)]
pub struct StaticKeySource {
    key: ProviderPublicKey,
}

impl StaticKeySource {
    pub fn new(key: ProviderPublicKey) -> Self {
        Self { key }
    }

    /// Accepts either a certificate or a bare public key, PEM encoded.
    pub fn from_pem(pem: &str) -> Result<Self, KeySourceError> {
        ProviderPublicKey::from_pem(pem).map(Self::new).map_err(|e| KeySourceError::InvalidKey(e.to_string()))
    }
}

impl PublicKeySource for StaticKeySource {
    async fn public_key(&self) -> Result<ProviderPublicKey, KeySourceError> {
        Ok(self.key.clone())
    }
}
