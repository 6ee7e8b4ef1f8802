use thiserror::Error;

use crate::response::ProviderPublicKey;

#[derive(Debug, Clone, Error)]
pub enum KeySourceError {
    #[error("Could not fetch the provider public key. {0}")]
    FetchError(String),
    #[error("The provider public key could not be read. {0}")]
    InvalidKey(String),
}

/// Supplies the key that `ss2` signatures are checked against. Fetching and caching policy belong to the
/// implementation.
#[allow(async_fn_in_trait)]
pub trait PublicKeySource {
    async fn public_key(&self) -> Result<ProviderPublicKey, KeySourceError>;
}
