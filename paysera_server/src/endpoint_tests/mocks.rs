use mockall::mock;
use paysera_engine::{
    traits::{KeySourceError, PublicKeySource},
    ProviderPublicKey,
};

mock! {
    pub KeySource {}
    impl PublicKeySource for KeySource {
        async fn public_key(&self) -> Result<ProviderPublicKey, KeySourceError>;
    }
}
