//! The provider's RSA public key, used to check `ss2`.
//!
//! Paysera publishes its key as a PEM-encoded X.509 certificate. A bare `PUBLIC KEY` (SPKI) PEM block is accepted
//! too, so that a key can be pinned in configuration.
use rsa::{pkcs8::DecodePublicKey, Pkcs1v15Sign, RsaPublicKey};
use sha1::{Digest, Sha1};
use thiserror::Error;
use x509_cert::{
    der::{Decode, DecodePem, Encode},
    Certificate,
};

#[derive(Debug, Clone, Error)]
#[error("Invalid provider public key: {0}")]
pub struct PublicKeyError(String);

impl From<String> for PublicKeyError {
    fn from(e: String) -> Self {
        Self(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderPublicKey(RsaPublicKey);

impl ProviderPublicKey {
    pub fn new(key: RsaPublicKey) -> Self {
        Self(key)
    }

    pub fn from_pem(pem: &str) -> Result<Self, PublicKeyError> {
        if pem.contains("-----BEGIN CERTIFICATE-----") {
            let cert = Certificate::from_pem(pem.trim().as_bytes())
                .map_err(|e| format!("Could not read certificate PEM. {e}"))?;
            Self::from_certificate(&cert)
        } else {
            RsaPublicKey::from_public_key_pem(pem.trim())
                .map(Self)
                .map_err(|e| PublicKeyError(format!("Could not read public key PEM. {e}")))
        }
    }

    pub fn from_certificate_der(der: &[u8]) -> Result<Self, PublicKeyError> {
        let cert = Certificate::from_der(der).map_err(|e| format!("Could not read DER certificate. {e}"))?;
        Self::from_certificate(&cert)
    }

    fn from_certificate(cert: &Certificate) -> Result<Self, PublicKeyError> {
        let spki = cert
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| format!("Could not encode the certificate's public key. {e}"))?;
        RsaPublicKey::from_public_key_der(&spki)
            .map(Self)
            .map_err(|e| PublicKeyError(format!("Certificate does not hold an RSA public key. {e}")))
    }

    /// Checks a PKCS#1 v1.5 RSA signature over the SHA-1 digest of `message`.
    pub fn verify_sha1(&self, message: &[u8], signature: &[u8]) -> bool {
        let digest = Sha1::digest(message);
        self.0.verify(Pkcs1v15Sign::new::<Sha1>(), &digest, signature).is_ok()
    }

    pub fn as_rsa(&self) -> &RsaPublicKey {
        &self.0
    }
}
