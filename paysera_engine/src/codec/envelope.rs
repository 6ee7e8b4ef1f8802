use md5::{Digest, Md5};
use paysera_common::Secret;
use serde::{Deserialize, Serialize};

use crate::errors::PayseraError;

/// Standard base64 (with padding) using `-` and `_` in place of `+` and `/`. No line breaks are emitted.
pub fn encode_body(raw: &[u8]) -> String {
    base64::encode(raw).replace('+', "-").replace('/', "_")
}

/// Reverses [`encode_body`]. Line breaks in the input are ignored.
pub fn decode_body(s: &str) -> Result<Vec<u8>, PayseraError> {
    let standard = s.chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect::<String>();
    base64::decode(standard).map_err(|e| PayseraError::DecodeError(format!("Invalid base64 body. {e}")))
}

/// Lower-case hex MD5 of `body` immediately followed by `secret`.
///
/// MD5 is what the provider verifies against; it is not a choice this gateway gets to make.
pub fn sign<B: AsRef<[u8]>>(body: B, secret: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(body.as_ref());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// The `data`/`sign` pair sent with an outbound payment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    pub data: String,
    pub signature: String,
}

impl SignedEnvelope {
    /// Encodes a canonical query and signs the encoded form with the merchant's sign key.
    pub fn seal(canonical_query: &str, sign_key: &Secret<String>) -> Self {
        let data = encode_body(canonical_query.as_bytes());
        let signature = sign(&data, sign_key.reveal());
        Self { data, signature }
    }

    /// The query fragment `data=…&sign=…` that is appended to the provider URL.
    pub fn as_query(&self) -> String {
        crate::codec::encode_query([("data", self.data.as_str()), ("sign", self.signature.as_str())])
    }
}
