//! Byte-exact encodings shared by outbound requests and inbound notifications.
//!
//! Both directions hash the same textual forms, so any change to escaping, ordering or base64 alphabet here changes
//! every signature the gateway produces or accepts.
mod canonical;
mod envelope;

pub use canonical::{encode_query, escape, parse_query, unescape, unescape_bytes};
pub use envelope::{decode_body, encode_body, sign, SignedEnvelope};
