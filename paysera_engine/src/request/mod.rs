//! Outbound payment requests: field assembly, schema validation, signing and the redirect URL.
mod builder;
mod schema;

pub use builder::{PaymentRequest, RequestBuilder, RequestFields};
pub use schema::{validate_fields, FieldRule, FIELD_SCHEMA};
