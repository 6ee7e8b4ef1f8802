//! # Paysera payment server
//! Exposes the Paysera payment flow over HTTP. It is responsible for:
//! Sending buyers to the Paysera payment page with a signed payment request.
//! Verifying Paysera's payment notifications and settling the matching order.
//! Returning the buyer to the store with a notice or an alert.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/paysera/checkout/{order_number}`: Redirects the buyer to the payment page.
//! * `/paysera/callback`: Paysera's server-to-server payment notification.
//! * `/paysera/confirm`: The buyer's return from a completed payment.
//! * `/paysera/cancel`: The buyer's return from a canceled payment.

pub mod cli;
pub mod config;
pub mod errors;
pub mod key_source;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
