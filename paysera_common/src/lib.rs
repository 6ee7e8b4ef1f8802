//! Types shared by the Paysera gateway crates.
//!
//! * [`MinorUnits`] is the only money representation used for comparisons. Amounts are integers in the smallest
//!   currency unit (cents for EUR), so there is no floating point anywhere in the payment path.
//! * [`Secret`] wraps credentials so that they never end up in logs.
mod minor_units;

pub mod helpers;
pub mod op;
mod secret;

pub use minor_units::{MinorUnits, MinorUnitsConversionError, MINOR_UNITS_PER_MAJOR};
pub use secret::Secret;
