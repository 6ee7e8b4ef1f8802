mod paysera_world;
mod setups;
mod steps;

pub use paysera_world::{PayseraWorld, PaymentSystem};
