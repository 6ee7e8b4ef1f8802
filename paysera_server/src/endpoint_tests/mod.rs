mod helpers;
mod mocks;
mod paysera;
