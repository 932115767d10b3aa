//! Reverse electricity-bill calculator and solar quotation engine.
//!
//! Starting from a monthly bill amount, the crate recovers the usage behind
//! it, then sizes a solar array, projects net billing, and prices and
//! finances the system.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod finance;
pub mod io;
pub mod quote;
pub mod rounding;
pub mod solar;
pub mod tariff;
