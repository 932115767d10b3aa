//! Quote export formats.

pub mod export;
