//! Solar array sizing and net-billing projection.

/// Day/night split with capped export credit.
pub mod net_billing;
/// Panel count, capacity and system price lookup.
pub mod sizing;

pub use net_billing::{NetBillingProjector, NetBillingResult};
pub use sizing::{SolarConfiguration, SolarSizer, peak_sun_hour_options, self_consumption_options};
