//! Market data access and valuation of expanded legs.

pub mod environment;
pub mod event;
pub mod flat;
pub mod mock;
pub mod sensitivity;
pub mod timeseries;
