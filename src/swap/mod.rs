//! Swap leg definitions and their expansion into resolved cashflows.

pub mod error;
pub mod event;
pub mod leg;
pub mod notional;
pub mod observation;
pub mod period;
