//! # swap-leg-engine
//!
//! Expansion of rate swap legs into explicit cashflows, and the market data
//! contract their pricers work against.
//!
//! A [`SwapLegDefinition`](swap::leg::SwapLegDefinition) holds fully specified
//! payment periods plus flags saying where notional is exchanged. Expanding it
//! adjusts payment dates to business days and derives the notional exchange
//! events, giving an [`ExpandedSwapLeg`](swap::leg::ExpandedSwapLeg).
//!
//! ## Architecture
//!
//! - **core**: currencies, FX rates, indices, holiday calendars and business day adjustment
//! - **swap**: payment periods, payment events, leg definitions and expansion
//! - **pricer**: the `PricingEnvironment` trait, sensitivities, a mock and a flat environment

pub mod core;
pub mod pricer;
pub mod swap;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::adjustment::{BusinessDayAdjustment, BusinessDayConvention, HolidayCalendar};
    pub use crate::core::currency::{CurrencyAmount, CurrencyCode, CurrencyPair};
    pub use crate::core::index::{FxIndex, IborIndex, OvernightIndex};
    pub use crate::pricer::environment::{PricingEnvironment, UnsupportedQueryError};
    pub use crate::pricer::flat::{FlatEnvironmentConfig, FlatPricingEnvironment};
    pub use crate::pricer::mock::MockFxPricingEnvironment;
    pub use crate::swap::error::{ExpansionError, ValidationError};
    pub use crate::swap::event::PaymentEvent;
    pub use crate::swap::leg::{ExpandedSwapLeg, SwapLeg, SwapLegDefinition};
    pub use crate::swap::observation::RateObservation;
    pub use crate::swap::period::{FxReset, RateAccrualPeriod, RatePaymentPeriod};
}
