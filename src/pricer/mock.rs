//! A pricing environment that only knows one FX rate.
//!
//! Lets pricing formulas that need currency conversion be tested without any
//! curve data: every query other than [`PricingEnvironment::fx_rate`] is refused.

use crate::core::currency::CurrencyCode;
use crate::core::index::{FxIndex, Index, IborIndex, OvernightIndex};
use crate::pricer::environment::{PricingEnvironment, UnsupportedQueryError};
use crate::pricer::sensitivity::{CurveParameterSensitivity, PointSensitivities, PointSensitivityBuilder};
use crate::pricer::timeseries::FixingSeries;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockFxPricingEnvironment {
    rate: f64,
}

impl MockFxPricingEnvironment {
    /// The rate returned by [`Default`].
    pub const RATE: f64 = 1.6;

    /// Quote `rate` for every pair of distinct currencies.
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Default for MockFxPricingEnvironment {
    fn default() -> Self {
        Self::new(Self::RATE)
    }
}

fn unsupported<T>(query: &'static str) -> Result<T, UnsupportedQueryError> {
    Err(UnsupportedQueryError::new(query, "mock environment only quotes FX rates"))
}

impl PricingEnvironment for MockFxPricingEnvironment {
    fn valuation_date(&self) -> Result<NaiveDate, UnsupportedQueryError> {
        unsupported("valuation_date")
    }

    fn time_series(&self, _index: &Index) -> Result<FixingSeries, UnsupportedQueryError> {
        unsupported("time_series")
    }

    fn fx_rate(
        &self,
        base: &CurrencyCode,
        counter: &CurrencyCode,
    ) -> Result<f64, UnsupportedQueryError> {
        Ok(if base == counter { 1.0 } else { self.rate })
    }

    fn discount_factor(
        &self,
        _currency: &CurrencyCode,
        _date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError> {
        unsupported("discount_factor")
    }

    fn discount_factor_zero_rate_sensitivity(
        &self,
        _currency: &CurrencyCode,
        _date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError> {
        unsupported("discount_factor_zero_rate_sensitivity")
    }

    fn fx_index_rate(
        &self,
        _index: &FxIndex,
        _base_currency: &CurrencyCode,
        _fixing_date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError> {
        unsupported("fx_index_rate")
    }

    fn fx_index_rate_sensitivity(
        &self,
        _index: &FxIndex,
        _base_currency: &CurrencyCode,
        _fixing_date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError> {
        unsupported("fx_index_rate_sensitivity")
    }

    fn ibor_index_rate(
        &self,
        _index: &IborIndex,
        _fixing_date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError> {
        unsupported("ibor_index_rate")
    }

    fn ibor_index_rate_sensitivity(
        &self,
        _index: &IborIndex,
        _fixing_date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError> {
        unsupported("ibor_index_rate_sensitivity")
    }

    fn overnight_index_rate(
        &self,
        _index: &OvernightIndex,
        _fixing_date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError> {
        unsupported("overnight_index_rate")
    }

    fn overnight_index_rate_sensitivity(
        &self,
        _index: &OvernightIndex,
        _fixing_date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError> {
        unsupported("overnight_index_rate_sensitivity")
    }

    fn overnight_index_rate_period(
        &self,
        _index: &OvernightIndex,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError> {
        unsupported("overnight_index_rate_period")
    }

    fn overnight_index_rate_period_sensitivity(
        &self,
        _index: &OvernightIndex,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError> {
        unsupported("overnight_index_rate_period_sensitivity")
    }

    fn parameter_sensitivity(
        &self,
        _point_sensitivities: &PointSensitivities,
    ) -> Result<CurveParameterSensitivity, UnsupportedQueryError> {
        unsupported("parameter_sensitivity")
    }

    fn relative_time(&self, _date: NaiveDate) -> Result<f64, UnsupportedQueryError> {
        unsupported("relative_time")
    }
}
