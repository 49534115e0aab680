use crate::core::currency::{CurrencyCode, FxError};
use crate::core::index::{FxIndex, Index, IborIndex, OvernightIndex};
use crate::pricer::sensitivity::{CurveParameterSensitivity, PointSensitivities, PointSensitivityBuilder};
use crate::pricer::timeseries::FixingSeries;
use chrono::NaiveDate;
use thiserror::Error;

/// The environment could not answer a query, typically because the curve,
/// quote or fixing it needs is missing. Fatal for the computation that asked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported query {query}: {reason}")]
pub struct UnsupportedQueryError {
    pub query: &'static str,
    pub reason: String,
}

impl UnsupportedQueryError {
    pub fn new(query: &'static str, reason: impl Into<String>) -> Self {
        Self {
            query,
            reason: reason.into(),
        }
    }
}

impl From<FxError> for UnsupportedQueryError {
    fn from(err: FxError) -> Self {
        UnsupportedQueryError::new("fx_rate", err.to_string())
    }
}

/// The market data a pricer needs, behind one query surface.
///
/// Implementations must be free of side effects, so a single environment can
/// be shared across threads and queried in any order. Nothing is cached here;
/// an implementation may cache internally.
///
/// Every query returns [`UnsupportedQueryError`] when the environment does not
/// hold the data to answer it.
pub trait PricingEnvironment {
    /// The date all values are computed as of.
    fn valuation_date(&self) -> Result<NaiveDate, UnsupportedQueryError>;

    /// Past fixings of `index`.
    fn time_series(&self, index: &Index) -> Result<FixingSeries, UnsupportedQueryError>;

    /// Units of `counter` per unit of `base`; exactly 1 when the currencies are equal.
    fn fx_rate(
        &self,
        base: &CurrencyCode,
        counter: &CurrencyCode,
    ) -> Result<f64, UnsupportedQueryError>;

    fn discount_factor(
        &self,
        currency: &CurrencyCode,
        date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError>;

    /// Sensitivity of [`discount_factor`](Self::discount_factor) to the zero rate at `date`.
    fn discount_factor_zero_rate_sensitivity(
        &self,
        currency: &CurrencyCode,
        date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError>;

    /// The FX rate converting `base_currency` into the other currency of the
    /// index, as fixed (or forecast) on `fixing_date`.
    fn fx_index_rate(
        &self,
        index: &FxIndex,
        base_currency: &CurrencyCode,
        fixing_date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError>;

    fn fx_index_rate_sensitivity(
        &self,
        index: &FxIndex,
        base_currency: &CurrencyCode,
        fixing_date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError>;

    fn ibor_index_rate(
        &self,
        index: &IborIndex,
        fixing_date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError>;

    fn ibor_index_rate_sensitivity(
        &self,
        index: &IborIndex,
        fixing_date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError>;

    fn overnight_index_rate(
        &self,
        index: &OvernightIndex,
        fixing_date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError>;

    fn overnight_index_rate_sensitivity(
        &self,
        index: &OvernightIndex,
        fixing_date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError>;

    /// The overnight rate over `[start_date, end_date)`, as a single period rate.
    fn overnight_index_rate_period(
        &self,
        index: &OvernightIndex,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError>;

    fn overnight_index_rate_period_sensitivity(
        &self,
        index: &OvernightIndex,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError>;

    /// Map point sensitivities onto the parameters of the environment's curves.
    fn parameter_sensitivity(
        &self,
        point_sensitivities: &PointSensitivities,
    ) -> Result<CurveParameterSensitivity, UnsupportedQueryError>;

    /// Year fraction from the valuation date to `date`; negative for past dates.
    fn relative_time(&self, date: NaiveDate) -> Result<f64, UnsupportedQueryError>;
}
