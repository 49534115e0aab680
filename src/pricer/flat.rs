//! A complete pricing environment built from flat curves.
//!
//! Each currency has one continuously-compounded zero rate and each index one
//! forward rate, so every curve has a single parameter. Fixings dated before
//! the valuation date come from the historical series; a missing past fixing
//! is an error, never a forecast. Time is measured ACT/365F from the valuation
//! date.

use crate::core::currency::{CurrencyCode, FxError, FxRateTable};
use crate::core::index::{FxIndex, Index, IborIndex, OvernightIndex};
use crate::pricer::environment::{PricingEnvironment, UnsupportedQueryError};
use crate::pricer::sensitivity::{
    CurveName, CurveParameterSensitivity, PointSensitivities, PointSensitivity,
    PointSensitivityBuilder,
};
use crate::pricer::timeseries::FixingSeries;
use chrono::NaiveDate;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Curve name used for discounting in [`CurveParameterSensitivity`].
pub const DISCOUNT_CURVE: &str = "discount";

const DAYS_PER_YEAR: f64 = 365.0;
const OVERNIGHT_DAYS_PER_YEAR: f64 = 360.0;

/// One FX quote: 1 `base` = `rate` `counter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxQuote {
    pub base: CurrencyCode,
    pub counter: CurrencyCode,
    pub rate: f64,
}

/// Market data for a [`FlatPricingEnvironment`].
///
/// Indices are keyed by name. Fixings of an FX index are quoted in the
/// direction of the index pair. Only `valuation_date` is required when
/// deserialising; every market data table may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatEnvironmentConfig {
    pub valuation_date: NaiveDate,
    /// Continuously-compounded zero rate per currency.
    #[serde(default)]
    pub zero_rates: BTreeMap<CurrencyCode, f64>,
    /// Flat forward rate per ibor or overnight index.
    #[serde(default)]
    pub index_rates: BTreeMap<String, f64>,
    #[serde(default)]
    pub fx_quotes: Vec<FxQuote>,
    #[serde(default)]
    pub fixings: BTreeMap<String, FixingSeries>,
}

#[derive(Debug, Clone)]
pub struct FlatPricingEnvironment {
    valuation_date: NaiveDate,
    zero_rates: BTreeMap<CurrencyCode, f64>,
    index_rates: BTreeMap<String, f64>,
    fx_rates: FxRateTable,
    fixings: BTreeMap<String, FixingSeries>,
}

fn refuse<T>(query: &'static str, reason: String) -> Result<T, UnsupportedQueryError> {
    debug!("refusing {}: {}", query, reason);
    Err(UnsupportedQueryError::new(query, reason))
}

impl FlatPricingEnvironment {
    pub fn new(config: FlatEnvironmentConfig) -> Result<Self, FxError> {
        let mut fx_rates = FxRateTable::new();
        for quote in config.fx_quotes {
            fx_rates.set_rate(quote.base, quote.counter, quote.rate)?;
        }
        debug!(
            "flat environment at {}: {} discount curves, {} index curves, {} FX quotes",
            config.valuation_date,
            config.zero_rates.len(),
            config.index_rates.len(),
            fx_rates.len() / 2
        );
        Ok(Self {
            valuation_date: config.valuation_date,
            zero_rates: config.zero_rates,
            index_rates: config.index_rates,
            fx_rates,
            fixings: config.fixings,
        })
    }

    fn year_fraction(&self, date: NaiveDate) -> f64 {
        (date - self.valuation_date).num_days() as f64 / DAYS_PER_YEAR
    }

    fn zero_rate(&self, query: &'static str, currency: &CurrencyCode) -> Result<f64, UnsupportedQueryError> {
        match self.zero_rates.get(currency) {
            Some(rate) => Ok(*rate),
            None => refuse(query, format!("no discount curve for {currency}")),
        }
    }

    fn forward_rate(&self, query: &'static str, name: &str) -> Result<f64, UnsupportedQueryError> {
        match self.index_rates.get(name) {
            Some(rate) => Ok(*rate),
            None => refuse(query, format!("no forward curve for {name}")),
        }
    }

    fn fixing(&self, query: &'static str, name: &str, date: NaiveDate) -> Option<Result<f64, UnsupportedQueryError>> {
        let fixing = self.fixings.get(name).and_then(|series| series.get(date));
        match (fixing, date < self.valuation_date) {
            (Some(value), _) => Some(Ok(value)),
            (None, true) => Some(refuse(query, format!("no fixing for {name} on {date}"))),
            (None, false) => None,
        }
    }

    /// Fixed rate if known (mandatory before the valuation date), forward rate otherwise.
    fn index_rate(&self, query: &'static str, name: &str, fixing_date: NaiveDate) -> Result<f64, UnsupportedQueryError> {
        trace!("{} {} {}", query, name, fixing_date);
        match self.fixing(query, name, fixing_date) {
            Some(result) => result,
            None => self.forward_rate(query, name),
        }
    }

    fn is_fixed(&self, name: &str, fixing_date: NaiveDate) -> bool {
        fixing_date < self.valuation_date
            || (fixing_date == self.valuation_date
                && self.fixings.get(name).and_then(|s| s.get(fixing_date)).is_some())
    }
}

impl PricingEnvironment for FlatPricingEnvironment {
    fn valuation_date(&self) -> Result<NaiveDate, UnsupportedQueryError> {
        Ok(self.valuation_date)
    }

    fn time_series(&self, index: &Index) -> Result<FixingSeries, UnsupportedQueryError> {
        match self.fixings.get(index.name()) {
            Some(series) => Ok(series.clone()),
            None => refuse("time_series", format!("no fixings for {index}")),
        }
    }

    fn fx_rate(
        &self,
        base: &CurrencyCode,
        counter: &CurrencyCode,
    ) -> Result<f64, UnsupportedQueryError> {
        trace!("fx_rate {}/{}", base, counter);
        Ok(self.fx_rates.get_rate(base, counter)?)
    }

    fn discount_factor(
        &self,
        currency: &CurrencyCode,
        date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError> {
        let rate = self.zero_rate("discount_factor", currency)?;
        let df = (-rate * self.year_fraction(date)).exp();
        trace!("discount_factor {} {} = {}", currency, date, df);
        Ok(df)
    }

    fn discount_factor_zero_rate_sensitivity(
        &self,
        currency: &CurrencyCode,
        date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError> {
        let df = self.discount_factor(currency, date)?;
        let t = self.year_fraction(date);
        Ok(PointSensitivityBuilder::of(PointSensitivity::ZeroRate {
            currency: currency.clone(),
            date,
            sensitivity: -t * df,
        }))
    }

    fn fx_index_rate(
        &self,
        index: &FxIndex,
        base_currency: &CurrencyCode,
        fixing_date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError> {
        let pair = index.pair();
        let counter = match pair.other(base_currency) {
            Some(counter) => counter,
            None => {
                return refuse(
                    "fx_index_rate",
                    format!("{base_currency} is not part of index {index}"),
                )
            }
        };
        if let Some(fixed) = self.fixing("fx_index_rate", index.name(), fixing_date) {
            let fixed = fixed?;
            return Ok(if base_currency == &pair.base { fixed } else { 1.0 / fixed });
        }
        self.fx_rate(base_currency, counter)
    }

    fn fx_index_rate_sensitivity(
        &self,
        index: &FxIndex,
        base_currency: &CurrencyCode,
        fixing_date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError> {
        if self.is_fixed(index.name(), fixing_date) {
            return Ok(PointSensitivityBuilder::none());
        }
        Ok(PointSensitivityBuilder::of(PointSensitivity::FxIndexRate {
            index: index.clone(),
            reference_currency: base_currency.clone(),
            fixing_date,
            sensitivity: 1.0,
        }))
    }

    fn ibor_index_rate(
        &self,
        index: &IborIndex,
        fixing_date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError> {
        self.index_rate("ibor_index_rate", index.name(), fixing_date)
    }

    fn ibor_index_rate_sensitivity(
        &self,
        index: &IborIndex,
        fixing_date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError> {
        if self.is_fixed(index.name(), fixing_date) {
            return Ok(PointSensitivityBuilder::none());
        }
        Ok(PointSensitivityBuilder::of(PointSensitivity::IborRate {
            index: index.clone(),
            fixing_date,
            currency: index.currency().clone(),
            sensitivity: 1.0,
        }))
    }

    fn overnight_index_rate(
        &self,
        index: &OvernightIndex,
        fixing_date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError> {
        self.index_rate("overnight_index_rate", index.name(), fixing_date)
    }

    fn overnight_index_rate_sensitivity(
        &self,
        index: &OvernightIndex,
        fixing_date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError> {
        if self.is_fixed(index.name(), fixing_date) {
            return Ok(PointSensitivityBuilder::none());
        }
        let end_date = fixing_date.succ_opt().unwrap_or(fixing_date);
        Ok(PointSensitivityBuilder::of(PointSensitivity::OvernightRate {
            index: index.clone(),
            fixing_date,
            end_date,
            currency: index.currency().clone(),
            sensitivity: 1.0,
        }))
    }

    /// Daily compounding, ACT/360, of fixings and forward rates over the period.
    fn overnight_index_rate_period(
        &self,
        index: &OvernightIndex,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<f64, UnsupportedQueryError> {
        if end_date <= start_date {
            return refuse(
                "overnight_index_rate_period",
                format!("empty period {start_date} to {end_date}"),
            );
        }
        let mut factor = 1.0;
        for day in start_date.iter_days().take_while(|d| *d < end_date) {
            let rate = self.index_rate("overnight_index_rate_period", index.name(), day)?;
            factor *= 1.0 + rate / OVERNIGHT_DAYS_PER_YEAR;
        }
        let days = (end_date - start_date).num_days() as f64;
        Ok((factor - 1.0) * OVERNIGHT_DAYS_PER_YEAR / days)
    }

    fn overnight_index_rate_period_sensitivity(
        &self,
        index: &OvernightIndex,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PointSensitivityBuilder, UnsupportedQueryError> {
        if end_date <= self.valuation_date {
            return Ok(PointSensitivityBuilder::none());
        }
        Ok(PointSensitivityBuilder::of(PointSensitivity::OvernightRate {
            index: index.clone(),
            fixing_date: start_date.max(self.valuation_date),
            end_date,
            currency: index.currency().clone(),
            sensitivity: 1.0,
        }))
    }

    /// Each flat curve has a single parameter, its rate, so a point sensitivity
    /// maps one-to-one onto that parameter. FX points have no curve here and
    /// are left out.
    fn parameter_sensitivity(
        &self,
        point_sensitivities: &PointSensitivities,
    ) -> Result<CurveParameterSensitivity, UnsupportedQueryError> {
        let mut result = CurveParameterSensitivity::new();
        for point in point_sensitivities.normalized().points() {
            match point {
                PointSensitivity::ZeroRate {
                    currency,
                    sensitivity,
                    ..
                } => {
                    self.zero_rate("parameter_sensitivity", currency)?;
                    result.add(CurveName::new(DISCOUNT_CURVE, currency.clone()), &[*sensitivity]);
                }
                PointSensitivity::IborRate {
                    index,
                    currency,
                    sensitivity,
                    ..
                } => {
                    self.forward_rate("parameter_sensitivity", index.name())?;
                    result.add(CurveName::new(index.name(), currency.clone()), &[*sensitivity]);
                }
                PointSensitivity::OvernightRate {
                    index,
                    currency,
                    sensitivity,
                    ..
                } => {
                    self.forward_rate("parameter_sensitivity", index.name())?;
                    result.add(CurveName::new(index.name(), currency.clone()), &[*sensitivity]);
                }
                PointSensitivity::FxIndexRate { index, .. } => {
                    trace!("no curve parameters for FX index {}", index);
                }
            }
        }
        Ok(result)
    }

    fn relative_time(&self, date: NaiveDate) -> Result<f64, UnsupportedQueryError> {
        Ok(self.year_fraction(date))
    }
}
