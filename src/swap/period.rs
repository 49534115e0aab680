use crate::core::adjustment::{AdjustmentError, BusinessDayAdjustment};
use crate::core::currency::{CurrencyAmount, CurrencyCode};
use crate::core::index::FxIndex;
use crate::swap::error::ValidationError;
use crate::swap::observation::RateObservation;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A date range over which interest accrues at an observed rate.
///
/// Dates are already business-day adjusted by whoever built the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RateAccrualPeriodData", into = "RateAccrualPeriodData")]
pub struct RateAccrualPeriod {
    start_date: NaiveDate,
    end_date: NaiveDate,
    year_fraction: f64,
    rate_observation: RateObservation,
    gearing: f64,
    spread: f64,
}

impl RateAccrualPeriod {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        year_fraction: f64,
        rate_observation: RateObservation,
    ) -> Result<Self, ValidationError> {
        if end_date < start_date {
            return Err(ValidationError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
            year_fraction,
            rate_observation,
            gearing: 1.0,
            spread: 0.0,
        })
    }

    /// Multiplier applied to the observed rate.
    pub fn with_gearing(mut self, gearing: f64) -> Self {
        self.gearing = gearing;
        self
    }

    /// Spread added to the geared rate.
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn year_fraction(&self) -> f64 {
        self.year_fraction
    }

    pub fn rate_observation(&self) -> &RateObservation {
        &self.rate_observation
    }

    pub fn gearing(&self) -> f64 {
        self.gearing
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }
}

#[derive(Serialize, Deserialize)]
struct RateAccrualPeriodData {
    start_date: NaiveDate,
    end_date: NaiveDate,
    year_fraction: f64,
    rate_observation: RateObservation,
    #[serde(default = "unit_gearing")]
    gearing: f64,
    #[serde(default)]
    spread: f64,
}

fn unit_gearing() -> f64 {
    1.0
}

impl TryFrom<RateAccrualPeriodData> for RateAccrualPeriod {
    type Error = ValidationError;

    fn try_from(data: RateAccrualPeriodData) -> Result<Self, Self::Error> {
        Ok(RateAccrualPeriod::new(
            data.start_date,
            data.end_date,
            data.year_fraction,
            data.rate_observation,
        )?
        .with_gearing(data.gearing)
        .with_spread(data.spread))
    }
}

impl From<RateAccrualPeriod> for RateAccrualPeriodData {
    fn from(period: RateAccrualPeriod) -> Self {
        Self {
            start_date: period.start_date,
            end_date: period.end_date,
            year_fraction: period.year_fraction,
            rate_observation: period.rate_observation,
            gearing: period.gearing,
            spread: period.spread,
        }
    }
}

/// How multiple accrual periods in one payment period combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundingMethod {
    /// Interest from each accrual period is summed.
    #[default]
    None,
    /// Interest including spread is compounded.
    Straight,
    /// Interest is compounded, spread is not.
    Flat,
    /// Interest is compounded on a spread-exclusive basis, spread added at the end.
    SpreadExclusive,
}

/// Redenomination of a period's notional through an FX fixing.
///
/// The notional is agreed in `reference_currency` and converted into the
/// payment currency using `index` as fixed on `fixing_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FxResetData", into = "FxResetData")]
pub struct FxReset {
    pub index: FxIndex,
    pub reference_currency: CurrencyCode,
    pub fixing_date: NaiveDate,
}

impl FxReset {
    pub fn new(index: FxIndex, reference_currency: CurrencyCode, fixing_date: NaiveDate) -> Self {
        Self {
            index,
            reference_currency,
            fixing_date,
        }
    }

    /// The currency the reference notional converts into.
    pub fn settlement_currency(&self) -> Option<&CurrencyCode> {
        self.index.pair().other(&self.reference_currency)
    }

    fn validate(&self, payment_currency: &CurrencyCode) -> Result<(), ValidationError> {
        match self.settlement_currency() {
            Some(settlement) if settlement == payment_currency => Ok(()),
            _ => Err(ValidationError::InvalidFxReset {
                index: self.index.name().to_string(),
                reference: self.reference_currency.clone(),
                payment: payment_currency.clone(),
            }),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct FxResetData {
    index: FxIndex,
    reference_currency: CurrencyCode,
    fixing_date: NaiveDate,
}

impl TryFrom<FxResetData> for FxReset {
    type Error = ValidationError;

    fn try_from(data: FxResetData) -> Result<Self, Self::Error> {
        // the payment currency is only known to the owning period
        if !data.index.pair().contains(&data.reference_currency) {
            return Err(ValidationError::InvalidFxReset {
                index: data.index.name().to_string(),
                reference: data.reference_currency.clone(),
                payment: data.reference_currency,
            });
        }
        Ok(FxReset::new(data.index, data.reference_currency, data.fixing_date))
    }
}

impl From<FxReset> for FxResetData {
    fn from(fx_reset: FxReset) -> Self {
        Self {
            index: fx_reset.index,
            reference_currency: fx_reset.reference_currency,
            fixing_date: fx_reset.fixing_date,
        }
    }
}

/// A single payment made up of one or more accrual periods.
///
/// `notional` is expressed in the payment currency, or in the FX reset's
/// reference currency when an [`FxReset`] is present. Positive notional
/// means the leg receives interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RatePaymentPeriodData", into = "RatePaymentPeriodData")]
pub struct RatePaymentPeriod {
    payment_date: NaiveDate,
    accrual_periods: Vec<RateAccrualPeriod>,
    currency: CurrencyCode,
    notional: Decimal,
    fx_reset: Option<FxReset>,
    compounding: CompoundingMethod,
}

impl RatePaymentPeriod {
    pub fn new(
        payment_date: NaiveDate,
        accrual_periods: Vec<RateAccrualPeriod>,
        currency: CurrencyCode,
        notional: Decimal,
    ) -> Result<Self, ValidationError> {
        if accrual_periods.is_empty() {
            return Err(ValidationError::EmptyAccrualPeriods);
        }
        Ok(Self {
            payment_date,
            accrual_periods,
            currency,
            notional,
            fx_reset: None,
            compounding: CompoundingMethod::None,
        })
    }

    /// Attach an FX reset; its index must convert the reference currency into
    /// this period's payment currency.
    pub fn with_fx_reset(mut self, fx_reset: FxReset) -> Result<Self, ValidationError> {
        fx_reset.validate(&self.currency)?;
        self.fx_reset = Some(fx_reset);
        Ok(self)
    }

    pub fn with_compounding(mut self, compounding: CompoundingMethod) -> Self {
        self.compounding = compounding;
        self
    }

    pub fn payment_date(&self) -> NaiveDate {
        self.payment_date
    }

    pub fn accrual_periods(&self) -> &[RateAccrualPeriod] {
        &self.accrual_periods
    }

    /// The payment currency.
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn notional(&self) -> Decimal {
        self.notional
    }

    /// The notional in the currency it was agreed in.
    pub fn notional_amount(&self) -> CurrencyAmount {
        let currency = match &self.fx_reset {
            Some(fx_reset) => fx_reset.reference_currency.clone(),
            None => self.currency.clone(),
        };
        CurrencyAmount::new(currency, self.notional)
    }

    pub fn fx_reset(&self) -> Option<&FxReset> {
        self.fx_reset.as_ref()
    }

    pub fn compounding(&self) -> CompoundingMethod {
        self.compounding
    }

    /// Start of the first accrual period.
    pub fn start_date(&self) -> NaiveDate {
        self.accrual_periods
            .first()
            .map(RateAccrualPeriod::start_date)
            .unwrap_or(self.payment_date)
    }

    /// End of the last accrual period.
    pub fn end_date(&self) -> NaiveDate {
        self.accrual_periods
            .last()
            .map(RateAccrualPeriod::end_date)
            .unwrap_or(self.payment_date)
    }

    /// A copy with the payment date passed through `adjustment`. Accrual
    /// dates are left as they are.
    pub fn adjust_payment_date(
        &self,
        adjustment: &BusinessDayAdjustment,
    ) -> Result<Self, AdjustmentError> {
        let payment_date = adjustment.adjust(self.payment_date)?;
        Ok(Self {
            payment_date,
            ..self.clone()
        })
    }
}

/// Wire form of [`RatePaymentPeriod`], checked through the constructor.
#[derive(Serialize, Deserialize)]
struct RatePaymentPeriodData {
    payment_date: NaiveDate,
    accrual_periods: Vec<RateAccrualPeriod>,
    currency: CurrencyCode,
    notional: Decimal,
    #[serde(default)]
    fx_reset: Option<FxReset>,
    #[serde(default)]
    compounding: CompoundingMethod,
}

impl TryFrom<RatePaymentPeriodData> for RatePaymentPeriod {
    type Error = ValidationError;

    fn try_from(data: RatePaymentPeriodData) -> Result<Self, Self::Error> {
        let period = RatePaymentPeriod::new(
            data.payment_date,
            data.accrual_periods,
            data.currency,
            data.notional,
        )?;
        let period = match data.fx_reset {
            Some(fx_reset) => period.with_fx_reset(fx_reset)?,
            None => period,
        };
        Ok(period.with_compounding(data.compounding))
    }
}

impl From<RatePaymentPeriod> for RatePaymentPeriodData {
    fn from(period: RatePaymentPeriod) -> Self {
        Self {
            payment_date: period.payment_date,
            accrual_periods: period.accrual_periods,
            currency: period.currency,
            notional: period.notional,
            fx_reset: period.fx_reset,
            compounding: period.compounding,
        }
    }
}
