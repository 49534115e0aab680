use crate::core::adjustment::BusinessDayAdjustment;
use crate::core::currency::CurrencyCode;
use crate::swap::error::{ExpansionError, ExpansionStep, ValidationError};
use crate::swap::event::PaymentEvent;
use crate::swap::notional;
use crate::swap::period::RatePaymentPeriod;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

/// One side of a swap: a schedule of payments in a single currency.
pub trait SwapLeg {
    /// The first accrual date of the leg, often known as the effective date.
    fn start_date(&self) -> NaiveDate;

    /// The last accrual date of the leg, often known as the maturity date.
    fn end_date(&self) -> NaiveDate;

    /// The single currency every payment of the leg is made in.
    fn currency(&self) -> &CurrencyCode;

    /// Resolve the leg into explicit payment periods and payment events.
    fn expand(&self) -> Result<ExpandedSwapLeg, ExpansionError>;
}

/// A swap leg defined by its payment periods.
///
/// The whole structure of payment and accrual periods is supplied by the
/// caller, already adjusted to valid business days. Only payment dates are
/// adjusted again on expansion, using `payment_business_day_adjustment`, so the
/// leg follows holiday calendar changes for payments but not for accruals.
///
/// Periods are expected in chronological order and may overlap. Construction
/// validates everything once; afterwards the value is immutable.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use swap_leg_engine::core::currency::CurrencyCode;
/// use swap_leg_engine::swap::leg::{SwapLeg, SwapLegDefinition};
/// use swap_leg_engine::swap::observation::RateObservation;
/// use swap_leg_engine::swap::period::{RateAccrualPeriod, RatePaymentPeriod};
///
/// let start = NaiveDate::from_ymd_opt(2014, 7, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2014, 10, 1).unwrap();
/// let accrual = RateAccrualPeriod::new(start, end, 0.25, RateObservation::fixed(0.0125)).unwrap();
/// let period = RatePaymentPeriod::new(end, vec![accrual], CurrencyCode::new("GBP"), dec!(1_000_000)).unwrap();
///
/// let leg = SwapLegDefinition::builder()
///     .payment_periods(vec![period])
///     .final_exchange(true)
///     .payment_events(vec![])
///     .build()
///     .unwrap();
///
/// let expanded = leg.expand().unwrap();
/// assert_eq!(expanded.payment_events().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SwapLegDefinitionData", into = "SwapLegDefinitionData")]
pub struct SwapLegDefinition {
    payment_periods: Vec<RatePaymentPeriod>,
    initial_exchange: bool,
    intermediate_exchange: bool,
    final_exchange: bool,
    payment_events: Vec<PaymentEvent>,
    payment_business_day_adjustment: BusinessDayAdjustment,
    currency: CurrencyCode,
}

impl SwapLegDefinition {
    /// Validate and build a leg.
    ///
    /// Fails if there are no payment periods, or if the periods and events do
    /// not share exactly one currency. `None` for the adjustment means no
    /// adjustment.
    pub fn new(
        payment_periods: Vec<RatePaymentPeriod>,
        initial_exchange: bool,
        intermediate_exchange: bool,
        final_exchange: bool,
        payment_events: Vec<PaymentEvent>,
        payment_business_day_adjustment: Option<BusinessDayAdjustment>,
    ) -> Result<Self, ValidationError> {
        if payment_periods.is_empty() {
            return Err(ValidationError::EmptyPaymentPeriods);
        }
        let currencies = payment_periods
            .iter()
            .map(|p| p.currency().clone())
            .chain(payment_events.iter().map(|e| e.currency().clone()));
        let currency = ValidationError::single_currency(currencies)?;
        debug!(
            "built {} swap leg: {} payment periods, {} payment events",
            currency,
            payment_periods.len(),
            payment_events.len()
        );
        Ok(Self {
            payment_periods,
            initial_exchange,
            intermediate_exchange,
            final_exchange,
            payment_events,
            payment_business_day_adjustment: payment_business_day_adjustment.unwrap_or_default(),
            currency,
        })
    }

    pub fn builder() -> SwapLegDefinitionBuilder {
        SwapLegDefinitionBuilder::default()
    }

    pub fn payment_periods(&self) -> &[RatePaymentPeriod] {
        &self.payment_periods
    }

    pub fn initial_exchange(&self) -> bool {
        self.initial_exchange
    }

    pub fn intermediate_exchange(&self) -> bool {
        self.intermediate_exchange
    }

    pub fn final_exchange(&self) -> bool {
        self.final_exchange
    }

    pub fn payment_events(&self) -> &[PaymentEvent] {
        &self.payment_events
    }

    pub fn payment_business_day_adjustment(&self) -> &BusinessDayAdjustment {
        &self.payment_business_day_adjustment
    }

    fn first_period(&self) -> &RatePaymentPeriod {
        // non-empty by construction
        &self.payment_periods[0]
    }

    fn last_period(&self) -> &RatePaymentPeriod {
        &self.payment_periods[self.payment_periods.len() - 1]
    }
}

impl SwapLeg for SwapLegDefinition {
    fn start_date(&self) -> NaiveDate {
        self.first_period().start_date()
    }

    fn end_date(&self) -> NaiveDate {
        self.last_period().end_date()
    }

    fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Adjust every payment date, derive the notional exchanges, then append
    /// the explicit events in their supplied order.
    fn expand(&self) -> Result<ExpandedSwapLeg, ExpansionError> {
        let adjustment = &self.payment_business_day_adjustment;

        let periods = self
            .payment_periods
            .iter()
            .enumerate()
            .map(|(i, period)| {
                period
                    .adjust_payment_date(adjustment)
                    .map_err(|e| ExpansionError::new(ExpansionStep::PaymentPeriod(i), e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let initial_exchange_date = adjustment
            .adjust(self.start_date())
            .map_err(|e| ExpansionError::new(ExpansionStep::InitialExchange, e))?;

        let mut events = notional::create_events(
            &periods,
            initial_exchange_date,
            self.initial_exchange,
            self.intermediate_exchange,
            self.final_exchange,
        )?;
        let derived = events.len();

        for (i, event) in self.payment_events.iter().enumerate() {
            let adjusted = event
                .adjust_payment_date(adjustment)
                .map_err(|e| ExpansionError::new(ExpansionStep::PaymentEvent(i), e))?;
            events.push(adjusted);
        }

        debug!(
            "expanded {} swap leg: {} periods, {} derived and {} explicit events",
            self.currency,
            periods.len(),
            derived,
            events.len() - derived
        );
        Ok(ExpandedSwapLeg {
            payment_periods: periods,
            payment_events: events,
            currency: self.currency.clone(),
        })
    }
}

/// Builder for [`SwapLegDefinition`]; validation happens in [`build`](Self::build).
///
/// `payment_events` must be set explicitly, even to an empty list.
#[derive(Debug, Clone, Default)]
pub struct SwapLegDefinitionBuilder {
    payment_periods: Vec<RatePaymentPeriod>,
    initial_exchange: bool,
    intermediate_exchange: bool,
    final_exchange: bool,
    payment_events: Option<Vec<PaymentEvent>>,
    payment_business_day_adjustment: Option<BusinessDayAdjustment>,
}

impl SwapLegDefinitionBuilder {
    pub fn payment_periods(mut self, periods: Vec<RatePaymentPeriod>) -> Self {
        self.payment_periods = periods;
        self
    }

    pub fn add_payment_period(mut self, period: RatePaymentPeriod) -> Self {
        self.payment_periods.push(period);
        self
    }

    pub fn initial_exchange(mut self, flag: bool) -> Self {
        self.initial_exchange = flag;
        self
    }

    pub fn intermediate_exchange(mut self, flag: bool) -> Self {
        self.intermediate_exchange = flag;
        self
    }

    pub fn final_exchange(mut self, flag: bool) -> Self {
        self.final_exchange = flag;
        self
    }

    pub fn payment_events(mut self, events: Vec<PaymentEvent>) -> Self {
        self.payment_events = Some(events);
        self
    }

    pub fn payment_business_day_adjustment(mut self, adjustment: BusinessDayAdjustment) -> Self {
        self.payment_business_day_adjustment = Some(adjustment);
        self
    }

    pub fn build(self) -> Result<SwapLegDefinition, ValidationError> {
        let payment_events = self
            .payment_events
            .ok_or(ValidationError::MissingField("payment_events"))?;
        SwapLegDefinition::new(
            self.payment_periods,
            self.initial_exchange,
            self.intermediate_exchange,
            self.final_exchange,
            payment_events,
            self.payment_business_day_adjustment,
        )
    }
}

/// Wire form of [`SwapLegDefinition`]: the currency is derived, never stored,
/// and deserialising runs the same validation as construction.
#[derive(Serialize, Deserialize)]
struct SwapLegDefinitionData {
    payment_periods: Vec<RatePaymentPeriod>,
    #[serde(default)]
    initial_exchange: bool,
    #[serde(default)]
    intermediate_exchange: bool,
    #[serde(default)]
    final_exchange: bool,
    payment_events: Vec<PaymentEvent>,
    #[serde(default)]
    payment_business_day_adjustment: Option<BusinessDayAdjustment>,
}

impl TryFrom<SwapLegDefinitionData> for SwapLegDefinition {
    type Error = ValidationError;

    fn try_from(data: SwapLegDefinitionData) -> Result<Self, Self::Error> {
        SwapLegDefinition::new(
            data.payment_periods,
            data.initial_exchange,
            data.intermediate_exchange,
            data.final_exchange,
            data.payment_events,
            data.payment_business_day_adjustment,
        )
    }
}

impl From<SwapLegDefinition> for SwapLegDefinitionData {
    fn from(leg: SwapLegDefinition) -> Self {
        Self {
            payment_periods: leg.payment_periods,
            initial_exchange: leg.initial_exchange,
            intermediate_exchange: leg.intermediate_exchange,
            final_exchange: leg.final_exchange,
            payment_events: leg.payment_events,
            payment_business_day_adjustment: Some(leg.payment_business_day_adjustment),
        }
    }
}

/// A fully resolved swap leg: adjusted payment periods plus every payment
/// event, derived notional exchanges first, then explicit events.
///
/// Events are not sorted by date; consumers that need date order sort them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandedSwapLeg {
    payment_periods: Vec<RatePaymentPeriod>,
    payment_events: Vec<PaymentEvent>,
    currency: CurrencyCode,
}

impl ExpandedSwapLeg {
    /// Build an already-resolved leg directly, with the same single-currency
    /// and non-empty checks as [`SwapLegDefinition`].
    pub fn new(
        payment_periods: Vec<RatePaymentPeriod>,
        payment_events: Vec<PaymentEvent>,
    ) -> Result<Self, ValidationError> {
        if payment_periods.is_empty() {
            return Err(ValidationError::EmptyPaymentPeriods);
        }
        let currency = ValidationError::single_currency(
            payment_periods
                .iter()
                .map(|p| p.currency().clone())
                .chain(payment_events.iter().map(|e| e.currency().clone())),
        )?;
        Ok(Self {
            payment_periods,
            payment_events,
            currency,
        })
    }

    pub fn payment_periods(&self) -> &[RatePaymentPeriod] {
        &self.payment_periods
    }

    pub fn payment_events(&self) -> &[PaymentEvent] {
        &self.payment_events
    }

    /// Payment events ordered by payment date; equal dates keep their relative order.
    pub fn payment_events_by_date(&self) -> Vec<&PaymentEvent> {
        let mut events: Vec<&PaymentEvent> = self.payment_events.iter().collect();
        events.sort_by_key(|e| e.payment_date());
        events
    }
}

impl SwapLeg for ExpandedSwapLeg {
    fn start_date(&self) -> NaiveDate {
        self.payment_periods[0].start_date()
    }

    fn end_date(&self) -> NaiveDate {
        self.payment_periods[self.payment_periods.len() - 1].end_date()
    }

    fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Already expanded: returns an equal copy.
    fn expand(&self) -> Result<ExpandedSwapLeg, ExpansionError> {
        Ok(self.clone())
    }
}
