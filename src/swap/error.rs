use crate::core::adjustment::AdjustmentError;
use crate::core::currency::CurrencyCode;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Structural problems found while constructing a period or a leg.
///
/// Raised only at construction; a value that was built successfully is
/// internally consistent for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("swap leg must have at least one payment period")]
    EmptyPaymentPeriods,
    #[error("payment period must have at least one accrual period")]
    EmptyAccrualPeriods,
    #[error("required field '{0}' was not supplied")]
    MissingField(&'static str),
    #[error("{}", CurrencySet(.currencies))]
    CurrencyMismatch { currencies: BTreeSet<CurrencyCode> },
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("FX reset on index {index} cannot convert {reference} into {payment}")]
    InvalidFxReset {
        index: String,
        reference: CurrencyCode,
        payment: CurrencyCode,
    },
}

impl ValidationError {
    /// Reduce a collection of currencies to the single one it must contain.
    pub fn single_currency<I>(currencies: I) -> Result<CurrencyCode, ValidationError>
    where
        I: IntoIterator<Item = CurrencyCode>,
    {
        let currencies: BTreeSet<CurrencyCode> = currencies.into_iter().collect();
        if currencies.len() != 1 {
            return Err(ValidationError::CurrencyMismatch { currencies });
        }
        currencies
            .into_iter()
            .next()
            .ok_or(ValidationError::CurrencyMismatch {
                currencies: BTreeSet::new(),
            })
    }
}

struct CurrencySet<'a>(&'a BTreeSet<CurrencyCode>);

impl fmt::Display for CurrencySet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "no currency found");
        }
        let codes: Vec<&str> = self.0.iter().map(CurrencyCode::as_str).collect();
        write!(f, "multiple currencies found: {{{}}}", codes.join(", "))
    }
}

/// What was being worked on when an expansion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionStep {
    PaymentPeriod(usize),
    InitialExchange,
    /// Notional exchanges derived at the start boundary of a payment period.
    NotionalExchange(usize),
    PaymentEvent(usize),
}

impl fmt::Display for ExpansionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpansionStep::PaymentPeriod(i) => write!(f, "payment period {i}"),
            ExpansionStep::InitialExchange => write!(f, "initial exchange date"),
            ExpansionStep::NotionalExchange(i) => write!(f, "notional exchange of payment period {i}"),
            ExpansionStep::PaymentEvent(i) => write!(f, "payment event {i}"),
        }
    }
}

/// Why an expansion step failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionCause {
    #[error(transparent)]
    Adjustment(#[from] AdjustmentError),
    #[error("notional change {previous} - {next} overflows")]
    NotionalOverflow { previous: Decimal, next: Decimal },
}

/// A failure while expanding a leg. No partial result is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to expand swap leg: {step}: {source}")]
pub struct ExpansionError {
    pub step: ExpansionStep,
    #[source]
    pub source: ExpansionCause,
}

impl ExpansionError {
    pub fn new(step: ExpansionStep, source: impl Into<ExpansionCause>) -> Self {
        Self {
            step,
            source: source.into(),
        }
    }
}
