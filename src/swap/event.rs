use crate::core::adjustment::{AdjustmentError, BusinessDayAdjustment};
use crate::core::currency::{CurrencyAmount, CurrencyCode};
use crate::core::index::FxIndex;
use crate::swap::error::ValidationError;
use crate::swap::period::FxReset;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A transfer of notional in the leg's own currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotionalExchange {
    pub payment_date: NaiveDate,
    pub amount: CurrencyAmount,
}

impl NotionalExchange {
    pub fn new(payment_date: NaiveDate, amount: CurrencyAmount) -> Self {
        Self {
            payment_date,
            amount,
        }
    }
}

/// A transfer of notional agreed in a reference currency and paid in the
/// currency the FX index converts it into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FxResetNotionalExchangeData", into = "FxResetNotionalExchangeData")]
pub struct FxResetNotionalExchange {
    payment_date: NaiveDate,
    reference_amount: CurrencyAmount,
    index: FxIndex,
    fixing_date: NaiveDate,
    currency: CurrencyCode,
}

impl FxResetNotionalExchange {
    pub fn new(
        payment_date: NaiveDate,
        reference_amount: CurrencyAmount,
        index: FxIndex,
        fixing_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let currency = index
            .pair()
            .other(&reference_amount.currency)
            .cloned()
            .ok_or_else(|| ValidationError::InvalidFxReset {
                index: index.name().to_string(),
                reference: reference_amount.currency.clone(),
                payment: reference_amount.currency.clone(),
            })?;
        Ok(Self {
            payment_date,
            reference_amount,
            index,
            fixing_date,
            currency,
        })
    }

    /// Build from a period's FX reset; the reset was validated with its period.
    pub(crate) fn from_reset(
        payment_date: NaiveDate,
        reference_amount: CurrencyAmount,
        fx_reset: &FxReset,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            payment_date,
            reference_amount,
            index: fx_reset.index.clone(),
            fixing_date: fx_reset.fixing_date,
            currency,
        }
    }

    pub fn payment_date(&self) -> NaiveDate {
        self.payment_date
    }

    pub fn reference_amount(&self) -> &CurrencyAmount {
        &self.reference_amount
    }

    pub fn index(&self) -> &FxIndex {
        &self.index
    }

    pub fn fixing_date(&self) -> NaiveDate {
        self.fixing_date
    }

    /// The payment currency.
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }
}

#[derive(Serialize, Deserialize)]
struct FxResetNotionalExchangeData {
    payment_date: NaiveDate,
    reference_amount: CurrencyAmount,
    index: FxIndex,
    fixing_date: NaiveDate,
    currency: CurrencyCode,
}

impl TryFrom<FxResetNotionalExchangeData> for FxResetNotionalExchange {
    type Error = ValidationError;

    fn try_from(data: FxResetNotionalExchangeData) -> Result<Self, Self::Error> {
        let event = FxResetNotionalExchange::new(
            data.payment_date,
            data.reference_amount,
            data.index,
            data.fixing_date,
        )?;
        if event.currency != data.currency {
            return Err(ValidationError::InvalidFxReset {
                index: event.index.name().to_string(),
                reference: event.reference_amount.currency,
                payment: data.currency,
            });
        }
        Ok(event)
    }
}

impl From<FxResetNotionalExchange> for FxResetNotionalExchangeData {
    fn from(event: FxResetNotionalExchange) -> Self {
        Self {
            payment_date: event.payment_date,
            reference_amount: event.reference_amount,
            index: event.index,
            fixing_date: event.fixing_date,
            currency: event.currency,
        }
    }
}

/// An ad-hoc single payment, typically a fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub payment_date: NaiveDate,
    pub amount: CurrencyAmount,
}

impl Fee {
    pub fn new(payment_date: NaiveDate, amount: CurrencyAmount) -> Self {
        Self {
            payment_date,
            amount,
        }
    }
}

/// A cashflow on a single date, outside the regular payment periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentEvent {
    NotionalExchange(NotionalExchange),
    FxResetNotionalExchange(FxResetNotionalExchange),
    Fee(Fee),
}

impl PaymentEvent {
    pub fn currency(&self) -> &CurrencyCode {
        match self {
            PaymentEvent::NotionalExchange(e) => &e.amount.currency,
            PaymentEvent::FxResetNotionalExchange(e) => e.currency(),
            PaymentEvent::Fee(e) => &e.amount.currency,
        }
    }

    pub fn payment_date(&self) -> NaiveDate {
        match self {
            PaymentEvent::NotionalExchange(e) => e.payment_date,
            PaymentEvent::FxResetNotionalExchange(e) => e.payment_date(),
            PaymentEvent::Fee(e) => e.payment_date,
        }
    }

    pub fn is_notional_exchange(&self) -> bool {
        !matches!(self, PaymentEvent::Fee(_))
    }

    /// A copy with the payment date passed through `adjustment`.
    pub fn adjust_payment_date(
        &self,
        adjustment: &BusinessDayAdjustment,
    ) -> Result<Self, AdjustmentError> {
        let adjusted = adjustment.adjust(self.payment_date())?;
        let mut event = self.clone();
        match &mut event {
            PaymentEvent::NotionalExchange(e) => e.payment_date = adjusted,
            PaymentEvent::FxResetNotionalExchange(e) => e.payment_date = adjusted,
            PaymentEvent::Fee(e) => e.payment_date = adjusted,
        }
        Ok(event)
    }
}

impl From<NotionalExchange> for PaymentEvent {
    fn from(event: NotionalExchange) -> Self {
        PaymentEvent::NotionalExchange(event)
    }
}

impl From<FxResetNotionalExchange> for PaymentEvent {
    fn from(event: FxResetNotionalExchange) -> Self {
        PaymentEvent::FxResetNotionalExchange(event)
    }
}

impl From<Fee> for PaymentEvent {
    fn from(event: Fee) -> Self {
        PaymentEvent::Fee(event)
    }
}

impl fmt::Display for PaymentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentEvent::NotionalExchange(e) => {
                write!(f, "{} notional exchange {}", e.payment_date, e.amount)
            }
            PaymentEvent::FxResetNotionalExchange(e) => write!(
                f,
                "{} FX reset notional exchange {} via {} fixed {} paid in {}",
                e.payment_date, e.reference_amount, e.index, e.fixing_date, e.currency
            ),
            PaymentEvent::Fee(e) => write!(f, "{} fee {}", e.payment_date, e.amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::adjustment::{BusinessDayConvention, HolidayCalendar};
    use crate::core::currency::CurrencyPair;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn gbp(amount: rust_decimal::Decimal) -> CurrencyAmount {
        CurrencyAmount::new(CurrencyCode::new("GBP"), amount)
    }

    #[test]
    fn test_adjust_keeps_variant_and_amount() {
        let fee: PaymentEvent = Fee::new(date(2014, 6, 28), gbp(dec!(1000))).into(); // Saturday
        let adj = BusinessDayAdjustment::new(BusinessDayConvention::Following, HolidayCalendar::weekends());
        let adjusted = fee.adjust_payment_date(&adj).unwrap();
        assert_eq!(adjusted, PaymentEvent::from(Fee::new(date(2014, 6, 30), gbp(dec!(1000)))));
        assert!(!adjusted.is_notional_exchange());
    }

    #[test]
    fn test_fx_reset_exchange_currency_is_other_side_of_pair() {
        let index = FxIndex::new(
            "WM-GBP-USD",
            CurrencyPair::new(CurrencyCode::new("GBP"), CurrencyCode::new("USD")),
        );
        let event =
            FxResetNotionalExchange::new(date(2014, 7, 1), gbp(dec!(-1000)), index, date(2014, 6, 27)).unwrap();
        let event = PaymentEvent::from(event);
        assert_eq!(event.currency(), &CurrencyCode::new("USD"));
        assert!(event.is_notional_exchange());
    }

    #[test]
    fn test_fx_reset_exchange_rejects_foreign_reference() {
        let index = FxIndex::new(
            "ECB-EUR-USD",
            CurrencyPair::new(CurrencyCode::new("EUR"), CurrencyCode::new("USD")),
        );
        let result = FxResetNotionalExchange::new(date(2014, 7, 1), gbp(dec!(1000)), index, date(2014, 6, 27));
        assert!(result.is_err());
    }

    #[test]
    fn test_fx_reset_exchange_json_is_validated() {
        let index = FxIndex::new(
            "WM-GBP-USD",
            CurrencyPair::new(CurrencyCode::new("GBP"), CurrencyCode::new("USD")),
        );
        let event = PaymentEvent::from(
            FxResetNotionalExchange::new(date(2014, 7, 1), gbp(dec!(-1000)), index, date(2014, 6, 27)).unwrap(),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(serde_json::from_value::<PaymentEvent>(json.clone()).unwrap(), event);

        let mut wrong_currency = json.clone();
        wrong_currency["FxResetNotionalExchange"]["currency"] = serde_json::json!("EUR");
        let err = serde_json::from_value::<PaymentEvent>(wrong_currency).unwrap_err();
        assert!(err.to_string().contains("cannot convert GBP into EUR"));

        let mut foreign_reference = json;
        foreign_reference["FxResetNotionalExchange"]["reference_amount"]["currency"] = serde_json::json!("CHF");
        assert!(serde_json::from_value::<PaymentEvent>(foreign_reference).is_err());
    }
}
