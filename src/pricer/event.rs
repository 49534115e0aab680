//! Valuation of single payment events.
//!
//! All values carry the sign of the event: a negative notional exchange is a
//! payment and values negative.

use crate::core::currency::{CurrencyAmount, CurrencyCode};
use crate::pricer::environment::{PricingEnvironment, UnsupportedQueryError};
use crate::pricer::sensitivity::PointSensitivityBuilder;
use crate::swap::event::PaymentEvent;
use log::trace;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

fn to_decimal(query: &'static str, value: f64) -> Result<Decimal, UnsupportedQueryError> {
    Decimal::try_from(value).map_err(|e| {
        UnsupportedQueryError::new(query, format!("{value} is not representable: {e}"))
    })
}

fn checked_product(
    query: &'static str,
    amount: Decimal,
    factor: f64,
) -> Result<Decimal, UnsupportedQueryError> {
    amount
        .checked_mul(to_decimal(query, factor)?)
        .ok_or_else(|| UnsupportedQueryError::new(query, format!("{amount} * {factor} overflows")))
}

fn to_f64(query: &'static str, value: Decimal) -> Result<f64, UnsupportedQueryError> {
    value
        .to_f64()
        .ok_or_else(|| UnsupportedQueryError::new(query, format!("{value} is not representable")))
}

/// The undiscounted amount the event pays, in its own currency.
///
/// FX-reset exchanges convert the reference amount at the index rate for the
/// fixing date. Nothing here depends on the valuation date.
pub fn forecast_value<E>(
    event: &PaymentEvent,
    env: &E,
) -> Result<CurrencyAmount, UnsupportedQueryError>
where
    E: PricingEnvironment + ?Sized,
{
    match event {
        PaymentEvent::NotionalExchange(e) => Ok(e.amount.clone()),
        PaymentEvent::Fee(e) => Ok(e.amount.clone()),
        PaymentEvent::FxResetNotionalExchange(e) => {
            let reference = e.reference_amount();
            let rate = env.fx_index_rate(e.index(), &reference.currency, e.fixing_date())?;
            let amount = checked_product("fx_index_rate", reference.amount, rate)?;
            trace!("{} converted at {} on {}", reference, rate, e.fixing_date());
            Ok(CurrencyAmount::new(e.currency().clone(), amount))
        }
    }
}

/// [`forecast_value`] expressed in `target` at today's FX rate.
pub fn forecast_value_in<E>(
    event: &PaymentEvent,
    target: &CurrencyCode,
    env: &E,
) -> Result<CurrencyAmount, UnsupportedQueryError>
where
    E: PricingEnvironment + ?Sized,
{
    forecast_value(event, env)?.convert_to(target, env)
}

/// The discounted value of the event as of the valuation date.
/// Events paid before the valuation date are worth zero.
pub fn present_value<E>(
    event: &PaymentEvent,
    env: &E,
) -> Result<CurrencyAmount, UnsupportedQueryError>
where
    E: PricingEnvironment + ?Sized,
{
    let currency = event.currency();
    let payment_date = event.payment_date();
    if payment_date < env.valuation_date()? {
        return Ok(CurrencyAmount::zero(currency.clone()));
    }
    let forecast = forecast_value(event, env)?;
    let df = env.discount_factor(currency, payment_date)?;
    Ok(CurrencyAmount::new(
        currency.clone(),
        checked_product("discount_factor", forecast.amount, df)?,
    ))
}

/// Point sensitivities of [`present_value`] to discounting and, for FX-reset
/// exchanges, to the FX index rate.
pub fn present_value_sensitivity<E>(
    event: &PaymentEvent,
    env: &E,
) -> Result<PointSensitivityBuilder, UnsupportedQueryError>
where
    E: PricingEnvironment + ?Sized,
{
    let currency = event.currency();
    let payment_date = event.payment_date();
    if payment_date < env.valuation_date()? {
        return Ok(PointSensitivityBuilder::none());
    }
    let forecast = to_f64("present_value_sensitivity", forecast_value(event, env)?.amount)?;
    let discounting = env
        .discount_factor_zero_rate_sensitivity(currency, payment_date)?
        .multiplied_by(forecast);
    match event {
        PaymentEvent::FxResetNotionalExchange(e) => {
            let reference = e.reference_amount();
            let notional = to_f64("present_value_sensitivity", reference.amount)?;
            let df = env.discount_factor(currency, payment_date)?;
            let fx = env
                .fx_index_rate_sensitivity(e.index(), &reference.currency, e.fixing_date())?
                .multiplied_by(notional * df);
            Ok(discounting.combined_with(fx))
        }
        _ => Ok(discounting),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::CurrencyPair;
    use crate::core::index::FxIndex;
    use crate::pricer::flat::{FlatEnvironmentConfig, FlatPricingEnvironment, FxQuote};
    use crate::pricer::mock::MockFxPricingEnvironment;
    use crate::swap::event::{Fee, FxResetNotionalExchange, NotionalExchange};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn usd() -> CurrencyCode {
        CurrencyCode::new("USD")
    }

    fn gbp() -> CurrencyCode {
        CurrencyCode::new("GBP")
    }

    fn gbp_usd() -> FxIndex {
        FxIndex::new("WM-GBP-USD", CurrencyPair::new(gbp(), usd()))
    }

    fn flat() -> FlatPricingEnvironment {
        let mut config = FlatEnvironmentConfig {
            valuation_date: date(2015, 1, 2),
            ..Default::default()
        };
        config.zero_rates.insert(usd(), 0.02);
        config.fx_quotes.push(FxQuote {
            base: gbp(),
            counter: usd(),
            rate: 1.5,
        });
        FlatPricingEnvironment::new(config).unwrap()
    }

    fn fx_exchange(payment_date: NaiveDate) -> PaymentEvent {
        FxResetNotionalExchange::new(
            payment_date,
            CurrencyAmount::new(gbp(), dec!(-1000)),
            gbp_usd(),
            date(2015, 6, 1),
        )
        .unwrap()
        .into()
    }

    #[test]
    fn test_forecast_plain_events_with_mock() {
        let env = MockFxPricingEnvironment::default();
        let event = PaymentEvent::from(NotionalExchange::new(
            date(2015, 6, 3),
            CurrencyAmount::new(usd(), dec!(100)),
        ));
        assert_eq!(forecast_value(&event, &env).unwrap().amount, dec!(100));

        let in_gbp = forecast_value_in(&event, &gbp(), &env).unwrap();
        assert_eq!(in_gbp.currency, gbp());
        assert_eq!(in_gbp.amount.round_dp(8), dec!(160));
    }

    #[test]
    fn test_mock_cannot_present_value() {
        let env = MockFxPricingEnvironment::default();
        let event = PaymentEvent::from(Fee::new(date(2015, 6, 3), CurrencyAmount::new(usd(), dec!(5))));
        let err = present_value(&event, &env).unwrap_err();
        assert_eq!(err.query, "valuation_date");
        assert!(forecast_value(&fx_exchange(date(2015, 6, 3)), &env).is_err());
    }

    #[test]
    fn test_fx_reset_forecast_and_present_value() {
        let env = flat();
        let event = fx_exchange(date(2016, 1, 2));
        let forecast = forecast_value(&event, &env).unwrap();
        assert_eq!(forecast.currency, usd());
        assert_eq!(forecast.amount.round_dp(8), dec!(-1500));

        let pv = present_value(&event, &env).unwrap();
        let expected = -1500.0 * (-0.02f64).exp();
        assert_relative_eq!(pv.amount.to_f64().unwrap(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_fx_conversion_overflow_is_an_error() {
        let env = flat();
        let event = PaymentEvent::from(
            FxResetNotionalExchange::new(
                date(2016, 1, 2),
                CurrencyAmount::new(gbp(), Decimal::MAX),
                gbp_usd(),
                date(2015, 6, 1),
            )
            .unwrap(),
        );
        let err = forecast_value(&event, &env).unwrap_err();
        assert_eq!(err.query, "fx_index_rate");
        assert_eq!(present_value(&event, &env).unwrap_err().query, "fx_index_rate");
    }

    #[test]
    fn test_past_event_is_worth_nothing() {
        let env = flat();
        let event = PaymentEvent::from(NotionalExchange::new(
            date(2014, 12, 1),
            CurrencyAmount::new(usd(), dec!(100)),
        ));
        assert_eq!(present_value(&event, &env).unwrap().amount, Decimal::ZERO);
        assert!(present_value_sensitivity(&event, &env).unwrap().is_empty());
    }

    #[test]
    fn test_present_value_sensitivity() {
        let env = flat();
        let plain = PaymentEvent::from(NotionalExchange::new(
            date(2016, 1, 2),
            CurrencyAmount::new(usd(), dec!(100)),
        ));
        let points = present_value_sensitivity(&plain, &env).unwrap().build();
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points.points()[0].sensitivity(), -100.0 * (-0.02f64).exp(), epsilon = 1e-9);

        let points = present_value_sensitivity(&fx_exchange(date(2016, 1, 2)), &env)
            .unwrap()
            .build();
        assert_eq!(points.len(), 2);
        assert_relative_eq!(points.points()[1].sensitivity(), -1000.0 * (-0.02f64).exp(), epsilon = 1e-9);
    }
}
