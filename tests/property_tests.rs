use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use swap_leg_engine::core::adjustment::{BusinessDayAdjustment, BusinessDayConvention, HolidayCalendar};
use swap_leg_engine::core::currency::{CurrencyAmount, CurrencyCode, CurrencyPair};
use swap_leg_engine::core::index::FxIndex;
use swap_leg_engine::swap::error::ValidationError;
use swap_leg_engine::swap::event::{Fee, PaymentEvent};
use swap_leg_engine::swap::leg::{SwapLeg, SwapLegDefinition};
use swap_leg_engine::swap::observation::RateObservation;
use swap_leg_engine::swap::period::{FxReset, RateAccrualPeriod, RatePaymentPeriod};
use std::collections::BTreeSet;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 5).unwrap()
}

fn usd() -> CurrencyCode {
    CurrencyCode::new("USD")
}

fn gbp_usd() -> FxIndex {
    FxIndex::new("WM-GBP-USD", CurrencyPair::new(CurrencyCode::new("GBP"), usd()))
}

/// Generate a random currency from a small pool.
fn arb_currency() -> impl Strategy<Value = CurrencyCode> {
    prop::sample::select(vec![
        CurrencyCode::new("USD"),
        CurrencyCode::new("GBP"),
        CurrencyCode::new("EUR"),
    ])
}

/// Generate a random notional (1 to 10,000,000).
fn arb_notional() -> impl Strategy<Value = Decimal> {
    (1u64..10_000_000u64).prop_map(Decimal::from)
}

/// Consecutive USD periods of 20 to 120 days, optionally with an FX reset.
fn build_periods(shapes: &[(i64, Decimal, bool)]) -> Vec<RatePaymentPeriod> {
    build_periods_in(shapes, &[usd()])
}

/// As [`build_periods`], cycling through `currencies` for the payment
/// currency. FX resets are only valid on USD periods.
fn build_periods_in(shapes: &[(i64, Decimal, bool)], currencies: &[CurrencyCode]) -> Vec<RatePaymentPeriod> {
    let mut start = base_date();
    shapes
        .iter()
        .enumerate()
        .map(|(i, (days, notional, fx_reset))| {
            let end = start + Duration::days(*days);
            let accrual = RateAccrualPeriod::new(
                start,
                end,
                *days as f64 / 360.0,
                RateObservation::fixed(0.01),
            )
            .unwrap();
            let currency = currencies[i % currencies.len()].clone();
            let period = RatePaymentPeriod::new(end, vec![accrual], currency, *notional).unwrap();
            let period = if *fx_reset {
                period
                    .with_fx_reset(FxReset::new(gbp_usd(), CurrencyCode::new("GBP"), start))
                    .unwrap()
            } else {
                period
            };
            start = end;
            period
        })
        .collect()
}

fn arb_period_shapes(fx_weight: u32) -> impl Strategy<Value = Vec<(i64, Decimal, bool)>> {
    prop::collection::vec(
        (20i64..120, arb_notional(), prop::bool::weighted(fx_weight as f64 / 100.0)),
        1..12,
    )
}

fn arb_fees() -> impl Strategy<Value = Vec<PaymentEvent>> {
    prop::collection::vec((0i64..400, arb_notional()), 0..5).prop_map(|fees| {
        fees.into_iter()
            .map(|(offset, amount)| {
                Fee::new(base_date() + Duration::days(offset), CurrencyAmount::new(usd(), amount))
                    .into()
            })
            .collect()
    })
}

fn arb_convention() -> impl Strategy<Value = BusinessDayConvention> {
    prop::sample::select(vec![
        BusinessDayConvention::NoAdjust,
        BusinessDayConvention::Following,
        BusinessDayConvention::ModifiedFollowing,
        BusinessDayConvention::Preceding,
        BusinessDayConvention::ModifiedPreceding,
        BusinessDayConvention::Nearest,
    ])
}

proptest! {
    // ===================================================================
    // A leg exists only if periods and events share exactly one currency.
    // ===================================================================
    #[test]
    fn leg_requires_single_currency(
        shapes in arb_period_shapes(0),
        period_currencies in prop::collection::vec(arb_currency(), 1..4),
        fee_currencies in prop::collection::vec(arb_currency(), 0..3),
    ) {
        let periods = build_periods_in(&shapes, &period_currencies);
        let fees: Vec<PaymentEvent> = fee_currencies
            .iter()
            .map(|c| Fee::new(base_date(), CurrencyAmount::new(c.clone(), Decimal::ONE)).into())
            .collect();
        let mut expected: BTreeSet<CurrencyCode> = periods.iter().map(|p| p.currency().clone()).collect();
        expected.extend(fee_currencies);

        let result = SwapLegDefinition::builder()
            .payment_periods(periods)
            .payment_events(fees)
            .build();
        if expected.len() == 1 {
            let leg = result.unwrap();
            prop_assert_eq!(Some(leg.currency()), expected.iter().next());
        } else {
            prop_assert_eq!(result.unwrap_err(), ValidationError::CurrencyMismatch { currencies: expected });
        }
    }

    // ===================================================================
    // No periods, no leg, whatever else is supplied.
    // ===================================================================
    #[test]
    fn leg_requires_payment_periods(
        fees in arb_fees(),
        initial in any::<bool>(),
        intermediate in any::<bool>(),
        final_exchange in any::<bool>(),
    ) {
        let result = SwapLegDefinition::new(vec![], initial, intermediate, final_exchange, fees, None);
        prop_assert_eq!(result.unwrap_err(), ValidationError::EmptyPaymentPeriods);
    }

    // ===================================================================
    // Expansion is deterministic.
    // ===================================================================
    #[test]
    fn expansion_is_repeatable(
        shapes in arb_period_shapes(30),
        fees in arb_fees(),
        flags in any::<(bool, bool, bool)>(),
        convention in arb_convention(),
    ) {
        let leg = SwapLegDefinition::new(
            build_periods(&shapes),
            flags.0,
            flags.1,
            flags.2,
            fees,
            Some(BusinessDayAdjustment::new(convention, HolidayCalendar::weekends())),
        )
        .unwrap();
        prop_assert_eq!(leg.expand().unwrap(), leg.expand().unwrap());
    }

    // ===================================================================
    // With no adjustment and no flags, expansion passes everything through.
    // ===================================================================
    #[test]
    fn unadjusted_expansion_passes_through(
        shapes in arb_period_shapes(30),
        fees in arb_fees(),
    ) {
        let periods = build_periods(&shapes);
        let leg = SwapLegDefinition::new(periods.clone(), false, false, false, fees.clone(), None).unwrap();
        let expanded = leg.expand().unwrap();
        prop_assert_eq!(expanded.payment_periods(), &periods[..]);
        prop_assert_eq!(expanded.payment_events(), &fees[..]);
    }

    // ===================================================================
    // All flags on and no FX resets: one initial, n-1 intermediate and one
    // final exchange, and the nominal amounts net to zero.
    // ===================================================================
    #[test]
    fn plain_leg_exchange_count(shapes in arb_period_shapes(0)) {
        let n = shapes.len();
        let leg = SwapLegDefinition::new(build_periods(&shapes), true, true, true, vec![], None).unwrap();
        let events = leg.expand().unwrap().payment_events().to_vec();
        prop_assert_eq!(events.len(), 1 + (n - 1) + 1);
        let total: Decimal = events
            .iter()
            .map(|e| match e {
                PaymentEvent::NotionalExchange(x) => x.amount.amount,
                _ => Decimal::ZERO,
            })
            .sum();
        prop_assert_eq!(total, Decimal::ZERO);
    }

    // ===================================================================
    // A leg made only of FX-reset periods yields exactly two FX-reset
    // exchanges per period when intermediate exchange is on, and nothing
    // otherwise, whatever the initial and final flags say.
    // ===================================================================
    #[test]
    fn fx_reset_periods_override_flags(
        shapes in arb_period_shapes(100),
        initial in any::<bool>(),
        intermediate in any::<bool>(),
        final_exchange in any::<bool>(),
    ) {
        let n = shapes.len();
        let leg = SwapLegDefinition::new(build_periods(&shapes), initial, intermediate, final_exchange, vec![], None)
            .unwrap();
        let events = leg.expand().unwrap().payment_events().to_vec();
        if intermediate {
            prop_assert_eq!(events.len(), 2 * n);
            prop_assert!(events.iter().all(|e| matches!(e, PaymentEvent::FxResetNotionalExchange(_))));
        } else {
            prop_assert!(events.is_empty());
        }
    }

    // ===================================================================
    // Explicit events follow the derived ones, in their original order.
    // ===================================================================
    #[test]
    fn explicit_events_keep_their_order(
        shapes in arb_period_shapes(30),
        fees in arb_fees(),
        flags in any::<(bool, bool, bool)>(),
    ) {
        let leg = SwapLegDefinition::new(build_periods(&shapes), flags.0, flags.1, flags.2, fees.clone(), None)
            .unwrap();
        let events = leg.expand().unwrap().payment_events().to_vec();
        prop_assert!(events.len() >= fees.len());
        let tail = &events[events.len() - fees.len()..];
        prop_assert_eq!(tail, &fees[..]);
    }

    // ===================================================================
    // Adjusted payment dates are business days; accrual dates never move.
    // ===================================================================
    #[test]
    fn adjusted_payment_dates_are_business_days(
        shapes in arb_period_shapes(30),
        convention in arb_convention().prop_filter("must move dates", |c| *c != BusinessDayConvention::NoAdjust),
    ) {
        let calendar = HolidayCalendar::weekends();
        let periods = build_periods(&shapes);
        let leg = SwapLegDefinition::new(
            periods.clone(),
            false,
            false,
            false,
            vec![],
            Some(BusinessDayAdjustment::new(convention, calendar.clone())),
        )
        .unwrap();
        let expanded = leg.expand().unwrap();
        for (original, adjusted) in periods.iter().zip(expanded.payment_periods()) {
            prop_assert!(calendar.is_business_day(adjusted.payment_date()).unwrap());
            prop_assert_eq!(original.accrual_periods(), adjusted.accrual_periods());
        }
    }
}
