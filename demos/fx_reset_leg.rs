//! Expansion and valuation of a GBP-referenced leg paid in USD.
//!
//! The first two periods are plain USD periods, the last two have their
//! notional fixed in GBP and converted through an FX index. Run with
//! `RUST_LOG=trace` to see every derived exchange.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use swap_leg_engine::core::index::FxIndex;
use swap_leg_engine::pricer::event::{forecast_value, present_value};
use swap_leg_engine::pricer::flat::{FlatEnvironmentConfig, FlatPricingEnvironment, FxQuote};
use swap_leg_engine::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("╔════════════════════════════════════════════╗");
    println!("║  swap-leg-engine: FX Reset Leg Example     ║");
    println!("╚════════════════════════════════════════════╝\n");

    let usd = CurrencyCode::new("USD");
    let gbp = CurrencyCode::new("GBP");
    let index = FxIndex::new("WM-GBP-USD", CurrencyPair::new(gbp.clone(), usd.clone()));

    let boundaries = [
        date(2015, 1, 5),
        date(2015, 4, 4),
        date(2015, 7, 4),
        date(2015, 10, 4),
        date(2016, 1, 3),
    ];
    let mut periods = Vec::new();
    for (i, window) in boundaries.windows(2).enumerate() {
        let (start, end) = (window[0], window[1]);
        let accrual = RateAccrualPeriod::new(start, end, 0.25, RateObservation::fixed(0.015))?;
        let period = if i < 2 {
            RatePaymentPeriod::new(end, vec![accrual], usd.clone(), dec!(15_000_000))?
        } else {
            RatePaymentPeriod::new(end, vec![accrual], usd.clone(), dec!(10_000_000))?
                .with_fx_reset(FxReset::new(index.clone(), gbp.clone(), start))?
        };
        periods.push(period);
    }

    let leg = SwapLegDefinition::builder()
        .payment_periods(periods)
        .initial_exchange(true)
        .intermediate_exchange(true)
        .final_exchange(true)
        .payment_events(vec![])
        .payment_business_day_adjustment(BusinessDayAdjustment::new(
            BusinessDayConvention::ModifiedFollowing,
            HolidayCalendar::weekends(),
        ))
        .build()?;

    println!("━━━ Leg ━━━\n");
    println!("  Currency:    {}", leg.currency());
    println!("  Start:       {}", leg.start_date());
    println!("  End:         {}", leg.end_date());
    println!("  Adjustment:  {}\n", leg.payment_business_day_adjustment());

    let expanded = leg.expand()?;

    println!("━━━ Adjusted Payment Dates ━━━\n");
    for (original, adjusted) in leg.payment_periods().iter().zip(expanded.payment_periods()) {
        println!("  {} → {}", original.payment_date(), adjusted.payment_date());
    }
    println!();

    let mut config = FlatEnvironmentConfig {
        valuation_date: date(2015, 1, 2),
        ..Default::default()
    };
    config.zero_rates.insert(usd.clone(), 0.02);
    config.fx_quotes.push(FxQuote {
        base: gbp,
        counter: usd,
        rate: 1.52,
    });
    let env = FlatPricingEnvironment::new(config)?;

    println!("━━━ Payment Events ━━━\n");
    for event in expanded.payment_events_by_date() {
        let forecast = forecast_value(event, &env)?;
        let pv = present_value(event, &env)?;
        println!("  {}", event);
        println!("    Forecast:  {}", forecast);
        println!("    PV:        {}", pv.amount.round_dp(2));
    }

    Ok(())
}
