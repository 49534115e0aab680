use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use rust_decimal::Decimal;
use swap_leg_engine::core::adjustment::{BusinessDayAdjustment, BusinessDayConvention, HolidayCalendar};
use swap_leg_engine::core::currency::{CurrencyCode, CurrencyPair};
use swap_leg_engine::core::index::FxIndex;
use swap_leg_engine::swap::leg::{SwapLeg, SwapLegDefinition};
use swap_leg_engine::swap::observation::RateObservation;
use swap_leg_engine::swap::period::{FxReset, RateAccrualPeriod, RatePaymentPeriod};

/// A leg of `period_count` random-length periods, a share of them with FX resets.
fn random_leg(period_count: usize, fx_reset_share: f64) -> SwapLegDefinition {
    let mut rng = rand::thread_rng();
    let usd = CurrencyCode::new("USD");
    let gbp = CurrencyCode::new("GBP");
    let index = FxIndex::new("WM-GBP-USD", CurrencyPair::new(gbp.clone(), usd.clone()));
    let mut start = NaiveDate::from_ymd_opt(2015, 1, 5).unwrap();

    let mut periods = Vec::with_capacity(period_count);
    for _ in 0..period_count {
        let days = rng.gen_range(28..95);
        let end = start + Duration::days(days);
        let accrual = RateAccrualPeriod::new(start, end, days as f64 / 360.0, RateObservation::fixed(0.01))
            .unwrap();
        let notional = Decimal::from(rng.gen_range(1_000_000u64..100_000_000u64));
        let mut period = RatePaymentPeriod::new(end, vec![accrual], usd.clone(), notional).unwrap();
        if rng.gen_bool(fx_reset_share) {
            period = period
                .with_fx_reset(FxReset::new(index.clone(), gbp.clone(), start))
                .unwrap();
        }
        periods.push(period);
        start = end;
    }

    SwapLegDefinition::new(
        periods,
        true,
        true,
        true,
        vec![],
        Some(BusinessDayAdjustment::new(
            BusinessDayConvention::ModifiedFollowing,
            HolidayCalendar::weekends(),
        )),
    )
    .unwrap()
}

fn bench_expand_40_periods(c: &mut Criterion) {
    let leg = random_leg(40, 0.0);
    c.bench_function("expand_40_periods", |b| b.iter(|| black_box(&leg).expand()));
}

fn bench_expand_400_periods(c: &mut Criterion) {
    let leg = random_leg(400, 0.0);
    c.bench_function("expand_400_periods", |b| b.iter(|| black_box(&leg).expand()));
}

fn bench_expand_400_periods_fx_reset(c: &mut Criterion) {
    let leg = random_leg(400, 0.3);
    c.bench_function("expand_400_periods_fx_reset", |b| {
        b.iter(|| black_box(&leg).expand())
    });
}

criterion_group!(
    benches,
    bench_expand_40_periods,
    bench_expand_400_periods,
    bench_expand_400_periods_fx_reset
);
criterion_main!(benches);
