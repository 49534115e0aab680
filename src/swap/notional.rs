//! Derivation of implicit notional exchanges from a leg's payment periods.
//!
//! Sign convention: a positive notional is a receive-leg notional. The leg pays
//! the notional out when it starts and receives it back when it ends, so the
//! initial exchange is `-N` and the final exchange `+N`. Between two plain
//! periods the leg exchanges the change in notional, `N_prev - N_next`, on the
//! earlier period's payment date.
//!
//! A period carrying an [`FxReset`](crate::swap::period::FxReset) has its notional
//! fixed in a reference currency, so it cannot be netted against its
//! neighbours. When intermediate exchange is on, such a period pays `-N` at its
//! start boundary and receives `+N` at its payment date, both as FX reset
//! exchanges. The initial and final flags never apply to an FX reset period.
//! A plain neighbour of an FX reset period exchanges its own full notional at
//! the shared boundary instead of a difference.

use crate::core::currency::CurrencyAmount;
use crate::swap::error::{ExpansionCause, ExpansionError, ExpansionStep};
use crate::swap::event::{FxResetNotionalExchange, NotionalExchange, PaymentEvent};
use crate::swap::period::RatePaymentPeriod;
use chrono::NaiveDate;
use log::trace;

/// Derive the notional exchange events for `periods`.
///
/// `periods` must already carry adjusted payment dates. `initial_exchange_date`
/// is the adjusted leg start date and anchors both the initial exchange and the
/// start boundary of the first period. Events come out boundary by boundary in
/// period order; nothing is deduplicated. Fails only if a change in notional
/// between two periods does not fit in a `Decimal`.
pub fn create_events(
    periods: &[RatePaymentPeriod],
    initial_exchange_date: NaiveDate,
    initial_exchange: bool,
    intermediate_exchange: bool,
    final_exchange: bool,
) -> Result<Vec<PaymentEvent>, ExpansionError> {
    let mut events = Vec::new();
    if !(initial_exchange || intermediate_exchange || final_exchange) {
        return Ok(events);
    }

    for (i, period) in periods.iter().enumerate() {
        let previous = i.checked_sub(1).and_then(|j| periods.get(j));
        let next = periods.get(i + 1);
        let start_date = previous.map_or(initial_exchange_date, RatePaymentPeriod::payment_date);
        let notional = period.notional_amount();

        if let Some(fx_reset) = period.fx_reset() {
            if intermediate_exchange {
                events.push(
                    FxResetNotionalExchange::from_reset(
                        start_date,
                        notional.negated(),
                        fx_reset,
                        period.currency().clone(),
                    )
                    .into(),
                );
                events.push(
                    FxResetNotionalExchange::from_reset(
                        period.payment_date(),
                        notional,
                        fx_reset,
                        period.currency().clone(),
                    )
                    .into(),
                );
            }
            continue;
        }

        match previous {
            None if initial_exchange => {
                events.push(plain(start_date, notional.negated()));
            }
            Some(previous) if intermediate_exchange => {
                let amount = match previous.fx_reset() {
                    None => {
                        let change = previous
                            .notional()
                            .checked_sub(notional.amount)
                            .ok_or_else(|| {
                                ExpansionError::new(
                                    ExpansionStep::NotionalExchange(i),
                                    ExpansionCause::NotionalOverflow {
                                        previous: previous.notional(),
                                        next: notional.amount,
                                    },
                                )
                            })?;
                        CurrencyAmount::new(notional.currency.clone(), change)
                    }
                    Some(_) => notional.negated(),
                };
                events.push(plain(start_date, amount));
            }
            _ => {}
        }

        match next {
            None if final_exchange => {
                events.push(plain(period.payment_date(), notional));
            }
            Some(next) if intermediate_exchange && next.fx_reset().is_some() => {
                events.push(plain(period.payment_date(), notional));
            }
            _ => {}
        }
    }

    for event in &events {
        trace!("derived notional exchange: {}", event);
    }
    Ok(events)
}

fn plain(payment_date: NaiveDate, amount: CurrencyAmount) -> PaymentEvent {
    NotionalExchange::new(payment_date, amount).into()
}
