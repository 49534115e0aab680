use crate::core::index::{IborIndex, OvernightIndex};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How the rate of an accrual period is observed.
///
/// Expansion carries observations through untouched; only pricers interpret them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RateObservation {
    /// A rate agreed at trade inception.
    Fixed { rate: f64 },
    /// A single fixing of a term index.
    Ibor {
        index: IborIndex,
        fixing_date: NaiveDate,
    },
    /// Daily fixings of an overnight index compounded over `[start_date, end_date)`.
    ///
    /// The last `rate_cutoff_days` fixings reuse the rate fixed just before the cutoff.
    OvernightCompounded {
        index: OvernightIndex,
        start_date: NaiveDate,
        end_date: NaiveDate,
        rate_cutoff_days: u32,
    },
}

impl RateObservation {
    pub fn fixed(rate: f64) -> Self {
        RateObservation::Fixed { rate }
    }

    pub fn ibor(index: IborIndex, fixing_date: NaiveDate) -> Self {
        RateObservation::Ibor { index, fixing_date }
    }

    pub fn overnight_compounded(
        index: OvernightIndex,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        RateObservation::OvernightCompounded {
            index,
            start_date,
            end_date,
            rate_cutoff_days: 0,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, RateObservation::Fixed { .. })
    }
}
